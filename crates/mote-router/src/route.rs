//! Route configuration
//!
//! Routes may nest; nesting is flattened at router construction into a
//! list where each entry carries its resolved full pattern and the index
//! of its parent entry.

use std::rc::Rc;

use mote_core::ComponentDef;

use crate::router::Middleware;

/// A declared route, possibly with nested children
pub struct Route {
    pub path: String,
    pub component: Rc<ComponentDef>,
    /// Display alias; a `:name` form resolves against matched params
    pub alias: Option<String>,
    pub middleware: Option<Middleware>,
    pub children: Vec<Route>,
}

impl Route {
    pub fn new(path: impl Into<String>, component: Rc<ComponentDef>) -> Self {
        Self {
            path: path.into(),
            component,
            alias: None,
            middleware: None,
            children: Vec::new(),
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn middleware(mut self, middleware: impl Fn(crate::Gate) + 'static) -> Self {
        self.middleware = Some(Rc::new(middleware));
        self
    }

    pub fn child(mut self, route: Route) -> Self {
        self.children.push(route);
        self
    }
}

/// A flattened route entry
pub struct FlatRoute {
    /// Resolved full pattern
    pub pattern: String,
    pub component: Rc<ComponentDef>,
    pub alias: Option<String>,
    pub middleware: Option<Middleware>,
    /// Index of the parent entry for nested routes
    pub parent: Option<usize>,
}

/// Flatten a nested route list, parents before their children
pub fn flatten(routes: Vec<Route>) -> Vec<FlatRoute> {
    let mut flat = Vec::new();
    for route in routes {
        push_route(&mut flat, route, None);
    }
    flat
}

fn push_route(flat: &mut Vec<FlatRoute>, route: Route, parent: Option<usize>) {
    let pattern = match parent {
        // child paths given absolute are kept; relative ones join
        Some(index) if !route.path.starts_with('/') => {
            let base = flat[index].pattern.trim_end_matches('/');
            format!("{base}/{}", route.path)
        }
        _ => route.path,
    };
    flat.push(FlatRoute {
        pattern,
        component: route.component,
        alias: route.alias,
        middleware: route.middleware,
        parent,
    });
    let index = flat.len() - 1;
    for child in route.children {
        push_route(flat, child, Some(index));
    }
}
