//! Router state machine
//!
//! One state variable, the current path, with transitions driven by
//! explicit navigation, back/forward stepping and direct render calls.
//! On every transition the path is resolved against the flattened route
//! list and the matched component is mounted into the router's
//! container, tearing the previous page down first.
//!
//! A route middleware receives a `Gate`; the mount only proceeds once
//! the gate fires. There is no timeout: a middleware that never fires
//! its gate wedges navigation until the next `navigate` supersedes it.

use std::cell::Cell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use serde_json::{Map, Value};
use tracing::warn;
use uuid::Uuid;

use mote_core::{ComponentDef, ComponentSpec, InstanceId, Runtime, OUTLET_TAG};
use mote_dom::NodeId;

use crate::history::History;
use crate::matcher::match_pattern;
use crate::route::{flatten, FlatRoute, Route};

/// Continuation handed to a route middleware
#[derive(Clone, Default)]
pub struct Gate {
    fired: Rc<Cell<bool>>,
}

impl Gate {
    /// Let the pending navigation proceed
    pub fn proceed(&self) {
        self.fired.set(true);
    }

    pub fn fired(&self) -> bool {
        self.fired.get()
    }
}

/// Route middleware: authorize or prefetch, then fire the gate
pub type Middleware = Rc<dyn Fn(Gate)>;

/// Path-change listener, called with the matched params
pub type Listener = Rc<dyn Fn(&BTreeMap<String, String>)>;

/// Component mounted when no route matches
pub struct ErrorRoute {
    pub component: Rc<ComponentDef>,
    pub alias: Option<String>,
}

/// Router construction options
pub struct RouterConfig {
    /// Treat paths as hash fragments (`#/users`) rather than real paths
    pub use_hash: bool,
    pub error: Option<ErrorRoute>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            use_hash: true,
            error: None,
        }
    }
}

struct Pending {
    index: usize,
    gate: Gate,
}

/// Location-driven component mounting
pub struct Router {
    routes: Vec<FlatRoute>,
    config: RouterConfig,
    history: History,
    container: Option<NodeId>,
    params: BTreeMap<String, String>,
    alias: Option<String>,
    body: Option<Value>,
    page: Option<InstanceId>,
    outlet_child: Option<InstanceId>,
    listeners: HashMap<String, Listener>,
    pending: Option<Pending>,
    diagnostics: Vec<String>,
    fallback: Rc<ComponentDef>,
}

impl Router {
    pub fn new(routes: Vec<Route>, config: RouterConfig) -> Self {
        Self {
            routes: flatten(routes),
            config,
            history: History::new(),
            container: None,
            params: BTreeMap::new(),
            alias: None,
            body: None,
            page: None,
            outlet_child: None,
            listeners: HashMap::new(),
            pending: None,
            diagnostics: Vec::new(),
            fallback: ComponentSpec::new(|_| Some("404".into())).build(),
        }
    }

    pub fn current_path(&self) -> Option<&str> {
        self.history.current()
    }

    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    /// Alias of the matched route, with `:name` forms resolved
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn page(&self) -> Option<InstanceId> {
        self.page.or(self.outlet_child)
    }

    /// Non-fatal routing problems recorded so far
    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    /// Whether a navigation is wedged on an unfired middleware gate
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn can_back(&self) -> bool {
        self.history.can_back()
    }

    pub fn can_forward(&self) -> bool {
        self.history.can_forward()
    }

    /// Navigate to a path and render the matched route
    pub fn navigate(&mut self, rt: &mut Runtime, path: &str) {
        self.navigate_with_body(rt, path, None);
    }

    /// Navigate with a request body the mounted component receives as
    /// its `body` state field
    pub fn navigate_with_body(&mut self, rt: &mut Runtime, path: &str, body: Option<Value>) {
        let path = self.normalize(path);
        if self.history.current() == Some(path.as_str()) {
            return;
        }
        self.history.visit(&path);
        self.body = body;
        self.render_current(rt);
    }

    /// Render the current path, optionally (re)binding the container
    pub fn render(&mut self, rt: &mut Runtime, container: Option<NodeId>) {
        if let Some(node) = container {
            self.container = Some(node);
        }
        if self.history.current().is_none() {
            self.history.visit("/");
        }
        self.render_current(rt);
    }

    /// Step back through history
    pub fn back(&mut self, rt: &mut Runtime) {
        if self.history.back().is_some() {
            self.body = None;
            self.render_current(rt);
        }
    }

    /// Step forward through history
    pub fn forward(&mut self, rt: &mut Runtime) {
        if self.history.forward().is_some() {
            self.body = None;
            self.render_current(rt);
        }
    }

    /// Register a path-change listener
    pub fn listen(&mut self, callback: impl Fn(&BTreeMap<String, String>) + 'static) -> String {
        let token = Uuid::new_v4().to_string();
        self.listeners.insert(token.clone(), Rc::new(callback));
        token
    }

    pub fn unlisten(&mut self, token: &str) {
        self.listeners.remove(token);
    }

    /// Complete a navigation wedged on a middleware whose gate has
    /// since fired
    pub fn poll(&mut self, rt: &mut Runtime) {
        let ready = self
            .pending
            .as_ref()
            .is_some_and(|pending| pending.gate.fired());
        if ready {
            if let Some(pending) = self.pending.take() {
                self.complete(rt, pending.index);
            }
        }
    }

    /// Consume anchor clicks the runtime intercepted on rendered pages
    pub fn process_requests(&mut self, rt: &mut Runtime) {
        for request in rt.take_navigation_requests() {
            self.navigate(rt, &request.path);
        }
    }

    fn normalize(&self, path: &str) -> String {
        let path = if self.config.use_hash {
            path.strip_prefix('#').unwrap_or(path)
        } else {
            path
        };
        if path.len() > 1 && path.ends_with('/') {
            path.trim_end_matches('/').to_string()
        } else {
            path.to_string()
        }
    }

    fn render_current(&mut self, rt: &mut Runtime) {
        let Some(container) = self.container else {
            return;
        };
        rt.remove_scoped_styles();
        // a newer navigation supersedes any wedged middleware
        self.pending = None;
        self.teardown(rt);

        let path = self.history.current().unwrap_or("/").to_string();
        match self.resolve(&path) {
            None => {
                self.params = BTreeMap::new();
                let (def, alias) = match &self.config.error {
                    Some(error) => (
                        Rc::clone(&error.component),
                        error.alias.clone().unwrap_or_else(|| "404".to_string()),
                    ),
                    None => (Rc::clone(&self.fallback), "404".to_string()),
                };
                self.alias = Some(resolve_alias(&alias, &self.params));
                let def = def.with_intercept_links();
                self.page = Some(rt.mount_with_params(&def, container, self.mount_params()));
                self.outlet_child = None;
                self.notify();
            }
            Some((index, params)) => {
                self.params = params;
                match self.routes[index].middleware.clone() {
                    Some(middleware) => {
                        let gate = Gate::default();
                        self.pending = Some(Pending {
                            index,
                            gate: gate.clone(),
                        });
                        middleware(gate);
                        self.poll(rt);
                    }
                    None => self.complete(rt, index),
                }
            }
        }
    }

    fn complete(&mut self, rt: &mut Runtime, index: usize) {
        let Some(container) = self.container else {
            return;
        };
        let (component, parent, alias, pattern) = {
            let route = &self.routes[index];
            (
                Rc::clone(&route.component),
                route.parent,
                route.alias.clone(),
                route.pattern.clone(),
            )
        };
        self.alias = alias.map(|a| resolve_alias(&a, &self.params));

        match parent {
            Some(parent_index) => {
                let parent_def = self.routes[parent_index].component.with_intercept_links();
                self.page = Some(rt.mount(&parent_def, container));

                let target = match rt.tree().first_by_tag(container, OUTLET_TAG) {
                    Some(outlet) => outlet,
                    None => {
                        let note = format!(
                            "no <{OUTLET_TAG}> in parent output for `{pattern}`; \
                             mounting child at top level"
                        );
                        warn!("{note}");
                        self.diagnostics.push(note);
                        container
                    }
                };
                let child_def = component.with_intercept_links();
                let child = rt.mount_with_params(&child_def, target, self.mount_params());
                if target == container {
                    // the fallback mount replaced the parent instance
                    self.page = Some(child);
                    self.outlet_child = None;
                } else {
                    self.outlet_child = Some(child);
                }
            }
            None => {
                let def = component.with_intercept_links();
                self.page = Some(rt.mount_with_params(&def, container, self.mount_params()));
                self.outlet_child = None;
            }
        }
        self.notify();
    }

    fn teardown(&mut self, rt: &mut Runtime) {
        if let Some(page) = self.page.take() {
            rt.destroy(page);
        }
        if let Some(child) = self.outlet_child.take() {
            rt.destroy(child);
        }
    }

    /// Exact match first, then dynamic-segment match in declaration order
    fn resolve(&self, path: &str) -> Option<(usize, BTreeMap<String, String>)> {
        if let Some(index) = self.routes.iter().position(|r| r.pattern == path) {
            return Some((index, BTreeMap::new()));
        }
        for (index, route) in self.routes.iter().enumerate() {
            if let Some(params) = match_pattern(&route.pattern, path) {
                return Some((index, params));
            }
        }
        None
    }

    fn mount_params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        for (name, value) in &self.params {
            params.insert(name.clone(), Value::String(value.clone()));
        }
        if let Some(body) = &self.body {
            params.insert("body".to_string(), body.clone());
        }
        params
    }

    fn notify(&self) {
        for listener in self.listeners.values() {
            listener(&self.params);
        }
    }
}

fn resolve_alias(alias: &str, params: &BTreeMap<String, String>) -> String {
    match alias.strip_prefix(':') {
        Some(name) => params.get(name).cloned().unwrap_or_default(),
        None => alias.to_string(),
    }
}
