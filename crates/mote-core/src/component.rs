//! Component definitions
//!
//! A `ComponentDef` is the immutable record created when a component is
//! declared; instances reference it through `Rc`. The `ComponentSpec`
//! builder is the public declaration surface.

use std::rc::Rc;

use crate::controller::{Controller, ControllerFactory};
use crate::state::ControllerState;

/// Render function: state in, markup out. Returning `None` (or empty
/// markup) makes the render cycle a no-op.
pub type RenderFn = Rc<dyn Fn(&ControllerState) -> Option<String>>;

/// Post-render hook, run on a later scheduler turn after DOM settle
pub type PostRenderFn = Rc<dyn Fn(&mut ControllerState)>;

/// A document metadata entry (`<meta name content>`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaEntry {
    pub name: String,
    pub content: String,
}

/// Immutable component definition
#[derive(Clone)]
pub struct ComponentDef {
    /// Tag name the component registers under, if any
    pub tag_name: Option<String>,
    /// Per-instance controller factory
    pub controller: Option<ControllerFactory>,
    /// Render function
    pub render: RenderFn,
    /// Deferred post-render hook
    pub post_render: Option<PostRenderFn>,
    /// Component-scoped CSS text
    pub style: Option<String>,
    /// Extra attribute names tracked beyond those present in markup
    pub attributes: Vec<String>,
    /// Document metadata entries
    pub meta: Vec<MetaEntry>,
    /// Document title to set on mount
    pub title: Option<String>,
    /// Declared binding table: method names reachable from markup
    pub methods: Vec<String>,
    /// Route anchor clicks through the router instead of full navigation
    pub intercept_links: bool,
}

impl ComponentDef {
    /// Whether `name` is in the declared binding table
    pub fn allows_method(&self, name: &str) -> bool {
        self.methods.iter().any(|m| m == name)
    }

    /// Copy of this definition with anchor interception enabled.
    /// Used by the router when mounting route components.
    pub fn with_intercept_links(&self) -> Rc<ComponentDef> {
        let mut def = self.clone();
        def.intercept_links = true;
        Rc::new(def)
    }
}

/// Builder for component declarations
pub struct ComponentSpec {
    def: ComponentDef,
}

impl ComponentSpec {
    /// Start a declaration from a render function
    pub fn new(render: impl Fn(&ControllerState) -> Option<String> + 'static) -> Self {
        Self {
            def: ComponentDef {
                tag_name: None,
                controller: None,
                render: Rc::new(render),
                post_render: None,
                style: None,
                attributes: Vec::new(),
                meta: Vec::new(),
                title: None,
                methods: Vec::new(),
                intercept_links: false,
            },
        }
    }

    /// Register the component under a tag name
    pub fn tag_name(mut self, name: impl Into<String>) -> Self {
        self.def.tag_name = Some(name.into());
        self
    }

    /// Attach a controller factory
    pub fn controller(mut self, factory: impl Fn() -> Box<dyn Controller> + 'static) -> Self {
        self.def.controller = Some(Rc::new(factory));
        self
    }

    /// Attach a post-render hook
    pub fn post_render(mut self, hook: impl Fn(&mut ControllerState) + 'static) -> Self {
        self.def.post_render = Some(Rc::new(hook));
        self
    }

    /// Component-scoped CSS
    pub fn style(mut self, css: impl Into<String>) -> Self {
        self.def.style = Some(css.into());
        self
    }

    /// Track an extra container attribute
    pub fn attribute(mut self, name: impl Into<String>) -> Self {
        self.def.attributes.push(name.into());
        self
    }

    /// Add a document metadata entry
    pub fn meta(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.def.meta.push(MetaEntry {
            name: name.into(),
            content: content.into(),
        });
        self
    }

    /// Set the document title on mount
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.def.title = Some(title.into());
        self
    }

    /// Declare a markup-bindable method name
    pub fn method(mut self, name: impl Into<String>) -> Self {
        self.def.methods.push(name.into());
        self
    }

    /// Route anchor clicks through the router
    pub fn intercept_links(mut self, enabled: bool) -> Self {
        self.def.intercept_links = enabled;
        self
    }

    /// Finish the declaration
    pub fn build(self) -> Rc<ComponentDef> {
        Rc::new(self.def)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let def = ComponentSpec::new(|_| Some("<p>hi</p>".into()))
            .tag_name("x-card")
            .method("save")
            .attribute("color")
            .meta("description", "a card")
            .build();

        assert_eq!(def.tag_name.as_deref(), Some("x-card"));
        assert!(def.allows_method("save"));
        assert!(!def.allows_method("delete"));
        assert_eq!(def.attributes, vec!["color".to_string()]);
    }

    #[test]
    fn test_with_intercept_links() {
        let def = ComponentSpec::new(|_| Some("<p></p>".into())).build();
        assert!(!def.intercept_links);
        assert!(def.with_intercept_links().intercept_links);
    }
}
