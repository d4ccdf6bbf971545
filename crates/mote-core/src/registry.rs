//! Component Registry
//!
//! Tag name to component definition mapping, scoped to one runtime (not a
//! process global, so tests can build independent setups). Keys are
//! uppercased; lookups are case-insensitive. Definitions are only ever
//! added, never removed.

use std::collections::HashMap;
use std::rc::Rc;

use crate::component::ComponentDef;

/// Registry of tag-named component definitions
#[derive(Default)]
pub struct ComponentRegistry {
    definitions: HashMap<String, Rc<ComponentDef>>,
}

/// Registration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("component `{0}` is already registered")]
    AlreadyDefined(String),

    #[error("component definition has no tag name")]
    MissingTagName,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition under its tag name
    pub fn register(&mut self, def: Rc<ComponentDef>) -> Result<(), RegistryError> {
        let Some(tag) = def.tag_name.as_deref() else {
            return Err(RegistryError::MissingTagName);
        };
        let key = tag.to_ascii_uppercase();
        if self.definitions.contains_key(&key) {
            return Err(RegistryError::AlreadyDefined(tag.to_string()));
        }
        self.definitions.insert(key, def);
        Ok(())
    }

    /// Look up a definition by tag name (case-insensitive)
    pub fn get(&self, tag: &str) -> Option<Rc<ComponentDef>> {
        self.definitions.get(&tag.to_ascii_uppercase()).cloned()
    }

    /// Check if a tag is registered
    pub fn is_registered(&self, tag: &str) -> bool {
        self.definitions.contains_key(&tag.to_ascii_uppercase())
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentSpec;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = ComponentRegistry::new();
        let def = ComponentSpec::new(|_| Some("<p></p>".into()))
            .tag_name("x-card")
            .build();

        registry.register(def).unwrap();
        assert!(registry.is_registered("x-card"));
        assert!(registry.is_registered("X-CARD"));
        assert!(registry.get("x-card").is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = ComponentRegistry::new();
        let a = ComponentSpec::new(|_| Some("<p></p>".into()))
            .tag_name("x-card")
            .build();
        let b = ComponentSpec::new(|_| Some("<div></div>".into()))
            .tag_name("X-Card")
            .build();

        registry.register(a).unwrap();
        assert_eq!(
            registry.register(b),
            Err(RegistryError::AlreadyDefined("X-Card".to_string()))
        );
    }

    #[test]
    fn test_missing_tag_name() {
        let mut registry = ComponentRegistry::new();
        let def = ComponentSpec::new(|_| Some("<p></p>".into())).build();
        assert_eq!(registry.register(def), Err(RegistryError::MissingTagName));
    }
}
