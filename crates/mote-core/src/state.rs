//! Controller state
//!
//! The key/value state bag backing a component instance, plus the
//! attribute snapshot used to detect container attribute changes between
//! render cycles. Dotted-path lookups are best-effort: a missing
//! intermediate yields `None` (get) or a silent no-op (set), matching the
//! framework's best-effort binding philosophy.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// Per-instance controller state
#[derive(Debug, Default, Clone)]
pub struct ControllerState {
    fields: Map<String, Value>,
    attrs: BTreeMap<String, Option<String>>,
}

impl ControllerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a top-level field
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Set a top-level field
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    /// All fields
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// All fields, mutable
    pub fn fields_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.fields
    }

    /// Resolve a dotted path (`"user.name"`)
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.fields.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Write through a dotted path. Intermediate objects are not created;
    /// a missing or non-object intermediate makes this a no-op.
    pub fn set_path(&mut self, path: &str, value: Value) -> bool {
        let segments: Vec<&str> = path.split('.').collect();
        let [head @ .., last] = segments.as_slice() else {
            return false;
        };
        if head.is_empty() {
            self.fields.insert((*last).to_string(), value);
            return true;
        }
        let mut iter = head.iter();
        let Some(first) = iter.next() else {
            return false;
        };
        let Some(mut current) = self.fields.get_mut(*first) else {
            return false;
        };
        for segment in iter {
            let Some(next) = current.as_object_mut().and_then(|o| o.get_mut(*segment)) else {
                return false;
            };
            current = next;
        }
        let Some(obj) = current.as_object_mut() else {
            return false;
        };
        obj.insert((*last).to_string(), value);
        true
    }

    /// The attribute snapshot taken on the previous render cycle.
    /// `None` values record attributes seen once but currently absent.
    pub fn attr_snapshot(&self) -> &BTreeMap<String, Option<String>> {
        &self.attrs
    }

    /// Whether `name` has ever been snapshotted
    pub fn has_attr_snapshot(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    pub(crate) fn set_attr_snapshot(&mut self, name: &str, value: Option<String>) {
        self.attrs.insert(name.to_string(), value);
    }
}

/// Render a state value as attribute/form text. `Null` renders nothing.
pub fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => serde_json::to_string(other).ok(),
    }
}
