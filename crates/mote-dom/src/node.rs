//! DOM Node model
//!
//! Node links use `NodeId` indices instead of pointers; `NodeData` carries
//! the per-kind payload. Tag names are stored as parsed (lowercase from the
//! HTML parser) and compared case-insensitively.

use crate::NodeId;

/// DOM Node
#[derive(Debug, Clone)]
pub struct Node {
    /// Parent node (NONE if detached or root)
    pub parent: NodeId,
    /// First child
    pub first_child: NodeId,
    /// Last child (for O(1) append)
    pub last_child: NodeId,
    /// Previous sibling
    pub prev_sibling: NodeId,
    /// Next sibling
    pub next_sibling: NodeId,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    fn unlinked(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    /// Create a new element node
    pub fn element(name: &str) -> Self {
        Self::unlinked(NodeData::Element(ElementData::new(name)))
    }

    /// Create a new text node
    pub fn text(content: impl Into<String>) -> Self {
        Self::unlinked(NodeData::Text(TextData {
            content: content.into(),
        }))
    }

    /// Create a comment node
    pub fn comment(content: impl Into<String>) -> Self {
        Self::unlinked(NodeData::Comment(content.into()))
    }

    /// Create the document node
    pub fn document() -> Self {
        Self::unlinked(NodeData::Document)
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Check if this is text
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(&t.content),
            _ => None,
        }
    }

    /// Get comment content if this is a comment node
    #[inline]
    pub fn as_comment(&self) -> Option<&str> {
        match &self.data {
            NodeData::Comment(c) => Some(c),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Document root
    Document,
    /// Element
    Element(ElementData),
    /// Text content
    Text(TextData),
    /// Comment
    Comment(String),
}

/// Element-specific data
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Tag name
    pub name: String,
    /// Attributes, in document order
    pub attrs: Vec<Attribute>,
}

impl ElementData {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attrs: Vec::new(),
        }
    }

    /// Case-insensitive tag comparison
    pub fn is_tag(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Tag name uppercased (registry key form)
    pub fn tag_upper(&self) -> String {
        self.name.to_ascii_uppercase()
    }

    /// Get an attribute value
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Check attribute presence
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|a| a.name == name)
    }

    /// Set an attribute; returns true if the stored value changed
    pub fn set_attr(&mut self, name: &str, value: &str) -> bool {
        for attr in self.attrs.iter_mut() {
            if attr.name == name {
                if attr.value == value {
                    return false;
                }
                attr.value = value.to_string();
                return true;
            }
        }
        self.attrs.push(Attribute {
            name: name.to_string(),
            value: value.to_string(),
        });
        true
    }

    /// Remove an attribute; returns true if it was present
    pub fn remove_attr(&mut self, name: &str) -> bool {
        let before = self.attrs.len();
        self.attrs.retain(|a| a.name != name);
        self.attrs.len() != before
    }

    /// Attribute names, in document order
    pub fn attr_names(&self) -> Vec<String> {
        self.attrs.iter().map(|a| a.name.clone()).collect()
    }
}

/// Text node data
#[derive(Debug, Clone)]
pub struct TextData {
    pub content: String,
}

/// Attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_attrs() {
        let mut elem = ElementData::new("div");
        assert!(elem.set_attr("class", "card"));
        assert!(!elem.set_attr("class", "card")); // unchanged value
        assert!(elem.set_attr("class", "card active"));
        assert_eq!(elem.get_attr("class"), Some("card active"));
        assert!(elem.remove_attr("class"));
        assert!(!elem.has_attr("class"));
    }

    #[test]
    fn test_tag_case_insensitive() {
        let elem = ElementData::new("x-counter");
        assert!(elem.is_tag("X-COUNTER"));
        assert_eq!(elem.tag_upper(), "X-COUNTER");
    }
}
