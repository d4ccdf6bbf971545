//! Document - High-level document API

use crate::tree::DomTree;
use crate::NodeId;

/// HTML Document: a tree plus cached html/head/body references
#[derive(Debug)]
pub struct Document {
    tree: DomTree,
    html_element: NodeId,
    head_element: NodeId,
    body_element: NodeId,
}

impl Document {
    /// Create a new document with the html/head/body skeleton
    pub fn new() -> Self {
        let mut tree = DomTree::new();
        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        // Skeleton construction cannot fail: all nodes are fresh
        let root = tree.root();
        let _ = tree.append_child(root, html);
        let _ = tree.append_child(html, head);
        let _ = tree.append_child(html, body);

        Self {
            tree,
            html_element: html,
            head_element: head,
            body_element: body,
        }
    }

    /// Get `<html>` element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get `<head>` element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get `<body>` element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Document title (text of the `<title>` element, if any)
    pub fn title(&self) -> String {
        match self.tree.first_by_tag(self.head_element, "title") {
            Some(title) => self.tree.text_content(title),
            None => String::new(),
        }
    }

    /// Get element by ID
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree
            .descendants(self.tree.root())
            .into_iter()
            .find(|&node| self.tree.get_attr(node, "id") == Some(id))
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skeleton() {
        let doc = Document::new();
        assert!(doc.tree().is_tag(doc.document_element(), "html"));
        assert!(doc.tree().is_tag(doc.head(), "head"));
        assert!(doc.tree().is_tag(doc.body(), "body"));
        assert!(doc.tree().is_attached(doc.body()));
    }

    #[test]
    fn test_get_element_by_id() {
        let mut doc = Document::new();
        let body = doc.body();
        let div = doc.tree_mut().create_element("div");
        doc.tree_mut().set_attr(div, "id", "main");
        doc.tree_mut().append_child(body, div).unwrap();

        assert_eq!(doc.get_element_by_id("main"), Some(div));
        assert_eq!(doc.get_element_by_id("missing"), None);
    }
}
