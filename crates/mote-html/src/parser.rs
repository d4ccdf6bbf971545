//! HTML5 parser implementation
//!
//! Uses html5ever's built-in RcDom and converts to our DOM format.
//! This is simpler and more reliable than implementing TreeSink directly.
//! Render output is body-level markup, so the document parse entry point
//! is used and the synthesized `<body>`'s children become the fragment.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};
use mote_dom::{DomTree, NodeId};

/// HTML fragment parser
pub struct FragmentParser;

impl FragmentParser {
    /// Create a new parser
    pub fn new() -> Self {
        Self
    }

    /// Parse `html` and append the fragment's nodes under `container`
    pub fn parse_into(&self, tree: &mut DomTree, container: NodeId, html: &str) {
        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())
            .expect("reading from an in-memory string cannot fail");

        // html5ever wraps fragments in html/head/body; the body holds the
        // actual fragment content.
        let Some(body) = find_body(&dom.document) else {
            tracing::debug!("parse produced no body element");
            return;
        };

        for child in body.children.borrow().iter() {
            self.convert_node(child, tree, container);
        }
    }

    /// Convert an RcDom node into our arena under `parent`
    fn convert_node(&self, handle: &Handle, tree: &mut DomTree, parent: NodeId) {
        match &handle.data {
            RcNodeData::Text { contents } => {
                // Whitespace-only text nodes are kept: the reconciler's
                // whitespace-stripped compare is defined over them.
                let id = tree.create_text(&contents.borrow());
                let _ = tree.append_child(parent, id);
            }
            RcNodeData::Comment { contents } => {
                let id = tree.create_comment(contents);
                let _ = tree.append_child(parent, id);
            }
            RcNodeData::Element { name, attrs, .. } => {
                let id = tree.create_element(&name.local);
                for attr in attrs.borrow().iter() {
                    tree.set_attr(id, &attr.name.local, &attr.value);
                }
                let _ = tree.append_child(parent, id);
                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, id);
                }
            }
            // Doctypes and processing instructions never occur in render
            // output; the document node is handled by the caller.
            _ => {}
        }
    }
}

impl Default for FragmentParser {
    fn default() -> Self {
        Self::new()
    }
}

fn find_body(document: &Handle) -> Option<Handle> {
    let html = find_element(document, "html")?;
    find_element(&html, "body")
}

fn find_element(parent: &Handle, tag: &str) -> Option<Handle> {
    parent
        .children
        .borrow()
        .iter()
        .find(|child| match &child.data {
            RcNodeData::Element { name, .. } => name.local.as_ref() == tag,
            _ => false,
        })
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let mut tree = DomTree::new();
        let container = tree.create_element("div");
        parse_into_helper(&mut tree, container, "<p>Hello</p>");

        let children = tree.child_ids(container);
        assert_eq!(children.len(), 1);
        assert!(tree.is_tag(children[0], "p"));
        assert_eq!(tree.text_content(children[0]), "Hello");
    }

    #[test]
    fn test_whitespace_text_preserved() {
        let mut tree = DomTree::new();
        let container = tree.create_element("div");
        parse_into_helper(&mut tree, container, "<p>  Hello  </p>");

        let p = tree.child_ids(container)[0];
        assert_eq!(tree.text_content(p), "  Hello  ");
    }

    #[test]
    fn test_attributes_and_nesting() {
        let mut tree = DomTree::new();
        let container = tree.create_element("div");
        parse_into_helper(
            &mut tree,
            container,
            r#"<ul class="list"><li>a</li><li>b</li></ul>"#,
        );

        let ul = tree.child_ids(container)[0];
        assert_eq!(tree.get_attr(ul, "class"), Some("list"));
        assert_eq!(tree.child_count(ul), 2);
    }

    #[test]
    fn test_custom_tags_survive() {
        let mut tree = DomTree::new();
        let container = tree.create_element("div");
        parse_into_helper(&mut tree, container, "<x-counter start=\"3\"></x-counter>");

        let counter = tree.child_ids(container)[0];
        assert!(tree.is_tag(counter, "x-counter"));
        assert_eq!(tree.get_attr(counter, "start"), Some("3"));
    }

    fn parse_into_helper(tree: &mut DomTree, container: NodeId, html: &str) {
        FragmentParser::new().parse_into(tree, container, html);
    }
}
