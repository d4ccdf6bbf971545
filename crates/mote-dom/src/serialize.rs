//! HTML serialization
//!
//! Turns arena subtrees back into markup. Used by tests and hosts that
//! want to inspect a container's rendered state.

use crate::node::NodeData;
use crate::tree::DomTree;
use crate::NodeId;

impl DomTree {
    /// Serialize a node's children
    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        for child in self.child_ids(node) {
            self.serialize_node(child, &mut out);
        }
        out
    }

    /// Serialize a node including itself
    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.serialize_node(node, &mut out);
        out
    }

    fn serialize_node(&self, node: NodeId, out: &mut String) {
        let Some(n) = self.get(node) else { return };
        match &n.data {
            NodeData::Document => {
                for child in self.child_ids(node) {
                    self.serialize_node(child, out);
                }
            }
            NodeData::Text(t) => out.push_str(&escape_text(&t.content)),
            NodeData::Comment(c) => {
                out.push_str("<!--");
                out.push_str(c);
                out.push_str("-->");
            }
            NodeData::Element(e) => {
                out.push('<');
                out.push_str(&e.name);
                for attr in &e.attrs {
                    out.push(' ');
                    out.push_str(&attr.name);
                    out.push_str("=\"");
                    out.push_str(&escape_attr(&attr.value));
                    out.push('"');
                }
                out.push('>');
                if DomTree::is_void_element(&e.name) {
                    return;
                }
                for child in self.child_ids(node) {
                    self.serialize_node(child, out);
                }
                out.push_str("</");
                out.push_str(&e.name);
                out.push('>');
            }
        }
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_roundtrip_shape() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        tree.set_attr(div, "id", "box");
        let p = tree.create_element("p");
        let text = tree.create_text("Hello");
        tree.append_child(tree.root(), div).unwrap();
        tree.append_child(div, p).unwrap();
        tree.append_child(p, text).unwrap();

        assert_eq!(tree.outer_html(div), r#"<div id="box"><p>Hello</p></div>"#);
        assert_eq!(tree.inner_html(div), "<p>Hello</p>");
    }

    #[test]
    fn test_void_and_escaping() {
        let mut tree = DomTree::new();
        let img = tree.create_element("img");
        tree.set_attr(img, "src", "a&b.png");
        tree.append_child(tree.root(), img).unwrap();
        assert_eq!(tree.outer_html(img), r#"<img src="a&amp;b.png">"#);

        let p = tree.create_element("p");
        let t = tree.create_text("1 < 2");
        tree.append_child(p, t).unwrap();
        assert_eq!(tree.outer_html(p), "<p>1 &lt; 2</p>");
    }
}
