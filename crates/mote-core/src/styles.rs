//! Document head management
//!
//! Style sheets, meta tags, and the document title are owned by the
//! framework through marker attributes on the nodes it creates, so
//! repeated renders can find and update them instead of stacking
//! duplicates.

use mote_dom::{DomTree, NodeId};

use crate::STYLE_MARKER_ATTR;

/// Baseline sheet injected once per document
const BASE_SHEET: &str = "\
img[lazy] { opacity: 0; }\n\
img[lazy].loaded { opacity: 1; transition: opacity 0.3s; }\n\
::view-transition-old(root) { animation: fadeOut 0.2s ease both; }\n\
::view-transition-new(root) { animation: fadeIn 0.2s ease both; }\n\
@keyframes fadeIn { from { opacity: 0; } to { opacity: 1; } }\n\
@keyframes fadeOut { from { opacity: 1; } to { opacity: 0; } }\n";

/// Ensure the shared framework sheet exists in `head`
pub fn ensure_shared_sheet(tree: &mut DomTree, head: NodeId) {
    if marked_style(tree, head, "").is_some() {
        return;
    }
    let style = tree.create_element("style");
    tree.set_attr(style, STYLE_MARKER_ATTR, "");
    let text = tree.create_text(BASE_SHEET);
    let _ = tree.append_child(style, text);
    let _ = tree.append_child(head, style);
}

/// Add a view-transition rule for an element id, once per id
pub fn ensure_transition_rule(tree: &mut DomTree, head: NodeId, id: &str) {
    ensure_shared_sheet(tree, head);
    let Some(style) = marked_style(tree, head, "") else {
        return;
    };
    let current = tree.text_content(style);
    if current.contains(&format!("#{id}")) {
        return;
    }
    let rule = format!(
        "#{id} {{ view-transition-name: {id}; }}\n\
         ::view-transition-group({id}) {{ animation-duration: 0.3s; }}\n"
    );
    let updated = format!("{current}{rule}");
    if let Some(text) = tree.child_ids(style).first().copied() {
        tree.set_text(text, &updated);
    }
}

/// Install a component's scoped sheet, keyed by its identity token
pub fn ensure_scoped_style(tree: &mut DomTree, head: NodeId, identity: &str, css: &str) {
    if marked_style(tree, head, identity).is_some() {
        return;
    }
    let scoped = format!("*[mote-component=\"{identity}\"] {{ {css} }}");
    let style = tree.create_element("style");
    tree.set_attr(style, STYLE_MARKER_ATTR, identity);
    let text = tree.create_text(&scoped);
    let _ = tree.append_child(style, text);
    let _ = tree.append_child(head, style);
}

/// Install an app-wide sheet that navigation never tears down
pub fn ensure_global_sheet(tree: &mut DomTree, head: NodeId, css: &str) {
    if marked_style(tree, head, "global").is_some() {
        return;
    }
    let style = tree.create_element("style");
    tree.set_attr(style, STYLE_MARKER_ATTR, "global");
    let text = tree.create_text(css);
    let _ = tree.append_child(style, text);
    let _ = tree.append_child(head, style);
}

/// Create or update a `<meta name=.. content=..>` entry
pub fn ensure_meta(tree: &mut DomTree, head: NodeId, name: &str, content: &str) {
    for meta in tree.elements_by_tag(head, "meta") {
        if tree.get_attr(meta, "name") == Some(name) {
            tree.set_attr(meta, "content", content);
            return;
        }
    }
    let meta = tree.create_element("meta");
    tree.set_attr(meta, "name", name);
    tree.set_attr(meta, "content", content);
    let _ = tree.append_child(head, meta);
}

/// Set the document title, creating the node on first use
pub fn set_title(tree: &mut DomTree, head: NodeId, title: &str) {
    if let Some(node) = tree.first_by_tag(head, "title") {
        if let Some(text) = tree.child_ids(node).first().copied() {
            tree.set_text(text, title);
        } else {
            let text = tree.create_text(title);
            let _ = tree.append_child(node, text);
        }
        return;
    }
    let node = tree.create_element("title");
    let text = tree.create_text(title);
    let _ = tree.append_child(node, text);
    let _ = tree.append_child(head, node);
}

/// Remove per-component sheets, keeping the shared and `global` ones
pub fn remove_scoped_styles(tree: &mut DomTree, head: NodeId) {
    let scoped: Vec<NodeId> = tree
        .elements_by_tag(head, "style")
        .into_iter()
        .filter(
            |&s| matches!(tree.get_attr(s, STYLE_MARKER_ATTR), Some(v) if !v.is_empty() && v != "global"),
        )
        .collect();
    for style in scoped {
        tree.detach(style);
    }
}

fn marked_style(tree: &DomTree, head: NodeId, marker: &str) -> Option<NodeId> {
    tree.elements_by_tag(head, "style")
        .into_iter()
        .find(|&s| tree.get_attr(s, STYLE_MARKER_ATTR) == Some(marker))
}
