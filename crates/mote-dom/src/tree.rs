//! DOM Tree (arena-based allocation)
//!
//! The arena only ever grows: removing a node unlinks it from its parent
//! but keeps its slot, so `NodeId`s observed before a render cycle remain
//! valid afterwards and can be compared for node identity.
//!
//! The tree keeps a revision counter that increments on every mutation of
//! the *attached* document (structural changes, attribute writes that
//! actually change a value, text writes that actually change content).
//! Building detached subtrees does not move the revision, which makes the
//! counter a precise "did this render touch the page" probe.

use crate::error::{DomError, DomResult};
use crate::node::{Node, NodeData};
use crate::NodeId;

/// Tags serialized without a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Arena-based DOM tree
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
    revision: u64,
}

impl DomTree {
    /// Create a new tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
            revision: 0,
        }
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if !id.is_valid() {
            return None;
        }
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if !id.is_valid() {
            return None;
        }
        self.nodes.get_mut(id.index())
    }

    /// Number of nodes in the arena (including unlinked ones)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty (never true: the document node always exists)
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Document node
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Current document revision
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached element node
    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.push(Node::element(name))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.push(Node::comment(content))
    }

    /// Whether `node` is linked under the document node
    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut current = node;
        while current.is_valid() {
            if current == NodeId::ROOT {
                return true;
            }
            current = match self.get(current) {
                Some(n) => n.parent,
                None => return false,
            };
        }
        false
    }

    /// Append `child` as the last child of `parent`, detaching it first
    /// if it is linked elsewhere.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        if parent == child || self.is_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest);
        }
        self.get(parent).ok_or(DomError::NotFound)?;
        self.get(child).ok_or(DomError::NotFound)?;
        self.detach(child);

        let prev_last = self.nodes[parent.index()].last_child;
        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = prev_last;
            node.next_sibling = NodeId::NONE;
        }
        if prev_last.is_valid() {
            self.nodes[prev_last.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        self.nodes[parent.index()].last_child = child;

        if self.is_attached(parent) {
            self.revision += 1;
        }
        Ok(())
    }

    /// Unlink a node from its parent (no-op if already detached)
    pub fn detach(&mut self, node: NodeId) {
        let Some(n) = self.get(node) else { return };
        let parent = n.parent;
        if !parent.is_valid() {
            return;
        }
        let was_attached = self.is_attached(node);
        let (prev, next) = {
            let n = &self.nodes[node.index()];
            (n.prev_sibling, n.next_sibling)
        };

        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = next;
        } else {
            self.nodes[parent.index()].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = prev;
        } else {
            self.nodes[parent.index()].last_child = prev;
        }

        let n = &mut self.nodes[node.index()];
        n.parent = NodeId::NONE;
        n.prev_sibling = NodeId::NONE;
        n.next_sibling = NodeId::NONE;

        if was_attached {
            self.revision += 1;
        }
    }

    /// Remove `child` from `parent`
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        let n = self.get(child).ok_or(DomError::NotFound)?;
        if n.parent != parent {
            return Err(DomError::NotAChild);
        }
        self.detach(child);
        Ok(())
    }

    /// Replace `old` with `new` in `parent`, keeping the position
    pub fn replace_child(&mut self, parent: NodeId, new: NodeId, old: NodeId) -> DomResult<()> {
        let n = self.get(old).ok_or(DomError::NotFound)?;
        if n.parent != parent {
            return Err(DomError::NotAChild);
        }
        self.get(new).ok_or(DomError::NotFound)?;
        self.detach(new);

        let was_attached = self.is_attached(parent);
        let (prev, next) = {
            let o = &self.nodes[old.index()];
            (o.prev_sibling, o.next_sibling)
        };
        {
            let o = &mut self.nodes[old.index()];
            o.parent = NodeId::NONE;
            o.prev_sibling = NodeId::NONE;
            o.next_sibling = NodeId::NONE;
        }
        {
            let n = &mut self.nodes[new.index()];
            n.parent = parent;
            n.prev_sibling = prev;
            n.next_sibling = next;
        }
        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = new;
        } else {
            self.nodes[parent.index()].first_child = new;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = new;
        } else {
            self.nodes[parent.index()].last_child = new;
        }

        if was_attached {
            self.revision += 1;
        }
        Ok(())
    }

    fn is_ancestor(&self, maybe_ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.get(node).map(|n| n.parent).unwrap_or(NodeId::NONE);
        while current.is_valid() {
            if current == maybe_ancestor {
                return true;
            }
            current = self.nodes[current.index()].parent;
        }
        false
    }

    /// Deep-clone a subtree into fresh (detached) arena slots
    pub fn clone_subtree(&mut self, node: NodeId) -> NodeId {
        let data = self.nodes[node.index()].data.clone();
        let clone = self.push(Node {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        });
        for child in self.child_ids(node) {
            let child_clone = self.clone_subtree(child);
            // Both nodes are detached, never fails
            let _ = self.append_child(clone, child_clone);
        }
        clone
    }

    /// Shallow-clone a node (data only, no children), detached
    pub fn clone_shallow(&mut self, node: NodeId) -> NodeId {
        let data = self.nodes[node.index()].data.clone();
        self.push(Node {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        })
    }

    /// Child IDs in document order
    pub fn child_ids(&self, parent: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let Some(node) = self.get(parent) else {
            return out;
        };
        let mut current = node.first_child;
        while current.is_valid() {
            out.push(current);
            current = self.nodes[current.index()].next_sibling;
        }
        out
    }

    /// Number of children
    pub fn child_count(&self, parent: NodeId) -> usize {
        self.child_ids(parent).len()
    }

    /// Descendant IDs in document (preorder) order, excluding `node` itself
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_descendants(node, &mut out);
        out
    }

    fn collect_descendants(&self, node: NodeId, out: &mut Vec<NodeId>) {
        for child in self.child_ids(node) {
            out.push(child);
            self.collect_descendants(child, out);
        }
    }

    /// Ancestor chain from `node`'s parent up to the document node
    pub fn ancestors(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.get(node).map(|n| n.parent).unwrap_or(NodeId::NONE);
        while current.is_valid() {
            out.push(current);
            current = self.nodes[current.index()].parent;
        }
        out
    }

    /// Tag name of an element node
    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.get(node)?.as_element().map(|e| e.name.as_str())
    }

    /// Case-insensitive tag check
    pub fn is_tag(&self, node: NodeId, name: &str) -> bool {
        self.get(node)
            .and_then(|n| n.as_element())
            .is_some_and(|e| e.is_tag(name))
    }

    /// Get an attribute value
    pub fn get_attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.get(node)?.as_element()?.get_attr(name)
    }

    /// Check attribute presence
    pub fn has_attr(&self, node: NodeId, name: &str) -> bool {
        self.get(node)
            .and_then(|n| n.as_element())
            .is_some_and(|e| e.has_attr(name))
    }

    /// Set an attribute. Only a write that changes the stored value moves
    /// the revision; redundant writes are free.
    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) -> bool {
        let attached = self.is_attached(node);
        let Some(elem) = self.get_mut(node).and_then(|n| n.as_element_mut()) else {
            return false;
        };
        let changed = elem.set_attr(name, value);
        if changed && attached {
            self.revision += 1;
        }
        changed
    }

    /// Remove an attribute
    pub fn remove_attr(&mut self, node: NodeId, name: &str) -> bool {
        let attached = self.is_attached(node);
        let Some(elem) = self.get_mut(node).and_then(|n| n.as_element_mut()) else {
            return false;
        };
        let removed = elem.remove_attr(name);
        if removed && attached {
            self.revision += 1;
        }
        removed
    }

    /// Attribute names of an element node
    pub fn attr_names(&self, node: NodeId) -> Vec<String> {
        self.get(node)
            .and_then(|n| n.as_element())
            .map(|e| e.attr_names())
            .unwrap_or_default()
    }

    /// Overwrite a text node's content
    pub fn set_text(&mut self, node: NodeId, content: &str) -> bool {
        let attached = self.is_attached(node);
        let Some(n) = self.get_mut(node) else {
            return false;
        };
        if let NodeData::Text(t) = &mut n.data {
            if t.content == content {
                return false;
            }
            t.content = content.to_string();
            if attached {
                self.revision += 1;
            }
            return true;
        }
        false
    }

    /// A text node's own content, `None` for non-text nodes
    pub fn text_of(&self, node: NodeId) -> Option<String> {
        self.get(node).and_then(|n| n.as_text()).map(str::to_string)
    }

    /// Comment content of a single node, `None` for non-comments
    pub fn comment_of(&self, node: NodeId) -> Option<String> {
        self.get(node).and_then(|n| n.as_comment()).map(str::to_string)
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        if let Some(text) = self.get(node).and_then(|n| n.as_text()) {
            out.push_str(text);
        }
        for id in self.descendants(node) {
            if let Some(text) = self.get(id).and_then(|n| n.as_text()) {
                out.push_str(text);
            }
        }
        out
    }

    /// Descendant elements carrying the given attribute
    pub fn elements_with_attr(&self, root: NodeId, attr: &str) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|&id| self.has_attr(id, attr))
            .collect()
    }

    /// Descendant elements with the given tag (case-insensitive)
    pub fn elements_by_tag(&self, root: NodeId, tag: &str) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|&id| self.is_tag(id, tag))
            .collect()
    }

    /// First descendant element with the given tag
    pub fn first_by_tag(&self, root: NodeId, tag: &str) -> Option<NodeId> {
        self.descendants(root)
            .into_iter()
            .find(|&id| self.is_tag(id, tag))
    }

    pub(crate) fn is_void_element(name: &str) -> bool {
        VOID_ELEMENTS.iter().any(|v| name.eq_ignore_ascii_case(v))
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_children() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let a = tree.create_text("a");
        let b = tree.create_text("b");
        tree.append_child(tree.root(), div).unwrap();
        tree.append_child(div, a).unwrap();
        tree.append_child(div, b).unwrap();

        assert_eq!(tree.child_ids(div), vec![a, b]);
        assert_eq!(tree.child_count(div), 2);
        assert!(tree.is_attached(b));
    }

    #[test]
    fn test_detach_keeps_slot() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let span = tree.create_element("span");
        tree.append_child(tree.root(), div).unwrap();
        tree.append_child(div, span).unwrap();

        tree.detach(span);
        assert!(!tree.is_attached(span));
        assert!(tree.get(span).is_some());
        assert_eq!(tree.child_count(div), 0);
    }

    #[test]
    fn test_replace_child_position() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let a = tree.create_element("a");
        let b = tree.create_element("b");
        let c = tree.create_element("c");
        tree.append_child(tree.root(), div).unwrap();
        for id in [a, b, c] {
            tree.append_child(div, id).unwrap();
        }

        let z = tree.create_element("z");
        tree.replace_child(div, z, b).unwrap();
        assert_eq!(tree.child_ids(div), vec![a, z, c]);
        assert!(!tree.is_attached(b));
    }

    #[test]
    fn test_clone_subtree_is_detached() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let text = tree.create_text("hi");
        tree.append_child(div, text).unwrap();

        let clone = tree.clone_subtree(div);
        assert_ne!(clone, div);
        assert!(!tree.is_attached(clone));
        assert_eq!(tree.text_content(clone), "hi");
    }

    #[test]
    fn test_revision_ignores_detached_builds() {
        let mut tree = DomTree::new();
        let before = tree.revision();
        let div = tree.create_element("div");
        let text = tree.create_text("hi");
        tree.append_child(div, text).unwrap();
        tree.set_attr(div, "class", "x");
        assert_eq!(tree.revision(), before, "detached work must not move revision");

        tree.append_child(tree.root(), div).unwrap();
        assert!(tree.revision() > before);
    }

    #[test]
    fn test_revision_skips_redundant_attr_write() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        tree.append_child(tree.root(), div).unwrap();
        tree.set_attr(div, "class", "x");
        let rev = tree.revision();
        tree.set_attr(div, "class", "x");
        assert_eq!(tree.revision(), rev);
    }

    #[test]
    fn test_hierarchy_guard() {
        let mut tree = DomTree::new();
        let outer = tree.create_element("div");
        let inner = tree.create_element("div");
        tree.append_child(outer, inner).unwrap();
        assert_eq!(
            tree.append_child(inner, outer),
            Err(DomError::HierarchyRequest)
        );
    }
}
