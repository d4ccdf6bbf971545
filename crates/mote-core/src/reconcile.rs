//! DOM reconciliation
//!
//! Mutates a live subtree in place so it matches a freshly parsed
//! desired subtree, child position by child position. The algorithm is
//! positional: no keys, no move detection. Nodes that survive keep
//! their identity, which is what keeps nested component containers and
//! focus stable across renders.

use mote_dom::{DomTree, NodeId};
use tracing::debug;

use crate::debug::debugger_enabled;
use crate::{IDENTITY_ATTR, LAZY_ATTR, LISTENER_MARKER};

/// Side effects gathered while reconciling
#[derive(Default)]
pub struct RenderEffects {
    /// Newly inserted `img[lazy]` nodes that need deferred loading
    pub lazy_images: Vec<NodeId>,
    /// Element ids seen in the desired tree, for view-transition rules
    pub transition_ids: Vec<String>,
}

/// Reconcile `live`'s children against `desired`'s children.
///
/// `identity` is the owning instance's identity token: a live child
/// that carries a different identity marker belongs to a nested
/// instance, whose subtree is never recursed into. Its container node
/// still follows the parent's output: attributes sync, and a dropped
/// or retagged container is removed or replaced like any other child.
pub fn reconcile(
    tree: &mut DomTree,
    live: NodeId,
    desired: NodeId,
    identity: &str,
    fx: &mut RenderEffects,
) {
    collect_transition_ids(tree, desired, fx);
    reconcile_children(tree, live, desired, identity, fx);
}

fn collect_transition_ids(tree: &DomTree, desired: NodeId, fx: &mut RenderEffects) {
    for node in tree.descendants(desired) {
        if let Some(id) = tree.get_attr(node, "id") {
            fx.transition_ids.push(id.to_string());
        }
    }
}

fn reconcile_children(
    tree: &mut DomTree,
    live: NodeId,
    desired: NodeId,
    identity: &str,
    fx: &mut RenderEffects,
) {
    let live_children = tree.child_ids(live);
    let desired_children = tree.child_ids(desired);
    let max = live_children.len().max(desired_children.len());

    for i in 0..max {
        match (live_children.get(i).copied(), desired_children.get(i).copied()) {
            (None, Some(d)) => {
                let fresh = tree.clone_subtree(d);
                collect_lazy_images(tree, fresh, fx);
                let _ = tree.append_child(live, fresh);
            }
            (Some(l), None) => {
                tree.detach(l);
            }
            (Some(l), Some(d)) => {
                reconcile_node(tree, live, l, d, identity, fx);
            }
            (None, None) => unreachable!(),
        }
    }
}

fn reconcile_node(
    tree: &mut DomTree,
    parent: NodeId,
    live: NodeId,
    desired: NodeId,
    identity: &str,
    fx: &mut RenderEffects,
) {
    if let (Some(old), Some(new)) = (tree.comment_of(live), tree.comment_of(desired)) {
        if old == new {
            return;
        }
    }

    let live_text = tree.text_of(live);
    let desired_text = tree.text_of(desired);

    match (live_text, desired_text) {
        (Some(old), Some(new)) => {
            if strip_ws(&old) != strip_ws(&new) {
                if debugger_enabled() {
                    debug!(%old, %new, "text updated");
                }
                tree.set_text(live, &new);
            }
        }
        (None, None) if same_tag(tree, live, desired) => {
            reconcile_attrs(tree, live, desired);
            // A nested instance owns everything below its container; the
            // parent's output only governs the container node itself.
            if !owned_by_other(tree, live, identity) {
                reconcile_children(tree, live, desired, identity, fx);
            }
        }
        _ => {
            if debugger_enabled() {
                debug!(?live, ?desired, "node replaced");
            }
            let fresh = tree.clone_subtree(desired);
            collect_lazy_images(tree, fresh, fx);
            let _ = tree.replace_child(parent, fresh, live);
        }
    }
}

fn reconcile_attrs(tree: &mut DomTree, live: NodeId, desired: NodeId) {
    for name in tree.attr_names(desired) {
        if name == IDENTITY_ATTR {
            continue;
        }
        if let Some(value) = tree.get_attr(desired, &name) {
            let value = value.to_string();
            tree.set_attr(live, &name, &value);
        }
    }
    for name in tree.attr_names(live) {
        // framework-owned markers never appear in render output
        if name == IDENTITY_ATTR || name == LISTENER_MARKER {
            continue;
        }
        if !tree.has_attr(desired, &name) {
            tree.remove_attr(live, &name);
        }
    }
}

fn collect_lazy_images(tree: &DomTree, root: NodeId, fx: &mut RenderEffects) {
    if is_lazy_image(tree, root) {
        fx.lazy_images.push(root);
    }
    for node in tree.descendants(root) {
        if is_lazy_image(tree, node) {
            fx.lazy_images.push(node);
        }
    }
}

fn is_lazy_image(tree: &DomTree, node: NodeId) -> bool {
    tree.is_tag(node, "img") && tree.has_attr(node, LAZY_ATTR)
}

fn owned_by_other(tree: &DomTree, node: NodeId, identity: &str) -> bool {
    match tree.get_attr(node, IDENTITY_ATTR) {
        Some(marker) => marker != identity,
        None => false,
    }
}

fn same_tag(tree: &DomTree, a: NodeId, b: NodeId) -> bool {
    match (tree.tag_name(a), tree.tag_name(b)) {
        (Some(ta), Some(tb)) => ta.eq_ignore_ascii_case(&tb),
        _ => false,
    }
}

fn strip_ws(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}
