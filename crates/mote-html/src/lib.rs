//! mote HTML Parser
//!
//! Turns component render output (markup strings) into detached subtrees
//! of a `mote_dom::DomTree`. Built on html5ever; malformed markup follows
//! the parser's standard recovery, there is no error path.

mod parser;

pub use parser::FragmentParser;

use mote_dom::{DomTree, NodeId};

/// Parse markup and attach the resulting nodes as children of `container`.
///
/// Existing children of `container` are left alone; callers pass a fresh
/// (detached) node when they want a pristine desired tree.
pub fn parse_into(tree: &mut DomTree, container: NodeId, html: &str) {
    FragmentParser::new().parse_into(tree, container, html);
}

/// Clone `reference` shallowly and parse `html` into the clone.
///
/// This is the "desired" side of a render cycle: a detached copy of the
/// live container holding the freshly rendered markup.
pub fn parse_desired(tree: &mut DomTree, reference: NodeId, html: &str) -> NodeId {
    let clone = tree.clone_shallow(reference);
    parse_into(tree, clone, html);
    clone
}
