//! mote DOM - Document Object Model
//!
//! Arena-based DOM tree used as the render target of the mote framework.
//! Nodes are identified by `NodeId` indices into the arena; removed nodes
//! are unlinked but their slots are never reused, so a `NodeId` held across
//! a render cycle stays valid and keeps its identity.

mod document;
mod error;
mod events;
mod geometry;
mod node;
mod serialize;
mod tree;

pub use document::Document;
pub use error::{DomError, DomResult};
pub use events::{DomEvent, DomEventKind, EventQueue};
pub use geometry::DomRect;
pub use node::{Attribute, ElementData, Node, NodeData, TextData};
pub use tree::DomTree;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Root node ID (the document node)
    pub const ROOT: NodeId = NodeId(0);

    /// Check that this ID refers to a node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Raw index value
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
