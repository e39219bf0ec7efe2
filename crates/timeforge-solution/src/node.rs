//! Nodes: groupings of meets with a parent link.
//!
//! A meet in a node whose node has a parent may only be assigned to meets of
//! that parent node; a meet in a parentless node may not be assigned at all.

use crate::ids::{MeetId, NodeId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) meets: Vec<MeetId>,
}

impl Node {
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[inline]
    pub fn meets(&self) -> &[MeetId] {
        &self.meets
    }
}
