//! Nodes and the node rule.

use tracing::trace;

use super::meet_ops::swap_remove_item;
use super::Solution;
use crate::error::{Result, SolutionError};
use crate::ids::{MeetId, NodeId};
use crate::node::Node;
use crate::transaction::Operation;

impl Solution {
    /// Creates an empty node. Refused while a transaction is active, since
    /// node creation is not journaled.
    pub fn make_node(&mut self) -> Result<NodeId> {
        if !self.active_transactions.is_empty() {
            return Err(SolutionError::TransactionInProgress);
        }
        let node = self.nodes.insert(Node::default());
        trace!(event = "node_make", node = %node);
        Ok(node)
    }

    pub fn delete_node_check(&self, node: NodeId) -> Result<()> {
        if !self.active_transactions.is_empty() {
            return Err(SolutionError::TransactionInProgress);
        }
        let n = self.live_node(node)?;
        if !n.meets.is_empty() || !n.children.is_empty() {
            return Err(SolutionError::NodeNotEmpty(node));
        }
        Ok(())
    }

    /// Deletes an empty node, detaching it from its parent first.
    pub fn delete_node(&mut self, node: NodeId) -> Result<()> {
        self.delete_node_check(node)?;
        if self.nodes[node].parent.is_some() {
            self.node_delete_parent_unchecked(node);
        }
        self.nodes.remove(node);
        trace!(event = "node_delete", node = %node);
        Ok(())
    }

    pub fn node_add_parent_check(&self, child: NodeId, parent: NodeId) -> Result<()> {
        let c = self.live_node(child)?;
        self.live_node(parent)?;
        if c.parent.is_some() {
            return Err(SolutionError::NodeHasParent(child));
        }
        let mut ancestor = Some(parent);
        while let Some(a) = ancestor {
            if a == child {
                return Err(SolutionError::NodeCycle { child, parent });
            }
            ancestor = self.nodes[a].parent;
        }
        for &meet in &c.meets {
            if let Some((target, _)) = self.meets[meet].target {
                if self.meets[target].node != Some(parent) {
                    return Err(SolutionError::NodeMeetAssigned { node: child, meet });
                }
            }
        }
        Ok(())
    }

    pub fn node_add_parent(&mut self, child: NodeId, parent: NodeId) -> Result<()> {
        self.node_add_parent_check(child, parent)
            .inspect_err(|e| trace!(event = "edit_rejected", op = "node_add_parent", error = %e))?;
        self.node_add_parent_unchecked(child, parent);
        self.after_edit();
        Ok(())
    }

    pub(crate) fn node_add_parent_unchecked(&mut self, child: NodeId, parent: NodeId) {
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
        self.journal(|| Operation::NodeAddParent { child, parent });
    }

    /// Requires every meet of `child` to be unassigned, since without a
    /// parent node none of them may be assigned.
    pub fn node_delete_parent_check(&self, child: NodeId) -> Result<()> {
        let c = self.live_node(child)?;
        if c.parent.is_none() {
            return Err(SolutionError::NodeWithoutParent(child));
        }
        if let Some(&meet) = c.meets.iter().find(|&&m| self.meets[m].target.is_some()) {
            return Err(SolutionError::NodeMeetAssigned { node: child, meet });
        }
        Ok(())
    }

    pub fn node_delete_parent(&mut self, child: NodeId) -> Result<()> {
        self.node_delete_parent_check(child)
            .inspect_err(|e| trace!(event = "edit_rejected", op = "node_delete_parent", error = %e))?;
        self.node_delete_parent_unchecked(child);
        self.after_edit();
        Ok(())
    }

    pub(crate) fn node_delete_parent_unchecked(&mut self, child: NodeId) {
        let parent = self.nodes[child]
            .parent
            .take()
            .unwrap_or_else(|| panic!("{} has no parent node", child));
        swap_remove_item(&mut self.nodes[parent].children, child, "child nodes");
        self.journal(|| Operation::NodeDeleteParent { child, parent });
    }

    /// Checks that `meet` may join `node`: it must not be a cycle meet or
    /// already lie in a node, and if assigned, its target must lie in the
    /// parent of `node`.
    pub fn node_add_meet_check(&self, node: NodeId, meet: MeetId) -> Result<()> {
        let n = self.live_node(node)?;
        let m = self.live_meet(meet)?;
        if m.is_cycle_meet() {
            return Err(SolutionError::CycleMeet(meet));
        }
        if m.node.is_some() {
            return Err(SolutionError::MeetInNode(meet));
        }
        if let Some((target, _)) = m.target {
            match n.parent {
                None => return Err(SolutionError::NodeHasNoParent { meet, node }),
                Some(parent) if self.meets[target].node != Some(parent) => {
                    return Err(SolutionError::TargetOutsideParentNode { meet, target })
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    pub fn node_add_meet(&mut self, node: NodeId, meet: MeetId) -> Result<()> {
        self.node_add_meet_check(node, meet)
            .inspect_err(|e| trace!(event = "edit_rejected", op = "node_add_meet", error = %e))?;
        self.node_add_meet_unchecked(node, meet);
        self.after_edit();
        Ok(())
    }

    pub(crate) fn node_add_meet_unchecked(&mut self, node: NodeId, meet: MeetId) {
        self.meets[meet].node = Some(node);
        self.nodes[node].meets.push(meet);
        self.journal(|| Operation::NodeAddMeet { node, meet });
    }

    /// A meet may leave its node only while none of its children lies in a
    /// node.
    pub fn node_delete_meet_check(&self, node: NodeId, meet: MeetId) -> Result<()> {
        self.live_node(node)?;
        let m = self.live_meet(meet)?;
        if m.node != Some(node) {
            return Err(SolutionError::MeetNotInNode { meet, node });
        }
        if let Some(&child) = m.children.iter().find(|&&c| self.meets[c].node.is_some()) {
            return Err(SolutionError::ChildInNode { meet, child });
        }
        Ok(())
    }

    pub fn node_delete_meet(&mut self, node: NodeId, meet: MeetId) -> Result<()> {
        self.node_delete_meet_check(node, meet)
            .inspect_err(|e| trace!(event = "edit_rejected", op = "node_delete_meet", error = %e))?;
        self.node_delete_meet_unchecked(node, meet);
        self.after_edit();
        Ok(())
    }

    pub(crate) fn node_delete_meet_unchecked(&mut self, node: NodeId, meet: MeetId) {
        self.meets[meet].node = None;
        swap_remove_item(&mut self.nodes[node].meets, meet, "node meets");
        self.journal(|| Operation::NodeDeleteMeet { node, meet });
    }
}
