//! Operation logs for undo and redo.
//!
//! Every structural edit of a solution is journaled, as one [`Operation`], into
//! each active transaction. Composite edits (deleting a meet that still has
//! children and tasks, a recursive split) are journaled as the sequence of
//! primitive operations they perform, so every operation has an exact
//! inverse, given by [`Operation::inverse`]. Undo applies the inverses in
//! reverse order; redo applies the operations again in order. Both work on
//! exact handles: objects deleted by undo come back in their original slots.

use std::sync::Arc;

use timeforge_core::{EventId, EventResourceId, ResourceGroupId, ResourceId, TimeGroup};

use crate::ids::{BackRef, MeetId, NodeId, TaskId, ZoneId};

/// Everything needed to recreate a bare meet in its original slot.
#[derive(Debug, Clone, PartialEq)]
pub struct MeetRecord {
    pub meet: MeetId,
    pub duration: usize,
    pub domain: Option<Arc<TimeGroup>>,
    pub event: Option<EventId>,
    pub event_offset: usize,
    pub back_ref: Option<BackRef>,
    pub zones: Vec<Option<ZoneId>>,
}

/// A task pair produced by a split or consumed by a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskPair {
    /// Task of the first meet.
    pub first: TaskId,
    /// Task of the second meet.
    pub second: TaskId,
    /// Workload held by `second`.
    pub second_workload: u64,
}

/// One split boundary: `first` covers `[0, at)`, `second` covers the rest.
///
/// A split creates `second` and a merge retires it, so the same record
/// describes both directions.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitRecord {
    pub first: MeetId,
    pub second: MeetId,
    pub at: usize,
    pub second_domain: Option<Arc<TimeGroup>>,
    pub second_event_offset: usize,
    pub tasks: Vec<TaskPair>,
}

/// Everything needed to recreate an unassigned task in its original slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskRecord {
    pub task: TaskId,
    pub meet: MeetId,
    pub event_resource: Option<EventResourceId>,
    pub domain: ResourceGroupId,
    pub workload: u64,
}

/// One primitive structural edit.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    MeetMake(MeetRecord),
    MeetDelete(MeetRecord),
    MeetSplit(SplitRecord),
    MeetMerge(SplitRecord),
    MeetAssign {
        meet: MeetId,
        target: MeetId,
        offset: usize,
    },
    MeetUnassign {
        meet: MeetId,
        target: MeetId,
        offset: usize,
    },
    MeetSetDomain {
        meet: MeetId,
        old: Option<Arc<TimeGroup>>,
        new: Option<Arc<TimeGroup>>,
    },
    TaskMake(TaskRecord),
    TaskDelete(TaskRecord),
    TaskAssignResource {
        task: TaskId,
        resource: ResourceId,
    },
    TaskUnassignResource {
        task: TaskId,
        resource: ResourceId,
    },
    NodeAddParent {
        child: NodeId,
        parent: NodeId,
    },
    NodeDeleteParent {
        child: NodeId,
        parent: NodeId,
    },
    NodeAddMeet {
        node: NodeId,
        meet: MeetId,
    },
    NodeDeleteMeet {
        node: NodeId,
        meet: MeetId,
    },
}

impl Operation {
    /// The operation that exactly reverses this one.
    pub fn inverse(&self) -> Operation {
        match self {
            Operation::MeetMake(r) => Operation::MeetDelete(r.clone()),
            Operation::MeetDelete(r) => Operation::MeetMake(r.clone()),
            Operation::MeetSplit(r) => Operation::MeetMerge(r.clone()),
            Operation::MeetMerge(r) => Operation::MeetSplit(r.clone()),
            &Operation::MeetAssign {
                meet,
                target,
                offset,
            } => Operation::MeetUnassign {
                meet,
                target,
                offset,
            },
            &Operation::MeetUnassign {
                meet,
                target,
                offset,
            } => Operation::MeetAssign {
                meet,
                target,
                offset,
            },
            Operation::MeetSetDomain { meet, old, new } => Operation::MeetSetDomain {
                meet: *meet,
                old: new.clone(),
                new: old.clone(),
            },
            Operation::TaskMake(r) => Operation::TaskDelete(*r),
            Operation::TaskDelete(r) => Operation::TaskMake(*r),
            &Operation::TaskAssignResource { task, resource } => {
                Operation::TaskUnassignResource { task, resource }
            }
            &Operation::TaskUnassignResource { task, resource } => {
                Operation::TaskAssignResource { task, resource }
            }
            &Operation::NodeAddParent { child, parent } => {
                Operation::NodeDeleteParent { child, parent }
            }
            &Operation::NodeDeleteParent { child, parent } => {
                Operation::NodeAddParent { child, parent }
            }
            &Operation::NodeAddMeet { node, meet } => Operation::NodeDeleteMeet { node, meet },
            &Operation::NodeDeleteMeet { node, meet } => Operation::NodeAddMeet { node, meet },
        }
    }

    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::MeetMake(_) => "meet_make",
            Operation::MeetDelete(_) => "meet_delete",
            Operation::MeetSplit(_) => "meet_split",
            Operation::MeetMerge(_) => "meet_merge",
            Operation::MeetAssign { .. } => "meet_assign",
            Operation::MeetUnassign { .. } => "meet_unassign",
            Operation::MeetSetDomain { .. } => "meet_set_domain",
            Operation::TaskMake(_) => "task_make",
            Operation::TaskDelete(_) => "task_delete",
            Operation::TaskAssignResource { .. } => "task_assign_resource",
            Operation::TaskUnassignResource { .. } => "task_unassign_resource",
            Operation::NodeAddParent { .. } => "node_add_parent",
            Operation::NodeDeleteParent { .. } => "node_delete_parent",
            Operation::NodeAddMeet { .. } => "node_add_meet",
            Operation::NodeDeleteMeet { .. } => "node_delete_meet",
        }
    }
}

/// A log of operations, recording while active.
#[derive(Debug, Clone, Default)]
pub struct Transaction {
    pub(crate) operations: Vec<Operation>,
    pub(crate) active: bool,
}

impl Transaction {
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[inline]
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverse_is_involution() {
        let ops = vec![
            Operation::MeetAssign {
                meet: MeetId::new(1),
                target: MeetId::new(0),
                offset: 2,
            },
            Operation::MeetSetDomain {
                meet: MeetId::new(1),
                old: None,
                new: Some(Arc::new(TimeGroup::full(3))),
            },
            Operation::TaskAssignResource {
                task: TaskId::new(0),
                resource: ResourceId::new(4),
            },
            Operation::NodeAddMeet {
                node: NodeId::new(0),
                meet: MeetId::new(1),
            },
        ];
        for op in &ops {
            assert_ne!(&op.inverse(), op);
            assert_eq!(&op.inverse().inverse(), op);
        }
    }

    #[test]
    fn test_split_and_merge_share_record() {
        let record = SplitRecord {
            first: MeetId::new(0),
            second: MeetId::new(1),
            at: 2,
            second_domain: None,
            second_event_offset: 2,
            tasks: vec![],
        };
        assert_eq!(
            Operation::MeetSplit(record.clone()).inverse(),
            Operation::MeetMerge(record)
        );
        assert_eq!(
            Operation::MeetMerge(SplitRecord {
                first: MeetId::new(0),
                second: MeetId::new(1),
                at: 1,
                second_domain: None,
                second_event_offset: 0,
                tasks: vec![],
            })
            .name(),
            "meet_merge"
        );
    }
}
