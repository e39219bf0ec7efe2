//! Precondition failures of solution operations.

use thiserror::Error;
use timeforge_core::{EventId, EventResourceId, ResourceGroupId, ResourceId};

use crate::ids::{MeetId, MonitorId, NodeId, TaskId, TransactionId};

/// Why a structural operation was refused.
///
/// Every mutating operation has a paired `*_check` returning the same error
/// the operation itself would return; a refused operation changes nothing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SolutionError {
    #[error("no meet {0}")]
    NoSuchMeet(MeetId),

    #[error("no task {0}")]
    NoSuchTask(TaskId),

    #[error("no node {0}")]
    NoSuchNode(NodeId),

    #[error("no monitor {0}")]
    NoSuchMonitor(MonitorId),

    #[error("no transaction {0}")]
    NoSuchTransaction(TransactionId),

    #[error("no event {0}")]
    NoSuchEvent(EventId),

    #[error("no event resource {0}")]
    NoSuchEventResource(EventResourceId),

    #[error("no resource {0}")]
    NoSuchResource(ResourceId),

    #[error("no resource group {0}")]
    NoSuchResourceGroup(ResourceGroupId),

    #[error("meets need a positive duration")]
    ZeroDuration,

    #[error("time group belongs to a cycle of {found} times, expected {expected}")]
    ForeignTimeGroup { expected: usize, found: usize },

    #[error("{0} is a cycle meet")]
    CycleMeet(MeetId),

    #[error("{0} is already assigned")]
    MeetAssigned(MeetId),

    #[error("{0} is not assigned")]
    MeetNotAssigned(MeetId),

    #[error("assigning {meet} to {target} would create a cycle")]
    AssignmentCycle { meet: MeetId, target: MeetId },

    #[error("{meet} does not fit into {target} at offset {offset}")]
    OffsetOutOfRange {
        meet: MeetId,
        target: MeetId,
        offset: usize,
    },

    #[error("no cycle meet holds {duration} times from time {time}")]
    TimeNotCovered { time: usize, duration: usize },

    #[error("{meet} lies in {node}, which has no parent node")]
    NodeHasNoParent { meet: MeetId, node: NodeId },

    #[error("target {target} of {meet} is not in the parent of the meet's node")]
    TargetOutsideParentNode { meet: MeetId, target: MeetId },

    #[error("domain of {0} is incompatible with its surroundings")]
    DomainMismatch(MeetId),

    #[error("{0} has tasks or an event, so its domain cannot be automatic")]
    AutomaticDomainNotAllowed(MeetId),

    #[error("domain of {meet} excludes its preassigned time {time}")]
    PreassignedTimeExcluded { meet: MeetId, time: usize },

    #[error("cannot split {meet} at offset {offset}")]
    InvalidSplitOffset { meet: MeetId, offset: usize },

    #[error("{child} straddles offset {offset} of {meet}")]
    StraddlingChild {
        meet: MeetId,
        child: MeetId,
        offset: usize,
    },

    #[error("cannot merge {0} with itself")]
    MergeSameMeet(MeetId),

    #[error("{0} and {1} have different back references")]
    MergeBackRefMismatch(MeetId, MeetId),

    #[error("{0} and {1} belong to different events")]
    MergeEventMismatch(MeetId, MeetId),

    #[error("{0} and {1} are not both cycle meets or both ordinary meets")]
    MergeCycleMismatch(MeetId, MeetId),

    #[error("{0} and {1} are not adjacent")]
    MergeNotAdjacent(MeetId, MeetId),

    #[error("{0} and {1} lie in different nodes")]
    MergeNodeMismatch(MeetId, MeetId),

    #[error("tasks of {0} and {1} cannot be paired")]
    MergeTasksMismatch(MeetId, MeetId),

    #[error("{0} already has a resource")]
    TaskAssigned(TaskId),

    #[error("{0} has no resource")]
    TaskNotAssigned(TaskId),

    #[error("{resource} is not in the domain of {task}")]
    ResourceOutsideDomain { task: TaskId, resource: ResourceId },

    #[error("{0} already has a parent node")]
    NodeHasParent(NodeId),

    #[error("{0} has no parent node")]
    NodeWithoutParent(NodeId),

    #[error("making {parent} the parent of {child} would create a cycle")]
    NodeCycle { child: NodeId, parent: NodeId },

    #[error("{meet} of {node} is assigned outside the new parent node")]
    NodeMeetAssigned { node: NodeId, meet: MeetId },

    #[error("{0} already lies in a node")]
    MeetInNode(MeetId),

    #[error("{meet} does not lie in {node}")]
    MeetNotInNode { meet: MeetId, node: NodeId },

    #[error("{child} is assigned to {meet} and lies in a node")]
    ChildInNode { meet: MeetId, child: MeetId },

    #[error("{0} still holds meets or child nodes")]
    NodeNotEmpty(NodeId),

    #[error("{0} is active")]
    TransactionActive(TransactionId),

    #[error("{0} is not active")]
    TransactionInactive(TransactionId),

    #[error("nodes cannot be created or deleted while a transaction is active")]
    TransactionInProgress,

    #[error("{0} is not a group monitor")]
    NotAGroupMonitor(MonitorId),

    #[error("{0} is a group monitor")]
    IsGroupMonitor(MonitorId),

    #[error("{0} already has a parent monitor")]
    MonitorHasParent(MonitorId),

    #[error("{child} is not a child of {group}")]
    MonitorNotChild { group: MonitorId, child: MonitorId },

    #[error("adding {child} to {group} would create a cycle")]
    MonitorCycle { group: MonitorId, child: MonitorId },

    #[error("group monitor {0} still has children")]
    GroupNotEmpty(MonitorId),

    #[error("the root group monitor cannot be removed")]
    RootMonitor,
}

/// Result type alias for solution operations.
pub type Result<T> = std::result::Result<T, SolutionError>;
