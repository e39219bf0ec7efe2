//! Handles of solution objects.

use timeforge_core::define_id;

define_id!(
    /// Handle of a meet.
    MeetId
);
define_id!(
    /// Handle of a task.
    TaskId
);
define_id!(
    /// Handle of a node.
    NodeId
);
define_id!(
    /// Handle of a zone tag.
    ZoneId
);
define_id!(
    /// Handle of a monitor. `MonitorId(0)` is the solution's root group.
    MonitorId
);
define_id!(
    /// Handle of a supply chunk of the matching bridge.
    SupplyChunkId
);
define_id!(
    /// Handle of a demand chunk of the matching bridge.
    DemandChunkId
);
define_id!(
    /// Handle of a transaction.
    TransactionId
);

/// Opaque back reference supplied by the embedding application.
///
/// The solution stores and returns it but never interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BackRef(pub u64);
