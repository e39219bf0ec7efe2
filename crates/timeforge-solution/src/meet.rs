//! Meets: the nodes of the time-assignment tree.
//!
//! A meet covers `duration` consecutive times. It may be assigned to a
//! target meet at an offset, in which case it occupies
//! `offset..offset + duration` of the target. Cycle meets are the roots that
//! carry absolute times; every meet whose root is a cycle meet caches its
//! absolute start time.
//!
//! All mutation goes through [`Solution`](crate::Solution); this module only
//! holds the data and read accessors.

use std::sync::Arc;

use timeforge_core::{EventId, TimeGroup};

use crate::ids::{BackRef, DemandChunkId, MeetId, NodeId, SupplyChunkId, TaskId, ZoneId};

/// A contiguous block of times in the meet tree.
#[derive(Debug, Clone)]
pub struct Meet {
    pub(crate) duration: usize,
    pub(crate) event: Option<EventId>,
    pub(crate) event_offset: usize,
    pub(crate) back_ref: Option<BackRef>,
    pub(crate) domain: Option<Arc<TimeGroup>>,
    pub(crate) target: Option<(MeetId, usize)>,
    pub(crate) assigned_time: Option<usize>,
    pub(crate) tasks: Vec<TaskId>,
    pub(crate) children: Vec<MeetId>,
    pub(crate) node: Option<NodeId>,
    pub(crate) zones: Vec<Option<ZoneId>>,
    pub(crate) supply_chunks: Vec<SupplyChunkId>,
    pub(crate) demand_chunks: Vec<DemandChunkId>,
    pub(crate) all_demand: usize,
    pub(crate) visit_num: u64,
}

impl Meet {
    pub(crate) fn new(
        duration: usize,
        domain: Option<Arc<TimeGroup>>,
        event: Option<EventId>,
        event_offset: usize,
    ) -> Self {
        Self {
            duration,
            event,
            event_offset,
            back_ref: None,
            domain,
            target: None,
            assigned_time: None,
            tasks: Vec::new(),
            children: Vec::new(),
            node: None,
            zones: vec![None; duration],
            supply_chunks: Vec::with_capacity(duration),
            demand_chunks: Vec::with_capacity(duration),
            all_demand: 0,
            visit_num: 0,
        }
    }

    #[inline]
    pub fn duration(&self) -> usize {
        self.duration
    }

    /// The event this meet was derived from, if any.
    #[inline]
    pub fn event(&self) -> Option<EventId> {
        self.event
    }

    /// Offset of this meet's first time within its event.
    #[inline]
    pub fn event_offset(&self) -> usize {
        self.event_offset
    }

    #[inline]
    pub fn back_ref(&self) -> Option<BackRef> {
        self.back_ref
    }

    /// Explicit domain; `None` means automatic.
    #[inline]
    pub fn domain(&self) -> Option<&Arc<TimeGroup>> {
        self.domain.as_ref()
    }

    /// The meet this one is assigned to, and the offset within it.
    #[inline]
    pub fn target(&self) -> Option<(MeetId, usize)> {
        self.target
    }

    #[inline]
    pub fn is_assigned(&self) -> bool {
        self.target.is_some()
    }

    /// Absolute start time, known when the root is a cycle meet.
    #[inline]
    pub fn assigned_time(&self) -> Option<usize> {
        self.assigned_time
    }

    /// A cycle meet has a time but no target.
    #[inline]
    pub fn is_cycle_meet(&self) -> bool {
        self.target.is_none() && self.assigned_time.is_some()
    }

    #[inline]
    pub fn tasks(&self) -> &[TaskId] {
        &self.tasks
    }

    /// Meets assigned to this one, in no particular order.
    #[inline]
    pub fn children(&self) -> &[MeetId] {
        &self.children
    }

    #[inline]
    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    /// Zone tag of each offset.
    #[inline]
    pub fn zones(&self) -> &[Option<ZoneId>] {
        &self.zones
    }

    #[inline]
    pub fn supply_chunks(&self) -> &[SupplyChunkId] {
        &self.supply_chunks
    }

    #[inline]
    pub fn demand_chunks(&self) -> &[DemandChunkId] {
        &self.demand_chunks
    }

    /// Resource demand of this meet and every meet assigned below it,
    /// in task-times.
    #[inline]
    pub fn all_demand(&self) -> usize {
        self.all_demand
    }

    #[inline]
    pub fn visit_num(&self) -> u64 {
        self.visit_num
    }

    /// Demand contributed by this meet alone.
    #[inline]
    pub(crate) fn own_demand(&self) -> usize {
        self.duration * self.tasks.len()
    }
}
