//! Monitors watching the meets of one event.
//!
//! The solution reports every change to a meet of the event as the removal
//! of the meet's old view (duration and start time) followed by the
//! addition of its new view. Splitting a meet, for instance, removes one
//! view and adds two.

use std::sync::Arc;

use timeforge_core::{EventId, TimeGroup};

use super::DeviationMonitor;

/// Total duration of the event's meets that have no time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignTimeMonitor {
    event: EventId,
    unassigned_duration: u64,
}

impl AssignTimeMonitor {
    pub fn new(event: EventId) -> Self {
        Self {
            event,
            unassigned_duration: 0,
        }
    }

    #[inline]
    pub fn event(&self) -> EventId {
        self.event
    }

    pub fn add_meet(&mut self, duration: usize, time: Option<usize>) {
        if time.is_none() {
            self.unassigned_duration += duration as u64;
        }
    }

    pub fn delete_meet(&mut self, duration: usize, time: Option<usize>) {
        if time.is_none() {
            self.unassigned_duration = self
                .unassigned_duration
                .checked_sub(duration as u64)
                .unwrap_or_else(|| panic!("AssignTime for {}: deviation below zero", self.event));
        }
    }
}

impl DeviationMonitor for AssignTimeMonitor {
    fn tag(&self) -> &'static str {
        "AssignTime"
    }

    fn deviation(&self) -> u64 {
        self.unassigned_duration
    }

    fn clear(&mut self) {
        self.unassigned_duration = 0;
    }
}

/// Total duration of the event's meets starting outside a preferred group.
///
/// Meets without a time are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferTimesMonitor {
    event: EventId,
    domain: Arc<TimeGroup>,
    deviation: u64,
}

impl PreferTimesMonitor {
    pub fn new(event: EventId, domain: Arc<TimeGroup>) -> Self {
        Self {
            event,
            domain,
            deviation: 0,
        }
    }

    #[inline]
    pub fn event(&self) -> EventId {
        self.event
    }

    /// The preferred start times.
    #[inline]
    pub fn domain(&self) -> &Arc<TimeGroup> {
        &self.domain
    }

    /// Returns true if a meet with this domain can only start at preferred
    /// times.
    pub fn domain_is_preferred(&self, meet_domain: &TimeGroup) -> bool {
        meet_domain.is_subset(&self.domain)
    }

    pub fn add_meet(&mut self, duration: usize, time: Option<usize>) {
        if matches!(time, Some(t) if !self.domain.contains(t)) {
            self.deviation += duration as u64;
        }
    }

    pub fn delete_meet(&mut self, duration: usize, time: Option<usize>) {
        if matches!(time, Some(t) if !self.domain.contains(t)) {
            self.deviation = self
                .deviation
                .checked_sub(duration as u64)
                .unwrap_or_else(|| panic!("PreferTimes for {}: deviation below zero", self.event));
        }
    }
}

impl DeviationMonitor for PreferTimesMonitor {
    fn tag(&self) -> &'static str {
        "PreferTimes"
    }

    fn deviation(&self) -> u64 {
        self.deviation
    }

    fn clear(&mut self) {
        self.deviation = 0;
    }
}
