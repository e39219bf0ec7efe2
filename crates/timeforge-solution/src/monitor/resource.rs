//! Monitors watching one resource's timetable or workload.

use std::sync::Arc;

use timeforge_core::{ResourceId, TimeGroup};

use super::DeviationMonitor;
use crate::task::WORKLOAD_SCALE;

/// Distance of `value` outside `[minimum, maximum]`.
#[inline]
fn band_distance(value: u64, minimum: u64, maximum: u64) -> u64 {
    minimum.saturating_sub(value) + value.saturating_sub(maximum)
}

/// Number of tasks beyond the first at each time of one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvoidClashesMonitor {
    resource: ResourceId,
    excess: u64,
}

impl AvoidClashesMonitor {
    pub fn new(resource: ResourceId) -> Self {
        Self {
            resource,
            excess: 0,
        }
    }

    #[inline]
    pub fn resource(&self) -> ResourceId {
        self.resource
    }

    /// Occupancy at one time went from `old` to `new`.
    pub fn occupancy_changed(&mut self, old: u32, new: u32) {
        let before = u64::from(old.saturating_sub(1));
        let after = u64::from(new.saturating_sub(1));
        self.excess = self.excess + after - before;
    }

    /// Rebuilds from a timetable row.
    pub fn attach_row(&mut self, row: &[u32]) {
        self.excess = row.iter().map(|&n| u64::from(n.saturating_sub(1))).sum();
    }
}

impl DeviationMonitor for AvoidClashesMonitor {
    fn tag(&self) -> &'static str {
        "AvoidClashes"
    }

    fn deviation(&self) -> u64 {
        self.excess
    }

    fn clear(&mut self) {
        self.excess = 0;
    }
}

/// Busy and idle counts of a list of time groups.
///
/// A group is registered with its `(busy, idle)` counts by
/// `add_busy_and_idle` and unregistered by `delete_busy_and_idle` with the
/// same counts; a change of counts is a delete followed by an add.
#[derive(Debug, Clone, PartialEq, Eq)]
struct BusyGroups {
    time_groups: Vec<Arc<TimeGroup>>,
    states: Vec<Option<(usize, usize)>>,
}

impl BusyGroups {
    fn new(time_groups: Vec<Arc<TimeGroup>>) -> Self {
        let states = vec![None; time_groups.len()];
        Self {
            time_groups,
            states,
        }
    }

    fn add(&mut self, index: usize, busy: usize, idle: usize) {
        let state = &mut self.states[index];
        assert!(state.is_none(), "time group {} registered twice", index);
        *state = Some((busy, idle));
    }

    fn delete(&mut self, index: usize, busy: usize, idle: usize) {
        let state = &mut self.states[index];
        assert_eq!(
            *state,
            Some((busy, idle)),
            "time group {} deleted with stale counts",
            index
        );
        *state = None;
    }

    fn clear(&mut self) {
        self.states.iter_mut().for_each(|s| *s = None);
    }

    /// Registered groups containing `time`, with their counts.
    fn containing(&self, time: usize) -> Vec<(usize, usize, usize)> {
        self.time_groups
            .iter()
            .enumerate()
            .filter(|(_, g)| g.contains(time))
            .filter_map(|(i, _)| self.states[i].map(|(b, idle)| (i, b, idle)))
            .collect()
    }

    /// Counts for every group from a timetable row.
    fn counts_from_row(&self, row: &[u32]) -> Vec<(usize, usize)> {
        self.time_groups
            .iter()
            .map(|g| {
                let busy = g.times().iter().filter(|&&t| row[t] > 0).count();
                (busy, g.len() - busy)
            })
            .collect()
    }
}

/// For each time group, how far the resource's busy count lies outside
/// `[minimum, maximum]`. Groups in which the resource is never busy are
/// exempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitBusyTimesMonitor {
    resource: ResourceId,
    groups: BusyGroups,
    minimum: usize,
    maximum: usize,
    deviation: u64,
}

impl LimitBusyTimesMonitor {
    pub fn new(
        resource: ResourceId,
        time_groups: Vec<Arc<TimeGroup>>,
        minimum: usize,
        maximum: usize,
    ) -> Self {
        Self {
            resource,
            groups: BusyGroups::new(time_groups),
            minimum,
            maximum,
            deviation: 0,
        }
    }

    #[inline]
    pub fn resource(&self) -> ResourceId {
        self.resource
    }

    pub fn time_groups(&self) -> &[Arc<TimeGroup>] {
        &self.groups.time_groups
    }

    /// Registered `(busy, idle)` counts of one group.
    pub fn busy_and_idle(&self, index: usize) -> Option<(usize, usize)> {
        self.groups.states[index]
    }

    fn group_deviation(&self, busy: usize) -> u64 {
        if busy == 0 {
            0
        } else {
            band_distance(busy as u64, self.minimum as u64, self.maximum as u64)
        }
    }

    pub fn add_busy_and_idle(&mut self, index: usize, busy: usize, idle: usize) {
        self.groups.add(index, busy, idle);
        self.deviation += self.group_deviation(busy);
    }

    pub fn delete_busy_and_idle(&mut self, index: usize, busy: usize, idle: usize) {
        self.groups.delete(index, busy, idle);
        self.deviation -= self.group_deviation(busy);
    }

    /// The resource became busy at `time`.
    pub fn busy_time_added(&mut self, time: usize) {
        for (i, busy, idle) in self.groups.containing(time) {
            self.delete_busy_and_idle(i, busy, idle);
            self.add_busy_and_idle(i, busy + 1, idle - 1);
        }
    }

    /// The resource became free at `time`.
    pub fn busy_time_removed(&mut self, time: usize) {
        for (i, busy, idle) in self.groups.containing(time) {
            self.delete_busy_and_idle(i, busy, idle);
            self.add_busy_and_idle(i, busy - 1, idle + 1);
        }
    }

    /// Rebuilds every group's counts from a timetable row.
    pub fn attach_row(&mut self, row: &[u32]) {
        self.clear();
        for (i, (busy, idle)) in self.groups.counts_from_row(row).into_iter().enumerate() {
            self.add_busy_and_idle(i, busy, idle);
        }
    }

    /// Returns false if no busy count can ever fall outside the band.
    pub fn can_be_violated(&self) -> bool {
        let largest = self
            .groups
            .time_groups
            .iter()
            .map(|g| g.len())
            .max()
            .unwrap_or(0);
        self.minimum > 1 || self.maximum < largest
    }
}

impl DeviationMonitor for LimitBusyTimesMonitor {
    fn tag(&self) -> &'static str {
        "LimitBusyTimes"
    }

    fn deviation(&self) -> u64 {
        self.deviation
    }

    fn clear(&mut self) {
        self.groups.clear();
        self.deviation = 0;
    }
}

/// How far the number of time groups in which the resource is busy lies
/// outside `[minimum, maximum]`.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use timeforge_core::{ResourceId, TimeGroup};
/// use timeforge_solution::monitor::{ClusterBusyTimesMonitor, DeviationMonitor};
///
/// let days: Vec<_> = (0..5).map(|d| Arc::new(TimeGroup::singleton(5, d))).collect();
/// let mut m = ClusterBusyTimesMonitor::new(ResourceId::new(0), days, 2, 4);
/// for day in 0..3 {
///     m.add_busy_and_idle(day, 1, 0);
/// }
/// assert_eq!(m.deviation(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterBusyTimesMonitor {
    resource: ResourceId,
    groups: BusyGroups,
    minimum: usize,
    maximum: usize,
    busy_groups: usize,
}

impl ClusterBusyTimesMonitor {
    pub fn new(
        resource: ResourceId,
        time_groups: Vec<Arc<TimeGroup>>,
        minimum: usize,
        maximum: usize,
    ) -> Self {
        Self {
            resource,
            groups: BusyGroups::new(time_groups),
            minimum,
            maximum,
            busy_groups: 0,
        }
    }

    #[inline]
    pub fn resource(&self) -> ResourceId {
        self.resource
    }

    pub fn time_groups(&self) -> &[Arc<TimeGroup>] {
        &self.groups.time_groups
    }

    /// Number of groups in which the resource is busy.
    #[inline]
    pub fn busy_groups(&self) -> usize {
        self.busy_groups
    }

    pub fn busy_and_idle(&self, index: usize) -> Option<(usize, usize)> {
        self.groups.states[index]
    }

    pub fn add_busy_and_idle(&mut self, index: usize, busy: usize, idle: usize) {
        self.groups.add(index, busy, idle);
        if busy > 0 {
            self.busy_groups += 1;
        }
    }

    pub fn delete_busy_and_idle(&mut self, index: usize, busy: usize, idle: usize) {
        self.groups.delete(index, busy, idle);
        if busy > 0 {
            self.busy_groups -= 1;
        }
    }

    pub fn busy_time_added(&mut self, time: usize) {
        for (i, busy, idle) in self.groups.containing(time) {
            self.delete_busy_and_idle(i, busy, idle);
            self.add_busy_and_idle(i, busy + 1, idle - 1);
        }
    }

    pub fn busy_time_removed(&mut self, time: usize) {
        for (i, busy, idle) in self.groups.containing(time) {
            self.delete_busy_and_idle(i, busy, idle);
            self.add_busy_and_idle(i, busy - 1, idle + 1);
        }
    }

    pub fn attach_row(&mut self, row: &[u32]) {
        self.clear();
        for (i, (busy, idle)) in self.groups.counts_from_row(row).into_iter().enumerate() {
            self.add_busy_and_idle(i, busy, idle);
        }
    }

    /// Returns false if the number of busy groups always lies in the band.
    pub fn can_be_violated(&self) -> bool {
        self.minimum > 0 || self.maximum < self.groups.time_groups.len()
    }
}

impl DeviationMonitor for ClusterBusyTimesMonitor {
    fn tag(&self) -> &'static str {
        "ClusterBusyTimes"
    }

    fn deviation(&self) -> u64 {
        band_distance(
            self.busy_groups as u64,
            self.minimum as u64,
            self.maximum as u64,
        )
    }

    fn clear(&mut self) {
        self.groups.clear();
        self.busy_groups = 0;
    }
}

/// How far the resource's total workload lies outside `[minimum, maximum]`.
///
/// Workload is accumulated in fixed-point units of `1 / WORKLOAD_SCALE` and
/// compared in whole units, rounding up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitWorkloadMonitor {
    resource: ResourceId,
    minimum: u64,
    maximum: u64,
    workload: u64,
}

impl LimitWorkloadMonitor {
    pub fn new(resource: ResourceId, minimum: u64, maximum: u64) -> Self {
        Self {
            resource,
            minimum,
            maximum,
            workload: 0,
        }
    }

    #[inline]
    pub fn resource(&self) -> ResourceId {
        self.resource
    }

    /// Assigned workload in fixed-point units.
    #[inline]
    pub fn workload(&self) -> u64 {
        self.workload
    }

    pub fn assign_resource(&mut self, workload: u64) {
        self.workload += workload;
    }

    pub fn unassign_resource(&mut self, workload: u64) {
        self.workload = self.workload.checked_sub(workload).unwrap_or_else(|| {
            panic!(
                "LimitWorkload for {}: workload {} below zero after removing {}",
                self.resource, self.workload, workload
            )
        });
    }
}

impl DeviationMonitor for LimitWorkloadMonitor {
    fn tag(&self) -> &'static str {
        "LimitWorkload"
    }

    fn deviation(&self) -> u64 {
        let units = self.workload.div_ceil(WORKLOAD_SCALE);
        band_distance(units, self.minimum, self.maximum)
    }

    fn clear(&mut self) {
        self.workload = 0;
    }
}
