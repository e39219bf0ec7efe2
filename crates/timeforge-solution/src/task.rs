//! Tasks: resource requirements owned by meets.

use timeforge_core::{EventResourceId, ResourceGroupId, ResourceId};

use crate::ids::MeetId;

/// Fixed-point units per unit of workload.
///
/// Task workloads are stored in these units so that splitting a task and
/// merging it back reproduces its workload exactly.
pub const WORKLOAD_SCALE: u64 = 1000;

/// One resource requirement of a meet, for the meet's whole duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub(crate) meet: MeetId,
    pub(crate) event_resource: Option<EventResourceId>,
    pub(crate) domain: ResourceGroupId,
    pub(crate) resource: Option<ResourceId>,
    pub(crate) workload: u64,
}

impl Task {
    /// The meet owning this task.
    #[inline]
    pub fn meet(&self) -> MeetId {
        self.meet
    }

    #[inline]
    pub fn event_resource(&self) -> Option<EventResourceId> {
        self.event_resource
    }

    /// Resources that may be assigned.
    #[inline]
    pub fn domain(&self) -> ResourceGroupId {
        self.domain
    }

    #[inline]
    pub fn resource(&self) -> Option<ResourceId> {
        self.resource
    }

    /// Workload in units of `1 / WORKLOAD_SCALE`.
    #[inline]
    pub fn workload(&self) -> u64 {
        self.workload
    }

    /// Returns true if `self` and `other` may be merged into one task.
    pub fn merge_check(&self, other: &Task) -> bool {
        self.event_resource == other.event_resource
            && self.domain == other.domain
            && self.resource == other.resource
    }
}

/// Workload of the tail `tail` times of a task of `duration` times.
///
/// The head keeps the rest, so head and tail always sum to the original.
#[inline]
pub(crate) fn tail_workload(workload: u64, duration: usize, tail: usize) -> u64 {
    debug_assert!(tail <= duration && duration > 0);
    workload * tail as u64 / duration as u64
}

/// Pairs every task of `first` with a mergeable task of `second`.
///
/// Returns, for each position of `first`, the position in `second` of its
/// partner. Earlier tasks of `first` take the earliest free partner, so the
/// resulting permutation of `second` is stable.
pub(crate) fn pair_tasks(first: &[&Task], second: &[&Task]) -> Option<Vec<usize>> {
    if first.len() != second.len() {
        return None;
    }
    let mut used = vec![false; second.len()];
    let mut pairing = Vec::with_capacity(first.len());
    for t1 in first {
        let j = (0..second.len()).find(|&j| !used[j] && t1.merge_check(second[j]))?;
        used[j] = true;
        pairing.push(j);
    }
    Some(pairing)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(er: usize, domain: usize, resource: Option<usize>) -> Task {
        Task {
            meet: MeetId::new(0),
            event_resource: Some(EventResourceId::new(er)),
            domain: ResourceGroupId::new(domain),
            resource: resource.map(ResourceId::new),
            workload: 2 * WORKLOAD_SCALE,
        }
    }

    #[test]
    fn test_tail_workload_is_exact() {
        let w = 1000;
        let tail = tail_workload(w, 3, 1);
        assert_eq!(tail, 333);
        assert_eq!(w - tail + tail, w);
        assert_eq!(tail_workload(w, 3, 3), w);
    }

    #[test]
    fn test_merge_check() {
        assert!(task(0, 0, None).merge_check(&task(0, 0, None)));
        assert!(!task(0, 0, None).merge_check(&task(1, 0, None)));
        assert!(!task(0, 0, Some(1)).merge_check(&task(0, 0, None)));
    }

    #[test]
    fn test_pairing_is_stable_permutation() {
        let a = [task(0, 0, None), task(1, 0, None)];
        let b = [task(1, 0, None), task(0, 0, None)];
        let first: Vec<&Task> = a.iter().collect();
        let second: Vec<&Task> = b.iter().collect();
        assert_eq!(pair_tasks(&first, &second), Some(vec![1, 0]));

        let c = [task(0, 0, None), task(0, 0, None)];
        let third: Vec<&Task> = c.iter().collect();
        assert_eq!(pair_tasks(&first, &third), None);
        assert_eq!(pair_tasks(&first, &second[..1]), None);
    }
}
