//! Tests for concrete monitor kinds in isolation.

use std::sync::Arc;

use timeforge_core::{ConstraintCost, Cost, CostFunction, EventId, EventResourceId, ResourceId, TimeGroup};

use super::*;
use crate::task::WORKLOAD_SCALE;

fn days(n: usize) -> Vec<Arc<TimeGroup>> {
    (0..n)
        .map(|d| Arc::new(TimeGroup::new(2 * n, [2 * d, 2 * d + 1])))
        .collect()
}

#[test]
fn test_cluster_busy_times_band() {
    let mut m = ClusterBusyTimesMonitor::new(ResourceId::new(0), days(5), 2, 4);
    let spec = ConstraintCost::new(7, false, CostFunction::Linear);

    // Below the minimum before anything is busy
    assert_eq!(m.deviation(), 2);

    for day in 0..3 {
        m.add_busy_and_idle(day, 1, 1);
    }
    assert_eq!(m.busy_groups(), 3);
    assert_eq!(m.deviation(), 0);
    assert_eq!(spec.cost(m.deviation()), Cost::ZERO);

    for day in 3..5 {
        m.add_busy_and_idle(day, 1, 1);
    }
    assert_eq!(m.deviation(), 1);
    assert_eq!(spec.cost(m.deviation()), Cost::of_soft(7));

    m.delete_busy_and_idle(4, 1, 1);
    assert_eq!(m.deviation(), 0);
}

#[test]
fn test_cluster_idle_groups_do_not_count() {
    let mut m = ClusterBusyTimesMonitor::new(ResourceId::new(0), days(3), 0, 1);
    m.add_busy_and_idle(0, 0, 2);
    m.add_busy_and_idle(1, 2, 0);
    assert_eq!(m.busy_groups(), 1);
    assert_eq!(m.deviation(), 0);

    m.busy_time_added(0);
    assert_eq!(m.busy_and_idle(0), Some((1, 1)));
    assert_eq!(m.deviation(), 1);

    m.busy_time_removed(0);
    assert_eq!(m.deviation(), 0);
}

#[test]
#[should_panic(expected = "stale counts")]
fn test_delete_with_stale_counts_panics() {
    let mut m = ClusterBusyTimesMonitor::new(ResourceId::new(0), days(2), 0, 2);
    m.add_busy_and_idle(0, 1, 1);
    m.delete_busy_and_idle(0, 2, 0);
}

#[test]
fn test_limit_busy_times_per_group() {
    // Each day has four times; at most two busy per day
    let groups: Vec<_> = (0..2)
        .map(|d| Arc::new(TimeGroup::new(8, 4 * d..4 * d + 4)))
        .collect();
    let mut m = LimitBusyTimesMonitor::new(ResourceId::new(0), groups, 2, 2);

    let mut row = vec![0u32; 8];
    row[0] = 1;
    row[1] = 1;
    row[2] = 2;
    m.attach_row(&row);
    // Day 0 has three busy times, day 1 none and is exempt
    assert_eq!(m.busy_and_idle(0), Some((3, 1)));
    assert_eq!(m.deviation(), 1);

    m.busy_time_added(4);
    // Day 1 now has one busy time, one short of the minimum
    assert_eq!(m.deviation(), 2);

    m.busy_time_removed(2);
    m.busy_time_added(5);
    assert_eq!(m.deviation(), 0);
    assert!(m.can_be_violated());
}

#[test]
fn test_limit_busy_times_never_violated() {
    let m = LimitBusyTimesMonitor::new(ResourceId::new(0), days(2), 0, 2);
    assert!(!m.can_be_violated());
    let c = ClusterBusyTimesMonitor::new(ResourceId::new(0), days(2), 0, 2);
    assert!(!c.can_be_violated());
}

#[test]
fn test_avoid_clashes() {
    let mut m = AvoidClashesMonitor::new(ResourceId::new(0));
    m.attach_row(&[0, 1, 3, 2]);
    assert_eq!(m.deviation(), 3);
    m.occupancy_changed(3, 2);
    m.occupancy_changed(0, 1);
    assert_eq!(m.deviation(), 2);
    m.clear();
    assert_eq!(m.deviation(), 0);
}

#[test]
fn test_limit_workload_rounds_up() {
    let mut m = LimitWorkloadMonitor::new(ResourceId::new(0), 2, 3);
    assert_eq!(m.deviation(), 2);

    m.assign_resource(2 * WORKLOAD_SCALE + 1);
    // 2.001 units count as 3
    assert_eq!(m.deviation(), 0);
    m.assign_resource(WORKLOAD_SCALE);
    assert_eq!(m.deviation(), 1);

    m.unassign_resource(WORKLOAD_SCALE + 1);
    assert_eq!(m.workload(), 2 * WORKLOAD_SCALE);
    assert_eq!(m.deviation(), 0);
}

#[test]
#[should_panic(expected = "below zero")]
fn test_limit_workload_never_negative() {
    let mut m = LimitWorkloadMonitor::new(ResourceId::new(3), 0, 10);
    m.assign_resource(10);
    m.unassign_resource(11);
}

#[test]
fn test_event_monitors() {
    let mut at = AssignTimeMonitor::new(EventId::new(0));
    at.add_meet(2, None);
    at.add_meet(1, Some(4));
    assert_eq!(at.deviation(), 2);
    at.delete_meet(2, None);
    at.add_meet(2, Some(0));
    assert_eq!(at.deviation(), 0);

    let preferred = Arc::new(TimeGroup::new(6, [0, 1]));
    let mut pt = PreferTimesMonitor::new(EventId::new(0), preferred);
    pt.add_meet(2, Some(0));
    pt.add_meet(3, Some(3));
    pt.add_meet(4, None);
    assert_eq!(pt.deviation(), 3);
    assert!(pt.domain_is_preferred(&TimeGroup::new(6, [1])));
    assert!(!pt.domain_is_preferred(&TimeGroup::new(6, [1, 2])));
}

#[test]
fn test_assign_resource_monitor() {
    let mut m = AssignResourceMonitor::new(EventResourceId::new(0));
    m.add_task(3, false);
    m.add_task(2, true);
    assert_eq!(m.deviation(), 3);
    m.delete_task(3, false);
    m.add_task(3, true);
    assert_eq!(m.deviation(), 0);
    assert_eq!(m.tag(), "AssignResource");
}

#[test]
fn test_monitor_cost_is_zero_while_detached() {
    let mut kind = AssignTimeMonitor::new(EventId::new(0));
    kind.add_meet(4, None);
    let mut monitor = Monitor::for_constraint(
        timeforge_core::ConstraintId::new(0),
        ConstraintCost::new(2, true, CostFunction::Linear),
        MonitorKind::AssignTime(kind),
    );
    assert_eq!(monitor.deviation(), 0);
    assert_eq!(monitor.computed_cost(), Cost::ZERO);

    monitor.attached = true;
    assert_eq!(monitor.computed_cost(), Cost::of_hard(8));
    assert_eq!(monitor.tag(), "AssignTime");
    assert!(!monitor.is_group());
}
