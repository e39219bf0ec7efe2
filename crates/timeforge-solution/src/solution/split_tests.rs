//! Tests for split and merge.

use std::sync::Arc;

use timeforge_config::{EnvironmentMode, MatchingMode, SolutionConfig};
use timeforge_core::{ResourceId, TimeGroup};
use timeforge_test::times::{bare_instance, ALL_RESOURCES};
use timeforge_test::SchoolWeek;

use super::*;
use crate::task::WORKLOAD_SCALE;

fn checked(instance: Arc<Instance>) -> Solution {
    let mut config = SolutionConfig::new().with_environment_mode(EnvironmentMode::FullAssert);
    config.matching.check_bases = true;
    Solution::with_config(instance, config)
}

#[test]
fn test_split_then_merge_restores_the_meet() {
    let mut solution = checked(bare_instance(8));
    let (cycle, _) = solution.cycle_meet_at(0);
    let meet = solution.make_meet(4, None, None).unwrap();
    let task = solution.make_task(meet, None, ALL_RESOURCES).unwrap();
    solution.assign_resource(task, ResourceId::new(0)).unwrap();
    solution.assign(meet, cycle, 2).unwrap();
    let cost = solution.cost();

    let second = solution.split(meet, 1, false).unwrap();
    assert_eq!(solution.meet(meet).duration(), 1);
    assert_eq!(solution.meet(second).duration(), 3);
    assert_eq!(solution.meet(second).target(), Some((cycle, 3)));
    assert_eq!(solution.meet(second).assigned_time(), Some(3));
    let tail = solution.meet(second).tasks()[0];
    assert_eq!(solution.task(tail).resource(), Some(ResourceId::new(0)));
    assert_eq!(
        solution.task(task).workload() + solution.task(tail).workload(),
        4 * WORKLOAD_SCALE
    );
    assert_eq!(solution.meet(cycle).all_demand(), 4);

    let merged = solution.merge(second, meet).unwrap();
    assert_eq!(merged, meet);
    assert!(!solution.contains_meet(second));
    assert_eq!(solution.meet(meet).duration(), 4);
    assert_eq!(solution.meet(meet).tasks(), &[task]);
    assert_eq!(solution.task(task).workload(), 4 * WORKLOAD_SCALE);
    assert_eq!(solution.task_count(), 1);
    assert_eq!(solution.cost(), cost);
}

#[test]
fn test_split_offset_must_be_inside() {
    let mut solution = checked(bare_instance(4));
    let meet = solution.make_meet(2, None, None).unwrap();
    for at in [0, 2, 3] {
        assert!(matches!(
            solution.split(meet, at, false),
            Err(SolutionError::InvalidSplitOffset { .. })
        ));
    }
}

#[test]
fn test_split_moves_later_children() {
    let mut solution = checked(bare_instance(8));
    let holder = solution.make_meet(5, None, None).unwrap();
    let early = solution.make_meet(1, None, None).unwrap();
    let late = solution.make_meet(1, None, None).unwrap();
    solution.assign(early, holder, 0).unwrap();
    solution.assign(late, holder, 3).unwrap();

    let second = solution.split(holder, 2, false).unwrap();
    assert_eq!(solution.meet(early).target(), Some((holder, 0)));
    assert_eq!(solution.meet(late).target(), Some((second, 1)));
    assert_eq!(solution.meet(second).children(), &[late]);
}

#[test]
fn test_straddling_child_needs_recursive_split() {
    let mut solution = checked(bare_instance(8));
    let holder = solution.make_meet(5, None, None).unwrap();
    let child = solution.make_meet(2, None, None).unwrap();
    solution.make_task(child, None, ALL_RESOURCES).unwrap();
    solution.assign(child, holder, 1).unwrap();

    assert!(matches!(
        solution.split(holder, 2, false),
        Err(SolutionError::StraddlingChild { offset: 2, .. })
    ));
    assert_eq!(solution.meet_count(), 3);

    let second = solution.split(holder, 2, true).unwrap();
    assert_eq!(solution.meet_count(), 5);
    assert_eq!(solution.meet(child).duration(), 1);
    assert_eq!(solution.meet(child).target(), Some((holder, 1)));
    let child_tail = solution.meet(second).children()[0];
    assert_eq!(solution.meet(child_tail).target(), Some((second, 0)));
    assert_eq!(solution.meet(holder).all_demand(), 1);
    assert_eq!(solution.meet(second).all_demand(), 1);
}

#[test]
fn test_split_keeps_explicit_domains_aligned() {
    let week = SchoolWeek::new();
    let mut solution = checked(week.instance.clone());
    let meets = solution.make_event_meets().unwrap();
    let art = meets[3];

    let tail = solution.split(art, 1, false).unwrap();
    assert_eq!(solution.meet(tail).event_offset(), 1);
    // Mornings shifted one time later
    let domain = solution.meet(tail).domain().cloned().unwrap();
    assert_eq!(domain.times(), &[1, 2, 5, 6]);
    assert_eq!(solution.event_meets(week.art).len(), 2);
    assert_eq!(solution.event_resource_tasks(week.art_teacher).len(), 2);

    // The two halves stay one event, so they merge back in either order
    assert_eq!(solution.merge(tail, art).unwrap(), art);
    assert_eq!(solution.meet(art).duration(), 3);
}

#[test]
fn test_merge_refusals() {
    let week = SchoolWeek::new();
    let mut solution = checked(week.instance.clone());
    let meets = solution.make_event_meets().unwrap();
    let (maths, english) = (meets[0], meets[1]);

    assert!(matches!(
        solution.merge_check(maths, maths),
        Err(SolutionError::MergeSameMeet(_))
    ));
    assert!(matches!(
        solution.merge_check(maths, english),
        Err(SolutionError::MergeEventMismatch(..))
    ));

    let tail = solution.split(maths, 1, false).unwrap();
    solution.assign_time(maths, 0).unwrap();
    assert!(matches!(
        solution.merge_check(maths, tail),
        Err(SolutionError::MergeNotAdjacent(..))
    ));
    solution.assign_time(tail, 2).unwrap();
    assert!(matches!(
        solution.merge_check(maths, tail),
        Err(SolutionError::MergeNotAdjacent(..))
    ));
    solution.unassign(tail).unwrap();
    solution.assign_time(tail, 1).unwrap();
    assert_eq!(solution.merge(maths, tail).unwrap(), maths);
    assert_eq!(solution.meet(maths).assigned_time(), Some(0));

    // Tasks must pair up
    let tail = solution.split(maths, 1, false).unwrap();
    let task = solution.meet(tail).tasks()[0];
    solution.assign_resource(task, week.smith).unwrap();
    assert!(matches!(
        solution.merge_check(maths, tail),
        Err(SolutionError::MergeTasksMismatch(..))
    ));
}

#[test]
fn test_split_cycle_meet() {
    let mut solution = checked(bare_instance(6));
    let meet = solution.make_meet(2, None, None).unwrap();
    solution.assign_time(meet, 1).unwrap();

    // A meet covers times 1 and 2
    assert!(matches!(
        solution.split_cycle_meet(2),
        Err(SolutionError::StraddlingChild { .. })
    ));
    let second = solution.split_cycle_meet(3).unwrap();
    assert_eq!(solution.cycle_meets().len(), 2);
    assert_eq!(solution.meet(second).assigned_time(), Some(3));
    assert_eq!(solution.cycle_meet_at(4), (second, 1));
    // Splitting at a boundary is a no-op
    assert_eq!(solution.split_cycle_meet(3).unwrap(), second);

    // A meet cannot cross the boundary any more
    let other = solution.make_meet(2, None, None).unwrap();
    assert!(matches!(
        solution.assign_time(other, 2),
        Err(SolutionError::TimeNotCovered { time: 2, duration: 2 })
    ));
    solution.assign_time(other, 4).unwrap();
    assert_eq!(solution.meet(other).target(), Some((second, 1)));

    // Cycle meets merge only with cycle meets
    let first = solution.cycle_meets()[0];
    assert!(matches!(
        solution.merge_check(first, meet),
        Err(SolutionError::MergeCycleMismatch(..))
    ));
    assert_eq!(solution.merge(second, first).unwrap(), first);
    assert_eq!(solution.meet(other).target(), Some((first, 4)));
    assert_eq!(solution.meet(first).duration(), 6);
}

#[test]
fn test_split_keeps_root_bases() {
    let mut config = SolutionConfig::new()
        .with_environment_mode(EnvironmentMode::FullAssert)
        .with_matching_mode(MatchingMode::EvalTimes);
    config.matching.check_bases = true;
    let mut solution = Solution::with_config(bare_instance(6), config);
    let holder = solution.make_meet(4, None, None).unwrap();
    let child = solution.make_meet(2, None, None).unwrap();
    solution.make_task(child, None, ALL_RESOURCES).unwrap();
    solution.assign(child, holder, 2).unwrap();
    solution.assign_time(holder, 0).unwrap();

    let second = solution.split(holder, 2, false).unwrap();
    let (cycle, _) = solution.cycle_meet_at(0);
    let base = solution
        .matching()
        .demand_chunk(solution.meet(child).demand_chunks()[0])
        .base();
    assert_eq!(base, solution.meet(cycle).supply_chunks()[2]);
    assert_eq!(solution.meet(child).target(), Some((second, 0)));

    solution.unassign(child).unwrap();
    let base = solution
        .matching()
        .demand_chunk(solution.meet(child).demand_chunks()[0])
        .base();
    assert_eq!(base, solution.meet(child).supply_chunks()[0]);
}

#[test]
fn test_local_bases_ignore_assignment() {
    let config = SolutionConfig::new().with_matching_mode(MatchingMode::EvalResources);
    let mut solution = Solution::with_config(bare_instance(6), config);
    let meet = solution.make_meet(2, None, None).unwrap();
    solution.assign_time(meet, 3).unwrap();
    let base = solution
        .matching()
        .demand_chunk(solution.meet(meet).demand_chunks()[1])
        .base();
    assert_eq!(base, solution.meet(meet).supply_chunks()[1]);
}

#[test]
fn test_split_domain_group_sharing() {
    let instance = bare_instance(6);
    let mut solution = checked(instance);
    let evens = Arc::new(TimeGroup::new(6, [0, 2, 4]));
    let meet = solution.make_meet(3, Some(Arc::clone(&evens)), None).unwrap();
    let second = solution.split(meet, 2, false).unwrap();
    let tail = solution.meet(second).domain().cloned().unwrap();
    // The tail's group is the memoized neighbour of the original
    assert!(Arc::ptr_eq(&tail, &evens.neighbour(2)));
}
