//! Tests for transactions, undo and redo.

use timeforge_config::{EnvironmentMode, SolutionConfig};
use timeforge_core::{Cost, ResourceId};
use timeforge_test::times::{bare_instance, ALL_RESOURCES};
use timeforge_test::SchoolWeek;

use super::*;

fn config() -> SolutionConfig {
    let mut config = SolutionConfig::new().with_environment_mode(EnvironmentMode::FullAssert);
    config.matching.check_bases = true;
    config
}

type Snapshot = (
    Vec<(MeetId, Option<(MeetId, usize)>, usize)>,
    Vec<(TaskId, Option<ResourceId>)>,
);

/// Assignment state of every live meet and task.
fn snapshot(solution: &Solution) -> Snapshot {
    let meets = solution
        .meets()
        .map(|(id, m)| (id, m.target(), m.duration()))
        .collect();
    let tasks = solution.tasks().map(|(id, t)| (id, t.resource())).collect();
    (meets, tasks)
}

#[test]
fn test_undo_restores_assignments_and_cost() {
    let week = SchoolWeek::new();
    let mut solution = Solution::with_config(week.instance.clone(), config());
    let meets = solution.make_event_meets().unwrap();
    let before = snapshot(&solution);
    let cost = solution.cost();

    let t = solution.transaction_make();
    solution.transaction_begin(t).unwrap();
    solution.assign_time(meets[0], 0).unwrap();
    let task = solution.event_resource_tasks(week.maths_teacher)[0];
    solution.assign_resource(task, week.smith).unwrap();
    solution.assign_time(meets[1], 2).unwrap();
    solution.transaction_end(t).unwrap();
    assert_eq!(solution.transaction(t).len(), 3);
    let after_cost = solution.cost();
    assert!(after_cost < cost);

    solution.transaction_undo(t).unwrap();
    assert_eq!(snapshot(&solution), before);
    assert_eq!(solution.cost(), cost);

    solution.transaction_redo(t).unwrap();
    assert_eq!(solution.cost(), after_cost);
    assert_eq!(solution.meet(meets[1]).assigned_time(), Some(2));
}

#[test]
fn test_undo_brings_deleted_meets_back_in_place() {
    let mut solution = Solution::with_config(bare_instance(6), config());
    let (cycle, _) = solution.cycle_meet_at(0);
    let outer = solution.make_meet(3, None, None).unwrap();
    let inner = solution.make_meet(1, None, None).unwrap();
    let task = solution.make_task(outer, None, ALL_RESOURCES).unwrap();
    solution.assign(inner, outer, 1).unwrap();
    solution.assign(outer, cycle, 2).unwrap();
    let before = snapshot(&solution);

    let t = solution.transaction_make();
    solution.transaction_begin(t).unwrap();
    solution.delete_meet(outer).unwrap();
    solution.transaction_end(t).unwrap();
    assert!(!solution.contains_meet(outer));

    solution.transaction_undo(t).unwrap();
    assert!(solution.contains_meet(outer));
    assert_eq!(solution.meet(outer).tasks(), &[task]);
    assert_eq!(solution.meet(inner).target(), Some((outer, 1)));
    assert_eq!(solution.meet(cycle).all_demand(), 3);
    assert_eq!(snapshot(&solution), before);
}

#[test]
fn test_undo_split_and_merge() {
    let week = SchoolWeek::new();
    let mut solution = Solution::with_config(week.instance.clone(), config());
    let meets = solution.make_event_meets().unwrap();
    let art = meets[3];
    solution.assign_time(art, 0).unwrap();
    let before = snapshot(&solution);
    let cost = solution.cost();

    let t = solution.transaction_make();
    solution.transaction_begin(t).unwrap();
    let tail = solution.split(art, 2, false).unwrap();
    solution.unassign(tail).unwrap();
    solution.transaction_end(t).unwrap();
    assert_eq!(solution.event_meets(week.art).len(), 2);

    solution.transaction_undo(t).unwrap();
    assert_eq!(snapshot(&solution), before);
    assert_eq!(solution.cost(), cost);
    assert_eq!(solution.event_meets(week.art), &[art]);

    // Redo recreates the tail under the same handle
    solution.transaction_redo(t).unwrap();
    assert!(solution.contains_meet(tail));
    assert_eq!(solution.meet(tail).duration(), 1);
    assert!(solution.meet(tail).target().is_none());

    let t2 = solution.transaction_make();
    solution.transaction_begin(t2).unwrap();
    solution.assign_time(tail, 2).unwrap();
    solution.merge(art, tail).unwrap();
    solution.transaction_end(t2).unwrap();
    solution.transaction_undo(t2).unwrap();
    assert!(solution.contains_meet(tail));
    assert!(solution.meet(tail).target().is_none());
    assert_eq!(solution.meet(art).duration(), 2);
}

#[test]
fn test_transaction_state_errors() {
    let mut solution = Solution::new(bare_instance(4));
    let t = solution.transaction_make();
    assert!(matches!(
        solution.transaction_end(t),
        Err(SolutionError::TransactionInactive(_))
    ));
    solution.transaction_begin(t).unwrap();
    assert!(matches!(
        solution.transaction_begin(t),
        Err(SolutionError::TransactionActive(_))
    ));
    assert!(matches!(
        solution.transaction_undo(t),
        Err(SolutionError::TransactionActive(_))
    ));
    solution.transaction_delete(t).unwrap();
    assert!(matches!(
        solution.transaction_begin(t),
        Err(SolutionError::NoSuchTransaction(_))
    ));
}

#[test]
fn test_nested_transactions_record_the_undo() {
    let mut solution = Solution::with_config(bare_instance(6), config());
    let meet = solution.make_meet(2, None, None).unwrap();

    let inner = solution.transaction_make();
    solution.transaction_begin(inner).unwrap();
    solution.assign_time(meet, 3).unwrap();
    solution.transaction_end(inner).unwrap();

    let outer = solution.transaction_make();
    solution.transaction_begin(outer).unwrap();
    solution.transaction_undo(inner).unwrap();
    solution.transaction_end(outer).unwrap();
    assert!(solution.meet(meet).target().is_none());
    assert_eq!(solution.transaction(outer).len(), 1);

    // Undoing the undo puts the meet back
    solution.transaction_undo(outer).unwrap();
    assert_eq!(solution.meet(meet).assigned_time(), Some(3));
    assert_eq!(solution.cost(), Cost::ZERO);
}

#[test]
fn test_failed_edit_records_nothing() {
    let mut solution = Solution::new(bare_instance(4));
    let meet = solution.make_meet(2, None, None).unwrap();
    let t = solution.transaction_make();
    solution.transaction_begin(t).unwrap();
    assert!(solution.assign_time(meet, 3).is_err());
    assert!(solution.unassign(meet).is_err());
    solution.transaction_end(t).unwrap();
    assert!(solution.transaction(t).is_empty());
}

/// A duration-4 meet with two tasks, split at 2. Returns the two halves and
/// the tasks of the first half.
fn split_pair(solution: &mut Solution) -> (MeetId, MeetId, TaskId, TaskId) {
    let meet = solution.make_meet(4, None, None).unwrap();
    let a = solution.make_task(meet, None, ALL_RESOURCES).unwrap();
    let b = solution.make_task(meet, None, ALL_RESOURCES).unwrap();
    let second = solution.split(meet, 2, false).unwrap();
    (meet, second, a, b)
}

#[test]
fn test_undo_merge_after_task_deletion() {
    let mut solution = Solution::with_config(bare_instance(6), config());
    let (meet, second, a, b) = split_pair(&mut solution);
    let tails = solution.meet(second).tasks().to_vec();

    let t = solution.transaction_make();
    solution.transaction_begin(t).unwrap();
    solution.merge(meet, second).unwrap();
    solution.delete_task(a).unwrap();
    solution.transaction_end(t).unwrap();
    assert_eq!(solution.meet(meet).tasks(), &[b]);

    // Undo brings `a` back last, so the meet's task order differs from the
    // order the merge recorded
    solution.transaction_undo(t).unwrap();
    assert!(solution.contains_meet(second));
    assert_eq!(solution.meet(meet).duration(), 2);
    let mut tasks = solution.meet(meet).tasks().to_vec();
    tasks.sort();
    assert_eq!(tasks, vec![a, b]);
    assert_eq!(solution.meet(second).tasks(), tails.as_slice());
    assert_eq!(solution.task(tails[0]).workload(), 2 * crate::task::WORKLOAD_SCALE);

    solution.transaction_redo(t).unwrap();
    assert!(!solution.contains_meet(second));
    assert_eq!(solution.task_count(), 1);

    solution.transaction_undo(t).unwrap();
    assert_eq!(solution.task_count(), 4);
}

#[test]
fn test_undo_merge_after_meet_deletion() {
    let mut solution = Solution::with_config(bare_instance(6), config());
    let (meet, second, a, b) = split_pair(&mut solution);
    solution.assign_time(meet, 0).unwrap();
    solution.assign_time(second, 2).unwrap();
    let before = snapshot(&solution);

    let t = solution.transaction_make();
    solution.transaction_begin(t).unwrap();
    solution.merge(meet, second).unwrap();
    solution.delete_meet(meet).unwrap();
    solution.transaction_end(t).unwrap();
    assert_eq!(solution.meet_count(), 1);

    solution.transaction_undo(t).unwrap();
    assert_eq!(snapshot(&solution), before);
    let mut tasks = solution.meet(meet).tasks().to_vec();
    tasks.sort();
    assert_eq!(tasks, vec![a, b]);

    solution.transaction_redo(t).unwrap();
    assert_eq!(solution.meet_count(), 1);
    assert_eq!(solution.task_count(), 0);
}
