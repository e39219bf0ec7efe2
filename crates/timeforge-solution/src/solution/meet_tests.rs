//! Tests for meet creation, assignment and domains.

use std::sync::Arc;

use timeforge_config::{EnvironmentMode, SolutionConfig};
use timeforge_core::{ResourceGroupId, ResourceId, TimeGroup};
use timeforge_test::times::{bare_instance, ALL_RESOURCES};
use timeforge_test::SchoolWeek;

use super::*;

const ALL: ResourceGroupId = ALL_RESOURCES;

fn checked(instance: Arc<Instance>) -> Solution {
    let mut config = SolutionConfig::new().with_environment_mode(EnvironmentMode::FullAssert);
    config.matching.check_bases = true;
    Solution::with_config(instance, config)
}

#[test]
fn test_new_solution_has_one_cycle_meet() {
    let solution = checked(bare_instance(6));
    assert_eq!(solution.meet_count(), 1);
    let cycle = solution.cycle_meets()[0];
    assert!(solution.meet(cycle).is_cycle_meet());
    assert_eq!(solution.meet(cycle).duration(), 6);
    assert_eq!(solution.meet(cycle).assigned_time(), Some(0));
    assert_eq!(solution.cycle_meet_at(4), (cycle, 4));
    solution.check_invariants();
}

#[test]
fn test_make_meet_rejects_zero_duration_and_foreign_groups() {
    let mut solution = checked(bare_instance(6));
    assert!(matches!(
        solution.make_meet(0, None, None),
        Err(SolutionError::ZeroDuration)
    ));
    let foreign = Arc::new(TimeGroup::full(5));
    assert!(matches!(
        solution.make_meet(1, Some(foreign), None),
        Err(SolutionError::ForeignTimeGroup { expected: 6, found: 5 })
    ));
    assert_eq!(solution.meet_count(), 1);
}

#[test]
fn test_assign_and_unassign_propagate_time_and_demand() {
    let mut solution = checked(bare_instance(8));
    let (cycle, _) = solution.cycle_meet_at(0);
    let outer = solution.make_meet(4, None, None).unwrap();
    let inner = solution.make_meet(2, None, None).unwrap();
    solution.make_task(inner, None, ALL).unwrap();

    solution.assign(inner, outer, 1).unwrap();
    assert_eq!(solution.meet(outer).all_demand(), 2);
    assert_eq!(solution.meet(inner).assigned_time(), None);

    solution.assign(outer, cycle, 3).unwrap();
    assert_eq!(solution.meet(outer).assigned_time(), Some(3));
    assert_eq!(solution.meet(inner).assigned_time(), Some(4));
    assert_eq!(solution.meet(cycle).all_demand(), 2);
    assert_eq!(solution.meet_root(inner), (cycle, 4));

    solution.unassign(outer).unwrap();
    assert_eq!(solution.meet(inner).assigned_time(), None);
    assert_eq!(solution.meet(cycle).all_demand(), 0);
    assert_eq!(solution.meet(outer).all_demand(), 2);
}

#[test]
fn test_assign_check_refusals() {
    let mut solution = checked(bare_instance(6));
    let (cycle, _) = solution.cycle_meet_at(0);
    let a = solution.make_meet(2, None, None).unwrap();
    let b = solution.make_meet(1, None, None).unwrap();

    assert!(matches!(
        solution.assign_check(cycle, a, 0),
        Err(SolutionError::CycleMeet(_))
    ));
    assert!(matches!(
        solution.assign_check(a, cycle, 5),
        Err(SolutionError::OffsetOutOfRange { offset: 5, .. })
    ));

    solution.assign(b, a, 1).unwrap();
    assert!(matches!(
        solution.assign_check(a, b, 0),
        Err(SolutionError::AssignmentCycle { .. })
    ));
    assert!(matches!(
        solution.assign_check(b, cycle, 0),
        Err(SolutionError::MeetAssigned(_))
    ));
    assert!(matches!(
        solution.unassign(a),
        Err(SolutionError::MeetNotAssigned(_))
    ));
}

#[test]
fn test_domain_rule_on_assign_time() {
    let week = SchoolWeek::new();
    let mut solution = checked(week.instance.clone());
    let meets = solution.make_event_meets().unwrap();
    let art = meets[3];

    // Art may only start in a morning
    assert!(matches!(
        solution.assign_time(art, 2),
        Err(SolutionError::DomainMismatch(_))
    ));
    // Starting at Mon2 runs to Mon4, inside the cycle
    solution.assign_time(art, 1).unwrap();
    assert_eq!(solution.meet(art).assigned_time(), Some(1));

    // Running past the end of the cycle is not covered
    let maths = meets[0];
    assert!(matches!(
        solution.assign_time(maths, 7),
        Err(SolutionError::TimeNotCovered { time: 7, duration: 2 })
    ));
}

#[test]
fn test_domain_rule_through_automatic_meets() {
    let instance = bare_instance(6);
    let mut solution = checked(instance.clone());
    let (cycle, _) = solution.cycle_meet_at(0);
    let evens = Arc::new(TimeGroup::new(6, [0, 2, 4]));

    let holder = solution.make_meet(3, None, None).unwrap();
    let child = solution.make_meet(1, Some(evens), None).unwrap();
    solution.assign(child, holder, 1).unwrap();

    // The child lands on an odd time when the holder starts at 2
    assert!(matches!(
        solution.assign_check(holder, cycle, 2),
        Err(SolutionError::DomainMismatch(_))
    ));
    solution.assign(holder, cycle, 3).unwrap();
    assert_eq!(solution.meet(child).assigned_time(), Some(4));

    // Its effective domain is the child's, shifted to the holder's start
    let domain = solution.descendants_domain(holder);
    assert_eq!(domain.times(), &[1, 3]);
}

#[test]
fn test_set_domain_checks() {
    let week = SchoolWeek::new();
    let mut solution = checked(week.instance.clone());
    let meets = solution.make_event_meets().unwrap();
    let science = meets[2];

    // Science is fixed at Tue1, which Monday excludes
    assert!(matches!(
        solution.set_domain(science, Some(week.monday.clone())),
        Err(SolutionError::PreassignedTimeExcluded { time: 4, .. })
    ));
    assert!(matches!(
        solution.set_domain(science, None),
        Err(SolutionError::AutomaticDomainNotAllowed(_))
    ));
    solution.set_domain(science, Some(week.tuesday.clone())).unwrap();
    assert!(solution.meet(science).domain().is_some_and(|d| d.same_times(&week.tuesday)));

    // An assigned meet cannot take a domain excluding its current start
    let maths = meets[0];
    solution.assign_time(maths, 2).unwrap();
    assert!(matches!(
        solution.set_domain(maths, Some(week.mornings.clone())),
        Err(SolutionError::DomainMismatch(_))
    ));
}

#[test]
fn test_delete_meet_releases_children_and_tasks() {
    let mut solution = checked(bare_instance(6));
    let (cycle, _) = solution.cycle_meet_at(0);
    let outer = solution.make_meet(3, None, None).unwrap();
    let inner = solution.make_meet(1, None, None).unwrap();
    let task = solution.make_task(outer, None, ALL).unwrap();
    solution.assign_resource(task, ResourceId::new(1)).unwrap();
    solution.assign(inner, outer, 2).unwrap();
    solution.assign(outer, cycle, 0).unwrap();

    assert!(matches!(
        solution.delete_meet(cycle),
        Err(SolutionError::CycleMeet(_))
    ));
    solution.delete_meet(outer).unwrap();

    assert!(!solution.contains_meet(outer));
    assert_eq!(solution.task_count(), 0);
    assert!(solution.meet(inner).target().is_none());
    assert_eq!(solution.meet(cycle).all_demand(), 0);
    assert_eq!(solution.timetable().busy_times(1).count(), 0);
}

#[test]
fn test_event_meets_and_preassignments() {
    let week = SchoolWeek::new();
    let mut solution = checked(week.instance.clone());
    let meets = solution.make_event_meets().unwrap();

    assert_eq!(solution.event_meets(week.science), &[meets[2]]);
    assert_eq!(solution.meet(meets[2]).assigned_time(), Some(4));
    let english_task = solution.event_resource_tasks(week.english_teacher)[0];
    assert_eq!(solution.task(english_task).resource(), Some(week.jones));
    // Maths has no domain of its own, so it gets the full group
    assert_eq!(solution.meet(meets[0]).domain().map(|d| d.len()), Some(8));
}

#[test]
fn test_visit_numbers_and_zones() {
    let mut solution = Solution::new(bare_instance(4));
    let meet = solution.make_meet(2, None, None).unwrap();

    solution.new_global_visit();
    assert!(!solution.meet_visited(meet, 0));
    solution.meet_visit(meet);
    assert!(solution.meet_visited(meet, 0));
    solution.new_global_visit();
    assert!(!solution.meet_visited(meet, 0));
    assert!(solution.meet_visited(meet, 1));

    let zone = solution.make_zone();
    solution.set_meet_zone(meet, 1, Some(zone)).unwrap();
    assert_eq!(solution.meet(meet).zones(), &[None, Some(zone)]);
    assert!(solution.set_meet_zone(meet, 2, Some(zone)).is_err());
}
