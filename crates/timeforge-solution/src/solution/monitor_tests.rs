//! Tests for monitor routing, cost propagation and group monitors.

use timeforge_config::{EnvironmentMode, SolutionConfig};
use timeforge_core::{Cost, ResourceId};
use timeforge_test::SchoolWeek;

use super::*;

fn school() -> (SchoolWeek, Solution, Vec<MeetId>) {
    let week = SchoolWeek::new();
    let config = SolutionConfig::new().with_environment_mode(EnvironmentMode::FullAssert);
    let mut solution = Solution::with_config(week.instance.clone(), config);
    let meets = solution.make_event_meets().unwrap();
    (week, solution, meets)
}

fn first_task(solution: &Solution, er: EventResourceId) -> TaskId {
    solution.event_resource_tasks(er)[0]
}

fn monitor_of(solution: &Solution, resource: ResourceId, tag: &str) -> MonitorId {
    solution.resource_monitors[resource.index()]
        .iter()
        .copied()
        .find(|&m| solution.monitor(m).tag() == tag)
        .unwrap()
}

#[test]
fn test_initial_cost_counts_unassigned_work() {
    let (_, solution, _) = school();
    // Unassigned durations: times 2 + 2 + 3, resources 2 + 2 + 1 + 3
    assert_eq!(solution.cost(), Cost::of(15, 0));

    let by_tag = solution.cost_by_tag();
    assert_eq!(by_tag["AssignTime"].cost, Cost::of_hard(7));
    assert_eq!(by_tag["AssignTime"].monitors, 4);
    assert_eq!(by_tag["AssignResource"].cost, Cost::of_hard(8));
    assert_eq!(by_tag["AssignResource"].monitors, 5);
    assert_eq!(by_tag["AvoidClashes"].monitors, 3);
    assert_eq!(by_tag["LimitWorkload"].cost, Cost::ZERO);
}

#[test]
fn test_costs_follow_edits() {
    let (week, mut solution, meets) = school();
    let (maths, english) = (meets[0], meets[1]);

    // English is taught by Jones on Monday morning
    solution.assign_time(english, 0).unwrap();
    assert_eq!(solution.cost(), Cost::of(13, 0));

    // Science on Tuesday gives Jones a second working day
    let science = first_task(&solution, week.science_teacher);
    solution.assign_resource(science, week.jones).unwrap();
    assert_eq!(solution.cost(), Cost::of(12, 1));

    // Maths on top of English: two clashes, and Jones's workload reaches 5
    solution.assign_time(maths, 0).unwrap();
    let maths_teacher = first_task(&solution, week.maths_teacher);
    solution.assign_resource(maths_teacher, week.jones).unwrap();
    assert_eq!(solution.cost(), Cost::of(10, 2));
    let clashes = monitor_of(&solution, week.jones, "AvoidClashes");
    assert_eq!(solution.monitor(clashes).deviation(), 2);

    // Moving maths to Mon3 clears the clashes, and Jones is busy four times
    // on Monday
    solution.unassign(maths).unwrap();
    solution.assign_time(maths, 2).unwrap();
    assert_eq!(solution.monitor(clashes).deviation(), 0);
    let busy = monitor_of(&solution, week.jones, "LimitBusyTimes");
    assert_eq!(solution.monitor(busy).deviation(), 1);
    // Mon3 is not a preferred time for maths
    let prefer = solution.event_monitors(week.maths)[1];
    assert_eq!(solution.monitor(prefer).cost(), Cost::of_soft(4));
    assert_eq!(solution.cost(), Cost::of(8, 1 + 1 + 1 + 4));
}

#[test]
fn test_detach_and_reattach_restore_cost() {
    let (week, mut solution, meets) = school();
    solution.assign_time(meets[1], 0).unwrap();
    let before = solution.cost();

    let assign_time = solution.event_monitors(week.art)[0];
    assert_eq!(solution.monitor(assign_time).cost(), Cost::of_hard(3));
    solution.detach_monitor(assign_time).unwrap();
    assert!(!solution.monitor(assign_time).is_attached());
    assert_eq!(solution.monitor(assign_time).cost(), Cost::ZERO);
    assert_eq!(solution.cost(), before - Cost::of_hard(3));

    solution.attach_monitor(assign_time).unwrap();
    assert_eq!(solution.cost(), before);

    assert!(matches!(
        solution.detach_monitor(ROOT_MONITOR),
        Err(SolutionError::IsGroupMonitor(_))
    ));
}

#[test]
fn test_prefer_times_detaches_when_domain_is_preferred() {
    let (week, mut solution, meets) = school();
    let prefer = solution.event_monitors(week.maths)[1];
    assert!(solution.monitor(prefer).is_attached());

    solution.set_domain(meets[0], Some(week.mornings.clone())).unwrap();
    assert!(!solution.monitor(prefer).is_attached());

    solution.set_domain(meets[0], Some(week.monday.clone())).unwrap();
    assert!(solution.monitor(prefer).is_attached());
}

#[test]
fn test_attach_check_can_be_disabled() {
    let week = SchoolWeek::new();
    let config = SolutionConfig::new().with_attach_check(false);
    let mut solution = Solution::with_config(week.instance.clone(), config);
    let meets = solution.make_event_meets().unwrap();
    solution.set_domain(meets[0], Some(week.mornings.clone())).unwrap();
    let prefer = solution.event_monitors(week.maths)[1];
    assert!(solution.monitor(prefer).is_attached());
}

#[test]
fn test_group_monitors_and_defects() {
    let (week, mut solution, _) = school();
    let root_defects = solution.defects(ROOT_MONITOR).unwrap().len();

    let group = solution.make_group_monitor("Resources");
    let resource_monitors: Vec<MonitorId> = [week.maths_teacher, week.maths_room]
        .iter()
        .map(|&er| solution.event_resource_monitors[er.index()][0])
        .collect();
    for &m in &resource_monitors {
        assert!(matches!(
            solution.add_child_monitor(group, m),
            Err(SolutionError::MonitorHasParent(_))
        ));
        solution.delete_child_monitor(ROOT_MONITOR, m).unwrap();
        solution.add_child_monitor(group, m).unwrap();
    }
    assert_eq!(solution.monitor(group).cost(), Cost::of_hard(4));
    assert_eq!(solution.cost(), Cost::of_hard(11));
    assert_eq!(solution.defects(group).unwrap().len(), 2);

    solution.add_child_monitor(ROOT_MONITOR, group).unwrap();
    assert_eq!(solution.cost(), Cost::of_hard(15));
    assert_eq!(solution.defects(ROOT_MONITOR).unwrap().len(), root_defects - 1);
    assert!(matches!(
        solution.add_child_monitor(resource_monitors[0], group),
        Err(SolutionError::NotAGroupMonitor(_))
    ));
    assert!(matches!(
        solution.delete_group_monitor(group),
        Err(SolutionError::GroupNotEmpty(_))
    ));

    // Satisfying one child removes it from the group's defects
    let room = first_task(&solution, week.maths_room);
    solution.assign_resource(room, week.room).unwrap();
    assert_eq!(solution.defects(group).unwrap(), &[resource_monitors[0]]);
    assert_eq!(solution.monitor(group).cost(), Cost::of_hard(2));

    let snapshot = solution.defects_snapshot(ROOT_MONITOR).unwrap();
    solution.recompute_defects(ROOT_MONITOR).unwrap();
    assert_eq!(
        solution.defects(ROOT_MONITOR).unwrap().len(),
        snapshot.len()
    );

    for &m in &resource_monitors {
        solution.delete_child_monitor(group, m).unwrap();
    }
    solution.delete_group_monitor(group).unwrap();
    assert!(matches!(
        solution.delete_group_monitor(ROOT_MONITOR),
        Err(SolutionError::RootMonitor)
    ));
    assert_eq!(solution.cost(), Cost::of_hard(11));
}

#[test]
fn test_group_cycles_are_refused() {
    let (_, mut solution, _) = school();
    let outer = solution.make_group_monitor("Outer");
    let inner = solution.make_group_monitor("Inner");
    solution.add_child_monitor(outer, inner).unwrap();
    assert!(matches!(
        solution.add_child_monitor(inner, outer),
        Err(SolutionError::MonitorCycle { .. })
    ));
    assert!(matches!(
        solution.delete_child_monitor(inner, outer),
        Err(SolutionError::MonitorNotChild { .. })
    ));
}
