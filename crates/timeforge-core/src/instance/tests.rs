//! Tests for instance construction.

use std::sync::Arc;

use super::*;
use crate::constraint::{Constraint, ConstraintKind, ConstraintRef};
use crate::error::TimeforgeError;

fn two_day_builder() -> InstanceBuilder {
    InstanceBuilder::new("two days", ["Mon1", "Mon2", "Mon3", "Tue1", "Tue2", "Tue3"])
}

#[test]
fn test_build_minimal_instance() {
    let mut b = two_day_builder();
    let mon = b.time_group("Mon", [0, 1, 2]).unwrap();
    let smith = b.add_resource("Smith");
    let jones = b.add_resource("Jones");
    let teachers = b.add_resource_group("Teachers", [jones, smith]).unwrap();
    let maths = b.add_event(Event::new("Maths", 2).with_domain(Arc::clone(&mon)));
    let er = b
        .add_event_resource(EventResource::new(maths, teachers).with_role("Teacher"))
        .unwrap();

    let instance = b.build().unwrap();
    assert_eq!(instance.name(), "two days");
    assert_eq!(instance.cycle_len(), 6);
    assert_eq!(instance.time(4).name, "Tue2");
    assert_eq!(instance.full_time_group().len(), 6);
    assert!(Arc::ptr_eq(instance.time_group_by_name("Mon").unwrap(), &mon));
    assert_eq!(instance.event(maths).event_resources(), &[er]);
    assert_eq!(instance.event(maths).workload, 2);
    assert_eq!(instance.event_resource(er).role.as_deref(), Some("Teacher"));

    let group = instance.resource_group(teachers);
    assert_eq!(group.resources(), &[smith, jones]);
    assert!(group.contains(jones));
    assert_eq!(instance.resource_ids().count(), 2);
}

#[test]
fn test_empty_cycle_is_rejected() {
    let b = InstanceBuilder::new("empty", Vec::<String>::new());
    assert_eq!(b.build().unwrap_err(), TimeforgeError::NoTimes);
}

#[test]
fn test_time_group_out_of_range() {
    let mut b = two_day_builder();
    assert_eq!(
        b.time_group("bad", [2, 6]).unwrap_err(),
        TimeforgeError::TimeOutOfRange {
            time: 6,
            cycle_len: 6
        }
    );
}

#[test]
fn test_zero_duration_event() {
    let mut b = two_day_builder();
    b.add_event(Event::new("Empty", 0));
    assert_eq!(
        b.build().unwrap_err(),
        TimeforgeError::ZeroDuration("Empty".to_string())
    );
}

#[test]
fn test_preassigned_time_must_leave_room() {
    let mut b = two_day_builder();
    b.add_event(Event::new("Late", 2).with_preassigned_time(5));
    assert!(matches!(
        b.build().unwrap_err(),
        TimeforgeError::PreassignedTimeOutOfRange { time: 5, .. }
    ));
}

#[test]
fn test_preassigned_resource_outside_domain() {
    let mut b = two_day_builder();
    let smith = b.add_resource("Smith");
    let room = b.add_resource("Room1");
    let teachers = b.add_resource_group("Teachers", [smith]).unwrap();
    let e = b.add_event(Event::new("Maths", 1));
    let err = b
        .add_event_resource(EventResource::new(e, teachers).with_preassigned_resource(room))
        .unwrap_err();
    assert_eq!(
        err,
        TimeforgeError::PreassignedResourceOutsideDomain {
            resource: 1,
            event_resource: 0
        }
    );
}

#[test]
fn test_unknown_references() {
    let mut b = two_day_builder();
    assert!(matches!(
        b.add_resource_group("g", [crate::ids::ResourceId::new(3)]),
        Err(TimeforgeError::UnknownReference { kind: "resource", .. })
    ));

    b.add_constraint(Constraint::required(
        ConstraintRef::new("", "AssignTime"),
        1,
        ConstraintKind::AssignTime {
            events: vec![crate::ids::EventId::new(0)],
        },
    ));
    assert!(matches!(
        b.build(),
        Err(TimeforgeError::UnknownReference { kind: "event", .. })
    ));
}

#[test]
fn test_foreign_time_group_and_limits() {
    let mut b = two_day_builder();
    let r = b.add_resource("Smith");
    b.add_constraint(Constraint::preferred(
        ConstraintRef::new("", "Busy"),
        1,
        ConstraintKind::LimitBusyTimes {
            resources: vec![r],
            time_groups: vec![Arc::new(TimeGroup::full(4))],
            minimum: 0,
            maximum: 2,
        },
    ));
    assert!(matches!(
        b.build(),
        Err(TimeforgeError::ForeignTimeGroup(_))
    ));

    let mut b = two_day_builder();
    let r = b.add_resource("Smith");
    b.add_constraint(Constraint::preferred(
        ConstraintRef::new("", "Workload"),
        1,
        ConstraintKind::LimitWorkload {
            resources: vec![r],
            minimum: 5,
            maximum: 2,
        },
    ));
    assert_eq!(
        b.build().unwrap_err(),
        TimeforgeError::InvalidLimits("Workload".to_string())
    );
}
