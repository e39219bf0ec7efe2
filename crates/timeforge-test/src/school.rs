//! A two-day school week.
//!
//! Eight times (`Mon1..Mon4`, `Tue1..Tue4`), two teachers and one room,
//! four events and one constraint of every kind.
//!
//! # Example
//!
//! ```
//! use timeforge_test::SchoolWeek;
//!
//! let week = SchoolWeek::new();
//! assert_eq!(week.instance.cycle_len(), 8);
//! assert_eq!(week.instance.event(week.maths).duration, 2);
//! ```

use std::sync::Arc;

use timeforge_core::{
    Constraint, ConstraintKind, ConstraintRef, Event, EventId, EventResource, EventResourceId,
    Instance, InstanceBuilder, ResourceGroupId, ResourceId, TimeGroup,
};

/// Handles into the school week instance.
#[derive(Debug, Clone)]
pub struct SchoolWeek {
    pub instance: Arc<Instance>,

    pub monday: Arc<TimeGroup>,
    pub tuesday: Arc<TimeGroup>,
    pub mornings: Arc<TimeGroup>,

    pub smith: ResourceId,
    pub jones: ResourceId,
    pub room: ResourceId,
    pub teachers: ResourceGroupId,
    pub rooms: ResourceGroupId,
    pub smith_only: ResourceGroupId,

    /// Duration 2, needs a teacher and a room, prefers mornings.
    pub maths: EventId,
    pub maths_teacher: EventResourceId,
    pub maths_room: EventResourceId,
    /// Duration 2, taught by Jones.
    pub english: EventId,
    pub english_teacher: EventResourceId,
    /// Duration 1, fixed at `Tue1`.
    pub science: EventId,
    pub science_teacher: EventResourceId,
    /// Duration 3, must start in a morning, taught by Smith.
    pub art: EventId,
    pub art_teacher: EventResourceId,
}

impl Default for SchoolWeek {
    fn default() -> Self {
        Self::new()
    }
}

impl SchoolWeek {
    pub fn new() -> Self {
        let mut b = InstanceBuilder::new(
            "school week",
            ["Mon1", "Mon2", "Mon3", "Mon4", "Tue1", "Tue2", "Tue3", "Tue4"],
        );
        let monday = b.time_group("Mon", 0..4).expect("valid times");
        let tuesday = b.time_group("Tue", 4..8).expect("valid times");
        let mornings = b.time_group("Mornings", [0, 1, 4, 5]).expect("valid times");

        let smith = b.add_resource("Smith");
        let jones = b.add_resource("Jones");
        let room = b.add_resource("Room1");
        let teachers = b
            .add_resource_group("Teachers", [smith, jones])
            .expect("valid resources");
        let rooms = b.add_resource_group("Rooms", [room]).expect("valid resources");
        let smith_only = b
            .add_resource_group("SmithOnly", [smith])
            .expect("valid resources");

        let maths = b.add_event(Event::new("Maths", 2));
        let maths_teacher = b
            .add_event_resource(EventResource::new(maths, teachers).with_role("Teacher"))
            .expect("valid event resource");
        let maths_room = b
            .add_event_resource(EventResource::new(maths, rooms).with_role("Room"))
            .expect("valid event resource");

        let english = b.add_event(Event::new("English", 2));
        let english_teacher = b
            .add_event_resource(
                EventResource::new(english, teachers)
                    .with_role("Teacher")
                    .with_preassigned_resource(jones),
            )
            .expect("valid event resource");

        let science = b.add_event(Event::new("Science", 1).with_preassigned_time(4));
        let science_teacher = b
            .add_event_resource(EventResource::new(science, teachers).with_role("Teacher"))
            .expect("valid event resource");

        let art = b.add_event(Event::new("Art", 3).with_domain(Arc::clone(&mornings)));
        let art_teacher = b
            .add_event_resource(EventResource::new(art, smith_only).with_role("Teacher"))
            .expect("valid event resource");

        let events = vec![maths, english, science, art];
        let teacher_ids = vec![smith, jones];
        let days = vec![Arc::clone(&monday), Arc::clone(&tuesday)];

        b.add_constraint(Constraint::required(
            ConstraintRef::new("school", "Assign times"),
            1,
            ConstraintKind::AssignTime {
                events: events.clone(),
            },
        ));
        b.add_constraint(Constraint::required(
            ConstraintRef::new("school", "Assign resources"),
            1,
            ConstraintKind::AssignResource {
                event_resources: vec![
                    maths_teacher,
                    maths_room,
                    english_teacher,
                    science_teacher,
                    art_teacher,
                ],
            },
        ));
        b.add_constraint(Constraint::required(
            ConstraintRef::new("school", "Avoid clashes"),
            1,
            ConstraintKind::AvoidClashes {
                resources: vec![smith, jones, room],
            },
        ));
        b.add_constraint(Constraint::preferred(
            ConstraintRef::new("school", "Maths in the morning"),
            2,
            ConstraintKind::PreferTimes {
                events: vec![maths],
                domain: Arc::clone(&mornings),
            },
        ));
        b.add_constraint(Constraint::preferred(
            ConstraintRef::new("school", "At most three busy times a day"),
            1,
            ConstraintKind::LimitBusyTimes {
                resources: teacher_ids.clone(),
                time_groups: days.clone(),
                minimum: 0,
                maximum: 3,
            },
        ));
        b.add_constraint(Constraint::preferred(
            ConstraintRef::new("school", "One working day"),
            1,
            ConstraintKind::ClusterBusyTimes {
                resources: teacher_ids.clone(),
                time_groups: days,
                minimum: 0,
                maximum: 1,
            },
        ));
        b.add_constraint(Constraint::preferred(
            ConstraintRef::new("school", "Workload"),
            1,
            ConstraintKind::LimitWorkload {
                resources: teacher_ids,
                minimum: 0,
                maximum: 4,
            },
        ));

        let instance = Arc::new(b.build().expect("school week is valid"));
        Self {
            instance,
            monday,
            tuesday,
            mornings,
            smith,
            jones,
            room,
            teachers,
            rooms,
            smith_only,
            maths,
            maths_teacher,
            maths_room,
            english,
            english_teacher,
            science,
            science_teacher,
            art,
            art_teacher,
        }
    }
}

/// An instance with four times and two teachers, with the teachers' group.
pub fn two_teachers_instance() -> (Instance, ResourceGroupId) {
    let mut b = InstanceBuilder::new("two teachers", ["T1", "T2", "T3", "T4"]);
    let a = b.add_resource("A");
    let c = b.add_resource("B");
    let teachers = b
        .add_resource_group("Teachers", [a, c])
        .expect("valid resources");
    (b.build().expect("valid instance"), teachers)
}
