//! Incremental construction and validation of instances.

use std::sync::Arc;

use crate::constraint::{Constraint, ConstraintKind};
use crate::error::{Result, TimeforgeError};
use crate::ids::{ConstraintId, EventId, EventResourceId, ResourceGroupId, ResourceId};
use crate::time::{Time, TimeGroup};

use super::{Event, EventResource, Instance, Resource, ResourceGroup};

/// Builder for [`Instance`].
///
/// # Examples
///
/// ```
/// use timeforge_core::{Event, EventResource, InstanceBuilder};
///
/// let mut b = InstanceBuilder::new("tiny", ["Mon1", "Mon2", "Tue1", "Tue2"]);
/// let mon = b.time_group("Mon", [0, 1]).unwrap();
/// let smith = b.add_resource("Smith");
/// let teachers = b.add_resource_group("Teachers", [smith]).unwrap();
/// let maths = b.add_event(Event::new("Maths", 2).with_domain(mon));
/// b.add_event_resource(EventResource::new(maths, teachers)).unwrap();
///
/// let instance = b.build().unwrap();
/// assert_eq!(instance.cycle_len(), 4);
/// assert_eq!(instance.event(maths).event_resources().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct InstanceBuilder {
    name: String,
    times: Vec<Time>,
    time_groups: Vec<Arc<TimeGroup>>,
    resources: Vec<Resource>,
    resource_groups: Vec<ResourceGroup>,
    events: Vec<Event>,
    event_resources: Vec<EventResource>,
    constraints: Vec<Constraint>,
}

impl InstanceBuilder {
    /// Starts an instance whose cycle consists of the given times, in order.
    pub fn new<S: Into<String>>(name: impl Into<String>, times: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: name.into(),
            times: times
                .into_iter()
                .enumerate()
                .map(|(i, n)| Time::new(n, i))
                .collect(),
            ..Self::default()
        }
    }

    /// Number of times in the cycle.
    pub fn cycle_len(&self) -> usize {
        self.times.len()
    }

    /// Declares a named time group.
    pub fn time_group(
        &mut self,
        name: impl Into<String>,
        times: impl IntoIterator<Item = usize>,
    ) -> Result<Arc<TimeGroup>> {
        let cycle_len = self.cycle_len();
        let times: Vec<usize> = times.into_iter().collect();
        if let Some(&time) = times.iter().find(|&&t| t >= cycle_len) {
            return Err(TimeforgeError::TimeOutOfRange { time, cycle_len });
        }
        let group = Arc::new(TimeGroup::new(cycle_len, times).with_name(name));
        self.time_groups.push(Arc::clone(&group));
        Ok(group)
    }

    pub fn add_resource(&mut self, name: impl Into<String>) -> ResourceId {
        self.resources.push(Resource { name: name.into() });
        ResourceId::new(self.resources.len() - 1)
    }

    /// Declares a resource group. Members must already exist.
    pub fn add_resource_group(
        &mut self,
        name: impl Into<String>,
        members: impl IntoIterator<Item = ResourceId>,
    ) -> Result<ResourceGroupId> {
        let members: Vec<ResourceId> = members.into_iter().collect();
        for &r in &members {
            self.check_resource(r)?;
        }
        self.resource_groups
            .push(ResourceGroup::new(name, self.resources.len(), members));
        Ok(ResourceGroupId::new(self.resource_groups.len() - 1))
    }

    pub fn add_event(&mut self, event: Event) -> EventId {
        self.events.push(event);
        EventId::new(self.events.len() - 1)
    }

    /// Adds a resource requirement to the event named by `er.event`.
    pub fn add_event_resource(&mut self, er: EventResource) -> Result<EventResourceId> {
        if er.event.index() >= self.events.len() {
            return Err(TimeforgeError::UnknownReference {
                kind: "event",
                index: er.event.index(),
            });
        }
        if er.domain.index() >= self.resource_groups.len() {
            return Err(TimeforgeError::UnknownReference {
                kind: "resource group",
                index: er.domain.index(),
            });
        }
        let id = EventResourceId::new(self.event_resources.len());
        if let Some(r) = er.preassigned_resource {
            self.check_resource(r)?;
            if !self.resource_groups[er.domain.index()].contains(r) {
                return Err(TimeforgeError::PreassignedResourceOutsideDomain {
                    resource: r.index(),
                    event_resource: id.index(),
                });
            }
        }
        self.events[er.event.index()].event_resources.push(id);
        self.event_resources.push(er);
        Ok(id)
    }

    pub fn add_constraint(&mut self, constraint: Constraint) -> ConstraintId {
        self.constraints.push(constraint);
        ConstraintId::new(self.constraints.len() - 1)
    }

    /// Validates everything and freezes the instance.
    pub fn build(self) -> Result<Instance> {
        let cycle_len = self.times.len();
        if cycle_len == 0 {
            return Err(TimeforgeError::NoTimes);
        }

        for event in &self.events {
            if event.duration == 0 {
                return Err(TimeforgeError::ZeroDuration(event.name.clone()));
            }
            if let Some(time) = event.preassigned_time {
                if time + event.duration > cycle_len {
                    return Err(TimeforgeError::PreassignedTimeOutOfRange {
                        event: event.name.clone(),
                        time,
                    });
                }
            }
            if let Some(domain) = &event.domain {
                check_cycle(domain, cycle_len)?;
            }
        }

        for constraint in &self.constraints {
            self.check_constraint(constraint, cycle_len)?;
        }

        Ok(Instance {
            name: self.name,
            full_time_group: Arc::new(TimeGroup::full(cycle_len).with_name("All")),
            times: self.times,
            time_groups: self.time_groups,
            resources: self.resources,
            resource_groups: self.resource_groups,
            events: self.events,
            event_resources: self.event_resources,
            constraints: self.constraints,
        })
    }

    fn check_resource(&self, r: ResourceId) -> Result<()> {
        if r.index() >= self.resources.len() {
            return Err(TimeforgeError::UnknownReference {
                kind: "resource",
                index: r.index(),
            });
        }
        Ok(())
    }

    fn check_constraint(&self, constraint: &Constraint, cycle_len: usize) -> Result<()> {
        let check_events = |events: &[EventId]| -> Result<()> {
            match events.iter().find(|e| e.index() >= self.events.len()) {
                Some(e) => Err(TimeforgeError::UnknownReference {
                    kind: "event",
                    index: e.index(),
                }),
                None => Ok(()),
            }
        };
        let check_resources = |resources: &[ResourceId]| -> Result<()> {
            resources.iter().try_for_each(|&r| self.check_resource(r))
        };

        match &constraint.kind {
            ConstraintKind::AssignTime { events } => check_events(events),
            ConstraintKind::PreferTimes { events, domain } => {
                check_cycle(domain, cycle_len)?;
                check_events(events)
            }
            ConstraintKind::AssignResource { event_resources } => {
                match event_resources
                    .iter()
                    .find(|er| er.index() >= self.event_resources.len())
                {
                    Some(er) => Err(TimeforgeError::UnknownReference {
                        kind: "event resource",
                        index: er.index(),
                    }),
                    None => Ok(()),
                }
            }
            ConstraintKind::AvoidClashes { resources } => check_resources(resources),
            ConstraintKind::LimitBusyTimes {
                resources,
                time_groups,
                minimum,
                maximum,
            }
            | ConstraintKind::ClusterBusyTimes {
                resources,
                time_groups,
                minimum,
                maximum,
            } => {
                if minimum > maximum {
                    return Err(TimeforgeError::InvalidLimits(constraint.name().to_string()));
                }
                for g in time_groups {
                    check_cycle(g, cycle_len)?;
                }
                check_resources(resources)
            }
            ConstraintKind::LimitWorkload {
                resources,
                minimum,
                maximum,
            } => {
                if minimum > maximum {
                    return Err(TimeforgeError::InvalidLimits(constraint.name().to_string()));
                }
                check_resources(resources)
            }
        }
    }
}

fn check_cycle(group: &TimeGroup, cycle_len: usize) -> Result<()> {
    if group.cycle_len() != cycle_len {
        return Err(TimeforgeError::ForeignTimeGroup(group.to_string()));
    }
    Ok(())
}
