//! Read-only problem description.
//!
//! An [`Instance`] is assembled with an [`InstanceBuilder`], validated once by
//! [`InstanceBuilder::build`] and then shared immutably (typically as
//! `Arc<Instance>`) by every solution of the problem.

mod builder;
mod entities;

#[cfg(test)]
mod tests;

use std::sync::Arc;

pub use builder::InstanceBuilder;
pub use entities::{Event, EventResource, Resource, ResourceGroup};

use crate::constraint::Constraint;
use crate::ids::{ConstraintId, EventId, EventResourceId, ResourceGroupId, ResourceId};
use crate::time::{Time, TimeGroup};

/// A validated, immutable timetabling instance.
#[derive(Debug)]
pub struct Instance {
    pub(crate) name: String,
    pub(crate) times: Vec<Time>,
    pub(crate) full_time_group: Arc<TimeGroup>,
    pub(crate) time_groups: Vec<Arc<TimeGroup>>,
    pub(crate) resources: Vec<Resource>,
    pub(crate) resource_groups: Vec<ResourceGroup>,
    pub(crate) events: Vec<Event>,
    pub(crate) event_resources: Vec<EventResource>,
    pub(crate) constraints: Vec<Constraint>,
}

impl Instance {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of times in the cycle.
    #[inline]
    pub fn cycle_len(&self) -> usize {
        self.times.len()
    }

    pub fn times(&self) -> &[Time] {
        &self.times
    }

    pub fn time(&self, index: usize) -> &Time {
        &self.times[index]
    }

    /// The group of every time of the cycle.
    pub fn full_time_group(&self) -> &Arc<TimeGroup> {
        &self.full_time_group
    }

    /// Named time groups declared by the builder.
    pub fn time_groups(&self) -> &[Arc<TimeGroup>] {
        &self.time_groups
    }

    pub fn time_group_by_name(&self, name: &str) -> Option<&Arc<TimeGroup>> {
        self.time_groups.iter().find(|g| g.name() == Some(name))
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    pub fn event(&self, id: EventId) -> &Event {
        &self.events[id.index()]
    }

    /// Iterates over all events with their ids.
    pub fn events(&self) -> impl Iterator<Item = (EventId, &Event)> {
        self.events
            .iter()
            .enumerate()
            .map(|(i, e)| (EventId::new(i), e))
    }

    pub fn event_resource_count(&self) -> usize {
        self.event_resources.len()
    }

    pub fn event_resource(&self, id: EventResourceId) -> &EventResource {
        &self.event_resources[id.index()]
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    pub fn resource(&self, id: ResourceId) -> &Resource {
        &self.resources[id.index()]
    }

    /// Iterates over all resource ids.
    pub fn resource_ids(&self) -> impl Iterator<Item = ResourceId> {
        (0..self.resources.len()).map(ResourceId::new)
    }

    pub fn resource_group_count(&self) -> usize {
        self.resource_groups.len()
    }

    pub fn resource_group(&self, id: ResourceGroupId) -> &ResourceGroup {
        &self.resource_groups[id.index()]
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    pub fn constraint(&self, id: ConstraintId) -> &Constraint {
        &self.constraints[id.index()]
    }

    /// Iterates over all constraints with their ids.
    pub fn constraints(&self) -> impl Iterator<Item = (ConstraintId, &Constraint)> {
        self.constraints
            .iter()
            .enumerate()
            .map(|(i, c)| (ConstraintId::new(i), c))
    }
}
