//! Events, event resources, resources and resource groups.

use std::sync::Arc;

use crate::ids::{EventId, EventResourceId, ResourceGroupId, ResourceId};
use crate::time::TimeGroup;

/// An event: something to be scheduled for `duration` consecutive times.
#[derive(Debug, Clone)]
pub struct Event {
    pub name: String,
    pub duration: usize,
    /// Workload of the whole event; defaults to its duration.
    pub workload: u64,
    pub preassigned_time: Option<usize>,
    /// Allowed start times; `None` allows every time.
    pub domain: Option<Arc<TimeGroup>>,
    pub(crate) event_resources: Vec<EventResourceId>,
}

impl Event {
    /// Creates an event whose workload equals its duration.
    pub fn new(name: impl Into<String>, duration: usize) -> Self {
        Self {
            name: name.into(),
            duration,
            workload: duration as u64,
            preassigned_time: None,
            domain: None,
            event_resources: Vec::new(),
        }
    }

    pub fn with_workload(mut self, workload: u64) -> Self {
        self.workload = workload;
        self
    }

    pub fn with_preassigned_time(mut self, time: usize) -> Self {
        self.preassigned_time = Some(time);
        self
    }

    pub fn with_domain(mut self, domain: Arc<TimeGroup>) -> Self {
        self.domain = Some(domain);
        self
    }

    /// The resource requirements of this event.
    pub fn event_resources(&self) -> &[EventResourceId] {
        &self.event_resources
    }
}

/// One resource requirement of an event.
#[derive(Debug, Clone)]
pub struct EventResource {
    pub event: EventId,
    pub role: Option<String>,
    /// Resources that may fill this requirement.
    pub domain: ResourceGroupId,
    pub preassigned_resource: Option<ResourceId>,
    /// Workload contributed to the assigned resource; defaults to the
    /// event's workload.
    pub workload: Option<u64>,
}

impl EventResource {
    pub fn new(event: EventId, domain: ResourceGroupId) -> Self {
        Self {
            event,
            role: None,
            domain,
            preassigned_resource: None,
            workload: None,
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_preassigned_resource(mut self, resource: ResourceId) -> Self {
        self.preassigned_resource = Some(resource);
        self
    }

    pub fn with_workload(mut self, workload: u64) -> Self {
        self.workload = Some(workload);
        self
    }
}

/// A resource (teacher, room, class, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub name: String,
}

/// An immutable set of resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceGroup {
    pub name: String,
    members: Vec<bool>,
    resources: Vec<ResourceId>,
}

impl ResourceGroup {
    pub(crate) fn new(
        name: impl Into<String>,
        resource_count: usize,
        resources: impl IntoIterator<Item = ResourceId>,
    ) -> Self {
        let mut members = vec![false; resource_count];
        for r in resources {
            members[r.index()] = true;
        }
        let resources = members
            .iter()
            .enumerate()
            .filter(|(_, &m)| m)
            .map(|(i, _)| ResourceId::new(i))
            .collect();
        Self {
            name: name.into(),
            members,
            resources,
        }
    }

    #[inline]
    pub fn contains(&self, resource: ResourceId) -> bool {
        self.members.get(resource.index()).copied().unwrap_or(false)
    }

    /// Returns true if every member of `self` is a member of `other`.
    pub fn is_subset(&self, other: &ResourceGroup) -> bool {
        self.resources.iter().all(|&r| other.contains(r))
    }

    /// Members in increasing id order.
    pub fn resources(&self) -> &[ResourceId] {
        &self.resources
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}
