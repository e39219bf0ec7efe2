//! Monitor watching the tasks of one event resource.

use timeforge_core::EventResourceId;

use super::DeviationMonitor;

/// Total duration of the event resource's tasks that have no resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignResourceMonitor {
    event_resource: EventResourceId,
    unassigned_duration: u64,
}

impl AssignResourceMonitor {
    pub fn new(event_resource: EventResourceId) -> Self {
        Self {
            event_resource,
            unassigned_duration: 0,
        }
    }

    #[inline]
    pub fn event_resource(&self) -> EventResourceId {
        self.event_resource
    }

    pub fn add_task(&mut self, duration: usize, assigned: bool) {
        if !assigned {
            self.unassigned_duration += duration as u64;
        }
    }

    pub fn delete_task(&mut self, duration: usize, assigned: bool) {
        if !assigned {
            self.unassigned_duration = self
                .unassigned_duration
                .checked_sub(duration as u64)
                .unwrap_or_else(|| {
                    panic!(
                        "AssignResource for {}: deviation below zero",
                        self.event_resource
                    )
                });
        }
    }
}

impl DeviationMonitor for AssignResourceMonitor {
    fn tag(&self) -> &'static str {
        "AssignResource"
    }

    fn deviation(&self) -> u64 {
        self.unassigned_duration
    }

    fn clear(&mut self) {
        self.unassigned_duration = 0;
    }
}
