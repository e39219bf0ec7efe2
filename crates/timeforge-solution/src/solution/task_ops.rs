//! Task edits: make, delete and resource assignment.

use smallvec::SmallVec;
use timeforge_core::{EventResourceId, ResourceGroupId, ResourceId};
use tracing::trace;

use super::meet_ops::swap_remove_item;
use super::Solution;
use crate::error::{Result, SolutionError};
use crate::ids::{MeetId, TaskId};
use crate::matching::DemandNode;
use crate::task::{Task, WORKLOAD_SCALE};
use crate::transaction::{Operation, TaskRecord};

impl Solution {
    pub fn make_task_check(
        &self,
        meet: MeetId,
        event_resource: Option<EventResourceId>,
        domain: ResourceGroupId,
    ) -> Result<()> {
        if self.live_meet(meet)?.is_cycle_meet() {
            return Err(SolutionError::CycleMeet(meet));
        }
        if let Some(er) = event_resource {
            if er.index() >= self.instance.event_resource_count() {
                return Err(SolutionError::NoSuchEventResource(er));
            }
        }
        if domain.index() >= self.instance.resource_group_count() {
            return Err(SolutionError::NoSuchResourceGroup(domain));
        }
        Ok(())
    }

    /// Adds a task to `meet`, requiring one resource of `domain` for the
    /// meet's whole duration.
    ///
    /// The task's workload is its event resource's share of the event's
    /// workload, in proportion to the meet's part of the event.
    pub fn make_task(
        &mut self,
        meet: MeetId,
        event_resource: Option<EventResourceId>,
        domain: ResourceGroupId,
    ) -> Result<TaskId> {
        self.make_task_check(meet, event_resource, domain)
            .inspect_err(|e| trace!(event = "edit_rejected", op = "task_make", error = %e))?;
        let workload = self.task_workload(meet, event_resource);
        let task = self.make_task_unchecked(
            None,
            Task {
                meet,
                event_resource,
                domain,
                resource: None,
                workload,
            },
        );
        self.after_edit();
        Ok(task)
    }

    fn task_workload(&self, meet: MeetId, event_resource: Option<EventResourceId>) -> u64 {
        let m = &self.meets[meet];
        let duration = m.duration as u64;
        match m.event {
            Some(e) => {
                let event = self.instance.event(e);
                let workload = event_resource
                    .and_then(|er| self.instance.event_resource(er).workload)
                    .unwrap_or(event.workload);
                workload * WORKLOAD_SCALE * duration / event.duration as u64
            }
            None => duration * WORKLOAD_SCALE,
        }
    }

    pub(crate) fn make_task_unchecked(&mut self, slot: Option<TaskId>, task: Task) -> TaskId {
        debug_assert!(task.resource.is_none());
        let meet = task.meet;
        let event_resource = task.event_resource;
        let id = match slot {
            Some(slot) => {
                self.tasks.insert_at(slot, task);
                slot
            }
            None => self.tasks.insert(task),
        };
        self.meets[meet].tasks.push(id);
        let duration = self.meets[meet].duration;
        self.add_demand_upwards(meet, duration as isize);
        if let Some(er) = event_resource {
            self.event_resource_tasks[er.index()].push(id);
        }
        self.task_view(id, true);
        self.refresh_demand_domains(meet);
        let record = self.task_record(id);
        self.journal(|| Operation::TaskMake(record));
        trace!(event = "task_make", task = %id, meet = %meet);
        id
    }

    fn task_record(&self, task: TaskId) -> TaskRecord {
        let t = &self.tasks[task];
        TaskRecord {
            task,
            meet: t.meet,
            event_resource: t.event_resource,
            domain: t.domain,
            workload: t.workload,
        }
    }

    pub fn delete_task_check(&self, task: TaskId) -> Result<()> {
        self.live_task(task)?;
        Ok(())
    }

    /// Deletes a task, unassigning its resource first.
    pub fn delete_task(&mut self, task: TaskId) -> Result<()> {
        self.delete_task_check(task)
            .inspect_err(|e| trace!(event = "edit_rejected", op = "task_delete", error = %e))?;
        if self.tasks[task].resource.is_some() {
            self.unassign_resource_unchecked(task);
        }
        self.delete_task_unchecked(task);
        self.after_edit();
        Ok(())
    }

    pub(crate) fn delete_task_unchecked(&mut self, task: TaskId) {
        assert!(
            self.tasks[task].resource.is_none(),
            "{} deleted while assigned",
            task
        );
        self.task_view(task, false);
        let record = self.task_record(task);
        let t = self.tasks.remove(task);
        swap_remove_item(&mut self.meets[t.meet].tasks, task, "meet tasks");
        let duration = self.meets[t.meet].duration;
        self.add_demand_upwards(t.meet, -(duration as isize));
        if let Some(er) = t.event_resource {
            swap_remove_item(
                &mut self.event_resource_tasks[er.index()],
                task,
                "event resource tasks",
            );
        }
        self.refresh_demand_domains(t.meet);
        self.journal(|| Operation::TaskDelete(record));
        trace!(event = "task_delete", task = %task);
    }

    pub fn assign_resource_check(&self, task: TaskId, resource: ResourceId) -> Result<()> {
        let t = self.live_task(task)?;
        if t.resource.is_some() {
            return Err(SolutionError::TaskAssigned(task));
        }
        if resource.index() >= self.instance.resource_count() {
            return Err(SolutionError::NoSuchResource(resource));
        }
        if !self.instance.resource_group(t.domain).contains(resource) {
            return Err(SolutionError::ResourceOutsideDomain { task, resource });
        }
        Ok(())
    }

    pub fn assign_resource(&mut self, task: TaskId, resource: ResourceId) -> Result<()> {
        self.assign_resource_check(task, resource)
            .inspect_err(|e| trace!(event = "edit_rejected", op = "task_assign", error = %e))?;
        self.assign_resource_unchecked(task, resource);
        self.after_edit();
        Ok(())
    }

    pub(crate) fn assign_resource_unchecked(&mut self, task: TaskId, resource: ResourceId) {
        self.task_view(task, false);
        self.tasks[task].resource = Some(resource);
        self.task_view(task, true);
        let meet = self.tasks[task].meet;
        self.refresh_demand_domains(meet);
        self.journal(|| Operation::TaskAssignResource { task, resource });
        trace!(event = "task_assign", task = %task, resource = %resource);
    }

    pub fn unassign_resource_check(&self, task: TaskId) -> Result<()> {
        if self.live_task(task)?.resource.is_none() {
            return Err(SolutionError::TaskNotAssigned(task));
        }
        Ok(())
    }

    pub fn unassign_resource(&mut self, task: TaskId) -> Result<()> {
        self.unassign_resource_check(task)
            .inspect_err(|e| trace!(event = "edit_rejected", op = "task_unassign", error = %e))?;
        self.unassign_resource_unchecked(task);
        self.after_edit();
        Ok(())
    }

    pub(crate) fn unassign_resource_unchecked(&mut self, task: TaskId) {
        self.task_view(task, false);
        let resource = self.tasks[task]
            .resource
            .take()
            .unwrap_or_else(|| panic!("{} has no resource", task));
        self.task_view(task, true);
        let meet = self.tasks[task].meet;
        self.refresh_demand_domains(meet);
        self.journal(|| Operation::TaskUnassignResource { task, resource });
        trace!(event = "task_unassign", task = %task, resource = %resource);
    }

    /// The demand one offset of `meet` places on the matching.
    pub(crate) fn demand_nodes(&self, meet: MeetId) -> SmallVec<[DemandNode; 4]> {
        self.meets[meet]
            .tasks
            .iter()
            .map(|&t| {
                let task = &self.tasks[t];
                match task.resource {
                    Some(r) => DemandNode::Resource(r),
                    None => DemandNode::Group(task.domain),
                }
            })
            .collect()
    }

    pub(crate) fn refresh_demand_domains(&mut self, meet: MeetId) {
        let nodes = self.demand_nodes(meet);
        for i in 0..self.meets[meet].demand_chunks.len() {
            let d = self.meets[meet].demand_chunks[i];
            self.matching.set_domain(d, nodes.clone());
        }
    }
}
