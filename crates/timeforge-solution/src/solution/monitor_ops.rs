//! Monitor routing, cost propagation and the group monitor tree.

use std::collections::BTreeMap;

use timeforge_core::{Cost, EventId};
use tracing::debug;

use super::{Solution, ROOT_MONITOR};
use crate::error::{Result, SolutionError};
use crate::ids::{MeetId, MonitorId, TaskId};
use crate::monitor::{DeviationMonitor, GroupMonitor, Monitor, MonitorKind};

/// Cost and number of monitors of one kind, as reported by
/// [`Solution::cost_by_tag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagCost {
    pub cost: Cost,
    pub monitors: usize,
}

impl Solution {
    // ------------------------------------------------------------------
    // Accessors and reporting
    // ------------------------------------------------------------------

    #[inline]
    pub fn monitor(&self, id: MonitorId) -> &Monitor {
        &self.monitors[id]
    }

    pub fn monitors(&self) -> impl Iterator<Item = (MonitorId, &Monitor)> {
        self.monitors.iter()
    }

    #[inline]
    pub fn monitor_count(&self) -> usize {
        self.monitors.len()
    }

    /// The solution's own group monitor.
    #[inline]
    pub fn root_monitor(&self) -> MonitorId {
        ROOT_MONITOR
    }

    /// Monitors watching the meets of `event`.
    pub fn event_monitors(&self, event: EventId) -> &[MonitorId] {
        &self.event_monitors[event.index()]
    }

    /// Cost and monitor count per monitor kind, over every non-group monitor.
    pub fn cost_by_tag(&self) -> BTreeMap<&'static str, TagCost> {
        let mut by_tag = BTreeMap::new();
        for (_, monitor) in self.monitors.iter() {
            if let Some(d) = monitor.kind.as_deviation() {
                let entry = by_tag.entry(d.tag()).or_insert(TagCost {
                    cost: Cost::ZERO,
                    monitors: 0,
                });
                entry.cost += monitor.cost;
                entry.monitors += 1;
            }
        }
        by_tag
    }

    // ------------------------------------------------------------------
    // Attach and detach
    // ------------------------------------------------------------------

    fn deviation_monitor(&self, m: MonitorId) -> Result<&Monitor> {
        let monitor = self
            .monitors
            .get(m)
            .ok_or(SolutionError::NoSuchMonitor(m))?;
        if monitor.is_group() {
            return Err(SolutionError::IsGroupMonitor(m));
        }
        Ok(monitor)
    }

    /// Attaches a monitor, rebuilding its state from the solution.
    ///
    /// Attaching an attached monitor does nothing. Group monitors are always
    /// attached and are refused.
    pub fn attach_monitor(&mut self, m: MonitorId) -> Result<()> {
        self.deviation_monitor(m)?;
        self.attach_unchecked(m);
        Ok(())
    }

    /// Detaches a monitor: its state is cleared and its cost becomes zero.
    pub fn detach_monitor(&mut self, m: MonitorId) -> Result<()> {
        self.deviation_monitor(m)?;
        self.detach_unchecked(m);
        Ok(())
    }

    /// Attaches or detaches a monitor according to whether it could
    /// currently report a non-zero deviation.
    pub fn monitor_attach_check(&mut self, m: MonitorId) -> Result<()> {
        self.deviation_monitor(m)?;
        self.attach_check_unchecked(m);
        Ok(())
    }

    pub(crate) fn attach_unchecked(&mut self, m: MonitorId) {
        if self.monitors[m].attached {
            return;
        }
        let fresh = self.scanned_kind(&self.monitors[m].kind);
        let monitor = &mut self.monitors[m];
        monitor.kind = fresh;
        monitor.attached = true;
        debug!(event = "monitor_attached", monitor = %m, tag = monitor.tag());
        self.refresh_cost(m);
    }

    pub(crate) fn detach_unchecked(&mut self, m: MonitorId) {
        let monitor = &mut self.monitors[m];
        if !monitor.attached {
            return;
        }
        if let Some(d) = monitor.kind.as_deviation_mut() {
            d.clear();
        }
        monitor.attached = false;
        debug!(event = "monitor_detached", monitor = %m, tag = monitor.tag());
        self.refresh_cost(m);
    }

    pub(crate) fn attach_check_unchecked(&mut self, m: MonitorId) {
        let attach = match &self.monitors[m].kind {
            MonitorKind::Group(_) => return,
            MonitorKind::PreferTimes(p) => !self.event_meets[p.event().index()]
                .iter()
                .all(|&meet| {
                    self.meets[meet]
                        .domain
                        .as_ref()
                        .is_some_and(|d| p.domain_is_preferred(d))
                }),
            MonitorKind::LimitBusyTimes(l) => l.can_be_violated(),
            MonitorKind::ClusterBusyTimes(c) => c.can_be_violated(),
            _ => true,
        };
        if attach {
            self.attach_unchecked(m);
        } else {
            self.detach_unchecked(m);
        }
    }

    /// Re-runs the attach check of the prefer-times monitors of `event`.
    pub(crate) fn event_attach_check(&mut self, event: EventId) {
        if !self.config.monitors.attach_check {
            return;
        }
        for i in 0..self.event_monitors[event.index()].len() {
            let m = self.event_monitors[event.index()][i];
            if matches!(self.monitors[m].kind, MonitorKind::PreferTimes(_)) {
                self.attach_check_unchecked(m);
            }
        }
    }

    /// A copy of `kind` whose state is rebuilt by scanning the solution.
    pub(crate) fn scanned_kind(&self, kind: &MonitorKind) -> MonitorKind {
        let mut fresh = kind.clone();
        match &mut fresh {
            MonitorKind::Group(_) => {}
            MonitorKind::AssignTime(x) => {
                x.clear();
                for &meet in &self.event_meets[x.event().index()] {
                    let meet = &self.meets[meet];
                    x.add_meet(meet.duration, meet.assigned_time);
                }
            }
            MonitorKind::PreferTimes(x) => {
                x.clear();
                for &meet in &self.event_meets[x.event().index()] {
                    let meet = &self.meets[meet];
                    x.add_meet(meet.duration, meet.assigned_time);
                }
            }
            MonitorKind::AssignResource(x) => {
                x.clear();
                for &t in &self.event_resource_tasks[x.event_resource().index()] {
                    let task = &self.tasks[t];
                    x.add_task(self.meets[task.meet].duration, task.resource.is_some());
                }
            }
            MonitorKind::AvoidClashes(x) => x.attach_row(self.timetable.row(x.resource().index())),
            MonitorKind::LimitBusyTimes(x) => {
                x.attach_row(self.timetable.row(x.resource().index()))
            }
            MonitorKind::ClusterBusyTimes(x) => {
                x.attach_row(self.timetable.row(x.resource().index()))
            }
            MonitorKind::LimitWorkload(x) => {
                x.clear();
                let r = x.resource();
                for (_, task) in self.tasks.iter() {
                    if task.resource == Some(r) {
                        x.assign_resource(task.workload);
                    }
                }
            }
        }
        fresh
    }

    // ------------------------------------------------------------------
    // Routing deltas
    // ------------------------------------------------------------------

    /// Adds `meet` to, or removes it from, the monitors of its event.
    pub(crate) fn meet_view(&mut self, meet: MeetId, add: bool) {
        let m = &self.meets[meet];
        let Some(event) = m.event else {
            return;
        };
        let (duration, time) = (m.duration, m.assigned_time);
        for i in 0..self.event_monitors[event.index()].len() {
            let id = self.event_monitors[event.index()][i];
            let monitor = &mut self.monitors[id];
            if !monitor.attached {
                continue;
            }
            match &mut monitor.kind {
                MonitorKind::AssignTime(x) if add => x.add_meet(duration, time),
                MonitorKind::AssignTime(x) => x.delete_meet(duration, time),
                MonitorKind::PreferTimes(x) if add => x.add_meet(duration, time),
                MonitorKind::PreferTimes(x) => x.delete_meet(duration, time),
                _ => continue,
            }
            self.refresh_cost(id);
        }
    }

    /// Adds `task` to, or removes it from, every monitor that sees it.
    pub(crate) fn task_view(&mut self, task: TaskId, add: bool) {
        let t = &self.tasks[task];
        let (event_resource, resource, workload) = (t.event_resource, t.resource, t.workload);
        let duration = self.meets[t.meet].duration;

        if let Some(er) = event_resource {
            for i in 0..self.event_resource_monitors[er.index()].len() {
                let id = self.event_resource_monitors[er.index()][i];
                let monitor = &mut self.monitors[id];
                if !monitor.attached {
                    continue;
                }
                if let MonitorKind::AssignResource(x) = &mut monitor.kind {
                    if add {
                        x.add_task(duration, resource.is_some());
                    } else {
                        x.delete_task(duration, resource.is_some());
                    }
                    self.refresh_cost(id);
                }
            }
        }

        if let Some(r) = resource {
            for i in 0..self.resource_monitors[r.index()].len() {
                let id = self.resource_monitors[r.index()][i];
                let monitor = &mut self.monitors[id];
                if !monitor.attached {
                    continue;
                }
                if let MonitorKind::LimitWorkload(x) = &mut monitor.kind {
                    if add {
                        x.assign_resource(workload);
                    } else {
                        x.unassign_resource(workload);
                    }
                    self.refresh_cost(id);
                }
            }
            self.task_timetable(task, add);
        }
    }

    /// Adds `task` to, or removes it from, its resource's timetable row, if
    /// it has a resource and its meet has a time.
    pub(crate) fn task_timetable(&mut self, task: TaskId, add: bool) {
        let t = &self.tasks[task];
        let Some(r) = t.resource else {
            return;
        };
        let meet = &self.meets[t.meet];
        let Some(start) = meet.assigned_time else {
            return;
        };
        let changes = if add {
            self.timetable.add(r.index(), start, meet.duration)
        } else {
            self.timetable.remove(r.index(), start, meet.duration)
        };
        for change in changes {
            for i in 0..self.resource_monitors[r.index()].len() {
                let id = self.resource_monitors[r.index()][i];
                let monitor = &mut self.monitors[id];
                if !monitor.attached {
                    continue;
                }
                match &mut monitor.kind {
                    MonitorKind::AvoidClashes(x) => x.occupancy_changed(change.old, change.new),
                    MonitorKind::LimitBusyTimes(x) if change.became_busy() => {
                        x.busy_time_added(change.time)
                    }
                    MonitorKind::LimitBusyTimes(x) if change.became_free() => {
                        x.busy_time_removed(change.time)
                    }
                    MonitorKind::ClusterBusyTimes(x) if change.became_busy() => {
                        x.busy_time_added(change.time)
                    }
                    MonitorKind::ClusterBusyTimes(x) if change.became_free() => {
                        x.busy_time_removed(change.time)
                    }
                    _ => continue,
                }
                self.refresh_cost(id);
            }
        }
    }

    // ------------------------------------------------------------------
    // Cost propagation
    // ------------------------------------------------------------------

    /// Recomputes a deviation monitor's cost and propagates any change.
    pub(crate) fn refresh_cost(&mut self, m: MonitorId) {
        let monitor = &self.monitors[m];
        let new = monitor.computed_cost();
        if new != monitor.cost {
            self.change_cost(m, new);
        }
    }

    /// Sets the cost of `m` and adds the difference to every group above it,
    /// keeping each group's defect list current.
    pub(crate) fn change_cost(&mut self, m: MonitorId, new: Cost) {
        let mut child = m;
        let mut new_cost = new;
        loop {
            let old = self.monitors[child].cost;
            if old == new_cost {
                return;
            }
            self.monitors[child].cost = new_cost;
            let Some(parent) = self.monitors[child].parent else {
                return;
            };
            match (old.is_zero(), new_cost.is_zero()) {
                (true, false) => {
                    let index = self.group_mut(parent).push_defect(child);
                    self.monitors[child].defect_index = Some(index);
                }
                (false, true) => self.remove_defect(parent, child),
                _ => {}
            }
            new_cost = self.monitors[parent].cost + (new_cost - old);
            child = parent;
        }
    }

    fn group_mut(&mut self, g: MonitorId) -> &mut GroupMonitor {
        self.monitors[g]
            .as_group_mut()
            .unwrap_or_else(|| panic!("{} is not a group monitor", g))
    }

    fn remove_defect(&mut self, group: MonitorId, child: MonitorId) {
        let index = self.monitors[child]
            .defect_index
            .take()
            .unwrap_or_else(|| panic!("{} has cost but no defect index", child));
        if let Some(moved) = self.group_mut(group).swap_remove_defect(index) {
            self.monitors[moved].defect_index = Some(index);
        }
    }

    // ------------------------------------------------------------------
    // Group monitors
    // ------------------------------------------------------------------

    /// Creates an empty group monitor with no parent.
    pub fn make_group_monitor(&mut self, tag: impl Into<String>) -> MonitorId {
        let m = self.monitors.insert(Monitor::group(tag));
        debug!(event = "group_monitor_made", monitor = %m);
        m
    }

    fn group(&self, g: MonitorId) -> Result<&GroupMonitor> {
        self.monitors
            .get(g)
            .ok_or(SolutionError::NoSuchMonitor(g))?
            .as_group()
            .ok_or(SolutionError::NotAGroupMonitor(g))
    }

    pub fn add_child_monitor_check(&self, group: MonitorId, child: MonitorId) -> Result<()> {
        self.group(group)?;
        let c = self
            .monitors
            .get(child)
            .ok_or(SolutionError::NoSuchMonitor(child))?;
        if c.parent.is_some() {
            return Err(SolutionError::MonitorHasParent(child));
        }
        let mut ancestor = Some(group);
        while let Some(a) = ancestor {
            if a == child {
                return Err(SolutionError::MonitorCycle { group, child });
            }
            ancestor = self.monitors[a].parent;
        }
        Ok(())
    }

    /// Makes `child` a child of `group`; its cost flows into the group.
    pub fn add_child_monitor(&mut self, group: MonitorId, child: MonitorId) -> Result<()> {
        self.add_child_monitor_check(group, child)?;
        self.link_child_monitor(group, child);
        Ok(())
    }

    pub fn delete_child_monitor_check(&self, group: MonitorId, child: MonitorId) -> Result<()> {
        self.group(group)?;
        let c = self
            .monitors
            .get(child)
            .ok_or(SolutionError::NoSuchMonitor(child))?;
        if c.parent != Some(group) {
            return Err(SolutionError::MonitorNotChild { group, child });
        }
        Ok(())
    }

    pub fn delete_child_monitor(&mut self, group: MonitorId, child: MonitorId) -> Result<()> {
        self.delete_child_monitor_check(group, child)?;
        self.unlink_child_monitor(group, child);
        Ok(())
    }

    /// Deletes an empty group monitor, first removing it from its parent.
    pub fn delete_group_monitor(&mut self, g: MonitorId) -> Result<()> {
        if g == ROOT_MONITOR {
            return Err(SolutionError::RootMonitor);
        }
        if !self.group(g)?.children.is_empty() {
            return Err(SolutionError::GroupNotEmpty(g));
        }
        if let Some(parent) = self.monitors[g].parent {
            self.unlink_child_monitor(parent, g);
        }
        self.monitors.remove(g);
        debug!(event = "group_monitor_deleted", monitor = %g);
        Ok(())
    }

    pub(crate) fn link_child_monitor(&mut self, group: MonitorId, child: MonitorId) {
        self.group_mut(group).children.push(child);
        self.monitors[child].parent = Some(group);
        let cost = self.monitors[child].cost;
        if !cost.is_zero() {
            let index = self.group_mut(group).push_defect(child);
            self.monitors[child].defect_index = Some(index);
            let new = self.monitors[group].cost + cost;
            self.change_cost(group, new);
        }
    }

    fn unlink_child_monitor(&mut self, group: MonitorId, child: MonitorId) {
        let cost = self.monitors[child].cost;
        if !cost.is_zero() {
            self.remove_defect(group, child);
        }
        let children = &mut self.group_mut(group).children;
        let pos = children
            .iter()
            .position(|&c| c == child)
            .unwrap_or_else(|| panic!("{} missing from the children of {}", child, group));
        children.remove(pos);
        self.monitors[child].parent = None;
        if !cost.is_zero() {
            let new = self.monitors[group].cost - cost;
            self.change_cost(group, new);
        }
    }

    /// Children of `group` with non-zero cost, in no particular order.
    pub fn defects(&self, group: MonitorId) -> Result<&[MonitorId]> {
        Ok(self.group(group)?.defects())
    }

    /// An owned copy of the defect list, safe to hold across edits.
    pub fn defects_snapshot(&self, group: MonitorId) -> Result<Vec<MonitorId>> {
        Ok(self.group(group)?.defects().to_vec())
    }

    /// Rebuilds the defect list of `group` from its children's costs.
    pub fn recompute_defects(&mut self, group: MonitorId) -> Result<()> {
        let children = self.group(group)?.children.clone();
        self.group_mut(group).defects.clear();
        for child in children {
            if self.monitors[child].cost.is_zero() {
                self.monitors[child].defect_index = None;
            } else {
                let index = self.group_mut(group).push_defect(child);
                self.monitors[child].defect_index = Some(index);
            }
        }
        Ok(())
    }
}
