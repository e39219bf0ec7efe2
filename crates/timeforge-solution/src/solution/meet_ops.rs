//! Meet edits: make, delete, assign, split, merge and domains.
//!
//! # Domain rule
//!
//! Let `A` be the nearest ancestor-or-self of a meet's target with an
//! explicit domain, and `c` the offset at which the meet would sit inside
//! `A`. The meet fits if every start time `t` of `A` with `t + c` inside the
//! cycle gives a start `t + c` the meet allows: its explicit domain contains
//! it, or, for an automatic meet, every child fits at its own offset. A meet
//! with no explicit ancestor anywhere above it always fits.

use std::sync::Arc;

use smallvec::SmallVec;
use timeforge_core::{EventId, TimeGroup};
use tracing::{info, trace};

use super::Solution;
use crate::error::{Result, SolutionError};
use crate::ids::{MeetId, TaskId};
use crate::meet::Meet;
use crate::task::{pair_tasks, tail_workload, Task};
use crate::transaction::{MeetRecord, Operation, SplitRecord, TaskPair};

impl Solution {
    // ------------------------------------------------------------------
    // Tree navigation
    // ------------------------------------------------------------------

    /// The root of the tree holding `meet`, and `meet`'s offset within it.
    pub fn meet_root(&self, meet: MeetId) -> (MeetId, usize) {
        let mut current = meet;
        let mut offset = 0;
        while let Some((target, o)) = self.meets[current].target {
            offset += o;
            current = target;
        }
        (current, offset)
    }

    /// Returns true if `ancestor` is `meet` or lies above it.
    pub fn meet_is_ancestor(&self, ancestor: MeetId, meet: MeetId) -> bool {
        let mut current = Some(meet);
        while let Some(m) = current {
            if m == ancestor {
                return true;
            }
            current = self.meets[m].target.map(|(t, _)| t);
        }
        false
    }

    /// The cycle meet covering `time`, and the offset of `time` within it.
    ///
    /// # Panics
    /// Panics if `time` lies outside the cycle.
    pub fn cycle_meet_at(&self, time: usize) -> (MeetId, usize) {
        assert!(
            time < self.instance.cycle_len(),
            "time {} outside a cycle of {}",
            time,
            self.instance.cycle_len()
        );
        let i = self
            .cycle_meets
            .partition_point(|&c| self.meets[c].assigned_time.is_some_and(|s| s <= time));
        let cycle = self.cycle_meets[i - 1];
        let start = self.meets[cycle].assigned_time.unwrap_or(0);
        (cycle, time - start)
    }

    /// The nearest meet at or above `meet` with an explicit domain, with the
    /// offset that `offset` within `meet` has inside it.
    pub(crate) fn nearest_explicit(
        &self,
        meet: MeetId,
        offset: usize,
    ) -> Option<(&Arc<TimeGroup>, usize)> {
        let mut current = meet;
        let mut offset = offset;
        loop {
            let m = &self.meets[current];
            if let Some(d) = &m.domain {
                return Some((d, offset));
            }
            let (target, o) = m.target?;
            offset += o;
            current = target;
        }
    }

    /// Domain rule for `meet` placed at offset `c` of a meet whose explicit
    /// domain is `outer`.
    pub(crate) fn fits_under(&self, meet: MeetId, outer: &TimeGroup, c: usize) -> bool {
        let m = &self.meets[meet];
        match &m.domain {
            Some(d) => outer.is_subset_shifted(c as isize, d),
            None => m.children.iter().all(|&ch| {
                let (_, o) = self.child_offset(ch);
                self.fits_under(ch, outer, c + o)
            }),
        }
    }

    /// Domain rule for `meet` placed at `offset` of `owner`.
    pub(crate) fn fits_in_context(&self, meet: MeetId, owner: MeetId, offset: usize) -> bool {
        match self.nearest_explicit(owner, offset) {
            Some((outer, c)) => self.fits_under(meet, outer, c),
            None => true,
        }
    }

    pub(crate) fn child_offset(&self, child: MeetId) -> (MeetId, usize) {
        self.meets[child]
            .target
            .unwrap_or_else(|| panic!("{} listed as a child but unassigned", child))
    }

    /// The domain a meet effectively has: its explicit domain, or the
    /// intersection of the domains of its nearest explicit descendants,
    /// shifted to its own start.
    pub fn descendants_domain(&self, meet: MeetId) -> Arc<TimeGroup> {
        if let Some(d) = &self.meets[meet].domain {
            return Arc::clone(d);
        }
        let mut found: Vec<Arc<TimeGroup>> = Vec::new();
        self.collect_explicit_below(meet, 0, &mut found);
        match found.as_slice() {
            [] => Arc::clone(self.instance.full_time_group()),
            [only] => Arc::clone(only),
            [a, b, rest @ ..] => {
                let mut acc = a.intersection(b);
                for g in rest {
                    acc = acc.intersection(g);
                }
                Arc::new(acc)
            }
        }
    }

    fn collect_explicit_below(&self, meet: MeetId, offset: usize, found: &mut Vec<Arc<TimeGroup>>) {
        for &ch in &self.meets[meet].children {
            let (_, o) = self.child_offset(ch);
            let o = offset + o;
            match &self.meets[ch].domain {
                Some(d) => {
                    let shifted = d.neighbour(-(o as isize));
                    if !found.iter().any(|g| g.same_times(&shifted)) {
                        found.push(shifted);
                    }
                }
                None => self.collect_explicit_below(ch, o, found),
            }
        }
    }

    // ------------------------------------------------------------------
    // Make and delete
    // ------------------------------------------------------------------

    pub fn make_meet_check(
        &self,
        duration: usize,
        domain: Option<&Arc<TimeGroup>>,
        event: Option<EventId>,
    ) -> Result<()> {
        if duration == 0 {
            return Err(SolutionError::ZeroDuration);
        }
        if let Some(d) = domain {
            self.check_cycle(d)?;
        }
        if let Some(e) = event {
            if e.index() >= self.instance.event_count() {
                return Err(SolutionError::NoSuchEvent(e));
            }
        }
        Ok(())
    }

    /// Creates an unassigned meet.
    ///
    /// A meet derived from an event always has an explicit domain; passing
    /// `None` with an event gives it the full time group.
    pub fn make_meet(
        &mut self,
        duration: usize,
        domain: Option<Arc<TimeGroup>>,
        event: Option<EventId>,
    ) -> Result<MeetId> {
        self.make_meet_check(duration, domain.as_ref(), event)
            .inspect_err(|e| trace!(event = "edit_rejected", op = "meet_make", error = %e))?;
        let domain = match (domain, event) {
            (None, Some(_)) => Some(Arc::clone(self.instance.full_time_group())),
            (domain, _) => domain,
        };
        let meet = self.insert_bare_meet(None, Meet::new(duration, domain, event, 0));
        self.after_edit();
        Ok(meet)
    }

    pub(crate) fn check_cycle(&self, domain: &TimeGroup) -> Result<()> {
        let expected = self.instance.cycle_len();
        if domain.cycle_len() != expected {
            return Err(SolutionError::ForeignTimeGroup {
                expected,
                found: domain.cycle_len(),
            });
        }
        Ok(())
    }

    /// Stores a bare meet, at `slot` if given, and gives it fresh chunks.
    pub(crate) fn insert_bare_meet(&mut self, slot: Option<MeetId>, meet: Meet) -> MeetId {
        let event = meet.event;
        let duration = meet.duration;
        let id = match slot {
            Some(slot) => {
                self.meets.insert_at(slot, meet);
                slot
            }
            None => self.meets.insert(meet),
        };
        self.allocate_chunks(id);
        if let Some(e) = event {
            self.event_meets[e.index()].push(id);
        }
        self.meet_view(id, true);
        let record = self.meet_record(id);
        self.journal(|| Operation::MeetMake(record));
        if let Some(e) = event {
            self.event_attach_check(e);
        }
        trace!(event = "meet_make", meet = %id, duration);
        id
    }

    /// One supply chunk per offset, and one demand chunk based on it.
    pub(crate) fn allocate_chunks(&mut self, meet: MeetId) {
        let duration = self.meets[meet].duration;
        for i in 0..duration {
            let s = self.matching.make_supply_chunk(meet, i);
            let d = self.matching.make_demand_chunk(meet, i, s, SmallVec::new());
            let m = &mut self.meets[meet];
            m.supply_chunks.push(s);
            m.demand_chunks.push(d);
        }
    }

    pub(crate) fn meet_record(&self, meet: MeetId) -> MeetRecord {
        let m = &self.meets[meet];
        MeetRecord {
            meet,
            duration: m.duration,
            domain: m.domain.clone(),
            event: m.event,
            event_offset: m.event_offset,
            back_ref: m.back_ref,
            zones: m.zones.clone(),
        }
    }

    pub fn delete_meet_check(&self, meet: MeetId) -> Result<()> {
        if self.live_meet(meet)?.is_cycle_meet() {
            return Err(SolutionError::CycleMeet(meet));
        }
        Ok(())
    }

    /// Deletes a meet: its children and the meet itself are unassigned, its
    /// tasks deleted and it leaves its node first, each step journaled.
    pub fn delete_meet(&mut self, meet: MeetId) -> Result<()> {
        self.delete_meet_check(meet)
            .inspect_err(|e| trace!(event = "edit_rejected", op = "meet_delete", error = %e))?;
        let children = self.meets[meet].children.clone();
        for child in children {
            self.unassign_unchecked(child);
        }
        if self.meets[meet].target.is_some() {
            self.unassign_unchecked(meet);
        }
        let tasks = self.meets[meet].tasks.clone();
        for task in tasks {
            if self.tasks[task].resource.is_some() {
                self.unassign_resource_unchecked(task);
            }
            self.delete_task_unchecked(task);
        }
        if let Some(node) = self.meets[meet].node {
            self.node_delete_meet_unchecked(node, meet);
        }
        self.delete_bare_meet(meet);
        self.after_edit();
        Ok(())
    }

    /// Removes a meet with no tasks, children, target or node.
    pub(crate) fn delete_bare_meet(&mut self, meet: MeetId) {
        let m = &self.meets[meet];
        assert!(
            m.tasks.is_empty() && m.children.is_empty() && m.target.is_none() && m.node.is_none(),
            "{} is not bare",
            meet
        );
        self.meet_view(meet, false);
        let record = self.meet_record(meet);
        let m = self.meets.remove(meet);
        for s in m.supply_chunks {
            self.matching.free_supply_chunk(s);
        }
        for d in m.demand_chunks {
            self.matching.delete_demand_chunk(d);
        }
        if let Some(e) = m.event {
            swap_remove_item(&mut self.event_meets[e.index()], meet, "event meets");
        }
        self.journal(|| Operation::MeetDelete(record));
        if let Some(e) = m.event {
            self.event_attach_check(e);
        }
        trace!(event = "meet_delete", meet = %meet);
    }

    // ------------------------------------------------------------------
    // Assign and unassign
    // ------------------------------------------------------------------

    pub fn assign_check(&self, meet: MeetId, target: MeetId, offset: usize) -> Result<()> {
        let m = self.live_meet(meet)?;
        let t = self.live_meet(target)?;
        if m.is_cycle_meet() {
            return Err(SolutionError::CycleMeet(meet));
        }
        if m.target.is_some() {
            return Err(SolutionError::MeetAssigned(meet));
        }
        if self.meet_is_ancestor(meet, target) {
            return Err(SolutionError::AssignmentCycle { meet, target });
        }
        if offset + m.duration > t.duration {
            return Err(SolutionError::OffsetOutOfRange {
                meet,
                target,
                offset,
            });
        }
        if let Some(node) = m.node {
            match self.nodes[node].parent {
                None => return Err(SolutionError::NodeHasNoParent { meet, node }),
                Some(parent) if t.node != Some(parent) => {
                    return Err(SolutionError::TargetOutsideParentNode { meet, target })
                }
                Some(_) => {}
            }
        }
        if !self.fits_in_context(meet, target, offset) {
            return Err(SolutionError::DomainMismatch(meet));
        }
        Ok(())
    }

    /// Assigns `meet` to `target` at `offset`.
    pub fn assign(&mut self, meet: MeetId, target: MeetId, offset: usize) -> Result<()> {
        self.assign_check(meet, target, offset)
            .inspect_err(|e| trace!(event = "edit_rejected", op = "meet_assign", error = %e))?;
        self.assign_unchecked(meet, target, offset);
        self.after_edit();
        Ok(())
    }

    pub(crate) fn assign_unchecked(&mut self, meet: MeetId, target: MeetId, offset: usize) {
        self.meets[meet].target = Some((target, offset));
        self.meets[target].children.push(meet);
        let demand = self.meets[meet].all_demand;
        self.add_demand_upwards(target, demand as isize);
        if let Some(time) = self.meets[target].assigned_time {
            self.set_time_recursive(meet, Some(time + offset));
        }
        if self.matching.needs_root_bases() {
            let (root, root_offset) = self.meet_root(meet);
            self.rebase_subtree(meet, root, root_offset);
        }
        self.journal(|| Operation::MeetAssign {
            meet,
            target,
            offset,
        });
        trace!(event = "meet_assign", meet = %meet, target = %target, offset);
    }

    pub fn unassign_check(&self, meet: MeetId) -> Result<()> {
        if self.live_meet(meet)?.target.is_none() {
            return Err(SolutionError::MeetNotAssigned(meet));
        }
        Ok(())
    }

    pub fn unassign(&mut self, meet: MeetId) -> Result<()> {
        self.unassign_check(meet)
            .inspect_err(|e| trace!(event = "edit_rejected", op = "meet_unassign", error = %e))?;
        self.unassign_unchecked(meet);
        self.after_edit();
        Ok(())
    }

    pub(crate) fn unassign_unchecked(&mut self, meet: MeetId) {
        let (target, offset) = self.child_offset(meet);
        if self.meets[meet].assigned_time.is_some() {
            self.set_time_recursive(meet, None);
        }
        let demand = self.meets[meet].all_demand;
        self.add_demand_upwards(target, -(demand as isize));
        swap_remove_item(&mut self.meets[target].children, meet, "children");
        self.meets[meet].target = None;
        if self.matching.needs_root_bases() {
            self.rebase_subtree(meet, meet, 0);
        }
        self.journal(|| Operation::MeetUnassign {
            meet,
            target,
            offset,
        });
        trace!(event = "meet_unassign", meet = %meet, target = %target);
    }

    pub fn assign_time_check(&self, meet: MeetId, time: usize) -> Result<()> {
        let duration = self.live_meet(meet)?.duration;
        let (cycle, offset) = self.covering_cycle_meet(time, duration)?;
        self.assign_check(meet, cycle, offset)
    }

    /// Assigns `meet` to the cycle meet covering `time`.
    pub fn assign_time(&mut self, meet: MeetId, time: usize) -> Result<()> {
        self.assign_time_check(meet, time)
            .inspect_err(|e| trace!(event = "edit_rejected", op = "meet_assign_time", error = %e))?;
        let duration = self.meets[meet].duration;
        let (cycle, offset) = self.covering_cycle_meet(time, duration)?;
        self.assign_unchecked(meet, cycle, offset);
        self.after_edit();
        Ok(())
    }

    fn covering_cycle_meet(&self, time: usize, duration: usize) -> Result<(MeetId, usize)> {
        if time >= self.instance.cycle_len() {
            return Err(SolutionError::TimeNotCovered { time, duration });
        }
        let (cycle, offset) = self.cycle_meet_at(time);
        if offset + duration > self.meets[cycle].duration {
            return Err(SolutionError::TimeNotCovered { time, duration });
        }
        Ok((cycle, offset))
    }

    /// Sets the cached time of a subtree, moving it through the monitors.
    fn set_time_recursive(&mut self, meet: MeetId, time: Option<usize>) {
        self.meet_view(meet, false);
        for i in 0..self.meets[meet].tasks.len() {
            let task = self.meets[meet].tasks[i];
            self.task_timetable(task, false);
        }
        self.meets[meet].assigned_time = time;
        self.meet_view(meet, true);
        for i in 0..self.meets[meet].tasks.len() {
            let task = self.meets[meet].tasks[i];
            self.task_timetable(task, true);
        }
        for i in 0..self.meets[meet].children.len() {
            let child = self.meets[meet].children[i];
            let (_, o) = self.child_offset(child);
            self.set_time_recursive(child, time.map(|t| t + o));
        }
    }

    /// Bases the demand chunks of a subtree on the supply chunks of `root`.
    fn rebase_subtree(&mut self, meet: MeetId, root: MeetId, offset: usize) {
        for i in 0..self.meets[meet].duration {
            let d = self.meets[meet].demand_chunks[i];
            let s = self.meets[root].supply_chunks[offset + i];
            self.matching.set_base(d, s);
        }
        for i in 0..self.meets[meet].children.len() {
            let child = self.meets[meet].children[i];
            let (_, o) = self.child_offset(child);
            self.rebase_subtree(child, root, offset + o);
        }
    }

    pub(crate) fn add_demand_upwards(&mut self, start: MeetId, delta: isize) {
        let mut current = Some(start);
        while let Some(m) = current {
            let meet = &mut self.meets[m];
            meet.all_demand = meet
                .all_demand
                .checked_add_signed(delta)
                .unwrap_or_else(|| panic!("all_demand of {} below zero", m));
            current = meet.target.map(|(t, _)| t);
        }
    }

    fn recompute_all_demand(&mut self, meet: MeetId) {
        let m = &self.meets[meet];
        let below: usize = m.children.iter().map(|&c| self.meets[c].all_demand).sum();
        let total = m.own_demand() + below;
        self.meets[meet].all_demand = total;
    }

    // ------------------------------------------------------------------
    // Split
    // ------------------------------------------------------------------

    /// Checks that `meet` can be split at `at`.
    ///
    /// Without `recursive`, no child may straddle `at`. With it, every
    /// straddling child must itself be splittable at the matching offset.
    pub fn split_check(&self, meet: MeetId, at: usize, recursive: bool) -> Result<()> {
        if self.live_meet(meet)?.is_cycle_meet() {
            return Err(SolutionError::CycleMeet(meet));
        }
        self.split_check_inner(meet, at, recursive)
    }

    fn split_check_inner(&self, meet: MeetId, at: usize, recursive: bool) -> Result<()> {
        let m = &self.meets[meet];
        if at == 0 || at >= m.duration {
            return Err(SolutionError::InvalidSplitOffset { meet, offset: at });
        }
        for &child in &m.children {
            let (_, o) = self.child_offset(child);
            if o < at && at < o + self.meets[child].duration {
                if !recursive {
                    return Err(SolutionError::StraddlingChild {
                        meet,
                        child,
                        offset: at,
                    });
                }
                self.split_check_inner(child, at - o, true)?;
            }
        }
        Ok(())
    }

    /// Splits `meet` at `at`, returning the new meet covering the tail.
    pub fn split(&mut self, meet: MeetId, at: usize, recursive: bool) -> Result<MeetId> {
        self.split_check(meet, at, recursive)
            .inspect_err(|e| trace!(event = "edit_rejected", op = "meet_split", error = %e))?;
        let second = self.split_recursive_unchecked(meet, at);
        self.after_edit();
        Ok(second)
    }

    fn split_recursive_unchecked(&mut self, meet: MeetId, at: usize) -> MeetId {
        let straddling: Vec<(MeetId, usize)> = self.meets[meet]
            .children
            .iter()
            .map(|&c| (c, self.child_offset(c).1))
            .filter(|&(c, o)| o < at && at < o + self.meets[c].duration)
            .collect();
        for (child, o) in straddling {
            self.split_recursive_unchecked(child, at - o);
        }
        self.split_unchecked(meet, at, None)
    }

    /// Splits the cycle meet covering `time` so that one starts at `time`.
    ///
    /// Returns the cycle meet starting at `time`. Refused while an assigned
    /// meet straddles `time`.
    pub fn split_cycle_meet(&mut self, time: usize) -> Result<MeetId> {
        if time >= self.instance.cycle_len() {
            return Err(SolutionError::TimeNotCovered { time, duration: 1 });
        }
        let (cycle, offset) = self.cycle_meet_at(time);
        if offset == 0 {
            return Ok(cycle);
        }
        self.split_check_inner(cycle, offset, false)?;
        let second = self.split_unchecked(cycle, offset, None);
        self.after_edit();
        Ok(second)
    }

    /// Splits one meet. With a record, the new meet and tasks take the
    /// recorded slots, domain, event offset and workloads.
    pub(crate) fn split_unchecked(
        &mut self,
        meet: MeetId,
        at: usize,
        record: Option<&SplitRecord>,
    ) -> MeetId {
        self.meet_view(meet, false);
        for i in 0..self.meets[meet].tasks.len() {
            let task = self.meets[meet].tasks[i];
            self.task_view(task, false);
        }

        let moving: Vec<MeetId> = self.meets[meet]
            .children
            .iter()
            .copied()
            .filter(|&c| self.child_offset(c).1 >= at)
            .collect();

        let first = &mut self.meets[meet];
        let duration = first.duration;
        let was_cycle = first.is_cycle_meet();
        let second_domain = match record {
            Some(r) => r.second_domain.clone(),
            None => first.domain.as_ref().map(|d| d.neighbour(at as isize)),
        };
        let second_event_offset = record.map_or(first.event_offset + at, |r| r.second_event_offset);
        let mut second = Meet::new(duration - at, second_domain.clone(), first.event, second_event_offset);
        second.back_ref = first.back_ref;
        second.target = first.target.map(|(t, o)| (t, o + at));
        second.assigned_time = first.assigned_time.map(|t| t + at);
        second.node = first.node;
        second.visit_num = first.visit_num;
        second.zones = first.zones.split_off(at);
        second.supply_chunks = first.supply_chunks.split_off(at);
        second.demand_chunks = first.demand_chunks.split_off(at);
        first.duration = at;
        first.children.retain(|c| !moving.contains(c));
        let (event, target, node) = (first.event, first.target, first.node);

        let second_id = match record {
            Some(r) => {
                self.meets.insert_at(r.second, second);
                r.second
            }
            None => self.meets.insert(second),
        };

        for &child in &moving {
            let (_, o) = self.child_offset(child);
            self.meets[child].target = Some((second_id, o - at));
        }
        self.meets[second_id].children = moving;
        for (i, &s) in self.meets[second_id].supply_chunks.iter().enumerate() {
            self.matching.move_supply_chunk(s, second_id, i);
        }
        for (i, &d) in self.meets[second_id].demand_chunks.iter().enumerate() {
            self.matching.move_demand_chunk(d, second_id, i);
        }

        if let Some((t, _)) = target {
            self.meets[t].children.push(second_id);
        }
        if let Some(n) = node {
            self.nodes[n].meets.push(second_id);
        }
        if let Some(e) = event {
            self.event_meets[e.index()].push(second_id);
        }
        if was_cycle {
            let pos = self
                .cycle_meets
                .iter()
                .position(|&c| c == meet)
                .unwrap_or_else(|| panic!("{} missing from the cycle meets", meet));
            self.cycle_meets.insert(pos + 1, second_id);
        }

        // A replayed split pairs tasks by handle: undo may have reordered
        // the first meet's task list since the record was taken.
        let plan: Vec<(TaskId, Option<TaskId>, u64)> = match record {
            Some(r) => {
                let current = &self.meets[meet].tasks;
                assert_eq!(
                    r.tasks.len(),
                    current.len(),
                    "split record out of step with {}",
                    meet
                );
                for pair in &r.tasks {
                    assert!(
                        current.contains(&pair.first),
                        "split record names {}, not a task of {}",
                        pair.first,
                        meet
                    );
                }
                r.tasks
                    .iter()
                    .map(|p| (p.first, Some(p.second), p.second_workload))
                    .collect()
            }
            None => self.meets[meet]
                .tasks
                .iter()
                .map(|&t| {
                    let w = tail_workload(self.tasks[t].workload, duration, duration - at);
                    (t, None, w)
                })
                .collect(),
        };
        let mut pairs = Vec::with_capacity(plan.len());
        for (t, slot, second_workload) in plan {
            let task = &self.tasks[t];
            let tail = Task {
                meet: second_id,
                event_resource: task.event_resource,
                domain: task.domain,
                resource: task.resource,
                workload: second_workload,
            };
            self.tasks[t].workload -= second_workload;
            let event_resource = tail.event_resource;
            let t2 = match slot {
                Some(slot) => {
                    self.tasks.insert_at(slot, tail);
                    slot
                }
                None => self.tasks.insert(tail),
            };
            self.meets[second_id].tasks.push(t2);
            if let Some(er) = event_resource {
                self.event_resource_tasks[er.index()].push(t2);
            }
            pairs.push(TaskPair {
                first: t,
                second: t2,
                second_workload,
            });
        }

        self.recompute_all_demand(meet);
        self.recompute_all_demand(second_id);
        self.refresh_demand_domains(second_id);

        for m in [meet, second_id] {
            self.meet_view(m, true);
            for i in 0..self.meets[m].tasks.len() {
                let task = self.meets[m].tasks[i];
                self.task_view(task, true);
            }
        }

        let record = SplitRecord {
            first: meet,
            second: second_id,
            at,
            second_domain,
            second_event_offset,
            tasks: pairs,
        };
        self.journal(|| Operation::MeetSplit(record));
        if let Some(e) = event {
            self.event_attach_check(e);
        }
        trace!(event = "meet_split", meet = %meet, second = %second_id, at);
        second_id
    }

    // ------------------------------------------------------------------
    // Merge
    // ------------------------------------------------------------------

    pub fn merge_check(&self, meet1: MeetId, meet2: MeetId) -> Result<()> {
        self.merge_plan(meet1, meet2).map(|_| ())
    }

    /// Merges two adjacent meets, returning the surviving (earlier) one.
    pub fn merge(&mut self, meet1: MeetId, meet2: MeetId) -> Result<MeetId> {
        let record = self
            .merge_plan(meet1, meet2)
            .inspect_err(|e| trace!(event = "edit_rejected", op = "meet_merge", error = %e))?;
        self.merge_unchecked(&record);
        self.after_edit();
        Ok(record.first)
    }

    /// Checks a merge and describes it as the split it undoes.
    fn merge_plan(&self, meet1: MeetId, meet2: MeetId) -> Result<SplitRecord> {
        if meet1 == meet2 {
            return Err(SolutionError::MergeSameMeet(meet1));
        }
        let a = self.live_meet(meet1)?;
        let b = self.live_meet(meet2)?;
        if a.back_ref != b.back_ref {
            return Err(SolutionError::MergeBackRefMismatch(meet1, meet2));
        }
        if a.event != b.event {
            return Err(SolutionError::MergeEventMismatch(meet1, meet2));
        }
        if a.is_cycle_meet() != b.is_cycle_meet() {
            return Err(SolutionError::MergeCycleMismatch(meet1, meet2));
        }

        let not_adjacent = SolutionError::MergeNotAdjacent(meet1, meet2);
        let (first, second) = if a.is_cycle_meet() {
            let (ta, tb) = (a.assigned_time, b.assigned_time);
            let (f, s) = if ta < tb { (meet1, meet2) } else { (meet2, meet1) };
            let (fm, sm) = (&self.meets[f], &self.meets[s]);
            if fm.assigned_time.map(|t| t + fm.duration) != sm.assigned_time {
                return Err(not_adjacent);
            }
            (f, s)
        } else {
            match (a.target, b.target) {
                (Some((ta, oa)), Some((tb, ob))) => {
                    if ta != tb {
                        return Err(not_adjacent);
                    }
                    let (f, s) = if oa < ob { (meet1, meet2) } else { (meet2, meet1) };
                    let (fo, so) = (oa.min(ob), oa.max(ob));
                    if fo + self.meets[f].duration != so {
                        return Err(not_adjacent);
                    }
                    (f, s)
                }
                (None, None) => {
                    if b.event_offset < a.event_offset {
                        (meet2, meet1)
                    } else {
                        (meet1, meet2)
                    }
                }
                _ => return Err(not_adjacent),
            }
        };

        let (f, s) = (&self.meets[first], &self.meets[second]);
        if f.node != s.node {
            return Err(SolutionError::MergeNodeMismatch(meet1, meet2));
        }
        let first_tasks: Vec<&Task> = f.tasks.iter().map(|&t| &self.tasks[t]).collect();
        let second_tasks: Vec<&Task> = s.tasks.iter().map(|&t| &self.tasks[t]).collect();
        let pairing = pair_tasks(&first_tasks, &second_tasks)
            .ok_or(SolutionError::MergeTasksMismatch(meet1, meet2))?;
        for &child in &s.children {
            let (_, o) = self.child_offset(child);
            if !self.fits_in_context(child, first, f.duration + o) {
                return Err(SolutionError::DomainMismatch(second));
            }
        }

        Ok(SplitRecord {
            first,
            second,
            at: f.duration,
            second_domain: s.domain.clone(),
            second_event_offset: s.event_offset,
            tasks: pairing
                .iter()
                .enumerate()
                .map(|(i, &j)| TaskPair {
                    first: f.tasks[i],
                    second: s.tasks[j],
                    second_workload: second_tasks[j].workload,
                })
                .collect(),
        })
    }

    /// Merges `record.second` into `record.first`.
    pub(crate) fn merge_unchecked(&mut self, record: &SplitRecord) {
        let (first, second, at) = (record.first, record.second, record.at);
        assert_eq!(self.meets[first].duration, at, "merge record out of step with {}", first);

        for m in [first, second] {
            self.meet_view(m, false);
            for i in 0..self.meets[m].tasks.len() {
                let task = self.meets[m].tasks[i];
                self.task_view(task, false);
            }
        }

        for pair in &record.tasks {
            let tail = self.tasks.remove(pair.second);
            assert_eq!(
                tail.workload, pair.second_workload,
                "workload of {} changed since the split",
                pair.second
            );
            self.tasks[pair.first].workload += tail.workload;
            if let Some(er) = tail.event_resource {
                swap_remove_item(
                    &mut self.event_resource_tasks[er.index()],
                    pair.second,
                    "event resource tasks",
                );
            }
        }

        let s = self.meets.remove(second);
        if let Some((t, _)) = s.target {
            swap_remove_item(&mut self.meets[t].children, second, "children");
        }
        if let Some(n) = s.node {
            swap_remove_item(&mut self.nodes[n].meets, second, "node meets");
        }
        if let Some(e) = s.event {
            swap_remove_item(&mut self.event_meets[e.index()], second, "event meets");
        }
        if s.is_cycle_meet() {
            self.cycle_meets.retain(|&c| c != second);
        }
        for (i, &c) in s.supply_chunks.iter().enumerate() {
            self.matching.move_supply_chunk(c, first, at + i);
        }
        for (i, &c) in s.demand_chunks.iter().enumerate() {
            self.matching.move_demand_chunk(c, first, at + i);
        }
        for &child in &s.children {
            let (_, o) = self.child_offset(child);
            self.meets[child].target = Some((first, o + at));
        }

        let f = &mut self.meets[first];
        f.duration += s.duration;
        f.zones.extend(s.zones);
        f.supply_chunks.extend(s.supply_chunks);
        f.demand_chunks.extend(s.demand_chunks);
        f.children.extend(s.children);
        let event = f.event;
        self.recompute_all_demand(first);
        self.refresh_demand_domains(first);

        self.meet_view(first, true);
        for i in 0..self.meets[first].tasks.len() {
            let task = self.meets[first].tasks[i];
            self.task_view(task, true);
        }

        self.journal(|| Operation::MeetMerge(record.clone()));
        if let Some(e) = event {
            self.event_attach_check(e);
        }
        trace!(event = "meet_merge", meet = %first, second = %second);
    }

    // ------------------------------------------------------------------
    // Domains
    // ------------------------------------------------------------------

    pub fn set_domain_check(&self, meet: MeetId, domain: Option<&Arc<TimeGroup>>) -> Result<()> {
        let m = self.live_meet(meet)?;
        if m.is_cycle_meet() {
            return Err(SolutionError::CycleMeet(meet));
        }
        match domain {
            None => {
                if !m.tasks.is_empty() || m.event.is_some() {
                    return Err(SolutionError::AutomaticDomainNotAllowed(meet));
                }
                if let Some((target, offset)) = m.target {
                    for &child in &m.children {
                        let (_, o) = self.child_offset(child);
                        if !self.fits_in_context(child, target, offset + o) {
                            return Err(SolutionError::DomainMismatch(meet));
                        }
                    }
                }
            }
            Some(d) => {
                self.check_cycle(d)?;
                if let Some(e) = m.event {
                    if let Some(p) = self.instance.event(e).preassigned_time {
                        let time = p + m.event_offset;
                        if !d.contains(time) {
                            return Err(SolutionError::PreassignedTimeExcluded { meet, time });
                        }
                    }
                }
                if let Some((target, offset)) = m.target {
                    if let Some((outer, c)) = self.nearest_explicit(target, offset) {
                        if !outer.is_subset_shifted(c as isize, d) {
                            return Err(SolutionError::DomainMismatch(meet));
                        }
                    }
                }
                for &child in &m.children {
                    let (_, o) = self.child_offset(child);
                    if !self.fits_under(child, d, o) {
                        return Err(SolutionError::DomainMismatch(meet));
                    }
                }
            }
        }
        Ok(())
    }

    /// Replaces the domain of `meet`; `None` makes it automatic.
    pub fn set_domain(&mut self, meet: MeetId, domain: Option<Arc<TimeGroup>>) -> Result<()> {
        self.set_domain_check(meet, domain.as_ref())
            .inspect_err(|e| trace!(event = "edit_rejected", op = "meet_set_domain", error = %e))?;
        self.set_domain_unchecked(meet, domain);
        self.after_edit();
        Ok(())
    }

    pub(crate) fn set_domain_unchecked(&mut self, meet: MeetId, domain: Option<Arc<TimeGroup>>) {
        let old = std::mem::replace(&mut self.meets[meet].domain, domain.clone());
        self.journal(|| Operation::MeetSetDomain {
            meet,
            old,
            new: domain,
        });
        if let Some(e) = self.meets[meet].event {
            self.event_attach_check(e);
        }
        trace!(event = "meet_set_domain", meet = %meet);
    }

    // ------------------------------------------------------------------
    // Event meets
    // ------------------------------------------------------------------

    /// Creates one meet per event, with the event's domain and one task per
    /// event resource. Preassigned resources and times are assigned.
    pub fn make_event_meets(&mut self) -> Result<Vec<MeetId>> {
        let instance = Arc::clone(&self.instance);
        let mut made = Vec::with_capacity(instance.event_count());
        for (e, event) in instance.events() {
            let domain = event
                .domain
                .clone()
                .unwrap_or_else(|| Arc::clone(instance.full_time_group()));
            let meet = self.make_meet(event.duration, Some(domain), Some(e))?;
            for &er in event.event_resources() {
                let spec = instance.event_resource(er);
                let task = self.make_task(meet, Some(er), spec.domain)?;
                if let Some(r) = spec.preassigned_resource {
                    self.assign_resource(task, r)?;
                }
            }
            if let Some(time) = event.preassigned_time {
                self.assign_time(meet, time)?;
            }
            made.push(meet);
        }
        info!(
            event = "event_meets_made",
            meets = made.len(),
            tasks = self.tasks.len(),
            cost = %self.cost(),
        );
        Ok(made)
    }
}

/// Removes `item` from `list` by swapping in the last element.
pub(crate) fn swap_remove_item<T: PartialEq + Copy + std::fmt::Display>(
    list: &mut Vec<T>,
    item: T,
    what: &str,
) {
    let pos = list
        .iter()
        .position(|&x| x == item)
        .unwrap_or_else(|| panic!("{} missing from {}", item, what));
    list.swap_remove(pos);
}
