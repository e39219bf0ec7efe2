//! The solution: owner of every meet, task, node, monitor and chunk.
//!
//! Edits enter through the methods of [`Solution`]. Each public edit has a
//! paired `*_check` returning the reason it would be refused; the edit runs
//! the check first and mutates nothing when it fails. Internally every edit
//! is split into the check and an unchecked primitive that updates the
//! arenas, notifies monitors with the exact delta and journals itself into
//! the active transactions. Undo and redo replay those primitives.
//!
//! The methods are spread over several files by concern:
//!
//! - `meet_ops`: make, delete, assign, split, merge, domains
//! - `task_ops`: tasks and resource assignment
//! - `node_ops`: nodes and the node rule
//! - `monitor_ops`: routing deltas to monitors, cost propagation, groups
//! - `transaction_ops`: transactions, undo and redo
//! - `copy`: deep copy through [`SolutionCopier`]
//! - `invariants`: [`Solution::check_invariants`]

mod copy;
mod invariants;
mod meet_ops;
mod monitor_ops;
mod node_ops;
mod task_ops;
mod transaction_ops;

#[cfg(test)]
mod meet_tests;
#[cfg(test)]
mod monitor_tests;
#[cfg(test)]
mod split_tests;
#[cfg(test)]
mod transaction_tests;

pub use copy::SolutionCopier;
pub use monitor_ops::TagCost;

use std::sync::Arc;

use timeforge_config::SolutionConfig;
use timeforge_core::{ConstraintKind, Cost, EventId, EventResourceId, Instance, TimeGroup};
use tracing::{info, trace};

use crate::arena::Arena;
use crate::error::{Result, SolutionError};
use crate::ids::{BackRef, MeetId, MonitorId, NodeId, TaskId, TransactionId, ZoneId};
use crate::matching::ChunkMatching;
use crate::meet::Meet;
use crate::monitor::{
    AssignResourceMonitor, AssignTimeMonitor, AvoidClashesMonitor, ClusterBusyTimesMonitor,
    LimitBusyTimesMonitor, LimitWorkloadMonitor, Monitor, MonitorKind, PreferTimesMonitor,
};
use crate::node::Node;
use crate::task::Task;
use crate::timetable::Timetable;
use crate::transaction::{Operation, Transaction};

/// The solution's root group monitor.
pub const ROOT_MONITOR: MonitorId = MonitorId::new(0);

/// A mutable timetable with an incrementally maintained cost.
///
/// # Examples
///
/// ```
/// use timeforge_solution::Solution;
/// use timeforge_test::times::bare_instance;
///
/// let mut solution = Solution::new(bare_instance(6));
/// let lesson = solution.make_meet(2, None, None).unwrap();
/// let (cycle, _) = solution.cycle_meet_at(0);
///
/// solution.assign(lesson, cycle, 3).unwrap();
/// assert_eq!(solution.meet(lesson).assigned_time(), Some(3));
///
/// // A meet cannot hang over the end of its target.
/// let long = solution.make_meet(4, None, None).unwrap();
/// assert!(solution.assign_check(long, cycle, 3).is_err());
/// ```
#[derive(Debug)]
pub struct Solution {
    pub(crate) instance: Arc<Instance>,
    pub(crate) config: SolutionConfig,

    pub(crate) meets: Arena<MeetId, Meet>,
    pub(crate) tasks: Arena<TaskId, Task>,
    pub(crate) nodes: Arena<NodeId, Node>,
    pub(crate) monitors: Arena<MonitorId, Monitor>,
    pub(crate) transactions: Arena<TransactionId, Transaction>,
    pub(crate) active_transactions: Vec<TransactionId>,

    pub(crate) matching: ChunkMatching,
    pub(crate) timetable: Timetable,

    /// Cycle meets in time order.
    pub(crate) cycle_meets: Vec<MeetId>,
    pub(crate) event_meets: Vec<Vec<MeetId>>,
    pub(crate) event_resource_tasks: Vec<Vec<TaskId>>,

    pub(crate) event_monitors: Vec<Vec<MonitorId>>,
    pub(crate) event_resource_monitors: Vec<Vec<MonitorId>>,
    pub(crate) resource_monitors: Vec<Vec<MonitorId>>,

    pub(crate) global_visit: u64,
    pub(crate) zone_count: usize,
}

impl Solution {
    /// Creates a solution with the default configuration.
    pub fn new(instance: Arc<Instance>) -> Self {
        Self::with_config(instance, SolutionConfig::default())
    }

    /// Creates a solution: one cycle meet covering the whole cycle, and one
    /// monitor per point of application of every constraint, all children of
    /// the root group.
    pub fn with_config(instance: Arc<Instance>, config: SolutionConfig) -> Self {
        let cycle_len = instance.cycle_len();
        let mut solution = Self {
            config: config.clone(),
            meets: Arena::new(),
            tasks: Arena::new(),
            nodes: Arena::new(),
            monitors: Arena::new(),
            transactions: Arena::new(),
            active_transactions: Vec::new(),
            matching: ChunkMatching::new(config.matching.mode),
            timetable: Timetable::new(instance.resource_count(), cycle_len),
            cycle_meets: Vec::new(),
            event_meets: vec![Vec::new(); instance.event_count()],
            event_resource_tasks: vec![Vec::new(); instance.event_resource_count()],
            event_monitors: vec![Vec::new(); instance.event_count()],
            event_resource_monitors: vec![Vec::new(); instance.event_resource_count()],
            resource_monitors: vec![Vec::new(); instance.resource_count()],
            global_visit: 0,
            zone_count: 0,
            instance,
        };

        let root = solution.monitors.insert(Monitor::group("Solution"));
        debug_assert_eq!(root, ROOT_MONITOR);

        let domain = Arc::new(TimeGroup::singleton(cycle_len, 0));
        let mut cycle = Meet::new(cycle_len, Some(domain), None, 0);
        cycle.assigned_time = Some(0);
        let cycle = solution.meets.insert(cycle);
        solution.allocate_chunks(cycle);
        solution.cycle_meets.push(cycle);

        solution.make_constraint_monitors();

        info!(
            event = "solution_created",
            instance = solution.instance.name(),
            times = cycle_len,
            monitors = solution.monitors.len(),
            matching = ?solution.matching.mode(),
        );
        solution
    }

    fn make_constraint_monitors(&mut self) {
        let instance = Arc::clone(&self.instance);
        for (c, constraint) in instance.constraints() {
            let spec = constraint.cost;
            match &constraint.kind {
                ConstraintKind::AssignTime { events } => {
                    for &e in events {
                        let kind = MonitorKind::AssignTime(AssignTimeMonitor::new(e));
                        let m = self.add_constraint_monitor(Monitor::for_constraint(c, spec, kind));
                        self.event_monitors[e.index()].push(m);
                    }
                }
                ConstraintKind::PreferTimes { events, domain } => {
                    for &e in events {
                        let kind = MonitorKind::PreferTimes(PreferTimesMonitor::new(
                            e,
                            Arc::clone(domain),
                        ));
                        let m = self.add_constraint_monitor(Monitor::for_constraint(c, spec, kind));
                        self.event_monitors[e.index()].push(m);
                    }
                }
                ConstraintKind::AssignResource { event_resources } => {
                    for &er in event_resources {
                        let kind = MonitorKind::AssignResource(AssignResourceMonitor::new(er));
                        let m = self.add_constraint_monitor(Monitor::for_constraint(c, spec, kind));
                        self.event_resource_monitors[er.index()].push(m);
                    }
                }
                ConstraintKind::AvoidClashes { resources } => {
                    for &r in resources {
                        let kind = MonitorKind::AvoidClashes(AvoidClashesMonitor::new(r));
                        let m = self.add_constraint_monitor(Monitor::for_constraint(c, spec, kind));
                        self.resource_monitors[r.index()].push(m);
                    }
                }
                ConstraintKind::LimitBusyTimes {
                    resources,
                    time_groups,
                    minimum,
                    maximum,
                } => {
                    for &r in resources {
                        let kind = MonitorKind::LimitBusyTimes(LimitBusyTimesMonitor::new(
                            r,
                            time_groups.clone(),
                            *minimum,
                            *maximum,
                        ));
                        let m = self.add_constraint_monitor(Monitor::for_constraint(c, spec, kind));
                        self.resource_monitors[r.index()].push(m);
                    }
                }
                ConstraintKind::ClusterBusyTimes {
                    resources,
                    time_groups,
                    minimum,
                    maximum,
                } => {
                    for &r in resources {
                        let kind = MonitorKind::ClusterBusyTimes(ClusterBusyTimesMonitor::new(
                            r,
                            time_groups.clone(),
                            *minimum,
                            *maximum,
                        ));
                        let m = self.add_constraint_monitor(Monitor::for_constraint(c, spec, kind));
                        self.resource_monitors[r.index()].push(m);
                    }
                }
                ConstraintKind::LimitWorkload {
                    resources,
                    minimum,
                    maximum,
                } => {
                    for &r in resources {
                        let kind = MonitorKind::LimitWorkload(LimitWorkloadMonitor::new(
                            r, *minimum, *maximum,
                        ));
                        let m = self.add_constraint_monitor(Monitor::for_constraint(c, spec, kind));
                        self.resource_monitors[r.index()].push(m);
                    }
                }
            }
        }
    }

    /// Stores a constraint monitor under the root group and attaches it.
    fn add_constraint_monitor(&mut self, monitor: Monitor) -> MonitorId {
        let m = self.monitors.insert(monitor);
        self.link_child_monitor(ROOT_MONITOR, m);
        self.attach_unchecked(m);
        if self.config.monitors.attach_check {
            self.attach_check_unchecked(m);
        }
        m
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    #[inline]
    pub fn instance(&self) -> &Arc<Instance> {
        &self.instance
    }

    #[inline]
    pub fn config(&self) -> &SolutionConfig {
        &self.config
    }

    /// The meet at `id`.
    ///
    /// # Panics
    /// Panics if no meet lives at `id`.
    #[inline]
    pub fn meet(&self, id: MeetId) -> &Meet {
        &self.meets[id]
    }

    pub fn meets(&self) -> impl Iterator<Item = (MeetId, &Meet)> {
        self.meets.iter()
    }

    #[inline]
    pub fn meet_count(&self) -> usize {
        self.meets.len()
    }

    #[inline]
    pub fn contains_meet(&self, id: MeetId) -> bool {
        self.meets.contains(id)
    }

    #[inline]
    pub fn task(&self, id: TaskId) -> &Task {
        &self.tasks[id]
    }

    pub fn tasks(&self) -> impl Iterator<Item = (TaskId, &Task)> {
        self.tasks.iter()
    }

    #[inline]
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter()
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Cycle meets in time order.
    #[inline]
    pub fn cycle_meets(&self) -> &[MeetId] {
        &self.cycle_meets
    }

    /// Meets derived from `event`, in no particular order.
    pub fn event_meets(&self, event: EventId) -> &[MeetId] {
        &self.event_meets[event.index()]
    }

    /// Tasks derived from `event_resource`, in no particular order.
    pub fn event_resource_tasks(&self, event_resource: EventResourceId) -> &[TaskId] {
        &self.event_resource_tasks[event_resource.index()]
    }

    #[inline]
    pub fn matching(&self) -> &ChunkMatching {
        &self.matching
    }

    #[inline]
    pub fn timetable(&self) -> &Timetable {
        &self.timetable
    }

    /// Demand nodes the matching cannot serve; 0 when matching is disabled.
    pub fn unmatched_demand(&self) -> usize {
        self.matching.unmatched_demand(&self.instance)
    }

    /// Total cost: the cost of the root group monitor.
    #[inline]
    pub fn cost(&self) -> Cost {
        self.monitors[ROOT_MONITOR].cost
    }

    // ------------------------------------------------------------------
    // Visit numbers
    // ------------------------------------------------------------------

    /// Starts a new visit and returns its number.
    pub fn new_global_visit(&mut self) -> u64 {
        self.global_visit += 1;
        self.global_visit
    }

    #[inline]
    pub fn global_visit(&self) -> u64 {
        self.global_visit
    }

    /// Marks `meet` as visited in the current visit.
    pub fn meet_visit(&mut self, meet: MeetId) {
        self.meets[meet].visit_num = self.global_visit;
    }

    /// Returns true if `meet` was visited within the last `slack` visits.
    pub fn meet_visited(&self, meet: MeetId, slack: u64) -> bool {
        self.meets[meet].visit_num + slack >= self.global_visit
    }

    pub fn set_meet_visit_num(&mut self, meet: MeetId, visit_num: u64) {
        self.meets[meet].visit_num = visit_num;
    }

    // ------------------------------------------------------------------
    // Zones and back references (not journaled)
    // ------------------------------------------------------------------

    pub fn make_zone(&mut self) -> ZoneId {
        self.zone_count += 1;
        ZoneId::new(self.zone_count - 1)
    }

    #[inline]
    pub fn zone_count(&self) -> usize {
        self.zone_count
    }

    /// Tags one offset of a meet with a zone.
    pub fn set_meet_zone(
        &mut self,
        meet: MeetId,
        offset: usize,
        zone: Option<ZoneId>,
    ) -> Result<()> {
        let m = self.live_meet(meet)?;
        if offset >= m.duration {
            return Err(SolutionError::OffsetOutOfRange {
                meet,
                target: meet,
                offset,
            });
        }
        self.meets[meet].zones[offset] = zone;
        Ok(())
    }

    pub fn set_meet_back_ref(
        &mut self,
        meet: MeetId,
        back_ref: Option<BackRef>,
    ) -> Result<()> {
        self.live_meet(meet)?;
        self.meets[meet].back_ref = back_ref;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Internal helpers shared by the op files
    // ------------------------------------------------------------------

    pub(crate) fn live_meet(&self, id: MeetId) -> Result<&Meet> {
        self.meets
            .get(id)
            .ok_or(SolutionError::NoSuchMeet(id))
    }

    pub(crate) fn live_task(&self, id: TaskId) -> Result<&Task> {
        self.tasks
            .get(id)
            .ok_or(SolutionError::NoSuchTask(id))
    }

    pub(crate) fn live_node(&self, id: NodeId) -> Result<&Node> {
        self.nodes
            .get(id)
            .ok_or(SolutionError::NoSuchNode(id))
    }

    /// Appends `op` to every active transaction; builds it only if needed.
    pub(crate) fn journal(&mut self, op: impl FnOnce() -> Operation) {
        if self.active_transactions.is_empty() {
            return;
        }
        let op = op();
        trace!(event = "journal", op = op.name());
        for &t in &self.active_transactions {
            self.transactions[t].operations.push(op.clone());
        }
    }

    /// Runs the invariant check after a public edit in full-assert mode.
    pub(crate) fn after_edit(&self) {
        if self.config.full_assert() {
            self.check_invariants();
        }
    }
}
