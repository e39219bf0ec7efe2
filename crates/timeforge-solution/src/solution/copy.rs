//! Deep copy of a solution.
//!
//! Meets, tasks, nodes, monitors and chunks refer to each other in cycles
//! (a meet lists its children, each child names its target). The copier
//! keeps one shadow map per kind, from original handle to clone handle.
//! Phase 1 reserves the clone's slot and records the shadow *before*
//! following any reference, so a cycle leads back to the clone under
//! construction. Phase 2 walks the originals again, removing each shadow
//! exactly once and linking each cloned demand chunk to the clone of its
//! supply base. When both phases are done every shadow map is empty.

use std::collections::HashMap;
use std::hash::Hash;

use tracing::info;

use super::Solution;
use crate::arena::Arena;
use crate::ids::{DemandChunkId, MeetId, MonitorId, NodeId, SupplyChunkId, TaskId};
use crate::matching::{ChunkMatching, DemandChunk, SupplyChunk};
use crate::meet::Meet;
use crate::monitor::{Monitor, MonitorKind};
use crate::node::Node;
use crate::task::Task;

/// Builds an independent copy of a [`Solution`].
///
/// # Examples
///
/// ```
/// use timeforge_solution::{Solution, SolutionCopier};
/// use timeforge_test::times::bare_instance;
///
/// let mut solution = Solution::new(bare_instance(4));
/// let meet = solution.make_meet(2, None, None).unwrap();
///
/// let mut copier = SolutionCopier::new(&solution);
/// let clone = copier.meet_phase1(meet);
/// assert_eq!(copier.meet_phase1(meet), clone);
///
/// let copy = copier.finish();
/// assert_eq!(copy.meet_count(), solution.meet_count());
/// ```
#[derive(Debug)]
pub struct SolutionCopier<'a> {
    source: &'a Solution,

    meets: Arena<MeetId, Meet>,
    tasks: Arena<TaskId, Task>,
    nodes: Arena<NodeId, Node>,
    monitors: Arena<MonitorId, Monitor>,
    supply: Arena<SupplyChunkId, SupplyChunk>,
    demand: Arena<DemandChunkId, DemandChunk>,

    meet_map: HashMap<MeetId, MeetId>,
    task_map: HashMap<TaskId, TaskId>,
    node_map: HashMap<NodeId, NodeId>,
    monitor_map: HashMap<MonitorId, MonitorId>,
    supply_map: HashMap<SupplyChunkId, SupplyChunkId>,
    demand_map: HashMap<DemandChunkId, DemandChunkId>,
}

impl<'a> SolutionCopier<'a> {
    pub fn new(source: &'a Solution) -> Self {
        Self {
            source,
            meets: Arena::new(),
            tasks: Arena::new(),
            nodes: Arena::new(),
            monitors: Arena::new(),
            supply: Arena::new(),
            demand: Arena::new(),
            meet_map: HashMap::new(),
            task_map: HashMap::new(),
            node_map: HashMap::new(),
            monitor_map: HashMap::new(),
            supply_map: HashMap::new(),
            demand_map: HashMap::new(),
        }
    }

    /// Number of shadows not yet cleared by phase 2.
    pub fn pending_shadows(&self) -> usize {
        self.meet_map.len()
            + self.task_map.len()
            + self.node_map.len()
            + self.monitor_map.len()
            + self.supply_map.len()
            + self.demand_map.len()
    }

    // ------------------------------------------------------------------
    // Phase 1
    // ------------------------------------------------------------------

    /// Returns the clone of `meet`, building it on first request.
    pub fn meet_phase1(&mut self, meet: MeetId) -> MeetId {
        if let Some(&clone) = self.meet_map.get(&meet) {
            return clone;
        }
        let clone = self.meets.reserve();
        self.meet_map.insert(meet, clone);

        let source = self.source;
        let m = &source.meets[meet];
        let target = m.target.map(|(t, o)| (self.meet_phase1(t), o));
        let children = m.children.iter().map(|&c| self.meet_phase1(c)).collect();
        let tasks = m.tasks.iter().map(|&t| self.task_phase1(t)).collect();
        let node = m.node.map(|n| self.node_phase1(n));
        let supply_chunks = m
            .supply_chunks
            .iter()
            .map(|&s| self.supply_phase1(s))
            .collect();
        let demand_chunks = m
            .demand_chunks
            .iter()
            .map(|&d| self.demand_phase1(d))
            .collect();

        self.meets.fill(
            clone,
            Meet {
                duration: m.duration,
                event: m.event,
                event_offset: m.event_offset,
                back_ref: m.back_ref,
                domain: m.domain.clone(),
                target,
                assigned_time: m.assigned_time,
                tasks,
                children,
                node,
                zones: m.zones.clone(),
                supply_chunks,
                demand_chunks,
                all_demand: m.all_demand,
                visit_num: m.visit_num,
            },
        );
        clone
    }

    pub fn task_phase1(&mut self, task: TaskId) -> TaskId {
        if let Some(&clone) = self.task_map.get(&task) {
            return clone;
        }
        let clone = self.tasks.reserve();
        self.task_map.insert(task, clone);

        let source = self.source;
        let t = &source.tasks[task];
        let meet = self.meet_phase1(t.meet);
        self.tasks.fill(clone, Task { meet, ..t.clone() });
        clone
    }

    pub fn node_phase1(&mut self, node: NodeId) -> NodeId {
        if let Some(&clone) = self.node_map.get(&node) {
            return clone;
        }
        let clone = self.nodes.reserve();
        self.node_map.insert(node, clone);

        let source = self.source;
        let n = &source.nodes[node];
        let parent = n.parent.map(|p| self.node_phase1(p));
        let children = n.children.iter().map(|&c| self.node_phase1(c)).collect();
        let meets = n.meets.iter().map(|&m| self.meet_phase1(m)).collect();
        self.nodes.fill(
            clone,
            Node {
                parent,
                children,
                meets,
            },
        );
        clone
    }

    pub fn monitor_phase1(&mut self, monitor: MonitorId) -> MonitorId {
        if let Some(&clone) = self.monitor_map.get(&monitor) {
            return clone;
        }
        let clone = self.monitors.reserve();
        self.monitor_map.insert(monitor, clone);

        let source = self.source;
        let m = &source.monitors[monitor];
        let parent = m.parent.map(|p| self.monitor_phase1(p));
        let mut kind = m.kind.clone();
        if let MonitorKind::Group(g) = &mut kind {
            g.children = g.children.iter().map(|&c| self.monitor_phase1(c)).collect();
            g.defects = g.defects.iter().map(|&c| self.monitor_phase1(c)).collect();
        }
        self.monitors.fill(
            clone,
            Monitor {
                kind,
                parent,
                ..m.clone()
            },
        );
        clone
    }

    fn supply_phase1(&mut self, chunk: SupplyChunkId) -> SupplyChunkId {
        if let Some(&clone) = self.supply_map.get(&chunk) {
            return clone;
        }
        let clone = self.supply.reserve();
        self.supply_map.insert(chunk, clone);

        let source = self.source;
        let owner = source.matching.supply[chunk]
            .owner
            .map(|(m, o)| (self.meet_phase1(m), o));
        self.supply.fill(clone, SupplyChunk { owner });
        clone
    }

    /// Clones a demand chunk. Its base still names the original supply
    /// chunk until phase 2 links it.
    fn demand_phase1(&mut self, chunk: DemandChunkId) -> DemandChunkId {
        if let Some(&clone) = self.demand_map.get(&chunk) {
            return clone;
        }
        let clone = self.demand.reserve();
        self.demand_map.insert(chunk, clone);

        let source = self.source;
        let d = &source.matching.demand[chunk];
        let meet = self.meet_phase1(d.meet);
        self.supply_phase1(d.base);
        self.demand.fill(
            clone,
            DemandChunk {
                meet,
                ..d.clone()
            },
        );
        clone
    }

    // ------------------------------------------------------------------
    // Phase 2
    // ------------------------------------------------------------------

    /// Clears the shadow of `meet` and of everything reachable from it.
    pub fn meet_phase2(&mut self, meet: MeetId) {
        if self.meet_map.remove(&meet).is_none() {
            return;
        }
        let source = self.source;
        let m = &source.meets[meet];
        if let Some((t, _)) = m.target {
            self.meet_phase2(t);
        }
        for &c in &m.children {
            self.meet_phase2(c);
        }
        for &t in &m.tasks {
            self.task_phase2(t);
        }
        if let Some(n) = m.node {
            self.node_phase2(n);
        }
        for &d in &m.demand_chunks {
            self.demand_phase2(d);
        }
    }

    pub fn task_phase2(&mut self, task: TaskId) {
        if self.task_map.remove(&task).is_none() {
            return;
        }
        let meet = self.source.tasks[task].meet;
        self.meet_phase2(meet);
    }

    pub fn node_phase2(&mut self, node: NodeId) {
        if self.node_map.remove(&node).is_none() {
            return;
        }
        let source = self.source;
        let n = &source.nodes[node];
        if let Some(p) = n.parent {
            self.node_phase2(p);
        }
        for &c in &n.children {
            self.node_phase2(c);
        }
        for &m in &n.meets {
            self.meet_phase2(m);
        }
    }

    pub fn monitor_phase2(&mut self, monitor: MonitorId) {
        if self.monitor_map.remove(&monitor).is_none() {
            return;
        }
        let source = self.source;
        let m = &source.monitors[monitor];
        if let Some(p) = m.parent {
            self.monitor_phase2(p);
        }
        if let Some(g) = m.as_group() {
            for &c in g.children() {
                self.monitor_phase2(c);
            }
        }
    }

    /// Links a cloned demand chunk to the clone of its base. Supply shadows
    /// stay until the very end, since many demand chunks share one base.
    fn demand_phase2(&mut self, chunk: DemandChunkId) {
        let Some(clone) = self.demand_map.remove(&chunk) else {
            return;
        };
        let source = self.source;
        let d = &source.matching.demand[chunk];
        let base = *self
            .supply_map
            .get(&d.base)
            .unwrap_or_else(|| panic!("base {} of {} was not copied", d.base, chunk));
        self.demand[clone].base = base;
        self.meet_phase2(d.meet);
    }

    // ------------------------------------------------------------------
    // Driver
    // ------------------------------------------------------------------

    /// Copies everything reachable from the source's live objects and
    /// returns the finished copy.
    ///
    /// # Panics
    /// Panics if a shadow survives phase 2.
    pub fn finish(mut self) -> Solution {
        let source = self.source;

        for &m in &source.cycle_meets {
            self.meet_phase1(m);
        }
        for id in source.meets.ids() {
            self.meet_phase1(id);
        }
        for id in source.tasks.ids() {
            self.task_phase1(id);
        }
        for id in source.nodes.ids() {
            self.node_phase1(id);
        }
        for id in source.monitors.ids() {
            self.monitor_phase1(id);
        }

        let cycle_meets = remap(&source.cycle_meets, &self.meet_map);
        let event_meets = source
            .event_meets
            .iter()
            .map(|l| remap(l, &self.meet_map))
            .collect();
        let event_resource_tasks = source
            .event_resource_tasks
            .iter()
            .map(|l| remap(l, &self.task_map))
            .collect();
        let event_monitors = source
            .event_monitors
            .iter()
            .map(|l| remap(l, &self.monitor_map))
            .collect();
        let event_resource_monitors = source
            .event_resource_monitors
            .iter()
            .map(|l| remap(l, &self.monitor_map))
            .collect();
        let resource_monitors = source
            .resource_monitors
            .iter()
            .map(|l| remap(l, &self.monitor_map))
            .collect();

        for id in source.meets.ids() {
            self.meet_phase2(id);
        }
        for id in source.tasks.ids() {
            self.task_phase2(id);
        }
        for id in source.nodes.ids() {
            self.node_phase2(id);
        }
        for id in source.monitors.ids() {
            self.monitor_phase2(id);
        }
        self.supply_map.clear();

        assert_eq!(
            self.pending_shadows(),
            0,
            "shadows left after copying {}",
            source.instance.name()
        );
        info!(
            event = "solution_copied",
            meets = self.meets.len(),
            tasks = self.tasks.len(),
            monitors = self.monitors.len(),
        );

        Solution {
            instance: source.instance.clone(),
            config: source.config.clone(),
            meets: self.meets,
            tasks: self.tasks,
            nodes: self.nodes,
            monitors: self.monitors,
            transactions: Arena::new(),
            active_transactions: Vec::new(),
            matching: ChunkMatching::from_chunks(source.matching.mode(), self.supply, self.demand),
            timetable: source.timetable.clone(),
            cycle_meets,
            event_meets,
            event_resource_tasks,
            event_monitors,
            event_resource_monitors,
            resource_monitors,
            global_visit: source.global_visit,
            zone_count: source.zone_count,
        }
    }
}

fn remap<K: Copy + Eq + Hash + std::fmt::Display>(list: &[K], map: &HashMap<K, K>) -> Vec<K> {
    list.iter()
        .map(|k| {
            *map.get(k)
                .unwrap_or_else(|| panic!("{} has no clone", k))
        })
        .collect()
}

impl Solution {
    /// An independent deep copy with compacted arenas, no transactions and
    /// no free supply chunks.
    pub fn copy(&self) -> Solution {
        SolutionCopier::new(self).finish()
    }
}
