//! Full consistency check, run after every edit in full-assert mode.

use std::collections::HashSet;

use timeforge_core::Cost;

use super::{Solution, ROOT_MONITOR};
use crate::ids::MonitorId;
use crate::timetable::Timetable;

impl Solution {
    /// Verifies every cross-reference and cached quantity of the solution.
    ///
    /// # Panics
    /// Panics with a description of the first inconsistency found.
    pub fn check_invariants(&self) {
        self.check_meets();
        self.check_cycle_meets();
        self.check_chunks();
        self.check_tasks();
        self.check_timetable();
        self.check_nodes();
        self.check_monitors();
    }

    fn check_meets(&self) {
        for (id, m) in self.meets.iter() {
            assert!(m.duration > 0, "{} has zero duration", id);
            assert_eq!(m.zones.len(), m.duration, "zones of {}", id);
            assert_eq!(m.supply_chunks.len(), m.duration, "supply of {}", id);
            assert_eq!(m.demand_chunks.len(), m.duration, "demand of {}", id);

            match m.target {
                Some((target, offset)) => {
                    let t = &self.meets[target];
                    assert!(
                        offset + m.duration <= t.duration,
                        "{} overhangs its target {}",
                        id,
                        target
                    );
                    assert_eq!(
                        t.children.iter().filter(|&&c| c == id).count(),
                        1,
                        "{} not listed once among the children of {}",
                        id,
                        target
                    );
                    assert_eq!(
                        m.assigned_time,
                        t.assigned_time.map(|s| s + offset),
                        "cached time of {}",
                        id
                    );
                    assert!(
                        self.fits_in_context(id, target, offset),
                        "{} breaks the domain rule at {} of {}",
                        id,
                        offset,
                        target
                    );
                    if let Some(node) = m.node {
                        let parent = self.nodes[node].parent;
                        assert!(
                            parent.is_some() && t.node == parent,
                            "{} in {} has target {} outside the parent node",
                            id,
                            node,
                            target
                        );
                    }
                }
                None if m.is_cycle_meet() => {}
                None => assert!(m.assigned_time.is_none(), "{} unassigned with a time", id),
            }
            for &c in &m.children {
                assert_eq!(
                    self.meets[c].target.map(|(t, _)| t),
                    Some(id),
                    "child {} of {} points elsewhere",
                    c,
                    id
                );
            }

            let below: usize = m.children.iter().map(|&c| self.meets[c].all_demand).sum();
            assert_eq!(m.all_demand, m.own_demand() + below, "all_demand of {}", id);

            for &t in &m.tasks {
                assert_eq!(self.tasks[t].meet, id, "task {} of {} points elsewhere", t, id);
            }
            if let Some(e) = m.event {
                assert!(
                    self.event_meets[e.index()].contains(&id),
                    "{} missing from the meets of {}",
                    id,
                    e
                );
            }
        }
        for (e, list) in self.event_meets.iter().enumerate() {
            for &m in list {
                assert_eq!(
                    self.meets[m].event.map(|x| x.index()),
                    Some(e),
                    "{} listed under the wrong event",
                    m
                );
            }
        }
    }

    fn check_cycle_meets(&self) {
        let mut next = 0;
        for &c in &self.cycle_meets {
            let m = &self.meets[c];
            assert!(m.is_cycle_meet(), "{} listed as a cycle meet", c);
            assert_eq!(m.assigned_time, Some(next), "cycle meet {} out of order", c);
            next += m.duration;
        }
        assert_eq!(next, self.instance.cycle_len(), "cycle meets do not cover the cycle");
        let cycle_count = self.meets.iter().filter(|(_, m)| m.is_cycle_meet()).count();
        assert_eq!(cycle_count, self.cycle_meets.len(), "unlisted cycle meet");
    }

    fn check_chunks(&self) {
        let root_bases = self.matching.needs_root_bases();
        let check_bases = self.config.matching.check_bases;
        let mut owned = 0;
        for (id, m) in self.meets.iter() {
            let (root, root_offset) = self.meet_root(id);
            let nodes = self.demand_nodes(id);
            for i in 0..m.duration {
                let s = m.supply_chunks[i];
                assert_eq!(
                    self.matching.supply[s].owner,
                    Some((id, i)),
                    "owner of {}",
                    s
                );
                owned += 1;

                let d = &self.matching.demand[m.demand_chunks[i]];
                assert_eq!((d.meet, d.offset), (id, i), "position of {}", m.demand_chunks[i]);
                if check_bases {
                    let expected = if root_bases {
                        self.meets[root].supply_chunks[root_offset + i]
                    } else {
                        s
                    };
                    assert_eq!(d.base, expected, "base of {}", m.demand_chunks[i]);
                }
                assert_eq!(d.domain, nodes, "domain of {}", m.demand_chunks[i]);
            }
        }
        assert_eq!(owned, self.matching.supply_chunk_count(), "stray supply chunks");
        let demand: usize = self.meets.iter().map(|(_, m)| m.duration).sum();
        assert_eq!(demand, self.matching.demand_chunk_count(), "stray demand chunks");
        for &s in &self.matching.free_supply {
            assert!(self.matching.supply[s].owner.is_none(), "free {} has an owner", s);
        }
    }

    fn check_tasks(&self) {
        for (id, t) in self.tasks.iter() {
            assert!(
                self.meets[t.meet].tasks.contains(&id),
                "{} missing from its meet {}",
                id,
                t.meet
            );
            if let Some(r) = t.resource {
                assert!(
                    self.instance.resource_group(t.domain).contains(r),
                    "{} holds {} outside its domain",
                    id,
                    r
                );
            }
            if let Some(er) = t.event_resource {
                assert!(
                    self.event_resource_tasks[er.index()].contains(&id),
                    "{} missing from the tasks of {}",
                    id,
                    er
                );
            }
        }
        for list in &self.event_resource_tasks {
            for &t in list {
                assert!(self.tasks.contains(t), "dead {} listed by an event resource", t);
            }
        }
    }

    fn check_timetable(&self) {
        let mut fresh = Timetable::new(self.instance.resource_count(), self.instance.cycle_len());
        for (_, t) in self.tasks.iter() {
            let m = &self.meets[t.meet];
            if let (Some(r), Some(time)) = (t.resource, m.assigned_time) {
                fresh.add(r.index(), time, m.duration);
            }
        }
        for r in 0..self.instance.resource_count() {
            assert_eq!(
                fresh.row(r),
                self.timetable.row(r),
                "timetable of resource {}",
                r
            );
        }
    }

    fn check_nodes(&self) {
        for (id, n) in self.nodes.iter() {
            if let Some(p) = n.parent {
                assert!(
                    self.nodes[p].children.contains(&id),
                    "{} missing from the children of {}",
                    id,
                    p
                );
            }
            for &c in &n.children {
                assert_eq!(self.nodes[c].parent, Some(id), "child node {} of {}", c, id);
            }
            for &m in &n.meets {
                assert_eq!(self.meets[m].node, Some(id), "{} listed by {}", m, id);
            }
        }
        for (id, m) in self.meets.iter() {
            if let Some(n) = m.node {
                assert!(self.nodes[n].meets.contains(&id), "{} missing from {}", id, n);
            }
        }
    }

    fn check_monitors(&self) {
        assert!(
            self.monitors[ROOT_MONITOR].parent.is_none(),
            "the root monitor has a parent"
        );
        let mut seen: HashSet<MonitorId> = HashSet::new();
        for (id, monitor) in self.monitors.iter() {
            if let Some(p) = monitor.parent {
                let group = self.monitors[p]
                    .as_group()
                    .unwrap_or_else(|| panic!("parent {} of {} is not a group", p, id));
                assert!(group.children().contains(&id), "{} missing from {}", id, p);
            }
            match monitor.as_group() {
                Some(group) => {
                    let total: Cost = group.children().iter().map(|&c| self.monitors[c].cost).sum();
                    assert_eq!(monitor.cost, total, "cost of group {}", id);
                    seen.clear();
                    for (i, &d) in group.defects().iter().enumerate() {
                        assert!(seen.insert(d), "{} listed twice as a defect of {}", d, id);
                        assert_eq!(self.monitors[d].parent, Some(id), "defect {} of {}", d, id);
                        assert_eq!(self.monitors[d].defect_index, Some(i), "index of defect {}", d);
                    }
                    for &c in group.children() {
                        assert_eq!(self.monitors[c].parent, Some(id), "child {} of {}", c, id);
                        assert_eq!(
                            !self.monitors[c].cost.is_zero(),
                            seen.contains(&c),
                            "defect list of {} disagrees with {}",
                            id,
                            c
                        );
                    }
                }
                None if monitor.attached => {
                    let fresh = self.scanned_kind(&monitor.kind);
                    let expected = fresh.as_deviation().map_or(0, |x| x.deviation());
                    assert_eq!(monitor.deviation(), expected, "deviation of {}", id);
                    assert_eq!(monitor.cost, monitor.computed_cost(), "cost of {}", id);
                }
                None => assert!(monitor.cost.is_zero(), "detached {} has cost", id),
            }
            if monitor.parent.is_none() || monitor.cost.is_zero() {
                assert!(monitor.defect_index.is_none(), "{} has a stale defect index", id);
            }
        }
        for lists in [
            &self.event_monitors,
            &self.event_resource_monitors,
            &self.resource_monitors,
        ] {
            for &m in lists.iter().flatten() {
                assert!(!self.monitors[m].is_group(), "group {} in a routing table", m);
            }
        }
    }
}
