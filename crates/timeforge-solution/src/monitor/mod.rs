//! Incremental cost monitors.
//!
//! A monitor turns one constraint's view of the solution into a deviation
//! and, through the constraint's [`ConstraintCost`], into a [`Cost`]. Each
//! concrete kind keeps just enough state to update its deviation from the
//! deltas the solution hands it; it never rescans except when attached.
//!
//! Monitors form a tree of group monitors rooted at `MonitorId(0)`, the
//! solution's own group. When a monitor's cost changes, the difference is
//! added to every group above it, and each group keeps a defect list of its
//! children with non-zero cost.
//!
//! # Architecture
//!
//! Kinds are variants of [`MonitorKind`]. Operations common to every
//! deviation monitor go through the [`DeviationMonitor`] trait; callbacks
//! specific to one kind are inherent methods reached by matching on the
//! variant. Attaching, detaching and cost propagation need the rest of the
//! solution and live on [`Solution`](crate::Solution).

mod event;
mod event_resource;
mod group;
mod resource;

#[cfg(test)]
mod tests;

pub use event::{AssignTimeMonitor, PreferTimesMonitor};
pub use event_resource::AssignResourceMonitor;
pub use group::GroupMonitor;
pub use resource::{
    AvoidClashesMonitor, ClusterBusyTimesMonitor, LimitBusyTimesMonitor, LimitWorkloadMonitor,
};

use timeforge_core::{ConstraintCost, ConstraintId, Cost, CostFunction};

use crate::ids::MonitorId;

/// Generic operations of every deviation monitor.
pub trait DeviationMonitor {
    /// Short name of the monitor kind.
    fn tag(&self) -> &'static str;

    /// Current deviation; never negative.
    fn deviation(&self) -> u64;

    /// Forgets all state, as when detached.
    fn clear(&mut self);
}

/// The concrete kinds of monitor.
#[derive(Debug, Clone)]
pub enum MonitorKind {
    Group(GroupMonitor),
    AssignTime(AssignTimeMonitor),
    PreferTimes(PreferTimesMonitor),
    AssignResource(AssignResourceMonitor),
    AvoidClashes(AvoidClashesMonitor),
    LimitBusyTimes(LimitBusyTimesMonitor),
    ClusterBusyTimes(ClusterBusyTimesMonitor),
    LimitWorkload(LimitWorkloadMonitor),
}

impl MonitorKind {
    /// The deviation interface of a non-group monitor.
    pub fn as_deviation(&self) -> Option<&dyn DeviationMonitor> {
        match self {
            MonitorKind::Group(_) => None,
            MonitorKind::AssignTime(m) => Some(m),
            MonitorKind::PreferTimes(m) => Some(m),
            MonitorKind::AssignResource(m) => Some(m),
            MonitorKind::AvoidClashes(m) => Some(m),
            MonitorKind::LimitBusyTimes(m) => Some(m),
            MonitorKind::ClusterBusyTimes(m) => Some(m),
            MonitorKind::LimitWorkload(m) => Some(m),
        }
    }

    pub fn as_deviation_mut(&mut self) -> Option<&mut dyn DeviationMonitor> {
        match self {
            MonitorKind::Group(_) => None,
            MonitorKind::AssignTime(m) => Some(m),
            MonitorKind::PreferTimes(m) => Some(m),
            MonitorKind::AssignResource(m) => Some(m),
            MonitorKind::AvoidClashes(m) => Some(m),
            MonitorKind::LimitBusyTimes(m) => Some(m),
            MonitorKind::ClusterBusyTimes(m) => Some(m),
            MonitorKind::LimitWorkload(m) => Some(m),
        }
    }
}

/// A node of the monitor tree.
#[derive(Debug, Clone)]
pub struct Monitor {
    pub(crate) kind: MonitorKind,
    pub(crate) constraint: Option<ConstraintId>,
    pub(crate) cost_spec: ConstraintCost,
    pub(crate) cost: Cost,
    pub(crate) attached: bool,
    pub(crate) parent: Option<MonitorId>,
    pub(crate) defect_index: Option<usize>,
}

impl Monitor {
    pub(crate) fn group(tag: impl Into<String>) -> Self {
        Self {
            kind: MonitorKind::Group(GroupMonitor::new(tag)),
            constraint: None,
            cost_spec: ConstraintCost::new(0, false, CostFunction::Linear),
            cost: Cost::ZERO,
            attached: true,
            parent: None,
            defect_index: None,
        }
    }

    pub(crate) fn for_constraint(
        constraint: ConstraintId,
        cost_spec: ConstraintCost,
        kind: MonitorKind,
    ) -> Self {
        Self {
            kind,
            constraint: Some(constraint),
            cost_spec,
            cost: Cost::ZERO,
            attached: false,
            parent: None,
            defect_index: None,
        }
    }

    #[inline]
    pub fn kind(&self) -> &MonitorKind {
        &self.kind
    }

    /// Kind name, or the tag of a group monitor.
    pub fn tag(&self) -> &str {
        match &self.kind {
            MonitorKind::Group(g) => g.tag(),
            kind => kind.as_deviation().map_or("", |m| m.tag()),
        }
    }

    /// The constraint this monitor measures, `None` for groups.
    #[inline]
    pub fn constraint(&self) -> Option<ConstraintId> {
        self.constraint
    }

    /// Cached cost; zero while detached.
    #[inline]
    pub fn cost(&self) -> Cost {
        self.cost
    }

    #[inline]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    #[inline]
    pub fn parent(&self) -> Option<MonitorId> {
        self.parent
    }

    #[inline]
    pub fn is_group(&self) -> bool {
        matches!(self.kind, MonitorKind::Group(_))
    }

    pub fn as_group(&self) -> Option<&GroupMonitor> {
        match &self.kind {
            MonitorKind::Group(g) => Some(g),
            _ => None,
        }
    }

    pub(crate) fn as_group_mut(&mut self) -> Option<&mut GroupMonitor> {
        match &mut self.kind {
            MonitorKind::Group(g) => Some(g),
            _ => None,
        }
    }

    /// Deviation of a non-group monitor; zero for groups and while detached.
    pub fn deviation(&self) -> u64 {
        if !self.attached {
            return 0;
        }
        self.kind.as_deviation().map_or(0, |m| m.deviation())
    }

    /// The cost the current deviation implies.
    pub(crate) fn computed_cost(&self) -> Cost {
        self.cost_spec.cost(self.deviation())
    }
}
