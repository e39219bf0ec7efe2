//! Constraint definitions.
//!
//! A constraint carries its cost specification and a kind-specific list of
//! points of application (events, event resources or resources). The
//! solution creates one monitor per point of application.

use std::sync::Arc;

use crate::cost::{ConstraintCost, CostFunction};
use crate::ids::{EventId, EventResourceId, ResourceId};
use crate::time::TimeGroup;

/// Reference to a constraint for identification.
///
/// # Example
///
/// ```
/// use timeforge_core::ConstraintRef;
///
/// let cr = ConstraintRef::new("school", "AvoidClashes");
/// assert_eq!(cr.full_name(), "school/AvoidClashes");
///
/// let simple = ConstraintRef::new("", "Simple");
/// assert_eq!(simple.full_name(), "Simple");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConstraintRef {
    /// Package/module containing the constraint.
    pub package: String,
    /// Name of the constraint.
    pub name: String,
}

impl ConstraintRef {
    /// Creates a new constraint reference.
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
        }
    }

    /// Returns the fully qualified name.
    pub fn full_name(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}/{}", self.package, self.name)
        }
    }
}

/// What a constraint measures and where it applies.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintKind {
    /// Every meet of each event should have a time.
    AssignTime { events: Vec<EventId> },

    /// Meets of each event should start at a time of `domain`.
    PreferTimes {
        events: Vec<EventId>,
        domain: Arc<TimeGroup>,
    },

    /// Every task of each event resource should have a resource.
    AssignResource { event_resources: Vec<EventResourceId> },

    /// Each resource should attend at most one task at any time.
    AvoidClashes { resources: Vec<ResourceId> },

    /// For each resource, the number of busy times in each busy time group
    /// should lie in `[minimum, maximum]`.
    LimitBusyTimes {
        resources: Vec<ResourceId>,
        time_groups: Vec<Arc<TimeGroup>>,
        minimum: usize,
        maximum: usize,
    },

    /// For each resource, the number of busy time groups should lie in
    /// `[minimum, maximum]`.
    ClusterBusyTimes {
        resources: Vec<ResourceId>,
        time_groups: Vec<Arc<TimeGroup>>,
        minimum: usize,
        maximum: usize,
    },

    /// For each resource, the total workload should lie in
    /// `[minimum, maximum]`.
    LimitWorkload {
        resources: Vec<ResourceId>,
        minimum: u64,
        maximum: u64,
    },
}

impl ConstraintKind {
    /// Short tag naming the kind.
    pub fn tag(&self) -> &'static str {
        match self {
            ConstraintKind::AssignTime { .. } => "AssignTime",
            ConstraintKind::PreferTimes { .. } => "PreferTimes",
            ConstraintKind::AssignResource { .. } => "AssignResource",
            ConstraintKind::AvoidClashes { .. } => "AvoidClashes",
            ConstraintKind::LimitBusyTimes { .. } => "LimitBusyTimes",
            ConstraintKind::ClusterBusyTimes { .. } => "ClusterBusyTimes",
            ConstraintKind::LimitWorkload { .. } => "LimitWorkload",
        }
    }

    /// Number of points of application, i.e. monitors this constraint needs.
    pub fn applies_to_count(&self) -> usize {
        match self {
            ConstraintKind::AssignTime { events } | ConstraintKind::PreferTimes { events, .. } => {
                events.len()
            }
            ConstraintKind::AssignResource { event_resources } => event_resources.len(),
            ConstraintKind::AvoidClashes { resources }
            | ConstraintKind::LimitBusyTimes { resources, .. }
            | ConstraintKind::ClusterBusyTimes { resources, .. }
            | ConstraintKind::LimitWorkload { resources, .. } => resources.len(),
        }
    }
}

/// A constraint of the instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub reference: ConstraintRef,
    pub cost: ConstraintCost,
    pub kind: ConstraintKind,
}

impl Constraint {
    /// Creates a required (hard) constraint with linear cost.
    pub fn required(reference: ConstraintRef, weight: i64, kind: ConstraintKind) -> Self {
        Self {
            reference,
            cost: ConstraintCost::new(weight, true, CostFunction::Linear),
            kind,
        }
    }

    /// Creates a preference (soft) constraint with linear cost.
    pub fn preferred(reference: ConstraintRef, weight: i64, kind: ConstraintKind) -> Self {
        Self {
            reference,
            cost: ConstraintCost::new(weight, false, CostFunction::Linear),
            kind,
        }
    }

    /// Replaces the cost function.
    pub fn with_cost_function(mut self, function: CostFunction) -> Self {
        self.cost.function = function;
        self
    }

    pub fn name(&self) -> &str {
        &self.reference.name
    }

    pub fn tag(&self) -> &'static str {
        self.kind.tag()
    }
}
