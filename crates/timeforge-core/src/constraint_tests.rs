//! Tests for constraint types

use std::sync::Arc;

use super::constraint::*;
use super::cost::CostFunction;
use super::ids::{EventId, ResourceId};
use super::time::TimeGroup;

#[test]
fn test_constraint_ref_full_name() {
    let cr = ConstraintRef::new("school", "PreferTimes");
    assert_eq!(cr.full_name(), "school/PreferTimes");
}

#[test]
fn test_constraint_ref_empty_package() {
    let cr = ConstraintRef::new("", "Simple");
    assert_eq!(cr.full_name(), "Simple");
}

#[test]
fn test_required_and_preferred() {
    let hard = Constraint::required(
        ConstraintRef::new("", "Clashes"),
        1,
        ConstraintKind::AvoidClashes {
            resources: vec![ResourceId::new(0), ResourceId::new(1)],
        },
    );
    assert!(hard.cost.required);
    assert_eq!(hard.tag(), "AvoidClashes");
    assert_eq!(hard.kind.applies_to_count(), 2);

    let soft = Constraint::preferred(
        ConstraintRef::new("", "Mornings"),
        3,
        ConstraintKind::PreferTimes {
            events: vec![EventId::new(0)],
            domain: Arc::new(TimeGroup::new(4, [0, 1])),
        },
    )
    .with_cost_function(CostFunction::Quadratic);
    assert!(!soft.cost.required);
    assert_eq!(soft.cost.function, CostFunction::Quadratic);
    assert_eq!(soft.name(), "Mornings");
}
