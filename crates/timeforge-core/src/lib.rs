//! Timeforge Core - the immutable side of timetabling
//!
//! This crate provides the values every solution is built on:
//! - [`Cost`] values and the deviation-to-cost conversion
//! - [`TimeGroup`] sets of times with memoized shifts
//! - the read-only [`Instance`] model and its [`InstanceBuilder`]
//! - typed handles for every index space

pub mod constraint;
pub mod cost;
pub mod error;
pub mod ids;
pub mod instance;
pub mod time;

#[cfg(test)]
mod constraint_tests;

pub use constraint::{Constraint, ConstraintKind, ConstraintRef};
pub use cost::{ConstraintCost, Cost, CostFunction, CostLevel, CostParseError};
pub use error::TimeforgeError;
pub use ids::{ConstraintId, EventId, EventResourceId, Id, ResourceGroupId, ResourceId};
pub use instance::{Event, EventResource, Instance, InstanceBuilder, Resource, ResourceGroup};
pub use time::{Time, TimeGroup};
