//! Cost types for representing constraint violations.
//!
//! A [`Cost`] is a `(hard, soft)` pair where the hard component dominates
//! the ordering. Monitors turn an integer deviation into a cost through a
//! [`ConstraintCost`], which combines a weight, a required flag and a
//! [`CostFunction`].

mod function;
mod value;


pub use function::{ConstraintCost, CostFunction};
pub use value::{Cost, CostParseError};

/// Cost level of a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CostLevel {
    /// Required constraints - must be satisfied for feasibility
    Hard,
    /// Preferences - optimization objectives
    Soft,
}
