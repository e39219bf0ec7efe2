//! Deviation-to-cost conversion.

use super::{Cost, CostLevel};

/// Shape of a constraint's cost as a function of its deviation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CostFunction {
    /// 1 for any non-zero deviation.
    Step,
    /// The deviation itself.
    #[default]
    Linear,
    /// The square of the deviation.
    Quadratic,
}

impl CostFunction {
    /// Applies the function to a deviation.
    ///
    /// Every function maps deviation 0 to 0.
    #[inline]
    pub fn apply(self, deviation: u64) -> i64 {
        let d = deviation as i64;
        match self {
            CostFunction::Step => i64::from(deviation > 0),
            CostFunction::Linear => d,
            CostFunction::Quadratic => d * d,
        }
    }
}

/// Weight, level and cost function of one constraint.
///
/// # Examples
///
/// ```
/// use timeforge_core::{ConstraintCost, Cost, CostFunction};
///
/// let cc = ConstraintCost::new(10, true, CostFunction::Quadratic);
/// assert_eq!(cc.cost(0), Cost::ZERO);
/// assert_eq!(cc.cost(3), Cost::of_hard(90));
///
/// let soft = ConstraintCost::new(2, false, CostFunction::Linear);
/// assert_eq!(soft.cost(3), Cost::of_soft(6));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstraintCost {
    pub weight: i64,
    pub required: bool,
    pub function: CostFunction,
}

impl ConstraintCost {
    /// Creates a new constraint cost specification.
    pub const fn new(weight: i64, required: bool, function: CostFunction) -> Self {
        Self {
            weight,
            required,
            function,
        }
    }

    /// Returns the level costs of this constraint are reported at.
    pub const fn level(&self) -> CostLevel {
        if self.required {
            CostLevel::Hard
        } else {
            CostLevel::Soft
        }
    }

    /// Converts a deviation into a cost.
    #[inline]
    pub fn cost(&self, deviation: u64) -> Cost {
        if deviation == 0 {
            return Cost::ZERO;
        }
        Cost::of_level(self.level(), self.function.apply(deviation) * self.weight)
    }
}
