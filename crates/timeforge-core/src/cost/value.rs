//! Cost - two-level penalty with hard and soft components

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

use super::CostLevel;

/// A cost with separate hard and soft levels.
///
/// Costs are penalties: lower is better, zero means no violation.
///
/// When comparing costs:
/// 1. Hard components are compared first
/// 2. Soft components are only compared when hard components are equal
///
/// # Examples
///
/// ```
/// use timeforge_core::Cost;
///
/// let c1 = Cost::of(1, 0);     // one hard violation
/// let c2 = Cost::of(0, 500);   // feasible but with many soft violations
///
/// // Any hard violation is worse than any amount of soft violations
/// assert!(c2 < c1);
/// assert!(c2.is_feasible());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cost {
    hard: i64,
    soft: i64,
}

impl Cost {
    /// The zero cost.
    pub const ZERO: Cost = Cost { hard: 0, soft: 0 };

    /// One hard violation.
    pub const ONE_HARD: Cost = Cost { hard: 1, soft: 0 };

    /// One soft violation.
    pub const ONE_SOFT: Cost = Cost { hard: 0, soft: 1 };

    /// Creates a new cost.
    #[inline]
    pub const fn of(hard: i64, soft: i64) -> Self {
        Cost { hard, soft }
    }

    /// Creates a cost with only a hard component.
    #[inline]
    pub const fn of_hard(hard: i64) -> Self {
        Cost { hard, soft: 0 }
    }

    /// Creates a cost with only a soft component.
    #[inline]
    pub const fn of_soft(soft: i64) -> Self {
        Cost { hard: 0, soft }
    }

    /// Creates a cost at the given level.
    #[inline]
    pub const fn of_level(level: CostLevel, value: i64) -> Self {
        match level {
            CostLevel::Hard => Cost::of_hard(value),
            CostLevel::Soft => Cost::of_soft(value),
        }
    }

    /// Returns the hard component.
    #[inline]
    pub const fn hard(&self) -> i64 {
        self.hard
    }

    /// Returns the soft component.
    #[inline]
    pub const fn soft(&self) -> i64 {
        self.soft
    }

    /// Returns true if both components are zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.hard == 0 && self.soft == 0
    }

    /// Returns true if no hard constraint is violated.
    #[inline]
    pub const fn is_feasible(&self) -> bool {
        self.hard == 0
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.hard.cmp(&other.hard) {
            Ordering::Equal => self.soft.cmp(&other.soft),
            other => other,
        }
    }
}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Add for Cost {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Cost::of(self.hard + other.hard, self.soft + other.soft)
    }
}

impl Sub for Cost {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Cost::of(self.hard - other.hard, self.soft - other.soft)
    }
}

impl Neg for Cost {
    type Output = Self;

    fn neg(self) -> Self {
        Cost::of(-self.hard, -self.soft)
    }
}

impl AddAssign for Cost {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl SubAssign for Cost {
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl std::iter::Sum for Cost {
    fn sum<I: Iterator<Item = Cost>>(iter: I) -> Self {
        iter.fold(Cost::ZERO, Add::add)
    }
}

impl fmt::Debug for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cost({}, {})", self.hard, self.soft)
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}hard/{}soft", self.hard, self.soft)
    }
}

/// Error when parsing a cost from string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostParseError {
    pub message: String,
}

impl fmt::Display for CostParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cost parse error: {}", self.message)
    }
}

impl std::error::Error for CostParseError {}

impl FromStr for Cost {
    type Err = CostParseError;

    /// Parses the `"{hard}hard/{soft}soft"` form produced by `Display`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (hard_part, soft_part) = s.split_once('/').ok_or_else(|| CostParseError {
            message: format!("Invalid Cost format '{}': expected 2 parts separated by '/'", s),
        })?;

        let parse_level = |part: &str, suffix: &str| -> Result<i64, CostParseError> {
            let part = part.trim();
            let num = part.strip_suffix(suffix).ok_or_else(|| CostParseError {
                message: format!("part '{}' must end with '{}'", part, suffix),
            })?;
            num.parse::<i64>().map_err(|e| CostParseError {
                message: format!("Invalid {} cost '{}': {}", suffix, num, e),
            })
        };

        Ok(Cost::of(
            parse_level(hard_part, "hard")?,
            parse_level(soft_part, "soft")?,
        ))
    }
}
