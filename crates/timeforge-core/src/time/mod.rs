//! Time points and time groups.
//!
//! Times are the integers `0..cycle_len` of an instance's cycle. A
//! [`TimeGroup`] is an immutable set of times shared through `Arc`; meets use
//! time groups as their domains (the set of start times they may take).

mod group;

#[cfg(test)]
mod tests;

pub use group::TimeGroup;

/// A named time point of the cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Time {
    pub name: String,
    pub index: usize,
}

impl Time {
    pub fn new(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }
}
