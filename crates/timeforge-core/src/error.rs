//! Error types for Timeforge

use thiserror::Error;

/// Main error type for instance construction
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeforgeError {
    /// An instance needs at least one time
    #[error("Instance error: the cycle has no times")]
    NoTimes,

    /// A time index outside the cycle
    #[error("Instance error: time {time} is outside the cycle of {cycle_len} times")]
    TimeOutOfRange { time: usize, cycle_len: usize },

    /// An event with zero duration
    #[error("Instance error: event '{0}' has zero duration")]
    ZeroDuration(String),

    /// A preassigned time that leaves no room for the event's duration
    #[error("Instance error: event '{event}' cannot start at time {time}")]
    PreassignedTimeOutOfRange { event: String, time: usize },

    /// A reference to an entity that does not exist
    #[error("Instance error: unknown {kind} {index}")]
    UnknownReference { kind: &'static str, index: usize },

    /// A time group built for a different cycle length
    #[error("Instance error: time group '{0}' belongs to a different cycle")]
    ForeignTimeGroup(String),

    /// A preassigned resource outside its event resource's domain
    #[error("Instance error: preassigned resource {resource} is not in the domain of event resource {event_resource}")]
    PreassignedResourceOutsideDomain {
        resource: usize,
        event_resource: usize,
    },

    /// A limit constraint whose minimum exceeds its maximum
    #[error("Instance error: constraint '{0}' has minimum greater than maximum")]
    InvalidLimits(String),
}

/// Result type alias for Timeforge operations
pub type Result<T> = std::result::Result<T, TimeforgeError>;
