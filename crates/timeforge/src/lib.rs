//! Timeforge - incrementally costed timetabling solutions in Rust
//!
//! Build an [`Instance`], open a [`Solution`] on it and edit: every edit is
//! checked first, and the solution's [`Cost`] is current after each one.
//!
//! # Example
//!
//! ```rust
//! use timeforge::prelude::*;
//! use timeforge_test::SchoolWeek;
//!
//! let school = SchoolWeek::new();
//! let config = SolutionConfig::new().with_environment_mode(EnvironmentMode::FullAssert);
//! let mut solution = Solution::with_config(school.instance.clone(), config);
//!
//! let meets = solution.make_event_meets().unwrap();
//! solution.assign_time(meets[0], 0).unwrap();
//! assert!(solution.cost().hard() > 0);
//! ```

// Instance model and costs
pub use timeforge_core::{
    Constraint, ConstraintCost, ConstraintKind, Cost, CostFunction, CostLevel, Event,
    EventId, EventResource, EventResourceId, Instance, InstanceBuilder, Resource,
    ResourceGroup, ResourceGroupId, ResourceId, Time, TimeGroup, TimeforgeError,
};

// Configuration
pub use timeforge_config::{
    ConfigError, EnvironmentMode, MatchingConfig, MatchingMode, MonitorConfig, SolutionConfig,
};

// Solutions
pub use timeforge_solution::{
    MeetId, Monitor, MonitorId, NodeId, Solution, SolutionCopier, SolutionError, TagCost,
    TaskId, TransactionId, ZoneId, ROOT_MONITOR, WORKLOAD_SCALE,
};

/// Lower-level solution parts: arenas, chunks, operation logs.
pub mod solution {
    pub use timeforge_solution::*;
}

#[cfg(feature = "console")]
pub mod console;

pub mod prelude {
    pub use super::{Cost, EventId, Instance, InstanceBuilder, ResourceId, TimeGroup};
    pub use super::{EnvironmentMode, MatchingMode, SolutionConfig};
    pub use super::{MeetId, Solution, SolutionError, TaskId, TransactionId};
}
