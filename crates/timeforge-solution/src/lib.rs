//! Incrementally costed timetabling solutions.
//!
//! A [`Solution`] owns a tree of meets (time intervals assigned into other
//! time intervals, rooted at cycle meets that carry absolute times), the
//! tasks those meets require resources for, nodes grouping meets, and a tree
//! of monitors that keeps the solution's cost current after every edit.
//!
//! # Quick start
//!
//! ```
//! use timeforge_solution::Solution;
//! use timeforge_test::SchoolWeek;
//!
//! let school = SchoolWeek::new();
//! let mut solution = Solution::new(school.instance.clone());
//! let meets = solution.make_event_meets().unwrap();
//! assert_eq!(meets.len(), 4);
//!
//! // Only the preassigned science lesson has a time so far.
//! let before = solution.cost();
//! solution.assign_time(meets[0], 0).unwrap();
//! assert!(solution.cost() < before);
//! ```

pub mod arena;
pub mod error;
pub mod ids;
pub mod matching;
pub mod meet;
pub mod monitor;
pub mod node;
pub mod solution;
pub mod task;
pub mod timetable;
pub mod transaction;

pub use arena::Arena;
pub use error::{Result, SolutionError};
pub use ids::{
    BackRef, DemandChunkId, MeetId, MonitorId, NodeId, SupplyChunkId, TaskId, TransactionId,
    ZoneId,
};
pub use matching::{ChunkMatching, DemandChunk, DemandNode, SupplyChunk};
pub use meet::Meet;
pub use monitor::{DeviationMonitor, GroupMonitor, Monitor, MonitorKind};
pub use node::Node;
pub use solution::{Solution, SolutionCopier, TagCost, ROOT_MONITOR};
pub use task::{Task, WORKLOAD_SCALE};
pub use timetable::{OccupancyChange, Timetable};
pub use transaction::{MeetRecord, Operation, SplitRecord, TaskPair, TaskRecord, Transaction};
