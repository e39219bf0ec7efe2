//! Shared test fixtures for Timeforge crates.
//!
//! This crate provides ready-built instances for testing.
//! It does NOT depend on `timeforge-solution` to avoid circular dependencies.
//!
//! - [`school`] - a two-day school week with every constraint kind
//! - [`times`] - bare instances with N times and a few resources
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! timeforge-test = { workspace = true }
//! ```
//!
//! Then import the fixtures you need:
//!
//! ```ignore
//! use timeforge_test::school::SchoolWeek;
//! use timeforge_test::times::bare_instance;
//! ```

pub mod school;
pub mod times;

pub use school::SchoolWeek;
pub use times::bare_instance;
