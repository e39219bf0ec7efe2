//! Configuration system for Timeforge.
//!
//! Load solution configuration from TOML or YAML to control invariant
//! checking, the matching bridge and monitor attachment without code
//! changes.
//!
//! # Examples
//!
//! ```
//! use timeforge_config::{EnvironmentMode, MatchingMode, SolutionConfig};
//!
//! let config = SolutionConfig::from_toml_str(r#"
//!     environment_mode = "full_assert"
//!
//!     [matching]
//!     mode = "eval_resources"
//!
//!     [monitors]
//!     attach_check = false
//! "#).unwrap();
//!
//! assert_eq!(config.environment_mode, EnvironmentMode::FullAssert);
//! assert_eq!(config.matching.mode, MatchingMode::EvalResources);
//! assert!(!config.monitors.attach_check);
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use timeforge_config::SolutionConfig;
//!
//! let config = SolutionConfig::load("timeforge.toml").unwrap_or_default();
//! assert!(config.monitors.attach_check);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(test)]
mod tests;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main solution configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SolutionConfig {
    /// Environment mode affecting assertions.
    #[serde(default)]
    pub environment_mode: EnvironmentMode,

    /// Matching bridge configuration.
    #[serde(default)]
    pub matching: MatchingConfig,

    /// Monitor configuration.
    #[serde(default)]
    pub monitors: MonitorConfig,
}

impl SolutionConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects combinations that cannot work together.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.matching.check_bases && !self.matching.mode.needs_root_bases() {
            return Err(ConfigError::Invalid(
                "matching.check_bases requires mode eval_times or solve".to_string(),
            ));
        }
        Ok(())
    }

    /// Sets the environment mode.
    pub fn with_environment_mode(mut self, mode: EnvironmentMode) -> Self {
        self.environment_mode = mode;
        self
    }

    /// Sets the matching mode.
    pub fn with_matching_mode(mut self, mode: MatchingMode) -> Self {
        self.matching.mode = mode;
        self
    }

    /// Enables or disables the monitor attach-check optimization.
    pub fn with_attach_check(mut self, enabled: bool) -> Self {
        self.monitors.attach_check = enabled;
        self
    }

    /// Returns true if invariants should be verified after every edit.
    pub fn full_assert(&self) -> bool {
        self.environment_mode == EnvironmentMode::FullAssert
    }
}

/// Environment mode affecting solution behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentMode {
    /// Minimal overhead.
    #[default]
    Production,

    /// Fast assert mode with basic assertions.
    FastAssert,

    /// Full assert mode: invariants are checked after every structural edit.
    FullAssert,
}

/// How much of the matching bridge is kept up to date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchingMode {
    /// No demand is matched.
    Disabled,

    /// Demand is matched against resources only; bases stay meet-local.
    EvalResources,

    /// Demand is matched against resources at each time.
    EvalTimes,

    /// Full matching with root-relative bases.
    #[default]
    Solve,
}

impl MatchingMode {
    /// Returns true if demand chunks must be based on the supply chunks of
    /// the root meet at absolute offsets.
    pub fn needs_root_bases(self) -> bool {
        matches!(self, MatchingMode::EvalTimes | MatchingMode::Solve)
    }

    /// Returns true if any matching is performed at all.
    pub fn is_enabled(self) -> bool {
        self != MatchingMode::Disabled
    }
}

/// Matching bridge configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MatchingConfig {
    /// Matching mode.
    #[serde(default)]
    pub mode: MatchingMode,

    /// Verify chunk bases as part of the invariant check.
    #[serde(default)]
    pub check_bases: bool,
}

/// Monitor configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MonitorConfig {
    /// Let monitors detach while they provably cannot report a cost.
    #[serde(default = "default_true")]
    pub attach_check: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self { attach_check: true }
    }
}

fn default_true() -> bool {
    true
}
