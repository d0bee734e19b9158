//! Optimizer configuration.
//!
//! Configuration can be built in code or loaded from TOML:
//!
//! ```
//! use u_appoint::config::OptimizerConfig;
//! use u_appoint::mip::Materialization;
//!
//! let config = OptimizerConfig::from_toml_str(r#"
//!     materialization = "dense"
//!
//!     [solver]
//!     warm_start = false
//!     time_limit_seconds = 30.0
//! "#).unwrap();
//!
//! assert_eq!(config.materialization, Materialization::Dense);
//! assert_eq!(config.solver.time_limit_seconds, Some(30.0));
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::mip::{Materialization, SolverConfig};

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Settings for one optimizer invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// How the assignment variable space is materialized.
    pub materialization: Materialization,
    /// Settings forwarded to the solver backend.
    pub solver: SolverConfig,
}

impl OptimizerConfig {
    pub fn with_materialization(mut self, materialization: Materialization) -> Self {
        self.materialization = materialization;
        self
    }

    pub fn with_warm_start(mut self, warm_start: bool) -> Self {
        self.solver.warm_start = warm_start;
        self
    }

    pub fn with_time_limit_seconds(mut self, seconds: f64) -> Self {
        self.solver.time_limit_seconds = Some(seconds);
        self
    }

    /// Parses a configuration from a TOML string and validates it.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(limit) = self.solver.time_limit_seconds {
            if !limit.is_finite() || limit <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "time_limit_seconds must be positive, got {limit}"
                )));
            }
        }
        Ok(())
    }
}
