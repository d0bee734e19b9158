//! Error types.
//!
//! Only structural problems are errors. Solver outcomes such as
//! infeasibility are reported through [`crate::mip::SolverStatus`].

use thiserror::Error;

use crate::config::ConfigError;
use crate::validation::ValidationError;

/// Failure to construct or hand over an assignment model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Input matrices do not match the declared index sets.
    #[error("invalid input: {} problem(s), first: {}", .0.len(), first_message(.0))]
    InvalidInput(Vec<ValidationError>),

    /// A model references variables it does not define.
    #[error("invalid model: {0}")]
    InvalidModel(String),

    /// Optimizer configuration rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn first_message(errors: &[ValidationError]) -> &str {
    errors.first().map(|e| e.message.as_str()).unwrap_or("none")
}

/// Result type alias for model construction.
pub type Result<T> = std::result::Result<T, ModelError>;
