//! Binary integer-programming layer.
//!
//! Builds the appointment assignment model, hands it to a solver backend
//! and reads the schedule back.
//!
//! ```text
//! Instance ──ModelBuilder──▶ AssignmentModel ──MipSolver──▶ SolveOutcome ──extract──▶ Schedule
//! ```
//!
//! # Reference
//! - Wolsey (2020), "Integer Programming", 2nd ed.

mod builder;
mod extract;
mod model;
mod solver;

pub use builder::{Materialization, ModelBuilder};
pub use extract::{extract, ACTIVE_THRESHOLD};
pub use model::{
    AssignmentModel, BinaryVar, ConstraintFamily, Exclusion, LinearConstraint, Sense, VarId,
    VarKind,
};
#[cfg(feature = "cbc")]
pub use solver::CbcSolver;
#[cfg(feature = "microlp")]
pub use solver::MicroLpSolver;
pub use solver::{MipSolver, SolveOutcome, SolverConfig, SolverStatus};
