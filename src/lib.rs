//! Weekly appointment assignment for the U-Engine ecosystem.
//!
//! Assigns recurring weekly appointment slots between doctors and patients
//! under availability, competence and location constraints, maximizing
//! the number of appointments. The problem is encoded as a binary
//! integer program, seeded with a greedy feasible start and solved by an
//! external backend through `good_lp`.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Instance`, `Appointment`, `Schedule`,
//!   weekly grid constants
//! - **`validation`**: Input shape checks, per-entity diagnostics,
//!   appointment auditing
//! - **`mip`**: Assignment model, model builder, solver backends, extraction
//! - **`scheduler`**: Greedy start, `Optimizer` orchestration, KPIs
//! - **`intake`**: Age-group competence and remote restrictions
//! - **`synthetic`**: Seeded random instances
//! - **`config`**: `OptimizerConfig`, TOML loading
//!
//! # Example
//!
//! ```
//! use u_appoint::config::OptimizerConfig;
//! use u_appoint::models::Instance;
//! use u_appoint::scheduler::Optimizer;
//!
//! // one doctor, two patients competing for the same Monday 08:00 slot
//! let instance = Instance::new(1, 2, 1)
//!     .with_capacity(0, 5.0)
//!     .with_full_competence(0)
//!     .with_doctor_location(0, 0)
//!     .with_doctor_hour(0, 0, 0)
//!     .with_patient_location(0, 0, 0)
//!     .with_patient_location(1, 0, 0)
//!     .with_patient_hour(0, 0, 0)
//!     .with_patient_hour(1, 0, 0);
//!
//! let report = Optimizer::new(OptimizerConfig::default()).run(&instance).unwrap();
//! assert!(report.schedule.is_optimal());
//! assert_eq!(report.schedule.objective(), 1);
//! ```
//!
//! # Feature Flags
//!
//! - `microlp` (default): pure-Rust backend
//! - `cbc`: COIN-OR CBC backend
//! - `parallel`: `Optimizer::run_batch` on rayon
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Wolsey (2020), "Integer Programming", 2nd ed.

pub mod config;
pub mod error;
pub mod intake;
pub mod mip;
pub mod models;
pub mod scheduler;
pub mod synthetic;
pub mod validation;

pub use error::{ModelError, Result};
