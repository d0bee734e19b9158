//! End-to-end appointment optimizer.
//!
//! One invocation walks `Idle → Built → Seeded → Solving → {status}`:
//!
//! 1. **Built**: the instance is checked and the assignment model built.
//! 2. **Seeded**: the greedy heuristic computes a feasible start.
//! 3. **Solving**: the backend solves the model, seeded when enabled.
//! 4. The schedule is extracted and returned with the solver status.
//!
//! Nothing is retried. A non-optimal status is a normal result.

use serde::{Deserialize, Serialize};

use super::greedy::GreedyScheduler;
use crate::config::OptimizerConfig;
use crate::error::ModelError;
use crate::mip::{extract, AssignmentModel, MipSolver, ModelBuilder};
use crate::models::{Appointment, Instance, Schedule};
use crate::validation::{diagnose, Diagnostic};

/// Size of the model handed to the solver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelStats {
    /// All variables, auxiliaries included.
    pub variables: usize,
    /// Assignment variables only.
    pub assignment_variables: usize,
    pub constraints: usize,
}

impl ModelStats {
    fn of(model: &AssignmentModel) -> Self {
        Self {
            variables: model.variable_count(),
            assignment_variables: model.assignments().count(),
            constraints: model.constraint_count(),
        }
    }
}

/// Everything one optimizer invocation produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationReport {
    /// The solver's schedule.
    pub schedule: Schedule,
    /// The greedy start, whether or not it was passed to the solver.
    pub seed: Vec<Appointment>,
    pub stats: ModelStats,
    /// Input warnings, doctors first then patients.
    pub diagnostics: Vec<Diagnostic>,
}

/// Builds, seeds and solves the assignment model of an instance.
///
/// # Example
///
/// ```
/// use u_appoint::config::OptimizerConfig;
/// use u_appoint::mip::SolverStatus;
/// use u_appoint::models::Instance;
/// use u_appoint::scheduler::Optimizer;
///
/// let instance = Instance::new(1, 1, 1)
///     .with_capacity(0, 1.0)
///     .with_competence(0, 0)
///     .with_doctor_location(0, 0)
///     .with_patient_location(0, 0, 0)
///     .with_doctor_hour(0, 0, 0)
///     .with_patient_hour(0, 0, 0);
///
/// let report = Optimizer::new(OptimizerConfig::default()).run(&instance).unwrap();
/// assert_eq!(report.schedule.status, SolverStatus::Optimal);
/// assert_eq!(report.schedule.objective(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Optimizer<S> {
    solver: S,
    config: OptimizerConfig,
}

#[cfg(feature = "microlp")]
impl Optimizer<crate::mip::MicroLpSolver> {
    /// Creates an optimizer on the default pure-Rust backend.
    pub fn new(config: OptimizerConfig) -> Self {
        Self::with_solver(crate::mip::MicroLpSolver::new(), config)
    }
}

impl<S: MipSolver> Optimizer<S> {
    /// Creates an optimizer on the given backend.
    pub fn with_solver(solver: S, config: OptimizerConfig) -> Self {
        Self { solver, config }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Runs one invocation.
    ///
    /// # Errors
    /// - [`ModelError::Config`] for an invalid configuration.
    /// - [`ModelError::InvalidInput`] when the instance matrices do not
    ///   match its index sets.
    /// - [`ModelError::InvalidModel`] when the backend rejects the model.
    pub fn run(&self, instance: &Instance) -> Result<OptimizationReport, ModelError> {
        self.config.validate()?;

        let model = ModelBuilder::new(instance)
            .with_materialization(self.config.materialization)
            .build()?;
        let stats = ModelStats::of(&model);

        let diagnostics = diagnose(instance);
        for d in &diagnostics {
            tracing::warn!(kind = ?d.kind, "{}", d.message);
        }
        tracing::info!(
            doctors = instance.doctors,
            patients = instance.patients,
            locations = instance.locations,
            variables = stats.variables,
            constraints = stats.constraints,
            "built"
        );

        let seed = GreedyScheduler::new().schedule(instance);
        tracing::info!(appointments = seed.len(), "seeded");

        let start = self
            .config
            .solver
            .warm_start
            .then(|| model.warm_start(&seed));
        tracing::info!(backend = self.solver.name(), warm_start = start.is_some(), "solving");
        let outcome = self
            .solver
            .solve(&model, start.as_deref(), &self.config.solver)?;

        let schedule = extract(&model, &outcome);
        tracing::info!(
            status = %schedule.status,
            appointments = schedule.appointment_count(),
            greedy = seed.len(),
            seconds = schedule.solve_seconds,
            "optimization finished"
        );

        Ok(OptimizationReport {
            schedule,
            seed,
            stats,
            diagnostics,
        })
    }
}

#[cfg(feature = "parallel")]
impl<S: MipSolver + Sync> Optimizer<S> {
    /// Runs independent invocations in parallel, one per instance.
    ///
    /// Results are returned in input order.
    pub fn run_batch(
        &self,
        instances: &[Instance],
    ) -> Vec<Result<OptimizationReport, ModelError>> {
        use rayon::prelude::*;

        instances.par_iter().map(|inst| self.run(inst)).collect()
    }
}
