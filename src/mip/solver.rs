//! Solver interface and `good_lp` backends.
//!
//! [`MipSolver`] hands an [`AssignmentModel`] to an integer-programming
//! backend and classifies the outcome. Non-optimal outcomes are reported
//! through [`SolverStatus`]; only a malformed model is an error.
//!
//! Backends are selected by cargo feature:
//!
//! | Feature | Backend | Warm start | Time limit |
//! |---------|---------|------------|------------|
//! | `microlp` (default) | [`MicroLpSolver`] | yes | yes |
//! | `cbc` | [`CbcSolver`] | yes | yes |
//!
//! A backend stopped by its time limit still hands back its incumbent;
//! the run is then [`SolverStatus::NotSolved`] with values attached.

use std::fmt;
use std::time::{Duration, Instant};

use good_lp::solvers::{
    ResolutionError, Solution, SolutionStatus, Solver, SolverModel, WithInitialSolution,
    WithTimeLimit,
};
use good_lp::{constraint, variable, Constraint, Expression, ProblemVariables, Variable};
use serde::{Deserialize, Serialize};

use super::model::{AssignmentModel, LinearConstraint, Sense, VarId};
use crate::error::ModelError;

/// Classification of a solver run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SolverStatus {
    /// Proven optimal solution found.
    Optimal,
    /// No feasible solution exists.
    Infeasible,
    /// Objective unbounded.
    Unbounded,
    /// Backend stopped before proving optimality; an incumbent may be
    /// attached.
    NotSolved,
    /// Backend reported an unexpected failure.
    Undefined,
}

impl SolverStatus {
    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            SolverStatus::Optimal => "Optimal",
            SolverStatus::Infeasible => "Infeasible",
            SolverStatus::Unbounded => "Unbounded",
            SolverStatus::NotSolved => "Not Solved",
            SolverStatus::Undefined => "Undefined",
        }
    }
}

impl fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Solver configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Pass the greedy start to the backend.
    pub warm_start: bool,
    /// Backend time limit in seconds.
    pub time_limit_seconds: Option<f64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            warm_start: true,
            time_limit_seconds: None,
        }
    }
}

/// Result of one solver run.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOutcome {
    pub status: SolverStatus,
    /// Value per model variable, indexed by [`VarId`]. Empty when the
    /// backend produced no solution.
    pub values: Vec<f64>,
    /// Wall-clock time spent in the backend.
    pub duration: Duration,
    /// Objective value (0 without a solution).
    pub objective: f64,
}

impl SolveOutcome {
    /// An outcome without a solution.
    pub fn empty(status: SolverStatus, duration: Duration) -> Self {
        Self {
            status,
            values: Vec::new(),
            duration,
            objective: 0.0,
        }
    }

    /// Value of a variable; 0 when absent.
    pub fn value(&self, var: VarId) -> f64 {
        self.values.get(var.index()).copied().unwrap_or(0.0)
    }
}

/// Trait for integer-programming backends.
pub trait MipSolver {
    /// Solves the model, optionally seeded with a start vector
    /// (one value per variable).
    ///
    /// # Errors
    /// [`ModelError::InvalidModel`] when the model references undefined
    /// variables or the start vector has the wrong length.
    fn solve(
        &self,
        model: &AssignmentModel,
        start: Option<&[f64]>,
        config: &SolverConfig,
    ) -> Result<SolveOutcome, ModelError>;

    /// Backend name for logging.
    fn name(&self) -> &'static str;
}

// ============================================================================
// Shared lowering
// ============================================================================

/// Checks the model and start vector before any backend is touched.
///
/// Returns `Some(outcome)` when the model is trivial.
fn precheck(
    model: &AssignmentModel,
    start: Option<&[f64]>,
) -> Result<Option<SolveOutcome>, ModelError> {
    model.validate()?;
    if let Some(values) = start {
        if values.len() != model.variable_count() {
            return Err(ModelError::InvalidModel(format!(
                "start vector has {} values, model has {} variables",
                values.len(),
                model.variable_count()
            )));
        }
    }
    if model.variable_count() == 0 {
        return Ok(Some(SolveOutcome::empty(
            SolverStatus::Optimal,
            Duration::ZERO,
        )));
    }
    Ok(None)
}

fn lower_constraint(c: &LinearConstraint, handles: &[Variable]) -> Constraint {
    let lhs: Expression = c
        .terms
        .iter()
        .map(|&(v, coef)| handles[v.index()] * coef)
        .sum();
    match c.sense {
        Sense::LessEq => constraint!(lhs <= c.rhs),
        Sense::Equal => constraint!(lhs == c.rhs),
    }
}

/// Builds the backend problem: one binary per model variable, the weighted
/// objective to maximize, every constraint.
fn lower<S: Solver>(model: &AssignmentModel, solver: S) -> (S::Model, Vec<Variable>) {
    let mut vars = ProblemVariables::new();
    let handles: Vec<Variable> = model
        .variables()
        .iter()
        .map(|_| vars.add(variable().binary()))
        .collect();
    let objective: Expression = model
        .variables()
        .iter()
        .zip(&handles)
        .filter(|(v, _)| v.objective != 0.0)
        .map(|(v, &x)| x * v.objective)
        .sum();

    let mut problem = vars.maximise(objective).using(solver);
    for c in model.constraints() {
        problem = problem.with(lower_constraint(c, &handles));
    }
    (problem, handles)
}

/// Maps a backend solution status; only a completed proof is optimal.
fn classify(status: SolutionStatus) -> SolverStatus {
    match status {
        SolutionStatus::Optimal => SolverStatus::Optimal,
        SolutionStatus::TimeLimit | SolutionStatus::GapLimit => SolverStatus::NotSolved,
    }
}

/// Applies the start vector and time limit to a lowered problem.
fn seeded<M>(
    mut problem: M,
    handles: &[Variable],
    start: Option<&[f64]>,
    config: &SolverConfig,
) -> M
where
    M: WithInitialSolution + WithTimeLimit,
{
    if let Some(values) = start {
        problem =
            problem.with_initial_solution(handles.iter().copied().zip(values.iter().copied()));
    }
    if let Some(seconds) = config.time_limit_seconds {
        problem = problem.with_time_limit(seconds);
    }
    problem
}

/// Solves a lowered problem and maps the backend result.
fn run<M>(backend: &str, problem: M, handles: &[Variable], model: &AssignmentModel) -> SolveOutcome
where
    M: SolverModel<Error = ResolutionError>,
{
    let started = Instant::now();
    let result = problem.solve();
    let duration = started.elapsed();

    let outcome = match result {
        Ok(solution) => {
            let status = classify(solution.status());
            if status != SolverStatus::Optimal {
                tracing::info!(
                    backend,
                    reason = ?solution.status(),
                    "stopped before proving optimality, keeping incumbent"
                );
            }
            let values: Vec<f64> = handles.iter().map(|&x| solution.value(x)).collect();
            let objective = model.objective_value(&values);
            SolveOutcome {
                status,
                values,
                duration,
                objective,
            }
        }
        Err(ResolutionError::Infeasible) => SolveOutcome::empty(SolverStatus::Infeasible, duration),
        Err(ResolutionError::Unbounded) => SolveOutcome::empty(SolverStatus::Unbounded, duration),
        Err(ResolutionError::Other(reason)) => {
            tracing::debug!(backend, reason, "backend stopped without a result");
            SolveOutcome::empty(SolverStatus::NotSolved, duration)
        }
        Err(err) => {
            tracing::warn!(backend, error = %err, "backend failed");
            SolveOutcome::empty(SolverStatus::Undefined, duration)
        }
    };

    tracing::info!(
        backend,
        status = %outcome.status,
        objective = outcome.objective,
        seconds = outcome.duration.as_secs_f64(),
        "solve finished"
    );
    outcome
}

// ============================================================================
// Backends
// ============================================================================

/// Pure-Rust branch and bound via `good_lp`'s `microlp` backend.
///
/// Applies the start vector as an initial solution and the configured
/// time limit.
#[cfg(feature = "microlp")]
#[derive(Debug, Clone, Copy, Default)]
pub struct MicroLpSolver;

#[cfg(feature = "microlp")]
impl MicroLpSolver {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(feature = "microlp")]
impl MipSolver for MicroLpSolver {
    fn solve(
        &self,
        model: &AssignmentModel,
        start: Option<&[f64]>,
        config: &SolverConfig,
    ) -> Result<SolveOutcome, ModelError> {
        if let Some(trivial) = precheck(model, start)? {
            return Ok(trivial);
        }
        let (problem, handles) = lower(model, good_lp::microlp);
        let problem = seeded(problem, &handles, start, config);
        Ok(run(self.name(), problem, &handles, model))
    }

    fn name(&self) -> &'static str {
        "microlp"
    }
}

/// COIN-OR CBC via `good_lp`'s `coin_cbc` backend.
///
/// Applies the start vector as an initial solution and the configured
/// time limit. Solver log output is silenced.
#[cfg(feature = "cbc")]
#[derive(Debug, Clone, Copy, Default)]
pub struct CbcSolver;

#[cfg(feature = "cbc")]
impl CbcSolver {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(feature = "cbc")]
impl MipSolver for CbcSolver {
    fn solve(
        &self,
        model: &AssignmentModel,
        start: Option<&[f64]>,
        config: &SolverConfig,
    ) -> Result<SolveOutcome, ModelError> {
        if let Some(trivial) = precheck(model, start)? {
            return Ok(trivial);
        }

        let (mut problem, handles) = lower(model, good_lp::coin_cbc);
        problem.set_parameter("log", "0");
        let problem = seeded(problem, &handles, start, config);
        Ok(run(self.name(), problem, &handles, model))
    }

    fn name(&self) -> &'static str {
        "cbc"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mip::model::ConstraintFamily;
    use crate::models::Appointment;

    #[test]
    fn test_status_labels() {
        assert_eq!(SolverStatus::Optimal.to_string(), "Optimal");
        assert_eq!(SolverStatus::NotSolved.to_string(), "Not Solved");
        assert_eq!(SolverStatus::Undefined.label(), "Undefined");
    }

    #[test]
    fn test_only_proven_optimum_is_optimal() {
        assert_eq!(classify(SolutionStatus::Optimal), SolverStatus::Optimal);
        assert_eq!(classify(SolutionStatus::TimeLimit), SolverStatus::NotSolved);
        assert_eq!(classify(SolutionStatus::GapLimit), SolverStatus::NotSolved);
    }

    #[test]
    fn test_outcome_value_defaults_to_zero() {
        let outcome = SolveOutcome::empty(SolverStatus::Infeasible, Duration::ZERO);
        assert_eq!(outcome.value(VarId(3)), 0.0);
    }

    #[test]
    fn test_precheck_empty_model_is_optimal() {
        let model = AssignmentModel::new("empty");
        let outcome = precheck(&model, None).unwrap().unwrap();
        assert_eq!(outcome.status, SolverStatus::Optimal);
        assert_eq!(outcome.objective, 0.0);
    }

    #[test]
    fn test_precheck_rejects_bad_start() {
        let mut model = AssignmentModel::new("m");
        model.add_assignment(Appointment::new(0, 0, 0, 0, 0));
        let err = precheck(&model, Some(&[1.0, 0.0])).unwrap_err();
        assert!(matches!(err, ModelError::InvalidModel(_)));
        assert!(precheck(&model, Some(&[1.0])).unwrap().is_none());
    }

    #[test]
    fn test_precheck_rejects_malformed_model() {
        let mut model = AssignmentModel::new("m");
        model.add_at_most("c".into(), ConstraintFamily::PatientWeekly, &[VarId(1)], 1.0);
        assert!(precheck(&model, None).is_err());
    }

    #[cfg(feature = "microlp")]
    mod backend {
        use super::*;

        /// Two patients competing for one doctor with capacity 1.
        fn contested_model() -> AssignmentModel {
            let mut model = AssignmentModel::new("contested");
            let a = model.add_assignment(Appointment::new(0, 0, 0, 0, 0));
            let b = model.add_assignment(Appointment::new(0, 1, 0, 1, 0));
            model.add_at_most(
                "doctor_capacity_0".into(),
                ConstraintFamily::DoctorCapacity,
                &[a, b],
                1.0,
            );
            model
        }

        #[test]
        fn test_microlp_respects_capacity() {
            let model = contested_model();
            let outcome = MicroLpSolver::new()
                .solve(&model, None, &SolverConfig::default())
                .unwrap();
            assert_eq!(outcome.status, SolverStatus::Optimal);
            assert!((outcome.objective - 1.0).abs() < 1e-6);
            assert!(model.violated_constraints(&outcome.values).is_empty());
        }

        #[test]
        fn test_microlp_accepts_start_and_limit() {
            let model = contested_model();
            let start = model.warm_start(&[Appointment::new(0, 1, 0, 1, 0)]);
            let config = SolverConfig {
                warm_start: true,
                time_limit_seconds: Some(10.0),
            };
            let outcome = MicroLpSolver::new()
                .solve(&model, Some(&start), &config)
                .unwrap();
            assert_eq!(outcome.status, SolverStatus::Optimal);
            assert!((outcome.objective - 1.0).abs() < 1e-6);
            assert!(model.violated_constraints(&outcome.values).is_empty());
        }

        #[test]
        fn test_microlp_time_limit_cuts_solve_short() {
            use crate::mip::ModelBuilder;
            use crate::scheduler::GreedyScheduler;
            use crate::synthetic::{InstanceGenerator, InstanceGeneratorConfig};

            let inst = InstanceGenerator::new(InstanceGeneratorConfig::hard(), 7).generate();
            let model = ModelBuilder::new(&inst).build().unwrap();
            let seed = GreedyScheduler::new().schedule(&inst);
            let start = model.warm_start(&seed);
            let config = SolverConfig {
                warm_start: true,
                time_limit_seconds: Some(0.02),
            };

            let outcome = MicroLpSolver::new()
                .solve(&model, Some(&start), &config)
                .unwrap();
            assert_eq!(outcome.status, SolverStatus::NotSolved);
            assert!(outcome.duration < Duration::from_secs(5));
            if !outcome.values.is_empty() {
                assert!(model.violated_constraints(&outcome.values).is_empty());
                assert!(outcome.objective >= seed.len() as f64 - 1e-6);
            }
        }

        #[test]
        fn test_microlp_equal_constraint() {
            let mut model = AssignmentModel::new("fixed");
            let x = model.add_assignment(Appointment::new(0, 0, 0, 0, 0));
            let y = model.add_assignment(Appointment::new(0, 1, 0, 1, 0));
            model.add_fixed_zero(
                "competence_0_0_0_0_0".into(),
                ConstraintFamily::Exclusion(crate::mip::model::Exclusion::Competence),
                x,
            );
            let outcome = MicroLpSolver::new()
                .solve(&model, None, &SolverConfig::default())
                .unwrap();
            assert!(outcome.value(x) < 0.5);
            assert!(outcome.value(y) > 0.5);
        }
    }
}
