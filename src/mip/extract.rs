//! Reads a schedule back from a solver outcome.

use super::model::AssignmentModel;
use super::solver::SolveOutcome;
use crate::models::Schedule;

/// Values above this count as an active binary.
///
/// Backends return binaries as floats; anything meaningfully above zero
/// is treated as 1.
pub const ACTIVE_THRESHOLD: f64 = 1e-6;

/// Collects every active assignment variable into a [`Schedule`].
///
/// Appointments follow variable creation order, i.e. (m, p, d, h, l).
/// Status and duration are copied from the outcome; an outcome without
/// values yields an empty schedule.
pub fn extract(model: &AssignmentModel, outcome: &SolveOutcome) -> Schedule {
    let mut appointments = Vec::new();
    for (id, appointment) in model.assignments() {
        if outcome.value(id) > ACTIVE_THRESHOLD {
            tracing::debug!(%appointment, "appointment");
            appointments.push(appointment);
        }
    }

    Schedule {
        appointments,
        status: outcome.status,
        solve_seconds: outcome.duration.as_secs_f64(),
    }
}
