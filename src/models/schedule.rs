//! Schedule (solution) model.
//!
//! A schedule is the ordered list of active appointment tuples produced by
//! one optimizer invocation, together with the solver status and the
//! wall-clock time spent in the solver.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::week::{clock_hour, day_name, REMOTE_LOCATION};
use crate::mip::SolverStatus;

/// One active assignment: doctor `m` sees patient `p` on day `d` at hour
/// slot `h` at location `l`.
///
/// The derived ordering is lexicographic over (m, p, d, h, l), which is the
/// enumeration order of the model variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Appointment {
    pub doctor: usize,
    pub patient: usize,
    pub day: usize,
    pub hour: usize,
    pub location: usize,
}

impl Appointment {
    pub fn new(doctor: usize, patient: usize, day: usize, hour: usize, location: usize) -> Self {
        Self {
            doctor,
            patient,
            day,
            hour,
            location,
        }
    }

    /// Whether the appointment takes place at the remote location.
    #[inline]
    pub fn is_remote(&self) -> bool {
        self.location == REMOTE_LOCATION
    }

    /// Clock hour (8..=20) of the appointment.
    #[inline]
    pub fn clock_hour(&self) -> usize {
        clock_hour(self.hour)
    }

    /// The tuple as `(m, p, d, h, l)`.
    pub fn as_tuple(&self) -> (usize, usize, usize, usize, usize) {
        (self.doctor, self.patient, self.day, self.hour, self.location)
    }
}

impl fmt::Display for Appointment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "doctor {} attends patient {} on {} at {:02}:00 at location {}",
            self.doctor,
            self.patient,
            day_name(self.day).unwrap_or("?"),
            self.clock_hour(),
            self.location
        )
    }
}

/// Result of one optimizer invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Active appointments in (m, p, d, h, l) order.
    pub appointments: Vec<Appointment>,
    /// Solver outcome classification.
    pub status: SolverStatus,
    /// Wall-clock solve time in seconds.
    pub solve_seconds: f64,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            appointments: Vec::new(),
            status: SolverStatus::NotSolved,
            solve_seconds: 0.0,
        }
    }
}

impl Schedule {
    /// Creates an empty schedule with the given status.
    pub fn empty(status: SolverStatus) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    /// Whether the solver proved optimality.
    ///
    /// Only optimal schedules are meant for export.
    pub fn is_optimal(&self) -> bool {
        self.status == SolverStatus::Optimal
    }

    /// Objective value: the number of appointments.
    pub fn objective(&self) -> usize {
        self.appointments.len()
    }

    /// Number of appointments.
    pub fn appointment_count(&self) -> usize {
        self.appointments.len()
    }

    /// All appointments of a doctor.
    pub fn for_doctor(&self, doctor: usize) -> Vec<&Appointment> {
        self.appointments
            .iter()
            .filter(|a| a.doctor == doctor)
            .collect()
    }

    /// The appointment of a patient, if any.
    pub fn for_patient(&self, patient: usize) -> Option<&Appointment> {
        self.appointments.iter().find(|a| a.patient == patient)
    }

    /// Whether a patient received an appointment.
    pub fn is_scheduled(&self, patient: usize) -> bool {
        self.for_patient(patient).is_some()
    }

    /// Patients in `0..patients` without an appointment, in index order.
    pub fn unassigned_patients(&self, patients: usize) -> Vec<usize> {
        let mut seen = vec![false; patients];
        for a in &self.appointments {
            if let Some(s) = seen.get_mut(a.patient) {
                *s = true;
            }
        }
        seen.iter()
            .enumerate()
            .filter(|(_, &s)| !s)
            .map(|(p, _)| p)
            .collect()
    }
}

/// A broken hard constraint found when auditing an appointment list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// The appointment that triggered the violation.
    pub appointment: Appointment,
    /// Human-readable description.
    pub message: String,
}

/// Classification of hard-constraint violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// An index lies outside the instance's index sets.
    OutOfRange,
    /// Doctor booked beyond weekly capacity.
    CapacityExceeded,
    /// Doctor booked twice in the same day/hour slot.
    DoctorDoubleBooked,
    /// Patient booked more than once in the week.
    PatientDoubleBooked,
    /// Doctor not competent for the patient.
    CompetenceMismatch,
    /// Doctor not available at the slot.
    DoctorUnavailable,
    /// Patient not available at the slot.
    PatientUnavailable,
    /// Doctor does not work at the location.
    DoctorLocationMismatch,
    /// Patient cannot attend the location on that day.
    PatientLocationMismatch,
    /// Doctor uses a second physical location on the same day.
    MultipleLocations,
}

impl Violation {
    pub fn new(
        violation_type: ViolationType,
        appointment: Appointment,
        message: impl Into<String>,
    ) -> Self {
        Self {
            violation_type,
            appointment,
            message: message.into(),
        }
    }
}
