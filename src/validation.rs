//! Input validation, diagnostics and schedule auditing.
//!
//! Three levels of checking:
//! - [`validate_instance`]: shape errors. Fatal; the model cannot be built.
//! - [`diagnose`]: per-entity warnings. The optimizer runs anyway; a doctor
//!   or patient flagged here simply receives no appointment.
//! - [`verify_appointments`]: re-checks the hard constraints on any list of
//!   appointments (greedy start, solver output, or external schedules).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::models::{Appointment, Instance, Violation, ViolationType, DAYS, HOURS, REMOTE_LOCATION};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A shape error in the input matrices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Which input the shape error concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationErrorKind {
    CapacityShape,
    CompetenceShape,
    DoctorLocationShape,
    PatientLocationShape,
    PatientHoursShape,
    DoctorHoursShape,
    /// A patient age is missing, negative or the age list has the wrong length.
    PatientAge,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Validates that every matrix matches the declared index sets.
///
/// Checks:
/// 1. `capacity` has one entry per doctor
/// 2. `competence` is `doctors × patients`
/// 3. `doctor_locations` is `doctors × locations`
/// 4. `patient_locations` is `patients × locations × DAYS`
/// 5. `patient_hours` is `patients × DAYS × HOURS`
/// 6. `doctor_hours` is `doctors × DAYS × HOURS`
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with every detected mismatch.
pub fn validate_instance(instance: &Instance) -> ValidationResult {
    let mut errors = Vec::new();

    if instance.capacity.len() != instance.doctors {
        errors.push(ValidationError::new(
            ValidationErrorKind::CapacityShape,
            format!(
                "capacity has {} entries, expected {}",
                instance.capacity.len(),
                instance.doctors
            ),
        ));
    }

    check_matrix(
        &mut errors,
        ValidationErrorKind::CompetenceShape,
        "competence",
        &instance.competence,
        instance.doctors,
        instance.patients,
    );
    check_matrix(
        &mut errors,
        ValidationErrorKind::DoctorLocationShape,
        "doctor_locations",
        &instance.doctor_locations,
        instance.doctors,
        instance.locations,
    );
    check_tensor(
        &mut errors,
        ValidationErrorKind::PatientLocationShape,
        "patient_locations",
        &instance.patient_locations,
        [instance.patients, instance.locations, DAYS],
    );
    check_tensor(
        &mut errors,
        ValidationErrorKind::PatientHoursShape,
        "patient_hours",
        &instance.patient_hours,
        [instance.patients, DAYS, HOURS],
    );
    check_tensor(
        &mut errors,
        ValidationErrorKind::DoctorHoursShape,
        "doctor_hours",
        &instance.doctor_hours,
        [instance.doctors, DAYS, HOURS],
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_matrix(
    errors: &mut Vec<ValidationError>,
    kind: ValidationErrorKind,
    name: &str,
    matrix: &[Vec<bool>],
    rows: usize,
    cols: usize,
) {
    if matrix.len() != rows {
        errors.push(ValidationError::new(
            kind,
            format!("{name} has {} rows, expected {rows}", matrix.len()),
        ));
        return;
    }
    if let Some((i, row)) = matrix.iter().enumerate().find(|(_, r)| r.len() != cols) {
        errors.push(ValidationError::new(
            kind,
            format!("{name}[{i}] has {} entries, expected {cols}", row.len()),
        ));
    }
}

fn check_tensor(
    errors: &mut Vec<ValidationError>,
    kind: ValidationErrorKind,
    name: &str,
    tensor: &[Vec<Vec<bool>>],
    [n0, n1, n2]: [usize; 3],
) {
    if tensor.len() != n0 {
        errors.push(ValidationError::new(
            kind,
            format!("{name} has {} entries, expected {n0}", tensor.len()),
        ));
        return;
    }
    for (i, plane) in tensor.iter().enumerate() {
        if plane.len() != n1 {
            errors.push(ValidationError::new(
                kind,
                format!("{name}[{i}] has {} entries, expected {n1}", plane.len()),
            ));
            return;
        }
        if let Some((j, row)) = plane.iter().enumerate().find(|(_, r)| r.len() != n2) {
            errors.push(ValidationError::new(
                kind,
                format!("{name}[{i}][{j}] has {} entries, expected {n2}", row.len()),
            ));
            return;
        }
    }
}

// ============================================================================
// Diagnostics
// ============================================================================

/// Severity of a diagnostic record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Warning,
    Error,
}

/// The entity a diagnostic is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Subject {
    Doctor(usize),
    Patient(usize),
}

/// Category of a diagnostic record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// Capacity is missing, non-numeric or zero; the doctor is not booked.
    DoctorWithoutCapacity,
    /// The doctor has no free hour in the week.
    DoctorWithoutHours,
    /// The patient cannot attend any location on any day.
    PatientWithoutLocations,
    /// The patient has no free hour in the week.
    PatientWithoutHours,
    /// No doctor is competent for the patient.
    PatientWithoutCompetentDoctor,
}

/// A structured warning about one doctor or patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub subject: Subject,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    fn warning(subject: Subject, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            subject,
            kind,
            message: message.into(),
        }
    }
}

/// Collects per-entity warnings for an instance.
///
/// Records are ordered: doctors first, then patients, each in index order.
/// None of them stop the optimizer.
pub fn diagnose(instance: &Instance) -> Vec<Diagnostic> {
    let mut out = Vec::new();

    for m in 0..instance.doctors {
        if !instance.is_bookable(m) {
            out.push(Diagnostic::warning(
                Subject::Doctor(m),
                DiagnosticKind::DoctorWithoutCapacity,
                format!("doctor {m} has no weekly capacity and will not be scheduled"),
            ));
        }
        if !any_hour(|d, h| instance.doctor_free(m, d, h)) {
            out.push(Diagnostic::warning(
                Subject::Doctor(m),
                DiagnosticKind::DoctorWithoutHours,
                format!("doctor {m} has no available hours and will not be scheduled"),
            ));
        }
    }

    for p in 0..instance.patients {
        let attends_somewhere = (0..instance.locations)
            .any(|l| (0..DAYS).any(|d| instance.patient_attends(p, l, d)));
        if !attends_somewhere {
            out.push(Diagnostic::warning(
                Subject::Patient(p),
                DiagnosticKind::PatientWithoutLocations,
                format!("patient {p} has no available locations and will not be scheduled"),
            ));
        }
        if !any_hour(|d, h| instance.patient_free(p, d, h)) {
            out.push(Diagnostic::warning(
                Subject::Patient(p),
                DiagnosticKind::PatientWithoutHours,
                format!("patient {p} has no available hours and will not be scheduled"),
            ));
        }
        if !(0..instance.doctors).any(|m| instance.is_competent(m, p)) {
            out.push(Diagnostic::warning(
                Subject::Patient(p),
                DiagnosticKind::PatientWithoutCompetentDoctor,
                format!("no doctor is competent for patient {p}"),
            ));
        }
    }

    out
}

fn any_hour(free: impl Fn(usize, usize) -> bool) -> bool {
    (0..DAYS).any(|d| (0..HOURS).any(|h| free(d, h)))
}

// ============================================================================
// Appointment auditing
// ============================================================================

/// Re-checks the hard constraints on a list of appointments.
///
/// Reports, per appointment in list order: out-of-range indices, failed
/// competence/availability/location predicates, a second booking of the
/// same doctor slot or patient, capacity overflow, and a second physical
/// location for the same doctor and day. An empty result means the list is
/// a feasible assignment.
pub fn verify_appointments(instance: &Instance, appointments: &[Appointment]) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut doctor_load: HashMap<usize, usize> = HashMap::new();
    let mut doctor_slots: HashMap<(usize, usize, usize), Appointment> = HashMap::new();
    let mut patient_seen: HashMap<usize, Appointment> = HashMap::new();
    let mut day_location: HashMap<(usize, usize), usize> = HashMap::new();

    for &a in appointments {
        if a.doctor >= instance.doctors
            || a.patient >= instance.patients
            || a.location >= instance.locations
            || a.day >= DAYS
            || a.hour >= HOURS
        {
            violations.push(Violation::new(
                ViolationType::OutOfRange,
                a,
                format!("{:?} lies outside the instance", a.as_tuple()),
            ));
            continue;
        }

        let predicates = [
            (
                instance.is_competent(a.doctor, a.patient),
                ViolationType::CompetenceMismatch,
                "doctor is not competent for the patient",
            ),
            (
                instance.doctor_free(a.doctor, a.day, a.hour),
                ViolationType::DoctorUnavailable,
                "doctor is not available at this slot",
            ),
            (
                instance.doctor_works_at(a.doctor, a.location),
                ViolationType::DoctorLocationMismatch,
                "doctor does not work at this location",
            ),
            (
                instance.patient_free(a.patient, a.day, a.hour),
                ViolationType::PatientUnavailable,
                "patient is not available at this slot",
            ),
            (
                instance.patient_attends(a.patient, a.location, a.day),
                ViolationType::PatientLocationMismatch,
                "patient cannot attend this location on this day",
            ),
        ];
        for (ok, violation_type, message) in predicates {
            if !ok {
                violations.push(Violation::new(violation_type, a, message));
            }
        }

        if let Some(prev) = doctor_slots.insert((a.doctor, a.day, a.hour), a) {
            violations.push(Violation::new(
                ViolationType::DoctorDoubleBooked,
                a,
                format!("slot already taken by patient {}", prev.patient),
            ));
        }

        if let Some(prev) = patient_seen.insert(a.patient, a) {
            violations.push(Violation::new(
                ViolationType::PatientDoubleBooked,
                a,
                format!("patient already booked with doctor {}", prev.doctor),
            ));
        }

        let load = doctor_load.entry(a.doctor).or_insert(0);
        *load += 1;
        if *load > instance.capacity_of(a.doctor) {
            violations.push(Violation::new(
                ViolationType::CapacityExceeded,
                a,
                format!(
                    "doctor {} exceeds weekly capacity {}",
                    a.doctor,
                    instance.capacity_of(a.doctor)
                ),
            ));
        }

        if a.location != REMOTE_LOCATION {
            let used = *day_location.entry((a.doctor, a.day)).or_insert(a.location);
            if used != a.location {
                violations.push(Violation::new(
                    ViolationType::MultipleLocations,
                    a,
                    format!("doctor already works at location {used} that day"),
                ));
            }
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_instance() -> Instance {
        Instance::new(1, 2, 3)
            .with_capacity(0, 1.0)
            .with_full_competence(0)
            .with_doctor_location(0, 0)
            .with_doctor_location(0, 1)
            .with_doctor_location(0, 2)
            .with_doctor_hour(0, 0, 0)
            .with_doctor_hour(0, 0, 1)
            .with_patient_hour(0, 0, 0)
            .with_patient_hour(1, 0, 1)
            .with_patient_location(0, 1, 0)
            .with_patient_location(1, 2, 0)
    }

    #[test]
    fn test_valid_instance() {
        assert!(validate_instance(&small_instance()).is_ok());
        assert!(validate_instance(&Instance::new(0, 0, 0)).is_ok());
    }

    #[test]
    fn test_capacity_shape() {
        let mut inst = small_instance();
        inst.capacity.push(3.0);
        let errors = validate_instance(&inst).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::CapacityShape);
    }

    #[test]
    fn test_ragged_rows() {
        let mut inst = small_instance();
        inst.competence[0].pop();
        inst.patient_hours[1][3].push(true);
        let errors = validate_instance(&inst).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::CompetenceShape));
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::PatientHoursShape && e.message.contains("[1][3]")));
    }

    #[test]
    fn test_multiple_errors() {
        let mut inst = small_instance();
        inst.doctors = 2;
        let errors = validate_instance(&inst).unwrap_err();
        // capacity, competence, doctor_locations, doctor_hours
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_diagnose_clean() {
        assert!(diagnose(&small_instance()).is_empty());
    }

    #[test]
    fn test_diagnose_order_and_kinds() {
        let inst = Instance::new(1, 1, 1);
        let diags = diagnose(&inst);
        let kinds: Vec<_> = diags.iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![
                DiagnosticKind::DoctorWithoutCapacity,
                DiagnosticKind::DoctorWithoutHours,
                DiagnosticKind::PatientWithoutLocations,
                DiagnosticKind::PatientWithoutHours,
                DiagnosticKind::PatientWithoutCompetentDoctor,
            ]
        );
        assert_eq!(diags[0].subject, Subject::Doctor(0));
        assert_eq!(diags[2].subject, Subject::Patient(0));
        assert!(diags.iter().all(|d| d.severity == Severity::Warning));
    }

    #[test]
    fn test_verify_feasible() {
        let inst = small_instance();
        let ok = [Appointment::new(0, 0, 0, 0, 1)];
        assert!(verify_appointments(&inst, &ok).is_empty());
    }

    #[test]
    fn test_verify_capacity_and_locations() {
        let inst = small_instance();
        let two = [
            Appointment::new(0, 0, 0, 0, 1),
            Appointment::new(0, 1, 0, 1, 2),
        ];
        let v = verify_appointments(&inst, &two);
        assert!(v
            .iter()
            .any(|v| v.violation_type == ViolationType::CapacityExceeded));
        assert!(v
            .iter()
            .any(|v| v.violation_type == ViolationType::MultipleLocations));
    }

    #[test]
    fn test_verify_remote_is_exempt() {
        let inst = Instance::new(1, 2, 2)
            .with_capacity(0, 2.0)
            .with_full_competence(0)
            .with_doctor_location(0, 0)
            .with_doctor_location(0, 1)
            .with_doctor_hour(0, 0, 0)
            .with_doctor_hour(0, 0, 1)
            .with_patient_hour(0, 0, 0)
            .with_patient_hour(1, 0, 1)
            .with_patient_location(0, 0, 0)
            .with_patient_location(1, 1, 0);
        let plan = [
            Appointment::new(0, 0, 0, 0, 0),
            Appointment::new(0, 1, 0, 1, 1),
        ];
        assert!(verify_appointments(&inst, &plan).is_empty());
    }

    #[test]
    fn test_verify_double_bookings() {
        let inst = small_instance().with_capacity(0, 5.0);
        let plan = [
            Appointment::new(0, 0, 0, 0, 1),
            Appointment::new(0, 1, 0, 0, 1),
            Appointment::new(0, 0, 0, 0, 1),
        ];
        let v = verify_appointments(&inst, &plan);
        assert!(v
            .iter()
            .any(|v| v.violation_type == ViolationType::DoctorDoubleBooked));
        assert!(v
            .iter()
            .any(|v| v.violation_type == ViolationType::PatientDoubleBooked));
        // patient 1 is neither free at hour 0 nor at location 1
        assert!(v
            .iter()
            .any(|v| v.violation_type == ViolationType::PatientUnavailable));
        assert!(v
            .iter()
            .any(|v| v.violation_type == ViolationType::PatientLocationMismatch));
    }

    #[test]
    fn test_verify_out_of_range() {
        let inst = small_instance();
        let v = verify_appointments(&inst, &[Appointment::new(0, 9, 0, 0, 1)]);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].violation_type, ViolationType::OutOfRange);
    }
}
