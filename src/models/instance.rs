//! Problem instance: index sets plus availability and competence matrices.
//!
//! An [`Instance`] is the read-only input of one optimizer invocation. All
//! matrices are indexed by zero-based doctor (`m`), patient (`p`),
//! location (`l`), day (`d`) and hour (`h`) indices.
//!
//! | Field | Shape |
//! |-------|-------|
//! | `capacity` | `[m]` |
//! | `competence` | `[m][p]` |
//! | `doctor_locations` | `[m][l]` |
//! | `patient_locations` | `[p][l][d]` |
//! | `patient_hours` | `[p][d][h]` |
//! | `doctor_hours` | `[m][d][h]` |
//!
//! Shapes are checked by [`crate::validation::validate_instance`]; the
//! accessors below assume a well-formed instance and treat any missing
//! entry as "not allowed".

use serde::{Deserialize, Serialize};

use super::week::{DAYS, HOURS};

/// Input matrices for one scheduling week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    /// Number of doctors (`|M|`).
    pub doctors: usize,
    /// Number of patients (`|P|`).
    pub patients: usize,
    /// Number of locations (`|L|`), including the remote location 0.
    pub locations: usize,
    /// Weekly appointment capacity per doctor.
    ///
    /// Fractional values are floored. Zero, negative and non-finite values
    /// exclude the doctor from receiving appointments.
    pub capacity: Vec<f64>,
    /// Whether doctor `m` may treat patient `p`.
    pub competence: Vec<Vec<bool>>,
    /// Whether doctor `m` works at location `l`.
    pub doctor_locations: Vec<Vec<bool>>,
    /// Whether patient `p` can attend location `l` on day `d`.
    pub patient_locations: Vec<Vec<Vec<bool>>>,
    /// Whether patient `p` is free on day `d` at hour `h`.
    pub patient_hours: Vec<Vec<Vec<bool>>>,
    /// Whether doctor `m` is free on day `d` at hour `h`.
    pub doctor_hours: Vec<Vec<Vec<bool>>>,
}

impl Instance {
    /// Creates an instance of the given size with every permission closed
    /// and zero capacity.
    pub fn new(doctors: usize, patients: usize, locations: usize) -> Self {
        Self {
            doctors,
            patients,
            locations,
            capacity: vec![0.0; doctors],
            competence: vec![vec![false; patients]; doctors],
            doctor_locations: vec![vec![false; locations]; doctors],
            patient_locations: vec![vec![vec![false; DAYS]; locations]; patients],
            patient_hours: vec![vec![vec![false; HOURS]; DAYS]; patients],
            doctor_hours: vec![vec![vec![false; HOURS]; DAYS]; doctors],
        }
    }

    /// Sets a doctor's weekly capacity.
    pub fn with_capacity(mut self, doctor: usize, capacity: f64) -> Self {
        self.capacity[doctor] = capacity;
        self
    }

    /// Marks a doctor as competent for a patient.
    pub fn with_competence(mut self, doctor: usize, patient: usize) -> Self {
        self.competence[doctor][patient] = true;
        self
    }

    /// Marks a doctor as competent for every patient.
    pub fn with_full_competence(mut self, doctor: usize) -> Self {
        self.competence[doctor].iter_mut().for_each(|c| *c = true);
        self
    }

    /// Allows a doctor to work at a location.
    pub fn with_doctor_location(mut self, doctor: usize, location: usize) -> Self {
        self.doctor_locations[doctor][location] = true;
        self
    }

    /// Allows a patient to attend a location on a day.
    pub fn with_patient_location(mut self, patient: usize, location: usize, day: usize) -> Self {
        self.patient_locations[patient][location][day] = true;
        self
    }

    /// Marks a patient as free on a day at an hour slot.
    pub fn with_patient_hour(mut self, patient: usize, day: usize, hour: usize) -> Self {
        self.patient_hours[patient][day][hour] = true;
        self
    }

    /// Marks a doctor as free on a day at an hour slot.
    pub fn with_doctor_hour(mut self, doctor: usize, day: usize, hour: usize) -> Self {
        self.doctor_hours[doctor][day][hour] = true;
        self
    }

    /// Effective integer capacity of a doctor.
    ///
    /// Returns 0 for missing, non-finite, negative or zero capacities.
    pub fn capacity_of(&self, doctor: usize) -> usize {
        match self.capacity.get(doctor) {
            Some(&c) if c.is_finite() && c >= 1.0 => c.floor() as usize,
            _ => 0,
        }
    }

    /// Whether the doctor may receive any appointment at all.
    #[inline]
    pub fn is_bookable(&self, doctor: usize) -> bool {
        self.capacity_of(doctor) > 0
    }

    #[inline]
    pub fn is_competent(&self, doctor: usize, patient: usize) -> bool {
        flag2(&self.competence, doctor, patient)
    }

    #[inline]
    pub fn doctor_works_at(&self, doctor: usize, location: usize) -> bool {
        flag2(&self.doctor_locations, doctor, location)
    }

    #[inline]
    pub fn patient_attends(&self, patient: usize, location: usize, day: usize) -> bool {
        flag3(&self.patient_locations, patient, location, day)
    }

    #[inline]
    pub fn patient_free(&self, patient: usize, day: usize, hour: usize) -> bool {
        flag3(&self.patient_hours, patient, day, hour)
    }

    #[inline]
    pub fn doctor_free(&self, doctor: usize, day: usize, hour: usize) -> bool {
        flag3(&self.doctor_hours, doctor, day, hour)
    }

    /// Whether an appointment tuple passes every structural predicate:
    /// competence, doctor and patient hours, doctor and patient locations.
    ///
    /// Capacity is not part of this check.
    pub fn admits(&self, doctor: usize, patient: usize, day: usize, hour: usize, location: usize) -> bool {
        self.is_competent(doctor, patient)
            && self.doctor_free(doctor, day, hour)
            && self.doctor_works_at(doctor, location)
            && self.patient_free(patient, day, hour)
            && self.patient_attends(patient, location, day)
    }

    /// Total number of tuples in the full `M × P × D × H × L` cross product.
    pub fn cross_product_size(&self) -> usize {
        self.doctors * self.patients * DAYS * HOURS * self.locations
    }
}

#[inline]
fn flag2(matrix: &[Vec<bool>], i: usize, j: usize) -> bool {
    matrix.get(i).and_then(|row| row.get(j)).copied().unwrap_or(false)
}

#[inline]
fn flag3(tensor: &[Vec<Vec<bool>>], i: usize, j: usize, k: usize) -> bool {
    tensor
        .get(i)
        .and_then(|plane| plane.get(j))
        .and_then(|row| row.get(k))
        .copied()
        .unwrap_or(false)
}
