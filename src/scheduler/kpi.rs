//! Schedule quality metrics (KPIs).
//!
//! Summarizes a weekly schedule against its instance.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Appointments per location | Count of appointments held at `l` |
//! | Appointments per day | Count of appointments on day `d` |
//! | Appointments per doctor | Count of appointments of doctor `m` |
//! | Doctors per location | Doctors allowed to work at `l` |
//! | Unassigned patients | Patients without an appointment |
//! | Coverage | Fraction of patients with an appointment |
//! | Remote share | Fraction of appointments at the remote location |
//! | Utilization | Appointments / capacity per doctor |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use serde::{Deserialize, Serialize};

use crate::models::{Instance, Schedule, DAYS};

/// Schedule performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleKpi {
    /// Total number of appointments.
    pub appointments: usize,
    /// Appointments per location index.
    pub appointments_by_location: Vec<usize>,
    /// Appointments per day index.
    pub appointments_by_day: Vec<usize>,
    /// Appointments per doctor index.
    pub appointments_by_doctor: Vec<usize>,
    /// Doctors allowed to work at each location.
    pub doctors_by_location: Vec<usize>,
    /// Patients without an appointment, in index order.
    pub unassigned_patients: Vec<usize>,
    /// Fraction of patients with an appointment (1.0 without patients).
    pub coverage: f64,
    /// Fraction of appointments at the remote location (0.0 when empty).
    pub remote_share: f64,
    /// Appointments / effective capacity per doctor (0.0 for zero capacity).
    pub utilization_by_doctor: Vec<f64>,
    /// Mean utilization over bookable doctors (0.0 without any).
    pub avg_utilization: f64,
}

impl ScheduleKpi {
    /// Computes KPIs from a schedule and its instance.
    ///
    /// Appointments whose indices fall outside the instance are ignored.
    pub fn calculate(schedule: &Schedule, instance: &Instance) -> Self {
        let mut by_location = vec![0usize; instance.locations];
        let mut by_day = vec![0usize; DAYS];
        let mut by_doctor = vec![0usize; instance.doctors];
        let mut remote = 0usize;
        let mut counted = 0usize;

        for a in &schedule.appointments {
            let (Some(l), Some(d), Some(m)) = (
                by_location.get_mut(a.location),
                by_day.get_mut(a.day),
                by_doctor.get_mut(a.doctor),
            ) else {
                continue;
            };
            *l += 1;
            *d += 1;
            *m += 1;
            counted += 1;
            if a.is_remote() {
                remote += 1;
            }
        }

        let doctors_by_location = (0..instance.locations)
            .map(|l| {
                (0..instance.doctors)
                    .filter(|&m| instance.doctor_works_at(m, l))
                    .count()
            })
            .collect();

        let unassigned_patients = schedule.unassigned_patients(instance.patients);
        let coverage = if instance.patients == 0 {
            1.0
        } else {
            1.0 - unassigned_patients.len() as f64 / instance.patients as f64
        };

        let remote_share = if counted == 0 {
            0.0
        } else {
            remote as f64 / counted as f64
        };

        let utilization_by_doctor: Vec<f64> = by_doctor
            .iter()
            .enumerate()
            .map(|(m, &n)| match instance.capacity_of(m) {
                0 => 0.0,
                cap => n as f64 / cap as f64,
            })
            .collect();
        let bookable: Vec<f64> = utilization_by_doctor
            .iter()
            .enumerate()
            .filter(|&(m, _)| instance.is_bookable(m))
            .map(|(_, &u)| u)
            .collect();
        let avg_utilization = if bookable.is_empty() {
            0.0
        } else {
            bookable.iter().sum::<f64>() / bookable.len() as f64
        };

        Self {
            appointments: counted,
            appointments_by_location: by_location,
            appointments_by_day: by_day,
            appointments_by_doctor: by_doctor,
            doctors_by_location,
            unassigned_patients,
            coverage,
            remote_share,
            utilization_by_doctor,
            avg_utilization,
        }
    }

    /// Whether the schedule meets the given quality thresholds.
    pub fn meets_thresholds(&self, min_coverage: f64, max_remote_share: f64) -> bool {
        self.coverage >= min_coverage && self.remote_share <= max_remote_share
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mip::SolverStatus;
    use crate::models::Appointment;

    fn instance() -> Instance {
        Instance::new(2, 4, 3)
            .with_capacity(0, 4.0)
            .with_capacity(1, 2.0)
            .with_doctor_location(0, 0)
            .with_doctor_location(0, 1)
            .with_doctor_location(1, 1)
            .with_doctor_location(1, 2)
    }

    fn schedule(appointments: Vec<Appointment>) -> Schedule {
        Schedule {
            appointments,
            status: SolverStatus::Optimal,
            solve_seconds: 0.0,
        }
    }

    #[test]
    fn test_kpi_counts() {
        let s = schedule(vec![
            Appointment::new(0, 0, 0, 0, 0),
            Appointment::new(0, 1, 0, 1, 1),
            Appointment::new(1, 2, 4, 3, 2),
        ]);
        let kpi = ScheduleKpi::calculate(&s, &instance());
        assert_eq!(kpi.appointments, 3);
        assert_eq!(kpi.appointments_by_location, vec![1, 1, 1]);
        assert_eq!(kpi.appointments_by_day, vec![2, 0, 0, 0, 1, 0]);
        assert_eq!(kpi.appointments_by_doctor, vec![2, 1]);
        assert_eq!(kpi.doctors_by_location, vec![1, 2, 1]);
        assert_eq!(kpi.unassigned_patients, vec![3]);
        assert!((kpi.coverage - 0.75).abs() < 1e-10);
        assert!((kpi.remote_share - 1.0 / 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_kpi_utilization() {
        let s = schedule(vec![
            Appointment::new(0, 0, 0, 0, 1),
            Appointment::new(1, 1, 0, 0, 1),
            Appointment::new(1, 2, 0, 1, 1),
        ]);
        let kpi = ScheduleKpi::calculate(&s, &instance());
        // doctor 0: 1/4, doctor 1: 2/2
        assert!((kpi.utilization_by_doctor[0] - 0.25).abs() < 1e-10);
        assert!((kpi.utilization_by_doctor[1] - 1.0).abs() < 1e-10);
        assert!((kpi.avg_utilization - 0.625).abs() < 1e-10);
    }

    #[test]
    fn test_kpi_empty() {
        let kpi = ScheduleKpi::calculate(&Schedule::default(), &Instance::new(0, 0, 0));
        assert_eq!(kpi.appointments, 0);
        assert!((kpi.coverage - 1.0).abs() < 1e-10);
        assert!((kpi.remote_share - 0.0).abs() < 1e-10);
        assert!((kpi.avg_utilization - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_kpi_ignores_out_of_range() {
        let s = schedule(vec![Appointment::new(9, 0, 0, 0, 0)]);
        let kpi = ScheduleKpi::calculate(&s, &instance());
        assert_eq!(kpi.appointments, 0);
    }

    #[test]
    fn test_meets_thresholds() {
        let s = schedule(vec![Appointment::new(0, 0, 0, 0, 0)]);
        let kpi = ScheduleKpi::calculate(&s, &instance());
        // coverage 0.25, remote share 1.0
        assert!(kpi.meets_thresholds(0.25, 1.0));
        assert!(!kpi.meets_thresholds(0.5, 1.0));
        assert!(!kpi.meets_thresholds(0.0, 0.5));
    }
}
