//! Greedy appointment heuristic.
//!
//! # Algorithm
//!
//! 1. Doctors in index order; a doctor stops once capacity is exhausted.
//! 2. For each day, try the doctor's locations in index order and keep the
//!    first one at which at least one appointment is made.
//! 3. At that location, walk patients in index order, skipping patients
//!    already booked this week.
//! 4. Give each patient the first hour that passes every admissibility
//!    check and is still free for the doctor that day.
//!
//! The result satisfies every hard constraint of the assignment model and
//! is used as the solver's warm start.
//!
//! # Complexity
//! O(M · D · L · P · H).
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 4: Priority Dispatching

use crate::models::{Appointment, Instance, DAYS, HOURS};

/// Deterministic first-fit scheduler.
///
/// # Example
///
/// ```
/// use u_appoint::models::Instance;
/// use u_appoint::scheduler::GreedyScheduler;
///
/// let instance = Instance::new(1, 2, 1)
///     .with_capacity(0, 2.0)
///     .with_full_competence(0)
///     .with_doctor_location(0, 0)
///     .with_patient_location(0, 0, 0)
///     .with_patient_location(1, 0, 0)
///     .with_doctor_hour(0, 0, 0)
///     .with_doctor_hour(0, 0, 1)
///     .with_patient_hour(0, 0, 0)
///     .with_patient_hour(1, 0, 0)
///     .with_patient_hour(1, 0, 1);
///
/// let appointments = GreedyScheduler::new().schedule(&instance);
/// assert_eq!(appointments.len(), 2);
/// assert_eq!(appointments[1].hour, 1);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyScheduler;

impl GreedyScheduler {
    pub fn new() -> Self {
        Self
    }

    /// Computes a feasible appointment list.
    ///
    /// Never fails; an instance without any admissible tuple yields an empty
    /// list. Missing matrix entries are treated as unavailable.
    pub fn schedule(&self, instance: &Instance) -> Vec<Appointment> {
        let mut appointments = Vec::new();
        let mut taken = vec![false; instance.patients];

        for m in 0..instance.doctors {
            let cap = instance.capacity_of(m);
            let mut booked = 0usize;

            for d in 0..DAYS {
                if booked >= cap {
                    break;
                }
                for l in 0..instance.locations {
                    if !instance.doctor_works_at(m, l) {
                        continue;
                    }
                    let before = appointments.len();
                    let mut busy = [false; HOURS];

                    for p in 0..instance.patients {
                        if booked >= cap {
                            break;
                        }
                        if taken[p] {
                            continue;
                        }
                        let slot = (0..HOURS)
                            .find(|&h| !busy[h] && instance.admits(m, p, d, h, l));
                        if let Some(h) = slot {
                            appointments.push(Appointment::new(m, p, d, h, l));
                            taken[p] = true;
                            busy[h] = true;
                            booked += 1;
                        }
                    }

                    if appointments.len() > before {
                        break;
                    }
                }
            }
        }

        tracing::debug!(appointments = appointments.len(), "greedy start computed");
        appointments
    }
}
