//! Translates an [`Instance`] into an [`AssignmentModel`].
//!
//! # Formulation
//!
//! ```text
//! maximize   Σ x[m,p,d,h,l]
//! subject to Σ_{p,d,h,l} x[m,p,d,h,l]     ≤ cap(m)          ∀ m
//!            Σ_{p,l}     x[m,p,d,h,l]     ≤ 1               ∀ m, d, h
//!            Σ_{m,d,h,l} x[m,p,d,h,l]     ≤ 1               ∀ p
//!            Σ_{p,h}     x[m,p,d,h,l] − K·y[m,d,l] ≤ 0      ∀ m, d, l ≠ 0
//!            Σ_{l ≠ 0}   y[m,d,l]         ≤ 1               ∀ m, d
//! ```
//!
//! Tuples rejected by competence, hours or locations are either never
//! materialized (sparse) or fixed to zero by explicit constraints (dense).
//! The `y` variables exist only for doctor-days with candidates at two or
//! more physical locations; location 0 is remote and never needs one.
//!
//! # Reference
//! - Wolsey (2020), "Integer Programming", 2nd ed., Ch. 1.
//! - Williams (2013), "Model Building in Mathematical Programming", §9.2.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::model::{
    AssignmentModel, ConstraintFamily, Exclusion, LinearConstraint, Sense, VarId,
};
use crate::error::ModelError;
use crate::models::{Appointment, Instance, DAYS, HOURS, REMOTE_LOCATION};
use crate::validation::validate_instance;

/// How the assignment variable space is materialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Materialization {
    /// Variables only for admissible tuples.
    #[default]
    Sparse,
    /// Full cross product with explicit exclusion constraints.
    Dense,
}

/// Builds the binary assignment model of an instance.
///
/// # Example
/// ```
/// use u_appoint::mip::{Materialization, ModelBuilder};
/// use u_appoint::models::Instance;
///
/// let instance = Instance::new(1, 1, 1)
///     .with_capacity(0, 1.0)
///     .with_competence(0, 0)
///     .with_doctor_location(0, 0)
///     .with_patient_location(0, 0, 0)
///     .with_doctor_hour(0, 0, 0)
///     .with_patient_hour(0, 0, 0);
///
/// let model = ModelBuilder::new(&instance).build().unwrap();
/// assert_eq!(model.variable_count(), 1);
///
/// let dense = ModelBuilder::new(&instance)
///     .with_materialization(Materialization::Dense)
///     .build()
///     .unwrap();
/// assert_eq!(dense.variable_count(), instance.cross_product_size());
/// ```
pub struct ModelBuilder<'a> {
    instance: &'a Instance,
    materialization: Materialization,
}

/// Variable groupings collected while materializing.
#[derive(Default)]
struct Groups {
    by_doctor: Vec<Vec<VarId>>,
    by_slot: BTreeMap<(usize, usize, usize), Vec<VarId>>,
    by_patient: Vec<Vec<VarId>>,
    by_place: BTreeMap<(usize, usize, usize), Vec<(VarId, usize)>>,
}

impl Groups {
    fn new(instance: &Instance) -> Self {
        Self {
            by_doctor: vec![Vec::new(); instance.doctors],
            by_patient: vec![Vec::new(); instance.patients],
            ..Self::default()
        }
    }

    fn record(&mut self, id: VarId, a: &Appointment) {
        self.by_doctor[a.doctor].push(id);
        self.by_slot
            .entry((a.doctor, a.day, a.hour))
            .or_default()
            .push(id);
        self.by_patient[a.patient].push(id);
        if a.location != REMOTE_LOCATION {
            self.by_place
                .entry((a.doctor, a.day, a.location))
                .or_default()
                .push((id, a.hour));
        }
    }
}

impl<'a> ModelBuilder<'a> {
    /// Creates a builder with sparse materialization.
    pub fn new(instance: &'a Instance) -> Self {
        Self {
            instance,
            materialization: Materialization::Sparse,
        }
    }

    /// Sets the materialization strategy.
    pub fn with_materialization(mut self, materialization: Materialization) -> Self {
        self.materialization = materialization;
        self
    }

    /// Builds the model.
    ///
    /// # Errors
    /// [`ModelError::InvalidInput`] when a matrix does not match the
    /// declared index sets.
    pub fn build(&self) -> Result<AssignmentModel, ModelError> {
        validate_instance(self.instance).map_err(ModelError::InvalidInput)?;

        let mut model = AssignmentModel::new("appointments");
        let mut groups = Groups::new(self.instance);
        let dense = self.materialization == Materialization::Dense;

        match self.materialization {
            Materialization::Sparse => self.add_admissible_vars(&mut model, &mut groups),
            Materialization::Dense => self.add_all_vars(&mut model, &mut groups),
        }

        self.add_capacity(&mut model, &groups, dense);
        self.add_slots(&mut model, &groups, dense);
        self.add_weekly(&mut model, &groups, dense);
        if dense {
            self.add_exclusions(&mut model);
        }
        self.add_location_linking(&mut model, &groups);

        model.validate()?;

        tracing::info!(
            materialization = ?self.materialization,
            variables = model.variable_count(),
            constraints = model.constraint_count(),
            "assignment model built"
        );
        Ok(model)
    }

    // ====================================================================
    // Variables
    // ====================================================================

    /// Admissible tuples only, via per-doctor candidate lists.
    fn add_admissible_vars(&self, model: &mut AssignmentModel, groups: &mut Groups) {
        let inst = self.instance;
        for m in 0..inst.doctors {
            if !inst.is_bookable(m) {
                continue;
            }
            let patients: Vec<usize> = (0..inst.patients)
                .filter(|&p| inst.is_competent(m, p))
                .collect();
            let slots: Vec<(usize, usize)> = (0..DAYS)
                .flat_map(|d| (0..HOURS).map(move |h| (d, h)))
                .filter(|&(d, h)| inst.doctor_free(m, d, h))
                .collect();
            let locations: Vec<usize> = (0..inst.locations)
                .filter(|&l| inst.doctor_works_at(m, l))
                .collect();
            if patients.is_empty() || slots.is_empty() || locations.is_empty() {
                continue;
            }

            for &p in &patients {
                for &(d, h) in &slots {
                    if !inst.patient_free(p, d, h) {
                        continue;
                    }
                    for &l in &locations {
                        if inst.patient_attends(p, l, d) {
                            let a = Appointment::new(m, p, d, h, l);
                            let id = model.add_assignment(a);
                            groups.record(id, &a);
                        }
                    }
                }
            }
        }
    }

    /// The full cross product.
    fn add_all_vars(&self, model: &mut AssignmentModel, groups: &mut Groups) {
        let inst = self.instance;
        for m in 0..inst.doctors {
            for p in 0..inst.patients {
                for d in 0..DAYS {
                    for h in 0..HOURS {
                        for l in 0..inst.locations {
                            let a = Appointment::new(m, p, d, h, l);
                            let id = model.add_assignment(a);
                            groups.record(id, &a);
                        }
                    }
                }
            }
        }
    }

    // ====================================================================
    // Constraints
    // ====================================================================

    fn add_capacity(&self, model: &mut AssignmentModel, groups: &Groups, dense: bool) {
        for (m, vars) in groups.by_doctor.iter().enumerate() {
            let cap = self.instance.capacity_of(m);
            if dense || vars.len() > cap {
                model.add_at_most(
                    format!("doctor_capacity_{m}"),
                    ConstraintFamily::DoctorCapacity,
                    vars,
                    cap as f64,
                );
            }
        }
    }

    fn add_slots(&self, model: &mut AssignmentModel, groups: &Groups, dense: bool) {
        for (&(m, d, h), vars) in &groups.by_slot {
            if dense || vars.len() > 1 {
                model.add_at_most(
                    format!("doctor_slot_{m}_{d}_{h}"),
                    ConstraintFamily::DoctorSlot,
                    vars,
                    1.0,
                );
            }
        }
    }

    fn add_weekly(&self, model: &mut AssignmentModel, groups: &Groups, dense: bool) {
        for (p, vars) in groups.by_patient.iter().enumerate() {
            if dense || vars.len() > 1 {
                model.add_at_most(
                    format!("patient_weekly_{p}"),
                    ConstraintFamily::PatientWeekly,
                    vars,
                    1.0,
                );
            }
        }
    }

    /// One `x == 0` per failing predicate per tuple.
    fn add_exclusions(&self, model: &mut AssignmentModel) {
        let inst = self.instance;
        let assignments: Vec<(VarId, Appointment)> = model.assignments().collect();
        for (id, a) in assignments {
            let (m, p, d, h, l) = a.as_tuple();
            let failing = [
                (Exclusion::Competence, inst.is_competent(m, p)),
                (Exclusion::DoctorHours, inst.doctor_free(m, d, h)),
                (Exclusion::DoctorLocation, inst.doctor_works_at(m, l)),
                (Exclusion::PatientHours, inst.patient_free(p, d, h)),
                (Exclusion::PatientLocation, inst.patient_attends(p, l, d)),
            ];
            for (reason, ok) in failing {
                if !ok {
                    model.add_fixed_zero(
                        format!("{}_{m}_{p}_{d}_{h}_{l}", reason.label()),
                        ConstraintFamily::Exclusion(reason),
                        id,
                    );
                }
            }
        }
    }

    /// At most one physical location per doctor and day.
    fn add_location_linking(&self, model: &mut AssignmentModel, groups: &Groups) {
        let mut by_doctor_day: BTreeMap<(usize, usize), Vec<usize>> = BTreeMap::new();
        for &(m, d, l) in groups.by_place.keys() {
            by_doctor_day.entry((m, d)).or_default().push(l);
        }

        for ((m, d), locations) in by_doctor_day {
            if locations.len() < 2 {
                continue;
            }
            let mut uses = Vec::with_capacity(locations.len());
            for l in locations {
                let Some(terms) = groups.by_place.get(&(m, d, l)) else {
                    continue;
                };
                let y = model.add_location_use(m, d, l);
                let k = terms.iter().map(|&(_, h)| h).collect::<BTreeSet<_>>().len();
                let mut linking: Vec<(VarId, f64)> =
                    terms.iter().map(|&(id, _)| (id, 1.0)).collect();
                linking.push((y, -(k as f64)));
                model.add_constraint(LinearConstraint {
                    name: format!("location_use_{m}_{d}_{l}"),
                    family: ConstraintFamily::LocationUse,
                    terms: linking,
                    sense: Sense::LessEq,
                    rhs: 0.0,
                });
                uses.push(y);
            }
            model.add_at_most(
                format!("single_location_{m}_{d}"),
                ConstraintFamily::SingleLocation,
                &uses,
                1.0,
            );
        }
    }
}
