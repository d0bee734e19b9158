//! Binary assignment model definition.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::models::Appointment;

/// Index of a variable within an [`AssignmentModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VarId(pub usize);

impl VarId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// What a binary variable stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VarKind {
    /// `x[m,p,d,h,l]`: the appointment is active.
    Assignment(Appointment),
    /// `y[m,d,l]`: the doctor uses physical location `l` on day `d`.
    LocationUse {
        doctor: usize,
        day: usize,
        location: usize,
    },
}

/// A binary decision variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryVar {
    /// Unique name.
    pub name: String,
    /// Meaning of the variable.
    pub kind: VarKind,
    /// Objective coefficient (1 for assignments, 0 for auxiliaries).
    pub objective: f64,
}

/// Comparison of a linear constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sense {
    /// `Σ terms ≤ rhs`
    LessEq,
    /// `Σ terms = rhs`
    Equal,
}

/// Why a tuple is structurally forbidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Exclusion {
    Competence,
    DoctorHours,
    DoctorLocation,
    PatientHours,
    PatientLocation,
}

impl Exclusion {
    /// Constraint name prefix.
    pub fn label(self) -> &'static str {
        match self {
            Exclusion::Competence => "competence",
            Exclusion::DoctorHours => "doctor_hours",
            Exclusion::DoctorLocation => "doctor_location",
            Exclusion::PatientHours => "patient_hours",
            Exclusion::PatientLocation => "patient_location",
        }
    }
}

/// Family a constraint belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintFamily {
    /// Weekly capacity of one doctor.
    DoctorCapacity,
    /// One appointment per doctor and slot.
    DoctorSlot,
    /// One appointment per patient and week.
    PatientWeekly,
    /// Forbidden tuple fixed to zero.
    Exclusion(Exclusion),
    /// Links assignments at a physical location to its `y` variable.
    LocationUse,
    /// At most one physical location per doctor and day.
    SingleLocation,
}

/// A linear constraint over binary variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearConstraint {
    /// Unique name.
    pub name: String,
    pub family: ConstraintFamily,
    /// `(variable, coefficient)` pairs.
    pub terms: Vec<(VarId, f64)>,
    pub sense: Sense,
    pub rhs: f64,
}

impl LinearConstraint {
    /// Left-hand side value under an assignment of variable values.
    pub fn lhs(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|&(v, c)| c * values.get(v.index()).copied().unwrap_or(0.0))
            .sum()
    }

    /// Whether the constraint holds for the given values (absolute tolerance
    /// `tol`).
    pub fn is_satisfied(&self, values: &[f64], tol: f64) -> bool {
        let lhs = self.lhs(values);
        match self.sense {
            Sense::LessEq => lhs <= self.rhs + tol,
            Sense::Equal => (lhs - self.rhs).abs() <= tol,
        }
    }
}

/// A maximization model over binary variables with linear constraints.
///
/// Built by [`super::ModelBuilder`]. Variables and constraints are stored in
/// creation order; assignment variables come first, in (m, p, d, h, l)
/// order, followed by location-use auxiliaries.
#[derive(Debug, Clone, Default)]
pub struct AssignmentModel {
    /// Model name.
    pub name: String,
    variables: Vec<BinaryVar>,
    constraints: Vec<LinearConstraint>,
    assignment_index: HashMap<Appointment, VarId>,
    location_index: HashMap<(usize, usize, usize), VarId>,
}

impl AssignmentModel {
    /// Creates an empty model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds an assignment variable with objective weight 1.
    pub fn add_assignment(&mut self, appointment: Appointment) -> VarId {
        let (m, p, d, h, l) = appointment.as_tuple();
        let id = self.push_var(BinaryVar {
            name: format!("x_{m}_{p}_{d}_{h}_{l}"),
            kind: VarKind::Assignment(appointment),
            objective: 1.0,
        });
        self.assignment_index.insert(appointment, id);
        id
    }

    /// Adds a location-use variable with objective weight 0.
    pub fn add_location_use(&mut self, doctor: usize, day: usize, location: usize) -> VarId {
        let id = self.push_var(BinaryVar {
            name: format!("y_{doctor}_{day}_{location}"),
            kind: VarKind::LocationUse {
                doctor,
                day,
                location,
            },
            objective: 0.0,
        });
        self.location_index.insert((doctor, day, location), id);
        id
    }

    fn push_var(&mut self, var: BinaryVar) -> VarId {
        let id = VarId(self.variables.len());
        self.variables.push(var);
        id
    }

    /// Adds a constraint.
    pub fn add_constraint(&mut self, constraint: LinearConstraint) {
        self.constraints.push(constraint);
    }

    /// Convenience: `Σ vars ≤ rhs` with unit coefficients.
    pub fn add_at_most(
        &mut self,
        name: String,
        family: ConstraintFamily,
        vars: &[VarId],
        rhs: f64,
    ) {
        self.constraints.push(LinearConstraint {
            name,
            family,
            terms: vars.iter().map(|&v| (v, 1.0)).collect(),
            sense: Sense::LessEq,
            rhs,
        });
    }

    /// Convenience: `var = 0`.
    pub fn add_fixed_zero(&mut self, name: String, family: ConstraintFamily, var: VarId) {
        self.constraints.push(LinearConstraint {
            name,
            family,
            terms: vec![(var, 1.0)],
            sense: Sense::Equal,
            rhs: 0.0,
        });
    }

    pub fn variables(&self) -> &[BinaryVar] {
        &self.variables
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Number of constraints in a family.
    pub fn family_count(&self, family: ConstraintFamily) -> usize {
        self.constraints
            .iter()
            .filter(|c| c.family == family)
            .count()
    }

    /// Assignment variables with their appointments, in creation order.
    pub fn assignments(&self) -> impl Iterator<Item = (VarId, Appointment)> + '_ {
        self.variables
            .iter()
            .enumerate()
            .filter_map(|(i, v)| match v.kind {
                VarKind::Assignment(a) => Some((VarId(i), a)),
                VarKind::LocationUse { .. } => None,
            })
    }

    /// Variable of an appointment, if the model has one.
    pub fn assignment_var(&self, appointment: &Appointment) -> Option<VarId> {
        self.assignment_index.get(appointment).copied()
    }

    /// Location-use variable of `(doctor, day, location)`, if any.
    pub fn location_var(&self, doctor: usize, day: usize, location: usize) -> Option<VarId> {
        self.location_index.get(&(doctor, day, location)).copied()
    }

    /// Objective value under the given variable values.
    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.variables
            .iter()
            .zip(values)
            .map(|(v, x)| v.objective * x)
            .sum()
    }

    /// Builds a full value vector from a list of appointments.
    ///
    /// Assignment variables of listed appointments are set to 1, location-use
    /// variables of the `(doctor, day, location)` triples they touch are set
    /// to 1, everything else is 0. Appointments the model has no variable
    /// for are skipped.
    pub fn warm_start(&self, appointments: &[Appointment]) -> Vec<f64> {
        let mut values = vec![0.0; self.variables.len()];
        for a in appointments {
            match self.assignment_var(a) {
                Some(id) => values[id.index()] = 1.0,
                None => {
                    tracing::warn!(appointment = %a, "warm start entry has no model variable");
                    continue;
                }
            }
            if let Some(id) = self.location_var(a.doctor, a.day, a.location) {
                values[id.index()] = 1.0;
            }
        }
        values
    }

    /// Constraints violated by the given values (tolerance 1e-6).
    pub fn violated_constraints(&self, values: &[f64]) -> Vec<&LinearConstraint> {
        self.constraints
            .iter()
            .filter(|c| !c.is_satisfied(values, 1e-6))
            .collect()
    }

    /// Validates the model for consistency.
    ///
    /// Checks that every constraint term references a defined variable and
    /// that variable names are unique.
    pub fn validate(&self) -> Result<(), ModelError> {
        let n = self.variables.len();
        for c in &self.constraints {
            if let Some(&(v, _)) = c.terms.iter().find(|(v, _)| v.index() >= n) {
                return Err(ModelError::InvalidModel(format!(
                    "constraint {} references undefined variable {}",
                    c.name,
                    v.index()
                )));
            }
        }
        let mut names = std::collections::HashSet::with_capacity(n);
        for v in &self.variables {
            if !names.insert(v.name.as_str()) {
                return Err(ModelError::InvalidModel(format!(
                    "duplicate variable name {}",
                    v.name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_model() -> AssignmentModel {
        let mut model = AssignmentModel::new("tiny");
        let a = model.add_assignment(Appointment::new(0, 0, 0, 0, 1));
        let b = model.add_assignment(Appointment::new(0, 1, 0, 1, 2));
        let ya = model.add_location_use(0, 0, 1);
        let yb = model.add_location_use(0, 0, 2);
        model.add_at_most("doctor_capacity_0".into(), ConstraintFamily::DoctorCapacity, &[a, b], 1.0);
        model.add_constraint(LinearConstraint {
            name: "location_use_0_0_1".into(),
            family: ConstraintFamily::LocationUse,
            terms: vec![(a, 1.0), (ya, -1.0)],
            sense: Sense::LessEq,
            rhs: 0.0,
        });
        model.add_at_most(
            "single_location_0_0".into(),
            ConstraintFamily::SingleLocation,
            &[ya, yb],
            1.0,
        );
        model
    }

    #[test]
    fn test_model_creation() {
        let model = tiny_model();
        assert_eq!(model.variable_count(), 4);
        assert_eq!(model.constraint_count(), 3);
        assert_eq!(model.family_count(ConstraintFamily::DoctorCapacity), 1);
        assert_eq!(model.assignments().count(), 2);
        assert!(model.validate().is_ok());
    }

    #[test]
    fn test_lookup() {
        let model = tiny_model();
        assert_eq!(
            model.assignment_var(&Appointment::new(0, 1, 0, 1, 2)),
            Some(VarId(1))
        );
        assert_eq!(model.assignment_var(&Appointment::new(0, 1, 0, 1, 1)), None);
        assert_eq!(model.location_var(0, 0, 2), Some(VarId(3)));
        assert_eq!(model.variables()[0].name, "x_0_0_0_0_1");
    }

    #[test]
    fn test_warm_start_sets_location_use() {
        let model = tiny_model();
        let values = model.warm_start(&[Appointment::new(0, 0, 0, 0, 1)]);
        assert_eq!(values, vec![1.0, 0.0, 1.0, 0.0]);
        assert!(model.violated_constraints(&values).is_empty());
        assert!((model.objective_value(&values) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_warm_start_skips_unknown() {
        let model = tiny_model();
        let values = model.warm_start(&[Appointment::new(3, 3, 3, 3, 3)]);
        assert!(values.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_violations_detected() {
        let model = tiny_model();
        // both assignments but no location use: capacity and linking broken
        let values = vec![1.0, 1.0, 0.0, 0.0];
        let violated: Vec<_> = model
            .violated_constraints(&values)
            .into_iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(violated, vec!["doctor_capacity_0", "location_use_0_0_1"]);
    }

    #[test]
    fn test_equal_constraint() {
        let mut model = AssignmentModel::new("eq");
        let x = model.add_assignment(Appointment::new(0, 0, 0, 0, 0));
        model.add_fixed_zero(
            "competence_0_0_0_0_0".into(),
            ConstraintFamily::Exclusion(Exclusion::Competence),
            x,
        );
        assert!(model.violated_constraints(&[0.0]).is_empty());
        assert_eq!(model.violated_constraints(&[1.0]).len(), 1);
    }

    #[test]
    fn test_undefined_variable() {
        let mut model = AssignmentModel::new("bad");
        model.add_at_most("c".into(), ConstraintFamily::PatientWeekly, &[VarId(5)], 1.0);
        assert!(matches!(model.validate(), Err(ModelError::InvalidModel(_))));
    }

    #[test]
    fn test_duplicate_name() {
        let mut model = AssignmentModel::new("dup");
        model.add_assignment(Appointment::new(0, 0, 0, 0, 0));
        model.add_assignment(Appointment::new(0, 0, 0, 0, 0));
        assert!(model.validate().is_err());
    }
}
