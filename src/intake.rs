//! Intake helpers for deriving instance matrices from patient ages.
//!
//! Doctors declare which age groups they treat; competence follows from
//! each patient's age. Children are never seen remotely.
//!
//! | Group | Age |
//! |-------|-----|
//! | Child | < 12 |
//! | Adolescent | 12..18 |
//! | Adult | ≥ 18 |
//!
//! Ages are truncated to whole years before classification.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::models::{Instance, REMOTE_LOCATION};
use crate::validation::{ValidationError, ValidationErrorKind};

/// Age group of a patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    Child,
    Adolescent,
    Adult,
}

impl AgeGroup {
    /// Classifies an age in years; `None` for negative or non-finite ages.
    pub fn from_age(age: f64) -> Option<Self> {
        if !age.is_finite() || age < 0.0 {
            return None;
        }
        let years = age.trunc();
        Some(if years < 12.0 {
            AgeGroup::Child
        } else if years < 18.0 {
            AgeGroup::Adolescent
        } else {
            AgeGroup::Adult
        })
    }
}

/// Age groups a doctor treats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorAgeRules {
    pub children: bool,
    pub adolescents: bool,
    pub adults: bool,
}

impl DoctorAgeRules {
    /// Rules accepting every age group.
    pub fn all() -> Self {
        Self {
            children: true,
            adolescents: true,
            adults: true,
        }
    }

    pub fn with_children(mut self, children: bool) -> Self {
        self.children = children;
        self
    }

    pub fn with_adolescents(mut self, adolescents: bool) -> Self {
        self.adolescents = adolescents;
        self
    }

    pub fn with_adults(mut self, adults: bool) -> Self {
        self.adults = adults;
        self
    }

    /// Whether the doctor treats the given group.
    pub fn accepts(&self, group: AgeGroup) -> bool {
        match group {
            AgeGroup::Child => self.children,
            AgeGroup::Adolescent => self.adolescents,
            AgeGroup::Adult => self.adults,
        }
    }
}

fn age_groups(ages: &[f64]) -> Result<Vec<AgeGroup>, ModelError> {
    let mut groups = Vec::with_capacity(ages.len());
    let mut errors = Vec::new();
    for (p, &age) in ages.iter().enumerate() {
        match AgeGroup::from_age(age) {
            Some(g) => groups.push(g),
            None => errors.push(ValidationError::new(
                ValidationErrorKind::PatientAge,
                format!("patient {p} has no valid age ({age})"),
            )),
        }
    }
    if errors.is_empty() {
        Ok(groups)
    } else {
        Err(ModelError::InvalidInput(errors))
    }
}

/// Derives the `[m][p]` competence matrix from doctor rules and patient ages.
///
/// # Errors
/// [`ModelError::InvalidInput`] listing every patient without a valid age.
pub fn competence_from_age_rules(
    rules: &[DoctorAgeRules],
    ages: &[f64],
) -> Result<Vec<Vec<bool>>, ModelError> {
    let groups = age_groups(ages)?;
    Ok(rules
        .iter()
        .map(|r| groups.iter().map(|&g| r.accepts(g)).collect())
        .collect())
}

/// Closes the remote location for every child on every day.
///
/// # Errors
/// [`ModelError::InvalidInput`] when `ages` does not have one entry per
/// patient or an age is invalid.
pub fn restrict_remote_for_children(
    instance: &mut Instance,
    ages: &[f64],
) -> Result<(), ModelError> {
    if ages.len() != instance.patients {
        return Err(ModelError::InvalidInput(vec![ValidationError::new(
            ValidationErrorKind::PatientAge,
            format!(
                "ages has {} entries, expected {}",
                ages.len(),
                instance.patients
            ),
        )]));
    }
    let groups = age_groups(ages)?;
    for (p, group) in groups.into_iter().enumerate() {
        if group != AgeGroup::Child {
            continue;
        }
        if let Some(days) = instance
            .patient_locations
            .get_mut(p)
            .and_then(|locations| locations.get_mut(REMOTE_LOCATION))
        {
            days.iter_mut().for_each(|open| *open = false);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_groups() {
        assert_eq!(AgeGroup::from_age(0.0), Some(AgeGroup::Child));
        assert_eq!(AgeGroup::from_age(11.9), Some(AgeGroup::Child));
        assert_eq!(AgeGroup::from_age(12.0), Some(AgeGroup::Adolescent));
        assert_eq!(AgeGroup::from_age(17.5), Some(AgeGroup::Adolescent));
        assert_eq!(AgeGroup::from_age(18.0), Some(AgeGroup::Adult));
        assert_eq!(AgeGroup::from_age(-1.0), None);
        assert_eq!(AgeGroup::from_age(f64::NAN), None);
    }

    #[test]
    fn test_competence_from_rules() {
        let rules = [
            DoctorAgeRules::default().with_children(true),
            DoctorAgeRules::all().with_children(false),
        ];
        let ages = [8.0, 15.0, 40.0];
        let competence = competence_from_age_rules(&rules, &ages).unwrap();
        assert_eq!(
            competence,
            vec![vec![true, false, false], vec![false, true, true]]
        );
    }

    #[test]
    fn test_competence_reports_every_bad_age() {
        let err = competence_from_age_rules(&[DoctorAgeRules::all()], &[f64::NAN, 30.0, -2.0])
            .unwrap_err();
        match err {
            ModelError::InvalidInput(errors) => {
                assert_eq!(errors.len(), 2);
                assert!(errors[0].message.contains("patient 0"));
                assert!(errors[1].message.contains("patient 2"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_children_lose_remote_location() {
        let mut inst = Instance::new(1, 2, 2)
            .with_patient_location(0, 0, 0)
            .with_patient_location(0, 0, 3)
            .with_patient_location(0, 1, 3)
            .with_patient_location(1, 0, 0);
        restrict_remote_for_children(&mut inst, &[9.0, 30.0]).unwrap();
        assert!(!inst.patient_attends(0, 0, 0));
        assert!(!inst.patient_attends(0, 0, 3));
        assert!(inst.patient_attends(0, 1, 3));
        assert!(inst.patient_attends(1, 0, 0));
    }

    #[test]
    fn test_restrict_rejects_wrong_length() {
        let mut inst = Instance::new(0, 2, 1);
        assert!(restrict_remote_for_children(&mut inst, &[10.0]).is_err());
    }
}
