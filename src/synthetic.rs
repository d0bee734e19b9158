//! Synthetic instance generator.
//!
//! Produces random but well-formed instances for tests and benchmarks.
//! Generation is fully determined by the configuration and the seed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::models::{Instance, DAYS, HOURS};

/// Configuration for generating instances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceGeneratorConfig {
    pub doctors: usize,
    pub patients: usize,
    /// Location count including the remote location.
    pub locations: usize,
    /// Weekly capacity range per doctor (min, max).
    pub capacity_range: (u32, u32),
    /// Probability a doctor is competent for a patient.
    pub competence_density: f64,
    /// Probability a doctor works at a location.
    pub doctor_location_density: f64,
    /// Probability a patient can attend a location on a day.
    pub patient_location_density: f64,
    /// Probability a doctor is free at a slot.
    pub doctor_hour_density: f64,
    /// Probability a patient is free at a slot.
    pub patient_hour_density: f64,
}

impl Default for InstanceGeneratorConfig {
    fn default() -> Self {
        Self::medium()
    }
}

impl InstanceGeneratorConfig {
    /// Small, loosely constrained instance.
    pub fn easy() -> Self {
        Self {
            doctors: 3,
            patients: 12,
            locations: 2,
            capacity_range: (4, 8),
            competence_density: 0.8,
            doctor_location_density: 0.8,
            patient_location_density: 0.6,
            doctor_hour_density: 0.5,
            patient_hour_density: 0.4,
        }
    }

    pub fn medium() -> Self {
        Self {
            doctors: 6,
            patients: 40,
            locations: 3,
            capacity_range: (4, 10),
            competence_density: 0.6,
            doctor_location_density: 0.6,
            patient_location_density: 0.4,
            doctor_hour_density: 0.35,
            patient_hour_density: 0.25,
        }
    }

    /// Larger instance with sparse availability.
    pub fn hard() -> Self {
        Self {
            doctors: 12,
            patients: 120,
            locations: 4,
            capacity_range: (5, 15),
            competence_density: 0.5,
            doctor_location_density: 0.5,
            patient_location_density: 0.3,
            doctor_hour_density: 0.3,
            patient_hour_density: 0.15,
        }
    }

    pub fn with_size(mut self, doctors: usize, patients: usize, locations: usize) -> Self {
        self.doctors = doctors;
        self.patients = patients;
        self.locations = locations;
        self
    }

    pub fn with_capacity_range(mut self, min: u32, max: u32) -> Self {
        self.capacity_range = (min, max);
        self
    }
}

/// Generator for random instances.
pub struct InstanceGenerator {
    config: InstanceGeneratorConfig,
    rng: StdRng,
}

impl InstanceGenerator {
    /// Creates a generator with the given config and seed.
    pub fn new(config: InstanceGeneratorConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generates one instance.
    ///
    /// Every doctor works at one location at least; everything else is
    /// drawn independently with the configured densities.
    pub fn generate(&mut self) -> Instance {
        let cfg = self.config.clone();
        let mut inst = Instance::new(cfg.doctors, cfg.patients, cfg.locations);

        let (lo, hi) = cfg.capacity_range;
        let (lo, hi) = (lo.min(hi), lo.max(hi));
        for m in 0..cfg.doctors {
            inst.capacity[m] = f64::from(self.rng.random_range(lo..=hi));
            for p in 0..cfg.patients {
                inst.competence[m][p] = self.flip(cfg.competence_density);
            }
            for l in 0..cfg.locations {
                inst.doctor_locations[m][l] = self.flip(cfg.doctor_location_density);
            }
            if cfg.locations > 0 && !inst.doctor_locations[m].iter().any(|&w| w) {
                let l = self.rng.random_range(0..cfg.locations);
                inst.doctor_locations[m][l] = true;
            }
            for d in 0..DAYS {
                for h in 0..HOURS {
                    inst.doctor_hours[m][d][h] = self.flip(cfg.doctor_hour_density);
                }
            }
        }

        for p in 0..cfg.patients {
            for l in 0..cfg.locations {
                for d in 0..DAYS {
                    inst.patient_locations[p][l][d] = self.flip(cfg.patient_location_density);
                }
            }
            for d in 0..DAYS {
                for h in 0..HOURS {
                    inst.patient_hours[p][d][h] = self.flip(cfg.patient_hour_density);
                }
            }
        }

        inst
    }

    fn flip(&mut self, p: f64) -> bool {
        let p = if p.is_finite() { p.clamp(0.0, 1.0) } else { 0.0 };
        self.rng.random_bool(p)
    }
}
