//! Reference tables and threshold constants
//!
//! Sport factors, growth reference statistics and the fixed cutoffs shared by
//! the calculators. Everything here is immutable; alternative growth references
//! plug in through [`ReferenceTable`].

use serde::{Deserialize, Serialize};

use crate::models::{Gender, Sport};

// ============================================================================
// Energy and Macronutrient Constants
// ============================================================================

/// Kilocalories per gram of carbohydrate or protein
pub const KCAL_PER_G_CARB_PROTEIN: f64 = 4.0;
/// Kilocalories per gram of fat
pub const KCAL_PER_G_FAT: f64 = 9.0;
/// Share of total calories from carbohydrate
pub const CARB_SHARE: f64 = 0.55;
/// Share of total calories from protein
pub const PROTEIN_SHARE: f64 = 0.20;
/// Share of total calories from fat
pub const FAT_SHARE: f64 = 0.25;
/// Energy factor for sports without a specific entry
pub const DEFAULT_ENERGY_FACTOR: f64 = 1.7;

// ============================================================================
// Hydration Constants
// ============================================================================

/// Baseline fluid requirement, ml per kg of body weight
pub const BASE_ML_PER_KG: f64 = 35.0;
/// Multiplier above 25 °C
pub const HOT_WEATHER_MULTIPLIER: f64 = 1.2;
/// Multiplier below 10 °C
pub const COLD_WEATHER_MULTIPLIER: f64 = 0.9;

// ============================================================================
// Clinical Constants
// ============================================================================

/// Muscle mass (kg) above which the adjusted BMI gets the extra factor
pub const HIGH_MUSCLE_MASS_KG: f64 = 45.0;
/// Extra BMI factor for high muscle mass
pub const HIGH_MUSCLE_MASS_FACTOR: f64 = 1.1;
/// Urine specific gravity above which the athlete is considered concentrated
pub const USG_DEHYDRATION_THRESHOLD: f64 = 1.020;

/// Energy multiplier applied to BMR for a sport's training demands
pub fn sport_energy_factor(sport: Sport) -> f64 {
    match sport {
        Sport::Futbol => 1.8,
        Sport::Baloncesto => 1.8,
        Sport::Voleibol => 1.7,
        Sport::Natacion => 1.9,
        Sport::Atletismo => 1.85,
        Sport::Tenis => 1.75,
        Sport::Gimnasia => 1.75,
        Sport::Ciclismo => 1.9,
        Sport::ArtesMarciales => 1.75,
        Sport::Other => DEFAULT_ENERGY_FACTOR,
    }
}

/// BMI correction for the typical body build of a sport
pub fn sport_bmi_factor(sport: Sport) -> f64 {
    match sport {
        Sport::Futbol => 0.95,
        Sport::Baloncesto => 0.97,
        Sport::Voleibol => 0.97,
        Sport::Natacion => 0.95,
        Sport::Atletismo => 0.93,
        Sport::Tenis => 0.98,
        Sport::Gimnasia => 0.92,
        Sport::Ciclismo => 0.95,
        Sport::ArtesMarciales => 0.90,
        Sport::Other => 1.0,
    }
}

// ============================================================================
// Growth Reference
// ============================================================================

/// Measurement a growth percentile is computed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrowthMetric {
    Height,
    Weight,
    Bmi,
}

impl GrowthMetric {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "height" | "talla" | "estatura" => Some(GrowthMetric::Height),
            "weight" | "peso" => Some(GrowthMetric::Weight),
            "bmi" | "imc" => Some(GrowthMetric::Bmi),
            _ => None,
        }
    }
}

/// Mean and standard deviation of a reference population
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceStats {
    pub mean: f64,
    pub sd: f64,
}

impl ReferenceStats {
    pub const fn new(mean: f64, sd: f64) -> Self {
        Self { mean, sd }
    }

    /// Standard score of a value against this population
    pub fn z_score(&self, value: f64) -> f64 {
        (value - self.mean) / self.sd
    }
}

/// Provider of baseline means and standard deviations for percentile lookups
pub trait ReferenceTable {
    fn stats(&self, metric: GrowthMetric, age: u32, gender: Gender) -> ReferenceStats;
}

/// Built-in reference: one mean/SD pair per metric and gender, age-invariant
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultGrowthReference;

/// Module-level instance of the built-in reference
pub const DEFAULT_GROWTH_REFERENCE: DefaultGrowthReference = DefaultGrowthReference;

impl ReferenceTable for DefaultGrowthReference {
    fn stats(&self, metric: GrowthMetric, _age: u32, gender: Gender) -> ReferenceStats {
        match (metric, gender) {
            (GrowthMetric::Height, Gender::Male) => ReferenceStats::new(150.0, 10.0),
            (GrowthMetric::Height, Gender::Female) => ReferenceStats::new(148.0, 9.0),
            (GrowthMetric::Weight, Gender::Male) => ReferenceStats::new(45.0, 10.0),
            (GrowthMetric::Weight, Gender::Female) => ReferenceStats::new(42.0, 9.0),
            (GrowthMetric::Bmi, Gender::Male) => ReferenceStats::new(19.5, 3.0),
            (GrowthMetric::Bmi, Gender::Female) => ReferenceStats::new(19.8, 3.2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_energy_factor_defaults() {
        assert_eq!(sport_energy_factor(Sport::Futbol), 1.8);
        assert_eq!(sport_energy_factor(Sport::Other), DEFAULT_ENERGY_FACTOR);
        assert_eq!(sport_energy_factor(Sport::from_str("ajedrez")), 1.7);
    }

    #[test]
    fn test_bmi_factor_defaults() {
        assert_eq!(sport_bmi_factor(Sport::Other), 1.0);
        assert!(sport_bmi_factor(Sport::Gimnasia) < 1.0);
    }

    #[test]
    fn test_macro_shares_sum_to_one() {
        assert!((CARB_SHARE + PROTEIN_SHARE + FAT_SHARE - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_default_reference_z_score() {
        let stats = DEFAULT_GROWTH_REFERENCE.stats(GrowthMetric::Height, 12, Gender::Male);
        assert_eq!(stats.z_score(160.0), 1.0);
        assert_eq!(GrowthMetric::from_str("IMC"), Some(GrowthMetric::Bmi));
    }
}
