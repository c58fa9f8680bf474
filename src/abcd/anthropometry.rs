//! Anthropometry calculator
//!
//! Body-composition metrics and BMI classification.
//!
//! None of these functions guard against degenerate input: a zero height or
//! hip circumference produces `inf`/`NaN`. Callers validate at the boundary
//! (see [`super::validation`]).

use std::f64::consts::PI;

use rmcp::schemars;
use serde::{Deserialize, Serialize};

use super::reference::{GrowthMetric, ReferenceTable, DEFAULT_GROWTH_REFERENCE};
use crate::models::{AnthropometryRecord, Classification, Gender, Skinfolds};

pub const BMI_UNDERWEIGHT: &str = "Bajo peso";
pub const BMI_UNDERWEIGHT_RISK: &str = "Riesgo de bajo peso";
pub const BMI_NORMAL: &str = "Normal";
pub const BMI_OVERWEIGHT: &str = "Sobrepeso";
pub const BMI_OBESE: &str = "Obesidad";

/// Age from which adult BMI cutoffs apply
pub const ADULT_AGE: u32 = 18;

/// How BMI is compared against the pediatric 5/15/85/95 cutoffs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PediatricBmiMode {
    /// Cutoffs applied to the BMI value itself (historical behavior)
    #[default]
    RawValue,
    /// Cutoffs applied to the BMI-for-gender growth percentile
    Percentile,
}

/// Body Mass Index, kg/m²
pub fn bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

/// Classify a BMI value for the given age and gender
///
/// Under 18 the 5/15/85/95 cutoffs are compared against the raw BMI; use
/// [`classify_bmi_with`] and [`PediatricBmiMode::Percentile`] for the
/// percentile-based reading.
pub fn classify_bmi(bmi: f64, age: u32, gender: Gender) -> Classification {
    classify_bmi_with(bmi, age, gender, PediatricBmiMode::RawValue)
}

pub fn classify_bmi_with(
    bmi: f64,
    age: u32,
    gender: Gender,
    mode: PediatricBmiMode,
) -> Classification {
    if age >= ADULT_AGE {
        let label = if bmi < 18.5 {
            BMI_UNDERWEIGHT
        } else if bmi < 25.0 {
            BMI_NORMAL
        } else if bmi < 30.0 {
            BMI_OVERWEIGHT
        } else {
            BMI_OBESE
        };
        return Classification::new(label, bmi);
    }

    let measure = match mode {
        PediatricBmiMode::RawValue => bmi,
        PediatricBmiMode::Percentile => {
            f64::from(growth_percentile(bmi, age, gender, GrowthMetric::Bmi))
        }
    };

    let label = if measure < 5.0 {
        BMI_UNDERWEIGHT
    } else if measure < 15.0 {
        BMI_UNDERWEIGHT_RISK
    } else if measure < 85.0 {
        BMI_NORMAL
    } else if measure < 95.0 {
        BMI_OVERWEIGHT
    } else {
        BMI_OBESE
    };
    Classification::new(label, bmi)
}

// ============================================================================
// Growth Percentiles
// ============================================================================

const CDF_P: f64 = 0.231_641_9;
const CDF_B: [f64; 5] = [
    0.319_381_530,
    -0.356_563_782,
    1.781_477_937,
    -1.821_255_978,
    1.330_274_429,
];

/// Standard normal CDF, Zelen & Severo rational approximation (|error| < 7.5e-8)
pub fn normal_cdf(z: f64) -> f64 {
    let t = 1.0 / (1.0 + CDF_P * z.abs());
    let poly = t * (CDF_B[0] + t * (CDF_B[1] + t * (CDF_B[2] + t * (CDF_B[3] + t * CDF_B[4]))));
    let density = (-z * z / 2.0).exp() / (2.0 * PI).sqrt();
    let upper_tail = density * poly;
    if z >= 0.0 {
        1.0 - upper_tail
    } else {
        upper_tail
    }
}

/// Integer percentile (0-100) of a z-score
pub fn z_to_percentile(z: f64) -> u8 {
    let percentile = (normal_cdf(z) * 100.0).round().clamp(0.0, 100.0);
    // NaN saturates to 0
    percentile as u8
}

/// Growth percentile against the built-in reference table
pub fn growth_percentile(value: f64, age: u32, gender: Gender, metric: GrowthMetric) -> u8 {
    growth_percentile_with(&DEFAULT_GROWTH_REFERENCE, value, age, gender, metric)
}

/// Growth percentile against a caller-supplied reference table
pub fn growth_percentile_with<T: ReferenceTable + ?Sized>(
    table: &T,
    value: f64,
    age: u32,
    gender: Gender,
    metric: GrowthMetric,
) -> u8 {
    let stats = table.stats(metric, age, gender);
    z_to_percentile(stats.z_score(value))
}

// ============================================================================
// Body Composition
// ============================================================================

/// Fat-free mass from weight and body fat percentage
pub fn lean_body_mass(weight_kg: f64, body_fat_percentage: f64) -> f64 {
    weight_kg * (1.0 - body_fat_percentage / 100.0)
}

pub fn waist_hip_ratio(waist_cm: f64, hip_cm: f64) -> f64 {
    waist_cm / hip_cm
}

/// Central adiposity flag: above 0.90 for males, 0.85 for females
pub fn classify_waist_hip_ratio(ratio: f64, gender: Gender) -> Classification {
    let limit = match gender {
        Gender::Male => 0.90,
        Gender::Female => 0.85,
    };
    let label = if ratio > limit {
        "Riesgo de adiposidad central"
    } else {
        "Distribución de grasa normal"
    };
    Classification::new(label, ratio)
}

/// Mid-arm muscle area in cm² (arm circumference in cm, triceps skinfold in mm)
pub fn arm_muscle_area(arm_circumference_cm: f64, triceps_mm: f64) -> f64 {
    let muscle_circumference = arm_circumference_cm - PI * triceps_mm / 10.0;
    muscle_circumference * muscle_circumference / (4.0 * PI)
}

/// Body fat percentage from the four-site skinfold sum
///
/// Body density from a gender-specific quadratic in the skinfold sum with an
/// age term, converted with the Siri equation. Result is clamped to 0-100.
pub fn estimate_body_fat(skinfolds: &Skinfolds, age: u32, gender: Gender) -> f64 {
    let sum = skinfolds.sum();
    let age = f64::from(age);
    let density = match gender {
        Gender::Male => 1.10938 - 0.000_826_7 * sum + 0.000_001_6 * sum * sum - 0.000_257_4 * age,
        Gender::Female => {
            1.099_492_1 - 0.000_992_9 * sum + 0.000_002_3 * sum * sum - 0.000_139_2 * age
        }
    };
    (495.0 / density - 450.0).clamp(0.0, 100.0)
}

// ============================================================================
// Record Assessment
// ============================================================================

/// Metrics derivable from one anthropometry record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnthropometryAssessment {
    pub bmi: f64,
    pub classification: Classification,
    pub bmi_percentile: Option<u8>,
    pub estimated_body_fat: Option<f64>,
    pub lean_body_mass: Option<f64>,
    pub waist_hip_ratio: Option<Classification>,
    pub arm_muscle_area: Option<f64>,
    pub recommendations: Vec<String>,
}

/// Derive every metric the record has inputs for
pub fn assess(record: &AnthropometryRecord, age: u32, gender: Gender) -> AnthropometryAssessment {
    let bmi = bmi(record.weight, record.height);
    let classification = classify_bmi(bmi, age, gender);
    let bmi_percentile =
        (age < ADULT_AGE).then(|| growth_percentile(bmi, age, gender, GrowthMetric::Bmi));

    let estimated_body_fat = record
        .skinfolds
        .as_ref()
        .map(|s| estimate_body_fat(s, age, gender));

    // Measured body fat wins over the skinfold estimate
    let lean_body_mass = record
        .body_fat_percentage
        .or(estimated_body_fat)
        .map(|bf| lean_body_mass(record.weight, bf));

    let waist_hip = match (record.waist_circumference, record.hip_circumference) {
        (Some(waist), Some(hip)) => {
            Some(classify_waist_hip_ratio(waist_hip_ratio(waist, hip), gender))
        }
        _ => None,
    };

    let arm_muscle = match (record.arm_circumference, record.skinfolds) {
        (Some(arm), Some(skinfolds)) => Some(arm_muscle_area(arm, skinfolds.triceps)),
        _ => None,
    };

    let mut recommendations: Vec<String> = bmi_recommendations(&classification.label)
        .iter()
        .map(|r| r.to_string())
        .collect();
    if let Some(ref whr) = waist_hip {
        if whr.label.starts_with("Riesgo") {
            recommendations.push("Reducir la grasa abdominal con trabajo aeróbico y control de azúcares".to_string());
        }
    }

    AnthropometryAssessment {
        bmi,
        classification,
        bmi_percentile,
        estimated_body_fat,
        lean_body_mass,
        waist_hip_ratio: waist_hip,
        arm_muscle_area: arm_muscle,
        recommendations,
    }
}

fn bmi_recommendations(label: &str) -> &'static [&'static str] {
    match label {
        BMI_UNDERWEIGHT => &[
            "Aumentar la ingesta energética con comidas y colaciones nutritivas",
            "Control de peso mensual",
        ],
        BMI_UNDERWEIGHT_RISK => &["Vigilar la ganancia de peso en cada control"],
        BMI_NORMAL => &["Mantener hábitos alimentarios actuales"],
        BMI_OVERWEIGHT => &[
            "Ajustar porciones y aumentar el consumo de verduras",
            "Limitar bebidas azucaradas",
        ],
        _ => &[
            "Referir a evaluación nutricional individualizada",
            "Limitar bebidas azucaradas y alimentos ultraprocesados",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bmi() {
        assert!((bmi(45.0, 150.0) - 20.0).abs() < 1e-9);
        assert!((bmi(70.0, 175.0) - 22.857).abs() < 0.001);
    }

    #[test]
    fn test_bmi_zero_height_is_not_guarded() {
        assert!(bmi(45.0, 0.0).is_infinite());
        assert!(bmi(0.0, 0.0).is_nan());
    }

    #[test]
    fn test_classify_adult() {
        assert_eq!(classify_bmi(22.0, 25, Gender::Male).label, BMI_NORMAL);
        assert_eq!(classify_bmi(17.0, 25, Gender::Female).label, BMI_UNDERWEIGHT);
        assert_eq!(classify_bmi(27.0, 25, Gender::Male).label, BMI_OVERWEIGHT);
        assert_eq!(classify_bmi(32.0, 25, Gender::Female).label, BMI_OBESE);
        assert_eq!(classify_bmi(32.0, 25, Gender::Female).value, 32.0);
    }

    #[test]
    fn test_classify_pediatric_uses_raw_value() {
        // 5/15/85/95 compared against the BMI itself
        assert_eq!(classify_bmi(20.0, 12, Gender::Male).label, BMI_NORMAL);
        assert_eq!(classify_bmi(14.0, 12, Gender::Male).label, BMI_UNDERWEIGHT_RISK);
        assert_eq!(classify_bmi(4.0, 12, Gender::Male).label, BMI_UNDERWEIGHT);
        assert_eq!(classify_bmi(35.0, 12, Gender::Female).label, BMI_NORMAL);
    }

    #[test]
    fn test_classify_pediatric_percentile_mode() {
        let mode = PediatricBmiMode::Percentile;
        assert_eq!(classify_bmi_with(20.0, 12, Gender::Male, mode).label, BMI_NORMAL);
        assert_eq!(classify_bmi_with(14.0, 12, Gender::Male, mode).label, BMI_UNDERWEIGHT);
        assert_eq!(classify_bmi_with(25.0, 12, Gender::Male, mode).label, BMI_OBESE);
        // Adults are unaffected by the mode
        assert_eq!(classify_bmi_with(22.0, 30, Gender::Male, mode).label, BMI_NORMAL);
    }

    #[test]
    fn test_normal_cdf_known_values() {
        assert!((normal_cdf(0.0) - 0.5).abs() < 1e-7);
        assert!((normal_cdf(1.0) - 0.841_344_7).abs() < 1e-6);
        assert!((normal_cdf(-1.0) - 0.158_655_3).abs() < 1e-6);
        assert!((normal_cdf(1.96) - 0.975_002_1).abs() < 1e-6);
    }

    #[test]
    fn test_normal_cdf_symmetry() {
        for z in [0.25, 0.5, 1.3, 2.2, 3.1] {
            assert!((normal_cdf(z) + normal_cdf(-z) - 1.0).abs() < 1e-7);
        }
    }

    #[test]
    fn test_percentiles() {
        assert_eq!(z_to_percentile(0.0), 50);
        assert_eq!(z_to_percentile(1.0), 84);
        assert_eq!(z_to_percentile(-2.0), 2);
        assert_eq!(z_to_percentile(10.0), 100);
        assert_eq!(z_to_percentile(-10.0), 0);
        assert_eq!(growth_percentile(160.0, 12, Gender::Male, GrowthMetric::Height), 84);
        assert_eq!(growth_percentile(45.0, 12, Gender::Male, GrowthMetric::Weight), 50);
    }

    #[test]
    fn test_percentile_with_custom_table() {
        use crate::abcd::reference::ReferenceStats;

        struct Flat;
        impl ReferenceTable for Flat {
            fn stats(&self, _: GrowthMetric, _: u32, _: Gender) -> ReferenceStats {
                ReferenceStats::new(100.0, 10.0)
            }
        }

        assert_eq!(growth_percentile_with(&Flat, 80.0, 10, Gender::Female, GrowthMetric::Height), 2);
    }

    #[test]
    fn test_body_composition() {
        assert!((lean_body_mass(60.0, 15.0) - 51.0).abs() < 1e-9);
        assert!((waist_hip_ratio(70.0, 90.0) - 0.7778).abs() < 0.001);
        assert!((arm_muscle_area(25.0, 10.0) - 38.021).abs() < 0.01);
    }

    #[test]
    fn test_waist_hip_classification_by_gender() {
        assert!(classify_waist_hip_ratio(0.88, Gender::Female).label.starts_with("Riesgo"));
        assert!(!classify_waist_hip_ratio(0.88, Gender::Male).label.starts_with("Riesgo"));
    }

    #[test]
    fn test_estimate_body_fat() {
        let male = Skinfolds { triceps: 10.0, biceps: 5.0, subscapular: 8.0, suprailiac: 9.0 };
        assert!((estimate_body_fat(&male, 15, Gender::Male) - 8.035).abs() < 0.01);

        let female = Skinfolds { triceps: 15.0, biceps: 8.0, subscapular: 12.0, suprailiac: 15.0 };
        assert!((estimate_body_fat(&female, 16, Gender::Female) - 19.92).abs() < 0.01);
    }

    #[test]
    fn test_assess_collects_available_metrics() {
        let record = AnthropometryRecord {
            height: 150.0,
            weight: 45.0,
            body_fat_percentage: Some(20.0),
            waist_circumference: Some(65.0),
            hip_circumference: Some(80.0),
            ..Default::default()
        };
        let result = assess(&record, 12, Gender::Male);
        assert_eq!(result.classification.label, BMI_NORMAL);
        assert_eq!(result.lean_body_mass, Some(36.0));
        assert!(result.estimated_body_fat.is_none());
        assert!(result.arm_muscle_area.is_none());
        assert!(result.bmi_percentile.is_some());
        assert_eq!(result.recommendations, vec!["Mantener hábitos alimentarios actuales"]);
    }

    #[test]
    fn test_assess_is_idempotent() {
        let record = AnthropometryRecord { height: 162.0, weight: 58.0, ..Default::default() };
        assert_eq!(assess(&record, 16, Gender::Female), assess(&record, 16, Gender::Female));
    }
}
