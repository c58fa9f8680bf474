//! Composite ABCD evaluator
//!
//! Additive binary-checkpoint score over the four domains. Each domain is
//! worth up to 25 points and each sub-check passes or fails as a whole; a
//! domain whose inputs are missing scores 0. Risk factors, strengths and
//! recommendations are collected independently of the points, so a risk
//! factor can appear next to an optimal status.

use rmcp::schemars;
use serde::{Deserialize, Serialize};

use super::anthropometry::{bmi, classify_bmi_with, PediatricBmiMode, BMI_NORMAL};
use super::biochemistry::{evaluate_iron_status, IRON_NORMAL};
use super::push_unique;
use crate::models::{AbcdRecords, Gender, NutritionalStatus, OverallAssessment};

/// Highest attainable point total
pub const MAX_POINTS: f64 = 100.0;

const ANTHROPOMETRY_POINTS: f64 = 25.0;
const BIOCHEMISTRY_POINTS: f64 = 25.0;
const BLOOD_PRESSURE_POINTS: f64 = 12.5;
const HEART_RATE_POINTS: f64 = 12.5;
const CALORIES_POINTS: f64 = 8.0;
const PROTEIN_POINTS: f64 = 8.0;
const WATER_POINTS: f64 = 9.0;

/// Dietetics subtotal below which diet quality is flagged
const DIETETICS_FLAG_THRESHOLD: f64 = 20.0;

pub const POOR_DIET_QUALITY: &str = "Calidad dietética deficiente";

/// How the protein checkpoint reads the reported intake
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProteinBasis {
    /// Reported grams compared directly against 1.2-2.0 (historical behavior)
    #[default]
    RawGrams,
    /// Grams divided by body weight before the comparison
    PerKg,
}

/// Switches for the corrected checkpoint variants; defaults keep parity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(default)]
pub struct EvaluationOptions {
    pub pediatric_bmi: PediatricBmiMode,
    pub protein_basis: ProteinBasis,
}

/// Points earned per domain, before normalization
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainPoints {
    pub anthropometry: f64,
    pub biochemistry: f64,
    pub clinical: f64,
    pub dietetics: f64,
}

impl DomainPoints {
    pub fn total(&self) -> f64 {
        self.anthropometry + self.biochemistry + self.clinical + self.dietetics
    }
}

/// Evaluate with the default (parity) options
pub fn evaluate(records: &AbcdRecords, age: u32, gender: Gender) -> OverallAssessment {
    evaluate_with(records, age, gender, &EvaluationOptions::default())
}

pub fn evaluate_with(
    records: &AbcdRecords,
    age: u32,
    gender: Gender,
    options: &EvaluationOptions,
) -> OverallAssessment {
    evaluate_detailed(records, age, gender, options).0
}

/// Score the records and return the per-domain breakdown alongside the result
pub fn evaluate_detailed(
    records: &AbcdRecords,
    age: u32,
    gender: Gender,
    options: &EvaluationOptions,
) -> (OverallAssessment, DomainPoints) {
    let mut points = DomainPoints::default();
    let mut risk_factors = Vec::new();
    let mut strengths = Vec::new();
    let mut recommendations = Vec::new();

    // Anthropometry
    let anthro = &records.anthropometry;
    if anthro.has_bmi_inputs() {
        let value = bmi(anthro.weight, anthro.height);
        let classification = classify_bmi_with(value, age, gender, options.pediatric_bmi);
        let entry = format!("Clasificación IMC: {}", classification.label);
        if classification.label == BMI_NORMAL {
            points.anthropometry = ANTHROPOMETRY_POINTS;
            push_unique(&mut strengths, &entry);
        } else {
            push_unique(&mut risk_factors, &entry);
            push_unique(
                &mut recommendations,
                "Ajustar el plan de alimentación para llevar el IMC a rango normal",
            );
        }
    }

    // Biochemistry
    if let Some((hemoglobin, ferritin)) = records.biochemistry.iron_inputs() {
        let iron = evaluate_iron_status(hemoglobin, ferritin, age, gender);
        if iron.status == IRON_NORMAL {
            points.biochemistry = BIOCHEMISTRY_POINTS;
            push_unique(&mut strengths, IRON_NORMAL);
        } else {
            push_unique(&mut risk_factors, &iron.status);
            for rec in &iron.recommendations {
                push_unique(&mut recommendations, rec);
            }
        }
    }

    // Clinical
    let vitals = &records.clinical.vital_signs;
    if let (Some(systolic), Some(diastolic)) = (vitals.systolic_bp, vitals.diastolic_bp) {
        if systolic < 130.0 && diastolic < 85.0 {
            points.clinical += BLOOD_PRESSURE_POINTS;
            push_unique(&mut strengths, "Presión arterial normal");
        } else {
            push_unique(&mut risk_factors, "Presión arterial elevada");
            push_unique(&mut recommendations, "Controlar la presión arterial y reducir el sodio");
        }
    }
    if let Some(heart_rate) = vitals.heart_rate {
        if (60.0..=100.0).contains(&heart_rate) {
            points.clinical += HEART_RATE_POINTS;
            push_unique(&mut strengths, "Frecuencia cardiaca en rango");
        } else {
            push_unique(&mut risk_factors, "Frecuencia cardiaca fuera de rango");
        }
    }

    // Dietetics
    let intake = &records.dietetics.intake;
    if (2000.0..=3500.0).contains(&intake.calories) {
        points.dietetics += CALORIES_POINTS;
    } else {
        push_unique(&mut recommendations, "Ajustar la ingesta calórica a 2000-3500 kcal al día");
    }

    let protein_value = match options.protein_basis {
        ProteinBasis::RawGrams => intake.protein,
        ProteinBasis::PerKg if anthro.weight > 0.0 => intake.protein / anthro.weight,
        ProteinBasis::PerKg => f64::NAN,
    };
    if (1.2..=2.0).contains(&protein_value) {
        points.dietetics += PROTEIN_POINTS;
    } else {
        push_unique(&mut recommendations, "Ajustar la proteína a 1.2-2.0 g por kg de peso");
    }

    if intake.water >= 2.5 {
        points.dietetics += WATER_POINTS;
    } else {
        push_unique(&mut recommendations, "Aumentar el consumo de agua a 2.5 L o más al día");
    }

    if points.dietetics < DIETETICS_FLAG_THRESHOLD {
        push_unique(&mut risk_factors, POOR_DIET_QUALITY);
    } else {
        push_unique(&mut strengths, "Hábitos dietéticos adecuados");
    }

    let score = (points.total() / MAX_POINTS * 100.0).round().clamp(0.0, 100.0) as u8;

    let assessment = OverallAssessment {
        score,
        status: NutritionalStatus::from_score(score),
        risk_factors,
        strengths,
        recommendations,
    };
    (assessment, points)
}
