//! Clinical record
//!
//! Vital signs, physical exam findings, functional self-report and history.

use rmcp::schemars;
use serde::{Deserialize, Serialize};

/// Skin turgor on pinch test
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SkinTurgor {
    #[default]
    Normal,
    Reduced,
}

/// State of the oral mucous membranes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum MucousMembranes {
    #[default]
    Moist,
    Dry,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum EnergyLevel {
    Low,
    #[default]
    Normal,
    High,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SleepQuality {
    Poor,
    Fair,
    #[default]
    Good,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Appetite {
    Poor,
    #[default]
    Normal,
    Increased,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FatigueLevel {
    #[default]
    Absent,
    Mild,
    Moderate,
    Severe,
}

/// Resting vital signs
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(default)]
pub struct VitalSigns {
    pub systolic_bp: Option<f64>,      // mmHg
    pub diastolic_bp: Option<f64>,     // mmHg
    pub heart_rate: Option<f64>,       // bpm
    pub respiratory_rate: Option<f64>, // breaths/min
    pub temperature: Option<f64>,      // °C
}

/// Physical examination findings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(default)]
pub struct PhysicalExam {
    pub edema: bool,
    pub dehydration_signs: bool,
    pub skin_turgor: SkinTurgor,
    pub mucous_membranes: MucousMembranes,
    pub urine_specific_gravity: Option<f64>,
    pub hair: Option<String>,
    pub skin: Option<String>,
    pub nails: Option<String>,
    pub general_appearance: Option<String>,
}

/// Self-reported functional status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(default)]
pub struct FunctionalAssessment {
    pub energy_level: EnergyLevel,
    pub sleep_quality: SleepQuality,
    pub appetite: Appetite,
    pub fatigue: FatigueLevel,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(default)]
pub struct MedicalHistory {
    pub conditions: Vec<String>,
    pub medications: Vec<String>,
    pub allergies: Vec<String>,
    pub injuries: Vec<String>,
}

/// Heart-rate recovery and aerobic capacity measured around a training session
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(default)]
pub struct PerformanceMetrics {
    pub resting_heart_rate: Option<f64>,
    pub post_exercise_heart_rate: Option<f64>,
    pub minutes_post_exercise: Option<f64>,
    pub vo2_max: Option<f64>, // ml/kg/min
}

/// Clinical measurements
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(default)]
pub struct ClinicalRecord {
    pub vital_signs: VitalSigns,
    pub physical_exam: PhysicalExam,
    pub functional: FunctionalAssessment,
    pub medical_history: MedicalHistory,
    pub performance: Option<PerformanceMetrics>,
}
