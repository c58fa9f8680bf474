//! Anthropometry record
//!
//! Body measurements taken at an evaluation.

use rmcp::schemars;
use serde::{Deserialize, Serialize};

/// Caliper skinfold measurements, all in millimeters
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(default)]
pub struct Skinfolds {
    pub triceps: f64,
    pub biceps: f64,
    pub subscapular: f64,
    pub suprailiac: f64,
}

impl Skinfolds {
    /// Sum of the four sites
    pub fn sum(&self) -> f64 {
        self.triceps + self.biceps + self.subscapular + self.suprailiac
    }
}

/// Anthropometric measurements
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(default)]
pub struct AnthropometryRecord {
    pub height: f64,                       // cm
    pub weight: f64,                       // kg
    pub body_fat_percentage: Option<f64>,  // %
    pub muscle_mass: Option<f64>,          // kg
    pub waist_circumference: Option<f64>,  // cm
    pub hip_circumference: Option<f64>,    // cm
    pub arm_circumference: Option<f64>,    // cm
    pub skinfolds: Option<Skinfolds>,
}

impl AnthropometryRecord {
    /// Whether height and weight are usable for BMI
    pub fn has_bmi_inputs(&self) -> bool {
        self.height > 0.0 && self.weight > 0.0
    }
}
