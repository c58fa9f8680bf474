//! Biochemistry record
//!
//! Laboratory results. Every value is optional since panels are ordered
//! independently.

use rmcp::schemars;
use serde::{Deserialize, Serialize};

/// Cholesterol panel, mg/dL
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(default)]
pub struct LipidPanel {
    pub total_cholesterol: f64,
    pub hdl: f64,
    pub ldl: f64,
    pub triglycerides: f64,
}

/// Serum proteins, g/dL (prealbumin in mg/dL)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(default)]
pub struct ProteinPanel {
    pub total_protein: Option<f64>,
    pub albumin: Option<f64>,
    pub prealbumin: Option<f64>,
}

/// Serum electrolytes, mEq/L (magnesium and calcium in mg/dL)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(default)]
pub struct ElectrolytePanel {
    pub sodium: Option<f64>,
    pub potassium: Option<f64>,
    pub chloride: Option<f64>,
    pub magnesium: Option<f64>,
    pub calcium: Option<f64>,
}

/// Laboratory measurements
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(default)]
pub struct BiochemistryRecord {
    pub hemoglobin: Option<f64>,  // g/dL
    pub hematocrit: Option<f64>,  // %
    pub iron: Option<f64>,        // µg/dL
    pub ferritin: Option<f64>,    // ng/mL
    pub vitamin_d: Option<f64>,   // ng/mL
    pub vitamin_b12: Option<f64>, // pg/mL
    pub folate: Option<f64>,      // ng/mL
    pub glucose: Option<f64>,     // mg/dL, fasting
    pub lipid_panel: Option<LipidPanel>,
    pub protein_panel: Option<ProteinPanel>,
    pub electrolytes: Option<ElectrolytePanel>,
    pub test_date: Option<String>, // ISO date: "2025-03-14"
}

impl BiochemistryRecord {
    /// Hemoglobin and ferritin, when both were measured
    pub fn iron_inputs(&self) -> Option<(f64, f64)> {
        match (self.hemoglobin, self.ferritin) {
            (Some(hb), Some(ferritin)) => Some((hb, ferritin)),
            _ => None,
        }
    }
}
