//! Assessment outputs
//!
//! Derived, output-only shapes produced by the ABCD calculators.

use rmcp::schemars;
use serde::{Deserialize, Serialize};

use super::{AnthropometryRecord, BiochemistryRecord, ClinicalRecord, DieteticsRecord};

/// A label together with the value it was derived from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Classification {
    pub label: String,
    pub value: f64,
}

impl Classification {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Graded severity of a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Normal,
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Normal => "normal",
            Severity::Mild => "mild",
            Severity::Moderate => "moderate",
            Severity::Severe => "severe",
        }
    }
}

/// Status text with the recommendations that go with it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct RiskAssessment {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    /// Numeric level or risk percentage, always within [0, 100]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
    pub findings: Vec<String>,
    pub recommendations: Vec<String>,
}

impl RiskAssessment {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            severity: None,
            percentage: None,
            findings: Vec::new(),
            recommendations: Vec::new(),
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn with_percentage(mut self, percentage: f64) -> Self {
        self.percentage = Some(percentage.clamp(0.0, 100.0));
        self
    }

    pub fn with_recommendations<I, S>(mut self, recommendations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.recommendations
            .extend(recommendations.into_iter().map(Into::into));
        self
    }

    /// True when nothing was flagged
    pub fn is_clear(&self) -> bool {
        self.findings.is_empty()
    }
}

/// Four-level overall nutritional status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum NutritionalStatus {
    Optimal,
    Adequate,
    AtRisk,
    Deficient,
}

impl NutritionalStatus {
    /// Status for a 0-100 score: >=85 optimal, >=70 adequate, >=50 at-risk
    pub fn from_score(score: u8) -> Self {
        match score {
            85..=u8::MAX => NutritionalStatus::Optimal,
            70..=84 => NutritionalStatus::Adequate,
            50..=69 => NutritionalStatus::AtRisk,
            _ => NutritionalStatus::Deficient,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NutritionalStatus::Optimal => "optimal",
            NutritionalStatus::Adequate => "adequate",
            NutritionalStatus::AtRisk => "at-risk",
            NutritionalStatus::Deficient => "deficient",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "optimal" => Some(NutritionalStatus::Optimal),
            "adequate" => Some(NutritionalStatus::Adequate),
            "at-risk" => Some(NutritionalStatus::AtRisk),
            "deficient" => Some(NutritionalStatus::Deficient),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            NutritionalStatus::Optimal => "Óptimo",
            NutritionalStatus::Adequate => "Adecuado",
            NutritionalStatus::AtRisk => "En riesgo",
            NutritionalStatus::Deficient => "Deficiente",
        }
    }
}

/// Composite ABCD result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct OverallAssessment {
    pub score: u8,
    pub status: NutritionalStatus,
    pub risk_factors: Vec<String>,
    pub strengths: Vec<String>,
    pub recommendations: Vec<String>,
}

/// The four records of one evaluation, supplied together
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(default)]
pub struct AbcdRecords {
    pub anthropometry: AnthropometryRecord,
    pub biochemistry: BiochemistryRecord,
    pub clinical: ClinicalRecord,
    pub dietetics: DieteticsRecord,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_breakpoints() {
        assert_eq!(NutritionalStatus::from_score(100), NutritionalStatus::Optimal);
        assert_eq!(NutritionalStatus::from_score(85), NutritionalStatus::Optimal);
        assert_eq!(NutritionalStatus::from_score(84), NutritionalStatus::Adequate);
        assert_eq!(NutritionalStatus::from_score(70), NutritionalStatus::Adequate);
        assert_eq!(NutritionalStatus::from_score(69), NutritionalStatus::AtRisk);
        assert_eq!(NutritionalStatus::from_score(50), NutritionalStatus::AtRisk);
        assert_eq!(NutritionalStatus::from_score(49), NutritionalStatus::Deficient);
        assert_eq!(NutritionalStatus::from_score(0), NutritionalStatus::Deficient);
    }

    #[test]
    fn test_status_serializes_kebab_case() {
        let json = serde_json::to_string(&NutritionalStatus::AtRisk).unwrap();
        assert_eq!(json, r#""at-risk""#);
        assert_eq!(NutritionalStatus::from_str("at_risk"), Some(NutritionalStatus::AtRisk));
    }

    #[test]
    fn test_percentage_is_clamped() {
        let risk = RiskAssessment::new("x").with_percentage(140.0);
        assert_eq!(risk.percentage, Some(100.0));
        let risk = RiskAssessment::new("x").with_percentage(-3.0);
        assert_eq!(risk.percentage, Some(0.0));
    }

    #[test]
    fn test_records_deserialize_with_missing_fields() {
        let records: AbcdRecords =
            serde_json::from_str(r#"{"anthropometry": {"height": 150, "weight": 45}}"#).unwrap();
        assert_eq!(records.anthropometry.height, 150.0);
        assert!(records.biochemistry.hemoglobin.is_none());
        assert_eq!(records.dietetics.intake.calories, 0.0);
    }
}
