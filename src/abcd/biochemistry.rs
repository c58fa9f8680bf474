//! Biochemistry calculator
//!
//! Iron status, lipid profile, cardiovascular risk and micronutrient screening.

use serde::{Deserialize, Serialize};

use super::push_unique;
use crate::models::{BiochemistryRecord, Gender, LipidPanel, RiskAssessment, Severity};

pub const IRON_SEVERE: &str = "Anemia ferropénica severa";
pub const IRON_MODERATE: &str = "Deficiencia de hierro moderada";
pub const IRON_MILD: &str = "Deficiencia de hierro leve";
pub const IRON_NORMAL: &str = "Estado normal de hierro";

pub const LIPIDS_NORMAL: &str = "Perfil lipídico normal";
pub const LIPIDS_ALTERED: &str = "Perfil lipídico alterado";

/// Ferritin (ng/mL) below which stores are considered depleted
pub const FERRITIN_THRESHOLD: f64 = 15.0;
const FERRITIN_SEVERE: f64 = 10.0;
const FERRITIN_MILD: f64 = 20.0;

/// Hemoglobin cutoffs (g/dL) as (low, very low)
fn hemoglobin_thresholds(gender: Gender) -> (f64, f64) {
    match gender {
        Gender::Male => (13.0, 11.0),
        Gender::Female => (12.0, 10.0),
    }
}

/// Grade iron status from hemoglobin (g/dL) and ferritin (ng/mL)
///
/// Severity is checked from worst to best; the first match wins. Age is part
/// of the call signature but the cutoffs are not age-adjusted.
pub fn evaluate_iron_status(
    hemoglobin: f64,
    ferritin: f64,
    _age: u32,
    gender: Gender,
) -> RiskAssessment {
    let (low, very_low) = hemoglobin_thresholds(gender);

    let severity = if hemoglobin < very_low || ferritin < FERRITIN_SEVERE {
        Severity::Severe
    } else if hemoglobin < low || ferritin < FERRITIN_THRESHOLD {
        Severity::Moderate
    } else if ferritin < FERRITIN_MILD {
        Severity::Mild
    } else {
        Severity::Normal
    };

    let (status, recommendations): (&str, &[&str]) = match severity {
        Severity::Severe => (
            IRON_SEVERE,
            &[
                "Referir a evaluación médica inmediata",
                "Suplementación de hierro bajo supervisión médica",
                "Reducir la carga de entrenamiento hasta normalizar valores",
            ],
        ),
        Severity::Moderate => (
            IRON_MODERATE,
            &[
                "Aumentar el consumo de carnes rojas, leguminosas y vegetales de hoja verde",
                "Acompañar los alimentos ricos en hierro con vitamina C",
                "Repetir biometría hemática en 8 semanas",
            ],
        ),
        Severity::Mild => (
            IRON_MILD,
            &[
                "Incluir una fuente de hierro en cada comida principal",
                "Evitar té o café junto con las comidas",
            ],
        ),
        Severity::Normal => (IRON_NORMAL, &["Mantener dieta balanceada"]),
    };

    let mut result = RiskAssessment::new(status)
        .with_severity(severity)
        .with_recommendations(recommendations.iter().copied());
    if hemoglobin < low {
        result.findings.push(format!("Hemoglobina baja ({:.1} g/dL)", hemoglobin));
    }
    if ferritin < FERRITIN_MILD {
        result.findings.push(format!("Ferritina baja ({:.0} ng/mL)", ferritin));
    }
    result
}

/// Screen a cholesterol panel; each out-of-range value adds one risk and one recommendation
pub fn evaluate_lipid_profile(panel: &LipidPanel) -> RiskAssessment {
    let checks: [(bool, &str, &str); 4] = [
        (
            panel.total_cholesterol > 200.0,
            "Colesterol total elevado",
            "Reducir grasas saturadas y alimentos fritos",
        ),
        (
            panel.ldl > 130.0,
            "LDL elevado",
            "Aumentar el consumo de fibra soluble (avena, leguminosas, frutas)",
        ),
        (
            panel.hdl < 40.0,
            "HDL bajo",
            "Incluir grasas saludables como aguacate, nueces y aceite de oliva",
        ),
        (
            panel.triglycerides > 150.0,
            "Triglicéridos elevados",
            "Limitar azúcares simples y bebidas azucaradas",
        ),
    ];

    let mut findings = Vec::new();
    let mut recommendations = Vec::new();
    for (triggered, risk, recommendation) in checks {
        if triggered {
            findings.push(risk.to_string());
            recommendations.push(recommendation.to_string());
        }
    }

    let status = if findings.is_empty() {
        LIPIDS_NORMAL
    } else {
        LIPIDS_ALTERED
    };
    let mut result = RiskAssessment::new(status).with_recommendations(recommendations);
    result.findings = findings;
    result
}

/// Additive point score behind [`calculate_cardiovascular_risk`]
pub fn cardiovascular_risk_points(
    age: u32,
    gender: Gender,
    total_cholesterol: f64,
    hdl: f64,
    systolic_bp: f64,
    smoking: bool,
) -> u32 {
    let mut points = match age {
        0..=19 => 0,
        20..=39 => 1,
        40..=54 => 2,
        _ => 3,
    };
    if gender == Gender::Male {
        points += 1;
    }
    if total_cholesterol > 240.0 {
        points += 2;
    } else if total_cholesterol > 200.0 {
        points += 1;
    }
    if hdl < 40.0 {
        points += 1;
    }
    if systolic_bp >= 160.0 {
        points += 3;
    } else if systolic_bp >= 140.0 {
        points += 2;
    } else if systolic_bp >= 130.0 {
        points += 1;
    }
    if smoking {
        points += 2;
    }
    points
}

/// Cardiovascular risk percentage: points doubled, capped at 20
pub fn calculate_cardiovascular_risk(
    age: u32,
    gender: Gender,
    total_cholesterol: f64,
    hdl: f64,
    systolic_bp: f64,
    smoking: bool,
) -> RiskAssessment {
    let points = cardiovascular_risk_points(age, gender, total_cholesterol, hdl, systolic_bp, smoking);
    let percentage = (points * 2).min(20);

    let (status, recommendations): (&str, &[&str]) = if percentage < 5 {
        ("Riesgo bajo", &["Mantener actividad física y dieta balanceada"])
    } else if percentage < 10 {
        (
            "Riesgo moderado",
            &[
                "Controlar perfil lipídico y presión arterial cada 6 meses",
                "Reducir el consumo de sodio y grasas saturadas",
            ],
        )
    } else {
        (
            "Riesgo alto",
            &[
                "Referir a valoración cardiológica",
                "Plan de alimentación supervisado",
            ],
        )
    };

    let mut result = RiskAssessment::new(status)
        .with_percentage(f64::from(percentage))
        .with_recommendations(recommendations.iter().copied());
    if smoking {
        result.findings.push("Tabaquismo".to_string());
    }
    result
}

/// Screen vitamins, folate and fasting glucose; absent values are skipped
pub fn evaluate_micronutrients(record: &BiochemistryRecord) -> RiskAssessment {
    let mut findings = Vec::new();
    let mut recommendations = Vec::new();

    if let Some(vitamin_d) = record.vitamin_d {
        if vitamin_d < 20.0 {
            findings.push("Deficiencia de vitamina D".to_string());
            recommendations.push("Valorar suplementación de vitamina D y exposición solar supervisada".to_string());
        } else if vitamin_d < 30.0 {
            findings.push("Insuficiencia de vitamina D".to_string());
            recommendations.push("Incluir pescados grasos, huevo y lácteos fortificados".to_string());
        }
    }
    if let Some(b12) = record.vitamin_b12 {
        if b12 < 200.0 {
            findings.push("Deficiencia de vitamina B12".to_string());
            recommendations.push("Aumentar fuentes de B12: carnes, huevo y lácteos".to_string());
        }
    }
    if let Some(folate) = record.folate {
        if folate < 3.0 {
            findings.push("Deficiencia de folato".to_string());
            recommendations.push("Aumentar vegetales de hoja verde y leguminosas".to_string());
        }
    }
    if let Some(glucose) = record.glucose {
        if glucose >= 100.0 {
            findings.push("Glucosa en ayunas elevada".to_string());
            recommendations.push("Reducir azúcares simples y repetir glucosa en ayunas".to_string());
        } else if glucose < 70.0 {
            findings.push("Hipoglucemia".to_string());
            recommendations.push("Asegurar una colación con carbohidratos antes de entrenar".to_string());
        }
    }

    let status = if findings.is_empty() {
        "Micronutrientes adecuados"
    } else {
        "Alteraciones en micronutrientes"
    };
    let mut result = RiskAssessment::new(status).with_recommendations(recommendations);
    result.findings = findings;
    result
}

/// Evaluations derivable from one biochemistry record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiochemistryAssessment {
    pub iron: Option<RiskAssessment>,
    pub lipids: Option<RiskAssessment>,
    pub micronutrients: RiskAssessment,
    pub recommendations: Vec<String>,
}

/// Run every evaluation the record has inputs for
pub fn assess(record: &BiochemistryRecord, age: u32, gender: Gender) -> BiochemistryAssessment {
    let iron = record
        .iron_inputs()
        .map(|(hb, ferritin)| evaluate_iron_status(hb, ferritin, age, gender));
    let lipids = record.lipid_panel.as_ref().map(evaluate_lipid_profile);
    let micronutrients = evaluate_micronutrients(record);

    let mut recommendations = Vec::new();
    for rec in iron
        .iter()
        .chain(lipids.iter())
        .chain(std::iter::once(&micronutrients))
        .flat_map(|r| r.recommendations.iter())
    {
        push_unique(&mut recommendations, rec);
    }

    BiochemistryAssessment {
        iron,
        lipids,
        micronutrients,
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iron_normal() {
        let result = evaluate_iron_status(13.5, 45.0, 12, Gender::Male);
        assert_eq!(result.status, IRON_NORMAL);
        assert_eq!(result.severity, Some(Severity::Normal));
        assert_eq!(result.recommendations, vec!["Mantener dieta balanceada"]);
        assert!(result.findings.is_empty());
    }

    #[test]
    fn test_iron_severe_by_hemoglobin() {
        let result = evaluate_iron_status(9.0, 5.0, 15, Gender::Male);
        assert_eq!(result.status, IRON_SEVERE);
        assert_eq!(result.severity, Some(Severity::Severe));
        assert_eq!(result.recommendations.len(), 3);
    }

    #[test]
    fn test_iron_severity_precedence() {
        // Ferritin below 10 is severe even with normal hemoglobin
        assert_eq!(evaluate_iron_status(14.0, 8.0, 14, Gender::Male).severity, Some(Severity::Severe));
        // Hemoglobin between very low and low is moderate
        assert_eq!(evaluate_iron_status(12.5, 40.0, 14, Gender::Male).severity, Some(Severity::Moderate));
        // Ferritin 10-15 is moderate
        assert_eq!(evaluate_iron_status(14.0, 12.0, 14, Gender::Male).severity, Some(Severity::Moderate));
        // Ferritin 15-20 is mild
        assert_eq!(evaluate_iron_status(14.0, 18.0, 14, Gender::Male).severity, Some(Severity::Mild));
    }

    #[test]
    fn test_iron_thresholds_depend_on_gender() {
        assert_eq!(evaluate_iron_status(12.5, 40.0, 14, Gender::Female).status, IRON_NORMAL);
        assert_eq!(evaluate_iron_status(12.5, 40.0, 14, Gender::Male).status, IRON_MODERATE);
        assert_eq!(evaluate_iron_status(10.5, 40.0, 14, Gender::Female).status, IRON_MODERATE);
        assert_eq!(evaluate_iron_status(10.5, 40.0, 14, Gender::Male).status, IRON_SEVERE);
    }

    #[test]
    fn test_lipid_profile_normal() {
        let panel = LipidPanel { total_cholesterol: 165.0, hdl: 55.0, ldl: 95.0, triglycerides: 75.0 };
        let result = evaluate_lipid_profile(&panel);
        assert_eq!(result.status, LIPIDS_NORMAL);
        assert!(result.findings.is_empty());
        assert!(result.recommendations.is_empty());
    }

    #[test]
    fn test_lipid_profile_checks_are_independent() {
        let panel = LipidPanel { total_cholesterol: 210.0, hdl: 35.0, ldl: 120.0, triglycerides: 160.0 };
        let result = evaluate_lipid_profile(&panel);
        assert_eq!(result.status, LIPIDS_ALTERED);
        assert_eq!(
            result.findings,
            vec!["Colesterol total elevado", "HDL bajo", "Triglicéridos elevados"]
        );
        assert_eq!(result.recommendations.len(), 3);
    }

    #[test]
    fn test_cardiovascular_points() {
        assert_eq!(cardiovascular_risk_points(15, Gender::Female, 160.0, 55.0, 110.0, false), 0);
        assert_eq!(cardiovascular_risk_points(15, Gender::Male, 160.0, 55.0, 110.0, false), 1);
        // 3 (age) + 1 (male) + 2 (chol) + 1 (hdl) + 3 (bp) + 2 (smoking)
        assert_eq!(cardiovascular_risk_points(60, Gender::Male, 250.0, 35.0, 165.0, true), 12);
    }

    #[test]
    fn test_cardiovascular_risk_is_capped() {
        let low = calculate_cardiovascular_risk(15, Gender::Male, 160.0, 55.0, 110.0, false);
        assert_eq!(low.percentage, Some(2.0));
        assert_eq!(low.status, "Riesgo bajo");

        let high = calculate_cardiovascular_risk(60, Gender::Male, 250.0, 35.0, 165.0, true);
        assert_eq!(high.percentage, Some(20.0));
        assert_eq!(high.status, "Riesgo alto");
    }

    #[test]
    fn test_micronutrients_skip_absent_values() {
        let record = BiochemistryRecord::default();
        let result = evaluate_micronutrients(&record);
        assert!(result.is_clear());

        let record = BiochemistryRecord {
            vitamin_d: Some(25.0),
            glucose: Some(65.0),
            ..Default::default()
        };
        let result = evaluate_micronutrients(&record);
        assert_eq!(result.findings, vec!["Insuficiencia de vitamina D", "Hipoglucemia"]);
    }

    #[test]
    fn test_assess_merges_recommendations() {
        let record = BiochemistryRecord {
            hemoglobin: Some(13.5),
            ferritin: Some(45.0),
            lipid_panel: Some(LipidPanel { total_cholesterol: 165.0, hdl: 55.0, ldl: 95.0, triglycerides: 75.0 }),
            ..Default::default()
        };
        let result = assess(&record, 12, Gender::Male);
        assert_eq!(result.iron.as_ref().map(|r| r.status.as_str()), Some(IRON_NORMAL));
        assert_eq!(result.lipids.as_ref().map(|r| r.status.as_str()), Some(LIPIDS_NORMAL));
        assert_eq!(result.recommendations, vec!["Mantener dieta balanceada"]);
    }
}
