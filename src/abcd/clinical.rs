//! Clinical calculator
//!
//! Vital-sign interpretation, hydration and recovery scoring, training heart
//! rate zones and functional status.

use serde::{Deserialize, Serialize};

use super::push_unique;
use super::reference::{
    sport_bmi_factor, HIGH_MUSCLE_MASS_FACTOR, HIGH_MUSCLE_MASS_KG, USG_DEHYDRATION_THRESHOLD,
};
use crate::models::{
    Appetite, Classification, ClinicalRecord, EnergyLevel, FatigueLevel, FunctionalAssessment,
    MucousMembranes, RiskAssessment, Severity, SkinTurgor, SleepQuality, Sport, VitalSigns,
};

pub const RECOVERY_EXCELLENT: &str = "Excelente recuperación";
pub const RECOVERY_GOOD: &str = "Buena recuperación";
pub const RECOVERY_POOR: &str = "Recuperación deficiente";

/// BMI corrected for sport build and muscularity
pub fn performance_adjusted_bmi(bmi: f64, muscle_mass_kg: f64, sport: Sport) -> f64 {
    let mut adjusted = bmi * sport_bmi_factor(sport);
    if muscle_mass_kg > HIGH_MUSCLE_MASS_KG {
        adjusted *= HIGH_MUSCLE_MASS_FACTOR;
    }
    adjusted
}

/// Dehydration score (0-6) from urine concentration and two exam signs
///
/// The returned percentage is the hydration level, `100 - score * 20`
/// floored at 0.
pub fn evaluate_hydration_status(
    urine_specific_gravity: f64,
    skin_turgor: SkinTurgor,
    mucous_membranes: MucousMembranes,
) -> RiskAssessment {
    let mut score = 0u32;
    let mut findings = Vec::new();

    if urine_specific_gravity > USG_DEHYDRATION_THRESHOLD {
        score += 3;
        findings.push(format!("Orina concentrada (densidad {:.3})", urine_specific_gravity));
    }
    if skin_turgor == SkinTurgor::Reduced {
        score += 2;
        findings.push("Turgencia de piel disminuida".to_string());
    }
    if mucous_membranes == MucousMembranes::Dry {
        score += 1;
        findings.push("Mucosas secas".to_string());
    }

    let (status, severity, recommendations): (&str, Severity, &[&str]) = match score {
        0 => (
            "Hidratación adecuada",
            Severity::Normal,
            &["Mantener la ingesta de líquidos actual"],
        ),
        1..=2 => (
            "Deshidratación leve",
            Severity::Mild,
            &["Aumentar la ingesta de agua a lo largo del día", "Beber antes, durante y después del entrenamiento"],
        ),
        3..=4 => (
            "Deshidratación moderada",
            Severity::Moderate,
            &[
                "Rehidratar con agua y bebida con electrolitos",
                "Pesar antes y después de entrenar para estimar pérdidas",
            ],
        ),
        _ => (
            "Deshidratación severa",
            Severity::Severe,
            &["Suspender el entrenamiento y referir a evaluación médica"],
        ),
    };

    let level = (100.0 - f64::from(score) * 20.0).max(0.0);
    let mut result = RiskAssessment::new(status)
        .with_severity(severity)
        .with_percentage(level)
        .with_recommendations(recommendations.iter().copied());
    result.findings = findings;
    result
}

/// Training heart rate target and ±5% band, in whole bpm
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetHeartRate {
    pub target: f64,
    pub min: f64,
    pub max: f64,
}

/// Karvonen target heart rate for an intensity fraction (0-1) of heart rate reserve
pub fn calculate_target_heart_rate(age: u32, resting_hr: f64, intensity: f64) -> TargetHeartRate {
    let max_hr = 220.0 - f64::from(age);
    let target = resting_hr + (max_hr - resting_hr) * intensity;
    TargetHeartRate {
        target: target.round(),
        min: (target * 0.95).round(),
        max: (target * 1.05).round(),
    }
}

/// Heart-rate recovery after exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryEvaluation {
    pub expected: f64,
    pub actual: f64,
    pub status: String,
    pub recommendations: Vec<String>,
}

/// Compare how far the heart rate has come back against the expected curve
///
/// `expected` drops 2 points per minute; `actual` is the remaining elevation
/// over resting as a percentage, both kept within [0, 100].
pub fn evaluate_recovery(resting_hr: f64, current_hr: f64, minutes_post_exercise: f64) -> RecoveryEvaluation {
    let expected = (100.0 - 2.0 * minutes_post_exercise).max(0.0);
    let actual = (100.0 - (current_hr - resting_hr) / resting_hr * 100.0).max(0.0).min(100.0);
    // expected == 0 gives +inf (actual > 0) or NaN (actual == 0); NaN falls through to deficient
    let ratio = actual / expected;

    let (status, recommendations): (&str, &[&str]) = if ratio >= 0.9 {
        (RECOVERY_EXCELLENT, &["Mantener la carga de entrenamiento actual"])
    } else if ratio >= 0.7 {
        (
            RECOVERY_GOOD,
            &["Asegurar 8-10 horas de sueño", "Incluir carbohidratos y proteína después de entrenar"],
        )
    } else {
        (
            RECOVERY_POOR,
            &[
                "Reducir la intensidad de las próximas sesiones",
                "Revisar hidratación, sueño y aporte energético",
                "Valorar signos de sobreentrenamiento",
            ],
        )
    };

    RecoveryEvaluation {
        expected,
        actual,
        status: status.to_string(),
        recommendations: recommendations.iter().map(|r| r.to_string()).collect(),
    }
}

/// Classification of each vital sign present, plus alerts for the abnormal ones
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalSignsInterpretation {
    pub blood_pressure: Option<Classification>,
    pub heart_rate: Option<Classification>,
    pub temperature: Option<Classification>,
    pub respiratory_rate: Option<Classification>,
    pub alerts: Vec<String>,
}

pub fn classify_blood_pressure(systolic: f64, diastolic: f64) -> Classification {
    let label = if systolic < 120.0 && diastolic < 80.0 {
        "Normal"
    } else if systolic < 130.0 && diastolic < 80.0 {
        "Elevada"
    } else if systolic < 140.0 && diastolic < 90.0 {
        "Hipertensión estadio 1"
    } else {
        "Hipertensión estadio 2"
    };
    Classification::new(label, systolic)
}

pub fn interpret_vital_signs(vitals: &VitalSigns) -> VitalSignsInterpretation {
    let mut alerts = Vec::new();

    let blood_pressure = match (vitals.systolic_bp, vitals.diastolic_bp) {
        (Some(systolic), Some(diastolic)) => Some(classify_blood_pressure(systolic, diastolic)),
        _ => None,
    };

    let heart_rate = vitals.heart_rate.map(|hr| {
        let label = if hr < 60.0 {
            "Bradicardia"
        } else if hr <= 100.0 {
            "Normal"
        } else {
            "Taquicardia"
        };
        Classification::new(label, hr)
    });

    let temperature = vitals.temperature.map(|t| {
        let label = if t < 36.0 {
            "Hipotermia"
        } else if t <= 37.5 {
            "Normal"
        } else if t <= 38.0 {
            "Febrícula"
        } else {
            "Fiebre"
        };
        Classification::new(label, t)
    });

    let respiratory_rate = vitals.respiratory_rate.map(|rr| {
        let label = if rr < 12.0 {
            "Bradipnea"
        } else if rr <= 20.0 {
            "Normal"
        } else {
            "Taquipnea"
        };
        Classification::new(label, rr)
    });

    for (name, reading) in [
        ("Presión arterial", &blood_pressure),
        ("Frecuencia cardíaca", &heart_rate),
        ("Temperatura", &temperature),
        ("Frecuencia respiratoria", &respiratory_rate),
    ] {
        if let Some(c) = reading {
            if c.label != "Normal" {
                alerts.push(format!("{}: {}", name, c.label));
            }
        }
    }

    VitalSignsInterpretation {
        blood_pressure,
        heart_rate,
        temperature,
        respiratory_rate,
        alerts,
    }
}

/// Flag low energy, poor sleep, poor appetite and marked fatigue
///
/// Percentage is `100 - 25 * flags`.
pub fn evaluate_functional_status(functional: &FunctionalAssessment) -> RiskAssessment {
    let mut findings = Vec::new();
    let mut recommendations = Vec::new();

    if functional.energy_level == EnergyLevel::Low {
        findings.push("Energía baja".to_string());
        recommendations.push("Revisar el aporte energético total".to_string());
    }
    if functional.sleep_quality == SleepQuality::Poor {
        findings.push("Mala calidad de sueño".to_string());
        recommendations.push("Establecer horarios regulares de sueño".to_string());
    }
    if functional.appetite == Appetite::Poor {
        findings.push("Apetito disminuido".to_string());
        recommendations.push("Fraccionar la alimentación en comidas pequeñas y frecuentes".to_string());
    }
    if matches!(functional.fatigue, FatigueLevel::Moderate | FatigueLevel::Severe) {
        findings.push("Fatiga marcada".to_string());
        recommendations.push("Ajustar la carga de entrenamiento y evaluar recuperación".to_string());
    }

    let percentage = 100.0 - 25.0 * findings.len() as f64;
    let status = if findings.is_empty() {
        "Estado funcional adecuado"
    } else {
        "Alteraciones funcionales"
    };
    let mut result = RiskAssessment::new(status)
        .with_percentage(percentage)
        .with_recommendations(recommendations);
    result.findings = findings;
    result
}

/// Evaluations derivable from one clinical record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalAssessment {
    pub vital_signs: VitalSignsInterpretation,
    pub hydration: Option<RiskAssessment>,
    pub functional: RiskAssessment,
    pub recovery: Option<RecoveryEvaluation>,
    pub adjusted_bmi: Option<f64>,
    pub recommendations: Vec<String>,
}

/// Run every evaluation the record has inputs for
///
/// `bmi` and `muscle_mass_kg` come from the anthropometry record of the same
/// evaluation; the adjusted BMI is only produced when `bmi` is given.
pub fn assess(
    record: &ClinicalRecord,
    sport: Sport,
    bmi: Option<f64>,
    muscle_mass_kg: Option<f64>,
) -> ClinicalAssessment {
    let vital_signs = interpret_vital_signs(&record.vital_signs);

    let exam = &record.physical_exam;
    let hydration = exam.urine_specific_gravity.map(|usg| {
        evaluate_hydration_status(usg, exam.skin_turgor, exam.mucous_membranes)
    });

    let functional = evaluate_functional_status(&record.functional);

    let recovery = record.performance.and_then(|p| {
        match (p.resting_heart_rate, p.post_exercise_heart_rate, p.minutes_post_exercise) {
            (Some(resting), Some(current), Some(minutes)) => {
                Some(evaluate_recovery(resting, current, minutes))
            }
            _ => None,
        }
    });

    let adjusted_bmi =
        bmi.map(|b| performance_adjusted_bmi(b, muscle_mass_kg.unwrap_or(0.0), sport));

    let mut recommendations = Vec::new();
    if exam.edema {
        push_unique(&mut recommendations, "Evaluar causa del edema con el médico del equipo");
    }
    for rec in hydration
        .iter()
        .chain(std::iter::once(&functional))
        .flat_map(|r| r.recommendations.iter())
        .chain(recovery.iter().flat_map(|r| r.recommendations.iter()))
    {
        push_unique(&mut recommendations, rec);
    }

    ClinicalAssessment {
        vital_signs,
        hydration,
        functional,
        recovery,
        adjusted_bmi,
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_performance_adjusted_bmi() {
        assert!((performance_adjusted_bmi(22.0, 30.0, Sport::Other) - 22.0).abs() < 1e-9);
        assert!((performance_adjusted_bmi(22.0, 30.0, Sport::Futbol) - 20.9).abs() < 1e-9);
        assert!((performance_adjusted_bmi(22.0, 50.0, Sport::Other) - 24.2).abs() < 1e-9);
    }

    #[test]
    fn test_hydration_bands() {
        let ok = evaluate_hydration_status(1.010, SkinTurgor::Normal, MucousMembranes::Moist);
        assert_eq!(ok.status, "Hidratación adecuada");
        assert_eq!(ok.percentage, Some(100.0));

        let mild = evaluate_hydration_status(1.015, SkinTurgor::Reduced, MucousMembranes::Moist);
        assert_eq!(mild.severity, Some(Severity::Mild));
        assert_eq!(mild.percentage, Some(60.0));

        let moderate = evaluate_hydration_status(1.025, SkinTurgor::Normal, MucousMembranes::Dry);
        assert_eq!(moderate.status, "Deshidratación moderada");
        assert_eq!(moderate.percentage, Some(20.0));

        let severe = evaluate_hydration_status(1.030, SkinTurgor::Reduced, MucousMembranes::Dry);
        assert_eq!(severe.severity, Some(Severity::Severe));
        assert_eq!(severe.percentage, Some(0.0));
        assert_eq!(severe.findings.len(), 3);
    }

    #[test]
    fn test_karvonen() {
        // 15 years, resting 60, 70%: 60 + (205 - 60) * 0.7 = 161.5
        let thr = calculate_target_heart_rate(15, 60.0, 0.7);
        assert_eq!(thr.target, 162.0);
        assert_eq!(thr.min, 153.0);
        assert_eq!(thr.max, 170.0);
    }

    #[test]
    fn test_recovery_tiers() {
        // expected 80, actual 100 - 20/60*100 = 66.7, ratio 0.83
        assert_eq!(evaluate_recovery(60.0, 80.0, 10.0).status, RECOVERY_GOOD);
        // expected 80, actual 100 - 10/60*100 = 83.3, ratio 1.04
        assert_eq!(evaluate_recovery(60.0, 70.0, 10.0).status, RECOVERY_EXCELLENT);
        // expected 96, actual 100 - 60/60*100 = 0
        let poor = evaluate_recovery(60.0, 120.0, 2.0);
        assert_eq!(poor.status, RECOVERY_POOR);
        assert_eq!(poor.actual, 0.0);
    }

    #[test]
    fn test_recovery_after_expected_reaches_zero() {
        let late = evaluate_recovery(60.0, 70.0, 60.0);
        assert_eq!(late.expected, 0.0);
        assert_eq!(late.status, RECOVERY_EXCELLENT);

        let flat = evaluate_recovery(60.0, 120.0, 60.0);
        assert_eq!(flat.status, RECOVERY_POOR);
    }

    #[test]
    fn test_recovery_actual_capped_at_100() {
        // 100 - (55 - 60)/60*100 = 108.3 before the cap
        let below_resting = evaluate_recovery(60.0, 55.0, 10.0);
        assert_eq!(below_resting.actual, 100.0);
        assert_eq!(below_resting.status, RECOVERY_EXCELLENT);
    }

    #[test]
    fn test_vital_signs() {
        let vitals = VitalSigns {
            systolic_bp: Some(110.0),
            diastolic_bp: Some(70.0),
            heart_rate: Some(105.0),
            respiratory_rate: None,
            temperature: Some(36.6),
        };
        let result = interpret_vital_signs(&vitals);
        assert_eq!(result.blood_pressure.as_ref().map(|c| c.label.as_str()), Some("Normal"));
        assert_eq!(result.heart_rate.as_ref().map(|c| c.label.as_str()), Some("Taquicardia"));
        assert!(result.respiratory_rate.is_none());
        assert_eq!(result.alerts, vec!["Frecuencia cardíaca: Taquicardia"]);
    }

    #[test]
    fn test_blood_pressure_categories() {
        assert_eq!(classify_blood_pressure(125.0, 75.0).label, "Elevada");
        assert_eq!(classify_blood_pressure(135.0, 85.0).label, "Hipertensión estadio 1");
        assert_eq!(classify_blood_pressure(150.0, 95.0).label, "Hipertensión estadio 2");
    }

    #[test]
    fn test_functional_status() {
        let good = evaluate_functional_status(&FunctionalAssessment::default());
        assert!(good.is_clear());
        assert_eq!(good.percentage, Some(100.0));

        let tired = FunctionalAssessment {
            energy_level: EnergyLevel::Low,
            sleep_quality: SleepQuality::Poor,
            appetite: Appetite::Normal,
            fatigue: FatigueLevel::Severe,
        };
        let result = evaluate_functional_status(&tired);
        assert_eq!(result.findings.len(), 3);
        assert_eq!(result.percentage, Some(25.0));
    }

    #[test]
    fn test_assess_skips_missing_inputs() {
        let record = ClinicalRecord::default();
        let result = assess(&record, Sport::Futbol, None, None);
        assert!(result.hydration.is_none());
        assert!(result.recovery.is_none());
        assert!(result.adjusted_bmi.is_none());
        assert!(result.recommendations.is_empty());
    }
}
