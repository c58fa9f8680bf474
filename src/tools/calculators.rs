//! Calculator MCP Tools
//!
//! Single-calculator entry points for live feedback while a form is being
//! filled in. Inputs are validated here; the calculators themselves accept
//! any value.

use chrono::NaiveTime;
use serde::Serialize;

use crate::abcd::validation::{self as check, ValidationError};
use crate::abcd::{anthropometry, biochemistry, clinical, dietetics};
use crate::abcd::{GrowthMetric, PediatricBmiMode};
use crate::models::{
    AnthropometryRecord, Classification, FoodGroupServings, Gender, LipidPanel, MucousMembranes,
    RiskAssessment, SkinTurgor, Sport,
};

fn invalid(e: ValidationError) -> String {
    tracing::warn!(error = %e, "calculator input rejected");
    format!("Invalid input: {}", e)
}

fn parse_gender(gender: &str) -> Result<Gender, String> {
    Gender::from_str(gender)
        .ok_or_else(|| format!("Invalid gender '{}', expected 'male' or 'female'", gender))
}

// ============================================================================
// Anthropometry
// ============================================================================

/// Response for calculate_bmi
#[derive(Debug, Serialize)]
pub struct BmiResponse {
    pub bmi: f64,
    pub classification: Classification,
    pub percentile: Option<u8>,
}

pub fn calculate_bmi(
    weight_kg: f64,
    height_cm: f64,
    age: u32,
    gender: &str,
    use_percentile: bool,
) -> Result<BmiResponse, String> {
    check::weight_kg(weight_kg).map_err(invalid)?;
    check::height_cm(height_cm).map_err(invalid)?;
    check::age_years(age).map_err(invalid)?;
    let gender = parse_gender(gender)?;

    let mode = if use_percentile {
        PediatricBmiMode::Percentile
    } else {
        PediatricBmiMode::RawValue
    };
    let bmi = anthropometry::bmi(weight_kg, height_cm);

    Ok(BmiResponse {
        bmi: (bmi * 10.0).round() / 10.0,
        classification: anthropometry::classify_bmi_with(bmi, age, gender, mode),
        percentile: (age < anthropometry::ADULT_AGE)
            .then(|| anthropometry::growth_percentile(bmi, age, gender, GrowthMetric::Bmi)),
    })
}

/// Response for calculate_growth_percentile
#[derive(Debug, Serialize)]
pub struct GrowthPercentileResponse {
    pub metric: GrowthMetric,
    pub value: f64,
    pub percentile: u8,
}

pub fn calculate_growth_percentile(
    value: f64,
    age: u32,
    gender: &str,
    metric: &str,
) -> Result<GrowthPercentileResponse, String> {
    check::positive("value", value).map_err(invalid)?;
    check::age_years(age).map_err(invalid)?;
    let gender = parse_gender(gender)?;
    let metric = GrowthMetric::from_str(metric).ok_or_else(|| {
        format!("Invalid metric '{}', expected 'height', 'weight' or 'bmi'", metric)
    })?;

    Ok(GrowthPercentileResponse {
        metric,
        value,
        percentile: anthropometry::growth_percentile(value, age, gender, metric),
    })
}

/// Full body-composition breakdown for one anthropometry record
pub fn assess_body_composition(
    record: &AnthropometryRecord,
    age: u32,
    gender: &str,
) -> Result<anthropometry::AnthropometryAssessment, String> {
    check::height_cm(record.height).map_err(invalid)?;
    check::weight_kg(record.weight).map_err(invalid)?;
    check::validate_anthropometry(record).map_err(invalid)?;
    check::age_years(age).map_err(invalid)?;
    let gender = parse_gender(gender)?;

    Ok(anthropometry::assess(record, age, gender))
}

// ============================================================================
// Biochemistry
// ============================================================================

pub fn evaluate_iron_status(
    hemoglobin: f64,
    ferritin: f64,
    age: u32,
    gender: &str,
) -> Result<RiskAssessment, String> {
    check::positive("hemoglobin", hemoglobin).map_err(invalid)?;
    check::non_negative("ferritin", ferritin).map_err(invalid)?;
    let gender = parse_gender(gender)?;

    Ok(biochemistry::evaluate_iron_status(hemoglobin, ferritin, age, gender))
}

pub fn evaluate_lipid_profile(panel: &LipidPanel) -> Result<RiskAssessment, String> {
    check::validate_lipid_panel(panel).map_err(invalid)?;

    Ok(biochemistry::evaluate_lipid_profile(panel))
}

pub fn calculate_cardiovascular_risk(
    age: u32,
    gender: &str,
    total_cholesterol: f64,
    hdl: f64,
    systolic_bp: f64,
    smoking: bool,
) -> Result<RiskAssessment, String> {
    check::age_years(age).map_err(invalid)?;
    check::positive("total_cholesterol", total_cholesterol).map_err(invalid)?;
    check::positive("hdl", hdl).map_err(invalid)?;
    check::in_range("systolic_bp", systolic_bp, 50.0, 250.0).map_err(invalid)?;
    let gender = parse_gender(gender)?;

    Ok(biochemistry::calculate_cardiovascular_risk(
        age,
        gender,
        total_cholesterol,
        hdl,
        systolic_bp,
        smoking,
    ))
}

// ============================================================================
// Clinical
// ============================================================================

/// Response for performance_adjusted_bmi
#[derive(Debug, Serialize)]
pub struct AdjustedBmiResponse {
    pub bmi: f64,
    pub sport: String,
    pub adjusted_bmi: f64,
}

pub fn performance_adjusted_bmi(
    bmi: f64,
    muscle_mass_kg: Option<f64>,
    sport: &str,
) -> Result<AdjustedBmiResponse, String> {
    check::in_range("bmi", bmi, 5.0, 80.0).map_err(invalid)?;
    let muscle_mass_kg = match muscle_mass_kg {
        Some(m) => check::positive("muscle_mass", m).map_err(invalid)?,
        None => 0.0,
    };
    let sport = Sport::from_str(sport);

    Ok(AdjustedBmiResponse {
        bmi,
        sport: sport.as_str().to_string(),
        adjusted_bmi: clinical::performance_adjusted_bmi(bmi, muscle_mass_kg, sport),
    })
}

pub fn evaluate_hydration_status(
    urine_specific_gravity: f64,
    skin_turgor: SkinTurgor,
    mucous_membranes: MucousMembranes,
) -> Result<RiskAssessment, String> {
    check::urine_specific_gravity(urine_specific_gravity).map_err(invalid)?;

    Ok(clinical::evaluate_hydration_status(
        urine_specific_gravity,
        skin_turgor,
        mucous_membranes,
    ))
}

pub fn calculate_target_heart_rate(
    age: u32,
    resting_hr: f64,
    intensity: f64,
) -> Result<clinical::TargetHeartRate, String> {
    check::age_years(age).map_err(invalid)?;
    check::heart_rate("resting_hr", resting_hr).map_err(invalid)?;
    check::intensity(intensity).map_err(invalid)?;

    Ok(clinical::calculate_target_heart_rate(age, resting_hr, intensity))
}

pub fn evaluate_recovery(
    resting_hr: f64,
    current_hr: f64,
    minutes_post_exercise: f64,
) -> Result<clinical::RecoveryEvaluation, String> {
    check::heart_rate("resting_hr", resting_hr).map_err(invalid)?;
    check::heart_rate("current_hr", current_hr).map_err(invalid)?;
    check::non_negative("minutes_post_exercise", minutes_post_exercise).map_err(invalid)?;

    Ok(clinical::evaluate_recovery(resting_hr, current_hr, minutes_post_exercise))
}

// ============================================================================
// Dietetics
// ============================================================================

pub fn calculate_caloric_needs(
    weight_kg: f64,
    height_cm: f64,
    age: u32,
    gender: &str,
    activity_level: f64,
    sport: &str,
) -> Result<dietetics::CaloricNeeds, String> {
    check::weight_kg(weight_kg).map_err(invalid)?;
    check::height_cm(height_cm).map_err(invalid)?;
    check::age_years(age).map_err(invalid)?;
    check::activity_level(activity_level).map_err(invalid)?;
    let gender = parse_gender(gender)?;

    Ok(dietetics::caloric_needs(
        weight_kg,
        height_cm,
        age,
        gender,
        activity_level,
        Sport::from_str(sport),
    ))
}

pub fn calculate_hydration_needs(
    weight_kg: f64,
    exercise_minutes: f64,
    sweat_rate_l_per_hour: f64,
    temperature_c: f64,
) -> Result<dietetics::HydrationNeeds, String> {
    check::weight_kg(weight_kg).map_err(invalid)?;
    check::non_negative("exercise_minutes", exercise_minutes).map_err(invalid)?;
    check::in_range("sweat_rate", sweat_rate_l_per_hour, 0.0, 5.0).map_err(invalid)?;
    check::in_range("temperature", temperature_c, -30.0, 55.0).map_err(invalid)?;

    Ok(dietetics::hydration_needs(
        weight_kg,
        exercise_minutes,
        sweat_rate_l_per_hour,
        temperature_c,
    ))
}

pub fn evaluate_diet_quality(
    servings: &FoodGroupServings,
) -> Result<dietetics::DietQuality, String> {
    check::validate_servings(servings).map_err(invalid)?;

    Ok(dietetics::evaluate_diet_quality(servings))
}

/// Meal timing around a session; `start` is a 24h "HH:MM" time
pub fn plan_nutrient_timing(
    start: &str,
    duration_minutes: u32,
) -> Result<dietetics::NutrientTiming, String> {
    let start = NaiveTime::parse_from_str(start.trim(), "%H:%M")
        .map_err(|_| format!("Invalid start time '{}', expected HH:MM", start))?;
    if duration_minutes == 0 || duration_minutes > 600 {
        return Err(format!(
            "Invalid input: duration_minutes must be between 1 and 600 (got {})",
            duration_minutes
        ));
    }

    Ok(dietetics::nutrient_timing(start, duration_minutes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_bmi() {
        let response = calculate_bmi(45.0, 150.0, 12, "male", false).unwrap();
        assert_eq!(response.bmi, 20.0);
        assert_eq!(response.classification.label, "Normal");
        assert!(response.percentile.is_some());

        let adult = calculate_bmi(70.0, 175.0, 25, "female", false).unwrap();
        assert!(adult.percentile.is_none());
    }

    #[test]
    fn test_zero_height_is_rejected() {
        let err = calculate_bmi(45.0, 0.0, 12, "male", false).unwrap_err();
        assert!(err.contains("height"));
        assert!(calculate_bmi(45.0, 150.0, 12, "x", false).is_err());
    }

    #[test]
    fn test_iron_and_lipids() {
        let iron = evaluate_iron_status(13.5, 45.0, 12, "male").unwrap();
        assert_eq!(iron.status, "Estado normal de hierro");

        let panel = LipidPanel {
            total_cholesterol: 165.0,
            hdl: 55.0,
            ldl: 95.0,
            triglycerides: 75.0,
        };
        assert_eq!(evaluate_lipid_profile(&panel).unwrap().status, "Perfil lipídico normal");
        assert!(evaluate_iron_status(-1.0, 45.0, 12, "male").is_err());
    }

    #[test]
    fn test_heart_rate_tools() {
        let target = calculate_target_heart_rate(15, 60.0, 0.7).unwrap();
        // 60 + (205 - 60) * 0.7 = 161.5
        assert_eq!(target.target, 162.0);
        assert!(calculate_target_heart_rate(15, 60.0, 1.5).is_err());

        assert!(evaluate_recovery(0.0, 120.0, 2.0).is_err());
    }

    #[test]
    fn test_dietetics_tools() {
        let needs = calculate_caloric_needs(45.0, 150.0, 12, "male", 1.5, "futbol").unwrap();
        assert_eq!(needs.total_calories, 3599.0);
        assert!(calculate_caloric_needs(45.0, 150.0, 12, "male", 5.0, "futbol").is_err());

        let timing = plan_nutrient_timing("17:30", 90).unwrap();
        assert_eq!(timing.pre_exercise.time, NaiveTime::from_hms_opt(15, 0, 0).unwrap());
        assert!(plan_nutrient_timing("5pm", 90).is_err());
        assert!(plan_nutrient_timing("17:30", 0).is_err());
    }

    #[test]
    fn test_growth_percentile_metric_parsing() {
        let response = calculate_growth_percentile(150.0, 12, "male", "talla").unwrap();
        assert_eq!(response.percentile, 50);
        assert!(calculate_growth_percentile(150.0, 12, "male", "shoe").is_err());
    }
}
