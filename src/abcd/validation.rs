//! Input validation
//!
//! The calculators accept any `f64` and let degenerate input propagate as
//! `inf`/`NaN`. These checks run at the tool boundary before a calculator is
//! called, so stored evaluations and returned figures stay finite.

use thiserror::Error;

use crate::models::{
    AbcdRecords, AnthropometryRecord, BiochemistryRecord, DailyIntake, FoodGroupServings,
    LipidPanel, PerformanceMetrics, VitalSigns,
};

/// Rejected measurement
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("{field} must be greater than zero (got {value})")]
    NonPositive { field: &'static str, value: f64 },

    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

pub type ValidationResult<T> = Result<T, ValidationError>;

pub fn finite(field: &'static str, value: f64) -> ValidationResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::NotFinite { field })
    }
}

pub fn positive(field: &'static str, value: f64) -> ValidationResult<f64> {
    let value = finite(field, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(ValidationError::NonPositive { field, value })
    }
}

/// Inclusive range check
pub fn in_range(field: &'static str, value: f64, min: f64, max: f64) -> ValidationResult<f64> {
    let value = finite(field, value)?;
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

pub fn non_negative(field: &'static str, value: f64) -> ValidationResult<f64> {
    in_range(field, value, 0.0, f64::MAX)
}

fn optional_positive(field: &'static str, value: Option<f64>) -> ValidationResult<()> {
    value.map_or(Ok(()), |v| positive(field, v).map(|_| ()))
}

// Plausibility bounds for a youth athlete

pub fn height_cm(value: f64) -> ValidationResult<f64> {
    positive("height", value).and_then(|v| in_range("height", v, 50.0, 250.0))
}

pub fn weight_kg(value: f64) -> ValidationResult<f64> {
    positive("weight", value).and_then(|v| in_range("weight", v, 10.0, 250.0))
}

pub fn age_years(value: u32) -> ValidationResult<u32> {
    in_range("age", f64::from(value), 3.0, 100.0).map(|_| value)
}

pub fn heart_rate(field: &'static str, value: f64) -> ValidationResult<f64> {
    in_range(field, value, 20.0, 250.0)
}

pub fn intensity(value: f64) -> ValidationResult<f64> {
    in_range("intensity", value, 0.0, 1.0)
}

pub fn activity_level(value: f64) -> ValidationResult<f64> {
    in_range("activity_level", value, 1.0, 2.5)
}

pub fn percentage(field: &'static str, value: f64) -> ValidationResult<f64> {
    in_range(field, value, 0.0, 100.0)
}

pub fn urine_specific_gravity(value: f64) -> ValidationResult<f64> {
    in_range("urine_specific_gravity", value, 1.000, 1.040)
}

/// Height and weight may be left at zero (not measured); anything else must be plausible
pub fn validate_anthropometry(record: &AnthropometryRecord) -> ValidationResult<()> {
    if record.height != 0.0 {
        height_cm(record.height)?;
    }
    if record.weight != 0.0 {
        weight_kg(record.weight)?;
    }
    if let Some(bf) = record.body_fat_percentage {
        percentage("body_fat_percentage", bf)?;
    }
    optional_positive("muscle_mass", record.muscle_mass)?;
    optional_positive("waist_circumference", record.waist_circumference)?;
    optional_positive("hip_circumference", record.hip_circumference)?;
    optional_positive("arm_circumference", record.arm_circumference)?;
    if let Some(s) = record.skinfolds {
        non_negative("skinfolds.triceps", s.triceps)?;
        non_negative("skinfolds.biceps", s.biceps)?;
        non_negative("skinfolds.subscapular", s.subscapular)?;
        non_negative("skinfolds.suprailiac", s.suprailiac)?;
    }
    Ok(())
}

pub fn validate_vital_signs(vitals: &VitalSigns) -> ValidationResult<()> {
    if let Some(v) = vitals.systolic_bp {
        in_range("systolic_bp", v, 50.0, 250.0)?;
    }
    if let Some(v) = vitals.diastolic_bp {
        in_range("diastolic_bp", v, 30.0, 150.0)?;
    }
    if let Some(v) = vitals.heart_rate {
        heart_rate("heart_rate", v)?;
    }
    if let Some(v) = vitals.respiratory_rate {
        in_range("respiratory_rate", v, 5.0, 80.0)?;
    }
    if let Some(v) = vitals.temperature {
        in_range("temperature", v, 30.0, 45.0)?;
    }
    Ok(())
}

pub fn validate_performance(performance: &PerformanceMetrics) -> ValidationResult<()> {
    if let Some(v) = performance.resting_heart_rate {
        heart_rate("resting_heart_rate", v)?;
    }
    if let Some(v) = performance.post_exercise_heart_rate {
        heart_rate("post_exercise_heart_rate", v)?;
    }
    if let Some(v) = performance.minutes_post_exercise {
        non_negative("minutes_post_exercise", v)?;
    }
    optional_positive("vo2_max", performance.vo2_max)
}

/// Total cholesterol and HDL must be measured; LDL and triglycerides may be 0
pub fn validate_lipid_panel(panel: &LipidPanel) -> ValidationResult<()> {
    positive("total_cholesterol", panel.total_cholesterol)?;
    positive("hdl", panel.hdl)?;
    non_negative("ldl", panel.ldl)?;
    non_negative("triglycerides", panel.triglycerides)?;
    Ok(())
}

pub fn validate_biochemistry(record: &BiochemistryRecord) -> ValidationResult<()> {
    optional_positive("hemoglobin", record.hemoglobin)?;
    if let Some(ferritin) = record.ferritin {
        non_negative("ferritin", ferritin)?;
    }
    if let Some(hct) = record.hematocrit {
        percentage("hematocrit", hct)?;
    }
    optional_positive("iron", record.iron)?;
    optional_positive("vitamin_d", record.vitamin_d)?;
    optional_positive("vitamin_b12", record.vitamin_b12)?;
    optional_positive("folate", record.folate)?;
    optional_positive("glucose", record.glucose)?;
    if let Some(ref panel) = record.lipid_panel {
        validate_lipid_panel(panel)?;
    }
    if let Some(p) = record.protein_panel {
        optional_positive("total_protein", p.total_protein)?;
        optional_positive("albumin", p.albumin)?;
        optional_positive("prealbumin", p.prealbumin)?;
    }
    if let Some(e) = record.electrolytes {
        optional_positive("sodium", e.sodium)?;
        optional_positive("potassium", e.potassium)?;
        optional_positive("chloride", e.chloride)?;
        optional_positive("magnesium", e.magnesium)?;
        optional_positive("calcium", e.calcium)?;
    }
    Ok(())
}

pub fn validate_servings(servings: &FoodGroupServings) -> ValidationResult<()> {
    non_negative("fruits", servings.fruits)?;
    non_negative("vegetables", servings.vegetables)?;
    non_negative("whole_grains", servings.whole_grains)?;
    non_negative("protein", servings.protein)?;
    non_negative("dairy", servings.dairy)?;
    non_negative("processed", servings.processed)?;
    Ok(())
}

pub fn validate_intake(intake: &DailyIntake) -> ValidationResult<()> {
    non_negative("calories", intake.calories)?;
    non_negative("protein", intake.protein)?;
    non_negative("carbs", intake.carbs)?;
    non_negative("fats", intake.fats)?;
    non_negative("fiber", intake.fiber)?;
    non_negative("water", intake.water)?;
    Ok(())
}

/// Checks run before a full evaluation is scored and stored
pub fn validate_records(records: &AbcdRecords) -> ValidationResult<()> {
    validate_anthropometry(&records.anthropometry)?;
    validate_biochemistry(&records.biochemistry)?;

    let clinical = &records.clinical;
    validate_vital_signs(&clinical.vital_signs)?;
    if let Some(usg) = clinical.physical_exam.urine_specific_gravity {
        urine_specific_gravity(usg)?;
    }
    if let Some(ref performance) = clinical.performance {
        validate_performance(performance)?;
    }

    validate_intake(&records.dietetics.intake)?;
    if let Some(ref servings) = records.dietetics.food_groups {
        validate_servings(servings)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_checks() {
        assert_eq!(positive("weight", 45.0), Ok(45.0));
        assert_eq!(
            positive("height", 0.0),
            Err(ValidationError::NonPositive { field: "height", value: 0.0 })
        );
        assert_eq!(
            finite("bmi", f64::NAN),
            Err(ValidationError::NotFinite { field: "bmi" })
        );
        assert!(intensity(1.2).is_err());
        assert!(intensity(0.7).is_ok());
        assert!(age_years(2).is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = in_range("intensity", 1.5, 0.0, 1.0).unwrap_err();
        assert_eq!(err.to_string(), "intensity must be between 0 and 1 (got 1.5)");
        let err = positive("height", -3.0).unwrap_err();
        assert_eq!(err.to_string(), "height must be greater than zero (got -3)");
    }

    #[test]
    fn test_unmeasured_height_is_allowed() {
        let record = AnthropometryRecord::default();
        assert!(validate_anthropometry(&record).is_ok());

        let record = AnthropometryRecord { height: -150.0, weight: 45.0, ..Default::default() };
        assert!(validate_anthropometry(&record).is_err());
    }

    #[test]
    fn test_validate_records() {
        let mut records = AbcdRecords::default();
        assert!(validate_records(&records).is_ok());

        records.dietetics.intake.water = -1.0;
        assert!(matches!(
            validate_records(&records),
            Err(ValidationError::OutOfRange { field: "water", .. })
        ));

        records.dietetics.intake.water = 2.0;
        records.clinical.vital_signs.heart_rate = Some(f64::INFINITY);
        assert!(matches!(
            validate_records(&records),
            Err(ValidationError::NotFinite { field: "heart_rate" })
        ));
    }

    #[test]
    fn test_validate_records_rejects_performance_heart_rates() {
        let mut records = AbcdRecords::default();
        records.clinical.performance = Some(PerformanceMetrics {
            resting_heart_rate: Some(-60.0),
            post_exercise_heart_rate: Some(180.0),
            minutes_post_exercise: Some(1.0),
            vo2_max: None,
        });
        assert!(matches!(
            validate_records(&records),
            Err(ValidationError::OutOfRange { field: "resting_heart_rate", .. })
        ));

        records.clinical.performance = Some(PerformanceMetrics {
            resting_heart_rate: Some(60.0),
            post_exercise_heart_rate: Some(180.0),
            minutes_post_exercise: Some(-1.0),
            vo2_max: None,
        });
        assert!(matches!(
            validate_records(&records),
            Err(ValidationError::OutOfRange { field: "minutes_post_exercise", .. })
        ));
    }

    #[test]
    fn test_validate_records_rejects_urine_specific_gravity() {
        let mut records = AbcdRecords::default();
        records.clinical.physical_exam.urine_specific_gravity = Some(-5.0);
        assert!(matches!(
            validate_records(&records),
            Err(ValidationError::OutOfRange { field: "urine_specific_gravity", .. })
        ));

        records.clinical.physical_exam.urine_specific_gravity = Some(1.025);
        assert!(validate_records(&records).is_ok());
    }

    #[test]
    fn test_validate_records_rejects_negative_lipids() {
        let mut records = AbcdRecords::default();
        records.biochemistry.lipid_panel = Some(LipidPanel {
            total_cholesterol: -180.0,
            hdl: -50.0,
            ldl: -100.0,
            triglycerides: -90.0,
        });
        assert!(matches!(
            validate_records(&records),
            Err(ValidationError::NonPositive { field: "total_cholesterol", .. })
        ));

        records.biochemistry.lipid_panel = Some(LipidPanel {
            total_cholesterol: 180.0,
            hdl: 50.0,
            ldl: 100.0,
            triglycerides: -90.0,
        });
        assert!(matches!(
            validate_records(&records),
            Err(ValidationError::OutOfRange { field: "triglycerides", .. })
        ));
    }

    #[test]
    fn test_validate_records_rejects_micronutrients() {
        let mut records = AbcdRecords::default();
        records.biochemistry.vitamin_d = Some(-10.0);
        assert!(matches!(
            validate_records(&records),
            Err(ValidationError::NonPositive { field: "vitamin_d", .. })
        ));
    }

    #[test]
    fn test_validate_records_rejects_negative_servings() {
        let mut records = AbcdRecords::default();
        records.dietetics.food_groups = Some(FoodGroupServings {
            vegetables: -2.0,
            ..Default::default()
        });
        assert!(matches!(
            validate_records(&records),
            Err(ValidationError::OutOfRange { field: "vegetables", .. })
        ));
    }
}
