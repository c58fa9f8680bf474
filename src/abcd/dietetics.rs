//! Dietetics calculator
//!
//! Energy and fluid requirements, diet-quality scoring and nutrient timing.

use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};

use super::reference::{
    sport_energy_factor, BASE_ML_PER_KG, CARB_SHARE, COLD_WEATHER_MULTIPLIER, FAT_SHARE,
    HOT_WEATHER_MULTIPLIER, KCAL_PER_G_CARB_PROTEIN, KCAL_PER_G_FAT, PROTEIN_SHARE,
};
use crate::models::{DailyIntake, DieteticsRecord, FoodGroupServings, Gender, Sport};

/// Daily energy requirement with its macronutrient split
///
/// All values are rounded half away from zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CaloricNeeds {
    pub bmr: f64,
    pub total_calories: f64,
    pub carbs_g: f64,
    pub protein_g: f64,
    pub fat_g: f64,
}

/// Mifflin-St Jeor basal metabolic rate, rounded to whole kcal
pub fn basal_metabolic_rate(weight_kg: f64, height_cm: f64, age: u32, gender: Gender) -> f64 {
    let gender_constant = match gender {
        Gender::Male => 5.0,
        Gender::Female => -161.0,
    };
    (10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age) + gender_constant).round()
}

/// Daily calories: BMR x sport factor x activity level, split 55/20/25
pub fn caloric_needs(
    weight_kg: f64,
    height_cm: f64,
    age: u32,
    gender: Gender,
    activity_level: f64,
    sport: Sport,
) -> CaloricNeeds {
    let bmr = basal_metabolic_rate(weight_kg, height_cm, age, gender);
    let total_calories = (bmr * sport_energy_factor(sport) * activity_level).round();

    CaloricNeeds {
        bmr,
        total_calories,
        carbs_g: (total_calories * CARB_SHARE / KCAL_PER_G_CARB_PROTEIN).round(),
        protein_g: (total_calories * PROTEIN_SHARE / KCAL_PER_G_CARB_PROTEIN).round(),
        fat_g: (total_calories * FAT_SHARE / KCAL_PER_G_FAT).round(),
    }
}

/// Daily fluid requirement in milliliters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HydrationNeeds {
    pub base_ml: f64,
    pub exercise_ml: f64,
    pub temperature_multiplier: f64,
    pub total_ml: f64,
}

/// Fluid needs from body weight, training sweat losses and ambient temperature
pub fn hydration_needs(
    weight_kg: f64,
    exercise_minutes: f64,
    sweat_rate_l_per_hour: f64,
    temperature_c: f64,
) -> HydrationNeeds {
    let base_ml = weight_kg * BASE_ML_PER_KG;
    let exercise_ml = exercise_minutes / 60.0 * sweat_rate_l_per_hour * 1000.0;
    let temperature_multiplier = if temperature_c > 25.0 {
        HOT_WEATHER_MULTIPLIER
    } else if temperature_c < 10.0 {
        COLD_WEATHER_MULTIPLIER
    } else {
        1.0
    };

    HydrationNeeds {
        base_ml,
        exercise_ml,
        temperature_multiplier,
        total_ml: ((base_ml + exercise_ml) * temperature_multiplier).round(),
    }
}

// ============================================================================
// Diet Quality
// ============================================================================

/// Diet-quality score out of 100 with letter grade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DietQuality {
    pub score: u32,
    pub grade: char,
    pub recommendations: Vec<String>,
}

/// One scored food group: stepped (minimum servings, points) from best to worst
struct FoodGroupRule {
    steps: &'static [(f64, u32)],
    recommendation: &'static str,
}

const FRUIT: FoodGroupRule = FoodGroupRule {
    steps: &[(3.0, 20), (2.0, 15), (1.0, 10)],
    recommendation: "Consumir al menos 3 porciones de fruta al día",
};
const VEGETABLES: FoodGroupRule = FoodGroupRule {
    steps: &[(5.0, 20), (3.0, 15), (1.0, 8)],
    recommendation: "Incluir verduras en comida y cena (5 porciones al día)",
};
const WHOLE_GRAINS: FoodGroupRule = FoodGroupRule {
    steps: &[(6.0, 15), (3.0, 10), (1.0, 5)],
    recommendation: "Preferir cereales integrales: avena, tortilla de maíz, arroz integral",
};
const PROTEIN: FoodGroupRule = FoodGroupRule {
    steps: &[(3.0, 15), (2.0, 10), (1.0, 5)],
    recommendation: "Incluir una fuente de proteína en cada comida principal",
};
const DAIRY: FoodGroupRule = FoodGroupRule {
    steps: &[(3.0, 15), (2.0, 10), (1.0, 5)],
    recommendation: "Consumir 3 porciones de lácteos o alternativas fortificadas",
};

impl FoodGroupRule {
    fn points(&self, servings: f64) -> u32 {
        self.steps
            .iter()
            .find(|(min, _)| servings >= *min)
            .map_or(0, |&(_, points)| points)
    }

    fn max_points(&self) -> u32 {
        self.steps.first().map_or(0, |&(_, points)| points)
    }
}

/// Processed-food points: fewer servings score higher (max 15)
fn processed_points(servings: f64) -> u32 {
    if servings <= 1.0 {
        15
    } else if servings <= 2.0 {
        10
    } else if servings <= 3.0 {
        5
    } else {
        0
    }
}

pub fn diet_grade(score: u32) -> char {
    match score {
        85..=u32::MAX => 'A',
        70..=84 => 'B',
        55..=69 => 'C',
        40..=54 => 'D',
        _ => 'F',
    }
}

/// Score daily food-group servings; every group below its top step adds its recommendation
pub fn evaluate_diet_quality(servings: &FoodGroupServings) -> DietQuality {
    let mut score = 0;
    let mut recommendations = Vec::new();

    for (rule, value) in [
        (&FRUIT, servings.fruits),
        (&VEGETABLES, servings.vegetables),
        (&WHOLE_GRAINS, servings.whole_grains),
        (&PROTEIN, servings.protein),
        (&DAIRY, servings.dairy),
    ] {
        let points = rule.points(value);
        if points < rule.max_points() {
            recommendations.push(rule.recommendation.to_string());
        }
        score += points;
    }

    let processed = processed_points(servings.processed);
    if processed < 15 {
        recommendations.push("Reducir alimentos ultraprocesados a una porción al día o menos".to_string());
    }
    score += processed;

    DietQuality {
        score,
        grade: diet_grade(score),
        recommendations,
    }
}

// ============================================================================
// Nutrient Timing
// ============================================================================

/// Minutes before exercise start for the pre-exercise meal
pub const PRE_EXERCISE_LEAD_MINUTES: i64 = 150;
/// Minutes after exercise end for the recovery meal
pub const POST_EXERCISE_DELAY_MINUTES: i64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingWindow {
    pub time: NaiveTime,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutrientTiming {
    pub pre_exercise: TimingWindow,
    pub during_exercise: Vec<String>,
    pub post_exercise: TimingWindow,
}

/// Meal windows around a training session; times wrap past midnight
pub fn nutrient_timing(exercise_start: NaiveTime, exercise_duration_minutes: u32) -> NutrientTiming {
    let duration = i64::from(exercise_duration_minutes);
    let (pre_time, _) =
        exercise_start.overflowing_sub_signed(Duration::minutes(PRE_EXERCISE_LEAD_MINUTES));
    let (post_time, _) = exercise_start
        .overflowing_add_signed(Duration::minutes(duration + POST_EXERCISE_DELAY_MINUTES));

    let pre_exercise = TimingWindow {
        time: pre_time,
        recommendations: vec![
            "Comida rica en carbohidratos complejos".to_string(),
            "Proteína moderada y baja en grasa".to_string(),
            "500 ml de agua".to_string(),
        ],
    };

    let during_exercise = if exercise_duration_minutes > 60 {
        vec![
            "30-60 g de carbohidratos por hora".to_string(),
            "Bebida con electrolitos cada 15-20 minutos".to_string(),
        ]
    } else {
        vec!["Agua en sorbos cada 15-20 minutos".to_string()]
    };

    let post_exercise = TimingWindow {
        time: post_time,
        recommendations: vec![
            "Carbohidratos y proteína en proporción 3:1".to_string(),
            "20-25 g de proteína de alta calidad".to_string(),
            "Reponer 150% del peso perdido en líquidos".to_string(),
        ],
    };

    NutrientTiming {
        pre_exercise,
        during_exercise,
        post_exercise,
    }
}

// ============================================================================
// Intake Analysis
// ============================================================================

/// Share of calories from each macronutrient, each clamped to 0-100
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroDistribution {
    pub carbs_pct: f64,
    pub protein_pct: f64,
    pub fat_pct: f64,
}

pub fn macro_distribution(intake: &DailyIntake) -> MacroDistribution {
    let carbs_kcal = intake.carbs * KCAL_PER_G_CARB_PROTEIN;
    let protein_kcal = intake.protein * KCAL_PER_G_CARB_PROTEIN;
    let fat_kcal = intake.fats * KCAL_PER_G_FAT;
    let total = carbs_kcal + protein_kcal + fat_kcal;

    let share = |kcal: f64| {
        if total > 0.0 {
            (kcal / total * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        }
    };

    MacroDistribution {
        carbs_pct: share(carbs_kcal),
        protein_pct: share(protein_kcal),
        fat_pct: share(fat_kcal),
    }
}

/// Daily water intake (L) considered adequate
pub const ADEQUATE_WATER_L: f64 = 2.5;

/// Evaluations derivable from one dietetics record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DieteticsAssessment {
    pub macro_distribution: MacroDistribution,
    pub diet_quality: Option<DietQuality>,
    pub adequate_water: bool,
    pub recommendations: Vec<String>,
}

pub fn assess(record: &DieteticsRecord) -> DieteticsAssessment {
    let macro_distribution = macro_distribution(&record.intake);
    let diet_quality = record.food_groups.as_ref().map(evaluate_diet_quality);
    let adequate_water = record.intake.water >= ADEQUATE_WATER_L;

    let mut recommendations: Vec<String> = diet_quality
        .as_ref()
        .map(|q| q.recommendations.clone())
        .unwrap_or_default();

    if !adequate_water {
        recommendations.push("Aumentar el consumo de agua a 2.5 L o más al día".to_string());
    }
    if record.meal_pattern.breakfast_daily == Some(false) {
        recommendations.push("Desayunar todos los días antes de ir a la escuela o entrenar".to_string());
    }
    if record.eating_behavior.skips_meals {
        recommendations.push("Evitar saltarse comidas; planear colaciones para días de entrenamiento".to_string());
    }
    if record.hydration_habits.drinks_during_training == Some(false) {
        recommendations.push("Llevar agua a cada entrenamiento".to_string());
    }

    DieteticsAssessment {
        macro_distribution,
        diet_quality,
        adequate_water,
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caloric_needs_rounding_regression() {
        // 10*45 + 6.25*150 - 5*12 + 5 = 1332.5, rounded half away from zero
        let needs = caloric_needs(45.0, 150.0, 12, Gender::Male, 1.5, Sport::Futbol);
        assert_eq!(needs.bmr, 1333.0);
        // 1333 * 1.8 * 1.5 = 3599.1
        assert_eq!(needs.total_calories, 3599.0);
        assert_eq!(needs.carbs_g, (3599.0_f64 * 0.55 / 4.0).round());
        assert_eq!(needs.protein_g, 180.0);
        assert_eq!(needs.fat_g, 100.0);
    }

    #[test]
    fn test_caloric_needs_female_and_default_sport() {
        // 10*50 + 6.25*160 - 5*15 - 161 = 1264
        let needs = caloric_needs(50.0, 160.0, 15, Gender::Female, 1.0, Sport::Other);
        assert_eq!(needs.bmr, 1264.0);
        assert_eq!(needs.total_calories, (1264.0_f64 * 1.7).round());
    }

    #[test]
    fn test_hydration_needs() {
        let temperate = hydration_needs(50.0, 60.0, 1.0, 20.0);
        assert_eq!(temperate.base_ml, 1750.0);
        assert_eq!(temperate.exercise_ml, 1000.0);
        assert_eq!(temperate.total_ml, 2750.0);

        let hot = hydration_needs(50.0, 60.0, 1.0, 30.0);
        assert_eq!(hot.temperature_multiplier, 1.2);
        assert_eq!(hot.total_ml, 3300.0);

        let cold = hydration_needs(50.0, 0.0, 1.0, 5.0);
        assert_eq!(cold.total_ml, 1575.0);
    }

    #[test]
    fn test_diet_quality_perfect() {
        let servings = FoodGroupServings {
            fruits: 3.0,
            vegetables: 5.0,
            whole_grains: 6.0,
            protein: 3.0,
            dairy: 3.0,
            processed: 0.0,
        };
        let quality = evaluate_diet_quality(&servings);
        assert_eq!(quality.score, 100);
        assert_eq!(quality.grade, 'A');
        assert!(quality.recommendations.is_empty());
    }

    #[test]
    fn test_diet_quality_stepped_points() {
        let servings = FoodGroupServings {
            fruits: 2.0,       // 15
            vegetables: 1.0,   // 8
            whole_grains: 3.0, // 10
            protein: 2.0,      // 10
            dairy: 0.0,        // 0
            processed: 3.0,    // 5
        };
        let quality = evaluate_diet_quality(&servings);
        assert_eq!(quality.score, 48);
        assert_eq!(quality.grade, 'D');
        assert_eq!(quality.recommendations.len(), 6);
    }

    #[test]
    fn test_diet_grades() {
        assert_eq!(diet_grade(85), 'A');
        assert_eq!(diet_grade(70), 'B');
        assert_eq!(diet_grade(55), 'C');
        assert_eq!(diet_grade(40), 'D');
        assert_eq!(diet_grade(39), 'F');
    }

    #[test]
    fn test_nutrient_timing_windows() {
        let start = NaiveTime::from_hms_opt(16, 0, 0).unwrap();
        let timing = nutrient_timing(start, 90);
        assert_eq!(timing.pre_exercise.time, NaiveTime::from_hms_opt(13, 30, 0).unwrap());
        assert_eq!(timing.post_exercise.time, NaiveTime::from_hms_opt(18, 0, 0).unwrap());
        assert_eq!(timing.during_exercise.len(), 2);

        let short = nutrient_timing(start, 45);
        assert_eq!(short.during_exercise, vec!["Agua en sorbos cada 15-20 minutos"]);
    }

    #[test]
    fn test_nutrient_timing_wraps_midnight() {
        let start = NaiveTime::from_hms_opt(1, 0, 0).unwrap();
        let timing = nutrient_timing(start, 60);
        assert_eq!(timing.pre_exercise.time, NaiveTime::from_hms_opt(22, 30, 0).unwrap());
    }

    #[test]
    fn test_macro_distribution() {
        let intake = DailyIntake { carbs: 100.0, protein: 50.0, fats: 400.0 / 9.0, ..Default::default() };
        let dist = macro_distribution(&intake);
        assert!((dist.carbs_pct - 40.0).abs() < 1e-9);
        assert!((dist.protein_pct - 20.0).abs() < 1e-9);
        assert!((dist.fat_pct - 40.0).abs() < 1e-9);

        let empty = macro_distribution(&DailyIntake::default());
        assert_eq!(empty.carbs_pct, 0.0);
    }

    #[test]
    fn test_assess_flags_habits() {
        let mut record = DieteticsRecord::default();
        record.intake.water = 3.0;
        record.meal_pattern.breakfast_daily = Some(true);
        record.hydration_habits.drinks_during_training = Some(true);
        let result = assess(&record);
        assert!(result.adequate_water);
        assert!(result.diet_quality.is_none());
        assert!(result.recommendations.is_empty());

        record.eating_behavior.skips_meals = true;
        assert_eq!(assess(&record).recommendations.len(), 1);
    }

    #[test]
    fn test_unreported_habits_add_no_recommendations() {
        let mut record = DieteticsRecord::default();
        record.intake.water = 3.0;
        assert!(assess(&record).recommendations.is_empty());

        record.meal_pattern.breakfast_daily = Some(false);
        record.hydration_habits.drinks_during_training = Some(false);
        assert_eq!(assess(&record).recommendations.len(), 2);
    }
}
