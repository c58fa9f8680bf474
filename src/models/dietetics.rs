//! Dietetics record
//!
//! Reported intake and eating habits.

use rmcp::schemars;
use serde::{Deserialize, Serialize};

/// Average daily intake
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(default)]
pub struct DailyIntake {
    pub calories: f64, // kcal
    pub protein: f64,  // grams
    pub carbs: f64,    // grams
    pub fats: f64,     // grams
    pub fiber: f64,    // grams
    pub water: f64,    // liters
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(default)]
pub struct MealPattern {
    pub meals_per_day: u32,
    pub snacks_per_day: u32,
    /// `None` when not asked
    pub breakfast_daily: Option<bool>,
}

/// Servings per day by food group
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(default)]
pub struct FoodGroupServings {
    pub fruits: f64,
    pub vegetables: f64,
    pub whole_grains: f64,
    pub protein: f64,
    pub dairy: f64,
    pub processed: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(default)]
pub struct HydrationHabits {
    pub drinks_during_training: Option<bool>,
    pub sports_drinks: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(default)]
pub struct EatingBehavior {
    pub skips_meals: bool,
    pub eats_late: bool,
    pub emotional_eating: bool,
}

/// Self-reported nutritional knowledge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum KnowledgeLevel {
    Low,
    #[default]
    Medium,
    High,
}

/// Dietary measurements
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(default)]
pub struct DieteticsRecord {
    pub intake: DailyIntake,
    pub meal_pattern: MealPattern,
    pub food_groups: Option<FoodGroupServings>,
    pub food_preferences: Vec<String>,
    pub supplements: Vec<String>,
    pub hydration_habits: HydrationHabits,
    pub eating_behavior: EatingBehavior,
    pub nutrition_knowledge: KnowledgeLevel,
}
