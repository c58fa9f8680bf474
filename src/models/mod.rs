//! Data models
//!
//! Measurement records, assessment outputs and the stored entities.

mod anthropometry;
mod assessment;
mod athlete;
mod biochemistry;
mod clinical;
mod demographics;
mod dietetics;
mod evaluation;

pub use anthropometry::{AnthropometryRecord, Skinfolds};
pub use assessment::{
    AbcdRecords, Classification, NutritionalStatus, OverallAssessment, RiskAssessment, Severity,
};
pub use athlete::{age_on, parse_date, Athlete, AthleteCreate, AthleteUpdate};
pub use biochemistry::{BiochemistryRecord, ElectrolytePanel, LipidPanel, ProteinPanel};
pub use clinical::{
    Appetite, ClinicalRecord, EnergyLevel, FatigueLevel, FunctionalAssessment, MedicalHistory,
    MucousMembranes, PerformanceMetrics, PhysicalExam, SkinTurgor, SleepQuality, VitalSigns,
};
pub use demographics::{Gender, Sport};
pub use dietetics::{
    DailyIntake, DieteticsRecord, EatingBehavior, FoodGroupServings, HydrationHabits,
    KnowledgeLevel, MealPattern,
};
pub use evaluation::{Evaluation, EvaluationCreate, EvaluationSummary};
