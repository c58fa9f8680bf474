//! NutriABCD MCP Server Implementation
//!
//! Implements the MCP server with all NutriABCD tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::abcd::{EvaluationOptions, PediatricBmiMode, ProteinBasis};
use crate::db::Database;
use crate::models::{
    AbcdRecords, AnthropometryRecord, FoodGroupServings, LipidPanel, MucousMembranes, SkinTurgor,
};
use crate::tools::status::StatusTracker;
use crate::tools::{athletes, calculators, evaluations};

/// NutriABCD MCP Service
#[derive(Clone)]
pub struct NutriAbcdService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    tool_router: ToolRouter<NutriAbcdService>,
}

impl NutriAbcdService {
    pub fn new(database_path: PathBuf, database: Database) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path))),
            database,
            tool_router: Self::tool_router(),
        }
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// Calculator errors are always input problems
fn invalid(e: String) -> McpError {
    McpError::invalid_params(e, None)
}

// ============================================================================
// Athlete Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddAthleteParams {
    pub name: String,
    /// ISO date, YYYY-MM-DD
    pub birth_date: String,
    /// "male" or "female"
    pub gender: String,
    /// futbol, baloncesto, voleibol, natacion, atletismo, tenis, gimnasia, ciclismo, artes_marciales
    pub sport: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetAthleteParams {
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListAthletesParams {
    pub sport: Option<String>,
    /// Name search; takes precedence over sport
    pub query: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateAthleteParams {
    pub id: i64,
    pub name: Option<String>,
    pub birth_date: Option<String>,
    pub gender: Option<String>,
    pub sport: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteAthleteParams {
    pub id: i64,
    /// Required when the athlete has evaluations
    #[serde(default)]
    pub force: bool,
}

// ============================================================================
// Evaluation Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SubmitEvaluationParams {
    pub athlete_id: i64,
    /// ISO date, YYYY-MM-DD; defaults to today
    pub evaluated_at: Option<String>,
    #[serde(default)]
    pub records: AbcdRecords,
    pub notes: Option<String>,
    #[serde(default)]
    pub options: EvaluationOptions,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetEvaluationParams {
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListEvaluationsParams {
    pub athlete_id: Option<i64>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteEvaluationParams {
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RecomputeEvaluationsParams {
    /// Limit to one athlete; all evaluations when omitted
    pub athlete_id: Option<i64>,
    pub pediatric_bmi: Option<PediatricBmiMode>,
    pub protein_basis: Option<ProteinBasis>,
}

// ============================================================================
// Calculator Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct BmiParams {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age: u32,
    pub gender: String,
    /// Under 18, classify the growth percentile instead of the raw BMI
    #[serde(default)]
    pub use_percentile: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GrowthPercentileParams {
    pub value: f64,
    pub age: u32,
    pub gender: String,
    /// "height", "weight" or "bmi"
    pub metric: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct BodyCompositionParams {
    pub record: AnthropometryRecord,
    pub age: u32,
    pub gender: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct IronStatusParams {
    /// g/dL
    pub hemoglobin: f64,
    /// ng/mL
    pub ferritin: f64,
    pub age: u32,
    pub gender: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LipidProfileParams {
    pub panel: LipidPanel,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CardiovascularRiskParams {
    pub age: u32,
    pub gender: String,
    pub total_cholesterol: f64,
    pub hdl: f64,
    pub systolic_bp: f64,
    #[serde(default)]
    pub smoking: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AdjustedBmiParams {
    pub bmi: f64,
    pub muscle_mass_kg: Option<f64>,
    pub sport: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct HydrationStatusParams {
    pub urine_specific_gravity: f64,
    #[serde(default)]
    pub skin_turgor: SkinTurgor,
    #[serde(default)]
    pub mucous_membranes: MucousMembranes,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct TargetHeartRateParams {
    pub age: u32,
    pub resting_hr: f64,
    /// Fraction of heart rate reserve, 0-1
    pub intensity: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RecoveryParams {
    pub resting_hr: f64,
    pub current_hr: f64,
    pub minutes_post_exercise: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CaloricNeedsParams {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age: u32,
    pub gender: String,
    /// Multiplier on top of the sport factor, 1.0-2.5
    pub activity_level: f64,
    #[serde(default)]
    pub sport: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct HydrationNeedsParams {
    pub weight_kg: f64,
    pub exercise_minutes: f64,
    /// Liters per hour
    pub sweat_rate: f64,
    /// Ambient temperature in °C
    pub temperature: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DietQualityParams {
    pub servings: FoodGroupServings,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct NutrientTimingParams {
    /// Session start, 24h "HH:MM"
    pub start: String,
    pub duration_minutes: u32,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl NutriAbcdService {
    // --- Status ---

    #[tool(description = "Get the current status of the NutriABCD service including build info, database status, and process information")]
    async fn nutriabcd_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status(&self.database);
        json_result(&status)
    }

    #[tool(description = "Get step-by-step instructions for running an ABCD assessment, the units expected and how the composite score works. Call this before submitting a first evaluation.")]
    fn assessment_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::ASSESSMENT_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(ASSESSMENT_INSTRUCTIONS)]))
    }

    // --- Athletes ---

    #[tool(description = "Register a new athlete (name, birth date, gender, sport)")]
    fn add_athlete(&self, Parameters(p): Parameters<AddAthleteParams>) -> Result<CallToolResult, McpError> {
        let result = athletes::add_athlete(&self.database, &p.name, &p.birth_date, &p.gender, p.sport.as_deref(), p.notes)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get an athlete with current age and latest evaluation score")]
    fn get_athlete(&self, Parameters(p): Parameters<GetAthleteParams>) -> Result<CallToolResult, McpError> {
        let result = athletes::get_athlete(&self.database, p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(athlete) => json_result(&athlete),
            None => Ok(CallToolResult::success(vec![Content::text(format!(
                r#"{{"error": "Athlete not found", "id": {}}}"#,
                p.id
            ))])),
        }
    }

    #[tool(description = "List athletes, optionally filtered by sport or searched by name")]
    fn list_athletes(&self, Parameters(p): Parameters<ListAthletesParams>) -> Result<CallToolResult, McpError> {
        let result = athletes::list_athletes(&self.database, p.sport.as_deref(), p.query.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Update athlete details. Only provided fields are changed.")]
    fn update_athlete(&self, Parameters(p): Parameters<UpdateAthleteParams>) -> Result<CallToolResult, McpError> {
        let result = athletes::update_athlete(
            &self.database, p.id, p.name, p.birth_date, p.gender.as_deref(), p.sport.as_deref(), p.notes,
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Delete an athlete. Requires force=true when the athlete has evaluations, which are deleted too.")]
    fn delete_athlete(&self, Parameters(p): Parameters<DeleteAthleteParams>) -> Result<CallToolResult, McpError> {
        let result = athletes::delete_athlete(&self.database, p.id, p.force)
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Ok(success) => json_result(&success),
            Err(blocked) => json_result(&blocked),
        }
    }

    // --- Evaluations ---

    #[tool(description = "Score and store a full ABCD evaluation (anthropometry, biochemistry, clinical, dietetics records) for an athlete. Returns the composite score, status, risk factors, strengths and recommendations.")]
    fn submit_evaluation(&self, Parameters(p): Parameters<SubmitEvaluationParams>) -> Result<CallToolResult, McpError> {
        let result = evaluations::submit_evaluation(
            &self.database, p.athlete_id, p.records, p.evaluated_at.as_deref(), p.notes, p.options,
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get a stored evaluation with its records, composite result and per-domain calculator breakdown")]
    fn get_evaluation(&self, Parameters(p): Parameters<GetEvaluationParams>) -> Result<CallToolResult, McpError> {
        let result = evaluations::get_evaluation(&self.database, p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(evaluation) => json_result(&evaluation),
            None => Ok(CallToolResult::success(vec![Content::text(format!(
                r#"{{"error": "Evaluation not found", "id": {}}}"#,
                p.id
            ))])),
        }
    }

    #[tool(description = "List evaluations for an athlete (with score trend) or the most recent across all athletes")]
    fn list_evaluations(&self, Parameters(p): Parameters<ListEvaluationsParams>) -> Result<CallToolResult, McpError> {
        let result = evaluations::list_evaluations(&self.database, p.athlete_id, p.limit)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Delete a stored evaluation")]
    fn delete_evaluation(&self, Parameters(p): Parameters<DeleteEvaluationParams>) -> Result<CallToolResult, McpError> {
        let result = evaluations::delete_evaluation(&self.database, p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Re-score stored evaluations, optionally with the corrected pediatric BMI or per-kg protein readings")]
    fn recompute_evaluations(&self, Parameters(p): Parameters<RecomputeEvaluationsParams>) -> Result<CallToolResult, McpError> {
        let options = EvaluationOptions {
            pediatric_bmi: p.pediatric_bmi.unwrap_or_default(),
            protein_basis: p.protein_basis.unwrap_or_default(),
        };
        let result = evaluations::recompute_evaluations(&self.database, p.athlete_id, options)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Anthropometry Calculators ---

    #[tool(description = "Calculate BMI with its age/gender classification and, under 18, the BMI growth percentile")]
    fn calculate_bmi(&self, Parameters(p): Parameters<BmiParams>) -> Result<CallToolResult, McpError> {
        let result = calculators::calculate_bmi(p.weight_kg, p.height_cm, p.age, &p.gender, p.use_percentile)
            .map_err(invalid)?;
        json_result(&result)
    }

    #[tool(description = "Growth percentile (0-100) of a height, weight or BMI value against the reference population")]
    fn calculate_growth_percentile(&self, Parameters(p): Parameters<GrowthPercentileParams>) -> Result<CallToolResult, McpError> {
        let result = calculators::calculate_growth_percentile(p.value, p.age, &p.gender, &p.metric)
            .map_err(invalid)?;
        json_result(&result)
    }

    #[tool(description = "Body composition from an anthropometry record: BMI, body fat from skinfolds, lean mass, waist-hip ratio, arm muscle area")]
    fn assess_body_composition(&self, Parameters(p): Parameters<BodyCompositionParams>) -> Result<CallToolResult, McpError> {
        let result = calculators::assess_body_composition(&p.record, p.age, &p.gender).map_err(invalid)?;
        json_result(&result)
    }

    // --- Biochemistry Calculators ---

    #[tool(description = "Grade iron status from hemoglobin and ferritin")]
    fn evaluate_iron_status(&self, Parameters(p): Parameters<IronStatusParams>) -> Result<CallToolResult, McpError> {
        let result = calculators::evaluate_iron_status(p.hemoglobin, p.ferritin, p.age, &p.gender).map_err(invalid)?;
        json_result(&result)
    }

    #[tool(description = "Check a lipid panel (total cholesterol, HDL, LDL, triglycerides in mg/dL)")]
    fn evaluate_lipid_profile(&self, Parameters(p): Parameters<LipidProfileParams>) -> Result<CallToolResult, McpError> {
        let result = calculators::evaluate_lipid_profile(&p.panel).map_err(invalid)?;
        json_result(&result)
    }

    #[tool(description = "Point-based cardiovascular risk percentage (capped at 20%)")]
    fn calculate_cardiovascular_risk(&self, Parameters(p): Parameters<CardiovascularRiskParams>) -> Result<CallToolResult, McpError> {
        let result = calculators::calculate_cardiovascular_risk(
            p.age, &p.gender, p.total_cholesterol, p.hdl, p.systolic_bp, p.smoking,
        )
        .map_err(invalid)?;
        json_result(&result)
    }

    // --- Clinical Calculators ---

    #[tool(description = "BMI adjusted for sport build and high muscle mass")]
    fn performance_adjusted_bmi(&self, Parameters(p): Parameters<AdjustedBmiParams>) -> Result<CallToolResult, McpError> {
        let result = calculators::performance_adjusted_bmi(p.bmi, p.muscle_mass_kg, &p.sport).map_err(invalid)?;
        json_result(&result)
    }

    #[tool(description = "Dehydration score from urine specific gravity, skin turgor and mucous membranes")]
    fn evaluate_hydration_status(&self, Parameters(p): Parameters<HydrationStatusParams>) -> Result<CallToolResult, McpError> {
        let result = calculators::evaluate_hydration_status(p.urine_specific_gravity, p.skin_turgor, p.mucous_membranes)
            .map_err(invalid)?;
        json_result(&result)
    }

    #[tool(description = "Karvonen target heart rate and ±5% training band")]
    fn calculate_target_heart_rate(&self, Parameters(p): Parameters<TargetHeartRateParams>) -> Result<CallToolResult, McpError> {
        let result = calculators::calculate_target_heart_rate(p.age, p.resting_hr, p.intensity).map_err(invalid)?;
        json_result(&result)
    }

    #[tool(description = "Heart-rate recovery after exercise compared with the expected curve")]
    fn evaluate_recovery(&self, Parameters(p): Parameters<RecoveryParams>) -> Result<CallToolResult, McpError> {
        let result = calculators::evaluate_recovery(p.resting_hr, p.current_hr, p.minutes_post_exercise)
            .map_err(invalid)?;
        json_result(&result)
    }

    // --- Dietetics Calculators ---

    #[tool(description = "Daily caloric needs (Mifflin-St Jeor x sport factor x activity level) with macronutrient grams")]
    fn calculate_caloric_needs(&self, Parameters(p): Parameters<CaloricNeedsParams>) -> Result<CallToolResult, McpError> {
        let result = calculators::calculate_caloric_needs(
            p.weight_kg, p.height_cm, p.age, &p.gender, p.activity_level, &p.sport,
        )
        .map_err(invalid)?;
        json_result(&result)
    }

    #[tool(description = "Daily fluid needs from body weight, training sweat losses and temperature")]
    fn calculate_hydration_needs(&self, Parameters(p): Parameters<HydrationNeedsParams>) -> Result<CallToolResult, McpError> {
        let result = calculators::calculate_hydration_needs(p.weight_kg, p.exercise_minutes, p.sweat_rate, p.temperature)
            .map_err(invalid)?;
        json_result(&result)
    }

    #[tool(description = "Score daily food-group servings out of 100 with a letter grade")]
    fn evaluate_diet_quality(&self, Parameters(p): Parameters<DietQualityParams>) -> Result<CallToolResult, McpError> {
        let result = calculators::evaluate_diet_quality(&p.servings).map_err(invalid)?;
        json_result(&result)
    }

    #[tool(description = "Pre-, during- and post-exercise nutrition windows for a training session")]
    fn plan_nutrient_timing(&self, Parameters(p): Parameters<NutrientTimingParams>) -> Result<CallToolResult, McpError> {
        let result = calculators::plan_nutrient_timing(&p.start, p.duration_minutes).map_err(invalid)?;
        json_result(&result)
    }
}

#[tool_handler]
impl ServerHandler for NutriAbcdService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "nutriabcd".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("NutriABCD".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "NutriABCD - ABCD nutritional assessment for youth athletes. \
                 IMPORTANT: Call assessment_instructions before the first evaluation. \
                 Athletes: add/get/list/update/delete_athlete. \
                 Evaluations: submit/get/list/delete_evaluation, recompute_evaluations. \
                 Anthropometry: calculate_bmi, calculate_growth_percentile, assess_body_composition. \
                 Biochemistry: evaluate_iron_status, evaluate_lipid_profile, calculate_cardiovascular_risk. \
                 Clinical: performance_adjusted_bmi, evaluate_hydration_status, calculate_target_heart_rate, evaluate_recovery. \
                 Dietetics: calculate_caloric_needs, calculate_hydration_needs, evaluate_diet_quality, plan_nutrient_timing. \
                 delete_athlete requires force=true when evaluations exist."
                    .into(),
            ),
        }
    }
}
