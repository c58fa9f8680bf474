//! Evaluation MCP Tools
//!
//! Submitting a full ABCD evaluation, reading it back with the per-domain
//! breakdown, and re-scoring stored evaluations.

use serde::Serialize;

use crate::abcd::composite::{evaluate_detailed, DomainPoints};
use crate::abcd::{self, anthropometry, biochemistry, clinical, dietetics, EvaluationOptions};
use crate::db::Database;
use crate::models::{
    parse_date, AbcdRecords, Athlete, Evaluation, EvaluationCreate, EvaluationSummary, Gender,
    OverallAssessment, Sport,
};

/// Response for submit_evaluation
#[derive(Debug, Serialize)]
pub struct SubmitEvaluationResponse {
    pub id: i64,
    pub athlete_id: i64,
    pub evaluated_at: String,
    pub age: u32,
    pub points: DomainPoints,
    pub status_display: String,
    pub assessment: OverallAssessment,
}

/// Per-domain calculator output for a stored evaluation
#[derive(Debug, Serialize)]
pub struct DomainReports {
    pub anthropometry: Option<anthropometry::AnthropometryAssessment>,
    pub biochemistry: biochemistry::BiochemistryAssessment,
    pub clinical: clinical::ClinicalAssessment,
    pub dietetics: dietetics::DieteticsAssessment,
}

/// Full evaluation detail
#[derive(Debug, Serialize)]
pub struct EvaluationDetail {
    pub id: i64,
    pub athlete_id: i64,
    pub athlete_name: Option<String>,
    pub evaluated_at: String,
    pub age: u32,
    pub gender: String,
    pub score: u8,
    pub status: String,
    pub status_display: String,
    pub assessment: OverallAssessment,
    pub domains: DomainReports,
    pub records: AbcdRecords,
    pub notes: Option<String>,
    pub created_at: String,
}

/// Response for list_evaluations
#[derive(Debug, Serialize)]
pub struct ListEvaluationsResponse {
    pub evaluations: Vec<EvaluationSummary>,
    pub total: usize,
    /// Score change between the two most recent evaluations of one athlete
    pub score_trend: Option<i16>,
}

/// Response for delete_evaluation
#[derive(Debug, Serialize)]
pub struct DeleteEvaluationResponse {
    pub success: bool,
    pub deleted_id: i64,
}

/// Response for recompute_evaluations
#[derive(Debug, Serialize)]
pub struct RecomputeEvaluationsResponse {
    pub processed: usize,
    pub changed: usize,
    pub changes: Vec<ScoreChange>,
}

#[derive(Debug, Serialize)]
pub struct ScoreChange {
    pub id: i64,
    pub old_score: u8,
    pub new_score: u8,
}

/// Run every domain calculator over the records
pub fn domain_reports(records: &AbcdRecords, age: u32, gender: Gender, sport: Sport) -> DomainReports {
    let anthro = &records.anthropometry;
    let anthropometry = anthro
        .has_bmi_inputs()
        .then(|| anthropometry::assess(anthro, age, gender));
    let bmi = anthropometry.as_ref().map(|a| a.bmi);

    DomainReports {
        biochemistry: biochemistry::assess(&records.biochemistry, age, gender),
        clinical: clinical::assess(&records.clinical, sport, bmi, anthro.muscle_mass),
        dietetics: dietetics::assess(&records.dietetics),
        anthropometry,
    }
}

// ============================================================================
// Tool Functions
// ============================================================================

/// Score and store a full ABCD evaluation for an athlete
///
/// Age is derived from the athlete's birth date on `evaluated_at` (today when
/// omitted); gender and sport come from the athlete record.
pub fn submit_evaluation(
    db: &Database,
    athlete_id: i64,
    records: AbcdRecords,
    evaluated_at: Option<&str>,
    notes: Option<String>,
    options: EvaluationOptions,
) -> Result<SubmitEvaluationResponse, String> {
    if let Err(e) = abcd::validation::validate_records(&records) {
        tracing::warn!(athlete_id, error = %e, "evaluation rejected");
        return Err(format!("Invalid evaluation data: {}", e));
    }

    let date = match evaluated_at {
        Some(s) => parse_date(s)
            .ok_or_else(|| format!("Invalid evaluated_at '{}', expected YYYY-MM-DD", s))?,
        None => chrono::Local::now().date_naive(),
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let athlete = Athlete::get_by_id(&conn, athlete_id)
        .map_err(|e| format!("Failed to get athlete: {}", e))?
        .ok_or_else(|| format!("Athlete not found with id: {}", athlete_id))?;

    let age = athlete.age_on(date).ok_or_else(|| {
        format!(
            "Evaluation date {} precedes birth date {} of athlete {}",
            date, athlete.birth_date, athlete_id
        )
    })?;

    let (assessment, points) = evaluate_detailed(&records, age, athlete.gender, &options);
    tracing::debug!(
        athlete_id,
        anthropometry = points.anthropometry,
        biochemistry = points.biochemistry,
        clinical = points.clinical,
        dietetics = points.dietetics,
        score = assessment.score,
        "composite score computed"
    );

    let data = EvaluationCreate {
        athlete_id,
        evaluated_at: date.format("%Y-%m-%d").to_string(),
        age,
        gender: athlete.gender,
        records,
        assessment,
        notes,
    };
    let stored = Evaluation::create(&conn, &data)
        .map_err(|e| format!("Failed to store evaluation: {}", e))?;

    tracing::info!(
        id = stored.id,
        athlete_id,
        score = stored.score,
        status = stored.status.as_str(),
        "evaluation stored"
    );

    Ok(SubmitEvaluationResponse {
        id: stored.id,
        athlete_id,
        evaluated_at: stored.evaluated_at,
        age,
        points,
        status_display: stored.status.display_name().to_string(),
        assessment: stored.assessment,
    })
}

/// Get a stored evaluation with the per-domain breakdown
pub fn get_evaluation(db: &Database, id: i64) -> Result<Option<EvaluationDetail>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let evaluation = match Evaluation::get_by_id(&conn, id)
        .map_err(|e| format!("Failed to get evaluation: {}", e))?
    {
        Some(e) => e,
        None => return Ok(None),
    };

    let athlete = Athlete::get_by_id(&conn, evaluation.athlete_id)
        .map_err(|e| format!("Failed to get athlete: {}", e))?;
    let sport = athlete.as_ref().map(|a| a.sport).unwrap_or_default();

    let domains = domain_reports(&evaluation.records, evaluation.age, evaluation.gender, sport);

    Ok(Some(EvaluationDetail {
        id: evaluation.id,
        athlete_id: evaluation.athlete_id,
        athlete_name: athlete.map(|a| a.name),
        evaluated_at: evaluation.evaluated_at,
        age: evaluation.age,
        gender: evaluation.gender.as_str().to_string(),
        score: evaluation.score,
        status: evaluation.status.as_str().to_string(),
        status_display: evaluation.status.display_name().to_string(),
        assessment: evaluation.assessment,
        domains,
        records: evaluation.records,
        notes: evaluation.notes,
        created_at: evaluation.created_at,
    }))
}

/// List evaluations for one athlete, or the most recent across all athletes
pub fn list_evaluations(
    db: &Database,
    athlete_id: Option<i64>,
    limit: Option<u32>,
) -> Result<ListEvaluationsResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let evaluations = match athlete_id {
        Some(id) => Evaluation::list_for_athlete(&conn, id),
        None => Evaluation::list(&conn, limit),
    }
    .map_err(|e| format!("Failed to list evaluations: {}", e))?;

    let score_trend = match (athlete_id, evaluations.as_slice()) {
        (Some(_), [latest, previous, ..]) => {
            Some(i16::from(latest.score) - i16::from(previous.score))
        }
        _ => None,
    };

    let mut summaries: Vec<EvaluationSummary> =
        evaluations.iter().map(Evaluation::summary).collect();
    if let Some(limit) = limit {
        summaries.truncate(limit as usize);
    }
    let total = summaries.len();

    Ok(ListEvaluationsResponse {
        evaluations: summaries,
        total,
        score_trend,
    })
}

/// Delete a stored evaluation
pub fn delete_evaluation(db: &Database, id: i64) -> Result<DeleteEvaluationResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let deleted =
        Evaluation::delete(&conn, id).map_err(|e| format!("Failed to delete evaluation: {}", e))?;
    if !deleted {
        return Err(format!("Evaluation not found with id: {}", id));
    }

    tracing::info!(id, "evaluation deleted");
    Ok(DeleteEvaluationResponse {
        success: true,
        deleted_id: id,
    })
}

/// Re-run the composite evaluator over stored evaluations
///
/// Uses the stored age and gender, so results only change when the scoring
/// rules or `options` differ from those used at submission.
pub fn recompute_evaluations(
    db: &Database,
    athlete_id: Option<i64>,
    options: EvaluationOptions,
) -> Result<RecomputeEvaluationsResponse, String> {
    db.with_transaction(|tx| {
        let evaluations = match athlete_id {
            Some(id) => Evaluation::list_for_athlete(tx, id)?,
            None => Evaluation::list(tx, None)?,
        };

        let mut changes = Vec::new();
        for evaluation in &evaluations {
            let assessment = abcd::evaluate_with(
                &evaluation.records,
                evaluation.age,
                evaluation.gender,
                &options,
            );
            if assessment == evaluation.assessment {
                continue;
            }

            if assessment.score != evaluation.score {
                tracing::info!(
                    id = evaluation.id,
                    old = evaluation.score,
                    new = assessment.score,
                    "evaluation re-scored"
                );
            }
            changes.push(ScoreChange {
                id: evaluation.id,
                old_score: evaluation.score,
                new_score: assessment.score,
            });
            Evaluation::update_assessment(tx, evaluation.id, &assessment)?;
        }

        Ok(RecomputeEvaluationsResponse {
            processed: evaluations.len(),
            changed: changes.len(),
            changes,
        })
    })
    .map_err(|e| format!("Failed to recompute evaluations: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abcd::ProteinBasis;
    use crate::db::migrations::run_migrations;
    use crate::models::NutritionalStatus;
    use crate::tools::athletes::add_athlete;

    fn setup() -> (Database, i64) {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| run_migrations(conn)).unwrap();
        let athlete = add_athlete(&db, "Emiliano", "2012-03-01", "male", Some("futbol"), None)
            .unwrap();
        (db, athlete.id)
    }

    fn reference_records() -> AbcdRecords {
        let mut records = AbcdRecords::default();
        records.anthropometry.height = 150.0;
        records.anthropometry.weight = 45.0;
        records.biochemistry.hemoglobin = Some(13.5);
        records.biochemistry.ferritin = Some(45.0);
        records.clinical.vital_signs.systolic_bp = Some(110.0);
        records.clinical.vital_signs.diastolic_bp = Some(70.0);
        records.clinical.vital_signs.heart_rate = Some(75.0);
        records.dietetics.intake.calories = 2400.0;
        records.dietetics.intake.protein = 95.0;
        records.dietetics.intake.water = 2.8;
        records
    }

    #[test]
    fn test_submit_scores_and_stores() {
        let (db, athlete_id) = setup();
        let response = submit_evaluation(
            &db,
            athlete_id,
            reference_records(),
            Some("2024-09-15"),
            None,
            EvaluationOptions::default(),
        )
        .unwrap();

        assert_eq!(response.age, 12);
        assert_eq!(response.assessment.score, 92);
        assert_eq!(response.assessment.status, NutritionalStatus::Optimal);
        assert_eq!(response.points.dietetics, 17.0);

        let detail = get_evaluation(&db, response.id).unwrap().unwrap();
        assert_eq!(detail.score, 92);
        assert_eq!(detail.athlete_name.as_deref(), Some("Emiliano"));
        assert!(detail.domains.anthropometry.is_some());
        assert!(detail.domains.biochemistry.iron.is_some());
    }

    #[test]
    fn test_submit_rejects_invalid_records() {
        let (db, athlete_id) = setup();
        let mut records = reference_records();
        records.anthropometry.height = -150.0;
        let result = submit_evaluation(
            &db,
            athlete_id,
            records,
            None,
            None,
            EvaluationOptions::default(),
        );
        assert!(result.unwrap_err().contains("height"));
    }

    #[test]
    fn test_submit_rejects_implausible_clinical_and_lab_values() {
        let (db, athlete_id) = setup();
        let mut records = reference_records();
        records.clinical.performance = Some(crate::models::PerformanceMetrics {
            resting_heart_rate: Some(-60.0),
            post_exercise_heart_rate: Some(180.0),
            minutes_post_exercise: Some(1.0),
            vo2_max: None,
        });
        let err = submit_evaluation(&db, athlete_id, records, None, None, EvaluationOptions::default())
            .unwrap_err();
        assert!(err.contains("resting_heart_rate"));

        let mut records = reference_records();
        records.clinical.physical_exam.urine_specific_gravity = Some(-5.0);
        assert!(submit_evaluation(&db, athlete_id, records, None, None, EvaluationOptions::default())
            .is_err());

        let mut records = reference_records();
        records.biochemistry.lipid_panel = Some(crate::models::LipidPanel {
            total_cholesterol: -1.0,
            hdl: -1.0,
            ldl: -1.0,
            triglycerides: -1.0,
        });
        assert!(submit_evaluation(&db, athlete_id, records, None, None, EvaluationOptions::default())
            .is_err());

        assert_eq!(list_evaluations(&db, None, None).unwrap().total, 0);
    }

    #[test]
    fn test_submit_unknown_athlete_or_date_before_birth() {
        let (db, athlete_id) = setup();
        let options = EvaluationOptions::default();
        assert!(submit_evaluation(&db, 999, reference_records(), None, None, options).is_err());
        assert!(submit_evaluation(
            &db,
            athlete_id,
            reference_records(),
            Some("2010-01-01"),
            None,
            options
        )
        .is_err());
        assert_eq!(list_evaluations(&db, None, None).unwrap().total, 0);
    }

    #[test]
    fn test_list_trend_and_delete() {
        let (db, athlete_id) = setup();
        let options = EvaluationOptions::default();
        let mut low = reference_records();
        low.biochemistry.ferritin = Some(5.0);

        submit_evaluation(&db, athlete_id, low, Some("2024-01-10"), None, options).unwrap();
        let latest = submit_evaluation(
            &db,
            athlete_id,
            reference_records(),
            Some("2024-06-10"),
            None,
            options,
        )
        .unwrap();

        let list = list_evaluations(&db, Some(athlete_id), None).unwrap();
        assert_eq!(list.total, 2);
        assert_eq!(list.score_trend, Some(25));

        delete_evaluation(&db, latest.id).unwrap();
        assert!(delete_evaluation(&db, latest.id).is_err());
        assert_eq!(list_evaluations(&db, Some(athlete_id), None).unwrap().total, 1);
    }

    #[test]
    fn test_recompute_with_corrected_protein() {
        let (db, athlete_id) = setup();
        let mut records = reference_records();
        records.dietetics.intake.protein = 72.0;
        submit_evaluation(
            &db,
            athlete_id,
            records,
            Some("2024-09-15"),
            None,
            EvaluationOptions::default(),
        )
        .unwrap();

        let unchanged = recompute_evaluations(&db, None, EvaluationOptions::default()).unwrap();
        assert_eq!(unchanged.processed, 1);
        assert_eq!(unchanged.changed, 0);

        let options = EvaluationOptions {
            protein_basis: ProteinBasis::PerKg,
            ..Default::default()
        };
        let result = recompute_evaluations(&db, Some(athlete_id), options).unwrap();
        assert_eq!(result.changed, 1);
        assert_eq!(result.changes[0].old_score, 92);
        assert_eq!(result.changes[0].new_score, 100);
    }
}
