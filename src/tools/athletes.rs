//! Athlete MCP Tools
//!
//! Tools for registering and maintaining the athletes being evaluated.

use serde::Serialize;

use crate::db::Database;
use crate::models::{parse_date, Athlete, AthleteCreate, AthleteUpdate, Evaluation, Gender, Sport};

/// Athlete summary for listing
#[derive(Debug, Serialize)]
pub struct AthleteSummary {
    pub id: i64,
    pub name: String,
    pub birth_date: String,
    pub age: Option<u32>,
    pub gender: String,
    pub sport: String,
}

/// Full athlete detail
#[derive(Debug, Serialize)]
pub struct AthleteDetail {
    pub id: i64,
    pub name: String,
    pub birth_date: String,
    pub age: Option<u32>,
    pub gender: String,
    pub sport: String,
    pub sport_display: String,
    pub notes: Option<String>,
    pub evaluation_count: usize,
    pub latest_score: Option<u8>,
    pub latest_status: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

impl From<&Athlete> for AthleteSummary {
    fn from(athlete: &Athlete) -> Self {
        Self {
            id: athlete.id,
            name: athlete.name.clone(),
            birth_date: athlete.birth_date.clone(),
            age: athlete.age_on(today()),
            gender: athlete.gender.as_str().to_string(),
            sport: athlete.sport.as_str().to_string(),
        }
    }
}

/// Response for list_athletes
#[derive(Debug, Serialize)]
pub struct ListAthletesResponse {
    pub athletes: Vec<AthleteSummary>,
    pub total: usize,
}

/// Response for add_athlete and update_athlete
#[derive(Debug, Serialize)]
pub struct AthleteSavedResponse {
    pub id: i64,
    pub name: String,
    pub age: Option<u32>,
    pub sport: String,
    pub updated_at: String,
}

/// Response for delete_athlete when blocked
#[derive(Debug, Serialize)]
pub struct DeleteAthleteBlockedResponse {
    pub error: String,
    pub requires_force: bool,
    pub evaluation_count: usize,
}

/// Response for successful delete_athlete
#[derive(Debug, Serialize)]
pub struct DeleteAthleteSuccessResponse {
    pub success: bool,
    pub deleted_id: i64,
    pub deleted_evaluations: usize,
}

fn check_birth_date(birth_date: &str) -> Result<(), String> {
    let birth = parse_date(birth_date)
        .ok_or_else(|| format!("Invalid birth_date '{}', expected YYYY-MM-DD", birth_date))?;
    if birth > today() {
        return Err("birth_date cannot be in the future".to_string());
    }
    Ok(())
}

fn parse_gender(gender: &str) -> Result<Gender, String> {
    Gender::from_str(gender)
        .ok_or_else(|| format!("Invalid gender '{}', expected 'male' or 'female'", gender))
}

// ============================================================================
// Tool Functions
// ============================================================================

/// Register a new athlete
pub fn add_athlete(
    db: &Database,
    name: &str,
    birth_date: &str,
    gender: &str,
    sport: Option<&str>,
    notes: Option<String>,
) -> Result<AthleteSavedResponse, String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Athlete name cannot be empty".to_string());
    }
    check_birth_date(birth_date)?;

    let data = AthleteCreate {
        name: name.to_string(),
        birth_date: birth_date.trim().to_string(),
        gender: parse_gender(gender)?,
        sport: sport.map(Sport::from_str).unwrap_or_default(),
        notes,
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let athlete =
        Athlete::create(&conn, &data).map_err(|e| format!("Failed to create athlete: {}", e))?;

    tracing::info!(id = athlete.id, sport = athlete.sport.as_str(), "athlete registered");

    Ok(AthleteSavedResponse {
        id: athlete.id,
        age: athlete.age_on(today()),
        name: athlete.name,
        sport: athlete.sport.as_str().to_string(),
        updated_at: athlete.updated_at,
    })
}

/// Get an athlete with a summary of their evaluation history
pub fn get_athlete(db: &Database, id: i64) -> Result<Option<AthleteDetail>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let athlete = match Athlete::get_by_id(&conn, id)
        .map_err(|e| format!("Failed to get athlete: {}", e))?
    {
        Some(a) => a,
        None => return Ok(None),
    };

    let evaluations = Evaluation::list_for_athlete(&conn, id)
        .map_err(|e| format!("Failed to list evaluations: {}", e))?;
    let latest = evaluations.first();

    Ok(Some(AthleteDetail {
        id: athlete.id,
        age: athlete.age_on(today()),
        name: athlete.name,
        birth_date: athlete.birth_date,
        gender: athlete.gender.as_str().to_string(),
        sport: athlete.sport.as_str().to_string(),
        sport_display: athlete.sport.display_name().to_string(),
        notes: athlete.notes,
        evaluation_count: evaluations.len(),
        latest_score: latest.map(|e| e.score),
        latest_status: latest.map(|e| e.status.as_str().to_string()),
        created_at: athlete.created_at,
        updated_at: athlete.updated_at,
    }))
}

/// List athletes, optionally by sport, or search by name
pub fn list_athletes(
    db: &Database,
    sport: Option<&str>,
    query: Option<&str>,
) -> Result<ListAthletesResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let athletes = match query {
        Some(q) if !q.trim().is_empty() => Athlete::search(&conn, q.trim())
            .map_err(|e| format!("Failed to search athletes: {}", e))?,
        _ => Athlete::list(&conn, sport.map(Sport::from_str))
            .map_err(|e| format!("Failed to list athletes: {}", e))?,
    };

    let summaries: Vec<AthleteSummary> = athletes.iter().map(AthleteSummary::from).collect();
    let total = summaries.len();

    Ok(ListAthletesResponse {
        athletes: summaries,
        total,
    })
}

/// Update athlete details
pub fn update_athlete(
    db: &Database,
    id: i64,
    name: Option<String>,
    birth_date: Option<String>,
    gender: Option<&str>,
    sport: Option<&str>,
    notes: Option<String>,
) -> Result<AthleteSavedResponse, String> {
    if let Some(ref date) = birth_date {
        check_birth_date(date)?;
    }
    if matches!(name, Some(ref n) if n.trim().is_empty()) {
        return Err("Athlete name cannot be empty".to_string());
    }

    let data = AthleteUpdate {
        name: name.map(|n| n.trim().to_string()),
        birth_date: birth_date.map(|d| d.trim().to_string()),
        gender: gender.map(parse_gender).transpose()?,
        sport: sport.map(Sport::from_str),
        notes,
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let updated = Athlete::update(&conn, id, &data)
        .map_err(|e| format!("Failed to update athlete: {}", e))?;

    match updated {
        Some(athlete) => Ok(AthleteSavedResponse {
            id: athlete.id,
            age: athlete.age_on(today()),
            name: athlete.name,
            sport: athlete.sport.as_str().to_string(),
            updated_at: athlete.updated_at,
        }),
        None => Err(format!("Athlete not found with id: {}", id)),
    }
}

/// Delete an athlete; requires force when evaluations would be deleted with them
pub fn delete_athlete(
    db: &Database,
    id: i64,
    force: bool,
) -> Result<Result<DeleteAthleteSuccessResponse, DeleteAthleteBlockedResponse>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    if Athlete::get_by_id(&conn, id)
        .map_err(|e| format!("Database error: {}", e))?
        .is_none()
    {
        return Err(format!("Athlete not found with id: {}", id));
    }

    let evaluation_count = Evaluation::list_for_athlete(&conn, id)
        .map_err(|e| format!("Failed to list evaluations: {}", e))?
        .len();

    if evaluation_count > 0 && !force {
        return Ok(Err(DeleteAthleteBlockedResponse {
            error: format!(
                "Athlete has {} evaluation(s) that would be deleted too. Pass force=true to confirm.",
                evaluation_count
            ),
            requires_force: true,
            evaluation_count,
        }));
    }

    Athlete::delete(&conn, id).map_err(|e| format!("Failed to delete athlete: {}", e))?;
    tracing::info!(id, evaluation_count, "athlete deleted");

    Ok(Ok(DeleteAthleteSuccessResponse {
        success: true,
        deleted_id: id,
        deleted_evaluations: evaluation_count,
    }))
}
