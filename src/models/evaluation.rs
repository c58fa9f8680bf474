//! Evaluation model
//!
//! One stored ABCD assessment: the four input records as submitted, the
//! demographic context they were scored with, and the composite result.
//! Records and the result are kept as JSON so they can be re-scored later.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use super::athlete::conversion_error;
use super::{AbcdRecords, Gender, NutritionalStatus, OverallAssessment};
use crate::db::{DbError, DbResult};

/// A stored evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    pub id: i64,
    pub athlete_id: i64,
    pub evaluated_at: String,
    pub age: u32,
    pub gender: Gender,
    pub records: AbcdRecords,
    pub score: u8,
    pub status: NutritionalStatus,
    pub assessment: OverallAssessment,
    pub notes: Option<String>,
    pub created_at: String,
}

/// Data for storing a new evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationCreate {
    pub athlete_id: i64,
    pub evaluated_at: String,
    pub age: u32,
    pub gender: Gender,
    pub records: AbcdRecords,
    pub assessment: OverallAssessment,
    pub notes: Option<String>,
}

/// Compact listing row without the JSON payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationSummary {
    pub id: i64,
    pub athlete_id: i64,
    pub evaluated_at: String,
    pub score: u8,
    pub status: NutritionalStatus,
}

fn parse_status(row: &Row, column: &str) -> rusqlite::Result<NutritionalStatus> {
    let s: String = row.get(column)?;
    NutritionalStatus::from_str(&s)
        .ok_or_else(|| conversion_error(row, column, format!("invalid status '{}'", s)))
}

fn parse_json<T: serde::de::DeserializeOwned>(row: &Row, column: &str) -> rusqlite::Result<T> {
    let s: String = row.get(column)?;
    serde_json::from_str(&s).map_err(|e| conversion_error(row, column, e.to_string()))
}

impl Evaluation {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let gender_str: String = row.get("gender")?;
        let gender = Gender::from_str(&gender_str)
            .ok_or_else(|| conversion_error(row, "gender", format!("invalid gender '{}'", gender_str)))?;

        Ok(Self {
            id: row.get("id")?,
            athlete_id: row.get("athlete_id")?,
            evaluated_at: row.get("evaluated_at")?,
            age: row.get("age")?,
            gender,
            records: parse_json(row, "records_json")?,
            score: row.get("score")?,
            status: parse_status(row, "status")?,
            assessment: parse_json(row, "assessment_json")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
        })
    }

    pub fn summary(&self) -> EvaluationSummary {
        EvaluationSummary {
            id: self.id,
            athlete_id: self.athlete_id,
            evaluated_at: self.evaluated_at.clone(),
            score: self.score,
            status: self.status,
        }
    }

    /// Store a new evaluation
    pub fn create(conn: &Connection, data: &EvaluationCreate) -> DbResult<Self> {
        let records_json = serde_json::to_string(&data.records)?;
        let assessment_json = serde_json::to_string(&data.assessment)?;

        conn.execute(
            r#"
            INSERT INTO evaluations (
                athlete_id, evaluated_at, age, gender,
                records_json, score, status, assessment_json, notes
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                data.athlete_id,
                data.evaluated_at,
                data.age,
                data.gender.as_str(),
                records_json,
                data.assessment.score,
                data.assessment.status.as_str(),
                assessment_json,
                data.notes,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| DbError::NotFound(format!("Evaluation {}", id)))
    }

    /// Get an evaluation by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM evaluations WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(evaluation) => Ok(Some(evaluation)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Evaluations of one athlete, most recent first
    pub fn list_for_athlete(conn: &Connection, athlete_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM evaluations WHERE athlete_id = ?1 ORDER BY evaluated_at DESC, id DESC",
        )?;
        let evaluations = stmt
            .query_map([athlete_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(evaluations)
    }

    /// All evaluations, most recent first
    pub fn list(conn: &Connection, limit: Option<u32>) -> DbResult<Vec<Self>> {
        let mut stmt =
            conn.prepare("SELECT * FROM evaluations ORDER BY evaluated_at DESC, id DESC LIMIT ?1")?;
        // SQLite treats a negative LIMIT as unbounded
        let limit = limit.map_or(-1, i64::from);
        let evaluations = stmt
            .query_map([limit], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(evaluations)
    }

    /// Replace the stored composite result after re-scoring
    pub fn update_assessment(
        conn: &Connection,
        id: i64,
        assessment: &OverallAssessment,
    ) -> DbResult<Option<Self>> {
        let assessment_json = serde_json::to_string(assessment)?;
        conn.execute(
            r#"
            UPDATE evaluations SET
                score = ?1,
                status = ?2,
                assessment_json = ?3
            WHERE id = ?4
            "#,
            params![assessment.score, assessment.status.as_str(), assessment_json, id],
        )?;

        Self::get_by_id(conn, id)
    }

    /// Delete an evaluation
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM evaluations WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }

    pub fn count(conn: &Connection) -> DbResult<i64> {
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM evaluations", [], |row| row.get(0))?;
        Ok(count)
    }
}
