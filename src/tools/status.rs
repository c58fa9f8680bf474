//! NutriABCD Status Tool
//!
//! Runtime status of the service and the usage guide served to assistants.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::db::{migrations, Database};
use crate::models::{Athlete, Evaluation};

/// Assessment workflow instructions for AI assistants
pub const ASSESSMENT_INSTRUCTIONS: &str = r#"
# NutriABCD Assessment Instructions

This guide explains how to run an ABCD nutritional assessment for a youth
athlete with the NutriABCD tools.

## Overview

An evaluation covers four domains:
1. **A - Anthropometry** - height, weight, circumferences, skinfolds
2. **B - Biochemistry** - hemoglobin, ferritin, lipids, vitamins
3. **C - Clinical** - vital signs, physical exam, functional status
4. **D - Dietetics** - daily intake, meal pattern, food groups, habits

Each domain can be checked on its own with the calculator tools while data is
being collected. The full evaluation is scored once, when it is submitted.

---

## Workflow

1. Find the athlete with `list_athletes` (use `query` to search by name), or
   register them with `add_athlete` (name, birth_date YYYY-MM-DD, gender, sport)
2. Optionally check individual values with the calculator tools
3. Call `submit_evaluation` with the athlete id and the four records
4. Report the score, status, risk factors, strengths and recommendations

Age is computed from the birth date on the evaluation date. Gender and sport
come from the athlete record, so keep them current with `update_athlete`.

---

## Units

| Field | Unit |
|-------|------|
| height | cm |
| weight, muscle_mass | kg |
| circumferences | cm |
| skinfolds | mm |
| hemoglobin | g/dL |
| ferritin | ng/mL |
| cholesterol, glucose | mg/dL |
| blood pressure | mmHg |
| heart rate | bpm |
| calories | kcal/day |
| protein, carbs, fats, fiber | g/day |
| water | L/day |

Leave a measurement out (or height/weight at 0) when it was not taken. Missing
domains score 0 points; they never cause an error.

---

## Composite Score

The score is the sum of pass/fail checkpoints (max 100):

| Domain | Check | Points |
|--------|-------|--------|
| Anthropometry | BMI classified "Normal" | 25 |
| Biochemistry | iron status normal (hemoglobin and ferritin) | 25 |
| Clinical | BP below 130/85 | 12.5 |
| Clinical | heart rate 60-100 | 12.5 |
| Dietetics | calories 2000-3500 | 8 |
| Dietetics | protein 1.2-2.0 | 8 |
| Dietetics | water at least 2.5 L | 9 |

Status: 85+ optimal, 70+ adequate, 50+ at-risk, otherwise deficient.

A dietetics subtotal under 20 adds "Calidad dietética deficiente" to the risk
factors even when the overall status is optimal. Report both.

### Scoring options

`submit_evaluation` and `recompute_evaluations` accept:
- `pediatric_bmi`: `raw_value` (default) compares the raw BMI against the
  5/15/85/95 cutoffs under 18; `percentile` converts BMI to a growth
  percentile first
- `protein_basis`: `raw_grams` (default) compares reported grams against
  1.2-2.0; `per_kg` divides by body weight first

Use the defaults unless the user asks for the corrected readings.

---

## Notes

- Lipid profile and cardiovascular risk are reported per domain by
  `get_evaluation` but do not change the composite score
- Thresholds are illustrative; this is not a diagnostic system
- Deleting an athlete with evaluations requires `force=true` and deletes the
  evaluations too
"#;

/// Runtime status of the NutriABCD service
#[derive(Debug, Clone, Serialize)]
pub struct NutriAbcdStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub schema_version: Option<i32>,
    pub athlete_count: Option<i64>,
    pub evaluation_count: Option<i64>,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    /// Create a new status tracker
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    /// Get the current status; database figures are `None` if the pool is unavailable
    pub fn get_status(&self, db: &Database) -> NutriAbcdStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let counts = db.with_conn(|conn| {
            Ok((
                migrations::get_schema_version(conn)?,
                Athlete::count(conn)?,
                Evaluation::count(conn)?,
            ))
        });
        let (schema_version, athlete_count, evaluation_count) = match counts {
            Ok((version, athletes, evaluations)) => (Some(version), Some(athletes), Some(evaluations)),
            Err(e) => {
                tracing::warn!(error = %e, "status: database unavailable");
                (None, None, None)
            }
        };

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        NutriAbcdStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            schema_version,
            athlete_count,
            evaluation_count,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
