//! Re-score stored evaluations with the current composite evaluator
//! Usage: cargo run --bin recompute_evaluations -- [athlete_id] [--percentile] [--per-kg]

use nutriabcd::abcd::{EvaluationOptions, PediatricBmiMode, ProteinBasis};
use nutriabcd::{config, db, tools};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut athlete_id = None;
    let mut options = EvaluationOptions::default();

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--percentile" => options.pediatric_bmi = PediatricBmiMode::Percentile,
            "--per-kg" => options.protein_basis = ProteinBasis::PerKg,
            other => athlete_id = Some(other.parse::<i64>()?),
        }
    }

    let db_path = config::database_path();
    println!("Database: {}", db_path.display());

    let database = db::Database::new(&db_path)?;
    database.with_conn(|conn| {
        db::migrations::run_migrations(conn)?;
        Ok(())
    })?;

    let result = tools::evaluations::recompute_evaluations(&database, athlete_id, options)?;

    println!("Processed {} evaluations", result.processed);
    for change in &result.changes {
        println!(
            "  Evaluation {}: {} -> {}",
            change.id, change.old_score, change.new_score
        );
    }
    println!("Changed: {}", result.changed);

    Ok(())
}
