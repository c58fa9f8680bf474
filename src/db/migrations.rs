//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
    }

    Ok(())
}

/// Migration v1: athletes and their evaluations
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- ATHLETES
        -- Demographic context for evaluations
        -- ============================================
        CREATE TABLE athletes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            birth_date TEXT NOT NULL,            -- ISO date: "2012-05-30"
            gender TEXT NOT NULL CHECK(gender IN ('male', 'female')),
            sport TEXT NOT NULL DEFAULT 'other',
            notes TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_athletes_name ON athletes(name);
        CREATE INDEX idx_athletes_sport ON athletes(sport);

        -- ============================================
        -- EVALUATIONS
        -- One ABCD assessment: raw records plus the composite result
        -- ============================================
        CREATE TABLE evaluations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            athlete_id INTEGER NOT NULL REFERENCES athletes(id) ON DELETE CASCADE,
            evaluated_at TEXT NOT NULL,          -- ISO date
            age INTEGER NOT NULL,                -- years, at evaluated_at
            gender TEXT NOT NULL CHECK(gender IN ('male', 'female')),

            -- Input records, JSON encoded AbcdRecords
            records_json TEXT NOT NULL,

            -- Composite result
            score INTEGER NOT NULL CHECK(score BETWEEN 0 AND 100),
            status TEXT NOT NULL CHECK(status IN ('optimal', 'adequate', 'at-risk', 'deficient')),
            assessment_json TEXT NOT NULL,

            notes TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_evaluations_athlete ON evaluations(athlete_id);
        CREATE INDEX idx_evaluations_date ON evaluations(evaluated_at);
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(needs_migration(&conn).is_ok());

        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
        assert!(!needs_migration(&conn).unwrap());
    }
}
