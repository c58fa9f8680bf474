//! Athlete model
//!
//! The person being evaluated. Supplies the gender, sport and birth date the
//! calculators need.

use chrono::{Datelike, NaiveDate};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use super::{Gender, Sport};
use crate::db::{DbError, DbResult};

/// An athlete record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Athlete {
    pub id: i64,
    pub name: String,
    pub birth_date: String,
    pub gender: Gender,
    pub sport: Sport,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a new athlete
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AthleteCreate {
    pub name: String,
    pub birth_date: String,
    pub gender: Gender,
    pub sport: Sport,
    pub notes: Option<String>,
}

/// Data for updating an athlete
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AthleteUpdate {
    pub name: Option<String>,
    pub birth_date: Option<String>,
    pub gender: Option<Gender>,
    pub sport: Option<Sport>,
    pub notes: Option<String>,
}

/// Parse an ISO `YYYY-MM-DD` date
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Completed years between `birth` and `on`; `None` if `on` precedes `birth`
pub fn age_on(birth: NaiveDate, on: NaiveDate) -> Option<u32> {
    if on < birth {
        return None;
    }
    let mut years = on.year() - birth.year();
    if (on.month(), on.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}

/// Map an unparseable text column to a conversion error
pub(crate) fn conversion_error(row: &Row, column: &str, message: String) -> rusqlite::Error {
    match row.as_ref().column_index(column) {
        Ok(index) => rusqlite::Error::FromSqlConversionFailure(index, Type::Text, message.into()),
        Err(e) => e,
    }
}

impl Athlete {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let gender_str: String = row.get("gender")?;
        let gender = Gender::from_str(&gender_str)
            .ok_or_else(|| conversion_error(row, "gender", format!("invalid gender '{}'", gender_str)))?;

        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            birth_date: row.get("birth_date")?,
            gender,
            sport: Sport::from_str(&row.get::<_, String>("sport")?),
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Age in whole years on the given date
    pub fn age_on(&self, date: NaiveDate) -> Option<u32> {
        parse_date(&self.birth_date).and_then(|birth| age_on(birth, date))
    }

    /// Create a new athlete
    pub fn create(conn: &Connection, data: &AthleteCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO athletes (name, birth_date, gender, sport, notes)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                data.name,
                data.birth_date,
                data.gender.as_str(),
                data.sport.as_str(),
                data.notes,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| DbError::NotFound(format!("Athlete {}", id)))
    }

    /// Get an athlete by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM athletes WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(athlete) => Ok(Some(athlete)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List athletes, optionally filtered by sport
    pub fn list(conn: &Connection, sport: Option<Sport>) -> DbResult<Vec<Self>> {
        let athletes = match sport {
            Some(sport) => {
                let mut stmt =
                    conn.prepare("SELECT * FROM athletes WHERE sport = ?1 ORDER BY name")?;
                let rows = stmt
                    .query_map([sport.as_str()], Self::from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
            None => {
                let mut stmt = conn.prepare("SELECT * FROM athletes ORDER BY name")?;
                let rows = stmt
                    .query_map([], Self::from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
        };

        Ok(athletes)
    }

    /// Search athletes by name
    pub fn search(conn: &Connection, query: &str) -> DbResult<Vec<Self>> {
        let pattern = format!("%{}%", query);
        let mut stmt = conn.prepare("SELECT * FROM athletes WHERE name LIKE ?1 ORDER BY name")?;
        let athletes = stmt
            .query_map([&pattern], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(athletes)
    }

    /// Update an athlete
    pub fn update(conn: &Connection, id: i64, data: &AthleteUpdate) -> DbResult<Option<Self>> {
        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref name) = data.name {
            updates.push(format!("name = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(name.clone()));
        }
        if let Some(ref birth_date) = data.birth_date {
            updates.push(format!("birth_date = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(birth_date.clone()));
        }
        if let Some(gender) = data.gender {
            updates.push(format!("gender = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(gender.as_str().to_string()));
        }
        if let Some(sport) = data.sport {
            updates.push(format!("sport = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(sport.as_str().to_string()));
        }
        if let Some(ref notes) = data.notes {
            updates.push(format!("notes = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(notes.clone()));
        }

        if updates.is_empty() {
            return Self::get_by_id(conn, id);
        }

        updates.push("updated_at = datetime('now')".to_string());

        let sql = format!(
            "UPDATE athletes SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len() + 1
        );

        params_vec.push(Box::new(id));

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        Self::get_by_id(conn, id)
    }

    /// Delete an athlete; their evaluations go with them
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM athletes WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }

    pub fn count(conn: &Connection) -> DbResult<i64> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM athletes", [], |row| row.get(0))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn sample(name: &str, sport: Sport) -> AthleteCreate {
        AthleteCreate {
            name: name.to_string(),
            birth_date: "2012-05-30".to_string(),
            gender: Gender::Male,
            sport,
            notes: None,
        }
    }

    #[test]
    fn test_age_on() {
        let birth = NaiveDate::from_ymd_opt(2012, 5, 30).unwrap();
        assert_eq!(age_on(birth, NaiveDate::from_ymd_opt(2024, 5, 29).unwrap()), Some(11));
        assert_eq!(age_on(birth, NaiveDate::from_ymd_opt(2024, 5, 30).unwrap()), Some(12));
        assert_eq!(age_on(birth, NaiveDate::from_ymd_opt(2011, 1, 1).unwrap()), None);
        assert!(parse_date("30/05/2012").is_none());
    }

    #[test]
    fn test_create_and_get() {
        let conn = setup();
        let athlete = Athlete::create(&conn, &sample("Diego", Sport::Futbol)).unwrap();
        assert_eq!(athlete.name, "Diego");
        assert_eq!(athlete.sport, Sport::Futbol);

        let fetched = Athlete::get_by_id(&conn, athlete.id).unwrap().unwrap();
        assert_eq!(fetched.gender, Gender::Male);
        assert_eq!(fetched.age_on(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()), Some(12));

        assert!(Athlete::get_by_id(&conn, 999).unwrap().is_none());
    }

    #[test]
    fn test_list_filter_and_search() {
        let conn = setup();
        Athlete::create(&conn, &sample("Lucía", Sport::Natacion)).unwrap();
        Athlete::create(&conn, &sample("Mateo", Sport::Futbol)).unwrap();
        Athlete::create(&conn, &sample("Ana", Sport::Futbol)).unwrap();

        assert_eq!(Athlete::list(&conn, None).unwrap().len(), 3);
        let futbol = Athlete::list(&conn, Some(Sport::Futbol)).unwrap();
        assert_eq!(futbol.len(), 2);
        assert_eq!(futbol[0].name, "Ana");

        assert_eq!(Athlete::search(&conn, "ate").unwrap().len(), 1);
        assert_eq!(Athlete::count(&conn).unwrap(), 3);
    }

    #[test]
    fn test_update_and_delete() {
        let conn = setup();
        let athlete = Athlete::create(&conn, &sample("Sofía", Sport::Other)).unwrap();

        let update = AthleteUpdate {
            sport: Some(Sport::Tenis),
            gender: Some(Gender::Female),
            ..Default::default()
        };
        let updated = Athlete::update(&conn, athlete.id, &update).unwrap().unwrap();
        assert_eq!(updated.sport, Sport::Tenis);
        assert_eq!(updated.gender, Gender::Female);
        assert_eq!(updated.name, "Sofía");

        assert!(Athlete::delete(&conn, athlete.id).unwrap());
        assert!(!Athlete::delete(&conn, athlete.id).unwrap());
    }
}
