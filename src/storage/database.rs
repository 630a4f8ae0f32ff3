//! Database operations using rusqlite.

use std::collections::HashSet;
use std::path::Path;

use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, Result as SqliteResult};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::matching::{Athlete, UnmatchedResultRow};
use crate::results::{CompetitionResult, Round};
use crate::storage::schema::{
    CURRENT_VERSION, MIGRATION_V1_TO_V2, MIGRATION_V2_TO_V3, SCHEMA, SCHEMA_VERSION_TABLE,
};
use crate::swimming::{format_event, Gender, SwimStroke};

const RESULT_COLUMNS: &str = "year, tournament_name, event_date, gender, distance_m, stroke, round,
     age, swimmer_name, swimmer_name_norm, team_code, rank, final_time_ms, seed_time_ms, source,
     athlete_id";

/// Outcome of a batched result import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    /// Rows written or refreshed
    pub imported: usize,
    /// Rows in batches that failed
    pub errors: usize,
    pub total: usize,
}

/// Filters for an event ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingQuery {
    pub distance_m: u32,
    pub stroke: SwimStroke,
    pub gender: Gender,
    pub year: Option<i32>,
    pub age_min: Option<u32>,
    pub age_max: Option<u32>,
    pub limit: usize,
}

impl RankingQuery {
    pub fn new(distance_m: u32, stroke: SwimStroke, gender: Gender) -> Self {
        Self {
            distance_m,
            stroke,
            gender,
            year: None,
            age_min: None,
            age_max: None,
            limit: 50,
        }
    }
}

/// One swimmer's best swim in a ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    /// 1-based place in the ranking
    pub position: usize,
    pub result: CompetitionResult,
}

/// Best time per swimmer for one event, fastest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRanking {
    /// e.g. `100m Libre (F)`
    pub event: String,
    pub rankings: Vec<RankedResult>,
}

/// Database wrapper for SQLite operations.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create a database at the given path.
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DatabaseError::IoError(e.to_string()))?;
        }

        let conn =
            Connection::open(path).map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        let db = Self { conn };
        db.initialize()?;

        Ok(db)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        let db = Self { conn };
        db.initialize()?;

        Ok(db)
    }

    fn initialize(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        self.conn
            .execute_batch(SCHEMA_VERSION_TABLE)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

        let current_version = self.get_schema_version()?;

        if current_version < CURRENT_VERSION {
            self.migrate(current_version)?;
        }

        Ok(())
    }

    /// Get the current schema version.
    pub fn get_schema_version(&self) -> Result<i32, DatabaseError> {
        let result: SqliteResult<i32> = self.conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        );

        match result {
            Ok(version) => Ok(version),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
            Err(e) => Err(DatabaseError::QueryFailed(e.to_string())),
        }
    }

    fn migrate(&self, from_version: i32) -> Result<(), DatabaseError> {
        if from_version < 1 {
            self.apply_migration(1, SCHEMA)?;
        }
        if from_version < 2 {
            self.apply_migration(2, MIGRATION_V1_TO_V2)?;
        }
        if from_version < 3 {
            self.apply_migration(3, MIGRATION_V2_TO_V3)?;
        }

        tracing::info!("Database migrated to version {}", CURRENT_VERSION);
        Ok(())
    }

    fn apply_migration(&self, version: i32, sql: &str) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(sql)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

        self.conn
            .execute(
                "INSERT INTO schema_version (version, applied_at) VALUES (?, datetime('now'))",
                [version],
            )
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

        Ok(())
    }

    /// Get a reference to the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    // ========== Roster ==========

    /// Insert an athlete into the roster.
    pub fn insert_athlete(&self, athlete: &Athlete) -> Result<(), DatabaseError> {
        self.conn
            .execute(
                "INSERT INTO athletes (id, first_name, last_name, birth_date, club_id, club_name,
                 active, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    athlete.id.to_string(),
                    athlete.first_name,
                    athlete.last_name,
                    athlete.birth_date.map(|d| d.to_string()),
                    athlete.club_id,
                    athlete.club_name,
                    athlete.active as i32,
                    Utc::now().to_rfc3339(),
                ],
            )
            .map_err(|e| match e {
                rusqlite::Error::SqliteFailure(err, msg)
                    if err.code == rusqlite::ErrorCode::ConstraintViolation =>
                {
                    DatabaseError::ConstraintViolation(msg.unwrap_or_else(|| err.to_string()))
                }
                other => DatabaseError::QueryFailed(other.to_string()),
            })?;

        Ok(())
    }

    /// Get an athlete by ID.
    pub fn get_athlete(&self, id: &Uuid) -> Result<Option<Athlete>, DatabaseError> {
        let result = self.conn.query_row(
            "SELECT id, first_name, last_name, birth_date, club_id, club_name, active
             FROM athletes WHERE id = ?1",
            params![id.to_string()],
            AthleteRow::from_row,
        );

        match result {
            Ok(row) => Ok(Some(row.into_athlete()?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DatabaseError::QueryFailed(e.to_string())),
        }
    }

    /// Active athletes ordered by last then first name, optionally for one club.
    pub fn list_active_athletes(
        &self,
        club_id: Option<&str>,
    ) -> Result<Vec<Athlete>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, first_name, last_name, birth_date, club_id, club_name, active
                 FROM athletes
                 WHERE active = 1 AND (?1 IS NULL OR club_id = ?1)
                 ORDER BY last_name, first_name",
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let rows = stmt
            .query_map(params![club_id], AthleteRow::from_row)
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut athletes = Vec::new();
        for row in rows {
            let row = row.map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
            athletes.push(row.into_athlete()?);
        }

        Ok(athletes)
    }

    // ========== Competition results ==========

    /// Insert or refresh results in transactions of `batch_size` rows.
    ///
    /// Rows are keyed on year, tournament, swimmer, distance, stroke and
    /// final time. A failing batch is rolled back and counted as errors;
    /// later batches still run. An existing athlete link is never cleared.
    pub fn upsert_results(
        &mut self,
        results: &[CompetitionResult],
        batch_size: usize,
    ) -> Result<ImportSummary, DatabaseError> {
        let mut summary = ImportSummary {
            total: results.len(),
            ..Default::default()
        };

        for (index, batch) in results.chunks(batch_size.max(1)).enumerate() {
            match self.upsert_batch(batch) {
                Ok(()) => summary.imported += batch.len(),
                Err(e) => {
                    tracing::warn!("Error importing batch {}: {}", index, e);
                    summary.errors += batch.len();
                }
            }
        }

        tracing::info!(
            "Imported {} of {} result(s), {} error(s)",
            summary.imported,
            summary.total,
            summary.errors
        );
        Ok(summary)
    }

    fn upsert_batch(&mut self, batch: &[CompetitionResult]) -> Result<(), DatabaseError> {
        let tx = self
            .conn
            .transaction()
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;
        let now = Utc::now().to_rfc3339();

        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO competition_results (year, tournament_name, event_date, gender,
                     distance_m, stroke, round, age, swimmer_name, swimmer_name_norm, team_code,
                     rank, final_time_ms, seed_time_ms, source, athlete_id, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)
                     ON CONFLICT(year, tournament_name, swimmer_name, distance_m, stroke, final_time_ms)
                     DO UPDATE SET
                        event_date = excluded.event_date,
                        gender = excluded.gender,
                        round = excluded.round,
                        age = excluded.age,
                        swimmer_name_norm = excluded.swimmer_name_norm,
                        team_code = excluded.team_code,
                        rank = excluded.rank,
                        seed_time_ms = excluded.seed_time_ms,
                        source = excluded.source,
                        athlete_id = COALESCE(excluded.athlete_id, athlete_id)",
                )
                .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

            for r in batch {
                stmt.execute(params![
                    r.year.unwrap_or(0),
                    r.tournament_name,
                    r.event_date.map(|d| d.to_string()),
                    r.gender.as_str(),
                    r.distance_m,
                    r.stroke.as_str(),
                    r.round.map(|round| round.as_str()),
                    r.age,
                    r.swimmer_name,
                    r.swimmer_name_norm,
                    r.team_code,
                    r.rank,
                    r.final_time_ms,
                    r.seed_time_ms,
                    r.source,
                    r.athlete_id.map(|id| id.to_string()),
                    now,
                ])
                .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
            }
        }

        tx.commit()
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))
    }

    /// Results linked to an athlete, oldest first.
    pub fn results_for_athlete(
        &self,
        athlete_id: &Uuid,
    ) -> Result<Vec<CompetitionResult>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {RESULT_COLUMNS} FROM competition_results WHERE athlete_id = ?1
                 ORDER BY event_date, id"
            ))
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let rows = stmt
            .query_map(params![athlete_id.to_string()], ResultRow::from_row)
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut results = Vec::new();
        for row in rows {
            let row = row.map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
            results.push(row.into_result()?);
        }

        Ok(results)
    }

    /// Best time per swimmer for one event.
    ///
    /// Swimmers are told apart by normalised name. Equal times keep import order.
    pub fn rankings(&self, query: &RankingQuery) -> Result<EventRanking, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {RESULT_COLUMNS} FROM competition_results
                 WHERE distance_m = ?1 AND stroke = ?2 AND gender = ?3
                   AND (?4 IS NULL OR year = ?4)
                   AND (?5 IS NULL OR age >= ?5)
                   AND (?6 IS NULL OR age <= ?6)
                 ORDER BY final_time_ms, id"
            ))
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let rows = stmt
            .query_map(
                params![
                    query.distance_m,
                    query.stroke.as_str(),
                    query.gender.as_str(),
                    query.year,
                    query.age_min,
                    query.age_max,
                ],
                ResultRow::from_row,
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut seen = HashSet::new();
        let mut rankings = Vec::new();
        for row in rows {
            if rankings.len() >= query.limit {
                break;
            }
            let row = row.map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
            if !seen.insert(row.swimmer_name_norm.clone()) {
                continue;
            }
            rankings.push(RankedResult {
                position: rankings.len() + 1,
                result: row.into_result()?,
            });
        }

        Ok(EventRanking {
            event: format!(
                "{} ({})",
                format_event(query.distance_m, query.stroke),
                query.gender.as_str()
            ),
            rankings,
        })
    }

    /// Result rows without an athlete link, optionally for one team.
    pub fn unmatched_result_rows(
        &self,
        team_code: Option<&str>,
    ) -> Result<Vec<UnmatchedResultRow>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT swimmer_name, swimmer_name_norm, gender, team_code
                 FROM competition_results
                 WHERE athlete_id IS NULL AND (?1 IS NULL OR team_code = ?1)
                 ORDER BY id",
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let rows = stmt
            .query_map(params![team_code], |row| {
                Ok(UnmatchedResultRow {
                    swimmer_name: row.get(0)?,
                    swimmer_name_norm: row.get(1)?,
                    gender: row.get(2)?,
                    team_code: row.get(3)?,
                })
            })
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        rows.collect::<SqliteResult<Vec<_>>>()
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))
    }

    /// Link every unlinked result with this normalised name. Returns rows updated.
    pub fn link_results_to_athlete(
        &self,
        swimmer_name_norm: &str,
        athlete_id: &Uuid,
    ) -> Result<usize, DatabaseError> {
        link_results(&self.conn, swimmer_name_norm, athlete_id)
    }

    /// Count results with (`linked`) or without an athlete link.
    pub fn count_results(&self, linked: bool) -> Result<usize, DatabaseError> {
        count_results(&self.conn, linked)
    }
}

pub(crate) fn link_results(
    conn: &Connection,
    swimmer_name_norm: &str,
    athlete_id: &Uuid,
) -> Result<usize, DatabaseError> {
    let updated = conn
        .execute(
            "UPDATE competition_results SET athlete_id = ?1
             WHERE swimmer_name_norm = ?2 AND athlete_id IS NULL",
            params![athlete_id.to_string(), swimmer_name_norm],
        )
        .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

    tracing::debug!("Linked {} result(s) for '{}'", updated, swimmer_name_norm);
    Ok(updated)
}

pub(crate) fn count_results(conn: &Connection, linked: bool) -> Result<usize, DatabaseError> {
    let sql = if linked {
        "SELECT COUNT(*) FROM competition_results WHERE athlete_id IS NOT NULL"
    } else {
        "SELECT COUNT(*) FROM competition_results WHERE athlete_id IS NULL"
    };
    let count: i64 = conn
        .query_row(sql, [], |row| row.get(0))
        .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

    Ok(count as usize)
}

pub(crate) fn parse_uuid(raw: &str) -> Result<Uuid, DatabaseError> {
    Uuid::parse_str(raw)
        .map_err(|e| DatabaseError::DeserializationError(format!("Invalid UUID: {}", e)))
}

fn parse_date(raw: Option<String>) -> Result<Option<NaiveDate>, DatabaseError> {
    raw.map(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d"))
        .transpose()
        .map_err(|e| DatabaseError::DeserializationError(format!("Invalid date: {}", e)))
}

/// Intermediate struct for reading athlete rows from database.
struct AthleteRow {
    id: String,
    first_name: String,
    last_name: String,
    birth_date: Option<String>,
    club_id: Option<String>,
    club_name: Option<String>,
    active: i32,
}

impl AthleteRow {
    fn from_row(row: &rusqlite::Row<'_>) -> SqliteResult<Self> {
        Ok(Self {
            id: row.get(0)?,
            first_name: row.get(1)?,
            last_name: row.get(2)?,
            birth_date: row.get(3)?,
            club_id: row.get(4)?,
            club_name: row.get(5)?,
            active: row.get(6)?,
        })
    }

    fn into_athlete(self) -> Result<Athlete, DatabaseError> {
        Ok(Athlete {
            id: parse_uuid(&self.id)?,
            first_name: self.first_name,
            last_name: self.last_name,
            birth_date: parse_date(self.birth_date)?,
            club_id: self.club_id,
            club_name: self.club_name,
            active: self.active != 0,
        })
    }
}

/// Intermediate struct for reading competition result rows from database.
struct ResultRow {
    year: i32,
    tournament_name: String,
    event_date: Option<String>,
    gender: String,
    distance_m: u32,
    stroke: String,
    round: Option<String>,
    age: Option<u32>,
    swimmer_name: String,
    swimmer_name_norm: String,
    team_code: Option<String>,
    rank: Option<u32>,
    final_time_ms: i64,
    seed_time_ms: Option<i64>,
    source: String,
    athlete_id: Option<String>,
}

impl ResultRow {
    fn from_row(row: &rusqlite::Row<'_>) -> SqliteResult<Self> {
        Ok(Self {
            year: row.get(0)?,
            tournament_name: row.get(1)?,
            event_date: row.get(2)?,
            gender: row.get(3)?,
            distance_m: row.get(4)?,
            stroke: row.get(5)?,
            round: row.get(6)?,
            age: row.get(7)?,
            swimmer_name: row.get(8)?,
            swimmer_name_norm: row.get(9)?,
            team_code: row.get(10)?,
            rank: row.get(11)?,
            final_time_ms: row.get(12)?,
            seed_time_ms: row.get(13)?,
            source: row.get(14)?,
            athlete_id: row.get(15)?,
        })
    }

    fn into_result(self) -> Result<CompetitionResult, DatabaseError> {
        let gender = Gender::from_str(&self.gender).ok_or_else(|| {
            DatabaseError::DeserializationError(format!("Invalid gender: {}", self.gender))
        })?;
        let stroke = SwimStroke::from_str(&self.stroke).ok_or_else(|| {
            DatabaseError::DeserializationError(format!("Invalid stroke: {}", self.stroke))
        })?;

        Ok(CompetitionResult {
            year: (self.year != 0).then_some(self.year),
            tournament_name: self.tournament_name,
            event_date: parse_date(self.event_date)?,
            gender,
            distance_m: self.distance_m,
            stroke,
            round: self.round.as_deref().and_then(Round::from_str),
            age: self.age,
            swimmer_name: self.swimmer_name,
            swimmer_name_norm: self.swimmer_name_norm,
            team_code: self.team_code,
            rank: self.rank,
            final_time_ms: self.final_time_ms,
            seed_time_ms: self.seed_time_ms,
            source: self.source,
            athlete_id: self.athlete_id.as_deref().map(parse_uuid).transpose()?,
        })
    }
}

/// Database errors.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::SOURCE_FEDERATION_EXPORT;

    fn result(name: &str, time_ms: i64) -> CompetitionResult {
        CompetitionResult {
            year: Some(2025),
            tournament_name: "Copa Invierno".to_string(),
            event_date: NaiveDate::from_ymd_opt(2025, 6, 11),
            gender: Gender::Female,
            distance_m: 100,
            stroke: SwimStroke::Free,
            round: Some(Round::Final),
            age: Some(14),
            swimmer_name: name.to_string(),
            swimmer_name_norm: crate::matching::normalize_name(name),
            team_code: Some("DEL".to_string()),
            rank: Some(1),
            final_time_ms: time_ms,
            seed_time_ms: None,
            source: SOURCE_FEDERATION_EXPORT.to_string(),
            athlete_id: None,
        }
    }

    #[test]
    fn test_create_in_memory_database() {
        let db = Database::open_in_memory().expect("Failed to create database");
        let version = db.get_schema_version().expect("Failed to get version");
        assert_eq!(version, CURRENT_VERSION);
    }

    #[test]
    fn test_tables_created() {
        let db = Database::open_in_memory().expect("Failed to create database");

        let tables: Vec<String> = db
            .conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(tables.contains(&"athletes".to_string()));
        assert!(tables.contains(&"competition_results".to_string()));
        assert!(tables.contains(&"athlete_external_mappings".to_string()));
        assert!(tables.contains(&"club_external_mappings".to_string()));
    }

    #[test]
    fn test_reopen_keeps_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("sportia.db");

        let db = Database::open(&path).unwrap();
        db.insert_athlete(&Athlete::new("Ana", "Sol")).unwrap();
        drop(db);

        let db = Database::open(&path).unwrap();
        assert_eq!(db.get_schema_version().unwrap(), CURRENT_VERSION);
        assert_eq!(db.list_active_athletes(None).unwrap().len(), 1);
    }

    #[test]
    fn test_version_two_database_gains_club_mappings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sportia.db");

        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(SCHEMA_VERSION_TABLE).unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        conn.execute_batch(MIGRATION_V1_TO_V2).unwrap();
        conn.execute_batch(
            "INSERT INTO schema_version (version, applied_at) VALUES (1, datetime('now'));
             INSERT INTO schema_version (version, applied_at) VALUES (2, datetime('now'));",
        )
        .unwrap();
        drop(conn);

        let db = Database::open(&path).unwrap();
        assert_eq!(db.get_schema_version().unwrap(), 3);

        let count: i64 = db
            .conn
            .query_row("SELECT COUNT(*) FROM club_external_mappings", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_roster_filters() {
        let db = Database::open_in_memory().unwrap();

        let mut ana = Athlete::new("Ana", "Sol");
        ana.club_id = Some("club-a".to_string());
        ana.birth_date = NaiveDate::from_ymd_opt(2011, 2, 3);
        let mut bea = Athlete::new("Bea", "Mar");
        bea.club_id = Some("club-b".to_string());
        let mut old = Athlete::new("Carla", "Ríos");
        old.active = false;

        for a in [&ana, &bea, &old] {
            db.insert_athlete(a).unwrap();
        }

        let all = db.list_active_athletes(None).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].last_name, "Mar");

        let club_a = db.list_active_athletes(Some("club-a")).unwrap();
        assert_eq!(club_a, vec![ana.clone()]);

        assert_eq!(db.get_athlete(&ana.id).unwrap(), Some(ana));
        assert_eq!(db.get_athlete(&Uuid::new_v4()).unwrap(), None);
    }

    #[test]
    fn test_duplicate_athlete_is_constraint_violation() {
        let db = Database::open_in_memory().unwrap();
        let ana = Athlete::new("Ana", "Sol");
        db.insert_athlete(&ana).unwrap();
        assert!(matches!(
            db.insert_athlete(&ana),
            Err(DatabaseError::ConstraintViolation(_))
        ));
    }

    #[test]
    fn test_upsert_is_idempotent() {
        let mut db = Database::open_in_memory().unwrap();
        let results = vec![
            result("Ana Sol", 65_430),
            result("Bea Mar", 66_000),
            result("Ana Sol", 64_000),
        ];

        let summary = db.upsert_results(&results, 2).unwrap();
        assert_eq!(
            summary,
            ImportSummary {
                imported: 3,
                errors: 0,
                total: 3
            }
        );

        db.upsert_results(&results, 500).unwrap();
        assert_eq!(db.count_results(false).unwrap(), 3);
    }

    #[test]
    fn test_upsert_keeps_existing_link() {
        let mut db = Database::open_in_memory().unwrap();
        let ana = Athlete::new("Ana", "Sol");
        db.insert_athlete(&ana).unwrap();

        db.upsert_results(&[result("Ana Sol", 65_430)], 500).unwrap();
        assert_eq!(db.link_results_to_athlete("ana sol", &ana.id).unwrap(), 1);

        db.upsert_results(&[result("Ana Sol", 65_430)], 500).unwrap();
        let linked = db.results_for_athlete(&ana.id).unwrap();
        assert_eq!(linked.len(), 1);
        assert_eq!(linked[0].athlete_id, Some(ana.id));
        assert_eq!(linked[0].round, Some(Round::Final));
    }

    #[test]
    fn test_failed_batch_counts_errors() {
        let mut db = Database::open_in_memory().unwrap();
        let mut orphan = result("Bea Mar", 70_000);
        orphan.athlete_id = Some(Uuid::new_v4());

        let results = vec![result("Ana Sol", 65_430), orphan];
        let summary = db.upsert_results(&results, 1).unwrap();
        assert_eq!(summary.imported, 1);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.total, 2);
    }

    #[test]
    fn test_rankings_keep_best_time_per_swimmer() {
        let mut db = Database::open_in_memory().unwrap();
        let mut older = result("Bea Mar", 64_500);
        older.year = Some(2024);
        older.age = Some(13);
        let mut other_event = result("Carla Ríos", 60_000);
        other_event.stroke = SwimStroke::Back;
        let mut male = result("José Pérez", 58_000);
        male.gender = Gender::Male;
        db.upsert_results(
            &[
                result("Ana Sol", 66_000),
                result("ANA SOL", 65_430),
                result("Bea Mar", 66_100),
                older,
                other_event,
                male,
            ],
            500,
        )
        .unwrap();

        let query = RankingQuery::new(100, SwimStroke::Free, Gender::Female);
        let ranking = db.rankings(&query).unwrap();
        assert_eq!(ranking.event, "100m Libre (F)");
        let board: Vec<(usize, &str, i64)> = ranking
            .rankings
            .iter()
            .map(|r| (r.position, r.result.swimmer_name_norm.as_str(), r.result.final_time_ms))
            .collect();
        assert_eq!(board, vec![(1, "bea mar", 64_500), (2, "ana sol", 65_430)]);

        let this_year = db
            .rankings(&RankingQuery {
                year: Some(2025),
                ..query.clone()
            })
            .unwrap();
        assert_eq!(this_year.rankings[0].result.final_time_ms, 65_430);
        assert_eq!(this_year.rankings[1].result.final_time_ms, 66_100);

        let older_only = db
            .rankings(&RankingQuery {
                age_max: Some(13),
                ..query.clone()
            })
            .unwrap();
        assert_eq!(older_only.rankings.len(), 1);

        let top = db.rankings(&RankingQuery { limit: 1, ..query }).unwrap();
        assert_eq!(top.rankings.len(), 1);
        assert_eq!(top.rankings[0].position, 1);
    }

    #[test]
    fn test_unmatched_rows_by_team() {
        let mut db = Database::open_in_memory().unwrap();
        let mut other = result("Bea Mar", 66_000);
        other.team_code = Some("TIB".to_string());
        db.upsert_results(&[result("Ana Sol", 65_430), other], 500).unwrap();

        assert_eq!(db.unmatched_result_rows(None).unwrap().len(), 2);
        let tib = db.unmatched_result_rows(Some("TIB")).unwrap();
        assert_eq!(tib.len(), 1);
        assert_eq!(tib[0].swimmer_name_norm, "bea mar");
        assert_eq!(tib[0].gender.as_deref(), Some("F"));
    }
}
