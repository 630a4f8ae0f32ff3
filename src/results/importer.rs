//! Reader for the federation's SQLite results export.

use std::path::{Path, PathBuf};

use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, Row};
use thiserror::Error;

use super::parser::{
    extract_distance, extract_round, is_valid_distance, parse_event_date, parse_gender,
    parse_result_time, parse_style,
};
use super::types::{CompetitionResult, ExportStats, SOURCE_FEDERATION_EXPORT};
use crate::matching::normalize_name;

/// Errors raised while importing competition results.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Export file does not exist.
    #[error("Database file not found: {0}")]
    FileNotFound(PathBuf),

    /// Query against the export failed.
    #[error("Export query failed: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A federation record could not be interpreted.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

/// Rows with a usable final time.
const VALID_TIME_FILTER: &str = "final_time IS NOT NULL
      AND final_time != ''
      AND final_time NOT IN ('NT', 'DQ', 'DNS', 'DNF', 'NS')";

/// Read-only view over a federation results export.
pub struct FederationImporter {
    conn: Connection,
}

impl FederationImporter {
    /// Open an export file. The file must already exist.
    pub fn open(path: &Path) -> Result<Self, ImportError> {
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.to_path_buf()));
        }
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        Ok(Self { conn })
    }

    /// Wrap an already open connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// Individual results ready to store, newest event first.
    ///
    /// A `limit` of zero reads every row.
    ///
    /// Rows are dropped when the stroke, final time, distance or gender
    /// cannot be determined. A distance column that is missing or not an
    /// event distance falls back to the distance named in the style text.
    pub fn read_results(
        &self,
        limit: Option<u32>,
        offset: u32,
    ) -> Result<Vec<CompetitionResult>, ImportError> {
        let mut sql = format!(
            "SELECT year, tournament_name, event_date, gender, distance, style, rank,
                    swimmer_name, age, team, seed_time, final_time
             FROM results
             WHERE {VALID_TIME_FILTER}
             ORDER BY event_date DESC, id"
        );
        if let Some(limit) = limit.filter(|l| *l > 0) {
            sql.push_str(&format!(" LIMIT {limit} OFFSET {offset}"));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;

        let mut results = Vec::new();
        let mut skipped = 0usize;
        while let Some(row) = rows.next()? {
            match result_from_row(row)? {
                Some(result) => results.push(result),
                None => skipped += 1,
            }
        }

        tracing::info!(
            "Read {} result(s) from export, skipped {}",
            results.len(),
            skipped
        );
        Ok(results)
    }

    /// Record counts and date range of the export.
    pub fn stats(&self) -> Result<ExportStats, ImportError> {
        let count = |sql: &str| -> Result<u64, ImportError> {
            let n: i64 = self.conn.query_row(sql, [], |row| row.get(0))?;
            Ok(n.max(0) as u64)
        };

        let total_records = count("SELECT COUNT(*) FROM results")?;
        let valid_records = count(&format!(
            "SELECT COUNT(*) FROM results WHERE {VALID_TIME_FILTER}"
        ))?;
        let unique_swimmers = count("SELECT COUNT(DISTINCT swimmer_name) FROM results")?;
        let unique_tournaments = count("SELECT COUNT(DISTINCT tournament_name) FROM results")?;

        let (first_date, last_date) = self.conn.query_row(
            "SELECT MIN(event_date), MAX(event_date) FROM results",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        Ok(ExportStats {
            total_records,
            valid_records,
            first_date,
            last_date,
            unique_swimmers,
            unique_tournaments,
        })
    }
}

fn result_from_row(row: &Row<'_>) -> Result<Option<CompetitionResult>, ImportError> {
    let style: String = text_column(row, 5)?.unwrap_or_default();
    let final_time: Option<String> = text_column(row, 11)?;

    let Some(stroke) = parse_style(&style) else {
        return Ok(None);
    };
    let Some(final_time_ms) = parse_result_time(final_time.as_deref()).filter(|t| *t > 0) else {
        return Ok(None);
    };

    // Some exports carry the age group in the distance column.
    let distance = int_column(row, 4)?
        .and_then(|d| u32::try_from(d).ok())
        .filter(|d| is_valid_distance(*d))
        .or_else(|| extract_distance(&style))
        .filter(|d| is_valid_distance(*d));
    let Some(distance_m) = distance else {
        return Ok(None);
    };

    // Relay teams have no gender.
    let Some(gender) = text_column(row, 3)?.as_deref().and_then(parse_gender) else {
        return Ok(None);
    };

    let swimmer_name: String = text_column(row, 7)?.unwrap_or_default();
    let positive = |v: Option<i64>| v.filter(|n| *n > 0).and_then(|n| u32::try_from(n).ok());

    Ok(Some(CompetitionResult {
        year: int_column(row, 0)?.and_then(|y| i32::try_from(y).ok()),
        tournament_name: text_column(row, 1)?.unwrap_or_default(),
        event_date: parse_event_date(text_column(row, 2)?.as_deref()),
        gender,
        distance_m,
        stroke,
        round: extract_round(&style),
        age: positive(int_column(row, 8)?),
        swimmer_name_norm: normalize_name(&swimmer_name),
        swimmer_name,
        team_code: text_column(row, 9)?,
        rank: positive(int_column(row, 6)?),
        final_time_ms,
        seed_time_ms: parse_result_time(text_column(row, 10)?.as_deref()),
        source: SOURCE_FEDERATION_EXPORT.to_string(),
        athlete_id: None,
    }))
}

/// Integer column tolerant of SQLite's loose typing.
fn int_column(row: &Row<'_>, idx: usize) -> Result<Option<i64>, ImportError> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Integer(i) => Some(i),
        ValueRef::Real(f) => Some(f as i64),
        ValueRef::Text(t) => std::str::from_utf8(t).ok().and_then(|s| s.trim().parse().ok()),
        ValueRef::Null | ValueRef::Blob(_) => None,
    })
}

/// Text column tolerant of SQLite's loose typing.
fn text_column(row: &Row<'_>, idx: usize) -> Result<Option<String>, ImportError> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Text(t) => Some(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Null | ValueRef::Blob(_) => None,
    })
}
