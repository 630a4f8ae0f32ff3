//! Club side of the review queue: result-list team codes linked to clubs.
//!
//! A team code maps to at most one club once `CONFIRMED`. Clubs can hold
//! several codes, and their unmatched swimmers are the unlinked results
//! under those codes.

use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::matching::{summarize_unmatched, UnmatchedResultRow, UnmatchedSwimmer};
use crate::results::SOURCE_FEDERATION_EXPORT;
use crate::storage::database::{parse_uuid, DatabaseError};
use crate::storage::mapping_store::{MappingStatus, MappingStore};

/// A suggested or reviewed link between a team code and a club.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClubMapping {
    pub id: Uuid,
    pub external_code: String,
    pub external_name: Option<String>,
    pub club_id: Option<String>,
    pub confidence_score: f64,
    pub source: String,
    pub status: MappingStatus,
    pub confirmed_at: Option<String>,
    pub confirmed_by: Option<String>,
}

/// Input for a new club mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewClubMapping {
    pub external_code: String,
    pub external_name: Option<String>,
    pub club_id: Option<String>,
    pub confidence_score: f64,
    pub source: String,
}

impl NewClubMapping {
    pub fn suggestion(external_code: &str, club_id: Option<&str>, confidence_score: f64) -> Self {
        Self {
            external_code: external_code.to_string(),
            external_name: None,
            club_id: club_id.map(str::to_string),
            confidence_score,
            source: SOURCE_FEDERATION_EXPORT.to_string(),
        }
    }
}

/// One page of pending club mappings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClubPendingPage {
    pub total: usize,
    pub matches: Vec<ClubMapping>,
}

/// A team code seen in results, with its confirmed club if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamCode {
    pub team_code: String,
    pub result_count: usize,
    pub club_id: Option<String>,
}

/// Unlinked swimmers under a club's team codes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClubUnmatched {
    pub club_id: String,
    pub team_codes: Vec<String>,
    pub swimmers: Vec<UnmatchedSwimmer>,
}

const CLUB_MAPPING_COLUMNS: &str = "id, external_code, external_name, club_id, confidence_score,
     source, status, confirmed_at, confirmed_by";

impl MappingStore<'_> {
    /// Queue a club mapping for review.
    pub fn create_club_mapping(
        &self,
        mapping: &NewClubMapping,
    ) -> Result<ClubMapping, DatabaseError> {
        let created = ClubMapping {
            id: Uuid::new_v4(),
            external_code: mapping.external_code.trim().to_string(),
            external_name: mapping.external_name.clone(),
            club_id: mapping.club_id.clone(),
            confidence_score: mapping.confidence_score,
            source: mapping.source.clone(),
            status: MappingStatus::Pending,
            confirmed_at: None,
            confirmed_by: None,
        };
        self.insert_club_mapping(&created)?;
        Ok(created)
    }

    /// Get a club mapping by ID.
    pub fn get_club_mapping(&self, id: &Uuid) -> Result<Option<ClubMapping>, DatabaseError> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {CLUB_MAPPING_COLUMNS} FROM club_external_mappings WHERE id = ?1"),
                params![id.to_string()],
                ClubMappingRow::from_row,
            )
            .optional()
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        row.map(ClubMappingRow::into_mapping).transpose()
    }

    /// Pending club mappings, highest confidence first.
    pub fn pending_club_mappings(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<ClubPendingPage, DatabaseError> {
        let total: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM club_external_mappings WHERE status = 'PENDING'",
                [],
                |row| row.get(0),
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {CLUB_MAPPING_COLUMNS} FROM club_external_mappings
                 WHERE status = 'PENDING'
                 ORDER BY confidence_score DESC, created_at
                 LIMIT ?1 OFFSET ?2"
            ))
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let rows = stmt
            .query_map(params![limit as i64, offset as i64], ClubMappingRow::from_row)
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut matches = Vec::new();
        for row in rows {
            let row = row.map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
            matches.push(row.into_mapping()?);
        }

        Ok(ClubPendingPage {
            total: total as usize,
            matches,
        })
    }

    /// Confirm a club mapping against `club_id`.
    pub fn confirm_club_mapping(
        &self,
        mapping_id: &Uuid,
        club_id: &str,
        reviewed_by: Option<&str>,
    ) -> Result<ClubMapping, DatabaseError> {
        self.review_club_mapping(
            "UPDATE club_external_mappings
             SET club_id = ?1, status = 'CONFIRMED', confirmed_at = ?2,
                 confirmed_by = COALESCE(?3, confirmed_by)
             WHERE id = ?4",
            params![club_id, Utc::now().to_rfc3339(), reviewed_by, mapping_id.to_string()],
            mapping_id,
        )
    }

    /// Mark a club mapping as rejected.
    pub fn reject_club_mapping(
        &self,
        mapping_id: &Uuid,
        reviewed_by: Option<&str>,
    ) -> Result<ClubMapping, DatabaseError> {
        self.review_club_mapping(
            "UPDATE club_external_mappings
             SET status = 'REJECTED', confirmed_at = ?1,
                 confirmed_by = COALESCE(?2, confirmed_by)
             WHERE id = ?3",
            params![Utc::now().to_rfc3339(), reviewed_by, mapping_id.to_string()],
            mapping_id,
        )
    }

    /// Every team code in the results with its result count and confirmed club.
    pub fn team_codes(&self) -> Result<Vec<TeamCode>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT r.team_code, COUNT(*),
                    (SELECT m.club_id FROM club_external_mappings m
                     WHERE m.external_code = r.team_code AND m.status = 'CONFIRMED'
                     LIMIT 1)
                 FROM competition_results r
                 WHERE r.team_code IS NOT NULL AND r.team_code != ''
                 GROUP BY r.team_code
                 ORDER BY r.team_code",
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                let count: i64 = row.get(1)?;
                Ok(TeamCode {
                    team_code: row.get(0)?,
                    result_count: count as usize,
                    club_id: row.get(2)?,
                })
            })
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))
    }

    /// Confirmed team codes of a club, alphabetically.
    pub fn club_team_codes(&self, club_id: &str) -> Result<Vec<String>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT DISTINCT external_code FROM club_external_mappings
                 WHERE club_id = ?1 AND status = 'CONFIRMED'
                 ORDER BY external_code",
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let rows = stmt
            .query_map(params![club_id], |row| row.get(0))
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        rows.collect::<rusqlite::Result<Vec<String>>>()
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))
    }

    /// Link a team code to a club directly, as a confirmed mapping.
    ///
    /// Fails with `ConstraintViolation` when the code is already confirmed
    /// for any club.
    pub fn link_team_code(
        &self,
        club_id: &str,
        team_code: &str,
    ) -> Result<ClubMapping, DatabaseError> {
        let team_code = team_code.trim();
        let existing: Option<String> = self
            .conn
            .query_row(
                "SELECT club_id FROM club_external_mappings
                 WHERE external_code = ?1 AND status = 'CONFIRMED'
                 LIMIT 1",
                params![team_code],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?
            .flatten();

        if let Some(owner) = existing {
            return Err(DatabaseError::ConstraintViolation(format!(
                "team code '{}' is already linked to club {}",
                team_code, owner
            )));
        }

        let linked = ClubMapping {
            id: Uuid::new_v4(),
            external_code: team_code.to_string(),
            external_name: None,
            club_id: Some(club_id.to_string()),
            confidence_score: 1.0,
            source: SOURCE_FEDERATION_EXPORT.to_string(),
            status: MappingStatus::Confirmed,
            confirmed_at: Some(Utc::now().to_rfc3339()),
            confirmed_by: None,
        };
        self.insert_club_mapping(&linked)?;

        tracing::info!("Linked team code '{}' to club {}", team_code, club_id);
        Ok(linked)
    }

    /// Remove every mapping of `team_code` to `club_id`. Returns rows deleted.
    pub fn unlink_team_code(&self, club_id: &str, team_code: &str) -> Result<usize, DatabaseError> {
        self.conn
            .execute(
                "DELETE FROM club_external_mappings WHERE club_id = ?1 AND external_code = ?2",
                params![club_id, team_code.trim()],
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))
    }

    /// Unlinked swimmers racing under the club's confirmed team codes.
    pub fn club_unmatched_swimmers(
        &self,
        club_id: &str,
        limit: usize,
    ) -> Result<ClubUnmatched, DatabaseError> {
        let team_codes = self.club_team_codes(club_id)?;
        if team_codes.is_empty() {
            return Ok(ClubUnmatched {
                club_id: club_id.to_string(),
                team_codes,
                swimmers: Vec::new(),
            });
        }

        let mut stmt = self
            .conn
            .prepare(
                "SELECT swimmer_name, swimmer_name_norm, gender, team_code
                 FROM competition_results
                 WHERE athlete_id IS NULL AND team_code IN (
                     SELECT external_code FROM club_external_mappings
                     WHERE club_id = ?1 AND status = 'CONFIRMED')
                 ORDER BY id",
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let rows = stmt
            .query_map(params![club_id], |row| {
                Ok(UnmatchedResultRow {
                    swimmer_name: row.get(0)?,
                    swimmer_name_norm: row.get(1)?,
                    gender: row.get(2)?,
                    team_code: row.get(3)?,
                })
            })
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        Ok(ClubUnmatched {
            club_id: club_id.to_string(),
            team_codes,
            swimmers: summarize_unmatched(&rows, limit),
        })
    }

    fn insert_club_mapping(&self, mapping: &ClubMapping) -> Result<(), DatabaseError> {
        self.conn
            .execute(
                "INSERT INTO club_external_mappings (id, external_code, external_name, club_id,
                 confidence_score, source, status, confirmed_at, confirmed_by, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    mapping.id.to_string(),
                    mapping.external_code,
                    mapping.external_name,
                    mapping.club_id,
                    mapping.confidence_score,
                    mapping.source,
                    mapping.status.as_str(),
                    mapping.confirmed_at,
                    mapping.confirmed_by,
                    Utc::now().to_rfc3339(),
                ],
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    fn review_club_mapping(
        &self,
        sql: &str,
        args: &[&dyn rusqlite::ToSql],
        mapping_id: &Uuid,
    ) -> Result<ClubMapping, DatabaseError> {
        let updated = self
            .conn
            .execute(sql, args)
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        if updated == 0 {
            return Err(DatabaseError::NotFound(format!("club mapping {}", mapping_id)));
        }

        self.get_club_mapping(mapping_id)?
            .ok_or_else(|| DatabaseError::NotFound(format!("club mapping {}", mapping_id)))
    }
}

/// Intermediate struct for reading club mapping rows from database.
struct ClubMappingRow {
    id: String,
    external_code: String,
    external_name: Option<String>,
    club_id: Option<String>,
    confidence_score: f64,
    source: String,
    status: String,
    confirmed_at: Option<String>,
    confirmed_by: Option<String>,
}

impl ClubMappingRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            external_code: row.get(1)?,
            external_name: row.get(2)?,
            club_id: row.get(3)?,
            confidence_score: row.get(4)?,
            source: row.get(5)?,
            status: row.get(6)?,
            confirmed_at: row.get(7)?,
            confirmed_by: row.get(8)?,
        })
    }

    fn into_mapping(self) -> Result<ClubMapping, DatabaseError> {
        let status = MappingStatus::from_str(&self.status).ok_or_else(|| {
            DatabaseError::DeserializationError(format!("Invalid status: {}", self.status))
        })?;

        Ok(ClubMapping {
            id: parse_uuid(&self.id)?,
            external_code: self.external_code,
            external_name: self.external_name,
            club_id: self.club_id,
            confidence_score: self.confidence_score,
            source: self.source,
            status,
            confirmed_at: self.confirmed_at,
            confirmed_by: self.confirmed_by,
        })
    }
}
