//! Review queue linking result-list names to roster athletes.
//!
//! A mapping starts as `PENDING` with a confidence score from the matcher.
//! Confirming it links every unlinked result carrying the same normalised
//! name; rejecting it keeps it out of the queue.

use std::ops::RangeInclusive;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::matching::normalize_name;
use crate::results::SOURCE_FEDERATION_EXPORT;
use crate::storage::database::{count_results, link_results, parse_uuid, DatabaseError};

/// Accepted `min_confidence` values for automatic confirmation.
pub const AUTO_MATCH_CONFIDENCE: RangeInclusive<f64> = 0.6..=0.99;

/// Default `min_confidence` for automatic confirmation.
pub const DEFAULT_AUTO_MATCH_CONFIDENCE: f64 = 0.8;

/// Review state of an athlete or club mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MappingStatus {
    Pending,
    Confirmed,
    Rejected,
}

impl MappingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MappingStatus::Pending => "PENDING",
            MappingStatus::Confirmed => "CONFIRMED",
            MappingStatus::Rejected => "REJECTED",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(MappingStatus::Pending),
            "CONFIRMED" => Some(MappingStatus::Confirmed),
            "REJECTED" => Some(MappingStatus::Rejected),
            _ => None,
        }
    }
}

/// A suggested or reviewed link between an external name and an athlete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AthleteMapping {
    pub id: Uuid,
    pub external_name: String,
    pub external_name_norm: String,
    pub athlete_id: Option<Uuid>,
    pub confidence_score: f64,
    pub source: String,
    pub status: MappingStatus,
    pub metadata: Value,
    pub confirmed_at: Option<String>,
    pub confirmed_by: Option<String>,
}

/// Input for a new mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMapping {
    pub external_name: String,
    pub athlete_id: Option<Uuid>,
    pub confidence_score: f64,
    pub source: String,
    pub metadata: Option<Value>,
}

impl NewMapping {
    /// Suggestion from the federation export with the default source tag.
    pub fn suggestion(
        external_name: &str,
        athlete_id: Option<Uuid>,
        confidence_score: f64,
    ) -> Self {
        Self {
            external_name: external_name.to_string(),
            athlete_id,
            confidence_score,
            source: SOURCE_FEDERATION_EXPORT.to_string(),
            metadata: None,
        }
    }
}

/// One page of the pending queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingPage {
    /// Pending mappings in total, not just on this page
    pub total: usize,
    pub matches: Vec<AthleteMapping>,
}

/// Mapping and result-link counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStats {
    pub pending: usize,
    pub confirmed: usize,
    pub rejected: usize,
    pub results_linked: usize,
    pub results_unlinked: usize,
}

/// What automatic confirmation did, or would do on a dry run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoMatchReport {
    pub dry_run: bool,
    pub candidates: Vec<AthleteMapping>,
    /// Mappings confirmed; zero on a dry run
    pub confirmed: usize,
}

/// Mapping store for the name-matching review queue.
pub struct MappingStore<'a> {
    pub(super) conn: &'a Connection,
}

const MAPPING_COLUMNS: &str = "id, external_name, external_name_norm, athlete_id,
     confidence_score, source, status, metadata_json, confirmed_at, confirmed_by";

impl<'a> MappingStore<'a> {
    /// Create a new mapping store with the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Queue a mapping for review.
    pub fn create_mapping(&self, mapping: &NewMapping) -> Result<AthleteMapping, DatabaseError> {
        let metadata = mapping
            .metadata
            .clone()
            .unwrap_or_else(|| Value::Object(Default::default()));
        let metadata_json = serde_json::to_string(&metadata)
            .map_err(|e| DatabaseError::SerializationError(e.to_string()))?;

        let created = AthleteMapping {
            id: Uuid::new_v4(),
            external_name: mapping.external_name.clone(),
            external_name_norm: normalize_name(&mapping.external_name),
            athlete_id: mapping.athlete_id,
            confidence_score: mapping.confidence_score,
            source: mapping.source.clone(),
            status: MappingStatus::Pending,
            metadata,
            confirmed_at: None,
            confirmed_by: None,
        };

        self.conn
            .execute(
                "INSERT INTO athlete_external_mappings (id, external_name, external_name_norm,
                 athlete_id, confidence_score, source, status, metadata_json, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    created.id.to_string(),
                    created.external_name,
                    created.external_name_norm,
                    created.athlete_id.map(|id| id.to_string()),
                    created.confidence_score,
                    created.source,
                    created.status.as_str(),
                    metadata_json,
                    Utc::now().to_rfc3339(),
                ],
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        Ok(created)
    }

    /// Get a mapping by ID.
    pub fn get_mapping(&self, id: &Uuid) -> Result<Option<AthleteMapping>, DatabaseError> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {MAPPING_COLUMNS} FROM athlete_external_mappings WHERE id = ?1"),
                params![id.to_string()],
                MappingRow::from_row,
            )
            .optional()
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        row.map(MappingRow::into_mapping).transpose()
    }

    /// Pending mappings, highest confidence first.
    pub fn pending_mappings(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<PendingPage, DatabaseError> {
        let total = self.count_status(MappingStatus::Pending)?;

        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {MAPPING_COLUMNS} FROM athlete_external_mappings
                 WHERE status = 'PENDING'
                 ORDER BY confidence_score DESC, created_at
                 LIMIT ?1 OFFSET ?2"
            ))
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let rows = stmt
            .query_map(params![limit as i64, offset as i64], MappingRow::from_row)
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut matches = Vec::new();
        for row in rows {
            let row = row.map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
            matches.push(row.into_mapping()?);
        }

        Ok(PendingPage { total, matches })
    }

    /// Confirm a mapping against `athlete_id` and link its results.
    ///
    /// Returns the updated mapping and the number of results linked.
    pub fn confirm_mapping(
        &self,
        mapping_id: &Uuid,
        athlete_id: &Uuid,
        reviewed_by: Option<&str>,
    ) -> Result<(AthleteMapping, usize), DatabaseError> {
        let updated = self
            .conn
            .execute(
                "UPDATE athlete_external_mappings
                 SET athlete_id = ?1, status = 'CONFIRMED', confirmed_at = ?2,
                     confirmed_by = COALESCE(?3, confirmed_by)
                 WHERE id = ?4",
                params![
                    athlete_id.to_string(),
                    Utc::now().to_rfc3339(),
                    reviewed_by,
                    mapping_id.to_string(),
                ],
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        if updated == 0 {
            return Err(DatabaseError::NotFound(format!("mapping {}", mapping_id)));
        }

        let mapping = self
            .get_mapping(mapping_id)?
            .ok_or_else(|| DatabaseError::NotFound(format!("mapping {}", mapping_id)))?;
        let linked = self.link_results_to_athlete(&mapping.external_name_norm, athlete_id)?;

        tracing::info!(
            "Confirmed '{}' as athlete {}, linked {} result(s)",
            mapping.external_name,
            athlete_id,
            linked
        );
        Ok((mapping, linked))
    }

    /// Mark a mapping as rejected.
    pub fn reject_mapping(
        &self,
        mapping_id: &Uuid,
        reviewed_by: Option<&str>,
    ) -> Result<AthleteMapping, DatabaseError> {
        let updated = self
            .conn
            .execute(
                "UPDATE athlete_external_mappings
                 SET status = 'REJECTED', confirmed_at = ?1,
                     confirmed_by = COALESCE(?2, confirmed_by)
                 WHERE id = ?3",
                params![Utc::now().to_rfc3339(), reviewed_by, mapping_id.to_string()],
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        if updated == 0 {
            return Err(DatabaseError::NotFound(format!("mapping {}", mapping_id)));
        }

        self.get_mapping(mapping_id)?
            .ok_or_else(|| DatabaseError::NotFound(format!("mapping {}", mapping_id)))
    }

    /// Link every unlinked result with this normalised name. Returns rows updated.
    pub fn link_results_to_athlete(
        &self,
        swimmer_name_norm: &str,
        athlete_id: &Uuid,
    ) -> Result<usize, DatabaseError> {
        link_results(self.conn, swimmer_name_norm, athlete_id)
    }

    /// Mapping counts per status and result link counts.
    pub fn match_stats(&self) -> Result<MatchStats, DatabaseError> {
        Ok(MatchStats {
            pending: self.count_status(MappingStatus::Pending)?,
            confirmed: self.count_status(MappingStatus::Confirmed)?,
            rejected: self.count_status(MappingStatus::Rejected)?,
            results_linked: count_results(self.conn, true)?,
            results_unlinked: count_results(self.conn, false)?,
        })
    }

    /// Confirm pending mappings that name an athlete with at least
    /// `min_confidence`. A dry run only reports the candidates.
    ///
    /// A candidate that fails to confirm is logged and skipped.
    pub fn auto_match(
        &self,
        min_confidence: f64,
        dry_run: bool,
    ) -> Result<AutoMatchReport, DatabaseError> {
        if !AUTO_MATCH_CONFIDENCE.contains(&min_confidence) {
            return Err(DatabaseError::InvalidArgument(format!(
                "min_confidence must be between {} and {}, got {}",
                AUTO_MATCH_CONFIDENCE.start(),
                AUTO_MATCH_CONFIDENCE.end(),
                min_confidence
            )));
        }

        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {MAPPING_COLUMNS} FROM athlete_external_mappings
                 WHERE status = 'PENDING' AND confidence_score >= ?1 AND athlete_id IS NOT NULL
                 ORDER BY confidence_score DESC, created_at"
            ))
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let rows = stmt
            .query_map(params![min_confidence], MappingRow::from_row)
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut candidates = Vec::new();
        for row in rows {
            let row = row.map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
            candidates.push(row.into_mapping()?);
        }

        if dry_run {
            return Ok(AutoMatchReport {
                dry_run,
                candidates,
                confirmed: 0,
            });
        }

        let mut confirmed = 0;
        for candidate in &candidates {
            let Some(athlete_id) = candidate.athlete_id else {
                continue;
            };
            match self.confirm_mapping(&candidate.id, &athlete_id, None) {
                Ok(_) => confirmed += 1,
                Err(e) => tracing::warn!("Error confirming match {}: {}", candidate.id, e),
            }
        }

        Ok(AutoMatchReport {
            dry_run,
            candidates,
            confirmed,
        })
    }

    fn count_status(&self, status: MappingStatus) -> Result<usize, DatabaseError> {
        let count: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM athlete_external_mappings WHERE status = ?1",
                params![status.as_str()],
                |row| row.get(0),
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        Ok(count as usize)
    }
}

/// Intermediate struct for reading mapping rows from database.
struct MappingRow {
    id: String,
    external_name: String,
    external_name_norm: String,
    athlete_id: Option<String>,
    confidence_score: f64,
    source: String,
    status: String,
    metadata_json: String,
    confirmed_at: Option<String>,
    confirmed_by: Option<String>,
}

impl MappingRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            external_name: row.get(1)?,
            external_name_norm: row.get(2)?,
            athlete_id: row.get(3)?,
            confidence_score: row.get(4)?,
            source: row.get(5)?,
            status: row.get(6)?,
            metadata_json: row.get(7)?,
            confirmed_at: row.get(8)?,
            confirmed_by: row.get(9)?,
        })
    }

    fn into_mapping(self) -> Result<AthleteMapping, DatabaseError> {
        let status = MappingStatus::from_str(&self.status).ok_or_else(|| {
            DatabaseError::DeserializationError(format!("Invalid status: {}", self.status))
        })?;
        let metadata = serde_json::from_str(&self.metadata_json).map_err(|e| {
            DatabaseError::DeserializationError(format!("Invalid metadata JSON: {}", e))
        })?;

        Ok(AthleteMapping {
            id: parse_uuid(&self.id)?,
            external_name: self.external_name,
            external_name_norm: self.external_name_norm,
            athlete_id: self.athlete_id.as_deref().map(parse_uuid).transpose()?,
            confidence_score: self.confidence_score,
            source: self.source,
            status,
            metadata,
            confirmed_at: self.confirmed_at,
            confirmed_by: self.confirmed_by,
        })
    }
}
