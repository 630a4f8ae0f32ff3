//! Competition result types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::swimming::{Gender, SwimStroke};

/// Source tag for rows read from the federation database export.
pub const SOURCE_FEDERATION_EXPORT: &str = "FECNA";

/// Source tag for rows fetched from the federation results API.
pub const SOURCE_FEDERATION_API: &str = "FECNA_API";

/// Heat/round of a swim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Round {
    Final,
    Prelim,
    TimeTrial,
}

impl Round {
    pub fn as_str(&self) -> &'static str {
        match self {
            Round::Final => "FINAL",
            Round::Prelim => "PRELIM",
            Round::TimeTrial => "TIME_TRIAL",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "FINAL" => Some(Round::Final),
            "PRELIM" => Some(Round::Prelim),
            "TIME_TRIAL" => Some(Round::TimeTrial),
            _ => None,
        }
    }
}

/// One individual swim in a competition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitionResult {
    pub year: Option<i32>,
    pub tournament_name: String,
    pub event_date: Option<NaiveDate>,
    pub gender: Gender,
    pub distance_m: u32,
    pub stroke: SwimStroke,
    pub round: Option<Round>,
    pub age: Option<u32>,
    pub swimmer_name: String,
    /// Accent-free lowercase name used to link results to athletes
    pub swimmer_name_norm: String,
    pub team_code: Option<String>,
    pub rank: Option<u32>,
    pub final_time_ms: i64,
    pub seed_time_ms: Option<i64>,
    pub source: String,
    /// Linked roster athlete, once matched
    pub athlete_id: Option<Uuid>,
}

/// Summary of a federation database export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportStats {
    pub total_records: u64,
    /// Records with a usable final time
    pub valid_records: u64,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
    pub unique_swimmers: u64,
    pub unique_tournaments: u64,
}
