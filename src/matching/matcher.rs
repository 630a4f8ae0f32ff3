//! Matching external swimmer names against the athlete roster.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::similarity::name_similarity;
use crate::metrics::round_half_up;

/// Default minimum similarity for a candidate to be reported.
pub const DEFAULT_MIN_SIMILARITY: f64 = 0.6;

/// Default number of candidates per name.
pub const DEFAULT_MATCH_LIMIT: usize = 10;

/// Candidates per name in batch suggestions.
pub const BATCH_MATCH_LIMIT: usize = 3;

/// Roster entry used for matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Athlete {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<NaiveDate>,
    pub club_id: Option<String>,
    pub club_name: Option<String>,
    pub active: bool,
}

impl Athlete {
    pub fn new(first_name: &str, last_name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            birth_date: None,
            club_id: None,
            club_name: None,
            active: true,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A roster athlete scored against an external name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AthleteMatch {
    pub athlete_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub birth_date: Option<NaiveDate>,
    pub club_name: Option<String>,
    /// Similarity rounded to two decimals
    pub similarity_score: f64,
}

/// Candidates for one external name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSuggestion {
    pub external_name: String,
    pub matches: Vec<AthleteMatch>,
    pub best_match: Option<AthleteMatch>,
}

/// Scores external names against a roster.
#[derive(Debug, Clone)]
pub struct AthleteMatcher {
    min_similarity: f64,
    limit: usize,
}

impl AthleteMatcher {
    pub fn new() -> Self {
        Self {
            min_similarity: DEFAULT_MIN_SIMILARITY,
            limit: DEFAULT_MATCH_LIMIT,
        }
    }

    pub fn with_threshold(min_similarity: f64, limit: usize) -> Self {
        Self {
            min_similarity,
            limit,
        }
    }

    pub fn min_similarity(&self) -> f64 {
        self.min_similarity
    }

    /// Active roster athletes whose full name scores at least the threshold,
    /// best first.
    ///
    /// `club_id` restricts candidates to one club. Equal scores keep roster
    /// order.
    pub fn find_matches(
        &self,
        external_name: &str,
        roster: &[Athlete],
        club_id: Option<&str>,
    ) -> Vec<AthleteMatch> {
        let mut results: Vec<AthleteMatch> = roster
            .iter()
            .filter(|a| a.active)
            .filter(|a| club_id.map_or(true, |club| a.club_id.as_deref() == Some(club)))
            .filter_map(|athlete| {
                let full_name = athlete.full_name();
                let score = name_similarity(external_name, &full_name);
                if score < self.min_similarity {
                    return None;
                }
                Some(AthleteMatch {
                    athlete_id: athlete.id,
                    first_name: athlete.first_name.clone(),
                    last_name: athlete.last_name.clone(),
                    full_name,
                    birth_date: athlete.birth_date,
                    club_name: athlete.club_name.clone(),
                    similarity_score: round_half_up(score, 2),
                })
            })
            .collect();

        results.sort_by(|a, b| b.similarity_score.total_cmp(&a.similarity_score));
        results.truncate(self.limit);

        tracing::debug!(
            "{} candidate(s) for '{}' at threshold {}",
            results.len(),
            external_name,
            self.min_similarity
        );

        results
    }

    /// Top candidates for each name, at most [`BATCH_MATCH_LIMIT`] apiece.
    pub fn suggest_batch(
        &self,
        external_names: &[String],
        roster: &[Athlete],
    ) -> Vec<MatchSuggestion> {
        let batch = Self::with_threshold(self.min_similarity, BATCH_MATCH_LIMIT);

        external_names
            .iter()
            .map(|name| {
                let matches = batch.find_matches(name, roster, None);
                MatchSuggestion {
                    external_name: name.clone(),
                    best_match: matches.first().cloned(),
                    matches,
                }
            })
            .collect()
    }
}

impl Default for AthleteMatcher {
    fn default() -> Self {
        Self::new()
    }
}
