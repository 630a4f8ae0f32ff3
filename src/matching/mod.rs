//! Athlete name matching.
//!
//! Competition result lists name swimmers in free text. This module scores
//! those names against the club roster, looks swimmers up in the federation
//! list, and summarises the swimmers still waiting for a link.

pub mod lookup;
pub mod matcher;
pub mod similarity;
pub mod unmatched;

pub use lookup::{lookup_key, lookup_swimmer_id, search_swimmers, FederationSwimmer};
pub use matcher::{
    Athlete, AthleteMatch, AthleteMatcher, MatchSuggestion, DEFAULT_MATCH_LIMIT,
    DEFAULT_MIN_SIMILARITY,
};
pub use similarity::{name_similarity, normalize_name};
pub use unmatched::{
    group_unmatched, normalize_gender, summarize_unmatched, GroupBy, UnmatchedGroups,
    UnmatchedResultRow, UnmatchedSwimmer,
};
