//! Storage module for database and configuration.

pub mod club_mappings;
pub mod config;
pub mod database;
pub mod mapping_store;
pub mod schema;

pub use club_mappings::{ClubMapping, ClubPendingPage, ClubUnmatched, NewClubMapping, TeamCode};
pub use config::{
    load_config, load_config_from, save_config, save_config_to, AppConfig, ConfigError,
    ImportSettings, MatchingSettings,
};
pub use database::{
    Database, DatabaseError, EventRanking, ImportSummary, RankedResult, RankingQuery,
};
pub use mapping_store::{
    AthleteMapping, AutoMatchReport, MappingStatus, MappingStore, MatchStats, NewMapping,
    PendingPage, AUTO_MATCH_CONFIDENCE, DEFAULT_AUTO_MATCH_CONFIDENCE,
};
