//! Database schema definitions.

/// SQL schema for the roster and competition results.
pub const SCHEMA: &str = r#"
-- Club roster
CREATE TABLE IF NOT EXISTS athletes (
    id TEXT PRIMARY KEY,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    birth_date TEXT,
    club_id TEXT,
    club_name TEXT,
    active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_athletes_club_id ON athletes(club_id);

-- Individual competition swims
CREATE TABLE IF NOT EXISTS competition_results (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    year INTEGER NOT NULL DEFAULT 0,
    tournament_name TEXT NOT NULL,
    event_date TEXT,
    gender TEXT NOT NULL,
    distance_m INTEGER NOT NULL,
    stroke TEXT NOT NULL,
    round TEXT,
    age INTEGER,
    swimmer_name TEXT NOT NULL,
    swimmer_name_norm TEXT NOT NULL,
    team_code TEXT,
    rank INTEGER,
    final_time_ms INTEGER NOT NULL,
    seed_time_ms INTEGER,
    source TEXT NOT NULL,
    athlete_id TEXT REFERENCES athletes(id) ON DELETE SET NULL,
    created_at TEXT NOT NULL,
    UNIQUE(year, tournament_name, swimmer_name, distance_m, stroke, final_time_ms)
);

CREATE INDEX IF NOT EXISTS idx_results_name_norm ON competition_results(swimmer_name_norm);
CREATE INDEX IF NOT EXISTS idx_results_athlete_id ON competition_results(athlete_id);
"#;

/// SQL for schema version tracking (migrations)
pub const SCHEMA_VERSION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
);
"#;

/// Current schema version
pub const CURRENT_VERSION: i32 = 3;

/// SQL for migration from v1 to v2 (name mappings)
pub const MIGRATION_V1_TO_V2: &str = r#"
-- Links between result-list names and roster athletes
CREATE TABLE IF NOT EXISTS athlete_external_mappings (
    id TEXT PRIMARY KEY,
    external_name TEXT NOT NULL,
    external_name_norm TEXT NOT NULL,
    athlete_id TEXT REFERENCES athletes(id) ON DELETE CASCADE,
    confidence_score REAL NOT NULL,
    source TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'PENDING',
    metadata_json TEXT NOT NULL DEFAULT '{}',
    confirmed_at TEXT,
    confirmed_by TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_mappings_status ON athlete_external_mappings(status, confidence_score);
CREATE INDEX IF NOT EXISTS idx_mappings_name_norm ON athlete_external_mappings(external_name_norm);
"#;

/// SQL for migration from v2 to v3 (club team codes)
pub const MIGRATION_V2_TO_V3: &str = r#"
-- Links between result-list team codes and clubs
CREATE TABLE IF NOT EXISTS club_external_mappings (
    id TEXT PRIMARY KEY,
    external_code TEXT NOT NULL,
    external_name TEXT,
    club_id TEXT,
    confidence_score REAL NOT NULL,
    source TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'PENDING',
    confirmed_at TEXT,
    confirmed_by TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_club_mappings_status ON club_external_mappings(status, confidence_score);
CREATE INDEX IF NOT EXISTS idx_club_mappings_code ON club_external_mappings(external_code);
CREATE INDEX IF NOT EXISTS idx_club_mappings_club_id ON club_external_mappings(club_id);
CREATE INDEX IF NOT EXISTS idx_results_team_code ON competition_results(team_code);
"#;
