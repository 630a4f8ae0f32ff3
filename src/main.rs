//! Sportia - swimming metrics and competition result matching.
//!
//! Main entry point for the command line tool.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use sportia::matching::{group_unmatched, summarize_unmatched, AthleteMatcher, GroupBy};
use sportia::metrics::{
    daily_loads, sessions_with_load, split_velocities, SessionLoad, SplitSummary, SwimmingMetrics,
};
use sportia::results::FederationImporter;
use sportia::storage::{
    load_config, load_config_from, AppConfig, Database, MappingStore, NewMapping, RankingQuery,
};
use sportia::swimming::{
    ms_to_time_string, time_string_to_ms, validate_rpe, Gender, SessionType, SwimStroke,
    TrainingSession, TrainingSplit,
};

#[derive(Parser)]
#[command(name = "sportia")]
#[command(about = "Swimming metrics and competition result matching")]
#[command(version)]
struct Args {
    /// Configuration file (default: platform data directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Database file, overrides the configured one
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stroke metrics for one timed swim
    Metrics {
        /// Distance in metres
        #[arg(long)]
        distance: f64,

        /// Time as m:ss.cc or ss.cc
        #[arg(long)]
        time: String,

        /// Total stroke count
        #[arg(long, default_value_t = 0)]
        strokes: u32,

        /// Session RPE (1-10)
        #[arg(long)]
        rpe: Option<f64>,

        /// Session duration in minutes
        #[arg(long)]
        duration: Option<f64>,
    },
    /// Summarise split times
    Splits {
        /// Split times as m:ss.cc or ss.cc
        #[arg(required = true)]
        times: Vec<String>,

        /// Distance of each split in metres
        #[arg(long, default_value_t = 50.0)]
        split_distance: f64,
    },
    /// Import a federation results export
    Import {
        /// SQLite export file
        export: PathBuf,

        /// Only read this many rows (0 reads all)
        #[arg(long)]
        limit: Option<u32>,

        /// Print export statistics without importing
        #[arg(long)]
        stats_only: bool,
    },
    /// Suggest roster athletes for result-list names
    Match {
        /// External names to match
        #[arg(required = true)]
        names: Vec<String>,

        /// Only consider athletes of this club
        #[arg(long)]
        club: Option<String>,

        /// Queue the best candidate of each name for review
        #[arg(long)]
        save: bool,
    },
    /// Swimmers in results without an athlete link
    Unmatched {
        /// team, gender or both
        #[arg(long, default_value = "team")]
        group_by: String,

        /// Only this team code
        #[arg(long)]
        team: Option<String>,

        #[arg(long, default_value_t = 100)]
        limit: usize,
    },
    /// Mappings awaiting review
    Pending {
        #[arg(long, default_value_t = 50)]
        limit: usize,

        #[arg(long, default_value_t = 0)]
        offset: usize,
    },
    /// Confirm a mapping and link its results
    Confirm {
        mapping_id: Uuid,
        athlete_id: Uuid,

        /// Reviewer
        #[arg(long)]
        by: Option<String>,
    },
    /// Reject a mapping
    Reject {
        mapping_id: Uuid,

        /// Reviewer
        #[arg(long)]
        by: Option<String>,
    },
    /// Confirm high-confidence mappings
    AutoMatch {
        /// Minimum confidence (0.6-0.99), defaults to the configured value
        #[arg(long)]
        min_confidence: Option<f64>,

        /// Apply the changes instead of previewing them
        #[arg(long)]
        apply: bool,
    },
    /// Best time per swimmer for one event
    Rankings {
        /// Distance in metres
        #[arg(long)]
        distance: u32,

        /// FREE, BACK, BREAST, FLY or IM
        #[arg(long)]
        stroke: String,

        /// M or F
        #[arg(long)]
        gender: String,

        #[arg(long)]
        year: Option<i32>,

        #[arg(long)]
        age_min: Option<u32>,

        #[arg(long)]
        age_max: Option<u32>,

        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
    /// Club mappings awaiting review
    ClubPending {
        #[arg(long, default_value_t = 50)]
        limit: usize,

        #[arg(long, default_value_t = 0)]
        offset: usize,
    },
    /// Confirm a club mapping
    ClubConfirm {
        mapping_id: Uuid,
        club_id: String,

        /// Reviewer
        #[arg(long)]
        by: Option<String>,
    },
    /// Reject a club mapping
    ClubReject {
        mapping_id: Uuid,

        /// Reviewer
        #[arg(long)]
        by: Option<String>,
    },
    /// Link a result-list team code to a club
    LinkTeam { club_id: String, team_code: String },
    /// Remove a team code from a club
    UnlinkTeam { club_id: String, team_code: String },
    /// Team codes in the results and their clubs
    TeamCodes,
    /// Unlinked swimmers under a club's team codes
    ClubUnmatched {
        club_id: String,

        #[arg(long, default_value_t = 100)]
        limit: usize,
    },
    /// Per-session and per-day training load
    Load {
        /// Sessions as YYYY-MM-DD:rpe:minutes
        #[arg(required = true)]
        sessions: Vec<String>,
    },
    /// Mapping and result link counts
    Stats,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config_from(path),
        None => load_config(),
    }
    .context("loading configuration")?;
    if let Some(database) = &args.database {
        config.database_file = database.clone();
    }

    tracing::debug!("Starting Sportia v{}", env!("CARGO_PKG_VERSION"));

    match args.command {
        Commands::Metrics {
            distance,
            time,
            strokes,
            rpe,
            duration,
        } => {
            let time_ms = time_string_to_ms(&time)?;
            print_json(&SwimmingMetrics::calculate(distance, time_ms, strokes, rpe, duration))
        }
        Commands::Splits {
            times,
            split_distance,
        } => run_splits(&times, split_distance),
        Commands::Import {
            export,
            limit,
            stats_only,
        } => run_import(&config, &export, limit, stats_only),
        Commands::Match { names, club, save } => {
            run_match(&config, &names, club.as_deref(), save)
        }
        Commands::Unmatched {
            group_by,
            team,
            limit,
        } => {
            let Some(group_by) = GroupBy::from_str(&group_by) else {
                bail!("group-by must be team, gender or both, got '{}'", group_by);
            };
            let db = open_database(&config)?;
            let rows = db.unmatched_result_rows(team.as_deref())?;
            let swimmers = summarize_unmatched(&rows, limit);
            print_json(&group_unmatched(&swimmers, group_by))
        }
        Commands::Pending { limit, offset } => {
            let db = open_database(&config)?;
            print_json(&MappingStore::new(db.connection()).pending_mappings(limit, offset)?)
        }
        Commands::Confirm {
            mapping_id,
            athlete_id,
            by,
        } => {
            let db = open_database(&config)?;
            let store = MappingStore::new(db.connection());
            let (mapping, linked) =
                store.confirm_mapping(&mapping_id, &athlete_id, by.as_deref())?;
            tracing::info!("Linked {} result(s)", linked);
            print_json(&mapping)
        }
        Commands::Reject { mapping_id, by } => {
            let db = open_database(&config)?;
            let store = MappingStore::new(db.connection());
            print_json(&store.reject_mapping(&mapping_id, by.as_deref())?)
        }
        Commands::AutoMatch {
            min_confidence,
            apply,
        } => {
            let db = open_database(&config)?;
            let min_confidence = min_confidence.unwrap_or(config.matching.auto_match_confidence);
            print_json(&MappingStore::new(db.connection()).auto_match(min_confidence, !apply)?)
        }
        Commands::Rankings {
            distance,
            stroke,
            gender,
            year,
            age_min,
            age_max,
            limit,
        } => {
            let Some(stroke) = SwimStroke::from_str(&stroke.to_uppercase()) else {
                bail!("stroke must be FREE, BACK, BREAST, FLY or IM, got '{}'", stroke);
            };
            let Some(gender) = Gender::from_str(&gender.to_uppercase()) else {
                bail!("gender must be M or F, got '{}'", gender);
            };
            let query = RankingQuery {
                year,
                age_min,
                age_max,
                limit,
                ..RankingQuery::new(distance, stroke, gender)
            };
            let db = open_database(&config)?;
            print_json(&db.rankings(&query)?)
        }
        Commands::ClubPending { limit, offset } => {
            let db = open_database(&config)?;
            let store = MappingStore::new(db.connection());
            print_json(&store.pending_club_mappings(limit, offset)?)
        }
        Commands::ClubConfirm {
            mapping_id,
            club_id,
            by,
        } => {
            let db = open_database(&config)?;
            let store = MappingStore::new(db.connection());
            print_json(&store.confirm_club_mapping(&mapping_id, &club_id, by.as_deref())?)
        }
        Commands::ClubReject { mapping_id, by } => {
            let db = open_database(&config)?;
            let store = MappingStore::new(db.connection());
            print_json(&store.reject_club_mapping(&mapping_id, by.as_deref())?)
        }
        Commands::LinkTeam { club_id, team_code } => {
            let db = open_database(&config)?;
            print_json(&MappingStore::new(db.connection()).link_team_code(&club_id, &team_code)?)
        }
        Commands::UnlinkTeam { club_id, team_code } => {
            let db = open_database(&config)?;
            let store = MappingStore::new(db.connection());
            let removed = store.unlink_team_code(&club_id, &team_code)?;
            if removed == 0 {
                tracing::warn!("Team code '{}' was not linked to club {}", team_code, club_id);
            }
            print_json(&removed)
        }
        Commands::TeamCodes => {
            let db = open_database(&config)?;
            print_json(&MappingStore::new(db.connection()).team_codes()?)
        }
        Commands::ClubUnmatched { club_id, limit } => {
            let db = open_database(&config)?;
            let store = MappingStore::new(db.connection());
            print_json(&store.club_unmatched_swimmers(&club_id, limit)?)
        }
        Commands::Load { sessions } => run_load(&sessions),
        Commands::Stats => {
            let db = open_database(&config)?;
            print_json(&MappingStore::new(db.connection()).match_stats()?)
        }
    }
}

fn open_database(config: &AppConfig) -> Result<Database> {
    let path = config.database_path();
    Database::open(&path).with_context(|| format!("opening database {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_splits(times: &[String], split_distance: f64) -> Result<()> {
    let splits = times
        .iter()
        .enumerate()
        .map(|(i, t)| -> Result<TrainingSplit> {
            Ok(TrainingSplit::new(i as u32 + 1, split_distance, time_string_to_ms(t)?))
        })
        .collect::<Result<Vec<_>>>()?;

    let summary = SplitSummary::from_splits(&splits);
    for (split, velocity) in splits.iter().zip(split_velocities(&splits)) {
        println!(
            "{:>3}  {:>8}  {:.2} m/s",
            split.split_index,
            ms_to_time_string(split.split_time_ms),
            velocity
        );
    }
    print_json(&summary)
}

fn run_import(
    config: &AppConfig,
    export: &Path,
    limit: Option<u32>,
    stats_only: bool,
) -> Result<()> {
    let importer = FederationImporter::open(export)?;

    if stats_only {
        return print_json(&importer.stats()?);
    }

    let results = importer.read_results(limit, 0)?;
    let mut db = open_database(config)?;
    let summary = db.upsert_results(&results, config.import.batch_size)?;
    print_json(&summary)
}

fn run_match(config: &AppConfig, names: &[String], club: Option<&str>, save: bool) -> Result<()> {
    let db = open_database(config)?;
    let roster = db.list_active_athletes(club)?;
    let matcher =
        AthleteMatcher::with_threshold(config.matching.min_similarity, config.matching.limit);

    let suggestions = matcher.suggest_batch(names, &roster);

    if save {
        let store = MappingStore::new(db.connection());
        for suggestion in &suggestions {
            let (athlete_id, score) = suggestion
                .best_match
                .as_ref()
                .map(|m| (Some(m.athlete_id), m.similarity_score))
                .unwrap_or((None, 0.0));
            let mapping = NewMapping::suggestion(&suggestion.external_name, athlete_id, score);
            store.create_mapping(&mapping)?;
        }
        tracing::info!("Queued {} mapping(s) for review", suggestions.len());
    }

    print_json(&suggestions)
}

fn parse_session(index: usize, raw: &str) -> Result<TrainingSession> {
    let parts: Vec<&str> = raw.split(':').collect();
    let &[date, rpe, minutes] = parts.as_slice() else {
        bail!("session '{}' is not YYYY-MM-DD:rpe:minutes", raw);
    };

    let session_rpe: u8 = rpe.parse().with_context(|| format!("bad RPE in '{}'", raw))?;
    validate_rpe(session_rpe)?;

    Ok(TrainingSession {
        id: format!("cli-{}", index + 1),
        athlete_id: String::new(),
        session_date: NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .with_context(|| format!("bad date in '{}'", raw))?,
        session_type: SessionType::Aerobic,
        duration_min: minutes.parse().with_context(|| format!("bad duration in '{}'", raw))?,
        session_rpe,
        notes: None,
    })
}

#[derive(Serialize)]
struct LoadReport {
    sessions: Vec<SessionLoad>,
    daily: Vec<(NaiveDate, f64)>,
    total: f64,
}

fn run_load(sessions: &[String]) -> Result<()> {
    let sessions = sessions
        .iter()
        .enumerate()
        .map(|(i, raw)| parse_session(i, raw))
        .collect::<Result<Vec<_>>>()?;

    let daily = daily_loads(&sessions);
    let total: f64 = daily.iter().map(|(_, load)| load).sum();
    print_json(&LoadReport {
        sessions: sessions_with_load(&sessions),
        daily,
        total,
    })
}
