//! Session-RPE training load.
//!
//! A session's load is `session_rpe * duration_min` (arbitrary units).

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::calculator::training_load;
use crate::swimming::{SessionType, TrainingSession};

/// A training session with its computed load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionLoad {
    pub id: String,
    pub athlete_id: String,
    pub session_date: NaiveDate,
    pub session_type: SessionType,
    pub duration_min: u32,
    pub session_rpe: u8,
    pub training_load: f64,
}

impl SessionLoad {
    pub fn from_session(session: &TrainingSession) -> Self {
        Self {
            id: session.id.clone(),
            athlete_id: session.athlete_id.clone(),
            session_date: session.session_date,
            session_type: session.session_type,
            duration_min: session.duration_min,
            session_rpe: session.session_rpe,
            training_load: session_load(session),
        }
    }
}

fn session_load(session: &TrainingSession) -> f64 {
    training_load(session.session_rpe as f64, session.duration_min as f64)
}

/// Sessions with their load, newest first. Same-day sessions keep input order.
pub fn sessions_with_load(sessions: &[TrainingSession]) -> Vec<SessionLoad> {
    let mut loads: Vec<SessionLoad> = sessions.iter().map(SessionLoad::from_session).collect();
    loads.sort_by(|a, b| b.session_date.cmp(&a.session_date));
    loads
}

/// Sum session loads per day, filling days without sessions with zero.
///
/// Output runs from the earliest to the latest session date.
pub fn daily_loads(sessions: &[TrainingSession]) -> Vec<(NaiveDate, f64)> {
    let mut per_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for session in sessions {
        *per_day.entry(session.session_date).or_default() += session_load(session);
    }

    let (Some(first), Some(last)) = (
        per_day.keys().next().copied(),
        per_day.keys().next_back().copied(),
    ) else {
        return Vec::new();
    };

    first
        .iter_days()
        .take_while(|d| *d <= last)
        .map(|d| (d, per_day.get(&d).copied().unwrap_or(0.0)))
        .collect()
}
