//! Progress series for charting an athlete's times and stroke metrics.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::calculator::{
    distance_per_stroke, stroke_frequency, swim_index, total_stroke_count, velocity,
};
use super::trend::TrendLine;
use crate::results::CompetitionResult;
use crate::swimming::{format_event, TrainingSet};

/// Where a progress point came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressKind {
    Training,
    Competition,
}

/// One timed swim on the progression chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeProgressPoint {
    pub date: NaiveDate,
    pub time_ms: i64,
    pub test_name: String,
    /// Training session id, or tournament name for competition swims
    pub session_id: String,
    pub kind: ProgressKind,
}

impl TimeProgressPoint {
    /// Point for a training set swum on `session_date`.
    pub fn from_training(set: &TrainingSet, session_date: NaiveDate) -> Self {
        Self {
            date: session_date,
            time_ms: set.total_time_ms,
            test_name: format_event(set.distance_m, set.stroke),
            session_id: set.session_id.clone(),
            kind: ProgressKind::Training,
        }
    }

    /// Point for a competition swim. Results without an event date are not charted.
    pub fn from_competition(result: &CompetitionResult) -> Option<Self> {
        Some(Self {
            date: result.event_date?,
            time_ms: result.final_time_ms,
            test_name: format_event(result.distance_m, result.stroke),
            session_id: result.tournament_name.clone(),
            kind: ProgressKind::Competition,
        })
    }
}

/// Merge training and competition points into one date-ordered series.
///
/// The sort is stable, so same-day points keep training before competition.
pub fn merge_time_progress(
    training: Vec<TimeProgressPoint>,
    competition: Vec<TimeProgressPoint>,
) -> Vec<TimeProgressPoint> {
    let mut all = training;
    all.extend(competition);
    all.sort_by_key(|p| p.date);
    all
}

/// Stroke metrics of one training set, for the metrics chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsPoint {
    pub date: NaiveDate,
    pub dps: f64,
    pub stroke_rate: f64,
    pub swim_index: f64,
}

/// Unrounded stroke metrics per set, skipping sets without strokes or distance.
pub fn metrics_progress(sets: &[(NaiveDate, &TrainingSet)]) -> Vec<MetricsPoint> {
    sets.iter()
        .filter_map(|(date, set)| {
            let strokes = total_stroke_count(&set.strokes);
            if strokes == 0 || set.distance_m == 0 {
                return None;
            }
            let distance = set.distance_m as f64;
            let dps = distance_per_stroke(distance, strokes);
            Some(MetricsPoint {
                date: *date,
                dps,
                stroke_rate: stroke_frequency(strokes, set.total_time_ms),
                swim_index: swim_index(dps, velocity(distance, set.total_time_ms)),
            })
        })
        .collect()
}

/// Date-aligned series for the time progression chart.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeProgressChart {
    /// Distinct dates, ascending
    pub dates: Vec<NaiveDate>,
    pub training: Vec<Option<i64>>,
    pub competition: Vec<Option<i64>>,
    /// Fitted trend on each date; all `None` when no improving trend exists
    pub trend: Vec<Option<f64>>,
    pub trend_line: Option<TrendLine>,
    pub min_time_ms: Option<i64>,
    pub max_time_ms: Option<i64>,
}

impl TimeProgressChart {
    /// Build the chart series from date-ordered points.
    ///
    /// When several points of the same kind share a date, the last one wins.
    pub fn build(points: &[TimeProgressPoint]) -> Self {
        let mut by_date: BTreeMap<NaiveDate, (Option<i64>, Option<i64>)> = BTreeMap::new();
        for point in points {
            let slot = by_date.entry(point.date).or_default();
            match point.kind {
                ProgressKind::Training => slot.0 = Some(point.time_ms),
                ProgressKind::Competition => slot.1 = Some(point.time_ms),
            }
        }

        let dates: Vec<NaiveDate> = by_date.keys().copied().collect();
        let training = by_date.values().map(|(t, _)| *t).collect();
        let competition = by_date.values().map(|(_, c)| *c).collect();

        let observations: Vec<(NaiveDate, i64)> =
            points.iter().map(|p| (p.date, p.time_ms)).collect();
        let trend_line = TrendLine::fit(&observations);
        let trend = match &trend_line {
            Some(line) => line.project_series(&dates).into_iter().map(Some).collect(),
            None => vec![None; dates.len()],
        };

        Self {
            dates,
            training,
            competition,
            trend,
            trend_line,
            min_time_ms: points.iter().map(|p| p.time_ms).min(),
            max_time_ms: points.iter().map(|p| p.time_ms).max(),
        }
    }
}
