//! Split analysis for a single timed attempt.

use serde::{Deserialize, Serialize};

use crate::swimming::TrainingSplit;

/// Running total of split times, one entry per split.
pub fn cumulative_times(splits: &[TrainingSplit]) -> Vec<i64> {
    splits
        .iter()
        .scan(0i64, |total, split| {
            *total += split.split_time_ms;
            Some(*total)
        })
        .collect()
}

/// Split with the lowest time. Ties keep the earliest split.
pub fn fastest_split(splits: &[TrainingSplit]) -> Option<&TrainingSplit> {
    splits.iter().reduce(|fastest, current| {
        if current.split_time_ms < fastest.split_time_ms {
            current
        } else {
            fastest
        }
    })
}

/// Split with the highest time. Ties keep the earliest split.
pub fn slowest_split(splits: &[TrainingSplit]) -> Option<&TrainingSplit> {
    splits.iter().reduce(|slowest, current| {
        if current.split_time_ms > slowest.split_time_ms {
            current
        } else {
            slowest
        }
    })
}

/// Mean split time rounded to the nearest millisecond; `0` for no splits.
pub fn average_split_time(splits: &[TrainingSplit]) -> i64 {
    if splits.is_empty() {
        return 0;
    }
    let total: i64 = splits.iter().map(|s| s.split_time_ms).sum();
    round_ms(total as f64 / splits.len() as f64)
}

/// Population standard deviation of split times, in whole milliseconds.
///
/// Deviations are measured from the rounded average. Fewer than two
/// splits give `0`.
pub fn split_consistency(splits: &[TrainingSplit]) -> i64 {
    if splits.len() < 2 {
        return 0;
    }
    let avg = average_split_time(splits) as f64;
    let variance = splits
        .iter()
        .map(|s| (s.split_time_ms as f64 - avg).powi(2))
        .sum::<f64>()
        / splits.len() as f64;

    round_ms(variance.sqrt())
}

/// Summary of every split statistic for one attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitSummary {
    pub cumulative_ms: Vec<i64>,
    pub fastest: Option<TrainingSplit>,
    pub slowest: Option<TrainingSplit>,
    pub average_ms: i64,
    pub consistency_ms: i64,
}

impl SplitSummary {
    pub fn from_splits(splits: &[TrainingSplit]) -> Self {
        Self {
            cumulative_ms: cumulative_times(splits),
            fastest: fastest_split(splits).copied(),
            slowest: slowest_split(splits).copied(),
            average_ms: average_split_time(splits),
            consistency_ms: split_consistency(splits),
        }
    }
}

fn round_ms(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
