//! Swimming metrics for a timed training set.
//!
//! Every divisor is guarded: zero strokes or a non-positive time yield `0.0`,
//! which downstream charts read as "no data yet" and skip.

use serde::{Deserialize, Serialize};

use crate::swimming::{TrainingSplit, TrainingStroke};

/// Derived metrics for one training set.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SwimmingMetrics {
    /// Distance per stroke in meters (2 decimals)
    pub dps: f64,
    /// Strokes per minute (1 decimal)
    pub stroke_frequency: f64,
    /// DPS x velocity (2 decimals)
    pub swim_index: f64,
    /// Velocity in m/s (2 decimals)
    pub velocity: f64,
    /// Session RPE x duration, when both are known
    pub training_load: Option<f64>,
}

impl SwimmingMetrics {
    /// Calculate the rounded metrics record for a set.
    ///
    /// Training load is only reported when both `rpe` and `duration_min`
    /// are present and non-zero.
    pub fn calculate(
        distance_m: f64,
        total_time_ms: i64,
        total_stroke_count: u32,
        rpe: Option<f64>,
        duration_min: Option<f64>,
    ) -> Self {
        let dps = distance_per_stroke(distance_m, total_stroke_count);
        let frequency = stroke_frequency(total_stroke_count, total_time_ms);
        let speed = velocity(distance_m, total_time_ms);
        let index = swim_index(dps, speed);

        let load = match (rpe, duration_min) {
            (Some(r), Some(d)) if r != 0.0 && d != 0.0 => Some(training_load(r, d)),
            _ => None,
        };

        Self {
            dps: round_half_up(dps, 2),
            stroke_frequency: round_half_up(frequency, 1),
            swim_index: round_half_up(index, 2),
            velocity: round_half_up(speed, 2),
            training_load: load,
        }
    }
}

/// Meters travelled per stroke; `0.0` when no strokes were counted.
pub fn distance_per_stroke(distance_m: f64, stroke_count: u32) -> f64 {
    if stroke_count == 0 {
        return 0.0;
    }
    distance_m / stroke_count as f64
}

/// Strokes per minute; `0.0` for a non-positive time.
pub fn stroke_frequency(stroke_count: u32, time_ms: i64) -> f64 {
    if time_ms <= 0 {
        return 0.0;
    }
    let minutes = time_ms as f64 / 60_000.0;
    stroke_count as f64 / minutes
}

/// Velocity in m/s; `0.0` for a non-positive time.
pub fn velocity(distance_m: f64, time_ms: i64) -> f64 {
    if time_ms <= 0 {
        return 0.0;
    }
    distance_m / (time_ms as f64 / 1000.0)
}

/// Swim index (DPS x velocity). Not rounded.
pub fn swim_index(dps: f64, velocity: f64) -> f64 {
    dps * velocity
}

/// Session-RPE training load (RPE x minutes).
pub fn training_load(rpe: f64, duration_min: f64) -> f64 {
    rpe * duration_min
}

/// Sum of per-length stroke counts.
pub fn total_stroke_count(strokes: &[TrainingStroke]) -> u32 {
    strokes.iter().map(|s| s.stroke_count).sum()
}

/// Velocity of each split, in split order.
pub fn split_velocities(splits: &[TrainingSplit]) -> Vec<f64> {
    splits
        .iter()
        .map(|s| velocity(s.split_distance_m, s.split_time_ms))
        .collect()
}

/// Round to `decimals` places, ties towards positive infinity.
pub fn round_half_up(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor + 0.5).floor() / factor
}
