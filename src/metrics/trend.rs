//! Least-squares trend over a time progression.
//!
//! Only an improving trend (times getting faster, negative slope) is
//! surfaced. Flat or worsening series produce no trend line at all.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Fitted line `time_ms = slope * days + intercept`, where `days` counts
/// from `first_date`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendLine {
    /// Milliseconds gained (negative) per day
    pub slope: f64,
    /// Fitted time on `first_date`
    pub intercept: f64,
    /// Date of the first observation
    pub first_date: NaiveDate,
}

impl TrendLine {
    /// Fit a trend to chronologically ordered `(date, time_ms)` observations.
    ///
    /// Returns `None` for fewer than two observations, when every
    /// observation falls on the same day, or when the slope is not
    /// strictly negative.
    pub fn fit(observations: &[(NaiveDate, i64)]) -> Option<Self> {
        let (first_date, _) = *observations.first()?;

        let points: Vec<(f64, f64)> = observations
            .iter()
            .map(|(date, time_ms)| (days_between(first_date, *date), *time_ms as f64))
            .collect();

        let (slope, intercept) = linear_regression(&points)?;

        if !(slope < 0.0) {
            return None;
        }

        Some(Self {
            slope,
            intercept,
            first_date,
        })
    }

    /// Evaluate the line on `date`.
    pub fn project(&self, date: NaiveDate) -> f64 {
        self.slope * days_between(self.first_date, date) + self.intercept
    }

    /// Evaluate the line on each date, in the order given.
    pub fn project_series(&self, dates: &[NaiveDate]) -> Vec<f64> {
        dates.iter().map(|d| self.project(*d)).collect()
    }
}

fn days_between(from: NaiveDate, to: NaiveDate) -> f64 {
    (to - from).num_days() as f64
}

/// Ordinary least squares on (x, y) pairs. Returns (slope, intercept).
fn linear_regression(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    let n = points.len() as f64;
    if points.len() < 2 {
        return None;
    }

    let sum_x: f64 = points.iter().map(|(x, _)| x).sum();
    let sum_y: f64 = points.iter().map(|(_, y)| y).sum();
    let sum_xy: f64 = points.iter().map(|(x, y)| x * y).sum();
    let sum_xx: f64 = points.iter().map(|(x, _)| x * x).sum();

    let denom = n * sum_xx - sum_x * sum_x;
    if denom.abs() < 1e-10 {
        return None;
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denom;
    let intercept = (sum_y - slope * sum_x) / n;

    Some((slope, intercept))
}
