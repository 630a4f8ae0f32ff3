//! Unit tests for the swimming metrics calculator and split aggregator.

use proptest::prelude::*;
use sportia::metrics::{
    average_split_time, distance_per_stroke, round_half_up, split_consistency, stroke_frequency,
    velocity, SplitSummary, SwimmingMetrics,
};
use sportia::swimming::TrainingSplit;

fn splits(times: &[i64]) -> Vec<TrainingSplit> {
    times
        .iter()
        .enumerate()
        .map(|(i, t)| TrainingSplit::new(i as u32 + 1, 50.0, *t))
        .collect()
}

#[test]
fn test_100m_free_reference_set() {
    // 100m in 1:05.43 with 40 strokes, 7 RPE over a 60 minute session
    let m = SwimmingMetrics::calculate(100.0, 65_430, 40, Some(7.0), Some(60.0));

    assert_eq!(m.dps, 2.5);
    assert_eq!(m.stroke_frequency, 36.7);
    assert_eq!(m.velocity, 1.53);
    assert_eq!(m.swim_index, 3.82);
    assert_eq!(m.training_load, Some(420.0));
}

#[test]
fn test_missing_inputs_are_zero_not_errors() {
    let m = SwimmingMetrics::calculate(100.0, 0, 0, None, Some(45.0));
    assert_eq!(m, SwimmingMetrics::default());
}

#[test]
fn test_split_summary_of_200m() {
    let s = splits(&[30_000, 32_000, 33_000, 31_000]);
    let summary = SplitSummary::from_splits(&s);

    assert_eq!(summary.cumulative_ms, vec![30_000, 62_000, 95_000, 126_000]);
    assert_eq!(summary.fastest.map(|f| f.split_index), Some(1));
    assert_eq!(summary.slowest.map(|f| f.split_index), Some(3));
    assert_eq!(summary.average_ms, 31_500);
    // population stdev of the deviations around 31500 ms
    assert_eq!(summary.consistency_ms, 1_118);
}

#[test]
fn test_single_split_is_perfectly_consistent() {
    let s = splits(&[29_870]);
    assert_eq!(average_split_time(&s), 29_870);
    assert_eq!(split_consistency(&s), 0);
}

proptest! {
    #[test]
    fn prop_zero_time_never_divides(distance in 0.0f64..2000.0, strokes in 0u32..400) {
        prop_assert_eq!(velocity(distance, 0), 0.0);
        prop_assert_eq!(stroke_frequency(strokes, 0), 0.0);
        prop_assert_eq!(distance_per_stroke(distance, 0), 0.0);
    }

    #[test]
    fn prop_metrics_are_finite_and_non_negative(
        distance in 0.0f64..2000.0,
        time_ms in -10_000i64..2_000_000,
        strokes in 0u32..400,
    ) {
        let m = SwimmingMetrics::calculate(distance, time_ms, strokes, None, None);
        for value in [m.dps, m.stroke_frequency, m.swim_index, m.velocity] {
            prop_assert!(value.is_finite());
            prop_assert!(value >= 0.0);
        }
    }

    #[test]
    fn prop_rounding_is_idempotent(value in -1.0e6f64..1.0e6, decimals in 0i32..3) {
        let once = round_half_up(value, decimals);
        prop_assert!((round_half_up(once, decimals) - once).abs() < 1e-9);
    }

    #[test]
    fn prop_fastest_not_slower_than_slowest(times in prop::collection::vec(1i64..200_000, 1..20)) {
        let s = splits(&times);
        let summary = SplitSummary::from_splits(&s);
        let fastest = summary.fastest.map(|f| f.split_time_ms).unwrap_or_default();
        let slowest = summary.slowest.map(|f| f.split_time_ms).unwrap_or_default();
        prop_assert!(fastest <= slowest);
        prop_assert_eq!(summary.cumulative_ms.last().copied(), Some(times.iter().sum::<i64>()));
    }
}
