//! Unit tests for session-RPE training load.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use sportia::metrics::{daily_loads, sessions_with_load};
use sportia::swimming::{SessionType, TrainingSession};

fn session(date: NaiveDate, rpe: u8, minutes: u32) -> TrainingSession {
    TrainingSession {
        id: format!("s-{}", date),
        athlete_id: "athlete".to_string(),
        session_date: date,
        session_type: SessionType::Threshold,
        duration_min: minutes,
        session_rpe: rpe,
        notes: None,
    }
}

#[test]
fn test_session_load_is_rpe_times_minutes() {
    let start = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
    let sessions = vec![
        session(start, 6, 60),
        session(start + Duration::days(2), 8, 45),
        session(start + Duration::days(1), 3, 30),
    ];

    let loads = sessions_with_load(&sessions);
    let by_date: Vec<(NaiveDate, f64)> =
        loads.iter().map(|l| (l.session_date, l.training_load)).collect();
    assert_eq!(
        by_date,
        vec![
            (start + Duration::days(2), 360.0),
            (start + Duration::days(1), 90.0),
            (start, 360.0),
        ]
    );
    assert!(loads.iter().all(|l| l.session_type == SessionType::Threshold));
}

#[test]
fn test_rest_days_have_zero_load() {
    let start = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
    let sessions = vec![session(start, 5, 60), session(start + Duration::days(3), 7, 90)];

    let loads = daily_loads(&sessions);
    assert_eq!(loads.len(), 4);
    assert_eq!(loads[0], (start, 300.0));
    assert_eq!(loads[1].1, 0.0);
    assert_eq!(loads[2].1, 0.0);
    assert_eq!(loads[3], (start + Duration::days(3), 630.0));
}

proptest! {
    #[test]
    fn prop_daily_loads_preserve_total(
        days in prop::collection::vec((0i64..30, 1u8..=10, 10u32..180), 1..40)
    ) {
        let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let sessions: Vec<TrainingSession> = days
            .iter()
            .map(|(offset, rpe, minutes)| session(start + Duration::days(*offset), *rpe, *minutes))
            .collect();

        let expected: f64 = sessions_with_load(&sessions).iter().map(|l| l.training_load).sum();
        let loads = daily_loads(&sessions);
        let total: f64 = loads.iter().map(|(_, l)| l).sum();

        prop_assert!((total - expected).abs() < 1e-6);
        prop_assert!(loads.windows(2).all(|w| w[1].0 - w[0].0 == Duration::days(1)));
    }
}
