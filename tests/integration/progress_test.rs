//! Integration tests for an athlete's season view.
//!
//! Tests the end-to-end flow:
//! 1. Collect training sets and federation results for one event
//! 2. Merge them into a single time progression
//! 3. Chart the progression with its trend
//! 4. Track stroke metrics and training load over the same weeks

use chrono::{Duration, NaiveDate};
use serde_json::json;
use sportia::metrics::{
    daily_loads, merge_time_progress, metrics_progress, sessions_with_load, ProgressKind,
    TimeProgressChart, TimeProgressPoint,
};
use sportia::results::{transform_api_result, ApiResultRecord};
use sportia::swimming::{SessionType, SwimStroke, TrainingSession, TrainingSet, TrainingStroke};
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn free_100(session_id: &str, time_ms: i64, counts: &[u32]) -> TrainingSet {
    TrainingSet {
        id: format!("{session_id}-set"),
        session_id: session_id.to_string(),
        distance_m: 100,
        stroke: SwimStroke::Free,
        pool_length_m: 25,
        total_time_ms: time_ms,
        attempt_no: 1,
        is_best: true,
        strokes: counts
            .iter()
            .enumerate()
            .map(|(i, c)| TrainingStroke { length_index: i as u32 + 1, stroke_count: *c })
            .collect(),
        splits: Vec::new(),
    }
}

fn api_result(tiempo: &str, fecha: &str, torneo: &str) -> ApiResultRecord {
    ApiResultRecord {
        prueba: 3,
        tiempo: Some(tiempo.to_string()),
        segundos: Some(json!(0)),
        fecha_torneo: Some(fecha.to_string()),
        genero: Some("F".to_string()),
        torneo: Some(torneo.to_string()),
        edad: Some(14),
        nadador: Some("Victoria Serrano".to_string()),
    }
}

#[test]
fn test_season_progression_chart() {
    let athlete_id = Uuid::new_v4();

    // 1. Training tests and federation results
    let sets = [
        (date(2025, 1, 10), free_100("s1", 70_500, &[18, 19, 19, 20])),
        (date(2025, 2, 14), free_100("s2", 69_200, &[18, 18, 19, 19])),
        (date(2025, 4, 4), free_100("s3", 67_800, &[17, 18, 18, 19])),
    ];
    let training: Vec<TimeProgressPoint> = sets
        .iter()
        .map(|(d, set)| TimeProgressPoint::from_training(set, *d))
        .collect();

    let competition: Vec<TimeProgressPoint> = [
        api_result("00:01:08.90", "2025-02-15", "Copa Invierno"),
        api_result("00:01:06.40", "2025-05-20", "Nacional"),
    ]
    .iter()
    .map(|r| transform_api_result(r, athlete_id).unwrap())
    .inspect(|r| assert_eq!(r.athlete_id, Some(athlete_id)))
    .filter_map(|r| TimeProgressPoint::from_competition(&r))
    .collect();
    assert_eq!(competition.len(), 2);
    assert!(competition.iter().all(|p| p.test_name == training[0].test_name));

    // 2. Merge
    let merged = merge_time_progress(training, competition);
    assert_eq!(merged.len(), 5);
    assert!(merged.windows(2).all(|w| w[0].date <= w[1].date));
    assert_eq!(merged[2].kind, ProgressKind::Competition);
    assert_eq!(merged[2].session_id, "Copa Invierno");

    // 3. Chart
    let chart = TimeProgressChart::build(&merged);
    assert_eq!(chart.dates.len(), 5);
    assert_eq!(chart.training[0], Some(70_500));
    assert_eq!(chart.competition[0], None);
    assert_eq!(chart.competition[4], Some(66_400));
    assert_eq!(chart.min_time_ms, Some(66_400));
    assert_eq!(chart.max_time_ms, Some(70_500));

    let trend = chart.trend_line.unwrap();
    assert!(trend.slope < 0.0);
    let projected: Vec<f64> = chart.trend.iter().map(|t| t.unwrap()).collect();
    assert!(projected.windows(2).all(|w| w[1] < w[0]));

    // 4. Stroke metrics per set
    let by_date: Vec<(NaiveDate, &TrainingSet)> = sets.iter().map(|(d, s)| (*d, s)).collect();
    let metrics = metrics_progress(&by_date);
    assert_eq!(metrics.len(), 3);
    assert!(metrics.last().unwrap().dps > metrics[0].dps);
    assert!(metrics.last().unwrap().swim_index > metrics[0].swim_index);
}

#[test]
fn test_weekly_training_load() {
    // Five weeks: five aerobic days, one easy technique day and one rest day a week
    let start = date(2025, 1, 6);
    let sessions: Vec<TrainingSession> = (0..35)
        .filter(|d| d % 7 != 6)
        .map(|d| TrainingSession {
            id: format!("s{d}"),
            athlete_id: "victoria".to_string(),
            session_date: start + Duration::days(d),
            session_type: if d % 7 == 5 { SessionType::Tech } else { SessionType::Aerobic },
            duration_min: if d % 7 == 5 { 45 } else { 90 },
            session_rpe: if d % 7 == 5 { 3 } else { 6 },
            notes: None,
        })
        .collect();

    let per_session = sessions_with_load(&sessions);
    assert_eq!(per_session.len(), 30);
    assert_eq!(per_session[0].session_date, date(2025, 2, 8));
    assert_eq!(per_session[0].session_type, SessionType::Tech);
    assert_eq!(per_session[0].training_load, 135.0);

    let loads = daily_loads(&sessions);
    // Rest days are filled in with zero load
    assert_eq!(loads.len(), 34);
    assert_eq!(loads[6].1, 0.0);

    let weekly: Vec<f64> = loads.chunks(7).map(|w| w.iter().map(|(_, l)| l).sum()).collect();
    assert_eq!(weekly[..4], [2835.0, 2835.0, 2835.0, 2835.0]);
}
