//! Unit tests for the swimming catalog and time strings.

use chrono::NaiveDate;
use sportia::swimming::{
    age_at, age_category, format_event, rpe_label, time_string_to_ms, validate_rpe, PoolType,
    SwimStroke, SwimmingError,
};

#[test]
fn test_age_category_from_birth_date() {
    let birth = NaiveDate::from_ymd_opt(2011, 9, 15).unwrap();
    let before_birthday = NaiveDate::from_ymd_opt(2025, 9, 14).unwrap();
    let on_birthday = NaiveDate::from_ymd_opt(2025, 9, 15).unwrap();

    assert_eq!(age_at(birth, before_birthday), 13);
    assert_eq!(age_at(birth, on_birthday), 14);
    assert_eq!(age_category(age_at(birth, on_birthday)).code, "13-14");
    assert_eq!(age_category(40).code, "OPEN");
}

#[test]
fn test_rpe_scale_bounds() {
    assert_eq!(rpe_label(1), Some("Muy muy fácil"));
    assert_eq!(rpe_label(10), Some("Máximo esfuerzo"));
    assert_eq!(rpe_label(0), None);
    assert_eq!(validate_rpe(11), Err(SwimmingError::InvalidRpe(11)));
    assert_eq!(validate_rpe(7), Ok(7));
}

#[test]
fn test_stroke_catalog_round_trip() {
    for stroke in SwimStroke::ALL {
        assert_eq!(SwimStroke::from_id(stroke.id()), Some(stroke));
        assert_eq!(SwimStroke::from_str(stroke.as_str()), Some(stroke));
    }
    assert_eq!(PoolType::default().length_m(), 25);
    assert_eq!(PoolType::Lcm.length_m(), 50);
}

#[test]
fn test_time_input_and_event_label() {
    assert_eq!(time_string_to_ms(" 1:05.43 ").unwrap(), 65_430);
    assert!(matches!(time_string_to_ms("1:xx"), Err(SwimmingError::InvalidTime(_))));
    assert_eq!(format_event(400, SwimStroke::Im), "400m Combinado");
}
