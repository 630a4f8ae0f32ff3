//! Unit tests for federation result parsing.

use sportia::results::{
    federation_event_id, parse_gender, parse_result_time, parse_style, FEDERATION_EVENTS,
};
use sportia::swimming::{ms_to_time_string, Gender, SwimStroke};

#[test]
fn test_result_time_matches_display_format() {
    for text in ["1:05.43", "28.91", "16:40.02", "2:00.00"] {
        let ms = parse_result_time(Some(text)).unwrap();
        assert_eq!(ms_to_time_string(ms), text);
    }
}

#[test]
fn test_english_and_spanish_styles_agree() {
    let pairs = [
        ("50 Libre", "50 Free"),
        ("100 Espalda", "100 Back"),
        ("100 Pecho", "100 Breast"),
        ("200 Mariposa", "200 Fly"),
        ("200 Combinado", "200 IM"),
    ];
    for (es, en) in pairs {
        assert_eq!(parse_style(es), parse_style(en), "{es} / {en}");
        assert!(parse_style(es).is_some());
    }
}

#[test]
fn test_female_labels_are_not_read_as_male() {
    for label in ["Female", "FEMENINO", "Women 11-12", "Mujeres"] {
        assert_eq!(parse_gender(label), Some(Gender::Female), "{label}");
    }
    for label in ["Male", "MASCULINO", "Men 11-12", "Hombres"] {
        assert_eq!(parse_gender(label), Some(Gender::Male), "{label}");
    }
}

#[test]
fn test_federation_events_are_official_distances() {
    for event in FEDERATION_EVENTS {
        assert!(
            event.stroke.is_official_distance(event.distance_m),
            "event {} is {}m {}",
            event.id,
            event.distance_m,
            event.stroke
        );
    }
    assert_eq!(federation_event_id(1500, SwimStroke::Free), Some(7));
    assert_eq!(federation_event_id(200, SwimStroke::Im), Some(21));
}
