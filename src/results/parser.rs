//! Parsers for the free-text columns of federation result lists.
//!
//! Result lists mix Spanish and English labels and pack several facts into
//! one "style" column, e.g. `"18-20 400 CI Chequeo de Tiempo"`.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use super::types::Round;
use crate::swimming::{Gender, SwimStroke};

/// Individual event distances accepted on import.
pub const VALID_DISTANCES: [u32; 6] = [50, 100, 200, 400, 800, 1500];

/// Time placeholders for swims without a result.
pub const NO_TIME_MARKERS: [&str; 5] = ["NT", "DQ", "DNS", "DNF", "NS"];

/// Style keywords, checked in order against the lowercase style text.
const STYLE_KEYWORDS: [(&str, SwimStroke); 11] = [
    ("libre", SwimStroke::Free),
    ("espalda", SwimStroke::Back),
    ("pecho", SwimStroke::Breast),
    ("mariposa", SwimStroke::Fly),
    ("ci", SwimStroke::Im),
    ("combinado", SwimStroke::Im),
    ("free", SwimStroke::Free),
    ("back", SwimStroke::Back),
    ("breast", SwimStroke::Breast),
    ("fly", SwimStroke::Fly),
    ("im", SwimStroke::Im),
];

/// Gender words, longest first so "women" is tried before "men"
/// and "female" before "male".
const GENDER_KEYWORDS: [(&str, Gender); 8] = [
    ("masculino", Gender::Male),
    ("femenino", Gender::Female),
    ("hombres", Gender::Male),
    ("mujeres", Gender::Female),
    ("female", Gender::Female),
    ("women", Gender::Female),
    ("male", Gender::Male),
    ("men", Gender::Male),
];

const DATE_FORMATS: [&str; 3] = ["%d/%m/%Y", "%Y-%m-%d", "%m/%d/%Y"];

fn distance_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\b(50|100|200|400|800|1500)\b").expect("distance pattern is valid")
    })
}

/// Parse `mm:ss.cc` or `ss.cc` into milliseconds.
///
/// Placeholders (`NT`, `DQ`, ...), blanks, malformed text and times too
/// large for `i64` milliseconds give `None`.
pub fn parse_result_time(raw: Option<&str>) -> Option<i64> {
    let time = raw?.trim();
    if time.is_empty() || NO_TIME_MARKERS.contains(&time) {
        return None;
    }

    let parts: Vec<&str> = time.split(':').collect();
    let (minutes, rest) = match parts.as_slice() {
        [minutes, rest] => (minutes.trim().parse::<i64>().ok()?, *rest),
        [rest] => (0, *rest),
        _ => return None,
    };

    let mut seconds_parts = rest.split('.');
    let seconds: i64 = seconds_parts.next()?.trim().parse().ok()?;
    let centis: i64 = match seconds_parts.next() {
        Some(c) => c.trim().parse().ok()?,
        None => 0,
    };

    minutes
        .checked_mul(60)?
        .checked_add(seconds)?
        .checked_mul(1000)?
        .checked_add(centis.checked_mul(10)?)
}

/// First stroke keyword found in the style text.
pub fn parse_style(raw: &str) -> Option<SwimStroke> {
    if raw.is_empty() {
        return None;
    }
    let lower = raw.to_lowercase();
    STYLE_KEYWORDS
        .iter()
        .find(|(key, _)| lower.contains(key))
        .map(|(_, stroke)| *stroke)
}

/// Map a gender label (`M`, `Women`, `Hombres`, ...) to M/F.
pub fn parse_gender(raw: &str) -> Option<Gender> {
    let lower = raw.trim().to_lowercase();
    match lower.as_str() {
        "" => return None,
        "m" => return Some(Gender::Male),
        "f" => return Some(Gender::Female),
        _ => {}
    }
    GENDER_KEYWORDS
        .iter()
        .find(|(key, _)| lower.contains(key))
        .map(|(_, gender)| *gender)
}

/// First standalone event distance in the text, e.g. `"14&O 100 Free"` -> 100.
pub fn extract_distance(raw: &str) -> Option<u32> {
    distance_pattern()
        .captures(raw)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Parse `dd/mm/yyyy`, `yyyy-mm-dd` or `mm/dd/yyyy`, in that order of preference.
pub fn parse_event_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Round named in the style text.
pub fn extract_round(raw: &str) -> Option<Round> {
    let lower = raw.to_lowercase();
    if lower.contains("final") {
        Some(Round::Final)
    } else if lower.contains("prelim") || lower.contains("elimin") {
        Some(Round::Prelim)
    } else if lower.contains("time trial") || lower.contains("chequeo") {
        Some(Round::TimeTrial)
    } else {
        None
    }
}

/// Whether `distance_m` is an accepted individual event distance.
pub fn is_valid_distance(distance_m: u32) -> bool {
    VALID_DISTANCES.contains(&distance_m)
}
