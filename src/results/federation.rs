//! Records returned by the federation's per-swimmer results service.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::importer::ImportError;
use super::types::{CompetitionResult, SOURCE_FEDERATION_API};
use crate::matching::normalize_name;
use crate::swimming::{Gender, PoolType, SwimStroke};

/// An event as numbered by the federation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FederationEvent {
    pub id: u32,
    pub distance_m: u32,
    pub stroke: SwimStroke,
    pub pool: PoolType,
}

const fn scm(id: u32, distance_m: u32, stroke: SwimStroke) -> FederationEvent {
    FederationEvent {
        id,
        distance_m,
        stroke,
        pool: PoolType::Scm,
    }
}

/// Federation event numbers for individual short course events.
pub const FEDERATION_EVENTS: [FederationEvent; 17] = [
    scm(2, 50, SwimStroke::Free),
    scm(3, 100, SwimStroke::Free),
    scm(4, 200, SwimStroke::Free),
    scm(5, 400, SwimStroke::Free),
    scm(6, 800, SwimStroke::Free),
    scm(7, 1500, SwimStroke::Free),
    scm(9, 50, SwimStroke::Back),
    scm(10, 100, SwimStroke::Back),
    scm(11, 200, SwimStroke::Back),
    scm(13, 50, SwimStroke::Breast),
    scm(14, 100, SwimStroke::Breast),
    scm(15, 200, SwimStroke::Breast),
    scm(17, 50, SwimStroke::Fly),
    scm(18, 100, SwimStroke::Fly),
    scm(19, 200, SwimStroke::Fly),
    scm(21, 200, SwimStroke::Im),
    scm(22, 400, SwimStroke::Im),
];

/// Look up a federation event number.
pub fn federation_event(id: u32) -> Option<&'static FederationEvent> {
    FEDERATION_EVENTS.iter().find(|e| e.id == id)
}

/// Federation number for an event, if the federation lists it.
pub fn federation_event_id(distance_m: u32, stroke: SwimStroke) -> Option<u32> {
    FEDERATION_EVENTS
        .iter()
        .find(|e| e.distance_m == distance_m && e.stroke == stroke)
        .map(|e| e.id)
}

/// One row of the results service, field names as sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiResultRecord {
    /// Event number, see [`FEDERATION_EVENTS`]
    pub prueba: u32,
    /// `HH:MM:SS.cc`
    #[serde(default)]
    pub tiempo: Option<String>,
    /// Seconds as a number or numeric string
    #[serde(default)]
    pub segundos: Option<Value>,
    /// `yyyy-mm-dd`
    #[serde(default)]
    pub fecha_torneo: Option<String>,
    #[serde(default)]
    pub genero: Option<String>,
    #[serde(default)]
    pub torneo: Option<String>,
    #[serde(default)]
    pub edad: Option<u32>,
    #[serde(default)]
    pub nadador: Option<String>,
}

/// Convert a service record into a result linked to `athlete_id`.
pub fn transform_api_result(
    record: &ApiResultRecord,
    athlete_id: Uuid,
) -> Result<CompetitionResult, ImportError> {
    let event = federation_event(record.prueba)
        .ok_or_else(|| ImportError::InvalidRecord(format!("unknown event {}", record.prueba)))?;

    let final_time_ms = record
        .tiempo
        .as_deref()
        .and_then(clock_time_ms)
        .or_else(|| record.segundos.as_ref().and_then(seconds_value_ms))
        .filter(|ms| *ms > 0)
        .ok_or_else(|| ImportError::InvalidRecord("missing result time".to_string()))?;

    let fecha = record.fecha_torneo.as_deref().map(str::trim).filter(|f| !f.is_empty());
    let year = fecha.and_then(|f| f.split('-').next()).and_then(|y| y.parse().ok());
    let event_date = fecha.and_then(|f| NaiveDate::parse_from_str(f, "%Y-%m-%d").ok());

    let gender = match record.genero.as_deref().map(|g| g.trim().to_uppercase()).as_deref() {
        Some("M") | Some("MASCULINO") => Gender::Male,
        _ => Gender::Female,
    };

    let swimmer_name = record.nadador.clone().unwrap_or_default();

    Ok(CompetitionResult {
        year,
        tournament_name: record.torneo.clone().unwrap_or_default(),
        event_date,
        gender,
        distance_m: event.distance_m,
        stroke: event.stroke,
        round: None,
        age: record.edad,
        swimmer_name_norm: normalize_name(&swimmer_name),
        swimmer_name,
        team_code: None,
        rank: None,
        final_time_ms,
        seed_time_ms: None,
        source: SOURCE_FEDERATION_API.to_string(),
        athlete_id: Some(athlete_id),
    })
}

/// `HH:MM:SS.cc` to milliseconds. Other shapes give `None`.
fn clock_time_ms(raw: &str) -> Option<i64> {
    let parts: Vec<&str> = raw.trim().split(':').collect();
    let [hours, minutes, seconds] = parts.as_slice() else {
        return None;
    };
    let hours: i64 = hours.parse().ok()?;
    let minutes: i64 = minutes.parse().ok()?;
    hours
        .checked_mul(3_600_000)?
        .checked_add(minutes.checked_mul(60_000)?)?
        .checked_add(seconds_text_ms(seconds)?)
}

/// `SS.fff` to milliseconds without going through floating point.
fn seconds_text_ms(raw: &str) -> Option<i64> {
    let (whole, fraction) = raw.split_once('.').unwrap_or((raw, ""));
    let whole: i64 = whole.parse().ok()?;
    let digits: String = fraction.chars().chain("000".chars()).take(3).collect();
    let fraction: i64 = digits.parse().ok()?;
    whole.checked_mul(1000)?.checked_add(fraction)
}

fn seconds_value_ms(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_f64().map(|s| (s * 1000.0).round() as i64),
        Value::String(s) => seconds_text_ms(s.trim()),
        _ => None,
    }
}
