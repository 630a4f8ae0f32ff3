//! Race-time formatting and parsing.
//!
//! Times are carried as integer milliseconds and shown as `m:ss.cc`
//! (or `ss.cc` under a minute).

use super::error::SwimmingError;
use super::types::SwimStroke;

/// Format milliseconds as `m:ss.cc`, or `ss.cc` when under one minute.
///
/// Hundredths are rounded half-up. Negative input is shown as zero.
pub fn ms_to_time_string(ms: i64) -> String {
    let total_centis = ms.max(0).saturating_add(5) / 10;
    let minutes = total_centis / 6_000;
    let centis = total_centis % 6_000;
    let seconds = format!("{:02}.{:02}", centis / 100, centis % 100);

    if minutes > 0 {
        format!("{}:{}", minutes, seconds)
    } else {
        seconds
    }
}

/// Parse `m:ss.cc` or `ss.cc` into milliseconds, rounded to the nearest ms.
pub fn time_string_to_ms(time: &str) -> Result<i64, SwimmingError> {
    let invalid = || SwimmingError::InvalidTime(time.to_string());
    let trimmed = time.trim();
    let parts: Vec<&str> = trimmed.split(':').collect();

    let total_seconds = match parts.as_slice() {
        [minutes, seconds] => {
            let minutes: i64 = minutes.trim().parse().map_err(|_| invalid())?;
            let seconds: f64 = seconds.trim().parse().map_err(|_| invalid())?;
            minutes as f64 * 60.0 + seconds
        }
        [seconds] => seconds.parse::<f64>().map_err(|_| invalid())?,
        _ => return Err(invalid()),
    };

    if !total_seconds.is_finite() || total_seconds < 0.0 {
        return Err(invalid());
    }

    Ok((total_seconds * 1000.0).round() as i64)
}

/// Event label such as `100m Libre`.
pub fn format_event(distance_m: u32, stroke: SwimStroke) -> String {
    format!("{}m {}", distance_m, stroke.label_es())
}
