//! Age categories and RPE scale.

use chrono::{Datelike, NaiveDate};

use super::error::SwimmingError;

/// An age group used for competition rankings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeCategory {
    pub code: &'static str,
    pub label: &'static str,
    pub min_age: u32,
    pub max_age: u32,
}

/// Age groups, youngest first.
pub const AGE_CATEGORIES: [AgeCategory; 6] = [
    AgeCategory { code: "10-", label: "10 y menores", min_age: 0, max_age: 10 },
    AgeCategory { code: "11-12", label: "11-12 años", min_age: 11, max_age: 12 },
    AgeCategory { code: "13-14", label: "13-14 años", min_age: 13, max_age: 14 },
    AgeCategory { code: "15-16", label: "15-16 años", min_age: 15, max_age: 16 },
    AgeCategory { code: "17-18", label: "17-18 años", min_age: 17, max_age: 18 },
    AgeCategory { code: "OPEN", label: "Abierta", min_age: 19, max_age: 99 },
];

/// Rate of perceived exertion labels, index 0 is RPE 1.
pub const RPE_SCALE: [&str; 10] = [
    "Muy muy fácil",
    "Fácil",
    "Moderado",
    "Algo difícil",
    "Difícil",
    "Más difícil",
    "Muy difícil",
    "Muy muy difícil",
    "Casi máximo",
    "Máximo esfuerzo",
];

/// Label for an RPE value, `None` outside 1-10.
pub fn rpe_label(rpe: u8) -> Option<&'static str> {
    if (1..=10).contains(&rpe) {
        Some(RPE_SCALE[(rpe - 1) as usize])
    } else {
        None
    }
}

/// Validate an RPE value (1-10).
pub fn validate_rpe(rpe: u8) -> Result<u8, SwimmingError> {
    if (1..=10).contains(&rpe) {
        Ok(rpe)
    } else {
        Err(SwimmingError::InvalidRpe(rpe))
    }
}

/// Age in whole years on `reference`, counting the birthday itself.
///
/// Saturates at zero for reference dates before the birth date.
pub fn age_at(birth_date: NaiveDate, reference: NaiveDate) -> u32 {
    let mut age = reference.year() - birth_date.year();
    if (reference.month(), reference.day()) < (birth_date.month(), birth_date.day()) {
        age -= 1;
    }
    age.max(0) as u32
}

/// Age category for a given age.
pub fn age_category(age: u32) -> &'static AgeCategory {
    AGE_CATEGORIES
        .iter()
        .find(|c| age <= c.max_age)
        .unwrap_or(&AGE_CATEGORIES[AGE_CATEGORIES.len() - 1])
}
