//! Swimming domain errors.

use thiserror::Error;

/// Errors raised while parsing or validating swimming values.
#[derive(Debug, Error, PartialEq)]
pub enum SwimmingError {
    /// Time string that is neither `m:ss.cc` nor `ss.cc`.
    #[error("Invalid time: {0}")]
    InvalidTime(String),

    /// RPE outside the 1-10 scale.
    #[error("RPE must be between 1 and 10, got {0}")]
    InvalidRpe(u8),
}
