//! Swimming domain: strokes, pools, training rows, age groups and time strings.

pub mod catalog;
pub mod error;
pub mod time;
pub mod types;

pub use catalog::{
    age_at, age_category, rpe_label, validate_rpe, AgeCategory, AGE_CATEGORIES, RPE_SCALE,
};
pub use error::SwimmingError;
pub use time::{format_event, ms_to_time_string, time_string_to_ms};
pub use types::{
    Gender, PoolType, SessionType, SwimStroke, TrainingSession, TrainingSet, TrainingSplit,
    TrainingStroke,
};
