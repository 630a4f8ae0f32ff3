//! Sportia - swimming metrics and competition results for club coaches.
//!
//! Computes stroke metrics, split statistics, time trends and training
//! load from training sets, and imports federation competition results,
//! matching their free-text swimmer names against the club roster.

pub mod matching;
pub mod metrics;
pub mod results;
pub mod storage;
pub mod swimming;

// Re-export commonly used types
pub use matching::{Athlete, AthleteMatcher};
pub use metrics::{SplitSummary, SwimmingMetrics, TimeProgressChart, TrendLine};
pub use results::{CompetitionResult, FederationImporter};
pub use storage::{AppConfig, Database, MappingStore};
pub use swimming::{SwimStroke, TrainingSet, TrainingSplit};
