//! Swimming performance metrics: per-set indicators, splits, trends and training load.

pub mod calculator;
pub mod load;
pub mod progress;
pub mod splits;
pub mod trend;

pub use calculator::{
    distance_per_stroke, round_half_up, split_velocities, stroke_frequency, swim_index,
    total_stroke_count, training_load, velocity, SwimmingMetrics,
};
pub use load::{daily_loads, sessions_with_load, SessionLoad};
pub use progress::{
    merge_time_progress, metrics_progress, MetricsPoint, ProgressKind, TimeProgressChart,
    TimeProgressPoint,
};
pub use splits::{
    average_split_time, cumulative_times, fastest_split, slowest_split, split_consistency,
    SplitSummary,
};
pub use trend::TrendLine;
