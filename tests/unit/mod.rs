//! Unit test modules.

mod load_test;
mod matching_test;
mod metrics_test;
mod results_test;
mod swimming_test;
