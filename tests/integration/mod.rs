//! Integration test modules.

mod import_pipeline_test;
mod progress_test;
