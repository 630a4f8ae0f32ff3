//! Competition results: federation export parsing and import.

pub mod federation;
pub mod importer;
pub mod parser;
pub mod types;

pub use federation::{
    federation_event, federation_event_id, transform_api_result, ApiResultRecord,
    FederationEvent, FEDERATION_EVENTS,
};
pub use importer::{FederationImporter, ImportError};
pub use parser::{
    extract_distance, extract_round, is_valid_distance, parse_event_date, parse_gender,
    parse_result_time, parse_style, NO_TIME_MARKERS, VALID_DISTANCES,
};
pub use types::{
    CompetitionResult, ExportStats, Round, SOURCE_FEDERATION_API, SOURCE_FEDERATION_EXPORT,
};
