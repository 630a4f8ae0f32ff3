//! Integration tests for the competition result pipeline.
//!
//! Tests the end-to-end flow:
//! 1. Read a federation export from disk
//! 2. Store the results
//! 3. Suggest roster matches for unmatched swimmers
//! 4. Review the queue (confirm, reject, auto-match)
//! 5. Chart an athlete's linked results

use rusqlite::Connection;
use sportia::matching::{summarize_unmatched, Athlete, AthleteMatcher};
use sportia::metrics::{ProgressKind, TimeProgressChart, TimeProgressPoint};
use sportia::results::{FederationImporter, ImportError};
use sportia::storage::{Database, MappingStatus, MappingStore, NewMapping};
use std::path::Path;

/// Write a federation export with a few swims by three swimmers.
fn write_export(path: &Path) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        "CREATE TABLE results (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            year INTEGER, tournament_name TEXT, event_date TEXT, gender TEXT,
            distance INTEGER, style TEXT, rank INTEGER, swimmer_name TEXT,
            age INTEGER, team TEXT, seed_time TEXT, final_time TEXT
        );
        INSERT INTO results (year, tournament_name, event_date, gender, distance, style, rank,
                             swimmer_name, age, team, seed_time, final_time) VALUES
        (2024, 'Copa Otoño', '12/10/2024', 'Mujeres', 100, '100 Libre Final', 3,
         'Victoria Serrano', 13, 'DEL', '1:09.00', '1:08.20'),
        (2025, 'Copa Invierno', '15/02/2025', 'Mujeres', 100, '100 Libre Final', 2,
         'Victoria Serrano', 14, 'DEL', '1:08.00', '1:06.90'),
        (2025, 'Nacional', '20/06/2025', 'Women', 100, '14&O 100 Free Finals', 1,
         'VICTORIA SERRANO', 14, 'DEL', NULL, '1:05.43'),
        (2025, 'Nacional', '20/06/2025', 'Men', 50, '14&O 50 Back Prelims', 4,
         'José Pérez', 15, 'TIB', NULL, '31.20'),
        (2025, 'Nacional', '20/06/2025', 'Men', 50, '14&O 50 Back Prelims', 9,
         'Mateo Ríos', 15, 'TIB', NULL, 'DQ');",
    )
    .unwrap();
}

#[test]
fn test_full_import_and_review_flow() {
    let dir = tempfile::tempdir().unwrap();
    let export_path = dir.path().join("federation.db");
    write_export(&export_path);

    // 1. Read the export
    let importer = FederationImporter::open(&export_path).unwrap();
    let stats = importer.stats().unwrap();
    assert_eq!(stats.total_records, 5);
    assert_eq!(stats.valid_records, 4);
    let results = importer.read_results(None, 0).unwrap();
    assert_eq!(results.len(), 4);

    // 2. Store them, twice to check the natural key
    let mut db = Database::open(&dir.path().join("sportia.db")).unwrap();
    let summary = db.upsert_results(&results, 2).unwrap();
    assert_eq!(summary.imported, 4);
    assert_eq!(summary.errors, 0);
    db.upsert_results(&results, 500).unwrap();
    assert_eq!(db.count_results(false).unwrap(), 4);

    // 3. Suggest matches for unmatched swimmers
    let mut victoria = Athlete::new("Victoria", "Serrano");
    victoria.club_id = Some("delfines".to_string());
    let jose = Athlete::new("José", "Pérez");
    db.insert_athlete(&victoria).unwrap();
    db.insert_athlete(&jose).unwrap();

    let unmatched = summarize_unmatched(&db.unmatched_result_rows(None).unwrap(), 100);
    assert_eq!(unmatched.len(), 2);
    assert_eq!(unmatched[0].swimmer_name_norm, "victoria serrano");
    assert_eq!(unmatched[0].result_count, 3);

    let roster = db.list_active_athletes(None).unwrap();
    let names: Vec<String> = unmatched.iter().map(|s| s.swimmer_name.clone()).collect();
    let suggestions = AthleteMatcher::new().suggest_batch(&names, &roster);

    // 4. Queue and review
    let store = MappingStore::new(db.connection());
    let mut mapping_ids = Vec::new();
    for suggestion in &suggestions {
        let best = suggestion.best_match.as_ref().unwrap();
        assert_eq!(best.similarity_score, 1.0);
        let mapping = store
            .create_mapping(&NewMapping::suggestion(
                &suggestion.external_name,
                Some(best.athlete_id),
                best.similarity_score,
            ))
            .unwrap();
        mapping_ids.push(mapping.id);
    }

    let preview = store.auto_match(0.99, true).unwrap();
    assert_eq!(preview.candidates.len(), 2);
    assert_eq!(store.match_stats().unwrap().results_linked, 0);

    store.reject_mapping(&mapping_ids[1], Some("coach")).unwrap();
    let report = store.auto_match(0.99, false).unwrap();
    assert_eq!(report.confirmed, 1);

    let stats = store.match_stats().unwrap();
    assert_eq!(stats.confirmed, 1);
    assert_eq!(stats.rejected, 1);
    assert_eq!(stats.pending, 0);
    assert_eq!(stats.results_linked, 3);
    assert_eq!(stats.results_unlinked, 1);

    let confirmed = store.get_mapping(&mapping_ids[0]).unwrap().unwrap();
    assert_eq!(confirmed.status, MappingStatus::Confirmed);
    assert_eq!(confirmed.athlete_id, Some(victoria.id));

    // 5. Chart the linked results
    let linked = db.results_for_athlete(&victoria.id).unwrap();
    let points: Vec<TimeProgressPoint> = linked
        .iter()
        .filter_map(TimeProgressPoint::from_competition)
        .collect();
    assert!(points.iter().all(|p| p.kind == ProgressKind::Competition));

    let chart = TimeProgressChart::build(&points);
    assert_eq!(chart.dates.len(), 3);
    assert_eq!(chart.competition.last().copied().flatten(), Some(65_430));
    assert!(chart.trend_line.map_or(false, |t| t.slope < 0.0));
}

#[test]
fn test_manual_confirm_links_later_imports_only_when_unlinked() {
    let dir = tempfile::tempdir().unwrap();
    let export_path = dir.path().join("federation.db");
    write_export(&export_path);

    let results = FederationImporter::open(&export_path)
        .unwrap()
        .read_results(None, 0)
        .unwrap();
    let mut db = Database::open_in_memory().unwrap();
    db.upsert_results(&results, 500).unwrap();

    let jose = Athlete::new("José", "Pérez");
    db.insert_athlete(&jose).unwrap();

    let store = MappingStore::new(db.connection());
    let mapping = store
        .create_mapping(&NewMapping::suggestion("Jose Perez", None, 0.5))
        .unwrap();
    let (_, linked) = store.confirm_mapping(&mapping.id, &jose.id, None).unwrap();
    assert_eq!(linked, 1);

    // Already linked rows are left alone
    assert_eq!(store.link_results_to_athlete("jose perez", &jose.id).unwrap(), 0);
}

#[test]
fn test_missing_export_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let result = FederationImporter::open(&dir.path().join("missing.db"));
    assert!(matches!(result, Err(ImportError::FileNotFound(_))));
}
