//! Unit tests for name normalisation, similarity and unmatched grouping.

use proptest::prelude::*;
use sportia::matching::{
    group_unmatched, lookup_swimmer_id, name_similarity, normalize_name, summarize_unmatched,
    Athlete, AthleteMatcher, FederationSwimmer, GroupBy, UnmatchedGroups, UnmatchedResultRow,
};
use sportia::swimming::Gender;

#[test]
fn test_result_list_spellings_match_roster() {
    let mut victoria = Athlete::new("Victoria", "Serrano");
    victoria.club_id = Some("delfines".to_string());
    let roster = vec![victoria.clone(), Athlete::new("Luis", "Vega")];

    let matcher = AthleteMatcher::new();
    for spelling in ["VICTORIA SERRANO", "Victória  Serrano", "victoria serrano"] {
        let matches = matcher.find_matches(spelling, &roster, Some("delfines"));
        assert_eq!(matches.len(), 1, "{spelling}");
        assert_eq!(matches[0].athlete_id, victoria.id);
        assert_eq!(matches[0].similarity_score, 1.0);
    }
}

#[test]
fn test_partial_name_scores_containment() {
    // "victoria serrano" inside "victoria serrano mora": Jaccard 2/3, boosted to 0.7
    let score = name_similarity("Victoria Serrano", "Victoria Serrano Mora");
    assert!((score - 0.7).abs() < 1e-12);
}

#[test]
fn test_federation_lookup_prefers_exact_key() {
    let options = vec![
        FederationSwimmer {
            id: "7".to_string(),
            name: "Victoria Serrano Mora".to_string(),
        },
        FederationSwimmer {
            id: "8".to_string(),
            name: "Victoria  Serrano".to_string(),
        },
    ];
    assert_eq!(lookup_swimmer_id("victoria serrano", &options), Some("8"));
    assert_eq!(lookup_swimmer_id("Luis Vega", &options), None);
}

#[test]
fn test_unmatched_pipeline_groups_by_team_and_gender() {
    let row = |name: &str, gender: &str, team: Option<&str>| UnmatchedResultRow {
        swimmer_name: name.to_string(),
        swimmer_name_norm: normalize_name(name),
        gender: Some(gender.to_string()),
        team_code: team.map(str::to_string),
    };
    let rows = vec![
        row("Ana Sol", "Mujeres", Some("TIB")),
        row("Ana Sol", "Mujeres", Some("TIB")),
        row("Juan Paz", "Hombres", Some("TIB")),
        row("Eva Luz", "F", None),
    ];

    let swimmers = summarize_unmatched(&rows, 100);
    assert_eq!(swimmers[0].swimmer_name, "Ana Sol");
    assert_eq!(swimmers[0].result_count, 2);

    let UnmatchedGroups::Both(groups) = group_unmatched(&swimmers, GroupBy::Both) else {
        panic!("expected combined grouping");
    };
    assert_eq!(groups["TIB"][&Gender::Female].len(), 1);
    assert_eq!(groups["TIB"][&Gender::Male].len(), 1);
    assert_eq!(groups["SIN_CLUB"][&Gender::Female][0].swimmer_name, "Eva Luz");
    assert!(groups["SIN_CLUB"][&Gender::Male].is_empty());
}

proptest! {
    #[test]
    fn prop_similarity_is_symmetric(a in "[a-zA-Zéñ ]{0,24}", b in "[a-zA-Zéñ ]{0,24}") {
        prop_assert_eq!(name_similarity(&a, &b), name_similarity(&b, &a));
    }

    #[test]
    fn prop_similarity_in_unit_range(a in "[a-z ]{0,24}", b in "[a-z ]{0,24}") {
        let score = name_similarity(&a, &b);
        prop_assert!((0.0..=1.0).contains(&score));
    }

    #[test]
    fn prop_normalize_is_idempotent(name in "\\PC{0,32}") {
        let once = normalize_name(&name);
        prop_assert_eq!(normalize_name(&once), once.clone());
    }

    #[test]
    fn prop_non_empty_name_matches_itself(name in "[a-z]{1,10}( [a-z]{1,10}){0,2}") {
        prop_assert_eq!(name_similarity(&name, &name), 1.0);
    }
}
