//! Summaries of competition swimmers not yet linked to an athlete.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::swimming::Gender;

/// Team key used for results without a team code.
pub const NO_TEAM: &str = "SIN_CLUB";

/// Map free-text gender labels onto M/F. Unknown or empty labels count as male.
pub fn normalize_gender(raw: Option<&str>) -> Gender {
    let Some(raw) = raw else {
        return Gender::Male;
    };
    match raw.trim().to_lowercase().as_str() {
        "f" | "women" | "female" | "mujeres" | "femenino" => Gender::Female,
        _ => Gender::Male,
    }
}

/// A raw result row lacking an athlete link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnmatchedResultRow {
    pub swimmer_name: String,
    pub swimmer_name_norm: String,
    pub gender: Option<String>,
    pub team_code: Option<String>,
}

/// One distinct unmatched swimmer and how many results they have.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnmatchedSwimmer {
    pub swimmer_name: String,
    pub swimmer_name_norm: String,
    pub gender: Gender,
    pub team_code: Option<String>,
    pub result_count: u32,
}

/// Collapse rows by normalised name, most results first, then by name.
///
/// The first row seen for a name supplies its display fields.
pub fn summarize_unmatched(rows: &[UnmatchedResultRow], limit: usize) -> Vec<UnmatchedSwimmer> {
    let mut order: Vec<String> = Vec::new();
    let mut swimmers: HashMap<String, UnmatchedSwimmer> = HashMap::new();

    for row in rows {
        let entry = swimmers
            .entry(row.swimmer_name_norm.clone())
            .or_insert_with(|| {
                order.push(row.swimmer_name_norm.clone());
                UnmatchedSwimmer {
                    swimmer_name: row.swimmer_name.clone(),
                    swimmer_name_norm: row.swimmer_name_norm.clone(),
                    gender: normalize_gender(row.gender.as_deref()),
                    team_code: row.team_code.clone(),
                    result_count: 0,
                }
            });
        entry.result_count += 1;
    }

    let mut summary: Vec<UnmatchedSwimmer> = order
        .into_iter()
        .filter_map(|key| swimmers.remove(&key))
        .collect();
    summary.sort_by(|a, b| {
        b.result_count
            .cmp(&a.result_count)
            .then_with(|| a.swimmer_name.cmp(&b.swimmer_name))
    });
    summary.truncate(limit);
    summary
}

/// How to bucket unmatched swimmers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    #[default]
    Team,
    Gender,
    Both,
}

impl GroupBy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "team" => Some(GroupBy::Team),
            "gender" => Some(GroupBy::Gender),
            "both" => Some(GroupBy::Both),
            _ => None,
        }
    }
}

/// Bucketed unmatched swimmers. Team keys are sorted alphabetically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UnmatchedGroups {
    Team(BTreeMap<String, Vec<UnmatchedSwimmer>>),
    Gender(BTreeMap<Gender, Vec<UnmatchedSwimmer>>),
    Both(BTreeMap<String, BTreeMap<Gender, Vec<UnmatchedSwimmer>>>),
}

/// Group swimmers, preserving their order inside each bucket.
///
/// Gender buckets always contain both M and F, possibly empty.
pub fn group_unmatched(swimmers: &[UnmatchedSwimmer], group_by: GroupBy) -> UnmatchedGroups {
    let team_of = |s: &UnmatchedSwimmer| {
        s.team_code
            .clone()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| NO_TEAM.to_string())
    };
    let empty_genders = || {
        BTreeMap::from([(Gender::Male, Vec::new()), (Gender::Female, Vec::new())])
    };

    match group_by {
        GroupBy::Team => {
            let mut groups: BTreeMap<String, Vec<UnmatchedSwimmer>> = BTreeMap::new();
            for s in swimmers {
                groups.entry(team_of(s)).or_default().push(s.clone());
            }
            UnmatchedGroups::Team(groups)
        }
        GroupBy::Gender => {
            let mut groups = empty_genders();
            for s in swimmers {
                groups.entry(s.gender).or_default().push(s.clone());
            }
            UnmatchedGroups::Gender(groups)
        }
        GroupBy::Both => {
            let mut groups: BTreeMap<String, BTreeMap<Gender, Vec<UnmatchedSwimmer>>> =
                BTreeMap::new();
            for s in swimmers {
                groups
                    .entry(team_of(s))
                    .or_insert_with(empty_genders)
                    .entry(s.gender)
                    .or_default()
                    .push(s.clone());
            }
            UnmatchedGroups::Both(groups)
        }
    }
}
