//! Swimmer lookup against the federation's published swimmer list.
//!
//! The federation list uses its own spelling conventions ("Apellido, Nombre"
//! with stray double spaces), so it is compared with a lighter key than the
//! roster matcher uses.

use serde::{Deserialize, Serialize};

/// Minimum length ratio for a containment match to be accepted.
pub const LOOKUP_MIN_RATIO: f64 = 0.7;

/// A swimmer option from the federation list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FederationSwimmer {
    pub id: String,
    pub name: String,
}

/// Lowercase, trim, drop commas, halve double spaces.
pub fn lookup_key(name: &str) -> String {
    name.to_lowercase().trim().replace(',', "").replace("  ", " ")
}

/// Federation id for `swimmer_name`.
///
/// An exact key match wins immediately. Otherwise the option whose key
/// contains (or is contained in) the query with the best length ratio is
/// taken, provided the ratio reaches [`LOOKUP_MIN_RATIO`].
pub fn lookup_swimmer_id<'a>(
    swimmer_name: &str,
    options: &'a [FederationSwimmer],
) -> Option<&'a str> {
    let search = lookup_key(swimmer_name);
    let search_len = search.chars().count();
    let mut best: Option<(&FederationSwimmer, f64)> = None;

    for option in options {
        if option.id.is_empty() || option.name.trim().is_empty() {
            continue;
        }
        let key = lookup_key(&option.name);

        if key == search {
            tracing::info!("Exact match: {} = ID {}", option.name, option.id);
            return Some(&option.id);
        }

        if key.contains(&search) || search.contains(&key) {
            let ratio = search_len as f64 / search_len.max(key.chars().count()) as f64;
            if best.map_or(true, |(_, r)| ratio > r) {
                best = Some((option, ratio));
            }
        }
    }

    match best {
        Some((option, ratio)) if ratio >= LOOKUP_MIN_RATIO => {
            tracing::info!(
                "Similarity match ({:.0}%): {} = ID {}",
                ratio * 100.0,
                option.name,
                option.id
            );
            Some(&option.id)
        }
        _ => {
            tracing::warn!("No federation id found for '{}'", swimmer_name);
            None
        }
    }
}

/// Options whose key contains the query key, in list order, at most `limit`.
pub fn search_swimmers<'a>(
    query: &str,
    options: &'a [FederationSwimmer],
    limit: usize,
) -> Vec<&'a FederationSwimmer> {
    let query = lookup_key(query);
    options
        .iter()
        .filter(|o| !o.id.is_empty() && !o.name.trim().is_empty())
        .filter(|o| lookup_key(&o.name).contains(&query))
        .take(limit)
        .collect()
}
