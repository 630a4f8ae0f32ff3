//! Name normalisation and similarity scoring.

use std::collections::HashSet;

use unicode_normalization::UnicodeNormalization;

/// Score given when one normalised name contains the other.
pub const CONTAINMENT_SCORE: f64 = 0.7;

/// Fold a name for comparison: strip accents, drop non-ASCII, lowercase,
/// collapse whitespace.
///
/// `"José  Pérez"` and `"jose perez"` normalise to the same key.
pub fn normalize_name(name: &str) -> String {
    let ascii: String = name.nfkd().filter(|c| c.is_ascii()).collect();
    ascii
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Similarity of two names in `[0, 1]`.
///
/// Word-set Jaccard index of the normalised names, raised to
/// [`CONTAINMENT_SCORE`] when one name is a substring of the other.
/// Identical names score `1.0`; an empty name scores `0.0`.
pub fn name_similarity(a: &str, b: &str) -> f64 {
    let a = normalize_name(a);
    let b = normalize_name(b);

    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }

    let words_a: HashSet<&str> = a.split(' ').collect();
    let words_b: HashSet<&str> = b.split(' ').collect();

    let intersection = words_a.intersection(&words_b).count();
    let union = words_a.union(&words_b).count();
    let mut score = if union > 0 {
        intersection as f64 / union as f64
    } else {
        0.0
    };

    if a.contains(&b) || b.contains(&a) {
        score = score.max(CONTAINMENT_SCORE);
    }

    score
}
