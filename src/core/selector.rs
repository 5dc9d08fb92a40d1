use std::collections::HashSet;

use crate::models::ScoredCandidate;

/// Upper bound on matches returned by either mode
pub const MAX_MATCHES: usize = 2;

/// Rank every profile in a similarity row against the requester
///
/// Sorts by descending score. Equal scores keep their corpus order
/// (`sort_by` is stable); the tie-break carries no meaning beyond being
/// deterministic. The requester and any score `<= 0` (or NaN) are
/// dropped before sorting, which leaves the relative order unchanged.
pub fn rank_candidates(row: &[f64], requester: usize) -> Vec<ScoredCandidate> {
    let mut ranked: Vec<ScoredCandidate> = row
        .iter()
        .enumerate()
        .map(|(index, &score)| ScoredCandidate { index, score })
        .filter(|c| c.index != requester)
        .filter(|c| c.score > 0.0)
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    ranked
}

/// Top `limit` ranked candidates for the stateless recommender
pub fn select_top(ranked: &[ScoredCandidate], limit: usize) -> Vec<ScoredCandidate> {
    ranked.iter().take(limit).copied().collect()
}

/// Top `limit` ranked names not already present in an active pairing
pub fn select_unpaired(ranked_names: &[String], paired: &HashSet<String>, limit: usize) -> Vec<String> {
    ranked_names
        .iter()
        .filter(|name| !paired.contains(name.as_str()))
        .take(limit)
        .cloned()
        .collect()
}
