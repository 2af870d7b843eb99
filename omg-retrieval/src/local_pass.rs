use omg_core::model::RegistryEntry;
use omg_similarity::{combined_similarity, key_prefix};

use crate::candidate::MergeCandidate;

#[derive(Debug, Clone)]
pub struct LocalHit {
    pub id: String,
    pub score: f64,
}

/// Local merge-target pass (spec.md §4.6): filter to same `type` and
/// same `keyPrefix(canonicalKey)`, score by `combinedSimilarity`, keep
/// top `top_m`.
pub fn local_pass(entries: &[(String, RegistryEntry)], candidate: &MergeCandidate, top_m: usize) -> Vec<LocalHit> {
    let candidate_prefix = key_prefix(&candidate.canonical_key);
    let mut hits: Vec<LocalHit> = entries
        .iter()
        .filter(|(_, e)| !e.archived && e.node_type == candidate.node_type)
        .filter(|(_, e)| e.canonical_key.as_deref().map(key_prefix).unwrap_or("") == candidate_prefix)
        .map(|(id, e)| {
            let score = combined_similarity(
                &candidate.description,
                &e.description,
                &candidate.canonical_key,
                e.canonical_key.as_deref().unwrap_or(""),
            );
            LocalHit { id: id.clone(), score }
        })
        .collect();
    hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    hits.truncate(top_m);
    hits
}
