use omg_core::model::RegistryEntry;
use omg_similarity::combined_similarity;

use crate::extract_model::AcceptedOperation;

/// Post-extraction guardrail (spec.md §4.10): "for each candidate, compute
/// `combinedSimilarity` against entries of `lastObservationNodeIds`;
/// suppress those with similarity >= `candidateSuppressionThreshold`."
/// Returns the candidates that survive.
pub fn suppress_near_duplicates(
    candidates: Vec<AcceptedOperation>,
    last_observation_entries: &[RegistryEntry],
    candidate_suppression_threshold: f64,
) -> Vec<AcceptedOperation> {
    candidates
        .into_iter()
        .filter(|candidate| {
            let max_similarity = last_observation_entries
                .iter()
                .map(|entry| {
                    combined_similarity(
                        &candidate.description,
                        &entry.description,
                        &candidate.canonical_key,
                        entry.canonical_key.as_deref().unwrap_or(""),
                    )
                })
                .fold(0.0_f64, f64::max);
            max_similarity < candidate_suppression_threshold
        })
        .collect()
}
