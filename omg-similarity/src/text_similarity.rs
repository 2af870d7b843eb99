use crate::edit_distance::normalized_edit_similarity;
use crate::ngram::ngram_similarity;

const EDIT_WEIGHT: f64 = 0.5;
const NGRAM_WEIGHT: f64 = 0.5;

const KEY_WEIGHT: f64 = 0.5;
const DESCRIPTION_WEIGHT: f64 = 0.5;

/// Combined text similarity: normalized edit distance and 3-gram Jaccard,
/// evenly weighted (spec.md §4.3).
pub fn text_similarity(a: &str, b: &str) -> f64 {
    EDIT_WEIGHT * normalized_edit_similarity(a, b) + NGRAM_WEIGHT * ngram_similarity(a, b)
}

/// First dotted segment of a canonicalKey — a coarse filter for merge
/// targeting (spec.md §4.3, used by §4.6 "Local" pass).
pub fn key_prefix(canonical_key: &str) -> &str {
    canonical_key.split('.').next().unwrap_or(canonical_key)
}

/// Mixes key-similarity and description-similarity into one score
/// (spec.md §4.3: "combinedSimilarity(descA, descB, keyA, keyB) mixes
/// key-similarity and description-similarity").
pub fn combined_similarity(desc_a: &str, desc_b: &str, key_a: &str, key_b: &str) -> f64 {
    let key_sim = text_similarity(key_a, key_b);
    let desc_sim = text_similarity(desc_a, desc_b);
    KEY_WEIGHT * key_sim + DESCRIPTION_WEIGHT * desc_sim
}
