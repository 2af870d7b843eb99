use serde::{Deserialize, Serialize};

use super::defaults;

/// Merge-target finder tuning (spec.md §4.6).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Local-pass candidate cap before scoring (`M`).
    pub local_top_m: usize,
    /// Semantic-pass candidate cap before scoring (`S`).
    pub semantic_top_s: usize,
    /// Final merge-target result cap (`K`).
    pub top_k: usize,
    pub local_weight: f64,
    pub semantic_weight: f64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            local_top_m: defaults::DEFAULT_LOCAL_TOP_M,
            semantic_top_s: defaults::DEFAULT_SEMANTIC_TOP_S,
            top_k: defaults::DEFAULT_RETRIEVAL_TOP_K,
            local_weight: defaults::DEFAULT_LOCAL_WEIGHT,
            semantic_weight: defaults::DEFAULT_SEMANTIC_WEIGHT,
        }
    }
}
