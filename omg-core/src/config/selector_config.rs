use serde::{Deserialize, Serialize};

use super::defaults;

/// Context selector budget & scoring tuning (spec.md §4.8).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub max_context_tokens: usize,
    pub max_mocs: usize,
    pub max_nodes: usize,
    /// Pass-1 regular-candidate cap before hydration (spec.md §4.8: "top 200").
    pub pass1_regular_candidates: usize,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            max_context_tokens: defaults::DEFAULT_MAX_CONTEXT_TOKENS,
            max_mocs: defaults::DEFAULT_MAX_MOCS,
            max_nodes: defaults::DEFAULT_MAX_NODES,
            pass1_regular_candidates: defaults::DEFAULT_PASS1_REGULAR_CANDIDATES,
        }
    }
}
