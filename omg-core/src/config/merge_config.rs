use serde::{Deserialize, Serialize};

/// Merge executor tuning (spec.md §4.7). Currently has no tunable
/// thresholds of its own (the trigger threshold lives in
/// [`super::ObserverConfig::merge_threshold`]); kept as its own struct so
/// the crate boundary can grow independent knobs without reshaping
/// `OmgConfig`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Whether a missing merge/alias target falls back to `keep_separate`
    /// with a warning (spec.md §4.5) rather than failing the candidate.
    pub fallback_to_keep_separate_on_missing_target: bool,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self { fallback_to_keep_separate_on_missing_target: true }
    }
}
