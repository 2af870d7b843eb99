use serde::{Deserialize, Serialize};

use super::defaults;

/// Extraction guardrail and merge-decision thresholds (spec.md §4.4,
/// §4.5, §4.10).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObserverConfig {
    /// Minimum `finalScore` for a merge target to trigger a Merge-decision
    /// LLM call at all (spec.md §4.5).
    pub merge_threshold: f64,
    /// Fingerprint overlap at/above which a turn is skipped entirely.
    pub skip_overlap_threshold: f64,
    /// Fingerprint overlap at/above which the window is truncated to its
    /// novel trailing suffix.
    pub truncate_overlap_threshold: f64,
    /// Candidate-vs-last-observation similarity at/above which a
    /// post-extraction candidate is suppressed.
    pub candidate_suppression_threshold: f64,
    /// Fraction of `maxOutputTokens` at/above which output is flagged
    /// `truncated`.
    pub truncation_ratio: f64,
    /// Number of recent fingerprints retained per session for guardrail
    /// comparison.
    pub recent_window_size: usize,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            merge_threshold: defaults::DEFAULT_MERGE_THRESHOLD,
            skip_overlap_threshold: defaults::DEFAULT_SKIP_OVERLAP_THRESHOLD,
            truncate_overlap_threshold: defaults::DEFAULT_TRUNCATE_OVERLAP_THRESHOLD,
            candidate_suppression_threshold: defaults::DEFAULT_CANDIDATE_SUPPRESSION_THRESHOLD,
            truncation_ratio: defaults::DEFAULT_TRUNCATION_RATIO,
            recent_window_size: defaults::DEFAULT_RECENT_WINDOW_SIZE,
        }
    }
}
