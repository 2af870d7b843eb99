use serde::{Deserialize, Serialize};

/// Per `(workspace, sessionKey)` state (spec.md §3 "Session state").
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionState {
    pub last_observed_at_ms: i64,
    pub pending_message_tokens: u64,
    pub total_observation_tokens: u64,
    pub last_reflection_total_tokens: u64,
    pub observation_boundary_message_index: usize,
    pub node_count: u64,
    pub last_observation_node_ids: Vec<String>,
    pub recent_source_fingerprints: Vec<Vec<u32>>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            last_observed_at_ms: 0,
            pending_message_tokens: 0,
            total_observation_tokens: 0,
            last_reflection_total_tokens: 0,
            observation_boundary_message_index: 0,
            node_count: 0,
            last_observation_node_ids: Vec::new(),
            recent_source_fingerprints: Vec::new(),
        }
    }
}

impl SessionState {
    /// Validate the invariants from spec.md §3: boundary monotonically
    /// non-decreasing (checked by the caller across transitions),
    /// `totalObservationTokens >= lastReflectionTotalTokens`, and
    /// `pendingMessageTokens >= 0` (always true for `u64`, kept as a
    /// named check so the invariant is visible at call sites).
    pub fn is_consistent(&self) -> bool {
        self.total_observation_tokens >= self.last_reflection_total_tokens
    }
}
