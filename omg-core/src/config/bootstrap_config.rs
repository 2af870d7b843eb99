use serde::{Deserialize, Serialize};

use super::defaults;

/// Bootstrap pipeline tuning (spec.md §4.11).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Max characters packed into one batch before it is dispatched.
    pub batch_char_budget: usize,
    /// Max characters per chunk read from a source.
    pub chunk_char_budget: usize,
    /// Bounded concurrency for batch execution.
    pub concurrency: usize,
    /// Lockfile TTL, refreshed while a run is active.
    pub lock_ttl_secs: u64,
    /// Debounce window between state-file flushes.
    pub state_flush_debounce_ms: u64,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            batch_char_budget: defaults::DEFAULT_BATCH_CHAR_BUDGET,
            chunk_char_budget: defaults::DEFAULT_CHUNK_CHAR_BUDGET,
            concurrency: defaults::DEFAULT_BOOTSTRAP_CONCURRENCY,
            lock_ttl_secs: defaults::DEFAULT_LOCK_TTL_SECS,
            state_flush_debounce_ms: defaults::DEFAULT_STATE_FLUSH_DEBOUNCE_MS,
        }
    }
}
