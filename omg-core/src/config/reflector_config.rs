use serde::{Deserialize, Serialize};

use super::defaults;

/// Progressive-compression reflector tuning (spec.md §4.12).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReflectorConfig {
    /// Minimum age (days) for an observation node to be eligible for reflection.
    pub reflection_age_days: i64,
    /// Rendered-synthesis token threshold that triggers escalation to the
    /// next compression level.
    pub context_token_threshold: usize,
    /// Highest compression level (escalation stops and accepts regardless).
    pub max_compression_level: u8,
}

impl Default for ReflectorConfig {
    fn default() -> Self {
        Self {
            reflection_age_days: defaults::DEFAULT_REFLECTION_AGE_DAYS,
            context_token_threshold: defaults::DEFAULT_REFLECTION_CONTEXT_TOKEN_THRESHOLD,
            max_compression_level: defaults::DEFAULT_MAX_COMPRESSION_LEVEL,
        }
    }
}
