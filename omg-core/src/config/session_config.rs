use serde::{Deserialize, Serialize};

use super::defaults;

/// Trigger mode for observation, as named in spec.md §4.9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TriggerMode {
    Manual,
    EveryTurn,
    Threshold,
}

impl Default for TriggerMode {
    fn default() -> Self {
        TriggerMode::Threshold
    }
}

/// Session-state and token-tracker tuning (spec.md §4.9).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub trigger_mode: TriggerMode,
    pub message_token_threshold: u64,
    pub observation_token_threshold: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            trigger_mode: TriggerMode::default(),
            message_token_threshold: defaults::DEFAULT_MESSAGE_TOKEN_THRESHOLD,
            observation_token_threshold: defaults::DEFAULT_OBSERVATION_TOKEN_THRESHOLD,
        }
    }
}
