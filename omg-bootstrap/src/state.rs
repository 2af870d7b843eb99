use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use omg_core::errors::{BootstrapError, OmgError, OmgResult};
use omg_core::model::BootstrapState;
use omg_io::{read_to_string_opt, write_atomic};

const STATE_FILE: &str = ".bootstrap-state.json";
const DONE_FILE: &str = ".bootstrap-done";

/// Completion sentinel written once a run finishes (spec.md §6
/// `.bootstrap-done`): "sentinel JSON" with summary counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionSentinel {
    pub total: usize,
    pub ok: usize,
    pub fail: usize,
    pub finished_at: DateTime<Utc>,
}

pub fn load_state(root: &Path) -> OmgResult<BootstrapState> {
    match read_to_string_opt(&root.join(STATE_FILE))? {
        Some(raw) => serde_json::from_str(&raw)
            .map_err(|e| OmgError::Bootstrap(BootstrapError::StateFlushFailed { reason: format!("corrupt state file: {e}") })),
        None => Ok(BootstrapState::default()),
    }
}

pub fn save_state(root: &Path, state: &BootstrapState) -> OmgResult<()> {
    let json = serde_json::to_string_pretty(state)
        .map_err(|e| OmgError::Bootstrap(BootstrapError::StateFlushFailed { reason: e.to_string() }))?;
    write_atomic(&root.join(STATE_FILE), &json)
}

pub fn load_completion_sentinel(root: &Path) -> OmgResult<Option<CompletionSentinel>> {
    match read_to_string_opt(&root.join(DONE_FILE))? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| OmgError::Bootstrap(BootstrapError::StateFlushFailed { reason: format!("corrupt done sentinel: {e}") })),
        None => Ok(None),
    }
}

pub fn save_completion_sentinel(root: &Path, sentinel: &CompletionSentinel) -> OmgResult<()> {
    let json = serde_json::to_string_pretty(sentinel)
        .map_err(|e| OmgError::Bootstrap(BootstrapError::StateFlushFailed { reason: e.to_string() }))?;
    write_atomic(&root.join(DONE_FILE), &json)
}
