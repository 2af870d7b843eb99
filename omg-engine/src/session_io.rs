use std::path::{Path, PathBuf};

use omg_core::errors::{OmgError, OmgResult, SessionError};
use omg_core::model::SessionState;
use omg_io::{read_to_string_opt, write_atomic};

/// `.omg-state/{sessionKey}.json` (spec.md §6). Session keys are used
/// verbatim as file stems — the host is responsible for handing OMG a
/// key that is already filesystem-safe, matching the narrow "filesystem
/// primitives" boundary (spec.md §1).
fn state_path(root: &Path, session_key: &str) -> PathBuf {
    root.join(".omg-state").join(format!("{session_key}.json"))
}

/// Load a session's durable state, defaulting to a fresh one when the
/// file is absent (spec.md §4.9 "load state (missing -> defaults)").
/// A corrupt file degrades to defaults with a warning rather than
/// failing the turn — session state is recoverable cache, not the
/// source of truth for graph content.
pub fn load_session_state(root: &Path, session_key: &str) -> OmgResult<SessionState> {
    match read_to_string_opt(&state_path(root, session_key))? {
        Some(raw) => match serde_json::from_str(&raw) {
            Ok(state) => Ok(state),
            Err(e) => {
                tracing::warn!(session_key, error = %e, "session state corrupt, defaulting");
                Ok(SessionState::default())
            }
        },
        None => Ok(SessionState::default()),
    }
}

pub fn save_session_state(root: &Path, session_key: &str, state: &SessionState) -> OmgResult<()> {
    let json = serde_json::to_string_pretty(state).map_err(|e| {
        OmgError::Session(SessionError::WriteFailed { session_key: session_key.to_string(), reason: e.to_string() })
    })?;
    write_atomic(&state_path(root, session_key), &json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_state_defaults() {
        let dir = tempdir().unwrap();
        let state = load_session_state(dir.path(), "alice").unwrap();
        assert_eq!(state.pending_message_tokens, 0);
    }

    #[test]
    fn state_round_trips() {
        let dir = tempdir().unwrap();
        let mut state = SessionState::default();
        state.pending_message_tokens = 42;
        save_session_state(dir.path(), "alice", &state).unwrap();
        let loaded = load_session_state(dir.path(), "alice").unwrap();
        assert_eq!(loaded.pending_message_tokens, 42);
    }

    #[test]
    fn corrupt_state_defaults_instead_of_failing() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(".omg-state")).unwrap();
        std::fs::write(dir.path().join(".omg-state/alice.json"), "{ not json").unwrap();
        let state = load_session_state(dir.path(), "alice").unwrap();
        assert_eq!(state.pending_message_tokens, 0);
    }
}
