/// Session-state and token-tracker errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session state for '{session_key}' corrupt: {reason}")]
    CorruptState { session_key: String, reason: String },

    #[error("session state write failed for '{session_key}': {reason}")]
    WriteFailed { session_key: String, reason: String },
}
