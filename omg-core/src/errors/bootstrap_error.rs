/// Bootstrap pipeline errors. Note a held lock is not one of these —
/// spec.md's "fail open if lock is held" means `run_bootstrap` reports
/// `BootstrapSummary { ran: false, .. }` rather than raising an error.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("batch {index} failed: {error_type}: {reason}")]
    BatchFailed { index: usize, error_type: String, reason: String },

    #[error("state flush failed: {reason}")]
    StateFlushFailed { reason: String },

    #[error("sqlite source unavailable: {reason}")]
    SqliteSourceUnavailable { reason: String },
}
