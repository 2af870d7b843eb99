/// Merge executor errors.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    #[error("keeper node '{id}' could not be read: {reason}")]
    KeeperReadFailed { id: String, reason: String },

    #[error("loser node '{id}' could not be read (logged, non-fatal)")]
    LoserReadFailed { id: String },

    #[error("patch application failed for '{id}': {reason}")]
    PatchFailed { id: String, reason: String },
}
