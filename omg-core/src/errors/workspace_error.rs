/// Cron & workspace-registry errors.
#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("workspace registry file corrupt: {reason}")]
    CorruptRegistry { reason: String },

    #[error("workspace registry write failed: {reason}")]
    WriteFailed { reason: String },

    #[error("cron handler '{id}' panicked (swallowed at the lifecycle boundary): {reason}")]
    CronHandlerFailed { id: String, reason: String },
}
