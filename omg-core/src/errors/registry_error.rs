/// Registry cache errors.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("registry file corrupt or wrong version: {reason}")]
    CorruptRegistry { reason: String },

    #[error("node '{id}' not found in registry")]
    NotFound { id: String },

    #[error("registry write failed: {reason}")]
    WriteFailed { reason: String },

    #[error("rebuild failed scanning {dir}: {reason}")]
    RebuildFailed { dir: String, reason: String },
}
