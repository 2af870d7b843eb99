/// Merge-target retrieval errors.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("semantic search failed (degrading to local-only): {reason}")]
    SemanticSearchFailed { reason: String },

    #[error("invalid keyPrefix for canonicalKey '{key}'")]
    InvalidKeyPrefix { key: String },
}
