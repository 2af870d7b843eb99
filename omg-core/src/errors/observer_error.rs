/// Extract/Merge observer errors.
#[derive(Debug, thiserror::Error)]
pub enum ObserverError {
    #[error("extract LLM call failed: {reason}")]
    ExtractFailed { reason: String },

    #[error("merge-decision LLM call failed: {reason}")]
    MergeDecisionFailed { reason: String },

    #[error("xml parse failed: {reason}")]
    XmlParseFailed { reason: String },
}
