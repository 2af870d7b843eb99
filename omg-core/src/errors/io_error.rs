/// Frontmatter parse/serialize and atomic-write errors.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("malformed frontmatter in {path}: {reason}")]
    MalformedFrontmatter { path: String, reason: String },

    #[error("missing required frontmatter key '{key}' in {path}")]
    MissingKey { path: String, key: String },

    #[error("atomic write failed for {path}: {reason}")]
    AtomicWriteFailed { path: String, reason: String },

    #[error("invalid node type '{value}' in {path}")]
    InvalidNodeType { path: String, value: String },

    #[error("invalid priority '{value}' in {path}")]
    InvalidPriority { path: String, value: String },
}
