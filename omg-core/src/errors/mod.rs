//! Error taxonomy. Each subsystem owns a `thiserror::Error` enum; this
//! module's [`OmgError`] wraps them all with `#[from]` so callers that
//! cross crate boundaries can propagate with `?` without manual mapping,
//! matching the teacher's `cortex_core::errors::CortexError` umbrella.

mod bootstrap_error;
mod graph_error;
mod io_error;
mod merge_error;
mod observer_error;
mod reflector_error;
mod registry_error;
mod retrieval_error;
mod selector_error;
mod session_error;
mod workspace_error;

pub use bootstrap_error::BootstrapError;
pub use graph_error::GraphError;
pub use io_error::IoError;
pub use merge_error::MergeError;
pub use observer_error::ObserverError;
pub use reflector_error::ReflectorError;
pub use registry_error::RegistryError;
pub use retrieval_error::RetrievalError;
pub use selector_error::SelectorError;
pub use session_error::SessionError;
pub use workspace_error::WorkspaceError;

/// Umbrella error type returned by every public OMG operation.
#[derive(Debug, thiserror::Error)]
pub enum OmgError {
    #[error(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Observer(#[from] ObserverError),

    #[error(transparent)]
    Merge(#[from] MergeError),

    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error(transparent)]
    Selector(#[from] SelectorError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),

    #[error(transparent)]
    Reflector(#[from] ReflectorError),

    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    /// Raw I/O failure that doesn't fit a more specific variant
    /// (write failures propagate per spec.md §7; ENOENT is handled at
    /// the read site and never reaches here).
    #[error("{context}: {source}")]
    Filesystem {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// An LLM call failed. Preserves the original cause (spec.md §7:
    /// "LLM errors — propagated up to the nearest catch, prefixed with
    /// context label, cause preserved").
    #[error("llm call failed ({label}): {reason}")]
    LlmFailed { label: String, reason: String },
}

pub type OmgResult<T> = Result<T, OmgError>;

/// Helper for wrapping a raw `io::Error` with a context label.
pub fn fs_err(context: impl Into<String>, source: std::io::Error) -> OmgError {
    OmgError::Filesystem { context: context.into(), source }
}
