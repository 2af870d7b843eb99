//! System-wide constants. Subsystem-tunable values live in [`crate::config`]
//! instead — this module is for values that are not meant to be overridden.

/// OMG crate version (for diagnostics, not the registry format version).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Registry file format version. Bumping this forces a full rebuild on
/// cold start rather than an attempted in-place migration (spec: "no
/// schema migrations beyond a version-1 registry").
pub const REGISTRY_VERSION: u32 = 1;

/// Length of a node `uid` in hex characters (first 48 bits of the content hash).
pub const UID_HEX_LEN: usize = 12;

/// Number of shingle words per fingerprint window.
pub const SHINGLE_WINDOW: usize = 5;

/// Number of characters per n-gram used by text similarity.
pub const NGRAM_SIZE: usize = 3;
