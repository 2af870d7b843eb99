use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One workspace ever seen by this host (spec.md §4.13: "lists every
/// workspace ever seen"). Keyed by its canonicalized graph-root path in
/// [`crate::store::WorkspaceRegistryFile`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceEntry {
    pub root: String,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

impl WorkspaceEntry {
    pub fn new(root: String, now: DateTime<Utc>) -> Self {
        Self { root, first_seen: now, last_seen: now }
    }
}
