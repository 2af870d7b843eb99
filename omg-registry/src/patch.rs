use chrono::{DateTime, Utc};

use omg_core::model::{Priority, RegistryEntry};

/// Partial update applied by [`crate::Registry::update_registry_entry`].
/// `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct EntryPatch {
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub updated: Option<DateTime<Utc>>,
    pub file_path: Option<String>,
    pub archived: Option<bool>,
    pub links: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub canonical_key: Option<String>,
}

impl EntryPatch {
    pub fn apply(self, entry: &mut RegistryEntry) {
        if let Some(v) = self.description {
            entry.description = v;
        }
        if let Some(v) = self.priority {
            entry.priority = v;
        }
        if let Some(v) = self.updated {
            entry.updated = v;
        }
        if let Some(v) = self.file_path {
            entry.file_path = v;
        }
        if let Some(v) = self.archived {
            entry.archived = v;
        }
        if let Some(v) = self.links {
            entry.links = v;
        }
        if let Some(v) = self.tags {
            entry.tags = v;
        }
        if let Some(v) = self.canonical_key {
            entry.canonical_key = Some(v);
        }
    }
}
