use omg_core::model::{Kind, NodeType, RegistryEntry};

/// Filter applied by [`crate::Registry::get_registry_entries`]. All
/// `None`/`false` fields mean "no constraint"; archived entries are
/// excluded unless explicitly included (spec.md §3: "archived implies
/// excluded from all traversal and selection" is the general default,
/// callers that need archived entries for maintenance audits opt in).
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    pub node_type: Option<NodeType>,
    pub kind: Option<Kind>,
    pub include_archived: bool,
}

impl EntryFilter {
    pub fn matches(&self, entry: &RegistryEntry) -> bool {
        if !self.include_archived && entry.archived {
            return false;
        }
        if let Some(t) = self.node_type {
            if entry.node_type != t {
                return false;
            }
        }
        if let Some(k) = self.kind {
            if entry.kind != k {
                return false;
            }
        }
        true
    }
}
