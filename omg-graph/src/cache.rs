use std::sync::{Arc, Mutex};

use omg_core::errors::OmgResult;
use omg_registry::Registry;

use crate::adjacency::{build_adjacency, Adjacency};

/// Rebuild-on-miss adjacency cache, invalidated when the registry's entry
/// count changes or on an explicit [`AdjacencyCache::clear`] (spec.md
/// §4.2, §5: "no locking is needed for reads" — the guard here is held
/// only long enough to compare a count and possibly rebuild).
pub struct AdjacencyCache {
    inner: Mutex<Option<(usize, Arc<Adjacency>)>>,
}

impl AdjacencyCache {
    pub fn new() -> Self {
        Self { inner: Mutex::new(None) }
    }

    pub fn clear(&self) {
        *self.inner.lock().expect("adjacency cache lock poisoned") = None;
    }

    pub fn get(&self, registry: &Registry) -> OmgResult<Arc<Adjacency>> {
        let snapshot = registry.get_node_index()?;
        let count = snapshot.len();
        let mut guard = self.inner.lock().expect("adjacency cache lock poisoned");
        if let Some((cached_count, adjacency)) = guard.as_ref() {
            if *cached_count == count {
                return Ok(adjacency.clone());
            }
        }
        let adjacency = Arc::new(build_adjacency(&snapshot));
        *guard = Some((count, adjacency.clone()));
        Ok(adjacency)
    }
}

impl Default for AdjacencyCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use omg_core::model::{Kind, NodeType, Priority, RegistryEntry};
    use tempfile::tempdir;

    fn entry() -> RegistryEntry {
        RegistryEntry {
            node_type: NodeType::Fact,
            kind: Kind::Observation,
            description: "d".into(),
            priority: Priority::Medium,
            created: chrono::Utc::now(),
            updated: chrono::Utc::now(),
            file_path: "x.md".into(),
            archived: false,
            links: vec![],
            tags: vec![],
            canonical_key: None,
        }
    }

    #[test]
    fn rebuilds_when_entry_count_changes() {
        let dir = tempdir().unwrap();
        let registry = Registry::new(dir.path());
        let cache = AdjacencyCache::new();

        let first = cache.get(&registry).unwrap();
        assert!(first.forward.is_empty());

        registry.register_node("omg/fact/a".into(), entry()).unwrap();
        let second = cache.get(&registry).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn explicit_clear_forces_rebuild_even_without_count_change() {
        let dir = tempdir().unwrap();
        let registry = Registry::new(dir.path());
        let cache = AdjacencyCache::new();
        let first = cache.get(&registry).unwrap();
        cache.clear();
        let second = cache.get(&registry).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
    }
}
