use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use omg_core::constants::REGISTRY_VERSION;
use omg_core::errors::{OmgError, OmgResult, RegistryError};
use omg_core::model::RegistryEntry;
use omg_io::{read_to_string_opt, write_atomic};

use crate::entry_filter::EntryFilter;
use crate::patch::EntryPatch;
use crate::scan::scan_graph_root;

const REGISTRY_FILE: &str = ".registry.json";

#[derive(Debug, Serialize, Deserialize)]
struct RegistryFile {
    version: u32,
    entries: BTreeMap<String, RegistryEntry>,
}

/// Per-workspace metadata cache over all graph nodes (spec.md §4.1).
///
/// Writes are serialized through `write_mutex` (load-or-rebuild, mutate,
/// persist, publish); reads take a brief `RwLock` read guard just long
/// enough to clone an `Arc`, so concurrent readers never block on each
/// other or on an in-flight write's disk I/O (spec.md §5: "readers
/// lock-free via immutable snapshot publishing").
pub struct Registry {
    root: PathBuf,
    state: RwLock<Arc<HashMap<String, RegistryEntry>>>,
    loaded: AtomicBool,
    write_mutex: Mutex<()>,
}

impl Registry {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            state: RwLock::new(Arc::new(HashMap::new())),
            loaded: AtomicBool::new(false),
            write_mutex: Mutex::new(()),
        }
    }

    fn registry_path(&self) -> PathBuf {
        self.root.join(REGISTRY_FILE)
    }

    /// Snapshot-publish the current map. Held only long enough to clone
    /// an `Arc` pointer.
    fn snapshot(&self) -> Arc<HashMap<String, RegistryEntry>> {
        self.state.read().expect("registry state lock poisoned").clone()
    }

    fn publish(&self, map: HashMap<String, RegistryEntry>) {
        *self.state.write().expect("registry state lock poisoned") = Arc::new(map);
    }

    fn persist(&self, map: &HashMap<String, RegistryEntry>) -> OmgResult<()> {
        let file = RegistryFile {
            version: REGISTRY_VERSION,
            entries: map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        };
        let json = serde_json::to_string_pretty(&file).map_err(|e| {
            OmgError::Registry(RegistryError::WriteFailed { reason: e.to_string() })
        })?;
        write_atomic(&self.registry_path(), &json)
    }

    /// Load `.registry.json`, falling back to a full on-disk rebuild when
    /// it is missing, corrupt, or the wrong version (spec.md §4.1: "Cold
    /// start with missing/corrupt/wrong-version file triggers a full
    /// rebuild"; spec.md §7: "parse failures degrade to rebuild
    /// (fail-open for availability)").
    fn load_or_rebuild(&self) -> OmgResult<HashMap<String, RegistryEntry>> {
        let raw = read_to_string_opt(&self.registry_path())?;
        if let Some(raw) = raw {
            match serde_json::from_str::<RegistryFile>(&raw) {
                Ok(file) if file.version == REGISTRY_VERSION => {
                    return Ok(file.entries.into_iter().collect());
                }
                Ok(file) => {
                    warn!(found = file.version, expected = REGISTRY_VERSION, "registry version mismatch, rebuilding");
                }
                Err(e) => {
                    warn!(error = %e, "registry file corrupt, rebuilding");
                }
            }
        }
        let map = scan_graph_root(&self.root)?;
        self.persist(&map)?;
        info!(count = map.len(), root = %self.root.display(), "registry rebuilt from disk");
        Ok(map)
    }

    fn ensure_loaded(&self) -> OmgResult<()> {
        if self.loaded.load(Ordering::Acquire) {
            return Ok(());
        }
        let _guard = self.write_mutex.lock().expect("registry write mutex poisoned");
        if self.loaded.load(Ordering::Acquire) {
            return Ok(());
        }
        let map = self.load_or_rebuild()?;
        self.publish(map);
        self.loaded.store(true, Ordering::Release);
        Ok(())
    }

    /// Full in-memory index (the authoritative map for traversal/selection).
    pub fn get_node_index(&self) -> OmgResult<Arc<HashMap<String, RegistryEntry>>> {
        self.ensure_loaded()?;
        Ok(self.snapshot())
    }

    pub fn get_registry_entries(&self, filter: Option<&EntryFilter>) -> OmgResult<Vec<(String, RegistryEntry)>> {
        let snap = self.get_node_index()?;
        let mut out: Vec<(String, RegistryEntry)> = snap
            .iter()
            .filter(|(_, e)| filter.map(|f| f.matches(e)).unwrap_or(!e.archived))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(out)
    }

    pub fn get_registry_entry(&self, id: &str) -> OmgResult<Option<RegistryEntry>> {
        let snap = self.get_node_index()?;
        Ok(snap.get(id).cloned())
    }

    pub fn get_node_file_paths(&self, ids: &[String]) -> OmgResult<HashMap<String, String>> {
        let snap = self.get_node_index()?;
        Ok(ids
            .iter()
            .filter_map(|id| snap.get(id).map(|e| (id.clone(), e.file_path.clone())))
            .collect())
    }

    pub fn get_node_count(&self) -> OmgResult<usize> {
        Ok(self.get_node_index()?.len())
    }

    /// Register a new node (or overwrite an existing entry for the same
    /// id). Write path per spec.md §4.1: lock -> load-or-rebuild cached
    /// copy -> mutate -> atomic persist -> publish -> unlock.
    pub fn register_node(&self, id: String, entry: RegistryEntry) -> OmgResult<()> {
        self.ensure_loaded()?;
        let _guard = self.write_mutex.lock().expect("registry write mutex poisoned");
        let mut map = (*self.snapshot()).clone();
        map.insert(id, entry);
        self.persist(&map)?;
        self.publish(map);
        Ok(())
    }

    pub fn update_registry_entry(&self, id: &str, patch: EntryPatch) -> OmgResult<()> {
        self.ensure_loaded()?;
        let _guard = self.write_mutex.lock().expect("registry write mutex poisoned");
        let mut map = (*self.snapshot()).clone();
        let entry = map
            .get_mut(id)
            .ok_or_else(|| OmgError::Registry(RegistryError::NotFound { id: id.to_string() }))?;
        patch.apply(entry);
        self.persist(&map)?;
        self.publish(map);
        Ok(())
    }

    pub fn remove_registry_entry(&self, id: &str) -> OmgResult<()> {
        self.ensure_loaded()?;
        let _guard = self.write_mutex.lock().expect("registry write mutex poisoned");
        let mut map = (*self.snapshot()).clone();
        map.remove(id);
        self.persist(&map)?;
        self.publish(map);
        Ok(())
    }

    /// Force a full rescan of the on-disk node set, discarding the
    /// cached copy and `.registry.json` contents.
    pub fn rebuild_registry(&self) -> OmgResult<usize> {
        let _guard = self.write_mutex.lock().expect("registry write mutex poisoned");
        let map = scan_graph_root(&self.root)?;
        self.persist(&map)?;
        let count = map.len();
        self.publish(map);
        self.loaded.store(true, Ordering::Release);
        Ok(count)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
