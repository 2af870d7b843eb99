use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use omg_core::errors::{OmgError, OmgResult, WorkspaceError};
use omg_io::{read_to_string_opt, write_atomic};

use crate::entry::WorkspaceEntry;

const CURRENT_VERSION: u32 = 1;
const FILE_NAME: &str = "omg-workspaces.json";

/// On-disk shape of `omg-workspaces.json` (spec.md §4.13). A missing or
/// corrupt file degrades to an empty registry rather than failing —
/// there is nothing irrecoverable about "we haven't seen any workspaces
/// yet," matching the registry's own fail-open rebuild policy (spec.md
/// §4.1).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceRegistryFile {
    pub version: u32,
    pub workspaces: BTreeMap<String, WorkspaceEntry>,
}

impl WorkspaceRegistryFile {
    fn upsert(&mut self, root: String, now: chrono::DateTime<Utc>) {
        self.workspaces
            .entry(root.clone())
            .and_modify(|e| e.last_seen = now)
            .or_insert_with(|| WorkspaceEntry::new(root, now));
    }

    /// Drop entries whose graph root no longer exists on disk (spec.md
    /// §4.13 "Pruning removes entries whose graph root no longer exists").
    /// Returns the number removed.
    fn prune_missing(&mut self) -> usize {
        let before = self.workspaces.len();
        self.workspaces.retain(|root, _| Path::new(root).exists());
        before - self.workspaces.len()
    }
}

/// Persistent multi-workspace registry for one host (spec.md §4.13):
/// `~/{host}/omg-workspaces.json` under a caller-supplied base directory
/// (resolving the actual home directory is a host concern, matching
/// spec.md §1's "filesystem primitives" boundary — this crate never
/// guesses `$HOME`). All writes are serialized through a process-local
/// async mutex guarding a read-modify-write cycle, so N concurrent
/// `add_workspace` calls form a strict FIFO and no update is lost
/// (spec.md §5 "Workspace-registry writes form a strict FIFO").
pub struct WorkspaceRegistryStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl WorkspaceRegistryStore {
    pub fn new(base_dir: impl Into<PathBuf>, host: &str) -> Self {
        let path = base_dir.into().join(host).join(FILE_NAME);
        Self { path, write_lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the current file, degrading a missing or corrupt file to an
    /// empty registry (never an error — §7 "parse errors never
    /// propagated" applies equally to this cache).
    pub fn load(&self) -> WorkspaceRegistryFile {
        match read_to_string_opt(&self.path) {
            Ok(Some(raw)) => match serde_json::from_str::<WorkspaceRegistryFile>(&raw) {
                Ok(mut file) => {
                    if file.version == 0 {
                        file.version = CURRENT_VERSION;
                    }
                    file
                }
                Err(e) => {
                    tracing::warn!(path = %self.path.display(), error = %e, "workspace registry corrupt, starting empty");
                    WorkspaceRegistryFile { version: CURRENT_VERSION, workspaces: BTreeMap::new() }
                }
            },
            Ok(None) => WorkspaceRegistryFile { version: CURRENT_VERSION, workspaces: BTreeMap::new() },
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "workspace registry unreadable, starting empty");
                WorkspaceRegistryFile { version: CURRENT_VERSION, workspaces: BTreeMap::new() }
            }
        }
    }

    fn save(&self, file: &WorkspaceRegistryFile) -> OmgResult<()> {
        let json = serde_json::to_string_pretty(file)
            .map_err(|e| OmgError::Workspace(WorkspaceError::WriteFailed { reason: e.to_string() }))?;
        write_atomic(&self.path, &json)
    }

    /// Add or touch a workspace's `last_seen` (spec.md §4.13, §8 "N
    /// concurrent addWorkspaceToRegistry(wi) calls leave all N
    /// workspaces in the file").
    pub async fn add_workspace(&self, root: impl AsRef<Path>) -> OmgResult<()> {
        let root = root.as_ref().display().to_string();
        let _guard = self.write_lock.lock().await;
        let mut file = self.load();
        file.upsert(root, Utc::now());
        self.save(&file)
    }

    /// Remove entries whose graph root no longer exists. Returns the
    /// count pruned.
    pub async fn prune_missing(&self) -> OmgResult<usize> {
        let _guard = self.write_lock.lock().await;
        let mut file = self.load();
        let removed = file.prune_missing();
        if removed > 0 {
            self.save(&file)?;
        }
        Ok(removed)
    }

    pub fn list(&self) -> Vec<WorkspaceEntry> {
        self.load().workspaces.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let store = WorkspaceRegistryStore::new(dir.path(), "host-a");
        assert!(store.list().is_empty());
    }

    #[tokio::test]
    async fn add_workspace_persists_and_is_idempotent() {
        let dir = tempdir().unwrap();
        let ws_root = dir.path().join("ws1");
        std::fs::create_dir_all(&ws_root).unwrap();

        let store = WorkspaceRegistryStore::new(dir.path(), "host-a");
        store.add_workspace(&ws_root).await.unwrap();
        store.add_workspace(&ws_root).await.unwrap();

        let entries = store.list();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].root, ws_root.display().to_string());
    }

    #[tokio::test]
    async fn concurrent_adds_all_survive() {
        let dir = tempdir().unwrap();
        let store = std::sync::Arc::new(WorkspaceRegistryStore::new(dir.path(), "host-a"));
        let mut roots = Vec::new();
        for i in 0..10 {
            let root = dir.path().join(format!("ws-{i}"));
            std::fs::create_dir_all(&root).unwrap();
            roots.push(root);
        }

        let mut handles = Vec::new();
        for root in roots.clone() {
            let store = std::sync::Arc::clone(&store);
            handles.push(tokio::spawn(async move { store.add_workspace(&root).await.unwrap() }));
        }
        for h in handles {
            h.await.unwrap();
        }

        let entries = store.list();
        assert_eq!(entries.len(), roots.len());
    }

    #[tokio::test]
    async fn prune_removes_entries_for_deleted_roots() {
        let dir = tempdir().unwrap();
        let kept = dir.path().join("kept");
        let gone = dir.path().join("gone");
        std::fs::create_dir_all(&kept).unwrap();
        std::fs::create_dir_all(&gone).unwrap();

        let store = WorkspaceRegistryStore::new(dir.path(), "host-a");
        store.add_workspace(&kept).await.unwrap();
        store.add_workspace(&gone).await.unwrap();

        std::fs::remove_dir_all(&gone).unwrap();
        let removed = store.prune_missing().await.unwrap();
        assert_eq!(removed, 1);

        let entries = store.list();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].root, kept.display().to_string());
    }

    #[tokio::test]
    async fn corrupt_file_degrades_to_empty_instead_of_erroring() {
        let dir = tempdir().unwrap();
        let host_dir = dir.path().join("host-a");
        std::fs::create_dir_all(&host_dir).unwrap();
        std::fs::write(host_dir.join(FILE_NAME), "{ not json").unwrap();

        let store = WorkspaceRegistryStore::new(dir.path(), "host-a");
        assert!(store.list().is_empty());
    }
}
