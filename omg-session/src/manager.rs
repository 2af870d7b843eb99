use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::one::Ref;

use omg_core::model::SessionState;

/// Concurrent in-memory table of session state keyed by `sessionKey`,
/// one per workspace event loop (spec.md §3). Grounded in the teacher's
/// `cortex_session::SessionManager`: a `DashMap` gives per-key locking
/// without a single workspace-wide mutex, since turns for distinct
/// sessions never need to serialize against each other. Durable
/// persistence to disk is the caller's concern (`omg-engine`); this
/// manager only holds the live, in-memory copy.
#[derive(Debug, Default)]
pub struct SessionManager {
    sessions: Arc<DashMap<String, SessionState>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self { sessions: Arc::new(DashMap::new()) }
    }

    /// Seed a session's state (e.g. after loading it from disk on first
    /// use). Overwrites any in-memory copy already present.
    pub fn seed(&self, session_key: impl Into<String>, state: SessionState) {
        self.sessions.insert(session_key.into(), state);
    }

    /// Fetch a session's state, defaulting to a fresh one if unseen.
    pub fn get_or_default(&self, session_key: &str) -> SessionState {
        self.sessions.entry(session_key.to_string()).or_default().clone()
    }

    /// Mutate a session's state in place via `f`, returning its result.
    pub fn update<T>(&self, session_key: &str, f: impl FnOnce(&mut SessionState) -> T) -> T {
        let mut entry = self.sessions.entry(session_key.to_string()).or_default();
        f(entry.value_mut())
    }

    pub fn remove(&self, session_key: &str) -> Option<SessionState> {
        self.sessions.remove(session_key).map(|(_, v)| v)
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn session_ids(&self) -> Vec<String> {
        self.sessions.iter().map(|e| e.key().clone()).collect()
    }

    pub fn contains(&self, session_key: &str) -> bool {
        self.sessions.contains_key(session_key)
    }

    /// Snapshot every session's state, for a periodic durability flush.
    pub fn snapshot_all(&self) -> Vec<(String, SessionState)> {
        self.sessions.iter().map(|e| (e.key().clone(), e.value().clone())).collect()
    }

    /// Read a session's state without cloning it.
    pub fn get(&self, session_key: &str) -> Option<Ref<'_, String, SessionState>> {
        self.sessions.get(session_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unseen_session_defaults_without_panicking() {
        let mgr = SessionManager::new();
        let state = mgr.get_or_default("alice");
        assert_eq!(state.pending_message_tokens, 0);
        assert_eq!(mgr.session_count(), 1);
    }

    #[test]
    fn update_mutates_in_place() {
        let mgr = SessionManager::new();
        mgr.update("alice", |s| s.pending_message_tokens = 42);
        assert_eq!(mgr.get_or_default("alice").pending_message_tokens, 42);
    }

    #[test]
    fn remove_drops_the_entry() {
        let mgr = SessionManager::new();
        mgr.get_or_default("alice");
        assert!(mgr.contains("alice"));
        mgr.remove("alice");
        assert!(!mgr.contains("alice"));
    }

    #[test]
    fn snapshot_all_reflects_every_session() {
        let mgr = SessionManager::new();
        mgr.get_or_default("alice");
        mgr.get_or_default("bob");
        let snapshot = mgr.snapshot_all();
        assert_eq!(snapshot.len(), 2);
    }

    #[test]
    fn get_reads_without_cloning() {
        let mgr = SessionManager::new();
        mgr.get_or_default("alice");
        assert!(mgr.get("alice").is_some());
        assert!(mgr.get("ghost").is_none());
    }
}
