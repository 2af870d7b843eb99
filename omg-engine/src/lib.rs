//! # omg-engine
//!
//! Facade crate implementing OMG's three host lifecycle hooks (spec.md
//! §7: `agent_end`, `before_agent_start`, cron handlers) and wiring the
//! per-turn and per-injection data flows (spec.md §2) across every other
//! crate in the workspace. A host embeds [`OmgEngine`] directly; it is
//! the only crate that knows about all of `omg-registry`, `omg-observer`,
//! `omg-selector`, `omg-bootstrap`, `omg-reflector`, and `omg-workspace`
//! at once.

mod context;
mod cron_handlers;
mod observation;
mod session_io;

#[cfg(feature = "tracing-init")]
mod tracing_init;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use omg_bootstrap::{BootstrapSources, SqliteMemorySource};
use omg_core::config::OmgConfig;
use omg_core::traits::{CronScheduler, LlmClient, MemorySearchTool};
use omg_registry::Registry;
use omg_scaffold::scaffold_graph_root;
use omg_workspace::{register_default_crons, WorkspaceRegistryStore};

pub use context::before_agent_start;
pub use cron_handlers::{build_cron_handlers, CronContext};
pub use observation::{agent_end, TurnOutcome};
pub use session_io::{load_session_state, save_session_state};

#[cfg(feature = "tracing-init")]
pub use tracing_init::init_tracing;

/// One embedded OMG instance, bound to a single graph root (spec.md §5:
/// "single-writer per workspace"). Holds the registry, the host-supplied
/// collaborators (LLM client, optional search tool, optional cron
/// scheduler), and the resolved configuration.
pub struct OmgEngine {
    registry: Arc<Registry>,
    root: PathBuf,
    llm: Arc<dyn LlmClient>,
    search_tool: Option<Arc<dyn MemorySearchTool>>,
    bootstrap_sources: BootstrapSources,
    sqlite_reader: Option<Arc<dyn SqliteMemorySource>>,
    config: Arc<OmgConfig>,
}

impl OmgEngine {
    /// Open (or initialize) a graph root. Scaffolds the on-disk layout if
    /// missing, then rebuilds the registry from whatever is on disk
    /// (spec.md §4.1 "cold start ... triggers a full rebuild").
    pub fn open(
        root: impl Into<PathBuf>,
        llm: Arc<dyn LlmClient>,
        search_tool: Option<Arc<dyn MemorySearchTool>>,
        config: OmgConfig,
    ) -> omg_core::errors::OmgResult<Self> {
        let root = root.into();
        let registry = Arc::new(Registry::new(&root));
        scaffold_graph_root(&registry, &root)?;
        registry.rebuild_registry()?;

        Ok(Self {
            registry,
            root,
            llm,
            search_tool,
            bootstrap_sources: BootstrapSources::default(),
            sqlite_reader: None,
            config: Arc::new(config),
        })
    }

    pub fn with_bootstrap_sources(mut self, sources: BootstrapSources) -> Self {
        self.bootstrap_sources = sources;
        self
    }

    pub fn with_sqlite_reader(mut self, reader: Arc<dyn SqliteMemorySource>) -> Self {
        self.sqlite_reader = Some(reader);
        self
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &OmgConfig {
        &self.config
    }

    /// `before_agent_start` (spec.md §2, §4.8): select and render the
    /// context slice for `prompt`.
    pub fn before_agent_start(&self, prompt: &str, pinned_ids: &[String], session_key: &str) -> String {
        context::before_agent_start(&self.registry, &self.root, prompt, self.search_tool.as_deref(), pinned_ids, session_key, &self.config.selector)
    }

    /// `agent_end` (spec.md §2, §4.4-§4.5, §4.9): run Extract/Merge over
    /// newly observed messages and maybe trigger a reflection cycle.
    pub fn agent_end(
        &self,
        session_key: &str,
        messages: &[&str],
        now_body: Option<&str>,
        session_context: Option<&str>,
    ) -> TurnOutcome {
        observation::agent_end(&self.registry, &self.root, self.llm.as_ref(), self.search_tool.as_deref(), session_key, messages, now_body, session_context, &self.config)
    }

    /// Register the three standing cron jobs against the host's
    /// scheduler (spec.md §4.13). Idempotent — calling with the same
    /// scheduler again simply replaces the prior registrations, matching
    /// the host's `scheduleCron` contract (spec.md §6).
    pub fn register_crons(&self, scheduler: &dyn CronScheduler) {
        let ctx = Arc::new(CronContext {
            registry: Arc::clone(&self.registry),
            root: self.root.clone(),
            llm: Arc::clone(&self.llm),
            search_tool: self.search_tool.clone(),
            bootstrap_sources: self.bootstrap_sources.clone(),
            sqlite_reader: self.sqlite_reader.clone(),
            config: Arc::clone(&self.config),
        });
        register_default_crons(scheduler, build_cron_handlers(ctx));
    }

    /// Record this workspace in the host's persistent workspace registry
    /// (spec.md §4.13). `workspace_registry_base_dir` is the directory
    /// under which `{host}/omg-workspaces.json` is resolved — typically
    /// the host's home directory, supplied by the caller since resolving
    /// it is a host-level filesystem concern (spec.md §1).
    pub async fn record_workspace(&self, workspace_registry_base_dir: &Path, host: &str) -> omg_core::errors::OmgResult<()> {
        let store = WorkspaceRegistryStore::new(workspace_registry_base_dir, host);
        store.add_workspace(&self.root).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use omg_core::errors::{OmgError, OmgResult};
    use omg_core::traits::LlmResponse;
    use tempfile::tempdir;

    struct FailingLlm;
    impl LlmClient for FailingLlm {
        fn generate(&self, _system: &str, _user: &str, _max_tokens: usize) -> OmgResult<LlmResponse> {
            Err(OmgError::LlmFailed { label: "test".into(), reason: "boom".into() })
        }
    }

    #[test]
    fn open_scaffolds_a_fresh_root() {
        let dir = tempdir().unwrap();
        let engine = OmgEngine::open(dir.path(), Arc::new(FailingLlm), None, OmgConfig::default()).unwrap();
        assert!(dir.path().join("index.md").exists());
        assert!(dir.path().join("now.md").exists());
        assert_eq!(engine.registry().get_node_count().unwrap(), 2);
    }

    #[test]
    fn before_agent_start_renders_something_for_a_fresh_root() {
        let dir = tempdir().unwrap();
        let engine = OmgEngine::open(dir.path(), Arc::new(FailingLlm), None, OmgConfig::default()).unwrap();
        let rendered = engine.before_agent_start("hello", &[], "session-1");
        assert!(rendered.contains("omg-context"));
    }

    #[tokio::test]
    async fn record_workspace_persists_to_the_host_registry_file() {
        let dir = tempdir().unwrap();
        let engine = OmgEngine::open(dir.path(), Arc::new(FailingLlm), None, OmgConfig::default()).unwrap();

        let registry_base = tempdir().unwrap();
        engine.record_workspace(registry_base.path(), "host-a").await.unwrap();

        let store = WorkspaceRegistryStore::new(registry_base.path(), "host-a");
        let entries = store.list();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].root, dir.path().display().to_string());
    }

    #[test]
    fn register_crons_never_panics() {
        use std::sync::Mutex;

        struct FakeScheduler {
            seen: Mutex<Vec<String>>,
        }
        impl CronScheduler for FakeScheduler {
            fn schedule_cron(&self, id: &str, _cron_expression: &str, handler: omg_core::traits::CronHandler) {
                self.seen.lock().unwrap().push(id.to_string());
                handler();
            }
        }

        let dir = tempdir().unwrap();
        let engine = OmgEngine::open(dir.path(), Arc::new(FailingLlm), None, OmgConfig::default()).unwrap();
        let scheduler = FakeScheduler { seen: Mutex::new(Vec::new()) };
        engine.register_crons(&scheduler);
        assert_eq!(scheduler.seen.lock().unwrap().len(), 3);
    }
}
