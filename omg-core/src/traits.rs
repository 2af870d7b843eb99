//! External-collaborator traits (spec.md §6). OMG is embedded by a host
//! that supplies an LLM client, optionally a memory-search tool, and a
//! cron scheduler; these are capability traits per the teacher's pattern
//! (`cortex_core::traits::{IEmbeddingProvider, IMemoryStorage}`) so a host
//! without a given capability can pass `None` rather than a stub impl.

use crate::errors::OmgResult;

/// Response from an LLM `generate` call (spec.md §6).
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub content: String,
    pub input_tokens: usize,
    pub output_tokens: usize,
}

/// The LLM client OMG calls for Extract, Merge-decision, and Reflection
/// synthesis. A single narrow method, matching spec.md §1's interface
/// spec: `generate(system, user, maxTokens) -> {content, usage}`.
pub trait LlmClient: Send + Sync {
    fn generate(&self, system: &str, user: &str, max_tokens: usize) -> OmgResult<LlmResponse>;
}

/// One hit from a memory-search query.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub file_path: String,
    pub score: f64,
    pub snippet: String,
}

/// Outcome of a `search` call against the host's optional memory tool.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    pub results: Vec<SearchHit>,
    pub disabled: bool,
}

/// Optional host-supplied semantic search capability (spec.md §6). Absence
/// is modeled by simply not holding a `dyn MemorySearchTool` — callers
/// that hold `Option<Arc<dyn MemorySearchTool>>` degrade to local-only
/// scoring, never panic.
pub trait MemorySearchTool: Send + Sync {
    /// Returns `None` on error (degrade silently, per spec.md §7).
    fn search(&self, query: &str) -> Option<SearchOutcome>;

    /// Returns `None` on error or missing file.
    fn get(&self, file_path: &str) -> Option<String>;
}

/// A scheduled cron callback. Cron handlers never throw (spec.md §6);
/// this is enforced at the handler boundary in `omg-engine`, not in the
/// type itself.
pub type CronHandler = Box<dyn Fn() + Send + Sync>;

/// Host-supplied cron registration capability (spec.md §6). Calling with
/// the same `id` replaces the prior registration.
pub trait CronScheduler: Send + Sync {
    fn schedule_cron(&self, id: &str, cron_expression: &str, handler: CronHandler);
}
