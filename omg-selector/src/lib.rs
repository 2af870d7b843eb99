//! # omg-selector
//!
//! Two-pass context selector (spec.md §4.8): pass 1 scores every
//! registry entry from metadata alone (optionally boosted by a semantic
//! search run against the same query); pass 2 hydrates the surviving
//! candidates' bodies and re-scores them; the result is fitted into a
//! token budget and rendered as an `<omg-context>` document.

mod budget;
mod hydrate;
mod keywords;
mod pass1;
mod pass2;
mod render;
mod scoring;
mod tokens;

use std::path::Path;

use chrono::Utc;

use omg_core::config::SelectorConfig;
use omg_core::errors::OmgResult;
use omg_core::model::{Node, NodeType};
use omg_core::traits::MemorySearchTool;
use omg_registry::Registry;

pub use budget::{fit_pool, split_remaining, FittedPool};
pub use hydrate::hydrate_node;
pub use keywords::{adaptive_prefix_len, extract_keywords, tag_prefix_matches};
pub use pass1::{run_pass1, Pass1Result, ScoredCandidate};
pub use pass2::{hydrate_and_rescore, HydratedCandidate};
pub use render::{render_context, render_node_block};
pub use tokens::estimate_tokens;

/// The assembled, budget-fitted context for one selection call.
#[derive(Debug, Default)]
pub struct ContextSelection {
    pub index: Option<Node>,
    pub now: Option<Node>,
    pub pinned: Vec<Node>,
    pub mocs: Vec<Node>,
    pub nodes: Vec<Node>,
    pub estimated_tokens: usize,
    /// Ids ranked but dropped for lack of budget or count headroom.
    pub dropped_ids: Vec<String>,
}

impl ContextSelection {
    /// Render the full `<omg-context>` document for this selection. The
    /// "Focus" section carries index, now, and pinned nodes together.
    pub fn render(&self) -> String {
        let focus: Vec<&Node> = self.index.iter().chain(self.now.iter()).chain(self.pinned.iter()).collect();
        let mocs: Vec<&Node> = self.mocs.iter().collect();
        let nodes: Vec<&Node> = self.nodes.iter().collect();
        render_context(&focus, &mocs, &nodes)
    }
}

/// Select and render context for one `before_agent_start` call (spec.md
/// §4.8, data flow in §2). `pinned_ids` are force-included ahead of
/// scoring (e.g. the current project's node). Missing pinned ids are
/// skipped with a warning rather than failing the whole selection.
pub fn select_context(
    registry: &Registry,
    root: &Path,
    prompt: &str,
    search_tool: Option<&dyn MemorySearchTool>,
    pinned_ids: &[String],
    config: &SelectorConfig,
) -> OmgResult<ContextSelection> {
    let now = Utc::now();
    let entries = registry.get_registry_entries(None)?;
    let keywords = extract_keywords(prompt);

    let index_entry = entries.iter().find(|(_, e)| e.node_type == NodeType::Index);
    let now_entry = entries.iter().find(|(_, e)| e.node_type == NodeType::Now);

    let index_node = hydrate_optional(root, index_entry);
    let now_node = hydrate_optional(root, now_entry);

    let mut pinned_nodes = Vec::new();
    for id in pinned_ids {
        match entries.iter().find(|(entry_id, _)| entry_id == id) {
            Some((_, entry)) => match hydrate_node(root, id, &entry.file_path) {
                Ok(node) => pinned_nodes.push(node),
                Err(e) => tracing::warn!(id, error = %e, "pinned node failed to hydrate, skipping"),
            },
            None => tracing::warn!(id, "pinned node not found in registry, skipping"),
        }
    }

    let excluded: std::collections::HashSet<&str> =
        pinned_ids.iter().map(String::as_str).chain(index_entry.map(|(id, _)| id.as_str())).chain(now_entry.map(|(id, _)| id.as_str())).collect();
    let candidate_entries: Vec<_> = entries.into_iter().filter(|(id, _)| !excluded.contains(id.as_str())).collect();

    let pass1 = run_pass1(&candidate_entries, &keywords, prompt, search_tool, now, config.max_mocs, config.pass1_regular_candidates);
    let moc_candidates = hydrate_and_rescore(root, &keywords, &pass1.mocs, now)?;
    let regular_candidates = hydrate_and_rescore(root, &keywords, &pass1.regular, now)?;

    let fixed_tokens = index_node.iter().chain(now_node.iter()).chain(pinned_nodes.iter()).map(|n| estimate_tokens(&render_node_block(n))).sum();
    let (moc_budget, regular_budget) = split_remaining(config.max_context_tokens, fixed_tokens)?;

    let fitted_mocs = fit_pool(moc_candidates, moc_budget, config.max_mocs);
    let fitted_regular = fit_pool(regular_candidates, regular_budget, config.max_nodes);

    let mut dropped_ids = fitted_mocs.dropped_ids;
    dropped_ids.extend(fitted_regular.dropped_ids);

    let estimated_tokens = fixed_tokens + fitted_mocs.tokens_used + fitted_regular.tokens_used;

    Ok(ContextSelection {
        index: index_node,
        now: now_node,
        pinned: pinned_nodes,
        mocs: fitted_mocs.nodes,
        nodes: fitted_regular.nodes,
        estimated_tokens,
        dropped_ids,
    })
}

fn hydrate_optional(root: &Path, entry: Option<&(String, omg_core::model::RegistryEntry)>) -> Option<Node> {
    let (id, entry) = entry?;
    match hydrate_node(root, id, &entry.file_path) {
        Ok(node) => Some(node),
        Err(e) => {
            tracing::warn!(id, error = %e, "structural node failed to hydrate");
            None
        }
    }
}
