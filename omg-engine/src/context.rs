use std::path::Path;

use omg_core::config::SelectorConfig;
use omg_core::traits::MemorySearchTool;
use omg_registry::Registry;
use omg_scaffold::{emit_metric, MetricEvent};
use omg_selector::{select_context, ContextSelection};

/// Select and render the context slice for one `before_agent_start` call
/// (spec.md §2 "Data flow per context injection", §4.8). Never fails the
/// turn outright (spec.md §7 "never throws" for lifecycle hooks) — a
/// selection failure (e.g. the fixed content alone overruns the budget)
/// degrades to an empty rendered slice rather than blocking the agent.
pub fn before_agent_start(
    registry: &Registry,
    root: &Path,
    prompt: &str,
    search_tool: Option<&dyn MemorySearchTool>,
    pinned_ids: &[String],
    session_key: &str,
    config: &SelectorConfig,
) -> String {
    match select_context(registry, root, prompt, search_tool, pinned_ids, config) {
        Ok(selection) => {
            emit_metric(&MetricEvent::Selector {
                session_key: session_key.to_string(),
                nodes_selected: selected_count(&selection),
                tokens_used: selection.estimated_tokens,
            });
            selection.render()
        }
        Err(e) => {
            emit_metric(&MetricEvent::Error { session_key: session_key.to_string(), stage: "selector".into(), reason: e.to_string() });
            String::new()
        }
    }
}

fn selected_count(selection: &ContextSelection) -> usize {
    selection.mocs.len() + selection.nodes.len() + selection.pinned.len()
}
