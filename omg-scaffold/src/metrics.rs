use tracing::{error, info};

/// Structured metric events emitted across subsystems (spec.md §7:
/// "structured metric events (`extract`, `reflection`, `selector`,
/// `error`, `semantic-dedup`, `guardrail`)"). These are observability
/// data, not the `OmgError` control-flow path — callers emit one and
/// keep going.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricEvent {
    /// An extraction pass ran against a session turn.
    Extract { session_key: String, operations_found: usize, skipped: bool },
    /// A reflection pass ran against a session.
    Reflection { session_key: String, compression_level: u8, nodes_touched: usize },
    /// A context-selection pass ran for a turn.
    Selector { session_key: String, nodes_selected: usize, tokens_used: usize },
    /// A recoverable failure occurred somewhere in the pipeline.
    Error { session_key: String, stage: String, reason: String },
    /// Two candidate nodes were judged near-duplicates and merged
    /// without an LLM merge-decision call.
    SemanticDedup { session_key: String, kept_id: String, dropped_id: String, similarity: f64 },
    /// The pre-extraction guardrail made a skip/truncate/proceed call
    /// (spec.md §4.10, §8 example 4: "metric emitted with `action=skip`").
    Guardrail { session_key: String, action: &'static str, max_overlap: f64 },
}

/// Emit a [`MetricEvent`] via `tracing`. Structured fields, one line per
/// event, matching the teacher's logging convention elsewhere in this
/// workspace.
pub fn emit_metric(event: &MetricEvent) {
    match event {
        MetricEvent::Extract { session_key, operations_found, skipped } => {
            info!(metric = "extract", session_key, operations_found, skipped, "extract pass completed");
        }
        MetricEvent::Reflection { session_key, compression_level, nodes_touched } => {
            info!(metric = "reflection", session_key, compression_level, nodes_touched, "reflection pass completed");
        }
        MetricEvent::Selector { session_key, nodes_selected, tokens_used } => {
            info!(metric = "selector", session_key, nodes_selected, tokens_used, "context selection completed");
        }
        MetricEvent::Error { session_key, stage, reason } => {
            error!(metric = "error", session_key, stage, reason, "pipeline stage failed");
        }
        MetricEvent::SemanticDedup { session_key, kept_id, dropped_id, similarity } => {
            info!(metric = "semantic-dedup", session_key, kept_id, dropped_id, similarity, "near-duplicate merged without LLM call");
        }
        MetricEvent::Guardrail { session_key, action, max_overlap } => {
            info!(metric = "guardrail", session_key, action, max_overlap, "guardrail decision");
        }
    }
}
