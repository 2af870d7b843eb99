use std::path::Path;

use omg_core::config::OmgConfig;
use omg_core::model::SessionState;
use omg_core::traits::{LlmClient, MemorySearchTool};
use omg_observer::{observe_turn, AppliedAction};
use omg_reflector::{run_reflection, ReflectionSummary};
use omg_registry::Registry;
use omg_scaffold::{apply_now_patch, emit_metric, sync_mocs_for_operations, MetricEvent};
use omg_session::{
    estimate_tokens, mark_reflection_attempted, record_observation_failure,
    record_observation_success, refresh_pending_tokens, should_observe, should_reflect,
};
use omg_similarity::Fingerprint;

use crate::session_io::{load_session_state, save_session_state};

/// Outcome of one `agent_end` call — everything the host might want to
/// log or surface, never an error (spec.md §7: lifecycle hooks never
/// throw).
#[derive(Debug, Default)]
pub struct TurnOutcome {
    pub observed: bool,
    pub applied: Vec<AppliedAction>,
    pub moc_domains: Vec<String>,
    pub reflection: Option<ReflectionSummary>,
}

/// Advisory floor/ceiling on the Extract call's requested output budget,
/// scaled from the unobserved window's estimated size (spec.md §4.4:
/// "maxOutputTokens (typically proportional to batch size)").
const MIN_EXTRACT_MAX_TOKENS: usize = 500;
const EXTRACT_TOKEN_MULTIPLIER: usize = 2;

fn recent_fingerprints(state: &SessionState) -> Vec<Fingerprint> {
    state.recent_source_fingerprints.iter().map(|v| Fingerprint(v.iter().copied().collect())).collect()
}

/// Run the per-turn Extract -> Merge -> Write pipeline, update and
/// persist session state, and maybe run a reflection cycle if the
/// watermark has crossed its threshold (spec.md §2 data flow, §4.9,
/// §4.12). The entire call is the outer error boundary named in spec.md
/// §7 ("agent_end ... never let an error escape"): any internal failure
/// is logged as an `error` metric and the turn's session state is left
/// untouched so the retry-on-next-turn semantics hold.
#[allow(clippy::too_many_arguments)]
pub fn agent_end(
    registry: &Registry,
    root: &Path,
    llm: &dyn LlmClient,
    search_tool: Option<&dyn MemorySearchTool>,
    session_key: &str,
    messages: &[&str],
    now_body: Option<&str>,
    session_context: Option<&str>,
    config: &OmgConfig,
) -> TurnOutcome {
    let mut state = match load_session_state(root, session_key) {
        Ok(s) => s,
        Err(e) => {
            emit_metric(&MetricEvent::Error { session_key: session_key.to_string(), stage: "session-load".into(), reason: e.to_string() });
            SessionState::default()
        }
    };

    let boundary = state.observation_boundary_message_index.min(messages.len());
    let unobserved: Vec<&str> = messages[boundary..].to_vec();
    refresh_pending_tokens(&mut state, &unobserved);
    let has_unobserved = !unobserved.is_empty();

    let mut outcome = TurnOutcome::default();

    if should_observe(config.session.trigger_mode, &state, config.session.message_token_threshold, has_unobserved) {
        let last_observation_entries: Vec<_> = state
            .last_observation_node_ids
            .iter()
            .filter_map(|id| registry.get_registry_entry(id).ok().flatten())
            .collect();
        let fingerprints = recent_fingerprints(&state);
        let max_output_tokens = ((estimate_tokens(&unobserved) as usize) * EXTRACT_TOKEN_MULTIPLIER).max(MIN_EXTRACT_MAX_TOKENS);

        match observe_turn(
            registry,
            root,
            llm,
            search_tool,
            &unobserved,
            now_body,
            session_context,
            &fingerprints,
            &last_observation_entries,
            &config.observer,
            &config.retrieval,
            &config.merge,
            max_output_tokens,
        ) {
            Ok(result) => {
                let written_ids: Vec<String> = result
                    .applied
                    .iter()
                    .map(|a| match a {
                        AppliedAction::Created { node_id } => node_id.clone(),
                        AppliedAction::Merged { target_node_id } => target_node_id.clone(),
                        AppliedAction::Aliased { target_node_id, .. } => target_node_id.clone(),
                    })
                    .collect();
                let skipped = matches!(result.guardrail, omg_observer::GuardrailDecision::Skip);

                emit_metric(&MetricEvent::Guardrail {
                    session_key: session_key.to_string(),
                    action: guardrail_action(&result.guardrail),
                    max_overlap: 0.0,
                });
                emit_metric(&MetricEvent::Extract {
                    session_key: session_key.to_string(),
                    operations_found: result.extract.operations.len(),
                    skipped,
                });

                if let Err(e) = sync_mocs_for_operations(registry, root, &result.extract.operations, &result.applied) {
                    emit_metric(&MetricEvent::Error { session_key: session_key.to_string(), stage: "moc-sync".into(), reason: e.to_string() });
                } else if let Some(patch) = &result.now_patch {
                    if let Err(e) = apply_now_patch(registry, root, patch) {
                        emit_metric(&MetricEvent::Error { session_key: session_key.to_string(), stage: "now-patch".into(), reason: e.to_string() });
                    }
                }

                let fingerprint_vec = result.fingerprint.map(|fp| fp.0.into_iter().collect());
                record_observation_success(
                    &mut state,
                    result.extract_output_tokens as u64,
                    messages.len(),
                    written_ids,
                    fingerprint_vec,
                    config.observer.recent_window_size,
                );
                outcome.observed = !skipped;
                outcome.applied = result.applied;
            }
            Err(e) => {
                record_observation_failure(&mut state);
                emit_metric(&MetricEvent::Error { session_key: session_key.to_string(), stage: "extract".into(), reason: e.to_string() });
            }
        }
    }

    if should_reflect(&state, config.session.observation_token_threshold) {
        match run_reflection(registry, root, llm, &config.reflector, None) {
            Ok(summary) => {
                if summary.attempted {
                    emit_metric(&MetricEvent::Reflection {
                        session_key: session_key.to_string(),
                        compression_level: summary.compression_level,
                        nodes_touched: summary.reflection_node_ids.len() + summary.archived_count,
                    });
                }
                outcome.reflection = Some(summary);
            }
            Err(e) => {
                emit_metric(&MetricEvent::Error { session_key: session_key.to_string(), stage: "reflection".into(), reason: e.to_string() });
            }
        }
        mark_reflection_attempted(&mut state);
    }

    if let Err(e) = save_session_state(root, session_key, &state) {
        emit_metric(&MetricEvent::Error { session_key: session_key.to_string(), stage: "session-save".into(), reason: e.to_string() });
    }

    outcome
}

fn guardrail_action(decision: &omg_observer::GuardrailDecision) -> &'static str {
    match decision {
        omg_observer::GuardrailDecision::Proceed => "proceed",
        omg_observer::GuardrailDecision::Truncate { .. } => "truncate",
        omg_observer::GuardrailDecision::Skip => "skip",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use omg_core::errors::{OmgError, OmgResult};
    use omg_core::traits::LlmResponse;
    use omg_registry::Registry;
    use omg_scaffold::scaffold_graph_root;
    use tempfile::tempdir;

    struct FakeLlm {
        response: String,
    }

    impl LlmClient for FakeLlm {
        fn generate(&self, _system: &str, _user: &str, _max_tokens: usize) -> OmgResult<LlmResponse> {
            Ok(LlmResponse { content: self.response.clone(), input_tokens: 10, output_tokens: 20 })
        }
    }

    struct FailingLlm;
    impl LlmClient for FailingLlm {
        fn generate(&self, _system: &str, _user: &str, _max_tokens: usize) -> OmgResult<LlmResponse> {
            Err(OmgError::LlmFailed { label: "test".into(), reason: "boom".into() })
        }
    }

    fn xml_for(canonical_key: &str) -> String {
        format!(
            r#"<observations><operations>
              <operation type="preference" priority="medium">
                <canonical-key>{canonical_key}</canonical-key>
                <title>t</title>
                <description>editor theme preference</description>
                <content>likes dark mode</content>
              </operation>
            </operations></observations>"#
        )
    }

    #[test]
    fn first_turn_creates_a_node_and_persists_session_state() {
        let dir = tempdir().unwrap();
        let registry = Registry::new(dir.path());
        scaffold_graph_root(&registry, dir.path()).unwrap();

        let llm = FakeLlm { response: xml_for("preferences.editor_theme") };
        let config = OmgConfig::default();
        let messages = ["I prefer dark mode"];

        let outcome = agent_end(&registry, dir.path(), &llm, None, "session-1", &messages, None, None, &config);

        assert!(outcome.observed);
        assert_eq!(outcome.applied.len(), 1);

        let state = load_session_state(dir.path(), "session-1").unwrap();
        assert_eq!(state.observation_boundary_message_index, 1);
        assert_eq!(state.pending_message_tokens, 0);
    }

    #[test]
    fn failed_extract_leaves_boundary_untouched_and_does_not_panic() {
        let dir = tempdir().unwrap();
        let registry = Registry::new(dir.path());
        scaffold_graph_root(&registry, dir.path()).unwrap();

        let llm = FailingLlm;
        let mut config = OmgConfig::default();
        config.session.trigger_mode = omg_core::config::TriggerMode::EveryTurn;
        let messages = ["some note"];

        let outcome = agent_end(&registry, dir.path(), &llm, None, "session-2", &messages, None, None, &config);
        assert!(!outcome.observed);

        let state = load_session_state(dir.path(), "session-2").unwrap();
        assert_eq!(state.observation_boundary_message_index, 0);
    }

    #[test]
    fn empty_messages_do_not_call_the_llm() {
        let dir = tempdir().unwrap();
        let registry = Registry::new(dir.path());
        scaffold_graph_root(&registry, dir.path()).unwrap();

        let llm = FailingLlm;
        let config = OmgConfig::default();
        let outcome = agent_end(&registry, dir.path(), &llm, None, "session-3", &[], None, None, &config);
        assert!(!outcome.observed);
    }
}
