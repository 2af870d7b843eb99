use std::path::Path;

use tracing::warn;

use omg_core::config::{MergeConfig, ObserverConfig, RetrievalConfig};
use omg_core::errors::{ObserverError, OmgError, OmgResult};
use omg_core::model::RegistryEntry;
use omg_core::traits::{LlmClient, MemorySearchTool};
use omg_registry::Registry;
use omg_retrieval::{find_merge_targets, MergeCandidate, MergeTarget, RetrievalTuning};
use omg_similarity::fingerprint;
pub use omg_similarity::Fingerprint;

use crate::apply_action::{apply_action, AppliedAction};
use crate::extract_model::{ExtractOutcome, NowPatch};
use crate::extract_parse::parse_extract_response;
use crate::guardrail::{evaluate_guardrail, GuardrailDecision};
use crate::merge_decision::{parse_merge_decision, MergeAction, MergeDecision};
use crate::prompts::{extract_system_prompt, extract_user_prompt, merge_system_prompt, merge_user_prompt};
use crate::suppression::suppress_near_duplicates;

/// Advisory cap on the Merge-decision LLM's response (a single attribute
/// element, never body-length content beyond `body-append`).
const MERGE_DECISION_MAX_TOKENS: usize = 400;

fn keep_separate_decision() -> MergeDecision {
    MergeDecision { action: MergeAction::KeepSeparate, target_node_id: None, alias_key: None, body_append: None }
}

/// Result of one per-turn observe cycle (spec.md §4.4 + §4.5 end to end).
#[derive(Debug)]
pub struct ObservationOutcome {
    pub guardrail: GuardrailDecision,
    pub extract: ExtractOutcome,
    pub applied: Vec<AppliedAction>,
    pub now_patch: Option<NowPatch>,
    /// Fingerprint of the window actually sent to Extract (the full
    /// window, or its novel suffix after a `Truncate` guardrail) — the
    /// caller appends this to the session's recent-fingerprint history.
    pub fingerprint: Option<Fingerprint>,
    /// Output tokens the Extract LLM call reported using (spec.md §6:
    /// "the LLM client reports {inputTokens, outputTokens} used, which
    /// the reflection watermark ... consume[s]"). Zero when no call was
    /// made (skipped turn).
    pub extract_output_tokens: usize,
}

impl ObservationOutcome {
    fn skipped(guardrail: GuardrailDecision) -> Self {
        Self { guardrail, extract: ExtractOutcome::default(), applied: vec![], now_patch: None, fingerprint: None, extract_output_tokens: 0 }
    }
}

/// Run one Extract -> Merge -> apply cycle for a turn's unobserved message
/// window (spec.md §4.4-§4.5, data flow in §2).
#[allow(clippy::too_many_arguments)]
pub fn observe_turn(
    registry: &Registry,
    root: &Path,
    llm: &dyn LlmClient,
    search_tool: Option<&dyn MemorySearchTool>,
    messages: &[&str],
    now_body: Option<&str>,
    session_context: Option<&str>,
    recent_fingerprints: &[Fingerprint],
    last_observation_entries: &[RegistryEntry],
    observer_config: &ObserverConfig,
    retrieval_config: &RetrievalConfig,
    merge_config: &MergeConfig,
    max_output_tokens: usize,
) -> OmgResult<ObservationOutcome> {
    if messages.is_empty() {
        return Ok(ObservationOutcome::skipped(GuardrailDecision::Proceed));
    }

    let guardrail = evaluate_guardrail(
        messages,
        recent_fingerprints,
        observer_config.skip_overlap_threshold,
        observer_config.truncate_overlap_threshold,
    );

    let window: &[&str] = match &guardrail {
        GuardrailDecision::Skip => return Ok(ObservationOutcome::skipped(guardrail)),
        GuardrailDecision::Truncate { from_index } => &messages[*from_index..],
        GuardrailDecision::Proceed => messages,
    };

    if window.is_empty() {
        return Ok(ObservationOutcome::skipped(guardrail));
    }

    let fp = fingerprint(window);

    let user_prompt = extract_user_prompt(window, now_body, session_context);
    let response = llm
        .generate(extract_system_prompt(), &user_prompt, max_output_tokens)
        .map_err(|e| OmgError::Observer(ObserverError::ExtractFailed { reason: e.to_string() }))?;
    let extract_output_tokens = response.output_tokens;

    let mut extract = parse_extract_response(&response.content, max_output_tokens, response.output_tokens, observer_config.truncation_ratio);
    extract.operations = suppress_near_duplicates(
        std::mem::take(&mut extract.operations),
        last_observation_entries,
        observer_config.candidate_suppression_threshold,
    );

    let tuning = RetrievalTuning {
        local_top_m: retrieval_config.local_top_m,
        semantic_top_s: retrieval_config.semantic_top_s,
        top_k: retrieval_config.top_k,
        local_weight: retrieval_config.local_weight,
        semantic_weight: retrieval_config.semantic_weight,
    };

    let mut applied = Vec::with_capacity(extract.operations.len());
    for op in &extract.operations {
        let candidate = MergeCandidate {
            title: op.title.clone(),
            canonical_key: op.canonical_key.clone(),
            description: op.description.clone(),
            node_type: op.node_type,
            priority: op.priority,
        };
        let targets = find_merge_targets(registry, search_tool, &candidate, tuning, observer_config.merge_threshold)?;

        let decision = if targets.is_empty() {
            keep_separate_decision()
        } else {
            decide_merge(registry, llm, op, &targets)?
        };

        let result = apply_action(registry, root, op, &decision, merge_config.fallback_to_keep_separate_on_missing_target)?;
        applied.push(result);
    }

    Ok(ObservationOutcome { guardrail, now_patch: extract.now_patch.clone(), extract, applied, fingerprint: Some(fp), extract_output_tokens })
}

fn decide_merge(
    registry: &Registry,
    llm: &dyn LlmClient,
    op: &crate::extract_model::AcceptedOperation,
    targets: &[MergeTarget],
) -> OmgResult<MergeDecision> {
    let neighbors: Vec<(MergeTarget, String)> = targets
        .iter()
        .map(|t| {
            let description = registry.get_registry_entry(&t.id).ok().flatten().map(|e| e.description).unwrap_or_default();
            (t.clone(), description)
        })
        .collect();

    let prompt = merge_user_prompt(op, &neighbors);
    match llm.generate(merge_system_prompt(), &prompt, MERGE_DECISION_MAX_TOKENS) {
        Ok(response) => Ok(parse_merge_decision(&response.content)),
        Err(e) => {
            warn!(error = %e, canonical_key = %op.canonical_key, "merge-decision llm call failed, defaulting to keep_separate");
            Ok(keep_separate_decision())
        }
    }
}
