use omg_core::config::TriggerMode;
use omg_core::model::SessionState;

use crate::tokens::estimate_tokens;

/// Recompute `pendingMessageTokens` from the full unobserved suffix
/// (`messages[observationBoundaryMessageIndex..]`) and write it back.
/// Recomputed rather than incrementally accumulated so the value always
/// reflects exactly what a turn would extract right now, with no drift
/// if a caller re-checks the same boundary twice (spec.md §4.9).
pub fn refresh_pending_tokens(state: &mut SessionState, unobserved_messages: &[&str]) -> u64 {
    let tokens = estimate_tokens(unobserved_messages);
    state.pending_message_tokens = tokens;
    tokens
}

/// Whether the observation trigger fires this turn (spec.md §4.9):
/// `manual` never fires, `every-turn` fires whenever there is an
/// unobserved message, `threshold` fires once `pendingMessageTokens`
/// reaches `message_token_threshold`.
pub fn should_observe(trigger_mode: TriggerMode, state: &SessionState, message_token_threshold: u64, has_unobserved: bool) -> bool {
    if !has_unobserved {
        return false;
    }
    match trigger_mode {
        TriggerMode::Manual => false,
        TriggerMode::EveryTurn => true,
        TriggerMode::Threshold => state.pending_message_tokens >= message_token_threshold,
    }
}

/// Apply a successful observation (spec.md §4.9): reset pending tokens,
/// accumulate `used` into the running total, advance the boundary, and
/// record the written node ids plus a trimmed fingerprint history.
pub fn record_observation_success(
    state: &mut SessionState,
    used_tokens: u64,
    new_boundary: usize,
    written_node_ids: Vec<String>,
    turn_fingerprint: Option<Vec<u32>>,
    recent_window_size: usize,
) {
    state.pending_message_tokens = 0;
    state.total_observation_tokens += used_tokens;
    state.observation_boundary_message_index = state.observation_boundary_message_index.max(new_boundary);
    state.node_count += written_node_ids.len() as u64;
    state.last_observation_node_ids = written_node_ids;

    if let Some(fp) = turn_fingerprint {
        state.recent_source_fingerprints.push(fp);
        let overflow = state.recent_source_fingerprints.len().saturating_sub(recent_window_size);
        if overflow > 0 {
            state.recent_source_fingerprints.drain(0..overflow);
        }
    }
}

/// An observation attempt failed (LLM error, etc): leave the boundary and
/// pending tokens untouched so the same unobserved window is retried
/// next turn (spec.md §4.9, §8 "preserve-on-failure").
pub fn record_observation_failure(_state: &mut SessionState) {}

/// Reflection trigger (spec.md §4.9): fires once accumulated observation
/// tokens since the last reflection reach `observation_token_threshold`.
pub fn should_reflect(state: &SessionState, observation_token_threshold: u64) -> bool {
    state.total_observation_tokens.saturating_sub(state.last_reflection_total_tokens) >= observation_token_threshold
}

/// Advance the reflection watermark after an attempt, win or lose, so it
/// never re-fires on the same backlog (spec.md §4.9: "After a reflection
/// attempt (success or not), advance the watermark").
pub fn mark_reflection_attempted(state: &mut SessionState) {
    state.last_reflection_total_tokens = state.total_observation_tokens;
}
