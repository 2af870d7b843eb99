use std::collections::HashMap;

use chrono::{DateTime, Utc};

use omg_core::errors::OmgResult;
use omg_core::traits::MemorySearchTool;
use omg_registry::Registry;

use crate::candidate::MergeCandidate;
use crate::local_pass::local_pass;
use crate::semantic_pass::semantic_pass;

#[derive(Debug, Clone, PartialEq)]
pub struct MergeTarget {
    pub id: String,
    pub final_score: f64,
}

/// Tuning for [`find_merge_targets`] (spec.md §4.6). Mirrors
/// `omg_core::config::RetrievalConfig` field-for-field but is passed
/// explicitly so this crate has no dependency on `omg-core::config`'s
/// aggregate shape.
#[derive(Debug, Clone, Copy)]
pub struct RetrievalTuning {
    pub local_top_m: usize,
    pub semantic_top_s: usize,
    pub top_k: usize,
    pub local_weight: f64,
    pub semantic_weight: f64,
}

const RECENCY_BONUS_DAYS: i64 = 7;
const HIGH_PRIORITY_BONUS: f64 = 0.1;
const RECENCY_BONUS: f64 = 0.05;
const TYPE_MATCH_BONUS: f64 = 0.05;

/// Union the local and semantic passes and compute each candidate's
/// `finalScore` (spec.md §4.6):
/// `localWeight·local + semanticWeight·semantic + 0.1·(priority==high) +
/// 0.05·(within 7 days) + 0.05·(type match)`. Returns entries with
/// `finalScore >= merge_threshold`, sorted descending, capped at `top_k`.
pub fn find_merge_targets(
    registry: &Registry,
    search_tool: Option<&dyn MemorySearchTool>,
    candidate: &MergeCandidate,
    tuning: RetrievalTuning,
    merge_threshold: f64,
) -> OmgResult<Vec<MergeTarget>> {
    let entries = registry.get_registry_entries(None)?;
    let local = local_pass(&entries, candidate, tuning.local_top_m);
    let semantic = semantic_pass(search_tool, candidate, &entries, tuning.semantic_top_s);

    let by_id: HashMap<&str, _> = entries.iter().map(|(id, e)| (id.as_str(), e)).collect();
    let mut local_scores: HashMap<String, f64> = HashMap::new();
    for hit in &local {
        local_scores.insert(hit.id.clone(), hit.score);
    }
    let mut semantic_scores: HashMap<String, f64> = HashMap::new();
    for hit in &semantic {
        semantic_scores.insert(hit.id.clone(), hit.score);
    }

    let mut union_ids: Vec<String> = local_scores.keys().cloned().collect();
    for id in semantic_scores.keys() {
        if !local_scores.contains_key(id) {
            union_ids.push(id.clone());
        }
    }

    let now = Utc::now();
    let mut scored: Vec<MergeTarget> = union_ids
        .into_iter()
        .filter_map(|id| {
            let entry = by_id.get(id.as_str())?;
            let local_score = local_scores.get(&id).copied().unwrap_or(0.0);
            let semantic_score = semantic_scores.get(&id).copied().unwrap_or(0.0);
            let high_priority_bonus = if entry.priority == omg_core::model::Priority::High { HIGH_PRIORITY_BONUS } else { 0.0 };
            let recent_bonus = if is_recent(entry.updated, now) { RECENCY_BONUS } else { 0.0 };
            let type_bonus = if entry.node_type == candidate.node_type { TYPE_MATCH_BONUS } else { 0.0 };
            let final_score = tuning.local_weight * local_score
                + tuning.semantic_weight * semantic_score
                + high_priority_bonus
                + recent_bonus
                + type_bonus;
            Some(MergeTarget { id, final_score })
        })
        .filter(|t| t.final_score >= merge_threshold)
        .collect();

    scored.sort_by(|a, b| b.final_score.partial_cmp(&a.final_score).unwrap_or(std::cmp::Ordering::Equal).then_with(|| a.id.cmp(&b.id)));
    scored.truncate(tuning.top_k);
    Ok(scored)
}

fn is_recent(updated: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    (now - updated).num_days() <= RECENCY_BONUS_DAYS
}
