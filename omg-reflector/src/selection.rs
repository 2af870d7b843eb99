use std::path::Path;

use chrono::{Duration, Utc};
use tracing::warn;

use omg_core::config::ReflectorConfig;
use omg_core::errors::OmgResult;
use omg_core::model::{Kind, Node};
use omg_registry::{EntryFilter, Registry};
use omg_selector::hydrate_node;
use omg_similarity::combined_similarity;

/// Similarity above which two eligible nodes are treated as the same
/// concept and only the older one is kept for synthesis, mirroring the
/// candidate-suppression pattern `omg-observer`'s guardrail uses for
/// near-duplicate Extract candidates.
const DEDUP_SIMILARITY_THRESHOLD: f64 = 0.85;

/// Select observation nodes eligible for reflection (spec.md §4.12:
/// "observation nodes older than a threshold"; spec.md §4.13 cron
/// contract: "non-archived non-reflection entries older than 7 days"),
/// deduplicated against one another.
pub fn select_reflection_candidates(registry: &Registry, root: &Path, config: &ReflectorConfig) -> OmgResult<Vec<(String, Node)>> {
    let cutoff = Utc::now() - Duration::days(config.reflection_age_days);
    let filter = EntryFilter { kind: Some(Kind::Observation), ..Default::default() };

    let mut eligible = Vec::new();
    for (id, entry) in registry.get_registry_entries(Some(&filter))? {
        if entry.created > cutoff {
            continue;
        }
        match hydrate_node(root, &id, &entry.file_path) {
            Ok(node) => eligible.push((id, node)),
            Err(e) => warn!(id = %id, error = %e, "skipping reflection candidate, failed to hydrate"),
        }
    }

    Ok(dedup_by_similarity(eligible))
}

fn dedup_by_similarity(mut nodes: Vec<(String, Node)>) -> Vec<(String, Node)> {
    nodes.sort_by(|a, b| a.1.created.cmp(&b.1.created));
    let mut kept: Vec<(String, Node)> = Vec::with_capacity(nodes.len());

    'outer: for (id, node) in nodes {
        for (_, kept_node) in &kept {
            let sim = combined_similarity(
                &node.description,
                &kept_node.description,
                node.canonical_key.as_deref().unwrap_or(""),
                kept_node.canonical_key.as_deref().unwrap_or(""),
            );
            if sim >= DEDUP_SIMILARITY_THRESHOLD {
                continue 'outer;
            }
        }
        kept.push((id, node));
    }
    kept
}
