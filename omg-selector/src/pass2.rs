use std::path::Path;

use chrono::{DateTime, Utc};

use omg_core::errors::OmgResult;
use omg_core::model::Node;

use crate::hydrate::hydrate_node;
use crate::pass1::ScoredCandidate;
use crate::scoring::pass2_score;

/// A hydrated candidate, re-scored against its full body (spec.md §4.8
/// pass 2).
#[derive(Debug, Clone)]
pub struct HydratedCandidate {
    pub node: Node,
    pub score: f64,
}

/// Hydrate each pass-1 candidate's body from disk and re-score it,
/// sorted highest first. A candidate that fails to hydrate (file
/// vanished between the registry scan and now) is dropped rather than
/// failing the whole selection.
pub fn hydrate_and_rescore(root: &Path, keywords: &[String], candidates: &[ScoredCandidate], now: DateTime<Utc>) -> OmgResult<Vec<HydratedCandidate>> {
    let mut out = Vec::with_capacity(candidates.len());
    for c in candidates {
        match hydrate_node(root, &c.id, &c.entry.file_path) {
            Ok(node) => {
                let score = pass2_score(keywords, &c.entry, &node.body, now);
                out.push(HydratedCandidate { node, score });
            }
            Err(e) => {
                tracing::warn!(id = %c.id, error = %e, "dropping candidate that failed to hydrate");
            }
        }
    }
    out.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    Ok(out)
}
