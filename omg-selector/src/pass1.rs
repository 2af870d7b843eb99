use chrono::{DateTime, Utc};

use omg_core::model::{NodeType, Priority, RegistryEntry};
use omg_core::traits::MemorySearchTool;
use omg_retrieval::{semantic_pass, MergeCandidate};

use crate::scoring::pass1_score;

/// Boost applied to a candidate's metadata score when the optional
/// semantic-search pass also surfaces it (spec.md §4.8: pass 1 runs the
/// registry scan and a semantic search "in parallel" and merges them).
const SEMANTIC_BOOST_WEIGHT: f64 = 0.5;
/// Cap on semantic hits considered before merging into pass-1 ranking.
const SEMANTIC_TOP_N: usize = 30;

#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub id: String,
    pub entry: RegistryEntry,
    pub score: f64,
}

#[derive(Debug, Clone, Default)]
pub struct Pass1Result {
    pub mocs: Vec<ScoredCandidate>,
    pub regular: Vec<ScoredCandidate>,
}

/// Score every non-structural registry entry, optionally boosted by a
/// semantic search, then partition into MOC and regular candidate pools
/// capped at `3 * max_mocs` and `pass1_regular_candidates` respectively
/// (spec.md §4.8).
pub fn run_pass1(
    entries: &[(String, RegistryEntry)],
    keywords: &[String],
    prompt: &str,
    search_tool: Option<&dyn MemorySearchTool>,
    now: DateTime<Utc>,
    max_mocs: usize,
    pass1_regular_candidates: usize,
) -> Pass1Result {
    let semantic_query = MergeCandidate {
        title: prompt.to_string(),
        canonical_key: String::new(),
        description: String::new(),
        node_type: NodeType::Fact,
        priority: Priority::Medium,
    };
    let semantic_hits = semantic_pass(search_tool, &semantic_query, entries, SEMANTIC_TOP_N);
    let boost_for = |id: &str| -> f64 {
        semantic_hits.iter().find(|h| h.id == id).map(|h| 1.0 + SEMANTIC_BOOST_WEIGHT * h.score).unwrap_or(1.0)
    };

    let mut mocs = Vec::new();
    let mut regular = Vec::new();
    for (id, entry) in entries {
        if matches!(entry.node_type, NodeType::Index | NodeType::Now) {
            continue;
        }
        let score = pass1_score(keywords, entry, now) * boost_for(id);
        let scored = ScoredCandidate { id: id.clone(), entry: entry.clone(), score };
        if entry.node_type == NodeType::Moc {
            mocs.push(scored);
        } else {
            regular.push(scored);
        }
    }

    sort_desc(&mut mocs);
    sort_desc(&mut regular);
    mocs.truncate(3 * max_mocs);
    regular.truncate(pass1_regular_candidates);

    Pass1Result { mocs, regular }
}

fn sort_desc(candidates: &mut [ScoredCandidate]) {
    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
}
