use std::collections::{HashMap, HashSet};

use chrono::Utc;

use omg_core::errors::{GraphError, OmgError, OmgResult};
use omg_registry::Registry;

use crate::adjacency::Adjacency;
use crate::cache::AdjacencyCache;
use crate::scoring::neighbor_score;

/// Which adjacency map(s) [`get_neighbors`] traverses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
    Both,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredNeighbor {
    pub id: String,
    pub score: f64,
    pub depth: usize,
}

fn neighbors_at(adjacency: &Adjacency, id: &str, direction: Direction) -> Vec<String> {
    let mut out = Vec::new();
    if direction != Direction::Backward {
        if let Some(v) = adjacency.forward.get(id) {
            out.extend(v.iter().cloned());
        }
    }
    if direction != Direction::Forward {
        if let Some(v) = adjacency.backward.get(id) {
            out.extend(v.iter().cloned());
        }
    }
    out
}

/// BFS out from `id` up to `depth` hops (1 or 2), scoring every reached
/// node and returning them sorted by score descending (spec.md §4.2).
pub fn get_neighbors(
    registry: &Registry,
    cache: &AdjacencyCache,
    id: &str,
    direction: Direction,
    depth: usize,
    keywords: &[String],
) -> OmgResult<Vec<ScoredNeighbor>> {
    if depth == 0 || depth > 2 {
        return Err(OmgError::Graph(GraphError::DepthExceeded { max_depth: 2, requested: depth }));
    }
    let adjacency = cache.get(registry)?;

    // best_depth[node] = shortest hop count at which it was reached.
    let mut best_depth: HashMap<String, usize> = HashMap::new();
    let mut frontier: HashSet<String> = HashSet::from([id.to_string()]);
    let mut visited: HashSet<String> = HashSet::from([id.to_string()]);

    for d in 1..=depth {
        let mut next = HashSet::new();
        for node in &frontier {
            for n in neighbors_at(&adjacency, node, direction) {
                if visited.contains(&n) {
                    continue;
                }
                best_depth.entry(n.clone()).or_insert(d);
                next.insert(n);
            }
        }
        for n in &next {
            visited.insert(n.clone());
        }
        frontier = next;
    }

    let entries = registry.get_node_index()?;
    let now = Utc::now();
    let mut scored: Vec<ScoredNeighbor> = best_depth
        .into_iter()
        .filter_map(|(nid, d)| {
            let entry = entries.get(&nid)?;
            let score = neighbor_score(entry, d, keywords, now);
            Some(ScoredNeighbor { id: nid, score, depth: d })
        })
        .collect();

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal).then_with(|| a.id.cmp(&b.id)));
    Ok(scored)
}

/// Incoming edge set for `id` (spec.md §4.2 `getBacklinks`).
pub fn get_backlinks(registry: &Registry, cache: &AdjacencyCache, id: &str) -> OmgResult<Vec<String>> {
    let adjacency = cache.get(registry)?;
    Ok(adjacency.backward.get(id).cloned().unwrap_or_default())
}
