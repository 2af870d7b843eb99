use std::collections::HashSet;

use omg_registry::Registry;

use omg_core::errors::OmgResult;

use crate::adjacency::Adjacency;
use crate::cache::AdjacencyCache;

fn dfs(
    adjacency: &Adjacency,
    current: &str,
    target: &str,
    max_depth: usize,
    visited: &mut HashSet<String>,
    path: &mut Vec<String>,
    out: &mut Vec<Vec<String>>,
) {
    if current == target {
        out.push(path.clone());
        return;
    }
    if path.len() - 1 >= max_depth {
        return;
    }
    let Some(forward) = adjacency.forward.get(current) else { return };
    for next in forward {
        if visited.contains(next) {
            continue;
        }
        visited.insert(next.clone());
        path.push(next.clone());
        dfs(adjacency, next, target, max_depth, visited, path, out);
        path.pop();
        visited.remove(next);
    }
}

/// All forward paths from `from` to `to` of length `<= max_depth` edges,
/// with visited-set cycle prevention (spec.md §4.2 `findPaths`).
/// `from == to` returns the single zero-length path.
pub fn find_paths(registry: &Registry, cache: &AdjacencyCache, from: &str, to: &str, max_depth: usize) -> OmgResult<Vec<Vec<String>>> {
    if from == to {
        return Ok(vec![vec![from.to_string()]]);
    }
    let adjacency = cache.get(registry)?;
    let mut visited = HashSet::from([from.to_string()]);
    let mut path = vec![from.to_string()];
    let mut out = Vec::new();
    dfs(&adjacency, from, to, max_depth, &mut visited, &mut path, &mut out);
    Ok(out)
}
