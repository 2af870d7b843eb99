use std::collections::{HashSet, VecDeque};

use omg_registry::Registry;

use omg_core::errors::OmgResult;

use crate::cache::AdjacencyCache;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Subgraph {
    pub nodes: Vec<String>,
    pub edges: Vec<(String, String)>,
}

/// BFS over both directions from `seeds`, capped at `max_nodes` total
/// distinct nodes (spec.md §4.2 `getSubgraph`). Edges are deduplicated.
pub fn get_subgraph(registry: &Registry, cache: &AdjacencyCache, seeds: &[String], max_depth: usize, max_nodes: usize) -> OmgResult<Subgraph> {
    let adjacency = cache.get(registry)?;

    let mut visited: HashSet<String> = HashSet::new();
    let mut order: Vec<String> = Vec::new();
    let mut edges: HashSet<(String, String)> = HashSet::new();
    let mut queue: VecDeque<(String, usize)> = VecDeque::new();

    for seed in seeds {
        if visited.len() >= max_nodes {
            break;
        }
        if visited.insert(seed.clone()) {
            order.push(seed.clone());
            queue.push_back((seed.clone(), 0));
        }
    }

    while let Some((node, depth)) = queue.pop_front() {
        if depth >= max_depth {
            continue;
        }
        let mut neighbors: Vec<String> = Vec::new();
        if let Some(fwd) = adjacency.forward.get(&node) {
            neighbors.extend(fwd.iter().cloned());
        }
        if let Some(bwd) = adjacency.backward.get(&node) {
            neighbors.extend(bwd.iter().cloned());
        }
        for n in neighbors {
            if adjacency.forward.get(&node).map(|v| v.contains(&n)).unwrap_or(false) {
                edges.insert((node.clone(), n.clone()));
            } else {
                edges.insert((n.clone(), node.clone()));
            }
            if !visited.contains(&n) {
                if visited.len() >= max_nodes {
                    continue;
                }
                visited.insert(n.clone());
                order.push(n.clone());
                queue.push_back((n, depth + 1));
            }
        }
    }

    let mut edge_list: Vec<(String, String)> = edges.into_iter().collect();
    edge_list.sort();
    Ok(Subgraph { nodes: order, edges: edge_list })
}

#[cfg(test)]
mod tests {
    use super::*;
    use omg_core::model::{Kind, NodeType, Priority, RegistryEntry};
    use tempfile::tempdir;

    fn entry(links: Vec<&str>) -> RegistryEntry {
        RegistryEntry {
            node_type: NodeType::Fact,
            kind: Kind::Observation,
            description: "d".into(),
            priority: Priority::Medium,
            created: chrono::Utc::now(),
            updated: chrono::Utc::now(),
            file_path: "x.md".into(),
            archived: false,
            links: links.into_iter().map(String::from).collect(),
            tags: vec![],
            canonical_key: None,
        }
    }

    #[test]
    fn respects_node_cap() {
        let dir = tempdir().unwrap();
        let registry = Registry::new(dir.path());
        registry.register_node("a".into(), entry(vec!["b"])).unwrap();
        registry.register_node("b".into(), entry(vec!["c"])).unwrap();
        registry.register_node("c".into(), entry(vec![])).unwrap();

        let cache = AdjacencyCache::new();
        let sub = get_subgraph(&registry, &cache, &["a".to_string()], 5, 2).unwrap();
        assert_eq!(sub.nodes.len(), 2);
    }

    #[test]
    fn collects_both_directions() {
        let dir = tempdir().unwrap();
        let registry = Registry::new(dir.path());
        registry.register_node("a".into(), entry(vec!["b"])).unwrap();
        registry.register_node("b".into(), entry(vec![])).unwrap();
        registry.register_node("c".into(), entry(vec!["b"])).unwrap();

        let cache = AdjacencyCache::new();
        let sub = get_subgraph(&registry, &cache, &["b".to_string()], 1, 10).unwrap();
        assert!(sub.nodes.contains(&"a".to_string()));
        assert!(sub.nodes.contains(&"c".to_string()));
    }
}
