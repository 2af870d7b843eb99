use std::collections::HashMap;

use omg_core::model::RegistryEntry;
use omg_core::traits::MemorySearchTool;
use tracing::warn;

use crate::candidate::MergeCandidate;

#[derive(Debug, Clone)]
pub struct SemanticHit {
    pub id: String,
    pub score: f64,
}

/// Optional semantic merge-target pass (spec.md §4.6): query the host's
/// memory-search tool, map `filePath -> nodeId` via the registry, keep
/// top `top_s`. Failures (including an explicit `disabled` outcome)
/// degrade silently to an empty result set.
pub fn semantic_pass(
    search_tool: Option<&dyn MemorySearchTool>,
    candidate: &MergeCandidate,
    entries: &[(String, RegistryEntry)],
    top_s: usize,
) -> Vec<SemanticHit> {
    let Some(tool) = search_tool else { return Vec::new() };

    let query = format!("{} {} {}", candidate.title, candidate.canonical_key, candidate.description);
    let outcome = match tool.search(&query) {
        Some(o) if !o.disabled => o,
        Some(_) => return Vec::new(),
        None => {
            warn!(query = %query, "semantic search failed, degrading to local-only");
            return Vec::new();
        }
    };

    let by_path: HashMap<&str, &str> = entries.iter().map(|(id, e)| (e.file_path.as_str(), id.as_str())).collect();

    let mut hits: Vec<SemanticHit> = outcome
        .results
        .iter()
        .filter_map(|hit| by_path.get(hit.file_path.as_str()).map(|id| SemanticHit { id: id.to_string(), score: hit.score }))
        .collect();
    hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    hits.truncate(top_s);
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use omg_core::model::{Kind, NodeType, Priority};
    use omg_core::traits::{SearchHit, SearchOutcome};

    struct FakeSearch(Vec<SearchHit>, bool);
    impl MemorySearchTool for FakeSearch {
        fn search(&self, _query: &str) -> Option<SearchOutcome> {
            Some(SearchOutcome { results: self.0.clone(), disabled: self.1 })
        }
        fn get(&self, _file_path: &str) -> Option<String> {
            None
        }
    }

    fn entry(path: &str) -> RegistryEntry {
        RegistryEntry {
            node_type: NodeType::Fact,
            kind: Kind::Observation,
            description: "d".into(),
            priority: Priority::Medium,
            created: Utc::now(),
            updated: Utc::now(),
            file_path: path.into(),
            archived: false,
            links: vec![],
            tags: vec![],
            canonical_key: None,
        }
    }

    fn candidate() -> MergeCandidate {
        MergeCandidate {
            title: "t".into(),
            canonical_key: "k".into(),
            description: "d".into(),
            node_type: NodeType::Fact,
            priority: Priority::Medium,
        }
    }

    #[test]
    fn maps_file_paths_to_node_ids() {
        let entries = vec![("a".to_string(), entry("nodes/fact/a.md"))];
        let tool = FakeSearch(vec![SearchHit { file_path: "nodes/fact/a.md".into(), score: 0.9, snippet: "".into() }], false);
        let hits = semantic_pass(Some(&tool), &candidate(), &entries, 20);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "a");
    }

    #[test]
    fn disabled_outcome_degrades_to_empty() {
        let entries = vec![("a".to_string(), entry("nodes/fact/a.md"))];
        let tool = FakeSearch(vec![SearchHit { file_path: "nodes/fact/a.md".into(), score: 0.9, snippet: "".into() }], true);
        let hits = semantic_pass(Some(&tool), &candidate(), &entries, 20);
        assert!(hits.is_empty());
    }

    #[test]
    fn no_tool_is_empty() {
        let entries = vec![("a".to_string(), entry("nodes/fact/a.md"))];
        assert!(semantic_pass(None, &candidate(), &entries, 20).is_empty());
    }
}
