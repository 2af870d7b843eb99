use omg_core::errors::OmgResult;
use omg_core::model::RegistryEntry;
use omg_registry::Registry;
use omg_similarity::combined_similarity;

/// A registry link that points at an id with no corresponding entry
/// (spec.md §4.13: weekly maintenance audit "broken links").
#[derive(Debug, Clone, PartialEq)]
pub struct BrokenLink {
    pub source_id: String,
    pub target_id: String,
}

/// Two nodes whose descriptions are similar enough to suspect an
/// un-merged duplicate (spec.md §4.13: "duplicate-description pairs
/// above a similarity threshold").
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicatePair {
    pub id_a: String,
    pub id_b: String,
    pub similarity: f64,
}

/// Scan every non-archived entry's `links` and report any target id
/// absent from the registry. O(nodes * avg links).
pub fn audit_broken_links(registry: &Registry) -> OmgResult<Vec<BrokenLink>> {
    let entries = registry.get_registry_entries(None)?;
    let index = registry.get_node_index()?;
    let mut broken = Vec::new();
    for (id, entry) in &entries {
        for target in &entry.links {
            if !index.contains_key(target) {
                broken.push(BrokenLink { source_id: id.clone(), target_id: target.clone() });
            }
        }
    }
    Ok(broken)
}

/// Pairwise-compare every non-archived entry's `canonicalKey`/description
/// against every other and report pairs at or above `threshold`
/// (spec.md §4.3 `combinedSimilarity`, reused here for the weekly audit
/// instead of per-turn merge targeting). O(n^2); acceptable at the scale
/// of a personal graph, run only on the weekly cron.
pub fn audit_duplicate_descriptions(registry: &Registry, threshold: f64) -> OmgResult<Vec<DuplicatePair>> {
    let entries = registry.get_registry_entries(None)?;
    let mut pairs = Vec::new();
    for i in 0..entries.len() {
        for j in (i + 1)..entries.len() {
            let (id_a, a) = &entries[i];
            let (id_b, b) = &entries[j];
            if a.node_type != b.node_type {
                continue;
            }
            let sim = combined_similarity(
                &a.description,
                &b.description,
                key_of(id_a, a),
                key_of(id_b, b),
            );
            if sim >= threshold {
                pairs.push(DuplicatePair { id_a: id_a.clone(), id_b: id_b.clone(), similarity: sim });
            }
        }
    }
    pairs.sort_by(|a, b| b.similarity.partial_cmp(&a.similarity).unwrap());
    Ok(pairs)
}

fn key_of<'a>(id: &'a str, entry: &'a RegistryEntry) -> &'a str {
    entry.canonical_key.as_deref().unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use omg_core::model::{Kind, NodeType, Priority};
    use tempfile::tempdir;

    fn entry(desc: &str, key: &str, links: Vec<String>) -> RegistryEntry {
        RegistryEntry {
            node_type: NodeType::Fact,
            kind: Kind::Observation,
            description: desc.into(),
            priority: Priority::Medium,
            created: Utc::now(),
            updated: Utc::now(),
            file_path: "nodes/fact/x.md".into(),
            archived: false,
            links,
            tags: vec![],
            canonical_key: Some(key.into()),
        }
    }

    #[test]
    fn finds_broken_link_to_missing_id() {
        let dir = tempdir().unwrap();
        let registry = Registry::new(dir.path());
        registry
            .register_node("omg/fact/a".into(), entry("a", "a", vec!["omg/fact/missing".into()]))
            .unwrap();

        let broken = audit_broken_links(&registry).unwrap();
        assert_eq!(broken, vec![BrokenLink { source_id: "omg/fact/a".into(), target_id: "omg/fact/missing".into() }]);
    }

    #[test]
    fn no_broken_links_when_all_targets_exist() {
        let dir = tempdir().unwrap();
        let registry = Registry::new(dir.path());
        registry.register_node("omg/fact/a".into(), entry("a", "a", vec!["omg/fact/b".into()])).unwrap();
        registry.register_node("omg/fact/b".into(), entry("b", "b", vec![])).unwrap();

        assert!(audit_broken_links(&registry).unwrap().is_empty());
    }

    #[test]
    fn flags_near_duplicate_descriptions() {
        let dir = tempdir().unwrap();
        let registry = Registry::new(dir.path());
        registry
            .register_node("omg/fact/a".into(), entry("Prefers dark mode for editor", "editor.theme", vec![]))
            .unwrap();
        registry
            .register_node("omg/fact/b".into(), entry("Prefers light mode for editor", "editor.theme", vec![]))
            .unwrap();

        let pairs = audit_duplicate_descriptions(&registry, 0.7).unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].id_a, "omg/fact/a");
        assert_eq!(pairs[0].id_b, "omg/fact/b");
    }

    #[test]
    fn unrelated_descriptions_are_not_flagged() {
        let dir = tempdir().unwrap();
        let registry = Registry::new(dir.path());
        registry.register_node("omg/fact/a".into(), entry("a", "projects.launch", vec![])).unwrap();
        registry.register_node("omg/fact/b".into(), entry("b", "preferences.theme", vec![])).unwrap();

        assert!(audit_duplicate_descriptions(&registry, 0.7).unwrap().is_empty());
    }
}
