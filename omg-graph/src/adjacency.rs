use std::collections::HashMap;

use omg_core::model::RegistryEntry;

/// Forward and backward adjacency maps built from registry `links[]`,
/// filtering out archived entries and self-edges (spec.md §4.2).
#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    pub forward: HashMap<String, Vec<String>>,
    pub backward: HashMap<String, Vec<String>>,
}

pub fn build_adjacency(entries: &HashMap<String, RegistryEntry>) -> Adjacency {
    let mut forward: HashMap<String, Vec<String>> = HashMap::new();
    let mut backward: HashMap<String, Vec<String>> = HashMap::new();

    for (id, entry) in entries {
        if entry.archived {
            continue;
        }
        forward.entry(id.clone()).or_default();
        for target in &entry.links {
            if target == id {
                continue;
            }
            // Only traverse edges whose target is a known, non-archived
            // node (structural `omg/moc-{domain}` targets may not have a
            // registry entry of their own and are kept as dangling links,
            // reported elsewhere rather than traversed).
            let target_live = entries.get(target).map(|t| !t.archived).unwrap_or(false);
            if !target_live {
                continue;
            }
            forward.entry(id.clone()).or_default().push(target.clone());
            backward.entry(target.clone()).or_default().push(id.clone());
        }
    }

    Adjacency { forward, backward }
}
