use omg_core::model::{NodeType, Priority};

/// The shape of an extraction candidate that retrieval needs to score
/// against existing nodes — a subset of the fields an Observer-extracted
/// upsert carries (spec.md §4.4, §4.6).
#[derive(Debug, Clone)]
pub struct MergeCandidate {
    pub title: String,
    pub canonical_key: String,
    pub description: String,
    pub node_type: NodeType,
    pub priority: Priority,
}
