/// Frontmatter/body overlay applied to the keeper node during a merge
/// (spec.md §4.7 `applyAction`/`MergePlan.patch`).
#[derive(Debug, Clone, Default)]
pub struct MergePatch {
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub links: Vec<String>,
    pub body_append: Option<String>,
}

/// A merge plan: one keeper absorbing zero or more losing nodes and/or
/// alias keys (spec.md §4.7).
#[derive(Debug, Clone)]
pub struct MergePlan {
    pub keep_node_id: String,
    pub merge_node_ids: Vec<String>,
    pub alias_keys: Vec<String>,
    pub conflicts: Vec<String>,
    pub patch: MergePatch,
}

/// Audit record returned by [`crate::apply_merge`] (spec.md §4.7:
/// "Return an audit entry `{timestamp, keepNodeId, mergedNodeIds,
/// aliasKeys, conflicts, patch}` and the count of archived losers.").
#[derive(Debug, Clone)]
pub struct MergeAudit {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub keep_node_id: String,
    pub merged_node_ids: Vec<String>,
    pub alias_keys: Vec<String>,
    pub conflicts: Vec<String>,
    pub patch: MergePatch,
    pub archived_count: usize,
}
