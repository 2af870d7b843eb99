use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{Kind, NodeType, Priority};
use super::node::Node;

/// Metadata cache entry over a node, as stored in `.registry.json`
/// (spec.md §3 "Registry").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub node_type: NodeType,
    pub kind: Kind,
    pub description: String,
    pub priority: Priority,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub file_path: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub archived: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical_key: Option<String>,
}

impl RegistryEntry {
    /// Project a full [`Node`] down to its registry entry.
    pub fn from_node(node: &Node) -> Self {
        let file_path = node.file_path.clone().unwrap_or_default();
        Self {
            node_type: node.node_type,
            kind: Kind::infer(node.node_type, &file_path),
            description: node.description.clone(),
            priority: node.priority,
            created: node.created,
            updated: node.updated,
            file_path,
            archived: node.archived,
            links: node.links.clone(),
            tags: node.tags.clone(),
            canonical_key: node.canonical_key.clone(),
        }
    }

    /// The invariant from spec.md §8: "For every registry entry, reading
    /// the file at filePath yields matching type/priority/description/updated."
    pub fn matches_node(&self, node: &Node) -> bool {
        self.node_type == node.node_type
            && self.priority == node.priority
            && self.description == node.description
            && self.updated == node.updated
    }
}
