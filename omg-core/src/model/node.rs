use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::enums::{NodeType, Priority};

/// The canonical unit of the graph, persisted one-per-file (spec.md §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// `omg/{type}/{slug}` — deterministic for upserts.
    pub id: String,
    /// 12-hex-char content address, a pure function of `(scope, type, canonicalKey)`.
    pub uid: String,
    /// Dotted domain path, the natural key for merge/alias. Absent for
    /// structural nodes (index/now/moc) that have no merge identity.
    pub canonical_key: Option<String>,
    pub node_type: NodeType,
    pub priority: Priority,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub description: String,
    pub body: String,
    /// Unique, insertion-order-preserved set of referenced node IDs.
    pub links: Vec<String>,
    /// Lowercase tags.
    pub tags: Vec<String>,
    /// Alternate canonicalKeys absorbed by merges.
    pub aliases: Vec<String>,
    pub archived: bool,
    /// Target node ID, set on a losing node after a merge.
    pub merged_into: Option<String>,
    /// Set of source node IDs absorbed by this keeper.
    pub merged_from: Vec<String>,
    /// 0-3, reflection nodes only.
    pub compression_level: Option<u8>,
    /// File path relative to the graph root. Not serialized into
    /// frontmatter (the registry and the path itself are authoritative);
    /// populated when a node is read from disk.
    #[serde(skip)]
    pub file_path: Option<String>,
}

impl Node {
    /// Compute the deterministic content-addressed `uid` for a
    /// `(scope, type, canonicalKey)` triple. Any hash with >=48 bits of
    /// output suffices (spec.md §9); we use blake3, truncated to the
    /// first 12 hex characters (48 bits), matching the teacher's
    /// `BaseMemory::compute_content_hash` use of blake3 for content
    /// addressing.
    pub fn compute_uid(scope: &str, node_type: NodeType, canonical_key: &str) -> String {
        let input = format!("{scope}\u{1}{}\u{1}{canonical_key}", node_type.as_str());
        let digest = blake3::hash(input.as_bytes());
        let hex = digest.to_hex();
        hex[..12].to_string()
    }

    /// Insert a link, preserving insertion order and uniqueness.
    pub fn add_link(&mut self, target: impl Into<String>) {
        let target = target.into();
        if !self.links.contains(&target) {
            self.links.push(target);
        }
    }

    /// Insert a tag, lowercased, deduplicated.
    pub fn add_tag(&mut self, tag: impl AsRef<str>) {
        let tag = tag.as_ref().trim().to_lowercase();
        if !tag.is_empty() && !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }

    /// Insert an alias canonicalKey, deduplicated.
    pub fn add_alias(&mut self, alias: impl Into<String>) {
        let alias = alias.into();
        if !self.aliases.contains(&alias) {
            self.aliases.push(alias);
        }
    }

    /// Union another node's links/tags/mergedFrom into this one (used by
    /// the merge executor when patching a keeper). Order of `self`'s
    /// existing entries is preserved; new entries are appended.
    pub fn union_from(&mut self, other_links: &[String], other_tags: &[String], other_merged_from: &[String]) {
        for l in other_links {
            self.add_link(l.clone());
        }
        for t in other_tags {
            self.add_tag(t);
        }
        let mut seen: BTreeSet<String> = self.merged_from.iter().cloned().collect();
        for m in other_merged_from {
            if seen.insert(m.clone()) {
                self.merged_from.push(m.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uid_is_deterministic_and_matches_shape() {
        let a = Node::compute_uid("default", NodeType::Preference, "preferences.editor_theme");
        let b = Node::compute_uid("default", NodeType::Preference, "preferences.editor_theme");
        assert_eq!(a, b);
        assert_eq!(a.len(), 12);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn uid_differs_on_any_component() {
        let base = Node::compute_uid("ws", NodeType::Fact, "facts.foo");
        assert_ne!(base, Node::compute_uid("ws2", NodeType::Fact, "facts.foo"));
        assert_ne!(base, Node::compute_uid("ws", NodeType::Decision, "facts.foo"));
        assert_ne!(base, Node::compute_uid("ws", NodeType::Fact, "facts.bar"));
    }

    #[test]
    fn add_link_dedupes_and_preserves_order() {
        let mut n = sample_node();
        n.add_link("omg/fact/a");
        n.add_link("omg/fact/b");
        n.add_link("omg/fact/a");
        assert_eq!(n.links, vec!["omg/fact/a".to_string(), "omg/fact/b".to_string()]);
    }

    fn sample_node() -> Node {
        Node {
            id: "omg/fact/test".into(),
            uid: Node::compute_uid("ws", NodeType::Fact, "facts.test"),
            canonical_key: Some("facts.test".into()),
            node_type: NodeType::Fact,
            priority: Priority::Medium,
            created: Utc::now(),
            updated: Utc::now(),
            description: "test".into(),
            body: String::new(),
            links: vec![],
            tags: vec![],
            aliases: vec![],
            archived: false,
            merged_into: None,
            merged_from: vec![],
            compression_level: None,
            file_path: None,
        }
    }
}
