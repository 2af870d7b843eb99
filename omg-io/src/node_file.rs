use chrono::{DateTime, Utc};

use omg_core::errors::{IoError, OmgError, OmgResult};
use omg_core::model::{Node, NodeType, Priority};

use crate::frontmatter::{parse_frontmatter, serialize_frontmatter};
use crate::yaml_value::YamlValue;

/// Parse a node file's contents into a [`Node`], per spec.md §6: "required
/// keys id/description/type/priority/created/updated; optional
/// uid/canonicalKey/aliases/links/tags/archived/mergedInto/mergedFrom/
/// compressionLevel; body after the closing fence."
pub fn parse_node(path: &str, content: &str) -> OmgResult<Node> {
    let (map, body) = parse_frontmatter(path, content)?;

    let required = |key: &str| -> OmgResult<String> {
        map.get(key)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .ok_or_else(|| {
                OmgError::Io(IoError::MissingKey { path: path.to_string(), key: key.to_string() })
            })
    };

    let id = required("id")?;
    let description = required("description")?;
    let type_str = required("type")?;
    let priority_str = required("priority")?;
    let created_str = required("created")?;
    let updated_str = required("updated")?;

    let node_type = NodeType::parse(&type_str).ok_or_else(|| {
        OmgError::Io(IoError::InvalidNodeType { path: path.to_string(), value: type_str.clone() })
    })?;
    let priority = Priority::parse(&priority_str).ok_or_else(|| {
        OmgError::Io(IoError::InvalidPriority { path: path.to_string(), value: priority_str.clone() })
    })?;

    let created = parse_instant(path, "created", &created_str)?;
    let updated = parse_instant(path, "updated", &updated_str)?;

    let uid = map
        .get("uid")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| {
            let scope = "default";
            let key = map.get("canonicalKey").and_then(|v| v.as_str()).unwrap_or(&description);
            Node::compute_uid(scope, node_type, key)
        });

    let canonical_key = map.get("canonicalKey").and_then(|v| v.as_str()).map(|s| s.to_string());
    let links = map.get("links").map(|v| v.as_list()).unwrap_or_default();
    let tags = map.get("tags").map(|v| v.as_list()).unwrap_or_default();
    let aliases = map.get("aliases").map(|v| v.as_list()).unwrap_or_default();
    let archived = map.get("archived").and_then(|v| v.as_bool()).unwrap_or(false);
    let merged_into = map
        .get("mergedInto")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string());
    let merged_from = map.get("mergedFrom").map(|v| v.as_list()).unwrap_or_default();
    let compression_level = map
        .get("compressionLevel")
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse::<u8>().ok());

    Ok(Node {
        id,
        uid,
        canonical_key,
        node_type,
        priority,
        created,
        updated,
        description,
        body,
        links,
        tags,
        aliases,
        archived,
        merged_into,
        merged_from,
        compression_level,
        file_path: Some(path.to_string()),
    })
}

fn parse_instant(path: &str, key: &str, raw: &str) -> OmgResult<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>().map_err(|e| {
        OmgError::Io(IoError::MalformedFrontmatter {
            path: path.to_string(),
            reason: format!("invalid ISO-8601 instant in '{key}': {e}"),
        })
    })
}

/// Render a [`Node`] back to frontmatter + body text, in the canonical
/// key order so identical inputs always produce byte-identical output
/// (spec.md §8: "second upsert with same inputs produces byte-identical
/// file modulo `updated`").
pub fn serialize_node(node: &Node) -> String {
    let mut entries: Vec<(&str, YamlValue)> = vec![
        ("id", YamlValue::String(node.id.clone())),
        ("uid", YamlValue::String(node.uid.clone())),
        ("description", YamlValue::String(node.description.clone())),
        ("type", YamlValue::String(node.node_type.as_str().to_string())),
        ("priority", YamlValue::String(node.priority.as_str().to_string())),
        ("created", YamlValue::String(node.created.to_rfc3339())),
        ("updated", YamlValue::String(node.updated.to_rfc3339())),
    ];
    if let Some(ck) = &node.canonical_key {
        entries.push(("canonicalKey", YamlValue::String(ck.clone())));
    }
    if !node.aliases.is_empty() {
        entries.push(("aliases", YamlValue::List(node.aliases.clone())));
    }
    entries.push(("links", YamlValue::List(node.links.clone())));
    entries.push(("tags", YamlValue::List(node.tags.clone())));
    if node.archived {
        entries.push(("archived", YamlValue::Bool(true)));
    }
    if let Some(target) = &node.merged_into {
        entries.push(("mergedInto", YamlValue::String(target.clone())));
    }
    if !node.merged_from.is_empty() {
        entries.push(("mergedFrom", YamlValue::List(node.merged_from.clone())));
    }
    if let Some(level) = node.compression_level {
        entries.push(("compressionLevel", YamlValue::String(level.to_string())));
    }
    serialize_frontmatter(&entries, &node.body)
}
