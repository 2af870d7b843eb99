use std::collections::BTreeSet;
use std::path::Path;

use chrono::Utc;
use tracing::warn;

use omg_core::errors::OmgResult;
use omg_core::model::{Node, NodeType, RegistryEntry};
use omg_io::{read_to_string_opt, parse_node, serialize_node, slugify, write_atomic};
use omg_registry::{EntryPatch, Registry};
use omg_scaffold::regenerate_moc;
use omg_selector::hydrate_node;

use crate::model::{FieldAction, NodeFieldUpdate, ReflectionOutcome, ReflectionSummary, UpdateField};

/// Write every reflection node, archive the nodes it subsumes, regenerate
/// the touched MOCs, and apply the proposed field edits (spec.md §4.12).
/// Source-node archival and field updates degrade with a warning rather
/// than failing the whole apply when an individual target is missing —
/// reflection output can reference ids that raced with a concurrent
/// merge or archive (fail-open for availability, per spec.md §7).
pub fn apply_reflection_outcome(
    registry: &Registry,
    root: &Path,
    outcome: &ReflectionOutcome,
    source_node_ids: &[String],
) -> OmgResult<ReflectionSummary> {
    let now = Utc::now();
    let date = now.format("%Y-%m-%d").to_string();

    let mut reflection_node_ids = Vec::with_capacity(outcome.reflection_nodes.len());
    let mut moc_domains: BTreeSet<String> = outcome.moc_domains.iter().cloned().collect();

    for candidate in &outcome.reflection_nodes {
        let slug = slugify(&candidate.canonical_key);
        let file_path = format!("reflections/{slug}-{date}.md");
        let id = format!("omg/reflection/{slug}-{date}");
        let uid = Node::compute_uid("default", NodeType::Reflection, &candidate.canonical_key);

        let node = Node {
            id: id.clone(),
            uid,
            canonical_key: Some(candidate.canonical_key.clone()),
            node_type: NodeType::Reflection,
            priority: candidate.priority,
            created: now,
            updated: now,
            description: candidate.description.clone(),
            body: candidate.content.clone(),
            links: vec![],
            tags: candidate.tags.clone(),
            aliases: vec![],
            archived: false,
            merged_into: None,
            merged_from: source_node_ids.to_vec(),
            compression_level: Some(candidate.compression_level),
            file_path: Some(file_path.clone()),
        };

        write_atomic(&root.join(&file_path), &serialize_node(&node))?;
        registry.register_node(id.clone(), RegistryEntry::from_node(&node))?;
        reflection_node_ids.push(id);

        for domain in &candidate.moc_hints {
            moc_domains.insert(domain.clone());
        }
    }

    for domain in &moc_domains {
        regenerate_moc(registry, root, domain, &reflection_node_ids)?;
    }

    let mut archived_count = 0;
    for id in &outcome.archive_node_ids {
        match archive_node(registry, root, id, now) {
            Ok(true) => archived_count += 1,
            Ok(false) => {}
            Err(e) => warn!(id = %id, error = %e, "failed to archive reflection source node"),
        }
    }

    let mut node_updates_applied = 0;
    for update in &outcome.node_updates {
        match apply_field_update(registry, root, update, now) {
            Ok(()) => node_updates_applied += 1,
            Err(e) => warn!(id = %update.node_id, error = %e, "failed to apply reflection node-update"),
        }
    }

    let compression_level = outcome.reflection_nodes.iter().map(|n| n.compression_level).max().unwrap_or(0);

    Ok(ReflectionSummary {
        attempted: true,
        compression_level,
        reflection_node_ids,
        archived_count,
        node_updates_applied,
    })
}

fn archive_node(registry: &Registry, root: &Path, id: &str, now: chrono::DateTime<Utc>) -> OmgResult<bool> {
    let Some(entry) = registry.get_registry_entry(id)? else {
        return Ok(false);
    };
    if entry.archived {
        return Ok(false);
    }

    let abs_path = root.join(&entry.file_path);
    let Some(content) = read_to_string_opt(&abs_path)? else {
        return Ok(false);
    };
    let mut node = parse_node(&entry.file_path, &content)?;
    node.archived = true;
    node.updated = now;
    write_atomic(&abs_path, &serialize_node(&node))?;

    registry.update_registry_entry(id, EntryPatch { archived: Some(true), updated: Some(now), ..Default::default() })?;
    Ok(true)
}

fn apply_field_update(registry: &Registry, root: &Path, update: &NodeFieldUpdate, now: chrono::DateTime<Utc>) -> OmgResult<()> {
    let Some(entry) = registry.get_registry_entry(&update.node_id)? else {
        warn!(id = %update.node_id, "node-update target not found, skipping");
        return Ok(());
    };
    let mut node = hydrate_node(root, &update.node_id, &entry.file_path)?;

    let mut patch = EntryPatch { updated: Some(now), ..Default::default() };

    match update.field {
        UpdateField::Body => match update.action {
            FieldAction::Set => node.body = update.value.clone(),
            FieldAction::Add => {
                if !node.body.is_empty() {
                    node.body.push_str("\n\n");
                }
                node.body.push_str(&update.value);
            }
            FieldAction::Remove => {
                node.body = node
                    .body
                    .lines()
                    .filter(|line| *line != update.value)
                    .collect::<Vec<_>>()
                    .join("\n");
            }
        },
        UpdateField::Tags => {
            match update.action {
                FieldAction::Set => node.tags = vec![update.value.to_lowercase()],
                FieldAction::Add => node.add_tag(&update.value),
                FieldAction::Remove => node.tags.retain(|t| t != &update.value.to_lowercase()),
            }
            patch.tags = Some(node.tags.clone());
        }
        UpdateField::Priority => {
            if update.action != FieldAction::Set {
                warn!(id = %update.node_id, action = ?update.action, "priority only supports set, applying as set");
            }
            if let Some(priority) = omg_core::model::Priority::parse(&update.value) {
                node.priority = priority;
                patch.priority = Some(priority);
            } else {
                warn!(id = %update.node_id, value = %update.value, "unrecognized priority value, leaving unchanged");
                return Ok(());
            }
        }
    }

    node.updated = now;
    write_atomic(&root.join(&entry.file_path), &serialize_node(&node))?;
    registry.update_registry_entry(&update.node_id, patch)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ReflectionNodeCandidate;
    use omg_core::model::{Kind, Priority};
    use omg_io::slugify as io_slugify;
    use tempfile::tempdir;

    fn write_source_node(dir: &Path, registry: &Registry, id: &str, canonical_key: &str) {
        let file_path = format!("nodes/fact/{}.md", io_slugify(canonical_key));
        let node = Node {
            id: id.into(),
            uid: Node::compute_uid("default", NodeType::Fact, canonical_key),
            canonical_key: Some(canonical_key.into()),
            node_type: NodeType::Fact,
            priority: Priority::Medium,
            created: Utc::now(),
            updated: Utc::now(),
            description: "a fact".into(),
            body: "original body".into(),
            links: vec![],
            tags: vec!["old".into()],
            aliases: vec![],
            archived: false,
            merged_into: None,
            merged_from: vec![],
            compression_level: None,
            file_path: Some(file_path.clone()),
        };
        write_atomic(&dir.join(&file_path), &serialize_node(&node)).unwrap();
        registry.register_node(id.into(), RegistryEntry::from_node(&node)).unwrap();
        let _ = Kind::Observation;
    }

    #[test]
    fn writes_reflection_node_and_archives_sources() {
        let dir = tempdir().unwrap();
        let registry = Registry::new(dir.path());
        write_source_node(dir.path(), &registry, "omg/fact/a", "facts.a");

        let outcome = ReflectionOutcome {
            reflection_nodes: vec![ReflectionNodeCandidate {
                compression_level: 1,
                priority: Priority::Low,
                canonical_key: "reflections.weekly".into(),
                title: "Weekly summary".into(),
                description: "Condensed weekly facts".into(),
                content: "Summary content".into(),
                moc_hints: vec!["weekly".into()],
                tags: vec!["summary".into()],
            }],
            archive_node_ids: vec!["omg/fact/a".into()],
            moc_domains: vec![],
            node_updates: vec![],
            xml_error: None,
        };

        let summary = apply_reflection_outcome(&registry, dir.path(), &outcome, &["omg/fact/a".to_string()]).unwrap();
        assert_eq!(summary.reflection_node_ids.len(), 1);
        assert_eq!(summary.archived_count, 1);

        let entry = registry.get_registry_entry("omg/fact/a").unwrap().unwrap();
        assert!(entry.archived);

        let moc_content = std::fs::read_to_string(dir.path().join("mocs/moc-weekly.md")).unwrap();
        assert!(moc_content.contains(&summary.reflection_node_ids[0]));
    }

    #[test]
    fn node_update_adds_tag() {
        let dir = tempdir().unwrap();
        let registry = Registry::new(dir.path());
        write_source_node(dir.path(), &registry, "omg/fact/b", "facts.b");

        let outcome = ReflectionOutcome {
            reflection_nodes: vec![],
            archive_node_ids: vec![],
            moc_domains: vec![],
            node_updates: vec![NodeFieldUpdate {
                node_id: "omg/fact/b".into(),
                field: UpdateField::Tags,
                action: FieldAction::Add,
                value: "reflected".into(),
            }],
            xml_error: None,
        };

        let summary = apply_reflection_outcome(&registry, dir.path(), &outcome, &[]).unwrap();
        assert_eq!(summary.node_updates_applied, 1);

        let entry = registry.get_registry_entry("omg/fact/b").unwrap().unwrap();
        assert!(entry.tags.contains(&"reflected".to_string()));
    }

    #[test]
    fn missing_archive_target_is_tolerated() {
        let dir = tempdir().unwrap();
        let registry = Registry::new(dir.path());

        let outcome = ReflectionOutcome {
            reflection_nodes: vec![],
            archive_node_ids: vec!["omg/fact/missing".into()],
            moc_domains: vec![],
            node_updates: vec![],
            xml_error: None,
        };

        let summary = apply_reflection_outcome(&registry, dir.path(), &outcome, &[]).unwrap();
        assert_eq!(summary.archived_count, 0);
    }
}
