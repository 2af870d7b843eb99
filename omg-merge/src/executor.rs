use std::path::Path;

use chrono::Utc;
use tracing::warn;

use omg_core::errors::{MergeError, OmgError, OmgResult};
use omg_core::model::RegistryEntry;
use omg_io::{parse_node, read_to_string_opt, serialize_node, write_atomic};
use omg_registry::{EntryPatch, Registry};

use crate::plan::{MergeAudit, MergePlan};

/// Apply a [`MergePlan`] (spec.md §4.7):
/// 1. read the keeper — fail the whole merge if it cannot be read, so no
///    content is ever lost;
/// 2. patch its frontmatter/body and atomic-write it;
/// 3. archive each loser (`archived: true`, `mergedInto: keeper`) —
///    a missing loser file is logged, not fatal.
pub fn apply_merge(registry: &Registry, root: &Path, plan: &MergePlan) -> OmgResult<MergeAudit> {
    let keeper_entry = registry
        .get_registry_entry(&plan.keep_node_id)?
        .ok_or_else(|| OmgError::Merge(MergeError::KeeperReadFailed { id: plan.keep_node_id.clone(), reason: "no registry entry".into() }))?;

    let keeper_path = root.join(&keeper_entry.file_path);
    let keeper_content = read_to_string_opt(&keeper_path)?.ok_or_else(|| {
        OmgError::Merge(MergeError::KeeperReadFailed { id: plan.keep_node_id.clone(), reason: "file missing".into() })
    })?;
    let mut keeper = parse_node(&keeper_entry.file_path, &keeper_content)
        .map_err(|e| OmgError::Merge(MergeError::KeeperReadFailed { id: plan.keep_node_id.clone(), reason: e.to_string() }))?;

    let now = Utc::now();
    keeper.union_from(&plan.patch.links, &plan.patch.tags, &plan.merge_node_ids);
    for alias in &plan.alias_keys {
        keeper.add_alias(alias.clone());
    }
    if let Some(desc) = &plan.patch.description {
        keeper.description = desc.clone();
    }
    if let Some(append) = &plan.patch.body_append {
        if !keeper.body.is_empty() && !keeper.body.ends_with('\n') {
            keeper.body.push('\n');
        }
        if !keeper.body.is_empty() {
            keeper.body.push('\n');
        }
        keeper.body.push_str(append);
    }
    keeper.updated = now;

    write_atomic(&keeper_path, &serialize_node(&keeper))?;
    registry.update_registry_entry(
        &plan.keep_node_id,
        EntryPatch {
            description: Some(keeper.description.clone()),
            updated: Some(now),
            links: Some(keeper.links.clone()),
            tags: Some(keeper.tags.clone()),
            ..Default::default()
        },
    )?;

    let mut archived_count = 0usize;
    for loser_id in &plan.merge_node_ids {
        match archive_loser(registry, root, loser_id, &plan.keep_node_id, now) {
            Ok(true) => archived_count += 1,
            Ok(false) => {}
            Err(e) => warn!(loser = %loser_id, error = %e, "failed to archive merge loser (non-fatal)"),
        }
    }

    Ok(MergeAudit {
        timestamp: now,
        keep_node_id: plan.keep_node_id.clone(),
        merged_node_ids: plan.merge_node_ids.clone(),
        alias_keys: plan.alias_keys.clone(),
        conflicts: plan.conflicts.clone(),
        patch: plan.patch.clone(),
        archived_count,
    })
}

fn archive_loser(registry: &Registry, root: &Path, loser_id: &str, keeper_id: &str, now: chrono::DateTime<Utc>) -> OmgResult<bool> {
    let Some(entry): Option<RegistryEntry> = registry.get_registry_entry(loser_id)? else {
        warn!(loser = %loser_id, "merge loser has no registry entry, skipping");
        return Ok(false);
    };
    let path = root.join(&entry.file_path);
    let Some(content) = read_to_string_opt(&path)? else {
        warn!(loser = %loser_id, path = %path.display(), "merge loser file missing, skipping");
        return Ok(false);
    };
    let mut node = parse_node(&entry.file_path, &content)?;
    node.archived = true;
    node.merged_into = Some(keeper_id.to_string());
    node.updated = now;
    write_atomic(&path, &serialize_node(&node))?;
    registry.update_registry_entry(loser_id, EntryPatch { archived: Some(true), updated: Some(now), ..Default::default() })?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use omg_core::model::{Kind, Node, NodeType, Priority};
    use tempfile::tempdir;

    fn write_and_register(root: &Path, registry: &Registry, rel: &str, id: &str, body: &str) {
        let node = Node {
            id: id.into(),
            uid: Node::compute_uid("default", NodeType::Fact, id),
            canonical_key: Some("facts.x".into()),
            node_type: NodeType::Fact,
            priority: Priority::Medium,
            created: Utc::now(),
            updated: Utc::now(),
            description: "desc".into(),
            body: body.into(),
            links: vec![],
            tags: vec!["a".into()],
            aliases: vec![],
            archived: false,
            merged_into: None,
            merged_from: vec![],
            compression_level: None,
            file_path: None,
        };
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, serialize_node(&node)).unwrap();
        registry
            .register_node(
                id.into(),
                RegistryEntry {
                    node_type: NodeType::Fact,
                    kind: Kind::Observation,
                    description: "desc".into(),
                    priority: Priority::Medium,
                    created: node.created,
                    updated: node.updated,
                    file_path: rel.into(),
                    archived: false,
                    links: vec![],
                    tags: vec!["a".into()],
                    canonical_key: Some("facts.x".into()),
                },
            )
            .unwrap();
    }

    #[test]
    fn merge_appends_body_and_archives_loser() {
        let dir = tempdir().unwrap();
        let registry = Registry::new(dir.path());
        write_and_register(dir.path(), &registry, "nodes/fact/keeper.md", "keeper", "original body");
        write_and_register(dir.path(), &registry, "nodes/fact/loser.md", "loser", "loser body");

        let plan = MergePlan {
            keep_node_id: "keeper".into(),
            merge_node_ids: vec!["loser".into()],
            alias_keys: vec![],
            conflicts: vec![],
            patch: crate::plan::MergePatch { body_append: Some("Switched preference".into()), ..Default::default() },
        };

        let audit = apply_merge(&registry, dir.path(), &plan).unwrap();
        assert_eq!(audit.archived_count, 1);

        let keeper_content = std::fs::read_to_string(dir.path().join("nodes/fact/keeper.md")).unwrap();
        assert!(keeper_content.contains("original body"));
        assert!(keeper_content.contains("Switched preference"));

        let loser_content = std::fs::read_to_string(dir.path().join("nodes/fact/loser.md")).unwrap();
        assert!(loser_content.contains("archived: true"));
        assert!(loser_content.contains("mergedInto: keeper"));

        let loser_entry = registry.get_registry_entry("loser").unwrap().unwrap();
        assert!(loser_entry.archived);
    }

    #[test]
    fn missing_keeper_fails_whole_merge_and_archives_nothing() {
        let dir = tempdir().unwrap();
        let registry = Registry::new(dir.path());
        write_and_register(dir.path(), &registry, "nodes/fact/loser.md", "loser", "body");

        let plan = MergePlan {
            keep_node_id: "missing-keeper".into(),
            merge_node_ids: vec!["loser".into()],
            alias_keys: vec![],
            conflicts: vec![],
            patch: crate::plan::MergePatch::default(),
        };

        let err = apply_merge(&registry, dir.path(), &plan).unwrap_err();
        assert!(matches!(err, OmgError::Merge(MergeError::KeeperReadFailed { .. })));
        let loser_entry = registry.get_registry_entry("loser").unwrap().unwrap();
        assert!(!loser_entry.archived);
    }

    #[test]
    fn missing_loser_is_logged_not_fatal() {
        let dir = tempdir().unwrap();
        let registry = Registry::new(dir.path());
        write_and_register(dir.path(), &registry, "nodes/fact/keeper.md", "keeper", "body");
        registry
            .register_node(
                "ghost".into(),
                RegistryEntry {
                    node_type: NodeType::Fact,
                    kind: Kind::Observation,
                    description: "d".into(),
                    priority: Priority::Medium,
                    created: Utc::now(),
                    updated: Utc::now(),
                    file_path: "nodes/fact/does-not-exist.md".into(),
                    archived: false,
                    links: vec![],
                    tags: vec![],
                    canonical_key: None,
                },
            )
            .unwrap();

        let plan = MergePlan {
            keep_node_id: "keeper".into(),
            merge_node_ids: vec!["ghost".into()],
            alias_keys: vec![],
            conflicts: vec![],
            patch: crate::plan::MergePatch::default(),
        };

        let audit = apply_merge(&registry, dir.path(), &plan).unwrap();
        assert_eq!(audit.archived_count, 0);
    }
}
