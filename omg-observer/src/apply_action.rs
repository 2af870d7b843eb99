use std::path::Path;

use chrono::Utc;
use tracing::warn;

use omg_core::errors::{ObserverError, OmgError, OmgResult};
use omg_core::model::{Node, RegistryEntry};
use omg_io::{parse_node, read_to_string_opt, serialize_node, upsert_file_path, upsert_id, write_atomic};
use omg_registry::{EntryPatch, Registry};

use crate::extract_model::AcceptedOperation;
use crate::merge_decision::{MergeAction, MergeDecision};

/// Outcome of applying a decided action for one accepted candidate
/// (spec.md §4.5 "Applying an action").
#[derive(Debug, Clone, PartialEq)]
pub enum AppliedAction {
    Created { node_id: String },
    Merged { target_node_id: String },
    Aliased { target_node_id: String, alias_key: String },
}

/// Apply the decided action for one candidate. If `decision` names a merge
/// or alias target missing from the registry, falls back to
/// `keep_separate` and warns, matching spec.md §4.5 — unless
/// `fallback_on_missing_target` is false, in which case it errors instead.
pub fn apply_action(
    registry: &Registry,
    root: &Path,
    op: &AcceptedOperation,
    decision: &MergeDecision,
    fallback_on_missing_target: bool,
) -> OmgResult<AppliedAction> {
    match &decision.action {
        MergeAction::KeepSeparate => Ok(AppliedAction::Created { node_id: upsert_node(registry, root, op)? }),
        MergeAction::Merge => {
            let target = decision.target_node_id.as_deref().expect("parse_merge_decision guarantees target for Merge");
            if registry.get_registry_entry(target)?.is_none() {
                return missing_target_fallback(registry, root, op, target, fallback_on_missing_target);
            }
            merge_into_keeper(registry, root, target, op, decision.body_append.as_deref())?;
            Ok(AppliedAction::Merged { target_node_id: target.to_string() })
        }
        MergeAction::Alias => {
            let target = decision.target_node_id.as_deref().expect("parse_merge_decision guarantees target for Alias");
            let alias_key = decision.alias_key.as_deref().expect("parse_merge_decision guarantees alias_key for Alias");
            if registry.get_registry_entry(target)?.is_none() {
                return missing_target_fallback(registry, root, op, target, fallback_on_missing_target);
            }
            alias_into_keeper(registry, root, target, alias_key)?;
            Ok(AppliedAction::Aliased { target_node_id: target.to_string(), alias_key: alias_key.to_string() })
        }
    }
}

fn missing_target_fallback(
    registry: &Registry,
    root: &Path,
    op: &AcceptedOperation,
    target: &str,
    fallback_on_missing_target: bool,
) -> OmgResult<AppliedAction> {
    if !fallback_on_missing_target {
        return Err(OmgError::Observer(ObserverError::MergeDecisionFailed {
            reason: format!("merge/alias target '{target}' missing from registry"),
        }));
    }
    warn!(target, canonical_key = %op.canonical_key, "merge/alias target missing from registry, falling back to keep_separate");
    Ok(AppliedAction::Created { node_id: upsert_node(registry, root, op)? })
}

/// Write-or-refresh the deterministic upsert path for a candidate
/// (spec.md §4.5 "keep_separate"). Idempotent: a second upsert with the
/// same `canonicalKey` preserves `created` and refreshes `updated`/body.
fn upsert_node(registry: &Registry, root: &Path, op: &AcceptedOperation) -> OmgResult<String> {
    let id = upsert_id(op.node_type, &op.canonical_key);
    let file_path = upsert_file_path(op.node_type, &op.canonical_key);
    let abs_path = root.join(&file_path);
    let now = Utc::now();

    let existing = read_to_string_opt(&abs_path)?.map(|content| parse_node(&file_path, &content)).transpose()?;

    let node = Node {
        id: id.clone(),
        uid: existing
            .as_ref()
            .map(|n| n.uid.clone())
            .unwrap_or_else(|| Node::compute_uid("default", op.node_type, &op.canonical_key)),
        canonical_key: Some(op.canonical_key.clone()),
        node_type: op.node_type,
        priority: op.priority,
        created: existing.as_ref().map(|n| n.created).unwrap_or(now),
        updated: now,
        description: op.description.clone(),
        body: op.content.clone(),
        links: op.links.clone(),
        tags: op.tags.clone(),
        aliases: existing.as_ref().map(|n| n.aliases.clone()).unwrap_or_default(),
        archived: false,
        merged_into: None,
        merged_from: existing.as_ref().map(|n| n.merged_from.clone()).unwrap_or_default(),
        compression_level: None,
        file_path: Some(file_path.clone()),
    };

    write_atomic(&abs_path, &serialize_node(&node))?;
    registry.register_node(id.clone(), RegistryEntry::from_node(&node))?;
    Ok(id)
}

fn merge_into_keeper(registry: &Registry, root: &Path, target: &str, op: &AcceptedOperation, body_append: Option<&str>) -> OmgResult<()> {
    let entry = registry.get_registry_entry(target)?.expect("checked by caller");
    let path = root.join(&entry.file_path);
    let content = read_to_string_opt(&path)?.ok_or_else(|| {
        OmgError::Observer(ObserverError::MergeDecisionFailed { reason: format!("merge target '{target}' file missing") })
    })?;
    let mut node = parse_node(&entry.file_path, &content)?;

    // The absorbed candidate was never written as its own node, so unlike
    // the merge executor (omg-merge, which merges real persisted nodes),
    // there is no source node id to record: `mergedFrom` stays unchanged
    // (spec.md §4.5, §8 scenario 2).
    for link in &op.links {
        node.add_link(link.clone());
    }
    for tag in &op.tags {
        node.add_tag(tag);
    }
    if let Some(append) = body_append {
        if !node.body.is_empty() {
            node.body.push_str("\n\n");
        }
        node.body.push_str(append);
    }
    node.updated = Utc::now();

    write_atomic(&path, &serialize_node(&node))?;
    registry.update_registry_entry(
        target,
        EntryPatch { updated: Some(node.updated), links: Some(node.links.clone()), tags: Some(node.tags.clone()), ..Default::default() },
    )?;
    Ok(())
}

fn alias_into_keeper(registry: &Registry, root: &Path, target: &str, alias_key: &str) -> OmgResult<()> {
    let entry = registry.get_registry_entry(target)?.expect("checked by caller");
    let path = root.join(&entry.file_path);
    let content = read_to_string_opt(&path)?.ok_or_else(|| {
        OmgError::Observer(ObserverError::MergeDecisionFailed { reason: format!("alias target '{target}' file missing") })
    })?;
    let mut node = parse_node(&entry.file_path, &content)?;
    node.add_alias(alias_key.to_string());
    node.updated = Utc::now();
    write_atomic(&path, &serialize_node(&node))?;
    registry.update_registry_entry(target, EntryPatch { updated: Some(node.updated), ..Default::default() })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use omg_core::model::{NodeType, Priority};
    use tempfile::tempdir;

    fn sample_op() -> AcceptedOperation {
        AcceptedOperation {
            node_type: NodeType::Preference,
            priority: Priority::Medium,
            canonical_key: "preferences.editor_theme".into(),
            title: "Editor theme".into(),
            description: "Prefers dark mode".into(),
            content: "User stated a preference for dark mode editors.".into(),
            moc_hints: vec![],
            tags: vec!["editor".into()],
            links: vec![],
            priority_defaulted: false,
        }
    }

    #[test]
    fn keep_separate_creates_node_and_registers_it() {
        let dir = tempdir().unwrap();
        let registry = Registry::new(dir.path());
        let decision = MergeDecision { action: MergeAction::KeepSeparate, target_node_id: None, alias_key: None, body_append: None };
        let result = apply_action(&registry, dir.path(), &sample_op(), &decision, true).unwrap();
        let id = match result {
            AppliedAction::Created { node_id } => node_id,
            other => panic!("expected Created, got {other:?}"),
        };
        assert_eq!(id, "omg/preference/preferences-editor-theme");
        assert!(registry.get_registry_entry(&id).unwrap().is_some());
    }

    #[test]
    fn second_upsert_preserves_created() {
        let dir = tempdir().unwrap();
        let registry = Registry::new(dir.path());
        let decision = MergeDecision { action: MergeAction::KeepSeparate, target_node_id: None, alias_key: None, body_append: None };
        apply_action(&registry, dir.path(), &sample_op(), &decision, true).unwrap();
        let id = upsert_id(NodeType::Preference, "preferences.editor_theme");
        let first_created = registry.get_registry_entry(&id).unwrap().unwrap().created;

        std::thread::sleep(std::time::Duration::from_millis(5));
        apply_action(&registry, dir.path(), &sample_op(), &decision, true).unwrap();
        let second_created = registry.get_registry_entry(&id).unwrap().unwrap().created;
        assert_eq!(first_created, second_created);
    }

    #[test]
    fn merge_appends_body_to_target() {
        let dir = tempdir().unwrap();
        let registry = Registry::new(dir.path());
        let keep_separate = MergeDecision { action: MergeAction::KeepSeparate, target_node_id: None, alias_key: None, body_append: None };
        let id = match apply_action(&registry, dir.path(), &sample_op(), &keep_separate, true).unwrap() {
            AppliedAction::Created { node_id } => node_id,
            _ => unreachable!(),
        };

        let merge_decision = MergeDecision {
            action: MergeAction::Merge,
            target_node_id: Some(id.clone()),
            alias_key: None,
            body_append: Some("Switched to light mode".into()),
        };
        let mut op2 = sample_op();
        op2.description = "Prefers light mode".into();
        let result = apply_action(&registry, dir.path(), &op2, &merge_decision, true).unwrap();
        assert_eq!(result, AppliedAction::Merged { target_node_id: id.clone() });

        let entry = registry.get_registry_entry(&id).unwrap().unwrap();
        let content = std::fs::read_to_string(dir.path().join(&entry.file_path)).unwrap();
        assert!(content.contains("Switched to light mode"));

        let keeper = parse_node(&entry.file_path, &content).unwrap();
        assert!(keeper.merged_from.is_empty());
    }

    #[test]
    fn missing_merge_target_falls_back_to_keep_separate() {
        let dir = tempdir().unwrap();
        let registry = Registry::new(dir.path());
        let decision = MergeDecision {
            action: MergeAction::Merge,
            target_node_id: Some("omg/preference/ghost".into()),
            alias_key: None,
            body_append: Some("x".into()),
        };
        let result = apply_action(&registry, dir.path(), &sample_op(), &decision, true).unwrap();
        assert!(matches!(result, AppliedAction::Created { .. }));
    }

    #[test]
    fn missing_merge_target_errors_when_fallback_disabled() {
        let dir = tempdir().unwrap();
        let registry = Registry::new(dir.path());
        let decision = MergeDecision {
            action: MergeAction::Merge,
            target_node_id: Some("omg/preference/ghost".into()),
            alias_key: None,
            body_append: Some("x".into()),
        };
        let err = apply_action(&registry, dir.path(), &sample_op(), &decision, false).unwrap_err();
        assert!(matches!(err, OmgError::Observer(ObserverError::MergeDecisionFailed { .. })));
    }
}
