use std::collections::BTreeMap;
use std::path::Path;

use omg_core::errors::OmgResult;
use omg_io::upsert_id;
use omg_observer::{AcceptedOperation, AppliedAction};
use omg_registry::Registry;

use crate::moc::regenerate_moc;

/// Regenerate every MOC domain touched by one turn's accepted operations,
/// deduped so a domain hinted by several operations in the same call is
/// only rewritten once (spec.md §2 data flow: "MOC regeneration"; §4.11
/// step 5: "applies MOC updates (deduped per batch)"). Returns the MOC
/// ids that were regenerated.
pub fn sync_mocs_for_operations(
    registry: &Registry,
    root: &Path,
    operations: &[AcceptedOperation],
    applied: &[AppliedAction],
) -> OmgResult<Vec<String>> {
    let mut members_by_domain: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for (op, action) in operations.iter().zip(applied.iter()) {
        if op.moc_hints.is_empty() {
            continue;
        }
        let member_id = match action {
            AppliedAction::Created { node_id } => node_id.clone(),
            AppliedAction::Merged { target_node_id } => target_node_id.clone(),
            AppliedAction::Aliased { target_node_id, .. } => target_node_id.clone(),
        };
        for domain in &op.moc_hints {
            let domain = domain.trim();
            if domain.is_empty() {
                continue;
            }
            let entry = members_by_domain.entry(domain.to_string()).or_default();
            if !entry.contains(&member_id) {
                entry.push(member_id.clone());
            }
        }
    }

    let mut moc_ids = Vec::with_capacity(members_by_domain.len());
    for (domain, members) in members_by_domain {
        moc_ids.push(regenerate_moc(registry, root, &domain, &members)?);
    }
    Ok(moc_ids)
}

/// Deterministic upsert id a `keep_separate` action would have produced,
/// used by callers that need to resolve a MOC member id before
/// [`omg_observer::apply_action`] has run (bootstrap dry-run diagnostics).
pub fn expected_upsert_id(op: &AcceptedOperation) -> String {
    upsert_id(op.node_type, &op.canonical_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use omg_core::model::{NodeType, Priority};
    use omg_observer::AppliedAction;
    use tempfile::tempdir;

    use crate::scaffold::scaffold_graph_root;

    fn op(moc_hints: Vec<&str>) -> AcceptedOperation {
        AcceptedOperation {
            node_type: NodeType::Preference,
            priority: Priority::Medium,
            canonical_key: "preferences.editor_theme".into(),
            title: "Editor theme".into(),
            description: "Prefers dark mode".into(),
            content: "body".into(),
            moc_hints: moc_hints.into_iter().map(String::from).collect(),
            tags: vec![],
            links: vec![],
            priority_defaulted: false,
        }
    }

    #[test]
    fn groups_and_dedupes_hints_across_operations() {
        let dir = tempdir().unwrap();
        let registry = Registry::new(dir.path());
        scaffold_graph_root(&registry, dir.path()).unwrap();

        // Both operations hint at "preferences"; the second also hints
        // "editor" -- two MOC domains total, one regenerate call each.
        let ops = vec![op(vec!["preferences"]), op(vec!["preferences", "editor"])];
        let applied = vec![
            AppliedAction::Created { node_id: "omg/preference/a".into() },
            AppliedAction::Created { node_id: "omg/preference/b".into() },
        ];

        let moc_ids = sync_mocs_for_operations(&registry, dir.path(), &ops, &applied).unwrap();
        assert_eq!(moc_ids.len(), 2);
        assert!(moc_ids.contains(&"omg/moc-preferences".to_string()));
        assert!(moc_ids.contains(&"omg/moc-editor".to_string()));

        let content = std::fs::read_to_string(dir.path().join("mocs/moc-preferences.md")).unwrap();
        assert!(content.contains("omg/preference/a"));
        assert!(content.contains("omg/preference/b"));
    }

    #[test]
    fn operations_without_hints_touch_no_mocs() {
        let dir = tempdir().unwrap();
        let registry = Registry::new(dir.path());
        scaffold_graph_root(&registry, dir.path()).unwrap();

        let ops = vec![op(vec![])];
        let applied = vec![AppliedAction::Created { node_id: "omg/preference/a".into() }];
        let moc_ids = sync_mocs_for_operations(&registry, dir.path(), &ops, &applied).unwrap();
        assert!(moc_ids.is_empty());
    }
}
