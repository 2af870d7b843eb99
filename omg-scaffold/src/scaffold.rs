use std::path::Path;

use chrono::Utc;

use omg_core::errors::{fs_err, OmgResult};
use omg_core::model::{Node, NodeType, Priority, RegistryEntry};
use omg_io::{read_to_string_opt, serialize_node, write_atomic};
use omg_registry::Registry;

/// Fixed ids/paths for the two singleton structural nodes (spec.md §6).
pub const INDEX_ID: &str = "omg/index";
pub const INDEX_PATH: &str = "index.md";
pub const NOW_ID: &str = "omg/now";
pub const NOW_PATH: &str = "now.md";

const UPSERT_TYPES: &[NodeType] = &[
    NodeType::Identity,
    NodeType::Preference,
    NodeType::Project,
    NodeType::Decision,
    NodeType::Fact,
    NodeType::Episode,
];

/// Lay out the on-disk skeleton for a fresh graph root (spec.md §6): the
/// `nodes/{type}/` directories, `mocs/`, `reflections/`, `.omg-state/`,
/// and the singleton `index.md`/`now.md` nodes. Idempotent — an already
/// scaffolded root is left untouched where content already exists.
pub fn scaffold_graph_root(registry: &Registry, root: &Path) -> OmgResult<()> {
    for node_type in UPSERT_TYPES {
        let dir = root.join("nodes").join(node_type.dir_segment());
        std::fs::create_dir_all(&dir).map_err(|e| fs_err(format!("create_dir_all({})", dir.display()), e))?;
    }
    for dir_name in ["mocs", "reflections", ".omg-state"] {
        let dir = root.join(dir_name);
        std::fs::create_dir_all(&dir).map_err(|e| fs_err(format!("create_dir_all({})", dir.display()), e))?;
    }

    ensure_singleton(registry, root, NodeType::Index, INDEX_ID, INDEX_PATH, "Index", "# Index\n\nNo maps of content yet.\n")?;
    ensure_singleton(registry, root, NodeType::Now, NOW_ID, NOW_PATH, "Now", "# Now\n\n## Focus\n\n## Open Loops\n")?;
    Ok(())
}

fn ensure_singleton(
    registry: &Registry,
    root: &Path,
    node_type: NodeType,
    id: &str,
    rel_path: &str,
    description: &str,
    default_body: &str,
) -> OmgResult<()> {
    let abs_path = root.join(rel_path);
    if read_to_string_opt(&abs_path)?.is_some() {
        return Ok(());
    }
    let now = Utc::now();
    let node = Node {
        id: id.to_string(),
        uid: Node::compute_uid("default", node_type, id),
        canonical_key: None,
        node_type,
        priority: Priority::Medium,
        created: now,
        updated: now,
        description: description.to_string(),
        body: default_body.to_string(),
        links: vec![],
        tags: vec![],
        aliases: vec![],
        archived: false,
        merged_into: None,
        merged_from: vec![],
        compression_level: None,
        file_path: Some(rel_path.to_string()),
    };
    write_atomic(&abs_path, &serialize_node(&node))?;
    registry.register_node(id.to_string(), RegistryEntry::from_node(&node))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn scaffold_creates_directories_and_singletons() {
        let dir = tempdir().unwrap();
        let registry = Registry::new(dir.path());
        scaffold_graph_root(&registry, dir.path()).unwrap();

        assert!(dir.path().join("nodes/fact").is_dir());
        assert!(dir.path().join("mocs").is_dir());
        assert!(dir.path().join("reflections").is_dir());
        assert!(dir.path().join(".omg-state").is_dir());
        assert!(registry.get_registry_entry(INDEX_ID).unwrap().is_some());
        assert!(registry.get_registry_entry(NOW_ID).unwrap().is_some());
    }

    #[test]
    fn scaffold_is_idempotent_and_preserves_existing_now_body() {
        let dir = tempdir().unwrap();
        let registry = Registry::new(dir.path());
        scaffold_graph_root(&registry, dir.path()).unwrap();
        write_atomic(&dir.path().join(NOW_PATH), "---\nid: omg/now\ndescription: Now\ntype: now\npriority: medium\ncreated: 2026-01-01T00:00:00Z\nupdated: 2026-01-01T00:00:00Z\nlinks: []\ntags: []\n---\ncustom focus\n").unwrap();
        scaffold_graph_root(&registry, dir.path()).unwrap();
        let content = std::fs::read_to_string(dir.path().join(NOW_PATH)).unwrap();
        assert!(content.contains("custom focus"));
    }
}
