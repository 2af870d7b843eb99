use std::collections::HashMap;
use std::path::{Path, PathBuf};

use omg_core::errors::OmgResult;
use omg_core::model::RegistryEntry;
use omg_io::{parse_node, read_to_string_opt};
use tracing::warn;

/// Recursively collect every `.md` file under `root`, skipping dotfiles
/// (registry/state/lock sentinels live at the root with a leading `.`).
fn collect_markdown(root: &Path, dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(read_dir) = std::fs::read_dir(dir) else { return };
    for entry in read_dir.flatten() {
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with('.') {
            continue;
        }
        if path.is_dir() {
            collect_markdown(root, &path, out);
        } else if path.extension().map(|e| e == "md").unwrap_or(false) {
            out.push(path);
        }
    }
}

/// Scan the on-disk node set under a graph root and rebuild the full
/// registry entry map from scratch (spec.md §4.1: "It may be rebuilt at
/// any time from the on-disk node set"). Individual unparseable files are
/// logged and skipped rather than failing the whole rebuild, matching
/// the general fail-open-for-availability posture (spec.md §7) — a
/// single corrupt legacy file must not make the entire graph
/// unreadable.
pub fn scan_graph_root(root: &Path) -> OmgResult<HashMap<String, RegistryEntry>> {
    let mut files = Vec::new();
    collect_markdown(root, root, &mut files);
    files.sort();

    let mut entries = HashMap::new();
    for path in files {
        let rel = path.strip_prefix(root).unwrap_or(&path).to_string_lossy().replace('\\', "/");
        let Some(content) = read_to_string_opt(&path)? else { continue };
        match parse_node(&rel, &content) {
            Ok(node) => {
                let entry = RegistryEntry::from_node(&node);
                entries.insert(node.id.clone(), entry);
            }
            Err(e) => {
                warn!(file = %rel, error = %e, "skipping unparseable node file during registry rebuild");
            }
        }
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use omg_core::model::{Node, NodeType, Priority};
    use omg_io::serialize_node;
    use tempfile::tempdir;

    fn write_node(root: &Path, rel: &str, id: &str, canonical_key: &str) {
        let node = Node {
            id: id.into(),
            uid: Node::compute_uid("default", NodeType::Fact, canonical_key),
            canonical_key: Some(canonical_key.into()),
            node_type: NodeType::Fact,
            priority: Priority::Medium,
            created: "2026-01-01T00:00:00Z".parse().unwrap(),
            updated: "2026-01-01T00:00:00Z".parse().unwrap(),
            description: "d".into(),
            body: "b".into(),
            links: vec![],
            tags: vec![],
            aliases: vec![],
            archived: false,
            merged_into: None,
            merged_from: vec![],
            compression_level: None,
            file_path: None,
        };
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, serialize_node(&node)).unwrap();
    }

    #[test]
    fn scan_picks_up_all_nodes_and_skips_garbage() {
        let dir = tempdir().unwrap();
        write_node(dir.path(), "nodes/fact/a.md", "omg/fact/a", "facts.a");
        write_node(dir.path(), "nodes/fact/b.md", "omg/fact/b", "facts.b");
        std::fs::write(dir.path().join("nodes/fact/garbage.md"), "not frontmatter").unwrap();
        std::fs::write(dir.path().join(".registry.json"), "{}").unwrap();

        let entries = scan_graph_root(dir.path()).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.contains_key("omg/fact/a"));
        assert!(entries.contains_key("omg/fact/b"));
    }
}
