use std::path::Path;

use chrono::Utc;

use omg_core::errors::{OmgResult, RegistryError};
use omg_core::model::{Node, NodeType, Priority, RegistryEntry};
use omg_io::{parse_node, read_to_string_opt, serialize_node, slugify, write_atomic};
use omg_registry::{EntryPatch, Registry};

/// Deterministic id for the MOC (map-of-content) node of a domain
/// (spec.md §3: "includes `omg/moc-{domain}` membership"; §GLOSSARY).
/// Unlike upsert types this is `omg/moc-{slug}`, not `omg/moc/{slug}`.
pub fn moc_id(domain: &str) -> String {
    format!("omg/moc-{}", slugify(domain))
}

/// File path for a domain's MOC node (spec.md §6: `mocs/moc-{domain}.md`).
pub fn moc_file_path(domain: &str) -> String {
    format!("mocs/moc-{}.md", slugify(domain))
}

/// Ensure the `domain` MOC exists, lists every id in `member_ids` via
/// wikilinks, and that each member node itself links back to the MOC
/// (spec.md §3: a node's `links` "includes `omg/moc-{domain}` membership").
/// Idempotent: re-running with an already-listed member is a no-op for
/// that member.
pub fn regenerate_moc(registry: &Registry, root: &Path, domain: &str, member_ids: &[String]) -> OmgResult<String> {
    let id = moc_id(domain);
    let rel_path = moc_file_path(domain);
    let abs_path = root.join(&rel_path);
    let now = Utc::now();

    let mut moc = match read_to_string_opt(&abs_path)? {
        Some(content) => parse_node(&rel_path, &content)?,
        None => Node {
            id: id.clone(),
            uid: Node::compute_uid("default", NodeType::Moc, &id),
            canonical_key: None,
            node_type: NodeType::Moc,
            priority: Priority::Medium,
            created: now,
            updated: now,
            description: format!("Map of content: {domain}"),
            body: String::new(),
            links: vec![],
            tags: vec![],
            aliases: vec![],
            archived: false,
            merged_into: None,
            merged_from: vec![],
            compression_level: None,
            file_path: Some(rel_path.clone()),
        },
    };

    let mut changed = false;
    for member_id in member_ids {
        if !moc.links.contains(member_id) {
            moc.add_link(member_id.clone());
            changed = true;
        }
    }
    if changed {
        moc.updated = now;
        moc.body = render_moc_body(domain, &moc.links);
        write_atomic(&abs_path, &serialize_node(&moc))?;
        if registry.get_registry_entry(&id)?.is_some() {
            registry.update_registry_entry(
                &id,
                EntryPatch { updated: Some(now), links: Some(moc.links.clone()), ..Default::default() },
            )?;
        } else {
            registry.register_node(id.clone(), RegistryEntry::from_node(&moc))?;
        }
    }

    for member_id in member_ids {
        add_moc_backlink(registry, root, member_id, &id)?;
    }

    Ok(id)
}

fn render_moc_body(domain: &str, member_ids: &[String]) -> String {
    let mut body = format!("# {domain}\n\n");
    for id in member_ids {
        body.push_str(&format!("- [[{id}]]\n"));
    }
    body
}

fn add_moc_backlink(registry: &Registry, root: &Path, member_id: &str, moc_id: &str) -> OmgResult<()> {
    let Some(entry) = registry.get_registry_entry(member_id)? else {
        return Err(omg_core::errors::OmgError::Registry(RegistryError::NotFound { id: member_id.to_string() }));
    };
    let path = root.join(&entry.file_path);
    let Some(content) = read_to_string_opt(&path)? else { return Ok(()) };
    let mut node = parse_node(&entry.file_path, &content)?;
    if node.links.contains(&moc_id.to_string()) {
        return Ok(());
    }
    node.add_link(moc_id.to_string());
    node.updated = Utc::now();
    write_atomic(&path, &serialize_node(&node))?;
    registry.update_registry_entry(member_id, EntryPatch { updated: Some(node.updated), links: Some(node.links.clone()), ..Default::default() })?;
    Ok(())
}
