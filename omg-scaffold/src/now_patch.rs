use std::path::Path;

use chrono::Utc;

use omg_core::errors::OmgResult;
use omg_io::{parse_node, read_to_string_opt, serialize_node, write_atomic};
use omg_observer::NowPatch;
use omg_registry::{EntryPatch, Registry};

use crate::scaffold::{NOW_ID, NOW_PATH};

/// Apply an Extract-phase `<now-patch>` to the singleton now-node (spec.md
/// §2 data flow: "now-node render"; §4.4). `focus` replaces the "Focus"
/// section; `open_loops` replaces "Open Loops"; `suggested_links` are
/// unioned into the node's `links`. A patch with nothing set is a no-op.
pub fn apply_now_patch(registry: &Registry, root: &Path, patch: &NowPatch) -> OmgResult<()> {
    if patch.focus.is_none() && patch.open_loops.is_empty() && patch.suggested_links.is_empty() {
        return Ok(());
    }

    let abs_path = root.join(NOW_PATH);
    let Some(content) = read_to_string_opt(&abs_path)? else {
        // Scaffolding always writes now.md first; a missing file here
        // means the caller forgot to scaffold the graph root.
        return Ok(());
    };
    let mut now = parse_node(NOW_PATH, &content)?;

    if let Some(focus) = &patch.focus {
        now.body = replace_section(&now.body, "Focus", focus);
    }
    if !patch.open_loops.is_empty() {
        let rendered = patch.open_loops.iter().map(|l| format!("- {l}")).collect::<Vec<_>>().join("\n");
        now.body = replace_section(&now.body, "Open Loops", &rendered);
    }
    for link in &patch.suggested_links {
        now.add_link(link.clone());
    }
    now.updated = Utc::now();

    write_atomic(&abs_path, &serialize_node(&now))?;
    registry.update_registry_entry(
        NOW_ID,
        EntryPatch { updated: Some(now.updated), links: Some(now.links.clone()), ..Default::default() },
    )?;
    Ok(())
}

/// Replace the body text of a `## {heading}` markdown section, appending
/// the section at the end if it isn't present yet.
fn replace_section(body: &str, heading: &str, new_text: &str) -> String {
    let marker = format!("## {heading}");
    let Some(start) = body.find(&marker) else {
        let mut out = body.trim_end().to_string();
        if !out.is_empty() {
            out.push_str("\n\n");
        }
        out.push_str(&marker);
        out.push('\n');
        out.push_str(new_text);
        out.push('\n');
        return out;
    };

    let section_start = start + marker.len();
    let rest = &body[section_start..];
    let section_end = rest.find("\n## ").map(|i| section_start + i).unwrap_or(body.len());

    let mut out = String::with_capacity(body.len() + new_text.len());
    out.push_str(&body[..section_start]);
    out.push('\n');
    out.push_str(new_text);
    out.push('\n');
    out.push_str(&body[section_end..]);
    out
}
