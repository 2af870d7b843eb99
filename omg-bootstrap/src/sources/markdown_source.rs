use std::path::Path;

use omg_core::errors::OmgResult;
use omg_io::{list_dir_opt, read_to_string_opt};

use super::SourceEntry;

/// Recursively read every `.md` file under `root`, treating a missing
/// root as empty input (spec.md §4.11: "markdown tree... degrades to
/// empty on missing directories").
pub fn read_markdown_entries(root: &Path) -> OmgResult<Vec<SourceEntry>> {
    let mut entries = Vec::new();
    walk(root, &mut entries)?;
    Ok(entries)
}

fn walk(dir: &Path, entries: &mut Vec<SourceEntry>) -> OmgResult<()> {
    for path in list_dir_opt(dir)? {
        if path.is_dir() {
            walk(&path, entries)?;
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some("md") {
            continue;
        }
        if let Some(text) = read_to_string_opt(&path)? {
            let text = text.trim().to_string();
            if !text.is_empty() {
                entries.push(SourceEntry { origin: path.display().to_string(), text });
            }
        }
    }
    Ok(())
}
