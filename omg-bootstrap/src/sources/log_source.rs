use std::path::Path;

use omg_core::errors::OmgResult;
use omg_io::{list_dir_opt, read_to_string_opt};

use super::SourceEntry;

const LOG_EXTENSIONS: &[&str] = &["log", "jsonl", "txt"];

/// Read every top-level log-like file in `dir`, one [`SourceEntry`] per
/// file (spec.md §4.11: "local log directory... degrades to empty on
/// missing directories"). Not recursive — log directories are flat in
/// practice, unlike the markdown tree.
pub fn read_log_entries(dir: &Path) -> OmgResult<Vec<SourceEntry>> {
    let mut entries = Vec::new();
    for path in list_dir_opt(dir)? {
        if path.is_dir() {
            continue;
        }
        let is_log = path.extension().and_then(|e| e.to_str()).map(|ext| LOG_EXTENSIONS.contains(&ext)).unwrap_or(false);
        if !is_log {
            continue;
        }
        if let Some(text) = read_to_string_opt(&path)? {
            let text = text.trim().to_string();
            if !text.is_empty() {
                entries.push(SourceEntry { origin: path.display().to_string(), text });
            }
        }
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_dir_yields_empty() {
        let dir = tempdir().unwrap();
        let entries = read_log_entries(&dir.path().join("absent")).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn reads_recognized_log_extensions_only() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("a.log"), "line one").unwrap();
        std::fs::write(dir.path().join("b.jsonl"), "{}").unwrap();
        std::fs::write(dir.path().join("c.bin"), "binary junk").unwrap();

        let entries = read_log_entries(dir.path()).unwrap();
        assert_eq!(entries.len(), 2);
    }
}
