mod log_source;
mod markdown_source;
mod sqlite_source;

pub use log_source::read_log_entries;
pub use markdown_source::read_markdown_entries;
pub use sqlite_source::{RusqliteMemorySource, SqliteMemorySource};

use std::path::PathBuf;

use tracing::warn;

use omg_core::errors::OmgResult;

/// One unit of raw text gathered from a bootstrap source, tagged with
/// where it came from for diagnostics (spec.md §4.11 "Inputs").
#[derive(Debug, Clone, PartialEq)]
pub struct SourceEntry {
    pub origin: String,
    pub text: String,
}

/// Already-resolved source locations for one bootstrap run. Resolving
/// *which* agents' SQLite DBs belong to this workspace is a host-level
/// config concern (spec.md §1 Non-goals: "config parsing"); this crate
/// just reads whatever paths it is handed, degrading missing ones to
/// empty (spec.md §4.11: "Each source reader degrades to empty on
/// missing directories; SQLite is optional").
#[derive(Debug, Clone, Default)]
pub struct BootstrapSources {
    pub markdown_root: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub sqlite_db_paths: Vec<PathBuf>,
}

/// Gather every source's entries into one list. A SQLite read failure
/// degrades to empty plus a warning rather than failing the whole run
/// (spec.md §4.11: "SQLite is optional").
pub fn gather_entries(sources: &BootstrapSources, sqlite_reader: Option<&dyn SqliteMemorySource>) -> OmgResult<Vec<SourceEntry>> {
    let mut entries = Vec::new();

    if let Some(root) = &sources.markdown_root {
        entries.extend(read_markdown_entries(root)?);
    }
    if let Some(dir) = &sources.log_dir {
        entries.extend(read_log_entries(dir)?);
    }
    if let Some(reader) = sqlite_reader {
        for db_path in &sources.sqlite_db_paths {
            match reader.read_entries(db_path) {
                Ok(rows) => entries.extend(rows),
                Err(e) => warn!(db_path = %db_path.display(), error = %e, "sqlite memory source unavailable, skipping"),
            }
        }
    }

    Ok(entries)
}
