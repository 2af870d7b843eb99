use std::path::Path;

use rusqlite::{Connection, OpenFlags};

use omg_core::errors::{BootstrapError, OmgError, OmgResult};

use super::SourceEntry;

/// Optional per-agent SQLite memory DB capability (spec.md §4.11
/// "(SUPPLEMENT)": "a capability trait (`SqliteMemorySource`) with a
/// `None`/absent-directory fallback"). A host without this capability
/// simply never supplies a reader; callers hold `Option<&dyn
/// SqliteMemorySource>`.
pub trait SqliteMemorySource: Send + Sync {
    fn read_entries(&self, db_path: &Path) -> OmgResult<Vec<SourceEntry>>;
}

/// Read-only `rusqlite` reader over a `memories(id, content)` table, the
/// minimal shape an external agent's SQLite memory store is expected to
/// expose. Missing files degrade to empty; an unexpected schema is
/// reported as [`BootstrapError::SqliteSourceUnavailable`] rather than
/// panicking, so the caller can log and continue with other sources.
pub struct RusqliteMemorySource;

impl SqliteMemorySource for RusqliteMemorySource {
    fn read_entries(&self, db_path: &Path) -> OmgResult<Vec<SourceEntry>> {
        if !db_path.exists() {
            return Ok(Vec::new());
        }

        let conn = Connection::open_with_flags(db_path, OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX)
            .map_err(|e| OmgError::Bootstrap(BootstrapError::SqliteSourceUnavailable { reason: e.to_string() }))?;

        let mut stmt = conn
            .prepare("SELECT id, content FROM memories")
            .map_err(|e| OmgError::Bootstrap(BootstrapError::SqliteSourceUnavailable { reason: e.to_string() }))?;

        let origin = db_path.display().to_string();
        let rows = stmt
            .query_map([], |row| {
                let id: i64 = row.get(0)?;
                let content: String = row.get(1)?;
                Ok((id, content))
            })
            .map_err(|e| OmgError::Bootstrap(BootstrapError::SqliteSourceUnavailable { reason: e.to_string() }))?;

        let mut entries = Vec::new();
        for row in rows {
            let (id, content) = row.map_err(|e| OmgError::Bootstrap(BootstrapError::SqliteSourceUnavailable { reason: e.to_string() }))?;
            let content = content.trim().to_string();
            if !content.is_empty() {
                entries.push(SourceEntry { origin: format!("{origin}#{id}"), text: content });
            }
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_db_file_yields_empty() {
        let dir = tempdir().unwrap();
        let reader = RusqliteMemorySource;
        let entries = reader.read_entries(&dir.path().join("absent.sqlite")).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn reads_rows_from_memories_table() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("agent.sqlite");
        let conn = Connection::open(&db_path).unwrap();
        conn.execute("CREATE TABLE memories (id INTEGER PRIMARY KEY, content TEXT)", []).unwrap();
        conn.execute("INSERT INTO memories (content) VALUES (?1)", ["remembered fact one"]).unwrap();
        drop(conn);

        let reader = RusqliteMemorySource;
        let entries = reader.read_entries(&db_path).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "remembered fact one");
    }

    #[test]
    fn unexpected_schema_reports_sqlite_unavailable() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("agent.sqlite");
        let conn = Connection::open(&db_path).unwrap();
        conn.execute("CREATE TABLE other (x INTEGER)", []).unwrap();
        drop(conn);

        let reader = RusqliteMemorySource;
        let err = reader.read_entries(&db_path).unwrap_err();
        assert!(matches!(err, OmgError::Bootstrap(BootstrapError::SqliteSourceUnavailable { .. })));
    }
}
