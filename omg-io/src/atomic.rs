use std::io;
use std::path::Path;

use omg_core::errors::{fs_err, OmgResult};

/// Write `contents` to `path` by writing a sibling temp file and
/// renaming it over the target (spec.md §9: "All file updates use
/// write-temp-then-rename; on all exit paths the temp is either renamed
/// or removed").
pub fn write_atomic(path: &Path, contents: &str) -> OmgResult<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir).map_err(|e| fs_err(format!("create_dir_all({})", dir.display()), e))?;

    let tmp_name = format!(
        ".{}.tmp-{}",
        path.file_name().and_then(|n| n.to_str()).unwrap_or("node"),
        std::process::id()
    );
    let tmp_path = dir.join(tmp_name);

    let write_result = std::fs::write(&tmp_path, contents);
    if let Err(e) = write_result {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(fs_err(format!("write temp for {}", path.display()), e));
    }

    if let Err(e) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(fs_err(format!("rename into {}", path.display()), e));
    }
    Ok(())
}

/// Whether an `io::Error` represents "the file is absent" — callers treat
/// this as `Ok(None)` rather than propagating (spec.md §7: "ENOENT
/// treated as absent at every read site").
pub fn is_not_found(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::NotFound
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_atomic_creates_file_and_leaves_no_temp() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nodes/fact/a.md");
        write_atomic(&path, "hello").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello");
        let leftovers: Vec<_> = std::fs::read_dir(path.parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains(".tmp-"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn write_atomic_overwrites_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.md");
        write_atomic(&path, "first").unwrap();
        write_atomic(&path, "second").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
    }
}
