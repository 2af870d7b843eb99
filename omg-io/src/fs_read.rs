use std::path::Path;

use omg_core::errors::{fs_err, OmgResult};

use crate::atomic::is_not_found;

/// Read a file to a string, treating a missing file as `Ok(None)` rather
/// than an error (spec.md §7: "ENOENT treated as absent at every read
/// site").
pub fn read_to_string_opt(path: &Path) -> OmgResult<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(s) => Ok(Some(s)),
        Err(e) if is_not_found(&e) => Ok(None),
        Err(e) => Err(fs_err(format!("read {}", path.display()), e)),
    }
}

/// List entries of a directory, treating a missing directory as an empty
/// list (the same ENOENT-as-absent rule applied to directory scans: the
/// registry rebuild and bootstrap source readers both degrade to empty
/// input rather than failing).
pub fn list_dir_opt(path: &Path) -> OmgResult<Vec<std::path::PathBuf>> {
    match std::fs::read_dir(path) {
        Ok(rd) => {
            let mut out = Vec::new();
            for entry in rd {
                let entry = entry.map_err(|e| fs_err(format!("read_dir entry in {}", path.display()), e))?;
                out.push(entry.path());
            }
            out.sort();
            Ok(out)
        }
        Err(e) if is_not_found(&e) => Ok(Vec::new()),
        Err(e) => Err(fs_err(format!("read_dir {}", path.display()), e)),
    }
}
