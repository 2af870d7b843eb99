use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs4::FileExt;
use serde::{Deserialize, Serialize};

use omg_core::errors::OmgResult;
use omg_io::write_atomic;

const LOCK_FILE: &str = ".bootstrap-lock";

/// Diagnostic contents of `.bootstrap-lock` (spec.md §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    pub pid: u32,
    pub hostname: String,
    pub acquired_at: DateTime<Utc>,
    pub refreshed_at: DateTime<Utc>,
}

fn local_hostname() -> String {
    std::env::var("HOSTNAME")
        .or_else(|_| std::env::var("COMPUTERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Exclusive, TTL-refreshed lock over one graph root (spec.md §4.11 step
/// 1: "Acquire exclusive filesystem lock at the graph root (TTL-refreshed).
/// Fail open if lock is held."). The TTL is informational (surfaced via
/// `LockInfo::refreshed_at`) — actual exclusion is an OS advisory lock
/// that releases automatically if the holding process dies, so a stale
/// TTL with a dead holder still unlocks on the next `try_acquire`.
pub struct BootstrapLock {
    path: PathBuf,
    file: File,
    acquired_at: DateTime<Utc>,
}

impl BootstrapLock {
    fn path(root: &Path) -> PathBuf {
        root.join(LOCK_FILE)
    }

    /// Attempt to acquire the lock. Returns `Ok(None)` rather than an
    /// error when another live process holds it — bootstrap runs fail
    /// open, not loudly.
    pub fn try_acquire(root: &Path) -> OmgResult<Option<Self>> {
        let path = Self::path(root);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| omg_core::errors::fs_err(format!("create_dir_all({})", parent.display()), e))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|e| omg_core::errors::fs_err(format!("open {}", path.display()), e))?;

        if file.try_lock_exclusive().is_err() {
            return Ok(None);
        }

        let now = Utc::now();
        let lock = Self { path, file, acquired_at: now };
        lock.write_info(now)?;
        Ok(Some(lock))
    }

    fn write_info(&self, refreshed_at: DateTime<Utc>) -> OmgResult<()> {
        let info = LockInfo { pid: std::process::id(), hostname: local_hostname(), acquired_at: self.acquired_at, refreshed_at };
        let json = serde_json::to_string_pretty(&info).expect("LockInfo always serializes");
        write_atomic(&self.path, &json)
    }

    /// Refresh `refreshedAt` while the run is still in progress (spec.md
    /// §4.11 step 6: "Debounced state flush + lock refresh after each
    /// batch").
    pub fn refresh(&self) -> OmgResult<()> {
        self.write_info(Utc::now())
    }
}

impl Drop for BootstrapLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
        let _ = std::fs::remove_file(&self.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn first_acquire_succeeds_second_fails_while_held() {
        let dir = tempdir().unwrap();
        let first = BootstrapLock::try_acquire(dir.path()).unwrap();
        assert!(first.is_some());

        let second = BootstrapLock::try_acquire(dir.path()).unwrap();
        assert!(second.is_none());
    }

    #[test]
    fn lock_is_released_and_file_removed_on_drop() {
        let dir = tempdir().unwrap();
        {
            let _lock = BootstrapLock::try_acquire(dir.path()).unwrap().unwrap();
            assert!(dir.path().join(".bootstrap-lock").exists());
        }
        assert!(!dir.path().join(".bootstrap-lock").exists());

        let reacquired = BootstrapLock::try_acquire(dir.path()).unwrap();
        assert!(reacquired.is_some());
    }

    #[test]
    fn refresh_updates_refreshed_at() {
        let dir = tempdir().unwrap();
        let lock = BootstrapLock::try_acquire(dir.path()).unwrap().unwrap();
        lock.refresh().unwrap();
        let content = std::fs::read_to_string(dir.path().join(".bootstrap-lock")).unwrap();
        let info: LockInfo = serde_json::from_str(&content).unwrap();
        assert!(info.refreshed_at >= info.acquired_at);
    }
}
