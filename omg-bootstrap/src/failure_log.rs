use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use omg_core::errors::{BootstrapError, OmgError, OmgResult};
use omg_io::{read_to_string_opt, write_atomic};

const FAILURE_LOG_FILE: &str = ".bootstrap-failures.jsonl";

/// `errorType` values a failed batch is tagged with (spec.md §4.11 step
/// 5: "error type ∈ {llm-error, parse-empty, zero-operations,
/// write-all-failed}").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BootstrapErrorType {
    LlmError,
    ParseEmpty,
    ZeroOperations,
    WriteAllFailed,
}

impl BootstrapErrorType {
    pub fn as_str(self) -> &'static str {
        match self {
            BootstrapErrorType::LlmError => "llm-error",
            BootstrapErrorType::ParseEmpty => "parse-empty",
            BootstrapErrorType::ZeroOperations => "zero-operations",
            BootstrapErrorType::WriteAllFailed => "write-all-failed",
        }
    }
}

/// One JSONL entry recording a failed batch (spec.md §4.11 step 5,
/// retry mode: "read failure log, filter by `errorType` and/or explicit
/// batch indices").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureEntry {
    pub batch_index: usize,
    pub error_type: BootstrapErrorType,
    pub reason: String,
    pub recorded_at: DateTime<Utc>,
}

/// Read every recorded failure, skipping corrupt lines rather than
/// failing the whole read (each line is independent JSON).
pub fn read_failure_log(root: &Path) -> OmgResult<Vec<FailureEntry>> {
    let Some(raw) = read_to_string_opt(&root.join(FAILURE_LOG_FILE))? else { return Ok(Vec::new()) };
    Ok(raw
        .lines()
        .filter(|l| !l.trim().is_empty())
        .filter_map(|line| serde_json::from_str::<FailureEntry>(line).ok())
        .collect())
}

/// Overwrite the failure log with exactly `entries` (spec.md §4.11 retry
/// mode: "rewrite the failure log preserving un-retried entries").
pub fn rewrite_failure_log(root: &Path, entries: &[FailureEntry]) -> OmgResult<()> {
    let mut body = String::new();
    for entry in entries {
        let line = serde_json::to_string(entry)
            .map_err(|e| OmgError::Bootstrap(BootstrapError::StateFlushFailed { reason: e.to_string() }))?;
        body.push_str(&line);
        body.push('\n');
    }
    write_atomic(&root.join(FAILURE_LOG_FILE), &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn entry(index: usize, error_type: BootstrapErrorType) -> FailureEntry {
        FailureEntry { batch_index: index, error_type, reason: "boom".into(), recorded_at: Utc::now() }
    }

    #[test]
    fn missing_log_reads_as_empty() {
        let dir = tempdir().unwrap();
        assert!(read_failure_log(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn round_trips_entries() {
        let dir = tempdir().unwrap();
        let entries = vec![entry(0, BootstrapErrorType::LlmError), entry(2, BootstrapErrorType::ZeroOperations)];
        rewrite_failure_log(dir.path(), &entries).unwrap();
        let loaded = read_failure_log(dir.path()).unwrap();
        assert_eq!(loaded, entries);
    }

    #[test]
    fn rewrite_can_drop_retried_entries() {
        let dir = tempdir().unwrap();
        rewrite_failure_log(dir.path(), &[entry(0, BootstrapErrorType::LlmError), entry(1, BootstrapErrorType::WriteAllFailed)]).unwrap();
        rewrite_failure_log(dir.path(), &[entry(1, BootstrapErrorType::WriteAllFailed)]).unwrap();
        let loaded = read_failure_log(dir.path()).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].batch_index, 1);
    }
}
