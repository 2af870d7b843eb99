//! # omg-bootstrap
//!
//! Cold-start ingestion pipeline (spec.md §4.11): an exclusive
//! TTL-refreshed filesystem lock, source readers for the workspace
//! markdown tree / local log directory / per-agent SQLite memory DBs,
//! chunking and batch packing, resumable state tracking, a per-batch
//! failure JSONL log, and the runner that drives Extract over each
//! batch with bounded concurrency.

mod batch;
mod chunk;
mod failure_log;
mod lock;
mod runner;
mod sources;
mod state;

pub use batch::{pack_batches, Batch, Chunk};
pub use chunk::chunk_text;
pub use failure_log::{BootstrapErrorType, FailureEntry, read_failure_log, rewrite_failure_log};
pub use lock::{BootstrapLock, LockInfo};
pub use runner::{retry_failed_batches, run_bootstrap, BootstrapSummary};
pub use sources::{gather_entries, BootstrapSources, RusqliteMemorySource, SourceEntry, SqliteMemorySource};
pub use state::{load_completion_sentinel, load_state, save_completion_sentinel, save_state, CompletionSentinel};
