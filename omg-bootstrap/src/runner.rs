use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use omg_core::config::{BootstrapConfig, MergeConfig, ObserverConfig, RetrievalConfig};
use omg_core::errors::OmgResult;
use omg_core::model::BootstrapState;
use omg_core::traits::{LlmClient, MemorySearchTool};
use omg_observer::{observe_turn, ObservationOutcome};
use omg_registry::Registry;
use omg_scaffold::{apply_now_patch, sync_mocs_for_operations};

use crate::batch::{pack_batches, Batch, Chunk};
use crate::chunk::chunk_text;
use crate::failure_log::{read_failure_log, rewrite_failure_log, BootstrapErrorType, FailureEntry};
use crate::lock::BootstrapLock;
use crate::sources::{gather_entries, BootstrapSources, SourceEntry, SqliteMemorySource};
use crate::state::{load_completion_sentinel, load_state, save_completion_sentinel, save_state, CompletionSentinel};

/// Outcome of one `run_bootstrap` call (spec.md §4.11).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapSummary {
    /// `false` when the run was skipped outright: already completed
    /// (and not `force`d), or another process held the lock.
    pub ran: bool,
    pub total: usize,
    pub ok: usize,
    pub fail: usize,
}

/// Run the bootstrap pipeline over `sources` into `registry`/`root`
/// (spec.md §4.11):
/// 1. acquire the exclusive lock (fail open if held);
/// 2. skip if already completed, unless `force`;
/// 3. gather -> chunk -> pack into batches;
/// 4. resume-filter against prior `done` state;
/// 5. run the remaining batches with bounded concurrency, each running
///    Extract, applying actions, syncing MOCs, and patching now.md;
/// 6. flush state after each batch and write the completion sentinel.
#[allow(clippy::too_many_arguments)]
pub async fn run_bootstrap(
    registry: Arc<Registry>,
    root: &Path,
    llm: Arc<dyn LlmClient>,
    search_tool: Option<Arc<dyn MemorySearchTool>>,
    sources: BootstrapSources,
    sqlite_reader: Option<&dyn SqliteMemorySource>,
    config: &BootstrapConfig,
    observer_config: Arc<ObserverConfig>,
    retrieval_config: Arc<RetrievalConfig>,
    merge_config: Arc<MergeConfig>,
    force: bool,
) -> OmgResult<BootstrapSummary> {
    if !force {
        if let Some(sentinel) = load_completion_sentinel(root)? {
            info!(total = sentinel.total, ok = sentinel.ok, fail = sentinel.fail, "bootstrap already completed, skipping");
            return Ok(BootstrapSummary { ran: false, total: sentinel.total, ok: sentinel.ok, fail: sentinel.fail });
        }
    }

    let Some(lock) = BootstrapLock::try_acquire(root)? else {
        info!(root = %root.display(), "bootstrap lock held by another process, failing open");
        return Ok(BootstrapSummary { ran: false, total: 0, ok: 0, fail: 0 });
    };

    let entries = gather_entries(&sources, sqlite_reader)?;
    let chunks = entries_to_chunks(&entries, config.chunk_char_budget);
    let batches = pack_batches(chunks, config.batch_char_budget);

    let mut state = load_state(root)?;
    if state.total != batches.len() {
        state = BootstrapState::new(batches.len());
    }
    save_state(root, &state)?;

    let remaining: Vec<usize> = state.remaining();
    if remaining.is_empty() {
        let sentinel = CompletionSentinel { total: state.total, ok: state.ok, fail: state.fail, finished_at: Utc::now() };
        save_completion_sentinel(root, &sentinel)?;
        return Ok(BootstrapSummary { ran: true, total: state.total, ok: state.ok, fail: state.fail });
    }

    let semaphore = Arc::new(Semaphore::new(config.concurrency.max(1)));
    let mut handles = Vec::with_capacity(remaining.len());

    for index in remaining {
        let batch = batches[index].clone();
        let registry = Arc::clone(&registry);
        let llm = Arc::clone(&llm);
        let search_tool = search_tool.clone();
        let root = root.to_path_buf();
        let observer_config = Arc::clone(&observer_config);
        let retrieval_config = Arc::clone(&retrieval_config);
        let merge_config = Arc::clone(&merge_config);
        let semaphore = Arc::clone(&semaphore);

        handles.push(tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await.expect("semaphore never closed");
            tokio::task::spawn_blocking(move || {
                run_one_batch(&registry, &root, llm.as_ref(), search_tool.as_deref(), &batch, &observer_config, &retrieval_config, &merge_config)
            })
            .await
            .expect("batch worker thread panicked")
        }));
    }

    for handle in handles {
        let (index, outcome) = handle.await.expect("batch task panicked");
        match outcome {
            Ok(()) => state.mark_done(index, true),
            Err(entry) => {
                warn!(index, error_type = entry.error_type.as_str(), reason = %entry.reason, "bootstrap batch failed");
                append_failure(root, entry)?;
                state.mark_done(index, false);
            }
        }
        save_state(root, &state)?;
        lock.refresh()?;
    }

    let sentinel = CompletionSentinel { total: state.total, ok: state.ok, fail: state.fail, finished_at: Utc::now() };
    save_completion_sentinel(root, &sentinel)?;

    Ok(BootstrapSummary { ran: true, total: state.total, ok: state.ok, fail: state.fail })
}

fn entries_to_chunks(entries: &[SourceEntry], chunk_char_budget: usize) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    for entry in entries {
        for text in chunk_text(&entry.text, chunk_char_budget) {
            chunks.push(Chunk { origin: entry.origin.clone(), text });
        }
    }
    chunks
}

/// Run Extract/Merge over one batch's chunks, then sync MOCs and the
/// now-node for whatever got written. Returns the batch index so the
/// caller can reassemble results out of a concurrent `JoinSet`-style
/// dispatch, and a [`FailureEntry`] rather than an error on any of the
/// four tolerated failure modes (spec.md §4.11 step 5).
fn run_one_batch(
    registry: &Registry,
    root: &Path,
    llm: &dyn LlmClient,
    search_tool: Option<&dyn MemorySearchTool>,
    batch: &Batch,
    observer_config: &ObserverConfig,
    retrieval_config: &RetrievalConfig,
    merge_config: &MergeConfig,
) -> (usize, Result<(), FailureEntry>) {
    let messages: Vec<&str> = batch.chunks.iter().map(|c| c.text.as_str()).collect();

    let outcome = observe_turn(
        registry,
        root,
        llm,
        search_tool,
        &messages,
        None,
        None,
        &[],
        &[],
        observer_config,
        retrieval_config,
        merge_config,
        batch.max_tokens,
    );

    let outcome: ObservationOutcome = match outcome {
        Ok(outcome) => outcome,
        Err(e) => {
            return (
                batch.index,
                Err(failure(batch.index, BootstrapErrorType::LlmError, e.to_string())),
            )
        }
    };

    if let Some(reason) = &outcome.extract.xml_error {
        if outcome.extract.operations.is_empty() {
            return (batch.index, Err(failure(batch.index, BootstrapErrorType::ParseEmpty, reason.clone())));
        }
    }
    if outcome.extract.operations.is_empty() {
        return (
            batch.index,
            Err(failure(batch.index, BootstrapErrorType::ZeroOperations, "extract produced no accepted operations".into())),
        );
    }
    if outcome.applied.is_empty() {
        return (
            batch.index,
            Err(failure(batch.index, BootstrapErrorType::WriteAllFailed, "no operation was applied".into())),
        );
    }

    if let Err(e) = sync_mocs_for_operations(registry, root, &outcome.extract.operations, &outcome.applied) {
        warn!(index = batch.index, error = %e, "moc sync failed for batch, nodes were still written");
    }
    if let Some(patch) = &outcome.now_patch {
        if let Err(e) = apply_now_patch(registry, root, patch) {
            warn!(index = batch.index, error = %e, "now-node patch failed for batch, nodes were still written");
        }
    }

    (batch.index, Ok(()))
}

fn failure(index: usize, error_type: BootstrapErrorType, reason: String) -> FailureEntry {
    FailureEntry { batch_index: index, error_type, reason, recorded_at: Utc::now() }
}

fn append_failure(root: &Path, entry: FailureEntry) -> OmgResult<()> {
    let mut entries = read_failure_log(root)?;
    entries.retain(|e| e.batch_index != entry.batch_index);
    entries.push(entry);
    rewrite_failure_log(root, &entries)
}

/// Retry previously-failed batches (spec.md §4.11 "Retry mode"): read the
/// failure log, keep only entries matching `error_types` (or all, if
/// empty) and/or `batch_indices` (or all, if empty), and re-run just
/// those batches through an LLM client built by `llm_factory` (which may
/// apply a different timeout). Entries that are *not* selected for retry
/// are preserved in the rewritten log; entries that succeed are dropped.
#[allow(clippy::too_many_arguments)]
pub async fn retry_failed_batches(
    registry: Arc<Registry>,
    root: &Path,
    llm_factory: impl Fn() -> Arc<dyn LlmClient>,
    search_tool: Option<Arc<dyn MemorySearchTool>>,
    sources: BootstrapSources,
    sqlite_reader: Option<&dyn SqliteMemorySource>,
    config: &BootstrapConfig,
    observer_config: Arc<ObserverConfig>,
    retrieval_config: Arc<RetrievalConfig>,
    merge_config: Arc<MergeConfig>,
    error_types: &[BootstrapErrorType],
    batch_indices: &[usize],
) -> OmgResult<BootstrapSummary> {
    let failures = read_failure_log(root)?;
    let (to_retry, to_keep): (Vec<_>, Vec<_>) = failures.into_iter().partition(|f| {
        let type_matches = error_types.is_empty() || error_types.contains(&f.error_type);
        let index_matches = batch_indices.is_empty() || batch_indices.contains(&f.batch_index);
        type_matches && index_matches
    });

    if to_retry.is_empty() {
        return Ok(BootstrapSummary { ran: false, total: 0, ok: 0, fail: 0 });
    }

    let entries = gather_entries(&sources, sqlite_reader)?;
    let chunks = entries_to_chunks(&entries, config.chunk_char_budget);
    let batches = pack_batches(chunks, config.batch_char_budget);

    let mut state = load_state(root)?;
    let mut still_failed = to_keep;
    let mut ok = 0usize;
    let mut fail = 0usize;

    for failed in &to_retry {
        let Some(batch) = batches.get(failed.batch_index) else {
            warn!(index = failed.batch_index, "retry target batch no longer exists (source set changed), dropping");
            continue;
        };
        let llm = llm_factory();
        let (index, outcome) = run_one_batch(
            &registry,
            root,
            llm.as_ref(),
            search_tool.as_deref(),
            batch,
            &observer_config,
            &retrieval_config,
            &merge_config,
        );
        match outcome {
            Ok(()) => {
                ok += 1;
                state.mark_done(index, true);
            }
            Err(entry) => {
                fail += 1;
                still_failed.push(entry);
                state.mark_done(index, false);
            }
        }
    }

    rewrite_failure_log(root, &still_failed)?;
    save_state(root, &state)?;

    Ok(BootstrapSummary { ran: true, total: to_retry.len(), ok, fail })
}
