use std::path::PathBuf;
use std::sync::Arc;

use omg_bootstrap::{run_bootstrap, BootstrapSources, SqliteMemorySource};
use omg_core::config::OmgConfig;
use omg_core::traits::{CronHandler, LlmClient, MemorySearchTool};
use omg_reflector::run_reflection;
use omg_registry::Registry;
use omg_scaffold::{audit_broken_links, audit_duplicate_descriptions};
use omg_workspace::CronHandlers;

/// Everything the three standing cron jobs need captured out of a live
/// engine so their closures can be `'static` (spec.md §4.13).
pub struct CronContext {
    pub registry: Arc<Registry>,
    pub root: PathBuf,
    pub llm: Arc<dyn LlmClient>,
    pub search_tool: Option<Arc<dyn MemorySearchTool>>,
    pub bootstrap_sources: BootstrapSources,
    pub sqlite_reader: Option<Arc<dyn SqliteMemorySource>>,
    pub config: Arc<OmgConfig>,
}

fn run_maintenance(registry: &Registry) {
    match audit_broken_links(registry) {
        Ok(broken) => {
            for link in &broken {
                tracing::warn!(source_id = %link.source_id, target_id = %link.target_id, "broken wikilink (reported, not repaired)");
            }
        }
        Err(e) => tracing::error!(error = %e, "broken-link audit failed"),
    }

    match audit_duplicate_descriptions(registry, 0.85) {
        Ok(pairs) => {
            for pair in &pairs {
                tracing::warn!(id_a = %pair.id_a, id_b = %pair.id_b, similarity = pair.similarity, "duplicate-description pair detected");
            }
        }
        Err(e) => tracing::error!(error = %e, "duplicate-description audit failed"),
    }
}

/// Build the three cron handlers (spec.md §4.13):
/// - `omg-bootstrap`: run bootstrap, then maintenance once it completes.
/// - `omg-reflection`: report duplicate descriptions, then reflect over
///   aged non-archived non-reflection entries.
/// - `omg-maintenance`: broken-link + duplicate-description audit.
///
/// Handlers never throw (spec.md §6 "Handlers never throw") — every
/// internal failure is caught and logged here, nothing propagates to the
/// host's scheduler.
pub fn build_cron_handlers(ctx: Arc<CronContext>) -> CronHandlers {
    let bootstrap_handler: CronHandler = {
        let ctx = Arc::clone(&ctx);
        Box::new(move || {
            let rt = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
                Ok(rt) => rt,
                Err(e) => {
                    tracing::error!(error = %e, "failed to build tokio runtime for omg-bootstrap cron");
                    return;
                }
            };

            let result = rt.block_on(run_bootstrap(
                Arc::clone(&ctx.registry),
                &ctx.root,
                Arc::clone(&ctx.llm),
                ctx.search_tool.clone(),
                ctx.bootstrap_sources.clone(),
                ctx.sqlite_reader.as_deref(),
                &ctx.config.bootstrap,
                Arc::new(ctx.config.observer.clone()),
                Arc::new(ctx.config.retrieval.clone()),
                Arc::new(ctx.config.merge.clone()),
                false,
            ));

            match result {
                Ok(summary) => {
                    tracing::info!(ran = summary.ran, ok = summary.ok, fail = summary.fail, total = summary.total, "omg-bootstrap cron completed");
                    if summary.ran {
                        run_maintenance(&ctx.registry);
                    }
                }
                Err(e) => tracing::error!(error = %e, "omg-bootstrap cron failed"),
            }
        })
    };

    let reflection_handler: CronHandler = {
        let ctx = Arc::clone(&ctx);
        Box::new(move || {
            match audit_duplicate_descriptions(&ctx.registry, ctx.config.observer.candidate_suppression_threshold) {
                Ok(pairs) => {
                    for pair in &pairs {
                        tracing::warn!(id_a = %pair.id_a, id_b = %pair.id_b, similarity = pair.similarity, "duplicate descriptions detected ahead of nightly reflection");
                    }
                }
                Err(e) => tracing::error!(error = %e, "pre-reflection dedup audit failed"),
            }

            match run_reflection(&ctx.registry, &ctx.root, ctx.llm.as_ref(), &ctx.config.reflector, None) {
                Ok(summary) => tracing::info!(
                    attempted = summary.attempted,
                    level = summary.compression_level,
                    archived = summary.archived_count,
                    "omg-reflection cron completed"
                ),
                Err(e) => tracing::error!(error = %e, "omg-reflection cron failed"),
            }
        })
    };

    let maintenance_handler: CronHandler = {
        let ctx = Arc::clone(&ctx);
        Box::new(move || run_maintenance(&ctx.registry))
    };

    CronHandlers { bootstrap: bootstrap_handler, reflection: reflection_handler, maintenance: maintenance_handler }
}

#[cfg(test)]
mod tests {
    use super::*;
    use omg_core::errors::{OmgError, OmgResult};
    use omg_core::traits::LlmResponse;
    use omg_scaffold::scaffold_graph_root;
    use tempfile::tempdir;

    struct FailingLlm;
    impl LlmClient for FailingLlm {
        fn generate(&self, _system: &str, _user: &str, _max_tokens: usize) -> OmgResult<LlmResponse> {
            Err(OmgError::LlmFailed { label: "test".into(), reason: "boom".into() })
        }
    }

    #[test]
    fn maintenance_handler_never_panics_on_empty_registry() {
        let dir = tempdir().unwrap();
        let registry = Arc::new(Registry::new(dir.path()));
        scaffold_graph_root(&registry, dir.path()).unwrap();

        let ctx = Arc::new(CronContext {
            registry: Arc::clone(&registry),
            root: dir.path().to_path_buf(),
            llm: Arc::new(FailingLlm),
            search_tool: None,
            bootstrap_sources: BootstrapSources::default(),
            sqlite_reader: None,
            config: Arc::new(OmgConfig::default()),
        });

        let handlers = build_cron_handlers(ctx);
        (handlers.maintenance)();
        (handlers.reflection)();
    }

    #[test]
    fn bootstrap_handler_survives_an_llm_failure() {
        let dir = tempdir().unwrap();
        let registry = Arc::new(Registry::new(dir.path()));
        scaffold_graph_root(&registry, dir.path()).unwrap();

        let ctx = Arc::new(CronContext {
            registry,
            root: dir.path().to_path_buf(),
            llm: Arc::new(FailingLlm),
            search_tool: None,
            bootstrap_sources: BootstrapSources::default(),
            sqlite_reader: None,
            config: Arc::new(OmgConfig::default()),
        });

        let handlers = build_cron_handlers(ctx);
        (handlers.bootstrap)();
    }
}
