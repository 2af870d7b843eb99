//! # omg-workspace
//!
//! Cron job definitions and the persistent multi-workspace registry
//! (spec.md §4.13): a process-wide record of every workspace this host
//! has ever seen, serialized through a write queue so concurrent adds
//! never clobber one another, plus the three standing cron jobs
//! (`omg-bootstrap`, `omg-reflection`, `omg-maintenance`) the host's
//! scheduler is asked to register.

mod cron;
mod entry;
mod store;

pub use cron::{
    register_default_crons, CronHandlers, CRON_BOOTSTRAP_EXPR, CRON_BOOTSTRAP_ID,
    CRON_MAINTENANCE_EXPR, CRON_MAINTENANCE_ID, CRON_REFLECTION_EXPR, CRON_REFLECTION_ID,
};
pub use entry::WorkspaceEntry;
pub use store::{WorkspaceRegistryFile, WorkspaceRegistryStore};
