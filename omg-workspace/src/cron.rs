use omg_core::traits::{CronHandler, CronScheduler};

/// Cron job ids (spec.md §4.13). Registering with the same id replaces
/// the prior registration per the host's `scheduleCron` contract
/// (spec.md §6), so re-running [`register_default_crons`] on every
/// `before_agent_start` is safe and idempotent.
pub const CRON_BOOTSTRAP_ID: &str = "omg-bootstrap";
pub const CRON_REFLECTION_ID: &str = "omg-reflection";
pub const CRON_MAINTENANCE_ID: &str = "omg-maintenance";

/// Every 5 minutes (spec.md §4.13 "omg-bootstrap (every 5 min by
/// default; triggers maintenance on completion)").
pub const CRON_BOOTSTRAP_EXPR: &str = "*/5 * * * *";
/// Nightly at 02:00 (spec.md §4.13 "omg-reflection (nightly; dedup then
/// reflect over non-archived non-reflection entries older than 7
/// days)").
pub const CRON_REFLECTION_EXPR: &str = "0 2 * * *";
/// Weekly, Sunday 03:00 (spec.md §4.13 "omg-maintenance (weekly;
/// broken-link + duplicate-description audit)").
pub const CRON_MAINTENANCE_EXPR: &str = "0 3 * * 0";

/// The three handlers `omg-engine` wires up, grouped so a caller cannot
/// register them out of order or forget one.
pub struct CronHandlers {
    pub bootstrap: CronHandler,
    pub reflection: CronHandler,
    pub maintenance: CronHandler,
}

/// Register the three default cron jobs against the host's scheduler
/// (spec.md §4.13, §6). Handlers themselves must never throw (spec.md
/// §7) — that contract is enforced by the caller that builds each
/// [`CronHandler`] closure (`omg-engine`), not here.
pub fn register_default_crons(scheduler: &dyn CronScheduler, handlers: CronHandlers) {
    scheduler.schedule_cron(CRON_BOOTSTRAP_ID, CRON_BOOTSTRAP_EXPR, handlers.bootstrap);
    scheduler.schedule_cron(CRON_REFLECTION_ID, CRON_REFLECTION_EXPR, handlers.reflection);
    scheduler.schedule_cron(CRON_MAINTENANCE_ID, CRON_MAINTENANCE_EXPR, handlers.maintenance);
}
