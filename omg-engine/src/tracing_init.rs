//! Optional standalone `tracing-subscriber` initializer (spec.md §4.14),
//! gated behind the `tracing-init` feature. A host that already manages
//! its own subscriber should never call this; it exists for standalone
//! binaries and tests embedding OMG without a surrounding application.

use tracing_subscriber::EnvFilter;

/// Initialize a process-global JSON subscriber reading level filters from
/// `RUST_LOG` (default `info`). Safe to call at most once per process;
/// a second call is a no-op (the underlying `set_global_default` error is
/// swallowed, matching the "never throw" posture of everything else this
/// crate exposes to a host).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt().json().with_env_filter(filter).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
