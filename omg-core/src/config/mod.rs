//! Per-subsystem, serde-`default`-backed configuration structs,
//! aggregated into [`OmgConfig`]. Mirrors the teacher's
//! `cortex_core::config::{ConsolidationConfig, DecayConfig,
//! MultiAgentConfig}` pattern: one struct per subsystem, named constants
//! in [`defaults`], everything `Deserialize`-able from host-supplied TOML.
//! The crate never reads a config file itself — "config parsing" stays a
//! host concern (spec.md §1 Non-goals) — it only owns the typed shape and
//! its defaults.

mod bootstrap_config;
mod graph_config;
mod merge_config;
mod observer_config;
mod reflector_config;
mod retrieval_config;
mod selector_config;
mod session_config;

pub mod defaults;

pub use bootstrap_config::BootstrapConfig;
pub use graph_config::GraphConfig;
pub use merge_config::MergeConfig;
pub use observer_config::ObserverConfig;
pub use reflector_config::ReflectorConfig;
pub use retrieval_config::RetrievalConfig;
pub use selector_config::SelectorConfig;
pub use session_config::{SessionConfig, TriggerMode};

use serde::{Deserialize, Serialize};

/// Root configuration aggregate. A host embedding OMG may deserialize
/// this from its own config file and pass it in; everything has a
/// sensible default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OmgConfig {
    pub observer: ObserverConfig,
    pub merge: MergeConfig,
    pub retrieval: RetrievalConfig,
    pub selector: SelectorConfig,
    pub session: SessionConfig,
    pub bootstrap: BootstrapConfig,
    pub reflector: ReflectorConfig,
    pub graph: GraphConfig,
}
