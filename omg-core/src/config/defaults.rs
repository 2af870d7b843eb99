//! Named default constants for every tunable threshold and budget in
//! [`super::OmgConfig`]. Grouped by the subsystem that owns them, mirroring
//! the teacher's `cortex_core::config::defaults` layout.

// --- Observer / guardrails (spec.md §4.4, §4.10) ---
pub const DEFAULT_MERGE_THRESHOLD: f64 = 0.72;
pub const DEFAULT_SKIP_OVERLAP_THRESHOLD: f64 = 0.9;
pub const DEFAULT_TRUNCATE_OVERLAP_THRESHOLD: f64 = 0.6;
pub const DEFAULT_CANDIDATE_SUPPRESSION_THRESHOLD: f64 = 0.85;
pub const DEFAULT_TRUNCATION_RATIO: f64 = 0.95;
pub const DEFAULT_RECENT_WINDOW_SIZE: usize = 20;

// --- Retrieval (spec.md §4.6) ---
pub const DEFAULT_LOCAL_TOP_M: usize = 50;
pub const DEFAULT_SEMANTIC_TOP_S: usize = 20;
pub const DEFAULT_RETRIEVAL_TOP_K: usize = 5;
pub const DEFAULT_LOCAL_WEIGHT: f64 = 0.6;
pub const DEFAULT_SEMANTIC_WEIGHT: f64 = 0.4;

// --- Graph traversal (spec.md §4.2) ---
pub const DEFAULT_TRAVERSAL_MAX_DEPTH: usize = 2;
pub const DEFAULT_SUBGRAPH_MAX_NODES: usize = 200;

// --- Selector (spec.md §4.8) ---
pub const DEFAULT_MAX_CONTEXT_TOKENS: usize = 6000;
pub const DEFAULT_MAX_MOCS: usize = 5;
pub const DEFAULT_MAX_NODES: usize = 30;
pub const DEFAULT_PASS1_REGULAR_CANDIDATES: usize = 200;

// --- Session (spec.md §4.9) ---
pub const DEFAULT_MESSAGE_TOKEN_THRESHOLD: u64 = 2000;
pub const DEFAULT_OBSERVATION_TOKEN_THRESHOLD: u64 = 20_000;

// --- Bootstrap (spec.md §4.11) ---
pub const DEFAULT_BATCH_CHAR_BUDGET: usize = 30_000;
pub const DEFAULT_CHUNK_CHAR_BUDGET: usize = 4_000;
pub const DEFAULT_BOOTSTRAP_CONCURRENCY: usize = 3;
pub const DEFAULT_LOCK_TTL_SECS: u64 = 120;
pub const DEFAULT_STATE_FLUSH_DEBOUNCE_MS: u64 = 500;

// --- Reflector (spec.md §4.12) ---
pub const DEFAULT_REFLECTION_AGE_DAYS: i64 = 7;
pub const DEFAULT_REFLECTION_CONTEXT_TOKEN_THRESHOLD: usize = 1200;
pub const DEFAULT_MAX_COMPRESSION_LEVEL: u8 = 3;
