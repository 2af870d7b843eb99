//! # omg-registry
//!
//! In-memory, persisted metadata cache over every node in a workspace
//! (spec.md §4.1). The registry is authoritative for traversal,
//! selection, and merge targeting, and may be rebuilt at any time from
//! the on-disk node set.

mod entry_filter;
mod patch;
mod registry;
mod scan;

pub use entry_filter::EntryFilter;
pub use patch::EntryPatch;
pub use registry::Registry;
pub use scan::scan_graph_root;
