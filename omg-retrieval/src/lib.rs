//! # omg-retrieval
//!
//! Hybrid local+semantic merge-target finder used by the observer's
//! Merge phase (spec.md §4.6).

mod candidate;
mod finder;
mod local_pass;
mod semantic_pass;

pub use candidate::MergeCandidate;
pub use finder::{find_merge_targets, MergeTarget, RetrievalTuning};
pub use local_pass::{local_pass, LocalHit};
pub use semantic_pass::{semantic_pass, SemanticHit};
