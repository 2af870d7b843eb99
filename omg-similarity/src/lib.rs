//! # omg-similarity
//!
//! Text similarity (edit distance + n-gram Jaccard) and shingle-based
//! fingerprinting used by the observer's extraction guardrails and by
//! retrieval's local merge-target pass (spec.md §4.3).

mod edit_distance;
mod fingerprint;
mod ngram;
mod text_similarity;
mod tokenize;

pub use edit_distance::{levenshtein, normalized_edit_similarity};
pub use fingerprint::{compute_overlap, fingerprint, Fingerprint};
pub use ngram::{jaccard, ngram_similarity, ngrams};
pub use text_similarity::{combined_similarity, key_prefix, text_similarity};
pub use tokenize::tokenize;
