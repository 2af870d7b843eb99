use std::collections::HashSet;

use omg_core::constants::SHINGLE_WINDOW;

use crate::ngram::jaccard;
use crate::tokenize::tokenize;

/// A duplicate-suppression guardrail fingerprint: a set of 32-bit shingle
/// hashes over a message window (spec.md §4.3).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fingerprint(pub HashSet<u32>);

/// djb2-style 32-bit hash (spec.md §4.3: "emit the set of 5-word shingle
/// hashes using a djb2-style 32-bit hash").
fn djb2(s: &str) -> u32 {
    let mut hash: u32 = 5381;
    for b in s.bytes() {
        hash = hash.wrapping_mul(33).wrapping_add(b as u32);
    }
    hash
}

/// Build a fingerprint over the concatenation of `messages`: tokenize,
/// then emit one hash per `SHINGLE_WINDOW`-word window. Content with
/// fewer than `SHINGLE_WINDOW` words becomes a single shingle over the
/// whole content (spec.md §4.3).
pub fn fingerprint(messages: &[&str]) -> Fingerprint {
    let combined = messages.join(" ");
    let tokens = tokenize(&combined);
    if tokens.is_empty() {
        return Fingerprint(HashSet::new());
    }
    if tokens.len() < SHINGLE_WINDOW {
        return Fingerprint(HashSet::from([djb2(&tokens.join(" "))]));
    }
    let mut shingles = HashSet::new();
    for window in tokens.windows(SHINGLE_WINDOW) {
        shingles.insert(djb2(&window.join(" ")));
    }
    Fingerprint(shingles)
}

/// Jaccard overlap between two fingerprints (spec.md §4.3:
/// "computeOverlap(a,b) = Jaccard of shingle sets").
pub fn compute_overlap(a: &Fingerprint, b: &Fingerprint) -> f64 {
    jaccard(&a.0, &b.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_content_overlaps_fully() {
        let a = fingerprint(&["I prefer dark mode for my editor windows please"]);
        let b = fingerprint(&["I prefer dark mode for my editor windows please"]);
        assert_eq!(compute_overlap(&a, &b), 1.0);
    }

    #[test]
    fn short_content_uses_single_shingle() {
        let fp = fingerprint(&["dark mode"]);
        assert_eq!(fp.0.len(), 1);
    }

    #[test]
    fn empty_content_has_empty_fingerprint() {
        let fp = fingerprint(&[""]);
        assert!(fp.0.is_empty());
    }

    #[test]
    fn unrelated_content_has_low_overlap() {
        let a = fingerprint(&["I prefer dark mode for my editor windows please"]);
        let b = fingerprint(&["The quarterly roadmap review happens every other Tuesday"]);
        assert!(compute_overlap(&a, &b) < 0.2);
    }
}
