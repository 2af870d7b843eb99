use std::collections::HashSet;

use omg_core::constants::NGRAM_SIZE;

/// Character n-grams of a lowercased string (spec.md §4.3: "Jaccard over
/// 3-character n-grams"). Strings shorter than `n` produce a single
/// n-gram over the whole string.
pub fn ngrams(text: &str, n: usize) -> HashSet<String> {
    let chars: Vec<char> = text.to_lowercase().chars().collect();
    if chars.is_empty() {
        return HashSet::new();
    }
    if chars.len() < n {
        return std::iter::once(chars.into_iter().collect()).collect();
    }
    (0..=chars.len() - n).map(|i| chars[i..i + n].iter().collect()).collect()
}

/// Jaccard overlap between two sets: `|A ∩ B| / |A ∪ B|`. Two empty sets
/// are considered identical (`1.0`).
pub fn jaccard<T: std::hash::Hash + Eq>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

/// `3-gram` Jaccard similarity between two strings.
pub fn ngram_similarity(a: &str, b: &str) -> f64 {
    jaccard(&ngrams(a, NGRAM_SIZE), &ngrams(b, NGRAM_SIZE))
}
