//! Keyword extraction for context-selector scoring (spec.md §4.8):
//! "lowercase, split on non-alphanumeric Unicode; keep words > 3 chars
//! not in a fixed English stopword set."

const STOPWORDS: &[&str] = &[
    "this", "that", "these", "those", "with", "from", "have", "has", "had",
    "will", "would", "could", "should", "about", "into", "onto", "your",
    "their", "there", "then", "than", "when", "where", "which", "what",
    "while", "been", "being", "were", "does", "doing", "done", "just",
    "only", "also", "very", "much", "many", "some", "such", "over",
    "under", "again", "further", "once", "here", "both", "each", "more",
    "most", "other", "same", "they", "them", "because", "before", "after",
    "during", "above", "below", "between", "through", "against", "without",
    "within", "around", "still", "even", "ever", "never", "always", "every",
];

/// Extract scoring keywords from free-form text.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            current.extend(ch.to_lowercase());
        } else if !current.is_empty() {
            push_if_keyword(&mut words, std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        push_if_keyword(&mut words, current);
    }
    words
}

fn push_if_keyword(out: &mut Vec<String>, word: String) {
    if word.chars().count() > 3 && !STOPWORDS.contains(&word.as_str()) {
        out.push(word);
    }
}

/// Adaptive prefix length for tag matching: `max(3, floor(min(kw, tag) *
/// 0.75))` (spec.md §4.8), so inflected forms ("project"/"projects") and
/// truncated tags still match.
pub fn adaptive_prefix_len(kw_len: usize, tag_len: usize) -> usize {
    let min_len = kw_len.min(tag_len);
    (3usize).max(((min_len as f64) * 0.75).floor() as usize)
}

/// Whether `keyword` and `tag` share an adaptive-length prefix.
pub fn tag_prefix_matches(keyword: &str, tag: &str) -> bool {
    let plen = adaptive_prefix_len(keyword.chars().count(), tag.chars().count());
    let kw_prefix: String = keyword.chars().take(plen).collect();
    let tag_prefix: String = tag.chars().take(plen).collect();
    !kw_prefix.is_empty() && kw_prefix == tag_prefix
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_words_over_three_chars_excluding_stopwords() {
        let kws = extract_keywords("I prefer dark mode for my editor, but not this theme!");
        assert!(kws.contains(&"prefer".to_string()));
        assert!(kws.contains(&"dark".to_string()));
        assert!(kws.contains(&"mode".to_string()));
        assert!(kws.contains(&"editor".to_string()));
        assert!(kws.contains(&"theme".to_string()));
        assert!(!kws.contains(&"this".to_string()));
        assert!(!kws.contains(&"for".to_string()));
    }

    #[test]
    fn adaptive_prefix_handles_inflection() {
        assert!(tag_prefix_matches("project", "projects"));
        assert!(tag_prefix_matches("editor", "editors"));
        assert!(!tag_prefix_matches("project", "product"));
    }

    #[test]
    fn prefix_length_floors_at_three() {
        assert_eq!(adaptive_prefix_len(3, 3), 3);
        assert_eq!(adaptive_prefix_len(4, 4), 3);
    }
}
