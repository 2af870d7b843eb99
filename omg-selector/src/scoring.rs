use chrono::{DateTime, Utc};

use omg_core::model::RegistryEntry;

use crate::keywords::tag_prefix_matches;

/// `Recency: max(0.5, 1 − ageDays × 0.02)`, same formula used by graph
/// traversal scoring (spec.md §4.2, reused unmodified by §4.8).
pub fn recency_factor(updated: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let age_days = (now - updated).num_milliseconds() as f64 / 86_400_000.0;
    if age_days < 0.0 {
        return 1.0;
    }
    (1.0 - age_days * 0.02).max(0.5)
}

/// Keyword match weight against an entry's description/canonicalKey
/// (substring) and tags (adaptive-prefix match, spec.md §4.8). An empty
/// keyword set always matches with weight `1.0`.
pub fn keyword_match(keywords: &[String], entry: &RegistryEntry) -> f64 {
    if keywords.is_empty() {
        return 1.0;
    }
    let description = entry.description.to_lowercase();
    let canonical_key = entry.canonical_key.as_deref().unwrap_or("").to_lowercase();
    let mut matches = 0usize;
    for kw in keywords {
        let substring_hit = description.contains(kw.as_str()) || canonical_key.contains(kw.as_str());
        let tag_hit = entry.tags.iter().any(|tag| tag_prefix_matches(kw, tag));
        if substring_hit || tag_hit {
            matches += 1;
        }
    }
    1.0 + 0.5 * matches as f64
}

/// Metadata-only pass-1 score: `keywordMatch × priorityWeight × recencyFactor`.
pub fn pass1_score(keywords: &[String], entry: &RegistryEntry, now: DateTime<Utc>) -> f64 {
    keyword_match(keywords, entry) * entry.priority.weight() * recency_factor(entry.updated, now)
}

/// Pass-2 re-score: the same formula, but `keywordMatch` also searches
/// the hydrated body text, so a node whose metadata looked irrelevant
/// but whose body actually discusses the prompt still ranks up.
pub fn pass2_score(keywords: &[String], entry: &RegistryEntry, body: &str, now: DateTime<Utc>) -> f64 {
    if keywords.is_empty() {
        return entry.priority.weight() * recency_factor(entry.updated, now);
    }
    let body_lower = body.to_lowercase();
    let body_matches = keywords.iter().filter(|kw| body_lower.contains(kw.as_str())).count();
    let metadata_match = keyword_match(keywords, entry);
    let body_bonus = 0.25 * body_matches as f64;
    (metadata_match + body_bonus) * entry.priority.weight() * recency_factor(entry.updated, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use omg_core::model::{Kind, NodeType, Priority};

    fn entry() -> RegistryEntry {
        RegistryEntry {
            node_type: NodeType::Fact,
            kind: Kind::Observation,
            description: "prefers dark mode editors".into(),
            priority: Priority::Medium,
            created: Utc::now(),
            updated: Utc::now(),
            file_path: "x.md".into(),
            archived: false,
            links: vec![],
            tags: vec!["editor".into()],
            canonical_key: Some("preferences.editor_theme".into()),
        }
    }

    #[test]
    fn empty_keywords_match_with_weight_one() {
        assert_eq!(keyword_match(&[], &entry()), 1.0);
    }

    #[test]
    fn description_substring_counts_as_match() {
        let kws = vec!["dark".to_string()];
        assert_eq!(keyword_match(&kws, &entry()), 1.5);
    }

    #[test]
    fn tag_prefix_counts_as_match() {
        let kws = vec!["editors".to_string()];
        assert_eq!(keyword_match(&kws, &entry()), 1.5);
    }

    #[test]
    fn recency_floors_at_half() {
        let now = Utc::now();
        let old = now - Duration::days(1000);
        assert_eq!(recency_factor(old, now), 0.5);
    }

    #[test]
    fn body_matches_add_a_bonus_over_metadata_only() {
        let now = Utc::now();
        let kws = vec!["kubernetes".to_string()];
        let meta_only = pass1_score(&kws, &entry(), now);
        let with_body = pass2_score(&kws, &entry(), "we migrated the kubernetes cluster last week", now);
        assert!(with_body > meta_only);
    }
}
