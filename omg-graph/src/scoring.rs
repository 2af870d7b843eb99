use chrono::{DateTime, Utc};

use omg_core::model::RegistryEntry;

/// `distanceDecay` from spec.md §4.2: `{1: 1.0, 2: 0.6}`.
pub fn distance_decay(depth: usize) -> f64 {
    match depth {
        1 => 1.0,
        2 => 0.6,
        _ => 0.6_f64.powi(depth as i32 - 1),
    }
}

/// `Recency: max(0.5, 1 − ageDays × 0.02)`.
pub fn recency_factor(updated: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let age_days = (now - updated).num_milliseconds() as f64 / 86_400_000.0;
    if age_days < 0.0 {
        return 1.0_f64.max(0.5);
    }
    (1.0 - age_days * 0.02).max(0.5)
}

/// `KeywordMatch: 1 + 0.5 × #matches` over description+tags+canonicalKey;
/// an empty keyword set always matches with weight `1.0`.
pub fn keyword_match(keywords: &[String], entry: &RegistryEntry) -> f64 {
    if keywords.is_empty() {
        return 1.0;
    }
    let haystack = format!(
        "{} {} {}",
        entry.description.to_lowercase(),
        entry.tags.join(" ").to_lowercase(),
        entry.canonical_key.as_deref().unwrap_or("").to_lowercase()
    );
    let matches = keywords.iter().filter(|kw| haystack.contains(&kw.to_lowercase())).count();
    1.0 + 0.5 * matches as f64
}

/// Full neighbor score: `keywordMatch × priorityWeight × recencyFactor ×
/// distanceDecay` (spec.md §4.2).
pub fn neighbor_score(entry: &RegistryEntry, depth: usize, keywords: &[String], now: DateTime<Utc>) -> f64 {
    keyword_match(keywords, entry) * entry.priority.weight() * recency_factor(entry.updated, now) * distance_decay(depth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use omg_core::model::{Kind, NodeType, Priority};

    fn entry(priority: Priority, updated: DateTime<Utc>) -> RegistryEntry {
        RegistryEntry {
            node_type: NodeType::Fact,
            kind: Kind::Observation,
            description: "editor theme preference".into(),
            priority,
            created: updated,
            updated,
            file_path: "x.md".into(),
            archived: false,
            links: vec![],
            tags: vec!["editor".into()],
            canonical_key: Some("preferences.editor_theme".into()),
        }
    }

    #[test]
    fn high_priority_outranks_low_priority_at_same_distance() {
        let now = Utc::now();
        let high = neighbor_score(&entry(Priority::High, now), 1, &[], now);
        let low = neighbor_score(&entry(Priority::Low, now), 1, &[], now);
        assert!(high > low);
    }

    #[test]
    fn distance_one_outranks_distance_two_otherwise_equal() {
        let now = Utc::now();
        let e = entry(Priority::Medium, now);
        let d1 = neighbor_score(&e, 1, &[], now);
        let d2 = neighbor_score(&e, 2, &[], now);
        assert!(d1 > d2);
    }

    #[test]
    fn empty_keyword_set_matches_with_weight_one() {
        let now = Utc::now();
        let e = entry(Priority::Medium, now);
        assert_eq!(keyword_match(&[], &e), 1.0);
    }

    #[test]
    fn recency_floors_at_half_for_old_nodes() {
        let now = Utc::now();
        let old = now - chrono::Duration::days(365);
        assert_eq!(recency_factor(old, now), 0.5);
    }
}
