use omg_similarity::{compute_overlap, fingerprint, Fingerprint};

/// Outcome of the pre-extraction guardrail check (spec.md §4.10).
#[derive(Debug, Clone, PartialEq)]
pub enum GuardrailDecision {
    /// Max overlap against history met `skip_overlap_threshold`: no LLM
    /// call is made at all.
    Skip,
    /// Max overlap met `truncate_overlap_threshold` but not `skip`:
    /// extract only the trailing suffix starting at this message index.
    Truncate { from_index: usize },
    /// No guardrail triggered; extract the whole window.
    Proceed,
}

/// Evaluate the pre-extraction guardrail against a message window and the
/// session's recent fingerprints (spec.md §4.10):
/// "If max overlap >= skipOverlapThreshold -> skip the turn. Else if >=
/// truncateOverlapThreshold -> find the largest trailing suffix whose max
/// overlap against history falls below the threshold, and extract only
/// that suffix."
pub fn evaluate_guardrail(
    messages: &[&str],
    recent_fingerprints: &[Fingerprint],
    skip_overlap_threshold: f64,
    truncate_overlap_threshold: f64,
) -> GuardrailDecision {
    if messages.is_empty() || recent_fingerprints.is_empty() {
        return GuardrailDecision::Proceed;
    }

    let max_overlap = |window: &[&str]| -> f64 {
        let fp = fingerprint(window);
        recent_fingerprints.iter().map(|hist| compute_overlap(&fp, hist)).fold(0.0_f64, f64::max)
    };

    let full_overlap = max_overlap(messages);
    if full_overlap >= skip_overlap_threshold {
        return GuardrailDecision::Skip;
    }
    if full_overlap < truncate_overlap_threshold {
        return GuardrailDecision::Proceed;
    }

    // Find the largest trailing suffix whose overlap falls below the
    // truncate threshold. Start from the largest suffix (index 1, drop
    // only the first message) and grow the drop until overlap clears.
    for from_index in 1..messages.len() {
        let suffix = &messages[from_index..];
        if suffix.is_empty() {
            break;
        }
        if max_overlap(suffix) < truncate_overlap_threshold {
            return GuardrailDecision::Truncate { from_index };
        }
    }
    // Every suffix still overlaps; the whole window is redundant.
    GuardrailDecision::Skip
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_history_always_proceeds() {
        let decision = evaluate_guardrail(&["I prefer dark mode"], &[], 0.9, 0.6);
        assert_eq!(decision, GuardrailDecision::Proceed);
    }

    #[test]
    fn high_overlap_skips() {
        let history = vec![fingerprint(&["I prefer dark mode for my editor windows please"])];
        let decision = evaluate_guardrail(
            &["I prefer dark mode for my editor windows please"],
            &history,
            0.9,
            0.6,
        );
        assert_eq!(decision, GuardrailDecision::Skip);
    }

    #[test]
    fn unrelated_content_proceeds() {
        let history = vec![fingerprint(&["I prefer dark mode for my editor windows please"])];
        let decision = evaluate_guardrail(
            &["The quarterly roadmap review happens every other Tuesday"],
            &history,
            0.9,
            0.6,
        );
        assert_eq!(decision, GuardrailDecision::Proceed);
    }

    #[test]
    fn mid_overlap_truncates_to_novel_suffix() {
        let history = vec![fingerprint(&["I prefer dark mode for my editor windows at work"])];
        let messages = vec![
            "I prefer dark mode for my editor windows at work",
            "also the quarterly roadmap review moved to Wednesdays this cycle",
        ];
        let decision = evaluate_guardrail(&messages, &history, 0.95, 0.3);
        assert!(matches!(decision, GuardrailDecision::Truncate { from_index: 1 }));
    }
}
