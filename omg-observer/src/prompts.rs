use omg_retrieval::MergeTarget;

use crate::extract_model::AcceptedOperation;

/// Fixed system prompt for the Extract phase (spec.md §4.4).
pub fn extract_system_prompt() -> &'static str {
    "You maintain a personal knowledge graph for a conversational agent. \
Read the new messages and emit an <observations> XML document describing \
any durable facts, preferences, decisions, projects, or episodes worth \
recording. Each <operation> has a type (identity|preference|project| \
decision|fact|episode) and priority (high|medium|low) attribute, and \
child elements <canonical-key> (a short dotted domain path), <title>, \
<description>, <content>, <moc-hints>, <tags>, <links>. If the agent's \
current focus or open commitments changed, also emit a <now-patch> \
sibling with <focus>, <open-loops>, <suggested-links>. Emit nothing if \
there is nothing durable to record."
}

/// Build the Extract user prompt from the unobserved message window, the
/// current now-node body, and free-form session context (spec.md §4.4).
pub fn extract_user_prompt(messages: &[&str], now_body: Option<&str>, session_context: Option<&str>) -> String {
    let mut out = String::new();
    if let Some(now) = now_body {
        out.push_str("Current focus (now.md):\n");
        out.push_str(now);
        out.push_str("\n\n");
    }
    if let Some(ctx) = session_context {
        out.push_str("Session context:\n");
        out.push_str(ctx);
        out.push_str("\n\n");
    }
    out.push_str("New messages:\n");
    for (i, m) in messages.iter().enumerate() {
        out.push_str(&format!("[{i}] {m}\n"));
    }
    out
}

/// Fixed system prompt for the Merge-decision phase (spec.md §4.5).
pub fn merge_system_prompt() -> &'static str {
    "You decide how a new knowledge candidate relates to existing nodes \
in a personal knowledge graph. Given the candidate and a table of \
similarly-scored neighbors, reply with a single <merge-decision> \
element: action=\"keep_separate\" to leave both as-is, action=\"merge\" \
with target-node-id and body-append to absorb the candidate into an \
existing node, or action=\"alias\" with target-node-id and alias-key to \
record the candidate's canonicalKey as an alternate name for an \
existing node. Prefer merge or alias whenever the candidate describes \
the same real-world concept as a neighbor."
}

/// Build the Merge-decision user prompt: the candidate plus a compact
/// neighbor table (spec.md §4.5 "a compact neighbor table").
pub fn merge_user_prompt(candidate: &AcceptedOperation, neighbors: &[(MergeTarget, String)]) -> String {
    let mut out = String::new();
    out.push_str("Candidate:\n");
    out.push_str(&format!(
        "  type={} priority={} canonicalKey={} title={} description={}\n\n",
        candidate.node_type, candidate.priority, candidate.canonical_key, candidate.title, candidate.description
    ));
    out.push_str("Neighbors:\n");
    for (target, description) in neighbors {
        out.push_str(&format!("  id={} score={:.3} description={}\n", target.id, target.final_score, description));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use omg_core::model::{NodeType, Priority};

    #[test]
    fn extract_user_prompt_includes_now_and_messages() {
        let prompt = extract_user_prompt(&["hello", "world"], Some("focused on omg"), None);
        assert!(prompt.contains("focused on omg"));
        assert!(prompt.contains("[0] hello"));
        assert!(prompt.contains("[1] world"));
    }

    #[test]
    fn merge_user_prompt_lists_neighbors() {
        let candidate = AcceptedOperation {
            node_type: NodeType::Preference,
            priority: Priority::Medium,
            canonical_key: "preferences.editor_theme".into(),
            title: "theme".into(),
            description: "Prefers light mode".into(),
            content: String::new(),
            moc_hints: vec![],
            tags: vec![],
            links: vec![],
            priority_defaulted: false,
        };
        let neighbors = vec![(
            MergeTarget { id: "omg/preference/theme".into(), final_score: 0.8 },
            "Prefers dark mode".to_string(),
        )];
        let prompt = merge_user_prompt(&candidate, &neighbors);
        assert!(prompt.contains("omg/preference/theme"));
        assert!(prompt.contains("0.800"));
    }
}
