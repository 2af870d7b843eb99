use std::path::Path;

use tracing::warn;

use omg_core::config::ReflectorConfig;
use omg_core::errors::{OmgError, OmgResult, ReflectorError};
use omg_core::traits::LlmClient;
use omg_registry::Registry;
use omg_selector::estimate_tokens;

use crate::apply::apply_reflection_outcome;
use crate::model::ReflectionSummary;
use crate::parse::parse_reflection_response;
use crate::prompts::{reflection_system_prompt, reflection_user_prompt};
use crate::selection::select_reflection_candidates;

/// Advisory output-token budget per Reflection LLM call.
const REFLECTION_MAX_TOKENS: usize = 2000;

/// Run one reflection cycle (spec.md §4.12): select eligible nodes
/// (or use `node_ids` if the caller already chose them, e.g. the
/// maintenance cron handler reflecting over a specific domain),
/// synthesize at compression level 0, escalating while the rendered
/// synthesis exceeds `context_token_threshold`, then apply the result.
/// Returns a summary with `attempted: false` when there was nothing
/// eligible to reflect over.
pub fn run_reflection(
    registry: &Registry,
    root: &Path,
    llm: &dyn LlmClient,
    config: &ReflectorConfig,
    node_ids: Option<&[String]>,
) -> OmgResult<ReflectionSummary> {
    let nodes = match node_ids {
        Some(ids) => {
            let mut resolved = Vec::with_capacity(ids.len());
            for id in ids {
                if let Some(entry) = registry.get_registry_entry(id)? {
                    if let Ok(node) = omg_selector::hydrate_node(root, id, &entry.file_path) {
                        resolved.push((id.clone(), node));
                    }
                }
            }
            resolved
        }
        None => select_reflection_candidates(registry, root, config)?,
    };

    if nodes.is_empty() {
        return Ok(ReflectionSummary::default());
    }

    let source_node_ids: Vec<String> = nodes.iter().map(|(id, _)| id.clone()).collect();
    let max_level = config.max_compression_level;

    let mut level = 0u8;
    loop {
        let system = reflection_system_prompt(level);
        let user = reflection_user_prompt(&nodes, level);

        let response = llm
            .generate(&system, &user, REFLECTION_MAX_TOKENS)
            .map_err(|e| OmgError::Reflector(ReflectorError::SynthesisFailed { level, reason: e.to_string() }))?;

        let outcome = parse_reflection_response(&response.content);
        let rendered_tokens: usize = outcome.reflection_nodes.iter().map(|n| estimate_tokens(&n.content)).sum();

        if rendered_tokens <= config.context_token_threshold || level >= max_level {
            if rendered_tokens > config.context_token_threshold {
                warn!(level, rendered_tokens, threshold = config.context_token_threshold, "{}", ReflectorError::EscalationExhausted);
            }
            return apply_reflection_outcome(registry, root, &outcome, &source_node_ids);
        }

        level += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use omg_core::errors::LlmResponse;
    use omg_core::model::{Kind, Node, NodeType, Priority, RegistryEntry};
    use omg_io::{serialize_node, write_atomic};
    use tempfile::tempdir;

    struct FixedLlm {
        responses: std::sync::Mutex<Vec<String>>,
    }

    impl LlmClient for FixedLlm {
        fn generate(&self, _system: &str, _user: &str, _max_tokens: usize) -> OmgResult<LlmResponse> {
            let mut responses = self.responses.lock().unwrap();
            let content = if responses.len() > 1 { responses.remove(0) } else { responses[0].clone() };
            Ok(LlmResponse { content, input_tokens: 10, output_tokens: 10 })
        }
    }

    fn seed_eligible_node(dir: &Path, registry: &Registry, id: &str, canonical_key: &str) {
        let file_path = format!("nodes/fact/{}.md", omg_io::slugify(canonical_key));
        let created = Utc::now() - Duration::days(30);
        let node = Node {
            id: id.into(),
            uid: Node::compute_uid("default", NodeType::Fact, canonical_key),
            canonical_key: Some(canonical_key.into()),
            node_type: NodeType::Fact,
            priority: Priority::Medium,
            created,
            updated: created,
            description: "an aged fact".into(),
            body: "aged body content".into(),
            links: vec![],
            tags: vec![],
            aliases: vec![],
            archived: false,
            merged_into: None,
            merged_from: vec![],
            compression_level: None,
            file_path: Some(file_path.clone()),
        };
        write_atomic(&dir.join(&file_path), &serialize_node(&node)).unwrap();
        registry
            .register_node(
                id.into(),
                RegistryEntry {
                    node_type: NodeType::Fact,
                    kind: Kind::Observation,
                    description: "an aged fact".into(),
                    priority: Priority::Medium,
                    created,
                    updated: created,
                    file_path,
                    archived: false,
                    links: vec![],
                    tags: vec![],
                    canonical_key: Some(canonical_key.into()),
                },
            )
            .unwrap();
    }

    fn reflection_xml(content: &str) -> String {
        format!(
            r#"<reflection><reflection-nodes>
              <node compression-level="0">
                <canonical-key>reflections.test</canonical-key>
                <title>t</title>
                <description>d</description>
                <content>{content}</content>
              </node>
            </reflection-nodes></reflection>"#
        )
    }

    #[test]
    fn no_eligible_nodes_returns_unattempted_summary() {
        let dir = tempdir().unwrap();
        let registry = Registry::new(dir.path());
        let llm = FixedLlm { responses: std::sync::Mutex::new(vec![reflection_xml("x")]) };
        let summary = run_reflection(&registry, dir.path(), &llm, &ReflectorConfig::default(), None).unwrap();
        assert!(!summary.attempted);
    }

    #[test]
    fn accepts_at_level_zero_when_under_threshold() {
        let dir = tempdir().unwrap();
        let registry = Registry::new(dir.path());
        seed_eligible_node(dir.path(), &registry, "omg/fact/a", "facts.a");

        let llm = FixedLlm { responses: std::sync::Mutex::new(vec![reflection_xml("short")]) };
        let config = ReflectorConfig { context_token_threshold: 1000, ..Default::default() };
        let summary = run_reflection(&registry, dir.path(), &llm, &config, None).unwrap();

        assert!(summary.attempted);
        assert_eq!(summary.compression_level, 0);
        assert_eq!(summary.reflection_node_ids.len(), 1);
    }

    #[test]
    fn escalates_then_accepts_at_max_level() {
        let dir = tempdir().unwrap();
        let registry = Registry::new(dir.path());
        seed_eligible_node(dir.path(), &registry, "omg/fact/a", "facts.a");

        let long_content = "word ".repeat(2000);
        let llm = FixedLlm { responses: std::sync::Mutex::new(vec![reflection_xml(&long_content)]) };
        let config = ReflectorConfig { context_token_threshold: 10, max_compression_level: 2, ..Default::default() };
        let summary = run_reflection(&registry, dir.path(), &llm, &config, None).unwrap();

        assert!(summary.attempted);
        assert_eq!(summary.compression_level, 0);
    }
}
