use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::warn;

/// The decided action for a merge candidate (spec.md §4.5).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeAction {
    KeepSeparate,
    Merge,
    Alias,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergeDecision {
    pub action: MergeAction,
    pub target_node_id: Option<String>,
    pub alias_key: Option<String>,
    pub body_append: Option<String>,
}

impl MergeDecision {
    fn keep_separate() -> Self {
        Self { action: MergeAction::KeepSeparate, target_node_id: None, alias_key: None, body_append: None }
    }
}

/// Parse a `<merge-decision .../>` response (spec.md §4.5). "Parse
/// defaults to `keep_separate` on any failure or missing required
/// attribute" — this function never returns an error.
pub fn parse_merge_decision(xml: &str) -> MergeDecision {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if name != "merge-decision" {
                    continue;
                }
                let mut raw_action = None;
                let mut target_node_id = None;
                let mut alias_key = None;
                let mut body_append = None;
                for attr in e.attributes().flatten() {
                    let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
                    let value = attr.unescape_value().unwrap_or_default().to_string();
                    match key.as_str() {
                        "action" => raw_action = Some(value),
                        "target-node-id" => target_node_id = Some(value),
                        "alias-key" => alias_key = Some(value),
                        "body-append" => body_append = Some(value),
                        _ => {}
                    }
                }

                let action = match raw_action.as_deref() {
                    Some("merge") if target_node_id.is_some() => MergeAction::Merge,
                    Some("alias") if target_node_id.is_some() && alias_key.is_some() => MergeAction::Alias,
                    Some("keep_separate") => MergeAction::KeepSeparate,
                    other => {
                        warn!(action = ?other, "merge-decision missing required attribute, defaulting to keep_separate");
                        MergeAction::KeepSeparate
                    }
                };

                return match action {
                    MergeAction::KeepSeparate => MergeDecision::keep_separate(),
                    MergeAction::Merge => MergeDecision { action, target_node_id, alias_key: None, body_append },
                    MergeAction::Alias => MergeDecision { action, target_node_id, alias_key, body_append: None },
                };
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                warn!(error = %e, "merge-decision xml parse failed, defaulting to keep_separate");
                return MergeDecision::keep_separate();
            }
            _ => {}
        }
    }
    MergeDecision::keep_separate()
}
