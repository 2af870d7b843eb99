use std::sync::OnceLock;

use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use tracing::warn;

use omg_core::model::{NodeType, Priority};

use crate::extract_model::{AcceptedOperation, ExtractOutcome, NowPatch, RejectedOperation, RejectionReason};

fn wikilink_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[\[([^\]]+)\]\]").expect("static wikilink pattern"))
}

fn split_csv(s: &str) -> Vec<String> {
    s.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect()
}

/// Links come either as `[[wikilink]]` references or a comma-split list of
/// canonicalKeys (spec.md §4.4).
fn parse_links(raw: &str) -> Vec<String> {
    let wikilinks: Vec<String> = wikilink_re().captures_iter(raw).map(|c| c[1].trim().to_string()).collect();
    if !wikilinks.is_empty() {
        wikilinks
    } else {
        split_csv(raw)
    }
}

#[derive(Default)]
struct OperationBuilder {
    raw_type: Option<String>,
    raw_priority: Option<String>,
    canonical_key: Option<String>,
    title: Option<String>,
    description: Option<String>,
    content: Option<String>,
    moc_hints_raw: Option<String>,
    tags_raw: Option<String>,
    links_raw: Option<String>,
}

impl OperationBuilder {
    fn finish(self) -> Result<AcceptedOperation, RejectedOperation> {
        let node_type = self
            .raw_type
            .as_deref()
            .and_then(NodeType::parse)
            .ok_or_else(|| RejectedOperation {
                reason: RejectionReason::InvalidType,
                raw_type: self.raw_type.clone(),
                raw_canonical_key: self.canonical_key.clone(),
            })?;

        let canonical_key = self.canonical_key.clone().filter(|s| !s.is_empty()).ok_or_else(|| RejectedOperation {
            reason: RejectionReason::MissingCanonicalKey,
            raw_type: self.raw_type.clone(),
            raw_canonical_key: self.canonical_key.clone(),
        })?;

        let description = self.description.clone().filter(|s| !s.is_empty()).ok_or_else(|| RejectedOperation {
            reason: RejectionReason::MissingDescription,
            raw_type: self.raw_type.clone(),
            raw_canonical_key: Some(canonical_key.clone()),
        })?;

        let (priority, priority_defaulted) = match self.raw_priority.as_deref().and_then(Priority::parse) {
            Some(p) => (p, false),
            None => {
                warn!(raw = ?self.raw_priority, canonical_key = %canonical_key, "unknown priority, defaulting to medium");
                (Priority::Medium, true)
            }
        };

        Ok(AcceptedOperation {
            node_type,
            priority,
            title: self.title.unwrap_or_else(|| description.clone()),
            canonical_key,
            description,
            content: self.content.unwrap_or_default(),
            moc_hints: self.moc_hints_raw.as_deref().map(split_csv).unwrap_or_default(),
            tags: self.tags_raw.as_deref().map(split_csv).unwrap_or_default(),
            links: self.links_raw.as_deref().map(parse_links).unwrap_or_default(),
            priority_defaulted,
        })
    }
}

#[derive(Default)]
struct NowPatchBuilder {
    focus: Option<String>,
    open_loops_raw: Option<String>,
    suggested_links_raw: Option<String>,
}

impl NowPatchBuilder {
    fn finish(self) -> NowPatch {
        NowPatch {
            focus: self.focus.filter(|s| !s.is_empty()),
            open_loops: self.open_loops_raw.as_deref().map(split_csv).unwrap_or_default(),
            suggested_links: self.suggested_links_raw.as_deref().map(parse_links).unwrap_or_default(),
        }
    }
}

/// Parse an Extract LLM response (spec.md §4.4). Never returns an error:
/// a malformed document yields an empty outcome with `xml_error` set; a
/// well-formed document with invalid individual `<operation>`s yields
/// those as `rejections` while still accepting the rest.
pub fn parse_extract_response(xml: &str, requested_max_tokens: usize, output_tokens: usize, truncation_ratio: f64) -> ExtractOutcome {
    let truncated = requested_max_tokens > 0 && (output_tokens as f64) >= (requested_max_tokens as f64) * truncation_ratio;

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut operations = Vec::new();
    let mut rejections = Vec::new();
    let mut now_patch: Option<NowPatch> = None;

    let mut current_op: Option<OperationBuilder> = None;
    let mut current_now_patch: Option<NowPatchBuilder> = None;
    let mut text_buffer = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                match name.as_str() {
                    "operation" => {
                        let mut builder = OperationBuilder::default();
                        for attr in e.attributes().flatten() {
                            let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
                            let value = attr.unescape_value().unwrap_or_default().to_string();
                            match key.as_str() {
                                "type" => builder.raw_type = Some(value),
                                "priority" => builder.raw_priority = Some(value),
                                _ => {}
                            }
                        }
                        current_op = Some(builder);
                    }
                    "now-patch" => {
                        current_now_patch = Some(NowPatchBuilder::default());
                    }
                    _ => {}
                }
            }
            Ok(Event::Text(e)) => {
                text_buffer = e.unescape().unwrap_or_default().to_string();
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                match name.as_str() {
                    "operation" => {
                        if let Some(builder) = current_op.take() {
                            match builder.finish() {
                                Ok(op) => operations.push(op),
                                Err(rejection) => rejections.push(rejection),
                            }
                        }
                    }
                    "now-patch" => {
                        if let Some(builder) = current_now_patch.take() {
                            now_patch = Some(builder.finish());
                        }
                    }
                    "canonical-key" if current_op.is_some() => {
                        current_op.as_mut().unwrap().canonical_key = Some(text_buffer.clone());
                    }
                    "title" if current_op.is_some() => {
                        current_op.as_mut().unwrap().title = Some(text_buffer.clone());
                    }
                    "description" if current_op.is_some() => {
                        current_op.as_mut().unwrap().description = Some(text_buffer.clone());
                    }
                    "content" if current_op.is_some() => {
                        current_op.as_mut().unwrap().content = Some(text_buffer.clone());
                    }
                    "moc-hints" if current_op.is_some() => {
                        current_op.as_mut().unwrap().moc_hints_raw = Some(text_buffer.clone());
                    }
                    "tags" if current_op.is_some() => {
                        current_op.as_mut().unwrap().tags_raw = Some(text_buffer.clone());
                    }
                    "links" if current_op.is_some() => {
                        current_op.as_mut().unwrap().links_raw = Some(text_buffer.clone());
                    }
                    "focus" if current_now_patch.is_some() => {
                        current_now_patch.as_mut().unwrap().focus = Some(text_buffer.clone());
                    }
                    "open-loops" if current_now_patch.is_some() => {
                        current_now_patch.as_mut().unwrap().open_loops_raw = Some(text_buffer.clone());
                    }
                    "suggested-links" if current_now_patch.is_some() => {
                        current_now_patch.as_mut().unwrap().suggested_links_raw = Some(text_buffer.clone());
                    }
                    _ => {}
                }
                text_buffer.clear();
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                warn!(error = %e, "extract response xml parse failed, degrading to empty output");
                return ExtractOutcome { truncated, xml_error: Some(e.to_string()), ..Default::default() };
            }
            _ => {}
        }
    }

    ExtractOutcome { operations, rejections, now_patch, truncated, xml_error: None }
}
