use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::warn;

use omg_core::model::Priority;

use crate::model::{NodeFieldUpdate, ReflectionNodeCandidate, ReflectionOutcome};

fn split_csv(s: &str) -> Vec<String> {
    s.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect()
}

#[derive(Default)]
struct NodeBuilder {
    compression_level: u8,
    raw_priority: Option<String>,
    canonical_key: Option<String>,
    title: Option<String>,
    description: Option<String>,
    content: Option<String>,
    moc_hints_raw: Option<String>,
    tags_raw: Option<String>,
}

impl NodeBuilder {
    fn finish(self) -> Option<ReflectionNodeCandidate> {
        let canonical_key = self.canonical_key.filter(|s| !s.is_empty())?;
        let description = self.description.filter(|s| !s.is_empty())?;
        let priority = self.raw_priority.as_deref().and_then(Priority::parse).unwrap_or(Priority::Medium);
        Some(ReflectionNodeCandidate {
            compression_level: self.compression_level,
            priority,
            title: self.title.unwrap_or_else(|| description.clone()),
            canonical_key,
            description,
            content: self.content.unwrap_or_default(),
            moc_hints: self.moc_hints_raw.as_deref().map(split_csv).unwrap_or_default(),
            tags: self.tags_raw.as_deref().map(split_csv).unwrap_or_default(),
        })
    }
}

#[derive(Default)]
struct UpdateBuilder {
    node_id: Option<String>,
    raw_field: Option<String>,
    raw_action: Option<String>,
}

/// Parse a Reflection LLM response (spec.md §4.12, wire format §6). Never
/// returns an error: a malformed document yields an empty outcome with
/// `xml_error` set; unparsable individual `<node>`/`<update>` elements are
/// silently dropped rather than failing the whole response.
pub fn parse_reflection_response(xml: &str) -> ReflectionOutcome {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut reflection_nodes = Vec::new();
    let mut archive_node_ids = Vec::new();
    let mut moc_domains = Vec::new();
    let mut node_updates = Vec::new();

    let mut current_node: Option<NodeBuilder> = None;
    let mut current_update: Option<UpdateBuilder> = None;
    let mut text_buffer = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                match name.as_str() {
                    "node" => {
                        let mut builder = NodeBuilder::default();
                        for attr in e.attributes().flatten() {
                            let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
                            let value = attr.unescape_value().unwrap_or_default().to_string();
                            match key.as_str() {
                                "compression-level" => builder.compression_level = value.parse().unwrap_or(0),
                                "priority" => builder.raw_priority = Some(value),
                                _ => {}
                            }
                        }
                        current_node = Some(builder);
                    }
                    "update" => {
                        let mut builder = UpdateBuilder::default();
                        for attr in e.attributes().flatten() {
                            let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
                            let value = attr.unescape_value().unwrap_or_default().to_string();
                            match key.as_str() {
                                "node-id" => builder.node_id = Some(value),
                                "field" => builder.raw_field = Some(value),
                                "action" => builder.raw_action = Some(value),
                                _ => {}
                            }
                        }
                        current_update = Some(builder);
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
                    "node" => {
                        if let Some(builder) = current_node.take() {
                            match builder.finish() {
                                Some(node) => reflection_nodes.push(node),
                                None => warn!("dropping reflection <node> missing required fields"),
                            }
                        }
                    }
                    "canonical-key" if current_node.is_some() => {
                        current_node.as_mut().unwrap().canonical_key = Some(text_buffer.clone());
                    }
                    "title" if current_node.is_some() => {
                        current_node.as_mut().unwrap().title = Some(text_buffer.clone());
                    }
                    "description" if current_node.is_some() => {
                        current_node.as_mut().unwrap().description = Some(text_buffer.clone());
                    }
                    "content" if current_node.is_some() => {
                        current_node.as_mut().unwrap().content = Some(text_buffer.clone());
                    }
                    "moc-hints" if current_node.is_some() => {
                        current_node.as_mut().unwrap().moc_hints_raw = Some(text_buffer.clone());
                    }
                    "tags" if current_node.is_some() => {
                        current_node.as_mut().unwrap().tags_raw = Some(text_buffer.clone());
                    }
                    "node-id" if current_node.is_none() && current_update.is_none() => {
                        // <archive-nodes><node-id>...</node-id></archive-nodes>
                        archive_node_ids.push(text_buffer.clone());
                    }
                    "domain" => {
                        moc_domains.push(text_buffer.clone());
                    }
                    "update" => {
                        if let Some(builder) = current_update.take() {
                            match NodeFieldUpdate::try_new(builder.node_id, builder.raw_field, builder.raw_action, text_buffer.clone()) {
                                Some(update) => node_updates.push(update),
                                None => warn!("dropping node-updates <update> missing required attributes"),
                            }
                        }
                    }
                    _ => {}
                }
                text_buffer.clear();
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                warn!(error = %e, "reflection response xml parse failed, degrading to empty output");
                return ReflectionOutcome { xml_error: Some(e.to_string()), ..Default::default() };
            }
            _ => {}
        }
    }

    ReflectionOutcome { reflection_nodes, archive_node_ids, moc_domains, node_updates, xml_error: None }
}
