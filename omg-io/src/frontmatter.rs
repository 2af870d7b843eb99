use omg_core::errors::{IoError, OmgError, OmgResult};

use crate::yaml_value::{YamlMap, YamlValue};

const FENCE: &str = "---";

/// Split a node file into its frontmatter map and body, per spec.md §6:
/// "YAML-style frontmatter between `---` fences... body after the
/// closing fence." Fence splitting is markdown-specific and stays
/// hand-rolled; the frontmatter block itself is real YAML, parsed by
/// `serde_yaml` the same way the teacher parses its own YAML documents
/// (`drift-context::formats::yaml`).
pub fn parse_frontmatter(path: &str, content: &str) -> OmgResult<(YamlMap, String)> {
    let mut lines = content.lines();
    match lines.next() {
        Some(first) if first.trim_end() == FENCE => {}
        _ => {
            return Err(OmgError::Io(IoError::MalformedFrontmatter {
                path: path.to_string(),
                reason: "missing opening '---' fence".to_string(),
            }))
        }
    }

    let mut fm_lines: Vec<&str> = Vec::new();
    let mut closed = false;
    for line in lines.by_ref() {
        if line.trim_end() == FENCE {
            closed = true;
            break;
        }
        fm_lines.push(line);
    }
    if !closed {
        return Err(OmgError::Io(IoError::MalformedFrontmatter {
            path: path.to_string(),
            reason: "missing closing '---' fence".to_string(),
        }));
    }

    let body = lines.collect::<Vec<_>>().join("\n");
    let body = body.strip_prefix('\n').unwrap_or(&body).to_string();
    let map = parse_fm_yaml(path, &fm_lines.join("\n"))?;
    Ok((map, body))
}

fn parse_fm_yaml(path: &str, fm_text: &str) -> OmgResult<YamlMap> {
    if fm_text.trim().is_empty() {
        return Ok(YamlMap::new());
    }
    let parsed: serde_yaml::Mapping = serde_yaml::from_str(fm_text).map_err(|e| {
        OmgError::Io(IoError::MalformedFrontmatter { path: path.to_string(), reason: format!("invalid YAML: {e}") })
    })?;

    let mut map = YamlMap::new();
    for (key, value) in parsed {
        let Some(key) = key.as_str() else { continue };
        map.insert(key.to_string(), from_yaml(&value));
    }
    Ok(map)
}

fn from_yaml(value: &serde_yaml::Value) -> YamlValue {
    match value {
        serde_yaml::Value::Null => YamlValue::Null,
        serde_yaml::Value::Bool(b) => YamlValue::Bool(*b),
        serde_yaml::Value::Number(n) => YamlValue::String(n.to_string()),
        serde_yaml::Value::String(s) => YamlValue::String(s.clone()),
        serde_yaml::Value::Sequence(items) => YamlValue::List(
            items
                .iter()
                .map(|item| match item {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    serde_yaml::Value::Null => String::new(),
                    other => serde_yaml::to_string(other).unwrap_or_default().trim().to_string(),
                })
                .collect(),
        ),
        // Mappings and other nested structures never appear in a node's
        // frontmatter (spec.md §6 lists only scalar/list keys).
        other => YamlValue::String(serde_yaml::to_string(other).unwrap_or_default().trim().to_string()),
    }
}

fn to_yaml(value: &YamlValue) -> serde_yaml::Value {
    match value {
        YamlValue::Null => serde_yaml::Value::Null,
        YamlValue::Bool(b) => serde_yaml::Value::Bool(*b),
        YamlValue::String(s) => serde_yaml::Value::String(s.clone()),
        YamlValue::List(items) => {
            serde_yaml::Value::Sequence(items.iter().cloned().map(serde_yaml::Value::String).collect())
        }
    }
}

/// Render an ordered list of `(key, value)` pairs as a frontmatter block
/// plus body, ready to write to disk. Key order is caller-controlled so
/// serialization is deterministic (round-trip identity, spec.md §8).
pub fn serialize_frontmatter(entries: &[(&str, YamlValue)], body: &str) -> String {
    let mut mapping = serde_yaml::Mapping::new();
    for (key, value) in entries {
        mapping.insert(serde_yaml::Value::String(key.to_string()), to_yaml(value));
    }
    let yaml = serde_yaml::to_string(&mapping).unwrap_or_default();

    let mut out = String::new();
    out.push_str(FENCE);
    out.push('\n');
    out.push_str(&yaml);
    out.push_str(FENCE);
    out.push('\n');
    if !body.is_empty() {
        out.push('\n');
        out.push_str(body);
        if !body.ends_with('\n') {
            out.push('\n');
        }
    }
    out
}
