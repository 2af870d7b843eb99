use std::collections::BTreeMap;

/// A value in node frontmatter. Frontmatter only ever holds scalars and
/// flat lists of scalars (spec.md §6), so callers work against this
/// narrow view rather than the full `serde_yaml::Value` tree; conversion
/// to/from the real YAML value lives in `frontmatter.rs`.
#[derive(Debug, Clone, PartialEq)]
pub enum YamlValue {
    Null,
    Bool(bool),
    String(String),
    List(Vec<String>),
}

impl YamlValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            YamlValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            YamlValue::Bool(b) => Some(*b),
            YamlValue::String(s) => match s.as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn as_list(&self) -> Vec<String> {
        match self {
            YamlValue::List(items) => items.clone(),
            YamlValue::String(s) if !s.is_empty() => vec![s.clone()],
            _ => Vec::new(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, YamlValue::Null)
    }
}

pub type YamlMap = BTreeMap<String, YamlValue>;
