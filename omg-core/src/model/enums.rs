use serde::{Deserialize, Serialize};
use std::fmt;

/// The type of a node. Determines its directory under `nodes/` (structural
/// types `moc`/`index`/`now` live at fixed paths instead).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Identity,
    Preference,
    Project,
    Decision,
    Fact,
    Episode,
    Reflection,
    Moc,
    Index,
    Now,
}

impl NodeType {
    /// Whether this type is written under `nodes/{type}/` as an upsert.
    pub fn is_upsert_type(self) -> bool {
        !matches!(self, NodeType::Moc | NodeType::Index | NodeType::Now | NodeType::Reflection)
    }

    /// Directory segment under the graph root this type's nodes live in.
    pub fn dir_segment(self) -> &'static str {
        match self {
            NodeType::Identity => "identity",
            NodeType::Preference => "preference",
            NodeType::Project => "project",
            NodeType::Decision => "decision",
            NodeType::Fact => "fact",
            NodeType::Episode => "episode",
            NodeType::Reflection => "reflection",
            NodeType::Moc => "moc",
            NodeType::Index => "index",
            NodeType::Now => "now",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::Identity => "identity",
            NodeType::Preference => "preference",
            NodeType::Project => "project",
            NodeType::Decision => "decision",
            NodeType::Fact => "fact",
            NodeType::Episode => "episode",
            NodeType::Reflection => "reflection",
            NodeType::Moc => "moc",
            NodeType::Index => "index",
            NodeType::Now => "now",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "identity" => NodeType::Identity,
            "preference" => NodeType::Preference,
            "project" => NodeType::Project,
            "decision" => NodeType::Decision,
            "fact" => NodeType::Fact,
            "episode" => NodeType::Episode,
            "reflection" => NodeType::Reflection,
            "moc" => NodeType::Moc,
            "index" => NodeType::Index,
            "now" => NodeType::Now,
            _ => return None,
        })
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Priority weighting used throughout traversal, selection, and retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// `priorityWeight` from spec.md §4.2.
    pub fn weight(self) -> f64 {
        match self {
            Priority::High => 1.5,
            Priority::Medium => 1.0,
            Priority::Low => 0.7,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "high" => Priority::High,
            "medium" => Priority::Medium,
            "low" => Priority::Low,
            _ => return None,
        })
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Registry entry kind — inferred from type or file path prefix (spec.md §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Observation,
    Reflection,
}

impl Kind {
    /// Infer kind from a node's type and file path, per spec.md §3
    /// ("Kind ∈ {observation, reflection} is inferred from type or filePath prefix").
    pub fn infer(node_type: NodeType, file_path: &str) -> Self {
        if node_type == NodeType::Reflection || file_path.starts_with("reflections/") {
            Kind::Reflection
        } else {
            Kind::Observation
        }
    }
}
