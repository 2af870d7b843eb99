use omg_core::model::{NodeType, Priority};

/// A candidate knowledge operation parsed out of `<operation>` and accepted
/// (spec.md §4.4).
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptedOperation {
    pub node_type: NodeType,
    pub priority: Priority,
    pub canonical_key: String,
    pub title: String,
    pub description: String,
    pub content: String,
    pub moc_hints: Vec<String>,
    pub tags: Vec<String>,
    pub links: Vec<String>,
    /// True if `priority` was defaulted from an unrecognized value.
    pub priority_defaulted: bool,
}

/// Why an `<operation>` was dropped instead of accepted (spec.md §4.4).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    InvalidType,
    MissingCanonicalKey,
    MissingDescription,
}

impl RejectionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionReason::InvalidType => "invalid-type",
            RejectionReason::MissingCanonicalKey => "missing-canonical-key",
            RejectionReason::MissingDescription => "missing-description",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RejectedOperation {
    pub reason: RejectionReason,
    pub raw_type: Option<String>,
    pub raw_canonical_key: Option<String>,
}

/// The optional `<now-patch>` sibling (spec.md §4.4).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NowPatch {
    pub focus: Option<String>,
    pub open_loops: Vec<String>,
    pub suggested_links: Vec<String>,
}

/// Result of parsing one Extract LLM response. Never an `Err` — XML
/// failures degrade to an empty outcome plus a diagnostic (spec.md §4.4:
/// "Never throws. On XML failure -> empty output plus an error metric").
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractOutcome {
    pub operations: Vec<AcceptedOperation>,
    pub rejections: Vec<RejectedOperation>,
    pub now_patch: Option<NowPatch>,
    pub truncated: bool,
    /// Set when the XML itself failed to parse (as opposed to individual
    /// operations being rejected).
    pub xml_error: Option<String>,
}
