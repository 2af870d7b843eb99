use omg_core::model::Priority;

/// One synthesized reflection node proposed by the LLM (spec.md §4.12).
#[derive(Debug, Clone, PartialEq)]
pub struct ReflectionNodeCandidate {
    pub compression_level: u8,
    pub priority: Priority,
    pub canonical_key: String,
    pub title: String,
    pub description: String,
    pub content: String,
    pub moc_hints: Vec<String>,
    pub tags: Vec<String>,
}

/// Which node field a `<node-updates><update>` targets (spec.md §4.12:
/// "field updates (body/tags/priority ...)").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateField {
    Body,
    Tags,
    Priority,
}

impl UpdateField {
    fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "body" => UpdateField::Body,
            "tags" => UpdateField::Tags,
            "priority" => UpdateField::Priority,
            _ => return None,
        })
    }
}

/// What to do with an update's value (spec.md §4.12: "actions
/// set|add|remove").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldAction {
    Set,
    Add,
    Remove,
}

impl FieldAction {
    fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "set" => FieldAction::Set,
            "add" => FieldAction::Add,
            "remove" => FieldAction::Remove,
            _ => return None,
        })
    }
}

/// One field mutation against an arbitrary (already-existing) node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeFieldUpdate {
    pub node_id: String,
    pub field: UpdateField,
    pub action: FieldAction,
    pub value: String,
}

impl NodeFieldUpdate {
    pub(crate) fn try_new(node_id: Option<String>, raw_field: Option<String>, raw_action: Option<String>, value: String) -> Option<Self> {
        let node_id = node_id?;
        let field = raw_field.as_deref().and_then(UpdateField::parse)?;
        let action = raw_action.as_deref().and_then(FieldAction::parse)?;
        Some(Self { node_id, field, action, value })
    }
}

/// Parsed Reflection LLM response (spec.md §4.12, wire format spec.md
/// §6: `<reflection><reflection-nodes><node compression-level/>*
/// </reflection-nodes><archive-nodes/><moc-updates/><node-updates/>
/// </reflection>`). Parsing never fails outright: a malformed document
/// yields an outcome with everything empty and `xml_error` set, mirroring
/// [`omg_observer`]'s Extract-phase contract.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReflectionOutcome {
    pub reflection_nodes: Vec<ReflectionNodeCandidate>,
    pub archive_node_ids: Vec<String>,
    pub moc_domains: Vec<String>,
    pub node_updates: Vec<NodeFieldUpdate>,
    pub xml_error: Option<String>,
}

/// Outcome of one `run_reflection` call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReflectionSummary {
    /// `false` when there were no eligible nodes and nothing ran.
    pub attempted: bool,
    /// Compression level the accepted synthesis settled at.
    pub compression_level: u8,
    pub reflection_node_ids: Vec<String>,
    pub archived_count: usize,
    pub node_updates_applied: usize,
}
