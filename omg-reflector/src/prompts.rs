use omg_core::model::Node;

/// Fixed system prompt for the Reflection phase (spec.md §4.12).
pub fn reflection_system_prompt(compression_level: u8) -> String {
    format!(
        "You compress aged observation nodes from a personal knowledge \
graph into durable reflection nodes. Read the source nodes and emit a \
<reflection> XML document. Each <node> under <reflection-nodes> has a \
compression-level=\"{compression_level}\" attribute and optional priority \
attribute, with child elements <canonical-key>, <title>, <description>, \
<content>, <moc-hints>, <tags>. List source node ids that are now fully \
subsumed by the reflection under <archive-nodes><node-id>. List any MOC \
domains that should be regenerated under <moc-updates><domain>. Propose \
field edits against other existing nodes under <node-updates><update \
node-id field=\"body|tags|priority\" action=\"set|add|remove\">value. \
Compression level {compression_level} of 3: level 0 preserves most \
detail; higher levels must produce progressively shorter content."
    )
}

/// Build the Reflection user prompt from the eligible source nodes, at
/// the given compression level (spec.md §4.12: "attempt synthesis at
/// compression level 0... escalate... more aggressive summarization").
pub fn reflection_user_prompt(nodes: &[(String, Node)], compression_level: u8) -> String {
    let mut out = String::new();
    out.push_str(&format!("Compression level: {compression_level}\n\n"));
    out.push_str("Source nodes:\n");
    for (id, node) in nodes {
        out.push_str(&format!(
            "[{id}] type={} priority={} description={}\n{}\n\n",
            node.node_type, node.priority, node.description, node.body
        ));
    }
    out
}
