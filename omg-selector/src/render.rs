use omg_core::model::Node;

/// Render a single node as it appears in the final context document
/// (spec.md §4.8): `### {description}` heading, an HTML-comment metadata
/// line, then the body.
pub fn render_node_block(node: &Node) -> String {
    format!("### {}\n<!-- {} | {} | {} -->\n{}", node.description, node.id, node.node_type, node.priority, node.body)
}

/// Wrap the selected nodes in `<omg-context>`, with up to three optional
/// section headings that are omitted entirely when their group is empty.
pub fn render_context(focus: &[&Node], mocs: &[&Node], nodes: &[&Node]) -> String {
    let mut sections = Vec::new();
    if !focus.is_empty() {
        sections.push(render_section("Focus", focus));
    }
    if !mocs.is_empty() {
        sections.push(render_section("Maps of Content", mocs));
    }
    if !nodes.is_empty() {
        sections.push(render_section("Knowledge", nodes));
    }
    format!("<omg-context>\n{}\n</omg-context>", sections.join("\n\n"))
}

fn render_section(heading: &str, nodes: &[&Node]) -> String {
    let body = nodes.iter().map(|n| render_node_block(n)).collect::<Vec<_>>().join("\n\n");
    format!("## {heading}\n\n{body}")
}
