use crate::types::{FlowGraph, FlowNode};

/// Formats a flow tree as an indented Markdown list.
///
/// Each line shows the element id, its node type and any resolved
/// attributes; children are nested one level deeper than their parent.
pub fn format_flow_as_markdown(root: &FlowNode) -> String {
    let mut out = String::new();
    out.push_str("## Flow\n");
    out.push_str(&format!(
        "**Root:** {} ({})\n\n",
        root.element_id, root.node_type
    ));
    write_flow_node(&mut out, root, 0);
    out
}

fn write_flow_node(out: &mut String, node: &FlowNode, depth: usize) {
    let indent = "  ".repeat(depth);
    let via = node
        .via
        .as_deref()
        .map(|kind| format!(" _via {}_", kind))
        .unwrap_or_default();
    out.push_str(&format!(
        "{}- **{}** ({}){}\n",
        indent, node.element_id, node.node_type, via
    ));
    for (name, value) in &node.attributes {
        out.push_str(&format!("{}  - {}: `{}`\n", indent, name, value));
    }
    for child in &node.children {
        write_flow_node(out, child, depth + 1);
    }
}

/// Formats a flow tree as pretty-printed JSON.
pub fn format_flow_as_json(root: &FlowNode) -> String {
    serde_json::to_string_pretty(root).unwrap_or_default()
}

/// Formats a projected graph as pretty-printed JSON.
pub fn format_graph_as_json(graph: &FlowGraph) -> String {
    serde_json::to_string_pretty(graph).unwrap_or_default()
}

/// Formats a projected graph as a Mermaid flowchart.
pub fn format_graph_as_mermaid(graph: &FlowGraph) -> String {
    let mut out = String::from("flowchart LR\n");
    for (index, node) in graph.nodes.iter().enumerate() {
        out.push_str(&format!(
            "    n{}[\"{}\"]\n",
            index,
            node.label.replace('"', "'")
        ));
    }
    let index_of = |id: &str| graph.nodes.iter().position(|n| n.id == id);
    for edge in &graph.edges {
        let (Some(source), Some(target)) = (index_of(&edge.source_id), index_of(&edge.target_id))
        else {
            continue;
        };
        match &edge.label {
            Some(label) => out.push_str(&format!("    n{} -->|{}| n{}\n", source, label, target)),
            None => out.push_str(&format!("    n{} --> n{}\n", source, target)),
        }
    }
    out
}
