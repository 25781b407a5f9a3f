use std::collections::HashSet;

use serde_json::json;

use crate::schema::node_types;
use crate::types::{EdgeLabeling, FlowGraph, FlowNode, GraphEdge, GraphNode};

use super::labels::LabelProvider;

/// Flattens flow trees into a deduplicated node/edge graph for rendering.
pub struct GraphProjector<L> {
    labels: L,
    edge_labeling: EdgeLabeling,
}

impl<L: LabelProvider> GraphProjector<L> {
    pub fn new(labels: L) -> Self {
        Self {
            labels,
            edge_labeling: EdgeLabeling::default(),
        }
    }

    pub fn with_edge_labeling(mut self, edge_labeling: EdgeLabeling) -> Self {
        self.edge_labeling = edge_labeling;
        self
    }

    /// Projects a single flow tree.
    pub async fn project(&self, root: &FlowNode) -> FlowGraph {
        self.project_all(std::slice::from_ref(root)).await
    }

    /// Projects several flow trees into one combined graph.
    ///
    /// Each element is emitted once, while every parent/child pair still
    /// yields an edge, so shared dependencies keep all of their incoming edges.
    pub async fn project_all(&self, roots: &[FlowNode]) -> FlowGraph {
        let mut emitted: HashSet<&str> = HashSet::new();
        let mut node_order: Vec<&FlowNode> = Vec::new();
        let mut seen_edges: HashSet<GraphEdge> = HashSet::new();
        let mut edges: Vec<GraphEdge> = Vec::new();

        for root in roots {
            self.collect(root, &mut emitted, &mut node_order, &mut seen_edges, &mut edges);
        }

        let mut nodes = Vec::with_capacity(node_order.len());
        for flow_node in node_order {
            let label = self.labels.element_label(&flow_node.element_id).await;
            nodes.push(GraphNode {
                id: flow_node.element_id.to_string(),
                label,
                click_payload: navigate_payload(flow_node.element_id.as_str()),
            });
        }

        FlowGraph { nodes, edges }
    }

    fn collect<'t>(
        &self,
        flow_node: &'t FlowNode,
        emitted: &mut HashSet<&'t str>,
        node_order: &mut Vec<&'t FlowNode>,
        seen_edges: &mut HashSet<GraphEdge>,
        edges: &mut Vec<GraphEdge>,
    ) {
        // Emitted once, but every occurrence's subtree is still walked.
        if emitted.insert(flow_node.element_id.as_str()) {
            node_order.push(flow_node);
        }

        for child in &flow_node.children {
            self.collect(child, emitted, node_order, seen_edges, edges);

            let edge = GraphEdge {
                source_id: flow_node.element_id.to_string(),
                target_id: child.element_id.to_string(),
                label: self.edge_label(flow_node, child),
            };
            if seen_edges.insert(edge.clone()) {
                edges.push(edge);
            }
        }
    }

    fn edge_label(&self, parent: &FlowNode, child: &FlowNode) -> Option<String> {
        match self.edge_labeling {
            EdgeLabeling::ParentNodeType => parent_type_label(&parent.node_type),
            EdgeLabeling::LinkKind => child
                .via
                .as_deref()
                .map(|kind| self.labels.link_label(kind)),
        }
    }
}

fn parent_type_label(node_type: &str) -> Option<String> {
    let label = match node_type {
        node_types::ENDPOINT => "calls",
        node_types::HTTP_CLIENT => "http",
        node_types::REPOSITORY | node_types::DATABASE => "db",
        node_types::QUEUE | node_types::TOPIC => "message",
        _ => return None,
    };
    Some(label.to_string())
}

/// Opaque click payload: a `NavigateTo` command for the host.
fn navigate_payload(id: &str) -> String {
    json!({ "name": "NavigateTo", "parameters": { "Id": id } }).to_string()
}
