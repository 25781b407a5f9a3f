use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::algebra::ElementType;

/// Opaque, globally unique identifier of a graph element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ElementId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// An element id paired with the type it was declared under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    pub element_type: ElementType,
}

impl Element {
    pub fn new(id: impl Into<ElementId>, element_type: ElementType) -> Self {
        Self {
            id: id.into(),
            element_type,
        }
    }
}

/// One node of a traversal-produced dependency tree.
///
/// Built once per traversal and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowNode {
    pub element_id: ElementId,
    /// Coarse classification label, e.g. `"Endpoint"` or `"Repository"`.
    pub node_type: String,
    pub attributes: BTreeMap<String, String>,
    /// Kind of the link this node was reached through; `None` for the root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub via: Option<String>,
    pub children: Vec<FlowNode>,
}

impl FlowNode {
    /// Total number of nodes in this subtree, including `self`.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(FlowNode::size).sum::<usize>()
    }

    /// Number of levels below this node.
    pub fn height(&self) -> usize {
        self.children
            .iter()
            .map(|child| child.height() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Pre-order iterator over this subtree.
    pub fn iter(&self) -> impl Iterator<Item = &FlowNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }
}

/// A node of the flattened, renderable graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    /// Opaque payload for the host's navigation system.
    pub click_payload: String,
}

/// A directed edge of the flattened, renderable graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source_id: String,
    pub target_id: String,
    pub label: Option<String>,
}

/// Flat `(nodes, edges)` projection of one or more flow trees.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl FlowGraph {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn incoming(&self, id: &str) -> Vec<&GraphEdge> {
        self.edges.iter().filter(|e| e.target_id == id).collect()
    }
}

/// How edges of a projected graph are labelled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeLabeling {
    /// Derived from the parent node's classified type.
    #[default]
    ParentNodeType,
    /// Derived from the kind of link that was followed.
    LinkKind,
}

/// Output format for CLI results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Markdown,
    Json,
    Graph,
    Mermaid,
}

#[allow(clippy::should_implement_trait)]
impl OutputFormat {
    /// Parses a string into an `OutputFormat`, returning `None` for unrecognized values.
    pub fn from_str(s: &str) -> Option<OutputFormat> {
        match s {
            "markdown" | "md" => Some(OutputFormat::Markdown),
            "json" => Some(OutputFormat::Json),
            "graph" => Some(OutputFormat::Graph),
            "mermaid" => Some(OutputFormat::Mermaid),
            _ => None,
        }
    }
}

/// Generates a deterministic element ID from an element kind and name.
///
/// The ID format is `"kind:32hexchars"` where the hex portion is the first 32
/// characters of the SHA-256 hash of the input components.
pub fn generate_element_id(kind: &str, name: &str) -> ElementId {
    let input = format!("{}:{}", kind, name);
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let hash = hasher.finalize();
    let hex_str = hex::encode(hash);
    ElementId(format!("{}:{}", kind, &hex_str[..32]))
}
