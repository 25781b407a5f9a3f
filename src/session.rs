use std::path::Path;

use crate::algebra::ElementType;
use crate::config::{load_config, FlowSliceConfig};
use crate::errors::Result;
use crate::facts::FactSnapshot;
use crate::flow::{ArchitectureLabeler, FlowEngine, GraphProjector};
use crate::schema::ArchitectureTypes;
use crate::slice::{Slice, SliceBuilder, SliceContributor};
use crate::types::{Element, ElementId, FlowGraph, FlowNode};

/// Central orchestrator: one built slice plus the configuration used to
/// traverse and render it.
pub struct FlowSession {
    slice: Slice,
    types: ArchitectureTypes,
    config: FlowSliceConfig,
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

impl FlowSession {
    /// Builds a session from any set of contributors.
    pub async fn build(
        contributors: &[&dyn SliceContributor],
        config: FlowSliceConfig,
    ) -> Result<Self> {
        let mut builder = SliceBuilder::new();
        for contributor in contributors {
            builder.add_contributor(*contributor);
        }
        let slice = builder.build().await?;
        Ok(Self {
            slice,
            types: ArchitectureTypes::new(),
            config,
        })
    }

    /// Loads a fact snapshot file and the project configuration under `project_root`.
    pub async fn open(facts_path: &Path, project_root: &Path) -> Result<Self> {
        let config = load_config(project_root)?;
        let snapshot = FactSnapshot::load(facts_path)?;
        Self::build(&[&snapshot], config).await
    }
}

// ---------------------------------------------------------------------------
// Query delegation
// ---------------------------------------------------------------------------

impl FlowSession {
    pub fn slice(&self) -> &Slice {
        &self.slice
    }

    pub fn types(&self) -> &ArchitectureTypes {
        &self.types
    }

    pub fn config(&self) -> &FlowSliceConfig {
        &self.config
    }

    /// Root elements of the configured root kinds, or of `kind` when given.
    pub async fn roots(&self, kind: Option<&str>) -> Vec<Element> {
        let root_type = match kind {
            Some(kind) => ArchitectureTypes::element_kind(kind),
            None => self
                .config
                .root_kinds
                .iter()
                .map(|k| ArchitectureTypes::element_kind(k))
                .fold(ElementType::empty(), |acc, ty| acc | ty),
        };
        self.slice.get_root_elements(&root_type).await
    }

    /// Computes the flow tree from `root`; `max_depth` defaults to the config.
    pub async fn compute_flow(&self, root: &ElementId, max_depth: Option<usize>) -> Result<FlowNode> {
        let profile = self.config.flow_profile(&self.types);
        let depth = max_depth.unwrap_or(profile.max_depth);
        FlowEngine::new(&self.slice, profile)
            .compute_flow(root, depth)
            .await
    }

    /// Projects flow trees into one renderable graph.
    pub async fn project(&self, flows: &[FlowNode]) -> FlowGraph {
        let labeler = ArchitectureLabeler::new(&self.slice, self.types.clone());
        GraphProjector::new(labeler)
            .with_edge_labeling(self.config.edge_labels)
            .project_all(flows)
            .await
    }
}
