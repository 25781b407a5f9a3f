use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use tracing::{debug, warn};

use crate::algebra::{ElementType, LinkType};
use crate::errors::Result;
use crate::schema::{attributes, node_types, ArchitectureTypes};
use crate::slice::Slice;
use crate::types::{ElementId, FlowNode};

/// Default bound on traversal depth.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// What a traversal follows, resolves and how it classifies nodes.
#[derive(Debug, Clone)]
pub struct FlowProfile {
    /// Link types explored at every node, in this order.
    pub link_types: Vec<LinkType>,
    /// Attributes resolved for every node; absent ones are omitted.
    pub attribute_names: Vec<String>,
    /// Ordered `(label, type)` table; the first matching entry wins.
    pub node_classification: Vec<(String, ElementType)>,
    pub max_depth: usize,
}

impl FlowProfile {
    /// The architecture flow: calls, HTTP, storage and messaging links.
    pub fn architecture(types: &ArchitectureTypes) -> Self {
        Self {
            link_types: types.flow_link_types(),
            attribute_names: attributes::FLOW_DEFAULTS
                .iter()
                .map(|name| name.to_string())
                .collect(),
            node_classification: types.node_classification(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Default for FlowProfile {
    fn default() -> Self {
        Self::architecture(&ArchitectureTypes::new())
    }
}

/// Cooperative cancellation for a running traversal.
///
/// Once cancelled, nodes reached afterwards are returned as leaves without
/// attributes and no further link types are explored, which truncates the
/// tree at the current frontier.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Walks semantic links from a root element and builds a bounded flow tree.
pub struct FlowEngine<'a> {
    slice: &'a Slice,
    profile: FlowProfile,
}

impl<'a> FlowEngine<'a> {
    pub fn new(slice: &'a Slice, profile: FlowProfile) -> Self {
        Self { slice, profile }
    }

    pub fn profile(&self) -> &FlowProfile {
        &self.profile
    }

    /// Computes the flow tree rooted at `root`, bounded by `max_depth`.
    ///
    /// Only an unknown root fails. Missing attributes, elements without links
    /// and failing link providers just shorten the tree.
    pub async fn compute_flow(&self, root: &ElementId, max_depth: usize) -> Result<FlowNode> {
        self.compute_flow_with_cancel(root, max_depth, &CancellationFlag::new())
            .await
    }

    /// Like [`FlowEngine::compute_flow`], stopping expansion once `cancel` fires.
    pub async fn compute_flow_with_cancel(
        &self,
        root: &ElementId,
        max_depth: usize,
        cancel: &CancellationFlag,
    ) -> Result<FlowNode> {
        self.slice.get_element_type(root)?;
        let mut visited: HashSet<ElementId> = HashSet::new();
        let tree = self
            .expand(root.clone(), None, 0, max_depth, &mut visited, cancel)
            .await;
        debug!(root = %root, nodes = tree.size(), expanded = visited.len(), "computed flow");
        Ok(tree)
    }

    /// Computes one independent flow per root element of `root_type`.
    pub async fn compute_all_flows(
        &self,
        root_type: &ElementType,
        max_depth: usize,
    ) -> Result<Vec<FlowNode>> {
        let roots = self.slice.get_root_elements(root_type).await;
        let mut flows = Vec::with_capacity(roots.len());
        for root in roots {
            flows.push(self.compute_flow(&root.id, max_depth).await?);
        }
        Ok(flows)
    }

    /// Classifies an element type using the profile's ordered table.
    pub fn classify(&self, element_type: &ElementType) -> String {
        self.profile
            .node_classification
            .iter()
            .find(|(_, ty)| element_type.any_subset_of(ty))
            .map(|(label, _)| label.clone())
            .unwrap_or_else(|| node_types::UNKNOWN.to_string())
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    /// Depth-first expansion. `visited` is shared by the whole traversal and
    /// an element is marked before its children are explored, so a revisit
    /// from a cycle or a shared dependency comes back as a leaf.
    fn expand<'b>(
        &'b self,
        id: ElementId,
        via: Option<String>,
        depth: usize,
        max_depth: usize,
        visited: &'b mut HashSet<ElementId>,
        cancel: &'b CancellationFlag,
    ) -> BoxFuture<'b, FlowNode> {
        async move {
            let node_type = match self.slice.get_element_type(&id) {
                Ok(ty) => self.classify(&ty),
                Err(_) => node_types::UNKNOWN.to_string(),
            };
            // Past cancellation no attribute I/O is started.
            let attributes = if cancel.is_cancelled() {
                BTreeMap::new()
            } else {
                self.resolve_attributes(&id).await
            };

            let mut node = FlowNode {
                element_id: id,
                node_type,
                attributes,
                via,
                children: Vec::new(),
            };

            if visited.contains(&node.element_id) || depth >= max_depth || cancel.is_cancelled() {
                return node;
            }
            visited.insert(node.element_id.clone());

            for link_type in &self.profile.link_types {
                if cancel.is_cancelled() {
                    break;
                }
                let explorer = self.slice.get_link_explorer(link_type);
                let targets = match explorer.get_target_elements(&node.element_id).await {
                    Ok(targets) => targets,
                    Err(e) => {
                        warn!(element = %node.element_id, link = %link_type, error = %e, "link exploration failed");
                        continue;
                    }
                };
                let via_kind = link_type
                    .required_value(attributes::KIND)
                    .map(str::to_string);

                for target in targets {
                    let child = self
                        .expand(
                            target.id,
                            via_kind.clone(),
                            depth + 1,
                            max_depth,
                            &mut *visited,
                            cancel,
                        )
                        .await;
                    node.children.push(child);
                }
            }

            node
        }
        .boxed()
    }

    async fn resolve_attributes(&self, id: &ElementId) -> BTreeMap<String, String> {
        let mut resolved = BTreeMap::new();
        for name in &self.profile.attribute_names {
            let provider = self.slice.get_attribute_provider(name);
            match provider.try_resolve(id).await {
                Ok(Some(value)) => {
                    resolved.insert(name.clone(), value);
                }
                Ok(None) => {}
                Err(e) if e.is_not_applicable() => {}
                Err(e) => {
                    debug!(element = %id, attribute = %name, error = %e, "attribute omitted");
                }
            }
        }
        resolved
    }
}
