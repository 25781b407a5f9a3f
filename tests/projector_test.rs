mod common;

use async_trait::async_trait;
use flowslice::flow::{
    ArchitectureLabeler, FlowEngine, FlowProfile, GraphProjector, LabelProvider, DEFAULT_MAX_DEPTH,
};
use flowslice::schema::{attributes, element_kinds as ek, link_kinds, ArchitectureTypes};
use flowslice::slice::Slice;
use flowslice::types::{EdgeLabeling, ElementId, FlowNode};

use common::{build_slice, id};

/// Labels every element with its id in upper case.
struct UpperCaseLabels;

#[async_trait]
impl LabelProvider for UpperCaseLabels {
    async fn element_label(&self, id: &ElementId) -> String {
        id.as_str().to_uppercase()
    }
}

async fn flow(slice: &Slice, root: &str) -> FlowNode {
    FlowEngine::new(slice, FlowProfile::default())
        .compute_flow(&id(root), DEFAULT_MAX_DEPTH)
        .await
        .unwrap()
}

async fn orders_slice() -> Slice {
    build_slice(
        &[
            ("e", ek::ENDPOINT_CONTROLLER),
            ("r", ek::REPOSITORY),
            ("d", ek::DATABASE),
        ],
        &[("e", link_kinds::CALLS, "r"), ("r", link_kinds::QUERIES, "d")],
        &[
            ("e", attributes::VERB, "GET"),
            ("e", attributes::ROUTE, "/api/orders"),
            ("r", attributes::ENTITY, "Order"),
        ],
    )
    .await
}

// ---------------------------------------------------------------------------
// Single flow
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_project_chain() {
    let slice = orders_slice().await;
    let tree = flow(&slice, "e").await;

    let labeler = ArchitectureLabeler::new(&slice, ArchitectureTypes::new());
    let graph = GraphProjector::new(labeler).project(&tree).await;

    assert_eq!(graph.nodes.len(), 3);
    assert_eq!(graph.edges.len(), 2);
    assert_eq!(graph.node("e").unwrap().label, "GET /api/orders");
    assert_eq!(graph.node("r").unwrap().label, "Repository: Order");
    assert_eq!(graph.node("d").unwrap().label, "d");

    let e_to_r = graph.incoming("r");
    assert_eq!(e_to_r.len(), 1);
    assert_eq!(e_to_r[0].source_id, "e");
    assert_eq!(e_to_r[0].label.as_deref(), Some("calls"));
    let r_to_d = graph.incoming("d");
    assert_eq!(r_to_d[0].label.as_deref(), Some("db"));
}

#[tokio::test]
async fn test_click_payload_navigates_to_element() {
    let slice = orders_slice().await;
    let tree = flow(&slice, "e").await;
    let graph = GraphProjector::new(UpperCaseLabels).project(&tree).await;

    let node = graph.node("r").unwrap();
    assert_eq!(node.label, "R");
    let payload: serde_json::Value = serde_json::from_str(&node.click_payload).unwrap();
    assert_eq!(payload["name"], "NavigateTo");
    assert_eq!(payload["parameters"]["Id"], "r");
}

#[tokio::test]
async fn test_link_kind_edge_labels() {
    let slice = orders_slice().await;
    let tree = flow(&slice, "e").await;

    let labeler = ArchitectureLabeler::new(&slice, ArchitectureTypes::new());
    let graph = GraphProjector::new(labeler)
        .with_edge_labeling(EdgeLabeling::LinkKind)
        .project(&tree)
        .await;
    assert_eq!(graph.incoming("r")[0].label.as_deref(), Some("calls"));
    assert_eq!(graph.incoming("d")[0].label.as_deref(), Some("queries"));

    let plain = GraphProjector::new(UpperCaseLabels)
        .with_edge_labeling(EdgeLabeling::LinkKind)
        .project(&tree)
        .await;
    assert_eq!(plain.incoming("d")[0].label.as_deref(), Some("queries"));
}

#[tokio::test]
async fn test_leaf_under_unlabelled_parent_type_has_no_edge_label() {
    let slice = build_slice(
        &[("s", ek::APP_SERVICE), ("r", ek::REPOSITORY)],
        &[("s", link_kinds::CALLS, "r")],
        &[],
    )
    .await;
    let tree = flow(&slice, "s").await;

    let graph = GraphProjector::new(UpperCaseLabels).project(&tree).await;
    assert_eq!(graph.edges.len(), 1);
    assert_eq!(graph.edges[0].label, None);
}

#[tokio::test]
async fn test_project_cycle() {
    let slice = build_slice(
        &[("a", ek::APP_SERVICE), ("b", ek::APP_SERVICE)],
        &[("a", link_kinds::CALLS, "b"), ("b", link_kinds::CALLS, "a")],
        &[],
    )
    .await;
    let tree = flow(&slice, "a").await;

    let graph = GraphProjector::new(UpperCaseLabels).project(&tree).await;
    assert_eq!(graph.nodes.len(), 2);
    assert_eq!(graph.edges.len(), 2);
    assert_eq!(graph.incoming("a")[0].source_id, "b");
    assert_eq!(graph.incoming("b")[0].source_id, "a");
}

#[tokio::test]
async fn test_duplicate_edges_are_emitted_once() {
    let slice = build_slice(
        &[("e", ek::ENDPOINT_CONTROLLER), ("r", ek::REPOSITORY)],
        &[
            ("e", link_kinds::CALLS, "r"),
            ("e", link_kinds::USES_STORAGE, "r"),
        ],
        &[],
    )
    .await;
    let tree = flow(&slice, "e").await;
    assert_eq!(tree.children.len(), 2);

    let by_parent = GraphProjector::new(UpperCaseLabels).project(&tree).await;
    assert_eq!(by_parent.edges.len(), 1);

    let by_link = GraphProjector::new(UpperCaseLabels)
        .with_edge_labeling(EdgeLabeling::LinkKind)
        .project(&tree)
        .await;
    assert_eq!(by_link.edges.len(), 2);
}

// ---------------------------------------------------------------------------
// Combined graphs
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_shared_dependency_keeps_all_incoming_edges() {
    let slice = build_slice(
        &[
            ("e1", ek::ENDPOINT_CONTROLLER),
            ("e2", ek::ENDPOINT_MINIMAL_API),
            ("r", ek::REPOSITORY),
            ("d", ek::DATABASE),
        ],
        &[
            ("e1", link_kinds::CALLS, "r"),
            ("e2", link_kinds::CALLS, "r"),
            ("r", link_kinds::QUERIES, "d"),
        ],
        &[],
    )
    .await;
    let flows = vec![flow(&slice, "e1").await, flow(&slice, "e2").await];

    let graph = GraphProjector::new(UpperCaseLabels).project_all(&flows).await;
    let ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["e1", "r", "d", "e2"]);
    assert_eq!(graph.edges.len(), 3);

    let mut sources: Vec<&str> = graph
        .incoming("r")
        .iter()
        .map(|e| e.source_id.as_str())
        .collect();
    sources.sort();
    assert_eq!(sources, vec!["e1", "e2"]);
    assert_eq!(graph.incoming("d").len(), 1);
}

#[tokio::test]
async fn test_project_nothing() {
    let graph = GraphProjector::new(UpperCaseLabels).project_all(&[]).await;
    assert!(graph.nodes.is_empty());
    assert!(graph.edges.is_empty());
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_architecture_labels() {
    let slice = build_slice(
        &[
            ("route_only", ek::ENDPOINT_MINIMAL_API),
            ("bare", ek::ENDPOINT_CONTROLLER),
            ("client", ek::HTTP_CLIENT),
            ("client_bare", ek::HTTP_CLIENT),
            ("table", ek::DB_TABLE),
            ("ctx", ek::EF_DB_CONTEXT),
            ("pub", ek::MESSAGE_PUBLISHER),
            ("msg", ek::MESSAGE_CONTRACT),
            ("handler", ek::CQRS_HANDLER),
            ("worker", ek::BACKGROUND_SERVICE),
            ("svc", ek::APP_SERVICE),
        ],
        &[],
        &[
            ("route_only", attributes::ROUTE, "/health"),
            ("client", attributes::VERB, "POST"),
            ("client", attributes::ROUTE, "/payments"),
            ("table", attributes::TABLE, "orders"),
            ("ctx", attributes::ENTITY, "OrdersContext"),
            ("pub", attributes::CONTRACT, "OrderPlaced"),
            ("msg", attributes::CONTRACT, "OrderPlaced"),
        ],
    )
    .await;
    let labeler = ArchitectureLabeler::new(&slice, ArchitectureTypes::new());

    let cases = [
        ("route_only", "/health"),
        ("bare", "Endpoint"),
        ("client", "HTTP POST → /payments"),
        ("client_bare", "HTTP Client"),
        ("table", "Table: orders"),
        ("ctx", "DbContext: OrdersContext"),
        ("pub", "Publisher: OrderPlaced"),
        ("msg", "Message: OrderPlaced"),
        ("handler", "CQRS Handler"),
        ("worker", "Background Service"),
        ("svc", "svc"),
        ("unknown", "unknown"),
    ];
    for (element, expected) in cases {
        assert_eq!(labeler.element_label(&id(element)).await, expected, "label of {}", element);
    }
}

#[tokio::test]
async fn test_link_labels() {
    assert_eq!(UpperCaseLabels.link_label("uses_cache"), "uses cache");

    let slice = build_slice(&[], &[], &[]).await;
    let labeler = ArchitectureLabeler::new(&slice, ArchitectureTypes::new());
    assert_eq!(labeler.link_label(link_kinds::SENDS_REQUEST), "sends HTTP request");
    assert_eq!(labeler.link_label(link_kinds::WRITES_TO), "writes to");
    assert_eq!(labeler.link_label("something_else"), "links to");
}

#[tokio::test]
async fn test_repeated_element_keeps_its_expanded_subtree() {
    let slice = build_slice(
        &[
            ("a", ek::APP_SERVICE),
            ("b", ek::APP_SERVICE),
            ("x", ek::REPOSITORY),
            ("y", ek::DATABASE),
        ],
        &[
            ("a", link_kinds::CALLS, "b"),
            ("a", link_kinds::CALLS, "x"),
            ("b", link_kinds::CALLS, "x"),
            ("x", link_kinds::QUERIES, "y"),
        ],
        &[],
    )
    .await;
    let tree = FlowEngine::new(&slice, FlowProfile::default())
        .compute_flow(&id("a"), 2)
        .await
        .unwrap();
    let order: Vec<&str> = tree.iter().map(|n| n.element_id.as_str()).collect();
    assert_eq!(order, vec!["a", "b", "x", "x", "y"]);

    let graph = GraphProjector::new(UpperCaseLabels).project(&tree).await;
    let ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "x", "y"]);
    assert_eq!(graph.edges.len(), 4);
    assert_eq!(graph.incoming("y")[0].source_id, "x");
    assert_eq!(graph.incoming("x").len(), 2);
}
