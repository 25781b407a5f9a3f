use flowslice::config::*;
use flowslice::flow::DEFAULT_MAX_DEPTH;
use flowslice::schema::{attributes, element_kinds, link_kinds, ArchitectureTypes};
use flowslice::types::EdgeLabeling;
use tempfile::TempDir;

#[test]
fn test_default_config_follows_architecture_links() {
    let config = FlowSliceConfig::default();
    assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
    assert_eq!(config.follow_links.first().map(String::as_str), Some(link_kinds::CALLS));
    assert!(config.follow_links.iter().any(|l| l == link_kinds::QUERIES));
    assert!(config.attributes.iter().any(|a| a == attributes::ROUTE));
    assert!(config
        .root_kinds
        .iter()
        .any(|k| k == element_kinds::ENDPOINT_CONTROLLER));
    assert_eq!(config.edge_labels, EdgeLabeling::ParentNodeType);
}

#[test]
fn test_save_and_load_config() {
    let dir = TempDir::new().unwrap();
    let config = FlowSliceConfig {
        max_depth: 4,
        edge_labels: EdgeLabeling::LinkKind,
        ..FlowSliceConfig::default()
    };
    save_config(dir.path(), &config).unwrap();
    assert!(get_config_path(dir.path()).exists());

    let loaded = load_config(dir.path()).unwrap();
    assert_eq!(config, loaded);
}

#[test]
fn test_missing_config_loads_defaults() {
    let dir = TempDir::new().unwrap();
    let loaded = load_config(dir.path()).unwrap();
    assert_eq!(loaded, FlowSliceConfig::default());
}

#[test]
fn test_malformed_config_is_an_error() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(get_flowslice_dir(dir.path())).unwrap();
    std::fs::write(get_config_path(dir.path()), "{ broken").unwrap();

    let err = load_config(dir.path()).unwrap_err();
    assert!(err.to_string().contains("failed to parse config file"));
}

#[test]
fn test_flowslice_dir_location() {
    let dir = TempDir::new().unwrap();
    let fs_dir = get_flowslice_dir(dir.path());
    assert!(fs_dir.ends_with(".flowslice"));
    assert!(get_config_path(dir.path()).ends_with(".flowslice/config.json"));
}

#[test]
fn test_flow_profile_from_config() {
    let types = ArchitectureTypes::new();
    let config = FlowSliceConfig {
        max_depth: 3,
        follow_links: vec![link_kinds::PUBLISHES.to_string(), link_kinds::CALLS.to_string()],
        ..FlowSliceConfig::default()
    };

    let profile = config.flow_profile(&types);
    assert_eq!(profile.max_depth, 3);
    assert_eq!(profile.link_types, vec![types.publishes.clone(), types.calls.clone()]);
    assert_eq!(profile.attribute_names, config.attributes);
    assert_eq!(profile.node_classification, types.node_classification());
}

#[test]
fn test_edge_labels_default_when_absent() {
    let json = r#"{
        "version": 1,
        "max_depth": 2,
        "follow_links": ["calls"],
        "attributes": [],
        "root_kinds": ["endpoint.controller"]
    }"#;
    let config: FlowSliceConfig = serde_json::from_str(json).unwrap();
    assert_eq!(config.edge_labels, EdgeLabeling::ParentNodeType);
    assert_eq!(config.max_depth, 2);
}

#[test]
fn test_config_serde_roundtrip() {
    let config = FlowSliceConfig::default();
    let json = serde_json::to_string_pretty(&config).unwrap();
    assert!(json.contains("\"edge_labels\": \"parent_node_type\""));
    let deserialized: FlowSliceConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(config, deserialized);
}
