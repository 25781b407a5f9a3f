use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SliceError};
use crate::flow::{FlowProfile, DEFAULT_MAX_DEPTH};
use crate::schema::{attributes, element_kinds, link_kinds, ArchitectureTypes};
use crate::types::EdgeLabeling;

/// Name of the configuration file stored inside the `.flowslice` directory.
pub const CONFIG_FILENAME: &str = "config.json";

/// Name of the hidden directory used to store flowslice metadata.
pub const FLOWSLICE_DIR: &str = ".flowslice";

/// Configuration for flow computation and rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowSliceConfig {
    /// Schema version of the configuration.
    pub version: u32,
    /// Default traversal depth bound.
    pub max_depth: usize,
    /// Link kinds followed at every node, in exploration order.
    pub follow_links: Vec<String>,
    /// Attributes resolved for every flow node.
    pub attributes: Vec<String>,
    /// How edges of projected graphs are labelled.
    #[serde(default)]
    pub edge_labels: EdgeLabeling,
    /// Element kinds offered as flow roots.
    pub root_kinds: Vec<String>,
}

impl Default for FlowSliceConfig {
    fn default() -> Self {
        Self {
            version: 1,
            max_depth: DEFAULT_MAX_DEPTH,
            follow_links: link_kinds::FLOW_DEFAULTS
                .iter()
                .map(|k| k.to_string())
                .collect(),
            attributes: attributes::FLOW_DEFAULTS
                .iter()
                .map(|a| a.to_string())
                .collect(),
            edge_labels: EdgeLabeling::default(),
            root_kinds: vec![
                element_kinds::ENDPOINT_CONTROLLER.to_string(),
                element_kinds::ENDPOINT_MINIMAL_API.to_string(),
                element_kinds::BACKGROUND_SERVICE.to_string(),
            ],
        }
    }
}

impl FlowSliceConfig {
    /// Builds the traversal profile described by this configuration.
    pub fn flow_profile(&self, types: &ArchitectureTypes) -> FlowProfile {
        FlowProfile {
            link_types: self
                .follow_links
                .iter()
                .map(|kind| ArchitectureTypes::link_kind(kind))
                .collect(),
            attribute_names: self.attributes.clone(),
            node_classification: types.node_classification(),
            max_depth: self.max_depth,
        }
    }
}

/// Returns the path to the `.flowslice` directory within the given project root.
pub fn get_flowslice_dir(project_root: &Path) -> PathBuf {
    project_root.join(FLOWSLICE_DIR)
}

/// Returns the path to the configuration file within the `.flowslice` directory.
pub fn get_config_path(project_root: &Path) -> PathBuf {
    get_flowslice_dir(project_root).join(CONFIG_FILENAME)
}

/// Loads the configuration from disk, or the defaults if there is none.
pub fn load_config(project_root: &Path) -> Result<FlowSliceConfig> {
    let config_path = get_config_path(project_root);

    if !config_path.exists() {
        return Ok(FlowSliceConfig::default());
    }

    let contents = fs::read_to_string(&config_path).map_err(|e| SliceError::Config {
        message: format!(
            "failed to read config file '{}': {}",
            config_path.display(),
            e
        ),
    })?;

    let config: FlowSliceConfig =
        serde_json::from_str(&contents).map_err(|e| SliceError::Config {
            message: format!(
                "failed to parse config file '{}': {}",
                config_path.display(),
                e
            ),
        })?;

    Ok(config)
}

/// Saves the configuration to disk using an atomic write.
///
/// Writes to a temporary file first and then renames it into place.
pub fn save_config(project_root: &Path, config: &FlowSliceConfig) -> Result<()> {
    let flowslice_dir = get_flowslice_dir(project_root);
    fs::create_dir_all(&flowslice_dir).map_err(|e| SliceError::Config {
        message: format!(
            "failed to create directory '{}': {}",
            flowslice_dir.display(),
            e
        ),
    })?;

    let config_path = get_config_path(project_root);
    let tmp_path = config_path.with_extension("tmp");

    let json = serde_json::to_string_pretty(config).map_err(|e| SliceError::Config {
        message: format!("failed to serialize config: {}", e),
    })?;

    fs::write(&tmp_path, &json).map_err(|e| SliceError::Config {
        message: format!(
            "failed to write temporary config file '{}': {}",
            tmp_path.display(),
            e
        ),
    })?;

    fs::rename(&tmp_path, &config_path).map_err(|e| SliceError::Config {
        message: format!(
            "failed to rename '{}' to '{}': {}",
            tmp_path.display(),
            config_path.display(),
            e
        ),
    })?;

    Ok(())
}
