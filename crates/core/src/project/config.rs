use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::graph::{GraphOptions, HttpMode, Palette};
use crate::model::DEFAULT_CONNECTION;

/// Config file the CLI looks for when none is given explicitly.
pub const DEFAULT_CONFIG_FILE: &str = "funcviz.json";

/// Settings for invoking the Graphviz renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Explicit path to the `dot` executable. Falls back to `FUNCVIZ_DOT_BIN`, then `dot`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dot_path: Option<String>,
    /// Output format passed to `dot -T`.
    pub format: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self { dot_path: None, format: "svg".to_string() }
    }
}

/// Serializable visualizer configuration.
///
/// Every field is optional on disk; missing ones take their defaults. Stored
/// as JSON, or YAML when the file ends in `.yaml`/`.yml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizerConfig {
    /// Schema/config version. This is about the config format, not the tool.
    pub config_version: String,
    /// Connection setting assumed for bindings that do not declare one.
    pub default_connection: String,
    pub http_mode: HttpMode,
    /// Include the consumer group in event hub node identities.
    pub event_hub_consumer_group: bool,
    pub palette: Palette,
    pub font: String,
    pub renderer: RendererConfig,
    /// Timeout for downloading remote repository archives.
    pub fetch_timeout_secs: u64,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            config_version: "0.1.0".to_string(),
            default_connection: DEFAULT_CONNECTION.to_string(),
            http_mode: HttpMode::default(),
            event_hub_consumer_group: false,
            palette: Palette::default(),
            font: "Segoe UI".to_string(),
            renderer: RendererConfig::default(),
            fetch_timeout_secs: 60,
        }
    }
}

impl VisualizerConfig {
    /// Graph options described by this config.
    pub fn graph_options(&self) -> GraphOptions {
        GraphOptions {
            default_connection: self.default_connection.clone(),
            http_mode: self.http_mode,
            event_hub_consumer_group: self.event_hub_consumer_group,
            palette: self.palette,
            font: self.font.clone(),
        }
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(path.extension().and_then(|e| e.to_str()), Some("yaml" | "yml"))
}

/// Load a config file from disk.
pub fn load_config(path: &Path) -> Result<VisualizerConfig> {
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config at {}", path.display()))?;
    let config = if is_yaml(path) {
        serde_yaml::from_str(&body).context("Failed to parse config YAML")?
    } else {
        serde_json::from_str(&body).context("Failed to parse config JSON")?
    };
    tracing::debug!(path = %path.display(), "loaded visualizer config");
    Ok(config)
}

/// Write a config file, choosing the format from the extension.
pub fn save_config(path: &Path, config: &VisualizerConfig) -> Result<()> {
    let body = if is_yaml(path) {
        serde_yaml::to_string(config).context("Failed to serialize config to YAML")?
    } else {
        serde_json::to_string_pretty(config).context("Failed to serialize config to JSON")?
    };
    std::fs::write(path, body)
        .with_context(|| format!("Failed to write config at {}", path.display()))?;
    Ok(())
}
