//! Function-app directories on disk and visualizer configuration.
//!
//! - `layout`: discovery of `function.json` units and their function names.
//! - `config`: `VisualizerConfig`, loaded from JSON or YAML.

pub mod config;
pub mod layout;

use std::path::Path;

pub use config::{
    load_config, save_config, RendererConfig, VisualizerConfig, DEFAULT_CONFIG_FILE,
};
pub use layout::{
    discover_functions, function_name_for, load_functions, FunctionSource, FUNCTION_FILE_NAME,
};

use crate::graph::{build_graph, GraphOptions};
use crate::metadata::MetadataResult;

/// Build DOT text for every function found under `root`.
///
/// Nothing is returned if any unit fails to load; a partial graph would hide
/// the broken function.
pub fn dot_from_directory(root: impl AsRef<Path>, options: &GraphOptions) -> MetadataResult<String> {
    let functions = load_functions(root)?;
    Ok(build_graph(&functions, options).to_dot())
}
