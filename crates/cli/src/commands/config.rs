use anyhow::{bail, Result};
use funcviz_core::project::{save_config, VisualizerConfig};

use crate::canonicalize_or_current;

/// Write a default visualizer config to `path` (JSON, or YAML by extension).
pub fn init_config_command(path: &str, force: bool) -> Result<()> {
    let config_path = canonicalize_or_current(path)?;
    if config_path.exists() && !force {
        bail!("Config already exists at {} (use --force to overwrite)", config_path.display());
    }

    let config = VisualizerConfig::default();
    save_config(&config_path, &config)?;

    println!("Wrote visualizer config:");
    println!("  Path: {}", config_path.display());
    println!("  Default connection: {}", config.default_connection);
    println!("  HTTP mode: {}", config.http_mode.as_str());
    println!("  Palette: {}", config.palette.as_str());
    println!("  Render format: {}", config.renderer.format);
    Ok(())
}
