use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::Args;
use funcviz_core::graph::{GraphOptions, HttpMode, Palette};
use funcviz_core::model::FunctionMetadata;
use funcviz_core::project::{load_config, load_functions, VisualizerConfig, DEFAULT_CONFIG_FILE};
use funcviz_core::services::{AcquiredInput, Acquirer, InputSource, DEFAULT_BRANCH};

use crate::canonicalize_or_current;

/// Where function configuration is read from, plus the config file to apply.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Function-app directory to scan for `function.json` files. Defaults to the current directory.
    #[arg(long, conflicts_with_all = ["zip", "repo"])]
    pub dir: Option<String>,

    /// Zip archive of a function app.
    #[arg(long, conflicts_with = "repo")]
    pub zip: Option<String>,

    /// Repository URL; `<url>/archive/<branch>.zip` is downloaded.
    #[arg(long)]
    pub repo: Option<String>,

    /// Branch to download with `--repo`.
    #[arg(long, requires = "repo")]
    pub branch: Option<String>,

    /// Visualizer config (JSON, or YAML by extension). Defaults to `./funcviz.json` when present.
    #[arg(long)]
    pub config: Option<String>,
}

impl InputArgs {
    /// Input rooted at a local directory.
    pub fn directory(dir: impl Into<String>) -> Self {
        Self { dir: Some(dir.into()), ..Self::default() }
    }

    /// Resolve the command-line selection into an [`InputSource`].
    pub fn source(&self) -> Result<InputSource> {
        if let Some(url) = &self.repo {
            let branch = self.branch.clone().unwrap_or_else(|| DEFAULT_BRANCH.to_string());
            return Ok(InputSource::RemoteRepository { url: url.clone(), branch });
        }
        if let Some(zip) = &self.zip {
            return Ok(InputSource::ZipArchive(canonicalize_or_current(zip)?));
        }
        let dir = self.dir.as_deref().unwrap_or(".");
        Ok(InputSource::Directory(canonicalize_or_current(dir)?))
    }
}

/// Per-invocation overrides of the configured graph style.
#[derive(Args, Debug, Clone, Default)]
pub struct StyleArgs {
    /// How HTTP triggers are drawn: `aggregate` (one table) or `node`.
    #[arg(long)]
    pub http_mode: Option<String>,

    /// Node colour scheme: `blues` or `classic`.
    #[arg(long)]
    pub palette: Option<String>,
}

impl StyleArgs {
    /// Apply the overrides on top of the configured options.
    pub fn apply(&self, mut options: GraphOptions) -> Result<GraphOptions> {
        if let Some(mode) = &self.http_mode {
            options.http_mode = HttpMode::parse(mode)
                .ok_or_else(|| anyhow!("Unknown HTTP mode '{mode}' (expected aggregate or node)"))?;
        }
        if let Some(palette) = &self.palette {
            options.palette = Palette::parse(palette)
                .ok_or_else(|| anyhow!("Unknown palette '{palette}' (expected blues or classic)"))?;
        }
        Ok(options)
    }
}

/// Load the explicit config, or `./funcviz.json` if it exists, or the defaults.
pub fn resolve_config(config: Option<&str>) -> Result<VisualizerConfig> {
    match config {
        Some(path) => load_config(&canonicalize_or_current(path)?),
        None => {
            let fallback = Path::new(DEFAULT_CONFIG_FILE);
            if fallback.is_file() {
                load_config(fallback)
            } else {
                Ok(VisualizerConfig::default())
            }
        }
    }
}

/// Materialize the selected input as a local directory tree.
pub fn acquire_input(input: &InputArgs, config: &VisualizerConfig) -> Result<AcquiredInput> {
    let source = input.source()?;
    tracing::debug!(input = %describe(&source), "acquiring input");
    let acquirer = Acquirer::new(Duration::from_secs(config.fetch_timeout_secs));
    acquirer
        .acquire(&source)
        .with_context(|| format!("Failed to acquire input {}", describe(&source)))
}

/// Acquire the input and parse every function it contains.
pub fn load_input_functions(
    input: &InputArgs,
    config: &VisualizerConfig,
) -> Result<Vec<FunctionMetadata>> {
    let acquired = acquire_input(input, config)?;
    load_functions(acquired.root()).with_context(|| {
        format!("Failed to load function configuration from {}", acquired.root().display())
    })
}

pub fn describe(source: &InputSource) -> String {
    match source {
        InputSource::Directory(dir) => format!("directory {}", dir.display()),
        InputSource::ZipArchive(path) => format!("archive {}", path.display()),
        InputSource::RemoteRepository { url, branch } => format!("repository {url} ({branch})"),
    }
}
