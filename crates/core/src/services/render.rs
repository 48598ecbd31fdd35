use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

/// Environment variable naming the Graphviz `dot` executable.
pub const DOT_BIN_ENV: &str = "FUNCVIZ_DOT_BIN";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Graphviz renderer not found at {0}")]
    MissingBinary(PathBuf),
    #[error("Unsupported output format '{0}'")]
    UnsupportedFormat(String),
    #[error("Failed to spawn renderer {}: {source}", .binary.display())]
    Spawn {
        binary: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Renderer exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
    #[error("Renderer I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Something that turns a DOT file into an image.
pub trait Renderer {
    fn render(&self, dot_file: &Path, format: &str, output: &Path) -> Result<(), RenderError>;
    fn name(&self) -> &'static str;
}

/// Renderer backed by the Graphviz `dot` executable.
#[derive(Debug, Clone, Default)]
pub struct GraphvizRenderer {
    /// Explicit executable path; `None` resolves through the environment.
    pub dot_path: Option<PathBuf>,
}

impl GraphvizRenderer {
    pub fn new(dot_path: Option<PathBuf>) -> Self {
        Self { dot_path }
    }

    pub fn binary(&self) -> PathBuf {
        self.dot_path.clone().unwrap_or_else(resolve_dot_path)
    }
}

/// `FUNCVIZ_DOT_BIN` if set, otherwise plain `dot` looked up on PATH.
pub fn resolve_dot_path() -> PathBuf {
    std::env::var_os(DOT_BIN_ENV).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("dot"))
}

/// Formats are passed straight to `-T`, so only plain tokens like `svg` or `png:cairo`.
pub fn validate_format(format: &str) -> Result<(), RenderError> {
    let valid = !format.is_empty()
        && format.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, ':' | '_' | '-'));
    if valid {
        Ok(())
    } else {
        Err(RenderError::UnsupportedFormat(format.to_string()))
    }
}

impl Renderer for GraphvizRenderer {
    fn render(&self, dot_file: &Path, format: &str, output: &Path) -> Result<(), RenderError> {
        validate_format(format)?;
        let binary = self.binary();

        let result = Command::new(&binary)
            .arg(format!("-T{format}"))
            .arg(dot_file)
            .arg("-o")
            .arg(output)
            .output();
        let out = match result {
            Ok(out) => out,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(RenderError::MissingBinary(binary));
            }
            Err(source) => return Err(RenderError::Spawn { binary, source }),
        };

        if !out.status.success() {
            return Err(RenderError::Failed {
                status: out.status.to_string(),
                stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
            });
        }

        tracing::info!(
            renderer = %binary.display(),
            format,
            output = %output.display(),
            "rendered graph"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "graphviz"
    }
}

/// Render in-memory DOT text through a temporary file.
pub fn render_dot_text(
    renderer: &dyn Renderer,
    dot_text: &str,
    format: &str,
    output: &Path,
) -> Result<(), RenderError> {
    let mut file = tempfile::Builder::new()
        .prefix("funcviz-")
        .suffix(".dot")
        .tempfile()
        .map_err(|source| RenderError::Io { path: std::env::temp_dir(), source })?;
    if let Err(source) = file.write_all(dot_text.as_bytes()).and_then(|_| file.flush()) {
        return Err(RenderError::Io { path: file.path().to_path_buf(), source });
    }
    renderer.render(file.path(), format, output)
}
