pub mod commands;

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Canonicalize the path if possible, falling back to the given string
/// relative to the current working directory.
pub fn canonicalize_or_current(root: &str) -> Result<PathBuf> {
    let path = Path::new(root);
    if path == Path::new(".") {
        Ok(env::current_dir().context("Failed to get current directory")?)
    } else {
        // Paths that do not exist yet (e.g. output files) are joined onto the cwd.
        match path.canonicalize() {
            Ok(p) => Ok(p),
            Err(_) => {
                let cwd = env::current_dir().context("Failed to get current directory")?;
                Ok(cwd.join(path))
            }
        }
    }
}

/// Default output file for a rendered image: `output.<format>`.
///
/// Renderer suffixes such as `png:cairo` keep only the format part.
pub fn default_output_name(format: &str) -> String {
    let ext = format.split(':').next().filter(|e| !e.is_empty()).unwrap_or("out");
    format!("output.{ext}")
}
