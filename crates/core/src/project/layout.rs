use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::metadata::{parse_function_str, MetadataError, MetadataResult};
use crate::model::FunctionMetadata;

/// File name every function directory carries.
pub const FUNCTION_FILE_NAME: &str = "function.json";

/// Name used when a unit sits somewhere without a usable parent directory name.
pub const UNNAMED_FUNCTION: &str = "unnamed-function";

/// A configuration unit located on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSource {
    /// Function name, taken from the parent directory.
    pub name: String,
    /// Path to the `function.json` file.
    pub path: PathBuf,
}

impl FunctionSource {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self { name: function_name_for(&path), path }
    }

    /// Read and parse the unit, attaching its location to any error.
    pub fn load(&self) -> MetadataResult<FunctionMetadata> {
        let body = fs::read_to_string(&self.path)
            .map_err(|source| MetadataError::Io { path: self.path.clone(), source })?;
        parse_function_str(&self.name, &body).map_err(|err| err.at(&self.path))
    }
}

/// Infer the function name from the directory holding `unit_path`.
pub fn function_name_for(unit_path: &Path) -> String {
    unit_path
        .parent()
        .and_then(|dir| dir.file_name())
        .map(|os_str| match os_str.to_str() {
            Some(name) => name.to_string(),
            // Invalid bytes stay as `\xNN` escapes so distinct directories keep distinct names.
            None => format!("{os_str:?}").trim_matches('"').to_string(),
        })
        .unwrap_or_else(|| UNNAMED_FUNCTION.to_string())
}

/// Recursively find every `function.json` under `root`.
///
/// Entries are visited in file-name order so results do not depend on the
/// filesystem's directory ordering.
pub fn discover_functions(root: impl AsRef<Path>) -> MetadataResult<Vec<FunctionSource>> {
    let root = root.as_ref();
    let mut sources = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|err| {
            let path = err.path().unwrap_or(root).to_path_buf();
            let source = err
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
            MetadataError::Io { path, source }
        })?;

        if !entry.file_type().is_file() || entry.file_name() != FUNCTION_FILE_NAME {
            continue;
        }
        let source = FunctionSource::from_path(entry.into_path());
        if source.name == UNNAMED_FUNCTION {
            tracing::warn!(path = %source.path.display(), "unit has no usable function name");
        }
        sources.push(source);
    }

    tracing::debug!(root = %root.display(), count = sources.len(), "discovered function units");
    Ok(sources)
}

/// Discover and parse every unit under `root`, stopping at the first failure.
pub fn load_functions(root: impl AsRef<Path>) -> MetadataResult<Vec<FunctionMetadata>> {
    discover_functions(root)?.iter().map(FunctionSource::load).collect()
}
