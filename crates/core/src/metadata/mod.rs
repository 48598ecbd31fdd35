//! Parsing of `function.json` configuration units into `FunctionMetadata`.
//!
//! A unit is a JSON object with a non-empty `bindings` array. Each binding
//! needs a string `type`; every other key is kept as a raw string field.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;

use crate::model::{Binding, BindingDirection, BindingFields, FunctionMetadata};

/// Error raised while turning a configuration unit into metadata.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// The unit is not well-formed JSON.
    #[error("Failed to parse configuration for function '{function}'{}: {source}", location(.path))]
    Parse {
        function: String,
        path: Option<PathBuf>,
        #[source]
        source: serde_json::Error,
    },

    /// The unit parsed but does not have the expected shape.
    #[error("Invalid configuration for function '{function}'{}: {reason}", location(.path))]
    Format { function: String, path: Option<PathBuf>, reason: String },

    /// The unit (or the directory holding it) could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn location(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => format!(" at {}", p.display()),
        None => String::new(),
    }
}

impl MetadataError {
    /// Attach the on-disk location of the unit to parse/format errors.
    pub fn at(self, unit_path: &Path) -> Self {
        match self {
            MetadataError::Parse { function, source, .. } => {
                MetadataError::Parse { function, path: Some(unit_path.to_path_buf()), source }
            }
            MetadataError::Format { function, reason, .. } => {
                MetadataError::Format { function, path: Some(unit_path.to_path_buf()), reason }
            }
            other => other,
        }
    }

    /// Name of the function the error refers to, when known.
    pub fn function(&self) -> Option<&str> {
        match self {
            MetadataError::Parse { function, .. } | MetadataError::Format { function, .. } => {
                Some(function)
            }
            MetadataError::Io { .. } => None,
        }
    }
}

/// Convenience result type for metadata parsing.
pub type MetadataResult<T> = Result<T, MetadataError>;

/// Parse a unit from JSON text. A leading UTF-8 byte order mark is ignored.
pub fn parse_function_str(function_name: &str, body: &str) -> MetadataResult<FunctionMetadata> {
    let body = body.strip_prefix('\u{feff}').unwrap_or(body);
    let value: Value = serde_json::from_str(body).map_err(|source| MetadataError::Parse {
        function: function_name.to_string(),
        path: None,
        source,
    })?;
    parse_function(function_name, &value)
}

/// Parse an already-decoded unit.
pub fn parse_function(function_name: &str, unit: &Value) -> MetadataResult<FunctionMetadata> {
    let format_error = |reason: String| MetadataError::Format {
        function: function_name.to_string(),
        path: None,
        reason,
    };

    let object =
        unit.as_object().ok_or_else(|| format_error("configuration must be a JSON object".into()))?;

    let declared = match object.get("bindings") {
        Some(Value::Array(items)) if !items.is_empty() => items,
        _ => return Err(format_error("At least one binding must be declared.".into())),
    };

    let mut metadata = FunctionMetadata::new(function_name);
    for (index, item) in declared.iter().enumerate() {
        let binding = item
            .as_object()
            .ok_or_else(|| format_error(format!("binding #{index} is not an object")))
            .and_then(|map| {
                parse_binding(map)
                    .ok_or_else(|| format_error(format!("binding #{index} has no string 'type'")))
            })?;
        metadata.bindings.push(binding);
    }

    metadata.excluded = object
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case("excluded"))
        .and_then(|(_, value)| value.as_bool())
        .unwrap_or(false);

    tracing::debug!(
        function = function_name,
        bindings = metadata.bindings.len(),
        excluded = metadata.excluded,
        "parsed function metadata"
    );
    Ok(metadata)
}

fn parse_binding(map: &Map<String, Value>) -> Option<Binding> {
    let kind = map.get("type")?.as_str()?;
    let declared_direction = map.get("direction").and_then(Value::as_str);

    let mut fields = BindingFields::default();
    for (key, value) in map {
        if key == "type" || key == "direction" {
            continue;
        }
        if let Some(raw) = raw_string(value) {
            fields.insert(key, raw);
        }
    }

    Some(Binding::new(kind, BindingDirection::classify(kind, declared_direction), fields))
}

/// Strings are kept verbatim; other scalars keep their JSON text. Nulls drop.
fn raw_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
