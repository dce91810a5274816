//! Shared utilities for command handlers

use crate::error::{Error, Result};
use lazymap_core::Shape;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Whether a path names a YAML file
pub fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s == "yaml" || s == "yml")
        .unwrap_or(false)
}

/// Read a file, reporting a missing path as [`Error::FileNotFound`]
pub fn read_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_to_string(path)?;
    debug!(path = %path.display(), bytes = content.len(), "Read input file");
    Ok(content)
}

/// Parse a JSON or YAML file, chosen by extension
pub fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = read_file(path)?;
    if is_yaml(path) {
        serde_yaml::from_str(&content).map_err(|_| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "YAML".to_string(),
        })
    } else {
        serde_json::from_str(&content).map_err(|_| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "JSON".to_string(),
        })
    }
}

/// Load a shape file
pub fn load_shape(path: &Path) -> Result<Shape> {
    let shape: Shape = load_document(path)?;
    debug!(fields = shape.fields.len(), "Loaded shape");
    Ok(shape)
}

/// Load a record file, which must hold an object
pub fn load_values(path: &Path) -> Result<serde_json::Map<String, Value>> {
    match load_document::<Value>(path)? {
        Value::Object(map) => Ok(map),
        _ => Err(Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "object".to_string(),
        }),
    }
}
