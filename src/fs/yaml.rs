//! YAML document load/save with soft failure reporting.

use crate::error::{ReleaseError, Result};
use serde_yaml::Value;
use std::path::Path;

/// Outcome of reading a YAML file.
///
/// Callers decide how soft each case is; none of them is an error by itself.
#[derive(Debug)]
pub enum YamlLoad {
    /// The file does not exist.
    Missing,
    /// The file could not be read or parsed.
    Unreadable(String),
    /// The document is null or an empty mapping/sequence/string.
    Empty,
    /// A non-empty document.
    Document(Value),
}

/// Read and parse a single-document YAML file.
pub fn load_yaml(path: &Path) -> YamlLoad {
    if !path.exists() {
        return YamlLoad::Missing;
    }

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => return YamlLoad::Unreadable(e.to_string()),
    };

    match serde_yaml::from_str::<Value>(&content) {
        Ok(value) if is_empty_document(&value) => YamlLoad::Empty,
        Ok(value) => YamlLoad::Document(value),
        Err(e) => YamlLoad::Unreadable(e.to_string()),
    }
}

/// Serialize `value` and atomically replace `path` with it.
///
/// Mapping key order is preserved.
pub fn save_yaml(path: &Path, value: &Value) -> Result<()> {
    let content = serde_yaml::to_string(value).map_err(|e| {
        ReleaseError::Io(format!(
            "failed to serialize YAML for '{}': {}",
            path.display(),
            e
        ))
    })?;
    super::atomic_write_file(path, &content)
}

fn is_empty_document(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Mapping(m) => m.is_empty(),
        Value::Sequence(s) => s.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
