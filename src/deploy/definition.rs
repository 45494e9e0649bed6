//! Environment and component definition files.

use anyhow::{Context, Result, anyhow};
use serde_yaml::Value;
use std::fmt;
use std::path::{Path, PathBuf};

/// Kind of asset a definition file describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Environment,
    /// A command component or a pipeline component.
    Component,
}

impl AssetKind {
    /// Collection segment of the asset URL.
    pub fn collection(self) -> &'static str {
        match self {
            AssetKind::Environment => "environments",
            AssetKind::Component => "components",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKind::Environment => write!(f, "environment"),
            AssetKind::Component => write!(f, "component"),
        }
    }
}

/// A parsed definition, ready to send.
#[derive(Debug, Clone)]
pub struct AssetDefinition {
    pub path: PathBuf,
    pub name: String,
    pub version: String,
    /// The whole document as JSON.
    pub document: serde_json::Value,
}

impl AssetDefinition {
    /// Load a YAML definition. `name` and `version` are required.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_yaml(path, &content)
    }

    pub fn from_yaml(path: &Path, content: &str) -> Result<Self> {
        let document: Value = serde_yaml::from_str(content)
            .with_context(|| format!("invalid YAML in {}", path.display()))?;
        if !document.is_mapping() {
            return Err(anyhow!("{} is not a YAML mapping", path.display()));
        }

        let name = scalar(&document, "name")
            .ok_or_else(|| anyhow!("{} has no 'name'", path.display()))?;
        let version = scalar(&document, "version")
            .ok_or_else(|| anyhow!("{} has no 'version'", path.display()))?;
        let json = serde_json::to_value(&document)
            .with_context(|| format!("{} cannot be represented as JSON", path.display()))?;

        Ok(Self {
            path: path.to_path_buf(),
            name,
            version,
            document: json,
        })
    }
}

fn scalar(document: &Value, key: &str) -> Option<String> {
    match document.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
