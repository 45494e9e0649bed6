//! Persistence of the version record.

use super::Version;
use crate::error::Result;
use crate::fs::{YamlLoad, load_yaml, save_yaml};
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const VERSION_KEY: &str = "version";

/// Load/save access to the version of record.
pub trait VersionStore {
    /// Current version. Never fails: unreadable state reads as `0.0`.
    fn load(&self) -> Version;

    /// Overwrite the stored version.
    fn save(&self, version: Version) -> Result<()>;
}

/// A `{version: "X.Y"}` YAML file.
#[derive(Debug, Clone)]
pub struct VersionFile {
    path: PathBuf,
}

impl VersionFile {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl VersionStore for VersionFile {
    fn load(&self) -> Version {
        let document = match load_yaml(&self.path) {
            YamlLoad::Document(value) => value,
            YamlLoad::Missing => {
                debug!(path = %self.path.display(), "version file not found, starting at 0.0");
                return Version::ZERO;
            }
            YamlLoad::Empty => return Version::ZERO,
            YamlLoad::Unreadable(e) => {
                warn!(path = %self.path.display(), error = %e, "could not read version file, using 0.0");
                return Version::ZERO;
            }
        };

        let raw = match document.get(VERSION_KEY) {
            None => return Version::ZERO,
            Some(Value::String(s)) => s.clone(),
            // An unquoted `1.10` has already collapsed to the float 1.1.
            Some(Value::Number(n)) => {
                warn!(path = %self.path.display(), value = %n, "version must be a quoted \"X.Y\" string, using 0.0");
                return Version::ZERO;
            }
            Some(other) => {
                warn!(path = %self.path.display(), value = ?other, "version is not a string, using 0.0");
                return Version::ZERO;
            }
        };

        raw.parse().unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "invalid version format, using 0.0");
            Version::ZERO
        })
    }

    fn save(&self, version: Version) -> Result<()> {
        let mut record = Mapping::new();
        record.insert(
            Value::String(VERSION_KEY.to_string()),
            Value::String(version.to_string()),
        );
        save_yaml(&self.path, &Value::Mapping(record))
    }
}
