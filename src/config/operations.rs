//! Config loading, validation, and utility operations.

use super::model::Config;
use crate::error::{ReleaseError, Result};
use globset::Glob;
use std::path::Path;

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(ReleaseError::UserError)` - Read error, parse error or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            ReleaseError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Load config from a YAML file, falling back to defaults when the file
    /// does not exist. A file that exists but is invalid is still an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Parse config from a YAML string.
    ///
    /// An empty document yields the default configuration.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = if yaml.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(yaml)
                .map_err(|e| ReleaseError::UserError(format!("failed to parse config YAML: {}", e)))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - version markers and the version file must be non-empty
    /// - component roots, file names and field must be non-empty; file names must be valid globs
    /// - `gate.min_approvals` must be positive and `gate.api_url` must be an http(s) URL
    /// - `gate.required_checks` must name at least one check
    /// - at least one deploy scenario
    /// - `http.timeout_secs` must be positive
    pub fn validate(&self) -> Result<()> {
        if self.version.file.trim().is_empty() {
            return Err(invalid("version.file must not be empty"));
        }
        if self.version.production_label.trim().is_empty()
            || self.version.development_label.trim().is_empty()
        {
            return Err(invalid(
                "version.production_label and version.development_label must not be empty",
            ));
        }

        if self.components.roots.is_empty() {
            return Err(invalid("components.roots must list at least one directory"));
        }
        if self.components.filenames.is_empty() {
            return Err(invalid("components.filenames must list at least one file name"));
        }
        for pattern in &self.components.filenames {
            Glob::new(pattern).map_err(|e| {
                invalid(&format!(
                    "components.filenames entry '{}' is not a valid pattern: {}",
                    pattern, e
                ))
            })?;
        }
        if self.components.field.is_empty() {
            return Err(invalid("components.field must not be empty"));
        }

        if self.gate.min_approvals == 0 {
            return Err(invalid("gate.min_approvals must be greater than 0"));
        }
        if self.gate.required_checks.iter().all(|name| name.trim().is_empty()) {
            return Err(invalid("gate.required_checks must name at least one check"));
        }
        if !(self.gate.api_url.starts_with("http://") || self.gate.api_url.starts_with("https://"))
        {
            return Err(invalid(&format!(
                "gate.api_url must be an http(s) URL (found '{}')",
                self.gate.api_url
            )));
        }

        if self.deploy.scenarios.is_empty() {
            return Err(invalid("deploy.scenarios must list at least one scenario"));
        }

        if self.http.timeout_secs == 0 {
            return Err(invalid("http.timeout_secs must be greater than 0"));
        }

        Ok(())
    }
}

fn invalid(message: &str) -> ReleaseError {
    ReleaseError::UserError(format!("config validation failed: {}", message))
}
