//! Step outputs for the CI orchestrator.
//!
//! GitHub Actions exposes a file path in `GITHUB_OUTPUT`; every `key=value`
//! line appended to it becomes a step output (`steps.<id>.outputs.<key>`).
//! When no output file is configured, outputs are only logged.

use crate::error::{ReleaseError, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable holding the output file path.
pub const GITHUB_OUTPUT_VAR: &str = "GITHUB_OUTPUT";

const MULTILINE_DELIMITER: &str = "MLRELEASE_EOF";

/// Appends step outputs to the CI output file, if any.
#[derive(Debug, Clone, Default)]
pub struct StepOutputs {
    path: Option<PathBuf>,
}

impl StepOutputs {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Append `pairs` in order. One open/write per call.
    pub fn append<V: AsRef<str>>(&self, pairs: &[(&str, V)]) -> Result<()> {
        let Some(path) = &self.path else {
            for (key, value) in pairs {
                debug!(key, value = value.as_ref(), "no CI output file; output not recorded");
            }
            return Ok(());
        };

        let mut content = String::new();
        for (key, value) in pairs {
            content.push_str(&format_output(key, value.as_ref()));
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                ReleaseError::Io(format!(
                    "failed to open CI output file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        file.write_all(content.as_bytes()).map_err(|e| {
            ReleaseError::Io(format!(
                "failed to write CI output file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}

/// Render one output, using the heredoc form for multi-line values.
fn format_output(key: &str, value: &str) -> String {
    if value.contains('\n') {
        format!(
            "{key}<<{delim}\n{value}\n{delim}\n",
            delim = MULTILINE_DELIMITER
        )
    } else {
        format!("{}={}\n", key, value)
    }
}

/// Render a boolean the way workflow expressions compare it.
pub fn flag(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}
