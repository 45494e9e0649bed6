//! Batch rewrite over allow-listed component files.
//!
//! Every file is handled in isolation: a file that cannot be read, parsed or
//! written is reported and skipped, and the batch moves on.

use super::rewrite_field;
use crate::config::ComponentsSection;
use crate::error::{ReleaseError, Result};
use crate::fs::{YamlLoad, load_yaml, save_yaml};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde_yaml::Value;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

/// What happened to one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// At least one field was rewritten and the file was saved.
    Updated,
    /// No field present, or every field already held the value.
    Unchanged,
    /// Null or empty document.
    Empty,
    /// Read, parse or write failure.
    Unreadable(String),
}

/// Per-file outcomes of a batch, in visit order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub files: Vec<(PathBuf, FileOutcome)>,
}

impl BatchReport {
    pub fn updated_count(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Updated))
    }

    pub fn failed_count(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Unreadable(_)))
    }

    fn count(&self, pred: impl Fn(&FileOutcome) -> bool) -> usize {
        self.files.iter().filter(|(_, o)| pred(o)).count()
    }
}

/// Rewrites one field across every allow-listed file under a set of roots.
#[derive(Debug)]
pub struct RewriteBatch {
    roots: Vec<PathBuf>,
    filenames: GlobSet,
    field: String,
    dry_run: bool,
}

impl RewriteBatch {
    /// Build a batch from the `components` config section, with roots
    /// resolved against `base`.
    pub fn from_config(section: &ComponentsSection, base: &Path) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &section.filenames {
            let glob = Glob::new(pattern).map_err(|e| {
                ReleaseError::UserError(format!("invalid file name pattern '{}': {}", pattern, e))
            })?;
            builder.add(glob);
        }
        let filenames = builder
            .build()
            .map_err(|e| ReleaseError::UserError(format!("invalid file name patterns: {}", e)))?;

        Ok(Self {
            roots: section.roots.iter().map(|r| base.join(r)).collect(),
            filenames,
            field: section.field.clone(),
            dry_run: false,
        })
    }

    /// Override the rewritten field.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    /// Report changes without saving files.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Rewrite `field` to `new_value` in every matching file.
    pub fn run(&self, new_value: &str) -> BatchReport {
        let value = Value::String(new_value.to_string());
        let mut report = BatchReport::default();

        for file in self.candidate_files() {
            let outcome = self.rewrite_file(&file, &value);
            match &outcome {
                FileOutcome::Updated if self.dry_run => {
                    info!(path = %file.display(), "would update {} to {}", self.field, new_value)
                }
                FileOutcome::Updated => {
                    info!(path = %file.display(), "updated {} to {}", self.field, new_value)
                }
                FileOutcome::Unchanged => {
                    info!(path = %file.display(), "no '{}' to change", self.field)
                }
                FileOutcome::Empty => info!(path = %file.display(), "empty document, skipped"),
                FileOutcome::Unreadable(e) => {
                    warn!(path = %file.display(), error = %e, "skipped unreadable file")
                }
            }
            report.files.push((file, outcome));
        }

        report
    }

    fn candidate_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for root in &self.roots {
            if !root.is_dir() {
                warn!(root = %root.display(), "component root not found, skipping");
                continue;
            }
            for entry in WalkDir::new(root).sort_by_file_name() {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        warn!(error = %e, "could not walk directory entry");
                        continue;
                    }
                };
                if entry.file_type().is_file() && self.filenames.is_match(entry.file_name()) {
                    files.push(entry.into_path());
                }
            }
        }
        files
    }

    fn rewrite_file(&self, path: &Path, value: &Value) -> FileOutcome {
        let mut document = match load_yaml(path) {
            YamlLoad::Document(document) => document,
            YamlLoad::Empty => return FileOutcome::Empty,
            YamlLoad::Missing => return FileOutcome::Unreadable("file disappeared".to_string()),
            YamlLoad::Unreadable(e) => return FileOutcome::Unreadable(e),
        };

        if !rewrite_field(&mut document, &self.field, value) {
            return FileOutcome::Unchanged;
        }
        if self.dry_run {
            return FileOutcome::Updated;
        }
        match save_yaml(path, &document) {
            Ok(()) => FileOutcome::Updated,
            Err(e) => FileOutcome::Unreadable(e.to_string()),
        }
    }
}
