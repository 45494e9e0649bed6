//! Configuration model for mlrelease.
//!
//! This module defines the Config struct that represents `.mlrelease.yaml`.
//! It supports forward-compatible YAML parsing (unknown fields are ignored),
//! sensible defaults for every field, and validation of config values.

mod model;
mod operations;
pub mod types;


// Re-export public API
pub use model::Config;
pub use types::{
    ActionsSection, ComponentsSection, DeploySection, GateSection, HttpSection, LabelsSection,
    VersionSection,
};

/// Default config file path, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".mlrelease.yaml";
