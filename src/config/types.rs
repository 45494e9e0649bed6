//! Configuration sections and defaults for mlrelease.
//!
//! Each section maps to a top-level key of `.mlrelease.yaml` and to one
//! subcommand family.

use serde::{Deserialize, Serialize};

/// Default bump combinations: an environment label paired with a scenario label.
pub fn default_bump_combinations() -> Vec<Vec<String>> {
    [
        ["dev", "train"],
        ["dev", "inference"],
        ["prd", "train"],
        ["prd", "inference"],
        ["model", "dev"],
        ["model", "prd"],
    ]
    .iter()
    .map(|combo| combo.iter().map(|s| s.to_string()).collect())
    .collect()
}

/// Default allow-listed component roots.
pub fn default_component_roots() -> Vec<String> {
    vec!["src/train".to_string(), "src/inference".to_string()]
}

/// Default allow-listed component file names.
pub fn default_component_filenames() -> Vec<String> {
    vec![
        "config.yaml".to_string(),
        "env.yaml".to_string(),
        "pipeline.yaml".to_string(),
    ]
}

/// Default check runs that must succeed before merging.
pub fn default_required_checks() -> Vec<String> {
    vec!["Lint Check".to_string(), "Repository Tests".to_string()]
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// Default value functions for serde
pub(crate) fn default_version_file() -> String {
    "version.yaml".to_string()
}
pub(crate) fn default_production_label() -> String {
    "prd".to_string()
}
pub(crate) fn default_development_label() -> String {
    "dev".to_string()
}
pub(crate) fn default_version_field() -> String {
    "version".to_string()
}
pub(crate) fn default_api_url() -> String {
    "https://api.github.com".to_string()
}
pub(crate) fn default_min_approvals() -> u32 {
    1
}
pub(crate) fn default_source_root() -> String {
    "src".to_string()
}
pub(crate) fn default_scenarios() -> Vec<String> {
    strings(&["train", "inference"])
}
pub(crate) fn default_azure_api_version() -> String {
    "2024-04-01".to_string()
}
pub(crate) fn default_timeout_secs() -> u64 {
    30
}
pub(crate) fn default_true() -> bool {
    true
}

/// Global version record and bump policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionSection {
    /// Path of the version record, relative to the working directory.
    pub file: String,

    /// Label that bumps the major version.
    pub production_label: String,

    /// Label that bumps the minor version.
    pub development_label: String,

    /// A bump happens only when one of these label sets is fully present.
    pub bump_combinations: Vec<Vec<String>>,
}

impl Default for VersionSection {
    fn default() -> Self {
        Self {
            file: default_version_file(),
            production_label: default_production_label(),
            development_label: default_development_label(),
            bump_combinations: default_bump_combinations(),
        }
    }
}

/// Label matching behavior shared by commands that read PR labels.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelsSection {
    /// Trim and lower-case labels (and the combinations they are matched against).
    pub normalize: bool,
}

/// Component definition files whose version fields follow the global version.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentsSection {
    /// Directories walked recursively.
    pub roots: Vec<String>,

    /// File names (glob patterns allowed) that are rewritten.
    pub filenames: Vec<String>,

    /// Mapping key rewritten at every depth.
    pub field: String,
}

impl Default for ComponentsSection {
    fn default() -> Self {
        Self {
            roots: default_component_roots(),
            filenames: default_component_filenames(),
            field: default_version_field(),
        }
    }
}

/// Label sets deciding which pipeline jobs execute.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionsSection {
    /// Lower-case labels before evaluation.
    pub normalize: bool,

    pub environment_labels: Vec<String>,

    pub scenario_labels: Vec<String>,

    /// Environments that also publish to the shared registry.
    pub shared_registry_labels: Vec<String>,
}

impl Default for ActionsSection {
    fn default() -> Self {
        Self {
            normalize: default_true(),
            environment_labels: strings(&["dev", "qua", "prod"]),
            scenario_labels: strings(&["train", "inference", "utils", "tests"]),
            shared_registry_labels: strings(&["qua", "prod"]),
        }
    }
}

/// Merge gate settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GateSection {
    /// Base URL of the GitHub REST API.
    pub api_url: String,

    /// Minimum number of `APPROVED` reviews.
    pub min_approvals: u32,

    /// Check run names that must conclude with `success`.
    pub required_checks: Vec<String>,
}

impl Default for GateSection {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            min_approvals: default_min_approvals(),
            required_checks: default_required_checks(),
        }
    }
}

/// Deployment layout and Azure ML endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploySection {
    /// Directory holding one sub-directory per scenario.
    pub source_root: String,

    /// Scenario directory names, deployed in this order.
    pub scenarios: Vec<String>,

    /// `api-version` query parameter sent with every asset request.
    pub api_version: String,

    /// Overrides the derived management endpoint (useful for sovereign clouds).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl Default for DeploySection {
    fn default() -> Self {
        Self {
            source_root: default_source_root(),
            scenarios: default_scenarios(),
            api_version: default_azure_api_version(),
            endpoint: None,
        }
    }
}

/// Outbound HTTP settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSection {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HttpSection {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}
