//! Config struct definition.

use super::types::*;
use serde::{Deserialize, Serialize};

/// Configuration for mlrelease.
///
/// This struct represents the contents of `.mlrelease.yaml`. Every section is
/// optional; unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Global version record and bump policy.
    pub version: VersionSection,

    /// Label matching for `version bump`.
    pub labels: LabelsSection,

    /// Component files rewritten by `components set-version`.
    pub components: ComponentsSection,

    /// Label sets for `actions`.
    pub actions: ActionsSection,

    /// Merge gates.
    pub gate: GateSection,

    /// Azure ML deployment.
    pub deploy: DeploySection,

    /// Outbound HTTP.
    pub http: HttpSection,
}
