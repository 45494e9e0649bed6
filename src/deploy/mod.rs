//! Deployment of training and inference assets.
//!
//! The layout under the source root is fixed:
//!
//! ```text
//! <root>/<scenario>/components/<unit>/env.yaml     -> environment
//! <root>/<scenario>/components/<unit>/config.yaml  -> component
//! <root>/<scenario>/pipeline.yaml                  -> component "<scenario>_pipeline"
//! ```
//!
//! [`plan`] turns that layout into an ordered list of steps; [`execute`]
//! runs them against a [`DeploymentClient`] and stops at the first failure.

mod azure;
mod definition;
mod payload;
mod target;

pub use azure::{AzureMlClient, AzureSettings, asset_base_url};
pub use definition::{AssetDefinition, AssetKind};
pub use target::{AzureTarget, Credentials, DeployMode, TargetParts};

use crate::error::{ReleaseError, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const ENVIRONMENT_FILE: &str = "env.yaml";
pub const COMPONENT_FILE: &str = "config.yaml";
pub const PIPELINE_FILE: &str = "pipeline.yaml";
const COMPONENTS_DIR: &str = "components";

/// Creates or updates assets on the ML platform.
pub trait DeploymentClient {
    fn deploy_environment(&self, definition: &AssetDefinition) -> anyhow::Result<()>;
    fn deploy_component(&self, definition: &AssetDefinition) -> anyhow::Result<()>;
}

/// One asset to deploy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployStep {
    /// Upper-cased scenario name, e.g. `TRAIN`.
    pub phase: String,
    /// Component directory name, or `<scenario>_pipeline`.
    pub unit: String,
    pub kind: AssetKind,
    pub path: PathBuf,
}

impl fmt::Display for DeployStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {} ({})",
            self.phase,
            self.kind,
            self.unit,
            self.path.display()
        )
    }
}

/// Result of a completed run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DeploySummary {
    pub environments: usize,
    pub components: usize,
}

/// Build the ordered deployment plan for `scenarios` under `source_root`.
///
/// Missing directories and files are skipped and logged.
pub fn plan(source_root: &Path, scenarios: &[String]) -> Result<Vec<DeployStep>> {
    let mut steps = Vec::new();

    for scenario in scenarios {
        let phase = scenario.to_uppercase();
        let scenario_dir = source_root.join(scenario);
        let components_dir = scenario_dir.join(COMPONENTS_DIR);

        if components_dir.is_dir() {
            for unit_dir in sorted_subdirs(&components_dir)? {
                let unit = unit_dir
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();

                for (file, kind) in [
                    (ENVIRONMENT_FILE, AssetKind::Environment),
                    (COMPONENT_FILE, AssetKind::Component),
                ] {
                    let path = unit_dir.join(file);
                    if path.is_file() {
                        steps.push(DeployStep {
                            phase: phase.clone(),
                            unit: unit.clone(),
                            kind,
                            path,
                        });
                    } else {
                        info!(phase = %phase, unit = %unit, "no {} found, skipping", file);
                    }
                }
            }
        } else {
            warn!(
                phase = %phase,
                path = %components_dir.display(),
                "components directory not found, skipping"
            );
        }

        let pipeline = scenario_dir.join(PIPELINE_FILE);
        if pipeline.is_file() {
            steps.push(DeployStep {
                phase: phase.clone(),
                unit: format!("{}_pipeline", scenario),
                kind: AssetKind::Component,
                path: pipeline,
            });
        } else {
            info!(phase = %phase, "no {} found, skipping", PIPELINE_FILE);
        }
    }

    Ok(steps)
}

fn sorted_subdirs(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| ReleaseError::Io(format!("failed to list {}: {}", dir.display(), e)))?;

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry
            .map_err(|e| ReleaseError::Io(format!("failed to list {}: {}", dir.display(), e)))?;
        let path = entry.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Deploy every step in order. The first failure aborts the run.
pub fn execute(steps: &[DeployStep], client: &dyn DeploymentClient) -> Result<DeploySummary> {
    let mut summary = DeploySummary::default();

    for step in steps {
        info!(phase = %step.phase, unit = %step.unit, "deploying {}", step.kind);

        let outcome = AssetDefinition::load(&step.path).and_then(|definition| {
            match step.kind {
                AssetKind::Environment => client.deploy_environment(&definition)?,
                AssetKind::Component => client.deploy_component(&definition)?,
            }
            Ok(definition)
        });

        match outcome {
            Ok(definition) => {
                info!(
                    phase = %step.phase,
                    name = %definition.name,
                    version = %definition.version,
                    "{} deployed",
                    step.kind
                );
                match step.kind {
                    AssetKind::Environment => summary.environments += 1,
                    AssetKind::Component => summary.components += 1,
                }
            }
            Err(e) => {
                return Err(ReleaseError::Deploy(format!(
                    "[{}] {} '{}' from {}: {:#}",
                    step.phase,
                    step.kind,
                    step.unit,
                    step.path.display(),
                    e
                )));
            }
        }
    }

    Ok(summary)
}
