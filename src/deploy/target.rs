//! Where assets are deployed and with which identity.

use crate::error::{ReleaseError, Result};
use clap::ValueEnum;
use std::fmt;

/// Deployment mode selected by `AZURE_MODE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DeployMode {
    /// A single Azure ML workspace.
    #[default]
    Workspace,
    /// An Azure ML registry shared across workspaces.
    #[value(name = "shared_registry", alias = "shared-registry")]
    SharedRegistry,
}

impl DeployMode {
    /// Parse an `AZURE_MODE` value. Case and surrounding whitespace are
    /// ignored, and a blank value selects the workspace.
    pub fn parse_setting(raw: &str) -> std::result::Result<Self, String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(Self::default());
        }
        <Self as ValueEnum>::from_str(raw, true)
            .map_err(|_| format!("unknown mode '{}' (expected workspace or shared_registry)", raw))
    }
}

/// Service principal credentials.
#[derive(Clone)]
pub struct Credentials {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn from_parts(
        tenant_id: Option<String>,
        client_id: Option<String>,
        client_secret: Option<String>,
    ) -> Result<Self> {
        match (non_empty(tenant_id), non_empty(client_id), non_empty(client_secret)) {
            (Some(tenant_id), Some(client_id), Some(client_secret)) => Ok(Self {
                tenant_id,
                client_id,
                client_secret,
            }),
            _ => Err(ReleaseError::UserError(
                "AZURE_TENANT_ID, AZURE_CLIENT_ID and AZURE_CLIENT_SECRET must be set".to_string(),
            )),
        }
    }
}

/// The Azure ML asset store receiving the deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AzureTarget {
    Workspace {
        subscription_id: String,
        resource_group: String,
        workspace: String,
    },
    Registry {
        name: String,
        location: String,
    },
}

/// Raw target settings as they arrive from flags or the environment.
#[derive(Debug, Clone, Default)]
pub struct TargetParts {
    pub subscription_id: Option<String>,
    pub resource_group: Option<String>,
    pub workspace: Option<String>,
    pub registry_name: Option<String>,
    pub registry_location: Option<String>,
}

impl AzureTarget {
    /// Select the target for `mode`, requiring that mode's settings.
    pub fn select(mode: DeployMode, parts: TargetParts) -> Result<Self> {
        match mode {
            DeployMode::SharedRegistry => {
                match (non_empty(parts.registry_name), non_empty(parts.registry_location)) {
                    (Some(name), Some(location)) => Ok(AzureTarget::Registry { name, location }),
                    _ => Err(ReleaseError::UserError(
                        "for 'shared_registry' mode, AZURE_REGISTRY_NAME and AZURE_REGISTRY_LOCATION must be set"
                            .to_string(),
                    )),
                }
            }
            DeployMode::Workspace => match (
                non_empty(parts.subscription_id),
                non_empty(parts.resource_group),
                non_empty(parts.workspace),
            ) {
                (Some(subscription_id), Some(resource_group), Some(workspace)) => {
                    Ok(AzureTarget::Workspace {
                        subscription_id,
                        resource_group,
                        workspace,
                    })
                }
                _ => Err(ReleaseError::UserError(
                    "for 'workspace' mode, AZURE_SUBSCRIPTION_ID, AZURE_RESOURCE_GROUP and AZURE_WORKSPACE_NAME must be set"
                        .to_string(),
                )),
            },
        }
    }
}

impl fmt::Display for AzureTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AzureTarget::Workspace {
                subscription_id,
                resource_group,
                workspace,
            } => write!(
                f,
                "workspace {} (RG: {}, Sub: {})",
                workspace, resource_group, subscription_id
            ),
            AzureTarget::Registry { name, location } => {
                write!(f, "shared registry {} @ {}", name, location)
            }
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
