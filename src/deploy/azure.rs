//! Azure ML asset client over the REST API.
//!
//! Authenticates with the OAuth2 client-credentials flow, then creates or
//! updates assets with `PUT .../{environments|components}/{name}/versions/{version}`.
//! Bodies are built by the `payload` module.

use super::payload::{component_body, environment_body};
use super::{AssetDefinition, AssetKind, AzureTarget, Credentials, DeploymentClient};
use anyhow::{Context, Result, anyhow};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const LOGIN_URL: &str = "https://login.microsoftonline.com";
const MANAGEMENT_URL: &str = "https://management.azure.com";
const TOKEN_SCOPE: &str = "https://management.azure.com/.default";
const USER_AGENT: &str = concat!("mlrelease/", env!("CARGO_PKG_VERSION"));

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Connection settings that do not come from the target itself.
#[derive(Debug, Clone)]
pub struct AzureSettings {
    pub api_version: String,
    /// Overrides the derived asset endpoint.
    pub endpoint: Option<String>,
    /// Overrides the login host.
    pub login_url: Option<String>,
    pub timeout: Duration,
}

/// Base URL under which the target's asset collections live.
pub fn asset_base_url(target: &AzureTarget, endpoint: Option<&str>) -> String {
    match target {
        AzureTarget::Workspace {
            subscription_id,
            resource_group,
            workspace,
        } => format!(
            "{}/subscriptions/{}/resourceGroups/{}/providers/Microsoft.MachineLearningServices/workspaces/{}",
            endpoint.unwrap_or(MANAGEMENT_URL).trim_end_matches('/'),
            subscription_id,
            resource_group,
            workspace
        ),
        AzureTarget::Registry { name, location } => {
            let host = match endpoint {
                Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
                None => format!("https://{}.api.azureml.ms", location),
            };
            format!("{}/registries/{}", host, name)
        }
    }
}

/// Authenticated Azure ML client bound to one target.
pub struct AzureMlClient {
    client: Client,
    base_url: String,
    api_version: String,
    token: String,
}

impl AzureMlClient {
    /// Acquire a token for `credentials` and bind to `target`.
    pub fn connect(credentials: &Credentials, target: &AzureTarget, settings: &AzureSettings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(settings.timeout)
            .build()
            .context("failed to build HTTP client")?;

        let login = settings
            .login_url
            .as_deref()
            .unwrap_or(LOGIN_URL)
            .trim_end_matches('/');
        let token = fetch_token(&client, login, credentials)?;

        Ok(Self {
            client,
            base_url: asset_base_url(target, settings.endpoint.as_deref()),
            api_version: settings.api_version.clone(),
            token,
        })
    }

    fn put_asset(&self, kind: AssetKind, definition: &AssetDefinition, body: &Value) -> Result<()> {
        let url = format!(
            "{}/{}/{}/versions/{}",
            self.base_url,
            kind.collection(),
            definition.name,
            definition.version
        );
        debug!(url = %url, "PUT");

        let resp = self
            .client
            .put(&url)
            .query(&[("api-version", self.api_version.as_str())])
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .with_context(|| format!("request for {} '{}' failed", kind, definition.name))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(anyhow!(
                "{} '{}' version {} rejected ({}): {}",
                kind,
                definition.name,
                definition.version,
                status,
                body
            ));
        }
        Ok(())
    }
}

fn fetch_token(client: &Client, login_url: &str, credentials: &Credentials) -> Result<String> {
    let url = format!("{}/{}/oauth2/v2.0/token", login_url, credentials.tenant_id);
    let resp = client
        .post(&url)
        .form(&[
            ("grant_type", "client_credentials"),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
            ("scope", TOKEN_SCOPE),
        ])
        .send()
        .context("failed to reach the Azure login endpoint")?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().unwrap_or_default();
        return Err(anyhow!("Azure authentication failed ({}): {}", status, body));
    }

    let token: TokenResponse = resp
        .json()
        .context("failed to parse Azure token response")?;
    Ok(token.access_token)
}

impl DeploymentClient for AzureMlClient {
    fn deploy_environment(&self, definition: &AssetDefinition) -> Result<()> {
        let body = environment_body(definition)?;
        self.put_asset(AssetKind::Environment, definition, &body)
    }

    fn deploy_component(&self, definition: &AssetDefinition) -> Result<()> {
        let body = component_body(definition)?;
        self.put_asset(AssetKind::Component, definition, &body)
    }
}
