//! Implementation of the `mlrelease deploy` command.

use super::CommandContext;
use crate::cli::DeployArgs;
use crate::deploy::{
    self, AzureMlClient, AzureSettings, AzureTarget, Credentials, DeployStep, TargetParts,
};
use crate::error::{ReleaseError, Result};
use std::path::PathBuf;
use tracing::info;

/// Execute the `deploy` command.
pub fn cmd_deploy(ctx: &CommandContext, args: DeployArgs) -> Result<()> {
    let source_root = args
        .source_root
        .clone()
        .unwrap_or_else(|| PathBuf::from(&ctx.config.deploy.source_root));

    if args.dry_run {
        let steps = deploy::plan(&source_root, &ctx.config.deploy.scenarios)?;
        print_plan(&steps);
        return Ok(());
    }

    let (credentials, target) = resolve_target(&args)?;
    info!(target = %target, "deploying");

    let steps = deploy::plan(&source_root, &ctx.config.deploy.scenarios)?;
    if steps.is_empty() {
        info!(root = %source_root.display(), "nothing to deploy");
        println!("Nothing to deploy under {}", source_root.display());
        return Ok(());
    }

    let settings = AzureSettings {
        api_version: ctx.config.deploy.api_version.clone(),
        endpoint: ctx.config.deploy.endpoint.clone(),
        login_url: None,
        timeout: ctx.http_timeout(),
    };
    let client = AzureMlClient::connect(&credentials, &target, &settings)
        .map_err(|e| ReleaseError::Deploy(format!("could not connect to {}: {:#}", target, e)))?;

    let summary = deploy::execute(&steps, &client)?;
    println!(
        "Deployed {} environment(s) and {} component(s) to {}",
        summary.environments, summary.components, target
    );
    Ok(())
}

/// Credentials and target for the selected mode. Missing values are usage
/// errors.
fn resolve_target(args: &DeployArgs) -> Result<(Credentials, AzureTarget)> {
    let credentials = Credentials::from_parts(
        args.tenant_id.clone(),
        args.client_id.clone(),
        args.client_secret.clone(),
    )?;
    let target = AzureTarget::select(
        args.mode,
        TargetParts {
            subscription_id: args.subscription_id.clone(),
            resource_group: args.resource_group.clone(),
            workspace: args.workspace_name.clone(),
            registry_name: args.registry_name.clone(),
            registry_location: args.registry_location.clone(),
        },
    )?;
    Ok((credentials, target))
}

fn print_plan(steps: &[DeployStep]) {
    if steps.is_empty() {
        println!("Nothing to deploy");
        return;
    }
    for step in steps {
        println!("{}", step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deploy::{AssetKind, DeployMode};
    use crate::test_support::{DirGuard, create_release_repo};
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    fn args(mode: DeployMode, dry_run: bool) -> DeployArgs {
        DeployArgs {
            mode,
            source_root: None,
            dry_run,
            tenant_id: None,
            client_id: None,
            client_secret: None,
            subscription_id: None,
            resource_group: None,
            workspace_name: None,
            registry_name: None,
            registry_location: None,
        }
    }

    fn with_credentials(mut args: DeployArgs) -> DeployArgs {
        args.tenant_id = Some("tenant".to_string());
        args.client_id = Some("client".to_string());
        args.client_secret = Some("secret".to_string());
        args
    }

    #[test]
    fn test_dry_run_needs_no_credentials() {
        let temp_dir = TempDir::new().unwrap();
        let env = temp_dir.path().join("train/components/prep/env.yaml");
        fs::create_dir_all(env.parent().unwrap()).unwrap();
        fs::write(&env, "name: prep-env\nversion: '1.0'\n").unwrap();

        let mut dry = args(DeployMode::Workspace, true);
        dry.source_root = Some(temp_dir.path().to_path_buf());
        cmd_deploy(&CommandContext::default(), dry).unwrap();
    }

    #[test]
    fn test_missing_credentials_is_usage_error() {
        let err = cmd_deploy(&CommandContext::default(), args(DeployMode::Workspace, false))
            .unwrap_err();
        assert!(matches!(err, ReleaseError::UserError(_)));
        assert!(err.to_string().contains("AZURE_CLIENT_SECRET"));
    }

    #[test]
    fn test_registry_mode_requires_registry_settings() {
        let mut registry = with_credentials(args(DeployMode::SharedRegistry, false));
        registry.subscription_id = Some("sub".to_string());
        let err = cmd_deploy(&CommandContext::default(), registry).unwrap_err();
        assert!(err.to_string().contains("AZURE_REGISTRY_NAME"));
    }

    #[test]
    fn test_resolve_workspace_target() {
        let mut workspace = with_credentials(args(DeployMode::Workspace, false));
        workspace.subscription_id = Some("sub".to_string());
        workspace.resource_group = Some("rg".to_string());
        workspace.workspace_name = Some("ws".to_string());

        let (credentials, target) = resolve_target(&workspace).unwrap();
        assert_eq!(credentials.client_id, "client");
        assert!(matches!(target, AzureTarget::Workspace { .. }));
    }

    #[test]
    fn test_empty_tree_does_not_connect() {
        let temp_dir = TempDir::new().unwrap();
        let mut workspace = with_credentials(args(DeployMode::Workspace, false));
        workspace.subscription_id = Some("sub".to_string());
        workspace.resource_group = Some("rg".to_string());
        workspace.workspace_name = Some("ws".to_string());
        workspace.source_root = Some(temp_dir.path().join("src"));

        cmd_deploy(&CommandContext::default(), workspace).unwrap();
    }

    #[test]
    #[serial]
    fn test_plan_from_default_source_root() {
        let temp_dir = create_release_repo();
        let _guard = DirGuard::new(temp_dir.path());
        let ctx = CommandContext::default();

        let steps = deploy::plan(
            &PathBuf::from(&ctx.config.deploy.source_root),
            &ctx.config.deploy.scenarios,
        )
        .unwrap();
        let units: Vec<(&str, &str, AssetKind)> = steps
            .iter()
            .map(|s| (s.phase.as_str(), s.unit.as_str(), s.kind))
            .collect();
        assert_eq!(
            units,
            vec![
                ("TRAIN", "prep", AssetKind::Environment),
                ("TRAIN", "prep", AssetKind::Component),
                ("TRAIN", "train_pipeline", AssetKind::Component),
                ("INFERENCE", "score", AssetKind::Environment),
                ("INFERENCE", "score", AssetKind::Component),
                ("INFERENCE", "inference_pipeline", AssetKind::Component),
            ]
        );

        cmd_deploy(&ctx, args(DeployMode::SharedRegistry, true)).unwrap();
    }
}
