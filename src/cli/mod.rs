//! CLI argument parsing for mlrelease.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use crate::ci_output::GITHUB_OUTPUT_VAR;
use crate::config::DEFAULT_CONFIG_FILE;
use crate::deploy::DeployMode;
use crate::labels::PR_LABEL_NAMES_VAR;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// mlrelease: release automation for ML training and inference pipelines.
///
/// Each subcommand is one CI step:
/// - version bookkeeping driven by PR labels
/// - propagating the release version into component definitions
/// - merge gates on approvals and required checks
/// - deploying environments and components to Azure ML
#[derive(Parser, Debug)]
#[command(name = "mlrelease")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the config file. Defaults apply when it does not exist.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// File that step outputs are appended to. Ignored when blank.
    #[arg(long, global = true, env = GITHUB_OUTPUT_VAR, value_name = "PATH")]
    pub github_output: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// The step output file, if one is set and non-blank.
    pub fn output_file(&self) -> Option<PathBuf> {
        self.github_output
            .as_deref()
            .map(str::trim)
            .filter(|path| !path.is_empty())
            .map(PathBuf::from)
    }
}

/// Available commands for mlrelease.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read, bump or set the global release version.
    Version(VersionCommand),

    /// Operate on component definition files.
    Components(ComponentsCommand),

    /// Decide which release jobs the PR labels enable.
    ///
    /// Writes exec_* flags to the step outputs.
    Actions(LabelArgs),

    /// Merge gates on a pull request.
    Gate(GateCommand),

    /// Deploy environments, components and pipelines to Azure ML.
    ///
    /// Stops at the first failed deployment.
    Deploy(DeployArgs),
}

/// Arguments for the `version` command.
#[derive(Args, Debug)]
pub struct VersionCommand {
    /// Version file (overrides `version.file` from config).
    #[arg(long, global = true)]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub action: VersionAction,
}

/// Version subcommands.
#[derive(Subcommand, Debug)]
pub enum VersionAction {
    /// Print the current version and record it as `pr_version`.
    Get,

    /// Bump the version according to the PR labels.
    ///
    /// `prd` bumps major, `dev` bumps minor, and only when a required label
    /// combination is present.
    Bump(LabelArgs),

    /// Overwrite the version (rollback).
    Set(SetVersionArgs),
}

/// Label input shared by `version bump` and `actions`.
///
/// Without `--labels`, labels are read as JSON from PR_LABELS or
/// PR_LABELS_JSON.
#[derive(Args, Debug)]
pub struct LabelArgs {
    /// Whitespace-separated label names (shell quoting allowed).
    #[arg(long, env = PR_LABEL_NAMES_VAR)]
    pub labels: Option<String>,
}

/// Arguments for the `version set` command.
#[derive(Args, Debug)]
pub struct SetVersionArgs {
    /// New version, as MAJOR.MINOR.
    #[arg(id = "new_version", value_name = "VERSION")]
    pub version: String,
}

/// Arguments for the `components` command.
#[derive(Args, Debug)]
pub struct ComponentsCommand {
    #[command(subcommand)]
    pub action: ComponentsAction,
}

/// Component subcommands.
#[derive(Subcommand, Debug)]
pub enum ComponentsAction {
    /// Rewrite every version field in the component definition files.
    SetVersion(SetComponentVersionArgs),
}

/// Arguments for the `components set-version` command.
#[derive(Args, Debug)]
pub struct SetComponentVersionArgs {
    /// Value written to every matching field.
    #[arg(id = "component_version", value_name = "VERSION")]
    pub version: String,

    /// Field to rewrite (overrides `components.field` from config).
    #[arg(long)]
    pub field: Option<String>,

    /// Report what would change without writing files.
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `gate` command.
#[derive(Args, Debug)]
pub struct GateCommand {
    #[command(subcommand)]
    pub action: GateAction,
}

/// Gate subcommands.
#[derive(Subcommand, Debug)]
pub enum GateAction {
    /// Require enough approving reviews.
    Approvals(ApprovalsArgs),

    /// Require the named check runs to have succeeded on the PR head.
    Checks(ChecksArgs),
}

/// Pull request selection shared by the gates.
#[derive(Args, Debug)]
pub struct PullRequestArgs {
    /// Repository as owner/repo.
    #[arg(long)]
    pub repo: String,

    /// Pull request number.
    #[arg(long)]
    pub pr_number: u64,

    /// GitHub token.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: String,
}

/// Arguments for the `gate approvals` command.
#[derive(Args, Debug)]
pub struct ApprovalsArgs {
    #[command(flatten)]
    pub pr: PullRequestArgs,

    /// Minimum approvals, at least 1 (overrides `gate.min_approvals` from config).
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub min_approvals: Option<u32>,
}

/// Arguments for the `gate checks` command.
#[derive(Args, Debug)]
pub struct ChecksArgs {
    #[command(flatten)]
    pub pr: PullRequestArgs,

    /// Required check name; repeat for several (replaces `gate.required_checks`).
    #[arg(long = "require")]
    pub require: Vec<String>,
}

/// Arguments for the `deploy` command.
#[derive(Args, Debug)]
pub struct DeployArgs {
    /// Deployment target: workspace or shared_registry.
    #[arg(long, env = "AZURE_MODE", value_parser = DeployMode::parse_setting, default_value = "workspace")]
    pub mode: DeployMode,

    /// Directory holding the scenario folders (overrides `deploy.source_root`).
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// List the deployment plan without contacting Azure.
    #[arg(long)]
    pub dry_run: bool,

    #[arg(long, env = "AZURE_TENANT_ID")]
    pub tenant_id: Option<String>,

    #[arg(long, env = "AZURE_CLIENT_ID")]
    pub client_id: Option<String>,

    #[arg(long, env = "AZURE_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    #[arg(long, env = "AZURE_SUBSCRIPTION_ID")]
    pub subscription_id: Option<String>,

    #[arg(long, env = "AZURE_RESOURCE_GROUP")]
    pub resource_group: Option<String>,

    #[arg(long, env = "AZURE_WORKSPACE_NAME")]
    pub workspace_name: Option<String>,

    #[arg(long, env = "AZURE_REGISTRY_NAME")]
    pub registry_name: Option<String>,

    #[arg(long, env = "AZURE_REGISTRY_LOCATION")]
    pub registry_location: Option<String>,
}
