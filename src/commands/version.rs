//! Implementation of the `mlrelease version` commands.
//!
//! - `get` prints the version of record and exposes it as `pr_version`
//! - `bump` applies the label-driven bump and saves only on change
//! - `set` overwrites the record, used to roll back a release

use super::CommandContext;
use crate::cli::{LabelArgs, VersionAction, VersionCommand};
use crate::ci_output::StepOutputs;
use crate::error::{ReleaseError, Result};
use crate::labels::{LabelSet, LabelSource};
use crate::version::{BumpOutcome, BumpPolicy, Version, VersionFile, VersionStore, bump};
use std::path::PathBuf;
use tracing::info;

/// Step output carrying the current version.
pub const PR_VERSION_OUTPUT: &str = "pr_version";

/// Execute a `version` subcommand.
pub fn cmd_version(ctx: &CommandContext, cmd: VersionCommand) -> Result<()> {
    let path = cmd
        .file
        .unwrap_or_else(|| PathBuf::from(&ctx.config.version.file));
    let store = VersionFile::new(path);

    let version = match cmd.action {
        VersionAction::Get => get_version(&store, &ctx.outputs)?,
        VersionAction::Bump(args) => {
            let policy = BumpPolicy::from_config(&ctx.config.version, &ctx.config.labels);
            bump_version(&store, &resolve_labels(&args), &policy)?
        }
        VersionAction::Set(args) => set_version(&store, &args.version)?,
    };

    println!("{}", version);
    Ok(())
}

pub(crate) fn resolve_labels(args: &LabelArgs) -> LabelSet {
    let labels = LabelSource::resolve(args.labels.as_deref()).labels();
    info!(labels = %labels, "PR labels");
    labels
}

/// Read the version and record it as a step output.
pub fn get_version(store: &dyn VersionStore, outputs: &StepOutputs) -> Result<Version> {
    let version = store.load();
    info!(version = %version, "current version");
    outputs.append(&[(PR_VERSION_OUTPUT, version.to_string())])?;
    Ok(version)
}

/// Bump according to `labels`. The store is written only when the version
/// changes.
pub fn bump_version(
    store: &dyn VersionStore,
    labels: &LabelSet,
    policy: &BumpPolicy,
) -> Result<Version> {
    let current = store.load();
    let outcome = bump(current, labels, policy);

    match outcome {
        BumpOutcome::NoCombination => {
            info!(version = %current, "no required label combination present, version unchanged");
        }
        BumpOutcome::NoMarker => {
            info!(
                version = %current,
                "neither '{}' nor '{}' label present, version unchanged",
                policy.production,
                policy.development
            );
        }
        BumpOutcome::Bumped { kind, from, to } => {
            store.save(to)?;
            info!(from = %from, to = %to, kind = ?kind, "version bumped");
        }
    }

    Ok(outcome.resulting(current))
}

/// Overwrite the version with `raw`, which must be `MAJOR.MINOR`.
pub fn set_version(store: &dyn VersionStore, raw: &str) -> Result<Version> {
    let version: Version = raw
        .trim()
        .parse()
        .map_err(|e| ReleaseError::UserError(format!("invalid version: {}", e)))?;

    let previous = store.load();
    store.save(version)?;
    info!(from = %previous, to = %version, "version set");
    Ok(version)
}
