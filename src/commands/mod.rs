//! Command implementations for mlrelease.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations. Config is loaded once here and handed to every command
//! together with the step-output channel.

mod actions;
mod components;
mod deploy;
mod gate;
mod version;

use crate::ci_output::StepOutputs;
use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::error::Result;
use std::time::Duration;

/// Shared state for one command invocation.
#[derive(Debug, Clone, Default)]
pub struct CommandContext {
    pub config: Config,
    pub outputs: StepOutputs,
}

impl CommandContext {
    pub fn new(config: Config, outputs: StepOutputs) -> Self {
        Self { config, outputs }
    }

    /// Network timeout for outbound calls.
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.config.http.timeout_secs)
    }
}

/// Dispatch a command to its implementation.
///
/// This is the main entry point for command execution. A missing config file
/// means defaults; an invalid one is a usage error.
pub fn dispatch(cli: Cli) -> Result<()> {
    let config = Config::load_or_default(&cli.config)?;
    let ctx = CommandContext::new(config, StepOutputs::new(cli.output_file()));

    match cli.command {
        Command::Version(cmd) => version::cmd_version(&ctx, cmd),
        Command::Components(cmd) => components::cmd_components(&ctx, cmd),
        Command::Actions(args) => actions::cmd_actions(&ctx, args),
        Command::Gate(cmd) => gate::cmd_gate(&ctx, cmd),
        Command::Deploy(args) => deploy::cmd_deploy(&ctx, args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_http_timeout_from_config() {
        let mut ctx = CommandContext::default();
        ctx.config.http.timeout_secs = 7;
        assert_eq!(ctx.http_timeout(), Duration::from_secs(7));
    }

    #[test]
    fn test_dispatch_rejects_invalid_config() {
        let temp_dir = TempDir::new().unwrap();
        let config = temp_dir.path().join("release.yaml");
        fs::write(&config, "gate:\n  min_approvals: 0\n").unwrap();

        let cli = Cli::try_parse_from([
            "mlrelease",
            "--config",
            config.to_str().unwrap(),
            "version",
            "set",
            "1.0",
            "--file",
            temp_dir.path().join("version.yaml").to_str().unwrap(),
        ])
        .unwrap();

        let err = dispatch(cli).unwrap_err();
        assert!(err.to_string().contains("min_approvals"));
        assert!(!temp_dir.path().join("version.yaml").exists());
    }

    #[test]
    fn test_dispatch_with_missing_config_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let version_file = temp_dir.path().join("version.yaml");

        let cli = Cli::try_parse_from([
            "mlrelease",
            "--config",
            temp_dir.path().join("absent.yaml").to_str().unwrap(),
            "version",
            "set",
            "4.2",
            "--file",
            version_file.to_str().unwrap(),
        ])
        .unwrap();

        dispatch(cli).unwrap();
        assert!(fs::read_to_string(&version_file).unwrap().contains("4.2"));
    }
}
