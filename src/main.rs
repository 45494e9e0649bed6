//! mlrelease: release automation for ML training and inference pipelines.
//!
//! This is the main entry point for the `mlrelease` CLI. It parses arguments,
//! sets up logging, dispatches to the appropriate command handler, and handles
//! errors with proper exit codes.

mod actions;
mod ci_output;
mod cli;
mod commands;
pub mod config;
pub mod deploy;
pub mod error;
pub mod exit_codes;
pub mod fs;
mod gate;
pub mod github;
pub mod labels;
mod logging;
pub mod rewrite;
pub mod version;

#[cfg(test)]
mod test_support;

use clap::Parser;
use clap::error::ErrorKind;
use cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            // Usage errors share the single failure code; help and version are successes.
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => exit_codes::SUCCESS,
                _ => exit_codes::FAILURE,
            };
            return ExitCode::from(code as u8);
        }
    };

    logging::init_tracing(cli.verbose);

    match commands::dispatch(cli) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            // Return appropriate exit code
            ExitCode::from(err.exit_code() as u8)
        }
    }
}
