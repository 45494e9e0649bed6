//! Implementation of the `mlrelease gate` commands.

use super::CommandContext;
use crate::cli::{GateAction, GateCommand, PullRequestArgs};
use crate::error::Result;
use crate::gate::{check_approvals, check_required_checks};
use crate::github::{GithubClient, PullRequestRef};

/// Execute a `gate` subcommand.
pub fn cmd_gate(ctx: &CommandContext, cmd: GateCommand) -> Result<()> {
    match cmd.action {
        GateAction::Approvals(args) => {
            let (client, pr) = connect(ctx, &args.pr)?;
            let min_approvals = args.min_approvals.unwrap_or(ctx.config.gate.min_approvals);
            let approvals = check_approvals(&client, &pr, min_approvals)?;
            println!("{} has {} approval(s)", pr, approvals);
        }
        GateAction::Checks(args) => {
            let (client, pr) = connect(ctx, &args.pr)?;
            let required = required_checks(&args.require, &ctx.config.gate.required_checks);
            let sha = check_required_checks(&client, &pr, &required)?;
            println!("All required checks passed on {}", sha);
        }
    }
    Ok(())
}

fn connect(ctx: &CommandContext, args: &PullRequestArgs) -> Result<(GithubClient, PullRequestRef)> {
    let pr = PullRequestRef::parse(&args.repo, args.pr_number)?;
    let client = GithubClient::new(&ctx.config.gate.api_url, &args.token, ctx.http_timeout())?;
    Ok((client, pr))
}

/// Names given on the command line replace the configured list.
fn required_checks(cli: &[String], configured: &[String]) -> Vec<String> {
    if cli.is_empty() {
        configured.to_vec()
    } else {
        cli.to_vec()
    }
}
