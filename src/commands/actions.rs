//! Implementation of the `mlrelease actions` command.

use super::CommandContext;
use super::version::resolve_labels;
use crate::actions::ExecutableActions;
use crate::ci_output::{StepOutputs, flag};
use crate::cli::LabelArgs;
use crate::config::ActionsSection;
use crate::error::Result;
use crate::labels::LabelSet;
use tracing::info;

/// Execute the `actions` command.
pub fn cmd_actions(ctx: &CommandContext, args: LabelArgs) -> Result<()> {
    let labels = resolve_labels(&args);
    let actions = record_actions(&labels, &ctx.config.actions, &ctx.outputs)?;
    for (key, value) in actions.outputs() {
        println!("{}={}", key, flag(value));
    }
    Ok(())
}

/// Plan the executable actions and append them to the step outputs.
pub fn record_actions(
    labels: &LabelSet,
    section: &ActionsSection,
    outputs: &StepOutputs,
) -> Result<ExecutableActions> {
    let actions = ExecutableActions::plan(labels, section);
    let pairs: Vec<(&str, &str)> = actions
        .outputs()
        .iter()
        .map(|(key, value)| (*key, flag(*value)))
        .collect();

    for (key, value) in &pairs {
        info!(key, value, "executable action");
    }
    outputs.append(&pairs)?;
    Ok(actions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_record_actions_writes_all_flags() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("github_output");
        let labels = LabelSet::from_names(["Prod", "train"]);

        let actions = record_actions(
            &labels,
            &ActionsSection::default(),
            &StepOutputs::new(Some(output.clone())),
        )
        .unwrap();

        assert!(actions.get_pr_version);
        assert!(actions.push_to_azure_shared_registry);
        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "exec_get_pr_version=true\n\
             exec_push_to_azure_dev=true\n\
             exec_push_to_azure_shared_registry=true\n\
             exec_tag_version=true\n"
        );
    }

    #[test]
    fn test_record_actions_without_scenario() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("github_output");

        let actions = record_actions(
            &LabelSet::from_names(["dev"]),
            &ActionsSection::default(),
            &StepOutputs::new(Some(output.clone())),
        )
        .unwrap();

        assert_eq!(actions, ExecutableActions::default());
        assert!(fs::read_to_string(&output).unwrap().contains("exec_tag_version=false\n"));
    }

    #[test]
    fn test_record_actions_without_output_file() {
        let actions = record_actions(
            &LabelSet::from_names(["dev", "inference"]),
            &ActionsSection::default(),
            &StepOutputs::default(),
        )
        .unwrap();
        assert!(actions.push_to_azure_dev);
        assert!(!actions.push_to_azure_shared_registry);
    }
}
