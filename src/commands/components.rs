//! Implementation of the `mlrelease components` commands.

use super::CommandContext;
use crate::cli::{ComponentsAction, ComponentsCommand, SetComponentVersionArgs};
use crate::config::ComponentsSection;
use crate::error::{ReleaseError, Result};
use crate::rewrite::{BatchReport, RewriteBatch};
use std::path::Path;
use tracing::{info, warn};

/// Execute a `components` subcommand.
pub fn cmd_components(ctx: &CommandContext, cmd: ComponentsCommand) -> Result<()> {
    match cmd.action {
        ComponentsAction::SetVersion(args) => {
            let report = set_component_versions(&ctx.config.components, Path::new("."), &args)?;
            let verb = if args.dry_run { "Would update" } else { "Updated" };
            println!("{} {} file(s)", verb, report.updated_count());
            Ok(())
        }
    }
}

/// Rewrite the configured field to `args.version` in every component file
/// under the configured roots, resolved against `base`.
///
/// Per-file failures are reported, not raised.
pub fn set_component_versions(
    section: &ComponentsSection,
    base: &Path,
    args: &SetComponentVersionArgs,
) -> Result<BatchReport> {
    let version = args.version.trim();
    if version.is_empty() {
        return Err(ReleaseError::UserError(
            "component version must not be empty".to_string(),
        ));
    }

    let mut batch = RewriteBatch::from_config(section, base)?.dry_run(args.dry_run);
    if let Some(field) = args.field.as_deref() {
        if field.trim().is_empty() {
            return Err(ReleaseError::UserError("--field must not be empty".to_string()));
        }
        batch = batch.with_field(field);
    }

    let report = batch.run(version);

    info!(
        updated = report.updated_count(),
        visited = report.files.len(),
        dry_run = args.dry_run,
        "component version update finished"
    );
    if report.failed_count() > 0 {
        warn!(failed = report.failed_count(), "some files could not be updated");
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Command};
    use crate::rewrite::FileOutcome;
    use crate::test_support::{DirGuard, create_release_repo, write_file};
    use clap::Parser;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    fn args(version: &str) -> SetComponentVersionArgs {
        SetComponentVersionArgs {
            version: version.to_string(),
            field: None,
            dry_run: false,
        }
    }

    fn fixture() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write_file(
            root,
            "src/train/components/prep/config.yaml",
            "name: prep\nversion: '1.0'\ninputs:\n  data:\n    version: '1.0'\n",
        );
        write_file(root, "src/train/components/prep/env.yaml", "name: prep-env\nversion: '1.0'\n");
        write_file(root, "src/train/pipeline.yaml", "name: train\njobs:\n  - version: '1.0'\n");
        write_file(root, "src/inference/components/score/config.yaml", "name: score\n");
        write_file(root, "src/inference/components/score/notes.yaml", "version: '1.0'\n");
        write_file(root, "src/utils/config.yaml", "version: '1.0'\n");
        temp_dir
    }

    #[test]
    fn test_set_component_versions_updates_allow_listed_files() {
        let temp_dir = fixture();
        let root = temp_dir.path();

        let report =
            set_component_versions(&ComponentsSection::default(), root, &args("2.0")).unwrap();

        assert_eq!(report.updated_count(), 3);
        assert_eq!(report.failed_count(), 0);

        let config = fs::read_to_string(root.join("src/train/components/prep/config.yaml")).unwrap();
        assert_eq!(config.matches("2.0").count(), 2);
        let pipeline = fs::read_to_string(root.join("src/train/pipeline.yaml")).unwrap();
        assert!(pipeline.contains("2.0"));
        // Not allow-listed, or outside the roots.
        assert!(fs::read_to_string(root.join("src/inference/components/score/notes.yaml")).unwrap().contains("1.0"));
        assert!(fs::read_to_string(root.join("src/utils/config.yaml")).unwrap().contains("1.0"));
    }

    #[test]
    fn test_second_run_changes_nothing() {
        let temp_dir = fixture();
        let root = temp_dir.path();
        let section = ComponentsSection::default();

        set_component_versions(&section, root, &args("2.0")).unwrap();
        let report = set_component_versions(&section, root, &args("2.0")).unwrap();
        assert_eq!(report.updated_count(), 0);
    }

    #[test]
    fn test_dry_run_leaves_files() {
        let temp_dir = fixture();
        let root = temp_dir.path();
        let mut dry = args("2.0");
        dry.dry_run = true;

        let report = set_component_versions(&ComponentsSection::default(), root, &dry).unwrap();
        assert_eq!(report.updated_count(), 3);
        assert!(!fs::read_to_string(root.join("src/train/pipeline.yaml")).unwrap().contains("2.0"));
    }

    #[test]
    fn test_field_override() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write_file(root, "src/train/config.yaml", "version: '1.0'\ntag: old\n");
        let mut custom = args("new");
        custom.field = Some("tag".to_string());

        let report = set_component_versions(&ComponentsSection::default(), root, &custom).unwrap();
        assert_eq!(report.updated_count(), 1);
        let content = fs::read_to_string(root.join("src/train/config.yaml")).unwrap();
        assert!(content.contains("tag: new"));
        assert!(content.contains("1.0"));
    }

    #[test]
    fn test_unreadable_file_is_isolated() {
        let temp_dir = fixture();
        let root = temp_dir.path();
        write_file(root, "src/train/components/broken/config.yaml", "version: [unclosed\n");

        let report =
            set_component_versions(&ComponentsSection::default(), root, &args("2.0")).unwrap();
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.updated_count(), 3);
        assert!(report
            .files
            .iter()
            .any(|(_, outcome)| matches!(outcome, FileOutcome::Unreadable(_))));
    }

    #[test]
    fn test_empty_version_rejected() {
        let temp_dir = fixture();
        let err = set_component_versions(&ComponentsSection::default(), temp_dir.path(), &args("  "))
            .unwrap_err();
        assert!(matches!(err, ReleaseError::UserError(_)));
    }

    #[test]
    #[serial]
    fn test_cmd_components_resolves_roots_from_cwd() {
        let temp_dir = create_release_repo();
        let _guard = DirGuard::new(temp_dir.path());

        let cli = Cli::try_parse_from(["mlrelease", "components", "set-version", "1.1"])
            .unwrap();
        let Command::Components(cmd) = cli.command else {
            panic!("Expected Components command");
        };
        cmd_components(&CommandContext::default(), cmd).unwrap();

        let pipeline = fs::read_to_string(temp_dir.path().join("src/inference/pipeline.yaml")).unwrap();
        assert_eq!(pipeline.matches("'1.1'").count(), 2);
        let config =
            fs::read_to_string(temp_dir.path().join("src/train/components/prep/config.yaml")).unwrap();
        assert_eq!(config.matches("'1.1'").count(), 2);
        // The global version file is not a component file.
        assert!(fs::read_to_string(temp_dir.path().join("version.yaml")).unwrap().contains("1.0"));
    }
}
