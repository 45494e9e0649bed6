//! Which release jobs a pull request should trigger.
//!
//! A PR needs an environment label and a scenario label before anything is
//! versioned, tagged or pushed; only the higher environments also publish to
//! the shared registry.

use crate::config::ActionsSection;
use crate::labels::LabelSet;

/// Execution flags, one per downstream job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutableActions {
    pub get_pr_version: bool,
    pub push_to_azure_dev: bool,
    pub push_to_azure_shared_registry: bool,
    pub tag_version: bool,
}

impl ExecutableActions {
    /// Evaluate the flags for `labels`.
    pub fn plan(labels: &LabelSet, section: &ActionsSection) -> Self {
        let labels = if section.normalize {
            labels.normalized()
        } else {
            labels.clone()
        };
        let set = |names: &[String]| {
            let set = LabelSet::from_names(names.iter().cloned());
            if section.normalize { set.normalized() } else { set }
        };

        let has_scenario = labels.intersects(&set(&section.scenario_labels));
        let release = labels.intersects(&set(&section.environment_labels)) && has_scenario;
        let shared = labels.intersects(&set(&section.shared_registry_labels)) && has_scenario;

        Self {
            get_pr_version: release,
            push_to_azure_dev: release,
            push_to_azure_shared_registry: shared,
            tag_version: release,
        }
    }

    /// `(output key, flag)` pairs in the order the workflow reads them.
    pub fn outputs(&self) -> [(&'static str, bool); 4] {
        [
            ("exec_get_pr_version", self.get_pr_version),
            ("exec_push_to_azure_dev", self.push_to_azure_dev),
            (
                "exec_push_to_azure_shared_registry",
                self.push_to_azure_shared_registry,
            ),
            ("exec_tag_version", self.tag_version),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(names: &[&str]) -> ExecutableActions {
        let labels: LabelSet = names.iter().copied().collect();
        ExecutableActions::plan(&labels, &ActionsSection::default())
    }

    #[test]
    fn test_dev_with_scenario_releases_without_shared_registry() {
        let actions = plan(&["dev", "train"]);
        assert!(actions.get_pr_version);
        assert!(actions.push_to_azure_dev);
        assert!(actions.tag_version);
        assert!(!actions.push_to_azure_shared_registry);
    }

    #[test]
    fn test_prod_with_scenario_also_publishes_shared() {
        let actions = plan(&["prod", "inference"]);
        assert!(actions.get_pr_version);
        assert!(actions.push_to_azure_shared_registry);
    }

    #[test]
    fn test_environment_without_scenario_does_nothing() {
        assert_eq!(plan(&["qua"]), ExecutableActions::default());
    }

    #[test]
    fn test_scenario_without_environment_does_nothing() {
        assert_eq!(plan(&["utils", "tests"]), ExecutableActions::default());
    }

    #[test]
    fn test_labels_are_normalized_by_default() {
        let actions = plan(&[" QUA ", "Tests"]);
        assert!(actions.get_pr_version);
        assert!(actions.push_to_azure_shared_registry);
    }

    #[test]
    fn test_normalization_can_be_disabled() {
        let section = ActionsSection {
            normalize: false,
            ..ActionsSection::default()
        };
        let labels: LabelSet = ["DEV", "train"].into_iter().collect();
        assert_eq!(
            ExecutableActions::plan(&labels, &section),
            ExecutableActions::default()
        );
    }

    #[test]
    fn test_output_keys() {
        let keys: Vec<_> = plan(&["dev", "train"]).outputs().iter().map(|(k, _)| *k).collect();
        assert_eq!(
            keys,
            vec![
                "exec_get_pr_version",
                "exec_push_to_azure_dev",
                "exec_push_to_azure_shared_registry",
                "exec_tag_version",
            ]
        );
    }
}
