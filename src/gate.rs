//! Merge gates: enough approvals, required checks green.
//!
//! Both gates are fail-closed. Anything short of positive evidence (an
//! `APPROVED` review, a `success` conclusion) counts as not satisfied, and
//! every error from the review system propagates as a hard failure.

use crate::error::{ReleaseError, Result};
use crate::github::{PullRequestRef, ReviewApi};
use tracing::info;

const APPROVED: &str = "APPROVED";
const SUCCESS: &str = "success";

/// Require at least `min_approvals` reviews in the `APPROVED` state.
/// A threshold of zero is rejected.
///
/// Returns the approval count on success.
pub fn check_approvals(api: &dyn ReviewApi, pr: &PullRequestRef, min_approvals: u32) -> Result<usize> {
    if min_approvals == 0 {
        return Err(ReleaseError::UserError(
            "minimum approvals must be at least 1".to_string(),
        ));
    }
    info!(pr = %pr, "checking approvals");

    let reviews = api.list_reviews(pr)?;
    let approvals = reviews
        .iter()
        .filter(|r| r.state.as_deref() == Some(APPROVED))
        .count();

    info!(approvals, required = min_approvals, "found {} approval(s)", approvals);

    if approvals < min_approvals as usize {
        return Err(ReleaseError::GateFailed(format!(
            "{} has {} approval(s), {} required",
            pr, approvals, min_approvals
        )));
    }
    Ok(approvals)
}

/// Require every named check run on the PR head to have concluded `success`.
///
/// A check counts as passed when at least one run with that exact name
/// succeeded. An empty `required` list never passes. Returns the head SHA on
/// success.
pub fn check_required_checks(
    api: &dyn ReviewApi,
    pr: &PullRequestRef,
    required: &[String],
) -> Result<String> {
    info!(pr = %pr, "checking required checks");
    if required.is_empty() {
        return Err(ReleaseError::GateFailed(format!(
            "no required checks configured for {}",
            pr
        )));
    }

    let sha = api.head_sha(pr)?;
    info!(sha = %sha, "found head SHA");

    let runs = api.list_check_runs(pr, &sha)?;
    for run in &runs {
        info!(
            check = %run.name,
            conclusion = run.conclusion.as_deref().unwrap_or("none"),
            "found check"
        );
    }

    let failing: Vec<&str> = required
        .iter()
        .filter(|name| {
            !runs
                .iter()
                .any(|run| &run.name == *name && run.conclusion.as_deref() == Some(SUCCESS))
        })
        .map(String::as_str)
        .collect();

    if !failing.is_empty() {
        return Err(ReleaseError::GateFailed(format!(
            "required check(s) did not pass on {}: {}",
            sha,
            failing.join(", ")
        )));
    }
    Ok(sha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit_codes;
    use crate::github::{CheckRun, Review};

    #[derive(Default)]
    struct FakeApi {
        reviews: Vec<Review>,
        head_sha: Option<String>,
        check_runs: Vec<CheckRun>,
        unavailable: bool,
    }

    impl FakeApi {
        fn outage() -> ReleaseError {
            ReleaseError::Api {
                context: "fake".to_string(),
                status: 502,
                body: "bad gateway".to_string(),
            }
        }
    }

    impl ReviewApi for FakeApi {
        fn list_reviews(&self, _pr: &PullRequestRef) -> Result<Vec<Review>> {
            if self.unavailable {
                return Err(Self::outage());
            }
            Ok(self.reviews.clone())
        }

        fn head_sha(&self, pr: &PullRequestRef) -> Result<String> {
            if self.unavailable {
                return Err(Self::outage());
            }
            self.head_sha
                .clone()
                .ok_or_else(|| ReleaseError::GateFailed(format!("no head for {}", pr)))
        }

        fn list_check_runs(&self, _pr: &PullRequestRef, _sha: &str) -> Result<Vec<CheckRun>> {
            Ok(self.check_runs.clone())
        }
    }

    fn pr() -> PullRequestRef {
        PullRequestRef::parse("acme/models", 12).unwrap()
    }

    fn review(state: &str) -> Review {
        Review {
            state: Some(state.to_string()),
        }
    }

    fn run(name: &str, conclusion: Option<&str>) -> CheckRun {
        CheckRun {
            name: name.to_string(),
            conclusion: conclusion.map(String::from),
        }
    }

    fn required() -> Vec<String> {
        vec!["Lint Check".to_string(), "Repository Tests".to_string()]
    }

    #[test]
    fn test_one_approval_passes() {
        let api = FakeApi {
            reviews: vec![review("APPROVED"), review("CHANGES_REQUESTED")],
            ..Default::default()
        };
        assert_eq!(check_approvals(&api, &pr(), 1).unwrap(), 1);
    }

    #[test]
    fn test_zero_approvals_fails_with_exit_code_one() {
        let api = FakeApi {
            reviews: vec![review("COMMENTED"), review("CHANGES_REQUESTED")],
            ..Default::default()
        };
        let err = check_approvals(&api, &pr(), 1).unwrap_err();
        assert!(matches!(err, ReleaseError::GateFailed(_)));
        assert_eq!(err.exit_code(), exit_codes::FAILURE);
    }

    #[test]
    fn test_no_reviews_fails() {
        let api = FakeApi::default();
        assert!(check_approvals(&api, &pr(), 1).is_err());
    }

    #[test]
    fn test_approval_state_is_exact() {
        let api = FakeApi {
            reviews: vec![review("approved")],
            ..Default::default()
        };
        assert!(check_approvals(&api, &pr(), 1).is_err());
    }

    #[test]
    fn test_min_approvals_above_one() {
        let api = FakeApi {
            reviews: vec![review("APPROVED"), review("APPROVED")],
            ..Default::default()
        };
        assert!(check_approvals(&api, &pr(), 2).is_ok());
        assert!(check_approvals(&api, &pr(), 3).is_err());
    }

    #[test]
    fn test_zero_threshold_is_rejected() {
        let api = FakeApi {
            reviews: vec![review("CHANGES_REQUESTED")],
            ..Default::default()
        };
        let err = check_approvals(&api, &pr(), 0).unwrap_err();
        assert!(matches!(err, ReleaseError::UserError(_)));
    }

    #[test]
    fn test_api_error_propagates() {
        let api = FakeApi {
            unavailable: true,
            ..Default::default()
        };
        let err = check_approvals(&api, &pr(), 1).unwrap_err();
        assert!(matches!(err, ReleaseError::Api { status: 502, .. }));
    }

    #[test]
    fn test_all_required_checks_succeed() {
        let api = FakeApi {
            head_sha: Some("abc".to_string()),
            check_runs: vec![
                run("Lint Check", Some("success")),
                run("Repository Tests", Some("success")),
                run("Optional", Some("failure")),
            ],
            ..Default::default()
        };
        assert_eq!(check_required_checks(&api, &pr(), &required()).unwrap(), "abc");
    }

    #[test]
    fn test_failed_required_check_fails() {
        let api = FakeApi {
            head_sha: Some("abc".to_string()),
            check_runs: vec![
                run("Lint Check", Some("success")),
                run("Repository Tests", Some("failure")),
            ],
            ..Default::default()
        };
        let err = check_required_checks(&api, &pr(), &required()).unwrap_err();
        assert!(err.to_string().contains("Repository Tests"));
        assert!(!err.to_string().contains("Lint Check"));
        assert_eq!(err.exit_code(), exit_codes::FAILURE);
    }

    #[test]
    fn test_missing_or_pending_required_check_fails() {
        let api = FakeApi {
            head_sha: Some("abc".to_string()),
            check_runs: vec![run("Lint Check", None)],
            ..Default::default()
        };
        let err = check_required_checks(&api, &pr(), &required()).unwrap_err();
        assert!(err.to_string().contains("Lint Check, Repository Tests"));
    }

    #[test]
    fn test_rerun_success_counts() {
        let api = FakeApi {
            head_sha: Some("abc".to_string()),
            check_runs: vec![
                run("Lint Check", Some("failure")),
                run("Lint Check", Some("success")),
                run("Repository Tests", Some("success")),
            ],
            ..Default::default()
        };
        assert!(check_required_checks(&api, &pr(), &required()).is_ok());
    }

    #[test]
    fn test_check_names_match_exactly() {
        let api = FakeApi {
            head_sha: Some("abc".to_string()),
            check_runs: vec![
                run("lint check", Some("success")),
                run("Repository Tests", Some("success")),
            ],
            ..Default::default()
        };
        assert!(check_required_checks(&api, &pr(), &required()).is_err());
    }

    #[test]
    fn test_empty_required_list_fails() {
        let api = FakeApi {
            head_sha: Some("abc".to_string()),
            check_runs: vec![run("Repository Tests", Some("failure"))],
            ..Default::default()
        };
        let err = check_required_checks(&api, &pr(), &[]).unwrap_err();
        assert!(matches!(err, ReleaseError::GateFailed(_)));
        assert!(err.to_string().contains("no required checks"));
    }

    #[test]
    fn test_missing_head_sha_fails() {
        let api = FakeApi::default();
        assert!(check_required_checks(&api, &pr(), &required()).is_err());
    }
}
