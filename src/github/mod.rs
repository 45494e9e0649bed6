//! Review-system access for merge gates.
//!
//! [`ReviewApi`] is the seam the gate checks are written against;
//! [`GithubClient`] implements it over the GitHub REST API.

mod client;

pub use client::GithubClient;

use crate::error::{ReleaseError, Result};
use serde::Deserialize;
use std::fmt;

/// A repository and pull request number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRef {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

impl PullRequestRef {
    /// Build from an `owner/repo` slug.
    pub fn parse(slug: &str, number: u64) -> Result<Self> {
        let invalid = || {
            ReleaseError::UserError(format!(
                "--repo should be in the format 'owner/repo' (got '{}')",
                slug
            ))
        };
        let (owner, repo) = slug.split_once('/').ok_or_else(invalid)?;
        if owner.is_empty() || repo.is_empty() || repo.contains('/') {
            return Err(invalid());
        }
        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            number,
        })
    }
}

impl fmt::Display for PullRequestRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}

/// A pull request review.
#[derive(Debug, Clone, Deserialize)]
pub struct Review {
    /// `APPROVED`, `CHANGES_REQUESTED`, `COMMENTED`, `DISMISSED`, `PENDING`.
    #[serde(default)]
    pub state: Option<String>,
}

/// A check run on a commit.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckRun {
    #[serde(default)]
    pub name: String,
    /// `success`, `failure`, `neutral`, `cancelled`, ... ; null until completed.
    #[serde(default)]
    pub conclusion: Option<String>,
}

/// Read access to PR reviews and check runs.
pub trait ReviewApi {
    /// All reviews of the pull request.
    fn list_reviews(&self, pr: &PullRequestRef) -> Result<Vec<Review>>;

    /// SHA of the pull request's head commit.
    fn head_sha(&self, pr: &PullRequestRef) -> Result<String>;

    /// All check runs for a commit.
    fn list_check_runs(&self, pr: &PullRequestRef, sha: &str) -> Result<Vec<CheckRun>>;
}
