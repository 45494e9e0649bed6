//! Blocking GitHub REST client.

use super::{CheckRun, PullRequestRef, Review, ReviewApi};
use crate::error::{ReleaseError, Result};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

const PER_PAGE: usize = 100;
const USER_AGENT: &str = concat!("mlrelease/", env!("CARGO_PKG_VERSION"));

#[derive(Deserialize)]
struct PullRequest {
    #[serde(default)]
    head: Option<Head>,
}

#[derive(Deserialize)]
struct Head {
    #[serde(default)]
    sha: Option<String>,
}

#[derive(Deserialize)]
struct CheckRunsPage {
    #[serde(default)]
    total_count: Option<usize>,
    #[serde(default)]
    check_runs: Vec<CheckRun>,
}

/// GitHub REST API client authenticated with a bearer token.
pub struct GithubClient {
    api_url: String,
    token: String,
    client: Client,
}

impl GithubClient {
    pub fn new(api_url: &str, token: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ReleaseError::http("failed to build HTTP client", e))?;

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            client,
        })
    }

    fn repo_url(&self, pr: &PullRequestRef) -> String {
        format!("{}/repos/{}/{}", self.api_url, pr.owner, pr.repo)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)], context: &str) -> Result<T> {
        debug!(url, "GET");
        let resp = self
            .client
            .get(url)
            .query(query)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .send()
            .map_err(|e| ReleaseError::http(context, e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ReleaseError::Api {
                context: context.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        resp.json::<T>().map_err(|e| ReleaseError::http(context, e))
    }

    fn page_query(page: usize) -> [(&'static str, String); 2] {
        [("per_page", PER_PAGE.to_string()), ("page", page.to_string())]
    }
}

impl ReviewApi for GithubClient {
    fn list_reviews(&self, pr: &PullRequestRef) -> Result<Vec<Review>> {
        let url = format!("{}/pulls/{}/reviews", self.repo_url(pr), pr.number);
        let context = format!("failed to fetch reviews for {}", pr);

        let mut reviews = Vec::new();
        for page in 1.. {
            let batch: Vec<Review> = self.get_json(&url, &Self::page_query(page), &context)?;
            let done = batch.len() < PER_PAGE;
            reviews.extend(batch);
            if done {
                break;
            }
        }
        Ok(reviews)
    }

    fn head_sha(&self, pr: &PullRequestRef) -> Result<String> {
        let url = format!("{}/pulls/{}", self.repo_url(pr), pr.number);
        let context = format!("failed to fetch {}", pr);

        let pull: PullRequest = self.get_json(&url, &[], &context)?;
        pull.head
            .and_then(|h| h.sha)
            .filter(|sha| !sha.is_empty())
            .ok_or_else(|| {
                ReleaseError::GateFailed(format!("could not determine head SHA of {}", pr))
            })
    }

    fn list_check_runs(&self, pr: &PullRequestRef, sha: &str) -> Result<Vec<CheckRun>> {
        let url = format!("{}/commits/{}/check-runs", self.repo_url(pr), sha);
        let context = format!("failed to fetch check runs for commit {}", sha);

        let mut runs = Vec::new();
        for page in 1.. {
            let batch: CheckRunsPage = self.get_json(&url, &Self::page_query(page), &context)?;
            let received = batch.check_runs.len();
            runs.extend(batch.check_runs);
            // Without total_count, only a short page ends the listing.
            let complete = batch.total_count.is_some_and(|total| runs.len() >= total);
            if received < PER_PAGE || complete {
                break;
            }
        }
        Ok(runs)
    }
}
