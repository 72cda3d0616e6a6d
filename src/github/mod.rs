pub mod client;

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::Deserialize;

pub use client::GithubClient;

#[derive(Debug, Clone, Deserialize)]
pub struct Organization {
    pub login: String,
    pub name: Option<String>,
    pub html_url: String,
}

impl Organization {
    /// Display name, falling back to the login when the profile has none.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.login)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub name: String,
    pub full_name: String,
    pub html_url: String,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub open_issues_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The slice of the GitHub API the collector reads from.
pub trait GithubApi {
    fn organization(&self, name: &str) -> Result<Organization>;

    fn public_repositories(&self, org: &str) -> Result<Vec<Repository>>;

    /// Number of commits on the default branch since `since`.
    fn commits_since(&self, repo: &Repository, since: DateTime<Utc>) -> Result<u64>;

    fn contributors(&self, repo: &Repository) -> Result<u64>;

    /// Pull requests in any state, newest-created first. Implementations may
    /// omit PRs created at or before `since`.
    fn pull_requests(&self, repo: &Repository, since: DateTime<Utc>) -> Result<Vec<PullRequest>>;
}
