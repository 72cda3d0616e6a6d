use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one per-repository sub-fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStatus {
    #[default]
    Ok,
    Failed,
}

impl FetchStatus {
    pub fn is_failed(self) -> bool {
        matches!(self, Self::Failed)
    }
}

/// Lets consumers tell "zero activity" apart from "the fetch failed".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubFetchStatus {
    #[serde(default)]
    pub commits: FetchStatus,
    #[serde(default)]
    pub contributors: FetchStatus,
    #[serde(default)]
    pub pull_requests: FetchStatus,
}

impl SubFetchStatus {
    pub fn any_failed(&self) -> bool {
        self.commits.is_failed() || self.contributors.is_failed() || self.pull_requests.is_failed()
    }
}

/// Point-in-time snapshot of one repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryRecord {
    pub name: String,
    pub url: String,
    pub stars: u64,
    pub forks: u64,
    pub open_issues: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub recent_commit_count: u64,
    pub contributor_count: u64,
    pub recent_pr_count: u64,
    pub avg_review_time_hours: Option<f64>,
    #[serde(default)]
    pub fetch_status: SubFetchStatus,
}
