use crate::error::{CollectorError, Result};
use crate::github::{GithubApi, PullRequest, Repository};
use crate::types::record::{FetchStatus, RepositoryRecord, SubFetchStatus};
use chrono::{DateTime, Duration, Utc};

/// Only the newest recent PRs feed the review-time average.
pub const REVIEW_SAMPLE_SIZE: usize = 10;

pub fn should_skip(repo: &Repository) -> bool {
    repo.fork || repo.archived || repo.size == 0
}

pub fn cutoff(now: DateTime<Utc>, lookback_days: u32) -> Result<DateTime<Utc>> {
    Duration::try_days(i64::from(lookback_days))
        .and_then(|window| now.checked_sub_signed(window))
        .ok_or(CollectorError::InvalidLookback(lookback_days))
}

/// Approximate review latency: time from creation to the most recent update.
pub fn review_time_hours(pr: &PullRequest) -> f64 {
    let elapsed = pr.updated_at - pr.created_at;
    (elapsed.num_milliseconds() as f64 / 3_600_000.0).max(0.0)
}

#[derive(Debug, Clone, PartialEq)]
pub struct PullRequestSummary {
    pub recent_count: u64,
    pub avg_review_time_hours: Option<f64>,
}

pub fn summarize_pull_requests(prs: &[PullRequest], cutoff: DateTime<Utc>) -> PullRequestSummary {
    let mut recent: Vec<&PullRequest> = prs.iter().filter(|pr| pr.created_at > cutoff).collect();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let review_times: Vec<f64> = recent
        .iter()
        .take(REVIEW_SAMPLE_SIZE)
        .map(|pr| review_time_hours(pr))
        .collect();
    let avg_review_time_hours = if review_times.is_empty() {
        None
    } else {
        Some(review_times.iter().sum::<f64>() / review_times.len() as f64)
    };

    PullRequestSummary {
        recent_count: recent.len() as u64,
        avg_review_time_hours,
    }
}

/// Builds the record for one repository, or `None` when it is a fork,
/// archived, or empty. `since` is the recency cutoff. Sub-fetch failures
/// degrade the affected fields instead of failing the repository.
pub fn extract_record(
    api: &dyn GithubApi,
    repo: &Repository,
    since: DateTime<Utc>,
) -> Option<RepositoryRecord> {
    if should_skip(repo) {
        tracing::debug!(
            repo = %repo.full_name,
            fork = repo.fork,
            archived = repo.archived,
            size = repo.size,
            "skipping repository"
        );
        return None;
    }

    let mut fetch_status = SubFetchStatus::default();

    let recent_commit_count = match api.commits_since(repo, since) {
        Ok(count) => count,
        Err(e) => {
            tracing::warn!(repo = %repo.full_name, error = %e, "commit fetch failed");
            fetch_status.commits = FetchStatus::Failed;
            0
        }
    };

    let contributor_count = match api.contributors(repo) {
        Ok(count) => count,
        Err(e) => {
            tracing::warn!(repo = %repo.full_name, error = %e, "contributor fetch failed");
            fetch_status.contributors = FetchStatus::Failed;
            0
        }
    };

    let pulls = match api.pull_requests(repo, since) {
        Ok(prs) => summarize_pull_requests(&prs, since),
        Err(e) => {
            tracing::warn!(repo = %repo.full_name, error = %e, "pull request fetch failed");
            fetch_status.pull_requests = FetchStatus::Failed;
            PullRequestSummary {
                recent_count: 0,
                avg_review_time_hours: None,
            }
        }
    };

    tracing::info!(
        repo = %repo.full_name,
        commits = recent_commit_count,
        contributors = contributor_count,
        prs = pulls.recent_count,
        "repository processed"
    );

    Some(RepositoryRecord {
        name: repo.name.clone(),
        url: repo.html_url.clone(),
        stars: repo.stargazers_count,
        forks: repo.forks_count,
        open_issues: repo.open_issues_count,
        created_at: repo.created_at,
        updated_at: repo.updated_at,
        recent_commit_count,
        contributor_count,
        recent_pr_count: pulls.recent_count,
        avg_review_time_hours: pulls.avg_review_time_hours,
        fetch_status,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::github::Organization;
    use chrono::TimeZone;
    use std::cell::RefCell;

    pub(crate) fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    fn since_90() -> DateTime<Utc> {
        cutoff(now(), 90).expect("90 day window should be in range")
    }

    pub(crate) fn repo(name: &str) -> Repository {
        Repository {
            name: name.to_string(),
            full_name: format!("acme/{name}"),
            html_url: format!("https://github.com/acme/{name}"),
            fork: false,
            archived: false,
            size: 120,
            stargazers_count: 10,
            forks_count: 2,
            open_issues_count: 1,
            created_at: now() - Duration::days(400),
            updated_at: now() - Duration::days(1),
        }
    }

    pub(crate) fn pr(created_days_ago: i64, open_hours: i64) -> PullRequest {
        let created_at = now() - Duration::days(created_days_ago);
        PullRequest {
            created_at,
            updated_at: created_at + Duration::hours(open_hours),
        }
    }

    /// In-memory API; a `None` field makes that sub-fetch fail.
    pub(crate) struct FakeApi {
        pub org: Option<Organization>,
        pub repos: Vec<Repository>,
        pub rate_limit_reset: Option<DateTime<Utc>>,
        pub commits: Option<u64>,
        pub contributors: Option<u64>,
        pub pulls: Option<Vec<PullRequest>>,
        pub calls: RefCell<Vec<String>>,
    }

    impl FakeApi {
        pub(crate) fn new(repos: Vec<Repository>) -> Self {
            Self {
                org: Some(Organization {
                    login: "acme".to_string(),
                    name: Some("Acme".to_string()),
                    html_url: "https://github.com/acme".to_string(),
                }),
                repos,
                rate_limit_reset: None,
                commits: Some(5),
                contributors: Some(3),
                pulls: Some(Vec::new()),
                calls: RefCell::new(Vec::new()),
            }
        }

        fn failure() -> CollectorError {
            CollectorError::Api {
                status: 500,
                message: "boom".to_string(),
            }
        }
    }

    impl GithubApi for FakeApi {
        fn organization(&self, name: &str) -> Result<Organization> {
            self.org
                .clone()
                .ok_or_else(|| CollectorError::OrganizationNotFound(name.to_string()))
        }

        fn public_repositories(&self, _org: &str) -> Result<Vec<Repository>> {
            match self.rate_limit_reset {
                Some(reset) => Err(CollectorError::RateLimited { reset }),
                None => Ok(self.repos.clone()),
            }
        }

        fn commits_since(&self, repo: &Repository, _since: DateTime<Utc>) -> Result<u64> {
            self.calls.borrow_mut().push(format!("commits:{}", repo.name));
            self.commits.ok_or_else(Self::failure)
        }

        fn contributors(&self, repo: &Repository) -> Result<u64> {
            self.calls
                .borrow_mut()
                .push(format!("contributors:{}", repo.name));
            self.contributors.ok_or_else(Self::failure)
        }

        fn pull_requests(
            &self,
            repo: &Repository,
            _since: DateTime<Utc>,
        ) -> Result<Vec<PullRequest>> {
            self.calls.borrow_mut().push(format!("pulls:{}", repo.name));
            self.pulls.clone().ok_or_else(Self::failure)
        }
    }

    #[test]
    fn forks_archived_and_empty_repositories_are_skipped() {
        let api = FakeApi::new(Vec::new());

        let mut fork = repo("fork");
        fork.fork = true;
        let mut archived = repo("archived");
        archived.archived = true;
        let mut empty = repo("empty");
        empty.size = 0;

        for skipped in [&fork, &archived, &empty] {
            assert!(extract_record(&api, skipped, since_90()).is_none());
        }
        assert!(api.calls.borrow().is_empty());
    }

    #[test]
    fn extract_record_copies_repository_counts() {
        let mut api = FakeApi::new(Vec::new());
        api.pulls = Some(vec![pr(3, 4), pr(5, 8)]);

        let record = extract_record(&api, &repo("api"), since_90()).expect("record expected");
        assert_eq!(record.name, "api");
        assert_eq!(record.url, "https://github.com/acme/api");
        assert_eq!(record.stars, 10);
        assert_eq!(record.forks, 2);
        assert_eq!(record.open_issues, 1);
        assert_eq!(record.recent_commit_count, 5);
        assert_eq!(record.contributor_count, 3);
        assert_eq!(record.recent_pr_count, 2);
        assert_eq!(record.avg_review_time_hours, Some(6.0));
        assert!(!record.fetch_status.any_failed());
    }

    #[test]
    fn failed_sub_fetches_degrade_to_defaults() {
        let mut api = FakeApi::new(Vec::new());
        api.commits = None;
        api.contributors = None;
        api.pulls = None;

        let record = extract_record(&api, &repo("api"), since_90()).expect("record expected");
        assert_eq!(record.recent_commit_count, 0);
        assert_eq!(record.contributor_count, 0);
        assert_eq!(record.recent_pr_count, 0);
        assert!(record.avg_review_time_hours.is_none());
        assert_eq!(record.fetch_status.commits, FetchStatus::Failed);
        assert_eq!(record.fetch_status.contributors, FetchStatus::Failed);
        assert_eq!(record.fetch_status.pull_requests, FetchStatus::Failed);
    }

    #[test]
    fn one_failed_fetch_does_not_affect_the_others() {
        let mut api = FakeApi::new(Vec::new());
        api.contributors = None;

        let record = extract_record(&api, &repo("api"), since_90()).expect("record expected");
        assert_eq!(record.recent_commit_count, 5);
        assert_eq!(record.contributor_count, 0);
        assert_eq!(record.fetch_status.commits, FetchStatus::Ok);
        assert_eq!(record.fetch_status.contributors, FetchStatus::Failed);
    }

    #[test]
    fn old_pull_requests_are_excluded() {
        let prs = vec![pr(10, 2), pr(120, 50)];
        let summary = summarize_pull_requests(&prs, since_90());
        assert_eq!(summary.recent_count, 1);
        assert_eq!(summary.avg_review_time_hours, Some(2.0));
    }

    #[test]
    fn pull_request_created_exactly_at_cutoff_is_excluded() {
        let prs = vec![pr(90, 2)];
        let summary = summarize_pull_requests(&prs, since_90());
        assert_eq!(summary.recent_count, 0);
        assert!(summary.avg_review_time_hours.is_none());
    }

    #[test]
    fn review_average_uses_ten_newest_but_count_uses_all() {
        // PRs 1..=10 are the newest and stayed open one hour; 11 and 12 are
        // older and stayed open much longer.
        let mut prs: Vec<PullRequest> = (1..=10).map(|days| pr(days, 1)).collect();
        prs.push(pr(20, 1000));
        prs.push(pr(30, 1000));
        prs.reverse();

        let summary = summarize_pull_requests(&prs, since_90());
        assert_eq!(summary.recent_count, 12);
        assert_eq!(summary.avg_review_time_hours, Some(1.0));
    }

    #[test]
    fn untouched_pull_request_counts_as_zero_hours() {
        let prs = vec![pr(2, 0), pr(3, 4)];
        let summary = summarize_pull_requests(&prs, since_90());
        assert_eq!(summary.avg_review_time_hours, Some(2.0));
        assert_eq!(review_time_hours(&prs[0]), 0.0);
    }

    #[test]
    fn cutoff_subtracts_lookback_days() {
        assert_eq!(
            cutoff(now(), 30).expect("in range"),
            now() - Duration::days(30)
        );
        assert_eq!(cutoff(now(), 0).expect("in range"), now());
    }

    #[test]
    fn cutoff_beyond_calendar_range_is_an_error() {
        let err = cutoff(now(), 200_000_000).expect_err("window should be rejected");
        assert!(matches!(err, CollectorError::InvalidLookback(200_000_000)));
        assert!(cutoff(now(), u32::MAX).is_err());
    }
}
