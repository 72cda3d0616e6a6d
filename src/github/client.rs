use super::{GithubApi, Organization, PullRequest, Repository};
use crate::error::{CollectorError, Result};
use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Deserialize;
use std::time::Duration;

const PER_PAGE: u32 = 100;

/// Blocking GitHub REST client. Follows `Link` pagination and reports
/// rate-limit exhaustion as [`CollectorError::RateLimited`]; it never retries.
pub struct GithubClient {
    agent: ureq::Agent,
    base_url: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl GithubClient {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration, user_agent: &str) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(user_agent)
            .build();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get(&self, url: &str) -> Result<ureq::Response> {
        tracing::debug!(%url, "GET");
        let mut request = self
            .agent
            .get(url)
            .set("Accept", "application/vnd.github+json")
            .set("X-GitHub-Api-Version", "2022-11-28");
        if let Some(token) = &self.token {
            request = request.set("Authorization", &format!("Bearer {token}"));
        }

        match request.call() {
            Ok(response) => Ok(response),
            Err(ureq::Error::Status(status, response)) => {
                let remaining = response.header("x-ratelimit-remaining").map(str::to_string);
                let reset = response.header("x-ratelimit-reset").map(str::to_string);
                let retry_after = response.header("retry-after").map(str::to_string);
                let body = response.into_string().unwrap_or_default();
                Err(classify_status(
                    status,
                    RateLimitHeaders {
                        remaining: remaining.as_deref(),
                        reset: reset.as_deref(),
                        retry_after: retry_after.as_deref(),
                    },
                    &body,
                    Utc::now(),
                ))
            }
            Err(ureq::Error::Transport(transport)) => {
                Err(CollectorError::Http(format!("{url}: {transport}")))
            }
        }
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.get(url)?
            .into_json()
            .map_err(|e| CollectorError::Http(format!("invalid response body from {url}: {e}")))
    }

    /// Walks every page starting at `first_url` until there is no `next`
    /// link or `keep_paging` returns false for the page just read.
    fn paginate<T, F>(&self, first_url: String, mut keep_paging: F) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
        F: FnMut(&[T]) -> bool,
    {
        let mut items = Vec::new();
        let mut next = Some(first_url);
        while let Some(url) = next.take() {
            let response = self.get(&url)?;
            if response.status() == 204 {
                break;
            }
            let link = response.header("link").and_then(next_link);
            let page: Vec<T> = response.into_json().map_err(|e| {
                CollectorError::Http(format!("invalid response body from {url}: {e}"))
            })?;
            let more = !page.is_empty() && keep_paging(&page);
            items.extend(page);
            if more {
                next = link;
            }
        }
        Ok(items)
    }
}

impl GithubApi for GithubClient {
    fn organization(&self, name: &str) -> Result<Organization> {
        self.get_json(&self.url(&format!("/orgs/{name}")))
            .map_err(|e| not_found_as_organization(e, name))
    }

    fn public_repositories(&self, org: &str) -> Result<Vec<Repository>> {
        let url = self.url(&format!("/orgs/{org}/repos?type=public&per_page={PER_PAGE}"));
        self.paginate(url, |_| true)
            .map_err(|e| not_found_as_organization(e, org))
    }

    fn commits_since(&self, repo: &Repository, since: DateTime<Utc>) -> Result<u64> {
        let url = self.url(&format!(
            "/repos/{}/commits?since={}&per_page={PER_PAGE}",
            repo.full_name,
            since.to_rfc3339_opts(SecondsFormat::Secs, true)
        ));
        let commits: Vec<IgnoredAny> = self.paginate(url, |_| true)?;
        Ok(commits.len() as u64)
    }

    fn contributors(&self, repo: &Repository) -> Result<u64> {
        let url = self.url(&format!(
            "/repos/{}/contributors?per_page={PER_PAGE}",
            repo.full_name
        ));
        let contributors: Vec<IgnoredAny> = self.paginate(url, |_| true)?;
        Ok(contributors.len() as u64)
    }

    fn pull_requests(&self, repo: &Repository, since: DateTime<Utc>) -> Result<Vec<PullRequest>> {
        let url = self.url(&format!(
            "/repos/{}/pulls?state=all&sort=created&direction=desc&per_page={PER_PAGE}",
            repo.full_name
        ));
        self.paginate(url, |page: &[PullRequest]| pulls_page_continues(page, since))
    }
}

/// Pulls are listed newest-created first, so once a page reaches `since`
/// every later page is older still.
pub(crate) fn pulls_page_continues(page: &[PullRequest], since: DateTime<Utc>) -> bool {
    page.last().is_some_and(|pr| pr.created_at > since)
}

fn not_found_as_organization(err: CollectorError, org: &str) -> CollectorError {
    match err {
        CollectorError::Api { status: 404, .. } => {
            CollectorError::OrganizationNotFound(org.to_string())
        }
        other => other,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct RateLimitHeaders<'a> {
    pub remaining: Option<&'a str>,
    pub reset: Option<&'a str>,
    pub retry_after: Option<&'a str>,
}

pub(crate) fn classify_status(
    status: u16,
    headers: RateLimitHeaders<'_>,
    body: &str,
    now: DateTime<Utc>,
) -> CollectorError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.message)
        .unwrap_or_else(|| body.trim().to_string());

    let exhausted = headers.remaining.map(str::trim) == Some("0");
    let secondary = message.to_lowercase().contains("rate limit");
    if matches!(status, 403 | 429) && (exhausted || secondary || status == 429) {
        let reset = headers
            .reset
            .and_then(|value| value.trim().parse::<i64>().ok())
            .and_then(|epoch| Utc.timestamp_opt(epoch, 0).single())
            .or_else(|| {
                headers
                    .retry_after
                    .and_then(|value| value.trim().parse::<i64>().ok())
                    .map(|secs| now + chrono::Duration::seconds(secs))
            })
            .unwrap_or(now);
        return CollectorError::RateLimited { reset };
    }

    CollectorError::Api { status, message }
}

/// Extracts the `rel="next"` target from a GitHub `Link` header.
pub(crate) fn next_link(header: &str) -> Option<String> {
    header.split(',').find_map(|part| {
        let mut pieces = part.split(';');
        let target = pieces.next()?.trim();
        let is_next = pieces.any(|param| param.trim() == "rel=\"next\"");
        if !is_next {
            return None;
        }
        target
            .strip_prefix('<')
            .and_then(|rest| rest.strip_suffix('>'))
            .map(str::to_string)
    })
}
