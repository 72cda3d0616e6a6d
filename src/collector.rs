use crate::aggregate;
use crate::error::{CollectorError, Result};
use crate::extract;
use crate::github::{GithubApi, Organization, Repository};
use crate::types::artifact::{CollectionArtifact, OrganizationData, RawData};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::Path;

/// Scans every public repository of `org_name` and aggregates the result.
///
/// Failures looking up the organization or listing its repositories abort
/// the run; per-repository failures only degrade that repository's record.
pub fn collect_organization(
    api: &dyn GithubApi,
    org_name: &str,
    lookback_days: u32,
) -> Result<CollectionArtifact> {
    collect_organization_at(api, org_name, lookback_days, Utc::now())
}

pub(crate) fn collect_organization_at(
    api: &dyn GithubApi,
    org_name: &str,
    lookback_days: u32,
    now: DateTime<Utc>,
) -> Result<CollectionArtifact> {
    let since = extract::cutoff(now, lookback_days)?;
    let (org, repos) = match fetch_organization(api, org_name) {
        Ok(found) => found,
        Err(e) => {
            log_fatal(&e, org_name, now);
            return Err(e);
        }
    };

    tracing::info!(
        org = org_name,
        repositories = repos.len(),
        lookback_days,
        "collecting organization"
    );

    let records: Vec<_> = repos
        .iter()
        .filter_map(|repo| extract::extract_record(api, repo, since))
        .collect();

    let degraded = records
        .iter()
        .filter(|record| record.fetch_status.any_failed())
        .count();
    if degraded > 0 {
        tracing::warn!(
            org = org_name,
            degraded,
            "some repositories have incomplete data"
        );
    }

    let metrics = aggregate::aggregate(&records, lookback_days);

    Ok(CollectionArtifact {
        raw_data: RawData {
            organization: OrganizationData {
                name: org.display_name().to_string(),
                url: org.html_url.clone(),
                repos: records,
                collected_at: now,
                lookback_days,
            },
        },
        metrics,
        collected_at: Utc::now(),
    })
}

fn fetch_organization(
    api: &dyn GithubApi,
    org_name: &str,
) -> Result<(Organization, Vec<Repository>)> {
    let org = api.organization(org_name)?;
    let repos = api.public_repositories(org_name)?;
    Ok((org, repos))
}

fn log_fatal(err: &CollectorError, org_name: &str, now: DateTime<Utc>) {
    match err.rate_limit_wait(now) {
        Some(wait) => tracing::error!(
            org = org_name,
            reset_in_secs = wait.num_seconds(),
            "rate limit exceeded"
        ),
        None => tracing::error!(org = org_name, error = %err, "error collecting organization"),
    }
}

pub fn save_artifact(path: &Path, artifact: &CollectionArtifact) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(artifact)?;
    fs::write(path, json)?;
    tracing::info!(path = %path.display(), "artifact written");
    Ok(())
}

pub fn load_artifact(path: &Path) -> Result<CollectionArtifact> {
    if !path.exists() {
        return Err(CollectorError::PathNotFound(path.display().to_string()));
    }
    let content = fs::read_to_string(path)?;
    let artifact: CollectionArtifact = serde_json::from_str(&content)?;
    aggregate::validate_records(&artifact.raw_data.organization.repos)?;
    Ok(artifact)
}
