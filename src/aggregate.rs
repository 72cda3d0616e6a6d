use crate::error::{CollectorError, Result};
use crate::types::metrics::OrganizationMetrics;
use crate::types::record::RepositoryRecord;

/// Upper bound on a single repository's smoothed star count in the
/// activity score.
pub const STAR_FACTOR_CAP: u64 = 1000;

/// Rejects records that cannot be aggregated meaningfully.
pub fn validate_records(records: &[RepositoryRecord]) -> Result<()> {
    for (index, record) in records.iter().enumerate() {
        if record.name.trim().is_empty() {
            return Err(CollectorError::InvalidRecord(format!(
                "record {index} has an empty name"
            )));
        }
        if let Some(hours) = record.avg_review_time_hours {
            if !hours.is_finite() || hours < 0.0 {
                return Err(CollectorError::InvalidRecord(format!(
                    "{}: avg_review_time_hours must be a non-negative number, got {hours}",
                    record.name
                )));
            }
        }
    }
    Ok(())
}

/// Reduces per-repository records into the organization summary.
///
/// `days_period` is the lookback window the records were collected with.
/// A zero window yields zero rates rather than dividing by zero.
pub fn aggregate(records: &[RepositoryRecord], days_period: u32) -> OrganizationMetrics {
    if records.is_empty() {
        return OrganizationMetrics::default();
    }

    let total_prs: u64 = records.iter().map(|r| r.recent_pr_count).sum();
    let commits: u64 = records.iter().map(|r| r.recent_commit_count).sum();

    let commit_frequency = per_day(commits, days_period);

    let response_times: Vec<f64> = records
        .iter()
        .filter_map(|r| r.avg_review_time_hours)
        .collect();
    let response_time_avg = if response_times.is_empty() {
        0.0
    } else {
        response_times.iter().sum::<f64>() / response_times.len() as f64
    };

    let activity = per_day(commits + total_prs, days_period);
    let star_sum: u64 = records
        .iter()
        .map(|r| r.stars.saturating_add(1).min(STAR_FACTOR_CAP))
        .sum();
    let star_factor = star_sum as f64 / records.len() as f64;

    OrganizationMetrics {
        repo_count: records.len() as u64,
        total_stars: records.iter().map(|r| r.stars).sum(),
        total_forks: records.iter().map(|r| r.forks).sum(),
        total_issues: records.iter().map(|r| r.open_issues).sum(),
        total_prs,
        contributor_count: records.iter().map(|r| r.contributor_count).sum(),
        commit_frequency,
        response_time_avg,
        recent_activity_score: activity * star_factor / 100.0,
    }
}

fn per_day(count: u64, days_period: u32) -> f64 {
    if days_period == 0 {
        0.0
    } else {
        count as f64 / f64::from(days_period)
    }
}
