use serde::{Deserialize, Serialize};

/// Organization-level summary. `Default` is the zero-valued set reported
/// for an organization without eligible repositories.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OrganizationMetrics {
    pub repo_count: u64,
    pub total_stars: u64,
    pub total_forks: u64,
    pub total_issues: u64,
    pub total_prs: u64,
    /// Summed per repository, so people active in several repositories
    /// are counted once per repository.
    pub contributor_count: u64,
    /// Commits per day over the lookback window.
    pub commit_frequency: f64,
    /// Mean review-time proxy in hours.
    pub response_time_avg: f64,
    pub recent_activity_score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    Count(u64),
    Ratio(f64),
}

impl std::fmt::Display for MetricValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Count(value) => write!(f, "{value}"),
            Self::Ratio(value) => write!(f, "{value}"),
        }
    }
}

impl OrganizationMetrics {
    /// Metric name/value pairs in output order.
    pub fn entries(&self) -> [(&'static str, MetricValue); 9] {
        [
            ("repo_count", MetricValue::Count(self.repo_count)),
            ("total_stars", MetricValue::Count(self.total_stars)),
            ("total_forks", MetricValue::Count(self.total_forks)),
            ("total_issues", MetricValue::Count(self.total_issues)),
            ("total_prs", MetricValue::Count(self.total_prs)),
            ("contributor_count", MetricValue::Count(self.contributor_count)),
            ("commit_frequency", MetricValue::Ratio(self.commit_frequency)),
            ("response_time_avg", MetricValue::Ratio(self.response_time_avg)),
            (
                "recent_activity_score",
                MetricValue::Ratio(self.recent_activity_score),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_follow_field_order() {
        let metrics = OrganizationMetrics {
            repo_count: 2,
            commit_frequency: 0.5,
            ..OrganizationMetrics::default()
        };
        let names: Vec<_> = metrics.entries().iter().map(|(name, _)| *name).collect();
        assert_eq!(names.first(), Some(&"repo_count"));
        assert_eq!(names.last(), Some(&"recent_activity_score"));
        assert_eq!(metrics.entries()[0].1.to_string(), "2");
        assert_eq!(metrics.entries()[6].1.to_string(), "0.5");
    }
}
