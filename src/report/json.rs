use crate::types::metrics::OrganizationMetrics;

pub fn to_json(metrics: &OrganizationMetrics) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(metrics)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_report_contains_metric_fields() {
        let metrics = OrganizationMetrics {
            repo_count: 4,
            commit_frequency: 0.5,
            ..OrganizationMetrics::default()
        };

        let rendered = to_json(&metrics).expect("json should serialize");
        assert!(rendered.contains("\"repo_count\": 4"));
        assert!(rendered.contains("\"commit_frequency\": 0.5"));
        assert!(rendered.contains("\"recent_activity_score\": 0.0"));
    }
}
