use crate::types::metrics::{MetricValue, OrganizationMetrics};

pub fn to_markdown(metrics: &OrganizationMetrics) -> String {
    let mut output = String::new();
    output.push_str("# Organization Metrics\n\n");
    output.push_str("| metric | value |\n");
    output.push_str("|---|---|\n");
    for (name, value) in metrics.entries() {
        let cell = match value {
            MetricValue::Count(count) => count.to_string(),
            MetricValue::Ratio(ratio) => format!("{ratio:.3}"),
        };
        output.push_str(&format!("| {name} | {cell} |\n"));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_report_is_a_metric_table() {
        let metrics = OrganizationMetrics {
            repo_count: 3,
            recent_activity_score: 1.040_15,
            ..OrganizationMetrics::default()
        };

        let rendered = to_markdown(&metrics);
        assert!(rendered.contains("# Organization Metrics"));
        assert!(rendered.contains("| repo_count | 3 |"));
        assert!(rendered.contains("| recent_activity_score | 1.040 |"));
    }
}
