use crate::types::metrics::OrganizationMetrics;

/// One indented `name: value` line per metric.
pub fn to_text(metrics: &OrganizationMetrics) -> String {
    metrics
        .entries()
        .iter()
        .map(|(name, value)| format!("  {name}: {value}\n"))
        .collect()
}
