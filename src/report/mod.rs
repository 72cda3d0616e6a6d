pub mod json;
pub mod md;
pub mod text;

use crate::error::CollectorError;
use crate::types::metrics::OrganizationMetrics;

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Text,
    Json,
    Md,
}

pub fn render(metrics: &OrganizationMetrics, format: OutputFormat) -> Result<String, CollectorError> {
    match format {
        OutputFormat::Text => Ok(text::to_text(metrics)),
        OutputFormat::Json => json::to_json(metrics).map_err(CollectorError::Json),
        OutputFormat::Md => Ok(md::to_markdown(metrics)),
    }
}
