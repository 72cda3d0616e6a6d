use super::metrics::OrganizationMetrics;
use super::record::RepositoryRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_LOOKBACK_DAYS: u32 = 90;
pub const MAX_LOOKBACK_DAYS: u32 = 36_500;

fn default_lookback_days() -> u32 {
    DEFAULT_LOOKBACK_DAYS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationData {
    pub name: String,
    pub url: String,
    pub repos: Vec<RepositoryRecord>,
    pub collected_at: DateTime<Utc>,
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawData {
    pub organization: OrganizationData,
}

/// The document written at the end of a collection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionArtifact {
    pub raw_data: RawData,
    pub metrics: OrganizationMetrics,
    pub collected_at: DateTime<Utc>,
}
