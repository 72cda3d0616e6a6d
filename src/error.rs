use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CollectorError {
    #[error("rate limit exceeded; resets at {reset}")]
    RateLimited { reset: DateTime<Utc> },

    #[error("organization not found: {0}")]
    OrganizationNotFound(String),

    #[error("github api error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("http error: {0}")]
    Http(String),

    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("invalid record: {0}")]
    InvalidRecord(String),

    #[error("lookback window of {0} days is out of range")]
    InvalidLookback(u32),

    #[error("path does not exist: {0}")]
    PathNotFound(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CollectorError {
    /// Time until the rate limit resets, if this error is a rate-limit failure.
    pub fn rate_limit_wait(&self, now: DateTime<Utc>) -> Option<chrono::Duration> {
        match self {
            Self::RateLimited { reset } => Some((*reset - now).max(chrono::Duration::zero())),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CollectorError>;
