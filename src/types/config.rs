use super::artifact::{DEFAULT_LOOKBACK_DAYS, MAX_LOOKBACK_DAYS};
use crate::error::CollectorError;
use serde::Deserialize;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_OUTPUT: &str = "data/github_metrics.json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollectorConfig {
    pub github: Option<GithubConfig>,
    pub collect: Option<CollectConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GithubConfig {
    pub token: Option<String>,
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollectConfig {
    pub days: Option<u32>,
    pub output: Option<String>,
}

impl CollectorConfig {
    pub fn token(&self) -> Option<&str> {
        self.github
            .as_ref()
            .and_then(|github| github.token.as_deref())
            .filter(|token| !token.is_empty())
    }

    pub fn api_url(&self) -> &str {
        self.github
            .as_ref()
            .and_then(|github| github.api_url.as_deref())
            .unwrap_or(DEFAULT_API_URL)
    }

    pub fn timeout_secs(&self) -> u64 {
        self.github
            .as_ref()
            .and_then(|github| github.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    pub fn user_agent(&self) -> String {
        self.github
            .as_ref()
            .and_then(|github| github.user_agent.clone())
            .unwrap_or_else(|| format!("orgpulse/{}", env!("CARGO_PKG_VERSION")))
    }

    pub fn days(&self) -> u32 {
        self.collect
            .as_ref()
            .and_then(|collect| collect.days)
            .unwrap_or(DEFAULT_LOOKBACK_DAYS)
    }

    pub fn output(&self) -> &str {
        self.collect
            .as_ref()
            .and_then(|collect| collect.output.as_deref())
            .unwrap_or(DEFAULT_OUTPUT)
    }

    pub fn validate(&self) -> Result<(), CollectorError> {
        let api_url = self.api_url();
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(CollectorError::ConfigParse(format!(
                "github.api_url must be an http(s) URL, got '{api_url}'"
            )));
        }
        if self.days() > MAX_LOOKBACK_DAYS {
            return Err(CollectorError::ConfigParse(format!(
                "collect.days must be at most {MAX_LOOKBACK_DAYS}, got {}",
                self.days()
            )));
        }
        if self.timeout_secs() == 0 {
            return Err(CollectorError::ConfigParse(
                "github.timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
