//! Harvester configuration.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{HarvestError, Result};

/// Base URL for the Last.fm web service. Every operation is a `method`
/// parameter on this single endpoint.
pub const API_BASE_URL: &str = "http://ws.audioscrobbler.com/2.0/";

/// User agent sent with every request. Last.fm asks for an identifiable one.
pub const DEFAULT_USER_AGENT: &str = concat!("lastfm-harvester/", env!("CARGO_PKG_VERSION"));

/// Settings for a harvest run.
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    /// Endpoint all requests are sent to.
    pub base_url: String,
    /// Last.fm API key.
    pub api_key: String,
    /// `User-Agent` header value.
    pub user_agent: String,
    /// Maximum number of chart pages to collect.
    pub max_pages: u32,
    /// Artists requested per chart page (`limit` parameter).
    pub per_page: u32,
    /// Pause after every live network call.
    pub delay: Duration,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Where the CSV is written.
    pub output: PathBuf,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            base_url: API_BASE_URL.to_string(),
            api_key: String::new(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_pages: 5,
            per_page: 500,
            delay: Duration::from_millis(250),
            timeout: Duration::from_millis(3500),
            output: PathBuf::from("artists.csv"),
        }
    }
}

impl HarvestConfig {
    /// Create a config with defaults and the given API key.
    pub fn with_api_key<S: Into<String>>(api_key: S) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Check the settings that would otherwise fail late, mid-run.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(HarvestError::Config("API key is empty".to_string()));
        }
        if self.user_agent.trim().is_empty() {
            return Err(HarvestError::Config("User-Agent is empty".to_string()));
        }
        if self.per_page == 0 {
            return Err(HarvestError::Config(
                "per-page limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
