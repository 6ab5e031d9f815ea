//! HTTP transport.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// Status and body of one HTTP response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl RawResponse {
    /// Whether the status is 200 OK.
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Sends GET requests.
///
/// Non-success statuses are returned as responses, not errors; only failures
/// to complete the exchange are errors.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `url` with the given query parameters.
    async fn get(&self, url: &str, query: &[(String, String)]) -> Result<RawResponse>;
}

/// [`Transport`] backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport sending `user_agent` on every request and giving up
    /// after `timeout`.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str, query: &[(String, String)]) -> Result<RawResponse> {
        let response = self.client.get(url).query(query).send().await?;
        let status = response.status().as_u16();
        debug!("Status: {}", status);

        let body = response.text().await?;
        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_response_is_ok() {
        let ok = RawResponse {
            status: 200,
            body: String::new(),
        };
        let not_found = RawResponse {
            status: 404,
            ..ok.clone()
        };
        assert!(ok.is_ok());
        assert!(!not_found.is_ok());
    }

    #[test]
    fn test_http_transport_builds() {
        assert!(HttpTransport::new("lastfm-harvester/test", Duration::from_secs(1)).is_ok());
    }
}
