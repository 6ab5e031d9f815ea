//! Last.fm API client.
//!
//! All operations are GETs against one endpoint, selected by the `method`
//! parameter. Responses pass through the [`ResponseCache`] the client was
//! built with; every result reports whether it came from that cache.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{debug, error};

use crate::api::transport::{HttpTransport, RawResponse, Transport};
use crate::cache::ResponseCache;
use crate::config::HarvestConfig;
use crate::converters;
use crate::error::{HarvestError, Result};
use crate::models::Page;

/// Method selector for the top artists chart.
pub const CHART_TOP_ARTISTS: &str = "chart.gettopartists";

/// Method selector for an artist's top tags.
pub const ARTIST_TOP_TAGS: &str = "artist.getTopTags";

/// One API method call with its operation-specific parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    method: String,
    params: BTreeMap<String, String>,
}

impl ApiRequest {
    /// Create a call to `method`.
    pub fn new<S: Into<String>>(method: S) -> Self {
        Self {
            method: method.into(),
            params: BTreeMap::new(),
        }
    }

    /// Add a parameter.
    pub fn param<K: Into<String>, V: ToString>(mut self, key: K, value: V) -> Self {
        self.params.insert(key.into(), value.to_string());
        self
    }

    /// `chart.getTopArtists` for one page.
    pub fn chart_top_artists(page: u32, limit: u32) -> Self {
        Self::new(CHART_TOP_ARTISTS)
            .param("limit", limit)
            .param("page", page)
    }

    /// `artist.getTopTags` for one artist.
    pub fn artist_top_tags(artist: &str) -> Self {
        Self::new(ARTIST_TOP_TAGS).param("artist", artist)
    }

    /// The method selector.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Full query: method, operation parameters, API key and `format=json`,
    /// sorted by name.
    fn query(&self, api_key: &str) -> Vec<(String, String)> {
        let mut query = self.params.clone();
        query.insert("method".to_string(), self.method.clone());
        query.insert("api_key".to_string(), api_key.to_string());
        query.insert("format".to_string(), "json".to_string());
        query.into_iter().collect()
    }

    /// Cache key: base URL plus the sorted query, without the API key so
    /// persisted caches never hold it.
    pub fn signature(&self, base_url: &str) -> String {
        let query = self
            .query("")
            .into_iter()
            .filter(|(k, _)| k != "api_key")
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", base_url, query)
    }

    /// Parameters for logging, without the API key.
    fn describe(&self) -> String {
        let params = self
            .params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ");
        format!("{} {}", self.method, params)
    }
}

/// A decoded result and whether it was served by the cache.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    /// The decoded value.
    pub value: T,
    /// `true` when no network call was made.
    pub from_cache: bool,
}

impl<T> Fetched<T> {
    /// Transform the value, keeping the cache flag.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Fetched<U> {
        Fetched {
            value: f(self.value),
            from_cache: self.from_cache,
        }
    }
}

/// Last.fm API client.
///
/// # Example
///
/// ```rust,no_run
/// use lastfm_harvester::{HarvestConfig, LastFmApi, MemoryCache};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = HarvestConfig::with_api_key("your_api_key");
///     let api = LastFmApi::http(&config, Box::new(MemoryCache::new()))?;
///     let page = api.chart_top_artists(1, 50).await?;
///     println!("{} pages in the chart", page.value.attr.total_pages);
///     Ok(())
/// }
/// ```
pub struct LastFmApi {
    transport: Box<dyn Transport>,
    cache: Box<dyn ResponseCache>,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for LastFmApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LastFmApi")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl LastFmApi {
    /// Create a client over an arbitrary transport.
    pub fn new(
        config: &HarvestConfig,
        transport: Box<dyn Transport>,
        cache: Box<dyn ResponseCache>,
    ) -> Self {
        Self {
            transport,
            cache,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Create a client sending real HTTP requests.
    pub fn http(config: &HarvestConfig, cache: Box<dyn ResponseCache>) -> Result<Self> {
        let transport = HttpTransport::new(&config.user_agent, config.timeout)?;
        Ok(Self::new(config, Box::new(transport), cache))
    }

    /// The cache this client reads through.
    pub fn cache(&self) -> &dyn ResponseCache {
        self.cache.as_ref()
    }

    /// Perform a call and return the JSON body.
    ///
    /// Fails on transport errors, non-200 statuses and Last.fm error bodies.
    /// Only successful responses are cached.
    pub async fn get_json(&self, request: &ApiRequest) -> Result<Fetched<Value>> {
        let key = request.signature(&self.base_url);

        if let Some(cached) = self.cache.get(&key).await {
            debug!("GET {} (cached)", request.describe());
            let value = decode_body(request, &cached)?;
            return Ok(Fetched {
                value,
                from_cache: true,
            });
        }

        debug!("GET {}", request.describe());
        let response = self
            .transport
            .get(&self.base_url, &request.query(&self.api_key))
            .await?;

        if !response.is_ok() {
            error!(
                "{} returned HTTP {}: {}",
                request.method(),
                response.status,
                response.body
            );
            return Err(HarvestError::Status {
                method: request.method().to_string(),
                status: response.status,
            });
        }

        let value = decode_body(request, &response)?;
        self.cache.put(&key, response).await;

        Ok(Fetched {
            value,
            from_cache: false,
        })
    }

    /// Fetch one page of the top artists chart.
    pub async fn chart_top_artists(&self, page: u32, limit: u32) -> Result<Fetched<Page>> {
        let request = ApiRequest::chart_top_artists(page, limit);

        let fetched = self.get_json(&request).await?;
        let page = converters::parse_chart_page(&fetched.value)?;
        Ok(Fetched {
            value: page,
            from_cache: fetched.from_cache,
        })
    }

    /// Fetch up to `max` top tag names of an artist.
    pub async fn artist_top_tags(&self, artist: &str, max: usize) -> Result<Fetched<Vec<String>>> {
        let request = ApiRequest::artist_top_tags(artist);

        let fetched = self.get_json(&request).await?;
        let tags = converters::parse_top_tags(&fetched.value, max)?;
        Ok(Fetched {
            value: tags,
            from_cache: fetched.from_cache,
        })
    }
}

fn decode_body(request: &ApiRequest, response: &RawResponse) -> Result<Value> {
    let value: Value = serde_json::from_str(&response.body)?;

    if let Some((code, message)) = converters::api_error(&value) {
        error!("Last.fm API error on {}: {} ({})", request.method(), message, code);
        return Err(HarvestError::Api {
            method: request.method().to_string(),
            code,
            message,
        });
    }

    Ok(value)
}
