//! Response caches keyed by request signature.
//!
//! A cache is handed to [`LastFmApi`](crate::api::LastFmApi) explicitly; there
//! is no process-wide interception of network calls. Entries never expire.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::api::RawResponse;
use crate::error::Result;

/// Key-value store of responses keyed by request signature.
#[async_trait]
pub trait ResponseCache: Send + Sync {
    /// Look up a stored response.
    async fn get(&self, key: &str) -> Option<RawResponse>;

    /// Store a response, replacing any previous entry for `key`.
    async fn put(&self, key: &str, response: RawResponse);

    /// Number of stored responses.
    async fn len(&self) -> usize;

    /// Persist entries, for caches that outlive the process.
    async fn flush(&self) -> Result<()> {
        Ok(())
    }
}

/// Cache that stores nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

#[async_trait]
impl ResponseCache for NoCache {
    async fn get(&self, _key: &str) -> Option<RawResponse> {
        None
    }

    async fn put(&self, _key: &str, _response: RawResponse) {}

    async fn len(&self) -> usize {
        0
    }
}

/// In-process cache living as long as the value.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, RawResponse>>,
}

impl MemoryCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResponseCache for MemoryCache {
    async fn get(&self, key: &str) -> Option<RawResponse> {
        self.entries.read().await.get(key).cloned()
    }

    async fn put(&self, key: &str, response: RawResponse) {
        self.entries.write().await.insert(key.to_string(), response);
    }

    async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

/// Cache backed by a JSON file, loaded on open and written on [`flush`].
///
/// [`flush`]: ResponseCache::flush
#[derive(Debug)]
pub struct FileCache {
    path: PathBuf,
    entries: RwLock<HashMap<String, RawResponse>>,
}

impl FileCache {
    /// Open the cache at `path`.
    ///
    /// A missing file starts an empty cache. An unreadable or corrupt file is
    /// logged and ignored; it is overwritten on the next flush.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let entries = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<HashMap<String, RawResponse>>(&contents)
            {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Ignoring corrupt cache file {}: {}", path.display(), e);
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };

        debug!("Opened cache {} with {} entries", path.display(), entries.len());

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Location of the cache file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ResponseCache for FileCache {
    async fn get(&self, key: &str) -> Option<RawResponse> {
        self.entries.read().await.get(key).cloned()
    }

    async fn put(&self, key: &str, response: RawResponse) {
        self.entries.write().await.insert(key.to_string(), response);
    }

    async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    async fn flush(&self) -> Result<()> {
        let entries = self.entries.read().await;
        let json = serde_json::to_vec(&*entries)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&json)?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        debug!("Flushed {} cache entries to {}", entries.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(body: &str) -> RawResponse {
        RawResponse {
            status: 200,
            body: body.to_string(),
        }
    }

    #[tokio::test]
    async fn test_memory_cache_roundtrip() {
        let cache = MemoryCache::new();
        assert_eq!(cache.get("k").await, None);

        cache.put("k", ok("{}")).await;
        assert_eq!(cache.get("k").await, Some(ok("{}")));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_no_cache_stores_nothing() {
        let cache = NoCache;
        cache.put("k", ok("{}")).await;
        assert_eq!(cache.get("k").await, None);
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_file_cache_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");

        let cache = FileCache::open(&path).unwrap();
        assert_eq!(cache.len().await, 0);
        cache.put("k", ok(r#"{"a":1}"#)).await;
        cache.flush().await.unwrap();

        let reopened = FileCache::open(&path).unwrap();
        assert_eq!(reopened.get("k").await, Some(ok(r#"{"a":1}"#)));
    }

    #[tokio::test]
    async fn test_file_cache_ignores_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, "not json").unwrap();

        let cache = FileCache::open(&path).unwrap();
        assert_eq!(cache.len().await, 0);
    }
}
