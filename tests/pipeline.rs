//! End-to-end runs of the harvester against an in-memory Last.fm.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lastfm_harvester::error::Result;
use lastfm_harvester::{
    FileCache, HarvestConfig, HarvestError, Harvester, LastFmApi, MemoryCache, RawResponse,
    Transport,
};
use serde_json::{json, Value};
use tokio::time::Instant;

/// Serves chart pages and tag lookups from fixed data.
#[derive(Default)]
struct FakeLastFm {
    pages: Vec<Value>,
    fail_page: Option<u32>,
    tags: HashMap<String, (u16, String)>,
    calls: Arc<AtomicUsize>,
}

impl FakeLastFm {
    fn page(mut self, total_pages: u32, artists: &[(&str, &str, &str)]) -> Self {
        let number = self.pages.len() + 1;
        let artists: Vec<Value> = artists
            .iter()
            .map(|(name, listeners, playcount)| {
                json!({
                    "name": name,
                    "listeners": listeners,
                    "playcount": playcount,
                    "mbid": "",
                    "url": format!("https://www.last.fm/music/{}", name),
                    "streamable": "0",
                    "image": [{"#text": "https://img/x.png", "size": "small"}]
                })
            })
            .collect();
        self.pages.push(json!({
            "artists": {
                "@attr": {
                    "page": number.to_string(),
                    "perPage": artists.len().to_string(),
                    "total": "100",
                    "totalPages": total_pages.to_string()
                },
                "artist": artists
            }
        }));
        self
    }

    fn tags(mut self, artist: &str, names: &[&str]) -> Self {
        let tags: Vec<Value> = names.iter().map(|n| json!({"name": n})).collect();
        self.tags.insert(
            artist.to_string(),
            (200, json!({"toptags": {"tag": tags}}).to_string()),
        );
        self
    }

    fn tag_failure(mut self, artist: &str, status: u16) -> Self {
        self.tags
            .insert(artist.to_string(), (status, "unavailable".to_string()));
        self
    }

    fn fail_at(mut self, page: u32) -> Self {
        self.fail_page = Some(page);
        self
    }
}

#[async_trait]
impl Transport for FakeLastFm {
    async fn get(&self, _url: &str, query: &[(String, String)]) -> Result<RawResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let param = |key: &str| {
            query
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
                .unwrap_or_default()
        };

        let (status, body) = match param("method").as_str() {
            "chart.gettopartists" => {
                let page: u32 = param("page").parse().unwrap_or(0);
                if Some(page) == self.fail_page {
                    (500, "server error".to_string())
                } else {
                    match self.pages.get(page as usize - 1) {
                        Some(body) => (200, body.to_string()),
                        None => (404, String::new()),
                    }
                }
            }
            "artist.getTopTags" => self
                .tags
                .get(&param("artist"))
                .cloned()
                .unwrap_or((200, json!({"toptags": {"tag": []}}).to_string())),
            _ => (400, String::new()),
        };

        Ok(RawResponse { status, body })
    }
}

fn harvester(fake: FakeLastFm, output: &Path, delay: Duration) -> Harvester {
    let config = HarvestConfig {
        max_pages: 10,
        per_page: 2,
        delay,
        output: output.to_path_buf(),
        ..HarvestConfig::with_api_key("test-key")
    };
    let api = LastFmApi::new(&config, Box::new(fake), Box::new(MemoryCache::new()));
    Harvester::with_api(config, api)
}

#[tokio::test]
async fn full_run_writes_sorted_tagged_csv() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("artists.csv");

    let fake = FakeLastFm::default()
        .page(2, &[("A", "5", "10"), ("B", "20", "1")])
        .page(2, &[("A", "5", "10")])
        .tags("A", &["indie", "rock", "alternative", "british"])
        .tag_failure("B", 503);

    let report = harvester(fake, &output, Duration::ZERO).run().await.unwrap();

    assert_eq!(report.pages, 2);
    assert_eq!(report.records, 2);
    assert_eq!(report.enrichment.lookups, 2);
    assert_eq!(report.enrichment.failed, 1);

    let contents = std::fs::read_to_string(&output).unwrap();
    let lines: Vec<_> = contents.lines().collect();
    assert_eq!(lines[0], "name,listeners,playcount,tags,mbid,url,streamable");
    assert_eq!(lines[1], "B,20,1,,,https://www.last.fm/music/B,0");
    assert_eq!(
        lines[2],
        "A,5,10,\"indie, rock, alternative\",,https://www.last.fm/music/A,0"
    );
    assert_eq!(lines.len(), 3);
}

#[tokio::test]
async fn listing_failure_keeps_earlier_pages() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("artists.csv");

    let fake = FakeLastFm::default()
        .page(5, &[("A", "1", "1")])
        .page(5, &[("B", "2", "2")])
        .page(5, &[("C", "3", "3")])
        .fail_at(3);

    let h = harvester(fake, &output, Duration::ZERO);
    let pages = h.harvest_pages().await;
    assert_eq!(pages.len(), 2);

    let report = h.run().await.unwrap();
    assert_eq!(report.export.rows, 2);
}

#[tokio::test]
async fn non_numeric_listeners_abort_export() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("artists.csv");

    let fake = FakeLastFm::default().page(1, &[("A", "5", "10"), ("B", "n/a", "1")]);

    let err = harvester(fake, &output, Duration::ZERO)
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, HarvestError::Coercion { .. }));
    assert!(!output.exists());
}

#[tokio::test(start_paused = true)]
async fn cached_pages_skip_network_and_delay() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("artists.csv");

    let fake = FakeLastFm::default()
        .page(3, &[("A", "1", "1")])
        .page(3, &[("B", "2", "2")])
        .page(3, &[("C", "3", "3")]);
    let calls = fake.calls.clone();

    let h = harvester(fake, &output, Duration::from_millis(250));

    let start = Instant::now();
    assert_eq!(h.harvest_pages().await.len(), 3);
    assert!(start.elapsed() >= Duration::from_millis(750));
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    let start = Instant::now();
    assert_eq!(h.harvest_pages().await.len(), 3);
    assert_eq!(start.elapsed(), Duration::ZERO);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn chart_summary_reports_attributes() {
    let dir = tempfile::tempdir().unwrap();
    let fake = FakeLastFm::default().page(74480, &[("A", "1", "1")]);

    let attr = harvester(fake, &dir.path().join("a.csv"), Duration::ZERO)
        .chart_summary()
        .await
        .unwrap();

    assert_eq!(attr.page, 1);
    assert_eq!(attr.total_pages, 74480);
    assert_eq!(attr.total, 100);
}

#[tokio::test]
async fn unwritable_cache_does_not_block_export() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("artists.csv");
    let blocker = dir.path().join("blocker");
    std::fs::create_dir(&blocker).unwrap();
    let cache = FileCache::open(blocker.join("cache.json")).unwrap();

    // The cache directory becomes a plain file, so the flush cannot succeed.
    std::fs::remove_dir(&blocker).unwrap();
    std::fs::write(&blocker, "not a directory").unwrap();

    let fake = FakeLastFm::default()
        .page(1, &[("A", "5", "10")])
        .tags("A", &["rock"]);
    let config = HarvestConfig {
        delay: Duration::ZERO,
        output: output.clone(),
        ..HarvestConfig::with_api_key("test-key")
    };
    let api = LastFmApi::new(&config, Box::new(fake), Box::new(cache));

    let report = Harvester::with_api(config, api).run().await.unwrap();

    assert_eq!(report.export.rows, 1);
    let contents = std::fs::read_to_string(&output).unwrap();
    assert!(contents.contains("A,5,10,rock,"));
}
