//! Unified harvester interface.
//!
//! Drives the pipeline stages in order on the caller's task: pagination,
//! flattening, enrichment and export. Nothing is spawned; each network call
//! is awaited before the next one is issued.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing::{debug, info, warn};

use crate::api::LastFmApi;
use crate::cache::ResponseCache;
use crate::config::HarvestConfig;
use crate::enrich::{self, EnrichStats};
use crate::error::{HarvestError, Result};
use crate::export::{self, ExportSummary};
use crate::flatten;
use crate::models::{PageAttr, Record, ResultSet};
use crate::paginator;
use crate::throttle::RateLimiter;

/// Result of a full run.
#[derive(Debug, Clone, PartialEq)]
pub struct HarvestReport {
    /// Pages collected before pagination stopped.
    pub pages: usize,
    /// Unique rows after flattening.
    pub records: usize,
    /// Enrichment counts.
    pub enrichment: EnrichStats,
    /// What the export wrote.
    pub export: ExportSummary,
}

/// Main harvester interface.
///
/// # Example
///
/// ```rust,no_run
/// use lastfm_harvester::{FileCache, HarvestConfig, Harvester};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = HarvestConfig::with_api_key("your_api_key");
///     let cache = FileCache::open(".lastfm-cache.json")?;
///     let harvester = Harvester::new(config, Box::new(cache))?;
///
///     let report = harvester.run().await?;
///     println!("Wrote {} artists", report.export.rows);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct Harvester {
    api: LastFmApi,
    limiter: RateLimiter,
    config: HarvestConfig,
    show_progress: bool,
}

impl Harvester {
    /// Create a harvester talking to Last.fm over HTTP.
    pub fn new(config: HarvestConfig, cache: Box<dyn ResponseCache>) -> Result<Self> {
        config.validate()?;
        let api = LastFmApi::http(&config, cache)?;
        Ok(Self::with_api(config, api))
    }

    /// Create a harvester around an existing client.
    pub fn with_api(config: HarvestConfig, api: LastFmApi) -> Self {
        Self {
            api,
            limiter: RateLimiter::new(config.delay),
            config,
            show_progress: false,
        }
    }

    /// Show a progress bar on stderr during enrichment.
    pub fn set_show_progress(&mut self, show: bool) {
        self.show_progress = show;
    }

    /// Get the configuration.
    pub fn config(&self) -> &HarvestConfig {
        &self.config
    }

    /// Get the API client.
    pub fn api(&self) -> &LastFmApi {
        &self.api
    }

    /// Pagination attributes of the first chart page.
    pub async fn chart_summary(&self) -> Result<PageAttr> {
        let fetched = self.api.chart_top_artists(1, self.config.per_page).await?;
        self.limiter.after_fetch(fetched.from_cache).await;

        let attr = fetched.map(|page| page.attr).value;
        debug!(
            "@attr: page={} perPage={} total={} totalPages={}",
            attr.page, attr.per_page, attr.total, attr.total_pages
        );
        Ok(attr)
    }

    /// Collect chart pages until the page limit, the end of the chart or the
    /// first failure.
    pub async fn harvest_pages(&self) -> ResultSet {
        let api = &self.api;
        let limiter = &self.limiter;
        let per_page = self.config.per_page;

        paginator::paginate(self.config.max_pages, move |page| async move {
            let fetched = api.chart_top_artists(page, per_page).await?;
            limiter.after_fetch(fetched.from_cache).await;
            Ok::<_, HarvestError>(fetched.value)
        })
        .await
    }

    /// Flatten pages into unique rows.
    pub fn flatten(&self, pages: ResultSet) -> Vec<Record> {
        flatten::flatten(pages)
    }

    /// Look up tags for every distinct artist.
    pub async fn enrich(&self, records: &mut [Record]) -> EnrichStats {
        let progress = if self.show_progress {
            let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
            if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} tags {eta}") {
                bar.set_style(style);
            }
            bar
        } else {
            ProgressBar::hidden()
        };

        enrich::enrich(&self.api, &self.limiter, records, &progress).await
    }

    /// Coerce, sort and write the rows to the configured output path.
    pub fn export(&self, records: Vec<Record>) -> Result<ExportSummary> {
        export::export(records, &self.config.output)
    }

    /// Run all stages.
    ///
    /// The response cache is flushed before export; a failed flush is logged
    /// and does not stop the export.
    pub async fn run(&self) -> Result<HarvestReport> {
        let pages = self.harvest_pages().await;
        let page_count = pages.len();

        let mut records = self.flatten(pages);
        let record_count = records.len();

        let enrichment = self.enrich(&mut records).await;
        if let Err(e) = self.api.cache().flush().await {
            warn!("Could not persist response cache: {}", e);
        }

        let export = self.export(records)?;

        info!(
            "Harvest complete: {} pages, {} artists, {} rows written",
            page_count, record_count, export.rows
        );

        Ok(HarvestReport {
            pages: page_count,
            records: record_count,
            enrichment,
            export,
        })
    }
}
