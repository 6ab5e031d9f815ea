//! # lastfm-harvester
//!
//! Harvests the Last.fm top artists chart into a CSV file.
//!
//! ## Quick Start
//!
//! The easiest way to use this library is through the [`Harvester`] struct:
//!
//! ```rust,no_run
//! use lastfm_harvester::{HarvestConfig, Harvester, MemoryCache};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = HarvestConfig::with_api_key("your_api_key");
//!     let harvester = Harvester::new(config, Box::new(MemoryCache::new()))?;
//!
//!     // How big is the chart?
//!     let attr = harvester.chart_summary().await?;
//!     println!("{} pages", attr.total_pages);
//!
//!     // Paginate, flatten, tag and export to artists.csv
//!     let report = harvester.run().await?;
//!     println!("Wrote {} artists", report.export.rows);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! 1. **Pagination** ([`paginator`]) - chart pages are fetched in order until
//!    the page limit, the end of the chart, or the first failure
//! 2. **Throttling** ([`throttle`]) - a fixed pause after each live call;
//!    cached responses skip it
//! 3. **Flatten and enrich** ([`flatten`], [`enrich`]) - one de-duplicated
//!    table, then up to three top tags per artist
//! 4. **Export** ([`export`]) - numeric coercion, sort by listeners, CSV
//!
//! Responses are cached by request signature through the [`ResponseCache`]
//! given to the client.

pub mod api;
pub mod cache;
pub mod config;
pub mod converters;
pub mod enrich;
pub mod error;
pub mod export;
pub mod flatten;
mod harvester;
pub mod models;
pub mod paginator;
pub mod throttle;

// Main interface (recommended)
pub use harvester::{HarvestReport, Harvester};

// Building blocks
pub use api::{ApiRequest, Fetched, LastFmApi, RawResponse, Transport};
pub use cache::{FileCache, MemoryCache, NoCache, ResponseCache};
pub use config::HarvestConfig;
pub use error::{DecodeError, HarvestError};
pub use models::{ChartArtist, Page, PageAttr, Record, ResultSet};
pub use throttle::RateLimiter;
