//! Per-artist tag enrichment.

use std::collections::HashMap;

use indicatif::ProgressBar;
use tracing::{debug, error, info};

use crate::api::{ApiRequest, LastFmApi};
use crate::converters;
use crate::models::Record;
use crate::throttle::RateLimiter;

/// Number of tags kept per artist.
pub const MAX_TAGS: usize = 3;

/// Outcome counts of an enrichment sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichStats {
    /// Distinct artist names looked up.
    pub lookups: usize,
    /// Lookups served by the cache.
    pub cached: usize,
    /// Lookups that failed and left the tags empty.
    pub failed: usize,
}

/// Fill `tags` on every record with one lookup per distinct name.
///
/// A failed lookup leaves the tags of that name's records at `None` and the
/// sweep moves on. Live lookups are throttled by `limiter`.
pub async fn enrich(
    api: &LastFmApi,
    limiter: &RateLimiter,
    records: &mut [Record],
    progress: &ProgressBar,
) -> EnrichStats {
    let mut stats = EnrichStats::default();
    let mut tags_by_name: HashMap<String, Option<String>> = HashMap::new();

    let mut names: Vec<String> = Vec::new();
    for record in records.iter() {
        if !tags_by_name.contains_key(&record.name) {
            tags_by_name.insert(record.name.clone(), None);
            names.push(record.name.clone());
        }
    }

    progress.set_length(names.len() as u64);

    for name in names {
        stats.lookups += 1;
        let tags = lookup_tags(api, limiter, &name, &mut stats).await;
        tags_by_name.insert(name, tags);
        progress.inc(1);
    }
    progress.finish_and_clear();

    for record in records.iter_mut() {
        record.tags = tags_by_name.get(&record.name).cloned().flatten();
    }

    info!(
        "Enriched {} artists ({} cached, {} failed)",
        stats.lookups, stats.cached, stats.failed
    );
    stats
}

async fn lookup_tags(
    api: &LastFmApi,
    limiter: &RateLimiter,
    name: &str,
    stats: &mut EnrichStats,
) -> Option<String> {
    let fetched = match api.get_json(&ApiRequest::artist_top_tags(name)).await {
        Ok(fetched) => fetched,
        Err(e) => {
            error!("Error getting tags for {:?}: {}", name, e);
            stats.failed += 1;
            limiter.after_fetch(false).await;
            return None;
        }
    };

    if fetched.from_cache {
        stats.cached += 1;
    }
    limiter.after_fetch(fetched.from_cache).await;

    match converters::parse_top_tags(&fetched.value, MAX_TAGS) {
        Ok(tags) => {
            debug!("{}: {:?}", name, tags);
            Some(converters::format_tags(&tags))
        }
        Err(e) => {
            error!("Error reading tags for {:?}: {}", name, e);
            stats.failed += 1;
            None
        }
    }
}
