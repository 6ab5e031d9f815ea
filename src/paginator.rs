//! Sequential page collection.

use std::future::Future;

use tracing::{debug, error, info};

use crate::error::Result;
use crate::models::{Page, ResultSet};

/// Collect pages 1, 2, 3, … by calling `fetch` until one of:
///
/// - `max_pages` pages have been collected,
/// - a fetch fails (the failed page is dropped, nothing is retried),
/// - the collected page reports itself as the last page of the chart.
///
/// Pages collected before a failure are returned.
pub async fn paginate<F, Fut>(max_pages: u32, mut fetch: F) -> ResultSet
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Page>>,
{
    let mut pages = ResultSet::new();
    let mut page_number = 1u32;

    while (pages.len() as u32) < max_pages {
        debug!("Requesting page {}/{}", page_number, max_pages);

        match fetch(page_number).await {
            Ok(page) => {
                let last = page.attr.is_last();
                debug!(
                    "Page {}/{}: {} artists",
                    page.attr.page,
                    page.attr.total_pages,
                    page.artists.len()
                );
                pages.push(page);
                if last {
                    debug!("Reached the last page of the chart");
                    break;
                }
                page_number += 1;
            }
            Err(e) => {
                error!("Stopping pagination at page {}: {}", page_number, e);
                break;
            }
        }
    }

    info!(
        "Collected {} pages ({} artists)",
        pages.len(),
        pages.artist_count()
    );
    pages
}
