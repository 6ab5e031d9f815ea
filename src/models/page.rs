//! Chart pages and the set accumulated while paginating.

use serde::{Deserialize, Serialize};

use super::artist::ChartArtist;
use super::common::PageAttr;

/// One fetched chart page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Page {
    /// Pagination attributes reported with the page.
    pub attr: PageAttr,

    /// Artist entries in chart order.
    pub artists: Vec<ChartArtist>,
}

impl Page {
    /// Create a page from its number, the total page count and its entries.
    pub fn new(page: u32, total_pages: u32, artists: Vec<ChartArtist>) -> Self {
        Self {
            attr: PageAttr {
                page,
                per_page: u32::try_from(artists.len()).unwrap_or(u32::MAX),
                total: 0,
                total_pages,
            },
            artists,
        }
    }
}

/// Pages in the order they were fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    pages: Vec<Page>,
}

impl ResultSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a page.
    pub fn push(&mut self, page: Page) {
        self.pages.push(page);
    }

    /// Number of pages collected.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether no page was collected.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// The most recently collected page.
    pub fn last(&self) -> Option<&Page> {
        self.pages.last()
    }

    /// Number of artist entries across all pages, duplicates included.
    pub fn artist_count(&self) -> usize {
        self.pages.iter().map(|p| p.artists.len()).sum()
    }

    /// Borrow the pages.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Hand the pages over.
    pub fn into_pages(self) -> Vec<Page> {
        self.pages
    }
}

impl From<Vec<Page>> for ResultSet {
    fn from(pages: Vec<Page>) -> Self {
        Self { pages }
    }
}

impl IntoIterator for ResultSet {
    type Item = Page;
    type IntoIter = std::vec::IntoIter<Page>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artist_count_spans_pages() {
        let set = ResultSet::from(vec![
            Page::new(
                1,
                2,
                vec![ChartArtist::new("A", "1", "1"), ChartArtist::new("B", "1", "1")],
            ),
            Page::new(2, 2, vec![ChartArtist::new("A", "1", "1")]),
        ]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.artist_count(), 3);
        assert_eq!(set.last().map(|p| p.attr.page), Some(2));
    }

    #[test]
    fn test_new_page_counts_its_artists() {
        let page = Page::new(1, 1, vec![ChartArtist::new("A", "1", "1"); 3]);
        assert_eq!(page.attr.per_page, 3);
        assert_eq!(Page::new(1, 1, Vec::new()).attr.per_page, 0);
    }
}
