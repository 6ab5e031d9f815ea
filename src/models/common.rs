//! Types shared across the chart and artist models.

use serde::{Deserialize, Serialize};

/// Pagination attributes of one chart page (the `@attr` object).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageAttr {
    /// 1-based number of this page.
    pub page: u32,

    /// Artists per page, as reported by the API.
    pub per_page: u32,

    /// Total number of artists in the chart.
    pub total: u64,

    /// Total number of pages in the chart.
    pub total_pages: u32,
}

impl PageAttr {
    /// Whether this is the final page the chart reports.
    pub fn is_last(&self) -> bool {
        self.page >= self.total_pages
    }
}

/// Image reference attached to an artist entry.
///
/// Last.fm ships a list of these per artist; they carry no data the
/// harvester exports.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Image {
    /// URL of the image, possibly empty.
    #[serde(rename = "#text")]
    pub url: String,

    /// Size label: "small", "medium", "large", "extralarge", "mega".
    pub size: String,
}

impl Image {
    /// Create a new image reference.
    pub fn new<S1: Into<String>, S2: Into<String>>(url: S1, size: S2) -> Self {
        Self {
            url: url.into(),
            size: size.into(),
        }
    }
}
