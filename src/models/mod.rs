//! Data models for Last.fm chart responses and harvested rows.

pub mod artist;
pub mod common;
pub mod page;

// Re-exports for convenience
pub use artist::{ChartArtist, Record};
pub use common::{Image, PageAttr};
pub use page::{Page, ResultSet};
