//! Artist models.
//!
//! [`ChartArtist`] is an entry as it arrives on a chart page; [`Record`] is
//! the flattened row the rest of the pipeline works on.

use serde::{Deserialize, Serialize};

use super::common::Image;

/// An artist entry as delivered in `artists.artist[]`.
///
/// Numeric columns stay as the strings Last.fm sends until export.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChartArtist {
    /// Artist name.
    pub name: String,

    /// Number of unique listeners.
    pub listeners: String,

    /// Total scrobbles.
    pub playcount: String,

    /// MusicBrainz ID, often empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mbid: Option<String>,

    /// Last.fm artist page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Streamable flag ("0"/"1").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub streamable: Option<String>,

    /// Image references in several sizes.
    #[serde(default)]
    pub image: Vec<Image>,
}

impl ChartArtist {
    /// Create an entry with just name and counts.
    pub fn new<S1, S2, S3>(name: S1, listeners: S2, playcount: S3) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        Self {
            name: name.into(),
            listeners: listeners.into(),
            playcount: playcount.into(),
            ..Default::default()
        }
    }
}

/// One flattened artist row.
///
/// Equality and hashing cover every column, which is what de-duplication
/// keys on.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Record {
    /// Artist name, the record identifier.
    pub name: String,

    /// Listener count, raw.
    pub listeners: String,

    /// Play count, raw.
    pub playcount: String,

    /// MusicBrainz ID.
    pub mbid: Option<String>,

    /// Last.fm artist page.
    pub url: Option<String>,

    /// Streamable flag.
    pub streamable: Option<String>,

    /// Up to three top tags joined with ", ". `None` until enriched or when
    /// the lookup failed.
    pub tags: Option<String>,
}

impl From<ChartArtist> for Record {
    /// Drops the image references.
    fn from(artist: ChartArtist) -> Self {
        Self {
            name: artist.name,
            listeners: artist.listeners,
            playcount: artist.playcount,
            mbid: artist.mbid,
            url: artist.url,
            streamable: artist.streamable,
            tags: None,
        }
    }
}
