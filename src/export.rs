//! CSV export.
//!
//! Numeric columns are coerced up front; a single bad value aborts the
//! export before any file is created or touched. The CSV is written to a
//! temporary file next to the target and renamed over it.

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, error, info};

use crate::error::{HarvestError, Result};
use crate::models::Record;

/// One exported row, columns in output order.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ArtistRow {
    /// Artist name.
    pub name: String,
    /// Listener count.
    pub listeners: u64,
    /// Play count.
    pub playcount: u64,
    /// Top tags joined with ", ".
    pub tags: Option<String>,
    /// MusicBrainz ID.
    pub mbid: Option<String>,
    /// Last.fm artist page.
    pub url: Option<String>,
    /// Streamable flag.
    pub streamable: Option<String>,
}

impl TryFrom<Record> for ArtistRow {
    type Error = HarvestError;

    fn try_from(record: Record) -> Result<Self> {
        let listeners = coerce(&record.name, "listeners", &record.listeners)?;
        let playcount = coerce(&record.name, "playcount", &record.playcount)?;
        Ok(Self {
            name: record.name,
            listeners,
            playcount,
            tags: record.tags,
            mbid: record.mbid,
            url: record.url,
            streamable: record.streamable,
        })
    }
}

fn coerce(name: &str, field: &'static str, value: &str) -> Result<u64> {
    value.trim().parse().map_err(|_| HarvestError::Coercion {
        name: name.to_string(),
        field,
        value: value.to_string(),
    })
}

/// Minimum, maximum and mean of one numeric column.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ColumnStats {
    /// Smallest value, 0 for an empty column.
    pub min: u64,
    /// Largest value.
    pub max: u64,
    /// Arithmetic mean.
    pub mean: f64,
}

impl ColumnStats {
    fn of<I: Iterator<Item = u64>>(values: I) -> Self {
        let mut stats = Self {
            min: u64::MAX,
            ..Default::default()
        };
        let mut count = 0u64;
        let mut sum = 0f64;
        for v in values {
            stats.min = stats.min.min(v);
            stats.max = stats.max.max(v);
            sum += v as f64;
            count += 1;
        }
        if count == 0 {
            return Self::default();
        }
        stats.mean = sum / count as f64;
        stats
    }
}

/// What an export wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    /// Rows written, header excluded.
    pub rows: usize,
    /// Statistics of the listeners column.
    pub listeners: ColumnStats,
    /// Statistics of the playcount column.
    pub playcount: ColumnStats,
}

/// Coerce every record, failing on the first non-numeric count.
pub fn coerce_records(records: Vec<Record>) -> Result<Vec<ArtistRow>> {
    records.into_iter().map(ArtistRow::try_from).collect()
}

/// Sort by listeners, highest first. Ties keep their order.
pub fn sort_by_listeners(rows: &mut [ArtistRow]) {
    rows.sort_by(|a, b| b.listeners.cmp(&a.listeners));
}

/// Write rows as CSV with a header, replacing `path`.
pub fn write_csv(rows: &[ArtistRow], path: &Path) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    {
        let mut writer = csv::Writer::from_writer(tmp.as_file_mut());
        if rows.is_empty() {
            writer.write_record([
                "name",
                "listeners",
                "playcount",
                "tags",
                "mbid",
                "url",
                "streamable",
            ])?;
        }
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
    }
    tmp.as_file_mut().flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Coerce, sort and write `records` to `path`.
pub fn export(records: Vec<Record>, path: &Path) -> Result<ExportSummary> {
    let mut rows = coerce_records(records).inspect_err(|e| error!("Export aborted: {}", e))?;
    sort_by_listeners(&mut rows);

    for row in rows.iter().take(10) {
        debug!(
            "{:>12} listeners {:>14} plays  {} [{}]",
            row.listeners,
            row.playcount,
            row.name,
            row.tags.as_deref().unwrap_or("")
        );
    }

    write_csv(&rows, path)?;

    let summary = ExportSummary {
        rows: rows.len(),
        listeners: ColumnStats::of(rows.iter().map(|r| r.listeners)),
        playcount: ColumnStats::of(rows.iter().map(|r| r.playcount)),
    };
    info!("File saved: {} ({} rows)", path.display(), summary.rows);
    info!(
        "listeners min={} max={} mean={:.1}; playcount min={} max={} mean={:.1}",
        summary.listeners.min,
        summary.listeners.max,
        summary.listeners.mean,
        summary.playcount.min,
        summary.playcount.max,
        summary.playcount.mean
    );
    Ok(summary)
}
