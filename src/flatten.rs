//! Flattening pages into one de-duplicated table.

use std::collections::HashSet;

use tracing::debug;

use crate::models::{Record, ResultSet};

/// Flatten every page's artists into one table in page order, dropping the
/// image references and removing exact duplicate rows.
pub fn flatten(pages: ResultSet) -> Vec<Record> {
    let records: Vec<Record> = pages
        .into_iter()
        .flat_map(|page| page.artists)
        .map(Record::from)
        .collect();

    let total = records.len();
    let unique = dedup(records);
    debug!("Flattened {} rows, {} unique", total, unique.len());
    unique
}

/// Remove rows equal in every column to an earlier row, keeping first-seen
/// order.
pub fn dedup(records: Vec<Record>) -> Vec<Record> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|record| seen.insert(record.clone()))
        .collect()
}
