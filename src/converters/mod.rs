//! JSON to model converters.
//!
//! Every field the pipeline reads goes through a typed lookup that reports
//! whether the field was absent or present with the wrong shape, instead of
//! chaining optional accesses.

use serde::Deserialize;
use serde_json::Value;

use crate::error::DecodeError;
use crate::models::{ChartArtist, Page, PageAttr};

/// Look up a dotted path (`"artists.@attr"`) in a JSON object.
pub fn field<'a>(json: &'a Value, path: &str) -> Result<&'a Value, DecodeError> {
    let mut current = json;
    for key in path.split('.') {
        let object = current.as_object().ok_or_else(|| DecodeError::WrongShape {
            path: path.to_string(),
            expected: "reachable through objects",
        })?;
        current = object.get(key).ok_or_else(|| DecodeError::Absent {
            path: path.to_string(),
        })?;
    }
    Ok(current)
}

/// Look up a string field.
pub fn str_field<'a>(json: &'a Value, path: &str) -> Result<&'a str, DecodeError> {
    field(json, path)?
        .as_str()
        .ok_or_else(|| wrong_shape(path, "a string"))
}

/// Look up a list field.
///
/// Last.fm collapses one-element lists into a bare object, so an object is
/// accepted as a list of one.
pub fn list_field<'a>(json: &'a Value, path: &str) -> Result<Vec<&'a Value>, DecodeError> {
    match field(json, path)? {
        Value::Array(items) => Ok(items.iter().collect()),
        object @ Value::Object(_) => Ok(vec![object]),
        _ => Err(wrong_shape(path, "an array")),
    }
}

/// Look up a non-negative count, sent either as a number or a digit string.
pub fn count_field(json: &Value, path: &str) -> Result<u64, DecodeError> {
    match field(json, path)? {
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| wrong_shape(path, "a non-negative integer")),
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| wrong_shape(path, "a non-negative integer")),
        _ => Err(wrong_shape(path, "a non-negative integer")),
    }
}

/// Like [`count_field`], but an absent field reads as zero.
fn optional_count(json: &Value, path: &str) -> Result<u64, DecodeError> {
    match count_field(json, path) {
        Err(DecodeError::Absent { .. }) => Ok(0),
        other => other,
    }
}

fn wrong_shape(path: &str, expected: &'static str) -> DecodeError {
    DecodeError::WrongShape {
        path: path.to_string(),
        expected,
    }
}

fn narrow(value: u64, path: &str) -> Result<u32, DecodeError> {
    u32::try_from(value).map_err(|_| wrong_shape(path, "within page range"))
}

/// Extract a Last.fm error body (`{"error": 6, "message": "..."}`).
pub fn api_error(json: &Value) -> Option<(i64, String)> {
    let code = json.get("error")?.as_i64()?;
    let message = json
        .get("message")
        .and_then(|m| m.as_str())
        .unwrap_or("Unknown error")
        .to_string();
    Some((code, message))
}

/// Parse the `artists.@attr` pagination block.
pub fn parse_page_attr(json: &Value) -> Result<PageAttr, DecodeError> {
    const PAGE: &str = "artists.@attr.page";
    const PER_PAGE: &str = "artists.@attr.perPage";
    const TOTAL_PAGES: &str = "artists.@attr.totalPages";

    field(json, "artists.@attr")?;
    Ok(PageAttr {
        page: narrow(count_field(json, PAGE)?, PAGE)?,
        per_page: narrow(optional_count(json, PER_PAGE)?, PER_PAGE)?,
        total: optional_count(json, "artists.@attr.total")?,
        total_pages: narrow(count_field(json, TOTAL_PAGES)?, TOTAL_PAGES)?,
    })
}

/// Parse one `chart.getTopArtists` response into a [`Page`].
pub fn parse_chart_page(json: &Value) -> Result<Page, DecodeError> {
    let attr = parse_page_attr(json)?;

    let entries = match list_field(json, "artists.artist") {
        Ok(entries) => entries,
        // An exhausted chart sends `"artist": []` or omits the list entirely.
        Err(DecodeError::Absent { .. }) => Vec::new(),
        Err(e) => return Err(e),
    };

    let artists = entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            ChartArtist::deserialize(entry)
                .map_err(|_| wrong_shape(&format!("artists.artist[{}]", i), "an artist object"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Page { attr, artists })
}

/// Parse an `artist.getTopTags` response, keeping at most `max` tag names.
pub fn parse_top_tags(json: &Value, max: usize) -> Result<Vec<String>, DecodeError> {
    list_field(json, "toptags.tag")?
        .into_iter()
        .take(max)
        .map(|tag| str_field(tag, "name").map(str::to_string))
        .collect()
}

/// Join tag names the way they appear in the export.
pub fn format_tags(tags: &[String]) -> String {
    tags.join(", ")
}
