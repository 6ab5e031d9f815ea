//! Error types for the Last.fm harvester.

use thiserror::Error;

/// Failure to decode a field out of a JSON response.
///
/// Together with a successful decode this gives three outcomes for every
/// field the pipeline reads: present and well-typed (`Ok`), present with the
/// wrong shape, or absent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The field does not exist in the response.
    #[error("missing field `{path}`")]
    Absent { path: String },

    /// The field exists but has an unexpected JSON type or value.
    #[error("field `{path}` is not {expected}")]
    WrongShape { path: String, expected: &'static str },
}

/// Main error type for all harvester operations.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// The API answered with a non-success HTTP status.
    #[error("{method} returned HTTP {status}")]
    Status { method: String, status: u16 },

    /// The API answered with a Last.fm error body (`{"error": .., "message": ..}`).
    #[error("{method} failed with API error {code}: {message}")]
    Api {
        method: String,
        code: i64,
        message: String,
    },

    /// A numeric column could not be coerced to an integer.
    #[error("cannot coerce {field} of `{name}` to an integer: {value:?}")]
    Coercion {
        name: String,
        field: &'static str,
        value: String,
    },

    /// Invalid configuration.
    #[error("Config error: {0}")]
    Config(String),

    /// A response was missing an expected field or had the wrong shape.
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// HTTP request failed.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// CSV writing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for harvester operations.
pub type Result<T> = std::result::Result<T, HarvestError>;
