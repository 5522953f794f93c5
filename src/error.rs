//! Typed errors for the library layer.
//!
//! The binary wraps these in `anyhow::Error`; library callers can match on them.

use thiserror::Error;

/// Why a date-like value could not be turned into a calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateParseError {
    #[error("value is not a date, year, or date string")]
    UnsupportedValue,
    #[error("`{0}` is not in YYYY, YYYY-MM, or YYYY-MM-DD form")]
    UnrecognizedFormat(String),
    #[error("`{0}` has a non-numeric component")]
    NonNumeric(String),
    #[error("{year:04}-{month:02}-{day:02} is not a valid calendar date")]
    OutOfRange { year: i64, month: i64, day: i64 },
}

/// Payload configuration problems (missing roles, columns, malformed JSON).
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("invalid chart payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no column with role `{0}`")]
    MissingRole(String),
    #[error("column `{column}` (role `{role}`) does not appear in any record")]
    MissingField { column: String, role: String },
    #[error("payload has no data records")]
    NoRecords,
}

/// Layout computations that have nothing to work with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("field `{field}` has no parseable dates")]
    EmptyDomain { field: String },
}
