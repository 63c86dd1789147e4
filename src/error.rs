//! Error types for audit queries and payloads.

use thiserror::Error;

/// Errors raised while validating audit queries or decoding audit payloads.
///
/// The transforms themselves never fail; these cover the edges where user
/// input or backend data is checked.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuditError {
    /// The requested date range is not allowed for the time dimension.
    #[error("Invalid query window: {0}")]
    InvalidWindow(String),

    /// A time dimension name that is not MINUTE, HOUR or DAY.
    #[error("Unknown time dimension: {0}")]
    UnknownDimension(String),

    /// A bucket timestamp that does not match `YYYY-MM-DD HH:MM:SS`.
    #[error("Malformed log timestamp: {0}")]
    MalformedTimestamp(String),

    /// A time-series payload with a non-numeric key or value.
    #[error("Malformed series payload: {0}")]
    MalformedSeries(String),
}
