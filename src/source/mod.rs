//! Data source abstraction for receiving audit query results.
//!
//! Sources deliver [`AuditSnapshot`]s from a polled JSON file or from a
//! newline-delimited JSON stream. The access dashboard reads through an
//! [`AccessBackend`].

mod access;
mod file;
mod snapshot;
mod stream;

pub use access::{AccessBackend, FileAccessBackend};
pub use file::FileSource;
pub use snapshot::{parse_snapshot, parse_snapshot_slice, AuditSnapshot, ResponseEnvelope};
pub use stream::StreamSource;

use std::fmt::Debug;

/// Trait for receiving audit query results from various sources.
///
/// # Example
///
/// ```
/// use inlong_audit::{DataSource, FileSource};
///
/// let mut source = FileSource::new("audit.json");
/// if let Some(snapshot) = source.poll() {
///     println!("Got {} audit series", snapshot.len());
/// }
/// ```
pub trait DataSource: Send + Debug {
    /// Poll for the latest query result.
    ///
    /// Returns `Some(snapshot)` if new data is available, `None` otherwise.
    /// This method must not block.
    fn poll(&mut self) -> Option<AuditSnapshot>;

    /// Human-readable description of the source, shown in the status bar.
    fn description(&self) -> &str;

    /// The error from the last poll, if any.
    fn error(&self) -> Option<String>;
}
