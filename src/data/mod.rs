//! Audit data models and transforms.
//!
//! Everything in here is pure: query results go in, chart series, table rows
//! and labels come out.
//!
//! ## Submodules
//!
//! - [`audit`]: Metric definitions and the audit-code label table
//! - [`labels`]: i18n label resolver and sink-type registry
//! - [`series`]: Ordered time-series map and chart series
//! - [`table`]: Percent-annotated table rows and column descriptors
//! - [`query`]: Time dimension and query-window rules
//! - [`access`]: Access dashboard list state
//! - [`view`]: One-pass preparation of a query result for display
//!
//! ## Data Flow
//!
//! ```text
//! AuditSnapshot (raw JSON)
//!        │
//!        ▼
//! TimeSeriesMap::from_audit_sets()
//!        │
//!        ├──▶ to_chart_series()   (map order)
//!        │
//!        └──▶ to_table_rows()     (reversed map order)
//!                  │
//!                  └──▶ with_percent_diff() ──▶ format_diff()
//! ```

pub mod access;
pub mod audit;
pub mod labels;
pub mod query;
pub mod series;
pub mod table;
pub mod view;

pub use audit::{audit_label_for, AuditCode, AuditId, AuditItem, AuditMetric};
pub use labels::{LabelResolver, Labels, SinkRegistry};
pub use query::{format_log_ts, QueryWindow, TimeStaticsDim};
pub use series::{to_chart_series, AuditPoint, AuditSeries, ChartSeries, LineSeries, TimeSeriesMap};
pub use table::{
    format_diff, to_table_rows, to_table_rows_from, with_percent_diff, with_percent_diff_from,
    Baseline, RawRow, TableCell, TableRow, Trend,
};
pub use view::{AuditView, ViewOptions};
