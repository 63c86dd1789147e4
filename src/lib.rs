//! # inlong-audit
//!
//! A terminal console and library for inspecting InLong audit statistics.
//!
//! Audit query results (per-audit time series of record counts) are turned
//! into two presentations: line-chart series in bucket order, and table rows
//! in reverse bucket order where every metric cell is annotated with its
//! percentage difference from a reference column. A third view lists data
//! access records with status counts, paging, search and delete.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│ │
//! │  │ (state) │    │(transform)    │(rendering)   │         │ │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘ │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  ┌─────────┐                                                │
//! │  │ source  │◀── FileSource | StreamSource                   │
//! │  │ (input) │                                                │
//! │  └─────────┘                                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Console state, view navigation, baseline and dimension cycling
//! - **[`source`]**: Data source abstraction ([`DataSource`] trait) with file
//!   polling and newline-delimited JSON streams, plus the [`AccessBackend`]
//!   behind the access view
//! - **[`data`]**: The audit transform: time-series pivot, chart series,
//!   percent-diff table rows, audit labels, query-window rules
//! - **[`ui`]**: Terminal rendering using ratatui
//! - **[`config`]**: Label overrides, extra sink types and defaults
//! - **[`logging`]**: File-backed tracing setup
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Watch a query result file
//! inlong-audit --file audit.json --dim HOUR
//!
//! # Receive results over TCP, one JSON document per line
//! inlong-audit --connect localhost:9090
//!
//! # Also show the access dashboard from a record export
//! inlong-audit --file audit.json --access access.json
//!
//! # Write chart and table as JSON and exit
//! inlong-audit --file audit.json --export out.json
//! ```
//!
//! ### As a library
//!
//! ```
//! use inlong_audit::{parse_snapshot, AuditView, ViewOptions};
//!
//! let json = r#"[
//!     {"auditId": 3, "auditName": "Agent Receive",
//!      "auditSet": [{"logTs": "2024-05-01 10:00:00", "count": 100}]},
//!     {"auditId": 4, "auditName": "Agent Send",
//!      "auditSet": [{"logTs": "2024-05-01 10:00:00", "count": 80}]}
//! ]"#;
//! let snapshot = parse_snapshot(json).unwrap();
//! let view = AuditView::from_snapshot(&snapshot, &ViewOptions::default());
//!
//! assert_eq!(view.chart.x_axis, vec!["2024-05-01 10:00:00"]);
//! assert_eq!(view.rows[0].text(4), Some("80 (-20%)"));
//! ```
//!
//! ### With a stream source
//!
//! ```no_run
//! use std::io::Cursor;
//! use inlong_audit::{App, QueryWindow, StreamSource, TimeStaticsDim, ViewOptions};
//!
//! # tokio_test::block_on(async {
//! // In practice, use a TcpStream
//! let stream = Cursor::new(b"[]\n".to_vec());
//! let source = StreamSource::spawn(stream, "example");
//! let window = QueryWindow::single_day(
//!     chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
//!     TimeStaticsDim::Minute,
//! );
//! let app = App::new(Box::new(source), ViewOptions::default(), window);
//! # });
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod logging;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use data::{
    audit_label_for, format_diff, to_chart_series, to_table_rows, with_percent_diff, AuditCode,
    AuditId, AuditMetric, AuditSeries, AuditView, Baseline, ChartSeries, QueryWindow,
    TableRow, TimeSeriesMap, TimeStaticsDim, ViewOptions,
};
pub use error::AuditError;
pub use source::{
    parse_snapshot, AccessBackend, AuditSnapshot, DataSource, FileAccessBackend, FileSource,
    StreamSource,
};
