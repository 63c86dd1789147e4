//! Percent-annotated table rows.
//!
//! Every row compares each metric column against a reference column. The
//! reference cell shows its raw value; every other cell reads
//! `"<value> (<diff>)"`, e.g. `"150 (+50%)"`.

use std::collections::BTreeMap;

use serde::Serialize;

use super::audit::{AuditId, AuditMetric};
use super::labels::{self, LabelResolver};
use super::series::TimeSeriesMap;

/// A row of raw values before diff annotation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    pub log_ts: String,
    pub values: BTreeMap<AuditId, f64>,
}

/// Which column the other columns are compared against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Baseline {
    /// The first column in metric order.
    #[default]
    First,
    /// A specific audit; falls back to the first column if it is not shown.
    Audit(AuditId),
}

/// Direction of a cell's change relative to the reference column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Trend {
    Increase,
    Decrease,
    #[default]
    Flat,
}

impl Trend {
    /// Classify by the sign characters in the cell text.
    pub fn from_text(text: &str) -> Self {
        if text.contains('+') {
            Trend::Increase
        } else if text.contains('-') {
            Trend::Decrease
        } else {
            Trend::Flat
        }
    }
}

/// One annotated cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCell {
    pub audit_id: AuditId,
    pub value: f64,
    pub text: String,
    pub trend: Trend,
    pub is_reference: bool,
}

/// One table row: a timestamp plus one cell per metric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub cells: Vec<TableCell>,
    pub log_ts: String,
}

impl TableRow {
    pub fn cell(&self, audit_id: AuditId) -> Option<&TableCell> {
        self.cells.iter().find(|c| c.audit_id == audit_id)
    }

    /// Display text for `audit_id`, if that column exists.
    pub fn text(&self, audit_id: AuditId) -> Option<&str> {
        self.cell(audit_id).map(|c| c.text.as_str())
    }
}

/// Column key of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKey {
    LogTs,
    Audit(AuditId),
}

/// Column descriptor: title and the row field it shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableColumn {
    pub title: String,
    pub key: ColumnKey,
}

/// Percentage change from `baseline` to `current`, e.g. `"+50%"`.
///
/// A zero baseline yields `"0%"` whatever `current` is. That is a sentinel
/// for an undefined ratio, not a measured zero change.
pub fn format_diff(baseline: f64, current: f64) -> String {
    if baseline == 0.0 {
        return "0%".to_string();
    }
    // The cast also folds -0 into 0.
    let diff = ((current / baseline - 1.0) * 100.0).round() as i64;
    if diff > 0 {
        format!("+{}%", diff)
    } else {
        format!("{}%", diff)
    }
}

/// Distinct audit ids in first-appearance order.
pub fn column_ids(metrics: &[AuditMetric]) -> Vec<AuditId> {
    let mut ids: Vec<AuditId> = Vec::with_capacity(metrics.len());
    for metric in metrics {
        if !ids.contains(&metric.audit_id) {
            ids.push(metric.audit_id);
        }
    }
    ids
}

/// Annotate raw rows, using the first metric column as the reference.
pub fn with_percent_diff(metrics: &[AuditMetric], rows: Vec<RawRow>) -> Vec<TableRow> {
    with_percent_diff_from(metrics, rows, Baseline::First)
}

/// Annotate raw rows against the given baseline column.
///
/// Columns are the distinct audit ids of `metrics`; a column missing from a
/// row counts as 0. Values for audits outside `metrics` are dropped.
pub fn with_percent_diff_from(
    metrics: &[AuditMetric],
    rows: Vec<RawRow>,
    baseline: Baseline,
) -> Vec<TableRow> {
    let columns = column_ids(metrics);
    let reference = match baseline {
        Baseline::Audit(id) if columns.contains(&id) => Some(id),
        _ => columns.first().copied(),
    };

    rows.into_iter()
        .map(|row| {
            let reference_value = reference
                .and_then(|id| row.values.get(&id).copied())
                .unwrap_or(0.0);

            let cells = columns
                .iter()
                .map(|&audit_id| {
                    // Adding 0.0 turns -0 into 0.
                    let value = row.values.get(&audit_id).copied().unwrap_or(0.0) + 0.0;
                    let is_reference = Some(audit_id) == reference;
                    let text = if is_reference {
                        value.to_string()
                    } else {
                        format!("{} ({})", value, format_diff(reference_value, value))
                    };
                    TableCell {
                        audit_id,
                        value,
                        trend: Trend::from_text(&text),
                        text,
                        is_reference,
                    }
                })
                .collect();

            TableRow {
                cells,
                log_ts: row.log_ts,
            }
        })
        .collect()
}

/// Table rows for a time-series map.
///
/// Rows come out in the reverse of the map's order, while
/// [`to_chart_series`](super::series::to_chart_series) keeps the map's order.
pub fn to_table_rows(metrics: &[AuditMetric], series_map: &TimeSeriesMap) -> Vec<TableRow> {
    to_table_rows_from(metrics, series_map, Baseline::First)
}

/// [`to_table_rows`] with an explicit baseline column.
pub fn to_table_rows_from(
    metrics: &[AuditMetric],
    series_map: &TimeSeriesMap,
    baseline: Baseline,
) -> Vec<TableRow> {
    let rows = series_map
        .buckets()
        .iter()
        .rev()
        .map(|bucket| RawRow {
            log_ts: bucket.log_ts.clone(),
            values: bucket.values.clone(),
        })
        .collect();
    with_percent_diff_from(metrics, rows, baseline)
}

/// Table columns: the time column, then one column per distinct audit.
pub fn table_columns(metrics: &[AuditMetric], resolver: &dyn LabelResolver) -> Vec<TableColumn> {
    let mut columns = vec![TableColumn {
        title: resolver.resolve(labels::TIME),
        key: ColumnKey::LogTs,
    }];
    for audit_id in column_ids(metrics) {
        let title = metrics
            .iter()
            .find(|m| m.audit_id == audit_id)
            .map(|m| m.audit_name.clone())
            .unwrap_or_default();
        columns.push(TableColumn {
            title,
            key: ColumnKey::Audit(audit_id),
        });
    }
    columns
}
