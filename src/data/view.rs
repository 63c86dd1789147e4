//! Audit query results prepared for display.
//!
//! Turns a raw [`AuditSnapshot`] into chart series, annotated table rows and
//! column descriptors in one pass.

use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{anyhow, Result};
use serde_json::json;

use super::audit::{audit_label_for, AuditId, AuditMetric};
use super::labels::{Labels, SinkRegistry};
use super::series::{to_chart_series, ChartSeries, TimeSeriesMap};
use super::table::{table_columns, to_table_rows_from, Baseline, TableColumn, TableRow};
use crate::source::{parse_snapshot, AuditSnapshot};

/// Lookups and choices that shape an [`AuditView`].
#[derive(Debug, Clone, Default)]
pub struct ViewOptions {
    pub baseline: Baseline,
    pub labels: Labels,
    pub sinks: SinkRegistry,
}

/// Display-ready audit data.
#[derive(Debug, Clone)]
pub struct AuditView {
    pub metrics: Vec<AuditMetric>,
    pub series_map: TimeSeriesMap,
    pub chart: ChartSeries,
    pub rows: Vec<TableRow>,
    pub columns: Vec<TableColumn>,
    pub last_updated: Instant,
}

impl AuditView {
    /// Load and prepare a query result from a JSON file.
    pub fn load(path: &Path, options: &ViewOptions) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content, options)
    }

    /// Prepare a query result from JSON text.
    pub fn parse(content: &str, options: &ViewOptions) -> Result<Self> {
        let snapshot = parse_snapshot(content).map_err(|e| anyhow!(e))?;
        Ok(Self::from_snapshot(&snapshot, options))
    }

    /// Prepare a query result.
    ///
    /// Series without a name are labelled from their audit code and sink type.
    pub fn from_snapshot(snapshot: &AuditSnapshot, options: &ViewOptions) -> Self {
        let metrics: Vec<AuditMetric> = snapshot
            .iter()
            .map(|series| {
                let mut metric = series.metric();
                if metric.audit_name.trim().is_empty() {
                    metric.audit_name = audit_label_for(
                        metric.audit_id,
                        metric.node_type.as_deref(),
                        &options.labels,
                        &options.sinks,
                    );
                }
                metric
            })
            .collect();

        let series_map = TimeSeriesMap::from_audit_sets(snapshot);
        let chart = to_chart_series(&metrics, &series_map);
        let rows = to_table_rows_from(&metrics, &series_map, options.baseline);
        let columns = table_columns(&metrics, &options.labels);

        Self {
            metrics,
            series_map,
            chart,
            rows,
            columns,
            last_updated: Instant::now(),
        }
    }

    /// Audit id of the reference column under `baseline`.
    pub fn reference_id(&self, baseline: Baseline) -> Option<AuditId> {
        self.rows
            .first()
            .and_then(|row| row.cells.iter().find(|c| c.is_reference))
            .map(|c| c.audit_id)
            .or_else(|| match baseline {
                Baseline::Audit(id) if self.metrics.iter().any(|m| m.audit_id == id) => Some(id),
                _ => self.metrics.first().map(|m| m.audit_id),
            })
    }

    /// Name of the metric with `audit_id`.
    pub fn metric_name(&self, audit_id: AuditId) -> Option<&str> {
        self.metrics
            .iter()
            .find(|m| m.audit_id == audit_id)
            .map(|m| m.audit_name.as_str())
    }

    /// JSON export of the chart and table.
    pub fn to_export(&self) -> serde_json::Value {
        json!({
            "metrics": self.metrics,
            "chart": self.chart,
            "table": self.rows,
        })
    }
}
