//! Time-bucketed audit values and their chart form.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::audit::{AuditId, AuditMetric};
use crate::error::AuditError;

/// One data point of an audit series as returned by the audit service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditPoint {
    pub log_ts: String,
    pub count: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<f64>,
}

/// All points of one audit, as returned by the list-by-group endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditSeries {
    pub audit_id: AuditId,
    #[serde(default)]
    pub audit_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    #[serde(default)]
    pub audit_set: Vec<AuditPoint>,
}

impl AuditSeries {
    /// The metric definition this series reports.
    pub fn metric(&self) -> AuditMetric {
        AuditMetric {
            audit_id: self.audit_id,
            audit_name: self.audit_name.clone(),
            node_type: self.node_type.clone(),
        }
    }
}

/// Values of every audit at one timestamp.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeBucket {
    pub log_ts: String,
    pub values: BTreeMap<AuditId, f64>,
}

/// Ordered mapping from timestamp label to per-audit values.
///
/// Buckets keep the order they were inserted in (for JSON input, the order of
/// the object's keys). Nothing here sorts by time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "Map<String, Value>",
    into = "Map<String, Value>"
)]
pub struct TimeSeriesMap {
    buckets: Vec<TimeBucket>,
    index: HashMap<String, usize>,
}

impl TimeSeriesMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `audit_id` at `log_ts`, appending a bucket for unseen timestamps.
    pub fn insert(&mut self, log_ts: &str, audit_id: AuditId, value: f64) {
        let idx = match self.index.get(log_ts) {
            Some(&idx) => idx,
            None => {
                self.buckets.push(TimeBucket {
                    log_ts: log_ts.to_string(),
                    values: BTreeMap::new(),
                });
                self.index.insert(log_ts.to_string(), self.buckets.len() - 1);
                self.buckets.len() - 1
            }
        };
        self.buckets[idx].values.insert(audit_id, value);
    }

    /// Add an empty bucket (no values) if `log_ts` is unseen.
    pub fn touch(&mut self, log_ts: &str) {
        if !self.index.contains_key(log_ts) {
            self.buckets.push(TimeBucket {
                log_ts: log_ts.to_string(),
                values: BTreeMap::new(),
            });
            self.index.insert(log_ts.to_string(), self.buckets.len() - 1);
        }
    }

    pub fn get(&self, log_ts: &str, audit_id: AuditId) -> Option<f64> {
        let idx = *self.index.get(log_ts)?;
        self.buckets[idx].values.get(&audit_id).copied()
    }

    /// Timestamp labels in insertion order.
    pub fn timestamps(&self) -> impl DoubleEndedIterator<Item = &str> + '_ {
        self.buckets.iter().map(|b| b.log_ts.as_str())
    }

    pub fn buckets(&self) -> &[TimeBucket] {
        &self.buckets
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Pivot per-audit series into timestamp buckets.
    ///
    /// Timestamps appear in the order they are first seen while walking the
    /// series in order. A later point for the same audit and timestamp
    /// replaces the earlier one.
    pub fn from_audit_sets(sets: &[AuditSeries]) -> Self {
        let mut map = Self::new();
        for series in sets {
            for point in &series.audit_set {
                map.insert(&point.log_ts, series.audit_id, point.count);
            }
        }
        map
    }
}

impl TryFrom<Map<String, Value>> for TimeSeriesMap {
    type Error = AuditError;

    fn try_from(raw: Map<String, Value>) -> Result<Self, Self::Error> {
        let mut map = Self::new();
        for (log_ts, bucket) in raw {
            let Value::Object(values) = bucket else {
                return Err(AuditError::MalformedSeries(format!(
                    "bucket {} is not an object",
                    log_ts
                )));
            };
            map.touch(&log_ts);
            for (key, value) in values {
                let audit_id: AuditId = key.parse().map_err(|_| {
                    AuditError::MalformedSeries(format!("audit id {:?} at {}", key, log_ts))
                })?;
                let value = value.as_f64().ok_or_else(|| {
                    AuditError::MalformedSeries(format!(
                        "value {} for audit {} at {}",
                        value, audit_id, log_ts
                    ))
                })?;
                map.insert(&log_ts, audit_id, value);
            }
        }
        Ok(map)
    }
}

impl From<TimeSeriesMap> for Map<String, Value> {
    fn from(map: TimeSeriesMap) -> Self {
        map.buckets
            .into_iter()
            .map(|bucket| {
                let values: Map<String, Value> = bucket
                    .values
                    .into_iter()
                    .map(|(id, v)| (id.to_string(), serde_json::json!(v)))
                    .collect();
                (bucket.log_ts, Value::Object(values))
            })
            .collect()
    }
}

/// One line of the chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineSeries {
    pub name: String,
    pub audit_id: AuditId,
    /// Values aligned with [`ChartSeries::x_axis`].
    pub data: Vec<f64>,
}

/// Chart-ready data: legend, shared x axis and one line per metric.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub legend: Vec<String>,
    pub x_axis: Vec<String>,
    pub series: Vec<LineSeries>,
}

impl ChartSeries {
    /// Largest value across all series (0 when empty).
    pub fn y_max(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| s.data.iter().copied())
            .fold(0.0, f64::max)
    }
}

/// Build chart series from metric definitions and a time-series map.
///
/// The x axis follows the map's own order. Each metric yields one series
/// (duplicates included); absent values are plotted as 0.
pub fn to_chart_series(metrics: &[AuditMetric], series_map: &TimeSeriesMap) -> ChartSeries {
    let x_axis: Vec<String> = series_map.timestamps().map(str::to_string).collect();

    let series = metrics
        .iter()
        .map(|metric| LineSeries {
            name: metric.audit_name.clone(),
            audit_id: metric.audit_id,
            data: x_axis
                .iter()
                .map(|ts| series_map.get(ts, metric.audit_id).unwrap_or(0.0))
                .collect(),
        })
        .collect();

    ChartSeries {
        legend: metrics.iter().map(|m| m.audit_name.clone()).collect(),
        x_axis,
        series,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> Vec<AuditMetric> {
        vec![
            AuditMetric::new(3, "Agent Receive"),
            AuditMetric::new(4, "Agent Send"),
        ]
    }

    fn sample_map() -> TimeSeriesMap {
        let mut map = TimeSeriesMap::new();
        map.insert("2024-05-01 10:02:00", 3, 120.0);
        map.insert("2024-05-01 10:02:00", 4, 118.0);
        map.insert("2024-05-01 10:01:00", 3, 100.0);
        map.insert("2024-05-01 10:00:00", 4, 90.0);
        map
    }

    #[test]
    fn test_chart_axis_follows_map_order() {
        let chart = to_chart_series(&metrics(), &sample_map());
        assert_eq!(
            chart.x_axis,
            vec![
                "2024-05-01 10:02:00",
                "2024-05-01 10:01:00",
                "2024-05-01 10:00:00"
            ]
        );
        assert_eq!(chart.legend, vec!["Agent Receive", "Agent Send"]);
    }

    #[test]
    fn test_chart_series_lengths_match_axis() {
        let chart = to_chart_series(&metrics(), &sample_map());
        assert_eq!(chart.series.len(), 2);
        for series in &chart.series {
            assert_eq!(series.data.len(), chart.x_axis.len());
        }
    }

    #[test]
    fn test_chart_missing_values_default_to_zero() {
        let chart = to_chart_series(&metrics(), &sample_map());
        assert_eq!(chart.series[0].data, vec![120.0, 100.0, 0.0]);
        assert_eq!(chart.series[1].data, vec![118.0, 0.0, 90.0]);
    }

    #[test]
    fn test_chart_empty_map() {
        let chart = to_chart_series(&metrics(), &TimeSeriesMap::new());
        assert!(chart.x_axis.is_empty());
        assert!(chart.series.iter().all(|s| s.data.is_empty()));
        assert_eq!(chart.y_max(), 0.0);
    }

    #[test]
    fn test_chart_duplicate_metrics_produce_duplicate_series() {
        let mut metrics = metrics();
        metrics.push(AuditMetric::new(3, "Agent Receive"));
        let chart = to_chart_series(&metrics, &sample_map());
        assert_eq!(chart.series.len(), 3);
        assert_eq!(chart.series[0].data, chart.series[2].data);
    }

    #[test]
    fn test_y_max() {
        let chart = to_chart_series(&metrics(), &sample_map());
        assert_eq!(chart.y_max(), 120.0);
    }

    #[test]
    fn test_deserialize_preserves_key_order() {
        let json = r#"{
            "2024-05-01 10:02:00": {"3": 120, "4": 118},
            "2024-05-01 10:00:00": {"4": 90},
            "2024-05-01 10:01:00": {}
        }"#;
        let map: TimeSeriesMap = serde_json::from_str(json).unwrap();
        let order: Vec<&str> = map.timestamps().collect();
        assert_eq!(
            order,
            vec![
                "2024-05-01 10:02:00",
                "2024-05-01 10:00:00",
                "2024-05-01 10:01:00"
            ]
        );
        assert_eq!(map.get("2024-05-01 10:02:00", 4), Some(118.0));
        assert_eq!(map.get("2024-05-01 10:01:00", 3), None);
    }

    #[test]
    fn test_deserialize_rejects_non_numeric_values() {
        let json = r#"{"2024-05-01": {"3": "many"}}"#;
        let result: Result<TimeSeriesMap, _> = serde_json::from_str(json);
        assert!(result.is_err());

        let json = r#"{"2024-05-01": {"agent": 1}}"#;
        let result: Result<TimeSeriesMap, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_keeps_bucket_order() {
        let json = serde_json::to_string(&sample_map()).unwrap();
        let first = json.find("10:02:00").unwrap();
        let last = json.find("10:00:00").unwrap();
        assert!(first < last);
    }

    #[test]
    fn test_from_audit_sets_pivots_by_timestamp() {
        let json = r#"[
            {"auditId": 3, "auditName": "Agent Receive", "auditSet": [
                {"logTs": "2024-05-01 10:00:00", "count": 10},
                {"logTs": "2024-05-01 10:01:00", "count": 12}
            ]},
            {"auditId": 4, "auditName": "Agent Send", "auditSet": [
                {"logTs": "2024-05-01 10:01:00", "count": 11, "delay": 3},
                {"logTs": "2024-05-01 10:02:00", "count": 9}
            ]}
        ]"#;
        let sets: Vec<AuditSeries> = serde_json::from_str(json).unwrap();
        let map = TimeSeriesMap::from_audit_sets(&sets);

        let order: Vec<&str> = map.timestamps().collect();
        assert_eq!(
            order,
            vec![
                "2024-05-01 10:00:00",
                "2024-05-01 10:01:00",
                "2024-05-01 10:02:00"
            ]
        );
        assert_eq!(map.get("2024-05-01 10:01:00", 3), Some(12.0));
        assert_eq!(map.get("2024-05-01 10:01:00", 4), Some(11.0));
        assert_eq!(sets[1].metric().audit_name, "Agent Send");
    }
}
