//! Label lookups: the i18n resolver and the sink-type registry.
//!
//! Both are plain `(key) -> string` lookups. The built-in tables carry the
//! English labels and the sink types known to the manager; settings files can
//! override or extend either.

use std::collections::HashMap;

/// Resolves an i18n key to a display string.
pub trait LabelResolver {
    /// Returns the label for `key`, or the key itself when it is unknown.
    fn resolve(&self, key: &str) -> String;
}

pub const RECEIVE: &str = "audit.receive";
pub const SEND: &str = "audit.send";
pub const TIME: &str = "audit.time";
pub const DIM_MINUTE: &str = "audit.dim.minute";
pub const DIM_HOUR: &str = "audit.dim.hour";
pub const DIM_DAY: &str = "audit.dim.day";

const DEFAULT_LABELS: &[(&str, &str)] = &[
    (RECEIVE, "Receive"),
    (SEND, "Send"),
    (TIME, "Time"),
    (DIM_MINUTE, "Minute"),
    (DIM_HOUR, "Hour"),
    (DIM_DAY, "Day"),
];

/// Key/value label table with English defaults.
#[derive(Debug, Clone)]
pub struct Labels {
    entries: HashMap<String, String>,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            entries: DEFAULT_LABELS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl Labels {
    /// Default labels with `overrides` applied on top.
    pub fn with_overrides(overrides: &HashMap<String, String>) -> Self {
        let mut labels = Self::default();
        for (key, value) in overrides {
            labels.entries.insert(key.clone(), value.clone());
        }
        labels
    }
}

impl LabelResolver for Labels {
    fn resolve(&self, key: &str) -> String {
        self.entries.get(key).cloned().unwrap_or_else(|| key.to_string())
    }
}

/// Sink types the manager ships with (type -> display name).
const BUILTIN_SINKS: &[(&str, &str)] = &[
    ("HIVE", "Hive"),
    ("CLICKHOUSE", "ClickHouse"),
    ("KAFKA", "Kafka"),
    ("ICEBERG", "Iceberg"),
    ("HUDI", "Hudi"),
    ("HBASE", "HBase"),
    ("POSTGRESQL", "PostgreSQL"),
    ("MYSQL", "MySQL"),
    ("ORACLE", "Oracle"),
    ("SQLSERVER", "SQLServer"),
    ("TDSQLPOSTGRESQL", "TDSQLPostgreSQL"),
    ("GREENPLUM", "Greenplum"),
    ("ELASTICSEARCH", "Elasticsearch"),
    ("STARROCKS", "StarRocks"),
    ("REDIS", "Redis"),
    ("DORIS", "Doris"),
    ("KUDU", "Kudu"),
    ("PULSAR", "Pulsar"),
    ("TUBEMQ", "TubeMQ"),
    ("HTTP", "HTTP"),
];

/// Registry mapping sink types (e.g. `"HIVE"`) to display names.
///
/// Sink types are matched case-insensitively.
#[derive(Debug, Clone)]
pub struct SinkRegistry {
    entries: HashMap<String, String>,
}

impl Default for SinkRegistry {
    fn default() -> Self {
        Self {
            entries: BUILTIN_SINKS
                .iter()
                .map(|(k, v)| (k.to_ascii_uppercase(), v.to_string()))
                .collect(),
        }
    }
}

impl SinkRegistry {
    /// An empty registry; nothing resolves.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Built-in sinks plus `extra` (which wins on conflicts).
    pub fn with_extra(extra: &HashMap<String, String>) -> Self {
        let mut registry = Self::default();
        for (sink_type, label) in extra {
            registry.entries.insert(sink_type.to_ascii_uppercase(), label.clone());
        }
        registry
    }

    /// Display name for a sink type, if registered.
    pub fn lookup(&self, sink_type: &str) -> Option<&str> {
        self.entries.get(&sink_type.to_ascii_uppercase()).map(String::as_str)
    }
}
