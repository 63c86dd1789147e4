//! Console settings.
//!
//! Settings come from an optional TOML/YAML/JSON file and from environment
//! variables prefixed with `INLONG_AUDIT` (e.g. `INLONG_AUDIT_DIM=HOUR`).
//! Command-line flags win over both.
//!
//! ```toml
//! dim = "HOUR"
//! baseline = 3
//!
//! [labels]
//! "audit.receive" = "接收"
//! "audit.send" = "发送"
//!
//! [sinks]
//! MY_LAKE = "My Lake"
//! ```

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use ::config::{Config, Environment, File};
use serde::Deserialize;

use crate::data::{AuditId, Baseline, Labels, SinkRegistry, TimeStaticsDim, ViewOptions};

/// Settings loaded from file and environment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    /// Label overrides keyed by i18n key.
    #[serde(default)]
    pub labels: HashMap<String, String>,
    /// Additional sink types (type -> display name).
    #[serde(default)]
    pub sinks: HashMap<String, String>,
    /// Default time dimension.
    #[serde(default)]
    pub dim: Option<TimeStaticsDim>,
    /// Audit id of the default reference column.
    #[serde(default)]
    pub baseline: Option<AuditId>,
}

impl Settings {
    /// Load settings, reading `path` if given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let config = builder
            .add_source(
                Environment::with_prefix("INLONG_AUDIT")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// View options derived from these settings.
    pub fn view_options(&self) -> ViewOptions {
        ViewOptions {
            baseline: self.baseline.map_or(Baseline::First, Baseline::Audit),
            labels: Labels::with_overrides(&self.labels),
            sinks: SinkRegistry::with_extra(&self.sinks),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::LabelResolver;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_load_from_file() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
dim = "HOUR"
baseline = 4

[labels]
"audit.receive" = "In"

[sinks]
MY_LAKE = "My Lake"
"#
        )
        .unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.dim, Some(TimeStaticsDim::Hour));
        assert_eq!(settings.baseline, Some(4));

        let options = settings.view_options();
        assert_eq!(options.baseline, Baseline::Audit(4));
        assert_eq!(options.labels.resolve("audit.receive"), "In");
        assert_eq!(options.sinks.lookup("MY_LAKE"), Some("My Lake"));
        assert_eq!(options.sinks.lookup("HIVE"), Some("Hive"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(Settings::load(Some(Path::new("/nonexistent/inlong-audit.toml"))).is_err());
    }

    #[test]
    fn test_default_view_options() {
        let options = Settings::default().view_options();
        assert_eq!(options.baseline, Baseline::First);
        assert_eq!(options.labels.resolve("audit.send"), "Send");
    }
}
