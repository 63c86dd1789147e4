//! Audit query parameters: time dimension and date window.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::labels::{self, LabelResolver};
use crate::error::AuditError;

/// Layout of bucket timestamps sent by the audit service.
const LOG_TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Granularity of the audit buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeStaticsDim {
    #[default]
    Minute,
    Hour,
    Day,
}

impl TimeStaticsDim {
    pub const ALL: [TimeStaticsDim; 3] =
        [TimeStaticsDim::Minute, TimeStaticsDim::Hour, TimeStaticsDim::Day];

    /// Wire name, e.g. `"MINUTE"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeStaticsDim::Minute => "MINUTE",
            TimeStaticsDim::Hour => "HOUR",
            TimeStaticsDim::Day => "DAY",
        }
    }

    pub fn label(&self, resolver: &dyn LabelResolver) -> String {
        let key = match self {
            TimeStaticsDim::Minute => labels::DIM_MINUTE,
            TimeStaticsDim::Hour => labels::DIM_HOUR,
            TimeStaticsDim::Day => labels::DIM_DAY,
        };
        resolver.resolve(key)
    }

    /// Exclusive upper bound on `end - start`, in days. `None` for MINUTE,
    /// which always queries a single day.
    pub fn max_span_days(&self) -> Option<i64> {
        match self {
            TimeStaticsDim::Minute => None,
            TimeStaticsDim::Hour => Some(3),
            TimeStaticsDim::Day => Some(7),
        }
    }

    pub fn next(self) -> Self {
        match self {
            TimeStaticsDim::Minute => TimeStaticsDim::Hour,
            TimeStaticsDim::Hour => TimeStaticsDim::Day,
            TimeStaticsDim::Day => TimeStaticsDim::Minute,
        }
    }
}

impl fmt::Display for TimeStaticsDim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeStaticsDim {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MINUTE" => Ok(TimeStaticsDim::Minute),
            "HOUR" => Ok(TimeStaticsDim::Hour),
            "DAY" => Ok(TimeStaticsDim::Day),
            _ => Err(AuditError::UnknownDimension(s.to_string())),
        }
    }
}

/// Start/end dates of an audit query plus its dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub time_statics_dim: TimeStaticsDim,
}

impl QueryWindow {
    /// A one-day window (the console's initial query).
    pub fn single_day(date: NaiveDate, dim: TimeStaticsDim) -> Self {
        Self {
            start_date: date,
            end_date: date,
            time_statics_dim: dim,
        }
    }

    /// The end date actually queried: MINUTE queries stay on the start day.
    pub fn effective_end(&self) -> NaiveDate {
        match self.time_statics_dim {
            TimeStaticsDim::Minute => self.start_date,
            _ => self.end_date,
        }
    }

    /// Check the window against the dimension's span limit.
    pub fn validate(&self) -> Result<(), AuditError> {
        let Some(max_days) = self.time_statics_dim.max_span_days() else {
            return Ok(());
        };

        let span = self.end_date.signed_duration_since(self.start_date);
        if span < Duration::zero() {
            return Err(AuditError::InvalidWindow(format!(
                "end date {} is before start date {}",
                self.end_date, self.start_date
            )));
        }
        if span >= Duration::days(max_days) {
            return Err(AuditError::InvalidWindow(format!(
                "{} queries must span less than {} days, got {} to {}",
                self.time_statics_dim, max_days, self.start_date, self.end_date
            )));
        }
        Ok(())
    }

    /// Earliest and latest selectable end dates.
    ///
    /// The latest bound is `None` for MINUTE, where the end date is not
    /// selectable at all.
    pub fn end_date_bounds(&self) -> (NaiveDate, Option<NaiveDate>) {
        let latest = self
            .time_statics_dim
            .max_span_days()
            .map(|days| self.start_date + Duration::days(days - 1));
        (self.start_date, latest)
    }

    /// Whether `date` may not be picked as the end date.
    pub fn is_end_date_disabled(&self, date: NaiveDate) -> bool {
        if self.time_statics_dim == TimeStaticsDim::Minute {
            return true;
        }
        let (earliest, latest) = self.end_date_bounds();
        date < earliest || latest.is_some_and(|latest| date > latest)
    }

    /// Move a disabled end date to the nearest selectable one.
    ///
    /// Returns true when the end date changed. MINUTE windows are left alone
    /// since their end date is not used.
    pub fn clamp_end_date(&mut self) -> bool {
        if self.time_statics_dim == TimeStaticsDim::Minute
            || !self.is_end_date_disabled(self.end_date)
        {
            return false;
        }
        let (earliest, latest) = self.end_date_bounds();
        self.end_date = match latest {
            Some(latest) if self.end_date > latest => latest,
            _ => earliest,
        };
        true
    }
}

/// Parse a bucket timestamp (`YYYY-MM-DD HH:MM:SS`).
pub fn parse_log_ts(log_ts: &str) -> Result<NaiveDateTime, AuditError> {
    NaiveDateTime::parse_from_str(log_ts.trim(), LOG_TS_FORMAT)
        .map_err(|_| AuditError::MalformedTimestamp(log_ts.to_string()))
}

/// Text for the time column: MINUTE buckets show only `HH:MM:SS`.
///
/// Timestamps that do not parse are shown unchanged.
pub fn format_log_ts(log_ts: &str, dim: TimeStaticsDim) -> String {
    match dim {
        TimeStaticsDim::Minute => match parse_log_ts(log_ts) {
            Ok(ts) => ts.format("%H:%M:%S").to_string(),
            Err(_) => log_ts.to_string(),
        },
        _ => log_ts.to_string(),
    }
}
