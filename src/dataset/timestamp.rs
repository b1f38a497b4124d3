//! Flexible timestamp parsing for survey exports.
//!
//! Spreadsheet exports carry timestamps in whatever shape the form tool
//! produced. A value is either missing, parseable, or present but
//! unparseable; callers decide what to substitute for the last case.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

/// Datetime layouts tried in order after RFC 3339.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Date-only layouts; the time is taken as midnight.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];

/// Outcome of reading a record's timestamp field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RawTimestamp {
    /// Field absent, `null`, or an empty string.
    Missing,
    /// Field present and understood.
    Parsed(NaiveDateTime),
    /// Field present but in no recognised layout.
    Invalid,
}

impl RawTimestamp {
    /// Whether a timestamp value was present at all.
    pub fn was_present(&self) -> bool {
        !matches!(self, RawTimestamp::Missing)
    }

    /// The parsed value, or `fallback` when missing or invalid.
    pub fn or(self, fallback: NaiveDateTime) -> NaiveDateTime {
        match self {
            RawTimestamp::Parsed(ts) => ts,
            RawTimestamp::Missing | RawTimestamp::Invalid => fallback,
        }
    }
}

/// Classify a JSON field value as a timestamp.
///
/// Strings go through [`parse_timestamp`]; numbers are Unix epoch
/// milliseconds.
pub fn read_timestamp(value: Option<&Value>) -> RawTimestamp {
    match value {
        None | Some(Value::Null) => RawTimestamp::Missing,
        Some(Value::String(s)) if s.trim().is_empty() => RawTimestamp::Missing,
        Some(Value::String(s)) => parse_timestamp(s)
            .map(RawTimestamp::Parsed)
            .unwrap_or(RawTimestamp::Invalid),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(|dt| RawTimestamp::Parsed(dt.naive_utc()))
            .unwrap_or(RawTimestamp::Invalid),
        Some(_) => RawTimestamp::Invalid,
    }
}

/// Parse a timestamp string in any of the supported layouts.
///
/// Offset-aware inputs keep their wall-clock time as written; the offset is
/// dropped.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
