//! Persisted points in time.
//!
//! Collections are rewritten wholesale, so a stored timestamp is kept exactly
//! as it was read. The instant is parsed on demand: RFC 3339 first, then
//! naive date-times and plain dates taken as UTC, then epoch milliseconds.
//! Values that parse as none of these are still written back untouched.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// A stored timestamp, serialised exactly as read.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use quizboard::domain::Timestamp;
///
/// let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().expect("valid");
/// let stamp: Timestamp = serde_json::from_str("\"2024-01-01\"").expect("any JSON loads");
/// assert_eq!(stamp.instant(), Some(at));
/// assert_eq!(serde_json::to_string(&stamp).expect("serialises"), "\"2024-01-01\"");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(Value);

impl Timestamp {
    /// The parsed instant, if the stored value is recognisable.
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match &self.0 {
            Value::String(raw) => parse(raw.trim()),
            Value::Number(millis) => millis
                .as_i64()
                .and_then(DateTime::<Utc>::from_timestamp_millis),
            _ => None,
        }
    }

    /// True when nothing was stored.
    pub fn is_absent(&self) -> bool {
        self.0.is_null()
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(at: DateTime<Utc>) -> Self {
        Self(Value::String(at.to_rfc3339_opts(SecondsFormat::Millis, true)))
    }
}

fn parse(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}
