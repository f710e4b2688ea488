//! Date keys and the date normalizer.
//!
//! Every calendar source reports dates in its own shape: plain `YYYY-MM-DD`
//! strings, naive ISO date-times, RFC 3339 instants, or epoch milliseconds.
//! [`normalize`] reduces all of them to a [`DateKey`], the local calendar day
//! used to index events.
//!
//! Wall-clock inputs (date-only text, naive date-times) keep their calendar
//! day verbatim. Absolute instants (offset-bearing text, epoch values) are
//! first converted into the local timezone so an event at 00:30 local time
//! never lands on the previous UTC day.

use std::fmt;
use std::str::FromStr;

use chrono::{
    DateTime, Days, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// The canonical `strftime` format of a [`DateKey`].
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Naive date-time layouts accepted in text inputs, tried in order.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Offset-bearing layouts that RFC 3339 parsing rejects (`+0800` without a colon).
const OFFSET_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// An input that could not be parsed into a valid calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid date: {input:?}")]
pub struct InvalidDateError {
    input: String,
}

impl InvalidDateError {
    /// Creates an error for the given rejected input.
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }

    /// Returns the rejected input as text.
    pub fn input(&self) -> &str {
        &self.input
    }
}

/// A local calendar day, rendered as `YYYY-MM-DD`.
///
/// Keys order chronologically and are immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(NaiveDate);

impl DateKey {
    /// Wraps a calendar date.
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Builds a key from year, month and day, if they form a valid date.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Returns the key of the current local day.
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    /// Returns the underlying date.
    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Returns the key `days` days later (or earlier when negative).
    ///
    /// Returns `None` when the result falls outside the representable range.
    pub fn add_days(&self, days: i64) -> Option<Self> {
        let delta = Days::new(days.unsigned_abs());
        let shifted = if days >= 0 {
            self.0.checked_add_days(delta)
        } else {
            self.0.checked_sub_days(delta)
        };
        shifted.map(Self)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_KEY_FORMAT))
    }
}

impl FromStr for DateKey {
    type Err = InvalidDateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), DATE_KEY_FORMAT)
            .map(Self)
            .map_err(|_| InvalidDateError::new(s))
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Any date-like value a source may report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateLike {
    /// Textual date: `YYYY-MM-DD`, a naive ISO date-time, or RFC 3339.
    Text(String),
    /// Milliseconds since the Unix epoch.
    EpochMillis(i64),
    /// An absolute instant.
    Instant(DateTime<Utc>),
    /// A local wall-clock date-time.
    Local(NaiveDateTime),
    /// A plain calendar date.
    Date(NaiveDate),
}

impl DateLike {
    /// Resolves the local calendar day of this value in `tz`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidDateError`] if the value does not describe a valid date.
    pub fn to_date_in<Tz: TimeZone>(&self, tz: &Tz) -> Result<NaiveDate, InvalidDateError> {
        self.resolve_in(tz).map(|(date, _)| date)
    }

    /// Resolves the calendar day of this value in the local timezone.
    pub fn to_local_date(&self) -> Result<NaiveDate, InvalidDateError> {
        self.to_date_in(&Local)
    }

    /// Returns the local wall-clock time of this value in `tz`.
    ///
    /// Date-only values and unparseable inputs have no time of day.
    pub fn time_in<Tz: TimeZone>(&self, tz: &Tz) -> Option<NaiveTime> {
        self.resolve_in(tz).ok().and_then(|(_, time)| time)
    }

    fn resolve_in<Tz: TimeZone>(
        &self,
        tz: &Tz,
    ) -> Result<(NaiveDate, Option<NaiveTime>), InvalidDateError> {
        match self {
            Self::Text(text) => parse_text(text, tz),
            Self::EpochMillis(ms) => DateTime::from_timestamp_millis(*ms)
                .map(|dt| split(dt.with_timezone(tz).naive_local()))
                .ok_or_else(|| InvalidDateError::new(ms.to_string())),
            Self::Instant(dt) => Ok(split(dt.with_timezone(tz).naive_local())),
            Self::Local(ndt) => Ok(split(*ndt)),
            Self::Date(date) => Ok((*date, None)),
        }
    }
}

fn split(ndt: NaiveDateTime) -> (NaiveDate, Option<NaiveTime>) {
    (ndt.date(), Some(ndt.time()))
}

fn parse_text<Tz: TimeZone>(
    text: &str,
    tz: &Tz,
) -> Result<(NaiveDate, Option<NaiveTime>), InvalidDateError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(InvalidDateError::new(text));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(split(dt.with_timezone(tz).naive_local()));
    }
    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::<FixedOffset>::parse_from_str(trimmed, format) {
            return Ok(split(dt.with_timezone(tz).naive_local()));
        }
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(split(ndt));
        }
    }

    NaiveDate::parse_from_str(trimmed, DATE_KEY_FORMAT)
        .map(|date| (date, None))
        .map_err(|_| InvalidDateError::new(text))
}

impl From<&str> for DateLike {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for DateLike {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<NaiveDate> for DateLike {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date)
    }
}

impl From<NaiveDateTime> for DateLike {
    fn from(ndt: NaiveDateTime) -> Self {
        Self::Local(ndt)
    }
}

impl From<DateTime<Utc>> for DateLike {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::Instant(dt)
    }
}

impl From<DateKey> for DateLike {
    fn from(key: DateKey) -> Self {
        Self::Date(key.date())
    }
}

impl fmt::Display for DateLike {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "{}", text),
            Self::EpochMillis(ms) => write!(f, "{}", ms),
            Self::Instant(dt) => write!(f, "{}", dt.to_rfc3339()),
            Self::Local(ndt) => write!(f, "{}", ndt.format("%Y-%m-%dT%H:%M:%S")),
            Self::Date(date) => write!(f, "{}", date.format(DATE_KEY_FORMAT)),
        }
    }
}

impl Serialize for DateLike {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::EpochMillis(ms) => serializer.serialize_i64(*ms),
            other => serializer.collect_str(other),
        }
    }
}

impl<'de> Deserialize<'de> for DateLike {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Text(String),
            Int(i64),
            Float(f64),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Text(text) => Self::Text(text),
            Repr::Int(ms) => Self::EpochMillis(ms),
            Repr::Float(ms) => Self::EpochMillis(ms as i64),
        })
    }
}

/// Normalizes a date-like value into the local [`DateKey`].
///
/// # Errors
///
/// Returns [`InvalidDateError`] if the input cannot be parsed.
pub fn normalize(input: &DateLike) -> Result<DateKey, InvalidDateError> {
    normalize_in(input, &Local)
}

/// Normalizes a date-like value using an explicit timezone for instants.
pub fn normalize_in<Tz: TimeZone>(input: &DateLike, tz: &Tz) -> Result<DateKey, InvalidDateError> {
    input.to_date_in(tz).map(DateKey)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    fn offset(hours: i32) -> FixedOffset {
        FixedOffset::east_opt(hours * 3600).unwrap()
    }

    mod date_key {
        use super::*;

        #[test]
        fn display_and_parse() {
            let k = DateKey::from_ymd(2025, 3, 1).unwrap();
            assert_eq!(k.to_string(), "2025-03-01");
            assert_eq!(key("2025-03-01"), k);
            assert_eq!(key(" 2025-03-01 "), k);
        }

        #[test]
        fn parse_rejects_garbage() {
            assert!("not-a-date".parse::<DateKey>().is_err());
            assert!("2025-02-30".parse::<DateKey>().is_err());
            assert!("".parse::<DateKey>().is_err());
        }

        #[test]
        fn add_days_crosses_month_boundaries() {
            assert_eq!(key("2025-01-31").add_days(1), Some(key("2025-02-01")));
            assert_eq!(key("2025-03-01").add_days(-1), Some(key("2025-02-28")));
            assert_eq!(key("2025-12-25").add_days(7), Some(key("2026-01-01")));
        }

        #[test]
        fn ordering_is_chronological() {
            assert!(key("2025-01-31") < key("2025-02-01"));
            assert!(key("2024-12-31") < key("2025-01-01"));
        }

        #[test]
        fn serde_as_string() {
            let json = serde_json::to_string(&key("2025-09-01")).unwrap();
            assert_eq!(json, "\"2025-09-01\"");
            let parsed: DateKey = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, key("2025-09-01"));
        }
    }

    mod normalizer {
        use super::*;
        use chrono::TimeZone;

        #[test]
        fn date_only_text() {
            let input = DateLike::from("2025-12-25");
            assert_eq!(normalize(&input).unwrap(), key("2025-12-25"));
        }

        #[test]
        fn naive_datetimes_keep_their_calendar_day() {
            for text in [
                "2025-09-01T23:59:00",
                "2025-09-01T08:00:00",
                "2025-09-01T08:00",
                "2025-09-01 08:00:00",
                "2025-09-01T08:00:00.250",
            ] {
                let input = DateLike::from(text);
                assert_eq!(normalize(&input).unwrap(), key("2025-09-01"), "{}", text);
            }
        }

        #[test]
        fn local_midnight_is_independent_of_offset() {
            let input = DateLike::from("2025-03-10T00:00:00");
            for hours in [-12, -5, 0, 8, 14] {
                assert_eq!(
                    normalize_in(&input, &offset(hours)).unwrap(),
                    key("2025-03-10"),
                    "offset {}",
                    hours
                );
            }
            assert_eq!(normalize(&input).unwrap(), key("2025-03-10"));
        }

        #[test]
        fn instants_use_the_local_day() {
            // 16:00 UTC on the 9th is already the 10th in UTC+8.
            let input = DateLike::from("2025-03-09T16:00:00Z");
            assert_eq!(normalize_in(&input, &offset(8)).unwrap(), key("2025-03-10"));
            assert_eq!(normalize_in(&input, &offset(-5)).unwrap(), key("2025-03-09"));

            let compact = DateLike::from("2025-03-09T16:00:00+0000");
            assert_eq!(normalize_in(&compact, &offset(8)).unwrap(), key("2025-03-10"));
        }

        #[test]
        fn epoch_millis() {
            let instant = Utc.with_ymd_and_hms(2025, 3, 9, 16, 0, 0).unwrap();
            let input = DateLike::EpochMillis(instant.timestamp_millis());
            assert_eq!(normalize_in(&input, &Utc).unwrap(), key("2025-03-09"));
            assert_eq!(normalize_in(&input, &offset(8)).unwrap(), key("2025-03-10"));
        }

        #[test]
        fn invalid_inputs_fail() {
            for text in ["not-a-date", "", "   ", "2025-13-01", "2025-02-30T10:00:00"] {
                let err = normalize(&DateLike::from(text)).unwrap_err();
                assert_eq!(err.input(), text);
            }
            assert!(normalize(&DateLike::EpochMillis(i64::MAX)).is_err());
        }

        #[test]
        fn normalization_is_idempotent() {
            let tz = offset(8);
            let inputs = [
                DateLike::from("2025-12-25"),
                DateLike::from("2025-09-01T23:59:00"),
                DateLike::from("2025-03-09T16:00:00Z"),
                DateLike::EpochMillis(1_741_536_000_000),
                DateLike::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()),
            ];
            for input in inputs {
                let first = normalize_in(&input, &tz).unwrap();
                let as_date = DateLike::Date(input.to_date_in(&tz).unwrap());
                assert_eq!(normalize_in(&as_date, &tz).unwrap(), first);
                let as_text = DateLike::from(first.to_string());
                assert_eq!(normalize_in(&as_text, &tz).unwrap(), first);
            }
        }

        #[test]
        fn time_of_day() {
            let tz = offset(8);
            let naive = DateLike::from("2025-09-01T23:59:00");
            assert_eq!(naive.time_in(&tz), NaiveTime::from_hms_opt(23, 59, 0));
            let instant = DateLike::from("2025-09-01T15:59:00Z");
            assert_eq!(instant.time_in(&tz), NaiveTime::from_hms_opt(23, 59, 0));
            assert_eq!(DateLike::from("2025-09-01").time_in(&tz), None);
            assert_eq!(DateLike::from("garbage").time_in(&tz), None);
        }

        #[test]
        fn deserializes_strings_and_numbers() {
            let text: DateLike = serde_json::from_str("\"2025-12-25\"").unwrap();
            assert_eq!(text, DateLike::from("2025-12-25"));
            let millis: DateLike = serde_json::from_str("1741536000000").unwrap();
            assert_eq!(millis, DateLike::EpochMillis(1_741_536_000_000));
            assert!(serde_json::from_str::<DateLike>("null").is_err());
        }
    }
}
