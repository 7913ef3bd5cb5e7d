//! Runtime value types for field comparison.
//!
//! The [`Value`] enum is what a record hands back when the engine asks for a
//! field. It borrows from the record, so searching and sorting a collection
//! does not copy any field data.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ListError, Result};

/// Runtime value of a record field, borrowed from the record.
///
/// # Example
///
/// ```
/// use listkit::{Number, Value};
///
/// struct Job {
///     title: String,
///     salary: u32,
///     posted_at: String,
/// }
///
/// fn accessor<'a>(job: &'a Job, field: &str) -> Value<'a> {
///     match field {
///         "title" => Value::String(&job.title),
///         "salary" => Value::Number(Number::U64(job.salary as u64)),
///         "posted_at" => Value::date(&job.posted_at),
///         _ => Value::None,
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// String value (borrowed).
    String(&'a str),
    /// Numeric value.
    Number(Number),
    /// Point in time.
    Timestamp(Timestamp),
    /// Enum discriminant.
    Enum(u32),
    /// Boolean value.
    Bool(bool),
    /// Field not present, null, or not queryable.
    None,
}

impl<'a> Value<'a> {
    /// Parses an ISO-8601 date string into a timestamp value.
    ///
    /// Strings that are not dates become [`Value::None`], so a malformed date
    /// on one record simply fails to match date filters.
    pub fn date(s: &str) -> Value<'a> {
        match Timestamp::parse(s) {
            Ok(ts) => Value::Timestamp(ts),
            Err(_) => Value::None,
        }
    }

    /// Returns `true` if this is a `None` value.
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Returns the name of this value's kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Number(_) => "number",
            Value::Timestamp(_) => "timestamp",
            Value::Enum(_) => "enum",
            Value::Bool(_) => "bool",
            Value::None => "none",
        }
    }

    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the number value, if present.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extracts the timestamp value, if present.
    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            Value::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    /// Extracts the enum discriminant, if present.
    pub fn as_enum(&self) -> Option<u32> {
        match self {
            Value::Enum(d) => Some(*d),
            _ => None,
        }
    }

    /// Extracts the boolean value, if present.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// Numeric value preserving the precision of its source type.
///
/// Comparisons between different variants are exact; see
/// [`Number::compare`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl Number {
    /// Converts the number to f64.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    /// Returns `true` for a floating point NaN.
    pub fn is_nan(self) -> bool {
        matches!(self, Number::F64(n) if n.is_nan())
    }

    /// Compares two numbers by their exact values, across representations.
    ///
    /// Returns `None` when either side is NaN. Every other pair is ordered,
    /// and the ordering is transitive across integers and floats.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self.as_integer(), other.as_integer()) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            (Some(a), None) => compare_int_float(a, other.to_f64()),
            (None, Some(b)) => compare_int_float(b, self.to_f64()).map(Ordering::reverse),
            (None, None) => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }

    fn as_integer(self) -> Option<i128> {
        match self {
            Number::I64(n) => Some(n as i128),
            Number::U64(n) => Some(n as i128),
            Number::F64(_) => None,
        }
    }
}

/// 2^127, the first float past `i128::MAX`.
const I128_LIMIT: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;

/// Exact comparison of an integer with a float; `None` for NaN.
fn compare_int_float(int: i128, float: f64) -> Option<Ordering> {
    if float.is_nan() {
        return None;
    }
    if float >= I128_LIMIT {
        return Some(Ordering::Less);
    }
    if float < -I128_LIMIT {
        return Some(Ordering::Greater);
    }

    let whole = float.trunc();
    // Integral and within range, so the cast is exact
    match int.cmp(&(whole as i128)) {
        Ordering::Equal => {
            let fraction = float - whole;
            if fraction > 0.0 {
                Some(Ordering::Less)
            } else if fraction < 0.0 {
                Some(Ordering::Greater)
            } else {
                Some(Ordering::Equal)
            }
        }
        ordering => Some(ordering),
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::I64(n) => write!(f, "{}", n),
            Number::U64(n) => write!(f, "{}", n),
            Number::F64(n) => write!(f, "{}", n),
        }
    }
}

macro_rules! number_from {
    ($variant:ident, $target:ty: $($source:ty),*) => {
        $(
            impl From<$source> for Number {
                fn from(n: $source) -> Self {
                    Number::$variant(n as $target)
                }
            }
        )*
    };
}

number_from!(I64, i64: i8, i16, i32, i64, isize);
number_from!(U64, u64: u8, u16, u32, u64, usize);
number_from!(F64, f64: f32, f64);

/// A point in time, stored as milliseconds since the Unix epoch.
///
/// Records usually carry dates as ISO-8601 strings; [`Timestamp::parse`]
/// turns those into instants so date filters and date sorting compare
/// moments rather than text. Serializes as an RFC 3339 string and
/// deserializes from either a string or a millisecond integer.
///
/// ```
/// use listkit::Timestamp;
///
/// let day = Timestamp::parse("2024-01-15").unwrap();
/// let later = Timestamp::parse("2024-01-15T09:30:00Z").unwrap();
/// assert!(day < later);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Creates a timestamp from milliseconds since the Unix epoch.
    pub fn from_millis(millis: i64) -> Self {
        Timestamp(millis)
    }

    /// Creates a timestamp from seconds since the Unix epoch.
    pub fn from_secs(secs: i64) -> Self {
        Timestamp(secs.saturating_mul(1000))
    }

    /// Returns the timestamp as milliseconds since the Unix epoch.
    pub fn as_millis(self) -> i64 {
        self.0
    }

    /// Parses an ISO-8601 string.
    ///
    /// Accepted forms:
    /// - RFC 3339 with offset: `2024-01-15T10:00:00Z`, `2024-01-15T10:00:00+07:00`
    /// - naive date-time, read as UTC: `2024-01-15T10:00:00`, `2024-01-15 10:00:00`
    /// - plain date, read as midnight UTC: `2024-01-15`
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Timestamp(dt.timestamp_millis()));
        }

        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
            if let Ok(ndt) = NaiveDateTime::parse_from_str(s, format) {
                return Ok(Timestamp(ndt.and_utc().timestamp_millis()));
            }
        }

        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|ndt| Timestamp(ndt.and_utc().timestamp_millis()))
            .ok_or_else(|| ListError::InvalidTimestamp(s.to_string()))
    }

    fn to_rfc3339(self) -> Option<String> {
        DateTime::from_timestamp_millis(self.0)
            .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

impl From<i64> for Timestamp {
    fn from(millis: i64) -> Self {
        Timestamp(millis)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_rfc3339() {
            Some(iso) => f.write_str(&iso),
            None => write!(f, "{}ms", self.0),
        }
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.to_rfc3339() {
            Some(iso) => serializer.serialize_str(&iso),
            None => serializer.serialize_i64(self.0),
        }
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Millis(i64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Millis(millis) => Ok(Timestamp(millis)),
            Raw::Text(text) => Timestamp::parse(&text).map_err(serde::de::Error::custom),
        }
    }
}
