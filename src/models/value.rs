//! Scalar field values and their canonical text form
//!
//! Field values are stored in audit logs as text. The canonical form is
//! culture-invariant so the same value always produces the same string,
//! which is what change detection compares.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, Timelike, Utc};
use serde_json::Value;
use std::fmt;

/// A typed scalar value of an audited field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float32(f32),
    Float64(f64),
    /// Date-time with an explicit offset
    DateTime(DateTime<FixedOffset>),
    /// Date-time in UTC
    Utc(DateTime<Utc>),
    /// Date-time without zone information
    NaiveDateTime(NaiveDateTime),
    Date(NaiveDate),
}

impl FieldValue {
    /// Convert a JSON scalar into a field value
    ///
    /// `null` maps to `None`. Arrays and objects are kept as their compact
    /// JSON text.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Self::Int(i))
                } else if let Some(u) = n.as_u64() {
                    Some(Self::UInt(u))
                } else {
                    n.as_f64().map(Self::Float64)
                }
            }
            Value::String(s) => Some(Self::Text(s.clone())),
            Value::Array(_) | Value::Object(_) => Some(Self::Text(value.to_string())),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Bool(b) => f.write_str(if *b { "true" } else { "false" }),
            Self::Int(i) => write!(f, "{}", i),
            Self::UInt(u) => write!(f, "{}", u),
            Self::Float32(v) => f.write_str(&float_text(f64::from(*v), v.to_string())),
            Self::Float64(v) => f.write_str(&float_text(*v, v.to_string())),
            Self::DateTime(dt) => write!(
                f,
                "{}.{:07}{}",
                dt.format("%Y-%m-%dT%H:%M:%S"),
                ticks(dt.nanosecond()),
                dt.format("%:z")
            ),
            Self::Utc(dt) => f.write_str(&format_timestamp(dt)),
            Self::NaiveDateTime(dt) => write!(
                f,
                "{}.{:07}",
                dt.format("%Y-%m-%dT%H:%M:%S"),
                ticks(dt.nanosecond())
            ),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

/// Non-finite values get fixed names instead of Rust's `inf`/`NaN` spelling
fn float_text(v: f64, finite: String) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v.is_infinite() {
        if v > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else {
        finite
    }
}

/// Sub-second part in 100ns units; leap-second nanos wrap into range
fn ticks(nanos: u32) -> u32 {
    (nanos % 1_000_000_000) / 100
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

macro_rules! from_integer {
    ($variant:ident, $target:ty, $($source:ty),+) => {
        $(
            impl From<$source> for FieldValue {
                fn from(v: $source) -> Self {
                    Self::$variant(<$target>::from(v))
                }
            }
        )+
    };
}

from_integer!(Int, i64, i8, i16, i32, i64);
from_integer!(UInt, u64, u8, u16, u32, u64);

impl From<f32> for FieldValue {
    fn from(v: f32) -> Self {
        Self::Float32(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Float64(v)
    }
}

impl From<DateTime<FixedOffset>> for FieldValue {
    fn from(v: DateTime<FixedOffset>) -> Self {
        Self::DateTime(v)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(v: DateTime<Utc>) -> Self {
        Self::Utc(v)
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(v: NaiveDateTime) -> Self {
        Self::NaiveDateTime(v)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(v: NaiveDate) -> Self {
        Self::Date(v)
    }
}

/// Canonical text of an optional value; absent stays absent
pub fn to_canonical_string(value: Option<&FieldValue>) -> Option<String> {
    value.map(FieldValue::to_string)
}

/// Returns true when the canonical forms of two values differ
///
/// Comparison is byte-wise. Two absent values are equal.
pub fn has_changed(original: Option<&FieldValue>, current: Option<&FieldValue>) -> bool {
    to_canonical_string(original) != to_canonical_string(current)
}

/// Round-trip text of a UTC instant: `YYYY-MM-DDTHH:MM:SS.fffffffZ`
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    format!(
        "{}.{:07}Z",
        dt.format("%Y-%m-%dT%H:%M:%S"),
        ticks(dt.nanosecond())
    )
}

/// Parse an entry timestamp written by this crate or another writer
///
/// Accepts RFC 3339 with any fractional precision. Values without a zone
/// designator are read as UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// RFC 3339 text for human display, second precision
pub fn display_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_null_stays_null() {
        assert_eq!(to_canonical_string(None), None);
        assert!(!has_changed(None, None));
        assert!(has_changed(None, Some(&FieldValue::from("x"))));
        assert!(has_changed(Some(&FieldValue::from("x")), None));
    }

    #[test]
    fn test_bool_is_lowercase() {
        assert_eq!(FieldValue::from(true).to_string(), "true");
        assert_eq!(FieldValue::from(false).to_string(), "false");
    }

    #[test]
    fn test_numbers_are_invariant() {
        assert_eq!(FieldValue::from(1234567.25f64).to_string(), "1234567.25");
        assert_eq!(FieldValue::from(0.1f64).to_string(), "0.1");
        assert_eq!(FieldValue::from(0.1f32).to_string(), "0.1");
        assert_eq!(FieldValue::from(-42i32).to_string(), "-42");
        assert_eq!(FieldValue::from(u64::MAX).to_string(), "18446744073709551615");
        assert_eq!(FieldValue::from(f64::INFINITY).to_string(), "Infinity");
        assert_eq!(FieldValue::from(f64::NEG_INFINITY).to_string(), "-Infinity");
        assert_eq!(FieldValue::from(f64::NAN).to_string(), "NaN");
    }

    #[test]
    fn test_float_round_trips() {
        let v = 2.0f64 / 3.0;
        let text = FieldValue::from(v).to_string();
        assert_eq!(text.parse::<f64>().unwrap(), v);
        assert!(!text.contains(','));
    }

    #[test]
    fn test_utc_datetime_is_iso_ordered() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(
            FieldValue::from(dt).to_string(),
            "2024-03-09T14:05:07.0000000Z"
        );
    }

    #[test]
    fn test_offset_and_naive_datetime() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let dt = offset.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(
            FieldValue::from(dt).to_string(),
            "2024-03-09T14:05:07.0000000+02:00"
        );

        let naive = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_micro_opt(1, 2, 3, 456_789)
            .unwrap();
        assert_eq!(
            FieldValue::from(naive).to_string(),
            "2024-03-09T01:02:03.4567890"
        );

        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(FieldValue::from(date).to_string(), "2024-12-31");
    }

    #[test]
    fn test_has_changed_compares_canonical_text() {
        assert!(!has_changed(
            Some(&FieldValue::from(10i32)),
            Some(&FieldValue::from("10"))
        ));
        assert!(has_changed(
            Some(&FieldValue::from("abc")),
            Some(&FieldValue::from("ABC"))
        ));
        assert!(!has_changed(
            Some(&FieldValue::from(true)),
            Some(&FieldValue::from("true"))
        ));
    }

    #[test]
    fn test_from_json() {
        assert_eq!(FieldValue::from_json(&json!(null)), None);
        assert_eq!(FieldValue::from_json(&json!(5)), Some(FieldValue::Int(5)));
        assert_eq!(
            FieldValue::from_json(&json!(1.5)),
            Some(FieldValue::Float64(1.5))
        );
        assert_eq!(
            FieldValue::from_json(&json!({"a": 1})).map(|v| v.to_string()),
            Some("{\"a\":1}".to_string())
        );
    }

    #[test]
    fn test_timestamp_round_trip() {
        let dt = Utc
            .with_ymd_and_hms(2025, 1, 2, 3, 4, 5)
            .unwrap()
            .with_nanosecond(123_456_700)
            .unwrap();
        let text = format_timestamp(&dt);
        assert_eq!(text, "2025-01-02T03:04:05.1234567Z");
        assert_eq!(parse_timestamp(&text), Some(dt));
    }

    #[test]
    fn test_parse_timestamp_variants() {
        let expected = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(parse_timestamp("2025-01-02T03:04:05Z"), Some(expected));
        assert_eq!(parse_timestamp("2025-01-02T05:04:05+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-01-02T03:04:05"), Some(expected));
        assert_eq!(parse_timestamp("yesterday"), None);
    }
}
