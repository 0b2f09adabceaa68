//! Lenient deserializers for metric fields.
//!
//! Metric values arrive from hand-typed forms and loosely typed JSON, so a
//! missing, `null`, or non-numeric value reads as zero instead of failing the
//! whole record. Dates are the exception: they are required, but only the
//! literal `YYYY-MM-DD` prefix is ever read, so no timezone can shift the day.

use chrono::NaiveDate;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Interpret a JSON value as a monetary amount. Non-numeric and non-finite
/// values become `0.0`.
pub fn amount_from_value(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if parsed.is_finite() {
        parsed
    } else {
        0.0
    }
}

/// Interpret a JSON value as a count. Fractions truncate, negatives become 0.
pub fn count_from_value(value: &Value) -> u64 {
    let parsed = amount_from_value(value);
    if parsed <= 0.0 {
        0
    } else {
        // `as` saturates at u64::MAX for out-of-range floats.
        parsed.trunc() as u64
    }
}

/// Parse the calendar date at the start of `raw`.
///
/// Accepts `2025-11-28` as well as timestamps such as `2025-11-28T00:00:00Z`
/// or `2025-11-28 23:59:59-03:00`; anything after the date is ignored.
pub fn parse_literal_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let head = raw.get(..10)?;
    match raw.as_bytes().get(10) {
        None | Some(b'T') | Some(b't') | Some(b' ') => {}
        Some(_) => return None,
    }
    NaiveDate::parse_from_str(head, DATE_FORMAT).ok()
}

pub fn amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map_or(0.0, amount_from_value))
}

pub fn count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map_or(0, count_from_value))
}

pub fn date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_literal_date(&raw)
        .ok_or_else(|| D::Error::custom(format!("expected a YYYY-MM-DD date, got {raw:?}")))
}

/// Optional date: missing, `null` and blank strings are `None`.
pub fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_literal_date(s)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("expected a YYYY-MM-DD date, got {s:?}"))),
    }
}
