// Convert vendor wire values into the normalized model.
// Vendors disagree on whether numbers arrive as JSON numbers, decimal strings
// or null; everything funnels through here so "unparseable" always means "absent".

use chrono::{DateTime, Utc};

/// Parse a decimal string into a finite number.
pub fn parse_decimal(s: &str) -> Option<f64> {
    let v: f64 = s.trim().parse().ok()?;
    v.is_finite().then_some(v)
}

/// Parse a price or other magnitude that must be finite and >= 0.
pub fn parse_price(s: &str) -> Option<f64> {
    parse_decimal(s).and_then(non_negative)
}

pub fn non_negative(v: f64) -> Option<f64> {
    (v.is_finite() && v >= 0.0).then_some(v)
}

pub fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

/// RFC 3339 timestamp (e.g. "2021-11-10T14:24:11.849Z").
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

pub fn timestamp_secs(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(secs, 0)
}

pub fn timestamp_millis(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(millis)
}

/// Trimmed, upper-cased ticker.
pub fn symbol(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Drop empty strings so they read as "unknown".
pub fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|v| !v.trim().is_empty())
}

/// Serde helper for `Option<f64>` fields that may be a number, a decimal
/// string or null. Anything unparseable becomes `None` instead of failing
/// the whole payload.
pub mod lenient_f64 {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<Value>::deserialize(deserializer)?;
        Ok(match raw {
            Some(Value::Number(n)) => n.as_f64().and_then(super::finite),
            Some(Value::String(s)) => super::parse_decimal(&s),
            _ => None,
        })
    }
}
