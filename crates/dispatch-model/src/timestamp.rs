//! Lenient timestamp decoding
//!
//! `created_at` is usually RFC 3339, but SQL-style `YYYY-MM-DD HH:MM:SS`
//! values and epoch milliseconds also show up. Anything unrecognised
//! decodes to `None` instead of failing the whole record.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Text(String),
    Millis(i64),
}

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Deserialize an optional timestamp, mapping unparseable input to `None`
///
/// Use with `#[serde(default, deserialize_with = "lenient_timestamp")]`.
///
/// # Errors
/// Never fails on content; only propagates structural errors from the
/// underlying deserializer.
pub fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| serde_json::from_value::<RawTimestamp>(value).ok()).and_then(interpret))
}

fn interpret(raw: RawTimestamp) -> Option<DateTime<Utc>> {
    match raw {
        RawTimestamp::Millis(ms) => Utc.timestamp_millis_opt(ms).single(),
        RawTimestamp::Text(text) => parse_text(text.trim()),
    }
}

fn parse_text(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|naive| naive.and_utc())
}
