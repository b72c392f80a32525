//! Lenient date decoding.
//!
//! The backend is not consistent about dates: some endpoints send
//! `2024-03-01`, some a full ISO date-time, and some Jackson's `[2024,3,1]`
//! array form. Only the calendar date is kept.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// `deserialize_with` target for `Option<NaiveDate>` fields
pub fn lenient<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(raw)) => parse_date(&raw),
        Some(Value::Array(parts)) if parts.len() >= 3 => {
            let part = |i: usize| parts[i].as_i64();
            match (part(0), part(1), part(2)) {
                (Some(y), Some(m), Some(d)) => NaiveDate::from_ymd_opt(y as i32, m as u32, d as u32),
                _ => None,
            }
        }
        _ => None,
    })
}

/// `YYYY-MM-DD`, or `TBD` when unknown
pub fn display_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "TBD".to_string())
}
