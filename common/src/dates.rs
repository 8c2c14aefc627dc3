//! Parsing and display of server timestamps.
//!
//! The server emits naive ISO-8601 values (`2024-03-05`,
//! `2024-03-05T14:30:00.123456`); RFC 3339 values with an offset are
//! accepted too and shown in UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Parse any timestamp shape the server produces.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = raw.parse::<NaiveDateTime>() {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Short date, e.g. `5 Mar 2024`. Unparseable input is returned as-is.
pub fn format_date(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(dt) => dt.format("%-d %b %Y").to_string(),
        None => raw.to_string(),
    }
}

/// Short date with a 24-hour time, e.g. `5 Mar 2024, 14:30`.
/// Unparseable input is returned as-is.
pub fn format_date_time(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(dt) => dt.format("%-d %b %Y, %H:%M").to_string(),
        None => raw.to_string(),
    }
}

/// `YYYY-MM-DD` form used by `<input type="date">` bounds.
pub fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
