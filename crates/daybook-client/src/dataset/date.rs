use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::{ClientError, ClientResult};

const FLEXIBLE_DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];
const FLEXIBLE_DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Column-level retry pattern used when the flexible parser rejects every row.
pub const FALLBACK_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parses the spreadsheet date column, accepting plain dates and timestamps.
pub fn parse_flexible_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    for format in FLEXIBLE_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }
    for format in FLEXIBLE_DATETIME_FORMATS {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(timestamp.date());
        }
    }
    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|timestamp| timestamp.date_naive())
}

pub fn parse_fallback_date(value: &str) -> Option<NaiveDate> {
    NaiveDateTime::parse_from_str(value.trim(), FALLBACK_DATETIME_FORMAT)
        .ok()
        .map(|timestamp| timestamp.date())
}

pub fn format_iso_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Strict `YYYY-MM-DD` parsing for user-supplied target days.
pub fn parse_target_day(value: &str, command: &str) -> ClientResult<NaiveDate> {
    let trimmed = value.trim();
    if !looks_like_iso_date(trimmed) {
        return Err(ClientError::invalid_argument_for_command(
            "`date` must use YYYY-MM-DD format with a real calendar date.",
            Some(command),
        ));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| {
        ClientError::invalid_argument_for_command(
            "`date` must use YYYY-MM-DD format with valid calendar values.",
            Some(command),
        )
    })
}

/// Hour of day from the leading `HH` of a time cell; anything unparseable counts as hour 0.
pub fn hour_of_day(time: &str) -> u32 {
    let leading = time.trim().split(':').next().unwrap_or_default();
    match leading.parse::<u32>() {
        Ok(hour) if hour < 24 => hour,
        _ => 0,
    }
}

fn looks_like_iso_date(value: &str) -> bool {
    if value.len() != 10 {
        return false;
    }
    let bytes = value.as_bytes();
    if bytes[4] != b'-' || bytes[7] != b'-' {
        return false;
    }

    for index in [0usize, 1, 2, 3, 5, 6, 8, 9] {
        if !bytes[index].is_ascii_digit() {
            return false;
        }
    }
    true
}
