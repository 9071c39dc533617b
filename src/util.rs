use crate::error::{AttendError, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use std::borrow::Cow;

/// Asia/Tokyo has observed no daylight saving since 1951, so a fixed
/// +09:00 offset is exact for every date a check-in can carry.
pub const DEFAULT_UTC_OFFSET_SECS: i32 = 9 * 3600;

pub fn canonical_zone() -> FixedOffset {
    FixedOffset::east_opt(DEFAULT_UTC_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// Parse `+HH:MM`, `-HH:MM`, `+HHMM` or `Z`.
pub fn parse_utc_offset(input: &str) -> Result<FixedOffset> {
    let s = input.trim();
    if s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("utc") {
        return Ok(Utc.fix());
    }
    let (sign, rest) = match s.as_bytes().first() {
        Some(b'+') => (1, &s[1..]),
        Some(b'-') => (-1, &s[1..]),
        _ => return Err(AttendError::Parse(format!("Invalid UTC offset '{input}'"))),
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(AttendError::Parse(format!("Invalid UTC offset '{input}'")));
    }
    let hours: i32 = digits[..2]
        .parse()
        .map_err(|e| AttendError::Parse(format!("Invalid UTC offset '{input}': {e}")))?;
    let minutes: i32 = digits[2..]
        .parse()
        .map_err(|e| AttendError::Parse(format!("Invalid UTC offset '{input}': {e}")))?;
    if minutes >= 60 {
        return Err(AttendError::Parse(format!("Invalid UTC offset '{input}'")));
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .ok_or_else(|| AttendError::Parse(format!("UTC offset out of range '{input}'")))
}

pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|e| AttendError::InvalidDate(format!("'{input}': {e}")))
}

/// Calendar date of `instant` as seen in `zone`.
pub fn local_date(instant: &DateTime<FixedOffset>, zone: &FixedOffset) -> NaiveDate {
    instant.with_timezone(zone).date_naive()
}

pub fn short_hash(hash: &str) -> String {
    hash.chars().take(7).collect()
}

/// Quote a CSV field when it contains a delimiter, quote or line break.
pub fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\r', '\n']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

pub fn csv_row(fields: &[&str]) -> String {
    let mut line = fields
        .iter()
        .map(|f| csv_field(f))
        .collect::<Vec<_>>()
        .join(",");
    line.push('\n');
    line
}
