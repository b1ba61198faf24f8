use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Whether `value` is one of `members`, compared exactly.
pub fn is_member(value: &str, members: &[&str]) -> bool {
    members.contains(&value)
}

/// Inclusive integer range check.
pub fn in_range(value: i64, min: i64, max: i64) -> bool {
    (min..=max).contains(&value)
}

/// Inclusive length check, counted in characters.
pub fn within_length(value: &str, min: usize, max: usize) -> bool {
    let len = value.chars().count();
    len >= min && len <= max
}

/// Hyphenated 8-4-4-4-12 hex, either case. Braced, URN and simple forms are rejected.
pub fn is_uuid(value: &str) -> bool {
    value.len() == 36
        && value.char_indices().all(|(i, c)| match i {
            8 | 13 | 18 | 23 => c == '-',
            _ => c.is_ascii_hexdigit(),
        })
}

/// Parses an ISO-8601 timestamp.
///
/// Accepts RFC 3339 (any offset), a naive `YYYY-MM-DDTHH:MM:SS[.f]` read as UTC,
/// and a bare `YYYY-MM-DD` read as midnight UTC.
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// The last instant of a bare `YYYY-MM-DD` day in UTC, at microsecond precision.
///
/// `None` for anything carrying a time of day.
pub fn end_of_day(value: &str) -> Option<DateTime<Utc>> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_micro_opt(23, 59, 59, 999_999))
        .map(|naive| naive.and_utc())
}

pub fn is_iso8601(value: &str) -> bool {
    parse_datetime(value).is_some()
}
