//! Publication date parsing
//!
//! Providers disagree on date formats: NewsAPI and The Guardian send UTC
//! `Z` timestamps, the NYT sends local offsets, and older feeds sometimes
//! send bare dates. Everything is normalized to UTC. Anything we cannot
//! read becomes `None`, never "now".

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Naive layouts tried after RFC 3339 / RFC 2822, interpreted as UTC
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Layouts carrying an offset without the RFC 3339 colon
const OFFSET_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%z", "%Y-%m-%d %H:%M:%S%z"];

/// Parse a provider timestamp into UTC
///
/// # Examples
///
/// ```
/// use newsroom::parser::date::parse_published_at;
///
/// let ts = parse_published_at("2024-12-16T05:00:03-05:00").unwrap();
/// assert_eq!(ts.to_rfc3339(), "2024-12-16T10:00:03+00:00");
/// assert!(parse_published_at("not a date").is_none());
/// ```
pub fn parse_published_at(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(raw, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Parse an optional provider field, treating absence as `None`
pub fn parse_optional(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(parse_published_at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn test_zulu_timestamp() {
        assert_eq!(
            parse_published_at("2024-12-16T10:15:00Z"),
            Some(utc(2024, 12, 16, 10, 15, 0))
        );
    }

    #[test]
    fn test_fractional_seconds() {
        assert_eq!(
            parse_published_at("2024-12-16T10:15:00.123456Z"),
            Some(utc(2024, 12, 16, 10, 15, 0) + chrono::Duration::microseconds(123_456))
        );
    }

    #[test]
    fn test_offset_converted_to_utc() {
        assert_eq!(
            parse_published_at("2024-12-16T20:00:00-05:00"),
            Some(utc(2024, 12, 17, 1, 0, 0))
        );
        assert_eq!(
            parse_published_at("2024-12-16T20:00:00+0100"),
            Some(utc(2024, 12, 16, 19, 0, 0))
        );
    }

    #[test]
    fn test_rfc2822() {
        assert_eq!(
            parse_published_at("Mon, 16 Dec 2024 10:00:00 +0000"),
            Some(utc(2024, 12, 16, 10, 0, 0))
        );
    }

    #[test]
    fn test_naive_and_date_only() {
        assert_eq!(
            parse_published_at("2024-12-16 08:00:00"),
            Some(utc(2024, 12, 16, 8, 0, 0))
        );
        assert_eq!(
            parse_published_at("2024-12-16"),
            Some(utc(2024, 12, 16, 0, 0, 0))
        );
    }

    #[test]
    fn test_garbage_is_none() {
        assert_eq!(parse_published_at(""), None);
        assert_eq!(parse_published_at("   "), None);
        assert_eq!(parse_published_at("yesterday"), None);
        assert_eq!(parse_published_at("2024-13-45T99:00:00Z"), None);
        assert_eq!(parse_optional(None), None);
    }
}
