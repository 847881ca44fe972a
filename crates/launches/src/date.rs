//! Launch date parsing.
//!
//! Accepts RFC 3339 timestamps, ISO date-times with or without seconds, ISO
//! dates (`2028-01-04`), US numeric dates (`01/04/2028` is January 4) and
//! written dates (`January 4, 2028`, `Jan 4, 2028`, `4 January 2028`).
//! Date-only inputs resolve to midnight UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const DATE_FORMATS: [&str; 7] = [
    "%Y-%m-%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%m/%d/%Y",
];

const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a caller-supplied launch date, returning `None` when it is not a date.
pub fn parse_launch_date(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(input) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Some(naive.and_utc());
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(input, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_written_date() {
        let expected = Utc.with_ymd_and_hms(2028, 1, 4, 0, 0, 0).unwrap();
        assert_eq!(parse_launch_date("January 4, 2028"), Some(expected));
        assert_eq!(parse_launch_date("Jan 4, 2028"), Some(expected));
        assert_eq!(parse_launch_date("  January 04, 2028 "), Some(expected));
    }

    #[test]
    fn test_iso_forms() {
        assert_eq!(
            parse_launch_date("2028-01-04"),
            Some(Utc.with_ymd_and_hms(2028, 1, 4, 0, 0, 0).unwrap())
        );
        assert_eq!(
            parse_launch_date("2006-03-25T10:30:00+12:00"),
            Some(Utc.with_ymd_and_hms(2006, 3, 24, 22, 30, 0).unwrap())
        );
        assert_eq!(
            parse_launch_date("2028-01-04T08:15:00"),
            Some(Utc.with_ymd_and_hms(2028, 1, 4, 8, 15, 0).unwrap())
        );
    }

    #[test]
    fn test_minutes_and_day_first_forms() {
        assert_eq!(
            parse_launch_date("2028-01-04T08:15"),
            Some(Utc.with_ymd_and_hms(2028, 1, 4, 8, 15, 0).unwrap())
        );
        assert_eq!(
            parse_launch_date("2028-01-04 08:15"),
            Some(Utc.with_ymd_and_hms(2028, 1, 4, 8, 15, 0).unwrap())
        );

        let midnight = Utc.with_ymd_and_hms(2028, 1, 4, 0, 0, 0).unwrap();
        assert_eq!(parse_launch_date("4 January 2028"), Some(midnight));
        assert_eq!(parse_launch_date("04 Jan 2028"), Some(midnight));
        assert_eq!(parse_launch_date("01/04/2028"), Some(midnight));
        assert_eq!(parse_launch_date("13/04/2028"), None);
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(parse_launch_date("zoot"), None);
        assert_eq!(parse_launch_date(""), None);
        assert_eq!(parse_launch_date("February 30, 2028"), None);
    }
}
