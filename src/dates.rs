// 📅 Date inputs - strings or chrono values, parsed leniently
//
// Loan records carry dates as ISO strings ("2024-01-05", "2024-01-05T14:30:00Z"),
// sometimes as US statement dates ("01/05/2024"). Formatters accept any of these,
// or an already-parsed chrono value.
//
// Offset-bearing timestamps keep the wall-clock time they were written with.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// A date or timestamp handed to the formatters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DateValue<'a> {
    Text(&'a str),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Utc(DateTime<Utc>),
    Offset(DateTime<FixedOffset>),
}

impl<'a> From<&'a str> for DateValue<'a> {
    fn from(s: &'a str) -> Self {
        DateValue::Text(s)
    }
}

impl<'a> From<&'a String> for DateValue<'a> {
    fn from(s: &'a String) -> Self {
        DateValue::Text(s.as_str())
    }
}

impl From<NaiveDate> for DateValue<'_> {
    fn from(d: NaiveDate) -> Self {
        DateValue::Date(d)
    }
}

impl From<NaiveDateTime> for DateValue<'_> {
    fn from(dt: NaiveDateTime) -> Self {
        DateValue::DateTime(dt)
    }
}

impl From<DateTime<Utc>> for DateValue<'_> {
    fn from(dt: DateTime<Utc>) -> Self {
        DateValue::Utc(dt)
    }
}

impl From<DateTime<FixedOffset>> for DateValue<'_> {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        DateValue::Offset(dt)
    }
}

/// Outcome of reading a `DateValue`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParsedDate {
    /// Nothing to show (empty text)
    Absent,
    Valid(NaiveDateTime),
    Invalid,
}

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

impl DateValue<'_> {
    /// Resolve to a wall-clock timestamp
    pub fn parse(&self) -> ParsedDate {
        match self {
            DateValue::Text(s) => parse_text(s),
            DateValue::Date(d) => ParsedDate::Valid(d.and_time(NaiveTime::MIN)),
            DateValue::DateTime(dt) => ParsedDate::Valid(*dt),
            DateValue::Utc(dt) => ParsedDate::Valid(dt.naive_utc()),
            DateValue::Offset(dt) => ParsedDate::Valid(dt.naive_local()),
        }
    }
}

fn parse_text(raw: &str) -> ParsedDate {
    let s = raw.trim();
    if s.is_empty() {
        return ParsedDate::Absent;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return ParsedDate::Valid(dt.naive_local());
    }

    for fmt in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return ParsedDate::Valid(dt);
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return ParsedDate::Valid(d.and_time(NaiveTime::MIN));
        }
    }

    tracing::debug!(input = %raw, "unparseable date");
    ParsedDate::Invalid
}

/// Sort key for ordering by date; unparseable or absent dates yield `None`
pub fn sort_key(raw: &str) -> Option<NaiveDateTime> {
    match parse_text(raw) {
        ParsedDate::Valid(dt) => Some(dt),
        _ => None,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Timelike};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_iso_date() {
        let parsed = DateValue::from("2024-01-05").parse();
        assert_eq!(parsed, ParsedDate::Valid(ymd(2024, 1, 5).and_hms_opt(0, 0, 0).unwrap()));
    }

    #[test]
    fn test_parse_rfc3339_keeps_wall_clock() {
        match DateValue::from("2024-01-05T14:30:00-05:00").parse() {
            ParsedDate::Valid(dt) => {
                assert_eq!(dt.date(), ymd(2024, 1, 5));
                assert_eq!(dt.hour(), 14);
                assert_eq!(dt.minute(), 30);
            }
            other => panic!("expected valid date, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_naive_timestamp_with_millis() {
        let parsed = DateValue::from("2024-03-10T08:15:00.250").parse();
        assert!(matches!(parsed, ParsedDate::Valid(dt) if dt.hour() == 8 && dt.minute() == 15));
    }

    #[test]
    fn test_parse_us_statement_date() {
        let parsed = DateValue::from("12/31/2024").parse();
        assert_eq!(parsed, ParsedDate::Valid(ymd(2024, 12, 31).and_hms_opt(0, 0, 0).unwrap()));
    }

    #[test]
    fn test_empty_text_is_absent() {
        assert_eq!(DateValue::from("").parse(), ParsedDate::Absent);
        assert_eq!(DateValue::from("   ").parse(), ParsedDate::Absent);
    }

    #[test]
    fn test_garbage_is_invalid() {
        assert_eq!(DateValue::from("not-a-date").parse(), ParsedDate::Invalid);
        assert_eq!(DateValue::from("2024-02-30").parse(), ParsedDate::Invalid);
        assert_eq!(DateValue::from("2024-13-01").parse(), ParsedDate::Invalid);
    }

    #[test]
    fn test_chrono_values_pass_through() {
        let utc = Utc.with_ymd_and_hms(2024, 6, 1, 9, 45, 0).unwrap();
        assert_eq!(DateValue::from(utc).parse(), ParsedDate::Valid(utc.naive_utc()));

        let d = ymd(2023, 11, 2);
        assert_eq!(DateValue::from(d).parse(), ParsedDate::Valid(d.and_time(NaiveTime::MIN)));
    }

    #[test]
    fn test_sort_key() {
        assert!(sort_key("2024-01-05") > sort_key("2023-12-31"));
        assert_eq!(sort_key("garbage"), None);
    }
}
