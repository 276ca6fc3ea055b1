//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Parses a timestamp from user input.
    ///
    /// Accepts RFC 3339 (`2026-03-01T17:00:00Z`), a zone-less local form as
    /// produced by `datetime-local` inputs (`2026-03-01T17:00` or with
    /// seconds, read as UTC), or a bare date (`2026-03-01`, midnight UTC).
    pub fn parse(field: &str, input: &str) -> Result<Self, ValidationError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ValidationError::empty_field(field));
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
            return Ok(Self(dt.with_timezone(&Utc)));
        }

        for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
                return Ok(Self(naive.and_utc()));
            }
        }

        NaiveDate::parse_from_str(input, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| Self(naive.and_utc()))
            .ok_or_else(|| {
                ValidationError::invalid_format(field, format!("unrecognised date '{}'", input))
            })
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    pub fn is_after(&self, other: &Timestamp) -> bool {
        self.0 > other.0
    }

    pub fn minus_days(&self, days: i64) -> Self {
        Self(self.0 - Duration::days(days))
    }

    pub fn plus_days(&self, days: i64) -> Self {
        Self(self.0 + Duration::days(days))
    }

    /// Calendar date in `YYYY-MM-DD` form.
    pub fn date_string(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }

    /// RFC 3339 representation used in API responses.
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use std::thread::sleep;

    #[test]
    fn timestamp_now_creates_current_time() {
        let before = Utc::now();
        let ts = Timestamp::now();
        let after = Utc::now();

        assert!(ts.as_datetime() >= &before);
        assert!(ts.as_datetime() <= &after);
    }

    #[test]
    fn later_timestamp_is_after() {
        let earlier = Timestamp::now();
        sleep(std::time::Duration::from_millis(10));
        let later = Timestamp::now();

        assert!(later.is_after(&earlier));
        assert!(!earlier.is_after(&later));
        assert!(later.minus_days(1).plus_days(1) == later);
    }

    #[test]
    fn parse_accepts_rfc3339() {
        let ts = Timestamp::parse("deadline", "2026-03-01T17:00:00+02:00").unwrap();
        assert_eq!(ts.as_datetime().hour(), 15);
    }

    #[test]
    fn parse_accepts_datetime_local_form() {
        let ts = Timestamp::parse("deadline", "2026-03-01T17:00").unwrap();
        assert_eq!(ts.as_datetime().day(), 1);
        assert_eq!(ts.as_datetime().hour(), 17);

        let ts = Timestamp::parse("deadline", "2026-03-01T17:00:00").unwrap();
        assert_eq!(ts.as_datetime().hour(), 17);
    }

    #[test]
    fn parse_accepts_bare_date_as_midnight() {
        let ts = Timestamp::parse("deadline", "2026-03-01").unwrap();
        assert_eq!(ts.as_datetime().month(), 3);
        assert_eq!(ts.as_datetime().hour(), 0);
    }

    #[test]
    fn parse_rejects_garbage_and_empty() {
        assert!(matches!(
            Timestamp::parse("deadline", "next tuesday"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            Timestamp::parse("deadline", "  "),
            Err(ValidationError::EmptyField { .. })
        ));
    }

    #[test]
    fn date_string_formats_calendar_date() {
        let ts = Timestamp::parse("deadline", "2026-03-01T17:00:00Z").unwrap();
        assert_eq!(ts.date_string(), "2026-03-01");
    }

    #[test]
    fn timestamp_serializes_to_json() {
        let ts = Timestamp::parse("at", "2024-01-15T10:30:00Z").unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        assert!(json.contains("2024-01-15"));
    }

    #[test]
    fn plus_and_minus_days_are_inverse() {
        let ts = Timestamp::now();
        assert_eq!(ts.plus_days(7).minus_days(7), ts);
    }
}
