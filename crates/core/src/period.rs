use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Interprets a wall-clock time in `tz` and normalizes it to UTC.
///
/// Ambiguous times (clocks falling back) resolve to the earlier instant. A
/// time that does not exist in `tz` (clocks springing forward) is pushed
/// forward by the gap, one hour at a time, the way browsers resolve it.
pub fn local_to_utc<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> Option<DateTime<Utc>> {
    (0..=2).find_map(|shift| {
        tz.from_local_datetime(&(local + Duration::hours(shift)))
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
    })
}

/// Midnight at the start of `date` in `tz`, as a UTC instant.
pub fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Option<DateTime<Utc>> {
    local_to_utc(tz, date.and_time(NaiveTime::MIN))
}

/// Formats an instant the way the API expects: `2024-03-15T04:00:00.000Z`.
pub fn to_iso(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// The span of one calendar day in some local time zone, from
/// `00:00:00.000` to `23:59:59.999`, both held in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayBounds {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl fmt::Display for DayBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", to_iso(self.start), to_iso(self.end))
    }
}

impl DayBounds {
    pub fn for_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Option<Self> {
        let last_ms = NaiveTime::from_hms_milli_opt(23, 59, 59, 999)?;
        Some(DayBounds {
            start: local_midnight(tz, date)?,
            end: local_to_utc(tz, date.and_time(last_ms))?,
        })
    }

    pub fn contains(self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }

    pub fn start_iso(self) -> String {
        to_iso(self.start)
    }

    pub fn end_iso(self) -> String {
        to_iso(self.end)
    }
}

/// Parses a strict `YYYY-MM-DD` picker value.
pub fn parse_picker_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn toronto_winter() -> FixedOffset {
        FixedOffset::west_opt(5 * 3600).unwrap()
    }

    #[test]
    fn midnight_in_utc_is_identity() {
        let m = local_midnight(&Utc, date(2024, 3, 15)).unwrap();
        assert_eq!(to_iso(m), "2024-03-15T00:00:00.000Z");
    }

    #[test]
    fn midnight_west_of_utc_lands_later() {
        let m = local_midnight(&toronto_winter(), date(2024, 3, 15)).unwrap();
        assert_eq!(to_iso(m), "2024-03-15T05:00:00.000Z");
    }

    #[test]
    fn day_bounds_cover_whole_local_day() {
        let b = DayBounds::for_day(&toronto_winter(), date(2024, 3, 15)).unwrap();
        assert_eq!(b.start_iso(), "2024-03-15T05:00:00.000Z");
        assert_eq!(b.end_iso(), "2024-03-16T04:59:59.999Z");
    }

    #[test]
    fn day_bounds_east_of_utc_start_previous_utc_day() {
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let b = DayBounds::for_day(&tokyo, date(2024, 3, 15)).unwrap();
        assert_eq!(b.start_iso(), "2024-03-14T15:00:00.000Z");
        assert_eq!(b.end_iso(), "2024-03-15T14:59:59.999Z");
    }

    #[test]
    fn day_bounds_contains() {
        let b = DayBounds::for_day(&Utc, date(2024, 3, 15)).unwrap();
        let noon = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        let next = Utc.with_ymd_and_hms(2024, 3, 16, 0, 0, 0).unwrap();
        assert!(b.contains(b.start)); // inclusive start
        assert!(b.contains(noon));
        assert!(b.contains(b.end)); // inclusive end
        assert!(!b.contains(next));
    }

    #[test]
    fn day_bounds_display() {
        let b = DayBounds::for_day(&Utc, date(2024, 1, 1)).unwrap();
        assert_eq!(
            b.to_string(),
            "2024-01-01T00:00:00.000Z to 2024-01-01T23:59:59.999Z"
        );
    }

    #[test]
    fn picker_date_is_strict() {
        assert_eq!(parse_picker_date("2024-03-15"), Some(date(2024, 3, 15)));
        assert_eq!(parse_picker_date(" 2024-03-15 "), Some(date(2024, 3, 15)));
        assert_eq!(parse_picker_date("2024-02-30"), None);
        assert_eq!(parse_picker_date("15/03/2024"), None);
        assert_eq!(parse_picker_date(""), None);
    }
}
