//! Report period calculation.
//!
//! Periods resolve to inclusive `[start, end]` ranges in the time zone of the
//! reference instant: `end` is the last whole second of the period (e.g. `23:59:59`).
//! Weeks start on Monday.

use std::fmt;

use chrono::{DateTime, Datelike, Duration, LocalResult, Months, NaiveDate, NaiveTime, TimeZone};
use serde::Serialize;

/// Named report period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Today,
    Week,
    Month,
    Year,
    All,
}

impl Period {
    /// Keyword used on the command line and in configuration.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
            Self::All => "all",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Keywords match exactly; anything else falls back to [`Period::All`].
impl From<&str> for Period {
    fn from(keyword: &str) -> Self {
        match keyword {
            "today" => Self::Today,
            "week" => Self::Week,
            "month" => Self::Month,
            "year" => Self::Year,
            _ => Self::All,
        }
    }
}

/// Returns the inclusive `[start, end]` range of `period` around `now`.
///
/// [`Period::All`] spans from `0001-01-01T00:00:00Z` to 100 years after `now`,
/// which covers every entry the store can hold.
pub fn calculate_period<Tz: TimeZone>(
    period: Period,
    now: &DateTime<Tz>,
) -> (DateTime<Tz>, DateTime<Tz>) {
    let tz = now.timezone();
    let today = now.date_naive();

    let (first_day, next_first_day) = match period {
        Period::Today => (today, today + Duration::days(1)),
        Period::Week => {
            let days_since_monday = today.weekday().num_days_from_monday();
            let monday = today - Duration::days(i64::from(days_since_monday));
            (monday, monday + Duration::days(7))
        }
        Period::Month => {
            let first = today - Duration::days(i64::from(today.day0()));
            (first, add_months(first, 1))
        }
        Period::Year => {
            let first = today - Duration::days(i64::from(today.ordinal0()));
            (first, add_months(first, 12))
        }
        Period::All => {
            let end = now
                .clone()
                .checked_add_months(Months::new(100 * 12))
                .unwrap_or_else(|| tz.from_utc_datetime(&NaiveDate::MAX.and_time(NaiveTime::MIN)));
            return (beginning_of_time(&tz), end);
        }
    };

    let start = local_midnight(&tz, first_day);
    let end = local_midnight(&tz, next_first_day) - Duration::seconds(1);
    (start, end)
}

fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

fn beginning_of_time<Tz: TimeZone>(tz: &Tz) -> DateTime<Tz> {
    let first = NaiveDate::from_ymd_opt(1, 1, 1).unwrap_or(NaiveDate::MIN);
    tz.from_utc_datetime(&first.and_time(NaiveTime::MIN))
}

/// Resolves local midnight of `date`.
/// Ambiguous midnights (DST fall-back) resolve to the earlier instant; a midnight
/// inside a DST gap resolves to 1am, which always exists.
fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Tz> {
    let midnight = date.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&midnight) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt,
        LocalResult::None => tz
            .from_local_datetime(&(midnight + Duration::hours(1)))
            .earliest()
            .unwrap_or_else(|| tz.from_utc_datetime(&midnight)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{FixedOffset, Utc};

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn range(period: &str, now: &str) -> (DateTime<Utc>, DateTime<Utc>) {
        calculate_period(Period::from(period), &utc(now))
    }

    #[test]
    fn today_on_monday() {
        let (start, end) = range("today", "2024-01-15T12:00:00Z");
        assert_eq!(start, utc("2024-01-15T00:00:00Z"));
        assert_eq!(end, utc("2024-01-15T23:59:59Z"));
    }

    #[test]
    fn week_on_monday() {
        let (start, end) = range("week", "2024-01-15T12:00:00Z");
        assert_eq!(start, utc("2024-01-15T00:00:00Z"));
        assert_eq!(end, utc("2024-01-21T23:59:59Z"));
    }

    #[test]
    fn week_on_sunday_belongs_to_preceding_monday() {
        let (start, end) = range("week", "2024-01-14T12:00:00Z");
        assert_eq!(start, utc("2024-01-08T00:00:00Z"));
        assert_eq!(end, utc("2024-01-14T23:59:59Z"));
    }

    #[test]
    fn month_in_leap_february() {
        let (start, end) = range("month", "2024-01-15T12:00:00Z");
        assert_eq!(start, utc("2024-01-01T00:00:00Z"));
        assert_eq!(end, utc("2024-01-31T23:59:59Z"));

        let (start, end) = range("month", "2024-02-10T08:00:00Z");
        assert_eq!(start, utc("2024-02-01T00:00:00Z"));
        assert_eq!(end, utc("2024-02-29T23:59:59Z"));
    }

    #[test]
    fn year_spans_calendar_year() {
        let (start, end) = range("year", "2024-01-15T12:00:00Z");
        assert_eq!(start, utc("2024-01-01T00:00:00Z"));
        assert_eq!(end, utc("2024-12-31T23:59:59Z"));
    }

    #[test]
    fn all_and_unknown_cover_everything() {
        let now = utc("2024-01-15T12:00:00Z");
        for keyword in ["all", "fortnight", ""] {
            let (start, end) = calculate_period(Period::from(keyword), &now);
            assert_eq!(start, utc("0001-01-01T00:00:00Z"));
            assert_eq!(end, utc("2124-01-15T12:00:00Z"));
        }
    }

    #[test]
    fn boundaries_follow_reference_offset() {
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let now = tokyo.with_ymd_and_hms(2024, 1, 15, 1, 30, 0).unwrap();
        let (start, end) = calculate_period(Period::Today, &now);
        assert_eq!(start, tokyo.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap());
        assert_eq!(end, tokyo.with_ymd_and_hms(2024, 1, 15, 23, 59, 59).unwrap());
        assert_eq!(start.with_timezone(&Utc), utc("2024-01-14T15:00:00Z"));
    }

    #[test]
    fn keywords_match_exactly() {
        assert_eq!(Period::from("week"), Period::Week);
        assert_eq!(Period::from("month"), Period::Month);
        assert_eq!(Period::from("Week"), Period::All);
        assert_eq!(Period::from(" month "), Period::All);
        assert_eq!(Period::from("YEAR"), Period::All);
        assert_eq!(Period::Today.to_string(), "today");
    }
}
