//! Calendar month keys used to bucket dated records.
//!
//! All bucketing happens on the UTC calendar. Timestamps carrying another
//! offset are converted to UTC before their date is taken, so the same
//! instant always lands in the same month regardless of where it was entered.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Returns the UTC calendar date of a timestamp.
#[must_use]
pub fn utc_date<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> NaiveDate {
    timestamp.with_timezone(&Utc).date_naive()
}

/// A `(year, month)` pair. Orders chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthKey {
    /// Calendar year.
    pub year: i32,
    /// Month of the year, 1 through 12.
    pub month: u32,
}

impl MonthKey {
    /// Creates a month key, returning `None` if `month` is not in 1..=12.
    #[must_use]
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// The month a calendar date falls in.
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The UTC month a timestamp falls in.
    #[must_use]
    pub fn of_timestamp<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> Self {
        Self::of(utc_date(timestamp))
    }

    /// Returns true if `date` falls within this month.
    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        Self::of(date) == self
    }

    /// English month name, e.g. "January".
    #[must_use]
    pub fn month_name(self) -> &'static str {
        let index = usize::try_from(self.month.saturating_sub(1)).unwrap_or(0);
        MONTH_NAMES.get(index).copied().unwrap_or("Unknown")
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.month_name(), self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_key_rejects_invalid_month() {
        assert!(MonthKey::new(2024, 0).is_none());
        assert!(MonthKey::new(2024, 13).is_none());
        assert_eq!(
            MonthKey::new(2024, 12),
            Some(MonthKey {
                year: 2024,
                month: 12
            })
        );
    }

    #[test]
    fn test_month_key_orders_chronologically() {
        let dec_2023 = MonthKey::of(date(2023, 12, 31));
        let jan_2024 = MonthKey::of(date(2024, 1, 1));
        let feb_2024 = MonthKey::of(date(2024, 2, 29));
        assert!(dec_2023 < jan_2024);
        assert!(jan_2024 < feb_2024);
    }

    #[test]
    fn test_month_key_display() {
        assert_eq!(MonthKey::of(date(2024, 1, 15)).to_string(), "January 2024");
        assert_eq!(MonthKey::of(date(1999, 12, 1)).to_string(), "December 1999");
    }

    #[test]
    fn test_timestamp_bucketed_in_utc() {
        // 2024-02-01 01:30 at UTC+05:00 is still January 31st in UTC.
        let offset = FixedOffset::east_opt(5 * 3600).unwrap();
        let local = offset.with_ymd_and_hms(2024, 2, 1, 1, 30, 0).unwrap();
        assert_eq!(utc_date(&local), date(2024, 1, 31));
        assert_eq!(MonthKey::of_timestamp(&local), MonthKey::of(date(2024, 1, 31)));
    }

    #[test]
    fn test_month_key_contains() {
        let key = MonthKey::of(date(2024, 3, 10));
        assert!(key.contains(date(2024, 3, 1)));
        assert!(key.contains(date(2024, 3, 31)));
        assert!(!key.contains(date(2024, 4, 1)));
        assert!(!key.contains(date(2023, 3, 15)));
    }
}
