//! Business calendar and working-day arithmetic.
//!
//! Defines which calendar days count as business days: Saturdays and
//! Sundays are always non-working, plus a configurable set of holidays.
//!
//! # Snapshot semantics
//!
//! A `BusinessCalendar` is a plain value object. Callers take one snapshot
//! per operation and pass it down; the date engine is a pure function of
//! its inputs. The holiday set is append-only over the life of a calendar.
//!
//! # Determinism
//!
//! All dates are `NaiveDate` (date-only, no time zone), so the three
//! primitives below return identical results regardless of caller time
//! zone or wall-clock time.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Set of non-working dates layered on top of the weekend rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessCalendar {
    /// Configured non-working dates (holidays, plant shutdowns).
    holidays: BTreeSet<NaiveDate>,
}

impl BusinessCalendar {
    /// Creates a calendar with no holidays (weekends only).
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a holiday (builder form).
    pub fn with_holiday(mut self, date: NaiveDate) -> Self {
        self.holidays.insert(date);
        self
    }

    /// Adds several holidays (builder form).
    pub fn with_holidays<I: IntoIterator<Item = NaiveDate>>(mut self, dates: I) -> Self {
        self.holidays.extend(dates);
        self
    }

    /// Appends a holiday to the set.
    pub fn add_holiday(&mut self, date: NaiveDate) {
        self.holidays.insert(date);
    }

    /// Whether the date is a configured holiday.
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date)
    }

    /// Number of configured holidays.
    pub fn holiday_count(&self) -> usize {
        self.holidays.len()
    }

    /// Whether the date is a business day.
    ///
    /// False for Saturday, Sunday, or any configured holiday.
    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !self.is_holiday(date)
    }

    /// Adds `n` business days to `start`.
    ///
    /// Walks forward one calendar day at a time, counting only business
    /// days, and returns the date on which the count reaches `n`.
    ///
    /// `n == 0` returns `start` unchanged even when `start` itself falls
    /// on a weekend or holiday. This keeps `add_business_days(d, 0) == d`
    /// as a universal identity; callers that need a working-day anchor
    /// must align it themselves.
    pub fn add_business_days(&self, start: NaiveDate, n: u32) -> NaiveDate {
        let mut date = start;
        let mut counted = 0u32;
        while counted < n {
            date = date + Days::new(1);
            if self.is_business_day(date) {
                counted += 1;
            }
        }
        date
    }

    /// Counts business days strictly after `from` up to and including `to`.
    ///
    /// Returns 0 when `to <= from`.
    pub fn count_business_days_between(&self, from: NaiveDate, to: NaiveDate) -> u32 {
        if to <= from {
            return 0;
        }
        let mut date = from;
        let mut count = 0u32;
        while date < to {
            date = date + Days::new(1);
            if self.is_business_day(date) {
                count += 1;
            }
        }
        count
    }

    /// The next business day strictly after `date`.
    pub fn next_business_day(&self, date: NaiveDate) -> NaiveDate {
        self.add_business_days(date, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_weekends_are_non_working() {
        let cal = BusinessCalendar::new();
        assert!(cal.is_business_day(d(2025, 1, 6))); // Monday
        assert!(cal.is_business_day(d(2025, 1, 10))); // Friday
        assert!(!cal.is_business_day(d(2025, 1, 11))); // Saturday
        assert!(!cal.is_business_day(d(2025, 1, 12))); // Sunday
    }

    #[test]
    fn test_holiday_is_non_working() {
        let cal = BusinessCalendar::new().with_holiday(d(2025, 1, 1));
        assert!(!cal.is_business_day(d(2025, 1, 1))); // Wednesday, but a holiday
        assert!(cal.is_business_day(d(2025, 1, 2)));
        assert!(cal.is_holiday(d(2025, 1, 1)));
        assert_eq!(cal.holiday_count(), 1);
    }

    #[test]
    fn test_add_zero_days_is_identity() {
        let cal = BusinessCalendar::new().with_holiday(d(2025, 1, 1));
        // Identity even on non-working days.
        assert_eq!(cal.add_business_days(d(2025, 1, 11), 0), d(2025, 1, 11)); // Saturday
        assert_eq!(cal.add_business_days(d(2025, 1, 1), 0), d(2025, 1, 1)); // Holiday
        assert_eq!(cal.add_business_days(d(2025, 1, 6), 0), d(2025, 1, 6)); // Monday
    }

    #[test]
    fn test_add_skips_weekend() {
        let cal = BusinessCalendar::new();
        // Friday + 1 business day = Monday
        assert_eq!(cal.add_business_days(d(2025, 1, 10), 1), d(2025, 1, 13));
        // Monday + 4 = Friday, +5 = next Monday
        assert_eq!(cal.add_business_days(d(2025, 1, 6), 4), d(2025, 1, 10));
        assert_eq!(cal.add_business_days(d(2025, 1, 6), 5), d(2025, 1, 13));
    }

    #[test]
    fn test_add_skips_holiday() {
        // Thursday Jan 9 is a holiday: Wednesday + 1 = Friday.
        let cal = BusinessCalendar::new().with_holiday(d(2025, 1, 9));
        assert_eq!(cal.add_business_days(d(2025, 1, 8), 1), d(2025, 1, 10));
        // Wednesday + 2 crosses holiday and weekend: lands Monday.
        assert_eq!(cal.add_business_days(d(2025, 1, 8), 2), d(2025, 1, 13));
    }

    #[test]
    fn test_add_always_lands_on_business_day() {
        let cal = BusinessCalendar::new().with_holidays([d(2025, 1, 1), d(2025, 1, 9)]);
        let start = d(2024, 12, 27);
        for n in 1..40u32 {
            let result = cal.add_business_days(start, n);
            assert!(cal.is_business_day(result), "n={n} landed on {result}");
            // Exactly n business days strictly after start, inclusive of result.
            assert_eq!(cal.count_business_days_between(start, result), n);
        }
    }

    #[test]
    fn test_count_between() {
        let cal = BusinessCalendar::new();
        // Mon..Fri same week: 4 business days strictly after Monday.
        assert_eq!(cal.count_business_days_between(d(2025, 1, 6), d(2025, 1, 10)), 4);
        // Across a weekend.
        assert_eq!(cal.count_business_days_between(d(2025, 1, 10), d(2025, 1, 13)), 1);
        // to <= from yields zero.
        assert_eq!(cal.count_business_days_between(d(2025, 1, 10), d(2025, 1, 10)), 0);
        assert_eq!(cal.count_business_days_between(d(2025, 1, 10), d(2025, 1, 3)), 0);
    }

    #[test]
    fn test_count_between_with_holiday() {
        let cal = BusinessCalendar::new().with_holiday(d(2025, 1, 8));
        // Mon -> Fri, Wednesday is a holiday: Tue, Thu, Fri = 3.
        assert_eq!(cal.count_business_days_between(d(2025, 1, 6), d(2025, 1, 10)), 3);
    }

    #[test]
    fn test_next_business_day() {
        let cal = BusinessCalendar::new();
        assert_eq!(cal.next_business_day(d(2025, 1, 10)), d(2025, 1, 13)); // Fri -> Mon
        assert_eq!(cal.next_business_day(d(2025, 1, 6)), d(2025, 1, 7));
    }

    #[test]
    fn test_serde_round_trip() {
        let cal = BusinessCalendar::new().with_holiday(d(2025, 12, 25));
        let json = serde_json::to_string(&cal).unwrap();
        let back: BusinessCalendar = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cal);
    }
}
