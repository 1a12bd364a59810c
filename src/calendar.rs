//! Working-day arithmetic over inclusive date ranges.
//!
//! This module provides the pure calendar rules used to turn a leave range
//! into a working-day duration: every calendar day from start to end
//! inclusive is assessed, and a day is excluded when it falls on the weekly
//! off day or appears in the holiday set. The functions are deterministic
//! and replayable from the holiday snapshot supplied by the caller, so a
//! duration computed at submission time never changes when holidays are
//! added later.

use std::collections::BTreeSet;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The per-day exclusion assessment for one calendar day of a range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAssessment {
    /// The calendar day assessed.
    pub date: NaiveDate,
    /// The weekday the date falls on.
    pub weekday: Weekday,
    /// True when the date falls on the weekly off day.
    pub weekly_off: bool,
    /// True when the date appears in the holiday set.
    pub holiday: bool,
}

impl DayAssessment {
    /// True when the day counts toward the working-day total.
    pub fn is_working(&self) -> bool {
        !self.weekly_off && !self.holiday
    }
}

/// The result of assessing an inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingDaySummary {
    /// Ordered per-day assessments, one per calendar day of the range.
    pub days: Vec<DayAssessment>,
    /// The number of working days in the range.
    pub working_days: u32,
    /// The number of excluded days in the range.
    pub excluded_days: u32,
}

/// Assesses every calendar day in `[start, end]` against the weekly off day
/// and the holiday snapshot.
///
/// # Arguments
///
/// * `start` - First day of the range (inclusive)
/// * `end` - Last day of the range (inclusive)
/// * `weekly_off` - The fixed weekly off day
/// * `holidays` - The holiday snapshot in effect at assessment time
///
/// # Errors
///
/// Returns [`EngineError::InvalidRange`] when `end` precedes `start`.
///
/// # Example
///
/// ```
/// use std::collections::BTreeSet;
/// use chrono::{NaiveDate, Weekday};
/// use hr_engine::calendar::working_days;
///
/// // 2024-01-01 (Monday) through 2024-01-07 (Sunday), no holidays:
/// // seven calendar days, Sunday excluded.
/// let summary = working_days(
///     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
///     Weekday::Sun,
///     &BTreeSet::new(),
/// ).unwrap();
/// assert_eq!(summary.working_days, 6);
/// assert_eq!(summary.excluded_days, 1);
/// ```
pub fn working_days(
    start: NaiveDate,
    end: NaiveDate,
    weekly_off: Weekday,
    holidays: &BTreeSet<NaiveDate>,
) -> EngineResult<WorkingDaySummary> {
    if end < start {
        return Err(EngineError::InvalidRange { start, end });
    }

    let mut days = Vec::new();
    let mut current = start;
    loop {
        let weekday = current.weekday();
        days.push(DayAssessment {
            date: current,
            weekday,
            weekly_off: weekday == weekly_off,
            holiday: holidays.contains(&current),
        });
        if current == end {
            break;
        }
        // Adding one day to a representable NaiveDate cannot overflow for
        // any range that fits in the type.
        current = current
            .checked_add_days(Days::new(1))
            .ok_or(EngineError::InvalidRange { start, end })?;
    }

    let working = days.iter().filter(|d| d.is_working()).count() as u32;
    let total = days.len() as u32;

    Ok(WorkingDaySummary {
        working_days: working,
        excluded_days: total - working,
        days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_week_with_sunday_off_has_six_working_days() {
        // 2024-01-01 is a Monday, 2024-01-07 a Sunday.
        let summary = working_days(
            make_date("2024-01-01"),
            make_date("2024-01-07"),
            Weekday::Sun,
            &BTreeSet::new(),
        )
        .unwrap();
        assert_eq!(summary.working_days, 6);
        assert_eq!(summary.days.len(), 7);
        assert!(summary.days[6].weekly_off);
    }

    #[test]
    fn test_holiday_excluded_from_count() {
        let holidays: BTreeSet<NaiveDate> = [make_date("2024-01-03")].into_iter().collect();
        let summary = working_days(
            make_date("2024-01-01"),
            make_date("2024-01-07"),
            Weekday::Sun,
            &holidays,
        )
        .unwrap();
        assert_eq!(summary.working_days, 5);
        assert!(summary.days[2].holiday);
        assert!(!summary.days[2].is_working());
    }

    #[test]
    fn test_holiday_on_weekly_off_excluded_once() {
        // 2024-01-07 is both the Sunday off day and a holiday.
        let holidays: BTreeSet<NaiveDate> = [make_date("2024-01-07")].into_iter().collect();
        let summary = working_days(
            make_date("2024-01-01"),
            make_date("2024-01-07"),
            Weekday::Sun,
            &holidays,
        )
        .unwrap();
        assert_eq!(summary.working_days, 6);
        assert_eq!(summary.excluded_days, 1);
    }

    #[test]
    fn test_single_day_range() {
        let summary = working_days(
            make_date("2024-01-02"),
            make_date("2024-01-02"),
            Weekday::Sun,
            &BTreeSet::new(),
        )
        .unwrap();
        assert_eq!(summary.working_days, 1);
        assert_eq!(summary.days.len(), 1);
    }

    #[test]
    fn test_single_off_day_range_has_zero_working_days() {
        let summary = working_days(
            make_date("2024-01-07"),
            make_date("2024-01-07"),
            Weekday::Sun,
            &BTreeSet::new(),
        )
        .unwrap();
        assert_eq!(summary.working_days, 0);
        assert_eq!(summary.excluded_days, 1);
    }

    #[test]
    fn test_end_before_start_is_invalid_range() {
        let err = working_days(
            make_date("2024-01-10"),
            make_date("2024-01-05"),
            Weekday::Sun,
            &BTreeSet::new(),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidRange { .. }));
    }

    #[test]
    fn test_days_are_ordered_and_contiguous() {
        let summary = working_days(
            make_date("2024-02-26"),
            make_date("2024-03-03"),
            Weekday::Sun,
            &BTreeSet::new(),
        )
        .unwrap();
        for pair in summary.days.windows(2) {
            assert_eq!(pair[0].date.succ_opt().unwrap(), pair[1].date);
        }
    }

    #[test]
    fn test_replayable_from_same_snapshot() {
        let holidays: BTreeSet<NaiveDate> = [make_date("2024-01-26")].into_iter().collect();
        let first = working_days(
            make_date("2024-01-22"),
            make_date("2024-01-28"),
            Weekday::Sun,
            &holidays,
        )
        .unwrap();
        let second = working_days(
            make_date("2024-01-22"),
            make_date("2024-01-28"),
            Weekday::Sun,
            &holidays,
        )
        .unwrap();
        assert_eq!(first, second);
    }

    fn arb_date() -> impl Strategy<Value = NaiveDate> {
        // Any day in 2020-2030; wide enough to cover leap years.
        (0i64..4017).prop_map(|offset| {
            NaiveDate::from_ymd_opt(2020, 1, 1)
                .unwrap()
                .checked_add_days(Days::new(offset as u64))
                .unwrap()
        })
    }

    proptest! {
        #[test]
        fn prop_count_equals_total_minus_excluded(
            start in arb_date(),
            span in 0u64..120,
            holiday_offsets in proptest::collection::btree_set(0u64..120, 0..12),
        ) {
            let end = start.checked_add_days(Days::new(span)).unwrap();
            let holidays: BTreeSet<NaiveDate> = holiday_offsets
                .into_iter()
                .map(|o| start.checked_add_days(Days::new(o)).unwrap())
                .collect();

            let summary = working_days(start, end, Weekday::Sun, &holidays).unwrap();
            let total = span + 1;
            let excluded = summary
                .days
                .iter()
                .filter(|d| d.weekday == Weekday::Sun || holidays.contains(&d.date))
                .count() as u64;

            prop_assert_eq!(summary.days.len() as u64, total);
            prop_assert_eq!(summary.working_days as u64, total - excluded);
            prop_assert_eq!(summary.excluded_days as u64, excluded);
        }

        #[test]
        fn prop_widening_the_range_never_decreases_the_count(
            start in arb_date(),
            span in 0u64..90,
            extension in 1u64..30,
        ) {
            let end = start.checked_add_days(Days::new(span)).unwrap();
            let wider_end = end.checked_add_days(Days::new(extension)).unwrap();
            let holidays = BTreeSet::new();

            let narrow = working_days(start, end, Weekday::Sun, &holidays).unwrap();
            let wide = working_days(start, wider_end, Weekday::Sun, &holidays).unwrap();

            prop_assert!(wide.working_days >= narrow.working_days);
        }

        #[test]
        fn prop_no_holidays_and_no_off_matches_calendar_days(
            start in arb_date(),
            span in 0u64..60,
        ) {
            // With an off day that never occurs in the range the count is the
            // plain calendar length; approximate by checking against the
            // assessments directly.
            let end = start.checked_add_days(Days::new(span)).unwrap();
            let summary = working_days(start, end, Weekday::Mon, &BTreeSet::new()).unwrap();
            let non_mondays = summary
                .days
                .iter()
                .filter(|d| d.weekday != Weekday::Mon)
                .count() as u32;
            prop_assert_eq!(summary.working_days, non_mondays);
        }
    }
}
