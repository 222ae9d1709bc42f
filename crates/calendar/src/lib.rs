//! Calendar utilities: working-day counting, weekend/holiday classification,
//! date arithmetic, and the fixed 13×28-day academic-year block grid.

use chrono::{Datelike, NaiveDate, Weekday};

/// The three fixed standard holidays observed every year regardless of
/// program configuration (SPEC_FULL §4.4).
pub fn standard_holidays(year: i32) -> [NaiveDate; 3] {
    [
        NaiveDate::from_ymd_opt(year, 1, 1).expect("Jan 1 always valid"),
        NaiveDate::from_ymd_opt(year, 7, 4).expect("Jul 4 always valid"),
        NaiveDate::from_ymd_opt(year, 12, 25).expect("Dec 25 always valid"),
    ]
}

/// The union of configured holidays and the fixed standard dates for every
/// calendar year touched by `[start, end]`.
pub fn holidays_in_range(configured: &[NaiveDate], start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut holidays: Vec<NaiveDate> = configured
        .iter()
        .copied()
        .filter(|d| *d >= start && *d <= end)
        .collect();
    for year in start.year()..=end.year() {
        for holiday in standard_holidays(year) {
            if holiday >= start && holiday <= end && !holidays.contains(&holiday) {
                holidays.push(holiday);
            }
        }
    }
    holidays
}

/// Whether `date`'s weekday is one of the configured weekend days.
pub fn is_weekend(date: NaiveDate, weekend_definition: &[Weekday]) -> bool {
    weekend_definition.contains(&date.weekday())
}

/// Whether `date` is a holiday: in `holidays` or one of the fixed standard dates for its year.
pub fn is_holiday(date: NaiveDate, holidays: &[NaiveDate]) -> bool {
    holidays.contains(&date) || standard_holidays(date.year()).contains(&date)
}

/// Count of days in `[start, end]` inclusive that are neither weekends (per
/// `weekend_definition`) nor holidays.
pub fn working_days(
    start: NaiveDate,
    end: NaiveDate,
    weekend_definition: &[Weekday],
    holidays: &[NaiveDate],
) -> u32 {
    if end < start {
        return 0;
    }
    let mut count = 0u32;
    let mut current = start;
    while current <= end {
        if !is_weekend(current, weekend_definition) && !is_holiday(current, holidays) {
            count += 1;
        }
        current = current.succ_opt().expect("date range is bounded");
    }
    count
}

/// Inclusive day count between two dates; negative if `end` precedes `start`.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

/// `"YYYY-MM"` month identifier, zero-padded (SPEC_FULL §6.1).
pub fn month_id(year: i32, month_zero_based: u32) -> String {
    format!("{year:04}-{:02}", month_zero_based + 1)
}

/// `[start, end]` inclusive date range for a calendar month (0-based `month`).
pub fn month_range(year: i32, month_zero_based: u32) -> (NaiveDate, NaiveDate) {
    let month = month_zero_based + 1;
    let start = NaiveDate::from_ymd_opt(year, month, 1).expect("valid month");
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .expect("valid month")
    .pred_opt()
    .expect("month always has at least one day");
    (start, end)
}

/// Number of 13 fixed 28-day blocks in an academic year.
pub const BLOCK_COUNT: u8 = 13;

/// Length in days of each rotation block.
pub const BLOCK_LENGTH_DAYS: i64 = 28;

/// `(start, end)` inclusive date range for `block_number` (1..=13) of the
/// academic year starting July 1 of `first_calendar_year`.
pub fn block_range(first_calendar_year: i32, block_number: u8) -> (NaiveDate, NaiveDate) {
    assert!(
        (1..=BLOCK_COUNT).contains(&block_number),
        "block_number must be in 1..=13, got {block_number}"
    );
    let year_start =
        NaiveDate::from_ymd_opt(first_calendar_year, 7, 1).expect("July 1 always valid");
    let start = year_start + chrono::Duration::days((block_number as i64 - 1) * BLOCK_LENGTH_DAYS);
    let end = start + chrono::Duration::days(BLOCK_LENGTH_DAYS - 1);
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_one_starts_on_july_first() {
        let (start, end) = block_range(2025, 1);
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 7, 28).unwrap());
    }

    #[test]
    fn block_thirteen_ends_before_next_july() {
        let (_, end) = block_range(2025, 13);
        assert_eq!(end, NaiveDate::from_ymd_opt(2026, 6, 30).unwrap());
    }

    #[test]
    fn blocks_are_contiguous() {
        for b in 1..13 {
            let (_, end_b) = block_range(2025, b);
            let (start_next, _) = block_range(2025, b + 1);
            assert_eq!(days_between(end_b, start_next), 1);
        }
    }

    #[test]
    fn standard_holidays_are_excluded_from_working_days() {
        let weekend = [Weekday::Sat, Weekday::Sun];
        let start = NaiveDate::from_ymd_opt(2025, 12, 24).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 12, 26).unwrap();
        // Dec 24 (Wed), Dec 25 (Thu, holiday), Dec 26 (Fri) => 2 working days.
        assert_eq!(working_days(start, end, &weekend, &[]), 2);
    }

    #[test]
    fn month_id_zero_pads() {
        assert_eq!(month_id(2025, 0), "2025-01");
        assert_eq!(month_id(2025, 11), "2025-12");
    }

    #[test]
    fn month_range_handles_december_rollover() {
        let (start, end) = month_range(2025, 11);
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
    }
}
