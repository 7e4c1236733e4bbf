//! Working-day counting.

use chrono::{Datelike, Weekday};

use crate::models::PeriodKey;

/// Counts Monday-to-Friday days in the period's calendar month.
///
/// Public holidays are not subtracted; the attendance source is expected to
/// report them when it knows them.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::weekdays_in_month;
/// use payroll_engine::models::PeriodKey;
///
/// // January 2026 starts on a Thursday.
/// assert_eq!(weekdays_in_month(PeriodKey::new(1, 2026).unwrap()), 22);
/// ```
pub fn weekdays_in_month(key: PeriodKey) -> u32 {
    key.first_day()
        .iter_days()
        .take_while(|d| *d <= key.last_day())
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .count() as u32
}
