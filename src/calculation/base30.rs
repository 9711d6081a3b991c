//! Base-30 day accounting.
//!
//! Every month counts as exactly 30 days regardless of its real length. A
//! tranche that reaches the real end of a month (or its 30th/31st day)
//! accrues through day 30, so a full February and a full March both accrue
//! 30 days.

use chrono::{Datelike, NaiveDate};

use crate::models::{first_of_month, last_day_of_month, same_month};

use super::rounding::BASE_MONTH_DAYS;

/// Computes the base-30 days a tranche accrues in `month`.
///
/// `month` may be any date of the month in question. Returns 0 when the month
/// lies outside `start..=end`.
///
/// # Rules
///
/// - In the start month, accrual begins on `min(start.day, 30)`; otherwise on day 1.
/// - In the end month, accrual runs through day 30 when the end date is the
///   30th, the 31st or the real last day of the month; otherwise through
///   `end.day`. Any other month runs through day 30.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::accrual_days;
/// use chrono::NaiveDate;
///
/// let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
///
/// // A full February counts as 30 days.
/// assert_eq!(accrual_days(d(2025, 2, 1), d(2025, 2, 28), d(2025, 2, 1)), 30);
/// // Inclusive count inside a month.
/// assert_eq!(accrual_days(d(2025, 1, 20), d(2025, 1, 25), d(2025, 1, 1)), 6);
/// ```
pub fn accrual_days(start: NaiveDate, end: NaiveDate, month: NaiveDate) -> u32 {
    let month = first_of_month(month);
    if month < first_of_month(start) || month > first_of_month(end) {
        return 0;
    }

    let first_day = if same_month(month, start) {
        start.day().min(BASE_MONTH_DAYS)
    } else {
        1
    };

    let last_day = if same_month(month, end) && !reaches_month_end(end) {
        end.day()
    } else {
        BASE_MONTH_DAYS
    };

    (last_day + 1).saturating_sub(first_day)
}

/// True when `date` is the 30th, the 31st or the real last day of its month.
fn reaches_month_end(date: NaiveDate) -> bool {
    date.day() >= BASE_MONTH_DAYS || last_day_of_month(date) == Some(date.day())
}
