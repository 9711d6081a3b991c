//! Calendar month helpers.
//!
//! Months are represented by the [`NaiveDate`] of their first day throughout
//! the engine. These helpers walk months, find their real last day and parse
//! the `YYYY-MM` period strings used by reporting callers.

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::error::{EngineError, EngineResult};

/// Returns the first day of the month containing `date`.
///
/// # Example
///
/// ```
/// use payroll_engine::models::first_of_month;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2025, 2, 17).unwrap();
/// assert_eq!(first_of_month(date), NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
/// ```
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

/// Returns the first day of the month after `date`'s month.
pub fn next_month(date: NaiveDate) -> Option<NaiveDate> {
    first_of_month(date).checked_add_months(Months::new(1))
}

/// Returns the real (calendar) last day number of `date`'s month.
///
/// # Example
///
/// ```
/// use payroll_engine::models::last_day_of_month;
/// use chrono::NaiveDate;
///
/// assert_eq!(last_day_of_month(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap()), Some(28));
/// assert_eq!(last_day_of_month(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()), Some(29));
/// assert_eq!(last_day_of_month(NaiveDate::from_ymd_opt(2025, 4, 9).unwrap()), Some(30));
/// ```
pub fn last_day_of_month(date: NaiveDate) -> Option<u32> {
    next_month(date)?.pred_opt().map(|d| d.day())
}

/// Iterates the first day of every month from `start`'s month through
/// `end`'s month inclusive.
///
/// Yields nothing when `start` is after `end`.
///
/// # Example
///
/// ```
/// use payroll_engine::models::months_between;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2024, 11, 20).unwrap();
/// let end = NaiveDate::from_ymd_opt(2025, 2, 3).unwrap();
/// let months: Vec<_> = months_between(start, end).map(|m| m.to_string()).collect();
/// assert_eq!(months, vec!["2024-11-01", "2024-12-01", "2025-01-01", "2025-02-01"]);
/// ```
pub fn months_between(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    let last = first_of_month(end);
    std::iter::successors(Some(first_of_month(start)), |month| next_month(*month))
        .take_while(move |month| *month <= last)
}

/// Returns `true` when both dates fall in the same calendar month.
pub fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// Parses the leading `YYYY-MM-DD` of a date or timestamp string.
///
/// Database rows deliver dates either as plain dates or as timestamps; only
/// the first ten characters are significant. Returns `None` for anything that
/// does not start with a valid calendar date.
///
/// # Example
///
/// ```
/// use payroll_engine::models::parse_date_prefix;
/// use chrono::NaiveDate;
///
/// let expected = NaiveDate::from_ymd_opt(2025, 3, 31);
/// assert_eq!(parse_date_prefix("2025-03-31"), expected);
/// assert_eq!(parse_date_prefix("2025-03-31T00:00:00"), expected);
/// assert_eq!(parse_date_prefix("31/03/2025"), None);
/// ```
pub fn parse_date_prefix(value: &str) -> Option<NaiveDate> {
    let prefix = value.trim().get(..10)?;
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

/// Parses a `YYYY-MM` period into the first day of that month.
///
/// # Example
///
/// ```
/// use payroll_engine::models::parse_period;
/// use chrono::NaiveDate;
///
/// assert_eq!(parse_period("2025-03").unwrap(), NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
/// assert!(parse_period("2025-13").is_err());
/// ```
pub fn parse_period(value: &str) -> EngineResult<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.len() != 7 {
        return Err(EngineError::InvalidPeriod {
            value: value.to_string(),
            message: "expected YYYY-MM".to_string(),
        });
    }

    NaiveDate::parse_from_str(&format!("{}-01", trimmed), "%Y-%m-%d").map_err(|e| {
        EngineError::InvalidPeriod {
            value: value.to_string(),
            message: e.to_string(),
        }
    })
}
