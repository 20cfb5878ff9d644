pub mod compound;
pub mod day_count;
pub mod penalty;

use chrono::{Datelike, Months, NaiveDate};

use crate::errors::{DepositError, Result};

pub use compound::{
    CompoundingEvent, CompoundingOutcome, CompoundingScheduler, PostingSnapshot, SchedulerState,
};
pub use day_count::{daily_rate_fraction, DayCountConvention};
pub use penalty::{PenalisedRate, PenaltyConfig, PenaltyEngine};

/// calendar-month anniversary of `start`, clamped to month end
pub fn add_months(start: NaiveDate, months: u32) -> Result<NaiveDate> {
    start
        .checked_add_months(Months::new(months))
        .ok_or_else(|| DepositError::InvalidDate {
            message: format!("{} + {} months is out of range", start, months),
        })
}

/// whole calendar months from `start` to `end` (0 when `end` <= `start`)
pub fn months_between(start: NaiveDate, end: NaiveDate) -> Result<u32> {
    if end <= start {
        return Ok(0);
    }

    let estimate = (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32;
    let mut months = estimate.max(0) as u32;
    while months > 0 && add_months(start, months)? > end {
        months -= 1;
    }
    Ok(months)
}

/// months needed for a clock started at `start` to reach `end`, counting a
/// trailing partial month as one
pub fn months_spanned(start: NaiveDate, end: NaiveDate) -> Result<u32> {
    let whole = months_between(start, end)?;
    if whole == 0 && end <= start {
        return Ok(0);
    }
    if add_months(start, whole)? < end {
        Ok(whole + 1)
    } else {
        Ok(whole)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_add_months_clamps_to_month_end() {
        assert_eq!(add_months(date(2024, 1, 31), 1).unwrap(), date(2024, 2, 29));
        assert_eq!(add_months(date(2023, 1, 31), 1).unwrap(), date(2023, 2, 28));
        assert_eq!(add_months(date(2024, 1, 31), 2).unwrap(), date(2024, 3, 31));
        assert_eq!(add_months(date(2024, 11, 15), 3).unwrap(), date(2025, 2, 15));
    }

    #[test]
    fn test_months_between() {
        assert_eq!(months_between(date(2024, 1, 15), date(2024, 2, 14)).unwrap(), 0);
        assert_eq!(months_between(date(2024, 1, 15), date(2024, 2, 15)).unwrap(), 1);
        assert_eq!(months_between(date(2024, 1, 31), date(2024, 2, 29)).unwrap(), 1);
        assert_eq!(months_between(date(2023, 3, 1), date(2024, 3, 1)).unwrap(), 12);
        assert_eq!(months_between(date(2024, 3, 1), date(2023, 3, 1)).unwrap(), 0);
    }

    #[test]
    fn test_months_spanned_rounds_partial_months_up() {
        assert_eq!(months_spanned(date(2024, 1, 1), date(2024, 1, 1)).unwrap(), 0);
        assert_eq!(months_spanned(date(2024, 1, 1), date(2024, 1, 10)).unwrap(), 1);
        assert_eq!(months_spanned(date(2024, 1, 1), date(2024, 3, 1)).unwrap(), 2);
        assert_eq!(months_spanned(date(2024, 1, 15), date(2024, 3, 1)).unwrap(), 2);
    }
}
