use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::Rate;

/// days-in-year basis for turning an annual rate into a daily one
///
/// The divisor is flat: `Days365` uses 365 in leap years too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayCountConvention {
    Days360,
    Days365,
}

impl DayCountConvention {
    pub fn year_length(&self) -> u32 {
        match self {
            DayCountConvention::Days360 => 360,
            DayCountConvention::Days365 => 365,
        }
    }

    /// per-day rate fraction for an annual rate
    pub fn daily_rate_fraction(&self, annual_rate: Rate) -> Decimal {
        annual_rate.as_decimal() / Decimal::from(self.year_length())
    }
}

/// `(annual_rate_percent / 100) / year_length`
pub fn daily_rate_fraction(annual_rate_percent: Decimal, convention: DayCountConvention) -> Decimal {
    convention.daily_rate_fraction(Rate::from_percent(annual_rate_percent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_year_lengths() {
        assert_eq!(DayCountConvention::Days360.year_length(), 360);
        assert_eq!(DayCountConvention::Days365.year_length(), 365);
    }

    #[test]
    fn test_daily_fraction() {
        assert_eq!(daily_rate_fraction(dec!(7.2), DayCountConvention::Days360), dec!(0.0002));
        assert_eq!(
            daily_rate_fraction(dec!(6), DayCountConvention::Days365),
            dec!(0.06) / dec!(365)
        );
    }

    #[test]
    fn test_360_basis_accrues_faster() {
        let rate = Rate::from_percentage(6);
        assert!(
            DayCountConvention::Days360.daily_rate_fraction(rate)
                > DayCountConvention::Days365.daily_rate_fraction(rate)
        );
    }
}
