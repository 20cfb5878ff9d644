use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use std::str::FromStr;

/// Money type carrying full decimal precision.
///
/// Arithmetic never rounds; interest compounding keeps every digit until a
/// result is handed out, at which point `round_to_minor` applies the
/// currency's minor-unit precision with round-half-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// create from decimal
    pub fn from_decimal(d: Decimal) -> Self {
        Money(d)
    }

    /// create from string with exact parsing
    pub fn from_str_exact(s: &str) -> Result<Self, rust_decimal::Error> {
        Ok(Money(Decimal::from_str(s)?))
    }

    /// create from integer amount (dollars, euros, etc)
    pub fn from_major(amount: i64) -> Self {
        Money(Decimal::from(amount))
    }

    /// create from minor amount (cents, paise, etc)
    pub fn from_minor(amount: i64, scale: u32) -> Self {
        Money(Decimal::new(amount, scale))
    }

    /// get underlying decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// round half-up to the given number of minor-unit digits
    pub fn round_to_minor(&self, dp: u32) -> Self {
        Money(self.0.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// simple interest for `days` at a per-day rate fraction
    pub fn simple_interest(&self, daily_rate: Decimal, days: i64) -> Self {
        Money(self.0 * daily_rate * Decimal::from(days))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::from_str_exact(s)
    }
}

impl From<Decimal> for Money {
    fn from(d: Decimal) -> Self {
        Money::from_decimal(d)
    }
}

impl From<i32> for Money {
    fn from(i: i32) -> Self {
        Money::from_major(i as i64)
    }
}

impl From<u32> for Money {
    fn from(i: u32) -> Self {
        Money::from_major(i as i64)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money(self.0 - other.0)
    }
}

impl Mul<Decimal> for Money {
    type Output = Money;

    fn mul(self, other: Decimal) -> Money {
        Money(self.0 * other)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

/// annual interest rate stored as a fraction (0.06 for 6%)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Rate(Decimal);

impl Rate {
    pub const ZERO: Rate = Rate(Decimal::ZERO);

    /// create from decimal fraction (e.g., 0.05 for 5%)
    pub fn from_decimal(d: Decimal) -> Self {
        Rate(d)
    }

    /// create from whole percentage (e.g., 5 for 5%)
    pub fn from_percentage(p: u32) -> Self {
        Rate(Decimal::from(p) / Decimal::ONE_HUNDRED)
    }

    /// create from a decimal percentage (e.g., 6.5 for 6.5%)
    pub fn from_percent(p: Decimal) -> Self {
        Rate(p / Decimal::ONE_HUNDRED)
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn as_percentage(&self) -> Decimal {
        self.0 * Decimal::ONE_HUNDRED
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// subtract a percentage-point penalty, e.g. 6% less 1 point is 5%
    pub fn less_points(&self, points: Decimal) -> Rate {
        Rate(self.0 - points / Decimal::ONE_HUNDRED)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage().normalize())
    }
}

impl From<Decimal> for Rate {
    fn from(d: Decimal) -> Self {
        Rate::from_decimal(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_keeps_precision() {
        let m = Money::from_str_exact("100.123456789123").unwrap();
        let doubled = m + m;
        assert_eq!(doubled.as_decimal(), dec!(200.246913578246));
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(Money::from_decimal(dec!(10.005)).round_to_minor(2), Money::from_decimal(dec!(10.01)));
        assert_eq!(Money::from_decimal(dec!(10.004999)).round_to_minor(2), Money::from_decimal(dec!(10.00)));
        // banker's rounding would give 10.02 here
        assert_eq!(Money::from_decimal(dec!(10.025)).round_to_minor(2), Money::from_decimal(dec!(10.03)));
        assert_eq!(Money::from_decimal(dec!(1234.5)).round_to_minor(0), Money::from_major(1235));
    }

    #[test]
    fn test_minor_units() {
        assert_eq!(Money::from_minor(1_000_050, 2), Money::from_decimal(dec!(10000.50)));
    }

    #[test]
    fn test_simple_interest() {
        let principal = Money::from_major(10_000);
        let daily = dec!(0.05) / dec!(365);

        let interest = principal.simple_interest(daily, 30);
        assert_eq!(interest.round_to_minor(2), Money::from_str_exact("41.10").unwrap());
    }

    #[test]
    fn test_rate_penalty_points() {
        let rate = Rate::from_percentage(6);
        assert_eq!(rate.less_points(dec!(1)), Rate::from_percentage(5));
        assert_eq!(Rate::from_percent(dec!(6.5)).as_percentage(), dec!(6.5));
        assert_eq!(rate.to_string(), "6%");
    }

    #[test]
    fn test_money_sum() {
        let total: Money = vec![Money::from_major(1), Money::from_major(2)].into_iter().sum();
        assert_eq!(total, Money::from_major(3));
    }
}
