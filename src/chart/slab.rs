use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{DepositError, Result};

/// inclusive deposit period bounds in months; `to: None` is open-ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodRange {
    pub from: u32,
    pub to: Option<u32>,
}

impl PeriodRange {
    pub fn new(from: u32, to: Option<u32>) -> Self {
        Self { from, to }
    }

    pub fn contains(&self, months: u32) -> bool {
        months >= self.from && self.to.map_or(true, |to| months <= to)
    }

    pub fn overlaps(&self, other: &PeriodRange) -> bool {
        let below_other = self.to.is_some_and(|to| to < other.from);
        let above_other = other.to.is_some_and(|to| to < self.from);
        !below_other && !above_other
    }

    fn is_well_formed(&self) -> bool {
        self.to.map_or(true, |to| to >= self.from)
    }
}

/// inclusive deposit amount bounds; `to: None` is open-ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountRange {
    pub from: Money,
    pub to: Option<Money>,
}

impl AmountRange {
    pub fn new(from: Money, to: Option<Money>) -> Self {
        Self { from, to }
    }

    pub fn contains(&self, amount: Money) -> bool {
        amount >= self.from && self.to.map_or(true, |to| amount <= to)
    }

    pub fn overlaps(&self, other: &AmountRange) -> bool {
        let below_other = self.to.is_some_and(|to| to < other.from);
        let above_other = other.to.is_some_and(|to| to < self.from);
        !below_other && !above_other
    }

    fn is_well_formed(&self) -> bool {
        !self.from.is_negative() && self.to.map_or(true, |to| to >= self.from)
    }
}

/// one tier of an interest rate chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateSlab {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub period: Option<PeriodRange>,
    #[serde(default)]
    pub amount: Option<AmountRange>,
    pub annual_rate_percent: Decimal,
}

impl RateSlab {
    pub fn new(
        period: Option<PeriodRange>,
        amount: Option<AmountRange>,
        annual_rate_percent: Decimal,
    ) -> Result<Self> {
        let slab = Self {
            description: None,
            period,
            amount,
            annual_rate_percent,
        };
        slab.validate()?;
        Ok(slab)
    }

    /// period-only slab, `to: None` for "and above"
    pub fn for_period(from: u32, to: Option<u32>, annual_rate_percent: Decimal) -> Result<Self> {
        Self::new(Some(PeriodRange::new(from, to)), None, annual_rate_percent)
    }

    /// amount-only slab, `to: None` for "and above"
    pub fn for_amount(from: Money, to: Option<Money>, annual_rate_percent: Decimal) -> Result<Self> {
        Self::new(None, Some(AmountRange::new(from, to)), annual_rate_percent)
    }

    pub fn for_period_and_amount(
        period: PeriodRange,
        amount: AmountRange,
        annual_rate_percent: Decimal,
    ) -> Result<Self> {
        Self::new(Some(period), Some(amount), annual_rate_percent)
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn rate(&self) -> Rate {
        Rate::from_percent(self.annual_rate_percent)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.period.is_none() && self.amount.is_none() {
            return Err(DepositError::InvalidConfiguration {
                message: "rate slab needs a period range, an amount range, or both".to_string(),
            });
        }
        if self.period.is_some_and(|p| !p.is_well_formed()) {
            return Err(DepositError::InvalidConfiguration {
                message: format!("rate slab period range {:?} is inverted", self.period),
            });
        }
        if self.amount.is_some_and(|a| !a.is_well_formed()) {
            return Err(DepositError::InvalidConfiguration {
                message: format!("rate slab amount range {:?} is inverted or negative", self.amount),
            });
        }
        if self.annual_rate_percent < Decimal::ZERO {
            return Err(DepositError::InvalidConfiguration {
                message: format!("rate slab rate {} is negative", self.annual_rate_percent),
            });
        }
        Ok(())
    }
}
