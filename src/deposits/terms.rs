use std::sync::Arc;

use chrono::NaiveDate;

use crate::chart::InterestRateChart;
use crate::decimal::Money;
use crate::errors::{DepositError, Result};
use crate::interest::{add_months, CompoundingScheduler, DayCountConvention, PenaltyConfig};
use crate::types::{Currency, DepositKind, InterestInterval, PrematureClosurePolicy};

/// Per-account snapshot of the product settings a deposit was activated with.
///
/// The chart is shared with the product through an `Arc`, but which chart and
/// which interest settings apply is fixed at activation. Updates go through
/// the `with_*` methods, each of which returns a new value.
#[derive(Debug, Clone, PartialEq)]
pub struct DepositTerms {
    pub kind: DepositKind,
    /// up-front amount (fixed) or per-installment amount (recurring)
    pub principal: Money,
    pub deposit_period_months: u32,
    pub activation_date: NaiveDate,
    pub compounding: InterestInterval,
    pub posting: InterestInterval,
    pub day_count: DayCountConvention,
    pub penalty: PenaltyConfig,
    pub currency: Currency,
    pub chart: Arc<InterestRateChart>,
}

impl DepositTerms {
    /// terms with monthly compounding and posting on a 365-day year
    pub fn new(
        kind: DepositKind,
        principal: Money,
        deposit_period_months: u32,
        activation_date: NaiveDate,
        chart: Arc<InterestRateChart>,
    ) -> Self {
        Self {
            kind,
            principal,
            deposit_period_months,
            activation_date,
            compounding: InterestInterval::MONTHLY,
            posting: InterestInterval::MONTHLY,
            day_count: DayCountConvention::Days365,
            penalty: PenaltyConfig::none(PrematureClosurePolicy::WholeTerm),
            currency: Currency::default(),
            chart,
        }
    }

    pub fn fixed(
        principal: Money,
        deposit_period_months: u32,
        activation_date: NaiveDate,
        chart: Arc<InterestRateChart>,
    ) -> Self {
        Self::new(DepositKind::Fixed, principal, deposit_period_months, activation_date, chart)
    }

    pub fn recurring(
        installment: Money,
        deposit_period_months: u32,
        activation_date: NaiveDate,
        chart: Arc<InterestRateChart>,
    ) -> Self {
        Self::new(DepositKind::Recurring, installment, deposit_period_months, activation_date, chart)
    }

    pub fn with_principal(&self, principal: Money) -> Self {
        Self {
            principal,
            ..self.clone()
        }
    }

    pub fn with_deposit_period(&self, deposit_period_months: u32) -> Self {
        Self {
            deposit_period_months,
            ..self.clone()
        }
    }

    pub fn with_activation_date(&self, activation_date: NaiveDate) -> Self {
        Self {
            activation_date,
            ..self.clone()
        }
    }

    pub fn with_intervals(&self, compounding: InterestInterval, posting: InterestInterval) -> Self {
        Self {
            compounding,
            posting,
            ..self.clone()
        }
    }

    pub fn with_day_count(&self, day_count: DayCountConvention) -> Self {
        Self {
            day_count,
            ..self.clone()
        }
    }

    pub fn with_penalty(&self, penalty: PenaltyConfig) -> Self {
        Self {
            penalty,
            ..self.clone()
        }
    }

    pub fn with_currency(&self, currency: Currency) -> Self {
        Self {
            currency,
            ..self.clone()
        }
    }

    pub fn with_chart(&self, chart: Arc<InterestRateChart>) -> Self {
        Self {
            chart,
            ..self.clone()
        }
    }

    pub fn maturity_date(&self) -> Result<NaiveDate> {
        add_months(self.activation_date, self.deposit_period_months)
    }

    pub fn scheduler(&self) -> CompoundingScheduler {
        CompoundingScheduler::new(self.compounding, self.posting)
    }

    /// round an amount to the currency's minor unit (half-up)
    pub fn round(&self, amount: Money) -> Money {
        amount.round_to_minor(self.currency.decimal_places)
    }

    pub fn validate(&self) -> Result<()> {
        if self.deposit_period_months == 0 {
            return Err(DepositError::InvalidTerm {
                message: "deposit period must be at least one month".to_string(),
            });
        }
        if !self.principal.is_positive() {
            return Err(DepositError::InvalidTerm {
                message: format!("deposit amount {} must be positive", self.principal),
            });
        }
        Ok(())
    }
}
