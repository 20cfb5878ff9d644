use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chart::{ChartKind, InterestRateChart, RateSlab};
use crate::decimal::Money;
use crate::deposits::{AllowedClosureTypes, DepositTerms};
use crate::errors::{DepositError, Result};
use crate::interest::{DayCountConvention, PenaltyConfig};
use crate::types::{Currency, DepositKind, InterestInterval, PrematureClosurePolicy};

/// deposit product configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositProductConfig {
    pub name: String,
    pub kind: DepositKind,
    #[serde(default)]
    pub currency: Currency,
    pub charts: Vec<Arc<InterestRateChart>>,
    pub interest_config: InterestConfig,
    pub closure_config: ClosureConfig,
    #[serde(default)]
    pub limits: DepositLimits,
}

/// interest configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterestConfig {
    /// months between compounding boundaries, 0 for daily
    pub compounding_interval_months: u32,
    /// months between posting boundaries, 0 for daily
    pub posting_interval_months: u32,
    pub day_count_convention: DayCountConvention,
}

/// premature closure configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosureConfig {
    #[serde(default)]
    pub pre_closure_penal_rate_percent: Decimal,
    pub policy: PrematureClosurePolicy,
    #[serde(default)]
    pub allowed_closure_types: AllowedClosureTypes,
}

/// product limits
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DepositLimits {
    pub min_deposit_period_months: Option<u32>,
    pub max_deposit_period_months: Option<u32>,
    pub min_deposit_amount: Option<Money>,
    pub max_deposit_amount: Option<Money>,
}

impl DepositProductConfig {
    /// fixed deposit with the standard period chart, 6 to 24 months
    pub fn fixed_deposit(name: &str, valid_from: NaiveDate) -> Result<Self> {
        Ok(Self {
            name: name.to_string(),
            kind: DepositKind::Fixed,
            currency: Currency::usd(),
            charts: vec![Arc::new(standard_period_chart(valid_from)?)],
            interest_config: InterestConfig {
                compounding_interval_months: 1,
                posting_interval_months: 1,
                day_count_convention: DayCountConvention::Days365,
            },
            closure_config: ClosureConfig {
                pre_closure_penal_rate_percent: dec!(1),
                policy: PrematureClosurePolicy::WholeTerm,
                allowed_closure_types: AllowedClosureTypes::default(),
            },
            limits: DepositLimits {
                min_deposit_period_months: Some(6),
                max_deposit_period_months: Some(24),
                min_deposit_amount: None,
                max_deposit_amount: None,
            },
        })
    }

    /// recurring deposit with the standard period chart, quarterly compounding
    pub fn recurring_deposit(name: &str, valid_from: NaiveDate) -> Result<Self> {
        Ok(Self {
            name: name.to_string(),
            kind: DepositKind::Recurring,
            currency: Currency::usd(),
            charts: vec![Arc::new(standard_period_chart(valid_from)?)],
            interest_config: InterestConfig {
                compounding_interval_months: 3,
                posting_interval_months: 3,
                day_count_convention: DayCountConvention::Days365,
            },
            closure_config: ClosureConfig {
                pre_closure_penal_rate_percent: dec!(1),
                policy: PrematureClosurePolicy::TillPrematureWithdrawal,
                allowed_closure_types: AllowedClosureTypes::default(),
            },
            limits: DepositLimits {
                min_deposit_period_months: Some(6),
                max_deposit_period_months: Some(24),
                min_deposit_amount: None,
                max_deposit_amount: None,
            },
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| DepositError::InvalidConfiguration {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| DepositError::InvalidConfiguration {
            message: e.to_string(),
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.charts.is_empty() {
            return Err(DepositError::InvalidConfiguration {
                message: format!("product '{}' has no interest rate chart", self.name),
            });
        }
        if self.closure_config.pre_closure_penal_rate_percent < Decimal::ZERO {
            return Err(DepositError::InvalidConfiguration {
                message: "pre-closure penal rate cannot be negative".to_string(),
            });
        }
        if let (Some(min), Some(max)) = (
            self.limits.min_deposit_period_months,
            self.limits.max_deposit_period_months,
        ) {
            if min > max {
                return Err(DepositError::InvalidConfiguration {
                    message: format!("minimum deposit period {} exceeds maximum {}", min, max),
                });
            }
        }
        Ok(())
    }

    /// chart effective on `date`; the latest-starting one wins
    pub fn effective_chart(&self, date: NaiveDate) -> Result<Arc<InterestRateChart>> {
        self.charts
            .iter()
            .filter(|chart| chart.is_effective_on(date))
            .max_by_key(|chart| chart.valid_from())
            .cloned()
            .ok_or(DepositError::NoEffectiveChart { date })
    }

    /// Snapshot the product into the terms of a newly activated account.
    ///
    /// `principal` is the up-front amount for a fixed product and the
    /// installment amount for a recurring one.
    pub fn activate(
        &self,
        principal: Money,
        deposit_period_months: u32,
        activation_date: NaiveDate,
    ) -> Result<DepositTerms> {
        self.validate()?;
        self.check_limits(principal, deposit_period_months)?;
        let chart = self.effective_chart(activation_date)?;

        debug!(
            product = %self.name,
            chart = %chart.name(),
            %principal,
            deposit_period_months,
            %activation_date,
            "deposit terms activated"
        );

        let terms = DepositTerms::new(
            self.kind,
            principal,
            deposit_period_months,
            activation_date,
            chart,
        )
        .with_intervals(
            InterestInterval::from_months(self.interest_config.compounding_interval_months),
            InterestInterval::from_months(self.interest_config.posting_interval_months),
        )
        .with_day_count(self.interest_config.day_count_convention)
        .with_penalty(PenaltyConfig::new(
            self.closure_config.pre_closure_penal_rate_percent,
            self.closure_config.policy,
        ))
        .with_currency(self.currency.clone());

        terms.validate()?;
        Ok(terms)
    }

    fn check_limits(&self, principal: Money, deposit_period_months: u32) -> Result<()> {
        let limits = &self.limits;
        if limits.min_deposit_period_months.is_some_and(|min| deposit_period_months < min)
            || limits.max_deposit_period_months.is_some_and(|max| deposit_period_months > max)
        {
            return Err(DepositError::InvalidTerm {
                message: format!(
                    "deposit period of {} months outside product limits {:?}..{:?}",
                    deposit_period_months,
                    limits.min_deposit_period_months,
                    limits.max_deposit_period_months
                ),
            });
        }
        if limits.min_deposit_amount.is_some_and(|min| principal < min)
            || limits.max_deposit_amount.is_some_and(|max| principal > max)
        {
            return Err(DepositError::InvalidTerm {
                message: format!("deposit amount {} outside product limits", principal),
            });
        }
        Ok(())
    }
}

/// period chart: 1-6 months 5%, 7-12 6%, 13-18 7%, 19-24 8%
pub fn standard_period_chart(valid_from: NaiveDate) -> Result<InterestRateChart> {
    InterestRateChart::builder()
        .name("standard period chart")
        .kind(ChartKind::PeriodOnly)
        .valid_from(valid_from)
        .slab(RateSlab::for_period(1, Some(6), dec!(5))?)
        .slab(RateSlab::for_period(7, Some(12), dec!(6))?)
        .slab(RateSlab::for_period(13, Some(18), dec!(7))?)
        .slab(RateSlab::for_period(19, Some(24), dec!(8))?)
        .build()
}
