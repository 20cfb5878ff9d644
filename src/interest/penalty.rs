use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::chart::InterestRateChart;
use crate::decimal::{Money, Rate};
use crate::errors::{DepositError, Result};
use crate::types::PrematureClosurePolicy;

/// pre-closure penalty configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenaltyConfig {
    /// percentage points taken off the slab rate (1 turns 6% into 5%)
    pub penal_rate_percent: Decimal,
    pub policy: PrematureClosurePolicy,
}

impl PenaltyConfig {
    pub fn new(penal_rate_percent: Decimal, policy: PrematureClosurePolicy) -> Self {
        Self {
            penal_rate_percent,
            policy,
        }
    }

    pub fn none(policy: PrematureClosurePolicy) -> Self {
        Self::new(Decimal::ZERO, policy)
    }
}

/// rate applied to a prematurely closed deposit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenalisedRate {
    pub slab_rate: Rate,
    pub penalty_points: Decimal,
    pub effective_rate: Rate,
    /// deposit period the chart was consulted with
    pub lookup_period_months: u32,
    pub policy: PrematureClosurePolicy,
}

/// engine for penalty-adjusted premature closure rates
pub struct PenaltyEngine {
    pub config: PenaltyConfig,
}

impl PenaltyEngine {
    pub fn new(config: PenaltyConfig) -> Self {
        Self { config }
    }

    /// chart period that governs the closure under the configured policy
    pub fn lookup_period(&self, contracted_months: u32, elapsed_months: u32) -> u32 {
        match self.config.policy {
            PrematureClosurePolicy::WholeTerm => contracted_months,
            PrematureClosurePolicy::TillPrematureWithdrawal => elapsed_months,
        }
    }

    /// slab rate for the governing period, less the penal points
    ///
    /// A penalty larger than the slab rate floors the effective rate at zero;
    /// a premature closure never eats into principal.
    pub fn penalised_rate(
        &self,
        chart: &InterestRateChart,
        amount: Money,
        contracted_months: u32,
        elapsed_months: u32,
    ) -> Result<PenalisedRate> {
        if self.config.penal_rate_percent < Decimal::ZERO {
            return Err(DepositError::InvalidConfiguration {
                message: format!("negative pre-closure penalty {}", self.config.penal_rate_percent),
            });
        }

        let lookup_period_months = self.lookup_period(contracted_months, elapsed_months);
        let slab_rate = chart.resolve(amount, lookup_period_months)?;
        let mut effective_rate = slab_rate.less_points(self.config.penal_rate_percent);

        if effective_rate.is_negative() {
            warn!(
                %slab_rate,
                penalty = %self.config.penal_rate_percent,
                "pre-closure penalty exceeds slab rate, flooring at zero"
            );
            effective_rate = Rate::ZERO;
        }

        Ok(PenalisedRate {
            slab_rate,
            penalty_points: self.config.penal_rate_percent,
            effective_rate,
            lookup_period_months,
            policy: self.config.policy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::RateSlab;
    use rust_decimal_macros::dec;

    fn chart() -> InterestRateChart {
        InterestRateChart::builder()
            .slab(RateSlab::for_period(1, Some(6), dec!(5)).unwrap())
            .slab(RateSlab::for_period(7, Some(12), dec!(6)).unwrap())
            .slab(RateSlab::for_period(13, None, dec!(7)).unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_whole_term_uses_contracted_tier() {
        let engine = PenaltyEngine::new(PenaltyConfig::new(dec!(1), PrematureClosurePolicy::WholeTerm));
        let rate = engine.penalised_rate(&chart(), Money::from_major(10_000), 12, 1).unwrap();

        assert_eq!(rate.slab_rate, Rate::from_percentage(6));
        assert_eq!(rate.effective_rate, Rate::from_percentage(5));
        assert_eq!(rate.lookup_period_months, 12);
    }

    #[test]
    fn test_till_withdrawal_uses_elapsed_tier() {
        let engine = PenaltyEngine::new(PenaltyConfig::new(
            dec!(0.5),
            PrematureClosurePolicy::TillPrematureWithdrawal,
        ));
        let rate = engine.penalised_rate(&chart(), Money::from_major(10_000), 14, 4).unwrap();

        assert_eq!(rate.slab_rate, Rate::from_percentage(5));
        assert_eq!(rate.effective_rate, Rate::from_percent(dec!(4.5)));
        assert_eq!(rate.lookup_period_months, 4);
    }

    #[test]
    fn test_elapsed_period_outside_chart_fails() {
        let engine = PenaltyEngine::new(PenaltyConfig::none(PrematureClosurePolicy::TillPrematureWithdrawal));
        assert!(matches!(
            engine.penalised_rate(&chart(), Money::from_major(100), 12, 0),
            Err(DepositError::NoMatchingSlab { period_months: 0, .. })
        ));
    }

    #[test]
    fn test_penalty_above_rate_floors_at_zero() {
        let engine = PenaltyEngine::new(PenaltyConfig::new(dec!(9), PrematureClosurePolicy::WholeTerm));
        let rate = engine.penalised_rate(&chart(), Money::from_major(100), 12, 3).unwrap();
        assert_eq!(rate.effective_rate, Rate::ZERO);
    }

    #[test]
    fn test_negative_penalty_rejected() {
        let engine = PenaltyEngine::new(PenaltyConfig::new(dec!(-1), PrematureClosurePolicy::WholeTerm));
        assert!(engine.penalised_rate(&chart(), Money::from_major(100), 12, 3).is_err());
    }
}
