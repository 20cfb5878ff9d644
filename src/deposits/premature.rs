use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::decimal::{Money, Rate};
use crate::deposits::recurring::{accumulate, ContributionEvent};
use crate::deposits::{CalculationResult, DepositTerms};
use crate::errors::{DepositError, Result};
use crate::interest::{months_between, PenalisedRate, PenaltyConfig, PenaltyEngine};
use crate::types::{ClosureType, PrematureClosurePolicy};

/// what is being closed: a fixed principal or a recurring installment history
#[derive(Debug, Clone, Copy)]
pub enum DepositHolding<'a> {
    Fixed,
    Recurring(&'a [ContributionEvent]),
}

/// product-level decision on which closure types an early closure may use
pub trait ClosurePermissions {
    fn allows_premature(&self, closure_type: ClosureType) -> bool;
}

/// closure types a product accepts for premature closure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllowedClosureTypes(pub Vec<ClosureType>);

impl AllowedClosureTypes {
    pub fn new(types: Vec<ClosureType>) -> Self {
        Self(types)
    }

    pub fn all() -> Self {
        Self(vec![
            ClosureType::WithdrawDeposit,
            ClosureType::TransferToSavings,
            ClosureType::Reinvest,
        ])
    }
}

impl Default for AllowedClosureTypes {
    /// reinvesting is only offered at maturity
    fn default() -> Self {
        Self(vec![ClosureType::WithdrawDeposit, ClosureType::TransferToSavings])
    }
}

impl ClosurePermissions for AllowedClosureTypes {
    fn allows_premature(&self, closure_type: ClosureType) -> bool {
        self.0.contains(&closure_type)
    }
}

pub fn check_closure_type(
    closure_type: ClosureType,
    permissions: &dyn ClosurePermissions,
) -> Result<()> {
    if permissions.allows_premature(closure_type) {
        Ok(())
    } else {
        Err(DepositError::UnsupportedClosureType { closure_type })
    }
}

/// outcome of an accepted premature closure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrematureClosure {
    pub closure_type: ClosureType,
    pub result: CalculationResult,
    pub rate: PenalisedRate,
    pub months_elapsed: u32,
}

/// Value of a deposit closed early on `closure_date`.
///
/// The penal points come from the terms; `policy` picks whether the chart is
/// read at the contracted period or at the whole months actually elapsed.
/// The deposit then compounds at the reduced rate from activation (or each
/// installment's value date) to the closure date.
pub fn compute_premature_amount(
    terms: &DepositTerms,
    holding: DepositHolding<'_>,
    closure_date: NaiveDate,
    policy: PrematureClosurePolicy,
) -> Result<CalculationResult> {
    premature_quote(terms, holding, closure_date, policy).map(|(result, _, _)| result)
}

/// check the closure type against the product, then value the closure under
/// the terms' own policy
pub fn close_prematurely(
    terms: &DepositTerms,
    holding: DepositHolding<'_>,
    closure_date: NaiveDate,
    closure_type: ClosureType,
    permissions: &dyn ClosurePermissions,
) -> Result<PrematureClosure> {
    check_closure_type(closure_type, permissions)?;
    let (result, rate, months_elapsed) =
        premature_quote(terms, holding, closure_date, terms.penalty.policy)?;

    Ok(PrematureClosure {
        closure_type,
        result,
        rate,
        months_elapsed,
    })
}

fn premature_quote(
    terms: &DepositTerms,
    holding: DepositHolding<'_>,
    closure_date: NaiveDate,
    policy: PrematureClosurePolicy,
) -> Result<(CalculationResult, PenalisedRate, u32)> {
    terms.validate()?;
    if closure_date < terms.activation_date {
        return Err(DepositError::NegativeTerm {
            deposit_date: terms.activation_date,
            closure_date,
        });
    }
    let maturity_date = terms.maturity_date()?;
    if closure_date >= maturity_date {
        return Err(DepositError::InvalidDate {
            message: format!(
                "closure on {} is not premature, deposit matures on {}",
                closure_date, maturity_date
            ),
        });
    }

    let months_elapsed = months_between(terms.activation_date, closure_date)?;
    let engine = PenaltyEngine::new(PenaltyConfig::new(terms.penalty.penal_rate_percent, policy));

    if closure_date == terms.activation_date {
        // nothing accrued yet, and no elapsed tier to look up
        let deposited = deposited_on(terms, holding, closure_date);
        let rate = PenalisedRate {
            slab_rate: Rate::ZERO,
            penalty_points: terms.penalty.penal_rate_percent,
            effective_rate: Rate::ZERO,
            lookup_period_months: engine.lookup_period(terms.deposit_period_months, 0),
            policy,
        };
        let result = CalculationResult::rounded(
            deposited,
            deposited,
            closure_date,
            Rate::ZERO,
            terms.currency.decimal_places,
        );
        return Ok((result, rate, 0));
    }

    let rate = engine.penalised_rate(
        &terms.chart,
        terms.principal,
        terms.deposit_period_months,
        months_elapsed,
    )?;

    let (total, deposited) = match holding {
        DepositHolding::Fixed => {
            let outcome = terms.scheduler().run_until(
                terms.principal,
                terms.day_count.daily_rate_fraction(rate.effective_rate),
                terms.activation_date,
                terms.deposit_period_months,
                closure_date,
            )?;
            (outcome.final_amount, terms.principal)
        }
        DepositHolding::Recurring(contributions) => {
            accumulate(contributions, terms, rate.effective_rate, closure_date)?
        }
    };

    let result = CalculationResult::rounded(
        total,
        deposited,
        closure_date,
        rate.effective_rate,
        terms.currency.decimal_places,
    );
    info!(
        ?policy,
        months_elapsed,
        slab_rate = %rate.slab_rate,
        effective_rate = %rate.effective_rate,
        amount = %result.amount,
        %closure_date,
        "premature closure computed"
    );
    Ok((result, rate, months_elapsed))
}

fn deposited_on(terms: &DepositTerms, holding: DepositHolding<'_>, date: NaiveDate) -> Money {
    match holding {
        DepositHolding::Fixed => terms.principal,
        DepositHolding::Recurring(contributions) => contributions
            .iter()
            .filter(|c| c.value_date <= date)
            .map(|c| c.amount)
            .sum(),
    }
}
