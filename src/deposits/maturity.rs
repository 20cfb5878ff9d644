use chrono::NaiveDate;
use tracing::info;

use crate::deposits::recurring::{accumulate, ContributionEvent};
use crate::deposits::{CalculationResult, DepositTerms};
use crate::errors::Result;
use crate::interest::{add_months, CompoundingOutcome};
use crate::types::DepositKind;

/// Amount a deposit pays out at maturity.
///
/// The chart is consulted once with the account's principal and contracted
/// period. A fixed deposit compounds its principal over the whole term; a
/// recurring deposit is valued as its full installment schedule (one
/// installment on every monthly anniversary) run to maturity.
pub fn compute_maturity(terms: &DepositTerms) -> Result<CalculationResult> {
    terms.validate()?;
    let rate = terms.chart.resolve(terms.principal, terms.deposit_period_months)?;
    let maturity_date = terms.maturity_date()?;

    let (total, deposited) = match terms.kind {
        DepositKind::Fixed => {
            let outcome = terms.scheduler().run(
                terms.principal,
                terms.day_count.daily_rate_fraction(rate),
                terms.activation_date,
                terms.deposit_period_months,
            )?;
            (outcome.final_amount, terms.principal)
        }
        DepositKind::Recurring => {
            let installments = projected_installments(terms)?;
            accumulate(&installments, terms, rate, maturity_date)?
        }
    };

    let result = CalculationResult::rounded(
        total,
        deposited,
        maturity_date,
        rate,
        terms.currency.decimal_places,
    );
    info!(
        kind = ?terms.kind,
        principal = %result.principal,
        maturity_amount = %result.amount,
        %maturity_date,
        annual_rate = %rate,
        "maturity computed"
    );
    Ok(result)
}

/// unrounded compounding trace of a single-principal deposit
pub fn maturity_schedule(terms: &DepositTerms) -> Result<CompoundingOutcome> {
    terms.validate()?;
    let rate = terms.chart.resolve(terms.principal, terms.deposit_period_months)?;
    terms.scheduler().run(
        terms.principal,
        terms.day_count.daily_rate_fraction(rate),
        terms.activation_date,
        terms.deposit_period_months,
    )
}

/// one installment of `terms.principal` per month, starting on activation
pub fn projected_installments(terms: &DepositTerms) -> Result<Vec<ContributionEvent>> {
    (0..terms.deposit_period_months)
        .map(|month| -> Result<ContributionEvent> {
            let value_date: NaiveDate = add_months(terms.activation_date, month)?;
            Ok(ContributionEvent::new(terms.principal, value_date))
        })
        .collect()
}
