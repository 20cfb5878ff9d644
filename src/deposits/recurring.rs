use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::decimal::{Money, Rate};
use crate::deposits::{CalculationResult, DepositTerms};
use crate::errors::{DepositError, Result};
use crate::events::{DepositEvent, EventStore};
use crate::interest::months_spanned;
use crate::types::ContributionId;

/// a recorded recurring deposit installment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionEvent {
    pub id: ContributionId,
    pub amount: Money,
    pub value_date: NaiveDate,
}

impl ContributionEvent {
    pub fn new(amount: Money, value_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount,
            value_date,
        }
    }
}

/// Installments of one recurring account, ordered by value date.
///
/// Changes address an installment by id, never by position. Installments on
/// the same value date keep the order they were recorded in.
#[derive(Debug, Default, Clone)]
pub struct ContributionLedger {
    contributions: Vec<ContributionEvent>,
    events: EventStore,
}

impl ContributionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, amount: Money, value_date: NaiveDate) -> Result<ContributionId> {
        Self::check_amount(amount)?;
        let contribution = ContributionEvent::new(amount, value_date);
        let id = contribution.id;
        self.insert(contribution);

        self.events.emit(DepositEvent::ContributionRecorded {
            id,
            amount,
            value_date,
        });
        Ok(id)
    }

    /// replace the amount and value date of a recorded installment
    pub fn amend(&mut self, id: ContributionId, amount: Money, value_date: NaiveDate) -> Result<()> {
        Self::check_amount(amount)?;
        let old = self.remove(id)?;
        self.insert(ContributionEvent {
            id,
            amount,
            value_date,
        });

        self.events.emit(DepositEvent::ContributionAmended {
            id,
            old_amount: old.amount,
            new_amount: amount,
            old_value_date: old.value_date,
            new_value_date: value_date,
        });
        Ok(())
    }

    pub fn undo(&mut self, id: ContributionId) -> Result<ContributionEvent> {
        let removed = self.remove(id)?;
        self.events.emit(DepositEvent::ContributionUndone {
            id,
            amount: removed.amount,
            value_date: removed.value_date,
        });
        Ok(removed)
    }

    pub fn get(&self, id: ContributionId) -> Option<&ContributionEvent> {
        self.contributions.iter().find(|c| c.id == id)
    }

    pub fn contributions(&self) -> &[ContributionEvent] {
        &self.contributions
    }

    pub fn total_deposited(&self) -> Money {
        self.contributions.iter().map(|c| c.amount).sum()
    }

    pub fn len(&self) -> usize {
        self.contributions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contributions.is_empty()
    }

    pub fn take_events(&mut self) -> Vec<DepositEvent> {
        self.events.take_events()
    }

    fn check_amount(amount: Money) -> Result<()> {
        if !amount.is_positive() {
            return Err(DepositError::InvalidTerm {
                message: format!("installment amount {} must be positive", amount),
            });
        }
        Ok(())
    }

    fn insert(&mut self, contribution: ContributionEvent) {
        let at = self
            .contributions
            .partition_point(|c| c.value_date <= contribution.value_date);
        self.contributions.insert(at, contribution);
    }

    fn remove(&mut self, id: ContributionId) -> Result<ContributionEvent> {
        let index = self
            .contributions
            .iter()
            .position(|c| c.id == id)
            .ok_or(DepositError::ContributionNotFound { id })?;
        Ok(self.contributions.remove(index))
    }
}

/// Balance of a recurring account as of `as_of`.
///
/// Every installment compounds on its own clock from its value date with the
/// account's resolved rate; the rate is looked up once with the account's
/// installment amount and contracted period. Installments dated after
/// `as_of` are not yet part of the balance.
pub fn compute_balance_as_of(
    contributions: &[ContributionEvent],
    terms: &DepositTerms,
    as_of: NaiveDate,
) -> Result<CalculationResult> {
    terms.validate()?;
    if as_of < terms.activation_date {
        return Err(DepositError::NegativeTerm {
            deposit_date: terms.activation_date,
            closure_date: as_of,
        });
    }

    let rate = terms.chart.resolve(terms.principal, terms.deposit_period_months)?;
    let (total, deposited) = accumulate(contributions, terms, rate, as_of)?;
    let result = CalculationResult::rounded(
        total,
        deposited,
        as_of,
        rate,
        terms.currency.decimal_places,
    );

    info!(
        contributions = contributions.len(),
        deposited = %result.principal,
        balance = %result.amount,
        %as_of,
        "recurring balance computed"
    );
    Ok(result)
}

/// unrounded `(balance, deposited)` of the installments up to `until`, capped
/// at the account's maturity; installments must fall between activation and
/// maturity
pub(crate) fn accumulate(
    contributions: &[ContributionEvent],
    terms: &DepositTerms,
    rate: Rate,
    until: NaiveDate,
) -> Result<(Money, Money)> {
    let maturity = terms.maturity_date()?;
    let end = until.min(maturity);
    let daily_rate = terms.day_count.daily_rate_fraction(rate);
    let scheduler = terms.scheduler();

    let mut total = Money::ZERO;
    let mut deposited = Money::ZERO;

    for contribution in contributions {
        if contribution.value_date < terms.activation_date {
            return Err(DepositError::InvalidDate {
                message: format!(
                    "installment {} dated {} before activation on {}",
                    contribution.id, contribution.value_date, terms.activation_date
                ),
            });
        }
        if contribution.value_date > maturity {
            return Err(DepositError::InvalidDate {
                message: format!(
                    "installment {} dated {} after maturity on {}",
                    contribution.id, contribution.value_date, maturity
                ),
            });
        }
        if contribution.value_date > end {
            debug!(id = %contribution.id, value_date = %contribution.value_date, "installment after cut-off skipped");
            continue;
        }

        deposited += contribution.amount;
        let term_months = months_spanned(contribution.value_date, maturity)?;
        if term_months == 0 {
            // paid in on the maturity date itself
            total += contribution.amount;
            continue;
        }

        let outcome = scheduler.run_until(
            contribution.amount,
            daily_rate,
            contribution.value_date,
            term_months,
            end,
        )?;
        total += outcome.final_amount;
    }

    Ok((total, deposited))
}
