use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::DepositProductConfig;
use crate::decimal::{Money, Rate};
use crate::deposits::{
    close_prematurely, compute_balance_as_of, compute_maturity, AllowedClosureTypes,
    CalculationResult, ContributionEvent, ContributionLedger, DepositHolding, DepositTerms,
    PrematureClosure,
};
use crate::errors::{DepositError, Result};
use crate::events::{DepositEvent, EventStore};
use crate::types::{ClosureType, ContributionId, DepositKind};

/// An activated deposit account.
///
/// The calculators are pure; this type holds the terms snapshot and the
/// installment history and evaluates them "as of" the date read from a
/// `SafeTimeProvider`, so tests can move time forward.
#[derive(Debug, Clone)]
pub struct DepositAccount {
    pub id: Uuid,
    pub account_number: String,
    pub terms: DepositTerms,
    pub permissions: AllowedClosureTypes,
    pub ledger: ContributionLedger,
    pub events: EventStore,
}

/// serializable summary of an account at a date
#[derive(Debug, Serialize, Deserialize)]
pub struct DepositAccountView {
    pub id: Uuid,
    pub account_number: String,
    pub kind: DepositKind,
    pub currency: String,
    pub activation_date: NaiveDate,
    pub maturity_date: NaiveDate,
    pub deposit_period_months: u32,
    pub annual_rate: Rate,
    pub as_of_date: NaiveDate,
    pub total_deposited: Money,
    pub balance: Money,
    pub interest_earned: Money,
    pub maturity_amount: Money,
    pub installment_count: usize,
}

impl DepositAccount {
    pub fn new(account_number: &str, terms: DepositTerms, permissions: AllowedClosureTypes) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_number: account_number.to_string(),
            terms,
            permissions,
            ledger: ContributionLedger::new(),
            events: EventStore::new(),
        }
    }

    /// activate an account under `product` on the provider's current date
    pub fn open(
        product: &DepositProductConfig,
        account_number: &str,
        principal: Money,
        deposit_period_months: u32,
        time_provider: &SafeTimeProvider,
    ) -> Result<Self> {
        let activation_date = time_provider.now().date_naive();
        let terms = product.activate(principal, deposit_period_months, activation_date)?;
        Ok(Self::new(
            account_number,
            terms,
            product.closure_config.allowed_closure_types.clone(),
        ))
    }

    pub fn record_installment(&mut self, amount: Money, value_date: NaiveDate) -> Result<ContributionId> {
        self.require_recurring()?;
        self.check_value_date(value_date)?;
        let id = self.ledger.record(amount, value_date)?;
        self.drain_ledger_events();
        Ok(id)
    }

    /// record an installment dated on the provider's current date
    pub fn record_installment_now(
        &mut self,
        amount: Money,
        time_provider: &SafeTimeProvider,
    ) -> Result<ContributionId> {
        self.record_installment(amount, time_provider.now().date_naive())
    }

    pub fn amend_installment(&mut self, id: ContributionId, amount: Money, value_date: NaiveDate) -> Result<()> {
        self.require_recurring()?;
        self.check_value_date(value_date)?;
        self.ledger.amend(id, amount, value_date)?;
        self.drain_ledger_events();
        Ok(())
    }

    pub fn undo_installment(&mut self, id: ContributionId) -> Result<ContributionEvent> {
        self.require_recurring()?;
        let removed = self.ledger.undo(id)?;
        self.drain_ledger_events();
        Ok(removed)
    }

    /// replace the terms snapshot; the previous value is left untouched
    pub fn update_terms(&mut self, terms: DepositTerms, reason: &str) -> Result<()> {
        terms.validate()?;
        self.terms = terms;
        self.events.emit(DepositEvent::TermsUpdated {
            account_id: self.id,
            reason: reason.to_string(),
        });
        Ok(())
    }

    pub fn maturity(&mut self) -> Result<CalculationResult> {
        let result = compute_maturity(&self.terms)?;
        self.events.emit(DepositEvent::MaturityComputed {
            account_id: self.id,
            maturity_amount: result.amount,
            maturity_date: result.as_of_date,
            annual_rate: result.annual_rate,
        });
        Ok(result)
    }

    pub fn balance_as_of(&mut self, as_of: NaiveDate) -> Result<CalculationResult> {
        let result = self.compute_balance(as_of)?;
        self.events.emit(DepositEvent::BalanceComputed {
            account_id: self.id,
            balance: result.amount,
            as_of_date: as_of,
        });
        Ok(result)
    }

    pub fn balance_now(&mut self, time_provider: &SafeTimeProvider) -> Result<CalculationResult> {
        self.balance_as_of(time_provider.now().date_naive())
    }

    pub fn premature_amount(
        &mut self,
        closure_date: NaiveDate,
        closure_type: ClosureType,
    ) -> Result<PrematureClosure> {
        let closure = close_prematurely(
            &self.terms,
            self.holding(),
            closure_date,
            closure_type,
            &self.permissions,
        )?;
        self.events.emit(DepositEvent::PrematureClosureComputed {
            account_id: self.id,
            amount: closure.result.amount,
            closure_date,
            closure_type,
            policy: closure.rate.policy,
            effective_rate: closure.rate.effective_rate,
        });
        Ok(closure)
    }

    pub fn premature_amount_now(
        &mut self,
        time_provider: &SafeTimeProvider,
        closure_type: ClosureType,
    ) -> Result<PrematureClosure> {
        self.premature_amount(time_provider.now().date_naive(), closure_type)
    }

    pub fn holding(&self) -> DepositHolding<'_> {
        match self.terms.kind {
            DepositKind::Fixed => DepositHolding::Fixed,
            DepositKind::Recurring => DepositHolding::Recurring(self.ledger.contributions()),
        }
    }

    pub fn view(&self, time_provider: &SafeTimeProvider) -> Result<DepositAccountView> {
        let as_of = time_provider.now().date_naive();
        let balance = self.compute_balance(as_of)?;
        let maturity = compute_maturity(&self.terms)?;

        Ok(DepositAccountView {
            id: self.id,
            account_number: self.account_number.clone(),
            kind: self.terms.kind,
            currency: self.terms.currency.code.clone(),
            activation_date: self.terms.activation_date,
            maturity_date: self.terms.maturity_date()?,
            deposit_period_months: self.terms.deposit_period_months,
            annual_rate: balance.annual_rate,
            as_of_date: as_of,
            total_deposited: balance.principal,
            balance: balance.amount,
            interest_earned: balance.interest_earned,
            maturity_amount: maturity.amount,
            installment_count: self.ledger.len(),
        })
    }

    /// pretty-printed json summary as of the provider's current date
    pub fn json(&self, time_provider: &SafeTimeProvider) -> Result<String> {
        let view = self.view(time_provider)?;
        serde_json::to_string_pretty(&view).map_err(|e| DepositError::InvalidConfiguration {
            message: e.to_string(),
        })
    }

    pub fn take_events(&mut self) -> Vec<DepositEvent> {
        self.events.take_events()
    }

    fn compute_balance(&self, as_of: NaiveDate) -> Result<CalculationResult> {
        match self.terms.kind {
            DepositKind::Fixed => {
                let principal = [ContributionEvent::new(self.terms.principal, self.terms.activation_date)];
                compute_balance_as_of(&principal, &self.terms, as_of)
            }
            DepositKind::Recurring => compute_balance_as_of(self.ledger.contributions(), &self.terms, as_of),
        }
    }

    fn require_recurring(&self) -> Result<()> {
        if self.terms.kind != DepositKind::Recurring {
            return Err(DepositError::InvalidConfiguration {
                message: "installments apply to recurring deposits only".to_string(),
            });
        }
        Ok(())
    }

    /// installments are paid between activation and maturity, both inclusive
    fn check_value_date(&self, value_date: NaiveDate) -> Result<()> {
        let maturity_date = self.terms.maturity_date()?;
        if value_date < self.terms.activation_date || value_date > maturity_date {
            return Err(DepositError::InvalidDate {
                message: format!(
                    "installment dated {} outside {}..={}",
                    value_date, self.terms.activation_date, maturity_date
                ),
            });
        }
        Ok(())
    }

    fn drain_ledger_events(&mut self) {
        for event in self.ledger.take_events() {
            self.events.emit(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use hourglass_rs::TimeSource;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time_at(y: i32, m: u32, d: u32) -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()))
    }

    #[test]
    fn test_fixed_balance_grows_with_time() {
        let product = DepositProductConfig::fixed_deposit("FD", date(2023, 1, 1)).unwrap();
        let time = time_at(2023, 1, 1);
        let control = time.test_control().unwrap();
        let mut account = DepositAccount::open(&product, "FD-001", Money::from_major(10_000), 12, &time).unwrap();

        let opening = account.balance_now(&time).unwrap();
        assert_eq!(opening.amount, Money::from_major(10_000));

        control.advance(chrono::Duration::days(90));
        let later = account.balance_now(&time).unwrap();
        assert!(later.amount > opening.amount);

        // a year on the balance equals the maturity amount
        control.advance(chrono::Duration::days(300));
        let matured = account.balance_now(&time).unwrap();
        assert_eq!(matured.amount, account.maturity().unwrap().amount);
        assert_eq!(account.take_events().len(), 4);
    }

    #[test]
    fn test_recurring_installments_flow_through_ledger() {
        let product = DepositProductConfig::recurring_deposit("RD", date(2023, 1, 1)).unwrap();
        let time = time_at(2023, 1, 1);
        let control = time.test_control().unwrap();
        let mut account = DepositAccount::open(&product, "RD-001", Money::from_major(100), 12, &time).unwrap();

        let first = account.record_installment_now(Money::from_major(100), &time).unwrap();
        control.advance(chrono::Duration::days(31));
        account.record_installment_now(Money::from_major(100), &time).unwrap();
        assert_eq!(account.ledger.total_deposited(), Money::from_major(200));

        account.undo_installment(first).unwrap();
        let balance = account.balance_now(&time).unwrap();
        assert_eq!(balance.amount, Money::from_major(100));

        assert!(matches!(
            account.record_installment(Money::from_major(100), date(2022, 12, 1)),
            Err(DepositError::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_installments_outside_the_term_rejected() {
        let product = DepositProductConfig::recurring_deposit("RD", date(2023, 1, 1)).unwrap();
        let time = time_at(2023, 1, 1);
        let mut account = DepositAccount::open(&product, "RD-002", Money::from_major(100), 12, &time).unwrap();
        let id = account.record_installment(Money::from_major(100), date(2023, 1, 1)).unwrap();

        // maturity is 2024-01-01
        assert!(matches!(
            account.amend_installment(id, Money::from_major(100), date(2022, 12, 1)),
            Err(DepositError::InvalidDate { .. })
        ));
        assert!(matches!(
            account.amend_installment(id, Money::from_major(100), date(2024, 2, 1)),
            Err(DepositError::InvalidDate { .. })
        ));
        assert!(matches!(
            account.record_installment(Money::from_major(500), date(2024, 2, 1)),
            Err(DepositError::InvalidDate { .. })
        ));

        assert_eq!(account.ledger.len(), 1);
        assert_eq!(account.ledger.get(id).unwrap().value_date, date(2023, 1, 1));
        let balance = account.balance_as_of(date(2024, 3, 1)).unwrap();
        assert_eq!(balance.principal, Money::from_major(100));

        // the last day of the term is still accepted
        account.amend_installment(id, Money::from_major(100), date(2024, 1, 1)).unwrap();
        let at_maturity = account.balance_as_of(date(2024, 1, 1)).unwrap();
        assert_eq!(at_maturity.amount, Money::from_major(100));
    }

    #[test]
    fn test_fixed_account_rejects_installments() {
        let product = DepositProductConfig::fixed_deposit("FD", date(2023, 1, 1)).unwrap();
        let time = time_at(2023, 1, 1);
        let mut account = DepositAccount::open(&product, "FD-002", Money::from_major(1_000), 6, &time).unwrap();
        assert!(account.record_installment_now(Money::from_major(10), &time).is_err());
    }

    #[test]
    fn test_premature_closure_now() {
        let product = DepositProductConfig::fixed_deposit("FD", date(2023, 1, 1)).unwrap();
        let time = time_at(2023, 1, 1);
        let control = time.test_control().unwrap();
        let mut account = DepositAccount::open(&product, "FD-003", Money::from_major(10_000), 12, &time).unwrap();

        control.advance(chrono::Duration::days(31));
        assert!(account.premature_amount_now(&time, ClosureType::Reinvest).is_err());

        let closure = account
            .premature_amount_now(&time, ClosureType::WithdrawDeposit)
            .unwrap();
        assert_eq!(closure.result.annual_rate, Rate::from_percentage(5));
        assert_eq!(closure.months_elapsed, 1);
    }

    #[test]
    fn test_json_summary() {
        let product = DepositProductConfig::fixed_deposit("FD", date(2023, 1, 1)).unwrap();
        let time = time_at(2023, 1, 1);
        let account = DepositAccount::open(&product, "FD-004", Money::from_major(5_000), 12, &time).unwrap();

        let json = account.json(&time).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["account_number"], "FD-004");
        assert_eq!(value["maturity_date"], "2024-01-01");
        assert_eq!(value["kind"], "Fixed");
    }
}
