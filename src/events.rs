use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::{Money, Rate};
use crate::types::{ClosureType, ContributionId, PrematureClosurePolicy};

/// events emitted by deposit ledgers and accounts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DepositEvent {
    // contribution events
    ContributionRecorded {
        id: ContributionId,
        amount: Money,
        value_date: NaiveDate,
    },
    ContributionAmended {
        id: ContributionId,
        old_amount: Money,
        new_amount: Money,
        old_value_date: NaiveDate,
        new_value_date: NaiveDate,
    },
    ContributionUndone {
        id: ContributionId,
        amount: Money,
        value_date: NaiveDate,
    },

    // calculation events
    MaturityComputed {
        account_id: Uuid,
        maturity_amount: Money,
        maturity_date: NaiveDate,
        annual_rate: Rate,
    },
    BalanceComputed {
        account_id: Uuid,
        balance: Money,
        as_of_date: NaiveDate,
    },
    PrematureClosureComputed {
        account_id: Uuid,
        amount: Money,
        closure_date: NaiveDate,
        closure_type: ClosureType,
        policy: PrematureClosurePolicy,
        effective_rate: Rate,
    },

    // configuration events
    TermsUpdated {
        account_id: Uuid,
        reason: String,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default, Clone)]
pub struct EventStore {
    events: Vec<DepositEvent>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: DepositEvent) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<DepositEvent> {
        std::mem::take(&mut self.events)
    }
}
