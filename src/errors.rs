use chrono::NaiveDate;
use thiserror::Error;

use crate::decimal::Money;
use crate::types::{ClosureType, ContributionId};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DepositError {
    #[error("no rate slab covers amount {amount} for {period_months} months")]
    NoMatchingSlab {
        amount: Money,
        period_months: u32,
    },

    #[error("rate slabs {first} and {second} overlap: {message}")]
    AmbiguousSlab {
        first: usize,
        second: usize,
        message: String,
    },

    #[error("invalid deposit term: {message}")]
    InvalidTerm {
        message: String,
    },

    #[error("closure date {closure_date} precedes deposit date {deposit_date}")]
    NegativeTerm {
        deposit_date: NaiveDate,
        closure_date: NaiveDate,
    },

    #[error("closure type {closure_type:?} not allowed for premature closure")]
    UnsupportedClosureType {
        closure_type: ClosureType,
    },

    #[error("no interest rate chart effective on {date}")]
    NoEffectiveChart {
        date: NaiveDate,
    },

    #[error("contribution not found: {id}")]
    ContributionNotFound {
        id: ContributionId,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("invalid date: {message}")]
    InvalidDate {
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, DepositError>;
