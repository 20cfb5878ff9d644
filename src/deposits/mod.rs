pub mod maturity;
pub mod premature;
pub mod recurring;
pub mod terms;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};

pub use maturity::{compute_maturity, maturity_schedule, projected_installments};
pub use premature::{
    check_closure_type, close_prematurely, compute_premature_amount, AllowedClosureTypes,
    ClosurePermissions, DepositHolding, PrematureClosure,
};
pub use recurring::{compute_balance_as_of, ContributionEvent, ContributionLedger};
pub use terms::DepositTerms;

/// amount handed to the accounting layer, rounded to the currency minor unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub amount: Money,
    pub as_of_date: NaiveDate,
    /// total deposited that the amount grew from
    pub principal: Money,
    pub interest_earned: Money,
    pub annual_rate: Rate,
}

impl CalculationResult {
    /// round an unrounded total, keeping `amount = principal + interest_earned`
    pub(crate) fn rounded(
        total: Money,
        principal: Money,
        as_of_date: NaiveDate,
        annual_rate: Rate,
        decimal_places: u32,
    ) -> Self {
        let amount = total.round_to_minor(decimal_places);
        Self {
            amount,
            as_of_date,
            principal,
            interest_earned: amount - principal,
            annual_rate,
        }
    }
}
