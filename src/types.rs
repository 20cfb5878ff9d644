use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// identity of a recorded recurring deposit installment
pub type ContributionId = Uuid;

/// deposit product kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DepositKind {
    /// single up-front amount
    Fixed,
    /// periodic installments of a fixed amount
    Recurring,
}

/// compounding or posting interval
///
/// Configuration carries intervals as a month count where 0 means daily;
/// `from_months` maps that encoding onto this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterestInterval {
    Daily,
    Months(u32),
}

impl InterestInterval {
    pub const MONTHLY: InterestInterval = InterestInterval::Months(1);
    pub const QUARTERLY: InterestInterval = InterestInterval::Months(3);
    pub const SEMI_ANNUAL: InterestInterval = InterestInterval::Months(6);
    pub const ANNUAL: InterestInterval = InterestInterval::Months(12);

    pub fn from_months(months: u32) -> Self {
        if months == 0 {
            InterestInterval::Daily
        } else {
            InterestInterval::Months(months)
        }
    }

    pub fn as_months(&self) -> u32 {
        match self {
            InterestInterval::Daily => 0,
            InterestInterval::Months(m) => *m,
        }
    }

    pub fn is_daily(&self) -> bool {
        matches!(self, InterestInterval::Daily)
    }

    /// whether the end of elapsed month `month` is a boundary of this interval
    pub fn is_month_boundary(&self, month: u32) -> bool {
        match self {
            InterestInterval::Daily => true,
            InterestInterval::Months(m) => month % m == 0,
        }
    }
}

/// which slab rate governs an early closure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrematureClosurePolicy {
    /// the tier of the originally contracted period
    WholeTerm,
    /// the tier of the period actually elapsed before closure
    TillPrematureWithdrawal,
}

/// what happens to the proceeds when a deposit is closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClosureType {
    WithdrawDeposit,
    TransferToSavings,
    Reinvest,
}

/// currency with its minor-unit precision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub code: String,
    pub decimal_places: u32,
}

impl Currency {
    pub fn new(code: &str, decimal_places: u32) -> Self {
        Self {
            code: code.to_string(),
            decimal_places,
        }
    }

    pub fn usd() -> Self {
        Self::new("USD", 2)
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::usd()
    }
}
