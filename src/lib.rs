pub mod account;
pub mod chart;
pub mod config;
pub mod decimal;
pub mod deposits;
pub mod errors;
pub mod events;
pub mod interest;
pub mod types;

// re-export key types
pub use account::{DepositAccount, DepositAccountView};
pub use chart::{AmountRange, ChartKind, InterestRateChart, InterestRateChartBuilder, PeriodRange, RateSlab};
pub use config::{standard_period_chart, DepositProductConfig};
pub use decimal::{Money, Rate};
pub use deposits::{
    close_prematurely, compute_balance_as_of, compute_maturity, compute_premature_amount,
    maturity_schedule, AllowedClosureTypes, CalculationResult, ClosurePermissions,
    ContributionEvent, ContributionLedger, DepositHolding, DepositTerms, PrematureClosure,
};
pub use errors::{DepositError, Result};
pub use events::{DepositEvent, EventStore};
pub use interest::{
    daily_rate_fraction, CompoundingOutcome, CompoundingScheduler, DayCountConvention,
    PenalisedRate, PenaltyConfig, PenaltyEngine, SchedulerState,
};
pub use types::{
    ClosureType, ContributionId, Currency, DepositKind, InterestInterval, PrematureClosurePolicy,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
