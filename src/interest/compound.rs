use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::decimal::Money;
use crate::errors::{DepositError, Result};
use crate::interest::add_months;
use crate::types::InterestInterval;

/// where the scheduler's elapsed-months counter stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchedulerState {
    /// between compounding boundaries, interest pending on the last base
    Accumulating,
    /// the last period closed on a compounding boundary
    BoundaryReached,
    /// the full term elapsed
    Matured,
}

/// accrued interest folded into the compounding base
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundingEvent {
    pub date: NaiveDate,
    pub month: u32,
    pub interest_compounded: Money,
    pub new_base: Money,
}

/// interest made visible at a posting boundary; never changes the base
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostingSnapshot {
    pub date: NaiveDate,
    pub interest_posted: Money,
    pub balance: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundingOutcome {
    pub principal: Money,
    pub final_amount: Money,
    pub total_interest: Money,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub months_elapsed: u32,
    pub state: SchedulerState,
    pub compounding_events: Vec<CompoundingEvent>,
    pub postings: Vec<PostingSnapshot>,
}

/// Advances a principal month by month from its deposit date.
///
/// Each elapsed month runs from one calendar anniversary of the start date to
/// the next and accrues `base * daily_rate * days`. Accrued interest joins the
/// base only when the month closes a compounding interval (or every day for
/// daily compounding), and at maturity. A cut-off inside a month accrues
/// simple interest for the exact days on the last compounded base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompoundingScheduler {
    pub compounding: InterestInterval,
    pub posting: InterestInterval,
}

struct Accrual {
    base: Money,
    pending: Money,
    unposted: Money,
    compounding_events: Vec<CompoundingEvent>,
    postings: Vec<PostingSnapshot>,
}

impl CompoundingScheduler {
    pub fn new(compounding: InterestInterval, posting: InterestInterval) -> Self {
        Self {
            compounding,
            posting,
        }
    }

    /// both intervals from the month-count encoding (0 = daily)
    pub fn from_months(compounding_months: u32, posting_months: u32) -> Self {
        Self::new(
            InterestInterval::from_months(compounding_months),
            InterestInterval::from_months(posting_months),
        )
    }

    /// compound `principal` over the whole `term_months`
    pub fn run(
        &self,
        principal: Money,
        daily_rate: Decimal,
        start: NaiveDate,
        term_months: u32,
    ) -> Result<CompoundingOutcome> {
        let maturity = add_months(start, term_months)?;
        self.run_until(principal, daily_rate, start, term_months, maturity)
    }

    /// compound `principal` up to `until`, or to maturity if that comes first
    pub fn run_until(
        &self,
        principal: Money,
        daily_rate: Decimal,
        start: NaiveDate,
        term_months: u32,
        until: NaiveDate,
    ) -> Result<CompoundingOutcome> {
        if term_months == 0 {
            return Err(DepositError::InvalidTerm {
                message: "deposit period must be at least one month".to_string(),
            });
        }
        if until < start {
            return Err(DepositError::NegativeTerm {
                deposit_date: start,
                closure_date: until,
            });
        }

        let maturity = add_months(start, term_months)?;
        let end = until.min(maturity);

        let mut acc = Accrual {
            base: principal,
            pending: Money::ZERO,
            unposted: Money::ZERO,
            compounding_events: Vec::new(),
            postings: Vec::new(),
        };
        let mut state = SchedulerState::Accumulating;
        let mut months_elapsed = 0;

        for month in 1..=term_months {
            let period_start = add_months(start, month - 1)?;
            if period_start >= end {
                break;
            }
            let full_period_end = add_months(start, month)?;
            let period_end = full_period_end.min(end);

            self.accrue_period(&mut acc, daily_rate, period_start, period_end);

            if period_end < full_period_end {
                // trailing partial month: simple interest, no new base
                state = SchedulerState::Accumulating;
                break;
            }
            months_elapsed = month;

            if !self.compounding.is_daily() && self.compounding.is_month_boundary(month) {
                Self::compound(&mut acc, period_end, month);
                state = SchedulerState::BoundaryReached;
            } else {
                state = SchedulerState::Accumulating;
            }

            if !self.posting.is_daily() && (self.posting.is_month_boundary(month) || month == term_months) {
                Self::post(&mut acc, period_end);
            }
        }

        if end == maturity {
            // a term shorter than the interval compounds once, here
            if !acc.pending.is_zero() {
                Self::compound(&mut acc, maturity, term_months);
            }
            if !acc.unposted.is_zero() {
                Self::post(&mut acc, maturity);
            }
            state = SchedulerState::Matured;
        }

        let final_amount = acc.base + acc.pending;
        debug!(
            %principal,
            %final_amount,
            %start,
            %end,
            months_elapsed,
            ?state,
            "compounding run finished"
        );

        Ok(CompoundingOutcome {
            principal,
            final_amount,
            total_interest: final_amount - principal,
            start_date: start,
            end_date: end,
            months_elapsed,
            state,
            compounding_events: acc.compounding_events,
            postings: acc.postings,
        })
    }

    fn accrue_period(&self, acc: &mut Accrual, daily_rate: Decimal, from: NaiveDate, to: NaiveDate) {
        let days = (to - from).num_days();
        if self.compounding.is_daily() {
            for day in 1..=days {
                let interest = acc.base * daily_rate;
                acc.base += interest;
                acc.unposted += interest;
                if self.posting.is_daily() {
                    Self::post(acc, from + Duration::days(day));
                }
            }
        } else {
            let interest = acc.base.simple_interest(daily_rate, days);
            if self.posting.is_daily() {
                let per_day = acc.base * daily_rate;
                let opening = acc.base + acc.pending;
                for day in 1..=days {
                    acc.postings.push(PostingSnapshot {
                        date: from + Duration::days(day),
                        interest_posted: per_day,
                        balance: opening + per_day * Decimal::from(day),
                    });
                }
            } else {
                acc.unposted += interest;
            }
            acc.pending += interest;
        }
    }

    fn compound(acc: &mut Accrual, date: NaiveDate, month: u32) {
        let interest = acc.pending;
        acc.base += interest;
        acc.pending = Money::ZERO;
        debug!(%date, month, %interest, new_base = %acc.base, "interest compounded");
        acc.compounding_events.push(CompoundingEvent {
            date,
            month,
            interest_compounded: interest,
            new_base: acc.base,
        });
    }

    fn post(acc: &mut Accrual, date: NaiveDate) {
        acc.postings.push(PostingSnapshot {
            date,
            interest_posted: acc.unposted,
            balance: acc.base + acc.pending,
        });
        acc.unposted = Money::ZERO;
    }
}
