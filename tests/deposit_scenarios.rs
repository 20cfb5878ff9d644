use std::sync::Arc;

use chrono::NaiveDate;
use deposit_engine_rs::chart::{AmountRange, PeriodRange};
use deposit_engine_rs::interest::add_months;
use deposit_engine_rs::{
    close_prematurely, compute_balance_as_of, compute_maturity, compute_premature_amount,
    maturity_schedule, AllowedClosureTypes, ChartKind, ClosureType, ContributionEvent,
    DepositError, DepositHolding, DepositTerms, InterestInterval, InterestRateChart, Money,
    PenaltyConfig, PrematureClosurePolicy, Rate, RateSlab,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn flat_chart(rate_percent: Decimal) -> Arc<InterestRateChart> {
    Arc::new(
        InterestRateChart::builder()
            .name("flat")
            .slab(RateSlab::for_period(1, None, rate_percent).unwrap())
            .build()
            .unwrap(),
    )
}

/// days in each calendar month of the term
fn month_days(start: NaiveDate, months: u32) -> Vec<i64> {
    (0..months)
        .map(|m| (add_months(start, m + 1).unwrap() - add_months(start, m).unwrap()).num_days())
        .collect()
}

#[test]
fn fixed_deposit_monthly_compounding() {
    let start = date(2023, 1, 1);
    let terms = DepositTerms::fixed(Money::from_major(10_000), 12, start, flat_chart(dec!(6)));
    let result = compute_maturity(&terms).unwrap();

    let daily = dec!(0.06) / dec!(365);
    let mut base = dec!(10000);
    for days in month_days(start, 12) {
        base += base * daily * Decimal::from(days);
    }

    assert_eq!(result.amount, Money::from_decimal(base).round_to_minor(2));
    assert_eq!(result.as_of_date, date(2024, 1, 1));
}

#[test]
fn daily_compounding_earns_more_than_monthly() {
    let start = date(2023, 1, 1);
    let monthly = DepositTerms::fixed(Money::from_major(10_000), 12, start, flat_chart(dec!(6)));
    let daily = monthly.with_intervals(InterestInterval::Daily, InterestInterval::ANNUAL);

    let monthly_result = compute_maturity(&monthly).unwrap();
    let daily_result = compute_maturity(&daily).unwrap();

    assert!(daily_result.amount > monthly_result.amount);
}

#[test]
fn whole_term_closure_after_one_month() {
    let start = date(2023, 1, 1);
    let terms = DepositTerms::fixed(Money::from_major(10_000), 12, start, flat_chart(dec!(6)))
        .with_penalty(PenaltyConfig::new(dec!(1), PrematureClosurePolicy::WholeTerm));

    let closed = compute_premature_amount(
        &terms,
        DepositHolding::Fixed,
        date(2023, 2, 1),
        PrematureClosurePolicy::WholeTerm,
    )
    .unwrap();

    // same as a one month deposit at 5%
    let one_month_at_five = DepositTerms::fixed(Money::from_major(10_000), 1, start, flat_chart(dec!(5)));
    assert_eq!(closed.amount, compute_maturity(&one_month_at_five).unwrap().amount);
    assert_eq!(closed.annual_rate, Rate::from_percentage(5));
}

#[test]
fn combined_chart_resolves_by_period_then_amount() {
    let chart = InterestRateChart::builder()
        .kind(ChartKind::PeriodThenAmount)
        .slab(
            RateSlab::for_period_and_amount(
                PeriodRange::new(0, Some(12)),
                AmountRange::new(Money::ZERO, Some(Money::from_major(5_000))),
                dec!(5),
            )
            .unwrap(),
        )
        .slab(
            RateSlab::for_period_and_amount(
                PeriodRange::new(0, Some(12)),
                AmountRange::new(Money::from_major(5_001), None),
                dec!(6),
            )
            .unwrap(),
        )
        .build()
        .unwrap();

    assert_eq!(chart.resolve(Money::from_major(10_000), 6).unwrap(), Rate::from_percentage(6));
    assert_eq!(chart.resolve(Money::from_major(3_000), 6).unwrap(), Rate::from_percentage(5));
    assert!(matches!(
        chart.resolve(Money::from_major(3_000), 13),
        Err(DepositError::NoMatchingSlab { .. })
    ));
}

#[test]
fn maturity_is_idempotent() {
    let terms = DepositTerms::fixed(Money::from_major(7_500), 9, date(2023, 3, 15), flat_chart(dec!(6.25)))
        .with_intervals(InterestInterval::QUARTERLY, InterestInterval::MONTHLY);
    assert_eq!(compute_maturity(&terms).unwrap(), compute_maturity(&terms).unwrap());
}

#[test]
fn longer_terms_never_pay_less() {
    let base = DepositTerms::fixed(Money::from_major(10_000), 1, date(2023, 1, 31), flat_chart(dec!(6)))
        .with_intervals(InterestInterval::QUARTERLY, InterestInterval::QUARTERLY);

    let amounts: Vec<Money> = (1..=36)
        .map(|months| compute_maturity(&base.with_deposit_period(months)).unwrap().amount)
        .collect();

    assert!(amounts.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[test]
fn term_shorter_than_compounding_interval_compounds_once() {
    let terms = DepositTerms::fixed(Money::from_major(1_000), 4, date(2023, 1, 1), flat_chart(dec!(6)))
        .with_intervals(InterestInterval::ANNUAL, InterestInterval::ANNUAL);
    let outcome = maturity_schedule(&terms).unwrap();

    assert_eq!(outcome.compounding_events.len(), 1);
    assert_eq!(outcome.compounding_events[0].date, date(2023, 5, 1));
}

#[test]
fn recurring_balance_at_maturity_matches_independent_deposits() {
    let activation = date(2023, 1, 1);
    let terms = DepositTerms::recurring(Money::from_major(100), 12, activation, flat_chart(dec!(6)))
        .with_intervals(InterestInterval::QUARTERLY, InterestInterval::MONTHLY);
    let maturity = terms.maturity_date().unwrap();

    let contributions: Vec<ContributionEvent> = (0..12)
        .map(|m| {
            let amount = Money::from_major(100 + i64::from(m) * 10);
            ContributionEvent::new(amount, add_months(activation, m).unwrap())
        })
        .collect();

    let balance = compute_balance_as_of(&contributions, &terms, maturity).unwrap();

    let independent: Money = contributions
        .iter()
        .map(|c| {
            let months = 12 - contributions.iter().position(|x| x.id == c.id).unwrap() as u32;
            let fixed = DepositTerms::fixed(c.amount, months, c.value_date, terms.chart.clone())
                .with_intervals(terms.compounding, terms.posting);
            maturity_schedule(&fixed).unwrap().final_amount
        })
        .sum();

    assert_eq!(balance.amount, independent.round_to_minor(2));
    assert_eq!(balance.principal, contributions.iter().map(|c| c.amount).sum::<Money>());
}

#[test]
fn recurring_maturity_projects_every_installment() {
    let terms = DepositTerms::recurring(Money::from_major(100), 6, date(2023, 1, 1), flat_chart(dec!(6)));
    let projected = compute_maturity(&terms).unwrap();

    let contributions: Vec<ContributionEvent> = (0..6)
        .map(|m| ContributionEvent::new(Money::from_major(100), add_months(date(2023, 1, 1), m).unwrap()))
        .collect();
    let paid = compute_balance_as_of(&contributions, &terms, date(2023, 7, 1)).unwrap();

    assert_eq!(projected.amount, paid.amount);
    assert_eq!(projected.principal, Money::from_major(600));
}

#[test]
fn reinvest_is_rejected_for_premature_closure() {
    let terms = DepositTerms::fixed(Money::from_major(5_000), 12, date(2023, 1, 1), flat_chart(dec!(6)));
    let result = close_prematurely(
        &terms,
        DepositHolding::Fixed,
        date(2023, 6, 1),
        ClosureType::Reinvest,
        &AllowedClosureTypes::default(),
    );
    assert_eq!(
        result,
        Err(DepositError::UnsupportedClosureType {
            closure_type: ClosureType::Reinvest
        })
    );

    // a product that permits it gets a quote
    assert!(close_prematurely(
        &terms,
        DepositHolding::Fixed,
        date(2023, 6, 1),
        ClosureType::Reinvest,
        &AllowedClosureTypes::all(),
    )
    .is_ok());
}

#[test]
fn till_withdrawal_drops_to_shorter_tier() {
    let chart = Arc::new(deposit_engine_rs::standard_period_chart(date(2023, 1, 1)).unwrap());
    let terms = DepositTerms::fixed(Money::from_major(10_000), 24, date(2023, 1, 1), chart)
        .with_penalty(PenaltyConfig::new(dec!(1), PrematureClosurePolicy::TillPrematureWithdrawal));

    let whole = compute_premature_amount(
        &terms,
        DepositHolding::Fixed,
        date(2023, 9, 1),
        PrematureClosurePolicy::WholeTerm,
    )
    .unwrap();
    let till = compute_premature_amount(
        &terms,
        DepositHolding::Fixed,
        date(2023, 9, 1),
        PrematureClosurePolicy::TillPrematureWithdrawal,
    )
    .unwrap();

    // whole term: 8% tier less 1 point; 8 elapsed months: 6% tier less 1 point
    assert_eq!(whole.annual_rate, Rate::from_percentage(7));
    assert_eq!(till.annual_rate, Rate::from_percentage(5));
    assert!(till.amount < whole.amount);
}
