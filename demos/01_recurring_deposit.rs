/// recurring deposit - monthly installments with controlled time
use chrono::{Duration, TimeZone, Utc};
use deposit_engine_rs::{DepositAccount, DepositProductConfig, Money, SafeTimeProvider, TimeSource};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== recurring deposit example ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().ok_or("bad date")?,
    ));
    let controller = time.test_control().expect("test time source");

    let product = DepositProductConfig::recurring_deposit("Recurring Deposit", time.now().date_naive())?;
    let mut account = DepositAccount::open(&product, "RD-0001", Money::from_major(250), 12, &time)?;

    let maturity = account.maturity()?;
    println!("projected maturity on {}: ${}", maturity.as_of_date, maturity.amount);

    // pay six installments, one a month
    for month in 1..=6 {
        let id = account.record_installment_now(Money::from_major(250), &time)?;
        println!("installment {} recorded on {} ({})", month, time.now().format("%Y-%m-%d"), id);
        controller.advance(Duration::days(30));
    }

    let balance = account.balance_now(&time)?;
    println!("\nbalance on {}: ${}", balance.as_of_date, balance.amount);
    println!("deposited:        ${}", balance.principal);
    println!("interest so far:  ${}", balance.interest_earned);

    println!("\n{}", account.json(&time)?);

    Ok(())
}
