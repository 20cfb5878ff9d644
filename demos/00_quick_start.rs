/// quick start - maturity of a 12 month fixed deposit
use chrono::NaiveDate;
use deposit_engine_rs::{compute_maturity, DepositProductConfig, Money};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).ok_or("bad date")?;

    // fixed deposit product with the standard period chart
    let product = DepositProductConfig::fixed_deposit("Term Deposit", start)?;

    // $10,000 for 12 months
    let terms = product.activate(Money::from_major(10_000), 12, start)?;
    let result = compute_maturity(&terms)?;

    println!("rate:            {}", result.annual_rate);
    println!("maturity date:   {}", result.as_of_date);
    println!("maturity amount: ${}", result.amount);
    println!("interest earned: ${}", result.interest_earned);

    Ok(())
}
