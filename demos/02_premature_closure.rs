/// premature closure - penalty policies side by side
use chrono::NaiveDate;
use deposit_engine_rs::{
    compute_premature_amount, ClosureType, DepositAccount, DepositHolding, DepositProductConfig,
    Money, PrematureClosurePolicy,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== premature closure example ===\n");

    let start = NaiveDate::from_ymd_opt(2024, 1, 1).ok_or("bad date")?;
    let closure = NaiveDate::from_ymd_opt(2024, 5, 15).ok_or("bad date")?;

    let product = DepositProductConfig::fixed_deposit("Term Deposit", start)?;
    let terms = product.activate(Money::from_major(20_000), 24, start)?;

    for policy in [PrematureClosurePolicy::WholeTerm, PrematureClosurePolicy::TillPrematureWithdrawal] {
        let result = compute_premature_amount(&terms, DepositHolding::Fixed, closure, policy)?;
        println!(
            "{:?}: ${} at {} (interest ${})",
            policy, result.amount, result.annual_rate, result.interest_earned
        );
    }

    // reinvesting is not offered before maturity
    let mut account = DepositAccount::new("FD-0042", terms, product.closure_config.allowed_closure_types.clone());
    match account.premature_amount(closure, ClosureType::Reinvest) {
        Ok(_) => println!("\nreinvest accepted"),
        Err(e) => println!("\nreinvest rejected: {}", e),
    }

    let payout = account.premature_amount(closure, ClosureType::TransferToSavings)?;
    println!("transfer to savings: ${}", payout.result.amount);

    Ok(())
}
