//! Transfer command - move money between two accounts

use std::process::exit;

use anyhow::Result;
use tally_core::{OperationResult, TransferReceipt};

use super::{get_context, parse_account_id, parse_amount};
use crate::output;

pub fn run(from: &str, to: &str, amount: &str, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let from = parse_account_id(from)?;
    let to = parse_account_id(to)?;
    let amount = parse_amount(amount)?;

    let result = ctx.transfer_service.transfer(&from, &to, amount);

    if json {
        let failed = result.is_err();
        let result: OperationResult<TransferReceipt> = result.into();
        println!("{}", serde_json::to_string_pretty(&result)?);
        // Exit with code 1 on rejection so scripts can branch on it
        if failed {
            exit(1);
        }
        return Ok(());
    }

    let receipt = result?;
    print_receipt(&receipt);
    Ok(())
}

pub fn print_receipt(receipt: &TransferReceipt) {
    output::success(&format!(
        "Transferred {} from {} to {}",
        receipt.amount, receipt.account_from, receipt.account_to
    ));
    println!(
        "{}",
        output::accounts_table(&[
            receipt.debit_account.clone(),
            receipt.credit_account.clone()
        ])
    );
}
