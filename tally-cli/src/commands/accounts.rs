//! Accounts commands - list and show accounts

use anyhow::Result;
use colored::Colorize;

use super::{get_context, parse_account_id};
use crate::output;

pub fn run_list(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let accounts = ctx.accounts_service.list_accounts()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&accounts)?);
        return Ok(());
    }

    if accounts.is_empty() {
        println!("No accounts. Add one with `tally open <id> <balance>`.");
        return Ok(());
    }

    println!("{}", "Accounts".bold());
    println!("{}", output::accounts_table(&accounts));
    println!(
        "Total: {}",
        ctx.accounts_service.total_balance()?.to_string().bold()
    );

    Ok(())
}

pub fn run_show(account_id: &str, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let account_id = parse_account_id(account_id)?;
    let account = ctx.accounts_service.get_account(&account_id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&account)?);
        return Ok(());
    }

    println!("{}", output::accounts_table(std::slice::from_ref(&account)));
    Ok(())
}
