//! Open command - add an opening account to settings.json

use anyhow::{bail, Context, Result};
use rust_decimal::Decimal;
use tally_core::config::Config;

use super::{get_data_dir, parse_account_id, parse_amount};
use crate::output;

pub fn run(account_id: &str, balance: &str) -> Result<()> {
    let account_id = parse_account_id(account_id)?;
    let balance = parse_amount(balance)?;
    if balance < Decimal::ZERO {
        bail!("Initial balance must be positive, got {}", balance);
    }

    let data_dir = get_data_dir()?;
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create tally directory: {:?}", data_dir))?;

    let mut config = Config::load(&data_dir)?;
    config.set_opening_account(account_id.as_str(), balance);
    config.save(&data_dir)?;

    output::success(&format!(
        "Account {} will open with balance {}",
        account_id, balance
    ));
    Ok(())
}
