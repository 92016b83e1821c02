//! CLI command implementations

pub mod accounts;
pub mod open;
pub mod shell;
pub mod stress;
pub mod transfer;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use rust_decimal::Decimal;
use tally_core::{AccountId, TallyContext};

/// Get the tally data directory from environment or default
pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("TALLY_DIR") {
        Ok(PathBuf::from(dir))
    } else {
        dirs::home_dir()
            .map(|home| home.join(".tally"))
            .ok_or_else(|| anyhow!("Could not find home directory"))
    }
}

/// Build a ledger seeded from settings.json
pub fn get_context() -> Result<TallyContext> {
    let data_dir = get_data_dir()?;
    TallyContext::new(&data_dir).context("Failed to initialize tally context")
}

/// Parse an account id argument
pub fn parse_account_id(value: &str) -> Result<AccountId> {
    AccountId::new(value).map_err(|e| anyhow!("Invalid account id {:?}: {}", value, e))
}

/// Parse a decimal amount argument
pub fn parse_amount(value: &str) -> Result<Decimal> {
    value
        .trim()
        .parse::<Decimal>()
        .map_err(|_| anyhow!("Invalid amount: {}", value))
}
