//! Transfer request and receipt

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::account::{Account, AccountId};
use super::result::{Error, Result};

/// Which side of a transfer an account is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountRole {
    /// Money leaves this account
    Debit,
    /// Money arrives in this account
    Credit,
}

impl AccountRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountRole::Debit => "DEBIT",
            AccountRole::Credit => "CREDIT",
        }
    }
}

impl fmt::Display for AccountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request to move `amount` from one account to another
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub account_from: AccountId,
    pub account_to: AccountId,
    pub amount: Decimal,
}

impl TransferRequest {
    pub fn new(account_from: AccountId, account_to: AccountId, amount: Decimal) -> Self {
        Self {
            account_from,
            account_to,
            amount,
        }
    }
}

/// Reject zero and negative amounts
pub fn validate_amount(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(Error::InvalidAmount(amount));
    }
    Ok(())
}

/// Outcome of a completed transfer
///
/// Both account snapshots were taken while the transfer still held the
/// locks, so they show exactly the balances this transfer produced.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferReceipt {
    pub account_from: AccountId,
    pub account_to: AccountId,
    pub amount: Decimal,
    pub debit_account: Account,
    pub credit_account: Account,
    pub completed_at: DateTime<Utc>,
}
