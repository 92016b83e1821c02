//! Account domain model

use std::fmt;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};
#[cfg(test)]
use std::sync::TryLockError;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::result::{Error, Result};

/// Account identifier
///
/// Ordered lexicographically by its string form. That order is the
/// canonical lock order used by every path that locks two accounts.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
    /// Create an identifier, rejecting blank strings
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(Error::validation("account id cannot be empty"));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AccountId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for AccountId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.0
    }
}

/// A ledger account
///
/// This is the value form of an account: what callers receive as a
/// snapshot and what they hand to the store on creation. The live,
/// shared state lives in an [`AccountRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub account_id: AccountId,
    pub balance: Decimal,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account with an opening balance
    pub fn new(account_id: AccountId, balance: Decimal) -> Self {
        let now = Utc::now();
        Self {
            account_id,
            balance,
            created_at: now,
            updated_at: now,
        }
    }

    /// Validate account data before it enters the ledger
    pub fn validate(&self) -> Result<()> {
        if self.account_id.as_str().trim().is_empty() {
            return Err(Error::validation("account id cannot be empty"));
        }
        if self.balance < Decimal::ZERO {
            return Err(Error::validation(format!(
                "initial balance must be positive, got {}",
                self.balance
            )));
        }
        Ok(())
    }

    pub(crate) fn set_balance(&mut self, balance: Decimal) {
        self.balance = balance;
        self.updated_at = Utc::now();
    }
}

/// The canonical, shared record for one account
///
/// The store owns these behind an `Arc`; every holder sees the same
/// balance. The identifier sits outside the mutex so two records can be
/// ordered without locking either of them.
#[derive(Debug)]
pub struct AccountRecord {
    id: AccountId,
    state: Mutex<Account>,
}

impl AccountRecord {
    pub fn new(account: Account) -> Self {
        Self {
            id: account.account_id.clone(),
            state: Mutex::new(account),
        }
    }

    pub fn id(&self) -> &AccountId {
        &self.id
    }

    /// Copy of the current account state, taken under this record's lock
    pub fn snapshot(&self) -> Result<Account> {
        Ok(self.lock()?.clone())
    }

    /// Current balance, taken under this record's lock
    pub fn balance(&self) -> Result<Decimal> {
        Ok(self.lock()?.balance)
    }

    /// Exclusive access to the account state
    ///
    /// Callers that need two accounts at once must go through
    /// [`super::lock_pair`] instead of calling this twice.
    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, Account>> {
        self.state
            .lock()
            .map_err(|e| Error::lock_poisoned(format!("account {}: {}", self.id, e)))
    }

    #[cfg(test)]
    pub(crate) fn is_locked(&self) -> bool {
        matches!(self.state.try_lock(), Err(TryLockError::WouldBlock))
    }
}
