//! Accounts service - account creation and lookup

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::domain::result::{Error, Result};
use crate::domain::{Account, AccountId};
use crate::ports::AccountStore;

/// Account creation and lookup
pub struct AccountsService {
    store: Arc<dyn AccountStore>,
}

impl AccountsService {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    /// Validate and store a new account
    ///
    /// Returns the account as stored.
    pub fn create_account(&self, account: Account) -> Result<Account> {
        account.validate()?;

        let record = self.store.put(account).inspect_err(|e| {
            warn!(error = %e, "account creation rejected");
        })?;
        info!(account_id = %record.id(), "account created");

        record.snapshot()
    }

    /// Current state of one account
    pub fn get_account(&self, account_id: &AccountId) -> Result<Account> {
        match self.store.get(account_id)? {
            Some(record) => record.snapshot(),
            None => Err(Error::not_found(format!(
                "account with accountId : {}",
                account_id
            ))),
        }
    }

    /// All accounts, sorted by id
    pub fn list_accounts(&self) -> Result<Vec<Account>> {
        let mut accounts = self
            .store
            .all()?
            .iter()
            .map(|record| record.snapshot())
            .collect::<Result<Vec<_>>>()?;
        accounts.sort_by(|a, b| a.account_id.cmp(&b.account_id));
        Ok(accounts)
    }

    /// Sum of every balance in the ledger
    ///
    /// Accounts are read one at a time. With transfers in flight the sum can
    /// count money on both sides of a pair, so only rely on it once the
    /// ledger is quiet.
    pub fn total_balance(&self) -> Result<Decimal> {
        self.store
            .all()?
            .iter()
            .try_fold(Decimal::ZERO, |total, record| {
                total
                    .checked_add(record.balance()?)
                    .ok_or_else(|| Error::validation("total balance overflows"))
            })
    }
}
