//! In-memory account store
//!
//! Accounts live for the lifetime of the process. The map itself is behind
//! an `RwLock`; each record carries its own mutex for balance updates.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::domain::result::{Error, Result};
use crate::domain::{Account, AccountId, AccountRecord};
use crate::ports::AccountStore;

/// Account store backed by a `HashMap`
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    accounts: RwLock<HashMap<AccountId, Arc<AccountRecord>>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccountStore for InMemoryAccountStore {
    fn get(&self, id: &AccountId) -> Result<Option<Arc<AccountRecord>>> {
        let accounts = self
            .accounts
            .read()
            .map_err(|e| Error::lock_poisoned(format!("account store: {}", e)))?;
        Ok(accounts.get(id).cloned())
    }

    fn put(&self, account: Account) -> Result<Arc<AccountRecord>> {
        let mut accounts = self
            .accounts
            .write()
            .map_err(|e| Error::lock_poisoned(format!("account store: {}", e)))?;

        match accounts.entry(account.account_id.clone()) {
            Entry::Occupied(entry) => Err(Error::DuplicateAccount(entry.key().clone())),
            Entry::Vacant(entry) => {
                debug!(account_id = %account.account_id, "storing account");
                let record = Arc::new(AccountRecord::new(account));
                entry.insert(Arc::clone(&record));
                Ok(record)
            }
        }
    }

    fn all(&self) -> Result<Vec<Arc<AccountRecord>>> {
        let accounts = self
            .accounts
            .read()
            .map_err(|e| Error::lock_poisoned(format!("account store: {}", e)))?;
        Ok(accounts.values().cloned().collect())
    }
}
