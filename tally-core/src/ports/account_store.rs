//! Account store port - keyed storage of account records

use std::sync::Arc;

use crate::domain::result::Result;
use crate::domain::{Account, AccountId, AccountRecord};

/// Account storage abstraction
///
/// The store owns the canonical [`AccountRecord`]s and hands out shared
/// references to them, never copies, so a balance written through one
/// reference is visible through every other. Each method must be atomic
/// for a single key; nothing here participates in the account locking
/// discipline.
pub trait AccountStore: Send + Sync {
    /// Look up the record for an account
    fn get(&self, id: &AccountId) -> Result<Option<Arc<AccountRecord>>>;

    /// Insert a new account
    ///
    /// Fails with `DuplicateAccount` if the id is already taken.
    fn put(&self, account: Account) -> Result<Arc<AccountRecord>>;

    /// All records, in no particular order
    fn all(&self) -> Result<Vec<Arc<AccountRecord>>>;
}
