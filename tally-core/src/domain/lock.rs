//! Ordered locking of two account records
//!
//! Any code path that holds more than one account lock must acquire them
//! through [`lock_pair`]. Locks are always taken in ascending
//! [`AccountId`](super::AccountId) order, so two threads contending for the
//! same pair can never each hold one lock while waiting on the other.

use std::cmp::Ordering;
use std::sync::MutexGuard;

use tracing::trace;

use super::account::{Account, AccountRecord};
use super::result::{Error, Result};

/// Both guards of a transfer, named by role rather than by lock order
///
/// Dropping this releases both locks.
pub(crate) struct LockedPair<'a> {
    pub source: MutexGuard<'a, Account>,
    pub destination: MutexGuard<'a, Account>,
}

/// Lock `source` and `destination` in canonical order
///
/// The same record cannot be locked twice; asking for it is an error
/// rather than a deadlock.
pub(crate) fn lock_pair<'a>(
    source: &'a AccountRecord,
    destination: &'a AccountRecord,
) -> Result<LockedPair<'a>> {
    match source.id().cmp(destination.id()) {
        Ordering::Less => {
            trace!(first = %source.id(), second = %destination.id(), "acquiring account locks");
            let source = source.lock()?;
            let destination = destination.lock()?;
            Ok(LockedPair {
                source,
                destination,
            })
        }
        Ordering::Greater => {
            trace!(first = %destination.id(), second = %source.id(), "acquiring account locks");
            let destination = destination.lock()?;
            let source = source.lock()?;
            Ok(LockedPair {
                source,
                destination,
            })
        }
        Ordering::Equal => Err(Error::SameAccount(source.id().clone())),
    }
}
