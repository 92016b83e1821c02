//! Notifier port - messages to account holders

use crate::domain::Account;

/// Fire-and-forget delivery of a message to an account holder
///
/// Called after a transfer has committed and released its locks. A
/// notifier swallows its own delivery failures: nothing it does can undo
/// or retry the transfer.
pub trait Notifier: Send + Sync {
    /// Notify the holder of `account` about a transfer
    ///
    /// # Arguments
    /// * `account` - Snapshot of the account as the transfer left it
    /// * `transfer_description` - Human-readable description of the movement
    fn notify_about_transfer(&self, account: &Account, transfer_description: &str);
}
