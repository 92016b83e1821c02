//! Notifier adapters

use tracing::info;

use crate::domain::Account;
use crate::ports::Notifier;

/// Delivers notifications as structured log events
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify_about_transfer(&self, account: &Account, transfer_description: &str) {
        info!(
            target: "tally::notification",
            account_id = %account.account_id,
            balance = %account.balance,
            notification = transfer_description,
            "sending notification to account holder"
        );
    }
}

/// Drops every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify_about_transfer(&self, _account: &Account, _transfer_description: &str) {}
}
