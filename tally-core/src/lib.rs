//! Tally Core - in-memory account ledger with concurrent transfers
//!
//! This crate follows hexagonal architecture:
//!
//! - **domain**: Core entities (Account, TransferRequest) and the locking discipline
//! - **ports**: Trait definitions for collaborators (AccountStore, Notifier)
//! - **services**: Business logic orchestration (accounts, transfers)
//! - **adapters**: Concrete implementations (in-memory store, log notifier)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use adapters::{InMemoryAccountStore, LogNotifier, SilentNotifier};
use config::Config;
use ports::{AccountStore, Notifier};
use services::{AccountsService, TransferService};

// Re-export commonly used types at crate root
pub use domain::result::{Error, OperationResult};
pub use domain::{Account, AccountId, AccountRole, TransferReceipt, TransferRequest};

/// Main context for Tally operations
///
/// Holds the configuration, the collaborators and the services built on
/// them. Everything is injected through the constructor; nothing is global.
pub struct TallyContext {
    pub config: Config,
    pub store: Arc<dyn AccountStore>,
    pub notifier: Arc<dyn Notifier>,
    pub accounts_service: AccountsService,
    pub transfer_service: TransferService,
}

impl TallyContext {
    /// Create a context from the settings in `data_dir`
    ///
    /// Uses the in-memory store, seeded with the configured opening
    /// accounts.
    pub fn new(data_dir: &Path) -> Result<Self> {
        let config = Config::load(data_dir)?;

        let notifier: Arc<dyn Notifier> = if config.notifications_enabled {
            Arc::new(LogNotifier)
        } else {
            Arc::new(SilentNotifier)
        };

        let ctx = Self::with_components(config, Arc::new(InMemoryAccountStore::new()), notifier);
        ctx.seed_opening_accounts()?;
        Ok(ctx)
    }

    /// Create a context from explicit collaborators
    pub fn with_components(
        config: Config,
        store: Arc<dyn AccountStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let accounts_service = AccountsService::new(Arc::clone(&store));
        let transfer_service = TransferService::new(Arc::clone(&store), Arc::clone(&notifier));

        Self {
            config,
            store,
            notifier,
            accounts_service,
            transfer_service,
        }
    }

    fn seed_opening_accounts(&self) -> Result<()> {
        for opening in &self.config.opening_accounts {
            let account_id = AccountId::new(opening.account_id.clone())
                .context("Invalid opening account in settings")?;
            self.accounts_service
                .create_account(Account::new(account_id, opening.balance))
                .with_context(|| {
                    format!("Failed to open account {} from settings", opening.account_id)
                })?;
        }
        info!(
            count = self.config.opening_accounts.len(),
            "opening accounts loaded"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use tempfile::tempdir;

    #[test]
    fn test_context_seeds_opening_accounts() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{ "accounts": [
                { "accountId": "A1", "balance": "500" },
                { "accountId": "A2", "balance": "200" }
            ] }"#,
        )
        .unwrap();

        let ctx = TallyContext::new(dir.path()).unwrap();
        let accounts = ctx.accounts_service.list_accounts().unwrap();
        assert_eq!(accounts.len(), 2);

        ctx.transfer_service
            .transfer(
                &AccountId::new("A1").unwrap(),
                &AccountId::new("A2").unwrap(),
                Decimal::new(100, 0),
            )
            .unwrap();
        assert_eq!(ctx.accounts_service.total_balance().unwrap(), Decimal::new(700, 0));
    }

    #[test]
    fn test_context_rejects_duplicate_opening_accounts() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{ "accounts": [
                { "accountId": "A1", "balance": "1" },
                { "accountId": "A1", "balance": "2" }
            ] }"#,
        )
        .unwrap();

        let err = TallyContext::new(dir.path()).err().unwrap();
        assert!(err.to_string().contains("A1"));
    }
}
