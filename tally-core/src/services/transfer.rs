//! Transfer service - moves money between two accounts
//!
//! A transfer runs as one blocking call:
//!
//! 1. validate the amount and reject self-transfers
//! 2. resolve the debit and credit records through the store
//! 3. lock both records in canonical id order
//! 4. check funds, then write both balances
//! 5. release the locks and notify both holders
//!
//! Every rejection happens before step 4 writes anything. Notifications go
//! out after the locks are released, so another transfer may already have
//! moved the balances again by the time a holder hears about this one.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::domain::result::{Error, Result};
use crate::domain::{
    lock_pair, validate_amount, Account, AccountId, AccountRecord, AccountRole, TransferReceipt,
    TransferRequest,
};
use crate::ports::{AccountStore, Notifier};

/// Transfer engine
pub struct TransferService {
    store: Arc<dyn AccountStore>,
    notifier: Arc<dyn Notifier>,
}

impl TransferService {
    pub fn new(store: Arc<dyn AccountStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    /// Run a transfer described by a request
    pub fn execute(&self, request: &TransferRequest) -> Result<TransferReceipt> {
        self.transfer(&request.account_from, &request.account_to, request.amount)
    }

    /// Move `amount` from `source_id` to `destination_id`
    ///
    /// Blocks until both account locks are available. On error no balance
    /// has changed and no notification was sent.
    pub fn transfer(
        &self,
        source_id: &AccountId,
        destination_id: &AccountId,
        amount: Decimal,
    ) -> Result<TransferReceipt> {
        info!(
            source = %source_id,
            destination = %destination_id,
            %amount,
            "initiating transfer"
        );

        if let Err(e) = validate_amount(amount) {
            warn!(%amount, "invalid transfer amount, it must be greater than zero");
            return Err(e);
        }

        if source_id == destination_id {
            warn!(account_id = %source_id, "rejecting transfer to the same account");
            return Err(Error::SameAccount(source_id.clone()));
        }

        let debit = self.get_and_validate_account(source_id, AccountRole::Debit)?;
        let credit = self.get_and_validate_account(destination_id, AccountRole::Credit)?;

        let (debit_account, credit_account) = Self::apply(&debit, &credit, amount)?;

        self.send_notifications(&debit_account, &credit_account, amount);

        info!(
            source = %source_id,
            destination = %destination_id,
            %amount,
            "transfer completed"
        );

        Ok(TransferReceipt {
            account_from: source_id.clone(),
            account_to: destination_id.clone(),
            amount,
            debit_account,
            credit_account,
            completed_at: Utc::now(),
        })
    }

    fn get_and_validate_account(
        &self,
        account_id: &AccountId,
        role: AccountRole,
    ) -> Result<Arc<AccountRecord>> {
        match self.store.get(account_id)? {
            Some(record) => {
                debug!(%role, %account_id, "found account");
                Ok(record)
            }
            None => {
                warn!(%role, %account_id, "account not found");
                Err(Error::AccountNotFound {
                    role,
                    account_id: account_id.clone(),
                })
            }
        }
    }

    /// Check funds and write both balances while holding both locks
    ///
    /// Returns snapshots of both accounts taken before the locks drop.
    fn apply(
        debit: &AccountRecord,
        credit: &AccountRecord,
        amount: Decimal,
    ) -> Result<(Account, Account)> {
        let mut pair = lock_pair(debit, credit)?;

        if pair.source.balance < amount {
            warn!(account_id = %debit.id(), "insufficient funds");
            return Err(Error::InsufficientFunds {
                account_id: debit.id().clone(),
            });
        }
        debug!(account_id = %debit.id(), "sufficient funds available");

        let debit_balance = pair
            .source
            .balance
            .checked_sub(amount)
            .ok_or_else(|| Error::BalanceOverflow {
                account_id: debit.id().clone(),
            })?;
        let credit_balance = pair
            .destination
            .balance
            .checked_add(amount)
            .ok_or_else(|| Error::BalanceOverflow {
                account_id: credit.id().clone(),
            })?;

        pair.source.set_balance(debit_balance);
        pair.destination.set_balance(credit_balance);

        Ok((pair.source.clone(), pair.destination.clone()))
    }

    fn send_notifications(
        &self,
        debit_account: &Account,
        credit_account: &Account,
        amount: Decimal,
    ) {
        debug!(
            debit = %debit_account.account_id,
            credit = %credit_account.account_id,
            "sending transfer notifications"
        );

        self.notifier.notify_about_transfer(
            debit_account,
            &format!(
                "Transferred {} to account {}",
                amount, credit_account.account_id
            ),
        );
        self.notifier.notify_about_transfer(
            credit_account,
            &format!(
                "Received {} from account {}",
                amount, debit_account.account_id
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::adapters::InMemoryAccountStore;

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<(String, String)>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify_about_transfer(&self, account: &Account, transfer_description: &str) {
            self.sent.lock().unwrap().push((
                account.account_id.to_string(),
                transfer_description.to_string(),
            ));
        }
    }

    fn id(s: &str) -> AccountId {
        AccountId::new(s).unwrap()
    }

    fn setup(
        balances: &[(&str, i64)],
    ) -> (Arc<InMemoryAccountStore>, Arc<RecordingNotifier>, TransferService) {
        let store = Arc::new(InMemoryAccountStore::new());
        for (account_id, balance) in balances {
            store
                .put(Account::new(id(account_id), Decimal::new(*balance, 0)))
                .unwrap();
        }
        let notifier = Arc::new(RecordingNotifier::default());
        let service = TransferService::new(store.clone(), notifier.clone());
        (store, notifier, service)
    }

    fn balance(store: &InMemoryAccountStore, account_id: &str) -> Decimal {
        store.get(&id(account_id)).unwrap().unwrap().balance().unwrap()
    }

    #[test]
    fn test_receipt_holds_post_transfer_snapshots() {
        let (_store, _notifier, service) = setup(&[("A1", 500), ("A2", 200)]);

        let receipt = service
            .transfer(&id("A1"), &id("A2"), Decimal::new(100, 0))
            .unwrap();

        assert_eq!(receipt.debit_account.balance, Decimal::new(400, 0));
        assert_eq!(receipt.credit_account.balance, Decimal::new(300, 0));
        assert_eq!(receipt.amount, Decimal::new(100, 0));
    }

    #[test]
    fn test_transfer_can_empty_account() {
        let (store, _notifier, service) = setup(&[("A1", 100), ("A2", 0)]);

        service
            .transfer(&id("A1"), &id("A2"), Decimal::new(100, 0))
            .unwrap();

        assert_eq!(balance(&store, "A1"), Decimal::ZERO);
        assert_eq!(balance(&store, "A2"), Decimal::new(100, 0));
    }

    #[test]
    fn test_fractional_amounts_are_exact() {
        let (store, _notifier, service) = setup(&[("A1", 1), ("A2", 0)]);

        for _ in 0..10 {
            service
                .transfer(&id("A1"), &id("A2"), Decimal::new(1, 1))
                .unwrap();
        }

        assert_eq!(balance(&store, "A1"), Decimal::ZERO);
        assert_eq!(balance(&store, "A2"), Decimal::ONE);
    }

    #[test]
    fn test_self_transfer_rejected_without_notification() {
        let (store, notifier, service) = setup(&[("A1", 100)]);

        let err = service
            .transfer(&id("A1"), &id("A1"), Decimal::new(10, 0))
            .unwrap_err();

        assert!(matches!(err, Error::SameAccount(_)));
        assert_eq!(balance(&store, "A1"), Decimal::new(100, 0));
        assert!(notifier.sent.lock().unwrap().is_empty());
    }

    #[test]
    fn test_credit_overflow_leaves_both_balances() {
        let store = Arc::new(InMemoryAccountStore::new());
        store.put(Account::new(id("A1"), Decimal::new(10, 0))).unwrap();
        store.put(Account::new(id("A2"), Decimal::MAX)).unwrap();
        let service = TransferService::new(store.clone(), Arc::new(RecordingNotifier::default()));

        let err = service
            .transfer(&id("A1"), &id("A2"), Decimal::new(10, 0))
            .unwrap_err();

        assert!(matches!(err, Error::BalanceOverflow { .. }));
        assert_eq!(balance(&store, "A1"), Decimal::new(10, 0));
        assert_eq!(balance(&store, "A2"), Decimal::MAX);
    }

    #[test]
    fn test_locks_released_after_insufficient_funds() {
        let (store, _notifier, service) = setup(&[("A1", 50), ("A2", 200)]);

        assert!(service
            .transfer(&id("A1"), &id("A2"), Decimal::new(100, 0))
            .is_err());

        assert!(!store.get(&id("A1")).unwrap().unwrap().is_locked());
        assert!(!store.get(&id("A2")).unwrap().unwrap().is_locked());
    }

    #[test]
    fn test_execute_uses_request_fields() {
        let (store, _notifier, service) = setup(&[("A1", 10), ("A2", 10)]);

        let request = TransferRequest::new(id("A2"), id("A1"), Decimal::new(4, 0));
        service.execute(&request).unwrap();

        assert_eq!(balance(&store, "A1"), Decimal::new(14, 0));
        assert_eq!(balance(&store, "A2"), Decimal::new(6, 0));
    }
}
