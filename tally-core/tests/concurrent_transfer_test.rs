//! Concurrent transfer tests
//!
//! These tests hammer the transfer service from many threads at once over
//! overlapping account pairs. A deadlock shows up as a hung test; a lost
//! update shows up as a broken total.
//!
//! Run with: cargo test --test concurrent_transfer_test -- --nocapture

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Instant;

use rust_decimal::Decimal;

use tally_core::adapters::{InMemoryAccountStore, SilentNotifier};
use tally_core::domain::{Account, AccountId};
use tally_core::services::{AccountsService, TransferService};
use tally_core::Error;

/// Number of concurrent threads for stress tests
const THREAD_COUNT: usize = 6;

/// Number of transfers per thread
const ITERATIONS_PER_THREAD: usize = 500;

fn id(s: &str) -> AccountId {
    AccountId::new(s).unwrap()
}

/// Helper to create a ledger with the given opening balances
fn create_ledger(balances: &[(&str, i64)]) -> (Arc<AccountsService>, Arc<TransferService>) {
    let store = Arc::new(InMemoryAccountStore::new());
    let accounts = AccountsService::new(store.clone());
    for (account_id, balance) in balances {
        accounts
            .create_account(Account::new(id(account_id), Decimal::new(*balance, 0)))
            .unwrap();
    }
    let transfers = TransferService::new(store, Arc::new(SilentNotifier));
    (Arc::new(accounts), Arc::new(transfers))
}

/// Test: transfers forming a cycle A→B, B→C, C→A run concurrently.
///
/// Every thread locks a different pair, and each pair shares an account
/// with the next, so any inconsistency in lock order would deadlock here.
#[test]
fn test_cyclic_transfers_complete_without_deadlock() {
    let (accounts, transfers) = create_ledger(&[("A", 10_000), ("B", 10_000), ("C", 10_000)]);
    let total_before = accounts.total_balance().unwrap();

    let cycle = [("A", "B"), ("B", "C"), ("C", "A")];
    let barrier = Arc::new(Barrier::new(THREAD_COUNT));
    let success_count = Arc::new(AtomicUsize::new(0));

    let mut handles = vec![];

    for thread_id in 0..THREAD_COUNT {
        let barrier = Arc::clone(&barrier);
        let transfers = Arc::clone(&transfers);
        let success_count = Arc::clone(&success_count);
        let (from, to) = cycle[thread_id % cycle.len()];

        let handle = thread::spawn(move || {
            barrier.wait();
            let start = Instant::now();

            for _ in 0..ITERATIONS_PER_THREAD {
                transfers
                    .transfer(&id(from), &id(to), Decimal::ONE)
                    .unwrap();
                success_count.fetch_add(1, Ordering::SeqCst);
            }

            println!(
                "Thread {} ({} -> {}): {} transfers in {:?}",
                thread_id,
                from,
                to,
                ITERATIONS_PER_THREAD,
                start.elapsed()
            );
        });

        handles.push(handle);
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(
        success_count.load(Ordering::SeqCst),
        THREAD_COUNT * ITERATIONS_PER_THREAD
    );
    assert_eq!(accounts.total_balance().unwrap(), total_before);

    // Each edge of the cycle carries the same traffic, so every balance
    // ends where it started.
    for account_id in ["A", "B", "C"] {
        assert_eq!(
            accounts.get_account(&id(account_id)).unwrap().balance,
            Decimal::new(10_000, 0)
        );
    }
}

/// Test: opposite-direction transfers on one pair.
///
/// Both directions must apply exactly once each; a lost update would leave
/// the balances off by some multiple of the amounts.
#[test]
fn test_opposite_direction_transfers_apply_exactly_once() {
    let (accounts, transfers) = create_ledger(&[("X", 100_000), ("Y", 100_000)]);

    let barrier = Arc::new(Barrier::new(2));
    let directions = [("X", "Y", Decimal::new(3, 0)), ("Y", "X", Decimal::new(2, 0))];

    let handles: Vec<_> = directions
        .into_iter()
        .map(|(from, to, amount)| {
            let barrier = Arc::clone(&barrier);
            let transfers = Arc::clone(&transfers);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..ITERATIONS_PER_THREAD {
                    transfers.transfer(&id(from), &id(to), amount).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let net = Decimal::from(ITERATIONS_PER_THREAD);
    assert_eq!(
        accounts.get_account(&id("X")).unwrap().balance,
        Decimal::new(100_000, 0) - net
    );
    assert_eq!(
        accounts.get_account(&id("Y")).unwrap().balance,
        Decimal::new(100_000, 0) + net
    );
}

/// Test: many threads draining one account.
///
/// The funds check and the debit happen under the same lock, so the source
/// can never be overdrawn no matter how many threads race for it.
#[test]
fn test_concurrent_debits_never_overdraw() {
    let sinks: Vec<String> = (0..THREAD_COUNT).map(|i| format!("sink-{}", i)).collect();
    let mut balances: Vec<(&str, i64)> = vec![("source", 1_000)];
    balances.extend(sinks.iter().map(|s| (s.as_str(), 0)));
    let (accounts, transfers) = create_ledger(&balances);

    let barrier = Arc::new(Barrier::new(THREAD_COUNT));
    let success_count = Arc::new(AtomicUsize::new(0));
    let rejected_count = Arc::new(AtomicUsize::new(0));

    let mut handles = vec![];

    for sink in sinks.clone() {
        let barrier = Arc::clone(&barrier);
        let transfers = Arc::clone(&transfers);
        let success_count = Arc::clone(&success_count);
        let rejected_count = Arc::clone(&rejected_count);

        handles.push(thread::spawn(move || {
            barrier.wait();
            for _ in 0..ITERATIONS_PER_THREAD {
                match transfers.transfer(&id("source"), &id(&sink), Decimal::ONE) {
                    Ok(_) => {
                        success_count.fetch_add(1, Ordering::SeqCst);
                    }
                    Err(Error::InsufficientFunds { .. }) => {
                        rejected_count.fetch_add(1, Ordering::SeqCst);
                    }
                    Err(e) => panic!("unexpected error: {}", e),
                }
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    let successes = success_count.load(Ordering::SeqCst);
    let rejections = rejected_count.load(Ordering::SeqCst);
    println!("Successes: {}, rejected: {}", successes, rejections);

    assert_eq!(successes, 1_000);
    assert_eq!(successes + rejections, THREAD_COUNT * ITERATIONS_PER_THREAD);
    assert_eq!(
        accounts.get_account(&id("source")).unwrap().balance,
        Decimal::ZERO
    );
    assert_eq!(accounts.total_balance().unwrap(), Decimal::new(1_000, 0));
}

/// Test: readers and writers interleaved over a ring of accounts.
///
/// Readers only lock one account at a time; they must never block
/// transfers forever or observe a negative balance.
#[test]
fn test_reads_during_transfers() {
    let names: Vec<String> = (0..5).map(|i| format!("acct-{}", i)).collect();
    let balances: Vec<(&str, i64)> = names.iter().map(|n| (n.as_str(), 1_000)).collect();
    let (accounts, transfers) = create_ledger(&balances);

    let writer_count = 4;
    let reader_count = 2;
    let barrier = Arc::new(Barrier::new(writer_count + reader_count));

    let mut handles = vec![];

    for writer in 0..writer_count {
        let barrier = Arc::clone(&barrier);
        let transfers = Arc::clone(&transfers);
        let names = names.clone();
        handles.push(thread::spawn(move || {
            barrier.wait();
            for i in 0..ITERATIONS_PER_THREAD {
                let from = &names[(writer + i) % names.len()];
                let to = &names[(writer + i + 1) % names.len()];
                // Insufficient funds is fine here; only invariants matter
                let _ = transfers.transfer(&id(from), &id(to), Decimal::new(7, 0));
            }
        }));
    }

    for _ in 0..reader_count {
        let barrier = Arc::clone(&barrier);
        let accounts = Arc::clone(&accounts);
        handles.push(thread::spawn(move || {
            barrier.wait();
            for _ in 0..ITERATIONS_PER_THREAD {
                for account in accounts.list_accounts().unwrap() {
                    assert!(account.balance >= Decimal::ZERO);
                }
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(accounts.total_balance().unwrap(), Decimal::new(5_000, 0));
}
