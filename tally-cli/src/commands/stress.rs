//! Stress command - concurrent ring transfers on a throwaway ledger
//!
//! Account `i` repeatedly pays account `i + 1` (the last pays the first), one
//! thread per account, so every lock pair is contended from both sides.
//! The ledger total must be unchanged afterwards.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};
use std::thread;
use std::time::Instant;

use anyhow::{anyhow, bail, Result};
use colored::Colorize;
use rust_decimal::Decimal;
use serde::Serialize;
use tally_core::adapters::{InMemoryAccountStore, SilentNotifier};
use tally_core::config::Config;
use tally_core::{Account, AccountId, Error, TallyContext};
use tracing::{info, warn};

use super::parse_amount;
use crate::output;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StressReport {
    accounts: usize,
    transfers_attempted: usize,
    transfers_completed: usize,
    transfers_rejected: usize,
    transfers_failed: usize,
    total_before: Decimal,
    total_after: Decimal,
    elapsed_ms: u128,
}

/// Tallies from one pass of ring transfers
#[derive(Debug, Default)]
struct RingOutcome {
    completed: usize,
    rejected: usize,
    failed: usize,
    first_failure: Option<String>,
}

impl StressReport {
    fn conserved(&self) -> bool {
        self.total_before == self.total_after
    }
}

pub fn run(threads: usize, iterations: usize, amount: &str, json: bool) -> Result<()> {
    if threads < 2 {
        bail!("A transfer ring needs at least 2 accounts, got {}", threads);
    }
    let amount = parse_amount(amount)?;
    if amount <= Decimal::ZERO {
        bail!("Amount must be positive, got {}", amount);
    }

    let ctx = TallyContext::with_components(
        Config::default(),
        Arc::new(InMemoryAccountStore::new()),
        Arc::new(SilentNotifier),
    );

    // Each account is debited at most `iterations` times
    let opening = amount.checked_mul(Decimal::from(iterations)).ok_or_else(|| {
        anyhow!(
            "Opening balance of {} x {} iterations is too large",
            amount,
            iterations
        )
    })?;
    let ids = (0..threads)
        .map(|i| AccountId::new(format!("stress-{:03}", i)))
        .collect::<Result<Vec<_>, _>>()?;
    for id in &ids {
        ctx.accounts_service.create_account(Account::new(id.clone(), opening))?;
    }

    let total_before = ctx.accounts_service.total_balance()?;

    info!(threads, iterations, %amount, "starting stress run");
    let started = Instant::now();
    let outcome = run_ring(&ctx, &ids, iterations, amount);
    let elapsed = started.elapsed();

    let report = StressReport {
        accounts: threads,
        transfers_attempted: threads.saturating_mul(iterations),
        transfers_completed: outcome.completed,
        transfers_rejected: outcome.rejected,
        transfers_failed: outcome.failed,
        total_before,
        total_after: ctx.accounts_service.total_balance()?,
        elapsed_ms: elapsed.as_millis(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if !report.conserved() {
        output::warning("Ledger total changed during the run");
        bail!(
            "Total balance drifted from {} to {}",
            report.total_before,
            report.total_after
        );
    }
    if let Some(first) = outcome.first_failure {
        bail!(
            "{} transfers failed unexpectedly, first error: {}",
            outcome.failed,
            first
        );
    }
    Ok(())
}

/// Account `i` pays account `i + 1` `iterations` times, one thread per account
///
/// Only `InsufficientFunds` counts as a rejection; any other error is a
/// failure of the run.
fn run_ring(
    ctx: &TallyContext,
    ids: &[AccountId],
    iterations: usize,
    amount: Decimal,
) -> RingOutcome {
    let completed = AtomicUsize::new(0);
    let rejected = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);
    let first_failure = Mutex::new(None);
    let barrier = Barrier::new(ids.len());

    thread::scope(|scope| {
        for (i, from) in ids.iter().enumerate() {
            let to = &ids[(i + 1) % ids.len()];
            let (completed, rejected, failed, first_failure, barrier) =
                (&completed, &rejected, &failed, &first_failure, &barrier);
            scope.spawn(move || {
                barrier.wait();
                for _ in 0..iterations {
                    match ctx.transfer_service.transfer(from, to, amount) {
                        Ok(_) => {
                            completed.fetch_add(1, Ordering::Relaxed);
                        }
                        Err(Error::InsufficientFunds { .. }) => {
                            rejected.fetch_add(1, Ordering::Relaxed);
                        }
                        Err(e) => {
                            warn!(error = %e, source = %from, destination = %to, "transfer failed");
                            failed.fetch_add(1, Ordering::Relaxed);
                            if let Ok(mut slot) = first_failure.lock() {
                                slot.get_or_insert_with(|| e.to_string());
                            }
                        }
                    }
                }
            });
        }
    });

    RingOutcome {
        completed: completed.into_inner(),
        rejected: rejected.into_inner(),
        failed: failed.into_inner(),
        first_failure: first_failure.into_inner().unwrap_or_default(),
    }
}

fn print_report(report: &StressReport) {
    let mut table = output::create_table();
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec!["Accounts".to_string(), report.accounts.to_string()]);
    table.add_row(vec![
        "Transfers attempted".to_string(),
        report.transfers_attempted.to_string(),
    ]);
    table.add_row(vec![
        "Transfers completed".to_string(),
        report.transfers_completed.to_string(),
    ]);
    table.add_row(vec![
        "Transfers rejected".to_string(),
        report.transfers_rejected.to_string(),
    ]);
    table.add_row(vec![
        "Transfers failed".to_string(),
        report.transfers_failed.to_string(),
    ]);
    table.add_row(vec!["Total before".to_string(), report.total_before.to_string()]);
    table.add_row(vec!["Total after".to_string(), report.total_after.to_string()]);
    table.add_row(vec!["Elapsed".to_string(), format!("{} ms", report.elapsed_ms)]);

    println!("{}", "Stress run".bold());
    println!("{}", table);
    if report.conserved() {
        output::success("Total balance conserved");
    }
}
