//! Tally CLI - an in-memory ledger in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod logging;
mod output;

use commands::{accounts, open, shell, stress, transfer};

/// Tally - in-memory account ledger
#[derive(Parser)]
#[command(name = "tally", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add an opening account to settings.json
    Open {
        /// Account ID
        account_id: String,
        /// Opening balance
        balance: String,
    },

    /// List accounts and balances
    Accounts {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single account
    Account {
        /// Account ID
        account_id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Transfer money between two accounts
    Transfer {
        /// Account to debit
        from: String,
        /// Account to credit
        to: String,
        /// Amount to transfer
        amount: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Interactive session on a single ledger
    Shell,

    /// Run concurrent ring transfers and check the ledger total
    Stress {
        /// Number of accounts in the ring (one thread per account)
        #[arg(long, default_value = "8")]
        threads: usize,
        /// Transfers per thread
        #[arg(long, default_value = "1000")]
        iterations: usize,
        /// Amount moved by each transfer
        #[arg(long, default_value = "1")]
        amount: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    logging::init();

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Open { account_id, balance } => open::run(&account_id, &balance),
        Commands::Accounts { json } => accounts::run_list(json),
        Commands::Account { account_id, json } => accounts::run_show(&account_id, json),
        Commands::Transfer { from, to, amount, json } => transfer::run(&from, &to, &amount, json),
        Commands::Shell => shell::run(),
        Commands::Stress { threads, iterations, amount, json } => {
            stress::run(threads, iterations, &amount, json)
        }
    }
}
