//! Output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, CellAlignment, ContentArrangement, Table};
use tally_core::Account;

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Table of accounts with right-aligned balances
pub fn accounts_table(accounts: &[Account]) -> Table {
    let mut table = create_table();
    table.set_header(vec!["Account", "Balance", "Updated"]);
    for account in accounts {
        table.add_row(vec![
            Cell::new(&account.account_id),
            Cell::new(account.balance).set_alignment(CellAlignment::Right),
            Cell::new(account.updated_at.format("%Y-%m-%d %H:%M:%S")),
        ]);
    }
    table
}
