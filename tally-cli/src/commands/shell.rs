//! Shell command - line-oriented session on one in-memory ledger
//!
//! Each `tally` invocation starts from the opening accounts in
//! settings.json and forgets everything on exit. The shell keeps one ledger
//! alive for as many commands as you type (or pipe in).

use std::io::{self, BufRead, Write};

use anyhow::{bail, Result};
use rust_decimal::Decimal;
use tally_core::{Account, AccountId, TallyContext};

use super::transfer::print_receipt;
use super::{get_context, parse_account_id, parse_amount};
use crate::output;

const HELP: &str = "\
Commands:
  create <id> <balance>          open a new account
  get <id>                       show one account
  list                           show all accounts
  transfer <from> <to> <amount>  move money between accounts
  total                          sum of all balances
  help                           show this message
  quit                           leave the shell";

#[derive(Debug, PartialEq)]
enum ShellCommand {
    Create { account_id: AccountId, balance: Decimal },
    Get { account_id: AccountId },
    List,
    Transfer { from: AccountId, to: AccountId, amount: Decimal },
    Total,
    Help,
    Quit,
}

impl ShellCommand {
    /// Parse one input line; blank lines and `#` comments yield `None`
    fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let words: Vec<&str> = line.split_whitespace().collect();
        let command = match words.as_slice() {
            ["create", id, balance] => ShellCommand::Create {
                account_id: parse_account_id(id)?,
                balance: parse_amount(balance)?,
            },
            ["get", id] => ShellCommand::Get {
                account_id: parse_account_id(id)?,
            },
            ["list"] => ShellCommand::List,
            ["transfer", from, to, amount] => ShellCommand::Transfer {
                from: parse_account_id(from)?,
                to: parse_account_id(to)?,
                amount: parse_amount(amount)?,
            },
            ["total"] => ShellCommand::Total,
            ["help"] | ["?"] => ShellCommand::Help,
            ["quit"] | ["exit"] => ShellCommand::Quit,
            [name, ..] => bail!("Unknown or malformed command: {} (try `help`)", name),
            [] => return Ok(None),
        };
        Ok(Some(command))
    }
}

pub fn run() -> Result<()> {
    let ctx = get_context()?;
    let interactive = atty::is(atty::Stream::Stdin);

    if interactive {
        output::info("Tally shell. Type `help` for commands.");
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        if interactive {
            print!("tally> ");
            io::stdout().flush()?;
        }

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;

        let command = match ShellCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                output::error(&e.to_string());
                continue;
            }
        };

        if command == ShellCommand::Quit {
            break;
        }

        if let Err(e) = execute(&ctx, command) {
            output::error(&e.to_string());
        }
    }

    Ok(())
}

fn execute(ctx: &TallyContext, command: ShellCommand) -> Result<()> {
    match command {
        ShellCommand::Create { account_id, balance } => {
            let account = ctx
                .accounts_service
                .create_account(Account::new(account_id, balance))?;
            output::success(&format!(
                "Created account {} with balance {}",
                account.account_id, account.balance
            ));
        }
        ShellCommand::Get { account_id } => {
            let account = ctx.accounts_service.get_account(&account_id)?;
            println!("{}", output::accounts_table(std::slice::from_ref(&account)));
        }
        ShellCommand::List => {
            let accounts = ctx.accounts_service.list_accounts()?;
            if accounts.is_empty() {
                output::warning("No accounts yet.");
            } else {
                println!("{}", output::accounts_table(&accounts));
            }
        }
        ShellCommand::Transfer { from, to, amount } => {
            let receipt = ctx.transfer_service.transfer(&from, &to, amount)?;
            print_receipt(&receipt);
        }
        ShellCommand::Total => {
            println!("{}", ctx.accounts_service.total_balance()?);
        }
        ShellCommand::Help => println!("{}", HELP),
        ShellCommand::Quit => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> AccountId {
        AccountId::new(s).unwrap()
    }

    #[test]
    fn test_parse_transfer() {
        let command = ShellCommand::parse("transfer A1 A2 100.50").unwrap().unwrap();
        assert_eq!(
            command,
            ShellCommand::Transfer {
                from: id("A1"),
                to: id("A2"),
                amount: Decimal::new(10050, 2),
            }
        );
    }

    #[test]
    fn test_parse_create_and_simple_commands() {
        assert_eq!(
            ShellCommand::parse("  create Id-1  500 ").unwrap().unwrap(),
            ShellCommand::Create {
                account_id: id("Id-1"),
                balance: Decimal::new(500, 0),
            }
        );
        assert_eq!(ShellCommand::parse("list").unwrap(), Some(ShellCommand::List));
        assert_eq!(ShellCommand::parse("exit").unwrap(), Some(ShellCommand::Quit));
        assert_eq!(ShellCommand::parse("?").unwrap(), Some(ShellCommand::Help));
    }

    #[test]
    fn test_parse_skips_blank_and_comments() {
        assert_eq!(ShellCommand::parse("").unwrap(), None);
        assert_eq!(ShellCommand::parse("   ").unwrap(), None);
        assert_eq!(ShellCommand::parse("# seed accounts").unwrap(), None);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(ShellCommand::parse("transfer A1 A2").is_err());
        assert!(ShellCommand::parse("transfer A1 A2 lots").is_err());
        assert!(ShellCommand::parse("withdraw A1 5").is_err());
    }
}
