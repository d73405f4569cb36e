//! Account CLI commands
//!
//! Implements CLI commands for account management.

use clap::Subcommand;

use crate::display::format_account_list;
use crate::error::JournalResult;
use crate::facade::Journal;
use crate::models::AccountDraft;

use super::resolve_account;

/// Account subcommands
#[derive(Subcommand)]
pub enum AccountCommands {
    /// Create a new account
    Create {
        /// Account name
        name: String,
        /// Broker or prop firm
        #[arg(short, long)]
        broker: Option<String>,
        /// Currency code
        #[arg(short, long)]
        currency: Option<String>,
        /// Starting balance
        #[arg(short = 'i', long, default_value = "0")]
        initial_balance: f64,
    },
    /// List accounts
    List {
        /// Include deleted accounts
        #[arg(short, long)]
        all: bool,
    },
    /// Delete an account (its trades are kept)
    Delete {
        /// Account name or ID
        account: String,
    },
}

/// Handle an account command
pub fn handle_account_command(journal: &Journal<'_>, cmd: AccountCommands) -> JournalResult<()> {
    match cmd {
        AccountCommands::Create {
            name,
            broker,
            currency,
            initial_balance,
        } => {
            let account = journal.create_account(AccountDraft {
                name,
                broker,
                currency: currency.map(|c| c.to_uppercase()),
                initial_balance,
            })?;

            println!("Created account: {}", account.name);
            if let Some(broker) = &account.broker {
                println!("  Broker: {}", broker);
            }
            println!("  Currency: {}", account.currency);
            println!("  Initial Balance: {:.2}", account.initial_balance);
            println!("  ID: {}", account.id);
        }

        AccountCommands::List { all } => {
            let accounts = journal.list_accounts(all)?;
            println!("{}", format_account_list(&accounts));
        }

        AccountCommands::Delete { account } => {
            let found = resolve_account(journal, &account)?;
            let deleted = journal.delete_account(found.id)?;
            println!("Deleted account: {}", deleted.name);
        }
    }

    Ok(())
}
