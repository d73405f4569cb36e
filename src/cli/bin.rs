//! Recycle bin CLI commands
//!
//! Entries are addressed by the recycle-bin ID shown in `bin list`.

use clap::Subcommand;

use crate::display::format_deleted_trades;
use crate::error::JournalResult;
use crate::facade::Journal;
use crate::models::timestamp_now;
use crate::recycle_bin::DeletedTradeListing;

use super::match_id;

/// Recycle bin subcommands
#[derive(Subcommand)]
pub enum BinCommands {
    /// List recently deleted trades across all accounts
    List,
    /// Put a deleted trade back in its account
    Recover {
        /// Recycle-bin entry ID
        entry: String,
    },
    /// Permanently delete an entry
    Purge {
        /// Recycle-bin entry ID
        entry: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a recycle bin command
pub fn handle_bin_command(
    journal: &Journal<'_>,
    retention: chrono::Duration,
    cmd: BinCommands,
) -> JournalResult<()> {
    match cmd {
        BinCommands::List => {
            let listings = journal.list_deleted_trades()?;
            println!("{}", format_deleted_trades(&listings, retention, timestamp_now()));
        }

        BinCommands::Recover { entry } => {
            let listing = resolve_entry(journal, &entry)?;
            let trade = journal.recover_trade(listing.account_id, listing.trade.id)?;
            println!("Recovered trade into {}: {}", listing.account_name, trade);
            println!("  ID: {}", trade.id);
        }

        BinCommands::Purge { entry, force } => {
            let listing = resolve_entry(journal, &entry)?;
            if !force {
                println!(
                    "WARNING: This permanently deletes {} {} from {}.",
                    listing.trade.details.direction, listing.trade.details.symbol, listing.account_name
                );
                println!("To proceed, run again with --force flag:");
                println!("  tradejournal bin purge {} --force", entry);
                return Ok(());
            }

            journal.purge_trade(listing.account_id, listing.trade.id)?;
            println!("Purged {} from the recycle bin.", listing.trade.id.short());
        }
    }

    Ok(())
}

fn resolve_entry(journal: &Journal<'_>, input: &str) -> JournalResult<DeletedTradeListing> {
    let listings = journal.list_deleted_trades()?;
    match_id(&listings, input, |l| l.trade.id, "Deleted trade").cloned()
}
