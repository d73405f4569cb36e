//! Backup CLI commands
//!
//! Implements CLI commands for snapshot backups kept in the document store.

use clap::Subcommand;

use crate::config::{JournalPaths, Settings};
use crate::display::backup::format_age;
use crate::display::format_backup_list;
use crate::error::{JournalError, JournalResult};
use crate::facade::Journal;
use crate::models::{timestamp_now, BackupSummary};

use super::match_id;

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Snapshot accounts, trades and setups
    Create,

    /// List all available backups
    List,

    /// Restore a backup as new copies next to the current data
    Restore {
        /// Backup ID (use 'latest' for most recent)
        backup: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Show when the last backup ran and whether one is due
    Status,
}

/// Handle a backup command
pub fn handle_backup_command(
    journal: &mut Journal<'_>,
    paths: &JournalPaths,
    settings: &mut Settings,
    cmd: BackupCommands,
) -> JournalResult<()> {
    match cmd {
        BackupCommands::Create => {
            println!("Creating backup...");
            let record = journal.create_backup()?;

            settings.last_backup_at = journal.last_backup_at();
            settings.save(paths)?;

            let summary = record.summary();
            println!("Backup created: {}", summary.id);
            println!(
                "  Accounts: {}  Trades: {}  Setups: {}",
                summary.accounts, summary.trades, summary.setups
            );
        }

        BackupCommands::List => {
            let backups = journal.get_backups()?;
            if backups.is_empty() {
                println!("No backups found.");
                println!("Create one with: tradejournal backup create");
                return Ok(());
            }
            print!("{}", format_backup_list(&backups, timestamp_now()));
        }

        BackupCommands::Restore { backup, force } => {
            let backups = journal.get_backups()?;
            let summary = resolve_backup(&backups, &backup)?;

            println!("Backup Information");
            println!("==================");
            println!("ID: {}", summary.id);
            println!(
                "Created: {}",
                summary.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
            );
            println!(
                "Contents: {} account(s), {} trade(s), {} setup(s)",
                summary.accounts, summary.trades, summary.setups
            );
            println!();

            if !force {
                println!("Restoring adds copies of these records next to your current data.");
                println!("To proceed, run again with --force flag:");
                println!("  tradejournal backup restore {} --force", backup);
                return Ok(());
            }

            println!("Restoring from backup...");
            let result = journal.restore_from_backup(summary.id)?;
            println!("Restore complete!");
            println!("{}", result.summary());
        }

        BackupCommands::Status => {
            let now = timestamp_now();
            match journal.last_backup_at() {
                Some(at) => println!(
                    "Last backup: {} ({} ago)",
                    at.format("%Y-%m-%d %H:%M:%S UTC"),
                    format_age(now.signed_duration_since(at))
                ),
                None => println!("Last backup: never"),
            }
            println!("Interval: {}h", settings.backup_interval_hours);
            if journal.should_create_backup() {
                println!("A backup is due. Run: tradejournal backup create");
            } else {
                println!("No backup due.");
            }
        }
    }

    Ok(())
}

fn resolve_backup(backups: &[BackupSummary], input: &str) -> JournalResult<BackupSummary> {
    if input.eq_ignore_ascii_case("latest") {
        return backups
            .first()
            .copied()
            .ok_or_else(|| JournalError::backup_not_found(input));
    }
    match_id(backups, input, |b| b.id, "Backup").copied()
}
