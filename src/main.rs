use anyhow::Result;
use clap::{Parser, Subcommand};

use tradejournal::audit::AuditLogger;
use tradejournal::backup::BackupManager;
use tradejournal::cli::{
    handle_account_command, handle_backup_command, handle_bin_command, handle_log_command,
    handle_note_command, handle_setup_command, handle_trade_command,
};
use tradejournal::config::{JournalPaths, Settings};
use tradejournal::logging::{init_logging, level_for_verbosity};
use tradejournal::session::Session;
use tradejournal::store::JsonFileStore;
use tradejournal::Journal;

#[derive(Parser)]
#[command(
    name = "tradejournal",
    version,
    about = "Trading journal with batched writes, a recycle bin and snapshot backups",
    long_about = "TradeJournal records trades per account, keeps deleted trades in a \
                  recycle bin for a retention window, and snapshots your data into \
                  restorable backups. Every change is committed as one atomic batch."
)]
struct Cli {
    /// User identity to act as (overrides the configured user)
    #[arg(long, global = true, env = "TRADEJOURNAL_USER")]
    user: Option<String>,

    /// Increase diagnostic output (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Account management commands
    #[command(subcommand)]
    Account(tradejournal::cli::AccountCommands),

    /// Trade management commands
    #[command(subcommand)]
    Trade(tradejournal::cli::TradeCommands),

    /// Setup (playbook) commands
    #[command(subcommand)]
    Setup(tradejournal::cli::SetupCommands),

    /// Recycle bin commands
    #[command(subcommand)]
    Bin(tradejournal::cli::BinCommands),

    /// Backup commands
    #[command(subcommand)]
    Backup(tradejournal::cli::BackupCommands),

    /// Note commands
    #[command(subcommand)]
    Note(tradejournal::cli::NoteCommands),

    /// Show recent audit log entries
    Log {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        count: usize,
    },

    /// Show current configuration and paths
    Config {
        /// Store this user identity as the default
        #[arg(long)]
        set_user: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(level_for_verbosity(cli.verbose));

    // Initialize paths and settings
    let paths = JournalPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;
    paths.ensure_directories()?;

    let store = JsonFileStore::open(paths.store_file())?;
    let session = Session::from_optional(cli.user.as_deref().or(settings.user_id.as_deref()));
    let audit = AuditLogger::new(paths.audit_log());

    let mut journal = Journal::new(&store, session)
        .with_retry_policy(settings.retry_policy())
        .with_retention(settings.retention_window())
        .with_backup_manager(BackupManager::new(
            settings.backup_interval(),
            settings.last_backup_at,
        ))
        .with_audit(audit.clone());

    match cli.command {
        Some(Commands::Account(cmd)) => handle_account_command(&journal, cmd)?,
        Some(Commands::Trade(cmd)) => handle_trade_command(&journal, cmd)?,
        Some(Commands::Setup(cmd)) => handle_setup_command(&journal, cmd)?,
        Some(Commands::Bin(cmd)) => {
            handle_bin_command(&journal, settings.retention_window(), cmd)?
        }
        Some(Commands::Backup(cmd)) => {
            handle_backup_command(&mut journal, &paths, &mut settings, cmd)?
        }
        Some(Commands::Note(cmd)) => handle_note_command(&journal, cmd)?,
        Some(Commands::Log { count }) => handle_log_command(&audit, count)?,
        Some(Commands::Config { set_user }) => {
            if let Some(user) = set_user {
                settings.user_id = Some(user);
                settings.save(&paths)?;
                println!("Default user saved.");
                println!();
            }

            println!("TradeJournal Configuration");
            println!("==========================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Store file:     {}", paths.store_file().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!(
                "  User:             {}",
                settings.user_id.as_deref().unwrap_or("(not set)")
            );
            println!("  Max retries:      {}", settings.retry.max_retries);
            println!("  Base retry delay: {}s", settings.retry.base_delay_secs);
            println!("  Retention:        {} day(s)", settings.retention_days);
            println!("  Backup interval:  {}h", settings.backup_interval_hours);
        }
        None => {
            println!("TradeJournal - trading journal with recycle bin and backups");
            println!();
            println!("Run 'tradejournal --help' for usage information.");
        }
    }

    Ok(())
}
