//! Trade CLI commands
//!
//! Trades are addressed by account (name or ID) plus the trade ID, either in
//! full or by the short form shown in `trade list`.

use clap::Subcommand;

use crate::display::{format_trade_details, format_trade_list};
use crate::error::{JournalError, JournalResult};
use crate::facade::Journal;
use crate::models::{AccountId, Direction, SetupId, Trade, TradeDraft, TradeUpdate};

use super::setup::resolve_setup;
use super::{match_id, parse_datetime, resolve_account};

/// Trade subcommands
#[derive(Subcommand)]
pub enum TradeCommands {
    /// Record a new trade
    Add {
        /// Account name or ID
        account: String,
        /// Instrument, e.g. EURUSD
        symbol: String,
        /// long or short
        direction: String,
        /// Entry price
        entry_price: f64,
        /// Position size
        quantity: f64,
        /// Exit price for a closed trade
        #[arg(short = 'x', long)]
        exit: Option<f64>,
        /// Commission and fees
        #[arg(short, long, default_value = "0")]
        fees: f64,
        /// Net P&L, when it should not be derived from the prices
        #[arg(short, long, allow_hyphen_values = true)]
        pnl: Option<f64>,
        /// Setup name or ID
        #[arg(short, long)]
        setup: Option<String>,
        /// Free-form notes
        #[arg(short, long)]
        notes: Option<String>,
        /// Entry time (YYYY-MM-DD [HH:MM], UTC); defaults to now
        #[arg(long)]
        entry_time: Option<String>,
        /// Exit time (YYYY-MM-DD [HH:MM], UTC)
        #[arg(long)]
        exit_time: Option<String>,
    },
    /// List an account's trades, newest first
    List {
        /// Account name or ID
        account: String,
    },
    /// Show one trade
    Show {
        /// Account name or ID
        account: String,
        /// Trade ID
        trade: String,
    },
    /// Edit a trade
    Edit {
        /// Account name or ID
        account: String,
        /// Trade ID
        trade: String,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(short = 'x', long, conflicts_with = "reopen")]
        exit: Option<f64>,
        /// Clear the exit price, marking the trade open again
        #[arg(long)]
        reopen: bool,
        #[arg(short, long)]
        quantity: Option<f64>,
        #[arg(short, long)]
        fees: Option<f64>,
        #[arg(short, long, allow_hyphen_values = true)]
        pnl: Option<f64>,
        /// Setup name or ID
        #[arg(short, long, conflicts_with = "no_setup")]
        setup: Option<String>,
        /// Remove the trade's setup tag
        #[arg(long)]
        no_setup: bool,
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Move a trade to the recycle bin
    Delete {
        /// Account name or ID
        account: String,
        /// Trade ID
        trade: String,
    },
}

/// Handle a trade command
pub fn handle_trade_command(journal: &Journal<'_>, cmd: TradeCommands) -> JournalResult<()> {
    match cmd {
        TradeCommands::Add {
            account,
            symbol,
            direction,
            entry_price,
            quantity,
            exit,
            fees,
            pnl,
            setup,
            notes,
            entry_time,
            exit_time,
        } => {
            let account = resolve_account(journal, &account)?;
            let direction = Direction::parse(&direction).ok_or_else(|| {
                JournalError::Validation(format!(
                    "Invalid direction: '{}'. Use long or short",
                    direction
                ))
            })?;

            let mut draft = TradeDraft::new(symbol.to_uppercase(), direction, entry_price, quantity);
            draft.exit_price = exit;
            draft.fees = fees;
            draft.net_pnl = pnl;
            draft.setup_id = setup.map(|s| setup_id(journal, &s)).transpose()?;
            draft.notes = notes.unwrap_or_default();
            if let Some(at) = entry_time {
                draft.entry_time = parse_datetime(&at)?;
            }
            draft.exit_time = exit_time.map(|at| parse_datetime(&at)).transpose()?;

            let trade = journal.create_trade(account.id, draft)?;
            println!("Recorded trade in {}: {}", account.name, trade);
            println!("  Net P&L: {:.2}", trade.details.net_pnl);
            println!("  ID: {}", trade.id);
        }

        TradeCommands::List { account } => {
            let account = resolve_account(journal, &account)?;
            let trades = journal.list_trades(account.id, false)?;
            println!("Account: {}", account.name);
            println!();
            print!("{}", format_trade_list(&trades));
        }

        TradeCommands::Show { account, trade } => {
            let account = resolve_account(journal, &account)?;
            let trade = resolve_trade(journal, account.id, &trade)?;
            let setups = journal.list_setups(true)?;
            let setup_name = trade
                .details
                .setup_id
                .and_then(|id| setups.iter().find(|s| s.id == id))
                .map(|s| s.name.as_str());
            print!("{}", format_trade_details(&trade, setup_name));
        }

        TradeCommands::Edit {
            account,
            trade,
            symbol,
            exit,
            reopen,
            quantity,
            fees,
            pnl,
            setup,
            no_setup,
            notes,
        } => {
            let account = resolve_account(journal, &account)?;
            let trade = resolve_trade(journal, account.id, &trade)?;

            let update = TradeUpdate {
                symbol: symbol.map(|s| s.to_uppercase()),
                exit_price: if reopen { Some(None) } else { exit.map(Some) },
                quantity,
                fees,
                net_pnl: pnl,
                setup_id: if no_setup {
                    Some(None)
                } else {
                    setup.map(|s| setup_id(journal, &s)).transpose()?.map(Some)
                },
                notes,
                ..TradeUpdate::default()
            };
            if update.is_empty() {
                println!("No changes specified. Use --help to see editable fields.");
                return Ok(());
            }

            let updated = journal.update_trade(account.id, trade.id, &update)?;
            println!("Updated trade: {}", updated);
            println!("  Net P&L: {:.2}", updated.details.net_pnl);
        }

        TradeCommands::Delete { account, trade } => {
            let account = resolve_account(journal, &account)?;
            let trade = resolve_trade(journal, account.id, &trade)?;
            let deleted = journal.delete_trade(account.id, trade.id)?;
            println!("Moved trade to recycle bin: {}", trade);
            println!("  Recover with: tradejournal bin recover {}", deleted.id.short());
        }
    }

    Ok(())
}

fn resolve_trade(journal: &Journal<'_>, account_id: AccountId, input: &str) -> JournalResult<Trade> {
    let trades = journal.list_trades(account_id, false)?;
    match_id(&trades, input, |t| t.id, "Trade").cloned()
}

fn setup_id(journal: &Journal<'_>, input: &str) -> JournalResult<SetupId> {
    resolve_setup(journal, input).map(|s| s.id)
}
