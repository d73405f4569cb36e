//! Trade display formatting
//!
//! Register-style trade lists and a detail view for a single trade.

use crate::models::Trade;

use super::{format_pnl, truncate};

/// Format one trade as a register row
pub fn format_trade_row(trade: &Trade) -> String {
    let d = &trade.details;
    let exit = d
        .exit_price
        .map(|p| format!("{}", p))
        .unwrap_or_else(|| "open".to_string());

    format!(
        "{:<12}  {:<16}  {:<10}  {:<5}  {:>10}  {:>10}  {:>10}  {:>10}",
        trade.id.short(),
        d.entry_time.format("%Y-%m-%d %H:%M").to_string(),
        truncate(&d.symbol, 10),
        d.direction.to_string(),
        d.quantity,
        d.entry_price,
        exit,
        format_pnl(d.net_pnl),
    )
}

/// Format a list of trades with a net P&L total
pub fn format_trade_list(trades: &[Trade]) -> String {
    if trades.is_empty() {
        return "No trades found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12}  {:<16}  {:<10}  {:<5}  {:>10}  {:>10}  {:>10}  {:>10}\n",
        "ID", "Entry", "Symbol", "Side", "Qty", "Entry @", "Exit @", "Net P&L"
    ));
    output.push_str(&"-".repeat(102));
    output.push('\n');

    for trade in trades {
        output.push_str(&format_trade_row(trade));
        output.push('\n');
    }

    let total: f64 = trades.iter().map(|t| t.details.net_pnl).sum();
    output.push_str(&"-".repeat(102));
    output.push('\n');
    output.push_str(&format!(
        "{:<92}{:>10}\n",
        format!("{} trade(s)", trades.len()),
        format_pnl(total)
    ));

    output
}

/// Format a single trade's details
pub fn format_trade_details(trade: &Trade, setup_name: Option<&str>) -> String {
    let d = &trade.details;
    let mut output = String::new();

    output.push_str(&format!("Trade: {}\n", trade.id));
    output.push_str(&format!("  Symbol:      {}\n", d.symbol));
    output.push_str(&format!("  Direction:   {}\n", d.direction));
    output.push_str(&format!("  Quantity:    {}\n", d.quantity));
    output.push_str(&format!(
        "  Entry:       {} at {}\n",
        d.entry_price,
        d.entry_time.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    match (d.exit_price, d.exit_time) {
        (Some(price), Some(time)) => output.push_str(&format!(
            "  Exit:        {} at {}\n",
            price,
            time.format("%Y-%m-%d %H:%M:%S UTC")
        )),
        (Some(price), None) => output.push_str(&format!("  Exit:        {}\n", price)),
        _ => output.push_str("  Exit:        (open)\n"),
    }
    output.push_str(&format!("  Fees:        {:.2}\n", d.fees));
    output.push_str(&format!("  Gross P&L:   {}\n", format_pnl(d.gross_pnl)));
    output.push_str(&format!("  Net P&L:     {}\n", format_pnl(d.net_pnl)));

    if let Some(name) = setup_name {
        output.push_str(&format!("  Setup:       {}\n", name));
    }
    if !d.notes.is_empty() {
        output.push_str(&format!("  Notes:       {}\n", d.notes));
    }
    if let Some(at) = trade.recovered_at {
        output.push_str(&format!(
            "  Recovered:   {}\n",
            at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
    }

    output
}
