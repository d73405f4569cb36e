//! Recycle bin display formatting
//!
//! Shows each deleted trade with its account and how long it has left before
//! it falls out of the retention window.

use chrono::{DateTime, Duration, Utc};

use crate::recycle_bin::DeletedTradeListing;

use super::{format_pnl, truncate};

/// Format recycle-bin entries as a table
pub fn format_deleted_trades(
    listings: &[DeletedTradeListing],
    retention: Duration,
    now: DateTime<Utc>,
) -> String {
    if listings.is_empty() {
        return "Recycle bin is empty.".to_string();
    }

    let account_width = listings
        .iter()
        .map(|l| l.account_name.len())
        .max()
        .unwrap_or(7)
        .clamp(7, 24);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12}  {:<account_width$}  {:<10}  {:<5}  {:>10}  {:<16}  {}\n",
        "ID",
        "Account",
        "Symbol",
        "Side",
        "Net P&L",
        "Deleted",
        "Expires",
        account_width = account_width,
    ));
    output.push_str(&"-".repeat(80 + account_width));
    output.push('\n');

    for listing in listings {
        let trade = &listing.trade;
        output.push_str(&format!(
            "{:<12}  {:<account_width$}  {:<10}  {:<5}  {:>10}  {:<16}  {}\n",
            trade.id.short(),
            truncate(&listing.account_name, account_width),
            truncate(&trade.details.symbol, 10),
            trade.details.direction.to_string(),
            format_pnl(trade.details.net_pnl),
            trade.deleted_at.format("%Y-%m-%d %H:%M").to_string(),
            format_remaining(trade.deleted_at + retention - now),
            account_width = account_width,
        ));
    }

    output.push('\n');
    output.push_str(&format!("Total: {} deleted trade(s)\n", listings.len()));
    output
}

fn format_remaining(remaining: Duration) -> String {
    if remaining <= Duration::zero() {
        "expired".to_string()
    } else if remaining.num_days() > 0 {
        format!("in {}d", remaining.num_days())
    } else if remaining.num_hours() > 0 {
        format!("in {}h", remaining.num_hours())
    } else {
        format!("in {}m", remaining.num_minutes().max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountId, Direction, Trade, TradeDraft, UserId};

    fn listing(account_name: &str, deleted_at: DateTime<Utc>) -> DeletedTradeListing {
        let account_id = AccountId::new();
        let trade = Trade::new(account_id, TradeDraft::new("EURUSD", Direction::Short, 1.1, 1000.0));
        DeletedTradeListing {
            account_id,
            account_name: account_name.to_string(),
            trade: trade.into_deleted(UserId::new("u1"), deleted_at),
        }
    }

    #[test]
    fn test_format_deleted_trades() {
        let now = Utc::now();
        let output = format_deleted_trades(
            &[listing("Demo", now - Duration::days(2))],
            Duration::days(7),
            now,
        );
        assert!(output.contains("Demo"));
        assert!(output.contains("EURUSD"));
        assert!(output.contains("Short"));
        assert!(output.contains("in 5d") || output.contains("in 4d"));
        assert!(output.contains("Total: 1 deleted trade(s)"));
    }

    #[test]
    fn test_format_remaining() {
        assert_eq!(format_remaining(Duration::hours(-1)), "expired");
        assert_eq!(format_remaining(Duration::hours(30)), "in 1d");
        assert_eq!(format_remaining(Duration::minutes(90)), "in 1h");
        assert_eq!(format_remaining(Duration::seconds(20)), "in 1m");
    }

    #[test]
    fn test_format_empty_bin() {
        assert_eq!(
            format_deleted_trades(&[], Duration::days(7), Utc::now()),
            "Recycle bin is empty."
        );
    }
}
