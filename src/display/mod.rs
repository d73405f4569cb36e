//! Display formatting for terminal output
//!
//! Plain-text tables and detail views for the CLI. Every formatter returns a
//! `String` so handlers decide where it goes.

pub mod account;
pub mod backup;
pub mod note;
pub mod recycle_bin;
pub mod setup;
pub mod trade;

pub use account::format_account_list;
pub use backup::format_backup_list;
pub use note::format_note_list;
pub use recycle_bin::format_deleted_trades;
pub use setup::format_setup_list;
pub use trade::{format_trade_details, format_trade_list};

/// Shorten `s` to at most `max` characters, marking the cut with "..."
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Signed amount with two decimals
pub(crate) fn format_pnl(value: f64) -> String {
    if value > 0.0 {
        format!("+{:.2}", value)
    } else {
        format!("{:.2}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("EURUSD", 10), "EURUSD");
        assert_eq!(truncate("A very long setup name", 10), "A very ...");
    }

    #[test]
    fn test_format_pnl() {
        assert_eq!(format_pnl(50.0), "+50.00");
        assert_eq!(format_pnl(-12.5), "-12.50");
        assert_eq!(format_pnl(0.0), "0.00");
    }
}
