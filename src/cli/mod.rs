//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the journal facade.

pub mod account;
pub mod backup;
pub mod bin;
pub mod log;
pub mod note;
pub mod setup;
pub mod trade;

pub use account::{handle_account_command, AccountCommands};
pub use backup::{handle_backup_command, BackupCommands};
pub use bin::{handle_bin_command, BinCommands};
pub use log::handle_log_command;
pub use note::{handle_note_command, NoteCommands};
pub use setup::{handle_setup_command, SetupCommands};
pub use trade::{handle_trade_command, TradeCommands};

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::error::{JournalError, JournalResult};
use crate::facade::Journal;
use crate::models::Account;

/// Prefixes of the short ID forms printed in tables
const ID_PREFIXES: [&str; 7] = ["acc-", "trd-", "del-", "stp-", "note-", "jrn-", "bak-"];

/// Shortest ID prefix accepted on the command line
const MIN_ID_PREFIX: usize = 4;

fn strip_id_prefix(input: &str) -> &str {
    ID_PREFIXES
        .iter()
        .find_map(|prefix| input.strip_prefix(prefix))
        .unwrap_or(input)
}

/// Pick the one item whose ID starts with `input`
///
/// Accepts a full UUID, a short form as printed in tables ("trd-1a2b3c4d"),
/// or any unambiguous leading part of the UUID.
pub(crate) fn match_id<'a, T, I: ToString>(
    items: &'a [T],
    input: &str,
    id_of: impl Fn(&T) -> I,
    entity_type: &'static str,
) -> JournalResult<&'a T> {
    let needle = strip_id_prefix(input.trim()).to_lowercase();
    if needle.len() < MIN_ID_PREFIX {
        return Err(JournalError::Validation(format!(
            "'{}' is too short to identify a {}; use at least {} characters of the ID",
            input,
            entity_type.to_lowercase(),
            MIN_ID_PREFIX
        )));
    }

    let mut matches = items
        .iter()
        .filter(|item| id_of(*item).to_string().starts_with(&needle));
    match (matches.next(), matches.next()) {
        (Some(item), None) => Ok(item),
        (Some(_), Some(_)) => Err(JournalError::Validation(format!(
            "'{}' matches more than one {}",
            input,
            entity_type.to_lowercase()
        ))),
        (None, _) => Err(JournalError::NotFound {
            entity_type,
            identifier: input.to_string(),
        }),
    }
}

/// Find a live account by name, full ID or short ID
pub(crate) fn resolve_account(journal: &Journal<'_>, identifier: &str) -> JournalResult<Account> {
    if let Some(account) = journal.find_account(identifier)? {
        return Ok(account);
    }
    let accounts = journal.list_accounts(false)?;
    match_id(&accounts, identifier, |a| a.id, "Account")
        .cloned()
        .map_err(|err| match err {
            JournalError::Validation(_) | JournalError::NotFound { .. } => {
                JournalError::account_not_found(identifier)
            }
            other => other,
        })
}

/// Parse a timestamp given as RFC 3339, "YYYY-MM-DD HH:MM" or "YYYY-MM-DD" (UTC)
pub(crate) fn parse_datetime(input: &str) -> JournalResult<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(input) {
        return Ok(at.with_timezone(&Utc));
    }
    if let Ok(at) = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M") {
        return Ok(Utc.from_utc_datetime(&at));
    }
    if let Ok(day) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        if let Some(at) = day.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&at));
        }
    }
    Err(JournalError::Validation(format!(
        "Invalid date/time: '{}'. Use YYYY-MM-DD, 'YYYY-MM-DD HH:MM' or RFC 3339",
        input
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TradeId;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_match_id_by_short_and_full_form() {
        let ids = vec![TradeId::new(), TradeId::new()];

        let full = ids[0].to_string();
        assert_eq!(*match_id(&ids, &full, |id| *id, "Trade").unwrap(), ids[0]);

        let short = ids[1].short();
        assert_eq!(*match_id(&ids, &short, |id| *id, "Trade").unwrap(), ids[1]);
    }

    #[test]
    fn test_match_id_rejects_short_or_unknown_input() {
        let ids = vec![TradeId::new()];
        assert!(matches!(
            match_id(&ids, "trd-ab", |id| *id, "Trade"),
            Err(JournalError::Validation(_))
        ));
        assert!(match_id(&ids, "zzzzzzzz", |id| *id, "Trade")
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_parse_datetime_forms() {
        let at = parse_datetime("2026-10-16 14:30").unwrap();
        assert_eq!((at.day(), at.hour(), at.minute()), (16, 14, 30));

        let day = parse_datetime("2026-10-16").unwrap();
        assert_eq!(day.hour(), 0);

        let rfc = parse_datetime("2026-10-16T14:30:00+02:00").unwrap();
        assert_eq!(rfc.hour(), 12);

        assert!(parse_datetime("yesterday").is_err());
    }
}
