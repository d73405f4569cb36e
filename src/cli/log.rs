//! Audit log CLI command

use crate::audit::AuditLogger;
use crate::error::JournalResult;

/// Print the most recent audit entries, oldest first
pub fn handle_log_command(logger: &AuditLogger, count: usize) -> JournalResult<()> {
    let entries = logger.read_recent(count)?;
    if entries.is_empty() {
        println!("No audit entries found.");
        return Ok(());
    }

    for entry in &entries {
        println!("{}", entry.format_human_readable());
    }
    println!();
    println!("Showing {} of {} entries", entries.len(), logger.entry_count()?);
    Ok(())
}
