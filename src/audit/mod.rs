//! Audit trail for TradeJournal
//!
//! Every committed or failed journal action is appended to a line-delimited
//! JSON log (JSONL), one `AuditEntry` per line.
//!
//! ```rust,ignore
//! use tradejournal::audit::{AuditEntry, AuditLogger};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! logger.log(&AuditEntry::committed("createTrade", &operations))?;
//! for entry in logger.read_recent(20)? {
//!     println!("{}", entry.format_human_readable());
//! }
//! ```

mod entry;
mod logger;

pub use entry::{AuditEntry, Outcome};
pub use logger::AuditLogger;
