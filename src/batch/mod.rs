//! Batched writes for TradeJournal
//!
//! Domain services stage `Operation`s on a caller-owned `BatchCoordinator`,
//! which commits them as one unit and retries transient store failures.

pub mod coordinator;
pub mod error_log;
pub mod operation;
pub mod retry;

pub use coordinator::{BatchContext, BatchCoordinator, BatchState, CommitError, CommitReceipt};
pub use error_log::{ErrorLog, ErrorLogEntry};
pub use operation::{Operation, OperationKind};
pub use retry::{thread_sleeper, RetryPolicy, Sleeper, ThreadSleeper};
