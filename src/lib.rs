//! TradeJournal - transactional storage for a trading journal
//!
//! This library keeps a trader's accounts, trades, setups, notes and journal
//! entries in a hierarchical JSON document store. Every user action is staged
//! into a batch and committed atomically with retry and exponential backoff.
//! Deleted trades go to a recycle bin for a retention window, and the whole
//! dataset can be snapshotted into backups and restored later.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `store`: Document store trait, structured paths, memory and JSON-file backends
//! - `batch`: Batch coordinator, retry policy and error log
//! - `services`: One repository per entity, staging writes on a caller's batch
//! - `recycle_bin`: Listing, recovering and purging deleted trades
//! - `backup`: Snapshot creation and restore
//! - `facade`: `Journal`, one method per user-facing action
//! - `audit`: Append-only trail of commit outcomes
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//!
//! # Example
//!
//! ```rust,ignore
//! use tradejournal::{Journal, MemoryStore, Session};
//! use tradejournal::models::{AccountDraft, Direction, TradeDraft};
//!
//! let store = MemoryStore::new();
//! let journal = Journal::new(&store, Session::authenticated("u1"));
//! let demo = journal.create_account(AccountDraft::named("Demo"))?;
//! journal.create_trade(demo.id, TradeDraft::new("EURUSD", Direction::Long, 1.1, 1000.0))?;
//! ```

pub mod audit;
pub mod backup;
pub mod batch;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod facade;
pub mod logging;
pub mod models;
pub mod recycle_bin;
pub mod services;
pub mod session;
pub mod store;

pub use batch::{BatchCoordinator, CommitError, RetryPolicy};
pub use error::{JournalError, JournalResult};
pub use facade::Journal;
pub use session::Session;
pub use store::{DocumentStore, JsonFileStore, MemoryStore};
