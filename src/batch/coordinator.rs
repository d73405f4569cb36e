//! Batch coordinator
//!
//! Collects staged operations into one open batch context and commits them
//! as a unit, retrying transient store failures with exponential backoff.
//!
//! A coordinator is owned by its caller and holds at most one context. Calling
//! `start` while a context is still open throws the staged operations away
//! without writing them, so two logically concurrent flows must not share a
//! coordinator.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error, warn};

use super::error_log::ErrorLog;
use super::operation::Operation;
use super::retry::{thread_sleeper, RetryPolicy, Sleeper};
use crate::error::{JournalError, JournalResult};
use crate::store::{DocumentStore, StoreError};

/// Lifecycle of a batch context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Open,
    Committing,
    Committed,
    Failed,
}

/// Ordered operations waiting to be committed together
#[derive(Debug, Clone)]
pub struct BatchContext {
    operations: Vec<Operation>,
    state: BatchState,
}

impl BatchContext {
    fn open() -> Self {
        Self {
            operations: Vec::new(),
            state: BatchState::Open,
        }
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn state(&self) -> BatchState {
        self.state
    }
}

/// Outcome of a successful commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitReceipt {
    /// Operations written
    pub operations: usize,
    /// Retries spent before the commit went through
    pub retries: u32,
}

/// Why a commit did not go through
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommitError {
    #[error("no open batch to commit")]
    NoOpenBatch,

    #[error("gave up after {retries} retries: {cause}")]
    Exhausted { retries: u32, cause: StoreError },

    #[error("permanent failure on attempt {attempts}: {cause}")]
    Permanent { attempts: u32, cause: StoreError },
}

impl CommitError {
    /// Commit attempts made against the store
    pub fn attempts(&self) -> u32 {
        match self {
            Self::NoOpenBatch => 0,
            Self::Exhausted { retries, .. } => retries + 1,
            Self::Permanent { attempts, .. } => *attempts,
        }
    }

    /// Underlying store failure, if the store was reached
    pub fn cause(&self) -> Option<&StoreError> {
        match self {
            Self::NoOpenBatch => None,
            Self::Exhausted { cause, .. } | Self::Permanent { cause, .. } => Some(cause),
        }
    }

    /// Turn the failure into an error naming the operation it belonged to
    pub fn into_journal_error(self, operation: &'static str) -> JournalError {
        match self {
            Self::NoOpenBatch => JournalError::NoOpenBatch,
            other => JournalError::CommitFailed {
                operation,
                attempts: other.attempts(),
                cause: other
                    .cause()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
            },
        }
    }
}

/// Stages writes and commits them as one unit
pub struct BatchCoordinator<'s> {
    store: &'s dyn DocumentStore,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
    current: Option<BatchContext>,
    error_log: ErrorLog,
}

impl<'s> BatchCoordinator<'s> {
    /// Create a coordinator over `store`
    pub fn new(store: &'s dyn DocumentStore, policy: RetryPolicy, sleeper: Arc<dyn Sleeper>) -> Self {
        Self {
            store,
            policy,
            sleeper,
            current: None,
            error_log: ErrorLog::default(),
        }
    }

    /// Coordinator with the default policy that really sleeps between retries
    pub fn with_defaults(store: &'s dyn DocumentStore) -> Self {
        Self::new(store, RetryPolicy::default(), thread_sleeper())
    }

    /// Store the coordinator writes to (reads go here directly)
    pub fn store(&self) -> &'s dyn DocumentStore {
        self.store
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Open a new batch context, discarding any uncommitted one and the error log
    pub fn start(&mut self) {
        if let Some(previous) = self.current.take() {
            if previous.state == BatchState::Open && !previous.operations.is_empty() {
                warn!(
                    discarded = previous.operations.len(),
                    "starting a new batch discards staged operations"
                );
            }
        }
        self.error_log.clear();
        self.current = Some(BatchContext::open());
    }

    /// Whether a context is open for staging
    pub fn is_open(&self) -> bool {
        matches!(&self.current, Some(ctx) if ctx.state == BatchState::Open)
    }

    /// Current context, open or failed
    pub fn context(&self) -> Option<&BatchContext> {
        self.current.as_ref()
    }

    /// Operations staged on the open context
    pub fn staged(&self) -> &[Operation] {
        self.current
            .as_ref()
            .map(|ctx| ctx.operations.as_slice())
            .unwrap_or(&[])
    }

    /// Append an operation to the open context
    pub fn stage(&mut self, op: Operation) -> JournalResult<()> {
        match self.current.as_mut() {
            Some(ctx) if ctx.state == BatchState::Open => {
                debug!(operation = %op, "staged");
                ctx.operations.push(op);
                Ok(())
            }
            _ => Err(JournalError::NoOpenBatch),
        }
    }

    /// Append several operations to the open context
    pub fn stage_all(&mut self, ops: impl IntoIterator<Item = Operation>) -> JournalResult<()> {
        for op in ops {
            self.stage(op)?;
        }
        Ok(())
    }

    /// Commit the open context with the coordinator's retry policy
    pub fn commit(&mut self) -> Result<CommitReceipt, CommitError> {
        let max_retries = self.policy.max_retries;
        self.commit_with_retries(max_retries)
    }

    /// Commit the open context, retrying transient failures up to `max_retries` times
    ///
    /// On success the context is cleared. On failure it stays in the `Failed`
    /// state (nothing was written) and the failure is recorded in the error log.
    pub fn commit_with_retries(&mut self, max_retries: u32) -> Result<CommitReceipt, CommitError> {
        let mut ctx = match self.current.take() {
            Some(ctx) if ctx.state == BatchState::Open => ctx,
            other => {
                self.current = other;
                return Err(CommitError::NoOpenBatch);
            }
        };
        ctx.state = BatchState::Committing;

        if ctx.operations.is_empty() {
            debug!("committed empty batch");
            return Ok(CommitReceipt {
                operations: 0,
                retries: 0,
            });
        }

        let mut retry_count = 0;
        loop {
            let mut batch = self.store.begin_batch();
            for op in &ctx.operations {
                op.apply_to(batch.as_mut());
            }

            match batch.commit() {
                Ok(()) => {
                    ctx.state = BatchState::Committed;
                    debug!(
                        operations = ctx.operations.len(),
                        retries = retry_count,
                        "batch committed"
                    );
                    return Ok(CommitReceipt {
                        operations: ctx.operations.len(),
                        retries: retry_count,
                    });
                }
                Err(cause) if cause.is_transient() && retry_count < max_retries => {
                    let delay = self.policy.delay_for(retry_count);
                    warn!(
                        attempt = retry_count + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %cause,
                        "transient commit failure, retrying"
                    );
                    self.sleeper.sleep(delay);
                    retry_count += 1;
                }
                Err(cause) => {
                    let failure = if cause.is_transient() {
                        CommitError::Exhausted {
                            retries: retry_count,
                            cause,
                        }
                    } else {
                        CommitError::Permanent {
                            attempts: retry_count + 1,
                            cause,
                        }
                    };
                    error!(error = %failure, operations = ctx.operations.len(), "batch commit failed");
                    self.error_log.record("commit", &failure);
                    ctx.state = BatchState::Failed;
                    self.current = Some(ctx);
                    return Err(failure);
                }
            }
        }
    }

    /// Record a failure against the current batch's error log
    pub fn record_error(&mut self, operation: &str, error: &JournalError) {
        self.error_log.record(operation, error);
    }

    pub fn error_log(&self) -> &ErrorLog {
        &self.error_log
    }
}
