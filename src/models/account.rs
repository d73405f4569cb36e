//! Account model
//!
//! A trading account owning trades. Accounts are soft-deleted in place
//! (`isDeleted` + `deletedAt`) and never moved.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::AccountId;
use super::timestamp_now;

/// A trading account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Unique identifier
    pub id: AccountId,

    /// Account name (e.g., "Demo")
    pub name: String,

    /// Broker or prop firm holding the account
    #[serde(default)]
    pub broker: Option<String>,

    /// Account currency code
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Balance the account was opened with
    #[serde(default)]
    pub initial_balance: f64,

    #[serde(default)]
    pub is_deleted: bool,

    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub deleted_at: Option<DateTime<Utc>>,

    /// Set when the account was recreated from a backup
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub restored_at: Option<DateTime<Utc>>,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

fn default_currency() -> String {
    "USD".to_string()
}

/// Input for creating an account
#[derive(Debug, Clone, Default)]
pub struct AccountDraft {
    pub name: String,
    pub broker: Option<String>,
    pub currency: Option<String>,
    pub initial_balance: f64,
}

impl AccountDraft {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Account {
    /// Create a new, live account from a draft
    pub fn new(draft: AccountDraft) -> Self {
        let now = timestamp_now();
        Self {
            id: AccountId::new(),
            name: draft.name.trim().to_string(),
            broker: draft.broker,
            currency: draft.currency.unwrap_or_else(default_currency),
            initial_balance: draft.initial_balance,
            is_deleted: false,
            deleted_at: None,
            restored_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Validate the account
    pub fn validate(&self) -> Result<(), AccountValidationError> {
        if self.name.trim().is_empty() {
            return Err(AccountValidationError::EmptyName);
        }

        if self.name.len() > 100 {
            return Err(AccountValidationError::NameTooLong(self.name.len()));
        }

        if !self.initial_balance.is_finite() {
            return Err(AccountValidationError::InvalidBalance);
        }

        Ok(())
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.currency)
    }
}

/// Validation errors for accounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    EmptyName,
    NameTooLong(usize),
    InvalidBalance,
}

impl fmt::Display for AccountValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Account name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Account name too long ({} chars, max 100)", len)
            }
            Self::InvalidBalance => write!(f, "Initial balance must be a finite number"),
        }
    }
}

impl std::error::Error for AccountValidationError {}
