//! Trade model
//!
//! A trade lives under its account's `trades` collection while active. When
//! soft-deleted it is moved, field for field, into the account's
//! `deletedTrades` collection as a `DeletedTrade` and the original document
//! is removed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AccountId, DeletedTradeId, SetupId, TradeId, UserId};
use super::timestamp_now;

/// Side of a trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Long,
    Short,
}

impl Direction {
    /// Parse direction from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "long" | "buy" => Some(Self::Long),
            "short" | "sell" => Some(Self::Short),
            _ => None,
        }
    }

    fn sign(&self) -> f64 {
        match self {
            Self::Long => 1.0,
            Self::Short => -1.0,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Long => write!(f, "Long"),
            Self::Short => write!(f, "Short"),
        }
    }
}

/// Fields a trade keeps whether it is live or in the recycle bin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeDetails {
    /// Owning account
    pub account_id: AccountId,

    /// Instrument (e.g., "EURUSD")
    pub symbol: String,

    pub direction: Direction,

    pub entry_price: f64,

    #[serde(default)]
    pub exit_price: Option<f64>,

    /// Position size in units/lots
    pub quantity: f64,

    #[serde(default)]
    pub fees: f64,

    #[serde(default, rename = "grossPnL")]
    pub gross_pnl: f64,

    #[serde(default, rename = "netPnL")]
    pub net_pnl: f64,

    #[serde(default)]
    pub setup_id: Option<SetupId>,

    #[serde(default)]
    pub notes: String,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub entry_time: DateTime<Utc>,

    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub exit_time: Option<DateTime<Utc>>,

    /// Set when the trade was recreated from a backup
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub restored_at: Option<DateTime<Utc>>,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

/// A live trade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: TradeId,

    #[serde(flatten)]
    pub details: TradeDetails,

    #[serde(default)]
    pub is_deleted: bool,

    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub deleted_at: Option<DateTime<Utc>>,

    /// Set when the trade was brought back from the recycle bin
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub recovered_at: Option<DateTime<Utc>>,
}

/// Input for creating a trade
#[derive(Debug, Clone)]
pub struct TradeDraft {
    pub symbol: String,
    pub direction: Direction,
    pub entry_price: f64,
    pub exit_price: Option<f64>,
    pub quantity: f64,
    pub fees: f64,
    /// Explicit P&L; derived from prices when absent
    pub net_pnl: Option<f64>,
    pub setup_id: Option<SetupId>,
    pub notes: String,
    pub entry_time: DateTime<Utc>,
    pub exit_time: Option<DateTime<Utc>>,
}

impl TradeDraft {
    pub fn new(symbol: impl Into<String>, direction: Direction, entry_price: f64, quantity: f64) -> Self {
        Self {
            symbol: symbol.into(),
            direction,
            entry_price,
            exit_price: None,
            quantity,
            fees: 0.0,
            net_pnl: None,
            setup_id: None,
            notes: String::new(),
            entry_time: timestamp_now(),
            exit_time: None,
        }
    }
}

/// Partial update of a trade; `None` leaves a field untouched
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_price: Option<f64>,
    /// `Some(None)` reopens the trade
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_price: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fees: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "netPnL")]
    pub net_pnl: Option<f64>,
    /// `Some(None)` untags the setup
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setup_id: Option<Option<SetupId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl TradeUpdate {
    pub fn is_empty(&self) -> bool {
        self.symbol.is_none()
            && self.direction.is_none()
            && self.entry_price.is_none()
            && self.exit_price.is_none()
            && self.quantity.is_none()
            && self.fees.is_none()
            && self.net_pnl.is_none()
            && self.setup_id.is_none()
            && self.notes.is_none()
    }

    /// Whether the update touches an input of the derived P&L
    fn moves_pnl(&self) -> bool {
        self.direction.is_some()
            || self.entry_price.is_some()
            || self.exit_price.is_some()
            || self.quantity.is_some()
            || self.fees.is_some()
    }
}

impl Trade {
    /// Create a new, live trade in `account_id`
    pub fn new(account_id: AccountId, draft: TradeDraft) -> Self {
        let now = timestamp_now();
        let gross_pnl = gross_pnl(draft.direction, draft.entry_price, draft.exit_price, draft.quantity);
        let net_pnl = draft.net_pnl.unwrap_or(gross_pnl - draft.fees);
        Self {
            id: TradeId::new(),
            details: TradeDetails {
                account_id,
                symbol: draft.symbol.trim().to_uppercase(),
                direction: draft.direction,
                entry_price: draft.entry_price,
                exit_price: draft.exit_price,
                quantity: draft.quantity,
                fees: draft.fees,
                gross_pnl,
                net_pnl,
                setup_id: draft.setup_id,
                notes: draft.notes,
                entry_time: draft.entry_time,
                exit_time: draft.exit_time,
                restored_at: None,
                created_at: now,
                updated_at: now,
            },
            is_deleted: false,
            deleted_at: None,
            recovered_at: None,
        }
    }

    /// Apply a partial update
    ///
    /// P&L is recomputed from prices only when a price, size, side or fee
    /// changed; an explicit `net_pnl` always wins. Untouched P&L, including
    /// one entered by hand, is left as it was. Reopening a trade also clears
    /// its exit time.
    pub fn apply(&mut self, update: &TradeUpdate) {
        let d = &mut self.details;
        if let Some(symbol) = &update.symbol {
            d.symbol = symbol.trim().to_uppercase();
        }
        if let Some(direction) = update.direction {
            d.direction = direction;
        }
        if let Some(price) = update.entry_price {
            d.entry_price = price;
        }
        if let Some(exit) = update.exit_price {
            d.exit_price = exit;
            if exit.is_none() {
                d.exit_time = None;
            }
        }
        if let Some(quantity) = update.quantity {
            d.quantity = quantity;
        }
        if let Some(fees) = update.fees {
            d.fees = fees;
        }
        if let Some(setup_id) = update.setup_id {
            d.setup_id = setup_id;
        }
        if let Some(notes) = &update.notes {
            d.notes = notes.clone();
        }
        if update.moves_pnl() {
            d.gross_pnl = gross_pnl(d.direction, d.entry_price, d.exit_price, d.quantity);
            d.net_pnl = d.gross_pnl - d.fees;
        }
        if let Some(net_pnl) = update.net_pnl {
            d.net_pnl = net_pnl;
        }
        d.updated_at = timestamp_now();
    }

    /// Move this trade into the recycle bin
    pub fn into_deleted(self, deleted_by: UserId, deleted_at: DateTime<Utc>) -> DeletedTrade {
        DeletedTrade {
            id: DeletedTradeId::new(),
            original_id: self.id,
            details: self.details,
            is_deleted: true,
            deleted_at,
            deleted_by,
        }
    }

    /// Validate the trade
    pub fn validate(&self) -> Result<(), TradeValidationError> {
        let d = &self.details;
        if d.symbol.is_empty() {
            return Err(TradeValidationError::EmptySymbol);
        }
        if !d.entry_price.is_finite() || d.entry_price <= 0.0 {
            return Err(TradeValidationError::InvalidPrice(d.entry_price));
        }
        if let Some(exit) = d.exit_price {
            if !exit.is_finite() || exit <= 0.0 {
                return Err(TradeValidationError::InvalidPrice(exit));
            }
        }
        if !d.quantity.is_finite() || d.quantity <= 0.0 {
            return Err(TradeValidationError::InvalidQuantity(d.quantity));
        }
        if let Some(exit_time) = d.exit_time {
            if exit_time < d.entry_time {
                return Err(TradeValidationError::ExitBeforeEntry);
            }
        }
        Ok(())
    }
}

fn gross_pnl(direction: Direction, entry: f64, exit: Option<f64>, quantity: f64) -> f64 {
    exit.map_or(0.0, |exit| (exit - entry) * quantity * direction.sign())
}

impl fmt::Display for Trade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} x{} @ {}",
            self.details.direction, self.details.symbol, self.details.quantity, self.details.entry_price
        )
    }
}

/// A trade sitting in the recycle bin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedTrade {
    pub id: DeletedTradeId,

    /// ID the trade had (and will get back) as a live trade
    pub original_id: TradeId,

    #[serde(flatten)]
    pub details: TradeDetails,

    #[serde(default = "deleted_flag")]
    pub is_deleted: bool,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub deleted_at: DateTime<Utc>,

    pub deleted_by: UserId,
}

fn deleted_flag() -> bool {
    true
}

impl DeletedTrade {
    /// Rebuild the live trade at its original ID
    pub fn recover(self, recovered_at: DateTime<Utc>) -> Trade {
        Trade {
            id: self.original_id,
            details: self.details,
            is_deleted: false,
            deleted_at: None,
            recovered_at: Some(recovered_at),
        }
    }
}

/// Validation errors for trades
#[derive(Debug, Clone, PartialEq)]
pub enum TradeValidationError {
    EmptySymbol,
    InvalidPrice(f64),
    InvalidQuantity(f64),
    ExitBeforeEntry,
}

impl fmt::Display for TradeValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySymbol => write!(f, "Trade symbol cannot be empty"),
            Self::InvalidPrice(p) => write!(f, "Invalid price: {}", p),
            Self::InvalidQuantity(q) => write!(f, "Invalid quantity: {}", q),
            Self::ExitBeforeEntry => write!(f, "Exit time is before entry time"),
        }
    }
}

impl std::error::Error for TradeValidationError {}
