//! Strongly-typed ID wrappers for all entity types
//!
//! Using newtype wrappers prevents accidentally mixing up IDs from different
//! entity types at compile time. Document IDs are random UUIDs; the user ID is
//! an opaque string handed over by whatever authenticated the caller.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Get the underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Parse an ID from a string
            pub fn parse(s: &str) -> Result<Self, uuid::Error> {
                s.parse()
            }

            /// Short, prefixed form for terminal output
            pub fn short(&self) -> String {
                format!("{}{}", $display_prefix, &self.0.to_string()[..8])
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        // The full UUID is what document paths are built from
        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

define_id!(AccountId, "acc-");
define_id!(TradeId, "trd-");
define_id!(DeletedTradeId, "del-");
define_id!(SetupId, "stp-");
define_id!(NoteId, "note-");
define_id!(JournalEntryId, "jrn-");
define_id!(BackupId, "bak-");

/// Identity of the authenticated user owning a document tree
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trade_id_creation() {
        let id = TradeId::new();
        assert!(!id.as_uuid().is_nil());
    }

    #[test]
    fn test_id_display_is_full_uuid() {
        let id = AccountId::new();
        assert_eq!(id.to_string(), id.as_uuid().to_string());
    }

    #[test]
    fn test_short_form() {
        let id = TradeId::new();
        let short = id.short();
        assert!(short.starts_with("trd-"));
        assert_eq!(short.len(), 12);
    }

    #[test]
    fn test_id_serialization() {
        let id = BackupId::new();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: BackupId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn test_id_parse_with_and_without_prefix() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        let plain = DeletedTradeId::parse(uuid_str).unwrap();
        let prefixed: DeletedTradeId = format!("del-{}", uuid_str).parse().unwrap();
        assert_eq!(plain, prefixed);
        assert_eq!(plain.to_string(), uuid_str);
    }

    #[test]
    fn test_user_id_is_opaque() {
        let user = UserId::new("uid-42");
        assert_eq!(user.as_str(), "uid-42");
        assert_eq!(serde_json::to_string(&user).unwrap(), "\"uid-42\"");
    }
}
