//! Caller identity
//!
//! Every user-scoped operation runs against a `Session`. How the identity was
//! obtained is outside this crate; an anonymous session makes every
//! user-scoped call fail with `Unauthenticated` before the store is touched.

use crate::error::{JournalError, JournalResult};
use crate::models::UserId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user_id: Option<UserId>,
}

impl Session {
    pub fn authenticated(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(UserId::new(user_id)),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Build a session from an optional configured identity; blank IDs count as absent
    pub fn from_optional(user_id: Option<&str>) -> Self {
        match user_id.map(str::trim) {
            Some(id) if !id.is_empty() => Self::authenticated(id),
            _ => Self::anonymous(),
        }
    }

    pub fn user_id(&self) -> Option<&UserId> {
        self.user_id.as_ref()
    }

    /// The user identity, or `Unauthenticated`
    pub fn require_user(&self) -> JournalResult<&UserId> {
        self.user_id.as_ref().ok_or(JournalError::Unauthenticated)
    }
}
