//! Identifier newtypes and validated scalar types for the board domain.
//!
//! These types wrap UUIDs to prevent accidental mixing of identifier
//! kinds across the board's embedded collections.

use super::BoardDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! board_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID value.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl AsRef<Uuid> for $name {
            fn as_ref(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

board_id! {
    /// Unique identifier for a board user.
    UserId
}

board_id! {
    /// Unique identifier for a task record.
    TaskId
}

board_id! {
    /// Unique identifier for a comment embedded in a task.
    CommentId
}

board_id! {
    /// Unique identifier for a task history entry.
    HistoryEntryId
}

board_id! {
    /// Unique identifier for a notification record.
    NotificationId
}

board_id! {
    /// Unique identifier for a sticky note.
    StickyNoteId
}

/// Normalised email address.
///
/// Addresses are trimmed and lowercased on construction; the local part
/// and domain must both be non-empty around a single `@`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::InvalidEmail`] when the value does not
    /// contain exactly one `@` with non-empty local and domain parts.
    pub fn new(value: impl Into<String>) -> Result<Self, BoardDomainError> {
        let raw = value.into();
        let normalized = raw.trim().to_ascii_lowercase();
        let mut segments = normalized.split('@');
        let local = segments.next().unwrap_or_default();
        let domain = segments.next().unwrap_or_default();
        let has_more_segments = segments.next().is_some();
        let is_valid = !local.is_empty()
            && !domain.is_empty()
            && !has_more_segments
            && !normalized.chars().any(char::is_whitespace);

        if !is_valid {
            return Err(BoardDomainError::InvalidEmail(raw));
        }

        Ok(Self(normalized))
    }

    /// Returns the address as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
