//! Per-user sticky scratch notes.
//!
//! Sticky notes are private to their owner and fully independent of
//! tasks.

use super::{BoardDomainError, StickyNoteId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Free-form note pinned to a user's personal board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StickyNote {
    id: StickyNoteId,
    owner: UserId,
    content: String,
    color: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl StickyNote {
    /// Creates a new sticky note.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyNoteContent`] when the content is
    /// empty after trimming.
    pub fn new(
        owner: UserId,
        content: impl Into<String>,
        color: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Self, BoardDomainError> {
        let value = content.into();
        if value.trim().is_empty() {
            return Err(BoardDomainError::EmptyNoteContent);
        }
        let timestamp = clock.utc();
        Ok(Self {
            id: StickyNoteId::new(),
            owner,
            content: value,
            color: color.into(),
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Returns the note identifier.
    #[must_use]
    pub const fn id(&self) -> StickyNoteId {
        self.id
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn owner(&self) -> UserId {
        self.owner
    }

    /// Returns the note text.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the display color.
    #[must_use]
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last edit timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Rewrites the note content and bumps the edit timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyNoteContent`] when the content is
    /// empty after trimming.
    pub fn edit(
        &mut self,
        content: impl Into<String>,
        color: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), BoardDomainError> {
        let value = content.into();
        if value.trim().is_empty() {
            return Err(BoardDomainError::EmptyNoteContent);
        }
        self.content = value;
        self.color = color.into();
        self.updated_at = clock.utc();
        Ok(())
    }
}
