//! Task comments with user mentions.

use super::{BoardDomainError, CommentId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Comment embedded in a task.
///
/// Comments are append-only: once added to a task they are never edited
/// or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskComment {
    id: CommentId,
    author: UserId,
    content: String,
    tagged_users: Vec<UserId>,
    created_at: DateTime<Utc>,
}

impl TaskComment {
    /// Creates a new comment stamped with the current clock time.
    ///
    /// Tagged users are deduplicated and the author is dropped from the
    /// tag list (self-mentions never notify).
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyCommentContent`] when the content
    /// is empty after trimming.
    pub fn new(
        author: UserId,
        content: impl Into<String>,
        tagged_users: Vec<UserId>,
        clock: &impl Clock,
    ) -> Result<Self, BoardDomainError> {
        let value = content.into();
        if value.trim().is_empty() {
            return Err(BoardDomainError::EmptyCommentContent);
        }

        let mut tags: Vec<UserId> = Vec::new();
        for user in tagged_users {
            if user != author && !tags.contains(&user) {
                tags.push(user);
            }
        }

        Ok(Self {
            id: CommentId::new(),
            author,
            content: value,
            tagged_users: tags,
            created_at: clock.utc(),
        })
    }

    /// Returns the comment identifier.
    #[must_use]
    pub const fn id(&self) -> CommentId {
        self.id
    }

    /// Returns the author identifier.
    #[must_use]
    pub const fn author(&self) -> UserId {
        self.author
    }

    /// Returns the comment text.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the mentioned users (author excluded).
    #[must_use]
    pub fn tagged_users(&self) -> &[UserId] {
        &self.tagged_users
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
