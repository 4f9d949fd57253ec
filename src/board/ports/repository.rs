//! Repository port for full-collection board persistence.
//!
//! The board persists whole collections, not individual rows: every
//! mutation writes the affected collection back as a snapshot, and the
//! adapter reconciles the remote side by upserting every local row and
//! deleting remote rows absent locally. Concurrent sessions resolve by
//! last writer wins at collection granularity.

use crate::board::domain::{ArchivedTask, Notification, StickyNote, Task, User};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for board repository operations.
pub type BoardRepositoryResult<T> = Result<T, BoardRepositoryError>;

/// Complete persisted board state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardSnapshot {
    /// All user accounts.
    pub users: Vec<User>,
    /// All active tasks.
    pub tasks: Vec<Task>,
    /// All notifications.
    pub notifications: Vec<Notification>,
    /// All archived task snapshots.
    pub archived_tasks: Vec<ArchivedTask>,
    /// All sticky notes.
    pub sticky_notes: Vec<StickyNote>,
}

/// Board persistence contract.
#[async_trait]
pub trait BoardRepository: Send + Sync {
    /// Loads the complete board state.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::Persistence`] when the backing
    /// store cannot be read or a row fails to deserialize.
    async fn load(&self) -> BoardRepositoryResult<BoardSnapshot>;

    /// Replaces the remote user collection with the given snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::Persistence`] when the write
    /// through fails.
    async fn replace_users(&self, users: &[User]) -> BoardRepositoryResult<()>;

    /// Replaces the remote task collection with the given snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::Persistence`] when the write
    /// through fails.
    async fn replace_tasks(&self, tasks: &[Task]) -> BoardRepositoryResult<()>;

    /// Replaces the remote notification collection with the given
    /// snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::Persistence`] when the write
    /// through fails.
    async fn replace_notifications(
        &self,
        notifications: &[Notification],
    ) -> BoardRepositoryResult<()>;

    /// Replaces the remote archived-task collection with the given
    /// snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::Persistence`] when the write
    /// through fails.
    async fn replace_archived_tasks(
        &self,
        archived_tasks: &[ArchivedTask],
    ) -> BoardRepositoryResult<()>;

    /// Replaces the remote sticky-note collection with the given
    /// snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::Persistence`] when the write
    /// through fails.
    async fn replace_sticky_notes(&self, sticky_notes: &[StickyNote])
    -> BoardRepositoryResult<()>;
}

/// Errors returned by board repository implementations.
#[derive(Debug, Clone, Error)]
pub enum BoardRepositoryError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl BoardRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
