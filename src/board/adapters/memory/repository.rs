//! In-memory repository for board persistence tests and seeded demos.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::board::{
    domain::{ArchivedTask, Notification, StickyNote, Task, User},
    ports::{BoardRepository, BoardRepositoryError, BoardRepositoryResult, BoardSnapshot},
};

/// Thread-safe in-memory board repository.
///
/// Stores the five collections exactly as the service writes them, so
/// tests can assert on what a write-through persisted.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBoardRepository {
    state: Arc<RwLock<BoardSnapshot>>,
}

impl InMemoryBoardRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-populated with a snapshot.
    #[must_use]
    pub fn with_snapshot(snapshot: BoardSnapshot) -> Self {
        Self {
            state: Arc::new(RwLock::new(snapshot)),
        }
    }

    /// Returns a copy of the currently persisted snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::Persistence`] when the state lock
    /// is poisoned.
    pub fn snapshot(&self) -> BoardRepositoryResult<BoardSnapshot> {
        Ok(self.read()?.clone())
    }

    fn read(&self) -> BoardRepositoryResult<std::sync::RwLockReadGuard<'_, BoardSnapshot>> {
        self.state.read().map_err(|_| poisoned())
    }

    fn write(&self) -> BoardRepositoryResult<std::sync::RwLockWriteGuard<'_, BoardSnapshot>> {
        self.state.write().map_err(|_| poisoned())
    }
}

fn poisoned() -> BoardRepositoryError {
    BoardRepositoryError::persistence(std::io::Error::other(
        "in-memory board state lock poisoned",
    ))
}

#[async_trait]
impl BoardRepository for InMemoryBoardRepository {
    async fn load(&self) -> BoardRepositoryResult<BoardSnapshot> {
        self.snapshot()
    }

    async fn replace_users(&self, users: &[User]) -> BoardRepositoryResult<()> {
        self.write()?.users = users.to_vec();
        Ok(())
    }

    async fn replace_tasks(&self, tasks: &[Task]) -> BoardRepositoryResult<()> {
        self.write()?.tasks = tasks.to_vec();
        Ok(())
    }

    async fn replace_notifications(
        &self,
        notifications: &[Notification],
    ) -> BoardRepositoryResult<()> {
        self.write()?.notifications = notifications.to_vec();
        Ok(())
    }

    async fn replace_archived_tasks(
        &self,
        archived_tasks: &[ArchivedTask],
    ) -> BoardRepositoryResult<()> {
        self.write()?.archived_tasks = archived_tasks.to_vec();
        Ok(())
    }

    async fn replace_sticky_notes(
        &self,
        sticky_notes: &[StickyNote],
    ) -> BoardRepositoryResult<()> {
        self.write()?.sticky_notes = sticky_notes.to_vec();
        Ok(())
    }
}
