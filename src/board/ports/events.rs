//! Side channel for reporting write-through outcomes.
//!
//! Board operations mutate local state first and persist afterwards; the
//! operation result reflects the local mutation only. Persistence
//! failures are delivered to a [`SyncObserver`] instead of being
//! returned to the caller, keeping the optimistic-update contract
//! explicit rather than swallowing errors.

use super::repository::BoardRepositoryError;
use std::fmt;

/// Board collection affected by a write-through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoardCollection {
    /// User accounts.
    Users,
    /// Active tasks.
    Tasks,
    /// Notifications.
    Notifications,
    /// Archived task snapshots.
    ArchivedTasks,
    /// Sticky notes.
    StickyNotes,
}

impl BoardCollection {
    /// Returns the collection name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Tasks => "tasks",
            Self::Notifications => "notifications",
            Self::ArchivedTasks => "archived_tasks",
            Self::StickyNotes => "sticky_notes",
        }
    }
}

impl fmt::Display for BoardCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Observer notified about write-through failures.
pub trait SyncObserver: Send + Sync {
    /// Called when a collection snapshot failed to persist.
    ///
    /// Local state has already been mutated when this fires; remote state
    /// stays diverged until the next successful write-through of the same
    /// collection overwrites it.
    fn persistence_failed(&self, collection: BoardCollection, error: &BoardRepositoryError);
}

/// Observer that discards all reports.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSyncObserver;

impl SyncObserver for NullSyncObserver {
    fn persistence_failed(&self, _collection: BoardCollection, _error: &BoardRepositoryError) {}
}
