//! Archived task snapshots.
//!
//! Active tasks are never hard-deleted: deletion archives the task with
//! the `deleted` reason, and completed tasks are archived with the
//! `completed` reason. Archived tasks can be restored to the active
//! collection.

use super::{BoardColumn, ParseBoardValueError, Task, TaskId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Why a task was archived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchiveReason {
    /// The work finished.
    Completed,
    /// The task was removed from the board.
    Deleted,
}

impl ArchiveReason {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Deleted => "deleted",
        }
    }
}

impl TryFrom<&str> for ArchiveReason {
    type Error = ParseBoardValueError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "completed" => Ok(Self::Completed),
            "deleted" => Ok(Self::Deleted),
            _ => Err(ParseBoardValueError::new("archive reason", value)),
        }
    }
}

/// Inactive snapshot of a task retained for audit and restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchivedTask {
    task: Task,
    archived_at: DateTime<Utc>,
    archived_by: UserId,
    reason: ArchiveReason,
}

impl ArchivedTask {
    /// Archives a task snapshot at the current clock time.
    #[must_use]
    pub fn new(task: Task, archived_by: UserId, reason: ArchiveReason, clock: &impl Clock) -> Self {
        Self {
            task,
            archived_at: clock.utc(),
            archived_by,
            reason,
        }
    }

    /// Returns the identifier of the archived task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task.id()
    }

    /// Returns the archived task snapshot.
    #[must_use]
    pub const fn task(&self) -> &Task {
        &self.task
    }

    /// Returns when the task was archived.
    #[must_use]
    pub const fn archived_at(&self) -> DateTime<Utc> {
        self.archived_at
    }

    /// Returns who archived the task.
    #[must_use]
    pub const fn archived_by(&self) -> UserId {
        self.archived_by
    }

    /// Returns the archive reason.
    #[must_use]
    pub const fn reason(&self) -> ArchiveReason {
        self.reason
    }

    /// Consumes the snapshot, producing the task ready for restoration.
    ///
    /// A task archived through deletion returns to the todo column; a
    /// completed task keeps the column it was archived from. The caller
    /// assigns a fresh position in the destination column.
    #[must_use]
    pub fn into_restored(self) -> Task {
        let mut task = self.task;
        if self.reason == ArchiveReason::Deleted {
            task.reset_column(BoardColumn::Todo);
        }
        task
    }
}
