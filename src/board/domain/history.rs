//! Append-only per-task history log.

use super::{CommentId, FieldChange, HistoryEntryId, StationAssignment, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// What a history entry records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum HistoryAction {
    /// The task was created.
    Created,
    /// A single field changed value.
    Updated {
        /// Old/new values of the changed field.
        change: FieldChange,
    },
    /// A comment was appended.
    CommentAdded {
        /// Identifier of the appended comment.
        comment_id: CommentId,
    },
    /// The in-progress station changed.
    StationChanged {
        /// Previous station assignment.
        old: Option<StationAssignment>,
        /// New station assignment.
        new: Option<StationAssignment>,
    },
    /// The handler changed.
    HandlerChanged {
        /// Previous handler.
        old: Option<UserId>,
        /// New handler.
        new: Option<UserId>,
    },
}

impl HistoryAction {
    /// Returns the canonical action kind name.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated { .. } => "updated",
            Self::CommentAdded { .. } => "comment_added",
            Self::StationChanged { .. } => "station_changed",
            Self::HandlerChanged { .. } => "handler_changed",
        }
    }
}

/// One entry in a task's append-only history log.
///
/// Entries are never mutated or deleted once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskHistoryEntry {
    id: HistoryEntryId,
    action: HistoryAction,
    actor: UserId,
    recorded_at: DateTime<Utc>,
}

impl TaskHistoryEntry {
    /// Records a new history entry at the current clock time.
    #[must_use]
    pub fn record(action: HistoryAction, actor: UserId, clock: &impl Clock) -> Self {
        Self {
            id: HistoryEntryId::new(),
            action,
            actor,
            recorded_at: clock.utc(),
        }
    }

    /// Returns the entry identifier.
    #[must_use]
    pub const fn id(&self) -> HistoryEntryId {
        self.id
    }

    /// Returns the recorded action.
    #[must_use]
    pub const fn action(&self) -> &HistoryAction {
        &self.action
    }

    /// Returns the acting user.
    #[must_use]
    pub const fn actor(&self) -> UserId {
        self.actor
    }

    /// Returns when the entry was recorded.
    #[must_use]
    pub const fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}
