//! Task aggregate root.

use super::{
    AttachedFile, BoardColumn, BoardDomainError, FieldChange, HistoryAction, PlanningState,
    Priority, StationAssignment, TaskComment, TaskFieldUpdate, TaskHistoryEntry, TaskId, TaskLinks,
    UserId, WorkflowStatus,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Initial field values for a new task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTaskData {
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Board column the task starts in.
    pub column: BoardColumn,
    /// Workflow status.
    pub status: WorkflowStatus,
    /// Priority level.
    pub priority: Priority,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Optional assignee.
    pub assignee: Option<UserId>,
    /// Optional handler.
    pub handler: Option<UserId>,
    /// Tagged users.
    pub tagged_users: Vec<UserId>,
    /// External links.
    pub links: TaskLinks,
    /// Attached files.
    pub files: Vec<AttachedFile>,
    /// Planning triage state.
    pub planning: Option<PlanningState>,
    /// In-progress station assignment.
    pub station: Option<StationAssignment>,
}

/// Task card on the board.
///
/// The task owns its embedded comment and history collections. History is
/// append-only: every state change recorded through the aggregate methods
/// appends an entry and bumps `updated_at`. Positions within a column are
/// managed by the board service; the aggregate only stores the value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    description: Option<String>,
    column: BoardColumn,
    status: WorkflowStatus,
    priority: Priority,
    due_date: Option<DateTime<Utc>>,
    assignee: Option<UserId>,
    handler: Option<UserId>,
    tagged_users: Vec<UserId>,
    links: TaskLinks,
    files: Vec<AttachedFile>,
    position: u32,
    planning: Option<PlanningState>,
    station: Option<StationAssignment>,
    comments: Vec<TaskComment>,
    history: Vec<TaskHistoryEntry>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task at the given column position, recording the
    /// `created` history entry.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyTaskTitle`] when the title is
    /// empty after trimming.
    pub fn new(
        data: NewTaskData,
        position: u32,
        actor: UserId,
        clock: &impl Clock,
    ) -> Result<Self, BoardDomainError> {
        if data.title.trim().is_empty() {
            return Err(BoardDomainError::EmptyTaskTitle);
        }

        let timestamp = clock.utc();
        Ok(Self {
            id: TaskId::new(),
            title: data.title,
            description: data.description,
            column: data.column,
            status: data.status,
            priority: data.priority,
            due_date: data.due_date,
            assignee: data.assignee,
            handler: data.handler,
            tagged_users: data.tagged_users,
            links: data.links,
            files: data.files,
            position,
            planning: data.planning,
            station: data.station,
            comments: Vec::new(),
            history: vec![TaskHistoryEntry::record(HistoryAction::Created, actor, clock)],
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the board column.
    #[must_use]
    pub const fn column(&self) -> BoardColumn {
        self.column
    }

    /// Returns the workflow status.
    #[must_use]
    pub const fn status(&self) -> WorkflowStatus {
        self.status
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub const fn assignee(&self) -> Option<UserId> {
        self.assignee
    }

    /// Returns the handler, if any.
    #[must_use]
    pub const fn handler(&self) -> Option<UserId> {
        self.handler
    }

    /// Returns the tagged users.
    #[must_use]
    pub fn tagged_users(&self) -> &[UserId] {
        &self.tagged_users
    }

    /// Returns the external links.
    #[must_use]
    pub const fn links(&self) -> &TaskLinks {
        &self.links
    }

    /// Returns the attached files.
    #[must_use]
    pub fn files(&self) -> &[AttachedFile] {
        &self.files
    }

    /// Returns the ordinal position within the column.
    #[must_use]
    pub const fn position(&self) -> u32 {
        self.position
    }

    /// Returns the planning triage state, if flagged.
    #[must_use]
    pub const fn planning(&self) -> Option<PlanningState> {
        self.planning
    }

    /// Returns the station assignment, if any.
    #[must_use]
    pub const fn station(&self) -> Option<&StationAssignment> {
        self.station.as_ref()
    }

    /// Returns the embedded comments in append order.
    #[must_use]
    pub fn comments(&self) -> &[TaskComment] {
        &self.comments
    }

    /// Returns the history log in append order.
    #[must_use]
    pub fn history(&self) -> &[TaskHistoryEntry] {
        &self.history
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns `true` when the user is assignee or handler on a task that
    /// is not yet done.
    #[must_use]
    pub fn occupies(&self, user: UserId) -> bool {
        self.column != BoardColumn::Done
            && (self.assignee == Some(user) || self.handler == Some(user))
    }

    /// Applies a batch of field updates, recording one `updated` history
    /// entry per field that actually changed.
    ///
    /// Returns the changes in application order. Requesting a value equal
    /// to the current one records nothing.
    pub fn apply_update(
        &mut self,
        update: super::TaskUpdate,
        actor: UserId,
        clock: &impl Clock,
    ) -> Vec<FieldChange> {
        let mut changes = Vec::new();
        for field_update in update.into_changes() {
            if let Some(change) = self.apply_field(field_update) {
                self.history.push(TaskHistoryEntry::record(
                    HistoryAction::Updated {
                        change: change.clone(),
                    },
                    actor,
                    clock,
                ));
                changes.push(change);
            }
        }
        if !changes.is_empty() {
            self.touch(clock);
        }
        changes
    }

    /// Appends a comment and its `comment_added` history entry.
    pub fn add_comment(&mut self, comment: TaskComment, clock: &impl Clock) {
        self.history.push(TaskHistoryEntry::record(
            HistoryAction::CommentAdded {
                comment_id: comment.id(),
            },
            comment.author(),
            clock,
        ));
        self.comments.push(comment);
        self.touch(clock);
    }

    /// Replaces the station assignment, recording a `station_changed`
    /// history entry when the assignment differs.
    ///
    /// Returns the old assignment when a change was recorded.
    pub fn change_station(
        &mut self,
        new_station: Option<StationAssignment>,
        actor: UserId,
        clock: &impl Clock,
    ) -> Option<Option<StationAssignment>> {
        if self.station == new_station {
            return None;
        }
        let old = self.station.clone();
        self.history.push(TaskHistoryEntry::record(
            HistoryAction::StationChanged {
                old: old.clone(),
                new: new_station.clone(),
            },
            actor,
            clock,
        ));
        self.station = new_station;
        self.touch(clock);
        Some(old)
    }

    /// Replaces the handler, recording a `handler_changed` history entry
    /// when the handler differs.
    ///
    /// Returns the old handler when a change was recorded.
    pub fn change_handler(
        &mut self,
        new_handler: Option<UserId>,
        actor: UserId,
        clock: &impl Clock,
    ) -> Option<Option<UserId>> {
        if self.handler == new_handler {
            return None;
        }
        let old = self.handler;
        self.history.push(TaskHistoryEntry::record(
            HistoryAction::HandlerChanged {
                old,
                new: new_handler,
            },
            actor,
            clock,
        ));
        self.handler = new_handler;
        self.touch(clock);
        Some(old)
    }

    /// Sets the position without recording history.
    ///
    /// Used by the board service when renumbering a column; only the
    /// user-initiated position change on the moved task itself goes
    /// through [`Task::apply_update`].
    pub fn set_position(&mut self, position: u32) {
        self.position = position;
    }

    /// Resets the column without recording history.
    ///
    /// Used when restoring a deleted task back to the todo lane.
    pub fn reset_column(&mut self, column: BoardColumn) {
        self.column = column;
    }

    fn apply_field(&mut self, update: TaskFieldUpdate) -> Option<FieldChange> {
        match update {
            TaskFieldUpdate::Title(value) => {
                replace(&mut self.title, value).map(|(old, new)| FieldChange::Title { old, new })
            }
            TaskFieldUpdate::Description(value) => replace(&mut self.description, value)
                .map(|(old, new)| FieldChange::Description { old, new }),
            TaskFieldUpdate::Column(value) => {
                replace(&mut self.column, value).map(|(old, new)| FieldChange::Column { old, new })
            }
            TaskFieldUpdate::Status(value) => {
                replace(&mut self.status, value).map(|(old, new)| FieldChange::Status { old, new })
            }
            TaskFieldUpdate::Priority(value) => replace(&mut self.priority, value)
                .map(|(old, new)| FieldChange::Priority { old, new }),
            TaskFieldUpdate::DueDate(value) => replace(&mut self.due_date, value)
                .map(|(old, new)| FieldChange::DueDate { old, new }),
            TaskFieldUpdate::Assignee(value) => replace(&mut self.assignee, value)
                .map(|(old, new)| FieldChange::Assignee { old, new }),
            TaskFieldUpdate::Handler(value) => replace(&mut self.handler, value)
                .map(|(old, new)| FieldChange::Handler { old, new }),
            TaskFieldUpdate::TaggedUsers(value) => replace(&mut self.tagged_users, value)
                .map(|(old, new)| FieldChange::TaggedUsers { old, new }),
            TaskFieldUpdate::Links(value) => {
                replace(&mut self.links, value).map(|(old, new)| FieldChange::Links { old, new })
            }
            TaskFieldUpdate::Files(value) => {
                replace(&mut self.files, value).map(|(old, new)| FieldChange::Files { old, new })
            }
            TaskFieldUpdate::Position(value) => replace(&mut self.position, value)
                .map(|(old, new)| FieldChange::Position { old, new }),
            TaskFieldUpdate::Planning(value) => replace(&mut self.planning, value)
                .map(|(old, new)| FieldChange::Planning { old, new }),
            TaskFieldUpdate::Station(value) => replace(&mut self.station, value)
                .map(|(old, new)| FieldChange::Station { old, new }),
        }
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

/// Swaps in a new value, returning `(old, new)` only when they differ.
fn replace<T: Clone + PartialEq>(field: &mut T, new_value: T) -> Option<(T, T)> {
    if *field == new_value {
        return None;
    }
    let old = field.clone();
    *field = new_value.clone();
    Some((old, new_value))
}
