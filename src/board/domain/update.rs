//! Typed task field updates and the change records they produce.
//!
//! Updates are expressed as a tagged union of requested new values, one
//! variant per updatable field; applying one against a task yields a
//! [`FieldChange`] capturing the old and new values only when they
//! actually differ. This replaces any reflection over dynamic partial
//! objects with explicit per-field comparison.

use super::{
    AttachedFile, BoardColumn, PlanningState, Priority, StationAssignment, TaskLinks, UserId,
    WorkflowStatus,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Requested new value for a single task field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum TaskFieldUpdate {
    /// Replace the title.
    Title(String),
    /// Replace or clear the description.
    Description(Option<String>),
    /// Move to another board column.
    Column(BoardColumn),
    /// Replace the workflow status.
    Status(WorkflowStatus),
    /// Replace the priority.
    Priority(Priority),
    /// Replace or clear the due date.
    DueDate(Option<DateTime<Utc>>),
    /// Replace or clear the assignee.
    Assignee(Option<UserId>),
    /// Replace or clear the handler.
    Handler(Option<UserId>),
    /// Replace the tagged user list.
    TaggedUsers(Vec<UserId>),
    /// Replace the external links.
    Links(TaskLinks),
    /// Replace the attached file list.
    Files(Vec<AttachedFile>),
    /// Replace the ordinal position within the column.
    Position(u32),
    /// Flag or unflag the task for planning triage.
    Planning(Option<PlanningState>),
    /// Replace or clear the in-progress station.
    Station(Option<StationAssignment>),
}

/// Ordered list of field updates applied as one user action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    changes: Vec<TaskFieldUpdate>,
}

impl TaskUpdate {
    /// Creates an empty update.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            changes: Vec::new(),
        }
    }

    /// Returns the requested field updates in application order.
    #[must_use]
    pub fn changes(&self) -> &[TaskFieldUpdate] {
        &self.changes
    }

    /// Consumes the update, yielding the field updates.
    #[must_use]
    pub fn into_changes(self) -> Vec<TaskFieldUpdate> {
        self.changes
    }

    /// Returns `true` when no field update was requested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Adds an arbitrary field update.
    #[must_use]
    pub fn with(mut self, update: TaskFieldUpdate) -> Self {
        self.changes.push(update);
        self
    }

    /// Requests a new title.
    #[must_use]
    pub fn title(self, title: impl Into<String>) -> Self {
        self.with(TaskFieldUpdate::Title(title.into()))
    }

    /// Requests a new description.
    #[must_use]
    pub fn description(self, description: Option<String>) -> Self {
        self.with(TaskFieldUpdate::Description(description))
    }

    /// Requests a column move.
    #[must_use]
    pub fn column(self, column: BoardColumn) -> Self {
        self.with(TaskFieldUpdate::Column(column))
    }

    /// Requests a new workflow status.
    #[must_use]
    pub fn status(self, status: WorkflowStatus) -> Self {
        self.with(TaskFieldUpdate::Status(status))
    }

    /// Requests a new priority.
    #[must_use]
    pub fn priority(self, priority: Priority) -> Self {
        self.with(TaskFieldUpdate::Priority(priority))
    }

    /// Requests a new due date.
    #[must_use]
    pub fn due_date(self, due_date: Option<DateTime<Utc>>) -> Self {
        self.with(TaskFieldUpdate::DueDate(due_date))
    }

    /// Requests a new assignee.
    #[must_use]
    pub fn assignee(self, assignee: Option<UserId>) -> Self {
        self.with(TaskFieldUpdate::Assignee(assignee))
    }

    /// Requests a new handler.
    #[must_use]
    pub fn handler(self, handler: Option<UserId>) -> Self {
        self.with(TaskFieldUpdate::Handler(handler))
    }

    /// Requests a new tagged user list.
    #[must_use]
    pub fn tagged_users(self, tagged_users: Vec<UserId>) -> Self {
        self.with(TaskFieldUpdate::TaggedUsers(tagged_users))
    }

    /// Requests new external links.
    #[must_use]
    pub fn links(self, links: TaskLinks) -> Self {
        self.with(TaskFieldUpdate::Links(links))
    }

    /// Requests a new attached file list.
    #[must_use]
    pub fn files(self, files: Vec<AttachedFile>) -> Self {
        self.with(TaskFieldUpdate::Files(files))
    }

    /// Requests a new ordinal position.
    #[must_use]
    pub fn position(self, position: u32) -> Self {
        self.with(TaskFieldUpdate::Position(position))
    }

    /// Requests a new planning state.
    #[must_use]
    pub fn planning(self, planning: Option<PlanningState>) -> Self {
        self.with(TaskFieldUpdate::Planning(planning))
    }

    /// Requests a new station assignment.
    #[must_use]
    pub fn station(self, station: Option<StationAssignment>) -> Self {
        self.with(TaskFieldUpdate::Station(station))
    }
}

/// Recorded old/new values for one changed task field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", rename_all = "snake_case")]
pub enum FieldChange {
    /// Title change.
    Title {
        /// Previous title.
        old: String,
        /// New title.
        new: String,
    },
    /// Description change.
    Description {
        /// Previous description.
        old: Option<String>,
        /// New description.
        new: Option<String>,
    },
    /// Column move.
    Column {
        /// Previous column.
        old: BoardColumn,
        /// New column.
        new: BoardColumn,
    },
    /// Workflow status change.
    Status {
        /// Previous status.
        old: WorkflowStatus,
        /// New status.
        new: WorkflowStatus,
    },
    /// Priority change.
    Priority {
        /// Previous priority.
        old: Priority,
        /// New priority.
        new: Priority,
    },
    /// Due date change.
    DueDate {
        /// Previous due date.
        old: Option<DateTime<Utc>>,
        /// New due date.
        new: Option<DateTime<Utc>>,
    },
    /// Assignee change.
    Assignee {
        /// Previous assignee.
        old: Option<UserId>,
        /// New assignee.
        new: Option<UserId>,
    },
    /// Handler change.
    Handler {
        /// Previous handler.
        old: Option<UserId>,
        /// New handler.
        new: Option<UserId>,
    },
    /// Tagged user list change.
    TaggedUsers {
        /// Previous tag list.
        old: Vec<UserId>,
        /// New tag list.
        new: Vec<UserId>,
    },
    /// External links change.
    Links {
        /// Previous links.
        old: TaskLinks,
        /// New links.
        new: TaskLinks,
    },
    /// Attached file list change.
    Files {
        /// Previous file list.
        old: Vec<AttachedFile>,
        /// New file list.
        new: Vec<AttachedFile>,
    },
    /// Ordinal position change.
    Position {
        /// Previous position.
        old: u32,
        /// New position.
        new: u32,
    },
    /// Planning state change.
    Planning {
        /// Previous planning state.
        old: Option<PlanningState>,
        /// New planning state.
        new: Option<PlanningState>,
    },
    /// Station assignment change.
    Station {
        /// Previous station assignment.
        old: Option<StationAssignment>,
        /// New station assignment.
        new: Option<StationAssignment>,
    },
}

impl FieldChange {
    /// Returns the canonical name of the changed field.
    #[must_use]
    pub const fn field_name(&self) -> &'static str {
        match self {
            Self::Title { .. } => "title",
            Self::Description { .. } => "description",
            Self::Column { .. } => "column",
            Self::Status { .. } => "status",
            Self::Priority { .. } => "priority",
            Self::DueDate { .. } => "due_date",
            Self::Assignee { .. } => "assignee",
            Self::Handler { .. } => "handler",
            Self::TaggedUsers { .. } => "tagged_users",
            Self::Links { .. } => "links",
            Self::Files { .. } => "files",
            Self::Position { .. } => "position",
            Self::Planning { .. } => "planning",
            Self::Station { .. } => "station",
        }
    }

    /// Returns the previous value rendered for history display.
    #[must_use]
    pub fn old_display(&self) -> String {
        self.display_parts().0
    }

    /// Returns the new value rendered for history display.
    #[must_use]
    pub fn new_display(&self) -> String {
        self.display_parts().1
    }

    fn display_parts(&self) -> (String, String) {
        match self {
            Self::Title { old, new } => (old.clone(), new.clone()),
            Self::Description { old, new } => (display_opt_str(old), display_opt_str(new)),
            Self::Column { old, new } => (old.as_str().to_owned(), new.as_str().to_owned()),
            Self::Status { old, new } => (old.as_str().to_owned(), new.as_str().to_owned()),
            Self::Priority { old, new } => (old.as_str().to_owned(), new.as_str().to_owned()),
            Self::DueDate { old, new } => (display_opt_date(old), display_opt_date(new)),
            Self::Assignee { old, new } | Self::Handler { old, new } => {
                (display_opt_id(old), display_opt_id(new))
            }
            Self::TaggedUsers { old, new } => (display_ids(old), display_ids(new)),
            Self::Links { old, new } => (old.to_string(), new.to_string()),
            Self::Files { old, new } => (display_files(old), display_files(new)),
            Self::Position { old, new } => (old.to_string(), new.to_string()),
            Self::Planning { old, new } => (display_planning(old), display_planning(new)),
            Self::Station { old, new } => (display_station(old), display_station(new)),
        }
    }
}

fn display_opt_str(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "-".to_owned())
}

fn display_opt_date(value: &Option<DateTime<Utc>>) -> String {
    value.map_or_else(|| "-".to_owned(), |date| date.to_rfc3339())
}

fn display_opt_id(value: &Option<UserId>) -> String {
    value.map_or_else(|| "-".to_owned(), |id| id.to_string())
}

fn display_ids(ids: &[UserId]) -> String {
    if ids.is_empty() {
        return "-".to_owned();
    }
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn display_files(files: &[AttachedFile]) -> String {
    if files.is_empty() {
        return "-".to_owned();
    }
    files
        .iter()
        .map(|file| file.name.clone())
        .collect::<Vec<_>>()
        .join(", ")
}

fn display_planning(value: &Option<PlanningState>) -> String {
    value.map_or_else(|| "-".to_owned(), |state| state.received_at.to_rfc3339())
}

fn display_station(value: &Option<StationAssignment>) -> String {
    value
        .as_ref()
        .map_or_else(|| "-".to_owned(), ToString::to_string)
}
