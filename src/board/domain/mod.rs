//! Domain model for the task board.
//!
//! The board domain models kanban cards with embedded comments and an
//! append-only history log, the users that act on them, the notifications
//! those actions fan out, archived snapshots, and per-user sticky notes,
//! while keeping all infrastructure concerns outside of the domain
//! boundary.

mod archive;
mod column;
mod comment;
mod details;
mod error;
mod history;
mod ids;
mod notification;
mod station;
mod sticky_note;
mod task;
mod update;
mod user;

pub use archive::{ArchiveReason, ArchivedTask};
pub use column::{BoardColumn, Priority, WorkflowStatus};
pub use comment::TaskComment;
pub use details::{AttachedFile, PlanningState, TaskLinks};
pub use error::{BoardDomainError, ParseBoardValueError};
pub use history::{HistoryAction, TaskHistoryEntry};
pub use ids::{
    CommentId, EmailAddress, HistoryEntryId, NotificationId, StickyNoteId, TaskId, UserId,
};
pub use notification::{Notification, NotificationKind};
pub use station::{Station, StationAssignment};
pub use sticky_note::StickyNote;
pub use task::{NewTaskData, Task};
pub use update::{FieldChange, TaskFieldUpdate, TaskUpdate};
pub use user::{PasswordHash, User, UserRole};
