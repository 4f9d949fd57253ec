//! User notifications derived from task mutations.

use super::{NotificationId, ParseBoardValueError, TaskId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Why a notification was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// The recipient was tagged in a comment.
    Mention,
    /// The recipient became the task assignee.
    Assignment,
    /// A comment was added to a task the recipient is assigned to.
    Comment,
    /// The recipient became the task handler.
    Handler,
}

impl NotificationKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mention => "mention",
            Self::Assignment => "assignment",
            Self::Comment => "comment",
            Self::Handler => "handler",
        }
    }
}

impl TryFrom<&str> for NotificationKind {
    type Error = ParseBoardValueError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mention" => Ok(Self::Mention),
            "assignment" => Ok(Self::Assignment),
            "comment" => Ok(Self::Comment),
            "handler" => Ok(Self::Handler),
            _ => Err(ParseBoardValueError::new("notification kind", value)),
        }
    }
}

/// Notification delivered to a single user.
///
/// Invariant: `from_user != to_user`. The board service never fans out a
/// notification to the acting user, and this constructor returns `None`
/// for such pairs rather than producing a self-notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    id: NotificationId,
    kind: NotificationKind,
    from_user: UserId,
    to_user: UserId,
    task_id: TaskId,
    message: String,
    read: bool,
    created_at: DateTime<Utc>,
}

impl Notification {
    /// Creates an unread notification, or `None` when sender and
    /// recipient are the same user.
    #[must_use]
    pub fn new(
        kind: NotificationKind,
        from_user: UserId,
        to_user: UserId,
        task_id: TaskId,
        message: impl Into<String>,
        clock: &impl Clock,
    ) -> Option<Self> {
        if from_user == to_user {
            return None;
        }
        Some(Self {
            id: NotificationId::new(),
            kind,
            from_user,
            to_user,
            task_id,
            message: message.into(),
            read: false,
            created_at: clock.utc(),
        })
    }

    /// Returns the notification identifier.
    #[must_use]
    pub const fn id(&self) -> NotificationId {
        self.id
    }

    /// Returns the notification kind.
    #[must_use]
    pub const fn kind(&self) -> NotificationKind {
        self.kind
    }

    /// Returns the acting user that triggered the notification.
    #[must_use]
    pub const fn from_user(&self) -> UserId {
        self.from_user
    }

    /// Returns the recipient.
    #[must_use]
    pub const fn to_user(&self) -> UserId {
        self.to_user
    }

    /// Returns the associated task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the rendered message text.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns `true` once the recipient has read the notification.
    #[must_use]
    pub const fn is_read(&self) -> bool {
        self.read
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Marks the notification as read.
    pub fn mark_read(&mut self) {
        self.read = true;
    }
}
