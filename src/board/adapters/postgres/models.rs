//! Diesel row models for board persistence.

use super::schema::{archived_tasks, notifications, sticky_notes, tasks, users};
use diesel::prelude::*;
use serde_json::Value;

/// Document row for user accounts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// User identifier.
    pub id: uuid::Uuid,
    /// Serialized user account.
    pub payload: Value,
}

/// Document row for active tasks.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Serialized task aggregate.
    pub payload: Value,
}

/// Document row for notifications.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NotificationRow {
    /// Notification identifier.
    pub id: uuid::Uuid,
    /// Serialized notification.
    pub payload: Value,
}

/// Document row for archived tasks.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = archived_tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ArchivedTaskRow {
    /// Identifier of the archived task.
    pub id: uuid::Uuid,
    /// Serialized archive snapshot.
    pub payload: Value,
}

/// Document row for sticky notes.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = sticky_notes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StickyNoteRow {
    /// Sticky note identifier.
    pub id: uuid::Uuid,
    /// Serialized sticky note.
    pub payload: Value,
}
