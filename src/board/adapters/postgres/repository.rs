//! `PostgreSQL` repository implementation for board persistence.

use super::{
    models::{ArchivedTaskRow, NotificationRow, StickyNoteRow, TaskRow, UserRow},
    schema::{archived_tasks, notifications, sticky_notes, tasks, users},
};
use crate::board::{
    domain::{ArchivedTask, Notification, StickyNote, Task, User},
    ports::{BoardRepository, BoardRepositoryError, BoardRepositoryResult, BoardSnapshot},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::upsert::excluded;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// `PostgreSQL` connection pool type used by board adapters.
pub type BoardPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed board repository.
///
/// Collection replacement runs in one transaction per collection: every
/// local document is upserted by identifier, then remote documents
/// absent from the local set are deleted. A crash mid-write leaves the
/// previous collection state intact.
#[derive(Debug, Clone)]
pub struct PostgresBoardRepository {
    pool: BoardPgPool,
}

impl PostgresBoardRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: BoardPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> BoardRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> BoardRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(BoardRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(BoardRepositoryError::persistence)?
    }
}

#[async_trait]
impl BoardRepository for PostgresBoardRepository {
    async fn load(&self) -> BoardRepositoryResult<BoardSnapshot> {
        self.run_blocking(|connection| {
            let users = users::table
                .select(users::payload)
                .load::<Value>(connection)
                .map_err(BoardRepositoryError::persistence)?;
            let tasks = tasks::table
                .select(tasks::payload)
                .load::<Value>(connection)
                .map_err(BoardRepositoryError::persistence)?;
            let notifications = notifications::table
                .select(notifications::payload)
                .load::<Value>(connection)
                .map_err(BoardRepositoryError::persistence)?;
            let archived_tasks = archived_tasks::table
                .select(archived_tasks::payload)
                .load::<Value>(connection)
                .map_err(BoardRepositoryError::persistence)?;
            let sticky_notes = sticky_notes::table
                .select(sticky_notes::payload)
                .load::<Value>(connection)
                .map_err(BoardRepositoryError::persistence)?;

            Ok(BoardSnapshot {
                users: decode(users)?,
                tasks: decode(tasks)?,
                notifications: decode(notifications)?,
                archived_tasks: decode(archived_tasks)?,
                sticky_notes: decode(sticky_notes)?,
            })
        })
        .await
    }

    async fn replace_users(&self, collection: &[User]) -> BoardRepositoryResult<()> {
        let rows = encode_rows(collection, |user, payload| UserRow {
            id: user.id().into_inner(),
            payload,
        })?;
        self.run_blocking(move |connection| replace_user_rows(connection, rows))
            .await
    }

    async fn replace_tasks(&self, collection: &[Task]) -> BoardRepositoryResult<()> {
        let rows = encode_rows(collection, |task, payload| TaskRow {
            id: task.id().into_inner(),
            payload,
        })?;
        self.run_blocking(move |connection| replace_task_rows(connection, rows))
            .await
    }

    async fn replace_notifications(
        &self,
        collection: &[Notification],
    ) -> BoardRepositoryResult<()> {
        let rows = encode_rows(collection, |notification, payload| NotificationRow {
            id: notification.id().into_inner(),
            payload,
        })?;
        self.run_blocking(move |connection| replace_notification_rows(connection, rows))
            .await
    }

    async fn replace_archived_tasks(
        &self,
        collection: &[ArchivedTask],
    ) -> BoardRepositoryResult<()> {
        let rows = encode_rows(collection, |archived, payload| ArchivedTaskRow {
            id: archived.task_id().into_inner(),
            payload,
        })?;
        self.run_blocking(move |connection| replace_archived_task_rows(connection, rows))
            .await
    }

    async fn replace_sticky_notes(
        &self,
        collection: &[StickyNote],
    ) -> BoardRepositoryResult<()> {
        let rows = encode_rows(collection, |note, payload| StickyNoteRow {
            id: note.id().into_inner(),
            payload,
        })?;
        self.run_blocking(move |connection| replace_sticky_note_rows(connection, rows))
            .await
    }
}

/// Serializes a collection into document rows.
fn encode_rows<T, R>(
    collection: &[T],
    make_row: impl Fn(&T, Value) -> R,
) -> BoardRepositoryResult<Vec<R>>
where
    T: Serialize,
{
    collection
        .iter()
        .map(|item| {
            let payload =
                serde_json::to_value(item).map_err(BoardRepositoryError::persistence)?;
            Ok(make_row(item, payload))
        })
        .collect()
}

fn decode<T: DeserializeOwned>(payloads: Vec<Value>) -> BoardRepositoryResult<Vec<T>> {
    payloads
        .into_iter()
        .map(|payload| serde_json::from_value(payload).map_err(BoardRepositoryError::persistence))
        .collect()
}

macro_rules! replace_rows_fn {
    ($fn_name:ident, $table:ident, $row:ty) => {
        fn $fn_name(connection: &mut PgConnection, rows: Vec<$row>) -> BoardRepositoryResult<()> {
            let ids: Vec<uuid::Uuid> = rows.iter().map(|row| row.id).collect();
            connection
                .transaction(|inner| {
                    for row in &rows {
                        diesel::insert_into($table::table)
                            .values(row)
                            .on_conflict($table::id)
                            .do_update()
                            .set($table::payload.eq(excluded($table::payload)))
                            .execute(inner)?;
                    }
                    diesel::delete($table::table.filter($table::id.ne_all(&ids)))
                        .execute(inner)?;
                    QueryResult::Ok(())
                })
                .map_err(BoardRepositoryError::persistence)
        }
    };
}

replace_rows_fn!(replace_user_rows, users, UserRow);
replace_rows_fn!(replace_task_rows, tasks, TaskRow);
replace_rows_fn!(replace_notification_rows, notifications, NotificationRow);
replace_rows_fn!(replace_archived_task_rows, archived_tasks, ArchivedTaskRow);
replace_rows_fn!(replace_sticky_note_rows, sticky_notes, StickyNoteRow);
