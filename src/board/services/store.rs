//! Board state container and mutation operations.
//!
//! The service owns the complete board state in memory and is the single
//! source of truth for the session. Every operation mutates local state
//! synchronously, then writes the affected collections through to the
//! repository (one write per collection per operation). Write-through
//! failures go to the [`SyncObserver`] side channel; the operation result
//! always reflects the local, optimistic outcome.

use super::{messages, ordering};
use crate::board::{
    domain::{
        ArchiveReason, ArchivedTask, BoardColumn, BoardDomainError, EmailAddress, FieldChange,
        NewTaskData, Notification, NotificationId, NotificationKind, PasswordHash, StationAssignment,
        StickyNote, StickyNoteId, Task, TaskComment, TaskId, TaskUpdate, User, UserId, UserRole,
    },
    ports::{
        BoardCollection, BoardRepository, BoardRepositoryError, BoardSnapshot, SyncObserver,
    },
};
use mockable::Clock;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;

/// Service-level errors for board operations.
#[derive(Debug, Error)]
pub enum BoardStoreError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] BoardDomainError),

    /// The task does not exist in the active collection.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The task does not exist in the archive.
    #[error("archived task not found: {0}")]
    ArchivedTaskNotFound(TaskId),

    /// The user does not exist.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// The notification does not exist.
    #[error("notification not found: {0}")]
    NotificationNotFound(NotificationId),

    /// The sticky note does not exist.
    #[error("sticky note not found: {0}")]
    StickyNoteNotFound(StickyNoteId),

    /// Only admins may reorder the in-progress column.
    #[error("only admins may reorder the in-progress column")]
    ReorderNotPermitted,

    /// The operation requires the admin role.
    #[error("only admins may manage users")]
    AdminRequired,

    /// Admins cannot delete their own account.
    #[error("users cannot delete their own account")]
    SelfDeletion,

    /// The user is still assignee or handler on an active task.
    #[error("user {0} is still assigned to active tasks")]
    UserHasActiveTasks(UserId),

    /// Another account already uses the email address.
    #[error("email already in use: {0}")]
    DuplicateEmail(EmailAddress),

    /// Admins cannot change their own role.
    #[error("admins cannot change their own role")]
    OwnRoleChange,

    /// Sticky notes can only be edited by their owner.
    #[error("sticky note belongs to another user")]
    NotNoteOwner,

    /// Email/password pair did not resolve to a user.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The state lock was poisoned by a panicking thread.
    #[error("board state lock poisoned")]
    StatePoisoned,

    /// Notification message rendering failed.
    #[error(transparent)]
    Template(#[from] minijinja::Error),

    /// Loading the initial snapshot failed.
    #[error(transparent)]
    Repository(#[from] BoardRepositoryError),
}

/// Result type for board service operations.
pub type BoardStoreResult<T> = Result<T, BoardStoreError>;

/// Requested changes to a user account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    name: Option<String>,
    email: Option<EmailAddress>,
    password: Option<String>,
    avatar_url: Option<Option<String>>,
    role: Option<UserRole>,
}

impl UserUpdate {
    /// Creates an empty update.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            name: None,
            email: None,
            password: None,
            avatar_url: None,
            role: None,
        }
    }

    /// Requests a new display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Requests a new email address.
    #[must_use]
    pub fn with_email(mut self, email: EmailAddress) -> Self {
        self.email = Some(email);
        self
    }

    /// Requests a password change.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Requests a new avatar URL (or clears it with `None`).
    #[must_use]
    pub fn with_avatar_url(mut self, avatar_url: Option<String>) -> Self {
        self.avatar_url = Some(avatar_url);
        self
    }

    /// Requests a role change.
    #[must_use]
    pub const fn with_role(mut self, role: UserRole) -> Self {
        self.role = Some(role);
        self
    }
}

/// Board state container with write-through persistence.
pub struct BoardService<R, C>
where
    R: BoardRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    observer: Arc<dyn SyncObserver>,
    state: RwLock<BoardSnapshot>,
}

impl<R, C> BoardService<R, C>
where
    R: BoardRepository,
    C: Clock + Send + Sync,
{
    /// Creates a service over an empty board.
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>, observer: Arc<dyn SyncObserver>) -> Self {
        Self::with_snapshot(BoardSnapshot::default(), repository, clock, observer)
    }

    /// Creates a service over an existing snapshot.
    #[must_use]
    pub fn with_snapshot(
        snapshot: BoardSnapshot,
        repository: Arc<R>,
        clock: Arc<C>,
        observer: Arc<dyn SyncObserver>,
    ) -> Self {
        Self {
            repository,
            clock,
            observer,
            state: RwLock::new(snapshot),
        }
    }

    /// Creates a service by loading the snapshot from the repository.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::Repository`] when the initial load
    /// fails. This is the one moment persistence failure is surfaced
    /// directly: without a snapshot there is no local state to fall back
    /// on.
    pub async fn load(
        repository: Arc<R>,
        clock: Arc<C>,
        observer: Arc<dyn SyncObserver>,
    ) -> BoardStoreResult<Self> {
        let snapshot = repository.load().await?;
        Ok(Self::with_snapshot(snapshot, repository, clock, observer))
    }

    // ------------------------------------------------------------------
    // Task operations
    // ------------------------------------------------------------------

    /// Creates a task at the bottom of its column.
    ///
    /// Records the `created` history entry and notifies the assignee and
    /// handler, skipping the acting user.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::Domain`] when the title is empty and
    /// [`BoardStoreError::Template`] when message rendering fails.
    pub async fn add_task(&self, actor: UserId, data: NewTaskData) -> BoardStoreResult<Task> {
        let (task, tasks, notifications, notified) = {
            let mut state = self.write_state()?;
            let actor_name = display_name(&state.users, actor);
            let position = ordering::next_position(&state.tasks, data.column);
            let assignee = data.assignee;
            let handler = data.handler;
            let title = data.title.clone();
            let task = Task::new(data, position, actor, &*self.clock)?;

            let mut fresh = Vec::new();
            if let Some(recipient) = assignee {
                self.push_notification(
                    &mut fresh,
                    NotificationKind::Assignment,
                    actor,
                    &actor_name,
                    recipient,
                    task.id(),
                    &title,
                )?;
            }
            if let Some(recipient) = handler {
                self.push_notification(
                    &mut fresh,
                    NotificationKind::Handler,
                    actor,
                    &actor_name,
                    recipient,
                    task.id(),
                    &title,
                )?;
            }

            state.tasks.push(task.clone());
            let notified = !fresh.is_empty();
            state.notifications.append(&mut fresh);
            (
                task,
                state.tasks.clone(),
                state.notifications.clone(),
                notified,
            )
        };

        self.sync_tasks(tasks).await;
        if notified {
            self.sync_notifications(notifications).await;
        }
        Ok(task)
    }

    /// Applies a batch of field updates to a task.
    ///
    /// Every field that actually changes appends one `updated` history
    /// entry; a new assignee or handler (other than the actor) is
    /// notified. Moving the task out of a column renumbers the vacated
    /// column.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::TaskNotFound`] when the task does not
    /// exist.
    pub async fn update_task(
        &self,
        actor: UserId,
        id: TaskId,
        update: TaskUpdate,
    ) -> BoardStoreResult<Task> {
        self.apply_task_update(actor, id, move |_| update).await
    }

    /// Applies an update built from the locked task list.
    ///
    /// The update is constructed and applied under a single write lock,
    /// so positions derived from the current board cannot be invalidated
    /// by a concurrent mutation.
    async fn apply_task_update<F>(
        &self,
        actor: UserId,
        id: TaskId,
        make_update: F,
    ) -> BoardStoreResult<Task>
    where
        F: FnOnce(&[Task]) -> TaskUpdate + Send,
    {
        let (task, tasks, notifications, notified) = {
            let mut state = self.write_state()?;
            let actor_name = display_name(&state.users, actor);
            let index = state
                .tasks
                .iter()
                .position(|task| task.id() == id)
                .ok_or(BoardStoreError::TaskNotFound(id))?;
            let old_column = state
                .tasks
                .get(index)
                .map(Task::column)
                .ok_or(BoardStoreError::TaskNotFound(id))?;
            let update = make_update(&state.tasks);

            let (changes, title) = {
                let task = state
                    .tasks
                    .get_mut(index)
                    .ok_or(BoardStoreError::TaskNotFound(id))?;
                let changes = task.apply_update(update, actor, &*self.clock);
                (changes, task.title().to_owned())
            };

            let mut fresh = Vec::new();
            for change in &changes {
                match change {
                    FieldChange::Assignee {
                        new: Some(recipient),
                        ..
                    } => {
                        self.push_notification(
                            &mut fresh,
                            NotificationKind::Assignment,
                            actor,
                            &actor_name,
                            *recipient,
                            id,
                            &title,
                        )?;
                    }
                    FieldChange::Handler {
                        new: Some(recipient),
                        ..
                    } => {
                        self.push_notification(
                            &mut fresh,
                            NotificationKind::Handler,
                            actor,
                            &actor_name,
                            *recipient,
                            id,
                            &title,
                        )?;
                    }
                    _ => {}
                }
            }

            let column_changed = changes
                .iter()
                .any(|change| matches!(change, FieldChange::Column { .. }));
            if column_changed {
                ordering::renumber_column(&mut state.tasks, old_column);
            }

            let task = state
                .tasks
                .get(index)
                .cloned()
                .ok_or(BoardStoreError::TaskNotFound(id))?;
            let notified = !fresh.is_empty();
            state.notifications.append(&mut fresh);
            (
                task,
                state.tasks.clone(),
                state.notifications.clone(),
                notified,
            )
        };

        self.sync_tasks(tasks).await;
        if notified {
            self.sync_notifications(notifications).await;
        }
        Ok(task)
    }

    /// Moves a task to another column, placing it at the bottom.
    ///
    /// The target position is computed under the same write lock that
    /// applies the move, and the column and position changes land in the
    /// task history. Moving a task to the column it already occupies is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::TaskNotFound`] when the task does not
    /// exist.
    pub async fn update_task_column(
        &self,
        actor: UserId,
        id: TaskId,
        column: BoardColumn,
    ) -> BoardStoreResult<Task> {
        self.apply_task_update(actor, id, move |tasks| {
            let same_column = tasks
                .iter()
                .any(|task| task.id() == id && task.column() == column);
            if same_column {
                TaskUpdate::new()
            } else {
                TaskUpdate::new()
                    .column(column)
                    .position(ordering::next_position(tasks, column))
            }
        })
        .await
    }

    /// Moves a task to a new position within its column.
    ///
    /// Reordering the in-progress column is an admin-only operation.
    /// Out-of-range positions are clamped to `[1, column length]`; the
    /// tasks between the old and new slot shift by one toward the vacated
    /// slot.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::ReorderNotPermitted`] for non-admin
    /// reorders of the in-progress column and
    /// [`BoardStoreError::TaskNotFound`] when the task is not in the
    /// given column.
    pub async fn reorder_task_in_column(
        &self,
        actor: UserId,
        id: TaskId,
        requested_position: u32,
        column: BoardColumn,
    ) -> BoardStoreResult<Task> {
        let (task, tasks) = {
            let mut state = self.write_state()?;
            if column == BoardColumn::InProgress {
                let is_admin = state
                    .users
                    .iter()
                    .find(|user| user.id() == actor)
                    .is_some_and(|user| user.role().is_admin());
                if !is_admin {
                    return Err(BoardStoreError::ReorderNotPermitted);
                }
            }

            let old_position = state
                .tasks
                .iter()
                .find(|task| task.id() == id && task.column() == column)
                .map(Task::position)
                .ok_or(BoardStoreError::TaskNotFound(id))?;
            let len = ordering::column_len(&state.tasks, column);
            let new_position = requested_position.clamp(1, len.max(1));

            if new_position != old_position {
                ordering::shift_within_column(&mut state.tasks, column, id, old_position, new_position);
            }

            let task = state
                .tasks
                .iter()
                .find(|task| task.id() == id)
                .cloned()
                .ok_or(BoardStoreError::TaskNotFound(id))?;
            (task, state.tasks.clone())
        };

        self.sync_tasks(tasks).await;
        Ok(task)
    }

    /// Archives a task, removing it from the active board.
    ///
    /// The vacated column is renumbered to stay contiguous.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::TaskNotFound`] when the task does not
    /// exist.
    pub async fn archive_task(
        &self,
        actor: UserId,
        id: TaskId,
        reason: ArchiveReason,
    ) -> BoardStoreResult<ArchivedTask> {
        let (archived, tasks, archived_tasks) = {
            let mut state = self.write_state()?;
            let index = state
                .tasks
                .iter()
                .position(|task| task.id() == id)
                .ok_or(BoardStoreError::TaskNotFound(id))?;
            let task = state.tasks.remove(index);
            let column = task.column();
            ordering::renumber_column(&mut state.tasks, column);

            let archived = ArchivedTask::new(task, actor, reason, &*self.clock);
            state.archived_tasks.push(archived.clone());
            (archived, state.tasks.clone(), state.archived_tasks.clone())
        };

        self.sync_tasks(tasks).await;
        self.sync_archived_tasks(archived_tasks).await;
        Ok(archived)
    }

    /// Deletes a task from the board.
    ///
    /// Deletion is archival with the `deleted` reason; active tasks are
    /// never hard-deleted.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::TaskNotFound`] when the task does not
    /// exist.
    pub async fn delete_task(&self, actor: UserId, id: TaskId) -> BoardStoreResult<ArchivedTask> {
        self.archive_task(actor, id, ArchiveReason::Deleted).await
    }

    /// Restores an archived task to the active board.
    ///
    /// A deleted task returns to the todo column; a completed task keeps
    /// its original column. The restored task takes the bottom position
    /// of its destination column.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::ArchivedTaskNotFound`] when no archived
    /// snapshot exists for the task.
    pub async fn restore_task(&self, id: TaskId) -> BoardStoreResult<Task> {
        let (task, tasks, archived_tasks) = {
            let mut state = self.write_state()?;
            let index = state
                .archived_tasks
                .iter()
                .position(|archived| archived.task_id() == id)
                .ok_or(BoardStoreError::ArchivedTaskNotFound(id))?;
            let archived = state.archived_tasks.remove(index);
            let mut task = archived.into_restored();
            task.set_position(ordering::next_position(&state.tasks, task.column()));
            state.tasks.push(task.clone());
            (task, state.tasks.clone(), state.archived_tasks.clone())
        };

        self.sync_tasks(tasks).await;
        self.sync_archived_tasks(archived_tasks).await;
        Ok(task)
    }

    /// Appends a comment to a task.
    ///
    /// Tagged users (except the author) receive mention notifications;
    /// the assignee receives a comment notification when they are neither
    /// the author nor tagged.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::TaskNotFound`] when the task does not
    /// exist and [`BoardStoreError::Domain`] when the content is empty.
    pub async fn add_comment(
        &self,
        actor: UserId,
        task_id: TaskId,
        content: impl Into<String> + Send,
        tagged_users: Vec<UserId>,
    ) -> BoardStoreResult<TaskComment> {
        let (comment, tasks, notifications, notified) = {
            let mut state = self.write_state()?;
            let actor_name = display_name(&state.users, actor);
            let index = state
                .tasks
                .iter()
                .position(|task| task.id() == task_id)
                .ok_or(BoardStoreError::TaskNotFound(task_id))?;
            let (title, assignee) = state
                .tasks
                .get(index)
                .map(|task| (task.title().to_owned(), task.assignee()))
                .ok_or(BoardStoreError::TaskNotFound(task_id))?;

            let comment = TaskComment::new(actor, content, tagged_users, &*self.clock)?;

            let mut fresh = Vec::new();
            for &recipient in comment.tagged_users() {
                self.push_notification(
                    &mut fresh,
                    NotificationKind::Mention,
                    actor,
                    &actor_name,
                    recipient,
                    task_id,
                    &title,
                )?;
            }
            if let Some(recipient) = assignee {
                if recipient != actor && !comment.tagged_users().contains(&recipient) {
                    self.push_notification(
                        &mut fresh,
                        NotificationKind::Comment,
                        actor,
                        &actor_name,
                        recipient,
                        task_id,
                        &title,
                    )?;
                }
            }

            if let Some(task) = state.tasks.get_mut(index) {
                task.add_comment(comment.clone(), &*self.clock);
            }
            let notified = !fresh.is_empty();
            state.notifications.append(&mut fresh);
            (
                comment,
                state.tasks.clone(),
                state.notifications.clone(),
                notified,
            )
        };

        self.sync_tasks(tasks).await;
        if notified {
            self.sync_notifications(notifications).await;
        }
        Ok(comment)
    }

    /// Replaces the in-progress station of a task.
    ///
    /// A differing assignment records a `station_changed` history entry;
    /// an identical one is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::TaskNotFound`] when the task does not
    /// exist.
    pub async fn update_station(
        &self,
        actor: UserId,
        id: TaskId,
        station: Option<StationAssignment>,
    ) -> BoardStoreResult<Task> {
        let (task, tasks, changed) = {
            let mut state = self.write_state()?;
            let entry = state
                .tasks
                .iter_mut()
                .find(|task| task.id() == id)
                .ok_or(BoardStoreError::TaskNotFound(id))?;
            let changed = entry.change_station(station, actor, &*self.clock).is_some();
            let task = entry.clone();
            (task, state.tasks.clone(), changed)
        };

        if changed {
            self.sync_tasks(tasks).await;
        }
        Ok(task)
    }

    /// Replaces the handler of a task.
    ///
    /// A differing handler records a `handler_changed` history entry and
    /// notifies the new handler unless they are the acting user.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::TaskNotFound`] when the task does not
    /// exist.
    pub async fn update_handler(
        &self,
        actor: UserId,
        id: TaskId,
        handler: Option<UserId>,
    ) -> BoardStoreResult<Task> {
        let (task, tasks, notifications, changed, notified) = {
            let mut state = self.write_state()?;
            let actor_name = display_name(&state.users, actor);
            let entry = state
                .tasks
                .iter_mut()
                .find(|task| task.id() == id)
                .ok_or(BoardStoreError::TaskNotFound(id))?;
            let changed = entry.change_handler(handler, actor, &*self.clock).is_some();
            let title = entry.title().to_owned();
            let task = entry.clone();

            let mut fresh = Vec::new();
            if changed {
                if let Some(recipient) = handler {
                    self.push_notification(
                        &mut fresh,
                        NotificationKind::Handler,
                        actor,
                        &actor_name,
                        recipient,
                        id,
                        &title,
                    )?;
                }
            }
            let notified = !fresh.is_empty();
            state.notifications.append(&mut fresh);
            (
                task,
                state.tasks.clone(),
                state.notifications.clone(),
                changed,
                notified,
            )
        };

        if changed {
            self.sync_tasks(tasks).await;
        }
        if notified {
            self.sync_notifications(notifications).await;
        }
        Ok(task)
    }

    // ------------------------------------------------------------------
    // User management
    // ------------------------------------------------------------------

    /// Creates a user account. Admin only.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::AdminRequired`] for non-admin actors,
    /// [`BoardStoreError::DuplicateEmail`] when the address is taken, and
    /// [`BoardStoreError::Domain`] for invalid fields.
    pub async fn add_user(
        &self,
        actor: UserId,
        name: impl Into<String> + Send,
        email: EmailAddress,
        password: &str,
        role: UserRole,
    ) -> BoardStoreResult<User> {
        let (user, users) = {
            let mut state = self.write_state()?;
            require_admin(&state.users, actor)?;
            if state.users.iter().any(|user| *user.email() == email) {
                return Err(BoardStoreError::DuplicateEmail(email));
            }
            let user = User::new(name, email, PasswordHash::from_plaintext(password), role)?;
            state.users.push(user.clone());
            (user, state.users.clone())
        };

        self.sync_users(users).await;
        Ok(user)
    }

    /// Edits a user account. Admin only.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::DuplicateEmail`] when the requested
    /// address belongs to another account and
    /// [`BoardStoreError::OwnRoleChange`] when an admin tries to change
    /// their own role.
    pub async fn edit_user(
        &self,
        actor: UserId,
        target: UserId,
        update: UserUpdate,
    ) -> BoardStoreResult<User> {
        let (user, users) = {
            let mut state = self.write_state()?;
            require_admin(&state.users, actor)?;

            if let Some(email) = &update.email {
                let taken = state
                    .users
                    .iter()
                    .any(|user| user.id() != target && user.email() == email);
                if taken {
                    return Err(BoardStoreError::DuplicateEmail(email.clone()));
                }
            }

            let account = state
                .users
                .iter_mut()
                .find(|user| user.id() == target)
                .ok_or(BoardStoreError::UserNotFound(target))?;

            if let Some(role) = update.role {
                if target == actor && role != account.role() {
                    return Err(BoardStoreError::OwnRoleChange);
                }
            }

            if let Some(name) = update.name {
                account.set_name(name)?;
            }
            if let Some(email) = update.email {
                account.set_email(email);
            }
            if let Some(password) = update.password {
                account.set_password_hash(PasswordHash::from_plaintext(&password));
            }
            if let Some(avatar_url) = update.avatar_url {
                account.set_avatar_url(avatar_url);
            }
            if let Some(role) = update.role {
                account.set_role(role);
            }

            let user = account.clone();
            (user, state.users.clone())
        };

        self.sync_users(users).await;
        Ok(user)
    }

    /// Deletes a user account. Admin only.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::SelfDeletion`] when the target is the
    /// acting admin and [`BoardStoreError::UserHasActiveTasks`] when the
    /// target is assignee or handler on any task outside the done column.
    /// Either failure leaves the user list unchanged.
    pub async fn delete_user(&self, actor: UserId, target: UserId) -> BoardStoreResult<()> {
        let users = {
            let mut state = self.write_state()?;
            require_admin(&state.users, actor)?;
            if target == actor {
                return Err(BoardStoreError::SelfDeletion);
            }
            if state.tasks.iter().any(|task| task.occupies(target)) {
                return Err(BoardStoreError::UserHasActiveTasks(target));
            }
            let index = state
                .users
                .iter()
                .position(|user| user.id() == target)
                .ok_or(BoardStoreError::UserNotFound(target))?;
            state.users.remove(index);
            state.users.clone()
        };

        self.sync_users(users).await;
        Ok(())
    }

    /// Resolves a user from an email/password pair.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::InvalidCredentials`] when the pair does
    /// not match an account; the error does not distinguish unknown
    /// addresses from wrong passwords.
    pub fn login(&self, email: &str, password: &str) -> BoardStoreResult<User> {
        let address = EmailAddress::new(email).map_err(|_| BoardStoreError::InvalidCredentials)?;
        let state = self.read_state()?;
        state
            .users
            .iter()
            .find(|user| *user.email() == address && user.password_hash().verify(password))
            .cloned()
            .ok_or(BoardStoreError::InvalidCredentials)
    }

    // ------------------------------------------------------------------
    // Notifications
    // ------------------------------------------------------------------

    /// Marks a notification as read.
    ///
    /// Read state is a local-only flip; it is not written through until
    /// the next notification fan-out persists the collection.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::NotificationNotFound`] when the
    /// notification does not exist.
    pub fn mark_notification_read(&self, id: NotificationId) -> BoardStoreResult<()> {
        let mut state = self.write_state()?;
        let notification = state
            .notifications
            .iter_mut()
            .find(|notification| notification.id() == id)
            .ok_or(BoardStoreError::NotificationNotFound(id))?;
        notification.mark_read();
        Ok(())
    }

    /// Marks every notification addressed to a user as read.
    ///
    /// Local-only, like [`BoardService::mark_notification_read`].
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::StatePoisoned`] when the state lock is
    /// poisoned.
    pub fn mark_all_notifications_read(&self, user: UserId) -> BoardStoreResult<()> {
        let mut state = self.write_state()?;
        for notification in state
            .notifications
            .iter_mut()
            .filter(|notification| notification.to_user() == user)
        {
            notification.mark_read();
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Sticky notes
    // ------------------------------------------------------------------

    /// Creates a sticky note for a user.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::Domain`] when the content is empty.
    pub async fn add_sticky_note(
        &self,
        owner: UserId,
        content: impl Into<String> + Send,
        color: impl Into<String> + Send,
    ) -> BoardStoreResult<StickyNote> {
        let (note, sticky_notes) = {
            let mut state = self.write_state()?;
            let note = StickyNote::new(owner, content, color, &*self.clock)?;
            state.sticky_notes.push(note.clone());
            (note, state.sticky_notes.clone())
        };

        self.sync_sticky_notes(sticky_notes).await;
        Ok(note)
    }

    /// Rewrites a sticky note. Owner only.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::NotNoteOwner`] when the actor does not
    /// own the note.
    pub async fn update_sticky_note(
        &self,
        actor: UserId,
        id: StickyNoteId,
        content: impl Into<String> + Send,
        color: impl Into<String> + Send,
    ) -> BoardStoreResult<StickyNote> {
        let (note, sticky_notes) = {
            let mut state = self.write_state()?;
            let entry = state
                .sticky_notes
                .iter_mut()
                .find(|note| note.id() == id)
                .ok_or(BoardStoreError::StickyNoteNotFound(id))?;
            if entry.owner() != actor {
                return Err(BoardStoreError::NotNoteOwner);
            }
            entry.edit(content, color, &*self.clock)?;
            let note = entry.clone();
            (note, state.sticky_notes.clone())
        };

        self.sync_sticky_notes(sticky_notes).await;
        Ok(note)
    }

    /// Deletes a sticky note. Owner only.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::NotNoteOwner`] when the actor does not
    /// own the note.
    pub async fn delete_sticky_note(
        &self,
        actor: UserId,
        id: StickyNoteId,
    ) -> BoardStoreResult<()> {
        let sticky_notes = {
            let mut state = self.write_state()?;
            let index = state
                .sticky_notes
                .iter()
                .position(|note| note.id() == id)
                .ok_or(BoardStoreError::StickyNoteNotFound(id))?;
            let owner = state
                .sticky_notes
                .get(index)
                .map(StickyNote::owner)
                .ok_or(BoardStoreError::StickyNoteNotFound(id))?;
            if owner != actor {
                return Err(BoardStoreError::NotNoteOwner);
            }
            state.sticky_notes.remove(index);
            state.sticky_notes.clone()
        };

        self.sync_sticky_notes(sticky_notes).await;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Read accessors
    // ------------------------------------------------------------------

    /// Returns all active tasks.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::StatePoisoned`] when the state lock is
    /// poisoned.
    pub fn tasks(&self) -> BoardStoreResult<Vec<Task>> {
        Ok(self.read_state()?.tasks.clone())
    }

    /// Returns all user accounts.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::StatePoisoned`] when the state lock is
    /// poisoned.
    pub fn users(&self) -> BoardStoreResult<Vec<User>> {
        Ok(self.read_state()?.users.clone())
    }

    /// Returns all archived task snapshots.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::StatePoisoned`] when the state lock is
    /// poisoned.
    pub fn archived_tasks(&self) -> BoardStoreResult<Vec<ArchivedTask>> {
        Ok(self.read_state()?.archived_tasks.clone())
    }

    /// Returns the notifications addressed to a user, newest last.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::StatePoisoned`] when the state lock is
    /// poisoned.
    pub fn notifications_for(&self, user: UserId) -> BoardStoreResult<Vec<Notification>> {
        Ok(self
            .read_state()?
            .notifications
            .iter()
            .filter(|notification| notification.to_user() == user)
            .cloned()
            .collect())
    }

    /// Returns the sticky notes owned by a user.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::StatePoisoned`] when the state lock is
    /// poisoned.
    pub fn sticky_notes_for(&self, owner: UserId) -> BoardStoreResult<Vec<StickyNote>> {
        Ok(self
            .read_state()?
            .sticky_notes
            .iter()
            .filter(|note| note.owner() == owner)
            .cloned()
            .collect())
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn read_state(&self) -> BoardStoreResult<RwLockReadGuard<'_, BoardSnapshot>> {
        self.state.read().map_err(|_| BoardStoreError::StatePoisoned)
    }

    fn write_state(&self) -> BoardStoreResult<RwLockWriteGuard<'_, BoardSnapshot>> {
        self.state
            .write()
            .map_err(|_| BoardStoreError::StatePoisoned)
    }

    #[expect(
        clippy::too_many_arguments,
        reason = "notification construction needs the full fan-out context"
    )]
    fn push_notification(
        &self,
        fresh: &mut Vec<Notification>,
        kind: NotificationKind,
        actor: UserId,
        actor_name: &str,
        recipient: UserId,
        task_id: TaskId,
        title: &str,
    ) -> BoardStoreResult<()> {
        if recipient == actor {
            return Ok(());
        }
        let message = messages::render(kind, actor_name, title)?;
        if let Some(notification) =
            Notification::new(kind, actor, recipient, task_id, message, &*self.clock)
        {
            fresh.push(notification);
        }
        Ok(())
    }

    async fn sync_users(&self, users: Vec<User>) {
        if let Err(error) = self.repository.replace_users(&users).await {
            self.observer
                .persistence_failed(BoardCollection::Users, &error);
        }
    }

    async fn sync_tasks(&self, tasks: Vec<Task>) {
        if let Err(error) = self.repository.replace_tasks(&tasks).await {
            self.observer
                .persistence_failed(BoardCollection::Tasks, &error);
        }
    }

    async fn sync_notifications(&self, notifications: Vec<Notification>) {
        if let Err(error) = self.repository.replace_notifications(&notifications).await {
            self.observer
                .persistence_failed(BoardCollection::Notifications, &error);
        }
    }

    async fn sync_archived_tasks(&self, archived_tasks: Vec<ArchivedTask>) {
        if let Err(error) = self
            .repository
            .replace_archived_tasks(&archived_tasks)
            .await
        {
            self.observer
                .persistence_failed(BoardCollection::ArchivedTasks, &error);
        }
    }

    async fn sync_sticky_notes(&self, sticky_notes: Vec<StickyNote>) {
        if let Err(error) = self.repository.replace_sticky_notes(&sticky_notes).await {
            self.observer
                .persistence_failed(BoardCollection::StickyNotes, &error);
        }
    }
}

/// Resolves a user's display name, falling back to the raw identifier.
fn display_name(users: &[User], id: UserId) -> String {
    users
        .iter()
        .find(|user| user.id() == id)
        .map_or_else(|| id.to_string(), |user| user.name().to_owned())
}

fn require_admin(users: &[User], actor: UserId) -> BoardStoreResult<()> {
    let role = users
        .iter()
        .find(|user| user.id() == actor)
        .map(User::role)
        .ok_or(BoardStoreError::UserNotFound(actor))?;
    if role.is_admin() {
        Ok(())
    } else {
        Err(BoardStoreError::AdminRequired)
    }
}
