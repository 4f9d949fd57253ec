//! `PostgreSQL` board repository integration tests.
//!
//! The board repository replaces whole collections on write-through, so
//! the interesting cases are the round trip of every document type, the
//! upsert of a changed document, and the deletion of documents missing
//! from a replacement snapshot.

use luach::board::{
    domain::{
        ArchiveReason, ArchivedTask, BoardColumn, EmailAddress, NewTaskData, Notification,
        NotificationKind, PasswordHash, StickyNote, Task, TaskComment, TaskUpdate, User, UserId,
        UserRole,
    },
    ports::{BoardRepository, BoardSnapshot},
};
use mockable::DefaultClock;
use rstest::rstest;

use crate::postgres::helpers::{BoardPgContext, BoxError, board_context};

fn sample_user(name: &str, email: &str, role: UserRole) -> Result<User, BoxError> {
    let user = User::new(
        name,
        EmailAddress::new(email)?,
        PasswordHash::from_plaintext("123456"),
        role,
    )?;
    Ok(user)
}

fn sample_task(title: &str, position: u32, actor: UserId) -> Result<Task, BoxError> {
    let task = Task::new(
        NewTaskData {
            title: title.to_owned(),
            column: BoardColumn::Todo,
            ..NewTaskData::default()
        },
        position,
        actor,
        &DefaultClock,
    )?;
    Ok(task)
}

/// Builds a snapshot with every collection populated.
fn sample_snapshot() -> Result<BoardSnapshot, BoxError> {
    let clock = DefaultClock;
    let admin = sample_user("Dana", "dana@example.com", UserRole::Admin)?;
    let member = sample_user("Noam", "noam@example.com", UserRole::User)?;

    let mut commented = sample_task("Order blanking dies", 1, admin.id())?;
    commented.add_comment(
        TaskComment::new(member.id(), "Quoted by two suppliers", vec![admin.id()], &clock)?,
        &clock,
    );
    let plain = sample_task("Calibrate press", 2, admin.id())?;

    let notification = Notification::new(
        NotificationKind::Mention,
        member.id(),
        admin.id(),
        commented.id(),
        "Noam tagged you on Order blanking dies",
        &clock,
    )
    .ok_or("notification fan-out rejected distinct users")?;

    let archived = ArchivedTask::new(
        sample_task("Retired fixture", 3, admin.id())?,
        admin.id(),
        ArchiveReason::Deleted,
        &clock,
    );

    let note = StickyNote::new(member.id(), "Call the anodizer", "yellow", &clock)?;

    Ok(BoardSnapshot {
        users: vec![admin, member],
        tasks: vec![commented, plain],
        notifications: vec![notification],
        archived_tasks: vec![archived],
        sticky_notes: vec![note],
    })
}

async fn store_snapshot(
    repository: &impl BoardRepository,
    snapshot: &BoardSnapshot,
) -> Result<(), BoxError> {
    repository.replace_users(&snapshot.users).await?;
    repository.replace_tasks(&snapshot.tasks).await?;
    repository
        .replace_notifications(&snapshot.notifications)
        .await?;
    repository
        .replace_archived_tasks(&snapshot.archived_tasks)
        .await?;
    repository
        .replace_sticky_notes(&snapshot.sticky_notes)
        .await?;
    Ok(())
}

fn sort_snapshot(snapshot: &mut BoardSnapshot) {
    snapshot.users.sort_by_key(|user| user.id().into_inner());
    snapshot.tasks.sort_by_key(|task| task.id().into_inner());
    snapshot
        .notifications
        .sort_by_key(|notification| notification.id().into_inner());
    snapshot
        .archived_tasks
        .sort_by_key(|archived| archived.task_id().into_inner());
    snapshot
        .sticky_notes
        .sort_by_key(|note| note.id().into_inner());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn every_collection_round_trips_through_the_database(
    #[future] board_context: Result<BoardPgContext, BoxError>,
) -> Result<(), BoxError> {
    let context = board_context.await?;
    let mut snapshot = sample_snapshot()?;
    store_snapshot(&context.repository, &snapshot).await?;

    let mut loaded = context.repository.load().await?;
    sort_snapshot(&mut snapshot);
    sort_snapshot(&mut loaded);

    assert_eq!(loaded.users, snapshot.users);
    assert_eq!(loaded.tasks, snapshot.tasks);
    assert_eq!(loaded.notifications, snapshot.notifications);
    assert_eq!(loaded.archived_tasks, snapshot.archived_tasks);
    assert_eq!(loaded.sticky_notes, snapshot.sticky_notes);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn replacing_a_changed_document_updates_in_place(
    #[future] board_context: Result<BoardPgContext, BoxError>,
) -> Result<(), BoxError> {
    let context = board_context.await?;
    let actor = UserId::new();
    let mut task = sample_task("Draft jig drawing", 1, actor)?;
    context.repository.replace_tasks(&[task.clone()]).await?;

    let changes = task.apply_update(
        TaskUpdate::new().title("Approve jig drawing"),
        actor,
        &DefaultClock,
    );
    assert!(!changes.is_empty());
    context.repository.replace_tasks(&[task.clone()]).await?;

    let loaded = context.repository.load().await?;
    assert_eq!(loaded.tasks, vec![task]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn documents_missing_from_a_replacement_are_deleted(
    #[future] board_context: Result<BoardPgContext, BoxError>,
) -> Result<(), BoxError> {
    let context = board_context.await?;
    let actor = UserId::new();
    let keeper = sample_task("Keep", 1, actor)?;
    let goner = sample_task("Drop", 2, actor)?;
    context
        .repository
        .replace_tasks(&[keeper.clone(), goner])
        .await?;

    context.repository.replace_tasks(&[keeper.clone()]).await?;
    let after_shrink = context.repository.load().await?;
    assert_eq!(after_shrink.tasks, vec![keeper]);

    context.repository.replace_tasks(&[]).await?;
    let after_clear = context.repository.load().await?;
    assert!(after_clear.tasks.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn clearing_one_collection_leaves_the_others_intact(
    #[future] board_context: Result<BoardPgContext, BoxError>,
) -> Result<(), BoxError> {
    let context = board_context.await?;
    let snapshot = sample_snapshot()?;
    store_snapshot(&context.repository, &snapshot).await?;

    context.repository.replace_sticky_notes(&[]).await?;

    let loaded = context.repository.load().await?;
    assert!(loaded.sticky_notes.is_empty());
    assert_eq!(loaded.users.len(), snapshot.users.len());
    assert_eq!(loaded.tasks.len(), snapshot.tasks.len());
    assert_eq!(loaded.notifications.len(), snapshot.notifications.len());
    assert_eq!(loaded.archived_tasks.len(), snapshot.archived_tasks.len());
    Ok(())
}
