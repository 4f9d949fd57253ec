//! End-to-end board sessions over the seeded demo dataset.

use super::helpers::{DemoFixture, demo_board, login};
use luach::board::domain::{
    ArchiveReason, BoardColumn, NewTaskData, NotificationKind, Task, TaskUpdate,
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_full_task_session_round_trips_through_the_repository(demo_board: DemoFixture) {
    let admin = login(&demo_board.service, "noa@example.com");
    let member = login(&demo_board.service, "avi@example.com");

    let task = demo_board
        .service
        .add_task(
            admin.id(),
            NewTaskData {
                title: "בדיקת אינטגרציה".to_owned(),
                assignee: Some(member.id()),
                ..NewTaskData::default()
            },
        )
        .await
        .expect("task creation should succeed");

    demo_board
        .service
        .update_task_column(admin.id(), task.id(), BoardColumn::InProgress)
        .await
        .expect("column move should succeed");
    demo_board
        .service
        .add_comment(member.id(), task.id(), "מתחיל לעבוד", vec![admin.id()])
        .await
        .expect("comment should succeed");

    // the remote snapshot tracks every write
    let persisted = demo_board
        .repository
        .snapshot()
        .expect("snapshot readable");
    let persisted_task = persisted
        .tasks
        .iter()
        .find(|candidate| candidate.id() == task.id())
        .expect("task should be written through");
    assert_eq!(persisted_task.column(), BoardColumn::InProgress);
    assert_eq!(persisted_task.comments().len(), 1);

    let admin_inbox = demo_board
        .service
        .notifications_for(admin.id())
        .expect("state readable");
    assert!(
        admin_inbox
            .iter()
            .any(|notification| notification.kind() == NotificationKind::Mention)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn archive_and_restore_round_trip_keeps_columns_contiguous(demo_board: DemoFixture) {
    let admin = login(&demo_board.service, "noa@example.com");
    let target = demo_board
        .service
        .tasks()
        .expect("state readable")
        .into_iter()
        .find(|task| task.column() == BoardColumn::InProgress)
        .expect("demo data has in-progress tasks");

    demo_board
        .service
        .archive_task(admin.id(), target.id(), ArchiveReason::Deleted)
        .await
        .expect("archive should succeed");
    let restored = demo_board
        .service
        .restore_task(target.id())
        .await
        .expect("restore should succeed");

    assert_eq!(restored.column(), BoardColumn::Todo);

    let tasks = demo_board.service.tasks().expect("state readable");
    for column in [
        BoardColumn::Todo,
        BoardColumn::InProgress,
        BoardColumn::Done,
    ] {
        let mut positions: Vec<u32> = tasks
            .iter()
            .filter(|task| task.column() == column)
            .map(Task::position)
            .collect();
        positions.sort_unstable();
        let expected: Vec<u32> =
            (1..=u32::try_from(positions.len()).expect("small collection")).collect();
        assert_eq!(positions, expected, "column {column:?} lost contiguity");
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn viewer_sessions_can_read_but_not_administer(demo_board: DemoFixture) {
    let viewer = login(&demo_board.service, "dana@example.com");

    assert!(!demo_board.service.tasks().expect("state readable").is_empty());

    let result = demo_board
        .service
        .delete_user(viewer.id(), viewer.id())
        .await;
    assert!(result.is_err());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn updates_from_one_session_are_visible_after_reload(
    demo_board: DemoFixture,
) -> Result<(), eyre::Report> {
    let admin = login(&demo_board.service, "noa@example.com");
    let task = demo_board
        .service
        .add_task(
            admin.id(),
            NewTaskData {
                title: "נשמר לטעינה הבאה".to_owned(),
                ..NewTaskData::default()
            },
        )
        .await?;
    demo_board
        .service
        .update_task(
            admin.id(),
            task.id(),
            TaskUpdate::new().description(Some("פרטים".to_owned())),
        )
        .await?;

    // a fresh service over the same repository sees the persisted state
    let reloaded = luach::board::services::BoardService::load(
        std::sync::Arc::new(demo_board.repository.clone()),
        std::sync::Arc::new(mockable::DefaultClock),
        std::sync::Arc::new(luach::board::ports::NullSyncObserver),
    )
    .await?;

    let tasks = reloaded.tasks()?;
    let found = tasks
        .iter()
        .find(|candidate| candidate.id() == task.id())
        .ok_or_else(|| eyre::eyre!("task missing after reload"))?;
    eyre::ensure!(found.description() == Some("פרטים"), "description lost");
    eyre::ensure!(found.history().len() == 2, "history entries lost");
    Ok(())
}
