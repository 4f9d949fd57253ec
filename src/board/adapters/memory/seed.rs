//! Seeded demo board used when no database is configured.

use crate::board::{
    domain::{
        BoardColumn, BoardDomainError, EmailAddress, NewTaskData, PasswordHash, Priority, Station,
        StationAssignment, StickyNote, Task, User, UserRole, WorkflowStatus,
    },
    ports::BoardSnapshot,
};
use mockable::Clock;

/// Builds the demo board: three users, a handful of tasks spread across
/// the columns, and one sticky note. All demo accounts share the
/// password `123456`.
///
/// # Errors
///
/// Returns [`BoardDomainError`] when a seed value fails domain
/// validation; the fixed dataset below is expected to pass.
pub fn demo_snapshot(clock: &impl Clock) -> Result<BoardSnapshot, BoardDomainError> {
    let password = PasswordHash::from_plaintext("123456");

    let admin = User::new(
        "נועה לוי",
        EmailAddress::new("noa@example.com")?,
        password.clone(),
        UserRole::Admin,
    )?;
    let member = User::new(
        "אבי כהן",
        EmailAddress::new("avi@example.com")?,
        password.clone(),
        UserRole::User,
    )?;
    let viewer = User::new(
        "דנה מזרחי",
        EmailAddress::new("dana@example.com")?,
        password,
        UserRole::Viewer,
    )?;

    let tasks = vec![
        Task::new(
            NewTaskData {
                title: "אפיון מסך הבית".to_owned(),
                description: Some("לרכז דרישות מכל הצוותים".to_owned()),
                column: BoardColumn::Todo,
                status: WorkflowStatus::Todo,
                priority: Priority::High,
                assignee: Some(member.id()),
                ..NewTaskData::default()
            },
            1,
            admin.id(),
            clock,
        )?,
        Task::new(
            NewTaskData {
                title: "עדכון טקסטים באתר".to_owned(),
                column: BoardColumn::Todo,
                status: WorkflowStatus::Todo,
                priority: Priority::Low,
                ..NewTaskData::default()
            },
            2,
            admin.id(),
            clock,
        )?,
        Task::new(
            NewTaskData {
                title: "פיתוח מודול ההתראות".to_owned(),
                column: BoardColumn::InProgress,
                status: WorkflowStatus::InProgress,
                priority: Priority::High,
                assignee: Some(member.id()),
                handler: Some(admin.id()),
                station: Some(
                    StationAssignment::new(Station::Development).with_note("ממתין לסקירת קוד"),
                ),
                ..NewTaskData::default()
            },
            1,
            admin.id(),
            clock,
        )?,
        Task::new(
            NewTaskData {
                title: "עיצוב לוגו חדש".to_owned(),
                column: BoardColumn::InProgress,
                status: WorkflowStatus::OnHold,
                priority: Priority::Medium,
                station: Some(StationAssignment::new(Station::Design)),
                ..NewTaskData::default()
            },
            2,
            admin.id(),
            clock,
        )?,
        Task::new(
            NewTaskData {
                title: "הקמת סביבת בדיקות".to_owned(),
                column: BoardColumn::Done,
                status: WorkflowStatus::Done,
                priority: Priority::Medium,
                assignee: Some(member.id()),
                ..NewTaskData::default()
            },
            1,
            admin.id(),
            clock,
        )?,
    ];

    let sticky_notes = vec![StickyNote::new(
        admin.id(),
        "לתאם פגישת צוות ליום ראשון",
        "yellow",
        clock,
    )?];

    Ok(BoardSnapshot {
        users: vec![admin, member, viewer],
        tasks,
        notifications: Vec::new(),
        archived_tasks: Vec::new(),
        sticky_notes,
    })
}
