//! Shared fixtures for board tests.

use crate::board::{
    adapters::memory::InMemoryBoardRepository,
    domain::{EmailAddress, PasswordHash, User, UserId, UserRole},
    ports::{
        BoardCollection, BoardRepository, BoardRepositoryError, BoardRepositoryResult,
        BoardSnapshot, NullSyncObserver, SyncObserver,
    },
    services::BoardService,
};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

pub(crate) use crate::test_support::ManualClock;

/// Observer that records which collections failed to persist.
#[derive(Default)]
pub(crate) struct RecordingObserver {
    failures: Mutex<Vec<BoardCollection>>,
}

impl RecordingObserver {
    pub(crate) fn failures(&self) -> Vec<BoardCollection> {
        self.failures.lock().unwrap().clone()
    }
}

impl SyncObserver for RecordingObserver {
    fn persistence_failed(&self, collection: BoardCollection, _error: &BoardRepositoryError) {
        self.failures.lock().unwrap().push(collection);
    }
}

/// Repository whose writes always fail.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct FailingRepository;

fn write_failure() -> BoardRepositoryError {
    BoardRepositoryError::persistence(std::io::Error::other("injected write failure"))
}

#[async_trait]
impl BoardRepository for FailingRepository {
    async fn load(&self) -> BoardRepositoryResult<BoardSnapshot> {
        Err(write_failure())
    }

    async fn replace_users(&self, _users: &[crate::board::domain::User]) -> BoardRepositoryResult<()> {
        Err(write_failure())
    }

    async fn replace_tasks(&self, _tasks: &[crate::board::domain::Task]) -> BoardRepositoryResult<()> {
        Err(write_failure())
    }

    async fn replace_notifications(
        &self,
        _notifications: &[crate::board::domain::Notification],
    ) -> BoardRepositoryResult<()> {
        Err(write_failure())
    }

    async fn replace_archived_tasks(
        &self,
        _archived_tasks: &[crate::board::domain::ArchivedTask],
    ) -> BoardRepositoryResult<()> {
        Err(write_failure())
    }

    async fn replace_sticky_notes(
        &self,
        _sticky_notes: &[crate::board::domain::StickyNote],
    ) -> BoardRepositoryResult<()> {
        Err(write_failure())
    }
}

/// Board service wired to an in-memory repository and a manual clock,
/// seeded with one user per role.
pub(crate) struct TestBoard {
    pub(crate) service: BoardService<InMemoryBoardRepository, ManualClock>,
    pub(crate) repository: InMemoryBoardRepository,
    pub(crate) clock: Arc<ManualClock>,
    pub(crate) admin: UserId,
    pub(crate) member: UserId,
    pub(crate) viewer: UserId,
}

pub(crate) fn test_user(name: &str, email: &str, role: UserRole) -> User {
    User::new(
        name,
        EmailAddress::new(email).unwrap(),
        PasswordHash::from_plaintext("123456"),
        role,
    )
    .unwrap()
}

pub(crate) fn board() -> TestBoard {
    let admin = test_user("Admin", "admin@example.com", UserRole::Admin);
    let member = test_user("Member", "member@example.com", UserRole::User);
    let viewer = test_user("Viewer", "viewer@example.com", UserRole::Viewer);
    let (admin_id, member_id, viewer_id) = (admin.id(), member.id(), viewer.id());

    let snapshot = BoardSnapshot {
        users: vec![admin, member, viewer],
        ..BoardSnapshot::default()
    };
    let repository = InMemoryBoardRepository::with_snapshot(snapshot.clone());
    let clock = Arc::new(ManualClock::default());
    let service = BoardService::with_snapshot(
        snapshot,
        Arc::new(repository.clone()),
        Arc::clone(&clock),
        Arc::new(NullSyncObserver),
    );

    TestBoard {
        service,
        repository,
        clock,
        admin: admin_id,
        member: member_id,
        viewer: viewer_id,
    }
}
