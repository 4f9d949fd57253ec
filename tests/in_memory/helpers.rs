//! Shared helpers for in-memory integration tests.

use luach::board::{
    adapters::memory::{InMemoryBoardRepository, demo_snapshot},
    domain::User,
    ports::NullSyncObserver,
    services::BoardService,
};
use mockable::DefaultClock;
use rstest::fixture;
use std::sync::Arc;

/// Board service type used by the integration tests.
pub type DemoBoard = BoardService<InMemoryBoardRepository, DefaultClock>;

/// Seeded demo board with its backing repository.
pub struct DemoFixture {
    /// Service over the demo dataset.
    pub service: DemoBoard,
    /// Repository the service writes through to.
    pub repository: InMemoryBoardRepository,
}

/// Provides a board service loaded from a demo-seeded repository.
#[fixture]
pub fn demo_board() -> DemoFixture {
    let snapshot = demo_snapshot(&DefaultClock).expect("demo dataset should build");
    let repository = InMemoryBoardRepository::with_snapshot(snapshot.clone());
    let service = BoardService::with_snapshot(
        snapshot,
        Arc::new(repository.clone()),
        Arc::new(DefaultClock),
        Arc::new(NullSyncObserver),
    );
    DemoFixture {
        service,
        repository,
    }
}

/// Resolves a demo account through the login path.
pub fn login(board: &DemoBoard, email: &str) -> User {
    board
        .login(email, "123456")
        .expect("demo credentials should resolve")
}
