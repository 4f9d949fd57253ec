//! In-memory adapters for board persistence.

mod repository;
mod seed;

pub use repository::InMemoryBoardRepository;
pub use seed::demo_snapshot;
