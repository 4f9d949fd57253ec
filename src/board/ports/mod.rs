//! Port contracts for board persistence and synchronisation reporting.
//!
//! Ports define infrastructure-agnostic interfaces used by board
//! services.

pub mod events;
pub mod repository;

pub use events::{BoardCollection, NullSyncObserver, SyncObserver};
pub use repository::{BoardRepository, BoardRepositoryError, BoardRepositoryResult, BoardSnapshot};
