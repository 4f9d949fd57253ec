//! Board application services.

mod messages;
mod ordering;
mod store;

pub use store::{BoardService, BoardStoreError, BoardStoreResult, UserUpdate};
