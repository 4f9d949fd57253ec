//! Shared task board: state container, mutations, and persistence.
//!
//! The board holds users, tasks (with embedded comments and history),
//! notifications, archived tasks, and sticky notes. Mutations apply to
//! the in-memory state first and write the affected collections through
//! to the configured repository; persistence failures surface through an
//! observer port instead of failing the mutation. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
