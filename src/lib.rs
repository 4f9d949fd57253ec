//! Luach: Hebrew-localised kanban task management backend.
//!
//! This crate provides the state and synchronisation core for a kanban
//! board application: task lifecycle with per-field history, notification
//! fan-out, archival, sticky notes, one-time-code authentication, and
//! request rate limiting.
//!
//! # Architecture
//!
//! Luach follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, mailers)
//!
//! The board service owns the whole application state in memory, applies
//! every mutation optimistically, and writes full-collection snapshots
//! through to the configured repository. Write-through failures are
//! reported through an observer port rather than surfaced to callers;
//! the local state remains authoritative.
//!
//! # Modules
//!
//! - [`board`]: Task board state, history, notifications, and archival
//! - [`auth`]: One-time-code issuance and verification
//! - [`ratelimit`]: Fixed-window request rate limiting
//! - [`config`]: Persistence backend selection

pub mod auth;
pub mod board;
pub mod config;
pub mod ratelimit;

#[cfg(test)]
pub(crate) mod test_support;
