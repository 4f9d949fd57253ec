//! Adapter implementations for one-time-code authentication.

pub mod memory;
pub mod postgres;
