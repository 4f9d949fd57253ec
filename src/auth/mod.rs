//! One-time-code login: issuance, delivery, and verification.
//!
//! Codes are six decimal digits valid for ten minutes and single-use.
//! Verification never distinguishes a wrong code from an expired or
//! consumed one. The module follows hexagonal architecture:
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
