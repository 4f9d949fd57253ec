//! Persistence backend selection.
//!
//! The board runs against PostgreSQL when a database URL is configured
//! and falls back to the seeded in-memory adapter otherwise. The fallback
//! is a demo dataset, not a resilience mechanism: persistence calls on it
//! succeed without reaching any backend.

use std::env;

/// Environment variable naming the PostgreSQL connection string.
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Selected persistence backend for the board repositories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceConfig {
    /// PostgreSQL backend reachable at the given connection URL.
    Postgres {
        /// Connection string passed to the r2d2 pool.
        database_url: String,
    },
    /// No backend configured; use the seeded in-memory adapter.
    Seeded,
}

impl PersistenceConfig {
    /// Reads the backend selection from the process environment.
    ///
    /// An unset or empty `DATABASE_URL` selects the seeded in-memory
    /// fallback.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_database_url(env::var(DATABASE_URL_VAR).ok())
    }

    /// Selects the backend for an optional connection string.
    #[must_use]
    pub fn from_database_url(database_url: Option<String>) -> Self {
        match database_url {
            Some(url) if !url.trim().is_empty() => Self::Postgres { database_url: url },
            _ => Self::Seeded,
        }
    }

    /// Returns `true` when a real backend is configured.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        matches!(self, Self::Postgres { .. })
    }
}
