//! Repository port for one-time-code storage.

use crate::auth::domain::{CodeDigits, OtpCode, OtpCodeId};
use crate::board::domain::EmailAddress;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for code repository operations.
pub type OtpRepositoryResult<T> = Result<T, OtpRepositoryError>;

/// One-time-code persistence contract.
#[async_trait]
pub trait OtpRepository: Send + Sync {
    /// Stores a freshly issued code.
    ///
    /// # Errors
    ///
    /// Returns [`OtpRepositoryError::Persistence`] when the write fails.
    async fn store(&self, code: &OtpCode) -> OtpRepositoryResult<()>;

    /// Finds the newest unconsumed, unexpired code matching the address
    /// and digits at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`OtpRepositoryError::Persistence`] when the lookup fails.
    async fn find_active(
        &self,
        email: &EmailAddress,
        digits: &CodeDigits,
        now: DateTime<Utc>,
    ) -> OtpRepositoryResult<Option<OtpCode>>;

    /// Marks a stored code as consumed.
    ///
    /// # Errors
    ///
    /// Returns [`OtpRepositoryError::Persistence`] when the update fails.
    async fn mark_consumed(&self, id: OtpCodeId) -> OtpRepositoryResult<()>;
}

/// Errors returned by code repository implementations.
#[derive(Debug, Clone, Error)]
pub enum OtpRepositoryError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl OtpRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
