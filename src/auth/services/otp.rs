//! One-time-code issuance and verification.

use crate::auth::{
    domain::{CodeDigits, OtpCode},
    ports::{CodeMailer, CodeMailerError, OtpRepository, OtpRepositoryError},
};
use crate::board::domain::EmailAddress;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for the one-time-code flow.
///
/// Verification failures collapse into a single public message: the
/// caller never learns whether the code was wrong, expired, or already
/// used.
#[derive(Debug, Error)]
pub enum OtpAuthError {
    /// The candidate did not match an active code.
    #[error("Invalid or expired code")]
    InvalidOrExpired,

    /// Code storage failed.
    #[error(transparent)]
    Repository(#[from] OtpRepositoryError),

    /// Code delivery failed.
    #[error(transparent)]
    Mailer(#[from] CodeMailerError),
}

/// Result type for one-time-code operations.
pub type OtpAuthResult<T> = Result<T, OtpAuthError>;

/// Orchestrates code issuance and verification.
pub struct OtpService<R, M, C>
where
    R: OtpRepository,
    M: CodeMailer,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    mailer: Arc<M>,
    clock: Arc<C>,
}

impl<R, M, C> OtpService<R, M, C>
where
    R: OtpRepository,
    M: CodeMailer,
    C: Clock + Send + Sync,
{
    /// Creates a new service.
    #[must_use]
    pub fn new(repository: Arc<R>, mailer: Arc<M>, clock: Arc<C>) -> Self {
        Self {
            repository,
            mailer,
            clock,
        }
    }

    /// Issues a fresh code for the address, stores it, and mails it.
    ///
    /// Earlier codes for the same address stay valid until they expire
    /// or are consumed; verification prefers the newest.
    ///
    /// # Errors
    ///
    /// Returns [`OtpAuthError::Repository`] when storage fails and
    /// [`OtpAuthError::Mailer`] when delivery fails. A delivery failure
    /// leaves the stored code in place.
    pub async fn request_code(&self, email: EmailAddress) -> OtpAuthResult<OtpCode> {
        let code = OtpCode::issue(email, &*self.clock);
        self.repository.store(&code).await?;
        self.mailer.send_code(code.email(), code.digits()).await?;
        Ok(code)
    }

    /// Verifies a candidate against the newest active code for the
    /// address, consuming exactly that code on success.
    ///
    /// # Errors
    ///
    /// Returns [`OtpAuthError::InvalidOrExpired`] for a malformed
    /// candidate, an unknown code, an expired code, or an already
    /// consumed one.
    pub async fn verify(&self, email: &EmailAddress, candidate: &str) -> OtpAuthResult<()> {
        let digits =
            CodeDigits::parse(candidate).map_err(|_| OtpAuthError::InvalidOrExpired)?;
        let code = self
            .repository
            .find_active(email, &digits, self.clock.utc())
            .await?
            .ok_or(OtpAuthError::InvalidOrExpired)?;
        self.repository.mark_consumed(code.id()).await?;
        Ok(())
    }
}
