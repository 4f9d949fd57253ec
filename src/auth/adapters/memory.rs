//! In-memory adapters for the one-time-code flow.

use crate::auth::{
    domain::{CodeDigits, OtpCode, OtpCodeId},
    ports::{
        CodeMailer, CodeMailerResult, OtpRepository, OtpRepositoryError, OtpRepositoryResult,
    },
};
use crate::board::domain::EmailAddress;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, RwLock};

/// Thread-safe in-memory code repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOtpRepository {
    codes: Arc<RwLock<Vec<OtpCode>>>,
}

impl InMemoryOtpRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every stored code, consumed ones included.
    ///
    /// # Errors
    ///
    /// Returns [`OtpRepositoryError::Persistence`] when the state lock is
    /// poisoned.
    pub fn codes(&self) -> OtpRepositoryResult<Vec<OtpCode>> {
        Ok(self.codes.read().map_err(|_| poisoned())?.clone())
    }
}

fn poisoned() -> OtpRepositoryError {
    OtpRepositoryError::persistence(std::io::Error::other("otp state lock poisoned"))
}

#[async_trait]
impl OtpRepository for InMemoryOtpRepository {
    async fn store(&self, code: &OtpCode) -> OtpRepositoryResult<()> {
        self.codes
            .write()
            .map_err(|_| poisoned())?
            .push(code.clone());
        Ok(())
    }

    async fn find_active(
        &self,
        email: &EmailAddress,
        digits: &CodeDigits,
        now: DateTime<Utc>,
    ) -> OtpRepositoryResult<Option<OtpCode>> {
        let codes = self.codes.read().map_err(|_| poisoned())?;
        Ok(codes
            .iter()
            .filter(|code| code.matches(email, digits, now))
            .max_by_key(|code| code.created_at())
            .cloned())
    }

    async fn mark_consumed(&self, id: OtpCodeId) -> OtpRepositoryResult<()> {
        let mut codes = self.codes.write().map_err(|_| poisoned())?;
        if let Some(code) = codes.iter_mut().find(|code| code.id() == id) {
            code.consume();
        }
        Ok(())
    }
}

/// Mailer that records sends instead of delivering them.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<(EmailAddress, CodeDigits)>>,
}

impl RecordingMailer {
    /// Creates an empty recording mailer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded sends in delivery order.
    #[must_use]
    pub fn sent(&self) -> Vec<(EmailAddress, CodeDigits)> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CodeMailer for RecordingMailer {
    async fn send_code(&self, email: &EmailAddress, digits: &CodeDigits) -> CodeMailerResult<()> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push((email.clone(), digits.clone()));
        }
        Ok(())
    }
}
