//! Outbound mail port for delivering one-time codes.
//!
//! The mail provider itself is an external collaborator; this port is
//! the crate's only contact surface with it.

use crate::auth::domain::CodeDigits;
use crate::board::domain::EmailAddress;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for mail delivery.
pub type CodeMailerResult<T> = Result<T, CodeMailerError>;

/// Contract for sending a one-time code to an address.
#[async_trait]
pub trait CodeMailer: Send + Sync {
    /// Delivers the digits to the address.
    ///
    /// # Errors
    ///
    /// Returns [`CodeMailerError::Delivery`] when the provider rejects
    /// or fails the send.
    async fn send_code(&self, email: &EmailAddress, digits: &CodeDigits) -> CodeMailerResult<()>;
}

/// Errors returned by mailer implementations.
#[derive(Debug, Clone, Error)]
pub enum CodeMailerError {
    /// Provider-side delivery failure.
    #[error("mail delivery error: {0}")]
    Delivery(Arc<dyn std::error::Error + Send + Sync>),
}

impl CodeMailerError {
    /// Wraps a delivery error.
    pub fn delivery(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Delivery(Arc::new(err))
    }
}
