//! Domain errors for one-time-code authentication.

use thiserror::Error;

/// Validation failures for auth domain values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthDomainError {
    /// The candidate code is not six decimal digits.
    #[error("invalid one-time code format: {0:?}")]
    InvalidCodeFormat(String),
}
