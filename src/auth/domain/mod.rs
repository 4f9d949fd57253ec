//! Domain types for one-time-code authentication.

mod error;
mod otp;

pub use error::AuthDomainError;
pub use otp::{CodeDigits, OtpCode, OtpCodeId, PersistedOtpData};
