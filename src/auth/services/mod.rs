//! Authentication application services.

mod otp;

pub use otp::{OtpAuthError, OtpAuthResult, OtpService};
