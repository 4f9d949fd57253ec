//! Port contracts for one-time-code authentication.

pub mod mailer;
pub mod repository;

pub use mailer::{CodeMailer, CodeMailerError, CodeMailerResult};
pub use repository::{OtpRepository, OtpRepositoryError, OtpRepositoryResult};
