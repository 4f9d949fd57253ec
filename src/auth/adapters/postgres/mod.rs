//! `PostgreSQL` adapters for one-time-code storage.

mod models;
mod repository;
mod schema;

pub use repository::{OtpPgPool, PostgresOtpRepository};
