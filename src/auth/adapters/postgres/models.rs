//! Diesel row models for one-time-code storage.

use super::schema::otp_codes;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Row for an issued one-time code.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = otp_codes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OtpCodeRow {
    /// Code identifier.
    pub id: uuid::Uuid,
    /// Address the code was issued for.
    pub email: String,
    /// The six digits.
    pub digits: String,
    /// Issue timestamp.
    pub created_at: DateTime<Utc>,
    /// Expiry timestamp.
    pub expires_at: DateTime<Utc>,
    /// Whether the code was already used.
    pub consumed: bool,
}
