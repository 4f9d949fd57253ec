//! One-time codes and their lifecycle.

use super::AuthDomainError;
use crate::board::domain::EmailAddress;
use chrono::{DateTime, Duration, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Minutes a freshly issued code stays valid.
const CODE_TTL_MINUTES: i64 = 10;

/// Unique identifier for an issued one-time code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OtpCodeId(Uuid);

impl OtpCodeId {
    /// Creates a new random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID value.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for OtpCodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OtpCodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Six decimal digits of a one-time code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CodeDigits(String);

impl CodeDigits {
    /// Generates a fresh random code from UUID entropy.
    #[must_use]
    pub fn generate() -> Self {
        let entropy = Uuid::new_v4().as_u128() % 1_000_000;
        Self(format!("{entropy:06}"))
    }

    /// Parses a candidate entered by a user.
    ///
    /// # Errors
    ///
    /// Returns [`AuthDomainError::InvalidCodeFormat`] unless the trimmed
    /// candidate is exactly six ASCII digits.
    pub fn parse(candidate: &str) -> Result<Self, AuthDomainError> {
        let trimmed = candidate.trim();
        if trimmed.len() == 6 && trimmed.bytes().all(|byte| byte.is_ascii_digit()) {
            Ok(Self(trimmed.to_owned()))
        } else {
            Err(AuthDomainError::InvalidCodeFormat(trimmed.to_owned()))
        }
    }

    /// Returns the digits as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CodeDigits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stored fields of a persisted one-time code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedOtpData {
    /// Code identifier.
    pub id: OtpCodeId,
    /// Address the code was issued for.
    pub email: EmailAddress,
    /// The six digits.
    pub digits: CodeDigits,
    /// Issue timestamp.
    pub created_at: DateTime<Utc>,
    /// Expiry timestamp.
    pub expires_at: DateTime<Utc>,
    /// Whether the code was already used.
    pub consumed: bool,
}

/// One-time code issued for an email address.
///
/// A code is single-use: verification consumes it, and a consumed or
/// expired code never matches again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpCode {
    id: OtpCodeId,
    email: EmailAddress,
    digits: CodeDigits,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    consumed: bool,
}

impl OtpCode {
    /// Issues a fresh code valid for ten minutes.
    #[must_use]
    pub fn issue(email: EmailAddress, clock: &impl Clock) -> Self {
        let created_at = clock.utc();
        Self {
            id: OtpCodeId::new(),
            email,
            digits: CodeDigits::generate(),
            created_at,
            expires_at: created_at + Duration::minutes(CODE_TTL_MINUTES),
            consumed: false,
        }
    }

    /// Rebuilds a code from persisted fields.
    #[must_use]
    pub fn from_persisted(data: PersistedOtpData) -> Self {
        Self {
            id: data.id,
            email: data.email,
            digits: data.digits,
            created_at: data.created_at,
            expires_at: data.expires_at,
            consumed: data.consumed,
        }
    }

    /// Returns the code identifier.
    #[must_use]
    pub const fn id(&self) -> OtpCodeId {
        self.id
    }

    /// Returns the address the code was issued for.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the six digits.
    #[must_use]
    pub const fn digits(&self) -> &CodeDigits {
        &self.digits
    }

    /// Returns the issue timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the expiry timestamp.
    #[must_use]
    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns `true` once the code has been used.
    #[must_use]
    pub const fn is_consumed(&self) -> bool {
        self.consumed
    }

    /// Returns `true` when the code has passed its expiry at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Returns `true` when the code can still verify `digits` for
    /// `email` at `now`.
    #[must_use]
    pub fn matches(&self, email: &EmailAddress, digits: &CodeDigits, now: DateTime<Utc>) -> bool {
        !self.consumed && !self.is_expired(now) && self.email == *email && self.digits == *digits
    }

    /// Marks the code as used.
    pub fn consume(&mut self) {
        self.consumed = true;
    }
}
