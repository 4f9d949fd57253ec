//! Board user account and role types.

use super::{BoardDomainError, EmailAddress, UserId};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Permission level of a board user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Full management rights, including user administration.
    Admin,
    /// Regular board member.
    User,
    /// Read-only access.
    Viewer,
}

impl UserRole {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
            Self::Viewer => "viewer",
        }
    }

    /// Returns `true` for the admin role.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl TryFrom<&str> for UserRole {
    type Error = super::ParseBoardValueError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            "viewer" => Ok(Self::Viewer),
            _ => Err(super::ParseBoardValueError::new("user role", value)),
        }
    }
}

/// SHA-256 digest of a user password, stored as lowercase hex.
///
/// Passwords never leave the construction site in plaintext; the digest
/// is what crosses the persistence boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hashes a plaintext password.
    #[must_use]
    pub fn from_plaintext(plaintext: &str) -> Self {
        use fmt::Write as _;
        let digest = Sha256::digest(plaintext.as_bytes());
        let mut hex = String::with_capacity(digest.len() * 2);
        for byte in digest {
            // Writing to a String cannot fail.
            write!(hex, "{byte:02x}").ok();
        }
        Self(hex)
    }

    /// Checks a plaintext candidate against this digest.
    #[must_use]
    pub fn verify(&self, candidate: &str) -> bool {
        Self::from_plaintext(candidate) == *self
    }

    /// Returns the hex digest as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Board user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    name: String,
    email: EmailAddress,
    password_hash: PasswordHash,
    avatar_url: Option<String>,
    role: UserRole,
}

impl User {
    /// Creates a new user account.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyUserName`] when the display name
    /// is empty after trimming.
    pub fn new(
        name: impl Into<String>,
        email: EmailAddress,
        password_hash: PasswordHash,
        role: UserRole,
    ) -> Result<Self, BoardDomainError> {
        let value = name.into();
        if value.trim().is_empty() {
            return Err(BoardDomainError::EmptyUserName);
        }
        Ok(Self {
            id: UserId::new(),
            name: value,
            email,
            password_hash,
            avatar_url: None,
            role,
        })
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the email address.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the password digest.
    #[must_use]
    pub const fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Returns the avatar URL, if one is set.
    #[must_use]
    pub fn avatar_url(&self) -> Option<&str> {
        self.avatar_url.as_deref()
    }

    /// Returns the permission role.
    #[must_use]
    pub const fn role(&self) -> UserRole {
        self.role
    }

    /// Replaces the display name.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyUserName`] when the name is empty
    /// after trimming.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), BoardDomainError> {
        let value = name.into();
        if value.trim().is_empty() {
            return Err(BoardDomainError::EmptyUserName);
        }
        self.name = value;
        Ok(())
    }

    /// Replaces the email address.
    pub fn set_email(&mut self, email: EmailAddress) {
        self.email = email;
    }

    /// Replaces the password digest.
    pub fn set_password_hash(&mut self, password_hash: PasswordHash) {
        self.password_hash = password_hash;
    }

    /// Replaces the avatar URL.
    pub fn set_avatar_url(&mut self, avatar_url: Option<String>) {
        self.avatar_url = avatar_url;
    }

    /// Replaces the permission role.
    pub fn set_role(&mut self, role: UserRole) {
        self.role = role;
    }
}
