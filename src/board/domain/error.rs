//! Error types for board domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing board domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardDomainError {
    /// The email address is malformed.
    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTaskTitle,

    /// The user display name is empty after trimming.
    #[error("user name must not be empty")]
    EmptyUserName,

    /// The comment content is empty after trimming.
    #[error("comment content must not be empty")]
    EmptyCommentContent,

    /// The sticky note content is empty after trimming.
    #[error("sticky note content must not be empty")]
    EmptyNoteContent,
}

/// Error returned while parsing board enumerations from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind} value: {value}")]
pub struct ParseBoardValueError {
    /// Enumeration kind being parsed (for example `board column`).
    pub kind: &'static str,
    /// Rejected input value.
    pub value: String,
}

impl ParseBoardValueError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}
