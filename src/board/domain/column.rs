//! Board lane, workflow status, and priority enumerations.
//!
//! The board column is the top-level kanban lane a card sits in; the
//! workflow status tracks the finer-grained state of the work itself and
//! may diverge from the lane (for example a card parked in the todo lane
//! while its status is on-hold).

use super::ParseBoardValueError;
use serde::{Deserialize, Serialize};

/// Top-level kanban lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardColumn {
    /// Backlog lane.
    Todo,
    /// Active work lane.
    InProgress,
    /// Completed lane.
    Done,
}

impl BoardColumn {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }
}

impl Default for BoardColumn {
    fn default() -> Self {
        Self::Todo
    }
}

impl TryFrom<&str> for BoardColumn {
    type Error = ParseBoardValueError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "todo" => Ok(Self::Todo),
            "in_progress" | "in-progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            _ => Err(ParseBoardValueError::new("board column", value)),
        }
    }
}

/// Fine-grained workflow state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    /// Work has not started.
    Todo,
    /// Work is underway.
    InProgress,
    /// Work is finished.
    Done,
    /// Work is paused pending a decision or dependency.
    OnHold,
    /// Work is in quality assurance.
    Qa,
    /// Work was abandoned.
    Canceled,
}

impl WorkflowStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Done => "done",
            Self::OnHold => "on_hold",
            Self::Qa => "qa",
            Self::Canceled => "canceled",
        }
    }
}

impl Default for WorkflowStatus {
    fn default() -> Self {
        Self::Todo
    }
}

impl TryFrom<&str> for WorkflowStatus {
    type Error = ParseBoardValueError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "todo" => Ok(Self::Todo),
            "in_progress" | "in-progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            "on_hold" | "on-hold" => Ok(Self::OnHold),
            "qa" => Ok(Self::Qa),
            "canceled" => Ok(Self::Canceled),
            _ => Err(ParseBoardValueError::new("workflow status", value)),
        }
    }
}

/// Task priority level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Urgent work.
    High,
    /// Default priority.
    Medium,
    /// Background work.
    Low,
}

impl Priority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

impl TryFrom<&str> for Priority {
    type Error = ParseBoardValueError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(ParseBoardValueError::new("priority", value)),
        }
    }
}
