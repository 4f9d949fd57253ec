//! Auxiliary task detail types: external links, attachments, planning.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// External design and specification links attached to a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskLinks {
    /// Figma design URL.
    pub figma_url: Option<String>,
    /// Process specification URL.
    pub process_spec_url: Option<String>,
}

impl TaskLinks {
    /// Returns `true` when no link is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.figma_url.is_none() && self.process_spec_url.is_none()
    }
}

impl fmt::Display for TaskLinks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let figma = self.figma_url.as_deref().unwrap_or("-");
        let spec = self.process_spec_url.as_deref().unwrap_or("-");
        write!(f, "figma={figma}, spec={spec}")
    }
}

/// File attached to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachedFile {
    /// Original file name.
    pub name: String,
    /// Download URL in blob storage.
    pub url: String,
    /// Upload timestamp.
    pub uploaded_at: DateTime<Utc>,
}

/// Triage state of a task awaiting planning.
///
/// A task flagged for planning has not yet entered the board proper; the
/// received timestamp drives wait-time sorting in the planning view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanningState {
    /// When the task entered the planning queue.
    pub received_at: DateTime<Utc>,
}

impl PlanningState {
    /// Creates a planning state received at the given instant.
    #[must_use]
    pub const fn received(received_at: DateTime<Utc>) -> Self {
        Self { received_at }
    }
}
