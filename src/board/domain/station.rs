//! In-progress work stations.
//!
//! A station is a sub-stage label applicable only while a task sits in
//! the in-progress lane; the optional note carries free-text context for
//! the current station.

use super::ParseBoardValueError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sub-stage of in-progress work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Station {
    /// Design and specification work.
    Design,
    /// Implementation work.
    Development,
    /// Verification work.
    Testing,
    /// Peer review.
    Review,
    /// Rollout and handover.
    Delivery,
}

impl Station {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Design => "design",
            Self::Development => "development",
            Self::Testing => "testing",
            Self::Review => "review",
            Self::Delivery => "delivery",
        }
    }
}

impl TryFrom<&str> for Station {
    type Error = ParseBoardValueError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "design" => Ok(Self::Design),
            "development" => Ok(Self::Development),
            "testing" => Ok(Self::Testing),
            "review" => Ok(Self::Review),
            "delivery" => Ok(Self::Delivery),
            _ => Err(ParseBoardValueError::new("station", value)),
        }
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Station plus the free-text note attached to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationAssignment {
    /// Current station.
    pub station: Station,
    /// Optional context note for the station.
    pub note: Option<String>,
}

impl StationAssignment {
    /// Creates a station assignment without a note.
    #[must_use]
    pub const fn new(station: Station) -> Self {
        Self {
            station,
            note: None,
        }
    }

    /// Attaches a note to the assignment.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

impl fmt::Display for StationAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.note {
            Some(note) => write!(f, "{} ({note})", self.station),
            None => write!(f, "{}", self.station),
        }
    }
}
