//! Pause state for a trip in transit.

use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Why the driver stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PauseReason {
    Break,
    Fuel,
    Issue,
    Other,
}

impl PauseReason {
    pub const ALL: [Self; 4] = [Self::Break, Self::Fuel, Self::Issue, Self::Other];

    pub fn label(self) -> &'static str {
        match self {
            Self::Break => "Rest break",
            Self::Fuel => "Refuelling",
            Self::Issue => "Issue on board",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for PauseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether the driver has paused, and why.
///
/// A pause always carries a reason; there is no way to be paused without one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum PauseState {
    #[default]
    Running,

    Paused {
        reason: PauseReason,
        since: Timestamp,
    },
}

impl PauseState {
    pub fn is_paused(&self) -> bool {
        matches!(self, Self::Paused { .. })
    }

    pub fn reason(&self) -> Option<PauseReason> {
        match self {
            Self::Running => None,
            Self::Paused { reason, .. } => Some(*reason),
        }
    }
}
