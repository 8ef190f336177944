//! Trip lifecycle: the state machine behind the trip screen.
//!
//! A [`Lifecycle`] is a small `Copy` value holding status, progress, and
//! pause state. Every transition is a pure function: it takes the current
//! value and returns either the next value or a [`Rejection`] explaining
//! which precondition failed. A rejected transition leaves nothing behind,
//! so callers can simply keep the old value.
//!
//! ```text
//! scheduled ──start (checklist complete)──▶ in-transit ──complete (valid ePOD)──▶ completed
//!                                            │  ▲
//!                                   pause ◀──┘  └── resume
//! ```

use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::model::{Checklist, ChecklistItem, Epod, PauseReason, PauseState, TripStatus};

/// Percent of the route covered, always within `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Progress(u8);

impl Progress {
    pub const ZERO: Self = Self(0);
    pub const COMPLETE: Self = Self(100);

    /// Clamps to 100.
    pub fn new(percent: u8) -> Self {
        Self(percent.min(100))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_complete(self) -> bool {
        self >= Self::COMPLETE
    }

    /// Moves forward by `step`, stopping at 100.
    #[must_use]
    pub fn advanced(self, step: u8) -> Self {
        Self::new(self.0.saturating_add(step))
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Tabs on the trip screen, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Tab {
    Overview,
    Checklist,
    Map,
    Chat,
    Epod,
}

impl Tab {
    pub const ALL: [Self; 5] = [
        Self::Overview,
        Self::Checklist,
        Self::Map,
        Self::Chat,
        Self::Epod,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Checklist => "Checklist",
            Self::Map => "Map",
            Self::Chat => "Chat",
            Self::Epod => "ePOD",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Why an action was refused.
///
/// The `Display` text is shown to the driver as-is. Every rejection is
/// recoverable: fix the input and try again.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("Complete the checklist before starting the trip ({0} item(s) left)")]
    ChecklistIncomplete(usize),

    #[error("Attach a photo for \"{0}\" before checking it off")]
    PhotoRequired(ChecklistItem),

    #[error("The checklist is locked once the trip has started")]
    ChecklistLocked,

    #[error("This trip has already started")]
    AlreadyStarted,

    #[error("The trip is not in transit")]
    NotInTransit,

    #[error("Select a reason to pause the trip")]
    PauseReasonRequired,

    #[error("The trip is already paused")]
    AlreadyPaused,

    #[error("The {0} tab is not available yet")]
    TabUnavailable(Tab),

    #[error("Add at least one delivery photo")]
    DeliveryPhotoRequired,

    #[error("The delivery must be signed before submitting")]
    SignatureRequired,

    #[error("Enter the receiver's name to sign")]
    SignerNameRequired,

    #[error("No such photo on this delivery")]
    PhotoNotFound,

    #[error("A submission is already in progress")]
    SubmissionPending,

    #[error("Type a message before sending")]
    EmptyMessage,

    #[error("Choose an incident type")]
    IncidentKindRequired,

    #[error("Choose a severity")]
    IncidentSeverityRequired,

    #[error("Describe what happened")]
    IncidentDescriptionRequired,
}

/// Status, progress, and pause state of one trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lifecycle {
    status: TripStatus,
    progress: Progress,
    pause: PauseState,

    /// Progress at which proof of delivery opens.
    epod_unlock: Progress,
}

impl Lifecycle {
    /// A freshly assigned trip: scheduled, nothing covered, not paused.
    pub fn new(epod_unlock: u8) -> Self {
        Self {
            status: TripStatus::Scheduled,
            progress: Progress::ZERO,
            pause: PauseState::Running,
            epod_unlock: Progress::new(epod_unlock),
        }
    }

    pub fn status(&self) -> TripStatus {
        self.status
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn pause(&self) -> PauseState {
        self.pause
    }

    pub fn is_in_transit(&self) -> bool {
        matches!(self.status, TripStatus::InTransit { .. })
    }

    /// Close enough to the dropoff to record proof of delivery.
    pub fn epod_unlocked(&self) -> bool {
        self.is_in_transit() && self.progress >= self.epod_unlock
    }

    pub fn tab_enabled(&self, tab: Tab) -> bool {
        match tab {
            Tab::Overview | Tab::Checklist | Tab::Chat => true,
            Tab::Map => self.status != TripStatus::Scheduled,
            Tab::Epod => self.epod_unlocked(),
        }
    }

    pub fn enabled_tabs(&self) -> Vec<Tab> {
        Tab::ALL
            .into_iter()
            .filter(|t| self.tab_enabled(*t))
            .collect()
    }

    /// Fails with [`Rejection::TabUnavailable`] unless `tab` is enabled.
    pub fn require_tab(&self, tab: Tab) -> Result<(), Rejection> {
        if self.tab_enabled(tab) {
            Ok(())
        } else {
            Err(Rejection::TabUnavailable(tab))
        }
    }

    // ── Transitions ──

    /// `scheduled → in-transit`, once every checklist item is checked.
    pub fn start(&self, checklist: &Checklist, at: Timestamp) -> Result<Self, Rejection> {
        if self.status != TripStatus::Scheduled {
            return Err(Rejection::AlreadyStarted);
        }
        let outstanding = checklist.outstanding().len();
        if outstanding > 0 {
            return Err(Rejection::ChecklistIncomplete(outstanding));
        }
        Ok(Self {
            status: TripStatus::InTransit { started_at: at },
            ..*self
        })
    }

    /// `in-transit → completed`, once proof of delivery is photographed and signed.
    pub fn complete(&self, epod: &Epod, at: Timestamp) -> Result<Self, Rejection> {
        let TripStatus::InTransit { started_at } = self.status else {
            return Err(Rejection::NotInTransit);
        };
        self.require_tab(Tab::Epod)?;
        validate_epod(epod)?;
        Ok(Self {
            status: TripStatus::Completed {
                started_at,
                completed_at: at,
            },
            pause: PauseState::Running,
            ..*self
        })
    }

    /// Pauses the trip. A reason is mandatory.
    pub fn paused(&self, reason: Option<PauseReason>, at: Timestamp) -> Result<Self, Rejection> {
        if !self.is_in_transit() {
            return Err(Rejection::NotInTransit);
        }
        if self.pause.is_paused() {
            return Err(Rejection::AlreadyPaused);
        }
        let reason = reason.ok_or(Rejection::PauseReasonRequired)?;
        Ok(Self {
            pause: PauseState::Paused { reason, since: at },
            ..*self
        })
    }

    /// Resumes the trip, clearing any pause and its reason.
    pub fn resumed(&self) -> Result<Self, Rejection> {
        if !self.is_in_transit() {
            return Err(Rejection::NotInTransit);
        }
        Ok(Self {
            pause: PauseState::Running,
            ..*self
        })
    }

    /// One progress step. Only moves while in transit, and never past 100.
    ///
    /// Pausing does not hold progress back.
    #[must_use]
    pub fn advanced(&self, step: u8) -> Self {
        if !self.is_in_transit() {
            return *self;
        }
        Self {
            progress: self.progress.advanced(step),
            ..*self
        }
    }
}

/// Checks an ePOD record is complete enough to submit.
pub fn validate_epod(epod: &Epod) -> Result<(), Rejection> {
    if !epod.has_photos() {
        return Err(Rejection::DeliveryPhotoRequired);
    }
    if !epod.is_signed() {
        return Err(Rejection::SignatureRequired);
    }
    Ok(())
}
