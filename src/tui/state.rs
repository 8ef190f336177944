//! Screen-local state: cursors, text inputs, and open dialogs.
//!
//! Nothing here is trip state. Anything that matters to the trip goes
//! through the controller as a command.

use std::time::{Duration, Instant};

use crate::controller::{Notice, TripController};
use crate::lifecycle::Tab;
use crate::model::{IncidentKind, PauseReason, Severity};

/// How long a notice stays on screen.
pub const NOTICE_TTL: Duration = Duration::from_secs(4);

/// Fields on the ePOD tab, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpodField {
    Quantity,
    Health,
    Signature,
    Photos,
    Submit,
}

impl EpodField {
    const ORDER: [Self; 5] = [
        Self::Quantity,
        Self::Health,
        Self::Signature,
        Self::Photos,
        Self::Submit,
    ];

    pub fn next(self) -> Self {
        step(&Self::ORDER, self, 1)
    }

    pub fn prev(self) -> Self {
        step(&Self::ORDER, self, Self::ORDER.len() - 1)
    }

    pub fn takes_text(self) -> bool {
        matches!(self, Self::Quantity | Self::Signature)
    }
}

/// Fields in the incident dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncidentField {
    Kind,
    Severity,
    Description,
    Photos,
}

impl IncidentField {
    const ORDER: [Self; 4] = [Self::Kind, Self::Severity, Self::Description, Self::Photos];

    pub fn next(self) -> Self {
        step(&Self::ORDER, self, 1)
    }

    pub fn prev(self) -> Self {
        step(&Self::ORDER, self, Self::ORDER.len() - 1)
    }
}

fn step<T: Copy + PartialEq>(order: &[T], current: T, by: usize) -> T {
    let i = order.iter().position(|x| *x == current).unwrap_or(0);
    order[(i + by) % order.len()]
}

/// The incident dialog's draft.
#[derive(Debug, Clone)]
pub struct IncidentDialog {
    pub field: IncidentField,
    pub kind: Option<IncidentKind>,
    pub severity: Option<Severity>,
    pub description: String,
    pub images: Vec<Vec<u8>>,
}

impl IncidentDialog {
    pub fn new() -> Self {
        Self {
            field: IncidentField::Kind,
            kind: None,
            severity: None,
            description: String::new(),
            images: Vec::new(),
        }
    }
}

#[derive(Debug)]
pub struct ScreenState {
    pub tab: Tab,
    pub checklist_cursor: usize,

    /// `Some` while the pause-reason picker is open; holds the selection.
    pub pause_picker: Option<Option<PauseReason>>,
    pub chat_input: String,
    pub epod_field: EpodField,
    pub quantity_input: String,
    pub signer_input: String,
    pub incident: Option<IncidentDialog>,
    notice: Option<(Notice, Instant)>,
}

impl ScreenState {
    pub fn new() -> Self {
        Self {
            tab: Tab::Overview,
            checklist_cursor: 0,
            pause_picker: None,
            chat_input: String::new(),
            epod_field: EpodField::Quantity,
            quantity_input: String::new(),
            signer_input: String::new(),
            incident: None,
            notice: None,
        }
    }

    /// Whether printable keys should go into a text input.
    pub fn is_typing(&self) -> bool {
        self.incident.is_some()
            || self.tab == Tab::Chat
            || (self.tab == Tab::Epod && self.epod_field.takes_text())
    }

    /// Moves to the next enabled tab, wrapping.
    pub fn next_tab(&mut self, controller: &TripController) {
        self.tab = self.cycle_tab(controller, 1);
    }

    pub fn prev_tab(&mut self, controller: &TripController) {
        self.tab = self.cycle_tab(controller, Tab::ALL.len() - 1);
    }

    fn cycle_tab(&self, controller: &TripController, by: usize) -> Tab {
        let start = Tab::ALL.iter().position(|t| *t == self.tab).unwrap_or(0);
        (1..=Tab::ALL.len())
            .map(|n| Tab::ALL[(start + n * by) % Tab::ALL.len()])
            .find(|t| controller.tab_enabled(*t))
            .unwrap_or(Tab::Overview)
    }

    /// Jumps to a tab if it is enabled.
    pub fn select_tab(&mut self, controller: &TripController, tab: Tab) -> bool {
        if controller.tab_enabled(tab) {
            self.tab = tab;
            true
        } else {
            false
        }
    }

    /// Falls back to the overview when the current tab has been disabled.
    pub fn ensure_enabled_tab(&mut self, controller: &TripController) {
        if !controller.tab_enabled(self.tab) {
            self.tab = Tab::Overview;
            self.pause_picker = None;
        }
    }

    /// Shows the newest notice, replacing whatever was on screen.
    pub fn show_notices(&mut self, notices: Vec<Notice>, now: Instant) {
        if let Some(latest) = notices.into_iter().last() {
            self.notice = Some((latest, now));
        }
    }

    /// The notice still on screen at `now`, if any.
    pub fn notice(&self, now: Instant) -> Option<&Notice> {
        self.notice
            .as_ref()
            .filter(|(_, shown_at)| now.duration_since(*shown_at) < NOTICE_TTL)
            .map(|(n, _)| n)
    }

    /// When the notice on screen goes away, if that is still ahead of `now`.
    pub fn notice_expiry(&self, now: Instant) -> Option<Instant> {
        self.notice
            .as_ref()
            .map(|(_, shown_at)| *shown_at + NOTICE_TTL)
            .filter(|at| *at > now)
    }
}
