//! Trip controller: the single owner of a trip's state.
//!
//! The trip screen never mutates anything directly. It builds a [`Command`]
//! and hands it to [`TripController::apply`] along with the current
//! [`Instant`]; the event loop calls [`TripController::tick`] so timers can
//! fire. Results come back two ways: `apply` returns the [`Rejection`] for a
//! refused command, and both paths queue [`Notice`]s for the driver.
//!
//! Lifecycle transitions are delegated to the pure functions in
//! [`crate::lifecycle`]; the controller adds the timers and the records
//! (checklist, ePOD draft, chat, incidents) those transitions look at.

mod command;
mod schedule;

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use jiff::Timestamp;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::config::Config;
use crate::lifecycle::{Lifecycle, Progress, Rejection, Tab};
use crate::model::{
    Author, ChatMessage, Checklist, ChecklistItem, Delivery, Epod, IncidentKind, IncidentReport,
    PauseState, Photo, Severity, Signature, Trip, TripStatus,
};

pub use command::Command;
pub use schedule::{Delayed, ProgressTimer};

/// Tunables for one controller.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Name used on outgoing chat messages.
    pub driver_name: String,
    pub progress_interval: Duration,
    pub progress_step: u8,
    pub epod_unlock: u8,

    /// Simulated network latency for submissions.
    pub submission_delay: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for Settings {
    fn from(config: &Config) -> Self {
        Self {
            driver_name: config.driver_name.clone(),
            progress_interval: Duration::from_millis(config.progress_interval_ms),
            progress_step: config.progress_step,
            epod_unlock: config.epod_unlock_percent,
            submission_delay: Duration::from_millis(config.submission_delay_ms),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// A transient message for the driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// A submission waiting out its simulated latency.
#[derive(Debug, Clone)]
enum Submission {
    Epod,
    Incident(IncidentReport),
    Message(Uuid),
}

/// A summary of controller state, for headless output.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub trip_id: String,
    pub status: TripStatus,
    pub progress: u8,
    pub pause: PauseState,
    pub enabled_tabs: Vec<Tab>,
    pub checklist_done: usize,
    pub checklist_total: usize,
    pub epod_photos: usize,
    pub epod_signed: bool,
    pub messages: usize,
    pub incidents: usize,
}

/// Owns one trip and everything the trip screen shows about it.
pub struct TripController {
    trip: Trip,
    lifecycle: Lifecycle,
    checklist: Checklist,
    epod: Epod,
    chat: Vec<ChatMessage>,
    incidents: Vec<IncidentReport>,
    progress_timer: ProgressTimer,
    submissions: Delayed<Submission>,
    notices: VecDeque<Notice>,
    settings: Settings,
}

impl TripController {
    pub fn new(trip: Trip, settings: Settings) -> Self {
        Self {
            trip,
            lifecycle: Lifecycle::new(settings.epod_unlock),
            checklist: Checklist::default(),
            epod: Epod::new(),
            chat: Vec::new(),
            incidents: Vec::new(),
            progress_timer: ProgressTimer::new(settings.progress_interval),
            submissions: Delayed::new(settings.submission_delay),
            notices: VecDeque::new(),
            settings,
        }
    }

    /// Seeds the chat with earlier messages.
    #[must_use]
    pub fn with_chat(mut self, history: Vec<ChatMessage>) -> Self {
        self.chat = history;
        self
    }

    // ── Reads ──

    pub fn trip(&self) -> &Trip {
        &self.trip
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn status(&self) -> TripStatus {
        self.lifecycle.status()
    }

    pub fn progress(&self) -> Progress {
        self.lifecycle.progress()
    }

    pub fn pause(&self) -> PauseState {
        self.lifecycle.pause()
    }

    pub fn tab_enabled(&self, tab: Tab) -> bool {
        self.lifecycle.tab_enabled(tab)
    }

    pub fn checklist(&self) -> &Checklist {
        &self.checklist
    }

    pub fn epod(&self) -> &Epod {
        &self.epod
    }

    pub fn chat(&self) -> &[ChatMessage] {
        &self.chat
    }

    pub fn incidents(&self) -> &[IncidentReport] {
        &self.incidents
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_submitting_epod(&self) -> bool {
        self.submissions
            .iter()
            .any(|s| matches!(s, Submission::Epod))
    }

    pub fn is_progress_running(&self) -> bool {
        self.progress_timer.is_armed()
    }

    /// The earliest moment a timer or submission comes due.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.progress_timer.next_due(), self.submissions.next_due()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Takes every queued notice, oldest first.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            trip_id: self.trip.id.clone(),
            status: self.status(),
            progress: self.progress().value(),
            pause: self.pause(),
            enabled_tabs: self.lifecycle.enabled_tabs(),
            checklist_done: self.checklist.completed_count(),
            checklist_total: self.checklist.item_count(),
            epod_photos: self.epod.photos.len(),
            epod_signed: self.epod.is_signed(),
            messages: self.chat.len(),
            incidents: self.incidents.len(),
        }
    }

    // ── Writes ──

    /// Applies a driver command.
    ///
    /// On rejection nothing changes and an error notice is queued.
    pub fn apply(&mut self, command: Command, now: Instant) -> Result<(), Rejection> {
        let result = self.dispatch(command, now);
        if let Err(rejection) = &result {
            self.notices.push_back(Notice::error(rejection.to_string()));
        }
        result
    }

    /// Fires every timer due by `now`.
    pub fn tick(&mut self, now: Instant) {
        let ticks = self.progress_timer.take_elapsed(now);
        for _ in 0..ticks {
            self.advance_progress();
            if self.lifecycle.progress().is_complete() {
                self.progress_timer.cancel();
                break;
            }
        }

        for submission in self.submissions.take_due(now) {
            self.land(submission);
        }
    }

    fn dispatch(&mut self, command: Command, now: Instant) -> Result<(), Rejection> {
        match command {
            Command::ToggleItem { item } => self.toggle_item(item),
            Command::AttachItemPhoto { item, image } => {
                self.require_checklist_open()?;
                self.checklist.attach_photo(item, Photo::capture(image));
                self.notices
                    .push_back(Notice::info(format!("Photo attached to \"{item}\"")));
                Ok(())
            }
            Command::StartTrip => self.start_trip(now),
            Command::Pause { reason } => {
                self.lifecycle = self.lifecycle.paused(reason, Timestamp::now())?;
                if let Some(reason) = reason {
                    info!(trip = %self.trip.id, ?reason, "trip paused");
                    self.notices
                        .push_back(Notice::info(format!("Trip paused: {reason}")));
                }
                Ok(())
            }
            Command::Resume => {
                let was_paused = self.lifecycle.pause().is_paused();
                self.lifecycle = self.lifecycle.resumed()?;
                if was_paused {
                    info!(trip = %self.trip.id, "trip resumed");
                    self.notices.push_back(Notice::info("Trip resumed"));
                }
                Ok(())
            }
            Command::SetDeliveredQuantity { value } => {
                self.require_epod_editable()?;
                self.epod.delivered_quantity = value;
                Ok(())
            }
            Command::SetHealthy { healthy } => {
                self.require_epod_editable()?;
                self.epod.livestock_healthy = healthy;
                Ok(())
            }
            Command::Sign { name } => {
                self.require_epod_editable()?;
                let name = name.trim();
                if name.is_empty() {
                    return Err(Rejection::SignerNameRequired);
                }
                self.epod.signature = Some(Signature {
                    name: name.to_string(),
                    signed_at: Timestamp::now(),
                });
                Ok(())
            }
            Command::ClearSignature => {
                self.require_epod_editable()?;
                self.epod.signature = None;
                Ok(())
            }
            Command::AddEpodPhoto { image } => {
                self.require_epod_editable()?;
                self.epod.photos.push(Photo::capture(image));
                Ok(())
            }
            Command::RemoveEpodPhoto { id } => {
                self.require_epod_editable()?;
                let index = self
                    .epod
                    .photos
                    .iter()
                    .position(|p| p.id == id)
                    .ok_or(Rejection::PhotoNotFound)?;
                self.epod.photos.remove(index);
                Ok(())
            }
            Command::SubmitEpod => self.submit_epod(now),
            Command::SendMessage { body } => self.send_message(&body, now),
            Command::ReportIncident {
                incident_kind,
                severity,
                description,
                images,
            } => self.report_incident(incident_kind, severity, &description, images, now),
        }
    }

    fn require_checklist_open(&self) -> Result<(), Rejection> {
        if self.lifecycle.status() == TripStatus::Scheduled {
            Ok(())
        } else {
            Err(Rejection::ChecklistLocked)
        }
    }

    fn require_epod_editable(&self) -> Result<(), Rejection> {
        self.lifecycle.require_tab(Tab::Epod)?;
        if self.is_submitting_epod() {
            return Err(Rejection::SubmissionPending);
        }
        Ok(())
    }

    fn toggle_item(&mut self, item: ChecklistItem) -> Result<(), Rejection> {
        self.require_checklist_open()?;
        let checked = !self.checklist.is_checked(item);
        if !self.checklist.set_checked(item, checked) {
            return Err(Rejection::PhotoRequired(item));
        }
        Ok(())
    }

    fn start_trip(&mut self, now: Instant) -> Result<(), Rejection> {
        self.lifecycle = self.lifecycle.start(&self.checklist, Timestamp::now())?;
        self.progress_timer.arm(now);
        info!(trip = %self.trip.id, "trip started");
        self.notices
            .push_back(Notice::success("Trip started. Drive safe!"));
        Ok(())
    }

    fn submit_epod(&mut self, now: Instant) -> Result<(), Rejection> {
        self.require_epod_editable()?;
        // Dry run: the result is discarded, only the verdict matters here.
        self.lifecycle.complete(&self.epod, Timestamp::now())?;

        if self.submissions.is_immediate() {
            self.land(Submission::Epod);
        } else {
            self.submissions.push(Submission::Epod, now);
            self.notices
                .push_back(Notice::info("Submitting proof of delivery..."));
        }
        Ok(())
    }

    fn send_message(&mut self, body: &str, now: Instant) -> Result<(), Rejection> {
        let body = body.trim();
        if body.is_empty() {
            return Err(Rejection::EmptyMessage);
        }
        let message = ChatMessage {
            id: Uuid::new_v4(),
            author: Author::Driver,
            sender: self.settings.driver_name.clone(),
            body: body.to_string(),
            sent_at: Timestamp::now(),
            delivery: Delivery::Sending,
        };
        let id = message.id;
        self.chat.push(message);

        if self.submissions.is_immediate() {
            self.land(Submission::Message(id));
        } else {
            self.submissions.push(Submission::Message(id), now);
        }
        Ok(())
    }

    fn report_incident(
        &mut self,
        kind: Option<IncidentKind>,
        severity: Option<Severity>,
        description: &str,
        images: Vec<Vec<u8>>,
        now: Instant,
    ) -> Result<(), Rejection> {
        let kind = kind.ok_or(Rejection::IncidentKindRequired)?;
        let severity = severity.ok_or(Rejection::IncidentSeverityRequired)?;
        let description = description.trim();
        if description.is_empty() {
            return Err(Rejection::IncidentDescriptionRequired);
        }

        let report = IncidentReport {
            id: Uuid::new_v4(),
            kind,
            severity,
            description: description.to_string(),
            photos: images.into_iter().map(Photo::capture).collect(),
            reported_at: Timestamp::now(),
        };

        if self.submissions.is_immediate() {
            self.land(Submission::Incident(report));
        } else {
            self.submissions.push(Submission::Incident(report), now);
            self.notices
                .push_back(Notice::info("Sending incident report..."));
        }
        Ok(())
    }

    fn advance_progress(&mut self) {
        let before = self.lifecycle;
        self.lifecycle = self.lifecycle.advanced(self.settings.progress_step);

        if !before.epod_unlocked() && self.lifecycle.epod_unlocked() {
            info!(trip = %self.trip.id, progress = self.lifecycle.progress().value(), "proof of delivery unlocked");
            self.notices.push_back(Notice::info(
                "Approaching dropoff: proof of delivery is now open",
            ));
        }
        if !before.progress().is_complete() && self.lifecycle.progress().is_complete() {
            info!(trip = %self.trip.id, "arrived at dropoff");
            self.notices.push_back(Notice::info("Arrived at dropoff"));
        }
    }

    /// Completes a submission whose simulated latency has elapsed.
    fn land(&mut self, submission: Submission) {
        match submission {
            Submission::Epod => {
                // The draft was frozen while pending, so this repeats the verdict
                // `submit_epod` already reached.
                match self.lifecycle.complete(&self.epod, Timestamp::now()) {
                    Ok(next) => {
                        self.lifecycle = next;
                        self.progress_timer.cancel();
                        info!(
                            trip = %self.trip.id,
                            photos = self.epod.photos.len(),
                            healthy = self.epod.livestock_healthy,
                            "delivery confirmed"
                        );
                        self.notices
                            .push_back(Notice::success("Delivery confirmed. Trip completed."));
                    }
                    Err(rejection) => {
                        self.notices.push_back(Notice::error(rejection.to_string()));
                    }
                }
            }
            Submission::Incident(report) => {
                info!(
                    trip = %self.trip.id,
                    kind = %report.kind,
                    severity = %report.severity,
                    "incident reported"
                );
                self.notices.push_back(Notice::success(format!(
                    "{} incident reported to dispatch",
                    report.kind
                )));
                self.incidents.push(report);
            }
            Submission::Message(id) => {
                if let Some(message) = self.chat.iter_mut().find(|m| m.id == id) {
                    message.delivery = Delivery::Sent;
                }
            }
        }
    }
}
