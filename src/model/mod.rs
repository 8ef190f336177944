//! Core data model for Drover.
//!
//! Plain data describing a haul: the trip itself, the pre-trip checklist,
//! pause state, proof of delivery, incidents, chat, and telemetry.
//! Behavior that moves a trip forward lives in `lifecycle` and `controller`.

mod chat;
mod checklist;
mod epod;
mod incident;
mod pause;
mod photo;
mod telemetry;
mod trip;

pub use chat::{Author, ChatMessage, Delivery};
pub use checklist::{Checklist, ChecklistItem};
pub use epod::{Epod, Signature};
pub use incident::{IncidentKind, IncidentReport, Severity, cycle};
pub use pause::{PauseReason, PauseState};
pub use photo::Photo;
pub use telemetry::{Telemetry, eta_minutes, remaining_km};
pub use trip::{Payout, Species, Stop, Trip, TripStatus};
