//! Incident reports raised from the road.

use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::photo::Photo;

/// What kind of incident is being reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IncidentKind {
    AnimalWelfare,
    VehicleBreakdown,
    Accident,
    RoadClosure,
    Delay,
    Other,
}

impl IncidentKind {
    pub const ALL: [Self; 6] = [
        Self::AnimalWelfare,
        Self::VehicleBreakdown,
        Self::Accident,
        Self::RoadClosure,
        Self::Delay,
        Self::Other,
    ];
}

impl fmt::Display for IncidentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AnimalWelfare => "Animal welfare",
            Self::VehicleBreakdown => "Vehicle breakdown",
            Self::Accident => "Accident",
            Self::RoadClosure => "Road closure",
            Self::Delay => "Delay",
            Self::Other => "Other",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        })
    }
}

/// A filed incident.
///
/// Incidents notify dispatch. They never feed back into trip state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentReport {
    pub id: Uuid,
    pub kind: IncidentKind,
    pub severity: Severity,
    pub description: String,
    pub photos: Vec<Photo>,
    pub reported_at: Timestamp,
}

/// Steps through a fixed list, wrapping at either end. `None` starts at the
/// first (forward) or last (backward) entry.
pub fn cycle<T: Copy + PartialEq>(all: &[T], current: Option<T>, forward: bool) -> Option<T> {
    if all.is_empty() {
        return None;
    }
    let next = match current.and_then(|c| all.iter().position(|x| *x == c)) {
        None if forward => 0,
        None => all.len() - 1,
        Some(i) if forward => (i + 1) % all.len(),
        Some(i) => (i + all.len() - 1) % all.len(),
    };
    Some(all[next])
}
