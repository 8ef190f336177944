//! Trip types: the job a driver is hauling.

use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A livestock haul from a pickup to a dropoff.
///
/// Everything here is fixed once the trip is assigned. Status lives in
/// [`crate::lifecycle::Lifecycle`], which is its only owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    /// Dispatch reference, e.g. `TRP-2024-0142`.
    pub id: String,
    pub species: Species,

    /// Head count loaded at pickup.
    pub quantity: u32,
    pub pickup: Stop,
    pub dropoff: Stop,
    pub distance_km: u32,
    pub payout: Payout,
}

/// One end of a trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    pub location: String,
    pub scheduled_at: Timestamp,
}

/// What is being hauled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Species {
    Cattle,
    Sheep,
    Pigs,
    Goats,
    Poultry,
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Cattle => "Cattle",
            Self::Sheep => "Sheep",
            Self::Pigs => "Pigs",
            Self::Goats => "Goats",
            Self::Poultry => "Poultry",
        })
    }
}

/// Driver payout in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payout(pub u64);

impl fmt::Display for Payout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dollars = self.0 / 100;
        let cents = self.0 % 100;

        // Group thousands: 12345 -> "12,345".
        let digits = dollars.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }

        write!(f, "${grouped}.{cents:02}")
    }
}

/// Where a trip stands in its lifecycle.
///
/// Moves strictly forward: `Scheduled → InTransit → Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum TripStatus {
    /// Assigned, not yet departed.
    Scheduled,

    /// On the road.
    #[serde(rename_all = "camelCase")]
    InTransit {
        /// When the checklist was signed off and the trip began.
        started_at: Timestamp,
    },

    /// Delivered and signed for.
    #[serde(rename_all = "camelCase")]
    Completed {
        started_at: Timestamp,
        completed_at: Timestamp,
    },
}

impl TripStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::InTransit { .. } => "in-transit",
            Self::Completed { .. } => "completed",
        }
    }
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
