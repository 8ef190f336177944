//! Hardcoded data standing in for dispatch, GPS, and the camera.

use jiff::{SignedDuration, Timestamp};
use uuid::Uuid;

use crate::lifecycle::Progress;
use crate::model::{
    Author, ChatMessage, Delivery, Payout, Species, Stop, Telemetry, Trip, eta_minutes,
    remaining_km,
};

/// The trip assigned to the driver.
pub fn sample_trip() -> Trip {
    let pickup_at = Timestamp::now();
    Trip {
        id: "TRP-2024-0142".to_string(),
        species: Species::Cattle,
        quantity: 45,
        pickup: Stop {
            location: "Greenfield Farm, Ballarat VIC".to_string(),
            scheduled_at: pickup_at,
        },
        dropoff: Stop {
            location: "Central Livestock Exchange, Melbourne VIC".to_string(),
            scheduled_at: pickup_at + SignedDuration::from_mins(150),
        },
        distance_km: 120,
        payout: Payout(85_000),
    }
}

/// Messages already in the thread when the trip screen opens.
pub fn opening_chat() -> Vec<ChatMessage> {
    let now = Timestamp::now();
    let dispatch = |body: &str, minutes_ago: i64| ChatMessage {
        id: Uuid::new_v4(),
        author: Author::Dispatch,
        sender: "Dispatch".to_string(),
        body: body.to_string(),
        sent_at: now - SignedDuration::from_mins(minutes_ago),
        delivery: Delivery::Sent,
    };
    vec![
        dispatch("Morning! Load is confirmed for 45 head at Greenfield.", 40),
        dispatch(
            "Gate code is 4471. Ramp is on the east side of the yards.",
            38,
        ),
    ]
}

/// A telemetry reading for the given progress.
///
/// Speed drops to zero once the truck has arrived.
pub fn telemetry(trip: &Trip, progress: Progress) -> Telemetry {
    let remaining = remaining_km(trip.distance_km, progress.value());
    let speed_kmh = if progress.is_complete() { 0 } else { 88 };
    Telemetry {
        speed_kmh,
        trailer_temp_c: 18.5,
        humidity_pct: 62,
        water_level_pct: 100u8.saturating_sub(progress.value() / 3),
        remaining_km: remaining,
        eta_minutes: eta_minutes(remaining, speed_kmh),
    }
}

/// A fake camera capture: a JPEG start-of-image marker and some noise.
pub fn camera_frame() -> Vec<u8> {
    let mut image = vec![0xFF, 0xD8, 0xFF, 0xE0];
    image.extend_from_slice(Uuid::new_v4().as_bytes());
    image
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn telemetry_follows_progress() {
        let trip = sample_trip();
        let start = telemetry(&trip, Progress::ZERO);
        assert_eq!(start.remaining_km, 120);
        assert_eq!(start.water_level_pct, 100);

        let done = telemetry(&trip, Progress::COMPLETE);
        assert_eq!(done.remaining_km, 0);
        assert_eq!(done.speed_kmh, 0);
        assert_eq!(done.eta_minutes, 0);
    }

    #[test]
    fn camera_frames_differ() {
        let a = camera_frame();
        let b = camera_frame();
        assert_eq!(&a[..2], &[0xFF, 0xD8]);
        assert_ne!(a, b);
    }
}
