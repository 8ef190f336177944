//! Vehicle and trailer telemetry shown on the map tab.

use serde::{Deserialize, Serialize};

/// A telemetry reading. Values come from [`crate::mock`]; nothing is ingested.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Telemetry {
    pub speed_kmh: u32,
    pub trailer_temp_c: f32,
    pub humidity_pct: u8,
    pub water_level_pct: u8,
    pub remaining_km: u32,
    pub eta_minutes: u32,
}

/// Distance left given the trip length and percent complete.
pub fn remaining_km(distance_km: u32, progress: u8) -> u32 {
    let done = u64::from(distance_km) * u64::from(progress.min(100)) / 100;
    // done <= distance_km, so the difference always fits.
    distance_km - u32::try_from(done).unwrap_or(distance_km)
}

/// Minutes to cover `remaining_km` at `speed_kmh`, rounded up.
pub fn eta_minutes(remaining_km: u32, speed_kmh: u32) -> u32 {
    if speed_kmh == 0 {
        return 0;
    }
    let minutes = (u64::from(remaining_km) * 60).div_ceil(u64::from(speed_kmh));
    u32::try_from(minutes).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_distance_tracks_progress() {
        assert_eq!(remaining_km(120, 0), 120);
        assert_eq!(remaining_km(120, 50), 60);
        assert_eq!(remaining_km(120, 95), 6);
        assert_eq!(remaining_km(120, 100), 0);
        assert_eq!(remaining_km(120, 250), 0);
    }

    #[test]
    fn eta_rounds_up() {
        assert_eq!(eta_minutes(60, 80), 45);
        assert_eq!(eta_minutes(1, 80), 1);
        assert_eq!(eta_minutes(0, 80), 0);
        assert_eq!(eta_minutes(10, 0), 0);
    }

    #[test]
    fn eta_handles_extreme_distances() {
        assert_eq!(eta_minutes(u32::MAX, 60), u32::MAX);
        assert_eq!(eta_minutes(u32::MAX, 1), u32::MAX);
        assert_eq!(eta_minutes(100_000_000, 100), 60_000_000);
    }
}
