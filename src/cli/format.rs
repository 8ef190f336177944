//! Output formatting for CLI display.

use crate::controller::{Notice, NoticeLevel};
use crate::model::Trip;

/// Multi-line summary of a trip.
pub(super) fn overview(trip: &Trip) -> String {
    let mut lines = vec![
        format!("Trip {}", trip.id),
        format!("  Load:     {} x {}", trip.quantity, trip.species),
        format!(
            "  Pickup:   {} ({})",
            trip.pickup.location,
            trip.pickup.scheduled_at.strftime("%Y-%m-%d %H:%M UTC")
        ),
        format!(
            "  Dropoff:  {} ({})",
            trip.dropoff.location,
            trip.dropoff.scheduled_at.strftime("%Y-%m-%d %H:%M UTC")
        ),
    ];
    lines.push(format!("  Distance: {} km", trip.distance_km));
    lines.push(format!("  Payout:   {}", trip.payout));
    lines.join("\n")
}

/// One notice as a transcript line.
pub(super) fn notice(n: &Notice) -> String {
    let tag = match n.level {
        NoticeLevel::Info => "info",
        NoticeLevel::Success => "ok",
        NoticeLevel::Error => "error",
    };
    format!("[{tag}] {}", n.text)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::mock;

    #[test]
    fn overview_lists_trip_details() {
        let text = overview(&mock::sample_trip());
        assert!(text.starts_with("Trip TRP-2024-0142"));
        assert!(text.contains("45 x Cattle"));
        assert!(text.contains("120 km"));
        assert!(text.contains("$850.00"));
    }

    #[test]
    fn notice_levels_are_tagged() {
        let cases = [
            (NoticeLevel::Info, "[info] hi"),
            (NoticeLevel::Success, "[ok] hi"),
            (NoticeLevel::Error, "[error] hi"),
        ];
        for (level, expected) in cases {
            let n = Notice {
                level,
                text: "hi".into(),
            };
            assert_eq!(notice(&n), expected);
        }
    }
}
