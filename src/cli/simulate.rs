//! Headless runs: replay a script of timed driver commands.

use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use serde::Deserialize;

use crate::controller::{Command, TripController};

use super::format;

/// One scripted driver action.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(super) struct Step {
    /// Milliseconds after the script starts.
    #[serde(default)]
    pub at_ms: u64,
    pub command: Command,
}

pub(super) fn cmd_simulate(
    mut controller: TripController,
    script: &Path,
    until_ms: Option<u64>,
) -> Result<(), String> {
    let json = fs::read_to_string(script)
        .map_err(|e| format!("failed to read {}: {e}", script.display()))?;
    let steps: Vec<Step> = serde_json::from_str(&json)
        .map_err(|e| format!("invalid script {}: {e}", script.display()))?;

    let transcript = run_script(&mut controller, steps, until_ms, Instant::now())?;
    for line in transcript {
        println!("{line}");
    }

    let snapshot = serde_json::to_string_pretty(&controller.snapshot())
        .map_err(|e| format!("failed to serialize snapshot: {e}"))?;
    println!("{snapshot}");
    Ok(())
}

/// Replays `steps` against a virtual clock starting at `origin`.
///
/// Returns one transcript line per notice. Steps must be in time order.
pub(super) fn run_script(
    controller: &mut TripController,
    steps: Vec<Step>,
    until_ms: Option<u64>,
    origin: Instant,
) -> Result<Vec<String>, String> {
    let mut lines = Vec::new();
    let mut clock_ms = 0;

    for (i, step) in steps.into_iter().enumerate() {
        if step.at_ms < clock_ms {
            return Err(format!(
                "step {} at {}ms comes before the previous step at {clock_ms}ms",
                i + 1,
                step.at_ms
            ));
        }
        clock_ms = step.at_ms;
        let now = origin + Duration::from_millis(clock_ms);

        controller.tick(now);
        // A rejection is already queued as an error notice.
        let _ = controller.apply(step.command, now);
        record(controller, clock_ms, &mut lines);
    }

    if let Some(until) = until_ms {
        if until < clock_ms {
            return Err(format!(
                "--until-ms {until} is before the last step at {clock_ms}ms"
            ));
        }
        controller.tick(origin + Duration::from_millis(until));
        record(controller, until, &mut lines);
    }

    Ok(lines)
}

fn record(controller: &mut TripController, at_ms: u64, lines: &mut Vec<String>) {
    for notice in controller.drain_notices() {
        lines.push(format!("{at_ms:>7}ms  {}", format::notice(&notice)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::controller::Settings;
    use crate::mock;
    use crate::model::TripStatus;

    const FULL_RUN: &str = r#"[
        {"atMs": 0, "command": {"kind": "startTrip"}},
        {"atMs": 0, "command": {"kind": "attachItemPhoto", "item": "vehicleInspection", "image": [255, 216]}},
        {"atMs": 0, "command": {"kind": "toggleItem", "item": "vehicleInspection"}},
        {"atMs": 0, "command": {"kind": "toggleItem", "item": "ventilation"}},
        {"atMs": 0, "command": {"kind": "toggleItem", "item": "waterSupply"}},
        {"atMs": 0, "command": {"kind": "toggleItem", "item": "loadingRamp"}},
        {"atMs": 0, "command": {"kind": "attachItemPhoto", "item": "animalFitness", "image": [255, 216]}},
        {"atMs": 0, "command": {"kind": "toggleItem", "item": "animalFitness"}},
        {"atMs": 0, "command": {"kind": "toggleItem", "item": "transportDocuments"}},
        {"atMs": 100, "command": {"kind": "startTrip"}},
        {"atMs": 5000, "command": {"kind": "pause"}},
        {"atMs": 5000, "command": {"kind": "pause", "reason": "fuel"}},
        {"atMs": 9000, "command": {"kind": "resume"}},
        {"atMs": 38200, "command": {"kind": "submitEpod"}},
        {"atMs": 38200, "command": {"kind": "addEpodPhoto", "image": [1, 2, 3]}},
        {"atMs": 38200, "command": {"kind": "sign", "name": "Jo Receiver"}},
        {"atMs": 38200, "command": {"kind": "submitEpod"}}
    ]"#;

    fn controller() -> TripController {
        TripController::new(mock::sample_trip(), Settings::default())
    }

    #[test]
    fn full_run_completes_the_trip() {
        let steps: Vec<Step> = serde_json::from_str(FULL_RUN).unwrap();
        let mut c = controller();

        let lines = run_script(&mut c, steps, Some(40_000), Instant::now()).unwrap();

        assert!(matches!(c.status(), TripStatus::Completed { .. }));
        assert!(lines[0].contains("[error] Complete the checklist"));
        assert!(lines.iter().any(|l| l.contains("Trip started")));
        assert!(lines.iter().any(|l| l.contains("Select a reason")));
        assert!(lines.iter().any(|l| l.contains("Trip paused: Refuelling")));
        assert!(
            lines
                .iter()
                .any(|l| l.contains("[error] Add at least one delivery photo"))
        );
        assert!(lines.last().unwrap().contains("Delivery confirmed"));
    }

    #[test]
    fn out_of_order_steps_are_refused() {
        let steps: Vec<Step> = serde_json::from_str(
            r#"[
                {"atMs": 500, "command": {"kind": "resume"}},
                {"atMs": 100, "command": {"kind": "resume"}}
            ]"#,
        )
        .unwrap();
        let err = run_script(&mut controller(), steps, None, Instant::now()).unwrap_err();
        assert!(err.contains("step 2"));
    }

    #[test]
    fn until_before_last_step_is_refused() {
        let steps: Vec<Step> =
            serde_json::from_str(r#"[{"atMs": 500, "command": {"kind": "resume"}}]"#).unwrap();
        let err = run_script(&mut controller(), steps, Some(100), Instant::now()).unwrap_err();
        assert!(err.contains("--until-ms"));
    }

    #[test]
    fn missing_at_ms_defaults_to_zero() {
        let steps: Vec<Step> =
            serde_json::from_str(r#"[{"command": {"kind": "sendMessage", "body": "On my way"}}]"#)
                .unwrap();
        assert_eq!(steps[0].at_ms, 0);
    }
}
