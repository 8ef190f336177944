//! Commands: everything a driver can ask the trip screen to do.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{ChecklistItem, IncidentKind, PauseReason, Severity};

/// A single driver action, handed to [`super::TripController::apply`].
///
/// Image payloads are raw captured bytes; the controller wraps them into
/// photos when the command is accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Command {
    // ── Checklist ──
    /// Check or uncheck a checklist item.
    ToggleItem { item: ChecklistItem },

    /// Attach evidence to a checklist item.
    AttachItemPhoto {
        item: ChecklistItem,
        #[serde(default)]
        image: Vec<u8>,
    },

    /// Leave the yard.
    StartTrip,

    // ── On the road ──
    Pause {
        #[serde(default)]
        reason: Option<PauseReason>,
    },

    Resume,

    // ── Proof of delivery ──
    SetDeliveredQuantity { value: String },

    SetHealthy { healthy: bool },

    /// Sign the delivery as the named receiver.
    Sign { name: String },

    ClearSignature,

    AddEpodPhoto {
        #[serde(default)]
        image: Vec<u8>,
    },

    RemoveEpodPhoto { id: Uuid },

    SubmitEpod,

    // ── Always available ──
    SendMessage { body: String },

    #[serde(rename_all = "camelCase")]
    ReportIncident {
        #[serde(default)]
        incident_kind: Option<IncidentKind>,
        #[serde(default)]
        severity: Option<Severity>,
        #[serde(default)]
        description: String,
        #[serde(default)]
        images: Vec<Vec<u8>>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tagged_json() {
        let json = r#"[
            {"kind": "toggleItem", "item": "waterSupply"},
            {"kind": "attachItemPhoto", "item": "vehicleInspection", "image": [255, 216]},
            {"kind": "startTrip"},
            {"kind": "pause", "reason": "fuel"},
            {"kind": "pause"},
            {"kind": "sign", "name": "Pat"},
            {"kind": "reportIncident", "incidentKind": "delay", "description": "Queue at the weighbridge"}
        ]"#;
        let commands: Vec<Command> = serde_json::from_str(json).unwrap();
        assert_eq!(commands.len(), 7);
        assert!(matches!(
            commands[0],
            Command::ToggleItem {
                item: ChecklistItem::WaterSupply
            }
        ));
        assert!(matches!(
            &commands[1],
            Command::AttachItemPhoto { image, .. } if image == &[255, 216]
        ));
        assert!(matches!(
            commands[3],
            Command::Pause {
                reason: Some(PauseReason::Fuel)
            }
        ));
        assert!(matches!(commands[4], Command::Pause { reason: None }));
        assert!(matches!(
            &commands[6],
            Command::ReportIncident {
                incident_kind: Some(IncidentKind::Delay),
                severity: None,
                images,
                ..
            } if images.is_empty()
        ));
    }
}
