use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Gauge, Padding, Paragraph};

use crate::controller::TripController;
use crate::model::TripStatus;

use super::{highlight, muted, normal};

const TIME_FORMAT: &str = "%a %d %b, %H:%M";

pub(super) fn render(frame: &mut Frame, area: Rect, controller: &TripController) {
    let chunks = Layout::vertical([
        Constraint::Length(14), // details
        Constraint::Length(1),  // progress
        Constraint::Min(0),
    ])
    .split(area);

    let trip = controller.trip();
    let checklist = controller.checklist();

    let row = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{label:<12}"), muted()),
            Span::styled(value, normal()),
        ])
    };

    let mut lines = vec![
        Line::from(Span::styled(
            format!("{} → {}", trip.pickup.location, trip.dropoff.location),
            highlight(),
        )),
        Line::from(""),
        row("Load", format!("{} x {}", trip.quantity, trip.species)),
        row(
            "Pickup",
            trip.pickup.scheduled_at.strftime(TIME_FORMAT).to_string(),
        ),
        row(
            "Dropoff",
            trip.dropoff.scheduled_at.strftime(TIME_FORMAT).to_string(),
        ),
        row("Distance", format!("{} km", trip.distance_km)),
        row("Payout", trip.payout.to_string()),
        row("Driver", controller.settings().driver_name.clone()),
        row(
            "Checklist",
            format!(
                "{}/{} complete",
                checklist.completed_count(),
                checklist.item_count()
            ),
        ),
    ];

    let incidents = controller.incidents();
    if !incidents.is_empty() {
        lines.push(row("Incidents", format!("{} reported", incidents.len())));
    }

    match controller.status() {
        TripStatus::Scheduled => {}
        TripStatus::InTransit { started_at } => {
            lines.push(row("Started", started_at.strftime("%H:%M").to_string()));
        }
        TripStatus::Completed {
            started_at,
            completed_at,
        } => {
            let minutes = completed_at.duration_since(started_at).as_mins();
            lines.push(row("Started", started_at.strftime("%H:%M").to_string()));
            lines.push(row(
                "Delivered",
                format!("{} ({minutes} min)", completed_at.strftime("%H:%M")),
            ));
        }
    }

    let details = Paragraph::new(lines).block(Block::default().padding(Padding::new(2, 2, 1, 0)));
    frame.render_widget(details, chunks[0]);

    let progress = controller.progress();
    let gauge = Gauge::default()
        .gauge_style(normal())
        .percent(u16::from(progress.value()))
        .label(format!("{progress} of route"))
        .block(Block::default().padding(Padding::new(2, 2, 0, 0)));
    frame.render_widget(gauge, chunks[1]);
}
