use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Gauge, List, ListItem, Padding, Paragraph};

use crate::controller::TripController;
use crate::lifecycle::Progress;
use crate::mock;
use crate::model::{PauseReason, PauseState, TripStatus};

use super::{centered, highlight, muted, normal, pointer};
use crate::tui::state::ScreenState;

pub(super) fn render(frame: &mut Frame, area: Rect, controller: &TripController, state: &ScreenState) {
    let chunks = Layout::vertical([
        Constraint::Length(4), // route strip
        Constraint::Length(1), // gauge
        Constraint::Length(8), // telemetry
        Constraint::Min(0),    // pause status
    ])
    .split(area);

    let trip = controller.trip();
    let progress = controller.progress();

    let strip_width = usize::from(area.width.saturating_sub(6));
    let route = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(trip.pickup.location.clone(), muted()),
            Span::styled("  →  ", muted()),
            Span::styled(trip.dropoff.location.clone(), normal()),
        ]),
        Line::from(""),
        Line::from(Span::styled(route_strip(progress, strip_width), normal())),
    ])
    .block(Block::default().padding(Padding::new(2, 2, 1, 0)));
    frame.render_widget(route, chunks[0]);

    let gauge_color = if progress.is_complete() {
        Color::Green
    } else {
        Color::Cyan
    };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(gauge_color))
        .percent(u16::from(progress.value()))
        .label(progress.to_string())
        .block(Block::default().padding(Padding::new(2, 2, 0, 0)));
    frame.render_widget(gauge, chunks[1]);

    let t = mock::telemetry(trip, progress);
    let row = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{label:<16}"), muted()),
            Span::styled(value, normal()),
        ])
    };
    let telemetry = Paragraph::new(vec![
        row("Speed", format!("{} km/h", t.speed_kmh)),
        row("Remaining", format!("{} km", t.remaining_km)),
        row("ETA", format!("{} min", t.eta_minutes)),
        row("Trailer temp", format!("{:.1} °C", t.trailer_temp_c)),
        row("Humidity", format!("{}%", t.humidity_pct)),
        row("Water level", format!("{}%", t.water_level_pct)),
    ])
    .block(Block::default().padding(Padding::new(2, 2, 1, 0)));
    frame.render_widget(telemetry, chunks[2]);

    let status = match (controller.status(), controller.pause()) {
        (TripStatus::Completed { .. }, _) => {
            Line::from(Span::styled("Delivered", Style::default().fg(Color::Green)))
        }
        (_, PauseState::Paused { reason, since }) => Line::from(vec![
            Span::styled(
                format!("Paused: {reason}"),
                Style::default().fg(Color::Magenta),
            ),
            Span::styled(format!(" since {}  (r to resume)", since.strftime("%H:%M")), muted()),
        ]),
        (_, PauseState::Running) if progress.is_complete() => Line::from(Span::styled(
            "Arrived. Complete the ePOD to finish the trip.",
            Style::default().fg(Color::Green),
        )),
        (_, PauseState::Running) if controller.is_progress_running() => {
            Line::from(Span::styled("Driving  (p to pause)", normal()))
        }
        (_, PauseState::Running) => Line::from(Span::styled(
            "Not started. Finish the checklist and start the trip.",
            muted(),
        )),
    };
    let status = Paragraph::new(status).block(Block::default().padding(Padding::new(2, 2, 1, 0)));
    frame.render_widget(status, chunks[3]);

    if let Some(selected) = state.pause_picker {
        render_picker(frame, area, selected);
    }
}

/// Route as a line with the truck's position marked.
fn route_strip(progress: Progress, width: usize) -> String {
    let width = width.max(3);
    let inner = width - 2;
    let at = inner * usize::from(progress.value()) / 100;
    let mut strip = String::with_capacity(width * 3);
    strip.push('●');
    for i in 0..inner {
        strip.push(match i.cmp(&at) {
            std::cmp::Ordering::Less => '━',
            std::cmp::Ordering::Equal => '▶',
            std::cmp::Ordering::Greater => '─',
        });
    }
    strip.push(if progress.is_complete() { '◉' } else { '○' });
    strip
}

fn render_picker(frame: &mut Frame, area: Rect, selected: Option<PauseReason>) {
    let rect = centered(area, 40, 9);
    frame.render_widget(Clear, rect);

    let items: Vec<ListItem> = PauseReason::ALL
        .iter()
        .enumerate()
        .map(|(i, reason)| {
            let focused = selected == Some(*reason);
            let style = if focused { highlight() } else { normal() };
            ListItem::new(Line::from(vec![
                Span::styled(pointer(focused), highlight()),
                Span::styled(format!("{} {}", i + 1, reason.label()), style),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(" Pause trip: why? ")
            .borders(Borders::ALL)
            .border_style(muted())
            .padding(Padding::new(1, 1, 1, 0)),
    );
    frame.render_widget(list, rect);
}
