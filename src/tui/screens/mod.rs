//! Screen rendering: the trip frame around whichever tab is open.

mod chat;
mod checklist;
mod epod;
mod incident;
mod map;
mod overview;

use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Padding, Paragraph, Tabs};

use crate::controller::{NoticeLevel, TripController};
use crate::lifecycle::Tab;
use crate::model::TripStatus;

use super::state::{EpodField, ScreenState};

fn muted() -> Style {
    Style::default().fg(Color::DarkGray)
}

fn normal() -> Style {
    Style::default().fg(Color::Gray)
}

fn highlight() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

/// `› ` for the focused row, blank otherwise.
fn pointer(focused: bool) -> &'static str {
    if focused { "› " } else { "  " }
}

/// Draws the whole trip screen.
pub fn render(frame: &mut Frame, controller: &TripController, state: &ScreenState, now: Instant) {
    let area = frame.area();

    let chunks = Layout::vertical([
        Constraint::Length(3), // header
        Constraint::Length(1), // tabs
        Constraint::Length(1), // separator
        Constraint::Min(0),    // body
        Constraint::Length(1), // notice
        Constraint::Length(1), // help
    ])
    .split(area);

    render_header(frame, chunks[0], controller);
    render_tabs(frame, chunks[1], controller, state);

    let sep = Paragraph::new(Line::from(Span::styled(
        "─".repeat(usize::from(area.width.saturating_sub(4))),
        muted(),
    )))
    .block(Block::default().padding(Padding::new(2, 2, 0, 0)));
    frame.render_widget(sep, chunks[2]);

    let body = chunks[3];
    match state.tab {
        Tab::Overview => overview::render(frame, body, controller),
        Tab::Checklist => checklist::render(frame, body, controller, state),
        Tab::Map => map::render(frame, body, controller, state),
        Tab::Chat => chat::render(frame, body, controller, state),
        Tab::Epod => epod::render(frame, body, controller, state),
    }

    if let Some(notice) = state.notice(now) {
        let color = match notice.level {
            NoticeLevel::Info => Color::Cyan,
            NoticeLevel::Success => Color::Green,
            NoticeLevel::Error => Color::Red,
        };
        let line = Paragraph::new(Line::from(Span::styled(
            format!(" {}", notice.text),
            Style::default().fg(color),
        )));
        frame.render_widget(line, chunks[4]);
    }

    let help = Paragraph::new(Line::from(Span::styled(help_text(state), muted())));
    frame.render_widget(help, chunks[5]);

    if let Some(dialog) = &state.incident {
        incident::render(frame, area, dialog);
    }
}

fn render_header(frame: &mut Frame, area: Rect, controller: &TripController) {
    let trip = controller.trip();
    let (badge, color) = match controller.status() {
        TripStatus::Scheduled => ("SCHEDULED", Color::Yellow),
        TripStatus::InTransit { .. } => ("IN TRANSIT", Color::Cyan),
        TripStatus::Completed { .. } => ("COMPLETED", Color::Green),
    };

    let mut spans = vec![
        Span::styled(trip.id.clone(), highlight()),
        Span::styled(
            format!("  {} x {}  ", trip.quantity, trip.species),
            normal(),
        ),
        Span::styled(
            format!("[{badge}]"),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
    ];
    if let Some(reason) = controller.pause().reason() {
        spans.push(Span::styled(
            format!("  paused: {reason}"),
            Style::default().fg(Color::Magenta),
        ));
    }

    let header =
        Paragraph::new(Line::from(spans)).block(Block::default().padding(Padding::new(2, 0, 1, 0)));
    frame.render_widget(header, area);
}

fn render_tabs(frame: &mut Frame, area: Rect, controller: &TripController, state: &ScreenState) {
    let enabled = controller.lifecycle().enabled_tabs();
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| {
            let style = if enabled.contains(tab) {
                normal()
            } else {
                muted().add_modifier(Modifier::CROSSED_OUT)
            };
            Line::from(Span::styled(format!("{} {}", i + 1, tab.title()), style))
        })
        .collect();
    let selected = Tab::ALL.iter().position(|t| *t == state.tab).unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .highlight_style(highlight().add_modifier(Modifier::UNDERLINED))
        .divider(Span::styled(" │ ", muted()))
        .block(Block::default().padding(Padding::new(1, 1, 0, 0)));
    frame.render_widget(tabs, area);
}

fn help_text(state: &ScreenState) -> &'static str {
    if state.incident.is_some() {
        return " tab field  ←→ choose  p add photo  ⏎ submit  esc close";
    }
    if state.pause_picker.is_some() {
        return " 1-4 reason  ⏎ pause  esc cancel";
    }
    match state.tab {
        Tab::Overview => " ←→ tabs  1-5 jump  i incident  q quit",
        Tab::Checklist => " ↑↓ select  space toggle  p photo  s start trip  i incident  q quit",
        Tab::Map => " p pause  r resume  ←→ tabs  i incident  q quit",
        Tab::Chat => " type a message  ⏎ send  ←→ tabs  ctrl-c quit",
        Tab::Epod => match state.epod_field {
            EpodField::Quantity | EpodField::Signature => " ↑↓ field  type  ⏎ sign  ctrl-c quit",
            EpodField::Health => " ↑↓ field  space toggle  i incident  q quit",
            EpodField::Photos => " ↑↓ field  p add photo  x remove  i incident  q quit",
            EpodField::Submit => " ↑↓ field  ⏎ submit  i incident  q quit",
        },
    }
}

/// A rectangle of at most `width` x `height`, centered in `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
