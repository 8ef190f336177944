use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap};

use super::{centered, highlight, muted, normal, pointer};
use crate::tui::state::{IncidentDialog, IncidentField};

pub(super) fn render(frame: &mut Frame, area: Rect, dialog: &IncidentDialog) {
    let rect = centered(area, 64, 12);
    frame.render_widget(Clear, rect);

    let row = |field: IncidentField, label: &str, value: Span<'static>| {
        let focused = dialog.field == field;
        Line::from(vec![
            Span::styled(pointer(focused), highlight()),
            Span::styled(
                format!("{label:<13}"),
                if focused { highlight() } else { muted() },
            ),
            value,
        ])
    };
    let choice = |value: Option<String>| match value {
        Some(v) => Span::styled(format!("‹ {v} ›"), normal()),
        None => Span::styled("‹ choose ›", muted()),
    };

    let description = if dialog.description.is_empty() {
        Span::styled("what happened?", muted())
    } else {
        Span::styled(dialog.description.clone(), normal())
    };

    let lines = vec![
        row(
            IncidentField::Kind,
            "Type",
            choice(dialog.kind.map(|k| k.to_string())),
        ),
        row(
            IncidentField::Severity,
            "Severity",
            choice(dialog.severity.map(|s| s.to_string())),
        ),
        row(IncidentField::Description, "Description", description),
        row(
            IncidentField::Photos,
            "Photos",
            Span::styled(
                format!("{} attached  (p add, x remove)", dialog.images.len()),
                normal(),
            ),
        ),
        Line::from(""),
        Line::from(Span::styled("⏎ send to dispatch   esc cancel", muted())),
    ];

    let body = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(" Report incident ")
            .borders(Borders::ALL)
            .border_style(muted())
            .padding(Padding::new(1, 1, 1, 0)),
    );
    frame.render_widget(body, rect);
}
