use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, List, ListItem, Padding, Paragraph};

use crate::controller::TripController;
use crate::model::TripStatus;

use super::{highlight, muted, normal, pointer};
use crate::tui::state::ScreenState;

pub(super) fn render(frame: &mut Frame, area: Rect, controller: &TripController, state: &ScreenState) {
    let chunks = Layout::vertical([
        Constraint::Length(2), // heading
        Constraint::Min(0),    // items
        Constraint::Length(2), // footer
    ])
    .split(area);

    let checklist = controller.checklist();
    let locked = controller.status() != TripStatus::Scheduled;

    let heading = Paragraph::new(Line::from(vec![
        Span::styled("Pre-trip checks  ", highlight()),
        Span::styled(
            format!(
                "{}/{}",
                checklist.completed_count(),
                checklist.item_count()
            ),
            normal(),
        ),
    ]))
    .block(Block::default().padding(Padding::new(2, 0, 1, 0)));
    frame.render_widget(heading, chunks[0]);

    let items: Vec<ListItem> = checklist
        .iter()
        .enumerate()
        .map(|(i, (item, entry))| {
            let focused = i == state.checklist_cursor && !locked;
            let checked = entry.checked;
            let mark = if checked { "[x] " } else { "[ ] " };
            let label_style = if focused { highlight() } else { normal() };

            let mut spans = vec![
                Span::styled(pointer(focused), highlight()),
                Span::styled(mark, if checked { highlight() } else { muted() }),
                Span::styled(item.label(), label_style),
            ];
            if item.requires_photo() {
                let tag = if checklist.photo(item).is_some() {
                    Span::styled("  photo attached", Style::default().fg(Color::Green))
                } else {
                    Span::styled("  photo required", Style::default().fg(Color::Yellow))
                };
                spans.push(tag);
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items).block(Block::default().padding(Padding::new(2, 0, 1, 0)));
    frame.render_widget(list, chunks[1]);

    let footer = if locked {
        Line::from(Span::styled("Checklist locked once the trip has started", muted()))
    } else if checklist.all_complete() {
        Line::from(Span::styled(
            "All checks done. Press s to start the trip.",
            Style::default().fg(Color::Green),
        ))
    } else {
        Line::from(Span::styled(
            format!("{} check(s) left before the trip can start", checklist.outstanding().len()),
            muted(),
        ))
    };
    let footer = Paragraph::new(footer).block(Block::default().padding(Padding::new(2, 0, 0, 0)));
    frame.render_widget(footer, chunks[2]);
}
