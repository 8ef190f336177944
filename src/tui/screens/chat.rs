use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Padding, Paragraph, Wrap};

use crate::controller::TripController;
use crate::model::{Author, Delivery};

use super::{highlight, muted, normal};
use crate::tui::state::ScreenState;

pub(super) fn render(frame: &mut Frame, area: Rect, controller: &TripController, state: &ScreenState) {
    let chunks = Layout::vertical([
        Constraint::Min(0),    // history
        Constraint::Length(3), // input
    ])
    .split(area);

    let mut lines = Vec::new();
    for message in controller.chat() {
        let name_style = match message.author {
            Author::Driver => Style::default().fg(Color::Cyan),
            Author::Dispatch => highlight(),
        };
        let mut header = vec![
            Span::styled(message.sender.clone(), name_style),
            Span::styled(format!("  {}", message.sent_at.strftime("%H:%M")), muted()),
        ];
        if message.delivery == Delivery::Sending {
            header.push(Span::styled("  sending…", muted()));
        }
        lines.push(Line::from(header));
        lines.push(Line::from(Span::styled(message.body.clone(), normal())));
        lines.push(Line::from(""));
    }

    // Keep the newest messages in view.
    let visible = usize::from(chunks[0].height.saturating_sub(1));
    let skip = lines.len().saturating_sub(visible);
    let history = Paragraph::new(lines.into_iter().skip(skip).collect::<Vec<_>>())
        .wrap(Wrap { trim: false })
        .block(Block::default().padding(Padding::new(2, 2, 1, 0)));
    frame.render_widget(history, chunks[0]);

    let input = Paragraph::new(Line::from(vec![
        Span::styled("› ", highlight()),
        Span::styled(state.chat_input.clone(), normal()),
        Span::styled("▏", muted()),
    ]))
    .block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(muted())
            .padding(Padding::new(2, 2, 0, 0)),
    );
    frame.render_widget(input, chunks[1]);
}
