use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Padding, Paragraph};

use crate::controller::TripController;
use crate::model::{Photo, TripStatus};

use super::{highlight, muted, normal, pointer};
use crate::tui::state::{EpodField, ScreenState};

pub(super) fn render(frame: &mut Frame, area: Rect, controller: &TripController, state: &ScreenState) {
    let epod = controller.epod();
    let trip = controller.trip();
    let completed = matches!(controller.status(), TripStatus::Completed { .. });
    let editable = !completed && !controller.is_submitting_epod();

    let label = |field: EpodField, text: &str| {
        let focused = editable && state.epod_field == field;
        vec![
            Span::styled(pointer(focused), highlight()),
            Span::styled(
                format!("{text:<20}"),
                if focused { highlight() } else { muted() },
            ),
        ]
    };

    let mut lines = vec![
        Line::from(Span::styled("Electronic proof of delivery", highlight())),
        Line::from(""),
    ];

    let mut quantity = label(EpodField::Quantity, "Delivered quantity");
    let shown = if epod.delivered_quantity.is_empty() {
        Span::styled(format!("(loaded {})", trip.quantity), muted())
    } else {
        Span::styled(epod.delivered_quantity.clone(), normal())
    };
    quantity.push(shown);
    if let Some(short) = epod.shortfall(trip.quantity) {
        quantity.push(Span::styled(
            format!("  {short} short of loaded count"),
            Style::default().fg(Color::Yellow),
        ));
    }
    lines.push(Line::from(quantity));

    let mut health = label(EpodField::Health, "Livestock healthy");
    health.push(if epod.livestock_healthy {
        Span::styled("yes", Style::default().fg(Color::Green))
    } else {
        Span::styled("no, report an incident", Style::default().fg(Color::Red))
    });
    lines.push(Line::from(health));

    let mut signature = label(EpodField::Signature, "Receiver signature");
    match &epod.signature {
        Some(sig) => signature.push(Span::styled(
            format!("{} (signed {})", sig.name, sig.signed_at.strftime("%H:%M")),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::ITALIC),
        )),
        None if state.signer_input.is_empty() => {
            signature.push(Span::styled("type name, ⏎ to sign", muted()));
        }
        None => signature.push(Span::styled(state.signer_input.clone(), normal())),
    }
    lines.push(Line::from(signature));

    let mut photos = label(EpodField::Photos, "Delivery photos");
    photos.push(if epod.has_photos() {
        let kb = epod.photos.iter().map(Photo::size_bytes).sum::<usize>().div_ceil(1024);
        Span::styled(format!("{} attached ({kb} KB)", epod.photos.len()), normal())
    } else {
        Span::styled("none yet (at least one needed)", Style::default().fg(Color::Yellow))
    });
    lines.push(Line::from(photos));

    lines.push(Line::from(""));
    let submit = if completed {
        Line::from(Span::styled(
            "Delivery confirmed",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ))
    } else if controller.is_submitting_epod() {
        Line::from(Span::styled("Submitting…", muted()))
    } else {
        let ready = epod.has_photos() && epod.is_signed();
        let style = if ready {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            muted()
        };
        let mut spans = label(EpodField::Submit, "");
        spans.truncate(1);
        spans.push(Span::styled("[ Complete delivery ]", style));
        Line::from(spans)
    };
    lines.push(submit);

    let body = Paragraph::new(lines).block(Block::default().padding(Padding::new(2, 2, 1, 0)));
    frame.render_widget(body, area);
}
