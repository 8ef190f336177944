//! Application loop and key routing.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;

use crate::controller::{Command, TripController};
use crate::lifecycle::Tab;
use crate::mock;
use crate::model::{ChecklistItem, IncidentKind, PauseReason, Severity, cycle};

use super::screens;
use super::state::{EpodField, IncidentDialog, IncidentField, ScreenState};

/// Longest the loop waits for input before redrawing.
const MAX_WAIT: Duration = Duration::from_millis(250);

/// Runs the trip screen until the driver quits.
pub fn run(controller: TripController) -> io::Result<()> {
    let mut terminal = ratatui::init();
    let mut app = App::new(controller);
    let result = event_loop(&mut terminal, &mut app);
    ratatui::restore();
    result
}

fn event_loop(terminal: &mut DefaultTerminal, app: &mut App) -> io::Result<()> {
    loop {
        let now = Instant::now();
        app.tick(now);
        terminal.draw(|frame| screens::render(frame, &app.controller, &app.state, now))?;

        if !event::poll(app.poll_timeout(now))? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.on_key(key, Instant::now()) == Flow::Quit {
                return Ok(());
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// The controller plus what the screen remembers between frames.
struct App {
    controller: TripController,
    state: ScreenState,
}

impl App {
    fn new(controller: TripController) -> Self {
        Self {
            controller,
            state: ScreenState::new(),
        }
    }

    fn tick(&mut self, now: Instant) {
        self.controller.tick(now);
        self.sync(now);
    }

    /// Wait until the next timer, notice expiry, or `MAX_WAIT`, whichever is first.
    fn poll_timeout(&self, now: Instant) -> Duration {
        [self.controller.next_deadline(), self.state.notice_expiry(now)]
            .into_iter()
            .flatten()
            .map(|at| at.saturating_duration_since(now))
            .fold(MAX_WAIT, Duration::min)
    }

    /// Picks up notices and tab changes after the controller has moved.
    fn sync(&mut self, now: Instant) {
        let notices = self.controller.drain_notices();
        self.state.show_notices(notices, now);
        self.state.ensure_enabled_tab(&self.controller);
    }

    /// Sends a command; the outcome shows up as a notice on the next sync.
    fn send(&mut self, command: Command, now: Instant) -> bool {
        let accepted = self.controller.apply(command, now).is_ok();
        self.sync(now);
        accepted
    }

    fn on_key(&mut self, key: KeyEvent, now: Instant) -> Flow {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Flow::Quit;
        }
        if self.state.incident.is_some() {
            self.on_incident_key(key, now);
            return Flow::Continue;
        }
        if self.state.pause_picker.is_some() {
            self.on_pause_picker_key(key, now);
            return Flow::Continue;
        }

        let typing = self.state.is_typing();
        match key.code {
            KeyCode::Tab | KeyCode::Right => self.state.next_tab(&self.controller),
            KeyCode::BackTab | KeyCode::Left => self.state.prev_tab(&self.controller),
            KeyCode::Char('q') if !typing => return Flow::Quit,
            KeyCode::Char('i') if !typing => self.state.incident = Some(IncidentDialog::new()),
            KeyCode::Char(c @ '1'..='5') if !typing => {
                let index = usize::from(c as u8 - b'1');
                self.state.select_tab(&self.controller, Tab::ALL[index]);
            }
            _ => match self.state.tab {
                Tab::Overview => {}
                Tab::Checklist => self.on_checklist_key(key, now),
                Tab::Map => self.on_map_key(key, now),
                Tab::Chat => self.on_chat_key(key, now),
                Tab::Epod => self.on_epod_key(key, now),
            },
        }
        Flow::Continue
    }

    fn on_checklist_key(&mut self, key: KeyEvent, now: Instant) {
        let item = ChecklistItem::ALL[self.state.checklist_cursor.min(ChecklistItem::ALL.len() - 1)];
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.state.checklist_cursor = self.state.checklist_cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.state.checklist_cursor + 1 < ChecklistItem::ALL.len() {
                    self.state.checklist_cursor += 1;
                }
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                self.send(Command::ToggleItem { item }, now);
            }
            KeyCode::Char('p') => {
                self.send(
                    Command::AttachItemPhoto {
                        item,
                        image: mock::camera_frame(),
                    },
                    now,
                );
            }
            KeyCode::Char('s') => {
                if self.send(Command::StartTrip, now) {
                    self.state.select_tab(&self.controller, Tab::Map);
                }
            }
            _ => {}
        }
    }

    fn on_map_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            // The pause control only works in transit, and not while paused.
            KeyCode::Char('p')
                if self.controller.lifecycle().is_in_transit()
                    && !self.controller.pause().is_paused() =>
            {
                self.state.pause_picker = Some(None);
            }
            KeyCode::Char('r') => {
                self.send(Command::Resume, now);
            }
            _ => {}
        }
    }

    fn on_pause_picker_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Esc => self.state.pause_picker = None,
            KeyCode::Char(c @ '1'..='4') => {
                let index = usize::from(c as u8 - b'1');
                self.state.pause_picker = Some(Some(PauseReason::ALL[index]));
            }
            KeyCode::Enter => {
                let reason = self.state.pause_picker.flatten();
                if self.send(Command::Pause { reason }, now) {
                    self.state.pause_picker = None;
                }
            }
            _ => {}
        }
    }

    fn on_chat_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Char(c) => self.state.chat_input.push(c),
            KeyCode::Backspace => {
                self.state.chat_input.pop();
            }
            KeyCode::Enter => {
                let body = self.state.chat_input.clone();
                if self.send(Command::SendMessage { body }, now) {
                    self.state.chat_input.clear();
                }
            }
            _ => {}
        }
    }

    fn on_epod_key(&mut self, key: KeyEvent, now: Instant) {
        let field = self.state.epod_field;
        match (field, key.code) {
            (_, KeyCode::Up) => self.state.epod_field = field.prev(),
            (_, KeyCode::Down) => self.state.epod_field = field.next(),

            (EpodField::Quantity, KeyCode::Char(c)) if c.is_ascii_digit() => {
                let mut value = self.state.quantity_input.clone();
                value.push(c);
                self.edit_quantity(value, now);
            }
            (EpodField::Quantity, KeyCode::Backspace) => {
                let mut value = self.state.quantity_input.clone();
                value.pop();
                self.edit_quantity(value, now);
            }

            (EpodField::Health, KeyCode::Char(' ') | KeyCode::Enter) => {
                let healthy = !self.controller.epod().livestock_healthy;
                self.send(Command::SetHealthy { healthy }, now);
            }

            (EpodField::Signature, KeyCode::Char(c)) => self.state.signer_input.push(c),
            (EpodField::Signature, KeyCode::Backspace) => {
                self.state.signer_input.pop();
            }
            (EpodField::Signature, KeyCode::Enter) => {
                let name = self.state.signer_input.clone();
                self.send(Command::Sign { name }, now);
            }

            (EpodField::Photos, KeyCode::Char('p')) => {
                self.send(
                    Command::AddEpodPhoto {
                        image: mock::camera_frame(),
                    },
                    now,
                );
            }
            (EpodField::Photos, KeyCode::Char('x')) => {
                if let Some(id) = self.controller.epod().photos.last().map(|p| p.id) {
                    self.send(Command::RemoveEpodPhoto { id }, now);
                }
            }

            (EpodField::Submit, KeyCode::Enter) => {
                self.send(Command::SubmitEpod, now);
            }
            _ => {}
        }
    }

    /// The input only changes once the controller has taken the new value.
    fn edit_quantity(&mut self, value: String, now: Instant) {
        if self.send(Command::SetDeliveredQuantity { value: value.clone() }, now) {
            self.state.quantity_input = value;
        }
    }

    fn on_incident_key(&mut self, key: KeyEvent, now: Instant) {
        let Some(dialog) = self.state.incident.as_mut() else {
            return;
        };
        match (dialog.field, key.code) {
            (_, KeyCode::Esc) => self.state.incident = None,
            (_, KeyCode::Tab | KeyCode::Down) => dialog.field = dialog.field.next(),
            (_, KeyCode::BackTab | KeyCode::Up) => dialog.field = dialog.field.prev(),

            (IncidentField::Kind, KeyCode::Left | KeyCode::Right) => {
                dialog.kind = cycle(&IncidentKind::ALL, dialog.kind, key.code == KeyCode::Right);
            }
            (IncidentField::Severity, KeyCode::Left | KeyCode::Right) => {
                dialog.severity =
                    cycle(&Severity::ALL, dialog.severity, key.code == KeyCode::Right);
            }
            (IncidentField::Description, KeyCode::Char(c)) => dialog.description.push(c),
            (IncidentField::Description, KeyCode::Backspace) => {
                dialog.description.pop();
            }
            (IncidentField::Photos, KeyCode::Char('p')) => dialog.images.push(mock::camera_frame()),
            (IncidentField::Photos, KeyCode::Char('x')) => {
                dialog.images.pop();
            }

            (_, KeyCode::Enter) => {
                let command = Command::ReportIncident {
                    incident_kind: dialog.kind,
                    severity: dialog.severity,
                    description: dialog.description.clone(),
                    images: dialog.images.clone(),
                };
                if self.send(command, now) {
                    self.state.incident = None;
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::controller::Settings;
    use crate::model::TripStatus;

    fn app() -> App {
        let settings = Settings {
            submission_delay: Duration::ZERO,
            ..Settings::default()
        };
        App::new(TripController::new(mock::sample_trip(), settings))
    }

    fn press(app: &mut App, code: KeyCode) -> Flow {
        app.on_key(KeyEvent::new(code, KeyModifiers::NONE), Instant::now())
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn complete_checklist(app: &mut App) {
        press(app, KeyCode::Char('2'));
        assert_eq!(app.state.tab, Tab::Checklist);
        for item in ChecklistItem::ALL {
            if item.requires_photo() {
                press(app, KeyCode::Char('p'));
            }
            press(app, KeyCode::Char(' '));
            assert!(app.controller.checklist().is_checked(item), "{item}");
            press(app, KeyCode::Down);
        }
    }

    #[test]
    fn q_quits_unless_typing() {
        let mut a = app();
        press(&mut a, KeyCode::Char('4'));
        assert_eq!(a.state.tab, Tab::Chat);
        assert_eq!(press(&mut a, KeyCode::Char('q')), Flow::Continue);
        assert_eq!(a.state.chat_input, "q");

        press(&mut a, KeyCode::Char('1'));
        assert_eq!(a.state.chat_input, "q1");

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(a.on_key(ctrl_c, Instant::now()), Flow::Quit);
    }

    #[test]
    fn starting_from_the_checklist_opens_the_map() {
        let mut a = app();
        press(&mut a, KeyCode::Char('2'));
        press(&mut a, KeyCode::Char('s'));
        assert_eq!(a.controller.status(), TripStatus::Scheduled);
        assert!(a.state.notice(Instant::now()).is_some());

        complete_checklist(&mut a);
        press(&mut a, KeyCode::Char('s'));
        assert!(matches!(a.controller.status(), TripStatus::InTransit { .. }));
        assert_eq!(a.state.tab, Tab::Map);
    }

    #[test]
    fn pause_picker_needs_a_reason() {
        let mut a = app();
        complete_checklist(&mut a);
        press(&mut a, KeyCode::Char('s'));

        press(&mut a, KeyCode::Char('p'));
        assert_eq!(a.state.pause_picker, Some(None));
        press(&mut a, KeyCode::Enter);
        assert!(!a.controller.pause().is_paused());
        assert!(a.state.pause_picker.is_some());

        press(&mut a, KeyCode::Char('2'));
        press(&mut a, KeyCode::Enter);
        assert_eq!(a.controller.pause().reason(), Some(PauseReason::Fuel));
        assert!(a.state.pause_picker.is_none());

        // Pause control is disabled while paused.
        press(&mut a, KeyCode::Char('p'));
        assert!(a.state.pause_picker.is_none());

        press(&mut a, KeyCode::Char('r'));
        assert!(!a.controller.pause().is_paused());
    }

    #[test]
    fn chat_sends_and_clears_input() {
        let mut a = app();
        press(&mut a, KeyCode::Char('4'));
        press(&mut a, KeyCode::Enter);
        assert!(a.controller.chat().is_empty());

        type_text(&mut a, "Leaving now");
        press(&mut a, KeyCode::Enter);
        assert_eq!(a.controller.chat().len(), 1);
        assert!(a.state.chat_input.is_empty());
    }

    #[test]
    fn incident_dialog_stays_open_until_valid() {
        let mut a = app();
        press(&mut a, KeyCode::Char('i'));
        assert!(a.state.incident.is_some());

        press(&mut a, KeyCode::Enter);
        assert!(a.state.incident.is_some());

        press(&mut a, KeyCode::Right); // kind
        press(&mut a, KeyCode::Tab);
        press(&mut a, KeyCode::Right); // severity
        press(&mut a, KeyCode::Tab);
        type_text(&mut a, "Flat tyre near Bacchus Marsh");
        press(&mut a, KeyCode::Enter);

        assert!(a.state.incident.is_none());
        assert_eq!(a.controller.incidents().len(), 1);
        assert_eq!(a.controller.incidents()[0].kind, IncidentKind::AnimalWelfare);
    }

    #[test]
    fn epod_flow_completes_the_trip() {
        let mut a = app();
        complete_checklist(&mut a);
        press(&mut a, KeyCode::Char('s'));
        a.tick(Instant::now() + Duration::from_secs(40));
        assert!(a.controller.tab_enabled(Tab::Epod));

        press(&mut a, KeyCode::Char('5'));
        assert_eq!(a.state.tab, Tab::Epod);

        type_text(&mut a, "45");
        assert_eq!(a.controller.epod().delivered_quantity, "45");

        press(&mut a, KeyCode::Down); // health
        press(&mut a, KeyCode::Down); // signature
        type_text(&mut a, "Jo Receiver");
        press(&mut a, KeyCode::Enter);
        assert!(a.controller.epod().is_signed());

        press(&mut a, KeyCode::Down); // photos
        press(&mut a, KeyCode::Char('p'));
        assert_eq!(a.controller.epod().photos.len(), 1);

        press(&mut a, KeyCode::Down); // submit
        press(&mut a, KeyCode::Enter);
        assert!(matches!(a.controller.status(), TripStatus::Completed { .. }));
        assert_eq!(a.state.tab, Tab::Overview);
    }

    #[test]
    fn expired_notice_does_not_spin_the_loop() {
        let mut a = app();
        let t0 = Instant::now();
        a.state.select_tab(&a.controller, Tab::Chat);
        a.on_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE), t0);
        assert!(a.state.notice(t0).is_some());
        assert!(a.poll_timeout(t0) <= MAX_WAIT);

        let later = t0 + Duration::from_secs(60);
        a.tick(later);
        assert_eq!(a.controller.next_deadline(), None);
        assert_eq!(a.poll_timeout(later), MAX_WAIT);
    }

    #[test]
    fn pause_key_ignored_once_delivered() {
        let mut a = app();
        complete_checklist(&mut a);
        press(&mut a, KeyCode::Char('s'));
        a.tick(Instant::now() + Duration::from_secs(40));
        a.controller
            .apply(Command::AddEpodPhoto { image: vec![1] }, Instant::now())
            .unwrap();
        a.controller
            .apply(Command::Sign { name: "Jo".into() }, Instant::now())
            .unwrap();
        a.controller
            .apply(Command::SubmitEpod, Instant::now())
            .unwrap();
        assert!(matches!(a.controller.status(), TripStatus::Completed { .. }));

        a.state.select_tab(&a.controller, Tab::Map);
        assert_eq!(a.state.tab, Tab::Map);
        press(&mut a, KeyCode::Char('p'));
        assert!(a.state.pause_picker.is_none());
    }

    #[test]
    fn rejected_quantity_edit_leaves_input_alone() {
        let settings = Settings {
            submission_delay: Duration::from_secs(5),
            ..Settings::default()
        };
        let mut a = App::new(TripController::new(mock::sample_trip(), settings));
        complete_checklist(&mut a);
        press(&mut a, KeyCode::Char('s'));
        let now = Instant::now() + Duration::from_secs(40);
        a.tick(now);
        press(&mut a, KeyCode::Char('5'));
        type_text(&mut a, "44");
        assert_eq!(a.state.quantity_input, "44");

        a.controller
            .apply(Command::AddEpodPhoto { image: vec![1] }, now)
            .unwrap();
        a.controller
            .apply(Command::Sign { name: "Jo".into() }, now)
            .unwrap();
        a.controller.apply(Command::SubmitEpod, now).unwrap();
        assert!(a.controller.is_submitting_epod());

        type_text(&mut a, "9");
        press(&mut a, KeyCode::Backspace);
        assert_eq!(a.state.quantity_input, "44");
        assert_eq!(a.controller.epod().delivered_quantity, "44");
    }

}
