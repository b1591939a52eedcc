//! Interactive session state: the controller plus everything the screens type into.

use chrono::{DateTime, Duration, Local, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use thatsit_core::{
    tray_title, Config, Event, LockController, LockError, Phase, SetupForm, ShortcutOutcome,
    TypedField, UrgencyThresholds,
};
use tracing::{debug, info, warn};

/// `HH:MM`
const CUTOFF_MAX_LEN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupFocus {
    Cutoff,
    Password,
}

pub struct App {
    controller: LockController,
    config: Config,
    thresholds: UrgencyThresholds,
    cutoff: TypedField,
    password: TypedField,
    focus: SetupFocus,
    setup_error: Option<String>,
    attempt: TypedField,
    shake_until: Option<DateTime<Utc>>,
    quit: bool,
}

impl App {
    pub fn new(config: Config, cutoff: Option<String>) -> Self {
        let cutoff = cutoff.unwrap_or_else(|| config.lock.default_cutoff.clone());
        Self {
            controller: LockController::new(),
            thresholds: config.countdown.thresholds(),
            config,
            cutoff: TypedField::new().with_value(cutoff),
            password: TypedField::protected(),
            focus: SetupFocus::Password,
            setup_error: None,
            attempt: TypedField::protected(),
            shake_until: None,
            quit: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.controller.phase()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn thresholds(&self) -> &UrgencyThresholds {
        &self.thresholds
    }

    pub fn cutoff(&self) -> &TypedField {
        &self.cutoff
    }

    pub fn password(&self) -> &TypedField {
        &self.password
    }

    pub fn attempt(&self) -> &TypedField {
        &self.attempt
    }

    pub fn focus(&self) -> SetupFocus {
        self.focus
    }

    pub fn setup_error(&self) -> Option<&str> {
        self.setup_error.as_deref()
    }

    pub fn remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.controller.remaining(now)
    }

    pub fn target_local(&self) -> Option<DateTime<Local>> {
        self.controller.target().map(|t| t.with_timezone(&Local))
    }

    /// Length the lock screen counter compares against.
    pub fn unlock_len(&self) -> usize {
        self.controller
            .password_len()
            .unwrap_or(self.config.lock.password_length)
    }

    pub fn shaking(&self, now: DateTime<Utc>) -> bool {
        self.shake_until.is_some_and(|until| now < until)
    }

    pub fn title(&self, now: DateTime<Utc>) -> String {
        tray_title(self.phase(), self.remaining(now))
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    // ── Input ────────────────────────────────────────────────────────

    /// Feed the clock. Returns `Event::Locked` on the frame the curfew hits.
    pub fn on_tick(&mut self, now: DateTime<Utc>) -> Option<Event> {
        let before = self.controller.phase();
        let after = self.controller.tick(now);
        if before == Phase::CountingDown && after == Phase::Locked {
            self.attempt.clear();
            let event = Event::Locked {
                target: self.controller.target()?,
                at: now,
            };
            log_event(&event);
            return Some(event);
        }
        None
    }

    pub fn on_key(&mut self, key: KeyEvent, now: DateTime<Utc>) -> Option<Event> {
        if let KeyCode::Char(c) = key.code {
            // AltGr arrives as Ctrl+Alt on Windows and produces a plain character.
            let altgr = key
                .modifiers
                .contains(KeyModifiers::CONTROL | KeyModifiers::ALT);
            let ctrl = !altgr
                && key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER);
            match self.phase().window_policy().shortcut(ctrl, c) {
                ShortcutOutcome::Quit | ShortcutOutcome::Close => {
                    info!(phase = %self.phase(), "quit requested");
                    self.quit = true;
                    return None;
                }
                ShortcutOutcome::Blocked => {
                    warn!(key = %c, "blocked quit attempt while locked");
                    return None;
                }
                ShortcutOutcome::Ignored if ctrl => return None,
                ShortcutOutcome::Ignored => {}
            }
        }

        match self.phase() {
            Phase::Configuring => self.setup_key(key, now),
            Phase::CountingDown => None,
            Phase::Locked => self.lock_key(key, now),
        }
    }

    pub fn on_paste(&mut self, text: &str, now: DateTime<Utc>) {
        match self.phase() {
            Phase::Configuring => {
                let field = match self.focus {
                    SetupFocus::Cutoff => &mut self.cutoff,
                    SetupFocus::Password => &mut self.password,
                };
                if let Err(e) = field.paste(text) {
                    warn!("paste rejected in setup form");
                    self.setup_error = Some(e.to_string());
                }
            }
            Phase::Locked => {
                if self.attempt.paste(text).is_err() {
                    warn!("paste rejected on lock screen");
                    self.shake(now);
                }
            }
            Phase::CountingDown => {}
        }
    }

    fn setup_key(&mut self, key: KeyEvent, now: DateTime<Utc>) -> Option<Event> {
        match key.code {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.focus = match self.focus {
                    SetupFocus::Cutoff => SetupFocus::Password,
                    SetupFocus::Password => SetupFocus::Cutoff,
                };
            }
            KeyCode::Backspace => {
                match self.focus {
                    SetupFocus::Cutoff => self.cutoff.backspace(),
                    SetupFocus::Password => self.password.backspace(),
                }
                self.setup_error = None;
            }
            KeyCode::Enter => return self.submit_setup(now),
            KeyCode::Char(c) => {
                match self.focus {
                    SetupFocus::Cutoff => {
                        if (c.is_ascii_digit() || c == ':') && self.cutoff.len() < CUTOFF_MAX_LEN {
                            self.cutoff.type_char(c);
                        }
                    }
                    SetupFocus::Password => self.password.type_char(c),
                }
                self.setup_error = None;
            }
            _ => {}
        }
        None
    }

    fn submit_setup(&mut self, now: DateTime<Utc>) -> Option<Event> {
        let form = SetupForm {
            cutoff: self.cutoff.value(),
            password: self.password.value(),
        };
        let armed = form.arm(
            &mut self.controller,
            self.config.lock.password_length,
            &now.with_timezone(&Local),
        );
        let schedule = match armed {
            Ok(schedule) => schedule,
            Err(e) => {
                debug!(error = %e, "setup form rejected");
                self.setup_error = Some(e.to_string());
                return None;
            }
        };
        self.password.clear();
        self.setup_error = None;

        let event = Event::CountdownStarted {
            cutoff: schedule.to_string(),
            target: self.controller.target()?,
            at: now,
        };
        log_event(&event);
        Some(event)
    }

    fn lock_key(&mut self, key: KeyEvent, now: DateTime<Utc>) -> Option<Event> {
        match key.code {
            KeyCode::Char(c) => self.attempt.type_char(c),
            KeyCode::Backspace => self.attempt.backspace(),
            KeyCode::Enter if !self.attempt.is_empty() => {
                let attempt = self.attempt.take();
                let event = match self.controller.unlock(&attempt) {
                    Ok(()) => {
                        self.shake_until = None;
                        Event::Unlocked { at: now }
                    }
                    Err(LockError::WrongPassword) => {
                        self.shake(now);
                        Event::UnlockFailed { at: now }
                    }
                    Err(e) => {
                        warn!(error = %e, "unlock refused");
                        return None;
                    }
                };
                log_event(&event);
                return Some(event);
            }
            _ => {}
        }
        None
    }

    fn shake(&mut self, now: DateTime<Utc>) {
        let length = i64::try_from(self.config.ui.shake_ms)
            .ok()
            .and_then(Duration::try_milliseconds)
            .unwrap_or_else(Duration::zero);
        self.shake_until = Some(now + length);
    }
}

fn log_event(event: &Event) {
    match serde_json::to_string(event) {
        Ok(json) => info!(event = %json, "event"),
        Err(e) => warn!(error = %e, "event could not be serialized"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const PASSWORD: &str = "offthescreen";

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn code(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            app.on_key(key(c), now());
        }
    }

    fn armed() -> App {
        let mut app = App::new(Config::default(), Some("17:00".into()));
        type_str(&mut app, PASSWORD);
        let event = app.on_key(code(KeyCode::Enter), now());
        assert!(matches!(event, Some(Event::CountdownStarted { .. })));
        app
    }

    fn locked() -> App {
        let mut app = armed();
        let target = app.controller.target().unwrap();
        assert!(matches!(app.on_tick(target), Some(Event::Locked { .. })));
        app
    }

    #[test]
    fn starts_on_setup_with_prefilled_cutoff() {
        let app = App::new(Config::default(), None);
        assert_eq!(app.phase(), Phase::Configuring);
        assert_eq!(app.cutoff().value(), "17:00");
        assert_eq!(app.focus(), SetupFocus::Password);
        assert_eq!(app.title(now()), "That's It");
    }

    #[test]
    fn short_password_is_rejected_with_message() {
        let mut app = App::new(Config::default(), None);
        type_str(&mut app, "short");
        assert_eq!(app.on_key(code(KeyCode::Enter), now()), None);
        assert_eq!(app.phase(), Phase::Configuring);
        assert_eq!(
            app.setup_error(),
            Some("Password must be exactly 12 characters.")
        );
        // Typing again clears the message.
        type_str(&mut app, "x");
        assert_eq!(app.setup_error(), None);
    }

    #[test]
    fn paste_into_password_is_refused() {
        let mut app = App::new(Config::default(), None);
        app.on_paste(PASSWORD, now());
        assert!(app.password().is_empty());
        assert_eq!(
            app.setup_error(),
            Some("No copy-pasting allowed! You have to commit to this.")
        );
    }

    #[test]
    fn cutoff_field_only_takes_time_characters() {
        let mut app = App::new(Config::default(), Some(String::new()));
        app.on_key(code(KeyCode::Tab), now());
        assert_eq!(app.focus(), SetupFocus::Cutoff);
        type_str(&mut app, "2a1:3b0:99");
        assert_eq!(app.cutoff().value(), "21:30");
    }

    #[test]
    fn submit_arms_countdown_and_clears_password() {
        let app = armed();
        assert_eq!(app.phase(), Phase::CountingDown);
        assert!(app.password().is_empty());
        assert!(app.remaining(now()).is_some());
        assert_ne!(app.title(now()), "That's It");
    }

    #[test]
    fn typing_during_countdown_is_ignored() {
        let mut app = armed();
        assert_eq!(app.on_key(key('a'), now()), None);
        assert_eq!(app.phase(), Phase::CountingDown);
    }

    #[test]
    fn quit_allowed_until_locked() {
        let mut app = armed();
        app.on_key(ctrl('q'), now());
        assert!(app.should_quit());

        let mut app = locked();
        for c in ['q', 'w', 'c'] {
            app.on_key(ctrl(c), now());
        }
        assert!(!app.should_quit());
        assert_eq!(app.phase(), Phase::Locked);
        assert_eq!(app.title(now()), "🔒");
    }

    #[test]
    fn altgr_characters_are_typed() {
        let altgr = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL | KeyModifiers::ALT);
        let mut app = App::new(Config::default(), None);
        app.on_key(altgr('@'), now());
        app.on_key(altgr('{'), now());
        assert_eq!(app.password().value(), "@{");
        assert!(!app.should_quit());

        let mut app = locked();
        app.on_key(altgr('q'), now());
        assert_eq!(app.attempt().value(), "q");
        assert!(!app.should_quit());
    }

    #[test]
    fn wrong_password_shakes_and_clears() {
        let mut app = locked();
        type_str(&mut app, "notthepasswd");
        let event = app.on_key(code(KeyCode::Enter), now());
        assert!(matches!(event, Some(Event::UnlockFailed { .. })));
        assert!(app.attempt().is_empty());
        assert!(app.shaking(now()));
        assert!(!app.shaking(now() + Duration::milliseconds(500)));
        assert_eq!(app.phase(), Phase::Locked);
    }

    #[test]
    fn empty_attempt_is_not_submitted() {
        let mut app = locked();
        assert_eq!(app.on_key(code(KeyCode::Enter), now()), None);
        assert!(!app.shaking(now()));
    }

    #[test]
    fn paste_on_lock_screen_shakes() {
        let mut app = locked();
        app.on_paste(PASSWORD, now());
        assert!(app.attempt().is_empty());
        assert!(app.shaking(now()));
        assert_eq!(app.phase(), Phase::Locked);
    }

    #[test]
    fn correct_password_returns_to_setup() {
        let mut app = locked();
        assert_eq!(app.unlock_len(), 12);
        type_str(&mut app, PASSWORD);
        let event = app.on_key(code(KeyCode::Enter), now());
        assert!(matches!(event, Some(Event::Unlocked { .. })));
        assert_eq!(app.phase(), Phase::Configuring);
        assert_eq!(app.remaining(now()), None);
    }
}
