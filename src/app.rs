use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::{debug, info};

use crate::{
    config::Config,
    error::TypingResult,
    input::{self, Keystroke},
    runtime::{Countdown, TypingEvent},
    score::Score,
    session::Session,
    word_source::WordSource,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Typing,
    Results,
}

/// What the event loop should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// One game at a time: the session, its countdown and, once over, the score.
pub struct App {
    pub config: Config,
    pub session: Session,
    pub score: Option<Score>,
    pub state: AppState,
    source: Box<dyn WordSource>,
    countdown: Option<Countdown>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field("session", &self.session)
            .field("score", &self.score)
            .field("state", &self.state)
            .field("countdown", &self.countdown)
            .finish_non_exhaustive()
    }
}

impl App {
    pub fn new(config: Config, source: Box<dyn WordSource>) -> TypingResult<Self> {
        config.validate()?;
        let words = source.words(config.words_per_session)?;
        let session = Session::initialize(&words, config.session_duration_secs)?;

        Ok(Self {
            config,
            session,
            score: None,
            state: AppState::Typing,
            source,
            countdown: None,
        })
    }

    /// Same words, fresh marks and clock.
    pub fn restart(&mut self) -> TypingResult<()> {
        let words = self.session.word_list();
        self.reset_with(&words)
    }

    /// New words from the source.
    pub fn new_game(&mut self) -> TypingResult<()> {
        let words = self.source.words(self.config.words_per_session)?;
        self.reset_with(&words)
    }

    fn reset_with(&mut self, words: &[String]) -> TypingResult<()> {
        let session = Session::initialize(words, self.config.session_duration_secs)?;
        self.session = session;
        self.countdown = None;
        self.score = None;
        self.state = AppState::Typing;
        Ok(())
    }

    pub fn has_started(&self) -> bool {
        self.countdown.is_some() || self.session.is_finished()
    }

    pub fn on_tick(&mut self, now: Instant) {
        let Some(countdown) = self.countdown.as_mut() else {
            return;
        };

        for _ in 0..countdown.poll(now) {
            if let Err(err) = self.session.tick() {
                debug!(%err, "tick ignored");
                break;
            }
        }

        if self.session.is_finished() {
            self.finish();
        }
    }

    /// Feeds one runner event into the game.
    pub fn handle(&mut self, event: TypingEvent) -> TypingResult<Control> {
        match event {
            TypingEvent::Key(key, at) => {
                let control = self.on_key(key, at)?;
                // steady typing can starve the tick timeout
                self.on_tick(at);
                Ok(control)
            }
            TypingEvent::Tick(now) => {
                self.on_tick(now);
                Ok(Control::Continue)
            }
            TypingEvent::Resize => Ok(Control::Continue),
            TypingEvent::Closed => {
                info!("event stream closed");
                Ok(Control::Quit)
            }
        }
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Instant) -> TypingResult<Control> {
        if key.kind == KeyEventKind::Release {
            return Ok(Control::Continue);
        }

        match key.code {
            KeyCode::Esc => return Ok(Control::Quit),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Ok(Control::Quit)
            }
            KeyCode::Left => {
                self.restart()?;
                return Ok(Control::Continue);
            }
            KeyCode::Right => {
                self.new_game()?;
                return Ok(Control::Continue);
            }
            _ => {}
        }

        match self.state {
            AppState::Typing => {
                // shortcuts are not text; shift is
                let chord = key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
                let stroke = match key.code {
                    KeyCode::Char(c) if !chord => Keystroke::from(c),
                    KeyCode::Backspace => Keystroke::Backspace,
                    _ => return Ok(Control::Continue),
                };
                self.type_key(stroke, now)?;
            }
            AppState::Results => match key.code {
                KeyCode::Char('r') => self.restart()?,
                KeyCode::Char('n') => self.new_game()?,
                _ => {}
            },
        }

        Ok(Control::Continue)
    }

    fn type_key(&mut self, stroke: Keystroke, now: Instant) -> TypingResult<()> {
        if self.countdown.is_none() && !self.session.is_finished() {
            debug!("countdown started");
            self.countdown = Some(Countdown::start(now));
        }

        match input::apply(&mut self.session, stroke) {
            Ok(nav) => {
                debug!(?stroke, ?nav, "key applied");
                Ok(())
            }
            Err(err) if err.is_recoverable() => {
                debug!(%err, "key ignored");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    fn finish(&mut self) {
        self.countdown = None;
        let score = Score::calculate(&self.session);
        info!(
            wpm = score.wpm,
            accuracy = score.accuracy,
            correct_words = score.correct_words,
            "session scored"
        );
        self.score = Some(score);
        self.state = AppState::Results;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TypingError;
    use crate::session::WordMark;
    use crate::word_source::FixedWords;
    use assert_matches::assert_matches;
    use std::time::Duration;

    fn app(prompt: &str, secs: u64) -> App {
        let config = Config {
            session_duration_secs: secs,
            ..Config::default()
        };
        App::new(config, Box::new(FixedWords::from_prompt(prompt))).unwrap()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(app: &mut App, text: &str, now: Instant) {
        for c in text.chars() {
            app.on_key(key(KeyCode::Char(c)), now).unwrap();
        }
    }

    #[test]
    fn test_app_new() {
        let app = app("cat dog", 30);

        assert_eq!(app.state, AppState::Typing);
        assert_eq!(app.session.word_list(), vec!["cat", "dog"]);
        assert!(!app.has_started());
        assert!(app.score.is_none());
    }

    #[test]
    fn test_app_new_rejects_invalid_config() {
        let config = Config {
            words_per_session: 0,
            ..Config::default()
        };
        assert!(App::new(config, Box::new(FixedWords::from_prompt("cat"))).is_err());
    }

    #[test]
    fn test_app_new_rejects_placeholder_in_prompt() {
        let source = FixedWords::from_prompt("a*b c");
        assert_matches!(
            App::new(Config::default(), Box::new(source)),
            Err(TypingError::Configuration(_))
        );
    }

    #[test]
    fn ticks_before_first_key_do_nothing() {
        let mut app = app("cat", 1);
        let start = Instant::now();

        app.on_tick(start + Duration::from_secs(5));

        assert_eq!(app.session.remaining_secs(), 1);
        assert_eq!(app.state, AppState::Typing);
    }

    #[test]
    fn first_key_starts_the_clock() {
        let mut app = app("cat dog", 30);
        let start = Instant::now();
        type_str(&mut app, "c", start);
        assert!(app.has_started());

        app.on_tick(start + Duration::from_millis(2100));
        assert_eq!(app.session.remaining_secs(), 28);
    }

    #[test]
    fn timeout_scores_the_session() {
        let mut app = app("cat dog", 30);
        let start = Instant::now();
        type_str(&mut app, "cat dog", start);

        app.on_tick(start + Duration::from_secs(30));

        assert_eq!(app.state, AppState::Results);
        let score = app.score.unwrap();
        assert_eq!(score.correct_words, 2);
        assert_eq!(score.accuracy, 100.0);
        assert_eq!(score.wpm, 4.0);
        assert_eq!(app.session.word_mark(1), WordMark::Correct);
    }

    #[test]
    fn typing_after_results_is_ignored() {
        let mut app = app("cat", 1);
        let start = Instant::now();
        type_str(&mut app, "c", start);
        app.on_tick(start + Duration::from_secs(1));
        assert_eq!(app.state, AppState::Results);

        app.on_key(key(KeyCode::Char('x')), start).unwrap();
        assert_eq!(app.session.buffer(), "c");
    }

    #[test]
    fn restart_keeps_words_and_resets_clock() {
        let mut app = app("cat dog", 30);
        let start = Instant::now();
        type_str(&mut app, "cat ", start);

        app.on_key(key(KeyCode::Left), start).unwrap();

        assert_eq!(app.session.word_list(), vec!["cat", "dog"]);
        assert_eq!(app.session.active_word(), 0);
        assert_eq!(app.session.word_mark(0), WordMark::Pending);
        assert!(!app.has_started());
    }

    #[test]
    fn stale_countdown_does_not_reach_a_restarted_game() {
        let mut app = app("cat dog", 30);
        let start = Instant::now();
        type_str(&mut app, "c", start);

        app.restart().unwrap();
        app.on_tick(start + Duration::from_secs(10));

        assert_eq!(app.session.remaining_secs(), 30);
    }

    #[test]
    fn results_keys_restart_or_start_new_game() {
        let mut app = app("cat", 1);
        let start = Instant::now();
        type_str(&mut app, "cat", start);
        app.on_tick(start + Duration::from_secs(1));
        assert_eq!(app.state, AppState::Results);

        app.on_key(key(KeyCode::Char('r')), start).unwrap();
        assert_eq!(app.state, AppState::Typing);
        assert!(app.score.is_none());

        app.state = AppState::Results;
        app.on_key(key(KeyCode::Char('n')), start).unwrap();
        assert_eq!(app.state, AppState::Typing);
    }

    #[test]
    fn escape_and_ctrl_c_quit() {
        let mut app = app("cat", 30);
        let now = Instant::now();

        assert_eq!(app.on_key(key(KeyCode::Esc), now).unwrap(), Control::Quit);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.on_key(ctrl_c, now).unwrap(), Control::Quit);
        assert_eq!(app.session.buffer(), "");
    }

    #[test]
    fn key_releases_are_ignored() {
        let mut app = app("cat", 30);
        let mut release = key(KeyCode::Char('c'));
        release.kind = KeyEventKind::Release;

        app.on_key(release, Instant::now()).unwrap();
        assert_eq!(app.session.buffer(), "");
        assert!(!app.has_started());
    }

    #[test]
    fn backspace_crosses_word_boundary() {
        let mut app = app("cat dog", 30);
        let now = Instant::now();
        type_str(&mut app, "cxt ", now);

        app.on_key(key(KeyCode::Backspace), now).unwrap();

        assert_eq!(app.session.active_word(), 0);
        assert_eq!(app.session.buffer(), "c*t");
    }

    #[test]
    fn modified_letters_are_not_typed() {
        let mut app = app("cat", 30);
        let now = Instant::now();

        for modifiers in [KeyModifiers::CONTROL, KeyModifiers::ALT] {
            let chord = KeyEvent::new(KeyCode::Char('x'), modifiers);
            assert_eq!(app.on_key(chord, now).unwrap(), Control::Continue);
        }
        assert_eq!(app.session.buffer(), "");
        assert!(!app.has_started());

        let shifted = KeyEvent::new(KeyCode::Char('C'), KeyModifiers::SHIFT);
        app.on_key(shifted, now).unwrap();
        assert_eq!(app.session.buffer(), "C");
    }

    #[test]
    fn handle_routes_keys_and_ticks() {
        let mut app = app("cat", 2);
        let start = Instant::now();

        let c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE);
        assert_eq!(app.handle(TypingEvent::Key(c, start)).unwrap(), Control::Continue);
        assert_eq!(app.handle(TypingEvent::Resize).unwrap(), Control::Continue);
        assert_eq!(app.session.buffer(), "c");

        app.handle(TypingEvent::Tick(start + Duration::from_secs(1))).unwrap();
        assert_eq!(app.session.remaining_secs(), 1);
        app.handle(TypingEvent::Tick(start + Duration::from_secs(2))).unwrap();
        assert_eq!(app.state, AppState::Results);
    }

    #[test]
    fn handle_quits_when_events_stop() {
        let mut app = app("cat", 30);
        assert_eq!(app.handle(TypingEvent::Closed).unwrap(), Control::Quit);
    }
}
