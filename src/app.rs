//! Frontend state: the session plus everything only the terminal UI
//! cares about (cursor, prompt, status message).
//!
//! All game rules stay in `PuzzleSession`. This layer maps key presses
//! to session calls and session events to what is on screen.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use wordbits::config::GameConfig;
use wordbits::domain::fragment::FragmentId;
use wordbits::sim::event::SessionEvent;
use wordbits::sim::library::LevelLibrary;
use wordbits::sim::session::{Phase, PuzzleSession};

/// Game ticks a status message stays up.
const MESSAGE_TICKS: u32 = 30;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CursorMove {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Screen {
    Playing,
    /// "Ready for the next level?" on top of the board.
    LevelUpPrompt,
    LoadFailed,
    /// Ran out of levels.
    GameComplete,
}

pub struct App {
    pub session: PuzzleSession<ChaCha8Rng>,
    pub library: LevelLibrary,
    pub screen: Screen,
    /// Fragment slot under the cursor.
    pub cursor: usize,
    pub columns: usize,
    pub message: String,
    pub message_timer: u32,
    /// Last load failure, shown on the `LoadFailed` screen.
    pub failure: Option<String>,
    pub anim_tick: u32,
    pub seed: u64,
}

impl App {
    pub fn new(config: &GameConfig, library: LevelLibrary, seed: u64) -> (Self, Vec<SessionEvent>) {
        let rng = ChaCha8Rng::seed_from_u64(seed);
        let first = library.level_text(1).unwrap_or_default();
        let (session, events) = PuzzleSession::new(first, config.rules, rng);

        let mut app = App {
            session,
            library,
            screen: Screen::Playing,
            cursor: 0,
            columns: config.grid_columns.max(1),
            message: String::new(),
            message_timer: 0,
            failure: None,
            anim_tick: 0,
            seed,
        };
        app.apply(&events);
        (app, events)
    }

    // ── Player actions ──

    pub fn move_cursor(&mut self, dir: CursorMove) {
        let slots = self.session.fragments().len();
        if slots == 0 {
            return;
        }
        let cols = self.columns;
        let (row, col) = (self.cursor / cols, self.cursor % cols);
        let last_row = (slots - 1) / cols;

        let target = match dir {
            CursorMove::Left if col > 0 => self.cursor - 1,
            CursorMove::Right if col + 1 < cols => self.cursor + 1,
            CursorMove::Up if row > 0 => self.cursor - cols,
            CursorMove::Down if row < last_row => self.cursor + cols,
            _ => self.cursor,
        };
        self.cursor = target.min(slots - 1);
    }

    /// Pick the fragment under the cursor. Stray picks on spent or
    /// already picked fragments are ignored.
    pub fn pick(&mut self) -> bool {
        match self.session.select_fragment(FragmentId(self.cursor)) {
            Ok(()) => true,
            Err(e) => {
                log::debug!("pick ignored: {e}");
                false
            }
        }
    }

    pub fn submit(&mut self) -> Vec<SessionEvent> {
        match self.session.submit() {
            Ok(events) => {
                self.apply(&events);
                events
            }
            Err(e) => {
                log::debug!("submit ignored: {e}");
                vec![]
            }
        }
    }

    pub fn clear(&mut self) {
        self.session.clear_guess();
    }

    /// A level-up is pending, or every answer on the board is found.
    pub fn can_advance(&self) -> bool {
        self.session.phase() == Phase::LevelComplete || self.session.is_solved()
    }

    /// Enter on the board. With nothing picked and the level done, it
    /// moves on instead of submitting an empty guess.
    pub fn submit_or_advance(&mut self) -> Vec<SessionEvent> {
        if self.session.guess().is_empty() && self.can_advance() {
            return self.confirm_level_up();
        }
        self.submit()
    }

    /// Accept the level-up offer. Past the last level the game is over.
    pub fn confirm_level_up(&mut self) -> Vec<SessionEvent> {
        let next = self.session.level() + 1;
        let Some(text) = self.library.level_text(next) else {
            log::info!("no level {next}, game complete");
            self.screen = Screen::GameComplete;
            return vec![];
        };

        match self.session.advance_level(text) {
            Ok(events) => {
                self.apply(&events);
                events
            }
            Err(e) => {
                log::warn!("advance rejected: {e}");
                vec![]
            }
        }
    }

    pub fn dismiss_level_up(&mut self) {
        self.session.dismiss_level_up();
        self.screen = Screen::Playing;
    }

    pub fn tick(&mut self) {
        self.anim_tick = self.anim_tick.wrapping_add(1);
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message.clear();
            }
        }
    }

    pub fn set_message(&mut self, msg: &str, duration: u32) {
        self.message = msg.to_string();
        self.message_timer = duration;
    }

    // ── Event handling ──

    fn apply(&mut self, events: &[SessionEvent]) {
        for event in events {
            match event {
                SessionEvent::LevelLoaded { level, .. } => {
                    self.screen = Screen::Playing;
                    self.cursor = 0;
                    self.failure = None;
                    self.set_message(&format!("Level {level}"), MESSAGE_TICKS);
                }
                SessionEvent::Correct { position } => {
                    let word = self
                        .session
                        .solutions()
                        .get(*position)
                        .map(|slot| slot.word().to_string())
                        .unwrap_or_default();
                    self.set_message(&format!("Correct! {word}"), MESSAGE_TICKS);
                }
                SessionEvent::Incorrect { rejected } => {
                    let msg = if rejected.is_empty() {
                        "Pick some fragments first!".to_string()
                    } else {
                        format!("Sorry, {rejected} is not correct, try again!")
                    };
                    self.set_message(&msg, MESSAGE_TICKS);
                }
                SessionEvent::LevelUpAvailable => {
                    self.screen = Screen::LevelUpPrompt;
                }
                SessionEvent::LoadFailed { level, reason } => {
                    self.screen = Screen::LoadFailed;
                    self.failure = Some(format!("Level {level} could not be loaded: {reason}"));
                }
            }
        }
        debug_assert!(
            self.screen != Screen::Playing || self.session.phase() != Phase::LoadFailed,
            "screen out of sync with session",
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(&GameConfig::default(), LevelLibrary::embedded(), 5).0
    }

    /// Pick the slots spelling `parts`.
    fn spell(app: &mut App, parts: &[&str]) {
        for part in parts {
            let slot = app
                .session
                .fragments()
                .iter()
                .find(|f| f.is_available() && f.text() == *part)
                .map(|f| f.id().0)
                .unwrap();
            app.cursor = slot;
            assert!(app.pick());
        }
    }

    fn solve_level_one(app: &mut App) {
        for parts in [
            &["HA", "UNT", "ED"][..],
            &["LE", "PRO", "SY"],
            &["TW", "ITT", "ER"],
            &["OLI", "VER"],
            &["ELI", "ZAB", "ETH"],
            &["SA", "FAR", "I"],
            &["POR", "TL", "AND"],
        ] {
            spell(app, parts);
            app.submit();
        }
    }

    #[test]
    fn starts_on_level_one() {
        let app = app();
        assert_eq!(app.screen, Screen::Playing);
        assert_eq!(app.session.level(), 1);
        assert_eq!(app.message, "Level 1");
    }

    #[test]
    fn cursor_stays_inside_the_grid() {
        let mut app = app();
        app.move_cursor(CursorMove::Left);
        app.move_cursor(CursorMove::Up);
        assert_eq!(app.cursor, 0);

        app.move_cursor(CursorMove::Right);
        app.move_cursor(CursorMove::Down);
        assert_eq!(app.cursor, 6);

        app.cursor = 4;
        app.move_cursor(CursorMove::Right);
        assert_eq!(app.cursor, 4);

        app.cursor = 19;
        app.move_cursor(CursorMove::Down);
        app.move_cursor(CursorMove::Right);
        assert_eq!(app.cursor, 19);
    }

    #[test]
    fn picking_twice_is_a_no_op() {
        let mut app = app();
        app.cursor = 3;
        assert!(app.pick());
        let guess = app.session.guess_text().to_string();
        assert!(!app.pick());
        assert_eq!(app.session.guess_text(), guess);
    }

    #[test]
    fn wrong_answer_shows_a_message() {
        let mut app = app();
        spell(&mut app, &["HA", "VER"]);
        app.submit();
        assert!(app.message.contains("HAVER"));
        assert_eq!(app.session.guess_text(), "");
    }

    #[test]
    fn full_level_offers_the_next_one() {
        let mut app = app();
        solve_level_one(&mut app);
        assert_eq!(app.screen, Screen::LevelUpPrompt);

        let events = app.confirm_level_up();
        assert!(matches!(events[..], [SessionEvent::LevelLoaded { level: 2, .. }]));
        assert_eq!(app.screen, Screen::Playing);
        assert_eq!(app.session.score(), 7);
        assert_eq!(app.session.fragments().available_count(), 20);
    }

    #[test]
    fn solved_board_can_still_advance_after_dismissing() {
        let mut app = app();
        solve_level_one(&mut app);
        assert_eq!(app.screen, Screen::LevelUpPrompt);

        app.dismiss_level_up();
        assert_eq!(app.screen, Screen::Playing);
        assert_eq!(app.session.fragments().available_count(), 0);
        assert!(app.can_advance());

        let events = app.submit_or_advance();
        assert!(matches!(events[..], [SessionEvent::LevelLoaded { level: 2, .. }]));
        assert_eq!(app.session.score(), 7);
    }

    #[test]
    fn solved_board_advances_without_a_streak_offer() {
        let mut config = GameConfig::default();
        config.rules.level_up_streak = 10;
        let (mut app, _) = App::new(&config, LevelLibrary::embedded(), 5);
        solve_level_one(&mut app);
        assert_eq!(app.screen, Screen::Playing);
        assert!(app.session.is_solved());

        let events = app.submit_or_advance();
        assert!(matches!(events[..], [SessionEvent::LevelLoaded { level: 2, .. }]));
    }

    #[test]
    fn enter_submits_while_the_level_is_open() {
        let mut app = app();
        assert!(!app.can_advance());
        let events = app.submit_or_advance();
        assert!(matches!(events[..], [SessionEvent::Incorrect { .. }]));
        assert_eq!(app.session.level(), 1);
    }

    #[test]
    fn dismissing_keeps_the_level() {
        let mut app = app();
        app.screen = Screen::LevelUpPrompt;
        app.dismiss_level_up();
        assert_eq!(app.screen, Screen::Playing);
        assert_eq!(app.session.level(), 1);
    }

    #[test]
    fn running_out_of_levels_completes_the_game() {
        let mut app = app();
        assert!(!app.confirm_level_up().is_empty()); // level 2
        assert!(!app.confirm_level_up().is_empty()); // level 3
        assert!(app.confirm_level_up().is_empty());
        assert_eq!(app.screen, Screen::GameComplete);
        assert_eq!(app.session.level(), 3);
    }

    #[test]
    fn capacity_mismatch_shows_the_failure_screen() {
        let mut config = GameConfig::default();
        config.rules.fragment_slots = 12;
        let (app, _) = App::new(&config, LevelLibrary::embedded(), 5);
        assert_eq!(app.screen, Screen::LoadFailed);
        assert!(app.failure.as_deref().unwrap().contains("12 fragment slots"));
    }

    #[test]
    fn message_expires() {
        let mut app = app();
        app.set_message("hi", 2);
        app.tick();
        assert_eq!(app.message, "hi");
        app.tick();
        assert!(app.message.is_empty());
    }
}
