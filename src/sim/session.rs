//! PuzzleSession: the orchestrator and state machine for one play
//! session.
//!
//! ## Phases
//!   `Loading → Playing ⇄ LevelComplete`
//!   `Loading → LoadFailed` (terminal)
//!
//! `Loading` is entered on construction and on every level advance,
//! and left before the call returns. Player actions are accepted in
//! `Playing` and `LevelComplete`. `LevelComplete` means a level-up is
//! on offer. It lasts until the caller advances or dismisses it.
//!
//! Every public `&mut self` method is one atomic transition: score,
//! streak, guess and pool are all updated before it returns.

use rand::Rng;

use crate::domain::fragment::{Fragment, FragmentId, FragmentPool, PoolError};
use crate::domain::guess::Guess;
use crate::domain::level::{self, Clue, LevelError};
use super::event::SessionEvent;

/// Number of fragment slots the stock level set is authored for.
pub const DEFAULT_FRAGMENT_SLOTS: usize = 20;
/// Correct answers in a row needed before a level-up is offered.
pub const DEFAULT_LEVEL_UP_STREAK: u32 = 7;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Loading,
    Playing,
    LevelComplete,
    LoadFailed,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SessionRules {
    /// Fragment slots offered by the presentation layer. Every level
    /// must decompose into exactly this many fragments.
    pub fragment_slots: usize,
    pub level_up_streak: u32,
}

impl Default for SessionRules {
    fn default() -> Self {
        SessionRules {
            fragment_slots: DEFAULT_FRAGMENT_SLOTS,
            level_up_streak: DEFAULT_LEVEL_UP_STREAK,
        }
    }
}

/// Why a level could not be loaded.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error(transparent)]
    Level(#[from] LevelError),
    #[error(transparent)]
    Pool(#[from] PoolError),
}

/// A rejected player action. Rejections never change session state.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("fragment {0} is not available")]
    FragmentUnavailable(FragmentId),
    #[error("no fragment {0} in this level")]
    UnknownFragment(FragmentId),
    #[error("session is not accepting moves (phase {0:?})")]
    NotPlaying(Phase),
}

/// One answer position: the word and whether it has been found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolutionSlot {
    word: String,
    revealed: bool,
}

impl SolutionSlot {
    pub fn word(&self) -> &str { &self.word }
    pub fn is_revealed(&self) -> bool { self.revealed }

    /// `"7 letters"`
    pub fn placeholder(&self) -> String {
        format!("{} letters", self.word.chars().count())
    }

    /// What an answer column shows: the word once found, otherwise
    /// its letter count.
    pub fn display(&self) -> String {
        if self.revealed {
            self.word.clone()
        } else {
            self.placeholder()
        }
    }
}

pub struct PuzzleSession<R> {
    rules: SessionRules,
    rng: R,
    phase: Phase,

    // ── Persist across levels ──
    level: u32,
    score: u32,
    correct_streak: u32,

    // ── Rebuilt on every level load ──
    clues: Vec<Clue>,
    solutions: Vec<SolutionSlot>,
    pool: FragmentPool,
    guess: Guess,
}

// ══════════════════════════════════════════════════════════════
// Construction / loading
// ══════════════════════════════════════════════════════════════

impl<R: Rng> PuzzleSession<R> {
    /// Start a session on level 1 with the given raw level text.
    /// The returned events hold either `LevelLoaded` or `LoadFailed`.
    pub fn new(blob: &str, rules: SessionRules, rng: R) -> (Self, Vec<SessionEvent>) {
        let mut session = PuzzleSession {
            rules,
            rng,
            phase: Phase::Loading,
            level: 1,
            score: 0,
            correct_streak: 0,
            clues: Vec::new(),
            solutions: Vec::new(),
            pool: FragmentPool::default(),
            guess: Guess::new(),
        };
        let event = session.load(blob);
        (session, vec![event])
    }

    /// Move to the next level using its raw level text.
    ///
    /// Score carries over. The guess, solutions and pool are thrown
    /// away, so every fragment slot of the new level starts available.
    pub fn advance_level(&mut self, blob: &str) -> Result<Vec<SessionEvent>, SessionError> {
        if self.phase == Phase::LoadFailed {
            return Err(SessionError::NotPlaying(self.phase));
        }

        self.level += 1;
        log::info!("advancing to level {} (score {})", self.level, self.score);
        Ok(vec![self.load(blob)])
    }

    /// Parse + build, then swap the new level in. On failure nothing
    /// of the level is kept, so a partial level is never playable.
    fn load(&mut self, blob: &str) -> SessionEvent {
        self.phase = Phase::Loading;
        self.guess.clear();
        self.clues.clear();
        self.solutions.clear();
        self.pool = FragmentPool::default();

        match self.build_level(blob) {
            Ok(()) => {
                self.phase = Phase::Playing;
                log::debug!(
                    "level {} loaded: {} clues, {} fragments",
                    self.level, self.clues.len(), self.pool.len(),
                );
                SessionEvent::LevelLoaded {
                    level: self.level,
                    clues: self.clues.clone(),
                    placeholders: self.solutions.iter().map(SolutionSlot::placeholder).collect(),
                    fragments: self.pool.iter().cloned().collect(),
                }
            }
            Err(reason) => {
                self.phase = Phase::LoadFailed;
                self.clues.clear();
                self.solutions.clear();
                log::warn!("level {} failed to load: {reason}", self.level);
                SessionEvent::LoadFailed { level: self.level, reason }
            }
        }
    }

    fn build_level(&mut self, blob: &str) -> Result<(), LoadError> {
        let def = level::parse(blob, &mut self.rng)?;
        let pool = FragmentPool::build(def.fragments, self.rules.fragment_slots, &mut self.rng)?;

        self.clues = def.clues;
        self.solutions = def
            .solutions
            .into_iter()
            .map(|word| SolutionSlot { word, revealed: false })
            .collect();
        self.pool = pool;
        Ok(())
    }
}

// ══════════════════════════════════════════════════════════════
// Player actions
// ══════════════════════════════════════════════════════════════

impl<R> PuzzleSession<R> {
    /// Move a fragment from the pool into the guess.
    pub fn select_fragment(&mut self, id: FragmentId) -> Result<(), SessionError> {
        self.ensure_active()?;

        match self.pool.get(id) {
            None => return Err(SessionError::UnknownFragment(id)),
            Some(frag) if !frag.is_available() => {
                return Err(SessionError::FragmentUnavailable(id));
            }
            Some(_) => {}
        }

        match self.pool.reveal(id) {
            Ok(text) => {
                self.guess.append(id, text);
                log::debug!("picked {id} -> guess {:?}", self.guess.current_text());
                Ok(())
            }
            Err(e) => {
                // Availability was checked above, so the pool and the
                // guess disagree about this fragment.
                debug_assert!(false, "fragment pool out of sync: {e}");
                log::error!("fragment pool out of sync: {e}");
                Err(SessionError::FragmentUnavailable(id))
            }
        }
    }

    /// Check the assembled guess against the solutions.
    ///
    /// Correct: the slot is revealed, the fragments stay spent, and
    /// the level-up check runs. Incorrect: score drops by one (never
    /// below zero) and the fragments go back into the pool.
    pub fn submit(&mut self) -> Result<Vec<SessionEvent>, SessionError> {
        self.ensure_active()?;

        let mut events = Vec::new();
        match self.find_solution(self.guess.current_text()) {
            Some(position) => {
                self.solutions[position].revealed = true;
                self.guess.clear();
                self.score += 1;
                self.correct_streak += 1;
                log::debug!(
                    "correct: {:?} at {position}, score {}, streak {}",
                    self.solutions[position].word, self.score, self.correct_streak,
                );
                events.push(SessionEvent::Correct { position });
                self.check_level_up(&mut events);
            }
            None => {
                let rejected = self.guess.current_text().to_string();
                self.score = self.score.saturating_sub(1);
                let spent = self.guess.clear();
                self.pool.restore_all(spent);
                log::debug!("incorrect: {rejected:?}, score {}", self.score);
                events.push(SessionEvent::Incorrect { rejected });
            }
        }
        Ok(events)
    }

    /// Put every picked fragment back and empty the guess.
    pub fn clear_guess(&mut self) {
        let picked = self.guess.clear();
        self.pool.restore_all(picked);
    }

    /// Decline an offered level-up and keep playing this level.
    pub fn dismiss_level_up(&mut self) {
        if self.phase == Phase::LevelComplete {
            self.phase = Phase::Playing;
        }
    }

    fn ensure_active(&self) -> Result<(), SessionError> {
        match self.phase {
            Phase::Playing | Phase::LevelComplete => Ok(()),
            other => Err(SessionError::NotPlaying(other)),
        }
    }

    /// Exact, case-sensitive lookup. A still-hidden slot wins over an
    /// already revealed one with the same word.
    fn find_solution(&self, text: &str) -> Option<usize> {
        let mut matches = self
            .solutions
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.word == text);
        let first = matches.next()?;
        if !first.1.revealed {
            return Some(first.0);
        }
        Some(
            matches
                .find(|(_, slot)| !slot.revealed)
                .map_or(first.0, |(pos, _)| pos),
        )
    }

    /// The streak resets as the event is emitted, whether or not the
    /// player goes on to the next level.
    fn check_level_up(&mut self, events: &mut Vec<SessionEvent>) {
        if self.correct_streak >= self.rules.level_up_streak {
            self.correct_streak = 0;
            self.phase = Phase::LevelComplete;
            log::info!("level-up available on level {}", self.level);
            events.push(SessionEvent::LevelUpAvailable);
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Queries
// ══════════════════════════════════════════════════════════════

impl<R> PuzzleSession<R> {
    pub fn phase(&self) -> Phase { self.phase }
    pub fn level(&self) -> u32 { self.level }
    pub fn score(&self) -> u32 { self.score }
    pub fn correct_streak(&self) -> u32 { self.correct_streak }
    pub fn rules(&self) -> &SessionRules { &self.rules }
    pub fn clues(&self) -> &[Clue] { &self.clues }
    pub fn solutions(&self) -> &[SolutionSlot] { &self.solutions }
    pub fn fragments(&self) -> &FragmentPool { &self.pool }
    pub fn guess(&self) -> &Guess { &self.guess }

    pub fn guess_text(&self) -> &str {
        self.guess.current_text()
    }

    pub fn fragment(&self, id: FragmentId) -> Option<&Fragment> {
        self.pool.get(id)
    }

    /// Every answer on this level has been found.
    pub fn is_solved(&self) -> bool {
        !self.solutions.is_empty() && self.solutions.iter().all(SolutionSlot::is_revealed)
    }
}
