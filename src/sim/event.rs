//! Events emitted by session transitions.
//! The presentation layer consumes these to redraw, show messages and
//! play sounds.

use crate::domain::fragment::Fragment;
use crate::domain::level::Clue;
use super::session::LoadError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// A level is ready. `placeholders` is index-aligned with `clues`.
    LevelLoaded {
        level: u32,
        clues: Vec<Clue>,
        placeholders: Vec<String>,
        fragments: Vec<Fragment>,
    },
    /// The guess matched the solution at `position`.
    Correct { position: usize },
    Incorrect { rejected: String },
    /// Streak target reached. Advancing is up to the caller.
    LevelUpAvailable,
    LoadFailed { level: u32, reason: LoadError },
}
