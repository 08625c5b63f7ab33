//! Wordbits: a word-fragment anagram puzzle.
//!
//! Players rebuild answer words from shuffled letter fragments, one
//! numbered clue per answer. The engine in [`sim::session`] owns all
//! game state and talks to a presentation layer through method calls
//! in and [`sim::event::SessionEvent`]s out. It does no I/O of its own.
//!
//! ```
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use wordbits::sim::event::SessionEvent;
//! use wordbits::sim::session::{PuzzleSession, SessionRules};
//!
//! let rules = SessionRules { fragment_slots: 2, ..SessionRules::default() };
//! let (mut session, _) = PuzzleSession::new(
//!     "CAT: A feline\nDOG: A canine",
//!     rules,
//!     ChaCha8Rng::seed_from_u64(1),
//! );
//!
//! let cat = session.fragments().iter().find(|f| f.text() == "CAT").unwrap().id();
//! session.select_fragment(cat).unwrap();
//! let events = session.submit().unwrap();
//! assert!(matches!(events[..], [SessionEvent::Correct { .. }]));
//! assert_eq!(session.score(), 1);
//! ```

pub mod config;
pub mod domain;
pub mod logging;
pub mod sim;
