//! Pure puzzle data: level parsing, the fragment pool, the guess.
//! No I/O and no session state in here.

pub mod fragment;
pub mod guess;
pub mod level;
