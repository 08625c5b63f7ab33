//! Keyboard input collector.
//!
//! The puzzle is turn based: every action is a single key press, so the
//! tracker only keeps the presses seen since the last drain. Repeat
//! events count as presses (holding an arrow keeps the cursor moving);
//! Release events are dropped.

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub struct InputState {
    /// Key presses collected during the most recent `drain_events()`.
    presses: Vec<KeyEvent>,
    /// Set when the terminal was resized; the renderer repaints fully.
    pub resized: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            presses: Vec::with_capacity(8),
            resized: false,
        }
    }

    /// Drain all pending terminal events without blocking.
    /// Call once per frame before handling actions.
    pub fn drain_events(&mut self) {
        self.presses.clear();
        self.resized = false;

        while poll(Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(Event::Key(key)) => self.record(key),
                Ok(Event::Resize(..)) => self.resized = true,
                _ => {}
            }
        }
    }

    fn record(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Release {
            self.presses.push(key);
        }
    }

    /// Was this key pressed this frame? Ctrl chords don't count.
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.presses
            .iter()
            .any(|k| k.code == code && !k.modifiers.contains(KeyModifiers::CONTROL))
    }

    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.was_pressed(*c))
    }

    /// Letter keys match either case.
    pub fn letter_pressed(&self, letter: char) -> bool {
        self.any_pressed(&[
            KeyCode::Char(letter.to_ascii_lowercase()),
            KeyCode::Char(letter.to_ascii_uppercase()),
        ])
    }

    pub fn ctrl_c_pressed(&self) -> bool {
        self.presses.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && matches!(k.code, KeyCode::Char('c') | KeyCode::Char('C'))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, modifiers: KeyModifiers, kind: KeyEventKind) -> KeyEvent {
        KeyEvent { code, modifiers, kind, state: KeyEventState::NONE }
    }

    #[test]
    fn repeats_count_and_releases_do_not() {
        let mut input = InputState::new();
        input.record(key(KeyCode::Left, KeyModifiers::NONE, KeyEventKind::Repeat));
        input.record(key(KeyCode::Enter, KeyModifiers::NONE, KeyEventKind::Release));
        assert!(input.was_pressed(KeyCode::Left));
        assert!(!input.was_pressed(KeyCode::Enter));
    }

    #[test]
    fn ctrl_c_is_not_a_plain_c() {
        let mut input = InputState::new();
        input.record(key(KeyCode::Char('c'), KeyModifiers::CONTROL, KeyEventKind::Press));
        assert!(input.ctrl_c_pressed());
        assert!(!input.letter_pressed('c'));
    }

    #[test]
    fn letters_ignore_case() {
        let mut input = InputState::new();
        input.record(key(KeyCode::Char('Q'), KeyModifiers::SHIFT, KeyEventKind::Press));
        assert!(input.letter_pressed('q'));
        assert!(!input.letter_pressed('w'));
    }
}
