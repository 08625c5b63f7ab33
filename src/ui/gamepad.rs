//! Gamepad input tracker using gilrs.
//!
//! Button mapping comes from the `[gamepad]` table in config.toml.
//! Default mapping:
//!   D-pad / Left Stick    →  Move cursor
//!   A                     →  Pick fragment
//!   X / R1                →  Submit guess
//!   B / L1                →  Clear guess
//!   Start                 →  Confirm (next level)
//!   Select                →  Quit
//!
//! Everything is edge triggered. The stick acts as a second D-pad: it
//! "presses" a direction when it leaves the deadzone.

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use crate::app::CursorMove;
use wordbits::config::GamepadConfig;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.5;

const BUTTON_COUNT: usize = 14;

/// Logical buttons. D-pad directions are buttons too.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,       // South
    B,       // East
    X,       // West
    Y,       // North
    L1,
    R1,
    L2,
    R2,
    Start,
    Select,
    Up,
    Down,
    Left,
    Right,
}

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        let btn = match s.trim().to_uppercase().as_str() {
            "A" | "SOUTH" => Btn::A,
            "B" | "EAST" => Btn::B,
            "X" | "WEST" => Btn::X,
            "Y" | "NORTH" => Btn::Y,
            "L1" | "LB" => Btn::L1,
            "R1" | "RB" => Btn::R1,
            "L2" | "LT" => Btn::L2,
            "R2" | "RT" => Btn::R2,
            "START" => Btn::Start,
            "SELECT" | "BACK" => Btn::Select,
            _ => return None,
        };
        Some(btn)
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        let btn = match btn {
            Button::South => Btn::A,
            Button::East => Btn::B,
            Button::West => Btn::X,
            Button::North => Btn::Y,
            Button::LeftTrigger => Btn::L1,
            Button::RightTrigger => Btn::R1,
            Button::LeftTrigger2 => Btn::L2,
            Button::RightTrigger2 => Btn::R2,
            Button::Start => Btn::Start,
            Button::Select => Btn::Select,
            Button::DPadUp => Btn::Up,
            Button::DPadDown => Btn::Down,
            Button::DPadLeft => Btn::Left,
            Button::DPadRight => Btn::Right,
            _ => return None,
        };
        Some(btn)
    }
}

/// Buttons bound to each action.
#[derive(Debug, PartialEq, Eq)]
struct ActionMap {
    pick: Vec<Btn>,
    submit: Vec<Btn>,
    clear: Vec<Btn>,
    confirm: Vec<Btn>,
    quit: Vec<Btn>,
}

impl ActionMap {
    /// Unknown names are skipped with a warning. A list that ends up
    /// empty keeps the default binding so no action becomes unreachable.
    fn from_config(cfg: &GamepadConfig) -> Self {
        let defaults = ActionMap::default();
        let bind = |names: &[String], fallback: Vec<Btn>| {
            let btns: Vec<Btn> = names
                .iter()
                .filter_map(|name| {
                    let btn = Btn::from_name(name);
                    if btn.is_none() {
                        log::warn!("unknown gamepad button {name:?}");
                    }
                    btn
                })
                .collect();
            if btns.is_empty() { fallback } else { btns }
        };
        ActionMap {
            pick: bind(&cfg.pick, defaults.pick),
            submit: bind(&cfg.submit, defaults.submit),
            clear: bind(&cfg.clear, defaults.clear),
            confirm: bind(&cfg.confirm, defaults.confirm),
            quit: bind(&cfg.quit, defaults.quit),
        }
    }
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            pick: vec![Btn::A],
            submit: vec![Btn::X, Btn::R1],
            clear: vec![Btn::B, Btn::L1],
            confirm: vec![Btn::Start],
            quit: vec![Btn::Select],
        }
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    /// Pressed since the last `update()`, indexed by `Btn`.
    just_pressed: [bool; BUTTON_COUNT],

    /// Which stick direction is currently past the deadzone.
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    stick: Option<Btn>,

    action_map: ActionMap,

    pub connected: bool,
}

impl GamepadState {
    pub fn new(cfg: &GamepadConfig) -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs, connected) = match Gilrs::new() {
            Ok(g) => {
                let has_pad = g.gamepads().next().is_some();
                (Some(g), has_pad)
            }
            Err(e) => {
                log::info!("gamepad support unavailable: {e}");
                (None, false)
            }
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs,
            just_pressed: [false; BUTTON_COUNT],
            stick: None,
            action_map: ActionMap::from_config(cfg),
            connected,
        }
    }

    /// Collect this frame's presses. Call once per frame.
    pub fn update(&mut self) {
        self.just_pressed = [false; BUTTON_COUNT];

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let Some(gilrs) = &mut self.gilrs else { return };
        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    if let Some(b) = Btn::from_gilrs(btn) {
                        self.press(b);
                    }
                }
                EventType::AxisChanged(axis, value, _) => {
                    self.connected = true;
                    self.update_stick(axis, value);
                }
                EventType::Connected => {
                    log::info!("gamepad connected");
                    self.connected = true;
                }
                EventType::Disconnected => {
                    log::info!("gamepad disconnected");
                    self.connected = false;
                    self.stick = None;
                }
                _ => {}
            }
        }
    }

    #[cfg(feature = "gamepad")]
    fn update_stick(&mut self, axis: Axis, value: f32) {
        let dir = match axis {
            Axis::LeftStickX if value < -STICK_DEADZONE => Some(Btn::Left),
            Axis::LeftStickX if value > STICK_DEADZONE => Some(Btn::Right),
            Axis::LeftStickY if value > STICK_DEADZONE => Some(Btn::Up),
            Axis::LeftStickY if value < -STICK_DEADZONE => Some(Btn::Down),
            Axis::LeftStickX | Axis::LeftStickY => None,
            _ => return,
        };

        // Back in the deadzone on one axis only releases that axis.
        let same_axis = |b: Btn| match axis {
            Axis::LeftStickX => matches!(b, Btn::Left | Btn::Right),
            _ => matches!(b, Btn::Up | Btn::Down),
        };
        match dir {
            Some(d) if self.stick != Some(d) => {
                self.stick = Some(d);
                self.press(d);
            }
            None if self.stick.is_some_and(same_axis) => self.stick = None,
            _ => {}
        }
    }

    fn press(&mut self, btn: Btn) {
        self.just_pressed[btn as usize] = true;
    }

    // ── Action queries ──

    fn any_just_pressed(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|&b| self.just_pressed[b as usize])
    }

    pub fn pick_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.pick)
    }
    pub fn submit_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.submit)
    }
    pub fn clear_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.clear)
    }
    pub fn confirm_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.confirm)
    }
    pub fn quit_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.quit)
    }

    pub fn cursor_move(&self) -> Option<CursorMove> {
        [
            (Btn::Up, CursorMove::Up),
            (Btn::Down, CursorMove::Down),
            (Btn::Left, CursorMove::Left),
            (Btn::Right, CursorMove::Right),
        ]
        .into_iter()
        .find(|(b, _)| self.just_pressed[*b as usize])
        .map(|(_, m)| m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn config_names_map_to_buttons() {
        let cfg = GamepadConfig {
            pick: names(&["south", "Y"]),
            submit: names(&["RT"]),
            clear: names(&["bogus"]),
            confirm: names(&[]),
            quit: names(&["back"]),
        };
        let map = ActionMap::from_config(&cfg);
        assert_eq!(map.pick, vec![Btn::A, Btn::Y]);
        assert_eq!(map.submit, vec![Btn::R2]);
        assert_eq!(map.clear, ActionMap::default().clear);
        assert_eq!(map.confirm, vec![Btn::Start]);
        assert_eq!(map.quit, vec![Btn::Select]);
    }

    #[test]
    fn presses_last_one_frame() {
        let mut pad = GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: None,
            just_pressed: [false; BUTTON_COUNT],
            stick: None,
            action_map: ActionMap::default(),
            connected: false,
        };
        pad.press(Btn::X);
        pad.press(Btn::Left);
        assert!(pad.submit_pressed());
        assert!(!pad.pick_pressed());
        assert_eq!(pad.cursor_move(), Some(CursorMove::Left));

        pad.update();
        assert!(!pad.submit_pressed());
        assert_eq!(pad.cursor_move(), None);
    }
}
