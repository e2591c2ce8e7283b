//! Gamepad input through gilrs.
//!
//! The d-pad or left stick steers the paddle. Confirm (restart) and cancel
//! (quit from the name screens) are bound from `[gamepad]` in config.toml,
//! defaulting to Start/A and Select.

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};
use log::debug;

use crate::config::GamepadConfig;

const STICK_DEADZONE: f32 = 0.25;

/// The buttons an action can be bound to.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PadButton {
    South,
    Start,
    Select,
}

const SLOTS: usize = 3;

/// Accepted config spellings, compared case-insensitively.
const BUTTON_NAMES: [(&str, PadButton); 5] = [
    ("a", PadButton::South),
    ("south", PadButton::South),
    ("start", PadButton::Start),
    ("select", PadButton::Select),
    ("back", PadButton::Select),
];

impl PadButton {
    fn parse(name: &str) -> Option<PadButton> {
        let name = name.trim();
        BUTTON_NAMES
            .iter()
            .find(|(spelling, _)| spelling.eq_ignore_ascii_case(name))
            .map(|&(_, button)| button)
    }

    fn slot(self) -> usize {
        self as usize
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(button: Button) -> Option<PadButton> {
        match button {
            Button::South => Some(PadButton::South),
            Button::Start => Some(PadButton::Start),
            Button::Select => Some(PadButton::Select),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct Bindings {
    confirm: Vec<PadButton>,
    cancel: Vec<PadButton>,
}

impl Bindings {
    /// A list with no recognised name falls back to its default.
    fn from_config(cfg: &GamepadConfig) -> Bindings {
        Bindings {
            confirm: parse_or(&cfg.confirm, &[PadButton::Start, PadButton::South]),
            cancel: parse_or(&cfg.cancel, &[PadButton::Select]),
        }
    }
}

fn parse_or(names: &[String], fallback: &[PadButton]) -> Vec<PadButton> {
    let parsed: Vec<PadButton> = names.iter().filter_map(|n| PadButton::parse(n)).collect();
    if parsed.is_empty() {
        fallback.to_vec()
    } else {
        parsed
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    backend: Option<Gilrs>,
    down: [bool; SLOTS],
    /// Went down since the last `update`.
    fresh: [bool; SLOTS],
    dpad_left: bool,
    dpad_right: bool,
    stick_x: f32,
    bindings: Bindings,
}

#[cfg(feature = "gamepad")]
fn open_backend() -> Option<Gilrs> {
    match Gilrs::new() {
        Ok(gilrs) => {
            if gilrs.gamepads().next().is_some() {
                log::info!("gamepad connected");
            }
            Some(gilrs)
        }
        Err(e) => {
            debug!("gamepad support unavailable: {e}");
            None
        }
    }
}

impl GamepadState {
    pub fn new(cfg: &GamepadConfig) -> Self {
        let bindings = Bindings::from_config(cfg);
        debug!("gamepad bindings: {bindings:?}");
        GamepadState {
            #[cfg(feature = "gamepad")]
            backend: open_backend(),
            down: [false; SLOTS],
            fresh: [false; SLOTS],
            dpad_left: false,
            dpad_right: false,
            stick_x: 0.0,
            bindings,
        }
    }

    /// Call once per frame before querying.
    pub fn update(&mut self) {
        self.fresh = [false; SLOTS];
        #[cfg(feature = "gamepad")]
        self.poll();
    }

    #[cfg(feature = "gamepad")]
    fn poll(&mut self) {
        let Some(backend) = self.backend.as_mut() else { return };
        let mut pending = Vec::new();
        while let Some(ev) = backend.next_event() {
            pending.push(ev.event);
        }

        for event in pending {
            match event {
                EventType::ButtonPressed(button, _) => self.on_button(button, true),
                EventType::ButtonReleased(button, _) => self.on_button(button, false),
                EventType::AxisChanged(Axis::LeftStickX, value, _) => self.stick_x = value,
                EventType::Connected => log::info!("gamepad connected"),
                EventType::Disconnected => {
                    log::info!("gamepad disconnected");
                    self.release_all();
                }
                _ => {}
            }
        }
    }

    #[cfg(feature = "gamepad")]
    fn on_button(&mut self, button: Button, down: bool) {
        match button {
            Button::DPadLeft => self.dpad_left = down,
            Button::DPadRight => self.dpad_right = down,
            other => {
                if let Some(pad) = PadButton::from_gilrs(other) {
                    self.set(pad, down);
                }
            }
        }
    }

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn set(&mut self, button: PadButton, down: bool) {
        let i = button.slot();
        if down && !self.down[i] {
            self.fresh[i] = true;
        }
        self.down[i] = down;
    }

    fn fired(&self, bound: &[PadButton]) -> bool {
        bound.iter().any(|b| self.fresh[b.slot()])
    }

    pub fn confirm_pressed(&self) -> bool {
        self.fired(&self.bindings.confirm)
    }

    pub fn cancel_pressed(&self) -> bool {
        self.fired(&self.bindings.cancel)
    }

    pub fn left_held(&self) -> bool {
        self.dpad_left || self.stick_x < -STICK_DEADZONE
    }

    pub fn right_held(&self) -> bool {
        self.dpad_right || self.stick_x > STICK_DEADZONE
    }

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn release_all(&mut self) {
        self.down = [false; SLOTS];
        self.fresh = [false; SLOTS];
        self.dpad_left = false;
        self.dpad_right = false;
        self.stick_x = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pad(confirm: &[&str], cancel: &[&str]) -> GamepadState {
        let names = |list: &[&str]| list.iter().map(|s| s.to_string()).collect();
        GamepadState::new(&GamepadConfig { confirm: names(confirm), cancel: names(cancel) })
    }

    #[test]
    fn button_names_are_case_insensitive() {
        assert_eq!(PadButton::parse("start"), Some(PadButton::Start));
        assert_eq!(PadButton::parse(" Back "), Some(PadButton::Select));
        assert_eq!(PadButton::parse("SOUTH"), Some(PadButton::South));
        assert_eq!(PadButton::parse("A"), Some(PadButton::South));
        assert_eq!(PadButton::parse("Turbo"), None);
        assert_eq!(PadButton::parse("B"), None);
    }

    #[test]
    fn table_covers_every_slot() {
        let mut seen = [false; SLOTS];
        for (_, button) in BUTTON_NAMES {
            seen[button.slot()] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn config_replaces_bindings() {
        let mut gp = pad(&["Select"], &["a"]);
        gp.set(PadButton::Start, true);
        assert!(!gp.confirm_pressed());
        gp.set(PadButton::Select, true);
        assert!(gp.confirm_pressed());
        assert!(!gp.cancel_pressed());
        gp.set(PadButton::South, true);
        assert!(gp.cancel_pressed());
    }

    #[test]
    fn unknown_names_keep_defaults() {
        let mut gp = pad(&["Turbo"], &[]);
        gp.set(PadButton::South, true);
        assert!(gp.confirm_pressed());
        gp.set(PadButton::Select, true);
        assert!(gp.cancel_pressed());
    }

    #[test]
    fn held_button_fires_once() {
        let mut gp = pad(&[], &[]);
        gp.set(PadButton::Select, true);
        assert!(gp.cancel_pressed());
        gp.fresh = [false; SLOTS];
        gp.set(PadButton::Select, true);
        assert!(!gp.cancel_pressed());
        gp.set(PadButton::Select, false);
        gp.set(PadButton::Select, true);
        assert!(gp.cancel_pressed());
    }

    #[test]
    fn stick_deadzone() {
        let mut gp = pad(&[], &[]);
        gp.stick_x = -0.1;
        assert!(!gp.left_held() && !gp.right_held());
        gp.stick_x = -0.8;
        assert!(gp.left_held());
        gp.stick_x = 0.8;
        assert!(gp.right_held());
        gp.release_all();
        assert!(!gp.left_held() && !gp.right_held());
    }
}
