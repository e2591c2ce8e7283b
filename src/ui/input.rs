/// Input state tracker.
///
/// Tracks which keys are currently held down, enabling:
///   - Continuous paddle movement while a key is held
///   - Edge-triggered actions (restart, quit) that fire on initial press
///   - Mouse clicks, reported as terminal cells
///
/// Uses crossterm's keyboard enhancement for Release events when available.
/// Falls back to timeout-based release detection on terminals that don't support it.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};

/// After this duration without a Press/Repeat event, consider the key released.
/// Only used when the terminal doesn't report Release events.
const HOLD_TIMEOUT: Duration = Duration::from_millis(300);

pub struct InputState {
    /// Timestamp of last Press/Repeat event for each key.
    last_active: HashMap<KeyCode, Instant>,

    /// Keys that transitioned from "not held" → "held" during the
    /// most recent drain_events() call.
    fresh_presses: Vec<KeyCode>,

    /// Left-button presses during the most recent drain, as (column, row).
    clicks: Vec<(u16, u16)>,

    /// Raw key events collected during drain, for meta-key handling.
    raw_events: Vec<KeyEvent>,

    /// Whether to honor Release events. Only true when keyboard
    /// enhancement is confirmed working.
    pub honor_release: bool,
}

impl InputState {
    pub fn new(honor_release: bool) -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            fresh_presses: Vec::with_capacity(8),
            clicks: Vec::with_capacity(4),
            raw_events: Vec::with_capacity(8),
            honor_release,
        }
    }

    /// Drain all pending terminal events and update key states.
    /// Call this once per frame, before simulation tick.
    pub fn drain_events(&mut self) {
        self.fresh_presses.clear();
        self.clicks.clear();
        self.raw_events.clear();

        // Read all available events without blocking
        while poll(Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(Event::Key(key)) => self.on_key(key, Instant::now()),
                Ok(Event::Mouse(mouse)) => self.on_mouse(mouse),
                _ => {}
            }
        }

        self.expire(Instant::now());
    }

    fn on_key(&mut self, key: KeyEvent, now: Instant) {
        self.raw_events.push(key);

        match key.kind {
            KeyEventKind::Release if self.honor_release => {
                self.last_active.remove(&key.code);
            }
            KeyEventKind::Release => {
                // Not trusted without enhancement; the timeout handles it.
            }
            _ => {
                let was_held = self.is_held_at(key.code, now);
                self.last_active.insert(key.code, now);
                if !was_held {
                    self.fresh_presses.push(key.code);
                }
            }
        }
    }

    fn on_mouse(&mut self, mouse: MouseEvent) {
        if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
            self.clicks.push((mouse.column, mouse.row));
        }
    }

    /// Expire keys that have timed out (fallback for terminals without Release).
    fn expire(&mut self, now: Instant) {
        if !self.honor_release {
            self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
        }
    }

    /// Is this key currently held down?
    pub fn is_held(&self, code: KeyCode) -> bool {
        self.is_held_at(code, Instant::now())
    }

    /// Convenience: is any of these keys held?
    pub fn any_held(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.is_held(*c))
    }

    /// Was this key freshly pressed this frame? (edge trigger)
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.fresh_presses.contains(&code)
    }

    /// Convenience: was any of these keys freshly pressed?
    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.was_pressed(*c))
    }

    pub fn clicks(&self) -> &[(u16, u16)] {
        &self.clicks
    }

    /// Check if any raw event this frame has Ctrl+C
    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }

    // ── Internal ──

    fn is_held_at(&self, code: KeyCode, now: Instant) -> bool {
        match self.last_active.get(&code) {
            Some(_) if self.honor_release => true,
            Some(t) => now.duration_since(*t) < HOLD_TIMEOUT,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent { code, modifiers: KeyModifiers::NONE, kind, state: KeyEventState::NONE }
    }

    #[test]
    fn press_is_fresh_once() {
        let mut kb = InputState::new(false);
        let t = Instant::now();
        kb.on_key(key(KeyCode::Left, KeyEventKind::Press), t);
        assert!(kb.was_pressed(KeyCode::Left));
        kb.fresh_presses.clear();
        kb.on_key(key(KeyCode::Left, KeyEventKind::Repeat), t);
        assert!(!kb.was_pressed(KeyCode::Left));
        assert!(kb.any_held(&[KeyCode::Right, KeyCode::Left]));
    }

    #[test]
    fn release_ignored_without_enhancement() {
        let mut kb = InputState::new(false);
        let t = Instant::now();
        kb.on_key(key(KeyCode::Left, KeyEventKind::Press), t);
        kb.on_key(key(KeyCode::Left, KeyEventKind::Release), t);
        assert!(kb.is_held_at(KeyCode::Left, t));
        kb.expire(t + HOLD_TIMEOUT);
        assert!(!kb.is_held_at(KeyCode::Left, t + HOLD_TIMEOUT));
    }

    #[test]
    fn release_honored_with_enhancement() {
        let mut kb = InputState::new(true);
        let t = Instant::now();
        kb.on_key(key(KeyCode::Right, KeyEventKind::Press), t);
        kb.expire(t + HOLD_TIMEOUT * 10);
        assert!(kb.is_held_at(KeyCode::Right, t + HOLD_TIMEOUT * 10));
        kb.on_key(key(KeyCode::Right, KeyEventKind::Release), t);
        assert!(!kb.is_held(KeyCode::Right));
    }

    #[test]
    fn only_left_button_down_counts_as_click() {
        let mut kb = InputState::new(false);
        let mouse = |kind| MouseEvent { kind, column: 7, row: 3, modifiers: KeyModifiers::NONE };
        kb.on_mouse(mouse(MouseEventKind::Down(MouseButton::Right)));
        kb.on_mouse(mouse(MouseEventKind::Moved));
        kb.on_mouse(mouse(MouseEventKind::Up(MouseButton::Left)));
        kb.on_mouse(mouse(MouseEventKind::Down(MouseButton::Left)));
        assert_eq!(kb.clicks(), &[(7, 3)]);
    }

    #[test]
    fn ctrl_c_detected() {
        let mut kb = InputState::new(false);
        let mut ev = key(KeyCode::Char('c'), KeyEventKind::Press);
        ev.modifiers = KeyModifiers::CONTROL;
        kb.on_key(ev, Instant::now());
        assert!(kb.ctrl_c_pressed());
    }
}
