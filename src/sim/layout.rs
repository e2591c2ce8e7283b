//! Screen layout: where every button sits.
//!
//! Shared by click handling and drawing so the two can never disagree.

use crate::domain::physics::{FIELD_H, FIELD_W};
use crate::ui::button::Button;

pub const KEYBOARD_ROWS: [&str; 3] = ["QWERTYUIOP", "ASDFGHJKL", "ZXCVBNM"];

const KEY_SIZE: f32 = 40.0;
const KEY_SPACING: f32 = 50.0;
const ROW_SPACING: f32 = 50.0;

// ── Name selection ──

fn name_row_y(index: usize) -> f32 {
    FIELD_H / 2.0 + 100.0 - index as f32 * 50.0
}

pub fn name_button(index: usize, name: &str) -> Button {
    Button::new(FIELD_W / 2.0 - 100.0, name_row_y(index), 200.0, 40.0, name)
}

pub fn delete_button(index: usize) -> Button {
    Button::new(FIELD_W / 2.0 + 150.0, name_row_y(index), 40.0, 40.0, "X")
}

pub fn new_name_button() -> Button {
    Button::new(FIELD_W / 2.0, FIELD_H / 2.0 - 100.0, 200.0, 40.0, "New Name")
}

// ── Name entry ──

/// On-screen keyboard: letter keys plus the three control buttons.
#[derive(Clone, Debug)]
pub struct Keyboard {
    pub letters: Vec<Button>,
    pub space: Button,
    pub backspace: Button,
    pub done: Button,
}

impl Keyboard {
    pub fn new() -> Self {
        let start_y = FIELD_H / 2.0 - 50.0;

        let mut letters = Vec::with_capacity(26);
        for (row_index, row) in KEYBOARD_ROWS.iter().enumerate() {
            let row_len = row.chars().count() as f32;
            let start_x = FIELD_W / 2.0 - row_len * KEY_SPACING / 2.0 + KEY_SPACING / 2.0;
            let y = start_y - row_index as f32 * ROW_SPACING;
            for (col_index, letter) in row.chars().enumerate() {
                let x = start_x + col_index as f32 * KEY_SPACING;
                letters.push(Button::new(x, y, KEY_SIZE, KEY_SIZE, letter));
            }
        }

        let below_keys = start_y - KEYBOARD_ROWS.len() as f32 * ROW_SPACING;
        Keyboard {
            letters,
            space: Button::new(FIELD_W / 2.0, below_keys - 20.0, 200.0, 40.0, "SPACE"),
            backspace: Button::new(FIELD_W / 2.0, below_keys - 70.0, 200.0, 40.0, "BACKSPACE"),
            done: Button::new(FIELD_W / 2.0 + 200.0, FIELD_H / 2.0 + 50.0, 100.0, 40.0, "Done"),
        }
    }

    /// Buttons in draw order.
    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.letters
            .iter()
            .chain([&self.space, &self.backspace, &self.done])
    }
}

impl Default for Keyboard {
    fn default() -> Self {
        Self::new()
    }
}
