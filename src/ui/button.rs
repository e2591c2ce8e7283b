//! Clickable rectangular button.
//!
//! A plain value: call sites are free to rebuild buttons every frame.

use super::surface::{Rgb, Surface};

#[derive(Clone, PartialEq, Debug)]
pub struct Button {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub label: String,
}

impl Button {
    pub fn new(x: f32, y: f32, width: f32, height: f32, label: impl Into<String>) -> Self {
        Button { x, y, width, height, label: label.into() }
    }

    /// Is `(px, py)` strictly inside the button? Edges don't count.
    pub fn is_clicked(&self, px: f32, py: f32) -> bool {
        let half_w = self.width / 2.0;
        let half_h = self.height / 2.0;
        self.x - half_w < px
            && px < self.x + half_w
            && self.y - half_h < py
            && py < self.y + half_h
    }

    pub fn draw(&self, surface: &mut impl Surface) {
        surface.fill_rect(self.x, self.y, self.width, self.height, Rgb::LIGHT_GRAY);
        surface.outline_rect(self.x, self.y, self.width, self.height, Rgb::BLACK);
        surface.text_centered(self.x, self.y, &self.label, Rgb::BLACK);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::surface::{DrawOp, Recorder};

    #[test]
    fn click_inside() {
        let b = Button::new(100.0, 50.0, 40.0, 20.0, "OK");
        assert!(b.is_clicked(100.0, 50.0));
        assert!(b.is_clicked(80.5, 40.5));
        assert!(b.is_clicked(119.9, 59.9));
    }

    #[test]
    fn edges_are_outside() {
        let b = Button::new(100.0, 50.0, 40.0, 20.0, "OK");
        assert!(!b.is_clicked(80.0, 50.0));
        assert!(!b.is_clicked(120.0, 50.0));
        assert!(!b.is_clicked(100.0, 40.0));
        assert!(!b.is_clicked(100.0, 60.0));
        assert!(!b.is_clicked(300.0, 300.0));
    }

    #[test]
    fn draw_fills_outlines_and_labels() {
        let b = Button::new(10.0, 20.0, 30.0, 40.0, "Done");
        let mut rec = Recorder::default();
        b.draw(&mut rec);
        assert_eq!(rec.ops.len(), 3);
        assert!(matches!(rec.ops[0], DrawOp::Fill { color: Rgb::LIGHT_GRAY, .. }));
        assert!(matches!(rec.ops[1], DrawOp::Outline { color: Rgb::BLACK, .. }));
        assert_eq!(
            rec.ops[2],
            DrawOp::Text { x: 10.0, y: 20.0, text: "Done".into(), centered: true }
        );
    }
}
