//! Drawing surface abstraction.
//!
//! Screens and widgets draw in playfield coordinates (origin bottom-left,
//! y up) through this trait. The terminal renderer implements it; tests use
//! `Recorder` to inspect what would have been drawn.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const LIGHT_GRAY: Rgb = Rgb::new(211, 211, 211);
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const RED_DEVIL: Rgb = Rgb::new(134, 1, 17);
    pub const ORANGE: Rgb = Rgb::new(255, 165, 0);
    pub const BLUE: Rgb = Rgb::new(0, 0, 255);
}

pub trait Surface {
    /// Solid rectangle centered at `(cx, cy)`.
    fn fill_rect(&mut self, cx: f32, cy: f32, w: f32, h: f32, color: Rgb);

    /// Rectangle border centered at `(cx, cy)`.
    fn outline_rect(&mut self, cx: f32, cy: f32, w: f32, h: f32, color: Rgb);

    /// Text whose center sits at `(x, y)`.
    fn text_centered(&mut self, x: f32, y: f32, text: &str, color: Rgb);

    /// Text whose left end sits at `(x, y)`.
    fn text(&mut self, x: f32, y: f32, text: &str, color: Rgb);

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgb);

    /// Large single-digit display. Surfaces without a big font fall back
    /// to plain centered text.
    fn big_digit(&mut self, x: f32, y: f32, digit: u32, color: Rgb) {
        self.text_centered(x, y, &digit.to_string(), color);
    }
}

// ── Recorder: a Surface that remembers draw calls ──

#[cfg(test)]
#[derive(Clone, PartialEq, Debug)]
pub enum DrawOp {
    Fill { cx: f32, cy: f32, w: f32, h: f32, color: Rgb },
    Outline { cx: f32, cy: f32, w: f32, h: f32, color: Rgb },
    Text { x: f32, y: f32, text: String, centered: bool },
    Circle { cx: f32, cy: f32, radius: f32 },
}

#[cfg(test)]
#[derive(Default, Debug)]
pub struct Recorder {
    pub ops: Vec<DrawOp>,
}

#[cfg(test)]
impl Recorder {
    /// All text drawn, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn has_text(&self, s: &str) -> bool {
        self.texts().iter().any(|t| *t == s)
    }
}

#[cfg(test)]
impl Surface for Recorder {
    fn fill_rect(&mut self, cx: f32, cy: f32, w: f32, h: f32, color: Rgb) {
        self.ops.push(DrawOp::Fill { cx, cy, w, h, color });
    }

    fn outline_rect(&mut self, cx: f32, cy: f32, w: f32, h: f32, color: Rgb) {
        self.ops.push(DrawOp::Outline { cx, cy, w, h, color });
    }

    fn text_centered(&mut self, x: f32, y: f32, text: &str, _color: Rgb) {
        self.ops.push(DrawOp::Text { x, y, text: text.to_string(), centered: true });
    }

    fn text(&mut self, x: f32, y: f32, text: &str, _color: Rgb) {
        self.ops.push(DrawOp::Text { x, y, text: text.to_string(), centered: false });
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, _color: Rgb) {
        self.ops.push(DrawOp::Circle { cx, cy, radius });
    }
}
