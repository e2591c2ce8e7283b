/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Screens draw into the `front` buffer through a `Canvas`
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// The 800×600 field is stretched over the whole terminal via `Projection`.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use log::{debug, info};

use crate::sim::world::{Phase, WorldState};
use super::projection::{CellRect, Projection};
use super::surface::{Rgb, Surface};
use super::view;

const fn color(c: Rgb) -> Color {
    Color::Rgb { r: c.r, g: c.g, b: c.b }
}

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Every empty cell carries this explicit background, and so does
    /// `Clear`, so row gaps never show the terminal's own default.
    const BASE_BG: Color = color(Rgb::WHITE);

    const BLANK: Cell = Cell { ch: ' ', fg: Color::Black, bg: Cell::BASE_BG };

    /// Sentinel cell used to invalidate the back buffer.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Paint a cell's background (clears its glyph).
    fn paint(&mut self, x: i32, y: i32, bg: Color) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = Cell { ch: ' ', fg: Color::Black, bg };
        }
    }

    /// Put a glyph, keeping whatever background is already there.
    fn put_char(&mut self, x: i32, y: i32, ch: char, fg: Color) {
        if let Some(i) = self.index(x, y) {
            let bg = self.cells[i].bg;
            self.cells[i] = Cell { ch, fg, bg };
        }
    }

    fn put_str(&mut self, x: i32, y: i32, s: &str, fg: Color) {
        for (i, ch) in s.chars().enumerate() {
            self.put_char(x + i as i32, y, ch, fg);
        }
    }
}

// ── Canvas: Surface over a FrameBuffer ──

/// 3×5 digit glyphs, one string per row.
const BIG_DIGITS: [[&str; 5]; 10] = [
    ["###", "# #", "# #", "# #", "###"],
    [" # ", "## ", " # ", " # ", "###"],
    ["###", "  #", "###", "#  ", "###"],
    ["###", "  #", "###", "  #", "###"],
    ["# #", "# #", "###", "  #", "  #"],
    ["###", "#  ", "###", "  #", "###"],
    ["###", "#  ", "###", "# #", "###"],
    ["###", "  #", "  #", "  #", "  #"],
    ["###", "# #", "###", "# #", "###"],
    ["###", "# #", "###", "  #", "###"],
];

struct Canvas<'a> {
    buf: &'a mut FrameBuffer,
    proj: Projection,
}

/// `(col, row)` of every cell in `r`, row by row.
fn cells_in(r: CellRect) -> impl Iterator<Item = (i32, i32)> {
    (r.row0..r.row1).flat_map(move |row| (r.col0..r.col1).map(move |col| (col, row)))
}

impl Surface for Canvas<'_> {
    fn fill_rect(&mut self, cx: f32, cy: f32, w: f32, h: f32, c: Rgb) {
        let r = self.proj.cell_rect(cx, cy, w, h);
        for (col, row) in cells_in(r) {
            self.buf.paint(col, row, color(c));
        }
    }

    fn outline_rect(&mut self, cx: f32, cy: f32, w: f32, h: f32, c: Rgb) {
        let r = self.proj.cell_rect(cx, cy, w, h);
        let fg = color(c);
        let (left, right) = (r.col0, r.col1 - 1);
        let (top, bottom) = (r.row0, r.row1 - 1);

        if bottom - top >= 2 && right > left {
            for col in left + 1..right {
                self.buf.put_char(col, top, '─', fg);
                self.buf.put_char(col, bottom, '─', fg);
            }
            for row in top + 1..bottom {
                self.buf.put_char(left, row, '│', fg);
                self.buf.put_char(right, row, '│', fg);
            }
            self.buf.put_char(left, top, '┌', fg);
            self.buf.put_char(right, top, '┐', fg);
            self.buf.put_char(left, bottom, '└', fg);
            self.buf.put_char(right, bottom, '┘', fg);
        } else if right > left {
            // Too flat for a box: bracket each row.
            for row in top..=bottom {
                self.buf.put_char(left, row, '[', fg);
                self.buf.put_char(right, row, ']', fg);
            }
        }
    }

    fn text_centered(&mut self, x: f32, y: f32, text: &str, c: Rgb) {
        let len = text.chars().count() as i32;
        let col = self.proj.col_of(x) - len / 2;
        self.buf.put_str(col, self.proj.row_of(y), text, color(c));
    }

    fn text(&mut self, x: f32, y: f32, text: &str, c: Rgb) {
        self.buf.put_str(self.proj.col_of(x), self.proj.row_of(y), text, color(c));
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, c: Rgb) {
        let r = self.proj.cell_rect(cx, cy, radius * 2.0, radius * 2.0);
        let inside: Vec<(i32, i32)> = cells_in(r)
            .filter(|&(col, row)| {
                let dx = self.proj.col_center(col) - cx;
                let dy = self.proj.row_center(row) - cy;
                dx * dx + dy * dy <= radius * radius
            })
            .collect();
        if inside.is_empty() {
            self.buf.paint(self.proj.col_of(cx), self.proj.row_of(cy), color(c));
        }
        for (col, row) in inside {
            self.buf.paint(col, row, color(c));
        }
    }

    fn big_digit(&mut self, x: f32, y: f32, digit: u32, c: Rgb) {
        let Some(glyph) = BIG_DIGITS.get(digit as usize) else {
            self.text_centered(x, y, &digit.to_string(), c);
            return;
        };
        // Each font pixel is two columns wide to look square.
        let col0 = self.proj.col_of(x) - 3;
        let row0 = self.proj.row_of(y) - 2;
        for (dy, line) in glyph.iter().enumerate() {
            for (dx, px) in line.chars().enumerate() {
                if px == '#' {
                    let col = col0 + dx as i32 * 2;
                    let row = row0 + dy as i32;
                    self.buf.paint(col, row, color(c));
                    self.buf.paint(col + 1, row, color(c));
                }
            }
        }
    }
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_phase: Option<Phase>,
    enhanced_keys: bool,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_phase: None,
            enhanced_keys: false,
        }
    }

    /// Enter raw mode and the alternate screen. Returns whether the terminal
    /// reports key release events.
    pub fn init(&mut self) -> io::Result<bool> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        if terminal::supports_keyboard_enhancement().unwrap_or(false) {
            execute!(
                self.writer,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            self.enhanced_keys = true;
        }
        info!("terminal ready (key release events: {})", self.enhanced_keys);

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);

        Ok(self.enhanced_keys)
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        if self.enhanced_keys {
            execute!(self.writer, PopKeyboardEnhancementFlags)?;
        }
        execute!(
            self.writer,
            ResetColor,
            DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// Mapping for the current terminal size (used to translate clicks).
    pub fn projection(&self) -> Projection {
        Projection::new(self.term_w, self.term_h)
    }

    pub fn render(&mut self, world: &WorldState) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            debug!("terminal resized to {tw}x{th}");
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            // Force full repaint after resize.
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // Detect phase change → clear for clean transition
        let phase = world.phase();
        if self.last_phase != Some(phase) {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            self.last_phase = Some(phase);
        }

        self.front.clear();
        let proj = self.projection();
        view::draw_world(&mut Canvas { buf: &mut self.front, proj }, world);

        // Diff and emit
        self.flush_diff()?;

        // Swap: current front becomes next back
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::Black;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Explicit base colors at start of frame; ResetColor would fall back
        // to the terminal's own default.
        queue!(self.writer,
            SetForegroundColor(last_fg),
            SetBackgroundColor(last_bg),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                // Position cursor if needed
                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }

                // Set colors only if changed
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.ch))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::layout;

    fn canvas_run(cols: usize, rows: usize, draw: impl FnOnce(&mut Canvas)) -> FrameBuffer {
        let mut buf = FrameBuffer::new(cols, rows);
        draw(&mut Canvas { buf: &mut buf, proj: Projection::new(cols, rows) });
        buf
    }

    fn row_text(buf: &FrameBuffer, row: usize) -> String {
        (0..buf.width).map(|x| buf.get(x, row).ch).collect()
    }

    #[test]
    fn out_of_range_writes_are_ignored() {
        let buf = canvas_run(10, 5, |c| {
            c.buf.put_str(8, 0, "abcdef", Color::Black);
            c.buf.paint(-1, 2, Color::Red);
            c.buf.put_char(3, 9, 'x', Color::Black);
        });
        assert_eq!(row_text(&buf, 0), "        ab");
        assert!(buf.cells.iter().all(|cell| cell.bg == Cell::BASE_BG));
    }

    #[test]
    fn text_keeps_button_background() {
        let buf = canvas_run(80, 24, |c| layout::new_name_button().draw(c));
        let row = Projection::new(80, 24).row_of(200.0) as usize;
        let text = row_text(&buf, row);
        assert!(text.contains("New Name"), "{text:?}");
        let col = text.find('N').unwrap_or(0);
        assert_eq!(buf.get(col, row).bg, color(Rgb::LIGHT_GRAY));
    }

    #[test]
    fn tall_outline_draws_box_corners() {
        let buf = canvas_run(80, 60, |c| c.outline_rect(400.0, 300.0, 200.0, 100.0, Rgb::BLACK));
        let chars: String = buf.cells.iter().map(|c| c.ch).collect();
        for corner in ['┌', '┐', '└', '┘'] {
            assert_eq!(chars.matches(corner).count(), 1);
        }
    }

    #[test]
    fn small_ball_still_paints_one_cell() {
        let buf = canvas_run(20, 10, |c| c.fill_circle(400.0, 300.0, 5.0, Rgb::RED));
        let red = buf.cells.iter().filter(|c| c.bg == color(Rgb::RED)).count();
        assert_eq!(red, 1);
    }

    #[test]
    fn big_digit_paints_glyph() {
        let buf = canvas_run(80, 24, |c| c.big_digit(400.0, 300.0, 1, Rgb::BLACK));
        let painted = buf.cells.iter().filter(|c| c.bg == color(Rgb::BLACK)).count();
        // "1" has 8 lit pixels, two columns each.
        assert_eq!(painted, 16);
    }
}
