//! Projection between playfield coordinates and terminal cells.
//!
//! The whole 800×600 field is stretched over the terminal. Field y grows
//! upward, terminal rows grow downward.
//!
//! A cell belongs to a rectangle iff the cell's center point is strictly
//! inside it. `Button::is_clicked` uses the same test, so every drawn cell
//! of a button is also a clickable cell of that button.

use crate::domain::physics::{FIELD_H, FIELD_W};

/// Half-open cell range: columns `col0..col1`, rows `row0..row1`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CellRect {
    pub col0: i32,
    pub col1: i32,
    pub row0: i32,
    pub row1: i32,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Projection {
    pub cols: usize,
    pub rows: usize,
}

impl Projection {
    pub fn new(cols: usize, rows: usize) -> Self {
        Projection { cols: cols.max(1), rows: rows.max(1) }
    }

    fn col_w(&self) -> f32 { FIELD_W / self.cols as f32 }
    fn row_h(&self) -> f32 { FIELD_H / self.rows as f32 }

    /// Column containing field `x` (may be out of range).
    pub fn col_of(&self, x: f32) -> i32 {
        (x / self.col_w()).floor() as i32
    }

    /// Row containing field `y` (may be out of range).
    pub fn row_of(&self, y: f32) -> i32 {
        ((FIELD_H - y) / self.row_h()).floor() as i32
    }

    pub fn col_center(&self, col: i32) -> f32 {
        (col as f32 + 0.5) * self.col_w()
    }

    pub fn row_center(&self, row: i32) -> f32 {
        FIELD_H - (row as f32 + 0.5) * self.row_h()
    }

    /// Field point under a terminal cell (used for mouse clicks).
    pub fn cell_center(&self, col: u16, row: u16) -> (f32, f32) {
        (self.col_center(col as i32), self.row_center(row as i32))
    }

    /// Cells covered by the rectangle centered at `(cx, cy)`.
    /// A rectangle smaller than a cell still gets the cell holding its center.
    pub fn cell_rect(&self, cx: f32, cy: f32, w: f32, h: f32) -> CellRect {
        let (left, right) = (cx - w / 2.0, cx + w / 2.0);
        let (bottom, top) = (cy - h / 2.0, cy + h / 2.0);

        let cols = inside_span(self.col_of(left) - 1, self.col_of(right) + 1, |c| {
            let x = self.col_center(c);
            left < x && x < right
        });
        let rows = inside_span(self.row_of(top) - 1, self.row_of(bottom) + 1, |r| {
            let y = self.row_center(r);
            bottom < y && y < top
        });

        let (col0, col1) = cols.unwrap_or_else(|| {
            let c = self.col_of(cx);
            (c, c + 1)
        });
        let (row0, row1) = rows.unwrap_or_else(|| {
            let r = self.row_of(cy);
            (r, r + 1)
        });
        CellRect { col0, col1, row0, row1 }
    }
}

/// First and one-past-last index in `lo..=hi` satisfying `inside`.
/// Assumes the satisfying indices are contiguous.
fn inside_span(lo: i32, hi: i32, inside: impl Fn(i32) -> bool) -> Option<(i32, i32)> {
    let first = (lo..=hi).find(|&i| inside(i))?;
    let last = (first..=hi).take_while(|&i| inside(i)).last().unwrap_or(first);
    Some((first, last + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::layout::{self, Keyboard};
    use crate::ui::button::Button;

    fn every_cell_clicks(p: &Projection, b: &Button) {
        let r = p.cell_rect(b.x, b.y, b.width, b.height);
        assert!(r.col1 > r.col0 && r.row1 > r.row0);
        for row in r.row0..r.row1 {
            for col in r.col0..r.col1 {
                let (x, y) = p.cell_center(col as u16, row as u16);
                assert!(b.is_clicked(x, y), "{} cell ({col},{row}) at {p:?}", b.label);
            }
        }
    }

    #[test]
    fn drawn_cells_are_clickable() {
        for (cols, rows) in [(80, 24), (100, 30), (120, 40), (213, 57)] {
            let p = Projection::new(cols, rows);
            for b in Keyboard::new().buttons() {
                every_cell_clicks(&p, b);
            }
            every_cell_clicks(&p, &layout::new_name_button());
            every_cell_clicks(&p, &layout::name_button(0, "A"));
            every_cell_clicks(&p, &layout::delete_button(3));
        }
    }

    #[test]
    fn corners_map_to_corner_cells() {
        let p = Projection::new(100, 30);
        assert_eq!(p.col_of(0.0), 0);
        assert_eq!(p.row_of(FIELD_H - 0.1), 0);
        assert_eq!(p.col_of(FIELD_W - 0.1), 99);
        assert_eq!(p.row_of(0.1), 29);
        let (x, y) = p.cell_center(0, 0);
        assert_eq!((x, y), (4.0, 590.0));
    }

    #[test]
    fn tiny_rect_still_gets_a_cell() {
        let p = Projection::new(10, 10);
        let r = p.cell_rect(400.0, 300.0, 1.0, 1.0);
        assert_eq!(r, CellRect { col0: 5, col1: 6, row0: 5, row1: 6 });
    }
}
