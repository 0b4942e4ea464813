//! Terminal backend for [`Surface`].
//!
//! The logical canvas (play area plus HUD strip, in pixels) is scaled onto the
//! terminal grid. Drawing goes into a front buffer of cells; [`TerminalSurface::present`]
//! compares it with what is on screen and only emits commands for cells that
//! changed, then flushes once.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};

use crate::geometry::{Point, Rect};
use crate::render::{Image, Rgb, Surface};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Rgb,
    pub bg: Rgb,
}

impl Cell {
    const BLANK: Cell = Cell {
        ch: ' ',
        fg: Rgb::new(255, 255, 255),
        bg: Rgb::new(0, 0, 0),
    };

    /// Never equal to a drawn cell; forces a full repaint.
    const INVALID: Cell = Cell {
        ch: '\u{0}',
        fg: Rgb::new(255, 0, 255),
        bg: Rgb::new(255, 0, 255),
    };
}

fn to_color(c: Rgb) -> Color {
    Color::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

pub struct TerminalSurface {
    cols: u16,
    rows: u16,
    canvas_width: i32,
    canvas_height: i32,
    front: Vec<Cell>,
    back: Vec<Cell>,
}

impl TerminalSurface {
    pub fn new(cols: u16, rows: u16, canvas_width: i32, canvas_height: i32) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        let n = cols as usize * rows as usize;
        Self {
            cols,
            rows,
            canvas_width: canvas_width.max(1),
            canvas_height: canvas_height.max(1),
            front: vec![Cell::BLANK; n],
            back: vec![Cell::INVALID; n],
        }
    }

    pub fn size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        tracing::debug!(target: "display", cols, rows, "terminal resized");
        *self = Self::new(cols, rows, self.canvas_width, self.canvas_height);
    }

    pub fn cell(&self, col: u16, row: u16) -> Option<Cell> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        Some(self.front[row as usize * self.cols as usize + col as usize])
    }

    /// Canvas point at the centre of a terminal cell.
    pub fn cell_to_canvas(&self, col: u16, row: u16) -> Point {
        let x = (2 * col as i64 + 1) * self.canvas_width as i64 / (2 * self.cols as i64);
        let y = (2 * row as i64 + 1) * self.canvas_height as i64 / (2 * self.rows as i64);
        Point::new(x as i32, y as i32)
    }

    /// Cell containing a canvas point (may lie off-grid).
    fn canvas_to_cell(&self, p: Point) -> (i64, i64) {
        let col = (p.x as i64 * self.cols as i64).div_euclid(self.canvas_width as i64);
        let row = (p.y as i64 * self.rows as i64).div_euclid(self.canvas_height as i64);
        (col, row)
    }

    /// Cells whose centres lie inside `[start, end)` along one axis.
    fn span(start: i32, end: i32, cells: u16, extent: i32) -> std::ops::Range<usize> {
        // Centre of cell c is (c + 0.5) * extent / cells; solve for the first
        // and one-past-last c whose centre falls inside the span.
        let first = |v: i32| -> i64 {
            let num = 2 * v as i64 * cells as i64 - extent as i64;
            let den = 2 * extent as i64;
            -((-num).div_euclid(den))
        };
        let lo = first(start).clamp(0, cells as i64) as usize;
        let hi = first(end).clamp(0, cells as i64) as usize;
        lo..hi.max(lo)
    }

    fn paint(&mut self, rect: Rect, mut f: impl FnMut(&mut Cell)) {
        let cols = Self::span(rect.x, rect.right(), self.cols, self.canvas_width);
        let rows = Self::span(rect.y, rect.bottom(), self.rows, self.canvas_height);
        for row in rows {
            for col in cols.clone() {
                f(&mut self.front[row * self.cols as usize + col]);
            }
        }
    }

    /// Force every cell to be redrawn on the next `present`.
    pub fn invalidate(&mut self) {
        self.back.fill(Cell::INVALID);
    }

    /// Write the changed cells to `out` and flush.
    pub fn present<W: Write>(&mut self, out: &mut W) -> std::io::Result<()> {
        let mut last: Option<(Rgb, Rgb)> = None;
        let mut cursor_at: Option<(u16, u16)> = None;
        for row in 0..self.rows {
            for col in 0..self.cols {
                let i = row as usize * self.cols as usize + col as usize;
                let cell = self.front[i];
                if cell == self.back[i] {
                    continue;
                }
                if cursor_at != Some((col, row)) {
                    out.queue(cursor::MoveTo(col, row))?;
                }
                if last != Some((cell.fg, cell.bg)) {
                    out.queue(style::SetForegroundColor(to_color(cell.fg)))?;
                    out.queue(style::SetBackgroundColor(to_color(cell.bg)))?;
                    last = Some((cell.fg, cell.bg));
                }
                out.queue(Print(cell.ch))?;
                cursor_at = Some((col + 1, row));
            }
        }
        out.queue(style::ResetColor)?;
        out.flush()?;
        self.back.copy_from_slice(&self.front);
        Ok(())
    }

    /// Blank the physical terminal and force a full repaint.
    pub fn reset_screen<W: Write>(&mut self, out: &mut W) -> std::io::Result<()> {
        out.queue(terminal::Clear(terminal::ClearType::All))?;
        self.invalidate();
        Ok(())
    }
}

impl Surface for TerminalSurface {
    fn clear(&mut self, color: Rgb) {
        self.front.fill(Cell {
            ch: ' ',
            fg: Cell::BLANK.fg,
            bg: color,
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        self.paint(rect, |cell| {
            cell.ch = ' ';
            cell.bg = color;
        });
    }

    fn blit(&mut self, image: &Image, at: Point) {
        let rect = Rect::new(at.x, at.y, image.width, image.height);
        self.paint(rect, |cell| {
            cell.ch = image.glyph;
            cell.fg = image.glyph_color;
            cell.bg = image.fill;
        });
    }

    fn draw_text(&mut self, text: &str, at: Point, color: Rgb) {
        let (col, row) = self.canvas_to_cell(at);
        if row < 0 || row >= self.rows as i64 {
            return;
        }
        for (i, ch) in text.chars().enumerate() {
            let c = col + i as i64;
            if c < 0 {
                continue;
            }
            if c >= self.cols as i64 {
                break;
            }
            let cell = &mut self.front[row as usize * self.cols as usize + c as usize];
            cell.ch = ch;
            cell.fg = color;
        }
    }

    fn text_width(&self, text: &str) -> i32 {
        let chars = text.chars().count() as i64;
        (chars * self.canvas_width as i64 / self.cols as i64) as i32
    }
}
