//! FrameBuffer - the screen buffer windows paint into.
//!
//! A 2D grid of [`Cell`]s mirroring what should be on the terminal. Windows
//! paint rows during the repaint phase; the terminal flushes the buffer after
//! each redraw pass.
//!
//! - **Flat storage**: `Vec<Cell>`, row-major, `index = y * width + x`.
//! - **Wide characters**: the cell after a double-width character holds `'\0'`.

use crate::layout::text_measure::char_width;
use crate::types::{Attr, Cell};

#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    #[inline]
    pub fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if self.in_bounds(x, y) {
            self.cells.get(self.index(x, y))
        } else {
            None
        }
    }

    /// Resize, discarding contents.
    pub fn resize(&mut self, width: u16, height: u16) {
        if width == self.width && height == self.height {
            return;
        }
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Blank `width` cells of row `y` starting at `x`.
    pub fn clear_span(&mut self, x: u16, y: u16, width: u16) {
        if y >= self.height {
            return;
        }
        let end = x.saturating_add(width).min(self.width);
        for col in x..end {
            let idx = self.index(col, y);
            self.cells[idx] = Cell::default();
        }
    }

    /// Write `text` at (`x`, `y`), never past `x + max_width` or the buffer
    /// edge. Returns the number of cells written.
    pub fn put_str(&mut self, x: u16, y: u16, max_width: u16, text: &str, attrs: Attr) -> u16 {
        if y >= self.height {
            return 0;
        }
        let limit = x.saturating_add(max_width).min(self.width);
        let mut col = x;
        for ch in text.chars() {
            let w = char_width(ch) as u16;
            if w == 0 {
                continue;
            }
            if col + w > limit {
                break;
            }
            let idx = self.index(col, y);
            self.cells[idx] = Cell { ch, attrs };
            if w == 2 {
                self.cells[idx + 1] = Cell { ch: '\0', attrs };
            }
            col += w;
        }
        col - x
    }

    /// Paint one full-width row of a window: text, then blanks to `width`.
    pub fn paint_row(&mut self, x: u16, y: u16, width: u16, text: &str, attrs: Attr) {
        let used = self.put_str(x, y, width, text, attrs);
        for col in x + used..x.saturating_add(width).min(self.width) {
            let idx = self.index(col, y);
            self.cells[idx] = Cell { ch: ' ', attrs };
        }
    }

    /// Row `y` as a string, wide-char continuations skipped.
    pub fn row_text(&self, y: u16) -> String {
        if y >= self.height {
            return String::new();
        }
        let start = self.index(0, y);
        self.cells[start..start + self.width as usize]
            .iter()
            .filter(|c| c.ch != '\0')
            .map(|c| c.ch)
            .collect()
    }

    /// Cells of row `y`.
    pub fn row(&self, y: u16) -> &[Cell] {
        if y >= self.height {
            return &[];
        }
        let start = self.index(0, y);
        &self.cells[start..start + self.width as usize]
    }
}
