//! Differential renderer.
//!
//! Compares the current frame to the previous one and only rewrites rows
//! that changed.
//!
//! # Algorithm
//!
//! 1. Wrap output in a synchronized update
//! 2. For each row of the new frame:
//!    - unchanged since the previous frame: skip
//!    - otherwise: move to column 0 and print the row, emitting attribute
//!      changes only when they differ from the last cell written
//! 3. Flush once
//! 4. Keep the frame for the next comparison

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::terminal::{BeginSynchronizedUpdate, EndSynchronizedUpdate};

use super::buffer::FrameBuffer;
use crate::types::Attr;

#[derive(Debug, Default)]
pub struct DiffRenderer {
    previous: Option<FrameBuffer>,
}

impl DiffRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous frame so the next render repaints everything.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    /// Write the changed rows of `buffer` to `out`. Returns the row count.
    pub fn render<W: Write>(&mut self, out: &mut W, buffer: &FrameBuffer) -> io::Result<usize> {
        let same_size = self
            .previous
            .as_ref()
            .is_some_and(|p| p.width() == buffer.width() && p.height() == buffer.height());
        if !same_size {
            self.previous = None;
        }

        queue!(out, BeginSynchronizedUpdate)?;
        let mut current = Attr::NONE;
        queue!(out, SetAttribute(Attribute::Reset))?;

        let mut written = 0;
        for y in 0..buffer.height() {
            let row = buffer.row(y);
            if self.previous.as_ref().is_some_and(|p| p.row(y) == row) {
                continue;
            }
            queue!(out, MoveTo(0, y))?;
            for cell in row {
                if cell.ch == '\0' {
                    continue;
                }
                if cell.attrs != current {
                    apply_attrs(out, cell.attrs)?;
                    current = cell.attrs;
                }
                queue!(out, Print(cell.ch))?;
            }
            written += 1;
        }

        queue!(out, SetAttribute(Attribute::Reset), EndSynchronizedUpdate)?;
        out.flush()?;
        self.previous = Some(buffer.clone());
        Ok(written)
    }
}

fn apply_attrs<W: Write>(out: &mut W, attrs: Attr) -> io::Result<()> {
    queue!(out, SetAttribute(Attribute::Reset))?;
    if attrs.contains(Attr::BOLD) {
        queue!(out, SetAttribute(Attribute::Bold))?;
    }
    if attrs.contains(Attr::UNDERLINE) {
        queue!(out, SetAttribute(Attribute::Underlined))?;
    }
    if attrs.contains(Attr::REVERSE) {
        queue!(out, SetAttribute(Attribute::Reverse))?;
    }
    Ok(())
}
