//! Terminal - input source and screen sink for the event loop
//!
//! [`CrosstermTerminal`] drives a real terminal: raw mode, alternate
//! screen and a [`DiffRenderer`]. [`ScriptedTerminal`] replays a fixed list
//! of events and records what was flushed, for tests and headless runs.

use std::collections::VecDeque;
use std::io::{self, Stdout, Write, stdout};

use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::style::{Attribute, SetAttribute};
use crossterm::terminal::{
    Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
    enable_raw_mode,
};
use tracing::{debug, warn};

use crate::renderer::{DiffRenderer, FrameBuffer};

/// Input the event loop reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    Resize(u16, u16),
}

impl InputEvent {
    /// Key press without modifiers.
    pub fn key(code: KeyCode) -> Self {
        InputEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    pub fn char(c: char) -> Self {
        Self::key(KeyCode::Char(c))
    }
}

pub trait Terminal {
    /// Block until the next key press or resize.
    fn next_event(&mut self) -> io::Result<InputEvent>;

    /// Show the screen buffer.
    fn flush(&mut self, screen: &FrameBuffer) -> io::Result<()>;

    /// Hand the terminal to a child process.
    fn suspend(&mut self) -> io::Result<()>;

    /// Take the terminal back after [`suspend`](Terminal::suspend).
    fn resume(&mut self) -> io::Result<()>;

    /// Next flush rewrites the whole screen.
    fn invalidate(&mut self) {}
}

// =============================================================================
// Crossterm
// =============================================================================

pub struct CrosstermTerminal {
    out: Stdout,
    renderer: DiffRenderer,
    active: bool,
}

impl CrosstermTerminal {
    /// Enter raw mode and the alternate screen.
    pub fn new() -> io::Result<Self> {
        let mut term = Self {
            out: stdout(),
            renderer: DiffRenderer::new(),
            active: false,
        };
        term.enter()?;
        Ok(term)
    }

    /// Current terminal size as `(cols, rows)`.
    pub fn size(&self) -> io::Result<(u16, u16)> {
        crossterm::terminal::size()
    }

    fn enter(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        execute!(self.out, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        self.renderer.invalidate();
        self.active = true;
        Ok(())
    }

    fn leave(&mut self) -> io::Result<()> {
        self.active = false;
        execute!(self.out, SetAttribute(Attribute::Reset), Show, LeaveAlternateScreen)?;
        disable_raw_mode()
    }
}

impl Terminal for CrosstermTerminal {
    fn next_event(&mut self) -> io::Result<InputEvent> {
        loop {
            match event::read()? {
                CrosstermEvent::Key(key) if key.kind != KeyEventKind::Release => {
                    return Ok(InputEvent::Key(key));
                }
                CrosstermEvent::Resize(cols, rows) => return Ok(InputEvent::Resize(cols, rows)),
                _ => {}
            }
        }
    }

    fn flush(&mut self, screen: &FrameBuffer) -> io::Result<()> {
        let rows = self.renderer.render(&mut self.out, screen)?;
        self.out.flush()?;
        if rows > 0 {
            debug!(rows, "flushed");
        }
        Ok(())
    }

    fn suspend(&mut self) -> io::Result<()> {
        if self.active {
            self.leave()?;
        }
        Ok(())
    }

    fn resume(&mut self) -> io::Result<()> {
        if !self.active {
            self.enter()?;
        }
        Ok(())
    }

    fn invalidate(&mut self) {
        self.renderer.invalidate();
    }
}

impl Drop for CrosstermTerminal {
    fn drop(&mut self) {
        if self.active {
            if let Err(err) = self.leave() {
                warn!(%err, "failed to restore terminal");
            }
        }
    }
}

// =============================================================================
// Scripted
// =============================================================================

/// Replays queued events. Running out of events is an
/// [`io::ErrorKind::UnexpectedEof`] error.
#[derive(Debug, Default)]
pub struct ScriptedTerminal {
    events: VecDeque<InputEvent>,
    frames: Vec<Vec<String>>,
    suspended: usize,
    resumed: usize,
}

impl ScriptedTerminal {
    pub fn new(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    /// Text of every flushed frame, row by row.
    pub fn frames(&self) -> &[Vec<String>] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&[String]> {
        self.frames.last().map(Vec::as_slice)
    }

    /// `(suspend calls, resume calls)`.
    pub fn suspensions(&self) -> (usize, usize) {
        (self.suspended, self.resumed)
    }
}

impl Terminal for ScriptedTerminal {
    fn next_event(&mut self) -> io::Result<InputEvent> {
        self.events
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no more scripted input"))
    }

    fn flush(&mut self, screen: &FrameBuffer) -> io::Result<()> {
        let frame = (0..screen.height()).map(|y| screen.row_text(y)).collect();
        self.frames.push(frame);
        Ok(())
    }

    fn suspend(&mut self) -> io::Result<()> {
        self.suspended += 1;
        Ok(())
    }

    fn resume(&mut self) -> io::Result<()> {
        self.resumed += 1;
        Ok(())
    }
}
