//! Message Window - one line for messages and errors
//!
//! Errors are also logged, so they survive the screen being redrawn.

use std::any::Any;

use tracing::{error, info};

use crate::Gui;
use crate::engine::{WindowBuilder, WindowData};
use crate::error::{GuiError, GuiResult};
use crate::types::{Attr, Sizing, WindowActions, WindowId, WindowType};

#[derive(Debug, Default)]
pub struct MsgData {
    text: String,
    is_error: bool,
}

impl MsgData {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_error(&self) -> bool {
        self.is_error
    }
}

impl WindowData for MsgData {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

pub fn msgwin_new(gui: &mut Gui) -> WindowId {
    WindowBuilder::new(WindowType::Message)
        .width(Sizing::Unlimited)
        .height(Sizing::Fixed(1))
        .data(MsgData::default())
        .repaint(msgwin_repaint)
        .build(gui)
}

fn msgwin_repaint(gui: &mut Gui, win: WindowId) -> GuiResult<()> {
    let Gui { windows, screen, .. } = gui;
    let w = windows.get(win).ok_or(GuiError::StaleWindow(win))?;
    let state = w.state();
    let (text, attrs) = match w.data::<MsgData>() {
        Some(d) if d.is_error => (d.text(), Attr::BOLD),
        Some(d) => (d.text(), Attr::NONE),
        None => ("", Attr::NONE),
    };
    if state.rows > 0 {
        screen.paint_row(state.col_offset, state.row_offset, state.cols, text, attrs);
    }
    Ok(())
}

impl Gui {
    fn set_message(&mut self, text: &str, is_error: bool) {
        let Some(win) = self.message else {
            return;
        };
        if let Some(w) = self.windows.get_mut(win) {
            if let Some(data) = w.data_mut::<MsgData>() {
                data.text = text.to_string();
                data.is_error = is_error;
                w.actions |= WindowActions::REPAINT;
            }
        }
    }

    /// Show an informational message.
    pub fn show_message(&mut self, text: &str) {
        info!(text, "message");
        self.set_message(text, false);
    }

    /// Show and log an error.
    pub fn show_error(&mut self, text: &str) {
        error!(text, "error");
        self.set_message(text, true);
    }

    pub fn clear_message(&mut self) {
        let showing = self
            .message
            .and_then(|w| self.windows.get(w))
            .and_then(|w| w.data::<MsgData>())
            .is_some_and(|d| !d.text.is_empty());
        if showing {
            self.set_message("", false);
        }
    }

    /// Text currently in the message window.
    pub fn message_text(&self) -> Option<&str> {
        let win = self.message?;
        Some(self.windows.get(win)?.data::<MsgData>()?.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Gui, WindowId) {
        let mut gui = Gui::new();
        let win = msgwin_new(&mut gui);
        gui.message = Some(win);
        (gui, win)
    }

    #[test]
    fn test_show_error_marks_repaint() {
        let (mut gui, win) = setup();
        gui.show_error("Error running \"false\"");
        let w = gui.window(win).unwrap();
        assert!(w.actions().contains(WindowActions::REPAINT));
        assert!(w.data::<MsgData>().unwrap().is_error());
        assert_eq!(gui.message_text(), Some("Error running \"false\""));
    }

    #[test]
    fn test_clear_only_when_showing() {
        let (mut gui, win) = setup();
        gui.clear_message();
        assert!(gui.window(win).unwrap().actions().is_empty());

        gui.show_message("hello");
        gui.window_mut(win).unwrap().actions = WindowActions::empty();
        gui.clear_message();
        assert_eq!(gui.message_text(), Some(""));
        assert!(gui.window(win).unwrap().actions().contains(WindowActions::REPAINT));
    }

    #[test]
    fn test_no_message_window_is_fine() {
        let mut gui = Gui::new();
        gui.show_message("nobody listening");
        assert_eq!(gui.message_text(), None);
    }
}
