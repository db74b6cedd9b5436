//! Simple Bar - a one-line title window
//!
//! Used as the status line of dialogs and panels. The text is painted in
//! reverse video, padded to the window width.

use std::any::Any;

use tracing::debug;

use crate::Gui;
use crate::engine::{WindowBuilder, WindowData};
use crate::error::{GuiError, GuiResult, NotifyResult};
use crate::notify::{Event, EventType, HubId, NotifyCallback, WindowEvent};
use crate::types::{Attr, Sizing, WindowActions, WindowId, WindowType};

/// Text shown by a bar window.
#[derive(Debug, Default)]
pub struct SbarData {
    display: String,
}

impl SbarData {
    pub fn display(&self) -> &str {
        &self.display
    }
}

impl WindowData for SbarData {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Create a detached one-row bar of type `kind`.
pub fn bar_new(gui: &mut Gui, kind: WindowType) -> GuiResult<WindowId> {
    let win = WindowBuilder::new(kind)
        .width(Sizing::Unlimited)
        .height(Sizing::Fixed(1))
        .data(SbarData::default())
        .recalc(sbar_recalc)
        .repaint(sbar_repaint)
        .build(gui);
    gui.subscribe(HubId::Window(win), EventType::Window, sbar_window_observer, win)?;
    Ok(win)
}

/// Create a detached status bar.
pub fn sbar_new(gui: &mut Gui) -> GuiResult<WindowId> {
    bar_new(gui, WindowType::StatusBar)
}

/// Change the text of a bar.
pub fn sbar_set_title(gui: &mut Gui, win: WindowId, title: &str) -> GuiResult<()> {
    let w = gui.window_or_err(win)?;
    let data = w.data_mut::<SbarData>().ok_or(GuiError::MissingData(win, "bar"))?;
    if data.display == title {
        return Ok(());
    }
    data.display = title.to_string();
    w.actions |= WindowActions::REPAINT;
    debug!(title, "sbar title set, request REPAINT");
    Ok(())
}

fn sbar_recalc(gui: &mut Gui, win: WindowId) -> GuiResult<()> {
    gui.add_actions(win, WindowActions::REPAINT);
    Ok(())
}

fn sbar_repaint(gui: &mut Gui, win: WindowId) -> GuiResult<()> {
    let Gui { windows, screen, .. } = gui;
    let w = windows.get(win).ok_or(GuiError::StaleWindow(win))?;
    let state = w.state();
    let text = w.data::<SbarData>().map_or("", SbarData::display);
    if state.rows > 0 {
        screen.paint_row(state.col_offset, state.row_offset, state.cols, text, Attr::REVERSE);
    }
    Ok(())
}

fn sbar_window_observer(gui: &mut Gui, nc: &NotifyCallback<'_>) -> NotifyResult {
    if let Event::Window { subtype: WindowEvent::State, win } = nc.event {
        if *win == nc.context {
            gui.add_actions(*win, WindowActions::REPAINT);
            debug!("sbar window state done, request REPAINT");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Orient;

    fn setup() -> (Gui, WindowId) {
        let mut gui = Gui::new();
        let root = WindowBuilder::new(WindowType::Root)
            .orient(Orient::Vertical)
            .width(Sizing::Fixed(12))
            .height(Sizing::Fixed(2))
            .build(&mut gui);
        gui.screen_mut().resize(12, 2);
        let bar = sbar_new(&mut gui).unwrap();
        gui.add_child(root, bar).unwrap();
        gui.window_reflow(root).unwrap();
        (gui, bar)
    }

    #[test]
    fn test_set_title_requests_repaint() {
        let (mut gui, bar) = setup();
        gui.window_mut(bar).unwrap().actions = WindowActions::empty();

        sbar_set_title(&mut gui, bar, "Patterns").unwrap();
        assert!(gui.window(bar).unwrap().actions().contains(WindowActions::REPAINT));
        let data = gui.window(bar).unwrap().data::<SbarData>().unwrap();
        assert_eq!(data.display(), "Patterns");
    }

    #[test]
    fn test_same_title_is_noop() {
        let (mut gui, bar) = setup();
        sbar_set_title(&mut gui, bar, "x").unwrap();
        gui.window_mut(bar).unwrap().actions = WindowActions::empty();
        sbar_set_title(&mut gui, bar, "x").unwrap();
        assert!(gui.window(bar).unwrap().actions().is_empty());
    }

    #[test]
    fn test_repaint_pads_reverse() {
        let (mut gui, bar) = setup();
        sbar_set_title(&mut gui, bar, "-- Attachments").unwrap();
        sbar_repaint(&mut gui, bar).unwrap();
        assert_eq!(gui.screen().row_text(0), "-- Attachmen");
        assert_eq!(gui.screen().get(11, 0).unwrap().attrs, Attr::REVERSE);
    }

    #[test]
    fn test_geometry_change_requests_repaint() {
        let (gui, bar) = setup();
        assert!(gui.window(bar).unwrap().actions().contains(WindowActions::REPAINT));
        assert_eq!(gui.window(bar).unwrap().state().cols, 12);
    }
}
