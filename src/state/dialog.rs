//! Dialog Stack - modal subtrees and input focus
//!
//! Works like a focus trap stack: pushing a dialog hides the previous one and
//! makes the new one the input target; popping restores exactly the dialog
//! that was active before the matching push.
//!
//! When a root window exists, dialogs are children of its AllDialogs
//! container and only the top one is visible.
//!
//! # Example
//!
//! ```ignore
//! gui.dialog_push(dlg)?;
//! let op = menu_loop(&mut gui, &mut term, menu)?;
//! let dlg = gui.dialog_pop()?;
//! gui.window_free(dlg);
//! ```

use tracing::debug;

use crate::Gui;
use crate::error::{GuiError, GuiResult};
use crate::notify::{Event, HubId, WindowEvent};
use crate::types::{WindowActions, WindowId};

#[derive(Debug, Default)]
pub struct DialogStack {
    stack: Vec<WindowId>,
}

impl DialogStack {
    pub fn top(&self) -> Option<WindowId> {
        self.stack.last().copied()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn contains(&self, win: WindowId) -> bool {
        self.stack.contains(&win)
    }

    /// Bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = WindowId> + '_ {
        self.stack.iter().copied()
    }

    /// Drop a dialog that is being freed without a pop.
    pub(crate) fn forget(&mut self, win: WindowId) {
        self.stack.retain(|&w| w != win);
    }
}

impl Gui {
    pub fn dialogs(&self) -> &DialogStack {
        &self.dialogs
    }

    /// The active dialog.
    pub fn focused_dialog(&self) -> Option<WindowId> {
        self.dialogs.top()
    }

    /// Make `dlg` the active dialog.
    pub fn dialog_push(&mut self, dlg: WindowId) -> GuiResult<()> {
        if !self.windows.contains_key(dlg) {
            return Err(GuiError::StaleWindow(dlg));
        }
        let previous = self.dialogs.top();

        if let Some(container) = self.all_dialogs {
            self.add_child(container, dlg)?;
            self.window_or_err(container)?.focus = Some(dlg);
            self.add_actions(container, WindowActions::REFLOW);
        }
        if let Some(prev) = previous {
            self.set_visible(prev, false)?;
        }
        self.set_visible(dlg, true)?;
        self.dialogs.stack.push(dlg);

        debug!(?dlg, depth = self.dialogs.len(), "dialog push");
        self.notify_send(HubId::Window(dlg), Event::window(WindowEvent::Focus, dlg));
        Ok(())
    }

    /// Deactivate the top dialog and hand it back to the caller to free.
    pub fn dialog_pop(&mut self) -> GuiResult<WindowId> {
        let dlg = self.dialogs.stack.pop().ok_or(GuiError::NoDialog)?;
        let next = self.dialogs.top();

        self.set_visible(dlg, false)?;
        if let Some(container) = self.all_dialogs {
            self.detach(dlg)?;
            self.window_or_err(container)?.focus = next;
            self.add_actions(container, WindowActions::REFLOW);
        }
        if let Some(next) = next {
            self.set_visible(next, true)?;
        }

        debug!(?dlg, depth = self.dialogs.len(), "dialog pop");
        if let Some(container) = self.all_dialogs {
            let focus = next.unwrap_or(container);
            self.notify_send(HubId::Window(container), Event::window(WindowEvent::Focus, focus));
        }
        Ok(dlg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Orient, Sizing, WindowType};

    fn setup() -> Gui {
        Gui::new()
    }

    fn dialog(gui: &mut Gui) -> WindowId {
        gui.window_new(WindowType::DlgPattern, Orient::Vertical, Sizing::Maximise, Sizing::Maximise)
    }

    #[test]
    fn test_pop_empty_fails() {
        let mut gui = setup();
        assert!(matches!(gui.dialog_pop(), Err(GuiError::NoDialog)));
    }

    #[test]
    fn test_push_hides_previous() {
        let mut gui = setup();
        let a = dialog(&mut gui);
        let b = dialog(&mut gui);
        gui.dialog_push(a).unwrap();
        gui.dialog_push(b).unwrap();

        assert_eq!(gui.focused_dialog(), Some(b));
        assert!(!gui.window(a).unwrap().state().visible);
        assert!(gui.window(b).unwrap().state().visible);
    }

    #[test]
    fn test_nested_pop_restores_in_order() {
        let mut gui = setup();
        let dialogs: Vec<_> = (0..4).map(|_| dialog(&mut gui)).collect();
        for &d in &dialogs {
            gui.dialog_push(d).unwrap();
        }
        for i in (0..4).rev() {
            let popped = gui.dialog_pop().unwrap();
            assert_eq!(popped, dialogs[i]);
            let expected = i.checked_sub(1).map(|j| dialogs[j]);
            assert_eq!(gui.focused_dialog(), expected);
            if let Some(e) = expected {
                assert!(gui.window(e).unwrap().state().visible);
            }
            gui.window_free(popped);
        }
        assert!(gui.dialogs().is_empty());
    }

    #[test]
    fn test_free_forgets_stacked_dialog() {
        let mut gui = setup();
        let a = dialog(&mut gui);
        gui.dialog_push(a).unwrap();
        gui.window_free(a);
        assert_eq!(gui.focused_dialog(), None);
    }

    #[test]
    fn test_push_stale_fails() {
        let mut gui = setup();
        let a = dialog(&mut gui);
        gui.window_free(a);
        assert!(matches!(gui.dialog_push(a), Err(GuiError::StaleWindow(_))));
    }
}
