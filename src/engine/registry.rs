//! Window Registry - tree structure, lookup and destruction
//!
//! Windows live in the [`Gui`] arena and refer to each other by
//! [`WindowId`]. Parents own their children: freeing a window frees its
//! whole subtree, children first.
//!
//! # Destruction order
//!
//! For every window in the subtree, deepest first:
//!
//! 1. detached from its parent (a parent focus pointing at it is cleared)
//! 2. payload `free`
//! 3. `Window{Delete}` published on its own hub
//! 4. every observer registered on its behalf is purged from every hub
//! 5. hub and node dropped

use tracing::debug;

use crate::Gui;
use crate::engine::window::Window;
use crate::error::{GuiError, GuiResult};
use crate::notify::{Event, HubId, WindowEvent};
use crate::types::{WindowActions, WindowId, WindowType};

impl Gui {
    pub fn window(&self, win: WindowId) -> Option<&Window> {
        self.windows.get(win)
    }

    pub fn window_mut(&mut self, win: WindowId) -> Option<&mut Window> {
        self.windows.get_mut(win)
    }

    pub(crate) fn window_or_err(&mut self, win: WindowId) -> GuiResult<&mut Window> {
        self.windows.get_mut(win).ok_or(GuiError::StaleWindow(win))
    }

    /// Number of live windows.
    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// Append `child` to `parent`'s children.
    pub fn add_child(&mut self, parent: WindowId, child: WindowId) -> GuiResult<()> {
        let len = self
            .windows
            .get(parent)
            .ok_or(GuiError::StaleWindow(parent))?
            .children
            .len();
        self.insert_child(parent, len, child)
    }

    /// Insert `child` at `pos` (clamped) among `parent`'s children.
    ///
    /// A child that already has a parent is moved.
    pub fn insert_child(&mut self, parent: WindowId, pos: usize, child: WindowId) -> GuiResult<()> {
        if !self.windows.contains_key(parent) {
            return Err(GuiError::StaleWindow(parent));
        }
        if !self.windows.contains_key(child) {
            return Err(GuiError::StaleWindow(child));
        }
        self.detach(child)?;

        let p = self.window_or_err(parent)?;
        let pos = pos.min(p.children.len());
        p.children.insert(pos, child);

        let c = self.window_or_err(child)?;
        c.parent = Some(parent);
        c.notify.set_parent(Some(HubId::Window(parent)));
        Ok(())
    }

    /// Remove `child` from its parent. The window itself stays alive.
    pub fn detach(&mut self, child: WindowId) -> GuiResult<()> {
        let c = self.window_or_err(child)?;
        let Some(parent) = c.parent.take() else {
            return Ok(());
        };
        c.notify.set_parent(None);

        if let Some(p) = self.windows.get_mut(parent) {
            p.children.retain(|&w| w != child);
            if p.focus == Some(child) {
                p.focus = None;
            }
        }
        Ok(())
    }

    /// Move `child` to position `pos` within its current parent.
    pub fn move_child(&mut self, child: WindowId, pos: usize) -> GuiResult<()> {
        let parent = self
            .windows
            .get(child)
            .ok_or(GuiError::StaleWindow(child))?
            .parent;
        match parent {
            Some(parent) => self.insert_child(parent, pos, child),
            None => Ok(()),
        }
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// The subtree rooted at `win`, in depth-first pre-order.
    pub fn descendants(&self, win: WindowId) -> Vec<WindowId> {
        let mut out = Vec::new();
        let mut stack = vec![win];
        while let Some(id) = stack.pop() {
            let Some(w) = self.windows.get(id) else {
                continue;
            };
            out.push(id);
            stack.extend(w.children.iter().rev().copied());
        }
        out
    }

    /// First window of type `kind` in `subtree`, depth-first pre-order,
    /// `subtree` itself included.
    pub fn window_find(&self, subtree: WindowId, kind: WindowType) -> Option<WindowId> {
        self.descendants(subtree)
            .into_iter()
            .find(|&id| self.windows.get(id).is_some_and(|w| w.kind == kind))
    }

    /// The window and all its ancestors are visible.
    pub fn is_visible(&self, win: WindowId) -> bool {
        let mut current = Some(win);
        while let Some(id) = current {
            let Some(w) = self.windows.get(id) else {
                return false;
            };
            if !w.state.visible {
                return false;
            }
            current = w.parent;
        }
        true
    }

    /// Dialog containing `win` (or `win` itself).
    pub fn dialog_find(&self, win: WindowId) -> Option<WindowId> {
        let mut current = Some(win);
        while let Some(id) = current {
            let w = self.windows.get(id)?;
            let parent_is_container = w
                .parent
                .and_then(|p| self.windows.get(p))
                .is_some_and(|p| p.kind == WindowType::AllDialogs);
            if w.kind.is_dialog() || parent_is_container {
                return Some(id);
            }
            current = w.parent;
        }
        None
    }

    // =========================================================================
    // Flags
    // =========================================================================

    /// Request work on `win`. Returns false if the window is gone.
    pub fn add_actions(&mut self, win: WindowId, actions: WindowActions) -> bool {
        match self.windows.get_mut(win) {
            Some(w) => {
                w.actions |= actions;
                true
            }
            None => false,
        }
    }

    pub fn set_visible(&mut self, win: WindowId, visible: bool) -> GuiResult<()> {
        self.window_or_err(win)?.state.visible = visible;
        Ok(())
    }

    // =========================================================================
    // Destruction
    // =========================================================================

    /// Destroy `win` and its subtree. A stale id is ignored.
    pub fn window_free(&mut self, win: WindowId) {
        let Some(w) = self.windows.get(win) else {
            return;
        };
        let children = w.children.clone();
        for child in children {
            self.window_free(child);
        }

        // Parent still alive: keep its child list and focus consistent.
        let _ = self.detach(win);

        let kind = self.windows.get(win).map(|w| w.kind);
        if let Some(data) = self.windows.get_mut(win).and_then(|w| w.wdata.take()) {
            data.free();
        }

        self.notify_send(HubId::Window(win), Event::window(WindowEvent::Delete, win));

        let purged = self.purge_observers(win);
        self.observers.forget_hub(HubId::Window(win));
        self.dialogs.forget(win);
        if self.root == Some(win) {
            self.root = None;
        }
        if self.all_dialogs == Some(win) {
            self.all_dialogs = None;
        }

        self.windows.remove(win);
        debug!(?win, kind = kind.map(WindowType::name), purged, "window freed");
    }
}
