//! Redraw Scheduler - one pass over a dirty window tree
//!
//! A pass is a small state machine:
//!
//! ```text
//! Flow → Reflow → Recalc → Repaint → Done
//! ```
//!
//! - **Flow**: menus that need new geometry mark their dialog for reflow
//! - **Reflow**: every topmost REFLOW window is laid out again
//! - **Recalc**: RECALC windows rebuild their content, which may request
//!   REPAINT
//! - **Repaint**: visible REPAINT windows draw into the screen buffer;
//!   hidden ones keep the request until they are shown
//!
//! Callback failures are logged and the pass carries on.

use tracing::{debug, warn};

use crate::Gui;
use crate::error::{GuiError, GuiResult};
use crate::menu::{Menu, MenuRedraw};
use crate::types::{WindowActions, WindowId};

/// Upper bound on recalc sweeps; a recalc may dirty a window visited
/// earlier in the same sweep.
const MAX_RECALC_SWEEPS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassStage {
    Flow,
    Reflow,
    Recalc,
    Repaint,
    Done,
}

/// A redraw pass over the subtree rooted at `root`.
#[derive(Debug)]
pub struct RedrawPass {
    root: WindowId,
    stage: PassStage,
}

impl RedrawPass {
    pub fn new(root: WindowId) -> Self {
        Self {
            root,
            stage: PassStage::Flow,
        }
    }

    pub fn stage(&self) -> PassStage {
        self.stage
    }

    /// Run the current stage and advance. Returns the new stage.
    pub fn step(&mut self, gui: &mut Gui) -> GuiResult<PassStage> {
        if !gui.windows.contains_key(self.root) {
            return Err(GuiError::StaleWindow(self.root));
        }
        self.stage = match self.stage {
            PassStage::Flow => {
                flow(gui, self.root);
                PassStage::Reflow
            }
            PassStage::Reflow => {
                reflow(gui, self.root);
                PassStage::Recalc
            }
            PassStage::Recalc => {
                recalc(gui, self.root);
                PassStage::Repaint
            }
            PassStage::Repaint => {
                repaint(gui, self.root);
                PassStage::Done
            }
            PassStage::Done => PassStage::Done,
        };
        Ok(self.stage)
    }

    /// Run the remaining stages.
    pub fn run(mut self, gui: &mut Gui) -> GuiResult<()> {
        while self.step(gui)? != PassStage::Done {}
        Ok(())
    }
}

impl Gui {
    /// Bring the screen buffer up to date.
    ///
    /// Redraws from the root window, or from the active dialog when no root
    /// window exists.
    pub fn redraw(&mut self) -> GuiResult<()> {
        let root = self
            .root
            .or_else(|| self.dialogs.top())
            .ok_or(GuiError::NoRoot)?;
        RedrawPass::new(root).run(self)
    }
}

// =============================================================================
// Stages
// =============================================================================

fn flow(gui: &mut Gui, root: WindowId) {
    for id in gui.descendants(root) {
        let Some(menu) = gui.windows.get_mut(id).and_then(|w| w.data_mut::<Menu>()) else {
            continue;
        };
        if !menu.redraw.contains(MenuRedraw::FLOW) {
            continue;
        }
        menu.redraw.remove(MenuRedraw::FLOW);
        menu.queue_redraw(MenuRedraw::INDEX);
        gui.add_actions(id, WindowActions::RECALC);

        let target = gui.dialog_find(id).unwrap_or(root);
        gui.add_actions(target, WindowActions::REFLOW);
        debug!(?id, ?target, "menu flow, request REFLOW");
    }
}

fn reflow(gui: &mut Gui, root: WindowId) {
    // Reflowing a window clears REFLOW in its subtree, so the first match in
    // pre-order is always topmost.
    while let Some(id) = gui
        .descendants(root)
        .into_iter()
        .find(|&id| has_action(gui, id, WindowActions::REFLOW))
    {
        if let Err(err) = gui.window_reflow(id) {
            warn!(?id, %err, "reflow failed");
            if let Some(w) = gui.windows.get_mut(id) {
                w.actions.remove(WindowActions::REFLOW);
            }
        }
    }
}

fn recalc(gui: &mut Gui, root: WindowId) {
    for _ in 0..MAX_RECALC_SWEEPS {
        let dirty: Vec<WindowId> = gui
            .descendants(root)
            .into_iter()
            .filter(|&id| has_action(gui, id, WindowActions::RECALC))
            .collect();
        if dirty.is_empty() {
            return;
        }
        for id in dirty {
            let Some(callback) = gui.windows.get(id).map(|w| w.recalc) else {
                continue;
            };
            if let Some(f) = callback {
                if let Err(err) = f(gui, id) {
                    warn!(?id, %err, "recalc failed");
                }
            }
            if let Some(w) = gui.windows.get_mut(id) {
                w.actions.remove(WindowActions::RECALC);
            }
        }
    }
}

fn repaint(gui: &mut Gui, root: WindowId) {
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        let Some(w) = gui.windows.get(id) else {
            continue;
        };
        if !w.state.visible {
            continue;
        }
        stack.extend(w.children.iter().rev().copied());
        if !w.actions.contains(WindowActions::REPAINT) {
            continue;
        }
        if let Some(f) = w.repaint {
            if let Err(err) = f(gui, id) {
                warn!(?id, %err, "repaint failed");
            }
        }
        if let Some(w) = gui.windows.get_mut(id) {
            w.actions.remove(WindowActions::REPAINT);
        }
    }
}

fn has_action(gui: &Gui, id: WindowId, action: WindowActions) -> bool {
    gui.windows.get(id).is_some_and(|w| w.actions.contains(action))
}
