//! Taffy Bridge - lays out a window subtree with flexbox
//!
//! 1. Converts window sizing policies → Taffy styles
//! 2. Builds a Taffy tree from the visible part of the subtree
//! 3. Computes layout inside the reflow root's current rectangle
//! 4. Writes absolute geometry back and notifies windows that changed
//!
//! Policy mapping (main axis is the parent's orientation):
//!
//! | Sizing       | main axis                  | cross axis |
//! |--------------|----------------------------|------------|
//! | `Fixed(n)`   | `n` cells, no shrink       | `n` cells  |
//! | `Maximise`   | grow 1, basis 0            | stretch    |
//! | `Unlimited`  | content size               | stretch    |

use taffy::{AvailableSpace, Dimension, Display, FlexDirection, NodeId, Size, Style, TaffyTree};
use tracing::debug;

use crate::Gui;
use crate::engine::Window;
use crate::error::{GuiError, GuiResult};
use crate::notify::{Event, HubId, WindowEvent};
use crate::types::{Orient, Sizing, WindowActions, WindowId, WindowState};

fn layout_err(err: impl std::fmt::Display) -> GuiError {
    GuiError::Layout(err.to_string())
}

fn direction(orient: Orient) -> FlexDirection {
    match orient {
        Orient::Vertical => FlexDirection::Column,
        Orient::Horizontal => FlexDirection::Row,
    }
}

fn dimension(sizing: Sizing) -> Dimension {
    match sizing {
        Sizing::Fixed(n) => Dimension::Length(n as f32),
        Sizing::Maximise | Sizing::Unlimited => Dimension::Auto,
    }
}

/// Style for a window laid out inside a parent with `parent_orient`.
fn child_style(w: &Window, parent_orient: Orient) -> Style {
    let main = match parent_orient {
        Orient::Vertical => w.height,
        Orient::Horizontal => w.width,
    };
    let mut style = Style {
        display: Display::Flex,
        flex_direction: direction(w.orient),
        size: Size {
            width: dimension(w.width),
            height: dimension(w.height),
        },
        ..Default::default()
    };
    match main {
        Sizing::Maximise => {
            style.flex_grow = 1.0;
            style.flex_basis = Dimension::Length(0.0);
        }
        Sizing::Fixed(_) => style.flex_shrink = 0.0,
        Sizing::Unlimited => {}
    }
    style
}

/// The reflow root keeps its current rectangle.
fn root_style(w: &Window) -> Style {
    Style {
        display: Display::Flex,
        flex_direction: direction(w.orient),
        size: Size {
            width: Dimension::Length(w.state.cols as f32),
            height: Dimension::Length(w.state.rows as f32),
        },
        ..Default::default()
    }
}

impl Gui {
    fn build_layout_node(
        &self,
        tree: &mut TaffyTree<()>,
        win: WindowId,
        style: Style,
        placed: &mut Vec<(WindowId, NodeId, Option<WindowId>)>,
        parent: Option<WindowId>,
    ) -> GuiResult<NodeId> {
        let w = self.windows.get(win).ok_or(GuiError::StaleWindow(win))?;
        let node = tree.new_leaf(style).map_err(layout_err)?;
        placed.push((win, node, parent));

        for &child in &w.children {
            let Some(c) = self.windows.get(child) else {
                continue;
            };
            if !c.state.visible {
                continue;
            }
            let child_node =
                self.build_layout_node(tree, child, child_style(c, w.orient), placed, Some(win))?;
            tree.add_child(node, child_node).map_err(layout_err)?;
        }
        Ok(node)
    }

    /// Lay out `win`'s subtree within `win`'s current rectangle.
    ///
    /// Windows whose geometry or effective visibility changed get
    /// RECALC|REPAINT and a `Window{State}` notification. REFLOW is cleared
    /// across the subtree.
    pub fn window_reflow(&mut self, win: WindowId) -> GuiResult<()> {
        let root = self.windows.get(win).ok_or(GuiError::StaleWindow(win))?;
        let origin = root.state;

        let mut tree: TaffyTree<()> = TaffyTree::new();
        let mut placed = Vec::new();
        let root_node = self.build_layout_node(&mut tree, win, root_style(root), &mut placed, None)?;

        let available = Size {
            width: AvailableSpace::Definite(origin.cols as f32),
            height: AvailableSpace::Definite(origin.rows as f32),
        };
        tree.compute_layout(root_node, available).map_err(layout_err)?;

        // `placed` is pre-order, so parents are written before children.
        for &(id, node, parent) in &placed {
            let layout = tree.layout(node).map_err(layout_err)?;
            let (base_col, base_row) = match parent {
                Some(p) => self
                    .windows
                    .get(p)
                    .map_or((0, 0), |pw| (pw.state.col_offset, pw.state.row_offset)),
                None => (origin.col_offset, origin.row_offset),
            };
            let (x, y) = if parent.is_some() {
                (layout.location.x.round() as u16, layout.location.y.round() as u16)
            } else {
                (0, 0)
            };
            let cols = layout.size.width.round() as u16;
            let rows = layout.size.height.round() as u16;
            if let Some(w) = self.windows.get_mut(id) {
                w.state.col_offset = base_col + x;
                w.state.row_offset = base_row + y;
                w.state.cols = cols;
                w.state.rows = rows;
            }
        }

        self.reflow_notify(win);
        Ok(())
    }

    /// Compare against the last notified state and publish changes.
    fn reflow_notify(&mut self, win: WindowId) {
        let mut changed = Vec::new();
        for id in self.descendants(win) {
            let visible = self.is_visible(id);
            let Some(w) = self.windows.get_mut(id) else {
                continue;
            };
            w.actions.remove(WindowActions::REFLOW);
            let now = WindowState { visible, ..w.state };
            if now != w.old_state {
                w.old_state = now;
                w.actions |= WindowActions::RECALC_REPAINT;
                changed.push(id);
            }
        }

        debug!(?win, changed = changed.len(), "reflow");
        for id in changed {
            self.notify_send(HubId::Window(id), Event::window(WindowEvent::State, id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::WindowBuilder;
    use crate::types::WindowType;

    fn setup(cols: u16, rows: u16, orient: Orient) -> (Gui, WindowId) {
        let mut gui = Gui::new();
        let root = WindowBuilder::new(WindowType::Root)
            .orient(orient)
            .width(Sizing::Fixed(cols))
            .height(Sizing::Fixed(rows))
            .build(&mut gui);
        (gui, root)
    }

    fn add(gui: &mut Gui, parent: WindowId, width: Sizing, height: Sizing) -> WindowId {
        let win = gui.window_new(WindowType::Container, Orient::Vertical, width, height);
        gui.add_child(parent, win).unwrap();
        win
    }

    fn state(gui: &Gui, win: WindowId) -> WindowState {
        gui.window(win).unwrap().state()
    }

    #[test]
    fn test_fixed_bars_and_maximised_body() {
        let (mut gui, root) = setup(80, 24, Orient::Vertical);
        let top = add(&mut gui, root, Sizing::Unlimited, Sizing::Fixed(1));
        let body = add(&mut gui, root, Sizing::Maximise, Sizing::Maximise);
        let bottom = add(&mut gui, root, Sizing::Unlimited, Sizing::Fixed(1));

        gui.window_reflow(root).unwrap();

        assert_eq!((state(&gui, top).rows, state(&gui, top).cols), (1, 80));
        assert_eq!(state(&gui, body).rows, 22);
        assert_eq!(state(&gui, body).row_offset, 1);
        assert_eq!(state(&gui, bottom).row_offset, 23);
    }

    #[test]
    fn test_offsets_are_absolute() {
        let (mut gui, root) = setup(40, 10, Orient::Vertical);
        add(&mut gui, root, Sizing::Unlimited, Sizing::Fixed(2));
        let panel = add(&mut gui, root, Sizing::Maximise, Sizing::Maximise);
        add(&mut gui, panel, Sizing::Unlimited, Sizing::Fixed(3));
        let inner = add(&mut gui, panel, Sizing::Maximise, Sizing::Maximise);

        gui.window_reflow(root).unwrap();
        assert_eq!(state(&gui, inner).row_offset, 5);
        assert_eq!(state(&gui, inner).rows, 5);
    }

    #[test]
    fn test_horizontal_split() {
        let (mut gui, root) = setup(30, 5, Orient::Horizontal);
        let side = add(&mut gui, root, Sizing::Fixed(10), Sizing::Maximise);
        let main = add(&mut gui, root, Sizing::Maximise, Sizing::Maximise);

        gui.window_reflow(root).unwrap();
        assert_eq!(state(&gui, side).cols, 10);
        assert_eq!(state(&gui, side).rows, 5);
        assert_eq!(state(&gui, main).col_offset, 10);
        assert_eq!(state(&gui, main).cols, 20);
    }

    #[test]
    fn test_hidden_child_takes_no_space() {
        let (mut gui, root) = setup(20, 10, Orient::Vertical);
        let bar = add(&mut gui, root, Sizing::Unlimited, Sizing::Fixed(1));
        let body = add(&mut gui, root, Sizing::Maximise, Sizing::Maximise);
        gui.set_visible(bar, false).unwrap();

        gui.window_reflow(root).unwrap();
        assert_eq!(state(&gui, body).rows, 10);
        assert_eq!(state(&gui, body).row_offset, 0);
    }

    #[test]
    fn test_reflow_flags_only_changed_windows() {
        let (mut gui, root) = setup(20, 10, Orient::Vertical);
        let body = add(&mut gui, root, Sizing::Maximise, Sizing::Maximise);
        gui.window_reflow(root).unwrap();
        assert!(gui.window(body).unwrap().actions().contains(WindowActions::RECALC_REPAINT));

        gui.window_mut(body).unwrap().actions = WindowActions::empty();
        gui.add_actions(root, WindowActions::REFLOW);
        gui.window_reflow(root).unwrap();
        assert!(gui.window(body).unwrap().actions().is_empty());
        assert!(!gui.window(root).unwrap().actions().contains(WindowActions::REFLOW));
    }
}
