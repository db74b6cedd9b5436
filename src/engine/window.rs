//! Window - a node of the window tree
//!
//! A window owns its children (by id), its hub and its payload. The payload
//! is whatever the window displays: a menu, a bar title, a dialog's shared
//! data. Its `free` runs exactly once, when the window is destroyed.

use std::any::Any;
use std::fmt;

use crate::Gui;
use crate::error::GuiResult;
use crate::notify::Hub;
use crate::state::keymap::HelpEntry;
use crate::types::{Orient, Sizing, WindowActions, WindowId, WindowState, WindowType};

/// Per-window recalc/repaint hook.
pub type WindowFn = fn(&mut Gui, WindowId) -> GuiResult<()>;

/// Payload attached to a window.
pub trait WindowData: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Release resources. Called once when the owning window is freed.
    fn free(self: Box<Self>) {}
}

pub struct Window {
    pub(crate) kind: WindowType,
    pub(crate) orient: Orient,
    pub(crate) width: Sizing,
    pub(crate) height: Sizing,
    pub(crate) state: WindowState,
    pub(crate) old_state: WindowState,
    pub(crate) actions: WindowActions,
    pub(crate) parent: Option<WindowId>,
    pub(crate) children: Vec<WindowId>,
    pub(crate) focus: Option<WindowId>,
    pub(crate) notify: Hub,
    pub(crate) wdata: Option<Box<dyn WindowData>>,
    pub(crate) recalc: Option<WindowFn>,
    pub(crate) repaint: Option<WindowFn>,
    pub(crate) help: &'static [HelpEntry],
}

impl Window {
    fn new(kind: WindowType, orient: Orient, width: Sizing, height: Sizing) -> Self {
        let mut state = WindowState::default();
        if let Sizing::Fixed(n) = width {
            state.cols = n;
        }
        if let Sizing::Fixed(n) = height {
            state.rows = n;
        }
        Self {
            kind,
            orient,
            width,
            height,
            state,
            old_state: WindowState::default(),
            actions: WindowActions::empty(),
            parent: None,
            children: Vec::new(),
            focus: None,
            notify: Hub::default(),
            wdata: None,
            recalc: None,
            repaint: None,
            help: &[],
        }
    }

    pub fn kind(&self) -> WindowType {
        self.kind
    }

    pub fn orient(&self) -> Orient {
        self.orient
    }

    pub fn width(&self) -> Sizing {
        self.width
    }

    pub fn height(&self) -> Sizing {
        self.height
    }

    pub fn state(&self) -> WindowState {
        self.state
    }

    pub fn actions(&self) -> WindowActions {
        self.actions
    }

    pub fn parent(&self) -> Option<WindowId> {
        self.parent
    }

    pub fn children(&self) -> &[WindowId] {
        &self.children
    }

    pub fn focus(&self) -> Option<WindowId> {
        self.focus
    }

    pub fn help(&self) -> &'static [HelpEntry] {
        self.help
    }

    pub fn data<T: WindowData>(&self) -> Option<&T> {
        self.wdata.as_ref()?.as_any().downcast_ref::<T>()
    }

    pub fn data_mut<T: WindowData>(&mut self) -> Option<&mut T> {
        self.wdata.as_mut()?.as_any_mut().downcast_mut::<T>()
    }
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("kind", &self.kind)
            .field("state", &self.state)
            .field("actions", &self.actions)
            .field("children", &self.children.len())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Creates a detached window.
///
/// ```ignore
/// let win = WindowBuilder::new(WindowType::StatusBar)
///     .height(Sizing::Fixed(1))
///     .build(&mut gui);
/// ```
#[must_use]
pub struct WindowBuilder {
    window: Window,
}

impl WindowBuilder {
    pub fn new(kind: WindowType) -> Self {
        Self {
            window: Window::new(kind, Orient::Vertical, Sizing::Unlimited, Sizing::Unlimited),
        }
    }

    pub fn orient(mut self, orient: Orient) -> Self {
        self.window.orient = orient;
        self
    }

    pub fn width(mut self, width: Sizing) -> Self {
        self.window.width = width;
        if let Sizing::Fixed(n) = width {
            self.window.state.cols = n;
        }
        self
    }

    pub fn height(mut self, height: Sizing) -> Self {
        self.window.height = height;
        if let Sizing::Fixed(n) = height {
            self.window.state.rows = n;
        }
        self
    }

    pub fn data(mut self, data: impl WindowData) -> Self {
        self.window.wdata = Some(Box::new(data));
        self
    }

    pub fn recalc(mut self, f: WindowFn) -> Self {
        self.window.recalc = Some(f);
        self
    }

    pub fn repaint(mut self, f: WindowFn) -> Self {
        self.window.repaint = Some(f);
        self
    }

    pub fn help(mut self, help: &'static [HelpEntry]) -> Self {
        self.window.help = help;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.window.state.visible = false;
        self
    }

    pub fn build(self, gui: &mut Gui) -> WindowId {
        let kind = self.window.kind;
        let id = gui.windows.insert(self.window);
        tracing::trace!(?id, kind = kind.name(), "window created");
        id
    }
}

impl Gui {
    /// Create a detached window with the given layout policy.
    pub fn window_new(
        &mut self,
        kind: WindowType,
        orient: Orient,
        width: Sizing,
        height: Sizing,
    ) -> WindowId {
        WindowBuilder::new(kind)
            .orient(orient)
            .width(width)
            .height(height)
            .build(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Title(&'static str);

    impl WindowData for Title {
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn test_builder_applies_fixed_sizes() {
        let mut gui = Gui::new();
        let win = WindowBuilder::new(WindowType::StatusBar)
            .width(Sizing::Fixed(40))
            .height(Sizing::Fixed(1))
            .build(&mut gui);
        let w = gui.window(win).unwrap();
        assert_eq!(w.state().cols, 40);
        assert_eq!(w.state().rows, 1);
        assert_eq!(w.kind(), WindowType::StatusBar);
        assert!(w.actions().is_empty());
        assert!(w.parent().is_none());
    }

    #[test]
    fn test_payload_downcast() {
        let mut gui = Gui::new();
        let win = WindowBuilder::new(WindowType::StatusBar)
            .data(Title("hello"))
            .build(&mut gui);
        let w = gui.window(win).unwrap();
        assert_eq!(w.data::<Title>().map(|t| t.0), Some("hello"));
    }
}
