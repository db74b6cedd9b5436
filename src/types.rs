//! Core types for panekit
//!
//! Window identity, geometry, sizing policy and the dirty flags that drive
//! the redraw pipeline. Everything here is plain data.

use slotmap::new_key_type;

new_key_type! {
    /// Handle to a window in the [`Gui`](crate::Gui) arena.
    ///
    /// Generational: a handle to a freed window never resolves to a newer one.
    pub struct WindowId;
}

// =============================================================================
// WindowType
// =============================================================================

/// What a window is for. Used by `find` and by observers to locate siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowType {
    /// Parent of every other window, sized to the terminal.
    Root,
    /// One-line summary of the active dialog's key bindings.
    HelpBar,
    /// Container holding the dialog stack.
    AllDialogs,
    /// One-line message/error area.
    Message,
    /// Simple one-line title bar.
    StatusBar,
    /// Status line of the compose dialog.
    ComposeBar,
    /// Window bound to a [`Menu`](crate::menu::Menu).
    Menu,
    /// Plain grouping container.
    Container,
    /// Compose dialog.
    DlgCompose,
    /// Pattern helper dialog.
    DlgPattern,
    /// Pager dialog.
    DlgDoPager,
}

impl WindowType {
    /// True for the roots of modal dialogs.
    pub fn is_dialog(self) -> bool {
        matches!(
            self,
            WindowType::DlgCompose | WindowType::DlgPattern | WindowType::DlgDoPager
        )
    }

    /// Short lowercase name, used in log output.
    pub fn name(self) -> &'static str {
        match self {
            WindowType::Root => "root",
            WindowType::HelpBar => "helpbar",
            WindowType::AllDialogs => "all-dialogs",
            WindowType::Message => "message",
            WindowType::StatusBar => "status-bar",
            WindowType::ComposeBar => "compose-bar",
            WindowType::Menu => "menu",
            WindowType::Container => "container",
            WindowType::DlgCompose => "dlg-compose",
            WindowType::DlgPattern => "dlg-pattern",
            WindowType::DlgDoPager => "dlg-pager",
        }
    }
}

// =============================================================================
// Orientation & sizing
// =============================================================================

/// Axis along which a window lays out its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orient {
    /// Children stacked top to bottom.
    #[default]
    Vertical,
    /// Children placed left to right.
    Horizontal,
}

/// Sizing policy for one axis of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sizing {
    /// Exactly this many cells.
    Fixed(u16),
    /// Take all remaining space, shared with other maximised siblings.
    Maximise,
    /// Size from content; stretches across the parent's cross axis.
    #[default]
    Unlimited,
}

// =============================================================================
// WindowState
// =============================================================================

/// Position and visibility of a window, in absolute screen cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowState {
    pub visible: bool,
    pub cols: u16,
    pub rows: u16,
    pub col_offset: u16,
    pub row_offset: u16,
}

impl Default for WindowState {
    fn default() -> Self {
        Self {
            visible: true,
            cols: 0,
            rows: 0,
            col_offset: 0,
            row_offset: 0,
        }
    }
}

impl WindowState {
    /// Geometry differs (ignores visibility).
    pub fn moved_or_resized(&self, other: &WindowState) -> bool {
        self.cols != other.cols
            || self.rows != other.rows
            || self.col_offset != other.col_offset
            || self.row_offset != other.row_offset
    }
}

bitflags::bitflags! {
    /// Pending work for a window.
    ///
    /// Set by observers and operations, consumed by the redraw pass.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct WindowActions: u8 {
        /// Recompute derived data.
        const RECALC = 1 << 0;
        /// Paint onto the screen buffer.
        const REPAINT = 1 << 1;
        /// Lay out this window and its children again.
        const REFLOW = 1 << 2;
        const RECALC_REPAINT = Self::RECALC.bits() | Self::REPAINT.bits();
    }
}

bitflags::bitflags! {
    /// Text attributes of a screen cell.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Attr: u8 {
        const NONE = 0;
        const BOLD = 1 << 0;
        const UNDERLINE = 1 << 1;
        const REVERSE = 1 << 2;
    }
}

// =============================================================================
// Cell - The atomic unit of the screen buffer
// =============================================================================

/// A single terminal cell.
///
/// The second half of a double-width character is stored as `'\0'`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub attrs: Attr,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            attrs: Attr::NONE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialog_types() {
        assert!(WindowType::DlgCompose.is_dialog());
        assert!(WindowType::DlgDoPager.is_dialog());
        assert!(!WindowType::Menu.is_dialog());
        assert!(!WindowType::AllDialogs.is_dialog());
    }

    #[test]
    fn test_recalc_repaint_combines() {
        let both = WindowActions::RECALC_REPAINT;
        assert!(both.contains(WindowActions::RECALC));
        assert!(both.contains(WindowActions::REPAINT));
        assert!(!both.contains(WindowActions::REFLOW));
    }

    #[test]
    fn test_state_change_ignores_visibility() {
        let a = WindowState::default();
        let b = WindowState { visible: false, ..a };
        assert!(!a.moved_or_resized(&b));
        let c = WindowState { rows: 3, ..a };
        assert!(a.moved_or_resized(&c));
    }
}
