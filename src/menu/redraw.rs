//! Menu redraw intents
//!
//! Posted by menu operations and observers, consumed by the menu window's
//! repaint. The strongest pending intent decides how much is painted.

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct MenuRedraw: u8 {
        /// Every visible row.
        const INDEX = 1 << 0;
        /// Selection moved: old and new selected rows.
        const MOTION = 1 << 1;
        /// The selected row only.
        const CURRENT = 1 << 2;
        /// The dialog around the menu must be laid out again first.
        const FLOW = 1 << 3;
    }
}

/// What the repaint of a menu window will draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepaintPlan {
    Full,
    Motion,
    Current,
    Nothing,
}

impl From<MenuRedraw> for RepaintPlan {
    fn from(redraw: MenuRedraw) -> Self {
        if redraw.contains(MenuRedraw::INDEX) {
            RepaintPlan::Full
        } else if redraw.contains(MenuRedraw::MOTION) {
            RepaintPlan::Motion
        } else if redraw.contains(MenuRedraw::CURRENT) {
            RepaintPlan::Current
        } else {
            RepaintPlan::Nothing
        }
    }
}
