//! Menu behaviour - what a particular screen puts in a menu
//!
//! The menu handles selection, scrolling and tagging; a behaviour renders
//! rows, decides what tagging means for its items and owns the item data.

use std::any::Any;

use crate::config::ConfigSet;

/// Requested tag change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagAction {
    Toggle,
    Set(bool),
}

impl TagAction {
    /// Tag state after applying this action to `tagged`.
    pub fn apply(self, tagged: bool) -> bool {
        match self {
            TagAction::Toggle => !tagged,
            TagAction::Set(b) => b,
        }
    }
}

/// Everything a row renderer may look at besides its own data.
#[derive(Debug, Clone, Copy)]
pub struct RowContext<'a> {
    pub config: &'a ConfigSet,
    /// Menu's tag state for the item.
    pub tagged: bool,
    /// Cells available for the row.
    pub width: usize,
}

pub trait MenuBehavior: Any {
    /// Append the text for real item `item` to `buf`.
    fn render_row(&self, item: usize, ctx: &RowContext<'_>, buf: &mut String);

    /// Change the tag state of `item`. Only the sign of the result is read:
    /// positive asks for the item to be tagged, negative for it to be
    /// untagged, zero leaves it alone. The menu works out the change in its
    /// tag count itself.
    fn tag(&mut self, _item: usize, action: TagAction, tagged: bool) -> i32 {
        i32::from(action.apply(tagged)) - i32::from(tagged)
    }

    /// Release item data. Called once when the menu window is freed.
    fn free(self: Box<Self>) {}

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_action_apply() {
        assert!(TagAction::Toggle.apply(false));
        assert!(!TagAction::Toggle.apply(true));
        assert!(TagAction::Set(true).apply(true));
        assert!(!TagAction::Set(false).apply(true));
    }
}
