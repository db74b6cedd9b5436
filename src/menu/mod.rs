//! Menu - scrollable, taggable list state
//!
//! Manages a virtual list:
//! - `max` addressable items, shown through a view (view index → real index)
//! - selection as a view index, `top` as the first visible view row
//! - a tag per real item and a running tag count
//! - redraw intents for the owning window
//!
//! Row text comes from a [`MenuBehavior`]; the window side lives in
//! [`window`].
//!
//! # Scrolling
//!
//! After every selection change, `scroll_window` keeps
//! `top <= selection <= top + page_len - 1` and `top <= len - page_len`.

pub mod behavior;
pub mod redraw;
pub mod window;

pub use behavior::{MenuBehavior, RowContext, TagAction};
pub use redraw::{MenuRedraw, RepaintPlan};

use std::any::Any;

use crate::engine::WindowData;
use crate::error::MenuError;

/// Which keymap applies to a menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuType {
    Generic,
    Compose,
    Pager,
}

pub struct Menu {
    kind: MenuType,
    max: usize,
    view: Vec<usize>,
    current: Option<usize>,
    top: usize,
    page_len: usize,
    tags: Vec<bool>,
    tag_count: usize,
    pub(crate) redraw: MenuRedraw,
    /// Selection as last painted; `None` before the first paint.
    pub(crate) painted_current: Option<usize>,
    behavior: Box<dyn MenuBehavior>,
}

impl std::fmt::Debug for Menu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Menu")
            .field("kind", &self.kind)
            .field("max", &self.max)
            .field("current", &self.current)
            .field("top", &self.top)
            .field("page_len", &self.page_len)
            .field("tag_count", &self.tag_count)
            .field("redraw", &self.redraw)
            .finish_non_exhaustive()
    }
}

impl Menu {
    pub fn new(kind: MenuType, behavior: impl MenuBehavior) -> Self {
        Self {
            kind,
            max: 0,
            view: Vec::new(),
            current: None,
            top: 0,
            page_len: 0,
            tags: Vec::new(),
            tag_count: 0,
            redraw: MenuRedraw::INDEX,
            painted_current: None,
            behavior: Box::new(behavior),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn kind(&self) -> MenuType {
        self.kind
    }

    pub fn max(&self) -> usize {
        self.max
    }

    /// Number of entries in the current view.
    pub fn len(&self) -> usize {
        self.view.len()
    }

    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }

    /// Selected view index.
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Real index of the selection.
    pub fn current_item(&self) -> Option<usize> {
        self.current.and_then(|c| self.view.get(c).copied())
    }

    pub fn top(&self) -> usize {
        self.top
    }

    pub fn page_len(&self) -> usize {
        self.page_len
    }

    pub fn view(&self) -> &[usize] {
        &self.view
    }

    pub fn real_index(&self, view_index: usize) -> Option<usize> {
        self.view.get(view_index).copied()
    }

    pub fn is_tagged(&self, item: usize) -> bool {
        self.tags.get(item).copied().unwrap_or(false)
    }

    pub fn tag_count(&self) -> usize {
        self.tag_count
    }

    pub fn redraw(&self) -> MenuRedraw {
        self.redraw
    }

    pub fn behavior(&self) -> &dyn MenuBehavior {
        self.behavior.as_ref()
    }

    pub fn behavior_mut(&mut self) -> &mut dyn MenuBehavior {
        self.behavior.as_mut()
    }

    /// Downcast the behaviour to the screen's concrete type.
    pub fn behavior_as<T: MenuBehavior>(&self) -> Option<&T> {
        self.behavior.as_any().downcast_ref::<T>()
    }

    pub fn behavior_as_mut<T: MenuBehavior>(&mut self) -> Option<&mut T> {
        self.behavior.as_any_mut().downcast_mut::<T>()
    }

    pub fn queue_redraw(&mut self, redraw: MenuRedraw) {
        self.redraw |= redraw;
    }

    // =========================================================================
    // Items and view
    // =========================================================================

    /// Replace the item count. The view becomes the identity mapping, tags
    /// beyond the new end are dropped and the selection is clamped.
    pub fn set_items(&mut self, max: usize) {
        self.max = max;
        self.view = (0..max).collect();
        self.tags.resize(max, false);
        self.tag_count = self.tags.iter().filter(|t| **t).count();
        self.current = match (max, self.current) {
            (0, _) => None,
            (_, Some(c)) => Some(c.min(max - 1)),
            (_, None) => Some(0),
        };
        self.queue_redraw(MenuRedraw::INDEX);
        self.scroll_window();
    }

    /// Show only `real_indices`, in that order.
    ///
    /// The previously selected item stays selected if it is still in view;
    /// otherwise the selection is clamped to the new view.
    pub fn set_view(&mut self, real_indices: Vec<usize>) -> Result<(), MenuError> {
        let mut seen = vec![false; self.max];
        for &idx in &real_indices {
            let slot = seen.get_mut(idx).ok_or(MenuError::RealIndexOutOfRange {
                index: idx,
                max: self.max,
            })?;
            if *slot {
                return Err(MenuError::DuplicateIndex(idx));
            }
            *slot = true;
        }

        let previous = self.current_item();
        let old_pos = self.current.unwrap_or(0);
        self.view = real_indices;

        self.current = if self.view.is_empty() {
            None
        } else if let Some(pos) = previous.and_then(|p| self.view.iter().position(|&r| r == p)) {
            Some(pos)
        } else {
            Some(old_pos.min(self.view.len() - 1))
        };

        self.queue_redraw(MenuRedraw::INDEX);
        self.scroll_window();
        Ok(())
    }

    /// Rows available in the owning window.
    pub fn set_page_len(&mut self, page_len: usize) {
        if self.page_len != page_len {
            self.page_len = page_len;
            self.queue_redraw(MenuRedraw::INDEX);
        }
        self.scroll_window();
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Move the selection by `delta`, wrapping around the ends if `wrap`,
    /// clamping otherwise. Returns whether the selection changed.
    pub fn move_selection(&mut self, delta: isize, wrap: bool) -> bool {
        self.queue_redraw(MenuRedraw::MOTION);
        let len = self.view.len();
        if len == 0 {
            self.current = None;
            return false;
        }

        let from = self.current.unwrap_or(0);
        let target = from as isize + delta;
        let to = if wrap {
            target.rem_euclid(len as isize) as usize
        } else {
            target.clamp(0, len as isize - 1) as usize
        };
        let changed = self.current != Some(to);
        self.current = Some(to);
        self.scroll_window();
        changed
    }

    /// Select view index `index`.
    pub fn set_index(&mut self, index: usize) -> Result<(), MenuError> {
        if index >= self.view.len() {
            return Err(MenuError::ViewIndexOutOfRange {
                index,
                len: self.view.len(),
            });
        }
        self.queue_redraw(MenuRedraw::MOTION);
        self.current = Some(index);
        self.scroll_window();
        Ok(())
    }

    pub fn first(&mut self) -> bool {
        let from = self.current.unwrap_or(0) as isize;
        self.move_selection(-from, false)
    }

    pub fn last(&mut self) -> bool {
        let from = self.current.unwrap_or(0) as isize;
        self.move_selection(self.view.len() as isize - 1 - from, false)
    }

    /// Scroll down a page, or select the last entry when already on the
    /// last page. Returns whether anything changed.
    pub fn next_page(&mut self) -> bool {
        let page = self.page_len.max(1);
        let len = self.view.len();
        let Some(current) = self.current else {
            return false;
        };
        if self.top + page < len {
            self.top = (self.top + page).min(len.saturating_sub(page));
            self.current = Some(current.max(self.top));
            self.queue_redraw(MenuRedraw::INDEX);
            true
        } else {
            self.move_selection(len as isize - 1 - current as isize, false)
        }
    }

    /// Scroll up a page, or select the first entry when already on the
    /// first page. Returns whether anything changed.
    pub fn prev_page(&mut self) -> bool {
        let page = self.page_len.max(1);
        let Some(current) = self.current else {
            return false;
        };
        if self.top > 0 {
            self.top = self.top.saturating_sub(page);
            self.current = Some(current.min(self.top + page - 1));
            self.queue_redraw(MenuRedraw::INDEX);
            true
        } else {
            self.move_selection(-(current as isize), false)
        }
    }

    /// Bring the selection into the visible page.
    pub fn scroll_window(&mut self) {
        let old_top = self.top;
        let len = self.view.len();
        let page = self.page_len.max(1);

        match self.current {
            None => self.top = 0,
            Some(sel) => {
                if sel < self.top {
                    self.top = sel;
                } else if sel >= self.top + page {
                    self.top = sel + 1 - page;
                }
                self.top = self.top.min(len.saturating_sub(page));
            }
        }

        if self.top != old_top {
            self.queue_redraw(MenuRedraw::INDEX);
        }
    }

    // =========================================================================
    // Tagging
    // =========================================================================

    /// Apply `action` to the item at `view_index`. Returns the change in the
    /// tag count.
    pub fn tag_entry(&mut self, view_index: usize, action: TagAction) -> Result<i32, MenuError> {
        let real = self.real_index(view_index).ok_or(MenuError::ViewIndexOutOfRange {
            index: view_index,
            len: self.view.len(),
        })?;
        let tagged = self.tags[real];
        let now = match self.behavior.tag(real, action, tagged).signum() {
            1 => true,
            -1 => false,
            _ => tagged,
        };
        self.tags[real] = now;

        let delta = i32::from(now) - i32::from(tagged);
        match delta {
            1 => self.tag_count += 1,
            -1 => self.tag_count -= 1,
            _ => {}
        }
        self.queue_redraw(MenuRedraw::INDEX);
        Ok(delta)
    }

    /// Real indices of tagged items, ascending.
    pub fn tagged_items(&self) -> Vec<usize> {
        self.tags
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.then_some(i))
            .collect()
    }

    /// Swap the tag state of two real items (follows an item reorder).
    pub fn swap_tags(&mut self, a: usize, b: usize) {
        if a < self.tags.len() && b < self.tags.len() {
            self.tags.swap(a, b);
        }
    }

    /// Remove real item `item`, shifting later tags down.
    pub fn remove_item(&mut self, item: usize) {
        if item < self.tags.len() {
            self.tags.remove(item);
            self.tags.push(false);
        }
        self.set_items(self.max.saturating_sub(1));
    }
}

impl WindowData for Menu {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn free(self: Box<Self>) {
        tracing::trace!(kind = ?self.kind, "menu freed");
        self.behavior.free();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Lines {
        freed: Rc<Cell<u32>>,
    }

    impl MenuBehavior for Lines {
        fn render_row(&self, item: usize, _ctx: &RowContext<'_>, buf: &mut String) {
            buf.push_str(&format!("line {item}"));
        }

        fn free(self: Box<Self>) {
            self.freed.set(self.freed.get() + 1);
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    /// Refuses to tag odd items.
    struct EvenOnly;

    impl MenuBehavior for EvenOnly {
        fn render_row(&self, _item: usize, _ctx: &RowContext<'_>, _buf: &mut String) {}

        fn tag(&mut self, item: usize, action: TagAction, tagged: bool) -> i32 {
            if item % 2 == 1 {
                return 0;
            }
            i32::from(action.apply(tagged)) - i32::from(tagged)
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    /// Answers with large magnitudes instead of unit steps.
    struct Loud;

    impl MenuBehavior for Loud {
        fn render_row(&self, _item: usize, _ctx: &RowContext<'_>, _buf: &mut String) {}

        fn tag(&mut self, _item: usize, action: TagAction, tagged: bool) -> i32 {
            if action.apply(tagged) { 7 } else { -7 }
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn setup(items: usize, page: usize) -> Menu {
        let mut menu = Menu::new(
            MenuType::Generic,
            Lines {
                freed: Rc::new(Cell::new(0)),
            },
        );
        menu.set_items(items);
        menu.set_page_len(page);
        menu.redraw = MenuRedraw::empty();
        menu
    }

    #[test]
    fn test_set_items_selects_first() {
        let menu = setup(5, 3);
        assert_eq!(menu.current(), Some(0));
        assert_eq!(menu.len(), 5);
        assert_eq!(menu.view(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_empty_menu_has_no_selection() {
        let mut menu = setup(0, 3);
        assert_eq!(menu.current(), None);
        assert!(!menu.move_selection(1, true));
        assert!(menu.redraw().contains(MenuRedraw::MOTION));
    }

    #[test]
    fn test_move_clamps_without_wrap() {
        let mut menu = setup(3, 10);
        assert!(!menu.move_selection(-1, false));
        assert_eq!(menu.current(), Some(0));
        menu.move_selection(10, false);
        assert_eq!(menu.current(), Some(2));
    }

    #[test]
    fn test_move_wraps() {
        let mut menu = setup(3, 10);
        menu.move_selection(-1, true);
        assert_eq!(menu.current(), Some(2));
        menu.move_selection(1, true);
        assert_eq!(menu.current(), Some(0));
    }

    #[test]
    fn test_move_always_posts_motion() {
        let mut menu = setup(3, 10);
        menu.move_selection(0, false);
        assert!(menu.redraw().contains(MenuRedraw::MOTION));
    }

    #[test]
    fn test_scroll_follows_selection() {
        let mut menu = setup(20, 5);
        menu.move_selection(7, false);
        assert_eq!(menu.top(), 3);
        assert!(menu.redraw().contains(MenuRedraw::INDEX));

        menu.move_selection(-6, false);
        assert_eq!(menu.current(), Some(1));
        assert_eq!(menu.top(), 1);

        menu.last();
        assert_eq!(menu.top(), 15);
        menu.first();
        assert_eq!(menu.top(), 0);
    }

    #[test]
    fn test_paging() {
        let mut menu = setup(10, 3);
        assert!(menu.next_page());
        assert_eq!((menu.top(), menu.current()), (3, Some(3)));
        menu.next_page();
        menu.next_page();
        assert_eq!((menu.top(), menu.current()), (7, Some(7)));
        assert!(menu.next_page());
        assert_eq!(menu.current(), Some(9));
        assert!(!menu.next_page());

        assert!(menu.prev_page());
        assert_eq!((menu.top(), menu.current()), (4, Some(6)));
        menu.prev_page();
        menu.prev_page();
        assert_eq!((menu.top(), menu.current()), (0, Some(2)));
        assert!(menu.prev_page());
        assert_eq!(menu.current(), Some(0));
        assert!(!menu.prev_page());
    }

    #[test]
    fn test_top_never_past_last_page() {
        let mut menu = setup(10, 4);
        menu.last();
        assert_eq!(menu.top(), 6);
        menu.set_page_len(8);
        assert_eq!(menu.top(), 2);
    }

    #[test]
    fn test_set_view_keeps_selected_item() {
        let mut menu = setup(6, 10);
        menu.set_index(4).unwrap();
        menu.set_view(vec![5, 4, 0]).unwrap();
        assert_eq!(menu.current(), Some(1));
        assert_eq!(menu.current_item(), Some(4));
    }

    #[test]
    fn test_set_view_clamps_when_item_gone() {
        let mut menu = setup(6, 10);
        menu.set_index(4).unwrap();
        menu.set_view(vec![0, 1]).unwrap();
        assert_eq!(menu.current(), Some(1));
        assert_eq!(menu.current_item(), Some(1));

        menu.set_view(Vec::new()).unwrap();
        assert_eq!(menu.current(), None);
    }

    #[test]
    fn test_set_view_rejects_bad_indices() {
        let mut menu = setup(3, 10);
        assert_eq!(
            menu.set_view(vec![0, 3]),
            Err(MenuError::RealIndexOutOfRange { index: 3, max: 3 })
        );
        assert_eq!(menu.set_view(vec![1, 1]), Err(MenuError::DuplicateIndex(1)));
        assert_eq!(menu.view(), &[0, 1, 2]);
    }

    #[test]
    fn test_tag_toggle_twice_restores_count() {
        let mut menu = setup(4, 10);
        assert_eq!(menu.tag_entry(2, TagAction::Toggle), Ok(1));
        assert_eq!(menu.tag_count(), 1);
        assert!(menu.is_tagged(2));
        assert_eq!(menu.tag_entry(2, TagAction::Toggle), Ok(-1));
        assert_eq!(menu.tag_count(), 0);
        assert!(menu.redraw().contains(MenuRedraw::INDEX));
    }

    #[test]
    fn test_tag_uses_real_index() {
        let mut menu = setup(4, 10);
        menu.set_view(vec![3, 2]).unwrap();
        menu.tag_entry(0, TagAction::Set(true)).unwrap();
        assert!(menu.is_tagged(3));
        assert_eq!(menu.tagged_items(), vec![3]);
        assert_eq!(menu.tag_entry(0, TagAction::Set(true)), Ok(0));
    }

    #[test]
    fn test_tag_out_of_range() {
        let mut menu = setup(2, 10);
        assert_eq!(
            menu.tag_entry(2, TagAction::Toggle),
            Err(MenuError::ViewIndexOutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    fn test_behavior_can_refuse_tag() {
        let mut menu = Menu::new(MenuType::Generic, EvenOnly);
        menu.set_items(3);
        assert_eq!(menu.tag_entry(1, TagAction::Toggle), Ok(0));
        assert_eq!(menu.tag_count(), 0);
        assert_eq!(menu.tag_entry(2, TagAction::Toggle), Ok(1));
    }

    #[test]
    fn test_tag_request_is_read_by_sign() {
        let mut menu = Menu::new(MenuType::Generic, Loud);
        menu.set_items(3);
        assert_eq!(menu.tag_entry(0, TagAction::Set(true)), Ok(1));
        // already tagged: asking again changes nothing
        assert_eq!(menu.tag_entry(0, TagAction::Set(true)), Ok(0));
        assert_eq!(menu.tag_count(), 1);
        assert_eq!(menu.tag_entry(1, TagAction::Set(false)), Ok(0));
        assert_eq!(menu.tag_entry(0, TagAction::Toggle), Ok(-1));
        assert_eq!(menu.tag_count(), 0);
        assert!(menu.tagged_items().is_empty());
    }

    #[test]
    fn test_remove_item_shifts_tags() {
        let mut menu = setup(4, 10);
        menu.tag_entry(3, TagAction::Toggle).unwrap();
        menu.remove_item(1);
        assert_eq!(menu.max(), 3);
        assert_eq!(menu.tagged_items(), vec![2]);
        assert_eq!(menu.tag_count(), 1);
    }

    #[test]
    fn test_free_calls_behavior_free() {
        let freed = Rc::new(Cell::new(0));
        let menu = Menu::new(MenuType::Generic, Lines { freed: freed.clone() });
        let data: Box<dyn WindowData> = Box::new(menu);
        data.free();
        assert_eq!(freed.get(), 1);
    }

    #[test]
    fn test_behavior_downcast() {
        let menu = setup(1, 1);
        assert!(menu.behavior_as::<Lines>().is_some());
        assert!(menu.behavior_as::<EvenOnly>().is_none());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_selection_stays_on_page(
            items in 1usize..60,
            page in 1usize..15,
            moves in proptest::collection::vec((-30isize..30, any::<bool>()), 0..40),
        ) {
            let mut menu = setup(items, page);
            for (delta, wrap) in moves {
                menu.move_selection(delta, wrap);
                let sel = menu.current().unwrap();
                prop_assert!(menu.top() <= sel);
                prop_assert!(sel <= menu.top() + page - 1);
                prop_assert!(sel < items);
            }
        }

        #[test]
        fn prop_tag_count_matches_tags(
            items in 1usize..20,
            ops in proptest::collection::vec((0usize..20, any::<bool>()), 0..50),
        ) {
            let mut menu = setup(items, 5);
            for (idx, toggle) in ops {
                let action = if toggle { TagAction::Toggle } else { TagAction::Set(true) };
                let _ = menu.tag_entry(idx % items, action);
                prop_assert_eq!(menu.tag_count(), menu.tagged_items().len());
            }
        }
    }
}
