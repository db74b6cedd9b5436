//! Screens - dialogs built from menus
//!
//! - [`compose`]: attachment list with a size estimate
//! - [`pattern`]: search pattern helper
//! - [`pager`]: text viewer, built in or external
//! - [`help`]: key bindings of a menu, shown in the pager

pub mod compose;
pub mod help;
pub mod pager;
pub mod pattern;

pub use compose::{ComposeResult, dlg_compose};
pub use help::show_help;
pub use pager::{PagerMode, PagerView, do_pager};
pub use pattern::dlg_select_pattern;
