//! Standard windows
//!
//! - [`root`] - root window with help bar, dialog container and message line
//! - [`sbar`] - one-line title bars
//! - [`helpbar`] - key hints for the focused dialog
//! - [`msgwin`] - messages and errors
//! - [`dialog`] - menu + status bar dialogs

pub mod dialog;
pub mod helpbar;
pub mod msgwin;
pub mod root;
pub mod sbar;

pub use dialog::{simple_dialog_free, simple_dialog_new, window_status_on_top};
pub use helpbar::helpbar_new;
pub use msgwin::msgwin_new;
pub use root::{rootwin_new, rootwin_set_size};
pub use sbar::{bar_new, sbar_new, sbar_set_title};
