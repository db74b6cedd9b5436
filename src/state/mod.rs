//! State Module - input-side state
//!
//! - [`dialog`] - the dialog stack and input focus
//! - [`keymap`] - key bindings per menu type

pub mod dialog;
pub mod keymap;

pub use dialog::DialogStack;
pub use keymap::{HelpEntry, Keymap, Op};
