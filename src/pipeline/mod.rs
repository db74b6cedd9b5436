//! Pipeline - from dirty windows to the terminal
//!
//! ```text
//! input → observers → redraw pass (flow → reflow → recalc → repaint) → flush
//! ```
//!
//! - [`redraw`] - the per-pass state machine over action flags
//! - [`event_loop`] - the modal input loop around a menu
//! - [`terminal`] - where input comes from and frames go to

pub mod event_loop;
pub mod redraw;
pub mod terminal;

pub use event_loop::menu_loop;
pub use redraw::{PassStage, RedrawPass};
pub use terminal::{CrosstermTerminal, InputEvent, ScriptedTerminal, Terminal};
