//! Engine - window arena and tree
//!
//! - Context: [`Gui`], the single owner of all UI state
//! - Window: node data, payload trait, builder
//! - Registry: structure edits, lookup, destruction
//!
//! # Architecture
//!
//! Windows are NOT referenced by pointer. They live in a generational arena
//! and point at each other by [`WindowId`](crate::WindowId):
//!
//! ```text
//! Root ─┬─ HelpBar
//!       ├─ AllDialogs ─┬─ DlgPattern (hidden)
//!       │              └─ DlgCompose ─┬─ Menu
//!       │                             └─ StatusBar
//!       └─ Message
//! ```
//!
//! Observers and focus pointers hold ids too, so a freed window can never be
//! reached through a dangling reference.

mod context;
mod registry;
pub mod window;

pub use context::Gui;
pub use window::{Window, WindowBuilder, WindowData, WindowFn};
