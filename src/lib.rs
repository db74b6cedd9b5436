//! # panekit
//!
//! Window tree, notification hubs and menus for mail-style terminal UIs.
//!
//! ## Architecture
//!
//! All state lives in one [`Gui`] context passed around as `&mut Gui`.
//! Windows sit in an arena and carry action flags; nothing is drawn
//! directly. A redraw pass turns the flags into screen updates:
//!
//! ```text
//! key → menu op → notify_send → observers set flags
//!     → redraw (flow → reflow → recalc → repaint) → flush
//! ```
//!
//! Observers let config changes, application events and sibling windows
//! request redraws without holding references to each other.
//!
//! ## Modules
//!
//! - [`types`] - ids, sizing, action flags, cells
//! - [`engine`] - the [`Gui`] context and window arena
//! - [`notify`] - hubs, events and observers
//! - [`menu`] - scrollable, taggable list state bound to a window
//! - [`layout`] - taffy reflow and text measuring
//! - [`pipeline`] - redraw pass, input loop, terminal
//! - [`windows`] - root window, bars, message line, simple dialogs
//! - [`screens`] - compose, pattern helper, pager, help
//! - [`config`] - typed options with change notifications

pub mod config;
pub mod engine;
pub mod error;
pub mod layout;
pub mod logging;
pub mod menu;
pub mod notify;
pub mod pipeline;
pub mod renderer;
pub mod screens;
pub mod state;
pub mod types;
pub mod windows;

pub use types::*;

pub use config::{ConfigSet, ConfigValue};
pub use engine::{Gui, Window, WindowBuilder, WindowData, WindowFn};
pub use error::{ConfigError, GuiError, GuiResult, MenuError, NotifyError, NotifyResult, PagerError};
pub use menu::{Menu, MenuBehavior, MenuRedraw, MenuType, RowContext, TagAction};
pub use notify::{ComposeEvent, ConfigEvent, Event, EventType, HubId, NotifyCallback, WindowEvent};
pub use pipeline::{CrosstermTerminal, InputEvent, ScriptedTerminal, Terminal, menu_loop};
pub use renderer::{DiffRenderer, FrameBuffer};
pub use state::{DialogStack, HelpEntry, Keymap, Op};
