//! Layout Module
//!
//! - [`taffy_bridge`] - window subtree reflow using [Taffy](https://github.com/DioxusLabs/taffy)
//! - [`text_measure`] - display widths, truncation, tab expansion
//! - [`format`] - `%x` placeholder expansion for rows and bars

pub mod format;
pub mod taffy_bridge;
pub mod text_measure;

pub use format::expand_format;
pub use text_measure::{expand_tabs, fit_to_width, string_width, truncate_to_width};
