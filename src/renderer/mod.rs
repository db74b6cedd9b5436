//! Renderer - screen buffer and terminal output
//!
//! - [`FrameBuffer`] - cell grid windows paint into
//! - [`DiffRenderer`] - writes changed rows with crossterm

mod buffer;
mod diff;

pub use buffer::FrameBuffer;
pub use diff::DiffRenderer;
