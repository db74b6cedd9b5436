//! Error types
//!
//! One enum per concern; [`GuiError`] wraps the others for callers that go
//! through the [`Gui`](crate::Gui) context.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::WindowId;

/// Errors raised by window, dialog and redraw operations.
#[derive(Debug, Error)]
pub enum GuiError {
    #[error("window {0:?} does not exist")]
    StaleWindow(WindowId),

    #[error("window {0:?} has no menu attached")]
    NotAMenu(WindowId),

    #[error("window {0:?} has no {1} data")]
    MissingData(WindowId, &'static str),

    #[error("dialog stack is empty")]
    NoDialog,

    #[error("window {0:?} is not the active dialog")]
    NotTopDialog(WindowId),

    #[error("no root window has been created")]
    NoRoot,

    #[error("layout failed: {0}")]
    Layout(String),

    #[error(transparent)]
    Menu(#[from] MenuError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Pager(#[from] PagerError),

    #[error("terminal i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Menu precondition violations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MenuError {
    #[error("view index {index} out of range (view has {len} entries)")]
    ViewIndexOutOfRange { index: usize, len: usize },

    #[error("real index {index} out of range (menu has {max} items)")]
    RealIndexOutOfRange { index: usize, max: usize },

    #[error("real index {0} appears more than once in the view")]
    DuplicateIndex(usize),
}

/// Configuration lookup and parse failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown config option: {0}")]
    Unknown(String),

    #[error("config option {key} expects a {expected} value")]
    TypeMismatch { key: String, expected: &'static str },

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Failures reported by observers. Logged by the hub, never propagated.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("observer context window {0:?} is gone")]
    MissingContext(WindowId),

    #[error("observer expected {0} data")]
    MissingData(&'static str),

    #[error(transparent)]
    Gui(#[from] Box<GuiError>),
}

impl From<GuiError> for NotifyError {
    fn from(err: GuiError) -> Self {
        NotifyError::Gui(Box::new(err))
    }
}

/// External pager failures.
#[derive(Debug, Error)]
pub enum PagerError {
    #[error("Error running \"{command}\": {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Error running \"{command}\"")]
    Failed { command: String, status: Option<i32> },

    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type GuiResult<T> = Result<T, GuiError>;
pub type NotifyResult = Result<(), NotifyError>;
