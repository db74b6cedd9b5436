//! Event catalog
//!
//! Observers subscribe to an [`EventType`] and look at the subtype inside
//! the [`Event`] they are handed.

use crate::types::WindowId;

/// Broad class of an event; the unit of subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Window,
    Config,
    Compose,
}

/// Window lifecycle changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    /// Geometry or visibility changed during a reflow.
    State,
    /// The window is being destroyed; its payload is already gone.
    Delete,
    /// The focused dialog changed.
    Focus,
}

/// Configuration changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigEvent {
    /// Changed at runtime.
    Set,
    /// Applied while loading the config file.
    InitialSet,
    /// Returned to its default.
    Reset,
}

/// Compose-dialog data changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeEvent {
    /// Attachment list or an attachment changed.
    Attachments,
    /// Envelope headers changed.
    Envelope,
}

/// A notification published through a hub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Window { subtype: WindowEvent, win: WindowId },
    Config { subtype: ConfigEvent, key: String },
    Compose { subtype: ComposeEvent },
}

impl Event {
    pub fn window(subtype: WindowEvent, win: WindowId) -> Self {
        Event::Window { subtype, win }
    }

    pub fn config(subtype: ConfigEvent, key: impl Into<String>) -> Self {
        Event::Config {
            subtype,
            key: key.into(),
        }
    }

    pub fn compose(subtype: ComposeEvent) -> Self {
        Event::Compose { subtype }
    }

    pub fn event_type(&self) -> EventType {
        match self {
            Event::Window { .. } => EventType::Window,
            Event::Config { .. } => EventType::Config,
            Event::Compose { .. } => EventType::Compose,
        }
    }

    /// Whether the event continues to the parent hub after local delivery.
    ///
    /// Geometry and deletion events are about one window and stay on its
    /// hub. Config events are published on the global hub, which has no
    /// parent anyway.
    pub fn bubbles(&self) -> bool {
        match self {
            Event::Window { subtype, .. } => *subtype == WindowEvent::Focus,
            Event::Config { .. } => false,
            Event::Compose { .. } => true,
        }
    }

    /// Config key, if this is a config event.
    pub fn config_key(&self) -> Option<&str> {
        match self {
            Event::Config { key, .. } => Some(key),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bubbling_is_per_event() {
        let win = WindowId::default();
        assert!(!Event::window(WindowEvent::Delete, win).bubbles());
        assert!(!Event::window(WindowEvent::State, win).bubbles());
        assert!(Event::window(WindowEvent::Focus, win).bubbles());
        assert!(Event::compose(ComposeEvent::Attachments).bubbles());
        assert!(!Event::config(ConfigEvent::Set, "menu_wrap").bubbles());
    }

    #[test]
    fn test_config_key() {
        let event = Event::config(ConfigEvent::Set, "status_on_top");
        assert_eq!(event.config_key(), Some("status_on_top"));
        assert_eq!(event.event_type(), EventType::Config);
        assert_eq!(Event::compose(ComposeEvent::Envelope).config_key(), None);
    }
}
