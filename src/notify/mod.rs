//! Notify Module - publish/subscribe between windows, config and screens
//!
//! Every window owns a [`Hub`]; attaching a window chains its hub to the
//! parent's, and the root's hub to the global one. Publishing is synchronous:
//! observers run in subscription order before `notify_send` returns.
//!
//! # API
//!
//! - `subscribe(hub, type, fn, ctx)` - Register an observer
//! - `unsubscribe(hub, type, fn, ctx)` - Remove it again (no-op when absent)
//! - `notify_send(hub, event)` - Deliver, then bubble if the event allows it
//!
//! Observer failures are logged and never stop delivery.

pub mod event;
pub mod hub;

pub use event::{ComposeEvent, ConfigEvent, Event, EventType, WindowEvent};
pub use hub::{Hub, HubId, NotifyCallback, ObserverFn, ObserverId};

use tracing::{debug, trace, warn};

use crate::Gui;
use crate::error::{GuiError, GuiResult};
use crate::types::WindowId;
use hub::Observer;

impl Gui {
    pub fn hub(&self, id: HubId) -> Option<&Hub> {
        match id {
            HubId::Global => Some(&self.global),
            HubId::Window(win) => self.windows.get(win).map(|w| &w.notify),
        }
    }

    pub(crate) fn hub_mut(&mut self, id: HubId) -> Option<&mut Hub> {
        match id {
            HubId::Global => Some(&mut self.global),
            HubId::Window(win) => self.windows.get_mut(win).map(|w| &mut w.notify),
        }
    }

    /// Register `callback` for events of `event_type` published on `hub`.
    ///
    /// `context` is the window the observer acts for; when that window is
    /// freed the subscription is dropped automatically.
    pub fn subscribe(
        &mut self,
        hub: HubId,
        event_type: EventType,
        callback: ObserverFn,
        context: WindowId,
    ) -> GuiResult<ObserverId> {
        self.next_observer += 1;
        let id = ObserverId(self.next_observer);
        let target = match hub {
            HubId::Window(win) => self.hub_mut(hub).ok_or(GuiError::StaleWindow(win))?,
            HubId::Global => &mut self.global,
        };
        target.push(Observer {
            id,
            event_type,
            callback,
            context,
        });
        self.observers.record(context, hub, id);
        trace!(?hub, ?event_type, ?context, "observer added");
        Ok(id)
    }

    /// Remove the subscription matching all three of type, callback and context.
    ///
    /// Returns whether anything was removed.
    pub fn unsubscribe(
        &mut self,
        hub: HubId,
        event_type: EventType,
        callback: ObserverFn,
        context: WindowId,
    ) -> bool {
        let Some(target) = self.hub_mut(hub) else {
            return false;
        };
        let Some(id) = target.find(event_type, callback, context) else {
            return false;
        };
        target.remove(id);
        self.observers.forget(context, id);
        trace!(?hub, ?event_type, ?context, "observer removed");
        true
    }

    /// Chain `hub` to `parent` for bubbling events.
    pub fn set_hub_parent(&mut self, hub: HubId, parent: Option<HubId>) {
        if let Some(h) = self.hub_mut(hub) {
            h.set_parent(parent);
        }
    }

    /// Publish `event` on `hub`.
    ///
    /// Returns how many observers were called, including bubbled delivery.
    pub fn notify_send(&mut self, hub: HubId, event: Event) -> usize {
        let event_type = event.event_type();
        let mut delivered = 0;
        let mut current = Some(hub);

        while let Some(id) = current {
            let Some(h) = self.hub(id) else {
                break;
            };
            let parent = h.parent();
            let observers = h.snapshot(event_type);

            for obs in observers {
                // An earlier observer may have unsubscribed this one.
                let still_there = self.hub(id).is_some_and(|h| h.contains(obs.id));
                if !still_there {
                    continue;
                }
                let nc = NotifyCallback {
                    current: id,
                    event: &event,
                    context: obs.context,
                };
                delivered += 1;
                if let Err(err) = (obs.callback)(self, &nc) {
                    warn!(hub = ?id, ?event, error = %err, "observer failed");
                }
            }

            if !event.bubbles() {
                break;
            }
            current = parent;
        }

        debug!(?hub, ?event, delivered, "notify");
        delivered
    }

    /// Drop every subscription made on behalf of `context`, on any hub.
    pub(crate) fn purge_observers(&mut self, context: WindowId) -> usize {
        let mut purged = 0;
        for (hub, id) in self.observers.take(context) {
            if let Some(h) = self.hub_mut(hub) {
                if h.remove(id) {
                    purged += 1;
                }
            }
        }
        purged
    }
}
