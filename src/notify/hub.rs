//! Hub - observer list and the side registry
//!
//! A [`Hub`] is a plain ordered list of observers plus an optional parent.
//! Dispatch needs `&mut Gui` (observers mutate windows), so it lives on
//! [`Gui`](crate::Gui); this file only holds the data.

use std::collections::HashMap;

use crate::Gui;
use crate::error::NotifyResult;
use crate::notify::event::{Event, EventType};
use crate::types::WindowId;

/// Which hub: the process-wide one, or the one owned by a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HubId {
    Global,
    Window(WindowId),
}

/// Identifies one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(pub(crate) u64);

/// What an observer is handed during dispatch.
#[derive(Debug)]
pub struct NotifyCallback<'a> {
    /// Hub currently dispatching (differs from the origin while bubbling).
    pub current: HubId,
    pub event: &'a Event,
    /// Window the observer was registered for.
    pub context: WindowId,
}

/// Observer callback.
pub type ObserverFn = fn(&mut Gui, &NotifyCallback<'_>) -> NotifyResult;

#[derive(Debug, Clone, Copy)]
pub(crate) struct Observer {
    pub id: ObserverId,
    pub event_type: EventType,
    pub callback: ObserverFn,
    pub context: WindowId,
}

impl Observer {
    fn matches(&self, event_type: EventType, callback: ObserverFn, context: WindowId) -> bool {
        self.event_type == event_type
            && self.context == context
            && std::ptr::fn_addr_eq(self.callback, callback)
    }
}

// =============================================================================
// Hub
// =============================================================================

#[derive(Debug, Default)]
pub struct Hub {
    parent: Option<HubId>,
    observers: Vec<Observer>,
}

impl Hub {
    pub fn parent(&self) -> Option<HubId> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<HubId>) {
        self.parent = parent;
    }

    /// Number of subscriptions.
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub(crate) fn push(&mut self, observer: Observer) {
        self.observers.push(observer);
    }

    pub(crate) fn find(
        &self,
        event_type: EventType,
        callback: ObserverFn,
        context: WindowId,
    ) -> Option<ObserverId> {
        self.observers
            .iter()
            .find(|o| o.matches(event_type, callback, context))
            .map(|o| o.id)
    }

    pub(crate) fn remove(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|o| o.id != id);
        self.observers.len() != before
    }

    pub(crate) fn contains(&self, id: ObserverId) -> bool {
        self.observers.iter().any(|o| o.id == id)
    }

    /// Copy of the observers interested in `event_type`, in subscription order.
    pub(crate) fn snapshot(&self, event_type: EventType) -> Vec<Observer> {
        self.observers
            .iter()
            .filter(|o| o.event_type == event_type)
            .copied()
            .collect()
    }
}

// =============================================================================
// Side registry
// =============================================================================

/// Context window → every subscription made on its behalf.
///
/// Lets window destruction purge observers that live on other hubs
/// (usually the global one) without the owner tracking them by hand.
#[derive(Debug, Default)]
pub(crate) struct ObserverRegistry {
    by_context: HashMap<WindowId, Vec<(HubId, ObserverId)>>,
}

impl ObserverRegistry {
    pub fn record(&mut self, context: WindowId, hub: HubId, id: ObserverId) {
        self.by_context.entry(context).or_default().push((hub, id));
    }

    pub fn forget(&mut self, context: WindowId, id: ObserverId) {
        if let Some(list) = self.by_context.get_mut(&context) {
            list.retain(|(_, o)| *o != id);
            if list.is_empty() {
                self.by_context.remove(&context);
            }
        }
    }

    /// Remove and return every subscription registered for `context`.
    pub fn take(&mut self, context: WindowId) -> Vec<(HubId, ObserverId)> {
        self.by_context.remove(&context).unwrap_or_default()
    }

    /// Drop entries pointing at a hub that no longer exists.
    pub fn forget_hub(&mut self, hub: HubId) {
        self.by_context.retain(|_, list| {
            list.retain(|(h, _)| *h != hub);
            !list.is_empty()
        });
    }

    #[cfg(test)]
    pub fn count(&self, context: WindowId) -> usize {
        self.by_context.get(&context).map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &mut Gui, _: &NotifyCallback<'_>) -> NotifyResult {
        Ok(())
    }

    fn other(_: &mut Gui, _: &NotifyCallback<'_>) -> NotifyResult {
        Ok(())
    }

    fn observer(id: u64, event_type: EventType, callback: ObserverFn) -> Observer {
        Observer {
            id: ObserverId(id),
            event_type,
            callback,
            context: WindowId::default(),
        }
    }

    #[test]
    fn test_find_matches_whole_triple() {
        let mut hub = Hub::default();
        hub.push(observer(1, EventType::Config, noop));
        hub.push(observer(2, EventType::Window, noop));

        let ctx = WindowId::default();
        assert_eq!(hub.find(EventType::Window, noop, ctx), Some(ObserverId(2)));
        assert_eq!(hub.find(EventType::Window, other, ctx), None);
        assert_eq!(hub.find(EventType::Compose, noop, ctx), None);
    }

    #[test]
    fn test_snapshot_filters_and_keeps_order() {
        let mut hub = Hub::default();
        hub.push(observer(3, EventType::Config, noop));
        hub.push(observer(1, EventType::Window, noop));
        hub.push(observer(2, EventType::Config, other));

        let ids: Vec<_> = hub
            .snapshot(EventType::Config)
            .iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(ids, vec![ObserverId(3), ObserverId(2)]);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut hub = Hub::default();
        hub.push(observer(1, EventType::Config, noop));
        assert!(!hub.remove(ObserverId(9)));
        assert_eq!(hub.len(), 1);
        assert!(hub.remove(ObserverId(1)));
        assert!(hub.is_empty());
    }

    #[test]
    fn test_registry_take_and_forget_hub() {
        let mut reg = ObserverRegistry::default();
        let ctx = WindowId::default();
        reg.record(ctx, HubId::Global, ObserverId(1));
        reg.record(ctx, HubId::Global, ObserverId(2));
        reg.forget(ctx, ObserverId(1));
        assert_eq!(reg.count(ctx), 1);

        reg.forget_hub(HubId::Global);
        assert_eq!(reg.count(ctx), 0);
        assert!(reg.take(ctx).is_empty());
    }
}
