//! # Messenger
//!
//! The process-wide action/event broker. Created once at the entry point and
//! passed down by reference; controllers interact with it only through
//! [`RestrictedMessenger`](crate::restricted::RestrictedMessenger) handles.
//!
//! Event fan-out is synchronous and ordered: subscribers run in subscription
//! order against a snapshot of the listener list taken at publish start, so
//! subscribing or unsubscribing from inside a listener affects only later
//! publishes. A panicking listener is isolated and logged; remaining
//! listeners still run.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::action::{ActionHandler, ActionName, ActionResponse, WalletAction};
use crate::error::BusError;
use crate::event::{EventListener, EventName, WalletEvent};
use crate::restricted::{CapabilityGrant, RestrictedMessenger};

/// Identifier of one event subscription, used for unsubscribing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// The central action/event broker.
pub struct Messenger {
    /// One handler per action name.
    actions: RwLock<HashMap<ActionName, ActionHandler>>,

    /// Subscribers per event name, in subscription order.
    events: RwLock<HashMap<EventName, Vec<(SubscriptionId, EventListener)>>>,

    /// Monotonic subscription id source.
    next_subscription: AtomicU64,
}

impl Messenger {
    /// Create an empty messenger.
    #[must_use]
    pub fn new() -> Self {
        Self {
            actions: RwLock::new(HashMap::new()),
            events: RwLock::new(HashMap::new()),
            next_subscription: AtomicU64::new(0),
        }
    }

    /// Register the handler for `name`.
    ///
    /// # Errors
    ///
    /// `BusError::DuplicateAction` if a handler is already registered.
    pub fn register_action(
        &self,
        name: ActionName,
        handler: ActionHandler,
    ) -> Result<(), BusError> {
        let mut actions = self.actions.write();
        if actions.contains_key(&name) {
            return Err(BusError::DuplicateAction { action: name });
        }
        debug!(action = %name, "Action handler registered");
        actions.insert(name, handler);
        Ok(())
    }

    /// Dispatch `action` to its registered handler.
    ///
    /// # Errors
    ///
    /// `BusError::UnknownAction` if no handler is registered; otherwise the
    /// handler's own result.
    pub async fn call(&self, action: WalletAction) -> Result<ActionResponse, BusError> {
        let name = action.name();
        let handler = {
            let actions = self.actions.read();
            actions
                .get(&name)
                .cloned()
                .ok_or(BusError::UnknownAction { action: name })?
        };
        handler(action).await
    }

    /// Publish `event` to all current subscribers, in subscription order.
    ///
    /// Returns the number of listeners invoked. A panicking listener is
    /// caught and logged; it does not prevent later listeners from running.
    pub fn publish(&self, event: &WalletEvent) -> usize {
        let name = event.name();
        let snapshot: Vec<EventListener> = {
            let events = self.events.read();
            events
                .get(&name)
                .map(|listeners| listeners.iter().map(|(_, l)| Arc::clone(l)).collect())
                .unwrap_or_default()
        };

        if snapshot.is_empty() {
            debug!(event = %name, "Event published (no subscribers)");
            return 0;
        }

        for listener in &snapshot {
            if catch_unwind(AssertUnwindSafe(|| listener(event))).is_err() {
                warn!(event = %name, "Event subscriber panicked; continuing fan-out");
            }
        }

        debug!(event = %name, subscribers = snapshot.len(), "Event published");
        snapshot.len()
    }

    /// Subscribe `listener` to `name`. Returns a handle for unsubscribing.
    pub fn subscribe(&self, name: EventName, listener: EventListener) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.events
            .write()
            .entry(name)
            .or_default()
            .push((id, listener));
        debug!(event = %name, "Subscription created");
        id
    }

    /// Remove a subscription. Returns whether it existed.
    pub fn unsubscribe(&self, name: EventName, id: SubscriptionId) -> bool {
        let mut events = self.events.write();
        let Some(listeners) = events.get_mut(&name) else {
            return false;
        };
        let before = listeners.len();
        listeners.retain(|(sub_id, _)| *sub_id != id);
        let removed = listeners.len() != before;
        if removed {
            debug!(event = %name, "Subscription removed");
        }
        removed
    }

    /// Number of subscribers for `name`.
    #[must_use]
    pub fn subscriber_count(&self, name: EventName) -> usize {
        self.events.read().get(&name).map_or(0, Vec::len)
    }

    /// Derive a capability-restricted handle for one component.
    ///
    /// The grant's allow-lists are fixed for the lifetime of the handle.
    #[must_use]
    pub fn restricted(self: &Arc<Self>, grant: CapabilityGrant) -> RestrictedMessenger {
        RestrictedMessenger::new(Arc::clone(self), grant)
    }
}

impl Default for Messenger {
    fn default() -> Self {
        Self::new()
    }
}
