//! # Restricted Messenger
//!
//! A capability-scoped view of the [`Messenger`] granted to one component.
//! The allow-lists are fixed at handle creation, so a component's dependency
//! surface is statically auditable from its grant alone.
//!
//! Two handle kinds exist per controller: the controller messenger (narrow,
//! used post-construction) and the init messenger (broader bootstrap reads,
//! discarded after construction). Both are instances of this type with
//! different grants.

use std::sync::Arc;
use tracing::error;

use wallet_types::ControllerName;

use crate::action::{ActionHandler, ActionName, ActionResponse, WalletAction};
use crate::error::{BusError, CapabilityError};
use crate::event::{EventListener, EventName, WalletEvent};
use crate::messenger::{Messenger, SubscriptionId};

/// A fixed capability grant: the component's identity plus the foreign
/// actions/events it may reach. Names owned by the component itself are
/// always available and need not be listed.
#[derive(Debug, Clone, Copy)]
pub struct CapabilityGrant {
    pub component: ControllerName,
    pub actions: &'static [ActionName],
    pub events: &'static [EventName],
}

impl CapabilityGrant {
    /// A grant exposing only the component's own namespace.
    #[must_use]
    pub fn own_namespace(component: ControllerName) -> Self {
        Self {
            component,
            actions: &[],
            events: &[],
        }
    }

    fn allows_action(&self, action: ActionName) -> bool {
        action.owner() == self.component || self.actions.contains(&action)
    }

    fn allows_event(&self, event: EventName) -> bool {
        event.owner() == self.component || self.events.contains(&event)
    }
}

/// A capability-restricted handle onto the bus for one component.
#[derive(Clone)]
pub struct RestrictedMessenger {
    inner: Arc<Messenger>,
    grant: CapabilityGrant,
}

impl RestrictedMessenger {
    pub(crate) fn new(inner: Arc<Messenger>, grant: CapabilityGrant) -> Self {
        Self { inner, grant }
    }

    /// The component this handle belongs to.
    #[must_use]
    pub fn component(&self) -> ControllerName {
        self.grant.component
    }

    /// Call an action, checked against the grant.
    ///
    /// # Errors
    ///
    /// `CapabilityError::ActionNotAllowed` when the action is outside the
    /// allow-list. This is loud by design: a violation here is an accidental
    /// coupling introduced by a code change, not a runtime condition to
    /// tolerate.
    pub async fn call(&self, action: WalletAction) -> Result<ActionResponse, BusError> {
        let name = action.name();
        if !self.grant.allows_action(name) {
            let violation = CapabilityError::ActionNotAllowed {
                component: self.grant.component,
                action: name,
            };
            error!(component = %self.grant.component, action = %name, "Capability violation");
            return Err(violation.into());
        }
        self.inner.call(action).await
    }

    /// Register a handler for an action owned by this component.
    ///
    /// # Errors
    ///
    /// `CapabilityError::ForeignActionRegistration` when the action belongs
    /// to another component; `BusError::DuplicateAction` on re-registration.
    pub fn register_action(
        &self,
        name: ActionName,
        handler: ActionHandler,
    ) -> Result<(), BusError> {
        let owner = name.owner();
        if owner != self.grant.component {
            let violation = CapabilityError::ForeignActionRegistration {
                component: self.grant.component,
                action: name,
                owner,
            };
            error!(component = %self.grant.component, action = %name, "Capability violation");
            return Err(violation.into());
        }
        self.inner.register_action(name, handler)
    }

    /// Publish an event, checked against the grant (own namespace is always
    /// allowed).
    pub fn publish(&self, event: &WalletEvent) -> Result<usize, BusError> {
        let name = event.name();
        if !self.grant.allows_event(name) {
            let violation = CapabilityError::ForeignEventPublish {
                component: self.grant.component,
                event: name,
                owner: name.owner(),
            };
            error!(component = %self.grant.component, event = %name, "Capability violation");
            return Err(violation.into());
        }
        Ok(self.inner.publish(event))
    }

    /// Subscribe to an event, checked against the grant.
    pub fn subscribe(
        &self,
        name: EventName,
        listener: EventListener,
    ) -> Result<SubscriptionId, BusError> {
        if !self.grant.allows_event(name) {
            let violation = CapabilityError::EventNotAllowed {
                component: self.grant.component,
                event: name,
            };
            error!(component = %self.grant.component, event = %name, "Capability violation");
            return Err(violation.into());
        }
        Ok(self.inner.subscribe(name, listener))
    }

    /// Remove a subscription made through this handle.
    pub fn unsubscribe(&self, name: EventName, id: SubscriptionId) -> bool {
        self.inner.unsubscribe(name, id)
    }
}
