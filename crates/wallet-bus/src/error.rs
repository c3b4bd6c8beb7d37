//! # Bus Errors
//!
//! Configuration errors (duplicate/unknown names) are fatal at startup.
//! Capability violations are fatal at the call site and must never be
//! swallowed: they are the mechanism that surfaces accidental coupling.

use thiserror::Error;

use wallet_types::ControllerName;

use crate::action::{ActionName, ActionResponse};
use crate::event::EventName;

/// Errors from bus operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BusError {
    /// A handler is already registered under this action name.
    #[error("duplicate action handler for {action}")]
    DuplicateAction { action: ActionName },

    /// No handler registered under this action name.
    #[error("no handler registered for {action}")]
    UnknownAction { action: ActionName },

    /// A capability violation from a restricted handle.
    #[error(transparent)]
    Capability(#[from] CapabilityError),

    /// The handler itself failed.
    #[error("handler for {action} failed: {message}")]
    Handler { action: ActionName, message: String },

    /// The handler returned a response of the wrong shape.
    #[error("expected {expected} response, got {got}")]
    UnexpectedResponse {
        expected: &'static str,
        got: &'static str,
    },
}

impl BusError {
    /// Build a handler failure for `action`.
    #[must_use]
    pub fn handler(action: ActionName, message: impl Into<String>) -> Self {
        Self::Handler {
            action,
            message: message.into(),
        }
    }

    pub(crate) fn unexpected_response(expected: &'static str, got: &ActionResponse) -> Self {
        Self::UnexpectedResponse {
            expected,
            got: got.variant_name(),
        }
    }
}

/// A restricted handle was used outside its allow-lists.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CapabilityError {
    /// The component called an action not in its grant.
    #[error("{component} is not allowed to call {action}")]
    ActionNotAllowed {
        component: ControllerName,
        action: ActionName,
    },

    /// The component subscribed to (or published) an event not in its grant.
    #[error("{component} is not allowed to use event {event}")]
    EventNotAllowed {
        component: ControllerName,
        event: EventName,
    },

    /// The component tried to register a handler for an action it does
    /// not own.
    #[error("{component} cannot register foreign action {action} (owned by {owner})")]
    ForeignActionRegistration {
        component: ControllerName,
        action: ActionName,
        owner: ControllerName,
    },

    /// The component tried to publish an event it does not own and was
    /// not granted.
    #[error("{component} cannot publish foreign event {event} (owned by {owner})")]
    ForeignEventPublish {
        component: ControllerName,
        event: EventName,
        owner: ControllerName,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_error_names_component_and_action() {
        let err = CapabilityError::ActionNotAllowed {
            component: ControllerName::Metrics,
            action: ActionName::SignTransaction,
        };
        let text = err.to_string();
        assert!(text.contains("MetricsController"));
        assert!(text.contains("AccountsController:signTransaction"));
    }

    #[test]
    fn test_duplicate_action_display() {
        let err = BusError::DuplicateAction {
            action: ActionName::TrackEvent,
        };
        assert!(err.to_string().contains("MetricsController:trackEvent"));
    }
}
