//! # Capability Table
//!
//! The single declarative artifact mapping each controller to the foreign
//! actions and events it may reach. Reviewing a controller's dependency
//! surface means reading its entry here; nothing else can widen it, since
//! grants are fixed at handle creation.
//!
//! Two grants exist per controller: the runtime grant (used by the
//! controller after construction) and the init grant (bootstrap-only reads,
//! discarded once construction completes). Names owned by the controller
//! itself are implicitly available and are not listed.

use wallet_bus::{ActionName, CapabilityGrant, EventName};
use wallet_types::ControllerName;

/// Allow-lists for one controller, both handle kinds.
#[derive(Debug, Clone, Copy)]
pub struct CapabilitySpec {
    /// Foreign actions callable post-construction.
    pub actions: &'static [ActionName],
    /// Foreign events usable post-construction.
    pub events: &'static [EventName],
    /// Foreign actions callable during initialization only.
    pub init_actions: &'static [ActionName],
    /// Foreign events usable during initialization only.
    pub init_events: &'static [EventName],
}

/// Look up the capability spec for a controller.
#[must_use]
pub fn capability_spec(name: ControllerName) -> CapabilitySpec {
    match name {
        ControllerName::Network
        | ControllerName::Preferences
        | ControllerName::Relay
        | ControllerName::Metrics => CapabilitySpec {
            actions: &[],
            events: &[],
            init_actions: &[],
            init_events: &[],
        },

        // Signing needs the record behind the transaction id.
        ControllerName::Accounts => CapabilitySpec {
            actions: &[ActionName::GetTransactionById],
            events: &[],
            init_actions: &[ActionName::GetTransactionById],
            init_events: &[],
        },

        // The engine signs through the accounts controller and broadcasts
        // through the network controller when the pipeline declines.
        ControllerName::Transactions => CapabilitySpec {
            actions: &[
                ActionName::SignTransaction,
                ActionName::SubmitRawTransaction,
                ActionName::GetCurrentChainId,
            ],
            events: &[],
            init_actions: &[
                ActionName::SignTransaction,
                ActionName::SubmitRawTransaction,
                ActionName::GetCurrentChainId,
                ActionName::GetSelectedNetworkClient,
                ActionName::GetEip1559Compatibility,
            ],
            init_events: &[],
        },

        // Strategy selection consults flags, account capabilities, and the
        // relay; batch publish reads engine records and reserved nonces.
        ControllerName::PublishPipeline => CapabilitySpec {
            actions: &[
                ActionName::GetFeatureFlags,
                ActionName::IsAtomicBatchSupported,
                ActionName::IsSendBundleSupported,
                ActionName::GetRelayFeeQuote,
                ActionName::SubmitRelayTransaction,
                ActionName::SubmitRelayBundle,
                ActionName::WaitForRelayTransactionHash,
                ActionName::GetTransactionById,
                ActionName::GetNextNonce,
            ],
            events: &[],
            init_actions: &[
                ActionName::GetFeatureFlags,
                ActionName::IsAtomicBatchSupported,
                ActionName::IsSendBundleSupported,
                ActionName::GetRelayFeeQuote,
                ActionName::SubmitRelayTransaction,
                ActionName::SubmitRelayBundle,
                ActionName::WaitForRelayTransactionHash,
                ActionName::GetTransactionById,
                ActionName::GetNextNonce,
            ],
            init_events: &[],
        },

        // The only component permitted to feed the metrics sink from
        // lifecycle forwarding.
        ControllerName::TransactionRelay => CapabilitySpec {
            actions: &[ActionName::TrackEvent, ActionName::GetAccountKeyringType],
            events: &[
                EventName::UnapprovedTransactionAdded,
                EventName::TransactionApproved,
                EventName::TransactionSubmitted,
                EventName::TransactionConfirmed,
                EventName::TransactionDropped,
                EventName::TransactionFailed,
                EventName::TransactionRejected,
                EventName::PostTransactionBalanceUpdated,
                EventName::TransactionNewSwap,
            ],
            init_actions: &[
                ActionName::TrackEvent,
                ActionName::GetAccountKeyringType,
                ActionName::GetSelectedAccount,
            ],
            init_events: &[
                EventName::UnapprovedTransactionAdded,
                EventName::TransactionApproved,
                EventName::TransactionSubmitted,
                EventName::TransactionConfirmed,
                EventName::TransactionDropped,
                EventName::TransactionFailed,
                EventName::TransactionRejected,
                EventName::PostTransactionBalanceUpdated,
                EventName::TransactionNewSwap,
            ],
        },
    }
}

/// The runtime grant for a controller.
#[must_use]
pub fn controller_grant(name: ControllerName) -> CapabilityGrant {
    let spec = capability_spec(name);
    CapabilityGrant {
        component: name,
        actions: spec.actions,
        events: spec.events,
    }
}

/// The initialization-only grant for a controller.
#[must_use]
pub fn init_grant(name: ControllerName) -> CapabilityGrant {
    let spec = capability_spec(name);
    CapabilityGrant {
        component: name,
        actions: spec.init_actions,
        events: spec.init_events,
    }
}
