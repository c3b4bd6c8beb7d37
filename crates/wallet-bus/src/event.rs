//! # Events
//!
//! The closed set of fan-out notifications on the bus. Events carry no
//! return value; any number of subscribers may listen. Each event name is
//! owned by one controller, the only component allowed to publish it from a
//! restricted handle (other than via an explicit grant).

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use wallet_types::{ChainId, ControllerName, TransactionRecord};

/// All events that can be published to the bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum WalletEvent {
    // =========================================================================
    // TRANSACTION CONTROLLER (lifecycle)
    // =========================================================================
    /// A new unapproved transaction was added.
    UnapprovedTransactionAdded(TransactionRecord),
    /// The user approved a transaction.
    TransactionApproved(TransactionRecord),
    /// A transaction was broadcast (directly or via relay).
    TransactionSubmitted(TransactionRecord),
    /// A transaction was included in a block.
    TransactionConfirmed(TransactionRecord),
    /// A transaction was superseded or evicted.
    TransactionDropped(TransactionRecord),
    /// Submission or execution failed.
    TransactionFailed {
        transaction: TransactionRecord,
        error: String,
    },
    /// The user rejected a transaction before approval.
    TransactionRejected(TransactionRecord),
    /// Post-confirmation balance refresh completed.
    PostTransactionBalanceUpdated {
        transaction: TransactionRecord,
        /// New balance in wei.
        balance: u128,
    },
    /// A swap trade transaction was linked to its approval.
    TransactionNewSwap(TransactionRecord),

    // =========================================================================
    // NETWORK CONTROLLER
    // =========================================================================
    /// The selected network changed.
    NetworkDidChange { chain_id: ChainId },
}

impl WalletEvent {
    /// The name under which subscribers register for this event.
    #[must_use]
    pub fn name(&self) -> EventName {
        match self {
            Self::UnapprovedTransactionAdded(_) => EventName::UnapprovedTransactionAdded,
            Self::TransactionApproved(_) => EventName::TransactionApproved,
            Self::TransactionSubmitted(_) => EventName::TransactionSubmitted,
            Self::TransactionConfirmed(_) => EventName::TransactionConfirmed,
            Self::TransactionDropped(_) => EventName::TransactionDropped,
            Self::TransactionFailed { .. } => EventName::TransactionFailed,
            Self::TransactionRejected(_) => EventName::TransactionRejected,
            Self::PostTransactionBalanceUpdated { .. } => EventName::PostTransactionBalanceUpdated,
            Self::TransactionNewSwap(_) => EventName::TransactionNewSwap,
            Self::NetworkDidChange { .. } => EventName::NetworkDidChange,
        }
    }
}

/// Names of all subscribable events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventName {
    UnapprovedTransactionAdded,
    TransactionApproved,
    TransactionSubmitted,
    TransactionConfirmed,
    TransactionDropped,
    TransactionFailed,
    TransactionRejected,
    PostTransactionBalanceUpdated,
    TransactionNewSwap,
    NetworkDidChange,
}

impl EventName {
    /// The controller that owns (publishes) this event.
    #[must_use]
    pub fn owner(&self) -> ControllerName {
        match self {
            Self::NetworkDidChange => ControllerName::Network,
            _ => ControllerName::Transactions,
        }
    }

    /// Namespaced identifier, `Component:verb`.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnapprovedTransactionAdded => "TransactionController:unapprovedTransactionAdded",
            Self::TransactionApproved => "TransactionController:transactionApproved",
            Self::TransactionSubmitted => "TransactionController:transactionSubmitted",
            Self::TransactionConfirmed => "TransactionController:transactionConfirmed",
            Self::TransactionDropped => "TransactionController:transactionDropped",
            Self::TransactionFailed => "TransactionController:transactionFailed",
            Self::TransactionRejected => "TransactionController:transactionRejected",
            Self::PostTransactionBalanceUpdated => {
                "TransactionController:postTransactionBalanceUpdated"
            }
            Self::TransactionNewSwap => "TransactionController:transactionNewSwap",
            Self::NetworkDidChange => "NetworkController:networkDidChange",
        }
    }

    /// The fixed lifecycle set forwarded by the event relay.
    #[must_use]
    pub fn lifecycle() -> &'static [EventName] {
        &[
            Self::UnapprovedTransactionAdded,
            Self::TransactionApproved,
            Self::TransactionSubmitted,
            Self::TransactionConfirmed,
            Self::TransactionDropped,
            Self::TransactionFailed,
            Self::TransactionRejected,
            Self::PostTransactionBalanceUpdated,
            Self::TransactionNewSwap,
        ]
    }
}

impl std::fmt::Display for EventName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A synchronous event listener. Invoked in subscription order during
/// `publish`; panics are isolated per listener.
pub type EventListener = Arc<dyn Fn(&WalletEvent) + Send + Sync>;
