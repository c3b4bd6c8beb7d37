//! # Actions
//!
//! The closed set of request/response operations on the bus. Every action is
//! owned by exactly one controller (the only component allowed to register
//! its handler); any controller whose capability grant lists the action may
//! call it.
//!
//! The sum-type encoding replaces string-keyed dynamic dispatch: unknown
//! action names cannot be constructed, and duplicate registration is caught
//! at registration time.

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use wallet_types::{
    Address, ChainId, ControllerName, FeatureFlags, KeyringType, NetworkClientId,
    NetworkClientInfo, TransactionId, TransactionRecord, TxHash, TxParams,
};

use crate::error::BusError;

/// A request dispatched through the bus.
#[derive(Debug, Clone)]
pub enum WalletAction {
    // =========================================================================
    // NETWORK CONTROLLER
    // =========================================================================
    /// Chain id of the currently selected network.
    GetCurrentChainId,
    /// Look up a configured network client.
    GetNetworkClientById { network_client_id: NetworkClientId },
    /// The currently selected network client.
    GetSelectedNetworkClient,
    /// Whether the network behind `network_client_id` supports EIP-1559.
    GetEip1559Compatibility { network_client_id: NetworkClientId },
    /// Default broadcast path: send a signed transaction to the RPC provider.
    SubmitRawTransaction {
        network_client_id: NetworkClientId,
        signed_transaction: String,
    },

    // =========================================================================
    // PREFERENCES CONTROLLER
    // =========================================================================
    /// Current relay feature-flag snapshot.
    GetFeatureFlags,

    // =========================================================================
    // ACCOUNTS CONTROLLER
    // =========================================================================
    /// The currently selected account.
    GetSelectedAccount,
    /// Accounts permitted for an external origin.
    GetPermittedAccounts { origin: String },
    /// Keyring kind backing an account.
    GetAccountKeyringType { address: Address },
    /// Whether atomic (delegated) batching is supported for the account.
    IsAtomicBatchSupported { address: Address, chain_id: ChainId },
    /// Sign a transaction. May require interactive approval and be slow.
    SignTransaction { transaction_id: TransactionId },

    // =========================================================================
    // RELAY CONTROLLER
    // =========================================================================
    /// Whether the relay accepts send-bundle submissions for a chain.
    /// Advisory: callers treat a failed probe as "not supported".
    IsSendBundleSupported { chain_id: ChainId },
    /// Fee quote for a relayed submission.
    GetRelayFeeQuote {
        chain_id: ChainId,
        tx_params: TxParams,
    },
    /// Submit one signed transaction through the relay.
    SubmitRelayTransaction {
        chain_id: ChainId,
        signed_transaction: String,
        fee_quote: RelayFeeQuote,
    },
    /// Submit an ordered bundle of signed transactions through the relay.
    SubmitRelayBundle {
        chain_id: ChainId,
        signed_transactions: Vec<String>,
        /// Reserved nonce of the first bundle item, when pre-read.
        nonce: Option<u64>,
    },
    /// Wait for the canonical hash of a relay submission.
    WaitForRelayTransactionHash { submission_id: Uuid },

    // =========================================================================
    // METRICS CONTROLLER
    // =========================================================================
    /// Record one telemetry event.
    TrackEvent { payload: MetricsPayload },

    // =========================================================================
    // TRANSACTION CONTROLLER
    // =========================================================================
    /// Look up a transaction record by id.
    GetTransactionById { transaction_id: TransactionId },
    /// Read the next reserved nonce for `(address, network_client_id)`.
    /// Callers must serialize reads through the nonce lock.
    GetNextNonce {
        address: Address,
        network_client_id: NetworkClientId,
    },
}

impl WalletAction {
    /// The name under which this action's handler is registered.
    #[must_use]
    pub fn name(&self) -> ActionName {
        match self {
            Self::GetCurrentChainId => ActionName::GetCurrentChainId,
            Self::GetNetworkClientById { .. } => ActionName::GetNetworkClientById,
            Self::GetSelectedNetworkClient => ActionName::GetSelectedNetworkClient,
            Self::GetEip1559Compatibility { .. } => ActionName::GetEip1559Compatibility,
            Self::SubmitRawTransaction { .. } => ActionName::SubmitRawTransaction,
            Self::GetFeatureFlags => ActionName::GetFeatureFlags,
            Self::GetSelectedAccount => ActionName::GetSelectedAccount,
            Self::GetPermittedAccounts { .. } => ActionName::GetPermittedAccounts,
            Self::GetAccountKeyringType { .. } => ActionName::GetAccountKeyringType,
            Self::IsAtomicBatchSupported { .. } => ActionName::IsAtomicBatchSupported,
            Self::SignTransaction { .. } => ActionName::SignTransaction,
            Self::IsSendBundleSupported { .. } => ActionName::IsSendBundleSupported,
            Self::GetRelayFeeQuote { .. } => ActionName::GetRelayFeeQuote,
            Self::SubmitRelayTransaction { .. } => ActionName::SubmitRelayTransaction,
            Self::SubmitRelayBundle { .. } => ActionName::SubmitRelayBundle,
            Self::WaitForRelayTransactionHash { .. } => ActionName::WaitForRelayTransactionHash,
            Self::TrackEvent { .. } => ActionName::TrackEvent,
            Self::GetTransactionById { .. } => ActionName::GetTransactionById,
            Self::GetNextNonce { .. } => ActionName::GetNextNonce,
        }
    }
}

/// Names of all registrable actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionName {
    GetCurrentChainId,
    GetNetworkClientById,
    GetSelectedNetworkClient,
    GetEip1559Compatibility,
    SubmitRawTransaction,
    GetFeatureFlags,
    GetSelectedAccount,
    GetPermittedAccounts,
    GetAccountKeyringType,
    IsAtomicBatchSupported,
    SignTransaction,
    IsSendBundleSupported,
    GetRelayFeeQuote,
    SubmitRelayTransaction,
    SubmitRelayBundle,
    WaitForRelayTransactionHash,
    TrackEvent,
    GetTransactionById,
    GetNextNonce,
}

impl ActionName {
    /// The controller that owns this action (the only one allowed to
    /// register its handler).
    #[must_use]
    pub fn owner(&self) -> ControllerName {
        match self {
            Self::GetCurrentChainId
            | Self::GetNetworkClientById
            | Self::GetSelectedNetworkClient
            | Self::GetEip1559Compatibility
            | Self::SubmitRawTransaction => ControllerName::Network,
            Self::GetFeatureFlags => ControllerName::Preferences,
            Self::GetSelectedAccount
            | Self::GetPermittedAccounts
            | Self::GetAccountKeyringType
            | Self::IsAtomicBatchSupported
            | Self::SignTransaction => ControllerName::Accounts,
            Self::IsSendBundleSupported
            | Self::GetRelayFeeQuote
            | Self::SubmitRelayTransaction
            | Self::SubmitRelayBundle
            | Self::WaitForRelayTransactionHash => ControllerName::Relay,
            Self::TrackEvent => ControllerName::Metrics,
            Self::GetTransactionById | Self::GetNextNonce => ControllerName::Transactions,
        }
    }

    /// Namespaced identifier, `Component:verb`.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GetCurrentChainId => "NetworkController:getCurrentChainId",
            Self::GetNetworkClientById => "NetworkController:getNetworkClientById",
            Self::GetSelectedNetworkClient => "NetworkController:getSelectedNetworkClient",
            Self::GetEip1559Compatibility => "NetworkController:getEip1559Compatibility",
            Self::SubmitRawTransaction => "NetworkController:submitRawTransaction",
            Self::GetFeatureFlags => "PreferencesController:getFeatureFlags",
            Self::GetSelectedAccount => "AccountsController:getSelectedAccount",
            Self::GetPermittedAccounts => "AccountsController:getPermittedAccounts",
            Self::GetAccountKeyringType => "AccountsController:getAccountKeyringType",
            Self::IsAtomicBatchSupported => "AccountsController:isAtomicBatchSupported",
            Self::SignTransaction => "AccountsController:signTransaction",
            Self::IsSendBundleSupported => "RelayController:isSendBundleSupported",
            Self::GetRelayFeeQuote => "RelayController:getFeeQuote",
            Self::SubmitRelayTransaction => "RelayController:submitTransaction",
            Self::SubmitRelayBundle => "RelayController:submitBundle",
            Self::WaitForRelayTransactionHash => "RelayController:waitForTransactionHash",
            Self::TrackEvent => "MetricsController:trackEvent",
            Self::GetTransactionById => "TransactionController:getTransactionById",
            Self::GetNextNonce => "TransactionController:getNextNonce",
        }
    }
}

impl std::fmt::Display for ActionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fee quote returned by the relay for a prospective submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayFeeQuote {
    /// Suggested max fee per gas, wei.
    pub max_fee_per_gas: u128,
    /// Suggested priority fee per gas, wei.
    pub max_priority_fee_per_gas: u128,
}

/// Acknowledgement of a relay submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelaySubmission {
    /// Relay-side identifier for status polling.
    pub submission_id: Uuid,
    /// Hash reported synchronously by the relay, when available.
    pub tx_hash: Option<TxHash>,
    /// Per-item hashes for bundle submissions.
    pub tx_hashes: Vec<TxHash>,
}

/// Structured telemetry payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsPayload {
    pub event: String,
    pub category: String,
    pub properties: serde_json::Value,
}

/// A response produced by an action handler.
#[derive(Debug, Clone)]
pub enum ActionResponse {
    ChainId(ChainId),
    NetworkClient(Option<NetworkClientInfo>),
    Supported(bool),
    Account(Address),
    Accounts(Vec<Address>),
    KeyringType(KeyringType),
    SignedTransaction(String),
    FeatureFlags(FeatureFlags),
    FeeQuote(RelayFeeQuote),
    RelaySubmission(RelaySubmission),
    TransactionHash(Option<TxHash>),
    Transaction(Option<Box<TransactionRecord>>),
    Nonce(u64),
    Ack,
}

impl ActionResponse {
    /// Extract a `Supported` flag.
    pub fn into_supported(self) -> Result<bool, BusError> {
        match self {
            Self::Supported(value) => Ok(value),
            other => Err(BusError::unexpected_response("Supported", &other)),
        }
    }

    /// Extract a feature-flag snapshot.
    pub fn into_feature_flags(self) -> Result<FeatureFlags, BusError> {
        match self {
            Self::FeatureFlags(flags) => Ok(flags),
            other => Err(BusError::unexpected_response("FeatureFlags", &other)),
        }
    }

    /// Extract a fee quote.
    pub fn into_fee_quote(self) -> Result<RelayFeeQuote, BusError> {
        match self {
            Self::FeeQuote(quote) => Ok(quote),
            other => Err(BusError::unexpected_response("FeeQuote", &other)),
        }
    }

    /// Extract a relay submission acknowledgement.
    pub fn into_relay_submission(self) -> Result<RelaySubmission, BusError> {
        match self {
            Self::RelaySubmission(submission) => Ok(submission),
            other => Err(BusError::unexpected_response("RelaySubmission", &other)),
        }
    }

    /// Extract an optional transaction hash.
    pub fn into_transaction_hash(self) -> Result<Option<TxHash>, BusError> {
        match self {
            Self::TransactionHash(hash) => Ok(hash),
            other => Err(BusError::unexpected_response("TransactionHash", &other)),
        }
    }

    /// Extract an optional transaction record.
    pub fn into_transaction(self) -> Result<Option<TransactionRecord>, BusError> {
        match self {
            Self::Transaction(record) => Ok(record.map(|boxed| *boxed)),
            other => Err(BusError::unexpected_response("Transaction", &other)),
        }
    }

    /// Extract a nonce.
    pub fn into_nonce(self) -> Result<u64, BusError> {
        match self {
            Self::Nonce(nonce) => Ok(nonce),
            other => Err(BusError::unexpected_response("Nonce", &other)),
        }
    }

    /// Extract a signed transaction.
    pub fn into_signed_transaction(self) -> Result<String, BusError> {
        match self {
            Self::SignedTransaction(raw) => Ok(raw),
            other => Err(BusError::unexpected_response("SignedTransaction", &other)),
        }
    }

    /// Extract a selected account address.
    pub fn into_account(self) -> Result<Address, BusError> {
        match self {
            Self::Account(address) => Ok(address),
            other => Err(BusError::unexpected_response("Account", &other)),
        }
    }

    /// Extract a keyring type.
    pub fn into_keyring_type(self) -> Result<KeyringType, BusError> {
        match self {
            Self::KeyringType(kind) => Ok(kind),
            other => Err(BusError::unexpected_response("KeyringType", &other)),
        }
    }

    /// Short tag used in error messages.
    #[must_use]
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::ChainId(_) => "ChainId",
            Self::NetworkClient(_) => "NetworkClient",
            Self::Supported(_) => "Supported",
            Self::Account(_) => "Account",
            Self::Accounts(_) => "Accounts",
            Self::KeyringType(_) => "KeyringType",
            Self::SignedTransaction(_) => "SignedTransaction",
            Self::FeatureFlags(_) => "FeatureFlags",
            Self::FeeQuote(_) => "FeeQuote",
            Self::RelaySubmission(_) => "RelaySubmission",
            Self::TransactionHash(_) => "TransactionHash",
            Self::Transaction(_) => "Transaction",
            Self::Nonce(_) => "Nonce",
            Self::Ack => "Ack",
        }
    }
}

/// An async action handler. Registered once per [`ActionName`].
pub type ActionHandler =
    Arc<dyn Fn(WalletAction) -> BoxFuture<'static, Result<ActionResponse, BusError>> + Send + Sync>;
