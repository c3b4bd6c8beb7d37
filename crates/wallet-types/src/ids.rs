//! # Identifiers
//!
//! Newtype identifiers used across the wallet workspace. Addresses and
//! transaction hashes are carried as normalized lowercase hex strings;
//! equality is therefore case-insensitive at construction time.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// EVM chain identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChainId(pub u64);

impl ChainId {
    /// Ethereum mainnet.
    pub const MAINNET: ChainId = ChainId(1);

    /// Hex representation as used on the wire (`0x1`).
    #[must_use]
    pub fn as_hex(&self) -> String {
        format!("{:#x}", self.0)
    }
}

impl std::fmt::Display for ChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// An account address, normalized to lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// Create an address, normalizing to lowercase.
    #[must_use]
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into().to_lowercase())
    }

    /// The normalized hex string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A transaction hash, normalized to lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxHash(String);

impl TxHash {
    /// Create a hash, normalizing to lowercase.
    #[must_use]
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into().to_lowercase())
    }

    /// The normalized hex string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TxHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a configured network client (RPC endpoint binding).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NetworkClientId(pub String);

impl NetworkClientId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NetworkClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier of one transaction record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(pub Uuid);

impl TransactionId {
    /// Generate a fresh identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Closed set of controller names.
///
/// Every action and event on the bus is owned by exactly one of these
/// components; capability grants are keyed by this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControllerName {
    /// Network state: chain id, network clients, raw broadcast.
    Network,
    /// User preferences and relay feature flags.
    Preferences,
    /// Accounts, keyrings, signing.
    Accounts,
    /// Off-chain relay client (smart transactions / bundles).
    Relay,
    /// Telemetry sink.
    Metrics,
    /// The transaction engine (records, status machine, nonces).
    Transactions,
    /// The publish pipeline hook set installed on the engine.
    PublishPipeline,
    /// The lifecycle event relay feeding the metrics sink.
    TransactionRelay,
}

impl ControllerName {
    /// Component name as used in namespaced action/event identifiers.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "NetworkController",
            Self::Preferences => "PreferencesController",
            Self::Accounts => "AccountsController",
            Self::Relay => "RelayController",
            Self::Metrics => "MetricsController",
            Self::Transactions => "TransactionController",
            Self::PublishPipeline => "PublishPipeline",
            Self::TransactionRelay => "TransactionEventRelay",
        }
    }

    /// All controller names.
    #[must_use]
    pub fn all() -> &'static [ControllerName] {
        &[
            Self::Network,
            Self::Preferences,
            Self::Accounts,
            Self::Relay,
            Self::Metrics,
            Self::Transactions,
            Self::PublishPipeline,
            Self::TransactionRelay,
        ]
    }
}

impl std::fmt::Display for ControllerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
