//! # Transaction Record
//!
//! The transaction record owned by the transaction engine. Other components
//! only read it (and annotate it transiently during a publish attempt);
//! all status transitions go through the engine.
//!
//! ## Status Machine
//!
//! ```text
//! Unapproved ──→ Approved ──→ Submitted ──→ Confirmed
//!     │                           │
//!     │                           ├──→ Dropped
//!     └──→ Rejected                └──→ Failed
//! ```
//!
//! `Confirmed`, `Dropped`, `Failed`, and `Rejected` are terminal.

use serde::{Deserialize, Serialize};

use crate::ids::{Address, ChainId, NetworkClientId, TransactionId, TxHash};

/// Lifecycle status of one transaction record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionStatus {
    /// Created, awaiting user approval.
    Unapproved,
    /// Approved by the user, not yet broadcast.
    Approved,
    /// Broadcast (directly or via relay), awaiting inclusion.
    Submitted,
    /// Included in a block.
    Confirmed,
    /// Superseded or evicted from the pool.
    Dropped,
    /// Submission or execution failed.
    Failed,
    /// Rejected by the user before approval.
    Rejected,
}

impl TransactionStatus {
    /// Whether this status is terminal (no further transitions).
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Confirmed | Self::Dropped | Self::Failed | Self::Rejected
        )
    }
}

/// Classification of transaction intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionType {
    /// Simple value transfer.
    Transfer,
    /// Token swap.
    Swap,
    /// Combined swap and send.
    SwapAndSend,
    /// Token allowance approval preceding a swap.
    SwapApproval,
    /// Cross-chain bridge transfer.
    Bridge,
    /// Token allowance approval preceding a bridge.
    BridgeApproval,
    /// Arbitrary contract interaction.
    ContractCall,
    /// Member of an atomic batch.
    Batch,
}

/// Raw transaction parameters as supplied at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxParams {
    pub from: Address,
    pub to: Option<Address>,
    /// Value in wei.
    pub value: u128,
    /// Calldata as a hex string (`0x`-prefixed, possibly empty).
    pub data: String,
    /// Explicit nonce, if the caller pinned one.
    pub nonce: Option<u64>,
    /// EIP-1559 max fee per gas, in wei.
    pub max_fee_per_gas: Option<u128>,
    /// Legacy gas price, in wei.
    pub gas_price: Option<u128>,
}

impl TxParams {
    /// Whether these parameters describe a legacy (pre-EIP-1559) envelope.
    #[must_use]
    pub fn is_legacy(&self) -> bool {
        self.gas_price.is_some() && self.max_fee_per_gas.is_none()
    }
}

/// One outgoing transaction, owned exclusively by the transaction engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: TransactionId,
    pub chain_id: ChainId,
    pub network_client_id: NetworkClientId,
    pub status: TransactionStatus,
    pub tx_params: TxParams,
    pub tx_type: TransactionType,
    /// Alternate token selected to pay gas fees, if any.
    pub selected_gas_fee_token: Option<Address>,
    /// Canonical hash once submitted.
    pub hash: Option<TxHash>,
    /// Error description for `Failed` records.
    pub error: Option<String>,
    /// Creation time, milliseconds since the epoch.
    pub created_at: u64,
}

impl TransactionRecord {
    /// Create a fresh unapproved record.
    #[must_use]
    pub fn new(
        chain_id: ChainId,
        network_client_id: NetworkClientId,
        tx_params: TxParams,
        tx_type: TransactionType,
    ) -> Self {
        Self {
            id: TransactionId::generate(),
            chain_id,
            network_client_id,
            status: TransactionStatus::Unapproved,
            tx_params,
            tx_type,
            selected_gas_fee_token: None,
            hash: None,
            error: None,
            created_at: now_millis(),
        }
    }
}

/// Keyring kind backing an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyringType {
    /// BIP-39 HD keyring.
    Hd,
    /// Hardware wallet (requires interactive signing).
    Hardware,
    /// Single imported key.
    Simple,
}

impl KeyringType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hd => "HD Key Tree",
            Self::Hardware => "Hardware",
            Self::Simple => "Simple Key Pair",
        }
    }
}

/// Read-only description of one configured network client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkClientInfo {
    pub id: NetworkClientId,
    pub chain_id: ChainId,
    /// Whether the network supports EIP-1559 fee fields.
    pub eip1559: bool,
}

fn now_millis() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
