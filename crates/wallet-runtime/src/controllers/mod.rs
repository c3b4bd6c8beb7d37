//! # Concrete Controllers
//!
//! The controllers registered with the registry at startup. Each module
//! exposes the controller itself plus its `ControllerInit` factory; all
//! inter-controller traffic goes through the bus, never through direct
//! references.

pub mod accounts;
pub mod metrics;
pub mod network;
pub mod preferences;
pub mod relay_client;
pub mod transactions;

pub use accounts::AccountsInit;
pub use metrics::{MetricsApi, MetricsInit};
pub use network::NetworkInit;
pub use preferences::{PreferencesApi, PreferencesInit};
pub use relay_client::RelayInit;
pub use transactions::{TransactionError, TransactionsApi, TransactionsInit};

use sha3::{Digest, Keccak256};
use wallet_types::TxHash;

/// Derive the canonical hash of a signed transaction payload.
pub(crate) fn derive_tx_hash(signed_transaction: &str) -> TxHash {
    let digest = Keccak256::digest(signed_transaction.as_bytes());
    TxHash::new(format!("0x{}", hex::encode(digest)))
}
