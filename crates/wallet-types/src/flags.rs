//! # Relay Feature Flags
//!
//! Snapshot of the smart-transaction relay configuration. Readers must treat
//! these as eventually-consistent snapshots and re-fetch per publish attempt
//! rather than caching them.

use serde::{Deserialize, Serialize};

use crate::ids::ChainId;

/// Feature flags gating the smart-transaction relay paths.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeatureFlags {
    /// Whether the user has opted into smart transactions.
    pub smart_transactions_enabled: bool,
    /// Chains on which the relay is available.
    pub smart_transaction_chains: Vec<ChainId>,
    /// Return the relay-reported hash immediately instead of waiting for
    /// the canonical hash.
    pub return_tx_hash_asap: bool,
    /// Expected relay inclusion deadline, seconds.
    pub expected_deadline: Option<u64>,
    /// Hard relay inclusion deadline, seconds.
    pub max_deadline: Option<u64>,
}

impl FeatureFlags {
    /// Whether a transaction on `chain_id` should be treated as a smart
    /// transaction: the preference is on and the chain is supported.
    #[must_use]
    pub fn is_smart_transaction(&self, chain_id: ChainId) -> bool {
        self.smart_transactions_enabled && self.smart_transaction_chains.contains(&chain_id)
    }
}
