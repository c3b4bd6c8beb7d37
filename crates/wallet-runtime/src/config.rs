//! # Runtime Configuration
//!
//! Unified configuration for the wallet runtime. Defaults are usable for
//! local development; environment variables override individual fields.

use tracing::warn;

use wallet_types::{Address, ChainId, FeatureFlags, NetworkClientId};

/// Complete runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Smart-transaction relay endpoint.
    pub relay_url: String,
    /// Chain id of the initially selected network.
    pub chain_id: ChainId,
    /// Network client bound to the selected network.
    pub network_client_id: NetworkClientId,
    /// Whether the selected network supports EIP-1559 fee fields.
    pub eip1559: bool,
    /// Initially selected account.
    pub selected_account: Address,
    /// Whether the user has opted into smart transactions.
    pub smart_transactions_enabled: bool,
    /// Chains on which the smart-transaction relay is available.
    pub smart_transaction_chains: Vec<ChainId>,
    /// Return the relay-reported hash immediately instead of waiting.
    pub return_tx_hash_asap: bool,
    /// Expected relay inclusion deadline, seconds.
    pub expected_deadline: Option<u64>,
    /// Hard relay inclusion deadline, seconds.
    pub max_deadline: Option<u64>,
    /// Chains on which the relay accepts send-bundle submissions.
    pub send_bundle_chains: Vec<ChainId>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            relay_url: "https://relay.localhost".to_string(),
            chain_id: ChainId::MAINNET,
            network_client_id: NetworkClientId::new("mainnet"),
            eip1559: true,
            selected_account: Address::new("0x0000000000000000000000000000000000000001"),
            smart_transactions_enabled: false,
            smart_transaction_chains: vec![ChainId::MAINNET],
            return_tx_hash_asap: false,
            expected_deadline: Some(45),
            max_deadline: Some(150),
            send_bundle_chains: Vec::new(),
        }
    }
}

impl RuntimeConfig {
    /// Defaults with environment overrides applied.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("WALLET_RELAY_URL") {
            config.relay_url = url;
        }
        if let Ok(raw) = std::env::var("WALLET_CHAIN_ID") {
            match raw.parse::<u64>() {
                Ok(id) => config.chain_id = ChainId(id),
                Err(_) => warn!(raw, "WALLET_CHAIN_ID must be a decimal chain id"),
            }
        }
        if let Ok(raw) = std::env::var("WALLET_SMART_TX") {
            config.smart_transactions_enabled = parse_bool(&raw, "WALLET_SMART_TX");
        }
        if let Ok(raw) = std::env::var("WALLET_RETURN_HASH_ASAP") {
            config.return_tx_hash_asap = parse_bool(&raw, "WALLET_RETURN_HASH_ASAP");
        }
        if let Ok(account) = std::env::var("WALLET_SELECTED_ACCOUNT") {
            config.selected_account = Address::new(account);
        }

        config
    }

    /// The feature-flag snapshot served by the preferences controller.
    #[must_use]
    pub fn feature_flags(&self) -> FeatureFlags {
        FeatureFlags {
            smart_transactions_enabled: self.smart_transactions_enabled,
            smart_transaction_chains: self.smart_transaction_chains.clone(),
            return_tx_hash_asap: self.return_tx_hash_asap,
            expected_deadline: self.expected_deadline,
            max_deadline: self.max_deadline,
        }
    }
}

fn parse_bool(raw: &str, variable: &str) -> bool {
    match raw {
        "1" | "true" => true,
        "0" | "false" => false,
        other => {
            warn!(variable, value = other, "Expected a boolean, using false");
            false
        }
    }
}
