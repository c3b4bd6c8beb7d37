//! # Shared Test Fixtures
//!
//! Record builders plus a scripted action environment standing in for the
//! controllers around the publish pipeline. Every handler counts its calls,
//! so tests can assert not just outcomes but which consultations happened.

use futures::future::BoxFuture;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use wallet_bus::{
    ActionName, ActionResponse, BusError, Messenger, RelayFeeQuote, RelaySubmission,
    RestrictedMessenger, WalletAction,
};
use wallet_controllers::controller_grant;
use wallet_types::{
    Address, ChainId, ControllerName, FeatureFlags, NetworkClientId, TransactionId,
    TransactionRecord, TransactionType, TxHash, TxParams,
};

pub fn random_address() -> Address {
    let bytes: [u8; 20] = rand::random();
    Address::new(format!("0x{}", hex::encode(bytes)))
}

pub fn transfer_params(from: &Address) -> TxParams {
    TxParams {
        from: from.clone(),
        to: Some(random_address()),
        value: 1_000,
        data: "0x".to_string(),
        nonce: None,
        max_fee_per_gas: Some(2_000_000_000),
        gas_price: None,
    }
}

/// An EIP-1559 transfer on mainnet, the baseline relayable record.
pub fn eligible_record(from: &Address) -> TransactionRecord {
    TransactionRecord::new(
        ChainId::MAINNET,
        NetworkClientId::new("mainnet"),
        transfer_params(from),
        TransactionType::Transfer,
    )
}

pub fn smart_flags() -> FeatureFlags {
    FeatureFlags {
        smart_transactions_enabled: true,
        smart_transaction_chains: vec![ChainId::MAINNET],
        ..Default::default()
    }
}

/// Per-action call counters.
#[derive(Default)]
pub struct CallCounts {
    counts: Mutex<HashMap<ActionName, usize>>,
}

impl CallCounts {
    fn record(&self, name: ActionName) {
        *self.counts.lock().entry(name).or_insert(0) += 1;
    }

    pub fn count(&self, name: ActionName) -> usize {
        self.counts.lock().get(&name).copied().unwrap_or(0)
    }
}

/// Arguments captured from relay-facing calls.
#[derive(Default)]
pub struct Captured {
    pub bundle_nonce: Mutex<Option<Option<u64>>>,
    pub bundle_size: Mutex<Option<usize>>,
    pub looked_up: Mutex<Vec<TransactionId>>,
}

/// Scripted behavior of the surrounding controllers.
pub struct WorldConfig {
    pub flags: FeatureFlags,
    pub atomic_batch: bool,
    pub send_bundle: bool,
    pub fee_quote_fails: bool,
    /// Hash carried in the bundle submission response.
    pub bundle_hash: Option<TxHash>,
    /// Hash carried synchronously in the single-submission response.
    pub submit_tx_hash: Option<TxHash>,
    /// Hash resolved by the hash wait.
    pub wait_hash: Option<TxHash>,
    /// Records resolvable via `GetTransactionById`.
    pub records: HashMap<TransactionId, TransactionRecord>,
    pub next_nonce: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            flags: FeatureFlags::default(),
            atomic_batch: false,
            send_bundle: false,
            fee_quote_fails: false,
            bundle_hash: Some(TxHash::new("0xbundled")),
            submit_tx_hash: None,
            wait_hash: Some(TxHash::new("0xrelayed")),
            records: HashMap::new(),
            next_nonce: 7,
        }
    }
}

/// The assembled mock environment.
pub struct World {
    pub bus: Arc<Messenger>,
    pub calls: Arc<CallCounts>,
    pub captured: Arc<Captured>,
}

impl World {
    pub fn new(config: WorldConfig) -> Self {
        let bus = Arc::new(Messenger::new());
        let calls = Arc::new(CallCounts::default());
        let captured = Arc::new(Captured::default());
        let config = Arc::new(config);

        for name in [
            ActionName::GetFeatureFlags,
            ActionName::IsAtomicBatchSupported,
            ActionName::IsSendBundleSupported,
            ActionName::GetRelayFeeQuote,
            ActionName::SubmitRelayTransaction,
            ActionName::SubmitRelayBundle,
            ActionName::WaitForRelayTransactionHash,
            ActionName::GetTransactionById,
            ActionName::GetNextNonce,
        ] {
            let calls = Arc::clone(&calls);
            let captured = Arc::clone(&captured);
            let config = Arc::clone(&config);
            bus.register_action(
                name,
                Arc::new(
                    move |action: WalletAction| -> BoxFuture<'static, Result<ActionResponse, BusError>> {
                        let calls = Arc::clone(&calls);
                        let captured = Arc::clone(&captured);
                        let config = Arc::clone(&config);
                        Box::pin(async move { respond(&config, &calls, &captured, action) })
                    },
                ),
            )
            .unwrap();
        }

        Self {
            bus,
            calls,
            captured,
        }
    }

    /// Handle with the publish pipeline's real capability grant.
    pub fn pipeline_messenger(&self) -> RestrictedMessenger {
        self.bus
            .restricted(controller_grant(ControllerName::PublishPipeline))
    }
}

fn respond(
    config: &WorldConfig,
    calls: &CallCounts,
    captured: &Captured,
    action: WalletAction,
) -> Result<ActionResponse, BusError> {
    let name = action.name();
    calls.record(name);
    match action {
        WalletAction::GetFeatureFlags => Ok(ActionResponse::FeatureFlags(config.flags.clone())),
        WalletAction::IsAtomicBatchSupported { .. } => {
            Ok(ActionResponse::Supported(config.atomic_batch))
        }
        WalletAction::IsSendBundleSupported { .. } => {
            Ok(ActionResponse::Supported(config.send_bundle))
        }
        WalletAction::GetRelayFeeQuote { .. } => {
            if config.fee_quote_fails {
                Err(BusError::handler(name, "quote backend unavailable"))
            } else {
                Ok(ActionResponse::FeeQuote(RelayFeeQuote {
                    max_fee_per_gas: 2_000_000_000,
                    max_priority_fee_per_gas: 200_000_000,
                }))
            }
        }
        WalletAction::SubmitRelayTransaction { .. } => {
            Ok(ActionResponse::RelaySubmission(RelaySubmission {
                submission_id: Uuid::new_v4(),
                tx_hash: config.submit_tx_hash.clone(),
                tx_hashes: Vec::new(),
            }))
        }
        WalletAction::SubmitRelayBundle {
            signed_transactions,
            nonce,
            ..
        } => {
            *captured.bundle_nonce.lock() = Some(nonce);
            *captured.bundle_size.lock() = Some(signed_transactions.len());
            let tx_hashes: Vec<TxHash> = match &config.bundle_hash {
                Some(hash) => signed_transactions
                    .iter()
                    .enumerate()
                    .map(|(index, _)| TxHash::new(format!("{}{index:02}", hash.as_str())))
                    .collect(),
                None => Vec::new(),
            };
            Ok(ActionResponse::RelaySubmission(RelaySubmission {
                submission_id: Uuid::new_v4(),
                tx_hash: tx_hashes.first().cloned(),
                tx_hashes,
            }))
        }
        WalletAction::WaitForRelayTransactionHash { .. } => {
            Ok(ActionResponse::TransactionHash(config.wait_hash.clone()))
        }
        WalletAction::GetTransactionById { transaction_id } => {
            captured.looked_up.lock().push(transaction_id);
            Ok(ActionResponse::Transaction(
                config.records.get(&transaction_id).cloned().map(Box::new),
            ))
        }
        WalletAction::GetNextNonce { .. } => Ok(ActionResponse::Nonce(config.next_nonce)),
        other => Err(BusError::handler(other.name(), "not scripted")),
    }
}
